//! End-to-end conversion tests through the `Converter`
//!
//! Every input format is converted into every output format, and the
//! documented examples are checked byte for byte.

use assert_matches::assert_matches;
use dataconv::{
    convert_text, ConversionConfig, ConversionError, ConversionRequest, Converter, ErrorKind,
    InputFormat, InputSource, OutputFormat,
};
use serde_json::json;

#[cfg(test)]
mod end_to_end_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const JSON_ROWS: &str = r#"[{"id": 1, "name": "Ada"}, {"id": 2, "name": "Linus"}]"#;
    const XML_DOC: &str = "<team><member>Ada</member><member>Linus</member></team>";
    const YAML_ROWS: &str = "- id: 1\n  name: Ada\n- id: 2\n  name: Linus\n";
    const CSV_ROWS: &str = "id,name\n1,Ada\n2,Linus\n";

    fn converter() -> Converter {
        Converter::new(ConversionConfig::default()).unwrap()
    }

    #[test]
    fn test_json_rows_to_csv() {
        let conversion = convert_text(r#"[{"a":1,"b":2},{"a":3,"b":4}]"#, None, "csv").unwrap();
        assert_eq!(conversion.bytes(), b"a,b\n1,2\n3,4\n");
        assert_eq!(conversion.content_type(), "text/csv");
    }

    #[test]
    fn test_xml_to_json() {
        let conversion = convert_text("<root><x>1</x></root>", Some("xml"), "json").unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(conversion.bytes()).unwrap();
        assert_eq!(parsed, json!({"root": {"x": "1"}}));
        assert_eq!(conversion.source_format, InputFormat::Xml);
    }

    #[test]
    fn test_truncated_json_fails_for_every_output() {
        for format in OutputFormat::ALL {
            let err = convert_text(r#"{"a":"#, Some("json"), format.as_str()).unwrap_err();
            assert_matches!(err, ConversionError::ParseError(_));
            assert_eq!(err.kind(), ErrorKind::Parse);
        }
    }

    #[test]
    fn test_every_input_to_every_output() {
        let converter = converter();
        let inputs = [
            (InputFormat::Json, JSON_ROWS),
            (InputFormat::Xml, XML_DOC),
            (InputFormat::Yaml, YAML_ROWS),
            (InputFormat::Csv, CSV_ROWS),
        ];

        for (input_format, text) in inputs {
            for output_format in OutputFormat::ALL {
                let request = ConversionRequest::new(InputSource::inline(text), output_format)
                    .with_input_format(input_format);
                let result = converter.convert(&request);

                // A single-root XML document is a mapping, which has no table form
                let tabular = matches!(output_format, OutputFormat::Csv | OutputFormat::Xlsx);
                if input_format == InputFormat::Xml && tabular {
                    assert_matches!(result, Err(ConversionError::ShapeError { .. }));
                    continue;
                }

                let conversion = result.unwrap_or_else(|e| {
                    panic!("{input_format} -> {output_format} failed: {e}")
                });
                assert!(!conversion.bytes().is_empty());
                assert_eq!(conversion.artifact.format(), output_format);
            }
        }
    }

    #[test]
    fn test_equivalent_inputs_produce_identical_csv() {
        let converter = converter();
        let outputs: Vec<Vec<u8>> = [JSON_ROWS, YAML_ROWS, CSV_ROWS]
            .iter()
            .zip([InputFormat::Json, InputFormat::Yaml, InputFormat::Csv])
            .map(|(text, format)| {
                let request = ConversionRequest::new(InputSource::inline(*text), OutputFormat::Csv)
                    .with_input_format(format);
                converter.convert(&request).unwrap().bytes().to_vec()
            })
            .collect();

        assert_eq!(outputs[0], CSV_ROWS.as_bytes());
        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[1], outputs[2]);
    }

    #[test]
    fn test_upload_extension_drives_detection() {
        let request = ConversionRequest::new(
            InputSource::upload(CSV_ROWS.as_bytes(), "people.csv"),
            OutputFormat::Json,
        );
        let conversion = converter().convert(&request).unwrap();
        assert_eq!(conversion.source_format, InputFormat::Csv);

        let parsed: serde_json::Value = serde_json::from_slice(conversion.bytes()).unwrap();
        assert_eq!(parsed, json!([{"id": 1, "name": "Ada"}, {"id": 2, "name": "Linus"}]));
    }

    #[test]
    fn test_upload_with_unknown_extension_is_rejected() {
        let request = ConversionRequest::new(
            InputSource::upload(b"{}".to_vec(), "notes.txt"),
            OutputFormat::Json,
        );
        let err = converter().convert(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(err.kind().is_client_error());
    }

    #[test]
    fn test_unknown_labels_are_rejected() {
        assert_matches!(
            convert_text("{}", Some("toml"), "json"),
            Err(ConversionError::UnsupportedFormat { .. })
        );
        assert_matches!(
            convert_text("{}", None, "docx"),
            Err(ConversionError::UnsupportedFormat { .. })
        );
    }

    #[test]
    fn test_large_integers_survive_json_round_trip() {
        let text = r#"{"big": 123456789012345678901234567890, "precise": 0.1000000000000000055511151231257827}"#;
        let conversion = convert_text(text, None, "json").unwrap();
        let output = String::from_utf8(conversion.bytes().to_vec()).unwrap();
        assert!(output.contains("123456789012345678901234567890"));
        assert!(output.contains("0.1000000000000000055511151231257827"));
    }

    #[test]
    fn test_wide_numbers_survive_yaml_in_both_directions() {
        let from_yaml = convert_text(
            "y: 123456789012345678901234567890\nz: 0.1000000000000000055511151231257827\n",
            Some("yaml"),
            "json",
        )
        .unwrap();
        let json_text = String::from_utf8(from_yaml.bytes().to_vec()).unwrap();
        assert!(json_text.contains("\"y\": 123456789012345678901234567890"));
        assert!(json_text.contains("\"z\": 0.1000000000000000055511151231257827"));

        let to_yaml = convert_text(&json_text, Some("json"), "yaml").unwrap();
        assert_eq!(
            String::from_utf8(to_yaml.bytes().to_vec()).unwrap(),
            "y: 123456789012345678901234567890\nz: 0.1000000000000000055511151231257827\n"
        );
    }

    #[test]
    fn test_input_size_limit() {
        let config = ConversionConfig::default().with_max_input_bytes(8);
        let converter = Converter::new(config).unwrap();
        let request = ConversionRequest::new(InputSource::inline(JSON_ROWS), OutputFormat::Yaml);
        let err = converter.convert(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputTooLarge);
    }
}
