//! Unit tests for the four decoders
//!
//! Tests cover:
//! - Structural mapping of each format into the canonical value
//! - The XML attribute/child merge rule
//! - Malformed input always failing with a parse error

use dataconv::{decode, InputFormat, Value};
use serde_json::json;

#[cfg(test)]
mod decoder_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode_json(text: &str, format: InputFormat) -> serde_json::Value {
        decode(text, format).unwrap().to_json()
    }

    #[test]
    fn test_json_keeps_key_order() {
        let value = decode(r#"{"z": 1, "a": 2, "m": 3}"#, InputFormat::Json).unwrap();
        let keys: Vec<&str> = value.as_mapping().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_xml_example_document() {
        assert_eq!(
            decode_json("<root><x>1</x></root>", InputFormat::Xml),
            json!({"root": {"x": "1"}})
        );
    }

    #[test]
    fn test_xml_attribute_and_child_collide_into_sequence() {
        let value = decode_json(
            r#"<book id="1"><id>isbn</id><title>Rust</title><title>Again</title></book>"#,
            InputFormat::Xml,
        );
        assert_eq!(
            value,
            json!({"book": {"id": ["1", "isbn"], "title": ["Rust", "Again"]}})
        );
    }

    #[test]
    fn test_xml_empty_elements() {
        assert_eq!(
            decode_json("<a><b/><c></c><d>  </d></a>", InputFormat::Xml),
            json!({"a": {"b": "", "c": "", "d": ""}})
        );
    }

    #[test]
    fn test_yaml_structures() {
        let value = decode_json(
            "users:\n  - name: Ada\n    admin: true\n  - name: Linus\n    admin: false\n",
            InputFormat::Yaml,
        );
        assert_eq!(
            value,
            json!({"users": [{"name": "Ada", "admin": true}, {"name": "Linus", "admin": false}]})
        );
    }

    #[test]
    fn test_csv_rows() {
        let value = decode_json("id,name,score\n1,Ada,9.5\n2,Linus,\n", InputFormat::Csv);
        assert_eq!(
            value,
            json!([
                {"id": 1, "name": "Ada", "score": 9.5},
                {"id": 2, "name": "Linus", "score": null}
            ])
        );
    }

    #[test]
    fn test_csv_empty_input_is_empty_sequence() {
        assert_eq!(decode("", InputFormat::Csv).unwrap(), Value::Sequence(vec![]));
    }

    #[test]
    fn test_malformed_input_fails_for_every_format() {
        let cases = [
            (InputFormat::Json, r#"{"a":"#),
            (InputFormat::Xml, "<a><b></a>"),
            (InputFormat::Yaml, "a: [1, 2"),
            (InputFormat::Csv, "a,b\n1,2,3\n"),
        ];
        for (format, text) in cases {
            let err = decode(text, format).unwrap_err();
            match err {
                dataconv::ConversionError::ParseError(parse) => assert_eq!(parse.format, format),
                other => panic!("expected a parse error for {format}, got {other:?}"),
            }
        }
    }
}
