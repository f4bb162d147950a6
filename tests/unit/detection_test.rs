//! Unit tests for input format detection
//!
//! Tests cover:
//! - Label, extension and content precedence
//! - Sniffing priority (JSON before XML before YAML)
//! - Undetectable input

use assert_matches::assert_matches;
use dataconv::parser::{detect, detect_format, sniff, Detection};
use dataconv::{ConversionError, InputFormat};

#[cfg(test)]
mod detection_tests {
    use super::*;

    #[test]
    fn test_json_scalar_is_json_not_yaml() {
        assert_eq!(detect_format("123", None, None).unwrap(), InputFormat::Json);
        assert_eq!(detect_format("true", None, None).unwrap(), InputFormat::Json);
        assert_eq!(detect_format("null", None, None).unwrap(), InputFormat::Json);
    }

    #[test]
    fn test_json_shaped_flow_yaml_is_json() {
        let text = r#"{"a": [1, 2], "b": {"c": null}}"#;
        assert_eq!(detect_format(text, None, None).unwrap(), InputFormat::Json);
    }

    #[test]
    fn test_xml_needs_angle_brackets_at_both_ends() {
        assert_eq!(
            detect_format("<?xml version=\"1.0\"?><a>1</a>", None, None).unwrap(),
            InputFormat::Xml
        );
        // Not closed with '>', so XML is never tried and YAML takes it as text
        assert_eq!(detect_format("<a>1</a> trailing", None, None).unwrap(), InputFormat::Yaml);
    }

    #[test]
    fn test_yaml_fallback() {
        let (format, value) = sniff("- a\n- b\n", None).unwrap();
        assert_eq!(format, InputFormat::Yaml);
        assert_eq!(value.as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn test_sniffed_value_is_returned() {
        let detection = detect("[1]", None, None, None).unwrap();
        assert_matches!(detection, Detection::Sniffed(InputFormat::Json, _));
    }

    #[test]
    fn test_label_beats_extension() {
        let detection = detect("a,b\n1,2\n", Some("data.json"), Some(InputFormat::Csv), None).unwrap();
        assert_eq!(detection, Detection::Known(InputFormat::Csv));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(
            detect_format("", Some("People.CSV"), None).unwrap(),
            InputFormat::Csv
        );
        assert_eq!(
            detect_format("", Some("config.yml"), None).unwrap(),
            InputFormat::Yaml
        );
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        assert_matches!(
            detect_format("{}", Some("sheet.xlsx"), None),
            Err(ConversionError::UnsupportedFormat { .. })
        );
    }

    #[test]
    fn test_empty_content_is_unsupported() {
        assert_matches!(
            detect_format("", None, None),
            Err(ConversionError::UnsupportedFormat { .. })
        );
        assert_matches!(
            detect_format(" \n\t", Some("noext"), None),
            Err(ConversionError::UnsupportedFormat { .. })
        );
    }
}
