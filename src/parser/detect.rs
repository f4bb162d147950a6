//! Input format detection
//!
//! Precedence: an explicit label, then the upload's file extension, then
//! content sniffing. Sniffing tries JSON first because YAML accepts almost any
//! JSON-shaped text, then XML, then YAML.

use crate::error::{ConversionError, ConversionResult};
use crate::format::InputFormat;
use crate::model::Value;
use crate::parser::{json, xml, yaml};
use tracing::debug;

/// How the input format was decided
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Given by the caller or implied by the file extension
    Known(InputFormat),
    /// Found by sniffing; the value parsed along the way is kept so it is not
    /// decoded a second time
    Sniffed(InputFormat, Value),
}

impl Detection {
    pub fn format(&self) -> InputFormat {
        match self {
            Detection::Known(format) | Detection::Sniffed(format, _) => *format,
        }
    }
}

/// Decide the input format without keeping any sniffed value
pub fn detect_format(
    text: &str,
    filename: Option<&str>,
    declared: Option<InputFormat>,
) -> ConversionResult<InputFormat> {
    detect(text, filename, declared, None).map(|detection| detection.format())
}

/// Decide the input format, sniffing content only when nothing else applies
pub fn detect(
    text: &str,
    filename: Option<&str>,
    declared: Option<InputFormat>,
    max_depth: Option<usize>,
) -> ConversionResult<Detection> {
    if let Some(format) = declared {
        debug!(%format, "using declared input format");
        return Ok(Detection::Known(format));
    }

    if let Some(name) = filename {
        if let Some(format) = InputFormat::from_file_name(name)? {
            debug!(%format, filename = name, "input format from file extension");
            return Ok(Detection::Known(format));
        }
    }

    let (format, value) = sniff(text, max_depth)?;
    debug!(%format, "input format from content");
    Ok(Detection::Sniffed(format, value))
}

/// Try each sniffable format in priority order and return the first that parses
pub fn sniff(text: &str, max_depth: Option<usize>) -> ConversionResult<(InputFormat, Value)> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::unsupported(
            "unknown",
            "cannot detect the format of empty input",
        ));
    }

    if let Ok(value) = json::decode(trimmed) {
        return Ok((InputFormat::Json, value));
    }

    if looks_like_xml(trimmed) {
        if let Ok(value) = xml::decode(trimmed, max_depth) {
            return Ok((InputFormat::Xml, value));
        }
    }

    if let Ok(value) = yaml::decode(text) {
        return Ok((InputFormat::Yaml, value));
    }

    Err(ConversionError::unsupported(
        "unknown",
        "input is not valid JSON, XML or YAML; declare the input format explicitly",
    ))
}

fn looks_like_xml(trimmed: &str) -> bool {
    trimmed.starts_with('<') && trimmed.ends_with('>')
}
