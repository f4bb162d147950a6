//! Output encoders
//!
//! Each encoder turns a canonical [`Value`] into the bytes of one output
//! format. Encoders are pure: the same value and configuration always give
//! byte-identical output, and a failure never yields partial bytes.

pub mod csv;
pub mod json;
pub mod pdf;
pub mod png;
pub mod xlsx;
pub mod xml;
pub mod yaml;

use crate::conversion::ConversionConfig;
use crate::error::ConversionResult;
use crate::format::OutputFormat;
use crate::model::Value;
use tracing::debug;

/// Encoded payload ready to hand to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    format: OutputFormat,
    bytes: Vec<u8>,
    filename: String,
}

impl Artifact {
    pub fn new(format: OutputFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            bytes,
            filename: format.filename(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Payload as text, for the textual formats
    pub fn as_text(&self) -> Option<&str> {
        if self.format.is_textual() {
            std::str::from_utf8(&self.bytes).ok()
        } else {
            None
        }
    }
}

/// Encode `value` as `format`
pub fn encode(value: &Value, format: OutputFormat, config: &ConversionConfig) -> ConversionResult<Artifact> {
    let bytes = match format {
        OutputFormat::Json => json::encode(value)?,
        OutputFormat::Xml => xml::encode(value, config)?,
        OutputFormat::Yaml => yaml::encode(value)?,
        OutputFormat::Csv => csv::encode(value, config.csv_delimiter.as_byte())?,
        OutputFormat::Pdf => pdf::encode(value)?,
        OutputFormat::Xlsx => xlsx::encode(value)?,
        OutputFormat::Png => png::encode(value)?,
    };
    debug!(%format, bytes = bytes.len(), "encoded value");
    Ok(Artifact::new(format, bytes))
}
