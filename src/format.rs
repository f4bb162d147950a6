//! Input and output format identifiers
//!
//! Both sets are closed: anything outside them is rejected with
//! [`ConversionError::UnsupportedFormat`] before any parsing happens.

use crate::error::{ConversionError, ConversionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Formats the decoders understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Json,
    Xml,
    Yaml,
    Csv,
}

impl InputFormat {
    /// Every input format, in content-sniffing priority order
    pub const ALL: [InputFormat; 4] = [Self::Json, Self::Xml, Self::Yaml, Self::Csv];

    /// Parse an external label (`json|csv|xml|yaml|yml`)
    pub fn from_label(label: &str) -> ConversionResult<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            "yaml" | "yml" => Ok(Self::Yaml),
            "csv" => Ok(Self::Csv),
            other => Err(ConversionError::unsupported(
                other,
                "expected one of json, csv, xml, yaml, yml",
            )),
        }
    }

    /// Infer the format from a file name's extension.
    ///
    /// Returns `Ok(None)` when the name has no extension at all, so the caller
    /// can fall back to content sniffing.
    pub fn from_file_name(name: &str) -> ConversionResult<Option<Self>> {
        match Path::new(name).extension().and_then(|ext| ext.to_str()) {
            None => Ok(None),
            Some(ext) => Self::from_label(ext)
                .map(Some)
                .map_err(|_| {
                    ConversionError::unsupported(ext, format!("unsupported file '{}'", name))
                }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats the encoders can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Xml,
    Yaml,
    Csv,
    Pdf,
    Xlsx,
    Png,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 7] = [
        Self::Json,
        Self::Xml,
        Self::Yaml,
        Self::Csv,
        Self::Pdf,
        Self::Xlsx,
        Self::Png,
    ];

    /// Parse an external label (`json|csv|xml|yaml|pdf|xlsx|png`)
    pub fn from_label(label: &str) -> ConversionResult<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            "yaml" => Ok(Self::Yaml),
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            "xlsx" => Ok(Self::Xlsx),
            "png" => Ok(Self::Png),
            other => Err(ConversionError::unsupported(
                other,
                "expected one of json, csv, xml, yaml, pdf, xlsx, png",
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::Csv => "csv",
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
            Self::Png => "png",
        }
    }

    /// MIME type sent alongside the encoded payload
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::Yaml => "application/x-yaml",
            Self::Csv => "text/csv",
            Self::Pdf => "application/pdf",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Png => "image/png",
        }
    }

    /// File extension used for attachments and batch output
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Suggested attachment filename
    pub fn filename(&self) -> String {
        format!("data.{}", self.extension())
    }

    /// Whether the payload is text that can be printed to a terminal
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Json | Self::Xml | Self::Yaml | Self::Csv)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
