//! Input sources, format detection and decoders

pub mod csv;
pub mod detect;
pub mod directory;
pub mod filter;
pub mod json;
pub mod xml;
pub mod yaml;

pub use detect::{detect, detect_format, sniff, Detection};

use crate::conversion::ConversionConfig;
use crate::error::{ConversionError, ConversionErrorKind, ConversionResult, ParseResult};
use crate::format::InputFormat;
use crate::model::Value;
use std::io::Read;
use std::path::Path;

const UTF8_BOM: &str = "\u{feff}";

/// Raw input of a conversion request
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    /// Uploaded bytes, optionally with the client's file name
    Upload {
        bytes: Vec<u8>,
        filename: Option<String>,
    },
    /// Text typed or pasted by the caller
    Inline(String),
}

impl InputSource {
    /// Create from uploaded bytes
    pub fn upload(bytes: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        Self::Upload {
            bytes: bytes.into(),
            filename: Some(filename.into()),
        }
    }

    /// Create from inline text
    pub fn inline(text: impl Into<String>) -> Self {
        Self::Inline(text.into())
    }

    /// Read a file as an upload named after the file
    pub fn from_path(path: &Path) -> ConversionResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ConversionError::conversion(ConversionErrorKind::io(
                format!("Failed to read {}: {}", path.display(), e),
                Some(path.to_path_buf()),
            ))
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(Self::Upload { bytes, filename })
    }

    /// Read standard input as an unnamed upload
    pub fn from_stdin() -> ConversionResult<Self> {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes).map_err(|e| {
            ConversionError::conversion(ConversionErrorKind::io(
                format!("Failed to read stdin: {}", e),
                None,
            ))
        })?;
        Ok(Self::Upload {
            bytes,
            filename: None,
        })
    }

    /// Size of the raw payload in bytes
    pub fn len(&self) -> usize {
        match self {
            InputSource::Upload { bytes, .. } => bytes.len(),
            InputSource::Inline(text) => text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            InputSource::Upload { filename, .. } => filename.as_deref(),
            InputSource::Inline(_) => None,
        }
    }

    /// Get a human-readable description of the source
    pub fn description(&self) -> String {
        match self {
            InputSource::Upload {
                filename: Some(name),
                ..
            } => format!("upload '{}'", name),
            InputSource::Upload { filename: None, .. } => "unnamed upload".to_string(),
            InputSource::Inline(_) => "inline text".to_string(),
        }
    }

    /// Payload as text with any UTF-8 byte order mark removed
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        let text = match self {
            InputSource::Upload { bytes, .. } => std::str::from_utf8(bytes)?,
            InputSource::Inline(text) => text.as_str(),
        };
        Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text))
    }
}

/// Decode `content` with the decoder for `format`
pub fn decode(content: &str, format: InputFormat, config: &ConversionConfig) -> ParseResult<Value> {
    match format {
        InputFormat::Json => json::decode(content),
        InputFormat::Xml => xml::decode(content, config.max_depth),
        InputFormat::Yaml => yaml::decode(content),
        InputFormat::Csv => csv::decode(
            content,
            config.csv_delimiter.as_byte(),
            config.infer_csv_types,
        ),
    }
}
