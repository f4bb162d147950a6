//! Error types and handling infrastructure for format conversion

use crate::format::{InputFormat, OutputFormat};
use crate::model::Shape;
use std::fmt;
use std::path::PathBuf;

/// Ambient failures that are not part of the conversion taxonomy proper
#[derive(Debug, thiserror::Error)]
pub enum ConversionErrorKind {
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Input too large: {size} bytes (limit: {limit} bytes)")]
    InputTooLarge { size: usize, limit: usize },

    #[error("Nesting too deep: {depth} levels (limit: {limit})")]
    NestingTooDeep { depth: usize, limit: usize },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("Output {} would overwrite the conversion of {}", .output.display(), .first.display())]
    OutputCollision { output: PathBuf, first: PathBuf },
}

impl ConversionErrorKind {
    pub fn io(message: String, path: Option<PathBuf>) -> Self {
        Self::Io { message, path }
    }

    pub fn configuration(message: String) -> Self {
        Self::Configuration { message }
    }
}

/// Main error type for conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Unknown or undetectable input/output format
    #[error("Unsupported format '{format}': {message}")]
    UnsupportedFormat { format: String, message: String },

    /// Malformed input for the declared or detected format
    #[error(transparent)]
    ParseError(#[from] ParseError),

    /// The decoded value cannot be represented by the target encoder
    #[error("Cannot encode {shape} as {format}: {message}")]
    ShapeError {
        format: OutputFormat,
        shape: Shape,
        message: String,
    },

    /// Encoder-internal failure
    #[error(transparent)]
    EncodeError(#[from] EncodeError),

    #[error("{kind}")]
    Conversion {
        kind: ConversionErrorKind,
        source: Option<anyhow::Error>,
    },
}

/// Coarse classification for the surrounding request layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedFormat,
    Parse,
    Shape,
    Encode,
    InputTooLarge,
    Io,
    Configuration,
}

impl ErrorKind {
    /// True when the caller sent something we cannot handle (4xx territory)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat | Self::Parse | Self::Shape | Self::InputTooLarge
        )
    }
}

impl ConversionError {
    pub fn unsupported(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn parse(format: InputFormat, message: String, location: Option<(usize, usize)>) -> Self {
        Self::ParseError(ParseError::new(format, message, location))
    }

    pub fn shape(format: OutputFormat, shape: Shape, message: impl Into<String>) -> Self {
        Self::ShapeError {
            format,
            shape,
            message: message.into(),
        }
    }

    pub fn encode<E>(format: OutputFormat, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::EncodeError(EncodeError::new(format, source))
    }

    pub fn conversion(kind: ConversionErrorKind) -> Self {
        Self::Conversion { kind, source: None }
    }

    pub fn conversion_with_source(kind: ConversionErrorKind, source: anyhow::Error) -> Self {
        Self::Conversion {
            kind,
            source: Some(source),
        }
    }

    /// Classify the error for status mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::ParseError(_) => ErrorKind::Parse,
            Self::ShapeError { .. } => ErrorKind::Shape,
            Self::EncodeError(_) => ErrorKind::Encode,
            Self::Conversion { kind, .. } => match kind {
                ConversionErrorKind::Io { .. } | ConversionErrorKind::OutputCollision { .. } => {
                    ErrorKind::Io
                }
                ConversionErrorKind::InputTooLarge { .. }
                | ConversionErrorKind::NestingTooDeep { .. } => ErrorKind::InputTooLarge,
                ConversionErrorKind::Configuration { .. } => ErrorKind::Configuration,
            },
        }
    }

    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedFormat { format, message } => {
                format!("Unsupported format '{}': {}", format, message)
            }
            Self::ParseError(err) => {
                if let Some((line, col)) = err.location {
                    format!(
                        "{} parse error at line {}, column {}: {}",
                        err.format.as_str().to_uppercase(),
                        line,
                        col,
                        err.message
                    )
                } else {
                    format!(
                        "{} parse error: {}",
                        err.format.as_str().to_uppercase(),
                        err.message
                    )
                }
            }
            Self::ShapeError {
                format,
                shape,
                message,
            } => format!(
                "Data shaped as {} cannot be converted to {}: {}",
                shape,
                format.as_str().to_uppercase(),
                message
            ),
            Self::EncodeError(err) => format!(
                "Error converting to {}: {}",
                err.format.as_str().to_uppercase(),
                err.source
            ),
            Self::Conversion { kind, .. } => match kind {
                ConversionErrorKind::InputTooLarge { size, limit } => {
                    format!("Input too large: {} bytes (limit: {} bytes)", size, limit)
                }
                ConversionErrorKind::NestingTooDeep { depth, limit } => {
                    format!("Input nested {} levels deep (limit: {})", depth, limit)
                }
                _ => self.to_string(),
            },
        }
    }
}

/// Decoder failures
#[derive(Debug, Clone)]
pub struct ParseError {
    pub format: InputFormat,
    pub message: String,
    pub location: Option<(usize, usize)>,
}

impl ParseError {
    pub fn new(format: InputFormat, message: String, location: Option<(usize, usize)>) -> Self {
        Self {
            format,
            message,
            location,
        }
    }

    /// Build a location from a byte offset into `content`
    pub fn with_offset(mut self, content: &str, offset: usize) -> Self {
        self.location = Some(offset_to_location(content, offset));
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {} input: {}", self.format, self.message)?;
        if let Some((line, col)) = self.location {
            write!(f, " at line {}, column {}", line, col)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Encoder failures not explained by the value's shape
#[derive(Debug, thiserror::Error)]
#[error("Failed to encode {format}: {source}")]
pub struct EncodeError {
    pub format: OutputFormat,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl EncodeError {
    pub fn new<E>(format: OutputFormat, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            format,
            source: Box::new(source),
        }
    }
}

/// Convert a byte offset into a 1-based (line, column) pair
pub fn offset_to_location(content: &str, offset: usize) -> (usize, usize) {
    let mut position = offset.min(content.len());
    while !content.is_char_boundary(position) {
        position -= 1;
    }
    let before = &content[..position];
    let line = before.chars().filter(|&c| c == '\n').count() + 1;
    let col = position - before.rfind('\n').map_or(0, |p| p + 1);
    (line, col + 1)
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Convenience result type for decoding operations
pub type ParseResult<T> = Result<T, ParseError>;
