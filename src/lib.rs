//! Structured data converter
//!
//! Decodes JSON, XML, YAML or CSV into one canonical [`Value`] and encodes it
//! as JSON, XML, YAML, CSV, PDF, XLSX or PNG. Encoded output is memoized in a
//! [`ConversionCache`] keyed by the value's fingerprint and the target format.

pub mod cli;
pub mod conversion;
pub mod error;
pub mod format;
pub mod formatter;
pub mod model;
pub mod parser;

// Re-export commonly used types
pub use conversion::{
    convert_text, CachePolicy, Conversion, ConversionCache, ConversionConfig, ConversionRequest,
    ConversionResult, Converter,
};
pub use error::{ConversionError, ConversionErrorKind, ErrorKind, ParseError};
pub use format::{InputFormat, OutputFormat};
pub use formatter::Artifact;
pub use model::{Number, Shape, Value};
pub use parser::InputSource;

/// Decode text of a known format with default configuration
pub fn decode(text: &str, format: InputFormat) -> Result<Value, ConversionError> {
    let value = parser::decode(text, format, &ConversionConfig::default())?;
    Ok(value)
}

/// Encode a value with default configuration
pub fn encode(value: &Value, format: OutputFormat) -> Result<Artifact, ConversionError> {
    formatter::encode(value, format, &ConversionConfig::default())
}
