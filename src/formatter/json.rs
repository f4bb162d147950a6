//! Pretty JSON encoder

use crate::error::{ConversionError, ConversionResult};
use crate::format::OutputFormat;
use crate::model::Value;

/// Two-space indented JSON with keys in encounter order
pub fn encode(value: &Value) -> ConversionResult<Vec<u8>> {
    pretty(value).map(String::into_bytes)
}

/// Pretty JSON text, shared by the document and image renderers
pub fn pretty(value: &Value) -> ConversionResult<String> {
    serde_json::to_string_pretty(&value.to_json())
        .map_err(|e| ConversionError::encode(OutputFormat::Json, e))
}
