//! Strict JSON decoder

use crate::error::{ParseError, ParseResult};
use crate::format::InputFormat;
use crate::model::Value;

/// Parse JSON text into the canonical model
pub fn decode(content: &str) -> ParseResult<Value> {
    let json: serde_json::Value = serde_json::from_str(content).map_err(|e| {
        let location = (e.line() > 0).then(|| (e.line(), e.column()));
        ParseError::new(InputFormat::Json, e.to_string(), location)
    })?;
    Ok(Value::from(json))
}
