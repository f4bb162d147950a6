use crate::conversion::config::ConversionConfig;
use crate::error::{ConversionError, ConversionErrorKind, ConversionResult};
use crate::model::Value;
use crate::parser::InputSource;

/// Check the raw payload size before any decoding happens.
pub fn check_input_size(source: &InputSource, config: &ConversionConfig) -> ConversionResult<()> {
    let size = source.len();
    if size > config.max_input_bytes {
        return Err(ConversionError::conversion(
            ConversionErrorKind::InputTooLarge {
                size,
                limit: config.max_input_bytes,
            },
        ));
    }

    Ok(())
}

/// After decoding, make sure the value is not nested deeper than configured.
pub fn check_depth(value: &Value, config: &ConversionConfig) -> ConversionResult<()> {
    if let Some(limit) = config.max_depth {
        let depth = value.depth();
        if depth > limit {
            return Err(ConversionError::conversion(
                ConversionErrorKind::NestingTooDeep { depth, limit },
            ));
        }
    }

    Ok(())
}
