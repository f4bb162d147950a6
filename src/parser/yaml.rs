//! YAML decoder
//!
//! Floats and out-of-range integers keep their source text, so a literal such
//! as `123456789012345678901234567890` or `0.1000000000000000055511151231257827`
//! reaches the canonical model without passing through `f64`.

use crate::error::{ParseError, ParseResult};
use crate::format::InputFormat;
use crate::model::{Mapping, Number, Value};
use yaml_rust2::{Yaml, YamlLoader};

/// Parse YAML text into the canonical model
pub fn decode(content: &str) -> ParseResult<Value> {
    let mut documents = YamlLoader::load_from_str(content).map_err(|e| {
        let marker = e.marker();
        ParseError::new(
            InputFormat::Yaml,
            e.to_string(),
            Some((marker.line(), marker.col() + 1)),
        )
    })?;

    match documents.len() {
        0 => Ok(Value::Null),
        1 => convert(documents.remove(0)),
        n => Err(ParseError::new(
            InputFormat::Yaml,
            format!("expected a single document, found {}", n),
            None,
        )),
    }
}

fn convert(yaml: Yaml) -> ParseResult<Value> {
    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Boolean(b) => Value::Bool(b),
        Yaml::Integer(i) => Value::Number(Number::from(i)),
        Yaml::Real(text) => convert_real(text),
        Yaml::String(s) => Value::String(s),
        Yaml::Array(items) => Value::Sequence(
            items
                .into_iter()
                .map(convert)
                .collect::<ParseResult<Vec<_>>>()?,
        ),
        Yaml::Hash(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, value) in map {
                out.insert(convert_key(key)?, convert(value)?);
            }
            Value::Mapping(out)
        }
        Yaml::Alias(_) => return Err(unsupported("unresolved alias")),
        Yaml::BadValue => return Err(unsupported("scalar does not match its tag")),
    })
}

/// Plain scalars the loader resolved as floats, including integers beyond `i64`
fn convert_real(text: String) -> Value {
    if let Some(number) = Number::parse(&text).or_else(|| Number::parse(&normalize_float(&text))) {
        return Value::Number(number);
    }
    match text.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(number) => Value::Number(number),
        // .inf / -.inf / .nan have no JSON literal
        None => Value::String(text),
    }
}

/// Rewrite YAML-only float spellings (`+1.5`, `.5`, `1.`, `1.e3`) into JSON grammar
fn normalize_float(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => unsigned.split_at(at),
        None => (unsigned, ""),
    };

    let mut mantissa = mantissa.to_string();
    if mantissa.starts_with('.') {
        mantissa.insert(0, '0');
    }
    if mantissa.ends_with('.') {
        mantissa.push('0');
    }
    format!("{}{}{}", sign, mantissa, exponent)
}

fn convert_key(key: Yaml) -> ParseResult<String> {
    match key {
        Yaml::String(s) | Yaml::Real(s) => Ok(s),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Boolean(b) => Ok(b.to_string()),
        Yaml::Integer(i) => Ok(i.to_string()),
        other => Err(unsupported(&format!(
            "mapping keys must be scalars, found {:?}",
            other
        ))),
    }
}

fn unsupported(message: &str) -> ParseError {
    ParseError::new(InputFormat::Yaml, message.to_string(), None)
}
