//! YAML encoder

use crate::error::{ConversionError, ConversionResult};
use crate::format::OutputFormat;
use crate::model::{Number, Value};
use yaml_rust2::yaml::Hash;
use yaml_rust2::{Yaml, YamlEmitter};

/// Structural YAML dump of the value
pub fn encode(value: &Value) -> ConversionResult<Vec<u8>> {
    let mut text = String::new();
    YamlEmitter::new(&mut text)
        .dump(&to_yaml(value))
        .map_err(|e| ConversionError::encode(OutputFormat::Yaml, e))?;

    // Single-document output: drop the explicit start marker
    let body = text
        .strip_prefix("---")
        .unwrap_or(text.as_str())
        .trim_start_matches([' ', '\n']);
    let mut out = String::with_capacity(body.len() + 1);
    out.push_str(body);
    out.push('\n');
    Ok(out.into_bytes())
}

fn to_yaml(value: &Value) -> Yaml {
    match value {
        Value::Null => Yaml::Null,
        Value::Bool(b) => Yaml::Boolean(*b),
        Value::Number(n) => number(n),
        Value::String(s) => Yaml::String(s.clone()),
        Value::Sequence(items) => Yaml::Array(items.iter().map(to_yaml).collect()),
        Value::Mapping(map) => {
            let mut hash = Hash::new();
            for (key, value) in map {
                hash.insert(Yaml::String(key.clone()), to_yaml(value));
            }
            Yaml::Hash(hash)
        }
    }
}

/// `Real` is emitted verbatim, so every literal outside `i64` keeps its digits
fn number(n: &Number) -> Yaml {
    match n.as_i64() {
        Some(i) if n.is_integer() => Yaml::Integer(i),
        _ => Yaml::Real(n.as_str().to_string()),
    }
}
