//! CSV decoder: header row plus data rows into a sequence of mappings

use crate::error::{ParseError, ParseResult};
use crate::format::InputFormat;
use crate::model::{Mapping, Number, Value};
use std::io::Cursor;

/// Parse delimited text. Empty input yields an empty sequence.
pub fn decode(content: &str, delimiter: u8, infer_types: bool) -> ParseResult<Value> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .delimiter(delimiter)
        .from_reader(Cursor::new(content.as_bytes()));

    let headers = reader.headers().map_err(csv_error)?.clone();
    let mut seen = std::collections::HashSet::new();
    for name in headers.iter() {
        if !seen.insert(name) {
            return Err(ParseError::new(
                InputFormat::Csv,
                format!("duplicate column '{}'", name),
                Some((1, 1)),
            ));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let mut row = Mapping::with_capacity(headers.len());
        for (name, field) in headers.iter().zip(record.iter()) {
            let cell = if infer_types {
                infer_cell(field)
            } else {
                Value::String(field.to_string())
            };
            row.insert(name.to_string(), cell);
        }
        rows.push(Value::Mapping(row));
    }

    Ok(Value::Sequence(rows))
}

/// Type a raw cell: empty is null, `true`/`false` are booleans, JSON number
/// literals are numbers, everything else stays text
pub fn infer_cell(field: &str) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    match field {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match Number::parse(field) {
            Some(n) => Value::Number(n),
            None => Value::String(field.to_string()),
        },
    }
}

fn csv_error(e: csv::Error) -> ParseError {
    let location = e.position().map(|pos| (pos.line() as usize, 1));
    ParseError::new(InputFormat::Csv, e.to_string(), location)
}
