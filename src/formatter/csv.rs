//! CSV encoder for sequences of mappings

use crate::error::{ConversionError, ConversionResult};
use crate::format::OutputFormat;
use crate::model::{Mapping, Shape, Value};

/// Header row and data rows of a tabular value
pub(crate) struct Table<'a> {
    pub headers: Vec<&'a str>,
    pub rows: Vec<&'a Mapping>,
}

impl<'a> Table<'a> {
    /// Check that `value` is a sequence of mappings whose keys all appear in
    /// the first row. Missing keys are allowed and render as empty cells.
    pub fn from_value(value: &'a Value, format: OutputFormat) -> ConversionResult<Self> {
        let items = match value {
            Value::Sequence(items) => items,
            other => {
                return Err(ConversionError::shape(
                    format,
                    other.shape(),
                    "expected a sequence of mappings",
                ))
            }
        };

        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::Mapping(map) => rows.push(map),
                _ => {
                    return Err(ConversionError::shape(
                        format,
                        value.shape(),
                        format!("row {} is a {}, not a mapping", rows.len() + 1, item.type_name()),
                    ))
                }
            }
        }

        let headers: Vec<&str> = rows
            .first()
            .map(|first| first.keys().map(String::as_str).collect())
            .unwrap_or_default();

        for (index, row) in rows.iter().enumerate().skip(1) {
            if let Some(extra) = row.keys().find(|key| !headers.contains(&key.as_str())) {
                return Err(ConversionError::shape(
                    format,
                    Shape::SequenceOfMappings,
                    format!("row {} has column '{}' missing from the header", index + 1, extra),
                ));
            }
        }

        Ok(Self { headers, rows })
    }

    /// Cell values of one row in header order
    pub fn cells(&self, row: &'a Mapping) -> impl Iterator<Item = Option<&'a Value>> + '_ {
        self.headers.iter().map(move |name| row.get(*name))
    }
}

/// Encode a sequence of mappings as delimited text with `\n` row endings
pub fn encode(value: &Value, delimiter: u8) -> ConversionResult<Vec<u8>> {
    let table = Table::from_value(value, OutputFormat::Csv)?;
    if table.rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(&table.headers).map_err(encode_error)?;
    for row in &table.rows {
        let record: Vec<String> = table
            .cells(row)
            .map(|cell| cell.map(Value::to_cell_text).unwrap_or_default())
            .collect();
        wtr.write_record(&record).map_err(encode_error)?;
    }

    wtr.flush()
        .map_err(|e| ConversionError::encode(OutputFormat::Csv, e))?;
    wtr.into_inner()
        .map_err(|e| ConversionError::encode(OutputFormat::Csv, e.into_error()))
}

fn encode_error(e: csv::Error) -> ConversionError {
    ConversionError::encode(OutputFormat::Csv, e)
}
