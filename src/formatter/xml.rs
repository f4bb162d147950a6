//! XML encoder
//!
//! A mapping with exactly one non-sequence entry becomes the document root.
//! Anything else is wrapped in the configured root element. Mapping entries
//! become child elements, sequence values repeat the parent tag, and items of
//! a sequence nested directly in a sequence are written as `<item>`.

use crate::conversion::ConversionConfig;
use crate::error::{ConversionError, ConversionResult};
use crate::format::OutputFormat;
use crate::model::Value;
use crate::parser::xml::TEXT_KEY;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const ITEM_TAG: &str = "item";

/// True when `name` can be used as an element name as-is
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start(first) => chars.all(is_name_char),
        _ => false,
    }
}

/// Map an arbitrary key onto a valid element name.
///
/// Invalid characters become `_`; a name that cannot start with its first
/// character gets a `_` prefix.
pub fn sanitize_name(name: &str) -> String {
    if is_valid_name(name) {
        return name.to_string();
    }
    let mut sanitized: String = name
        .chars()
        .map(|c| if is_name_char(c) { c } else { '_' })
        .collect();
    if !sanitized.chars().next().is_some_and(is_name_start) {
        sanitized.insert(0, '_');
    }
    sanitized
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Encode the value as an indented XML document with a declaration
pub fn encode(value: &Value, config: &ConversionConfig) -> ConversionResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', config.xml_indent as usize);
    write_document(&mut writer, value, &config.xml_root_name)
        .map_err(|e| ConversionError::encode(OutputFormat::Xml, e))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn write_document(
    writer: &mut Writer<Vec<u8>>,
    value: &Value,
    root_name: &str,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    match value {
        Value::Mapping(map) if map.len() == 1 => match map.iter().next() {
            Some((key, inner)) if !matches!(inner, Value::Sequence(_)) && key != TEXT_KEY => {
                write_element(writer, &sanitize_name(key), inner)
            }
            _ => write_element(writer, &sanitize_name(root_name), value),
        },
        _ => write_element(writer, &sanitize_name(root_name), value),
    }
}

/// Write a mapping entry; sequences repeat the tag once per item
fn write_field(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> quick_xml::Result<()> {
    match value {
        Value::Sequence(items) if !items.is_empty() => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        _ => write_element(writer, name, value),
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> quick_xml::Result<()> {
    match value {
        Value::Null => writer.write_event(Event::Empty(BytesStart::new(name))),
        Value::Sequence(items) if items.is_empty() => {
            writer.write_event(Event::Empty(BytesStart::new(name)))
        }
        Value::Mapping(map) if map.is_empty() => {
            writer.write_event(Event::Empty(BytesStart::new(name)))
        }
        Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(&value.to_cell_text())))?;
            writer.write_event(Event::End(BytesEnd::new(name)))
        }
        Value::Sequence(items) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            for item in items {
                write_element(writer, ITEM_TAG, item)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))
        }
        Value::Mapping(map) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            for (key, child) in map {
                if key == TEXT_KEY && child.is_scalar() {
                    writer.write_event(Event::Text(BytesText::new(&child.to_cell_text())))?;
                } else {
                    write_field(writer, &sanitize_name(key), child)?;
                }
            }
            writer.write_event(Event::End(BytesEnd::new(name)))
        }
    }
}
