//! XML decoder
//!
//! Mapping rules:
//! - the single root element becomes a one-entry mapping `{root: content}`
//! - an element without attributes or children becomes its trimmed text
//! - otherwise it becomes a mapping: attributes first, then child elements,
//!   both in document order; a repeated name (attribute or child) collects
//!   into a sequence
//! - non-whitespace text next to attributes or children lands under `#text`

use crate::error::{ParseError, ParseResult};
use crate::format::InputFormat;
use crate::model::{Mapping, Value};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Key used for text content of elements that also carry structure
pub const TEXT_KEY: &str = "#text";

/// An element that has been opened but not yet closed
struct OpenElement {
    name: String,
    fields: Mapping,
    text: String,
}

impl OpenElement {
    fn from_start(start: &BytesStart<'_>, content: &str, offset: usize) -> ParseResult<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut fields = Mapping::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| error(e.to_string(), content, offset))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| error(e.to_string(), content, offset))?;
            insert_merged(&mut fields, key, Value::String(value.into_owned()));
        }
        Ok(Self {
            name,
            fields,
            text: String::new(),
        })
    }

    fn into_value(self) -> (String, Value) {
        let text = self.text.trim();
        if self.fields.is_empty() {
            return (self.name, Value::String(text.to_string()));
        }
        let mut fields = self.fields;
        if !text.is_empty() {
            insert_merged(&mut fields, TEXT_KEY.to_string(), Value::String(text.to_string()));
        }
        (self.name, Value::Mapping(fields))
    }
}

/// Insert `value` under `key`, turning repeated keys into a sequence.
///
/// Element and attribute values are never sequences themselves, so an
/// existing sequence always means an earlier merge.
fn insert_merged(map: &mut Mapping, key: String, value: Value) {
    match map.get_mut(&key) {
        None => {
            map.insert(key, value);
        }
        Some(Value::Sequence(items)) => items.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, Value::Null);
            *existing = Value::Sequence(vec![first, value]);
        }
    }
}

fn error(message: String, content: &str, offset: usize) -> ParseError {
    ParseError::new(InputFormat::Xml, message, None).with_offset(content, offset)
}

/// Parse XML text into the canonical model
pub fn decode(content: &str, max_depth: Option<usize>) -> ParseResult<Value> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let offset = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| error(e.to_string(), content, offset))?;

        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(error("multiple root elements".to_string(), content, offset));
                }
                check_depth(stack.len(), max_depth, content, offset)?;
                stack.push(OpenElement::from_start(&start, content, offset)?);
            }
            Event::Empty(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(error("multiple root elements".to_string(), content, offset));
                }
                check_depth(stack.len(), max_depth, content, offset)?;
                let element = OpenElement::from_start(&start, content, offset)?;
                close(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    error("closing tag without opening tag".to_string(), content, offset)
                })?;
                close(element, &mut stack, &mut root);
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| error(e.to_string(), content, offset))?;
                push_text(&mut stack, &text, content, offset)?;
            }
            Event::CData(data) => {
                let data = data.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&data), content, offset)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes carry no data
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(error(
            format!("unclosed element <{}>", open.name),
            content,
            content.len(),
        ));
    }

    let (name, value) =
        root.ok_or_else(|| ParseError::new(InputFormat::Xml, "no root element".to_string(), None))?;
    let mut document = Mapping::new();
    document.insert(name, value);
    Ok(Value::Mapping(document))
}

/// Reject an element that would open below `limit` levels
fn check_depth(open: usize, limit: Option<usize>, content: &str, offset: usize) -> ParseResult<()> {
    match limit {
        Some(limit) if open >= limit => Err(error(
            format!("elements nested deeper than {} levels", limit),
            content,
            offset,
        )),
        _ => Ok(()),
    }
}

fn close(element: OpenElement, stack: &mut [OpenElement], root: &mut Option<(String, Value)>) {
    let (name, value) = element.into_value();
    match stack.last_mut() {
        Some(parent) => insert_merged(&mut parent.fields, name, value),
        None => *root = Some((name, value)),
    }
}

fn push_text(stack: &mut [OpenElement], text: &str, content: &str, offset: usize) -> ParseResult<()> {
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(error("text outside the root element".to_string(), content, offset)),
    }
}
