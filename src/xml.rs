//! XML payload to nested record tree conversion.
//!
//! Produces the same shape schema-less XML-to-dict converters do:
//! - an element becomes a key in its parent object
//! - text-only elements become strings, empty elements become `null`
//! - attributes become `@name` keys, text next to child elements becomes `#text`
//! - a repeated sibling element becomes an array; a single occurrence stays bare
//!
//! The last rule is why every consumer walks the tree through [`crate::nested::force_list`].

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::error::Error;

struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

/// Parse an XML document into a nested [`Value`] keyed by the root element name.
pub fn parse_xml(xml: &str) -> Result<Value, Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root = Map::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(Error::Parse(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
        };

        match event {
            Event::Start(start) => stack.push(open_frame(&start)?),
            Event::Empty(start) => {
                let frame = open_frame(&start)?;
                close_frame(frame, &mut stack, &mut root);
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::Parse(format!("invalid XML text: {e}")))?;
                    frame.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| Error::Parse("unbalanced closing tag in XML".to_string()))?;
                close_frame(frame, &mut stack, &mut root);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(frame) = stack.last() {
        return Err(Error::Parse(format!(
            "unexpected end of XML inside <{}>",
            frame.name
        )));
    }
    if root.is_empty() {
        return Err(Error::Parse("XML document has no root element".to_string()));
    }

    Ok(Value::Object(root))
}

fn open_frame(start: &BytesStart<'_>) -> Result<Frame, Error> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| Error::Parse(format!("non UTF-8 element name: {e}")))?
        .to_string();

    let mut children = Map::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Parse(format!("invalid attribute on <{name}>: {e}")))?;
        let key = String::from_utf8_lossy(attr.key.as_ref());
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Parse(format!("invalid attribute value on <{name}>: {e}")))?;
        children.insert(format!("@{key}"), Value::String(value.into_owned()));
    }

    Ok(Frame {
        name,
        children,
        text: String::new(),
    })
}

fn close_frame(frame: Frame, stack: &mut [Frame], root: &mut Map<String, Value>) {
    let Frame {
        name,
        mut children,
        text,
    } = frame;

    let value = if children.is_empty() {
        if text.is_empty() {
            Value::Null
        } else {
            Value::String(text)
        }
    } else {
        if !text.is_empty() {
            children.insert("#text".to_string(), Value::String(text));
        }
        Value::Object(children)
    };

    let parent = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => root,
    };
    insert_child(parent, name, value);
}

/// Insert `value` under `key`, promoting to an array on the second occurrence.
fn insert_child(map: &mut Map<String, Value>, key: String, value: Value) {
    match map.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Value::Array(items) => items.push(value),
            existing => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        },
    }
}
