use crate::domain::model::Projection;
use crate::domain::ports::Serializer;
use crate::utils::error::{BookingError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};
use std::fmt::Display;

const ROOT_TAG: &str = "data";
const ITEM_TAG: &str = "item";

/// Snapshot as an XML tree.
///
/// Layout: `<data>` holds one element per entity, tagged with the entity kind.
/// Nested objects become child elements and scalars become text leaves. Arrays
/// become a wrapper element with one `<item>` child per entry. On decode an
/// element whose children are all `<item>` is read back as an array, and every
/// leaf is read back as a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSerializer;

fn xml_error(e: impl Display) -> BookingError {
    BookingError::serialization(format!("XML error: {}", e))
}

type XmlWriter = Writer<Vec<u8>>;

fn write_element(writer: &mut XmlWriter, tag: &str, value: &Value) -> Result<()> {
    let text = match value {
        Value::Object(map) if !map.is_empty() => {
            writer
                .write_event(Event::Start(BytesStart::new(tag)))
                .map_err(xml_error)?;
            for (key, child) in map {
                write_element(writer, key, child)?;
            }
            return writer
                .write_event(Event::End(BytesEnd::new(tag)))
                .map_err(xml_error);
        }
        Value::Array(items) if !items.is_empty() => {
            writer
                .write_event(Event::Start(BytesStart::new(tag)))
                .map_err(xml_error)?;
            for item in items {
                write_element(writer, ITEM_TAG, item)?;
            }
            return writer
                .write_event(Event::End(BytesEnd::new(tag)))
                .map_err(xml_error);
        }
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Object(_) | Value::Array(_) => String::new(),
    };

    if text.is_empty() {
        return writer
            .write_event(Event::Empty(BytesStart::new(tag)))
            .map_err(xml_error);
    }

    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(&text)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(xml_error)
}

#[derive(Debug, Default)]
struct Node {
    tag: String,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn named(raw: &[u8]) -> Self {
        Self {
            tag: String::from_utf8_lossy(raw).into_owned(),
            ..Self::default()
        }
    }

    fn into_object(self) -> Map<String, Value> {
        self.children
            .into_iter()
            .map(|child| (child.tag.clone(), child.into_value()))
            .collect()
    }

    fn into_value(self) -> Value {
        if self.children.is_empty() {
            return Value::String(self.text);
        }
        if self.children.iter().all(|c| c.tag == ITEM_TAG) {
            return Value::Array(self.children.into_iter().map(Node::into_value).collect());
        }
        Value::Object(self.into_object())
    }
}

fn parse_tree(content: &str) -> Result<Node> {
    // Leaf text is kept verbatim; indentation only lands on elements with children.
    let mut reader = Reader::from_str(content);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    let mut attach = |node: Node, stack: &mut Vec<Node>| -> Result<()> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None if root.is_none() => root = Some(node),
            None => return Err(xml_error("more than one root element")),
        }
        Ok(())
    };

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => stack.push(Node::named(e.name().as_ref())),
            Event::Empty(e) => attach(Node::named(e.name().as_ref()), &mut stack)?,
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| xml_error("unexpected closing tag"))?;
                attach(node, &mut stack)?;
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(xml_error)?;
                match stack.last_mut() {
                    Some(node) => node.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(xml_error("text outside of the root element")),
                }
            }
            Event::CData(c) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(xml_error(format!("unclosed element <{}>", open.tag)));
    }
    root.ok_or_else(|| xml_error("document has no root element"))
}

impl Serializer for XmlSerializer {
    fn format(&self) -> &'static str {
        "xml"
    }

    fn encode<T: Projection>(&self, data: &[T]) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;

        if data.is_empty() {
            writer
                .write_event(Event::Empty(BytesStart::new(ROOT_TAG)))
                .map_err(xml_error)?;
        } else {
            writer
                .write_event(Event::Start(BytesStart::new(ROOT_TAG)))
                .map_err(xml_error)?;
            for entity in data {
                let projection = entity.project()?;
                if !projection.is_object() {
                    return Err(BookingError::serialization(format!(
                        "{} projection is not a mapping",
                        entity.kind()
                    )));
                }
                write_element(&mut writer, entity.kind(), &projection)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(ROOT_TAG)))
                .map_err(xml_error)?;
        }

        let mut xml = String::from_utf8(writer.into_inner()).map_err(xml_error)?;
        xml.push('\n');
        Ok(xml)
    }

    fn decode(&self, content: &str) -> Result<Vec<Value>> {
        let root = parse_tree(content)?;
        Ok(root
            .children
            .into_iter()
            .map(|entity| Value::Object(entity.into_object()))
            .collect())
    }
}
