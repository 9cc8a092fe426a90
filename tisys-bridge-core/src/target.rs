//! Target document tree and its pretty-printed XML rendering.

use std::io;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::MapError;

/// An element of the import document. Children render in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: &'static str,
    pub matchmode: Option<u8>,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Children(Vec<Element>),
}

impl Element {
    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            matchmode: None,
            content: Content::Text(value.into()),
        }
    }

    pub fn matched(name: &'static str, matchmode: u8, value: impl Into<String>) -> Self {
        Self {
            name,
            matchmode: Some(matchmode),
            content: Content::Text(value.into()),
        }
    }

    pub fn group(name: &'static str, children: Vec<Element>) -> Self {
        Self {
            name,
            matchmode: None,
            content: Content::Children(children),
        }
    }

    /// Follows child names from this element; the first child with each name is taken.
    pub fn find(&self, path: &[&str]) -> Option<&Element> {
        let mut current = self;
        for name in path {
            let Content::Children(children) = &current.content else {
                return None;
            };
            current = children.iter().find(|c| c.name == *name)?;
        }
        Some(current)
    }

    pub fn value(&self) -> Option<&str> {
        match &self.content {
            Content::Text(t) => Some(t),
            Content::Children(_) => None,
        }
    }
}

/// Renders `root` with an XML declaration and two-space indentation.
pub fn render(root: &Element) -> Result<String, MapError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes)
        .map_err(|e| MapError::Serialize(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> io::Result<()> {
    let mut start = BytesStart::new(element.name);
    if let Some(mode) = element.matchmode {
        start.push_attribute(("matchmode", mode.to_string().as_str()));
    }

    match &element.content {
        Content::Text(text) if text.is_empty() => writer.write_event(Event::Empty(start)),
        Content::Text(text) => {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
            writer.write_event(Event::End(BytesEnd::new(element.name)))
        }
        Content::Children(children) => {
            writer.write_event(Event::Start(start))?;
            for child in children {
                write_element(writer, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(element.name)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_elements_with_attributes_and_escaping() {
        let root = Element::group(
            "import",
            vec![
                Element::matched("company_id", 0, "1"),
                Element::group("cargo", vec![Element::text("weight", "a<b & c")]),
                Element::text("empty", ""),
            ],
        );
        let xml = render(&root).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\"?>"));
        assert!(xml.contains("<company_id matchmode=\"0\">1</company_id>"));
        assert!(xml.contains("<weight>a&lt;b &amp; c</weight>"));
        assert!(xml.contains("<empty/>"));
        assert!(xml.contains("\n  <cargo>\n    <weight>"));
    }

    #[test]
    fn find_walks_child_names() {
        let root = Element::group(
            "a",
            vec![Element::group("b", vec![Element::text("c", "x")])],
        );
        assert_eq!(root.find(&["b", "c"]).and_then(Element::value), Some("x"));
        assert!(root.find(&["b", "missing"]).is_none());
        assert!(root.find(&["b", "c", "deeper"]).is_none());
    }
}
