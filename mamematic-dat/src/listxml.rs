//! Reader for the emulator's `-listxml` machine catalog.
//!
//! The catalog is streamed through quick-xml. Only `machine` subtrees are
//! kept, each as a small owned [`XmlElement`] tree; everything else is checked
//! for well-formedness and dropped.

use std::io::BufRead;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::DatError;

/// Tag of the catalog elements we collect.
pub const MACHINE_TAG: &str = "machine";

/// An owned XML element: tag, attributes in document order, direct text and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Concatenated text directly inside this element (not its children).
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Value of the first attribute called `key`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children called `name`.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Every element below this one, depth-first in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }
}

/// Depth-first iterator over an element's descendants. See [`XmlElement::descendants`].
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, XmlElement>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(element) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// A parsed machine catalog document.
#[derive(Debug, Clone)]
pub struct ListXml {
    root: XmlElement,
    machines: Vec<XmlElement>,
}

impl ListXml {
    /// Parse a catalog document from any buffered reader.
    ///
    /// Fails with [`DatError::NotXml`] (or a quick-xml error) unless the
    /// stream is a single well-formed XML document.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, DatError> {
        let mut xml = Reader::from_reader(reader);
        let mut tree = TreeBuilder::default();
        let mut buf = Vec::new();

        loop {
            match xml.read_event_into(&mut buf)? {
                Event::Start(ref e) => tree.open(element_from_start(e)?)?,
                Event::Empty(ref e) => {
                    tree.open(element_from_start(e)?)?;
                    tree.close();
                }
                Event::End(_) => tree.close(),
                Event::Text(ref e) => tree.text(&e.unescape()?)?,
                Event::CData(e) => tree.text(&String::from_utf8_lossy(&e.into_inner()))?,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        tree.finish()
    }

    /// Parse a catalog document from a file.
    pub fn from_file(path: &Path) -> Result<Self, DatError> {
        let file = std::fs::File::open(path)?;
        Self::parse(std::io::BufReader::new(file))
    }

    /// The document's root element, without children (e.g. `<mame build="...">`).
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Every `machine` element in the document, at any depth, in document order.
    pub fn machines(&self) -> impl Iterator<Item = &XmlElement> {
        self.machines.iter().flat_map(|machine| {
            std::iter::once(machine)
                .chain(machine.descendants().filter(|e| e.name == MACHINE_TAG))
        })
    }
}

/// Incremental state while streaming events.
#[derive(Default)]
struct TreeBuilder {
    root: Option<XmlElement>,
    /// Open element count, whether or not the element is being kept.
    depth: usize,
    /// Currently open elements of a machine subtree, outermost first.
    open: Vec<XmlElement>,
    machines: Vec<XmlElement>,
}

impl TreeBuilder {
    fn open(&mut self, element: XmlElement) -> Result<(), DatError> {
        if self.depth == 0 {
            if self.root.is_some() {
                return Err(DatError::not_xml(format!(
                    "second root element <{}>",
                    element.name
                )));
            }
            self.root = Some(XmlElement {
                name: element.name.clone(),
                attributes: element.attributes.clone(),
                ..Default::default()
            });
        }
        self.depth += 1;
        if !self.open.is_empty() || element.name == MACHINE_TAG {
            self.open.push(element);
        }
        Ok(())
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if let Some(done) = self.open.pop() {
            match self.open.last_mut() {
                Some(parent) => parent.children.push(done),
                None => self.machines.push(done),
            }
        }
    }

    fn text(&mut self, text: &str) -> Result<(), DatError> {
        match self.open.last_mut() {
            Some(element) => element.text.push_str(text),
            None if self.depth == 0 && !text.trim().is_empty() => {
                return Err(DatError::not_xml("text outside the root element"));
            }
            None => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<ListXml, DatError> {
        if self.depth != 0 {
            return Err(DatError::not_xml("document ended inside an element"));
        }
        let root = self
            .root
            .ok_or_else(|| DatError::not_xml("no root element"))?;
        Ok(ListXml {
            root,
            machines: self.machines,
        })
    }
}

fn element_from_start(e: &BytesStart<'_>) -> Result<XmlElement, DatError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<!DOCTYPE mame [
<!ELEMENT mame (machine+)>
<!ATTLIST mame build CDATA #IMPLIED>
]>
<mame build="0.261 (mame0261)">
    <machine name="pacman" sourcefile="pacman/pacman.cpp">
        <description>Pac-Man (Midway)</description>
        <year>1980</year>
        <manufacturer>Namco (Midway license)</manufacturer>
        <driver status="good" emulation="good" savestate="supported"/>
    </machine>
    <machine name="mspacman" cloneof="pacman" romof="pacman">
        <description>Ms. Pac-Man &amp; Friends</description>
    </machine>
</mame>"#;

    #[test]
    fn test_parse_machines() {
        let doc = ListXml::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(doc.root().name, "mame");
        assert_eq!(doc.root().attr("build"), Some("0.261 (mame0261)"));
        assert!(doc.root().children.is_empty());

        let machines: Vec<_> = doc.machines().collect();
        assert_eq!(machines.len(), 2);
        assert_eq!(machines[0].attr("name"), Some("pacman"));
        assert_eq!(
            machines[0].child("manufacturer").map(|e| e.text.as_str()),
            Some("Namco (Midway license)")
        );
        assert_eq!(
            machines[0].child("driver").and_then(|d| d.attr("status")),
            Some("good")
        );
        assert_eq!(
            machines[1].child("description").map(|e| e.text.as_str()),
            Some("Ms. Pac-Man & Friends")
        );
    }

    #[test]
    fn test_machines_found_at_any_depth() {
        let xml = r#"<root>
            <group><machine name="a"/></group>
            <machine name="b"><machine name="c"/></machine>
        </root>"#;
        let doc = ListXml::parse(xml.as_bytes()).unwrap();
        let names: Vec<_> = doc.machines().filter_map(|m| m.attr("name")).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_root_machine() {
        let doc = ListXml::parse(r#"<machine name="solo"/>"#.as_bytes()).unwrap();
        assert_eq!(doc.machines().count(), 1);
    }

    #[test]
    fn test_empty_child_has_empty_text() {
        let xml = r#"<mame><machine name="x"><year/><description></description></machine></mame>"#;
        let doc = ListXml::parse(xml.as_bytes()).unwrap();
        let m = doc.machines().next().unwrap();
        assert_eq!(m.child("year").unwrap().text, "");
        assert_eq!(m.child("description").unwrap().text, "");
    }

    #[test]
    fn test_cdata_text() {
        let xml = r#"<mame><machine name="x"><description><![CDATA[A <b> C]]></description></machine></mame>"#;
        let doc = ListXml::parse(xml.as_bytes()).unwrap();
        let m = doc.machines().next().unwrap();
        assert_eq!(m.child("description").unwrap().text, "A <b> C");
    }

    #[test]
    fn test_rejects_non_xml() {
        let err = ListXml::parse("#!/bin/sh\necho hello\n".as_bytes()).unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[test]
    fn test_rejects_empty_input() {
        let err = ListXml::parse("".as_bytes()).unwrap_err();
        assert!(matches!(err, DatError::NotXml(_)));
    }

    #[test]
    fn test_rejects_unclosed_root() {
        let err = ListXml::parse(r#"<mame><machine name="a"/>"#.as_bytes()).unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[test]
    fn test_rejects_mismatched_end() {
        let err = ListXml::parse("<mame><machine></mame>".as_bytes()).unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[test]
    fn test_rejects_two_roots() {
        let err = ListXml::parse("<a/><b/>".as_bytes()).unwrap_err();
        assert!(matches!(err, DatError::NotXml(_)));
    }

    #[test]
    fn test_descendants_order() {
        let tree = XmlElement::new("a")
            .with_child(XmlElement::new("b").with_child(XmlElement::new("c")))
            .with_child(XmlElement::new("d"));
        let names: Vec<_> = tree.descendants().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_children_named() {
        let input = XmlElement::new("input")
            .with_child(XmlElement::new("control").with_attr("type", "joy"))
            .with_child(XmlElement::new("other"))
            .with_child(XmlElement::new("control").with_attr("type", "dial"));
        let types: Vec<_> = input
            .children_named("control")
            .filter_map(|c| c.attr("type"))
            .collect();
        assert_eq!(types, vec!["joy", "dial"]);
    }
}
