//! Owned XML document tree.
//!
//! The tree is built from `quick-xml` pull events and owns all of its data, so a
//! parsed response can outlive the buffer it came from. Only what a caller needs
//! to walk a data-service reply is kept: element names, attributes, child
//! elements and text. Comments, processing instructions and the XML declaration
//! are dropped, as are text nodes made only of whitespace.

use std::io::BufRead;
use std::str;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::XmlError;

/// A parsed XML document with exactly one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Document {
    pub fn parse_str(xml: &str) -> Result<Self, XmlError> {
        Self::from_reader(xml.as_bytes())
    }

    pub fn parse_bytes(xml: &[u8]) -> Result<Self, XmlError> {
        Self::from_reader(xml)
    }

    /// Parses a whole document from a buffered reader.
    pub fn from_reader<R: BufRead>(input: R) -> Result<Self, XmlError> {
        let mut reader = Reader::from_reader(input);
        let mut buf = Vec::new();
        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => open.push(Element::from_start(&e)?),
                Event::Empty(e) => {
                    let element = Element::from_start(&e)?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::End(e) => {
                    let Some(element) = open.pop() else {
                        let qname = e.name();
                        let name = str::from_utf8(qname.as_ref())?;
                        return Err(XmlError::UnexpectedEnd(name.to_string()));
                    };
                    attach(&mut open, &mut root, element)?;
                }
                Event::Text(e) => {
                    let text = e.unescape()?;
                    push_text(&mut open, &text);
                }
                Event::CData(e) => {
                    let text = str::from_utf8(&e)?;
                    push_text(&mut open, text);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(element) = open.pop() {
            return Err(XmlError::Unclosed(element.name));
        }
        root.map(|root| Document { root }).ok_or(XmlError::NoRoot)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    /// All elements named `name` in document order, the root included.
    /// `"*"` matches every element.
    pub fn elements_by_tag_name(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        if matches_name(&self.root, name) {
            found.push(&self.root);
        }
        self.root.collect_descendants(name, &mut found);
        found
    }
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = str::from_utf8(start.name().as_ref())?.to_string();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Qualified tag name, prefix included.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// First direct child element named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|element| element.name == name)
    }

    /// Descendant elements named `name` in document order, excluding `self`.
    pub fn elements_by_tag_name(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    /// Concatenated text of this element and all of its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if matches_name(child, name) {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }
}

fn matches_name(element: &Element, name: &str) -> bool {
    name == "*" || element.name == name
}

fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::MultipleRoots);
    }
    *root = Some(element);
    Ok(())
}

fn push_text(open: &mut [Element], text: &str) {
    if text.trim().is_empty() {
        return;
    }
    // Text outside the root element carries no content worth keeping.
    if let Some(parent) = open.last_mut() {
        parent.children.push(Node::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLICAS: &str = r#"<?xml version='1.0' encoding='ISO-8859-1'?>
<phedex request_timestamp="1300000000.5" instance="prod" request_call="FileReplicas">
  <!-- two files, one replica each -->
  <block name="/Prim/Proc/RECO#b1" files="2" bytes="300" is_open="n">
    <file name="/store/data/a.root" bytes="100" checksum="cksum:12,adler32:024d0127">
      <replica node="T1_US_FNAL" se="cmssrm.fnal.gov" custodial="y" group="R&amp;D"/>
    </file>
    <file name="/store/data/b.root" bytes="200" checksum="cksum:34,adler32:00000001">
      <replica node="T2_CH_CERN" se="srm-eoscms.cern.ch" custodial="n"/>
    </file>
  </block>
</phedex>
"#;

    #[test]
    fn parses_replica_listing() {
        let doc = Document::parse_str(REPLICAS).unwrap();
        let root = doc.root();
        assert_eq!(root.name(), "phedex");
        assert_eq!(root.attribute("request_call"), Some("FileReplicas"));

        let files = doc.elements_by_tag_name("file");
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].attribute("name"), Some("/store/data/a.root"));
        assert_eq!(files[1].attribute("bytes"), Some("200"));

        let replica = files[0].child("replica").unwrap();
        assert_eq!(replica.attribute("node"), Some("T1_US_FNAL"));
        assert_eq!(replica.attribute("group"), Some("R&D"));
        assert_eq!(replica.attribute("missing"), None);
    }

    #[test]
    fn wildcard_matches_every_element_in_document_order() {
        let doc = Document::parse_str(REPLICAS).unwrap();
        let names: Vec<&str> = doc
            .elements_by_tag_name("*")
            .iter()
            .map(|e| e.name())
            .collect();
        assert_eq!(
            names,
            ["phedex", "block", "file", "replica", "file", "replica"]
        );
        // Element-level lookup excludes the element itself.
        assert_eq!(doc.root().elements_by_tag_name("phedex").len(), 0);
    }

    #[test]
    fn whitespace_is_dropped_and_text_is_unescaped() {
        let doc = Document::parse_str("<a>\n  <b>x &lt; y</b>\n  <c><![CDATA[<raw>]]></c>\n</a>")
            .unwrap();
        let root = doc.root();
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.child("b").unwrap().text(), "x < y");
        assert_eq!(root.child("c").unwrap().text(), "<raw>");
        assert_eq!(root.text(), "x < y<raw>");
    }

    #[test]
    fn attributes_keep_source_order() {
        let doc = Document::parse_str(r#"<r z="1" a="2"/>"#).unwrap();
        let attrs: Vec<_> = doc.root().attributes().collect();
        assert_eq!(attrs, [("z", "1"), ("a", "2")]);
    }

    #[test]
    fn empty_input_has_no_root() {
        assert!(matches!(Document::parse_str(""), Err(XmlError::NoRoot)));
        assert!(matches!(
            Document::parse_str("<?xml version='1.0'?>\n"),
            Err(XmlError::NoRoot)
        ));
    }

    #[test]
    fn rejects_second_root() {
        assert!(matches!(
            Document::parse_str("<a/><b/>"),
            Err(XmlError::MultipleRoots)
        ));
    }

    #[test]
    fn rejects_unclosed_element() {
        match Document::parse_str("<phedex><block>") {
            Err(XmlError::Unclosed(name)) => assert_eq!(name, "block"),
            other => panic!("expected unclosed error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_stray_closing_tag() {
        assert!(Document::parse_str("</phedex>").is_err());
        assert!(Document::parse_str("<a/></b>").is_err());
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(Document::parse_str("<a><b></a></b>").is_err());
    }

    #[test]
    fn plain_html_error_page_is_not_a_document() {
        assert!(Document::parse_str("Service Unavailable").is_err());
    }
}
