//! XML parsing and writing helpers.

use std::io;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::{Document, ParsingOptions};

/// Parse an XML document.
///
/// S1000D modules routinely carry a DOCTYPE with ICN entity declarations,
/// so DTDs are accepted.
pub fn parse(text: &str) -> Result<Document<'_>, roxmltree::Error> {
    let opts = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, opts)
}

/// Indented XML writer over an in-memory buffer.
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Start a document with an XML declaration.
    pub fn new() -> io::Result<Self> {
        let mut inner = Writer::new_with_indent(Vec::new(), b' ', 2);
        inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(io::Error::other)?;
        Ok(XmlWriter { inner })
    }

    fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
        let mut start = BytesStart::new(name);
        for &attr in attrs {
            start.push_attribute(attr);
        }
        start
    }

    /// Open an element.
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.inner
            .write_event(Event::Start(Self::element(name, attrs)))
            .map_err(io::Error::other)
    }

    /// Close an element.
    pub fn end(&mut self, name: &str) -> io::Result<()> {
        self.inner
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(io::Error::other)
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.inner
            .write_event(Event::Empty(Self::element(name, attrs)))
            .map_err(io::Error::other)
    }

    /// Write escaped character data.
    pub fn text(&mut self, text: &str) -> io::Result<()> {
        self.inner
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(io::Error::other)
    }

    /// Write `<name>text</name>`.
    pub fn text_element(&mut self, name: &str, text: &str) -> io::Result<()> {
        self.start(name, &[])?;
        self.text(text)?;
        self.end(name)
    }

    /// Finish the document.
    pub fn finish(self) -> String {
        let mut text = String::from_utf8_lossy(&self.inner.into_inner()).into_owned();
        text.push('\n');
        text
    }
}
