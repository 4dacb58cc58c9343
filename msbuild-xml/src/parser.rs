use std::fs;
use std::path::Path;

use quick_xml::events::{BytesDecl, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use thiserror::Error;

use crate::tree::{Declaration, XmlDocument, XmlNode};

pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Errors that can occur while parsing XML into an [`XmlDocument`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input XML could not be decoded or tokenized.
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Input bytes were not valid UTF-8 for tag/attribute/text extraction.
    #[error("invalid UTF-8 while parsing XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Failed to read input file.
    #[error("failed to read XML file: {0}")]
    Io(#[from] std::io::Error),
    /// Structural issue in XML document.
    #[error("malformed XML: {0}")]
    Malformed(String),
}

/// Parse XML bytes into an [`XmlDocument`].
///
/// Comments are kept on the element they precede (or as trailing comments
/// of their parent). Whitespace-only text and processing instructions are
/// dropped; the byte-order mark, declaration, line-ending style and final
/// line break are recorded on the document.
pub fn parse(xml: &[u8]) -> Result<XmlDocument, ParseError> {
    let (bom, body) = match xml.strip_prefix(UTF8_BOM) {
        Some(rest) => (true, rest),
        None => (false, xml),
    };
    let crlf = body.windows(2).any(|pair| pair == b"\r\n");
    let trailing_newline = body.ends_with(b"\n");

    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;
    let mut declaration = None;
    let mut comments: Vec<String> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let mut node = build_node_start(&e, &reader)?;
                node.comments_before = std::mem::take(&mut comments);
                stack.push(node);
            }
            Event::Empty(e) => {
                let mut node = build_node_start(&e, &reader)?;
                node.comments_before = std::mem::take(&mut comments);
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = e.unescape()?.into_owned();
                    append_text(current, text);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = std::str::from_utf8(e.as_ref())?.to_string();
                    append_text(current, text);
                }
            }
            Event::End(_) => {
                let mut node = stack.pop().ok_or_else(|| {
                    ParseError::Malformed("encountered closing tag without open tag".to_string())
                })?;
                node.trailing_comments = std::mem::take(&mut comments);
                attach(&mut stack, &mut root, node)?;
            }
            Event::Comment(e) => {
                // Comments after the root element have nowhere to go.
                if root.is_none() {
                    comments.push(std::str::from_utf8(&e)?.to_string());
                }
            }
            Event::Decl(e) => declaration = Some(read_declaration(&e)?),
            Event::Eof => break,
            Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ParseError::Malformed(
            "unclosed element(s) at end of document".to_string(),
        ));
    }

    let root = root.ok_or_else(|| ParseError::Malformed("no root element found".to_string()))?;
    Ok(XmlDocument {
        bom,
        crlf,
        trailing_newline,
        declaration,
        root,
    })
}

/// Parse an XML file into an [`XmlDocument`].
pub fn parse_file(path: &Path) -> Result<XmlDocument, ParseError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_none() {
        *root = Some(node);
    } else {
        return Err(ParseError::Malformed(
            "multiple top-level elements found".to_string(),
        ));
    }
    Ok(())
}

// Text after a child element is appended to the text before it, so mixed
// content comes back with all text ahead of the children.
fn append_text(node: &mut XmlNode, text: String) {
    if text.trim().is_empty() {
        return;
    }
    match &mut node.text {
        Some(existing) => existing.push_str(&text),
        None => node.text = Some(text),
    }
}

fn read_declaration(e: &BytesDecl<'_>) -> Result<Declaration, ParseError> {
    let version = std::str::from_utf8(&e.version()?)?.to_string();
    let encoding = match e.encoding() {
        Some(value) => Some(
            std::str::from_utf8(&value.map_err(quick_xml::Error::from)?)?.to_string(),
        ),
        None => None,
    };
    let standalone = match e.standalone() {
        Some(value) => Some(
            std::str::from_utf8(&value.map_err(quick_xml::Error::from)?)?.to_string(),
        ),
        None => None,
    };
    Ok(Declaration {
        version,
        encoding,
        standalone,
    })
}

fn build_node_start(
    e: &quick_xml::events::BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> Result<XmlNode, ParseError> {
    let tag = qname_to_string(e.name())?;
    let mut node = XmlNode::new(tag);

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = qname_to_string(attr.key)?;
        let value = attr
            .decode_and_unescape_value(reader.decoder())?
            .into_owned();
        node.attributes.push((key, value));
    }

    Ok(node)
}

fn qname_to_string(name: QName<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(name.as_ref())?.to_string())
}
