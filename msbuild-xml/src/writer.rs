use std::fs;
use std::path::Path;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::parser::UTF8_BOM;
use crate::tree::{XmlDocument, XmlNode};

/// Errors that can occur while writing XML from an [`XmlDocument`].
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize XML bytes.
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Failed to write output file.
    #[error("failed to write XML file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize an [`XmlDocument`] into XML bytes.
///
/// Elements and comments are indented by two spaces. The byte-order mark,
/// declaration, CRLF line endings and final line break are reproduced when
/// the document carries them.
pub fn write(doc: &XmlDocument) -> Result<Vec<u8>, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    if let Some(decl) = &doc.declaration {
        writer.write_event(Event::Decl(BytesDecl::new(
            &decl.version,
            decl.encoding.as_deref(),
            decl.standalone.as_deref(),
        )))?;
    }
    write_node(&mut writer, &doc.root)?;

    let mut body = writer.into_inner();
    if doc.trailing_newline {
        body.push(b'\n');
    }
    if doc.crlf {
        body = to_crlf(&body);
    }

    let mut out = Vec::with_capacity(body.len() + UTF8_BOM.len());
    if doc.bom {
        out.extend_from_slice(UTF8_BOM);
    }
    out.extend_from_slice(&body);
    Ok(out)
}

/// Serialize an [`XmlDocument`] and write it to `path`.
pub fn write_file(doc: &XmlDocument, path: &Path) -> Result<(), WriteError> {
    let bytes = write(doc)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), quick_xml::Error> {
    write_comments(writer, &node.comments_before)?;
    let mut content = start_content(node);

    if node.children.is_empty() && node.text.is_none() && node.trailing_comments.is_empty() {
        // Visual Studio writes `<Item />`, keep the space before the slash.
        content.push(' ');
        writer.write_event(Event::Empty(BytesStart::from_content(content, node.tag.len())))?;
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::from_content(content, node.tag.len())))?;

    if let Some(text) = &node.text {
        writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    }

    for child in &node.children {
        write_node(writer, child)?;
    }
    write_comments(writer, &node.trailing_comments)?;

    writer.write_event(Event::End(BytesEnd::new(node.tag.as_str())))?;
    Ok(())
}

fn write_comments(writer: &mut Writer<Vec<u8>>, comments: &[String]) -> Result<(), quick_xml::Error> {
    for comment in comments {
        writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;
    }
    Ok(())
}

fn start_content(node: &XmlNode) -> String {
    let mut content = node.tag.clone();
    for (key, value) in &node.attributes {
        content.push(' ');
        content.push_str(key);
        content.push_str("=\"");
        content.push_str(&escape_attribute(value));
        content.push('"');
    }
    content
}

// MSBuild conditions are full of single quotes; only what must be escaped is.
fn escape_attribute(value: &str) -> String {
    partial_escape(value).replace('"', "&quot;")
}

fn to_crlf(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + bytes.len() / 16);
    let mut previous = 0u8;
    for &byte in bytes {
        if byte == b'\n' && previous != b'\r' {
            out.push(b'\r');
        }
        out.push(byte);
        previous = byte;
    }
    out
}
