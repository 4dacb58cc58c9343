/// A generic XML tree node.
///
/// Attributes keep their document order so that a rewritten file lists them
/// exactly where the original did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    /// Element tag name.
    pub tag: String,
    /// XML attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements.
    pub children: Vec<XmlNode>,
    /// Optional text content.
    ///
    /// Text runs are concatenated; mixed content (text interleaved with
    /// child elements) is not preserved in its original order.
    pub text: Option<String>,
    /// Comments that directly precede this element inside its parent.
    pub comments_before: Vec<String>,
    /// Comments after the last child, just before the closing tag.
    pub trailing_comments: Vec<String>,
}

impl XmlNode {
    /// Create a new XML node with no attributes, children, or text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
            comments_before: Vec::new(),
            trailing_comments: Vec::new(),
        }
    }

    /// Create a leaf node holding `text`.
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::new(tag);
        node.text = Some(text.into());
        node
    }

    /// Return the value of attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set attribute `name`, replacing the value in place or appending it.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Remove attribute `name`, returning its former value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Return the first child with the provided tag.
    pub fn get_child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Mutable variant of [`XmlNode::get_child`].
    pub fn get_child_mut(&mut self, tag: &str) -> Option<&mut XmlNode> {
        self.children.iter_mut().find(|child| child.tag == tag)
    }

    /// Return all children with the provided tag.
    pub fn get_children(&self, tag: &str) -> Vec<&XmlNode> {
        self.children
            .iter()
            .filter(|child| child.tag == tag)
            .collect()
    }

    /// Iterate mutably over all children with the provided tag.
    pub fn children_mut<'a>(&'a mut self, tag: &'a str) -> impl Iterator<Item = &'a mut XmlNode> {
        self.children.iter_mut().filter(move |child| child.tag == tag)
    }

    /// Remove every child with the provided tag and return how many were removed.
    pub fn remove_children(&mut self, tag: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|child| child.tag != tag);
        before - self.children.len()
    }

    /// Walk a nested child path and return terminal node text if found.
    pub fn get_text<'a>(&'a self, path: &[&str]) -> Option<&'a str> {
        if path.is_empty() {
            return self.text.as_deref();
        }

        let mut current = self;
        for segment in path {
            current = current.get_child(segment)?;
        }
        current.text.as_deref()
    }
}

/// The XML declaration found at the top of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Default for Declaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: Some("utf-8".to_string()),
            standalone: None,
        }
    }
}

/// A parsed document: the root element plus the prolog details needed to
/// write the file back the way it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    /// Whether the source started with a UTF-8 byte-order mark.
    pub bom: bool,
    /// Whether the source used CRLF line endings.
    pub crlf: bool,
    /// Whether the source ended with a line break.
    pub trailing_newline: bool,
    pub declaration: Option<Declaration>,
    pub root: XmlNode,
}

impl XmlDocument {
    /// Wrap a bare root element with a default declaration and LF endings.
    pub fn new(root: XmlNode) -> Self {
        Self {
            bom: false,
            crlf: false,
            trailing_newline: true,
            declaration: Some(Declaration::default()),
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::XmlNode;

    #[test]
    fn get_text_walks_nested_path() {
        let mut root = XmlNode::new("root");
        let mut parent = XmlNode::new("parent");
        parent.children.push(XmlNode::with_text("child", "value"));
        root.children.push(parent);

        assert_eq!(root.get_text(&["parent", "child"]), Some("value"));
    }

    #[test]
    fn set_attribute_keeps_position_of_existing_key() {
        let mut node = XmlNode::new("Project");
        node.set_attribute("ToolsVersion", "4.0");
        node.set_attribute("DefaultTargets", "Build");
        node.set_attribute("ToolsVersion", "3.5");

        assert_eq!(
            node.attributes,
            vec![
                ("ToolsVersion".to_string(), "3.5".to_string()),
                ("DefaultTargets".to_string(), "Build".to_string()),
            ]
        );
        assert_eq!(node.remove_attribute("ToolsVersion").as_deref(), Some("3.5"));
        assert_eq!(node.attribute("ToolsVersion"), None);
    }

    #[test]
    fn remove_children_counts_removed_nodes() {
        let mut group = XmlNode::new("PropertyGroup");
        group.children.push(XmlNode::with_text("OldToolsVersion", "3.5"));
        group.children.push(XmlNode::with_text("OutputType", "Library"));
        group.children.push(XmlNode::with_text("OldToolsVersion", "2.0"));

        assert_eq!(group.remove_children("OldToolsVersion"), 2);
        assert_eq!(group.children.len(), 1);
    }
}
