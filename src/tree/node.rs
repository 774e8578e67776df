use crate::foundation::error::{ConformError, ConformResult};

/// A parsed element: tag, ordered attributes, ordered element children and optional text.
///
/// This is the hand-off type from whatever parsed the project file. It is never
/// mutated after construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<TreeNode>,
    pub text: Option<String>,
}

impl TreeNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parse an XML document and return its root element.
    ///
    /// Only element children are kept. `text` is the text that directly follows the
    /// opening tag (before the first child element), which is whitespace for container
    /// elements and the payload for leaf elements such as `<property>`.
    pub fn parse_xml(xml: &str) -> ConformResult<Self> {
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| ConformError::xml(format!("XML parse error: {e}")))?;
        Ok(Self::from_roxml(doc.root_element()))
    }

    fn from_roxml(node: roxmltree::Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect();
        let children = node
            .children()
            .filter(|c| c.is_element())
            .map(Self::from_roxml)
            .collect();
        let text = node
            .first_child()
            .filter(|c| c.is_text())
            .and_then(|c| c.text())
            .map(str::to_string);

        Self {
            tag: node.tag_name().name().to_string(),
            attributes,
            children,
            text,
        }
    }
}
