use indexmap::IndexMap;
use serde::ser::SerializeMap as _;

use crate::{
    foundation::error::{ConformError, ConformResult},
    tree::node::TreeNode,
};

/// Field names a [`Record`] owns itself. Attributes may not use them, so the record
/// can always be flattened into a single namespace (see the `Serialize` impl).
pub const RESERVED_FIELDS: [&str; 3] = ["tag", "children", "value"];

/// Converted form of a [`TreeNode`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub tag: String,
    pub children: Option<Vec<Record>>,
    pub value: Option<String>,
    pub attributes: IndexMap<String, String>,
}

impl Record {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Children in source order; empty when the field was omitted.
    pub fn children(&self) -> &[Record] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Children with the given tag, in source order.
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.children().iter().filter(move |c| c.tag == tag)
    }
}

/// Convert `node` (and, first, all of its children) into a [`Record`].
///
/// `force_include_empty` makes `children` and `value` present on the top-level record
/// even when the node has no children or no text. Children are always converted with
/// the flag off.
pub fn convert(node: &TreeNode, force_include_empty: bool) -> ConformResult<Record> {
    let children = node
        .children
        .iter()
        .map(|c| convert(c, false))
        .collect::<ConformResult<Vec<_>>>()?;

    let mut attributes = IndexMap::with_capacity(node.attributes.len());
    for (name, value) in &node.attributes {
        if RESERVED_FIELDS.contains(&name.as_str()) {
            return Err(ConformError::SchemaConflict {
                tag: node.tag.clone(),
                attribute: name.clone(),
            });
        }
        attributes.insert(name.clone(), value.clone());
    }

    let text = node.text.as_deref().unwrap_or("");

    Ok(Record {
        tag: node.tag.clone(),
        children: (force_include_empty || !children.is_empty()).then_some(children),
        value: (force_include_empty || !text.is_empty()).then(|| text.to_string()),
        attributes,
    })
}

/// Flat form: `tag`, then `children`/`value` when present, then every attribute.
impl serde::Serialize for Record {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1
            + usize::from(self.children.is_some())
            + usize::from(self.value.is_some())
            + self.attributes.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("tag", &self.tag)?;
        if let Some(children) = &self.children {
            map.serialize_entry("children", children)?;
        }
        if let Some(value) = &self.value {
            map.serialize_entry("value", value)?;
        }
        for (k, v) in &self.attributes {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
