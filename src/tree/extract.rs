use indexmap::IndexMap;

use crate::{
    foundation::error::{ConformError, ConformResult},
    tree::{
        node::TreeNode,
        record::{Record, convert},
    },
};

/// Records keyed by their identifying attribute, in encounter order.
pub type KeyedRecords = IndexMap<String, Record>;

pub const DEFAULT_ID_KEYS: [&str; 2] = ["id", "name"];

/// Collect the direct children of `root` tagged `tag` into an ordered map.
///
/// Each child is keyed by the first attribute in `id_keys` it carries. A repeated key
/// overwrites the earlier record in place, so the map keeps the first position and
/// the last value.
pub fn extract(
    root: &TreeNode,
    tag: &str,
    id_keys: &[&str],
    force_include_empty: bool,
) -> ConformResult<KeyedRecords> {
    let mut out = KeyedRecords::new();
    for node in root.children.iter().filter(|c| c.tag == tag) {
        let key = id_keys
            .iter()
            .find_map(|k| node.attribute(k))
            .ok_or_else(|| ConformError::MissingIdentifier {
                tag: node.tag.clone(),
                keys: id_keys.iter().map(|k| k.to_string()).collect(),
            })?;
        let record = convert(node, force_include_empty)?;
        out.insert(key.to_string(), record);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> TreeNode {
        TreeNode::new("mlt")
            .child(TreeNode::new("producer").attr("id", "3"))
            .child(TreeNode::new("playlist").attr("id", "main bin"))
            .child(TreeNode::new("producer").attr("name", "black"))
            .child(
                TreeNode::new("tractor")
                    .child(TreeNode::new("producer").attr("id", "nested")),
            )
    }

    #[test]
    fn scans_direct_children_only() {
        let producers = extract(&root(), "producer", &DEFAULT_ID_KEYS, false).unwrap();
        let keys: Vec<_> = producers.keys().map(String::as_str).collect();
        assert_eq!(keys, ["3", "black"]);
    }

    #[test]
    fn id_keys_are_tried_in_order() {
        let node = TreeNode::new("mlt").child(
            TreeNode::new("producer")
                .attr("name", "by-name")
                .attr("id", "by-id"),
        );
        let m = extract(&node, "producer", &DEFAULT_ID_KEYS, false).unwrap();
        assert!(m.contains_key("by-id"));

        let m = extract(&node, "producer", &["name", "id"], false).unwrap();
        assert!(m.contains_key("by-name"));
    }

    #[test]
    fn missing_identifier_fails() {
        let node = TreeNode::new("mlt").child(TreeNode::new("playlist").attr("title", "x"));
        let err = extract(&node, "playlist", &DEFAULT_ID_KEYS, false).unwrap_err();
        match err {
            ConformError::MissingIdentifier { tag, keys } => {
                assert_eq!(tag, "playlist");
                assert_eq!(keys, ["id", "name"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let node = TreeNode::new("mlt")
            .child(TreeNode::new("producer").attr("id", "a").attr("n", "1"))
            .child(TreeNode::new("producer").attr("id", "b"))
            .child(TreeNode::new("producer").attr("id", "a").attr("n", "2"));
        let m = extract(&node, "producer", &DEFAULT_ID_KEYS, false).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m["a"].attribute("n"), Some("2"));
        assert_eq!(m.get_index_of("a"), Some(0));
    }

    #[test]
    fn no_matches_is_an_empty_map() {
        let m = extract(&root(), "filter", &DEFAULT_ID_KEYS, false).unwrap();
        assert!(m.is_empty());
    }
}
