//! # Translation bundles
//!
//! A bundle is the full nested translation tree for one language, loaded
//! from a JSON document such as:
//!
//! ```json
//! {
//!     "hero": { "title": "Hi", "lines": ["Line1", "Line2"] }
//! }
//! ```
//!
//! Leaves are either a single string or a list of strings, every other
//! node is a mapping keyed by path segment. Bundles are immutable once parsed.

use crate::{definitions::key_path::KeyPath, utils::ImStr};
use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, SeqAccess, Visitor},
};
use std::{borrow::Cow, collections::HashMap, fmt};

/// Separator used when joining list values into a single string
const LIST_SEPARATOR: &str = " ";

/// Error produced when a bundle document is malformed, includes the
/// path to the offending node
pub type ParseError = serde_path_to_error::Error<serde_json::Error>;

/// Mapping from path segment to child node
pub type NodeMap = HashMap<ImStr, TranslationNode>;

/// Node within a [TranslationTree]
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationNode {
    /// Single text leaf
    Text(ImStr),
    /// Ordered list of text values, joined when rendered
    List(Vec<ImStr>),
    /// Intermediate mapping node
    Map(NodeMap),
}

/// Leaf value found by [TranslationTree::resolve]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TranslationValue<'a> {
    Text(&'a str),
    List(&'a [ImStr]),
}

impl<'a> TranslationValue<'a> {
    /// Formats the value into the text written to the page. Lists are
    /// joined with a single space, text passes through unchanged
    pub fn format(&self) -> Cow<'a, str> {
        match *self {
            TranslationValue::Text(value) => Cow::Borrowed(value),
            TranslationValue::List(values) => Cow::Owned(values.join(LIST_SEPARATOR)),
        }
    }
}

/// Parsed translation bundle for a single language
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslationTree {
    root: NodeMap,
}

impl TranslationTree {
    /// Parses a bundle from its serialized JSON document, the document
    /// root must be a mapping
    pub fn parse(document: &str) -> Result<Self, ParseError> {
        let deserializer = &mut serde_json::Deserializer::from_str(document);
        let root: NodeMap = serde_path_to_error::deserialize(deserializer)?;
        Ok(Self { root })
    }

    /// Walks the tree one segment at a time. Fails on an empty path, on
    /// any missing segment and when the path ends on a mapping rather
    /// than a leaf
    pub fn resolve(&self, path: &KeyPath) -> Option<TranslationValue<'_>> {
        let mut segments = path.segments();
        let first = segments.next()?;
        let mut node = self.root.get(first)?;

        for segment in segments {
            node = match node {
                TranslationNode::Map(map) => map.get(segment)?,
                _ => return None,
            };
        }

        match node {
            TranslationNode::Text(value) => Some(TranslationValue::Text(value)),
            TranslationNode::List(values) => Some(TranslationValue::List(values)),
            TranslationNode::Map(_) => None,
        }
    }

    /// Collects the dotted path of every leaf in the tree
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_leaf_paths(&self.root, &mut String::new(), &mut paths);
        paths
    }

    /// Whether the bundle contains no entries at all
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn collect_leaf_paths(map: &NodeMap, prefix: &mut String, out: &mut Vec<String>) {
    for (key, node) in map {
        let prefix_len = prefix.len();
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(key);

        match node {
            TranslationNode::Map(children) => collect_leaf_paths(children, prefix, out),
            _ => out.push(prefix.clone()),
        }

        prefix.truncate(prefix_len);
    }
}

impl<'de> Deserialize<'de> for TranslationNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = TranslationNode;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, a list of strings or a nested mapping")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(TranslationNode::Text(Box::from(value)))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut values = Vec::with_capacity(seq.size_hint().unwrap_or_default());
                while let Some(value) = seq.next_element::<ImStr>()? {
                    values.push(value);
                }
                Ok(TranslationNode::List(values))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut children = NodeMap::with_capacity(map.size_hint().unwrap_or_default());
                while let Some((key, value)) = map.next_entry::<ImStr, TranslationNode>()? {
                    children.insert(key, value);
                }
                Ok(TranslationNode::Map(children))
            }
        }

        deserializer.deserialize_any(NodeVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::{TranslationTree, TranslationValue};
    use crate::definitions::key_path::KeyPath;

    fn bundle() -> TranslationTree {
        TranslationTree::parse(
            r#"{
                "hero": { "title": "Hi", "lines": ["Line1", "Line2"] },
                "form": { "name": "Enter name" },
                "footer": { "note": "All rights reserved" }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_text() {
        let tree = bundle();
        let value = tree.resolve(&KeyPath::from("hero.title")).unwrap();
        assert_eq!(value, TranslationValue::Text("Hi"));
        assert_eq!(value.format(), "Hi");
    }

    /// List values are joined with a single space
    #[test]
    fn test_resolve_list() {
        let tree = bundle();
        let value = tree.resolve(&KeyPath::from("hero.lines")).unwrap();
        assert_eq!(value.format(), "Line1 Line2");
    }

    #[test]
    fn test_resolve_missing() {
        let tree = bundle();
        assert!(tree.resolve(&KeyPath::from("hero.subtitle")).is_none());
        assert!(tree.resolve(&KeyPath::from("nav.home")).is_none());
    }

    /// Matching is exact, no case folding
    #[test]
    fn test_resolve_case_sensitive() {
        let tree = bundle();
        assert!(tree.resolve(&KeyPath::from("Hero.Title")).is_none());
    }

    #[test]
    fn test_resolve_empty_path() {
        let tree = bundle();
        assert!(tree.resolve(&KeyPath::default()).is_none());
    }

    /// Paths ending on a mapping are not renderable
    #[test]
    fn test_resolve_non_leaf() {
        let tree = bundle();
        assert!(tree.resolve(&KeyPath::from("hero")).is_none());
    }

    /// Descending through a leaf fails instead of matching partially
    #[test]
    fn test_resolve_through_leaf() {
        let tree = bundle();
        assert!(tree.resolve(&KeyPath::from("hero.title.extra")).is_none());
    }

    #[test]
    fn test_resolve_deterministic() {
        let tree = bundle();
        let path = KeyPath::from("form.name");
        assert_eq!(tree.resolve(&path), tree.resolve(&path));
    }

    #[test]
    fn test_parse_rejects_non_text_leaf() {
        let err = TranslationTree::parse(r#"{"hero": {"count": 3}}"#).unwrap_err();
        assert_eq!(err.path().to_string(), "hero.count");
    }

    #[test]
    fn test_parse_rejects_non_mapping_root() {
        assert!(TranslationTree::parse(r#"["a", "b"]"#).is_err());
        assert!(TranslationTree::parse("not json").is_err());
    }

    #[test]
    fn test_leaf_paths() {
        let tree = bundle();
        let mut paths = tree.leaf_paths();
        paths.sort();
        assert_eq!(
            paths,
            vec!["footer.note", "form.name", "hero.lines", "hero.title"]
        );
    }
}
