//! Section nodes and the missing-safe reference type.

use std::collections::BTreeMap;

use crate::value::{DecodeError, FromValue};

/// One section of a parsed config: its `key: value` properties plus its
/// nested child sections.
///
/// Property values are kept as raw text; decoding happens on demand via
/// [`get`](Node::get), so the same property can be read under different
/// types. A node exclusively owns its children.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Node {
    properties: BTreeMap<String, String>,
    children: BTreeMap<String, Node>,
}

impl Node {
    /// Decodes the property `key` as `T`.
    ///
    /// Returns `Ok(None)` when the key is absent. A key that is present
    /// but whose text cannot be shaped into `T` is an error, not an
    /// absence.
    pub fn get<T: FromValue>(&self, key: &str) -> Result<Option<T>, DecodeError> {
        match self.properties.get(key) {
            Some(raw) => T::from_value(raw).map(Some),
            None => Ok(None),
        }
    }

    /// Decodes every non-empty property of this node as `T`.
    ///
    /// Properties with empty values are skipped; a non-empty value that
    /// fails to decode propagates its error.
    pub fn get_all<T: FromValue>(&self) -> Result<BTreeMap<String, T>, DecodeError> {
        let mut result = BTreeMap::new();
        for (key, raw) in &self.properties {
            if raw.is_empty() {
                continue;
            }
            result.insert(key.clone(), T::from_value(raw)?);
        }
        Ok(result)
    }

    /// Returns the raw, undecoded text of a property.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Looks up a child section; a missing name yields the missing
    /// sentinel, so lookups chain safely.
    pub fn child(&self, name: &str) -> NodeRef<'_> {
        NodeRef(self.children.get(name))
    }

    /// Iterates over the child sections in name order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub(crate) fn set_value(&mut self, key: &str, value: &str) {
        self.properties.insert(key.to_string(), value.to_string());
    }

    pub(crate) fn insert_child(&mut self, name: String, node: Node) {
        self.children.insert(name, node);
    }

    pub(crate) fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub(crate) fn child_map(&self) -> &BTreeMap<String, Node> {
        &self.children
    }
}

/// A possibly-missing reference to a [`Node`].
///
/// Failed lookups yield the missing variant rather than an error, and
/// every accessor short-circuits on it, so query chains like
/// `config.section("a").child("b").get::<i64>("c")` never panic on an
/// absent intermediate.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a>(Option<&'a Node>);

impl<'a> NodeRef<'a> {
    /// The missing sentinel.
    pub const MISSING: NodeRef<'static> = NodeRef(None);

    pub(crate) fn new(node: Option<&'a Node>) -> Self {
        NodeRef(node)
    }

    /// Whether this reference points at a real node.
    ///
    /// A present-but-empty section still exists; only a failed lookup is
    /// missing.
    pub fn exists(self) -> bool {
        self.0.is_some()
    }

    /// Looks up a child section, staying missing if this reference
    /// already is.
    pub fn child(self, name: &str) -> NodeRef<'a> {
        match self.0 {
            Some(node) => node.child(name),
            None => NodeRef(None),
        }
    }

    /// Decodes the property `key` as `T`; see [`Node::get`].
    ///
    /// A missing node behaves like a node without the key.
    pub fn get<T: FromValue>(self, key: &str) -> Result<Option<T>, DecodeError> {
        match self.0 {
            Some(node) => node.get(key),
            None => Ok(None),
        }
    }

    /// Decodes every non-empty property as `T`; see [`Node::get_all`].
    ///
    /// A missing node yields an empty map.
    pub fn get_all<T: FromValue>(self) -> Result<BTreeMap<String, T>, DecodeError> {
        match self.0 {
            Some(node) => node.get_all(),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Unwraps to the underlying node, if present.
    pub fn node(self) -> Option<&'a Node> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut node = Node::default();
        node.set_value("threads", "4");
        node.set_value("label", "\"Hello World\"");
        node.set_value("blank", "");
        node.insert_child("inner".to_string(), Node::default());
        node
    }

    #[test]
    fn test_get_decodes_on_demand() {
        let node = sample();
        assert_eq!(node.get::<i64>("threads").unwrap(), Some(4));
        // Same property, different requested type.
        assert_eq!(
            node.get::<String>("threads").unwrap(),
            Some("4".to_string())
        );
        assert_eq!(node.raw("threads"), Some("4"));
    }

    #[test]
    fn test_get_missing_key_is_none() {
        let node = sample();
        assert_eq!(node.get::<i64>("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_get_malformed_is_error() {
        let node = sample();
        assert!(node.get::<i64>("label").is_err());
    }

    #[test]
    fn test_get_all_skips_empty_values() {
        let node = sample();
        let all = node.get_all::<String>().unwrap();
        assert_eq!(all.len(), 2);
        assert!(!all.contains_key("blank"));
        assert_eq!(all["label"], "Hello World");
    }

    #[test]
    fn test_missing_ref_chains_safely() {
        let node = sample();
        let missing = node.child("nonexistent");
        assert!(!missing.exists());
        assert!(!missing.child("deeper").exists());
        assert_eq!(missing.get::<i64>("anything").unwrap(), None);
        assert!(missing.get_all::<i64>().unwrap().is_empty());
    }

    #[test]
    fn test_present_child_exists() {
        let node = sample();
        assert!(node.child("inner").exists());
        assert!(node.child("inner").node().is_some());
    }
}
