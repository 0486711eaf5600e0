use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    ops::Index,
};

use serde::{Serialize, Serializer};

use reliability_api::{
    constants::ARRAY_LABEL,
    error::{ReliabilityError, ReportError, SearchError},
};

use super::node::ReliabilityNode;

/// Key of a node in a [`Pool`]. Nodes are numbered in insertion order, the root has a reserved
/// key of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PoolKey {
    Array,
    Index(usize),
}

impl Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array => write!(f, "{ARRAY_LABEL}"),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<usize> for PoolKey {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl Serialize for PoolKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Array => serializer.serialize_str(ARRAY_LABEL),
            Self::Index(i) => serializer.serialize_u64(*i as u64),
        }
    }
}

/// Arena owning every node of a reliability tree. Nodes refer to their children by key, so a
/// clone of the pool is a complete, independent copy of the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pool {
    nodes: BTreeMap<PoolKey, ReliabilityNode>,
    next_index: usize,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node under the next free index and returns its key. Indices are never reused.
    pub fn insert(&mut self, node: ReliabilityNode) -> PoolKey {
        let key = PoolKey::Index(self.next_index);
        self.next_index += 1;
        self.nodes.insert(key, node);
        key
    }

    /// Adds the root node, replacing any previous one.
    pub fn insert_root(&mut self, node: ReliabilityNode) -> PoolKey {
        self.nodes.insert(PoolKey::Array, node);
        PoolKey::Array
    }

    pub fn get(&self, key: PoolKey) -> Option<&ReliabilityNode> {
        self.nodes.get(&key)
    }

    pub fn get_mut(&mut self, key: PoolKey) -> Option<&mut ReliabilityNode> {
        self.nodes.get_mut(&key)
    }

    /// Like `get`, but reports a missing key as a structured error.
    pub fn node(&self, key: PoolKey) -> Result<&ReliabilityNode, ReliabilityError> {
        self.get(key).structured(SearchError::UnknownKey {
            key: key.to_string(),
        })
    }

    pub fn contains_key(&self, key: PoolKey) -> bool {
        self.nodes.contains_key(&key)
    }

    pub fn root(&self) -> Option<&ReliabilityNode> {
        self.get(PoolKey::Array)
    }

    pub fn keys(&self) -> impl Iterator<Item = PoolKey> + '_ {
        self.nodes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PoolKey, &ReliabilityNode)> {
        self.nodes.iter().map(|(key, node)| (*key, node))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PoolKey, &mut ReliabilityNode)> {
        self.nodes.iter_mut().map(|(key, node)| (*key, node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Index<PoolKey> for Pool {
    type Output = ReliabilityNode;

    /// Panics if the key is not in the pool. Child keys always are.
    fn index(&self, key: PoolKey) -> &Self::Output {
        match self.nodes.get(&key) {
            Some(node) => node,
            None => panic!("pool has no node with key '{key}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use reliability_api::error::ErrorKind;

    use super::*;

    #[test]
    fn test_insert_assigns_sequential_keys() {
        let mut pool = Pool::new();
        let a = pool.insert(ReliabilityNode::new_component("a", None));
        let b = pool.insert(ReliabilityNode::new_component("b", None));
        let root = pool.insert_root(ReliabilityNode::new_serial(Some("array"), vec![a, b]));

        assert_eq!(a, PoolKey::Index(0));
        assert_eq!(b, PoolKey::Index(1));
        assert_eq!(root, PoolKey::Array);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.root().unwrap().children(), &[a, b]);
        // Root sorts first
        assert_eq!(pool.keys().next(), Some(PoolKey::Array));
        assert_eq!(pool[b].label(), Some("b"));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut pool = Pool::new();
        let a = pool.insert(ReliabilityNode::new_component("a", None));
        let copy = pool.clone();

        pool.get_mut(a)
            .unwrap()
            .as_component_mut()
            .unwrap()
            .set_failure_rate(3.0);

        assert_eq!(pool[a].as_component().unwrap().failure_rate(), Some(3.0));
        assert_eq!(copy[a].as_component().unwrap().failure_rate(), None);
    }

    #[test]
    fn test_unknown_key() {
        let pool = Pool::new();
        assert!(pool.get(PoolKey::Index(4)).is_none());
        let error = pool.node(PoolKey::Index(4)).unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::Search(SearchError::UnknownKey { key: "4".into() })
        );
    }

    #[test]
    fn test_key_serialize() {
        assert_eq!(serde_json::to_string(&PoolKey::Array).unwrap(), "\"array\"");
        assert_eq!(serde_json::to_string(&PoolKey::from(7)).unwrap(), "7");
    }
}
