//! Label search over a reliability tree.
//!
//! Searches walk the tree depth first from a start key, collecting the labels of the ancestors
//! of every visited node. A match is reported with its label path (ancestor labels followed by
//! its own) and its pool key. Nodes below a match are not searched. Matches are told apart by
//! label path, so the identical branches of a redundant group are reported once.

use std::collections::BTreeSet;

use log::trace;
use serde::Serialize;

use reliability_api::{
    constants::{DEVICE_PREFIX, SUBHUB_PREFIX},
    error::{ReliabilityError, SearchError},
};

use super::{
    node::ReliabilityNode,
    pool::{Pool, PoolKey},
};

/// A node found by a label search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelMatch {
    /// Labels from the start node down to and including the match.
    pub path: Vec<String>,
    pub key: PoolKey,
}

/// Parameters of a label search.
#[derive(Debug, Clone)]
pub struct LabelQuery<'a> {
    pub label: &'a str,

    /// Accept labels that contain `label` rather than equal it.
    pub partial_match: bool,

    /// Only report matches whose path contains this label.
    pub filter_label: Option<&'a str>,

    pub start: PoolKey,
}

impl<'a> LabelQuery<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            partial_match: false,
            filter_label: None,
            start: PoolKey::Array,
        }
    }

    pub fn partial(mut self) -> Self {
        self.partial_match = true;
        self
    }

    pub fn within(mut self, filter_label: &'a str) -> Self {
        self.filter_label = Some(filter_label);
        self
    }

    pub fn from_key(mut self, start: PoolKey) -> Self {
        self.start = start;
        self
    }

    fn matches(&self, candidate: &str) -> bool {
        if self.partial_match {
            candidate.contains(self.label)
        } else {
            candidate == self.label
        }
    }
}

/// Returns the first match below `query.start` whose label path is not in `exclude`. Excluded
/// matches are not descended into.
pub fn find_labels(
    pool: &Pool,
    query: &LabelQuery,
    exclude: &BTreeSet<Vec<String>>,
) -> Option<LabelMatch> {
    let mut path = Vec::new();
    find_labels_from(pool, query, exclude, query.start, &mut path)
}

fn find_labels_from(
    pool: &Pool,
    query: &LabelQuery,
    exclude: &BTreeSet<Vec<String>>,
    key: PoolKey,
    path: &mut Vec<String>,
) -> Option<LabelMatch> {
    let node = pool.get(key)?;

    if let Some(label) = node.label().filter(|label| query.matches(label)) {
        let mut found = path.clone();
        found.push(label.to_string());
        if exclude.contains(&found) {
            return None;
        }
        return Some(LabelMatch { path: found, key });
    }

    if node.is_component() {
        return None;
    }

    if let Some(label) = node.label() {
        path.push(label.to_string());
    }
    let found = node
        .children()
        .iter()
        .find_map(|child| find_labels_from(pool, query, exclude, *child, path));
    if node.label().is_some() {
        path.pop();
    }
    found
}

/// Returns every match with a distinct label path, in depth first order.
pub fn find_all_labels(pool: &Pool, query: &LabelQuery) -> Vec<LabelMatch> {
    let mut exclude = BTreeSet::new();
    let mut found = Vec::new();

    while let Some(label_match) = find_labels(pool, query, &exclude) {
        exclude.insert(label_match.path.clone());
        found.push(label_match);
    }

    trace!(
        "Found {} match(es) for label '{}'",
        found.len(),
        query.label
    );

    match query.filter_label {
        Some(filter) => found
            .into_iter()
            .filter(|m| m.path.iter().any(|label| label == filter))
            .collect(),
        None => found,
    }
}

/// Returns the only match, failing if there are none or several.
pub fn find_one_label(pool: &Pool, query: &LabelQuery) -> Result<LabelMatch, ReliabilityError> {
    let mut found = find_all_labels(pool, query);
    match found.len() {
        0 => Err(ReliabilityError::new(SearchError::NoMatch {
            label: query.label.to_string(),
        })),
        1 => Ok(found.remove(0)),
        count => Err(ReliabilityError::new(SearchError::MultipleMatches {
            label: query.label.to_string(),
            count,
        })),
    }
}

/// Returns the match with the shortest label path, failing if there is no match or if several
/// matches share the shortest length.
pub fn find_shortest_label(
    pool: &Pool,
    query: &LabelQuery,
) -> Result<LabelMatch, ReliabilityError> {
    let found = find_all_labels(pool, query);
    let Some(shortest) = found.iter().map(|m| m.path.len()).min() else {
        return Err(ReliabilityError::new(SearchError::NoMatch {
            label: query.label.to_string(),
        }));
    };

    let mut candidates: Vec<LabelMatch> = found
        .into_iter()
        .filter(|m| m.path.len() == shortest)
        .collect();
    if candidates.len() == 1 {
        Ok(candidates.remove(0))
    } else {
        Err(ReliabilityError::new(SearchError::AmbiguousShortestPath {
            label: query.label.to_string(),
            count: candidates.len(),
        }))
    }
}

/// Groups the devices below `key` into strings: the devices of a string sit in series, so the
/// failure of one cuts off every device after it. Branches of a parallel link start separate
/// strings and every subhub contributes its own strings.
pub fn find_strings(pool: &Pool, key: PoolKey) -> Vec<Vec<String>> {
    let Some(node) = pool.get(key) else {
        return Vec::new();
    };
    let parallel = matches!(node, ReliabilityNode::Parallel(_));

    let mut strings = Vec::new();
    let mut current = Vec::new();
    for child in node.children() {
        match pool[*child].label() {
            Some(label) if label.contains(DEVICE_PREFIX) => {
                if parallel {
                    strings.push(vec![label.to_string()]);
                } else {
                    current.push(label.to_string());
                }
            }
            Some(label) if label.contains(SUBHUB_PREFIX) => {
                strings.extend(find_strings(pool, *child));
            }
            Some(_) => {}
            None => {
                let mut nested = find_strings(pool, *child);
                if !parallel && nested.len() == 1 {
                    current.append(&mut nested[0]);
                } else {
                    strings.extend(nested);
                }
            }
        }
    }

    if !current.is_empty() {
        strings.insert(0, current);
    }
    strings
}

#[cfg(test)]
mod tests {
    use reliability_api::error::ErrorKind;

    use crate::graph::test_utils::component;

    use super::*;

    fn serial(pool: &mut Pool, label: Option<&str>, children: Vec<PoolKey>) -> PoolKey {
        pool.insert(ReliabilityNode::new_serial(label, children))
    }

    /// array
    /// ├── Substation [s1]
    /// └── parallel
    ///     ├── [device001 [Elec sub-system [e1]], device002 [Elec sub-system [e2]]]
    ///     └── [device003 [Elec sub-system [e3]]]
    fn array_pool() -> Pool {
        let mut pool = Pool::new();
        let s1 = component(&mut pool, "s1", Some(1.0));
        let substation = serial(&mut pool, Some("Substation"), vec![s1]);

        let mut devices = Vec::new();
        for i in 1..=3 {
            let comp = component(&mut pool, &format!("e{i}"), Some(1.0));
            let elec = serial(&mut pool, Some("Elec sub-system"), vec![comp]);
            devices.push(serial(&mut pool, Some(&format!("device00{i}")), vec![elec]));
        }
        let first = serial(&mut pool, None, vec![devices[0], devices[1]]);
        let second = serial(&mut pool, None, vec![devices[2]]);
        let strings = pool.insert(ReliabilityNode::new_parallel(
            None::<&str>,
            vec![first, second],
        ));
        pool.insert_root(ReliabilityNode::new_serial(
            Some("array"),
            vec![substation, strings],
        ));
        pool
    }

    #[test]
    fn test_find_labels_exact() {
        let pool = array_pool();
        let found = find_labels(&pool, &LabelQuery::new("Elec sub-system"), &BTreeSet::new())
            .unwrap();
        assert_eq!(found.path, vec!["array", "device001", "Elec sub-system"]);
        assert_eq!(pool[found.key].label(), Some("Elec sub-system"));

        assert!(find_labels(&pool, &LabelQuery::new("Elec"), &BTreeSet::new()).is_none());
    }

    #[test]
    fn test_find_labels_excluded_match_is_not_descended() {
        let pool = array_pool();
        let device = find_labels(&pool, &LabelQuery::new("device001"), &BTreeSet::new()).unwrap();
        let exclude = BTreeSet::from([device.path]);

        let found = find_labels(&pool, &LabelQuery::new("device").partial(), &exclude).unwrap();
        assert_eq!(found.path, vec!["array", "device002"]);
    }

    #[test]
    fn test_find_all_labels() {
        let pool = array_pool();
        let found = find_all_labels(&pool, &LabelQuery::new("Elec sub-system"));
        let paths: Vec<&str> = found.iter().map(|m| m.path[1].as_str()).collect();
        assert_eq!(paths, vec!["device001", "device002", "device003"]);

        // Matching stops at the first matching ancestor
        let devices = find_all_labels(&pool, &LabelQuery::new("device").partial());
        assert_eq!(devices.len(), 3);
        assert!(devices.iter().all(|m| m.path.len() == 2));

        let filtered = find_all_labels(&pool, &LabelQuery::new("Elec sub-system").within("device003"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].path[1], "device003");

        assert!(find_all_labels(&pool, &LabelQuery::new("Umbilical")).is_empty());
    }

    #[test]
    fn test_find_all_labels_repeated_paths() {
        // device001 [Station keeping [parallel [[Moorings lines [l1]], [Moorings lines [l2]]]]]
        let mut pool = Pool::new();
        let mut lines = Vec::new();
        let mut branches = Vec::new();
        for id in ["l1", "l2"] {
            let comp = component(&mut pool, id, Some(1.0));
            let line = serial(&mut pool, Some("Moorings lines"), vec![comp]);
            lines.push(line);
            branches.push(serial(&mut pool, None, vec![line]));
        }
        let redundant = pool.insert(ReliabilityNode::new_parallel(None::<&str>, branches));
        let keeping = serial(&mut pool, Some("Station keeping"), vec![redundant]);
        let device = serial(&mut pool, Some("device001"), vec![keeping]);
        pool.insert_root(ReliabilityNode::new_serial(Some("array"), vec![device]));

        let found = find_all_labels(&pool, &LabelQuery::new("Moorings lines"));
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].path,
            vec!["array", "device001", "Station keeping", "Moorings lines"]
        );
        assert_eq!(found[0].key, lines[0]);

        let one = find_one_label(&pool, &LabelQuery::new("Moorings lines")).unwrap();
        assert_eq!(one.key, found[0].key);
    }

    #[test]
    fn test_find_all_labels_from_key() {
        let pool = array_pool();
        let device = find_one_label(&pool, &LabelQuery::new("device002")).unwrap();
        let found = find_all_labels(&pool, &LabelQuery::new("e2").from_key(device.key));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, vec!["device002", "Elec sub-system", "e2"]);
    }

    #[test]
    fn test_find_one_label() {
        let pool = array_pool();
        assert_eq!(
            find_one_label(&pool, &LabelQuery::new("Substation"))
                .unwrap()
                .path,
            vec!["array", "Substation"]
        );

        let error = find_one_label(&pool, &LabelQuery::new("Elec sub-system")).unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::Search(SearchError::MultipleMatches {
                label: "Elec sub-system".into(),
                count: 3
            })
        );

        let error = find_one_label(&pool, &LabelQuery::new("Umbilical")).unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::Search(SearchError::NoMatch {
                label: "Umbilical".into()
            })
        );
    }

    #[test]
    fn test_find_shortest_label() {
        let mut pool = array_pool();
        // A second, shallower "Elec sub-system" directly under the array
        let extra = component(&mut pool, "x", None);
        let shallow = serial(&mut pool, Some("Elec sub-system"), vec![extra]);
        match pool.get_mut(PoolKey::Array).unwrap() {
            ReliabilityNode::Serial(link) => link.children.push(shallow),
            _ => unreachable!(),
        }

        let found = find_shortest_label(&pool, &LabelQuery::new("Elec sub-system")).unwrap();
        assert_eq!(found.key, shallow);

        let error = find_shortest_label(&pool, &LabelQuery::new("device").partial()).unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::Search(SearchError::AmbiguousShortestPath {
                label: "device".into(),
                count: 3
            })
        );
        assert!(find_shortest_label(&pool, &LabelQuery::new("nothing")).is_err());
    }

    #[test]
    fn test_find_strings_parallel() {
        let pool = array_pool();
        assert_eq!(
            find_strings(&pool, PoolKey::Array),
            vec![
                vec!["device001".to_string(), "device002".to_string()],
                vec!["device003".to_string()],
            ]
        );
    }

    #[test]
    fn test_find_strings_single_string_and_subhubs() {
        let mut pool = Pool::new();
        let d1 = serial(&mut pool, Some("device001"), vec![]);
        let d2 = serial(&mut pool, Some("device002"), vec![]);
        let hub1 = serial(&mut pool, Some("subhub001"), vec![d1, d2]);
        let d3 = serial(&mut pool, Some("device003"), vec![]);
        let hub2 = serial(&mut pool, Some("subhub002"), vec![d3]);
        let w1 = serial(&mut pool, None, vec![hub1]);
        let w2 = serial(&mut pool, None, vec![hub2]);
        let hubs = pool.insert(ReliabilityNode::new_parallel(None::<&str>, vec![w1, w2]));
        pool.insert_root(ReliabilityNode::new_serial(Some("array"), vec![hubs]));

        assert_eq!(
            find_strings(&pool, PoolKey::Array),
            vec![
                vec!["device001".to_string(), "device002".to_string()],
                vec!["device003".to_string()],
            ]
        );
        assert_eq!(
            find_strings(&pool, hub1),
            vec![vec!["device001".to_string(), "device002".to_string()]]
        );
        assert!(find_strings(&pool, d3).is_empty());
    }
}
