//! The nested list encoding of series and parallel arrangements.
//!
//! A list holds leaves and further lists. Two or more sibling lists are redundant branches and
//! become a parallel link over one series wrapper per item. A list holding a single list is
//! unwrapped. Any other nested list becomes an unlabelled series link.

use reliability_api::{config::Nested, error::ReliabilityError};

use crate::graph::{
    node::ReliabilityNode,
    pool::{Pool, PoolKey},
};

/// Leaves that may stand for an absent item.
pub(crate) trait Placeholder {
    fn is_placeholder(&self) -> bool;
}

/// Removes placeholders at every depth, then any list left empty. Returns `None` if nothing
/// remains.
pub(crate) fn strip_dummy<T: Clone + Placeholder>(items: &[Nested<T>]) -> Option<Vec<Nested<T>>> {
    let stripped: Vec<Nested<T>> = items
        .iter()
        .filter_map(|item| match item {
            Nested::Item(leaf) if leaf.is_placeholder() => None,
            Nested::Item(_) => Some(item.clone()),
            Nested::Group(group) => strip_dummy(group).map(Nested::Group),
        })
        .collect();
    (!stripped.is_empty()).then_some(stripped)
}

/// Inserts the nodes encoded by `items` into the pool and returns the keys to attach, in order,
/// to the parent link. Leaves are inserted by `build_leaf`.
pub(crate) fn build_sequence<T, F>(
    items: &[Nested<T>],
    pool: &mut Pool,
    build_leaf: &mut F,
) -> Result<Vec<PoolKey>, ReliabilityError>
where
    F: FnMut(&T, &mut Pool) -> Result<PoolKey, ReliabilityError>,
{
    let groups = items.iter().filter(|item| item.as_group().is_some()).count();

    if groups > 1 {
        let mut branches = Vec::with_capacity(items.len());
        for item in items {
            let children = match item {
                Nested::Group(group) => build_sequence(group, pool, build_leaf)?,
                Nested::Item(leaf) => vec![build_leaf(leaf, pool)?],
            };
            branches.push(pool.insert(ReliabilityNode::new_serial(None::<String>, children)));
        }
        let parallel = pool.insert(ReliabilityNode::new_parallel(None::<String>, branches));
        return Ok(vec![parallel]);
    }

    if let [Nested::Group(group)] = items {
        return build_sequence(group, pool, build_leaf);
    }

    let mut keys = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Nested::Item(leaf) => keys.push(build_leaf(leaf, pool)?),
            Nested::Group(group) => {
                let children = build_sequence(group, pool, build_leaf)?;
                keys.push(pool.insert(ReliabilityNode::new_serial(None::<String>, children)));
            }
        }
    }
    Ok(keys)
}
