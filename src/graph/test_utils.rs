use super::{
    node::ReliabilityNode,
    pool::{Pool, PoolKey},
};

/// Inserts a component with an optional failure rate per 10^6 hours.
pub(crate) fn component(pool: &mut Pool, id: &str, rate: Option<f64>) -> PoolKey {
    let mut node = ReliabilityNode::new_component(id, None);
    if let (Some(rate), Some(component)) = (rate, node.as_component_mut()) {
        component.set_failure_rate(rate);
    }
    pool.insert(node)
}

/// Builds a single labelled link over components `c0`, `c1`, ... with the given rates.
pub(crate) fn pool_with_rates(parallel: bool, rates: &[Option<f64>]) -> (Pool, PoolKey) {
    let mut pool = Pool::new();
    let children = rates
        .iter()
        .enumerate()
        .map(|(i, rate)| component(&mut pool, &format!("c{i}"), *rate))
        .collect();
    let link = if parallel {
        ReliabilityNode::new_parallel(Some("link"), children)
    } else {
        ReliabilityNode::new_serial(Some("link"), children)
    };
    let key = pool.insert(link);
    (pool, key)
}
