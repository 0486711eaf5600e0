//! Recursive metric propagation over a [`Pool`].
//!
//! Every metric is evaluated from the leaves up on each call, nothing is cached in the nodes.
//! Failure rates are returned per hour; an undefined rate (`None`) means no component below the
//! node has been assigned one, which is distinct from a negligible rate.

use log::trace;

use reliability_api::constants::FAILURE_RATE_UNIT_HOURS;

use super::{
    node::ReliabilityNode,
    numerics::{self, RiskRating},
    pool::{Pool, PoolKey},
};

impl ReliabilityNode {
    /// Failure rate per hour.
    pub fn failure_rate(&self, pool: &Pool) -> Option<f64> {
        match self {
            Self::Component(component) => component
                .failure_rate()
                .map(|rate| rate / FAILURE_RATE_UNIT_HOURS),
            Self::Serial(link) => {
                let rates: Vec<f64> = link
                    .children
                    .iter()
                    .filter_map(|key| pool[*key].failure_rate(pool))
                    .collect();
                if rates.is_empty() {
                    None
                } else {
                    Some(rates.iter().sum())
                }
            }
            Self::Parallel(_) => self.mttf(pool).map(f64::recip),
        }
    }

    /// Mean time to failure, in hours.
    pub fn mttf(&self, pool: &Pool) -> Option<f64> {
        match self {
            Self::Component(_) | Self::Serial(_) => self.failure_rate(pool).map(f64::recip),
            Self::Parallel(link) => {
                let rates: Vec<f64> = link
                    .children
                    .iter()
                    .filter_map(|key| pool[*key].failure_rate(pool))
                    .collect();
                numerics::binomial(&rates)
            }
        }
    }

    /// Probability of surviving `time_hours`.
    pub fn reliability(&self, pool: &Pool, time_hours: f64) -> Option<f64> {
        self.failure_rate(pool)
            .map(|rate| numerics::reliability(rate, time_hours))
    }

    /// Reliability sampled every `step_hours` from zero up to and including `end_hours`.
    pub fn reliability_curve(
        &self,
        pool: &Pool,
        end_hours: f64,
        step_hours: f64,
    ) -> Option<Vec<(f64, f64)>> {
        let rate = self.failure_rate(pool)?;
        if step_hours <= 0.0 || end_hours < 0.0 {
            return Some(Vec::new());
        }
        let steps = (end_hours / step_hours).floor() as usize;
        Some(
            (0..=steps)
                .map(|i| {
                    let time = i as f64 * step_hours;
                    (time, numerics::reliability(rate, time))
                })
                .collect(),
        )
    }

    /// Probability of failure within a year, in percent.
    pub fn annual_failure_probability(&self, pool: &Pool) -> Option<f64> {
        self.failure_rate(pool)
            .map(numerics::annual_failure_probability)
    }

    /// Risk priority number, weighted by the node's severity.
    pub fn rpn(&self, pool: &Pool) -> Option<u8> {
        self.failure_rate(pool)
            .map(|rate| numerics::rpn(rate, self.severity()))
    }

    pub fn risk_rating(&self, pool: &Pool) -> Option<RiskRating> {
        self.rpn(pool).map(RiskRating::from)
    }

    /// Share of this node's failure rate attributable to descendants labelled `label`.
    ///
    /// Children are weighted by their failure rate, with undefined rates counting as 1. Unlabelled
    /// and non-matching structural children are searched recursively; non-matching components
    /// contribute nothing.
    pub fn probability_proportion(&self, pool: &Pool, label: &str) -> f64 {
        if self.label() == Some(label) {
            return 1.0;
        }

        let children = match self {
            Self::Component(_) => return 0.0,
            Self::Serial(link) | Self::Parallel(link) => &link.children,
        };
        if children.is_empty() {
            return 0.0;
        }

        let weights: Vec<f64> = children
            .iter()
            .map(|key| pool[*key].failure_rate(pool).unwrap_or(1.0))
            .collect();
        let total: f64 = weights.iter().sum();

        children
            .iter()
            .zip(weights)
            .map(|(key, weight)| {
                let child = &pool[*key];
                let share = weight / total;
                if child.label() == Some(label) {
                    share
                } else if child.is_component() {
                    0.0
                } else {
                    share * child.probability_proportion(pool, label)
                }
            })
            .sum()
    }
}

impl Pool {
    /// Clears the failure rate of every component below `key`, structure is left untouched.
    pub fn reset(&mut self, key: PoolKey) {
        let children = match self.get_mut(key) {
            Some(ReliabilityNode::Component(component)) => {
                component.clear_failure_rate();
                return;
            }
            Some(node) => node.children().to_vec(),
            None => return,
        };
        trace!("Resetting {} children of node '{key}'", children.len());
        for child in children {
            self.reset(child);
        }
    }
}
