//! Metric tables and node views returned by [`Network`](super::Network) queries.

use std::fmt::{self, Display};

use serde::Serialize;

use reliability_api::config::Severity;

use crate::graph::{Pool, PoolKey, ReliabilityNode, RiskRating};

/// Default sampling step of reliability curves, one day.
pub const DEFAULT_CURVE_STEP_HOURS: f64 = 24.0;

/// Metrics of one link of the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MetricsRow {
    pub link: PoolKey,

    /// Array, subhub or device the link belongs to.
    pub system: String,

    /// Failures per hour.
    pub failure_rate: Option<f64>,

    /// Hours.
    pub mttf: Option<f64>,
    pub rpn: Option<u8>,
    pub risk_rating: Option<RiskRating>,

    /// Reliability at the mission time of the table, if one was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reliability: Option<f64>,

    /// Devices cut off by the failure of the link. Only reported for subsystem queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curtails: Option<Vec<String>>,
}

impl MetricsRow {
    pub(crate) fn new(
        pool: &Pool,
        key: PoolKey,
        system: impl Into<String>,
        time_hours: Option<f64>,
    ) -> Self {
        let node = &pool[key];
        Self {
            link: key,
            system: system.into(),
            failure_rate: node.failure_rate(pool),
            mttf: node.mttf(pool),
            rpn: node.rpn(pool),
            risk_rating: node.risk_rating(pool),
            reliability: time_hours.and_then(|time| node.reliability(pool, time)),
            curtails: None,
        }
    }
}

/// Rows of metrics, in query order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MetricsTable {
    /// Mission time of the reliability column.
    pub time_hours: Option<f64>,
    pub rows: Vec<MetricsRow>,
}

impl MetricsTable {
    /// Returns `None` when no row has a defined failure rate.
    pub(crate) fn from_rows(time_hours: Option<f64>, rows: Vec<MetricsRow>) -> Option<Self> {
        if rows.iter().all(|row| row.failure_rate.is_none()) {
            return None;
        }
        Some(Self { time_hours, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn links(&self) -> Vec<PoolKey> {
        self.rows.iter().map(|row| row.link).collect()
    }

    pub fn systems(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.system.as_str()).collect()
    }

    pub fn failure_rates(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.failure_rate).collect()
    }

    pub fn mttfs(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.mttf).collect()
    }

    pub fn rpns(&self) -> Vec<Option<u8>> {
        self.rows.iter().map(|row| row.rpn).collect()
    }

    /// Reliability column, `None` unless the table was built for a mission time.
    pub fn reliabilities(&self) -> Option<Vec<Option<f64>>> {
        self.time_hours
            .map(|_| self.rows.iter().map(|row| row.reliability).collect())
    }

    /// Curtailment column, `None` for system tables.
    pub fn curtailments(&self) -> Option<Vec<&[String]>> {
        self.rows
            .iter()
            .map(|row| row.curtails.as_deref())
            .collect()
    }

    /// Header of the reliability column, e.g. `R (8766 hours)`.
    pub fn reliability_header(&self) -> Option<String> {
        self.time_hours.map(|time| format!("R ({time} hours)"))
    }
}

/// Read-only metrics of a single pool node.
#[derive(Debug, Clone, Copy)]
pub struct NodeMetrics<'a> {
    pool: &'a Pool,
    key: PoolKey,
    node: &'a ReliabilityNode,
}

impl<'a> NodeMetrics<'a> {
    pub(crate) fn new(pool: &'a Pool, key: PoolKey, node: &'a ReliabilityNode) -> Self {
        Self { pool, key, node }
    }

    pub fn key(&self) -> PoolKey {
        self.key
    }

    pub fn label(&self) -> Option<&'a str> {
        self.node.label()
    }

    pub fn node(&self) -> &'a ReliabilityNode {
        self.node
    }

    pub fn severity(&self) -> Severity {
        self.node.severity()
    }

    pub fn failure_rate(&self) -> Option<f64> {
        self.node.failure_rate(self.pool)
    }

    pub fn mttf(&self) -> Option<f64> {
        self.node.mttf(self.pool)
    }

    pub fn reliability(&self, time_hours: f64) -> Option<f64> {
        self.node.reliability(self.pool, time_hours)
    }

    /// Reliability sampled every `step_hours` (one day by default) up to `end_hours`.
    pub fn reliability_curve(
        &self,
        end_hours: f64,
        step_hours: Option<f64>,
    ) -> Option<Vec<(f64, f64)>> {
        self.node.reliability_curve(
            self.pool,
            end_hours,
            step_hours.unwrap_or(DEFAULT_CURVE_STEP_HOURS),
        )
    }

    pub fn annual_failure_probability(&self) -> Option<f64> {
        self.node.annual_failure_probability(self.pool)
    }

    pub fn rpn(&self) -> Option<u8> {
        self.node.rpn(self.pool)
    }

    pub fn risk_rating(&self) -> Option<RiskRating> {
        self.node.risk_rating(self.pool)
    }

    pub fn probability_proportion(&self, label: &str) -> f64 {
        self.node.probability_proportion(self.pool, label)
    }

    pub fn display(&self) -> String {
        self.node.display(self.pool)
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.node.children().len()
    }

    pub fn is_empty(&self) -> bool {
        self.node.children().is_empty()
    }
}

impl Display for NodeMetrics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
