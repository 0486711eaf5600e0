//! # Network
//!
//! Entry point of the crate. A [`Network`] is built once from a network definition:
//!
//! ```text
//! NetworkDefinition
//! ├── completion      fills in missing electrical, moorings and user networks
//! ├── combination     merges them into array and device hierarchies
//! ├── graph::builder  builds the reliability pool
//! └── curtailment     indexes subhubs and devices and the devices each one cuts off
//! ```
//!
//! The canonical pool carries no failure rates. [`Network::set_failure_rates`] returns a copy
//! with the rates of one severity and scenario assigned, which answers metric queries.

use std::sync::Arc;

use log::{debug, trace};

use reliability_api::{
    config::{ComponentDatabase, KFactors, NetworkDefinition, Scenario, Severity, SubNetwork},
    constants::{
        ARRAY_LABEL, CURTAILING_SUBSYSTEMS, DEVICE_PREFIX, RESERVED_KEYWORDS, SUBHUB_PREFIX,
    },
    error::{
        InternalError, InvalidInputError, ReliabilityError, ReliabilityResultExt, ReportError,
    },
};

use crate::{
    assign::assign_failure_rates,
    graph::{
        builder::build_pool,
        search::{find_all_labels, find_one_label, find_shortest_label, LabelQuery},
        Pool, PoolKey,
    },
};

mod combination;
mod completion;
mod curtailment;
mod report;
mod scenarios;

pub use curtailment::SystemIndex;
pub use report::{MetricsRow, MetricsTable, NodeMetrics, DEFAULT_CURVE_STEP_HOURS};
pub use scenarios::ScenarioMetrics;

/// Reliability network of an array.
#[derive(Debug, Clone)]
pub struct Network {
    database: Arc<ComponentDatabase>,
    k_factors: Option<KFactors>,
    pool: Pool,
    index: Arc<SystemIndex>,
}

impl Network {
    /// Builds the network of a definition. Cable k-factors are taken from its installation
    /// records.
    pub fn new(
        database: impl Into<Arc<ComponentDatabase>>,
        definition: &NetworkDefinition,
    ) -> Result<Self, ReliabilityError> {
        let network = Self::from_sub_networks(
            database,
            definition.electrical.as_ref(),
            definition.moorings.as_ref(),
            definition.user.as_ref(),
        )?;
        Ok(network.with_k_factors(definition.k_factors()))
    }

    /// Builds the network of the given sub-networks. At least one must be supplied and all
    /// supplied sub-networks must describe the same nodes.
    #[tracing::instrument(name = "network_construction", skip_all)]
    pub fn from_sub_networks(
        database: impl Into<Arc<ComponentDatabase>>,
        electrical: Option<&SubNetwork>,
        moorings: Option<&SubNetwork>,
        user: Option<&SubNetwork>,
    ) -> Result<Self, ReliabilityError> {
        debug!("Building reliability network");
        let networks = completion::complete_networks(electrical, moorings, user)?;
        let (hubs, devices) = combination::combine_networks(&networks)?;
        let pool = build_pool(&hubs, &devices)?;
        let index = SystemIndex::new(&pool);
        debug!(
            "Network has {} subhub(s) and {} device(s)",
            index.subhubs.len(),
            index.devices.len()
        );

        Ok(Self {
            database: database.into(),
            k_factors: None,
            pool,
            index: Arc::new(index),
        })
    }

    /// Replaces the cable k-factors applied when failure rates are set.
    pub fn with_k_factors(mut self, k_factors: Option<KFactors>) -> Self {
        self.k_factors = k_factors;
        self
    }

    pub fn k_factors(&self) -> Option<&KFactors> {
        self.k_factors.as_ref()
    }

    /// Returns a copy of the network with the failure rates of the given severity and scenario
    /// assigned. This network is left untouched.
    pub fn set_failure_rates(
        &self,
        severity: Severity,
        scenario: Scenario,
    ) -> Result<Self, ReliabilityError> {
        let mut network = self.clone();
        network.set_failure_rates_in_place(severity, scenario)?;
        Ok(network)
    }

    #[tracing::instrument(name = "failure_rate_assignment", skip(self))]
    pub fn set_failure_rates_in_place(
        &mut self,
        severity: Severity,
        scenario: Scenario,
    ) -> Result<(), ReliabilityError> {
        assign_failure_rates(
            &mut self.pool,
            &self.database,
            severity,
            scenario,
            self.k_factors.as_ref(),
        )
    }

    /// Clears every assigned failure rate.
    pub fn reset(&mut self) {
        self.pool.reset(PoolKey::Array);
    }

    /// Metrics of the array, then of every subhub and every device in name order. Returns `None`
    /// when no failure rate is defined.
    pub fn systems_metrics(&self, time_hours: Option<f64>) -> Option<MetricsTable> {
        let systems = std::iter::once((ARRAY_LABEL, PoolKey::Array))
            .chain(self.index.subhubs.iter().map(|(n, k)| (n.as_str(), *k)))
            .chain(self.index.devices.iter().map(|(n, k)| (n.as_str(), *k)));

        let rows = systems
            .map(|(name, key)| MetricsRow::new(&self.pool, key, name, time_hours))
            .collect();
        MetricsTable::from_rows(time_hours, rows)
    }

    /// Metrics of every occurrence of a subsystem, with the system it belongs to and the devices
    /// its failure cuts off. Returns `None` when the subsystem is not found or has no failure
    /// rate.
    pub fn subsystem_metrics(
        &self,
        name: &str,
        time_hours: Option<f64>,
    ) -> Result<Option<MetricsTable>, ReliabilityError> {
        if let Some(keyword) = RESERVED_KEYWORDS.iter().find(|k| name.contains(**k)) {
            return Err(ReliabilityError::new(
                InvalidInputError::ReservedSubsystemName {
                    name: name.to_string(),
                    keyword: keyword.to_string(),
                },
            ));
        }

        let found = find_all_labels(&self.pool, &LabelQuery::new(name));
        trace!("Subsystem '{name}' found {} time(s)", found.len());

        let mut rows = Vec::with_capacity(found.len());
        for label_match in found {
            let system = lowest_system(&label_match.path)
                .structured(InternalError::Internal("Label path has no system"))?;
            let curtails = if system == ARRAY_LABEL
                || system.contains(SUBHUB_PREFIX)
                || CURTAILING_SUBSYSTEMS.contains(&name)
            {
                self.index
                    .curtails(system)
                    .map(<[String]>::to_vec)
                    .unwrap_or_default()
            } else {
                vec![system.to_string()]
            };

            let mut row = MetricsRow::new(&self.pool, label_match.key, system, time_hours);
            row.curtails = Some(curtails);
            rows.push(row);
        }

        Ok(MetricsTable::from_rows(time_hours, rows))
    }

    /// Resolves a label to a single pool key. When the label occurs several times, the
    /// occurrence with the shortest path is taken if it is unique.
    pub fn find_system_key(&self, name: &str) -> Result<PoolKey, ReliabilityError> {
        let query = LabelQuery::new(name);
        if let Ok(found) = find_one_label(&self.pool, &query) {
            return Ok(found.key);
        }
        find_shortest_label(&self.pool, &query)
            .map(|found| found.key)
            .message(format!("No unique subsystem could be found for '{name}'"))
    }

    /// Metrics view of any node of the pool.
    pub fn node(&self, key: PoolKey) -> Result<NodeMetrics<'_>, ReliabilityError> {
        let node = self.pool.node(key)?;
        Ok(NodeMetrics::new(&self.pool, key, node))
    }

    /// Metrics view of the array.
    pub fn root(&self) -> NodeMetrics<'_> {
        NodeMetrics::new(&self.pool, PoolKey::Array, &self.pool[PoolKey::Array])
    }

    pub fn display(&self) -> String {
        self.root().display()
    }

    /// Number of labelled nodes.
    pub fn len(&self) -> usize {
        self.pool
            .iter()
            .filter(|(_, node)| node.label().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn systems(&self) -> &SystemIndex {
        &self.index
    }

    pub fn database(&self) -> &ComponentDatabase {
        &self.database
    }
}

/// The device, else the subhub, else the array in a label path.
fn lowest_system(path: &[String]) -> Option<&str> {
    [DEVICE_PREFIX, SUBHUB_PREFIX, ARRAY_LABEL]
        .iter()
        .find_map(|system| path.iter().find(|label| label.contains(system)))
        .map(String::as_str)
}
