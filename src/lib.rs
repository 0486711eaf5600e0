//! Reliability metrics of marine energy arrays.
//!
//! An array is described by electrical, moorings and user sub-networks. [`Network`] combines
//! them into a tree of series and parallel links over catalogue components, assigns failure
//! rates from a [`ComponentDatabase`](reliability_api::config::ComponentDatabase) and reports
//! failure rates, MTTF, reliability and risk priority numbers of the array, its subhubs, its
//! devices and any named subsystem.

pub mod assign;
pub mod graph;
pub mod network;

pub use graph::{Pool, PoolKey, ReliabilityNode, RiskRating};
pub use network::{MetricsRow, MetricsTable, Network, NodeMetrics, ScenarioMetrics};
pub use reliability_api::{
    config::{NetworkDefinition, Scenario, Severity},
    error::{ErrorKind, ReliabilityError},
};
