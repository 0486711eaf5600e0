//! # Reliability graph
//!
//! A reliability tree is stored in a [`Pool`]: an arena of [`ReliabilityNode`]s that refer to
//! their children by [`PoolKey`]. Series links fail when any child fails, parallel links when all
//! of them have, and components carry the failure rates assigned from the catalogue.
//!
//! ## Layout
//!
//! ```text
//! src/graph
//! ├── builder --------> # Builds a pool from array and device hierarchies.
//! │   ├── mod.rs -----> # build_pool() and the hub/device/subsystem rules.
//! │   ├── hierarchy.rs  # Builder input types.
//! │   └── sequence.rs # Nested list encoding and placeholder stripping.
//! ├── display.rs -----> # Text rendering of trees.
//! ├── metrics.rs -----> # Recursive metric propagation.
//! ├── mod.rs ---------> # This file.
//! ├── node.rs --------> # ReliabilityNode and its variants.
//! ├── numerics.rs ----> # Redundancy law, reliability and RPN.
//! ├── pool.rs --------> # Pool and PoolKey.
//! └── search.rs ------> # Label search and device strings.
//! ```

pub mod builder;
pub mod display;
pub mod metrics;
pub mod node;
pub mod numerics;
pub mod pool;
pub mod search;

#[cfg(test)]
pub(crate) mod test_utils;

pub use node::{Component, Link, ReliabilityNode};
pub use numerics::RiskRating;
pub use pool::{Pool, PoolKey};
