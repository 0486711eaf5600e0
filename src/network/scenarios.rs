//! Evaluation of every severity and confidence scenario of a network.

use itertools::Itertools;
use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use strum::IntoEnumIterator;

use reliability_api::{
    config::{Scenario, Severity},
    error::{ReliabilityError, ReliabilityResultExt},
};

use super::Network;

/// Array metrics under one severity and confidence scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScenarioMetrics {
    pub severity: Severity,
    pub scenario: Scenario,

    /// Failures per hour.
    pub failure_rate: Option<f64>,
    pub mttf: Option<f64>,

    /// Reliability at the mission time.
    pub reliability: Option<f64>,
}

impl Network {
    /// Evaluates the array under every severity and scenario. Each evaluation works on its own
    /// copy of the pool; rows are ordered by severity, then scenario.
    #[tracing::instrument(name = "scenario_evaluation", skip(self))]
    pub fn scenario_table(
        &self,
        mission_time_hours: f64,
    ) -> Result<Vec<ScenarioMetrics>, ReliabilityError> {
        let cases: Vec<(Severity, Scenario)> = Severity::iter()
            .cartesian_product(Scenario::iter())
            .collect();
        debug!("Evaluating {} failure rate scenarios", cases.len());

        cases
            .par_iter()
            .map(|(severity, scenario)| {
                let network = self
                    .set_failure_rates(*severity, *scenario)
                    .message(format!(
                        "Failed to evaluate {severity} failure rates for the {scenario} scenario"
                    ))?;
                let array = network.root();
                Ok(ScenarioMetrics {
                    severity: *severity,
                    scenario: *scenario,
                    failure_rate: array.failure_rate(),
                    mttf: array.mttf(),
                    reliability: array.reliability(mission_time_hours),
                })
            })
            .collect()
    }
}
