use std::{collections::BTreeMap, path::Path};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    config::{ComponentId, Scenario, Severity},
    error::{InvalidInputError, ReliabilityError, ReportError},
};

/// Catalogue of component failure rates, keyed by component id.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct ComponentDatabase {
    components: BTreeMap<ComponentId, ComponentRecord>,
}

/// Catalogue entry of a single component. Fields other than the failure rates are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ComponentRecord {
    #[serde(rename = "item10")]
    pub failure_rates: FailureRates,
}

/// `[lower, mean, upper]` failure rates in failures per 10^6 hours.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FailureRates {
    #[serde(rename = "failratecrit")]
    pub critical: [f64; 3],

    #[serde(rename = "failratenoncrit")]
    pub non_critical: [f64; 3],
}

impl FailureRates {
    pub fn new(critical: [f64; 3], non_critical: [f64; 3]) -> Self {
        Self {
            critical,
            non_critical,
        }
    }

    pub fn table(&self, severity: Severity) -> &[f64; 3] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::NonCritical => &self.non_critical,
        }
    }

    /// Returns the rate for the given severity and scenario if it is set (greater than zero).
    pub fn rate(&self, severity: Severity, scenario: Scenario) -> Option<f64> {
        let rate = self.table(severity)[scenario.index()];
        (rate > 0.0).then_some(rate)
    }
}

impl ComponentDatabase {
    pub fn from_yaml_str(contents: &str) -> Result<Self, ReliabilityError> {
        let database: Self = serde_yaml::from_str(contents)
            .structured(InvalidInputError::ParseComponentDatabase)?;
        trace!("Parsed {} component record(s)", database.len());
        Ok(database)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReliabilityError> {
        debug!(
            "Loading component database from '{}'",
            path.as_ref().display()
        );
        let contents = std::fs::read_to_string(path.as_ref()).structured(
            InvalidInputError::LoadComponentDatabase {
                path: path.as_ref().display().to_string(),
            },
        )?;
        Self::from_yaml_str(&contents)
    }

    pub fn get(&self, id: &str) -> Option<&ComponentRecord> {
        self.components.get(id)
    }

    pub fn insert(&mut self, id: impl Into<ComponentId>, failure_rates: FailureRates) {
        self.components
            .insert(id.into(), ComponentRecord { failure_rates });
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<I: Into<ComponentId>> FromIterator<(I, FailureRates)> for ComponentDatabase {
    fn from_iter<T: IntoIterator<Item = (I, FailureRates)>>(iter: T) -> Self {
        let mut database = ComponentDatabase::default();
        for (id, rates) in iter {
            database.insert(id, rates);
        }
        database
    }
}
