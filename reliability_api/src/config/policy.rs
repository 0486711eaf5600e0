use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::error::{InvalidInputError, ReliabilityError};

/// Severity of a failure, selecting the failure rate table of a component and weighting its RPN.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    #[default]
    Critical,
    #[serde(alias = "non-critical")]
    NonCritical,
}

impl Severity {
    /// The other severity, used when the requested table holds no data.
    pub fn other(self) -> Self {
        match self {
            Severity::Critical => Severity::NonCritical,
            Severity::NonCritical => Severity::Critical,
        }
    }

    /// RPN multiplier.
    pub fn weight(self) -> u8 {
        match self {
            Severity::Critical => 2,
            Severity::NonCritical => 1,
        }
    }
}

impl TryFrom<&str> for Severity {
    type Error = ReliabilityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "critical" => Ok(Severity::Critical),
            "noncritical" | "non-critical" => Ok(Severity::NonCritical),
            _ => Err(ReliabilityError::new(
                InvalidInputError::UnknownSeverityLevel {
                    value: value.to_string(),
                },
            )),
        }
    }
}

/// Confidence scenario, indexing the `[lower, mean, upper]` failure rate tables.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Scenario {
    Lower,
    #[default]
    Mean,
    Upper,
}

impl Scenario {
    pub fn index(self) -> usize {
        match self {
            Scenario::Lower => 0,
            Scenario::Mean => 1,
            Scenario::Upper => 2,
        }
    }
}

impl TryFrom<&str> for Scenario {
    type Error = ReliabilityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "lower" => Ok(Scenario::Lower),
            "mean" => Ok(Scenario::Mean),
            "upper" => Ok(Scenario::Upper),
            _ => Err(ReliabilityError::new(InvalidInputError::UnknownScenario {
                value: value.to_string(),
            })),
        }
    }
}
