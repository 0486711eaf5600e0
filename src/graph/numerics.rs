//! Closed-form reliability laws for exponential failure distributions.

use itertools::Itertools;
use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};

use reliability_api::{config::Severity, constants::HOURS_PER_YEAR};

/// Equivalent MTTF of independent exponential branches arranged in parallel, following the
/// inclusion-exclusion formulation of Elsayed (2012).
///
/// Subsets of size k contribute the sum of the reciprocals of their summed rates, with a positive
/// sign for odd k and a negative sign for even k. The reciprocal of the k = 1 term, signed by the
/// parity of n, is added at the end.
///
/// Returns `None` when `rates` is empty.
pub fn binomial(rates: &[f64]) -> Option<f64> {
    let n = rates.len();
    if n == 0 {
        return None;
    }

    let terms: Vec<f64> = (1..=n)
        .map(|k| {
            let term: f64 = rates
                .iter()
                .combinations(k)
                .map(|subset| subset.into_iter().sum::<f64>().recip())
                .sum();
            if k % 2 == 0 {
                -term
            } else {
                term
            }
        })
        .collect();

    let sign = if n % 2 == 1 { 1.0 } else { -1.0 };
    Some(terms.iter().sum::<f64>() + sign * terms[0].recip())
}

/// Probability of surviving `time_hours` at a constant hourly failure rate.
pub fn reliability(failure_rate: f64, time_hours: f64) -> f64 {
    (-failure_rate * time_hours).exp()
}

/// Probability of failing within one year, in percent.
pub fn annual_failure_probability(failure_rate: f64) -> f64 {
    100.0 * (1.0 - reliability(failure_rate, HOURS_PER_YEAR))
}

/// Frequency class (0 to 5) of an hourly failure rate.
pub fn frequency_class(failure_rate: f64) -> u8 {
    let probability = annual_failure_probability(failure_rate);
    match probability {
        p if p < 0.01 => 0,
        p if p < 0.1 => 1,
        p if p < 1.0 => 2,
        p if p < 10.0 => 3,
        p if p < 50.0 => 4,
        _ => 5,
    }
}

/// Risk priority number of an hourly failure rate.
pub fn rpn(failure_rate: f64, severity: Severity) -> u8 {
    frequency_class(failure_rate) * severity.weight()
}

/// Colour band of a risk priority number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, IntoStaticStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskRating {
    Green,
    Yellow,
    Orange,
    Red,
}

impl From<u8> for RiskRating {
    fn from(rpn: u8) -> Self {
        match rpn {
            0..=2 => RiskRating::Green,
            3..=4 => RiskRating::Yellow,
            5..=7 => RiskRating::Orange,
            _ => RiskRating::Red,
        }
    }
}
