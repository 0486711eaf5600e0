use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::LENGTH_SCALED_INSTALLATIONS;

/// Installation record of an electrical component, correlated with the bill of materials through
/// its marker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InstallationRecord {
    #[serde(rename = "Marker")]
    pub marker: i64,

    #[serde(rename = "Installation_Type")]
    pub installation_type: String,

    #[serde(rename = "Quantity")]
    pub quantity: f64,
}

impl InstallationRecord {
    /// Array and export cables are quantified in metres and their rates are quoted per kilometre.
    pub fn k_factor(&self) -> f64 {
        if LENGTH_SCALED_INSTALLATIONS.contains(&self.installation_type.as_str()) {
            self.quantity / 1e3
        } else {
            1.0
        }
    }
}

/// Failure rate multipliers keyed by bill of materials marker.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct KFactors(BTreeMap<i64, f64>);

impl KFactors {
    pub fn from_installations(records: &[InstallationRecord]) -> Self {
        let k_factors: Self = records
            .iter()
            .map(|record| (record.marker, record.k_factor()))
            .collect();
        debug!(
            "Derived k-factors for {} installation marker(s)",
            k_factors.len()
        );
        k_factors
    }

    pub fn get(&self, marker: i64) -> Option<f64> {
        self.0.get(&marker).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(i64, f64)> for KFactors {
    fn from_iter<T: IntoIterator<Item = (i64, f64)>>(iter: T) -> Self {
        KFactors(iter.into_iter().collect())
    }
}
