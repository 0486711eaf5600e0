//! Input schema of a reliability assessment.
//!
//! A network definition is made of up to three independent descriptions of the same array:
//!
//! ```text
//! electrical:                 moorings:                    user:
//!   hierarchy:                  hierarchy:                   hierarchy:
//!     array:                      array:                       device001:
//!       Export cable: [[..]]        Substation foundation:       Pto: [[..]]
//!       Substation: [[..]]        device001:
//!       layout: [[device001]]       Umbilical: [[..]]
//!     device001:                    Mooring system: [[..], [..]]
//!       Elec sub-system: [[..]]     Foundation: [[..], [..]]
//!   bill_of_materials: ..
//! installations:
//!   - {Marker: 0, Installation_Type: export, Quantity: 2500.0}
//! ```
//!
//! Component lists use the nested list encoding of [`Nested`]. The component failure rates live
//! in a separate [`ComponentDatabase`].

use std::path::Path;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{InvalidInputError, ReliabilityError, ReportError};

mod database;
mod installation;
mod network;
mod policy;

pub use database::{ComponentDatabase, ComponentRecord, FailureRates};
pub use installation::{InstallationRecord, KFactors};
pub use network::{
    ComponentId, Nested, NodeBillOfMaterials, NodeKind, NodeSystems, SubNetwork,
    SystemBillOfMaterials, SystemComponents,
};
pub use policy::{Scenario, Severity};

/// Sub-networks of an array and the installation records of its cables.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NetworkDefinition {
    #[serde(default)]
    pub electrical: Option<SubNetwork>,

    #[serde(default)]
    pub moorings: Option<SubNetwork>,

    #[serde(default)]
    pub user: Option<SubNetwork>,

    #[serde(default)]
    pub installations: Vec<InstallationRecord>,
}

impl NetworkDefinition {
    pub fn from_yaml_str(contents: &str) -> Result<Self, ReliabilityError> {
        serde_yaml::from_str(contents).structured(InvalidInputError::ParseNetworkDefinition)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReliabilityError> {
        debug!(
            "Loading network definition from '{}'",
            path.as_ref().display()
        );
        let contents = std::fs::read_to_string(path.as_ref()).structured(
            InvalidInputError::LoadNetworkDefinition {
                path: path.as_ref().display().to_string(),
            },
        )?;
        Self::from_yaml_str(&contents)
    }

    /// Cable k-factors derived from the installation records, if any were given.
    pub fn k_factors(&self) -> Option<KFactors> {
        if self.installations.is_empty() {
            trace!("No installation records, cable rates are not scaled");
            None
        } else {
            Some(KFactors::from_installations(&self.installations))
        }
    }
}
