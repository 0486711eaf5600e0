use std::collections::BTreeMap;

use reliability_api::config::{ComponentId, Nested};

use super::sequence::Placeholder;

/// Component list entry together with its bill of materials marker.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSpec {
    pub id: ComponentId,
    pub marker: Option<i64>,
}

impl ComponentSpec {
    pub fn new(id: impl Into<ComponentId>, marker: Option<i64>) -> Self {
        Self {
            id: id.into(),
            marker,
        }
    }
}

impl Placeholder for ComponentSpec {
    fn is_placeholder(&self) -> bool {
        self.id.is_dummy()
    }
}

/// Component lists in the nested list encoding.
pub type ComponentTree = Vec<Nested<ComponentSpec>>;

/// Systems and layout of the array or of a subhub.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HubRecord {
    pub systems: BTreeMap<String, ComponentTree>,

    /// Devices and subhubs fed by this hub.
    pub layout: Vec<Nested<ComponentId>>,
}

/// Subsystem of a device.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemTree {
    /// Components of the subsystem.
    Components(ComponentTree),

    /// Named subsystems in series.
    Systems(Vec<(String, SystemTree)>),

    /// Redundant branches, each made of named subsystems in series.
    Redundant(Vec<Vec<(String, SystemTree)>>),
}

/// Array and subhub records keyed by node id.
pub type ArrayHierarchy = BTreeMap<String, HubRecord>;

/// Subsystems of each device, in wiring order, keyed by device id.
pub type DeviceHierarchy = BTreeMap<String, Vec<(String, SystemTree)>>;
