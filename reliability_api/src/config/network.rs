use std::{borrow::Borrow, collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::constants::{DEVICE_PREFIX, DUMMY_COMPONENT, SUBHUB_PREFIX};

/// A nested list of items. A group of two or more groups is a redundant (parallel)
/// arrangement, any other group is a series arrangement.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Nested<T> {
    Item(T),
    Group(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    pub fn as_item(&self) -> Option<&T> {
        match self {
            Nested::Item(item) => Some(item),
            Nested::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&[Nested<T>]> {
        match self {
            Nested::Item(_) => None,
            Nested::Group(group) => Some(group),
        }
    }
}

/// Identifier of a catalogue component or of a node of the array. Integer ids are accepted and
/// stored in their decimal form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "RawComponentId")]
pub struct ComponentId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawComponentId {
    Text(String),
    Integer(i64),
}

impl From<RawComponentId> for ComponentId {
    fn from(raw: RawComponentId) -> Self {
        match raw {
            RawComponentId::Text(s) => ComponentId(s),
            RawComponentId::Integer(i) => ComponentId(i.to_string()),
        }
    }
}

impl ComponentId {
    pub fn dummy() -> Self {
        ComponentId(DUMMY_COMPONENT.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_dummy(&self) -> bool {
        self.0 == DUMMY_COMPONENT
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        ComponentId(s.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        ComponentId(s)
    }
}

impl From<i64> for ComponentId {
    fn from(i: i64) -> Self {
        ComponentId(i.to_string())
    }
}

impl Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Component lists of one system, in the nested list encoding.
pub type SystemComponents = Vec<Nested<ComponentId>>;

/// Systems of one node (array, subhub or device) keyed by system name. Array and subhub records
/// also carry their `layout` here.
pub type NodeSystems = BTreeMap<String, SystemComponents>;

/// Kind of node a hierarchy key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Array,
    Subhub,
    Device,
}

impl NodeKind {
    pub fn of(node: &str) -> Self {
        if node.starts_with(DEVICE_PREFIX) {
            NodeKind::Device
        } else if node.starts_with(SUBHUB_PREFIX) {
            NodeKind::Subhub
        } else {
            NodeKind::Array
        }
    }
}

/// One of the electrical, moorings or user descriptions of the array.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SubNetwork {
    /// Systems of each node, keyed by node id (`array`, `subhubNNN`, `deviceNNN`).
    pub hierarchy: BTreeMap<String, NodeSystems>,

    /// Bill of materials of each node, keyed by node id.
    #[serde(default)]
    pub bill_of_materials: BTreeMap<String, NodeBillOfMaterials>,
}

impl SubNetwork {
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.hierarchy.keys().map(String::as_str)
    }

    /// Markers of the named system of a node, if any were given.
    pub fn markers(&self, node: &str, system: Option<&str>) -> Option<&[Nested<i64>]> {
        let bill = self.bill_of_materials.get(node)?;
        let system_bill = match (bill, system) {
            (NodeBillOfMaterials::System(bill), _) => bill,
            (NodeBillOfMaterials::Systems(bills), Some(system)) => bills.get(system)?,
            (NodeBillOfMaterials::Systems(_), None) => return None,
        };
        if system_bill.marker.is_empty() {
            None
        } else {
            Some(&system_bill.marker)
        }
    }
}

/// Bill of materials of a node. Array and subhub bills are split per system, device bills are
/// flat.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum NodeBillOfMaterials {
    System(SystemBillOfMaterials),
    Systems(BTreeMap<String, SystemBillOfMaterials>),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SystemBillOfMaterials {
    /// Count of each component id.
    #[serde(default)]
    pub quantity: BTreeMap<ComponentId, u32>,

    /// Installation markers, in the same nesting as the system's component lists.
    #[serde(default)]
    pub marker: Vec<Nested<i64>>,
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use maplit::btreemap;

    use super::*;

    #[test]
    fn test_nested_deserialize() {
        let nested: Vec<Nested<ComponentId>> = serde_yaml::from_str("[[1, 2], [dummy, [3]]]").unwrap();
        assert_eq!(
            nested,
            vec![
                Nested::Group(vec![Nested::Item(1.into()), Nested::Item(2.into())]),
                Nested::Group(vec![
                    Nested::Item(ComponentId::dummy()),
                    Nested::Group(vec![Nested::Item("3".into())]),
                ]),
            ]
        );
        assert!(nested[1].as_group().unwrap()[0].as_item().unwrap().is_dummy());
    }

    #[test]
    fn test_sub_network_deserialize() {
        let yaml = indoc! {r#"
            hierarchy:
              array:
                Export cable: [[11]]
                layout: [[device001, device002]]
              device001:
                Elec sub-system: [[12]]
              device002:
                Elec sub-system: [[12]]
            bill_of_materials:
              array:
                Export cable:
                  quantity: {11: 1}
                  marker: [[0]]
              device001:
                quantity: {12: 1}
                marker: [[1]]
        "#};
        let network: SubNetwork = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            network.node_ids().collect::<Vec<_>>(),
            vec!["array", "device001", "device002"]
        );
        assert_eq!(
            network.hierarchy["array"]["layout"],
            vec![Nested::Group(vec![
                Nested::Item("device001".into()),
                Nested::Item("device002".into()),
            ])]
        );
        assert_eq!(
            network.bill_of_materials["device001"],
            NodeBillOfMaterials::System(SystemBillOfMaterials {
                quantity: btreemap! { ComponentId::from(12) => 1 },
                marker: vec![Nested::Group(vec![Nested::Item(1)])],
            })
        );

        assert_eq!(
            network.markers("array", Some("Export cable")),
            Some(&[Nested::Group(vec![Nested::Item(0)])][..])
        );
        assert_eq!(network.markers("array", Some("Substation")), None);
        assert_eq!(network.markers("array", None), None);
        assert!(network.markers("device001", None).is_some());
        assert_eq!(network.markers("device002", None), None);
    }

    #[test]
    fn test_node_kind() {
        assert_eq!(NodeKind::of("array"), NodeKind::Array);
        assert_eq!(NodeKind::of("subhub001"), NodeKind::Subhub);
        assert_eq!(NodeKind::of("device012"), NodeKind::Device);
    }
}
