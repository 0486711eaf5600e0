//! Merging of the completed sub-networks into the array and device hierarchies consumed by the
//! pool builder.

use std::collections::BTreeMap;

use log::{trace, warn};

use reliability_api::{
    config::{ComponentId, Nested, NodeKind, NodeSystems, SubNetwork, SystemComponents},
    constants::{
        ELECTRICAL_GROUP, ELEC_SUBSYSTEM, EXPORT_CABLE, FOUNDATION, LAYOUT_KEY, MOORINGS_GROUP,
        MOORING_LINES, MOORING_SYSTEM, STATION_KEEPING, SUBSTATION, SUBSTATION_FOUNDATION,
        UMBILICAL, USER_GROUP,
    },
    error::{InvalidInputError, ReliabilityError, ReportError},
};

use crate::graph::builder::{
    ArrayHierarchy, ComponentSpec, ComponentTree, DeviceHierarchy, HubRecord, SystemTree,
};

use super::completion::CompleteNetworks;

/// Hub systems whose components carry installation markers.
const MARKED_HUB_SYSTEMS: [&str; 2] = [EXPORT_CABLE, ELEC_SUBSYSTEM];

/// Builds the array and device hierarchies from completed sub-networks.
pub(crate) fn combine_networks(
    networks: &CompleteNetworks,
) -> Result<(ArrayHierarchy, DeviceHierarchy), ReliabilityError> {
    let mut hubs = ArrayHierarchy::new();
    let mut devices = DeviceHierarchy::new();

    for (node, electrical) in &networks.electrical.hierarchy {
        match NodeKind::of(node) {
            NodeKind::Array | NodeKind::Subhub => {
                let record = combine_hub(node, electrical, networks)?;
                hubs.insert(node.clone(), record);
            }
            NodeKind::Device => {
                let systems = combine_device(node, electrical, networks)?;
                devices.insert(node.clone(), systems);
            }
        }
    }

    trace!(
        "Combined {} hub(s) and {} device(s)",
        hubs.len(),
        devices.len()
    );
    Ok((hubs, devices))
}

fn combine_hub(
    node: &str,
    electrical: &NodeSystems,
    networks: &CompleteNetworks,
) -> Result<HubRecord, ReliabilityError> {
    let mut record = HubRecord::default();

    for (system, components) in electrical {
        if system == LAYOUT_KEY {
            record.layout = components.clone();
            continue;
        }
        let markers = MARKED_HUB_SYSTEMS
            .contains(&system.as_str())
            .then(|| networks.electrical.markers(node, Some(system)))
            .flatten();
        let tree = with_markers(node, system, components, markers)?;
        record.systems.insert(system.clone(), tree);
    }

    let foundations = networks
        .moorings
        .hierarchy
        .get(node)
        .and_then(|systems| systems.get(SUBSTATION_FOUNDATION));
    if let Some(foundations) = foundations {
        record
            .systems
            .entry(SUBSTATION.to_string())
            .or_default()
            .extend(foundations.iter().map(unmarked));
    }

    Ok(record)
}

fn combine_device(
    node: &str,
    electrical: &NodeSystems,
    networks: &CompleteNetworks,
) -> Result<Vec<(String, SystemTree)>, ReliabilityError> {
    let moorings = networks
        .moorings
        .hierarchy
        .get(node)
        .map(station_keeping)
        .unwrap_or_default();

    let mut electrical_systems = Vec::with_capacity(electrical.len());
    for (system, components) in electrical {
        let markers = (system == ELEC_SUBSYSTEM)
            .then(|| networks.electrical.markers(node, None))
            .flatten();
        let tree = with_markers(node, system, components, markers)?;
        electrical_systems.push((system.clone(), SystemTree::Components(tree)));
    }

    let user: Vec<(String, SystemTree)> = networks
        .user
        .hierarchy
        .get(node)
        .map(|systems| {
            systems
                .iter()
                .map(|(name, components)| (name.clone(), plain(components)))
                .collect()
        })
        .unwrap_or_default();

    Ok(vec![
        (MOORINGS_GROUP.to_string(), SystemTree::Systems(moorings)),
        (
            ELECTRICAL_GROUP.to_string(),
            SystemTree::Systems(electrical_systems),
        ),
        (USER_GROUP.to_string(), SystemTree::Systems(user)),
    ])
}

/// Replaces the mooring lines and foundations of a device with a `Station keeping` system. Each
/// mooring line and its foundation form one redundant branch; a device without mooring lines
/// keeps its foundations in series.
fn station_keeping(systems: &NodeSystems) -> Vec<(String, SystemTree)> {
    let empty = SystemComponents::new();
    let lines = systems.get(MOORING_SYSTEM).unwrap_or(&empty);
    let foundations = systems.get(FOUNDATION).unwrap_or(&empty);

    let keeping = if lines.is_empty() {
        SystemTree::Systems(vec![(FOUNDATION.to_string(), plain(foundations))])
    } else if is_dummy(lines) {
        plain(lines)
    } else {
        let branches = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let mut branch = vec![(
                    MOORING_LINES.to_string(),
                    SystemTree::Components(vec![unmarked(line)]),
                )];
                if !is_dummy(foundations) {
                    match foundations.get(i) {
                        Some(foundation) => branch.push((
                            FOUNDATION.to_string(),
                            SystemTree::Components(vec![unmarked(foundation)]),
                        )),
                        None => warn!("Mooring line {i} has no foundation"),
                    }
                }
                branch
            })
            .collect();
        SystemTree::Redundant(branches)
    };

    let mut combined: BTreeMap<String, SystemTree> = systems
        .iter()
        .filter(|(name, components)| {
            let name = name.as_str();
            name != MOORING_SYSTEM
                && name != FOUNDATION
                && !(name == UMBILICAL && components.is_empty())
        })
        .map(|(name, components)| (name.clone(), plain(components)))
        .collect();
    combined.insert(STATION_KEEPING.to_string(), keeping);
    combined.into_iter().collect()
}

fn is_dummy(components: &SystemComponents) -> bool {
    matches!(components.as_slice(), [Nested::Item(id)] if id.is_dummy())
}

fn unmarked(item: &Nested<ComponentId>) -> Nested<ComponentSpec> {
    match item {
        Nested::Item(id) => Nested::Item(ComponentSpec::new(id.clone(), None)),
        Nested::Group(group) => Nested::Group(group.iter().map(unmarked).collect()),
    }
}

fn plain(components: &SystemComponents) -> SystemTree {
    SystemTree::Components(components.iter().map(unmarked).collect())
}

/// Pairs every component with the marker at the same position of the bill of materials.
fn with_markers(
    node: &str,
    system: &str,
    components: &SystemComponents,
    markers: Option<&[Nested<i64>]>,
) -> Result<ComponentTree, ReliabilityError> {
    let Some(markers) = markers else {
        return Ok(components.iter().map(unmarked).collect());
    };
    zip_markers(components, markers).structured(InvalidInputError::MarkerShapeMismatch {
        node: node.to_string(),
        system: system.to_string(),
    })
}

fn zip_markers(components: &[Nested<ComponentId>], markers: &[Nested<i64>]) -> Option<ComponentTree> {
    if components.len() != markers.len() {
        return None;
    }
    components
        .iter()
        .zip(markers)
        .map(|(component, marker)| match (component, marker) {
            (Nested::Item(id), Nested::Item(marker)) => {
                Some(Nested::Item(ComponentSpec::new(id.clone(), Some(*marker))))
            }
            (Nested::Group(components), Nested::Group(markers)) => {
                zip_markers(components, markers).map(Nested::Group)
            }
            _ => None,
        })
        .collect()
}
