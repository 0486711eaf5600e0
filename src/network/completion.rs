//! Validation and completion of the sub-networks of a definition.
//!
//! Sub-networks that were not supplied are replaced by placeholder networks over the same nodes,
//! so that the combined hierarchy always has electrical, moorings and user systems for every
//! node.

use std::collections::BTreeSet;

use itertools::Itertools;
use log::{debug, trace};

use reliability_api::{
    config::{ComponentId, Nested, NodeKind, NodeSystems, SubNetwork, SystemComponents},
    constants::{
        ARRAY_LABEL, DUMMY_SUBSYSTEM, ELEC_SUBSYSTEM, EXPORT_CABLE, FOUNDATION, LAYOUT_KEY,
        MOORING_SYSTEM, SUBSTATION, SUBSTATION_FOUNDATION, UMBILICAL,
    },
    error::{InvalidInputError, ReliabilityError},
};

/// Electrical, moorings and user networks over the same set of nodes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompleteNetworks {
    pub electrical: SubNetwork,
    pub moorings: SubNetwork,
    pub user: SubNetwork,
}

/// Checks that every supplied network describes the same nodes.
pub(crate) fn check_nodes(networks: &[Option<&SubNetwork>]) -> Result<(), ReliabilityError> {
    let node_sets: Vec<BTreeSet<&str>> = networks
        .iter()
        .flatten()
        .map(|network| network.node_ids().collect())
        .collect();
    if node_sets.len() < 2 {
        return Ok(());
    }

    let union: BTreeSet<&str> = node_sets.iter().flatten().copied().collect();
    let unique = union
        .iter()
        .filter(|node| !node_sets.iter().all(|set| set.contains(*node)))
        .join(", ");

    if unique.is_empty() {
        Ok(())
    } else {
        Err(ReliabilityError::new(InvalidInputError::MismatchedNodes {
            nodes: unique,
        }))
    }
}

fn dummy() -> SystemComponents {
    vec![Nested::Item(ComponentId::dummy())]
}

fn systems(names: &[&str]) -> NodeSystems {
    names.iter().map(|name| (name.to_string(), dummy())).collect()
}

/// Fills in missing sub-networks. Fails if no sub-network was supplied or if the supplied ones
/// disagree on the nodes of the array.
pub(crate) fn complete_networks(
    electrical: Option<&SubNetwork>,
    moorings: Option<&SubNetwork>,
    user: Option<&SubNetwork>,
) -> Result<CompleteNetworks, ReliabilityError> {
    if electrical.is_none() && moorings.is_none() && user.is_none() {
        return Err(ReliabilityError::new(InvalidInputError::NoSubNetworks));
    }
    check_nodes(&[electrical, moorings])?;

    let mut moorings = moorings.cloned();
    let source = match (electrical, moorings.as_mut(), user) {
        (Some(electrical), _, _) => electrical,
        (None, Some(moorings), _) => {
            moorings
                .hierarchy
                .entry(ARRAY_LABEL.to_string())
                .or_insert_with(|| systems(&[SUBSTATION_FOUNDATION]));
            &*moorings
        }
        (None, None, Some(user)) => user,
        (None, None, None) => unreachable!("checked above"),
    };

    let mut nodes: BTreeSet<String> = source.node_ids().map(str::to_string).collect();
    nodes.insert(ARRAY_LABEL.to_string());
    debug!("Completing sub-networks over {} nodes", nodes.len());

    let electrical = match electrical {
        Some(electrical) => electrical.clone(),
        None => {
            trace!("Using placeholder electrical network");
            placeholder_electrical(&nodes)
        }
    };

    let moorings = moorings.unwrap_or_else(|| {
        trace!("Using placeholder moorings network");
        placeholder_moorings(&nodes)
    });

    let mut user = user.cloned().unwrap_or_default();
    for node in &nodes {
        user.hierarchy
            .entry(node.clone())
            .or_insert_with(|| systems(&[DUMMY_SUBSYSTEM]));
    }

    check_nodes(&[Some(&electrical), Some(&moorings), Some(&user)])?;

    Ok(CompleteNetworks {
        electrical,
        moorings,
        user,
    })
}

/// The array feeds every subhub on its own string, or every device on a single string. The first
/// subhub feeds every device.
fn placeholder_electrical(nodes: &BTreeSet<String>) -> SubNetwork {
    let devices: Vec<Nested<ComponentId>> = nodes
        .iter()
        .filter(|node| NodeKind::of(node) == NodeKind::Device)
        .map(|node| Nested::Item(node.as_str().into()))
        .collect();
    let subhubs: Vec<Nested<ComponentId>> = nodes
        .iter()
        .filter(|node| NodeKind::of(node) == NodeKind::Subhub)
        .map(|node| Nested::Group(vec![Nested::Item(node.as_str().into())]))
        .collect();

    let mut network = SubNetwork::default();
    let mut unassigned = Some(devices.clone());
    for node in nodes {
        let record = match NodeKind::of(node) {
            NodeKind::Array => {
                let mut record = systems(&[EXPORT_CABLE, SUBSTATION]);
                let layout = if subhubs.is_empty() {
                    vec![Nested::Group(devices.clone())]
                } else {
                    subhubs.clone()
                };
                record.insert(LAYOUT_KEY.to_string(), layout);
                record
            }
            NodeKind::Subhub => {
                let mut record = systems(&[ELEC_SUBSYSTEM, SUBSTATION]);
                let layout = vec![Nested::Group(unassigned.take().unwrap_or_default())];
                record.insert(LAYOUT_KEY.to_string(), layout);
                record
            }
            NodeKind::Device => systems(&[ELEC_SUBSYSTEM]),
        };
        network.hierarchy.insert(node.clone(), record);
    }
    network
}

fn placeholder_moorings(nodes: &BTreeSet<String>) -> SubNetwork {
    let mut network = SubNetwork::default();
    for node in nodes {
        let record = match NodeKind::of(node) {
            NodeKind::Array | NodeKind::Subhub => systems(&[SUBSTATION_FOUNDATION]),
            NodeKind::Device => systems(&[UMBILICAL, MOORING_SYSTEM, FOUNDATION]),
        };
        network.hierarchy.insert(node.clone(), record);
    }
    network
}
