//! # Reliability pool builder
//!
//! Turns the merged array and device hierarchies into a pool of reliability nodes:
//!
//! - The root is a series link labelled `array` holding the `Export cable` and `Substation`
//!   systems followed by the array layout.
//! - A layout lists the devices and subhubs fed by a hub in the nested list encoding (see
//!   `sequence`). Every subhub becomes a labelled series link holding its `Elec sub-system` and
//!   `Substation` systems followed by its own layout.
//! - Every device becomes a labelled series link holding its subsystems.
//!
//! Placeholder components are stripped before anything is inserted; a system left empty is
//! omitted from the tree, while device and subhub links are always present. A layout referring
//! to a node missing from the hierarchies is an error.

use std::collections::BTreeSet;

use log::{debug, trace};

use reliability_api::{
    config::{ComponentId, Nested},
    constants::{ARRAY_LABEL, ARRAY_SYSTEMS, SUBHUB_PREFIX, SUBHUB_SYSTEMS},
    error::{InvalidInputError, ReliabilityError, ReportError},
};

use super::{
    node::ReliabilityNode,
    pool::{Pool, PoolKey},
};

mod hierarchy;
mod sequence;

pub use hierarchy::{
    ArrayHierarchy, ComponentSpec, ComponentTree, DeviceHierarchy, HubRecord, SystemTree,
};
use sequence::{build_sequence, strip_dummy};

/// Builds the reliability pool of an array.
pub fn build_pool(
    hubs: &ArrayHierarchy,
    devices: &DeviceHierarchy,
) -> Result<Pool, ReliabilityError> {
    debug!("Building reliability pool");
    let array = hubs
        .get(ARRAY_LABEL)
        .structured(InvalidInputError::MissingNode {
            node: ARRAY_LABEL.into(),
        })?;

    let builder = PoolBuilder { hubs, devices };
    let mut pool = Pool::new();
    let children = builder.build_hub(
        ARRAY_LABEL,
        array,
        &ARRAY_SYSTEMS,
        &mut BTreeSet::new(),
        &mut pool,
    )?;
    pool.insert_root(ReliabilityNode::new_serial(Some(ARRAY_LABEL), children));

    debug!("Reliability pool built with {} nodes", pool.len());
    trace!(
        "Built reliability tree:\n{}",
        pool[PoolKey::Array].display(&pool)
    );
    Ok(pool)
}

struct PoolBuilder<'a> {
    hubs: &'a ArrayHierarchy,
    devices: &'a DeviceHierarchy,
}

impl PoolBuilder<'_> {
    /// Builds the systems of a hub followed by its layout. `visiting` holds the hubs whose
    /// layout is being built.
    fn build_hub(
        &self,
        name: &str,
        record: &HubRecord,
        systems: &[&str],
        visiting: &mut BTreeSet<String>,
        pool: &mut Pool,
    ) -> Result<Vec<PoolKey>, ReliabilityError> {
        if !visiting.insert(name.to_string()) {
            return Err(ReliabilityError::new(InvalidInputError::CyclicLayout {
                node: name.to_string(),
            }));
        }

        let mut children = Vec::new();
        for system in systems {
            let Some(components) = record.systems.get(*system) else {
                trace!("Hub '{name}' has no '{system}' system");
                continue;
            };
            if let Some(key) = build_system(system, components, pool)? {
                children.push(key);
            }
        }

        trace!("Building layout of '{name}'");
        children.extend(build_sequence(
            &record.layout,
            pool,
            &mut |node: &ComponentId, pool: &mut Pool| {
                self.build_layout_node(name, node, visiting, pool)
            },
        )?);

        visiting.remove(name);
        Ok(children)
    }

    fn build_layout_node(
        &self,
        parent: &str,
        node: &ComponentId,
        visiting: &mut BTreeSet<String>,
        pool: &mut Pool,
    ) -> Result<PoolKey, ReliabilityError> {
        let node = node.as_str();
        let unknown = || InvalidInputError::UnknownLayoutNode {
            parent: parent.to_string(),
            node: node.to_string(),
        };

        let children = if node.contains(SUBHUB_PREFIX) {
            trace!("Building subhub '{node}'");
            let record = self.hubs.get(node).structured(unknown())?;
            self.build_hub(node, record, &SUBHUB_SYSTEMS, visiting, pool)?
        } else {
            trace!("Building device '{node}'");
            let systems = self.devices.get(node).structured(unknown())?;
            build_subsystems(systems, pool)?
        };

        Ok(pool.insert(ReliabilityNode::new_serial(Some(node), children)))
    }
}

/// Builds a labelled series link over a component list. Returns `None` if only placeholders
/// were given.
fn build_system(
    label: &str,
    components: &ComponentTree,
    pool: &mut Pool,
) -> Result<Option<PoolKey>, ReliabilityError> {
    let Some(components) = strip_dummy(components) else {
        trace!("System '{label}' has no components");
        return Ok(None);
    };

    let children = build_sequence(
        &components,
        pool,
        &mut |spec: &ComponentSpec, pool: &mut Pool| {
            Ok(pool.insert(ReliabilityNode::new_component(
                spec.id.as_str(),
                spec.marker,
            )))
        },
    )?;
    Ok(Some(pool.insert(ReliabilityNode::new_serial(
        Some(label),
        children,
    ))))
}

/// Builds the named subsystems of a device or of a subsystem group, skipping empty ones.
fn build_subsystems(
    systems: &[(String, SystemTree)],
    pool: &mut Pool,
) -> Result<Vec<PoolKey>, ReliabilityError> {
    let mut keys = Vec::with_capacity(systems.len());
    for (label, tree) in systems {
        let key = match tree {
            SystemTree::Components(components) => build_system(label, components, pool)?,
            SystemTree::Systems(subsystems) => {
                let children = build_subsystems(subsystems, pool)?;
                (!children.is_empty())
                    .then(|| pool.insert(ReliabilityNode::new_serial(Some(label), children)))
            }
            SystemTree::Redundant(branches) => {
                let mut branch_keys = Vec::with_capacity(branches.len());
                for branch in branches {
                    let children = build_subsystems(branch, pool)?;
                    if !children.is_empty() {
                        branch_keys.push(
                            pool.insert(ReliabilityNode::new_serial(None::<String>, children)),
                        );
                    }
                }
                if branch_keys.is_empty() {
                    None
                } else {
                    let parallel =
                        pool.insert(ReliabilityNode::new_parallel(None::<String>, branch_keys));
                    Some(pool.insert(ReliabilityNode::new_serial(Some(label), vec![parallel])))
                }
            }
        };

        match key {
            Some(key) => keys.push(key),
            None => trace!("Skipping empty subsystem '{label}'"),
        }
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;

    use reliability_api::error::ErrorKind;

    use crate::graph::search::{find_all_labels, find_one_label, LabelQuery};

    use super::*;

    fn comps(ids: &[&[&str]]) -> ComponentTree {
        ids.iter()
            .map(|group| {
                Nested::Group(
                    group
                        .iter()
                        .map(|id| Nested::Item(ComponentSpec::new(*id, None)))
                        .collect(),
                )
            })
            .collect()
    }

    fn layout(strings: &[&[&str]]) -> Vec<Nested<ComponentId>> {
        strings
            .iter()
            .map(|string| {
                Nested::Group(string.iter().map(|id| Nested::Item((*id).into())).collect())
            })
            .collect()
    }

    fn hub(systems: &[(&str, ComponentTree)], strings: &[&[&str]]) -> HubRecord {
        HubRecord {
            systems: systems
                .iter()
                .map(|(name, tree)| (name.to_string(), tree.clone()))
                .collect(),
            layout: layout(strings),
        }
    }

    fn device(elec: &[&[&str]]) -> Vec<(String, SystemTree)> {
        vec![(
            "Array elec sub-system".to_string(),
            SystemTree::Systems(vec![(
                "Elec sub-system".to_string(),
                SystemTree::Components(comps(elec)),
            )]),
        )]
    }

    fn set_rates(pool: &mut Pool, rate: f64) {
        for (_, node) in pool.iter_mut() {
            if let Some(component) = node.as_component_mut() {
                component.set_failure_rate(rate);
            }
        }
    }

    #[test]
    fn test_build_single_device() {
        let hubs = btreemap! {
            "array".to_string() => hub(
                &[("Export cable", comps(&[&["id1"]])), ("Substation", comps(&[&["id2"]]))],
                &[&["device001"]],
            ),
        };
        let devices = btreemap! { "device001".to_string() => device(&[&["id3"]]) };

        let mut pool = build_pool(&hubs, &devices).unwrap();
        let root = &pool[PoolKey::Array];
        let children: Vec<String> = root.children().iter().map(|k| pool[*k].describe()).collect();
        assert_eq!(
            children,
            vec!["serial 'Export cable'", "serial 'Substation'", "serial 'device001'"]
        );

        set_rates(&mut pool, 5.0);
        let root = &pool[PoolKey::Array];
        let rate = root.failure_rate(&pool).unwrap();
        assert!((rate - 15e-6).abs() < 1e-15);
        assert!((root.mttf(&pool).unwrap() - 66_666.666_666).abs() < 1e-3);
    }

    #[test]
    fn test_build_parallel_strings() {
        let hubs = btreemap! {
            "array".to_string() => hub(&[], &[&["device001", "device002"], &["device003"]]),
        };
        let devices = btreemap! {
            "device001".to_string() => device(&[&["a"]]),
            "device002".to_string() => device(&[&["b"]]),
            "device003".to_string() => device(&[&["c"]]),
        };

        let pool = build_pool(&hubs, &devices).unwrap();
        let root = &pool[PoolKey::Array];
        assert_eq!(root.children().len(), 1);
        let parallel = &pool[root.children()[0]];
        assert_eq!(parallel.describe(), "parallel (unlabeled)");
        assert_eq!(parallel.children().len(), 2);

        let device = find_one_label(&pool, &LabelQuery::new("device002")).unwrap();
        assert_eq!(device.path, vec!["array", "device002"]);
        let component = find_one_label(&pool, &LabelQuery::new("b")).unwrap();
        assert_eq!(
            component.path,
            vec!["array", "device002", "Array elec sub-system", "Elec sub-system", "b"]
        );
    }

    #[test]
    fn test_build_subhubs() {
        let hubs = btreemap! {
            "array".to_string() => hub(
                &[("Export cable", comps(&[&["x"]]))],
                &[&["subhub001"], &["subhub002"]],
            ),
            "subhub001".to_string() => hub(
                &[("Elec sub-system", comps(&[&["e"]])), ("Substation", comps(&[&["dummy"]]))],
                &[&["device001", "device002"]],
            ),
            "subhub002".to_string() => hub(&[], &[&["device003"]]),
        };
        let devices = btreemap! {
            "device001".to_string() => device(&[&["a"]]),
            "device002".to_string() => device(&[&["b"]]),
            "device003".to_string() => device(&[&["c"]]),
        };

        let pool = build_pool(&hubs, &devices).unwrap();
        let subhub = find_one_label(&pool, &LabelQuery::new("subhub001")).unwrap();
        let children: Vec<String> = pool[subhub.key]
            .children()
            .iter()
            .map(|k| pool[*k].describe())
            .collect();
        // The placeholder substation is omitted
        assert_eq!(
            children,
            vec!["serial 'Elec sub-system'", "serial 'device001'", "serial 'device002'"]
        );

        let devices = find_all_labels(&pool, &LabelQuery::new("device").partial());
        let paths: Vec<Vec<String>> = devices.into_iter().map(|m| m.path).collect();
        assert_eq!(
            paths,
            vec![
                vec!["array", "subhub001", "device001"],
                vec!["array", "subhub001", "device002"],
                vec!["array", "subhub002", "device003"],
            ]
        );
    }

    #[test]
    fn test_build_shared_subhub_is_not_a_cycle() {
        // subhub003 is reached through both subhub001 and subhub002
        let hubs = btreemap! {
            "array".to_string() => hub(&[], &[&["subhub001"], &["subhub002"]]),
            "subhub001".to_string() => hub(&[], &[&["subhub003"]]),
            "subhub002".to_string() => hub(&[], &[&["subhub003"]]),
            "subhub003".to_string() => hub(&[], &[&["device001"]]),
        };
        let devices = btreemap! { "device001".to_string() => device(&[&["a"]]) };

        let pool = build_pool(&hubs, &devices).unwrap();
        let devices = find_all_labels(&pool, &LabelQuery::new("device001"));
        let paths: Vec<Vec<String>> = devices.into_iter().map(|m| m.path).collect();
        assert_eq!(
            paths,
            vec![
                vec!["array", "subhub001", "subhub003", "device001"],
                vec!["array", "subhub002", "subhub003", "device001"],
            ]
        );
    }

    #[test]
    fn test_build_redundant_subsystems() {
        let hubs = btreemap! { "array".to_string() => hub(&[], &[&["device001"]]) };
        let line = |id: &str| {
            vec![
                (
                    "Moorings lines".to_string(),
                    SystemTree::Components(comps(&[&[id]])),
                ),
                (
                    "Foundation".to_string(),
                    SystemTree::Components(comps(&[&["dummy"]])),
                ),
            ]
        };
        let devices = btreemap! {
            "device001".to_string() => vec![(
                "M&F sub-system".to_string(),
                SystemTree::Systems(vec![
                    (
                        "Station keeping".to_string(),
                        SystemTree::Redundant(vec![line("l1"), line("l2"), line("dummy")]),
                    ),
                    ("Umbilical".to_string(), SystemTree::Components(comps(&[&["dummy"]]))),
                ]),
            )],
        };

        let pool = build_pool(&hubs, &devices).unwrap();
        let keeping = find_one_label(&pool, &LabelQuery::new("Station keeping")).unwrap();
        let parallel = &pool[pool[keeping.key].children()[0]];
        assert_eq!(parallel.describe(), "parallel (unlabeled)");
        // The placeholder line and foundations are gone
        assert_eq!(parallel.children().len(), 2);
        assert!(find_all_labels(&pool, &LabelQuery::new("Foundation")).is_empty());
        assert!(find_all_labels(&pool, &LabelQuery::new("Umbilical")).is_empty());
        // Both lines share one label path
        assert_eq!(find_all_labels(&pool, &LabelQuery::new("Moorings lines")).len(), 1);
    }

    #[test]
    fn test_build_dummy_only() {
        let hubs = btreemap! {
            "array".to_string() => hub(
                &[("Export cable", comps(&[&["dummy"]])), ("Substation", comps(&[&["dummy"]]))],
                &[&["device001"]],
            ),
        };
        let devices = btreemap! { "device001".to_string() => device(&[&["dummy", "dummy"]]) };

        let pool = build_pool(&hubs, &devices).unwrap();
        let root = &pool[PoolKey::Array];
        assert_eq!(root.failure_rate(&pool), None);
        // Only the device link survives
        assert_eq!(root.children().len(), 1);
        assert!(pool[root.children()[0]].children().is_empty());
    }

    #[test]
    fn test_build_markers_reach_components() {
        let hubs = btreemap! {
            "array".to_string() => HubRecord {
                systems: btreemap! {
                    "Export cable".to_string() => vec![Nested::Group(vec![
                        Nested::Item(ComponentSpec::new("cable", Some(7))),
                    ])],
                },
                layout: vec![],
            },
        };
        let pool = build_pool(&hubs, &DeviceHierarchy::new()).unwrap();
        let cable = find_one_label(&pool, &LabelQuery::new("cable")).unwrap();
        assert_eq!(pool[cable.key].as_component().unwrap().marker, Some(7));
    }

    #[test]
    fn test_build_errors() {
        let error = build_pool(&ArrayHierarchy::new(), &DeviceHierarchy::new()).unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::InvalidInput(InvalidInputError::MissingNode {
                node: "array".into()
            })
        );

        let hubs = btreemap! { "array".to_string() => hub(&[], &[&["device009"]]) };
        let error = build_pool(&hubs, &DeviceHierarchy::new()).unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::InvalidInput(InvalidInputError::UnknownLayoutNode {
                parent: "array".into(),
                node: "device009".into()
            })
        );

        let hubs = btreemap! {
            "array".to_string() => hub(&[], &[&["subhub001"]]),
            "subhub001".to_string() => hub(&[], &[&["subhub001"]]),
        };
        let error = build_pool(&hubs, &DeviceHierarchy::new()).unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::InvalidInput(InvalidInputError::CyclicLayout {
                node: "subhub001".into()
            })
        );
    }
}
