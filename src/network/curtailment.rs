//! Index of the array, subhub and device links of a pool, and of the devices lost when each of
//! them fails.

use std::collections::BTreeMap;

use log::trace;

use reliability_api::constants::{ARRAY_LABEL, DEVICE_PREFIX, SUBHUB_PREFIX};

use crate::graph::{
    search::{find_all_labels, find_strings, LabelQuery},
    Pool, PoolKey,
};

/// Pool keys of the named systems of an array, with the devices each of them curtails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemIndex {
    pub subhubs: BTreeMap<String, PoolKey>,
    pub devices: BTreeMap<String, PoolKey>,

    /// Devices cut off by the failure of the array, of a subhub or of a device.
    pub curtailments: BTreeMap<String, Vec<String>>,
}

impl SystemIndex {
    pub fn new(pool: &Pool) -> Self {
        let subhubs = named_keys(pool, SUBHUB_PREFIX);
        let device_matches = find_all_labels(pool, &LabelQuery::new(DEVICE_PREFIX).partial());
        let devices = device_matches
            .iter()
            .filter_map(|m| Some((m.path.last()?.clone(), m.key)))
            .collect::<BTreeMap<_, _>>();

        let mut curtailments = BTreeMap::new();
        let device_names: Vec<String> = device_matches
            .iter()
            .filter_map(|m| m.path.last().cloned())
            .collect();
        curtailments.insert(ARRAY_LABEL.to_string(), device_names);

        for subhub in subhubs.keys() {
            let fed = device_matches
                .iter()
                .filter(|m| m.path[..m.path.len() - 1].contains(subhub))
                .filter_map(|m| m.path.last().cloned())
                .collect();
            curtailments.insert(subhub.clone(), fed);
        }

        // A device failure cuts off the rest of its string
        for string in find_strings(pool, PoolKey::Array) {
            for (i, device) in string.iter().enumerate() {
                curtailments.insert(device.clone(), string[i..].to_vec());
            }
        }

        trace!(
            "Indexed {} subhub(s) and {} device(s)",
            subhubs.len(),
            devices.len()
        );
        Self {
            subhubs,
            devices,
            curtailments,
        }
    }

    /// Devices cut off by the failure of the named system.
    pub fn curtails(&self, system: &str) -> Option<&[String]> {
        self.curtailments.get(system).map(Vec::as_slice)
    }
}

fn named_keys(pool: &Pool, prefix: &str) -> BTreeMap<String, PoolKey> {
    find_all_labels(pool, &LabelQuery::new(prefix).partial())
        .into_iter()
        .filter_map(|mut m| Some((m.path.pop()?, m.key)))
        .collect()
}
