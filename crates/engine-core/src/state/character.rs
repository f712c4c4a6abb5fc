use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A character belonging to a [`super::Player`].
///
/// `equipped` maps slot id to gear id; invariants tying it back to
/// [`super::GearInstance::equipped_by`] are enforced by the runtime's
/// transaction handlers (see `EquipGear`/`UnequipGear`), not by this type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Character {
    pub class_id: String,
    pub level: u32,
    pub equipped: BTreeMap<String, String>,
    pub resources: BTreeMap<String, i64>,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            class_id: String::new(),
            level: 1,
            equipped: BTreeMap::new(),
            resources: BTreeMap::new(),
        }
    }
}

impl Character {
    pub fn new(class_id: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            level: 1,
            equipped: BTreeMap::new(),
            resources: BTreeMap::new(),
        }
    }

    pub fn balance(&self, resource_id: &str) -> i64 {
        self.resources.get(resource_id).copied().unwrap_or(0)
    }

    pub fn grant(&mut self, resource_id: &str, amount: i64) {
        *self.resources.entry(resource_id.to_string()).or_insert(0) += amount;
    }

    /// Distinct gear ids equipped across every slot, deduped so a multi-slot
    /// gear piece (e.g. a two-handed weapon) counts once.
    pub fn distinct_equipped_gear(&self) -> impl Iterator<Item = &str> {
        let mut seen = std::collections::BTreeSet::new();
        self.equipped.values().filter_map(move |gear_id| {
            if seen.insert(gear_id.as_str()) {
                Some(gear_id.as_str())
            } else {
                None
            }
        })
    }
}
