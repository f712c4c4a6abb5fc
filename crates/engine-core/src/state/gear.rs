use serde::{Deserialize, Serialize};

/// An instance of a `gearDef`, owned by a [`super::Player`].
///
/// `equipped_by` is `None` while the gear sits in inventory and carries the
/// owning character's id once `EquipGear` mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GearInstance {
    pub gear_def_id: String,
    pub level: u32,
    pub equipped_by: Option<String>,
}

impl GearInstance {
    pub fn new(gear_def_id: impl Into<String>) -> Self {
        Self {
            gear_def_id: gear_def_id.into(),
            level: 1,
            equipped_by: None,
        }
    }

    pub fn is_equipped(&self) -> bool {
        self.equipped_by.is_some()
    }
}
