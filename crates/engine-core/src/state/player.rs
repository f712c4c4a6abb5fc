use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Character, GearInstance};

/// Owner of characters, gear, and a resource wallet.
///
/// `resources` is the player-scoped wallet consulted by `LevelUpCharacter`,
/// `LevelUpGear`, and `GrantResources`; a missing key is treated as zero
/// everywhere it is read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Player {
    pub characters: BTreeMap<String, Character>,
    pub gear: BTreeMap<String, GearInstance>,
    pub resources: BTreeMap<String, i64>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            characters: BTreeMap::new(),
            gear: BTreeMap::new(),
            resources: BTreeMap::new(),
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, resource_id: &str) -> i64 {
        self.resources.get(resource_id).copied().unwrap_or(0)
    }

    pub fn grant(&mut self, resource_id: &str, amount: i64) {
        *self.resources.entry(resource_id.to_string()).or_insert(0) += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_resource_reads_as_zero() {
        let player = Player::new();
        assert_eq!(player.balance("gold"), 0);
    }

    #[test]
    fn grant_accumulates_and_allows_negative() {
        let mut player = Player::new();
        player.grant("gold", 100);
        player.grant("gold", -150);
        assert_eq!(player.balance("gold"), -50);
    }
}
