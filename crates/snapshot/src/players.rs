//! Owner-to-race translation.
//!
//! The snapshot numbers players two ways: the seat (`ownerId`, 1..N) and
//! the race slot (1..11) that seat plays. Every binary record stores race
//! slots; every snapshot entity stores seats. Both directions are pure
//! lookups over the players list, and every reference in the file set goes
//! through the same map.

use crate::Player;
use std::collections::HashMap;

/// Bidirectional seat/race-slot mapping.
#[derive(Debug, Clone, Default)]
pub struct PlayerMap {
    owner_to_race: HashMap<i32, i32>,
    race_to_owner: HashMap<i32, i32>,
}

impl PlayerMap {
    /// Build the mapping from the snapshot's players list.
    pub fn new(players: &[Player]) -> Self {
        let mut owner_to_race = HashMap::with_capacity(players.len());
        let mut race_to_owner = HashMap::with_capacity(players.len());
        for player in players {
            owner_to_race.insert(player.id, player.race_id);
            race_to_owner.insert(player.race_id, player.id);
        }
        Self {
            owner_to_race,
            race_to_owner,
        }
    }

    /// Race slot for a seat; 0 for neutral or unknown seats.
    pub fn race_of(&self, owner_id: i32) -> u16 {
        match self.owner_to_race.get(&owner_id) {
            Some(&race) if (1..=11).contains(&race) => race as u16,
            _ => 0,
        }
    }

    /// Seat for a race slot; 0 when no seat plays that race.
    pub fn owner_of(&self, race_slot: u16) -> i32 {
        self.race_to_owner
            .get(&i32::from(race_slot))
            .copied()
            .unwrap_or(0)
    }

    /// Whether a seat exists in the game.
    pub fn has_owner(&self, owner_id: i32) -> bool {
        self.owner_to_race.contains_key(&owner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: i32, race_id: i32) -> Player {
        Player {
            id,
            race_id,
            ..Default::default()
        }
    }

    #[test]
    fn maps_both_directions() {
        let map = PlayerMap::new(&[player(1, 4), player(2, 9)]);
        assert_eq!(map.race_of(1), 4);
        assert_eq!(map.race_of(2), 9);
        assert_eq!(map.owner_of(4), 1);
        assert_eq!(map.owner_of(9), 2);
    }

    #[test]
    fn neutral_and_unknown_map_to_zero() {
        let map = PlayerMap::new(&[player(1, 4)]);
        assert_eq!(map.race_of(0), 0);
        assert_eq!(map.race_of(99), 0);
        assert_eq!(map.owner_of(11), 0);
    }

    #[test]
    fn out_of_range_race_maps_to_zero() {
        let map = PlayerMap::new(&[player(1, 12)]);
        assert_eq!(map.race_of(1), 0);
    }
}
