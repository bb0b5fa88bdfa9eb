//! Typed model of the Nu turn snapshot.
//!
//! The server delivers one nested JSON object per player per turn. The
//! handful of fields the conversion core interprets are deserialized into
//! typed structs; everything else lands in a per-entity pass-through map
//! and is echoed back verbatim when a turn is submitted. The server rejects
//! turns that drop fields, so the pass-through maps are load-bearing, not
//! a convenience.

mod error;
mod game;
mod planet;
mod players;
mod ship;
mod specs;
mod starbase;
mod universe;

pub use error::SnapshotError;
pub use game::{Game, Player, Settings};
pub use planet::Planet;
pub use players::PlayerMap;
pub use ship::Ship;
pub use specs::{Beam, Engine, Hull, Race, RaceHull, Torpedo};
pub use starbase::{stock_type, Starbase, Stock};
pub use universe::{IonStorm, Message, Minefield, Score, Vcr, VcrSide};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pass-through map for fields the core does not interpret.
pub type ExtraFields = serde_json::Map<String, Value>;

/// One decoded turn: one game, one player, one turn.
///
/// Immutable for the duration of a pack or maketurn call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// The local player's seat.
    pub player: Player,
    /// Host settings, including the host start time the timestamp derives from.
    pub settings: Settings,
    /// Game metadata (turn number, name).
    pub game: Game,
    /// All seats in the game; the owner-to-race mapping source.
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub races: Vec<Race>,
    #[serde(default)]
    pub hulls: Vec<Hull>,
    #[serde(default)]
    pub beams: Vec<Beam>,
    #[serde(default)]
    pub torpedos: Vec<Torpedo>,
    #[serde(default)]
    pub engines: Vec<Engine>,
    #[serde(default)]
    pub planets: Vec<Planet>,
    #[serde(default)]
    pub ships: Vec<Ship>,
    #[serde(default)]
    pub starbases: Vec<Starbase>,
    #[serde(default)]
    pub stock: Vec<Stock>,
    #[serde(default)]
    pub minefields: Vec<Minefield>,
    #[serde(default)]
    pub ionstorms: Vec<IonStorm>,
    #[serde(default)]
    pub vcrs: Vec<Vcr>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub mymessages: Vec<Message>,
    #[serde(default)]
    pub scores: Vec<Score>,
    /// The hulls the local player's race can build, in build-slot order.
    #[serde(default)]
    pub racehulls: Vec<RaceHull>,
    /// Everything the core does not interpret.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Snapshot {
    /// Extract the turn object from a full API response (`{"rst": {...}}`).
    pub fn from_api_value(value: &Value) -> Result<Self, SnapshotError> {
        let rst = value
            .get("rst")
            .ok_or(SnapshotError::MissingSection("rst"))?;
        Self::from_value(rst.clone())
    }

    /// Deserialize a turn object, checking the mandatory sub-objects first
    /// so the failure names the missing piece.
    pub fn from_value(value: Value) -> Result<Self, SnapshotError> {
        let obj = value
            .as_object()
            .ok_or(SnapshotError::MissingSection("rst"))?;
        for section in ["player", "settings", "game"] {
            if !obj.contains_key(section) {
                return Err(SnapshotError::MissingSection(section));
            }
        }
        let snapshot: Snapshot = serde_json::from_value(value)?;
        if snapshot.player.race_id <= 0 {
            return Err(SnapshotError::MissingField("player.raceid"));
        }
        Ok(snapshot)
    }

    /// Parse a turn object from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(text)?;
        if value.get("rst").is_some() {
            Self::from_api_value(&value)
        } else {
            Self::from_value(value)
        }
    }

    /// The local player's seat number.
    pub fn local_owner_id(&self) -> i32 {
        self.player.id
    }

    /// The local player's race slot (1..11).
    pub fn local_race_slot(&self) -> u16 {
        self.player.race_id as u16
    }

    /// Build the owner-to-race mapping from the players list.
    pub fn player_map(&self) -> PlayerMap {
        PlayerMap::new(&self.players)
    }

    /// Hull ids the local player can build, in build-slot order.
    pub fn racehull_ids(&self) -> Vec<i32> {
        self.racehulls.iter().map(|rh| rh.hull_id).collect()
    }

    /// Look up a hull by id.
    pub fn hull(&self, id: i32) -> Option<&Hull> {
        self.hulls.iter().find(|h| h.id == id)
    }

    /// Look up a beam by id.
    pub fn beam(&self, id: i32) -> Option<&Beam> {
        self.beams.iter().find(|b| b.id == id)
    }

    /// Look up a torpedo type by id.
    pub fn torpedo(&self, id: i32) -> Option<&Torpedo> {
        self.torpedos.iter().find(|t| t.id == id)
    }

    /// Look up an engine by id.
    pub fn engine(&self, id: i32) -> Option<&Engine> {
        self.engines.iter().find(|e| e.id == id)
    }

    /// Look up a planet by id.
    pub fn planet(&self, id: i32) -> Option<&Planet> {
        self.planets.iter().find(|p| p.id == id)
    }

    /// Look up a ship by id.
    pub fn ship(&self, id: i32) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id == id)
    }

    /// Look up the starbase sitting on a planet.
    pub fn starbase_at(&self, planet_id: i32) -> Option<&Starbase> {
        self.starbases.iter().find(|b| b.planet_id == planet_id)
    }

    /// Look up a race definition by id.
    pub fn race(&self, id: i32) -> Option<&Race> {
        self.races.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "player": {"id": 3, "raceid": 7, "username": "kirk"},
            "settings": {"hoststart": "8/21/2026 9:12:30 PM", "name": "Sector 7"},
            "game": {"id": 9000, "turn": 12, "name": "Sector 7"}
        })
    }

    #[test]
    fn minimal_snapshot_parses() {
        let snapshot = Snapshot::from_value(minimal()).unwrap();
        assert_eq!(snapshot.local_owner_id(), 3);
        assert_eq!(snapshot.local_race_slot(), 7);
        assert_eq!(snapshot.game.turn, 12);
    }

    #[test]
    fn rst_wrapper_is_unwrapped() {
        let api = json!({ "rst": minimal() });
        let snapshot = Snapshot::from_api_value(&api).unwrap();
        assert_eq!(snapshot.local_owner_id(), 3);
    }

    #[test]
    fn missing_sections_are_named() {
        let err = Snapshot::from_api_value(&json!({})).unwrap_err();
        assert!(matches!(err, SnapshotError::MissingSection("rst")));

        let mut value = minimal();
        value.as_object_mut().unwrap().remove("settings");
        let err = Snapshot::from_value(value).unwrap_err();
        assert!(matches!(err, SnapshotError::MissingSection("settings")));
    }

    #[test]
    fn unknown_fields_pass_through() {
        let mut value = minimal();
        value.as_object_mut().unwrap().insert(
            "ships".into(),
            json!([{"id": 1, "ownerid": 3, "name": "Enterprise", "experimentalfield": 42}]),
        );
        let snapshot = Snapshot::from_value(value).unwrap();
        let ship = &snapshot.ships[0];
        assert_eq!(ship.name, "Enterprise");
        assert_eq!(ship.extra["experimentalfield"], json!(42));

        // The pass-through field survives re-serialization.
        let echoed = serde_json::to_value(ship).unwrap();
        assert_eq!(echoed["experimentalfield"], json!(42));
    }
}
