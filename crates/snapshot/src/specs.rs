//! Component and race definitions: the static part of the snapshot that
//! feeds the specification files.

use crate::ExtraFields;
use serde::{Deserialize, Serialize};

/// Beam weapon definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Beam {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cost: i32,
    #[serde(default)]
    pub tritanium: i32,
    #[serde(default)]
    pub duranium: i32,
    #[serde(default)]
    pub molybdenum: i32,
    #[serde(default)]
    pub mass: i32,
    #[serde(rename = "techlevel", default)]
    pub tech_level: i32,
    #[serde(rename = "crewkill", default)]
    pub crew_kill: i32,
    #[serde(default)]
    pub damage: i32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Torpedo type definition: one entry covers the torpedo and its launcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Torpedo {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "torpedocost", default)]
    pub torpedo_cost: i32,
    #[serde(rename = "launchercost", default)]
    pub launcher_cost: i32,
    #[serde(default)]
    pub tritanium: i32,
    #[serde(default)]
    pub duranium: i32,
    #[serde(default)]
    pub molybdenum: i32,
    #[serde(default)]
    pub mass: i32,
    #[serde(rename = "techlevel", default)]
    pub tech_level: i32,
    #[serde(rename = "crewkill", default)]
    pub crew_kill: i32,
    #[serde(default)]
    pub damage: i32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Engine definition with its warp-factor fuel curve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Engine {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cost: i32,
    #[serde(default)]
    pub tritanium: i32,
    #[serde(default)]
    pub duranium: i32,
    #[serde(default)]
    pub molybdenum: i32,
    #[serde(rename = "techlevel", default)]
    pub tech_level: i32,
    #[serde(default)]
    pub warp1: i32,
    #[serde(default)]
    pub warp2: i32,
    #[serde(default)]
    pub warp3: i32,
    #[serde(default)]
    pub warp4: i32,
    #[serde(default)]
    pub warp5: i32,
    #[serde(default)]
    pub warp6: i32,
    #[serde(default)]
    pub warp7: i32,
    #[serde(default)]
    pub warp8: i32,
    #[serde(default)]
    pub warp9: i32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Engine {
    /// Fuel usage per warp factor, in warp order 1..9.
    pub fn fuel_curve(&self) -> [i32; 9] {
        [
            self.warp1, self.warp2, self.warp3, self.warp4, self.warp5, self.warp6, self.warp7,
            self.warp8, self.warp9,
        ]
    }
}

/// Hull definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hull {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mass: i32,
    #[serde(rename = "techlevel", default)]
    pub tech_level: i32,
    #[serde(default)]
    pub crew: i32,
    #[serde(rename = "fueltank", default)]
    pub fuel_tank: i32,
    #[serde(default)]
    pub cargo: i32,
    #[serde(default)]
    pub engines: i32,
    #[serde(default)]
    pub launchers: i32,
    #[serde(default)]
    pub beams: i32,
    #[serde(rename = "fighterbays", default)]
    pub fighter_bays: i32,
    #[serde(default)]
    pub tritanium: i32,
    #[serde(default)]
    pub duranium: i32,
    #[serde(default)]
    pub molybdenum: i32,
    #[serde(default)]
    pub cost: i32,
    /// Whether this hull can cloak; the only hull function the file set
    /// reflects.
    #[serde(rename = "cancloak", default)]
    pub can_cloak: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Race definition: full name, short name, adjective.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Race {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "shortname", default)]
    pub short_name: String,
    #[serde(default)]
    pub adjective: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// One entry in the local player's buildable-hull list; the list order
/// defines the build slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceHull {
    #[serde(default)]
    pub id: i32,
    #[serde(rename = "raceid", default)]
    pub race_id: i32,
    #[serde(rename = "hullid", default)]
    pub hull_id: i32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
