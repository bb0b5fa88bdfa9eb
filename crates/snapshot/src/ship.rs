//! Ship entities.

use crate::ExtraFields;
use serde::{Deserialize, Serialize};

/// One ship as the snapshot reports it: post-turn state, own or foreign.
///
/// Missions are 0-based here; the binary records store them 1-based.
/// `mission_1_target` doubles as the tow target (mission 6) and the
/// intercept target (mission 7).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ship {
    #[serde(default)]
    pub id: i32,
    #[serde(rename = "ownerid", default)]
    pub owner_id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "friendlycode", default)]
    pub friendly_code: String,
    #[serde(default)]
    pub warp: i32,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    /// Waypoint; absent for ships that were never given one.
    #[serde(rename = "targetx", default, skip_serializing_if = "Option::is_none")]
    pub target_x: Option<i32>,
    #[serde(rename = "targety", default, skip_serializing_if = "Option::is_none")]
    pub target_y: Option<i32>,
    #[serde(default)]
    pub mass: i32,
    /// Travel heading in degrees; -1 when stationary or unknown.
    #[serde(default = "unknown_heading")]
    pub heading: i32,
    #[serde(rename = "hullid", default)]
    pub hull_id: i32,
    #[serde(rename = "engineid", default)]
    pub engine_id: i32,
    #[serde(rename = "beamid", default)]
    pub beam_id: i32,
    #[serde(default)]
    pub beams: i32,
    #[serde(default)]
    pub bays: i32,
    #[serde(rename = "torpedoid", default)]
    pub torpedo_id: i32,
    /// Torpedo launcher count.
    #[serde(default)]
    pub torps: i32,
    /// Torpedoes or fighters aboard, depending on armament.
    #[serde(default)]
    pub ammo: i32,
    #[serde(default)]
    pub mission: i32,
    #[serde(rename = "mission1target", default)]
    pub mission_1_target: i32,
    #[serde(rename = "mission2target", default)]
    pub mission_2_target: i32,
    /// Primary enemy, as a seat number.
    #[serde(default)]
    pub enemy: i32,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub crew: i32,
    #[serde(default)]
    pub clans: i32,
    #[serde(default)]
    pub neutronium: i32,
    #[serde(default)]
    pub tritanium: i32,
    #[serde(default)]
    pub duranium: i32,
    #[serde(default)]
    pub molybdenum: i32,
    #[serde(default)]
    pub supplies: i32,
    #[serde(default)]
    pub megacredits: i32,
    #[serde(rename = "transferneutronium", default)]
    pub transfer_neutronium: i32,
    #[serde(rename = "transfertritanium", default)]
    pub transfer_tritanium: i32,
    #[serde(rename = "transferduranium", default)]
    pub transfer_duranium: i32,
    #[serde(rename = "transfermolybdenum", default)]
    pub transfer_molybdenum: i32,
    #[serde(rename = "transferclans", default)]
    pub transfer_clans: i32,
    #[serde(rename = "transfersupplies", default)]
    pub transfer_supplies: i32,
    #[serde(rename = "transferammo", default)]
    pub transfer_ammo: i32,
    #[serde(rename = "transfermegacredits", default)]
    pub transfer_megacredits: i32,
    #[serde(rename = "transfertargetid", default)]
    pub transfer_target_id: i32,
    /// 0 none, 1 unload to planet, 2 ship-to-ship, 3 jettison.
    #[serde(rename = "transfertargettype", default)]
    pub transfer_target_type: i32,
    #[serde(rename = "readystatus", default)]
    pub ready_status: i32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

fn unknown_heading() -> i32 {
    -1
}

impl Ship {
    /// Waypoint delta from the current position; zero when no waypoint is set.
    pub fn waypoint_delta(&self) -> (i32, i32) {
        (
            self.target_x.map_or(0, |tx| tx - self.x),
            self.target_y.map_or(0, |ty| ty - self.y),
        )
    }

    /// Whether the ship carries fighter bays rather than torpedo tubes.
    pub fn has_bays(&self) -> bool {
        self.bays > 0
    }
}
