//! Starbase and stock entities.

use crate::ExtraFields;
use serde::{Deserialize, Serialize};

/// One starbase. Always sits on a planet; ownership follows the planet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Starbase {
    #[serde(default)]
    pub id: i32,
    #[serde(rename = "planetid", default)]
    pub planet_id: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(rename = "builtdefense", default)]
    pub built_defense: i32,
    #[serde(default)]
    pub damage: i32,
    #[serde(rename = "enginetechlevel", default)]
    pub engine_tech_level: i32,
    #[serde(rename = "hulltechlevel", default)]
    pub hull_tech_level: i32,
    #[serde(rename = "beamtechlevel", default)]
    pub beam_tech_level: i32,
    #[serde(rename = "torptechlevel", default)]
    pub torp_tech_level: i32,
    /// Tech levels bought this turn, per slot kind.
    #[serde(rename = "enginetechup", default)]
    pub engine_tech_up: i32,
    #[serde(rename = "hulltechup", default)]
    pub hull_tech_up: i32,
    #[serde(rename = "beamtechup", default)]
    pub beam_tech_up: i32,
    #[serde(rename = "torptechup", default)]
    pub torp_tech_up: i32,
    #[serde(default)]
    pub fighters: i32,
    #[serde(rename = "builtfighters", default)]
    pub built_fighters: i32,
    #[serde(rename = "shipmission", default)]
    pub ship_mission: i32,
    #[serde(default)]
    pub mission: i32,
    #[serde(rename = "targetshipid", default)]
    pub target_ship_id: i32,
    #[serde(rename = "buildhullid", default)]
    pub build_hull_id: i32,
    #[serde(rename = "buildengineid", default)]
    pub build_engine_id: i32,
    #[serde(rename = "buildbeamid", default)]
    pub build_beam_id: i32,
    #[serde(rename = "buildbeamcount", default)]
    pub build_beam_count: i32,
    #[serde(rename = "buildtorpedoid", default)]
    pub build_torpedo_id: i32,
    #[serde(rename = "buildtorpcount", default)]
    pub build_torp_count: i32,
    #[serde(rename = "isbuilding", default)]
    pub is_building: bool,
    #[serde(rename = "readystatus", default)]
    pub ready_status: i32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Kinds of starbase inventory a stock record can describe.
pub mod stock_type {
    /// Hull stock.
    pub const HULL: i32 = 1;
    /// Engine stock.
    pub const ENGINE: i32 = 2;
    /// Beam weapon stock.
    pub const BEAM: i32 = 3;
    /// Torpedo launcher stock.
    pub const LAUNCHER: i32 = 4;
    /// Torpedo stock.
    pub const TORPEDO: i32 = 5;
}

/// One inventory line at a starbase.
///
/// Identity is the surrogate `id`, unique within the snapshot.
/// `built_amount` is net production this turn; negative means shipped out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default)]
    pub id: i32,
    #[serde(rename = "starbaseid", default)]
    pub starbase_id: i32,
    #[serde(rename = "stocktype", default)]
    pub stock_type: i32,
    /// Component id within the stock type (hull id, engine id, ...).
    #[serde(rename = "stockid", default)]
    pub stock_id: i32,
    #[serde(default)]
    pub amount: i32,
    #[serde(rename = "builtamount", default)]
    pub built_amount: i32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
