//! Minefields, ion storms, combat recordings, messages, scores.

use crate::ExtraFields;
use serde::{Deserialize, Serialize};

/// A minefield visible this turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Minefield {
    #[serde(default)]
    pub id: i32,
    #[serde(rename = "ownerid", default)]
    pub owner_id: i32,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub radius: i32,
    #[serde(default)]
    pub units: i32,
    #[serde(rename = "isweb", default)]
    pub is_web: bool,
    #[serde(rename = "infoturn", default)]
    pub info_turn: i32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// An active ion storm.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IonStorm {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub radius: i32,
    #[serde(default)]
    pub voltage: i32,
    #[serde(default)]
    pub heading: i32,
    #[serde(default)]
    pub warp: i32,
    #[serde(rename = "isgrowing", default)]
    pub is_growing: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// One side of a combat recording.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VcrSide {
    #[serde(rename = "objectid", default)]
    pub object_id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "raceid", default)]
    pub race_id: i32,
    #[serde(rename = "hullid", default)]
    pub hull_id: i32,
    #[serde(rename = "beamid", default)]
    pub beam_id: i32,
    #[serde(rename = "beamcount", default)]
    pub beam_count: i32,
    #[serde(rename = "baycount", default)]
    pub bay_count: i32,
    #[serde(rename = "torpedoid", default)]
    pub torpedo_id: i32,
    #[serde(default)]
    pub torpedos: i32,
    #[serde(default)]
    pub fighters: i32,
    #[serde(rename = "launchercount", default)]
    pub launcher_count: i32,
    #[serde(default)]
    pub shield: i32,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub crew: i32,
    #[serde(default)]
    pub mass: i32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// One combat recording, replayable by the native client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vcr {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub seed: i32,
    #[serde(rename = "battletype", default)]
    pub battle_type: i32,
    #[serde(default)]
    pub temperature: i32,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub turn: i32,
    #[serde(default)]
    pub left: VcrSide,
    #[serde(default)]
    pub right: VcrSide,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A structured message from the server or another player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: i32,
    /// Classification 0..21; drives the header letter and title.
    #[serde(rename = "messagetype", default)]
    pub message_type: i32,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    /// Entity or player the message is about.
    #[serde(default)]
    pub target: i32,
    #[serde(default)]
    pub turn: i32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Per-seat score line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Score {
    #[serde(rename = "ownerid", default)]
    pub owner_id: i32,
    #[serde(rename = "capitalships", default)]
    pub capital_ships: i32,
    #[serde(default)]
    pub freighters: i32,
    #[serde(default)]
    pub planets: i32,
    #[serde(default)]
    pub starbases: i32,
    #[serde(rename = "militaryscore", default)]
    pub military_score: i32,
    #[serde(rename = "inventoryscore", default)]
    pub inventory_score: i32,
    #[serde(rename = "prioritypoints", default)]
    pub priority_points: i32,
    #[serde(default)]
    pub turn: i32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
