//! Seat, settings, and game metadata.

use crate::ExtraFields;
use serde::{Deserialize, Serialize};

/// One seat in the game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub id: i32,
    /// The race slot (1..11) this seat plays.
    #[serde(rename = "raceid", default)]
    pub race_id: i32,
    #[serde(default)]
    pub username: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Host settings. Only `hoststart` is interpreted; the rest feeds the
/// configuration digest messages and the pass-through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Wall-clock time the host run started, e.g. `8/21/2026 9:12:30 PM`.
    #[serde(rename = "hoststart", default)]
    pub host_start: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Game metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub turn: i32,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
