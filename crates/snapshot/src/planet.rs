//! Planet entities.

use crate::ExtraFields;
use serde::{Deserialize, Serialize};

/// One planet as the snapshot reports it.
///
/// `built*` counters record structures erected this turn; the flow ledger
/// uses them to reconstruct beginning-of-turn state. `temp` is the Nu
/// convention (0 cold .. 100 hot, -1 unknown); the binary record stores
/// `100 - temp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    #[serde(default)]
    pub id: i32,
    #[serde(rename = "ownerid", default)]
    pub owner_id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(rename = "friendlycode", default)]
    pub friendly_code: String,
    #[serde(default)]
    pub mines: i32,
    #[serde(default)]
    pub factories: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(rename = "builtmines", default)]
    pub built_mines: i32,
    #[serde(rename = "builtfactories", default)]
    pub built_factories: i32,
    #[serde(rename = "builtdefense", default)]
    pub built_defense: i32,
    #[serde(default)]
    pub neutronium: i32,
    #[serde(default)]
    pub tritanium: i32,
    #[serde(default)]
    pub duranium: i32,
    #[serde(default)]
    pub molybdenum: i32,
    #[serde(default)]
    pub clans: i32,
    #[serde(default)]
    pub supplies: i32,
    #[serde(default)]
    pub megacredits: i32,
    #[serde(rename = "groundneutronium", default)]
    pub ground_neutronium: i32,
    #[serde(rename = "groundtritanium", default)]
    pub ground_tritanium: i32,
    #[serde(rename = "groundduranium", default)]
    pub ground_duranium: i32,
    #[serde(rename = "groundmolybdenum", default)]
    pub ground_molybdenum: i32,
    #[serde(rename = "densityneutronium", default)]
    pub density_neutronium: i32,
    #[serde(rename = "densitytritanium", default)]
    pub density_tritanium: i32,
    #[serde(rename = "densityduranium", default)]
    pub density_duranium: i32,
    #[serde(rename = "densitymolybdenum", default)]
    pub density_molybdenum: i32,
    #[serde(rename = "colonisttaxrate", default)]
    pub colonist_tax_rate: i32,
    #[serde(rename = "nativetaxrate", default)]
    pub native_tax_rate: i32,
    #[serde(rename = "colonisthappypoints", default)]
    pub colonist_happy_points: i32,
    #[serde(rename = "nativehappypoints", default)]
    pub native_happy_points: i32,
    #[serde(rename = "nativegovernment", default)]
    pub native_government: i32,
    #[serde(rename = "nativeclans", default)]
    pub native_clans: i32,
    #[serde(rename = "nativetype", default)]
    pub native_type: i32,
    /// Surface temperature, -1 when never scanned.
    #[serde(default = "unknown_temp")]
    pub temp: i32,
    /// Supplies converted to cash this turn.
    #[serde(rename = "suppliessold", default)]
    pub supplies_sold: i32,
    #[serde(rename = "buildingstarbase", default)]
    pub building_starbase: bool,
    #[serde(rename = "readystatus", default)]
    pub ready_status: i32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

fn unknown_temp() -> i32 {
    -1
}

impl Planet {
    /// Whether any semantically populated field would force the planet into
    /// the packed file set even with a default friendly code.
    pub fn is_populated(&self) -> bool {
        self.owner_id != 0
            || self.mines != 0
            || self.factories != 0
            || self.defense != 0
            || self.neutronium != 0
            || self.tritanium != 0
            || self.duranium != 0
            || self.molybdenum != 0
            || self.clans != 0
            || self.supplies != 0
            || self.megacredits != 0
            || self.ground_neutronium != 0
            || self.ground_tritanium != 0
            || self.ground_duranium != 0
            || self.ground_molybdenum != 0
            || self.native_clans != 0
            || self.native_type != 0
            || self.temp >= 0
    }
}
