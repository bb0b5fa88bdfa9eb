//! The legacy v3 file formats.
//!
//! Everything here is byte-exact: fixed-size little-endian records,
//! space-padded strings, additive checksums. The entity records double as
//! the decoder for maketurn, so every layout has both an `encode` and a
//! `decode` side and a table-driven schema that tests can introspect.

mod base;
mod control;
mod error;
mod gen;
mod layout;
mod mdata;
mod planet;
mod ship;
mod shipxy;
mod specfiles;
mod timestamp;
mod util;
mod vcr;

pub use base::{hull_slot, BaseRecord};
pub use control::{base_slot, planet_slot, ship_slot, ControlVector, CONTROL_SLOTS};
pub use error::V3Error;
pub use gen::{GenMode, GenScores, GenSection, RaceScore, GEN_PASSWORD};
pub use layout::{
    FieldDef, FieldType, RecordLayout, BASE_LAYOUT, PLANET_LAYOUT, SHIP_LAYOUT, TARGET_LAYOUT,
};
pub use mdata::encode_message_file;
pub use planet::PlanetRecord;
pub use ship::{CargoTransfer, ShipRecord, TargetRecord};
pub use shipxy::{encode_shipxy, SHIPXY_ENTRIES, SHIPXY_SIZE};
pub use specfiles::{SpecSynthesizer, TemplateSource};
pub use timestamp::Timestamp;
pub use util::{
    UtilWriter, UTIL_ALLIED_BASE, UTIL_ION_STORM, UTIL_MINEFIELD, UTIL_SCORE_TABLE,
    UTIL_TURN_METADATA,
};
pub use vcr::{VcrRecord, VcrSideRecord, VCR_SIGNATURE};

/// Clamp a snapshot integer into an unsigned 16-bit field.
pub(crate) fn word(value: i32) -> u16 {
    value.clamp(0, i32::from(u16::MAX)) as u16
}

/// Clamp a snapshot integer into an unsigned 32-bit field.
pub(crate) fn dword(value: i32) -> u32 {
    value.max(0) as u32
}
