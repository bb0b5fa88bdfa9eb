//! The auxiliary utility stream: back-to-back length-tagged records that
//! carry what the fixed file formats cannot.

use crate::{word, Timestamp};
use nubridge_codec::RecordWriter;
use nubridge_snapshot::{IonStorm, Minefield, PlayerMap};

/// Turn metadata; always the first record in the stream.
pub const UTIL_TURN_METADATA: u16 = 13;
/// Ion storm report.
pub const UTIL_ION_STORM: u16 = 17;
/// Minefield hint.
pub const UTIL_MINEFIELD: u16 = 0;
/// Allied starbase hint.
pub const UTIL_ALLIED_BASE: u16 = 11;
/// Score table.
pub const UTIL_SCORE_TABLE: u16 = 51;

/// Accumulates `(type, length, payload)` records.
#[derive(Debug, Default)]
pub struct UtilWriter {
    buf: RecordWriter,
}

impl UtilWriter {
    /// Start an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record.
    pub fn record(&mut self, record_type: u16, payload: &[u8]) {
        self.buf.put_u16(record_type);
        self.buf.put_u16(payload.len() as u16);
        self.buf.put_bytes(payload);
    }

    /// Append the turn-metadata record that opens every stream.
    pub fn turn_metadata(&mut self, timestamp: &Timestamp, turn: u16, race: u16) {
        let mut w = RecordWriter::with_capacity(Timestamp::LEN + 4);
        w.put_str(timestamp.as_str(), Timestamp::LEN);
        w.put_u16(turn);
        w.put_u16(race);
        self.record(UTIL_TURN_METADATA, w.as_slice());
    }

    /// Append an ion storm report.
    pub fn ion_storm(&mut self, storm: &IonStorm) {
        let mut w = RecordWriter::with_capacity(16);
        w.put_u16(word(storm.id));
        w.put_u16(word(storm.x));
        w.put_u16(word(storm.y));
        w.put_u16(word(storm.voltage));
        w.put_u16(word(storm.heading));
        w.put_u16(word(storm.warp));
        w.put_u16(word(storm.radius));
        w.put_u16(u16::from(storm.is_growing));
        self.record(UTIL_ION_STORM, w.as_slice());
    }

    /// Append a minefield hint.
    pub fn minefield(&mut self, field: &Minefield, players: &PlayerMap) {
        let mut w = RecordWriter::with_capacity(14);
        w.put_u16(word(field.id));
        w.put_u16(word(field.x));
        w.put_u16(word(field.y));
        w.put_u16(players.race_of(field.owner_id));
        w.put_u32(field.units.max(0) as u32);
        w.put_u16(u16::from(field.is_web));
        self.record(UTIL_MINEFIELD, w.as_slice());
    }

    /// Append an allied-base hint.
    pub fn allied_base(&mut self, planet_id: u16, race: u16) {
        let mut w = RecordWriter::with_capacity(4);
        w.put_u16(planet_id);
        w.put_u16(race);
        self.record(UTIL_ALLIED_BASE, w.as_slice());
    }

    /// Append one score table: a name, the score's utility id, and one
    /// 32-bit value per race slot, -1 for races not in the game.
    pub fn score_table(&mut self, name: &str, score_id: u16, values: &[i32; 11]) {
        let mut w = RecordWriter::with_capacity(100);
        w.put_str(name, 50);
        w.put_u16(score_id);
        w.put_u16(0);
        w.put_u16(0);
        for &value in values {
            w.put_i32(value);
        }
        self.record(UTIL_SCORE_TABLE, w.as_slice());
    }

    /// Finish the stream.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_bytes()
    }
}
