//! The general-state section: timestamp, scores, checksums, turn number.
//!
//! Two layouts exist: the standalone unpacked file and the variant embedded
//! in a result file, which inserts a literal `?` byte after the password
//! and a 12-byte filler before the turn number. Both round-trip.

use crate::{Timestamp, V3Error};
use nubridge_codec::{RecordReader, RecordWriter};

/// Password placeholder; the server-side account owns real authentication.
pub const GEN_PASSWORD: &str = "NOPASSWORD";

/// Which of the two layouts to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenMode {
    /// Standalone `gen<N>.dat` file, 144 bytes.
    Unpacked,
    /// Section of a result file, 157 bytes.
    Result,
}

/// Score quadruple for one race slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RaceScore {
    pub planets: u16,
    pub capital_ships: u16,
    pub freighters: u16,
    pub starbases: u16,
}

/// Scores for all eleven race slots.
pub type GenScores = [RaceScore; 11];

/// The general-state section.
#[derive(Debug, Clone, PartialEq)]
pub struct GenSection {
    pub timestamp: Timestamp,
    pub scores: GenScores,
    /// The local player's race slot.
    pub race: u16,
    /// Checksums of the ship, planet, and base sections, in that order.
    pub checksums: [u32; 3],
    pub turn: u16,
}

impl GenSection {
    /// Encoded size of the unpacked layout.
    pub const SIZE_UNPACKED: usize = 144;
    /// Encoded size of the result-file layout.
    pub const SIZE_RESULT: usize = 157;

    /// Encode in the requested layout.
    pub fn encode(&self, mode: GenMode) -> Vec<u8> {
        let mut w = RecordWriter::with_capacity(Self::SIZE_RESULT);
        w.put_str(self.timestamp.as_str(), Timestamp::LEN);
        for score in &self.scores {
            w.put_u16(score.planets);
            w.put_u16(score.capital_ships);
            w.put_u16(score.freighters);
            w.put_u16(score.starbases);
        }
        w.put_u16(self.race);
        w.put_str(GEN_PASSWORD, 20);
        if mode == GenMode::Result {
            w.put_bytes(b"?");
        }
        for checksum in self.checksums {
            w.put_u32(checksum);
        }
        if mode == GenMode::Result {
            w.put_bytes(b"\0\0          ");
        }
        w.put_u16(self.turn);
        w.put_u16(self.timestamp.checksum());
        debug_assert_eq!(
            w.len(),
            match mode {
                GenMode::Unpacked => Self::SIZE_UNPACKED,
                GenMode::Result => Self::SIZE_RESULT,
            }
        );
        w.into_bytes()
    }

    /// Decode from either layout.
    pub fn decode(data: &[u8], mode: GenMode) -> Result<Self, V3Error> {
        let mut r = RecordReader::new(data);
        let short = |source| V3Error::Short {
            kind: "gen",
            source,
        };
        let timestamp = Timestamp::from_raw(&raw_str(&mut r, Timestamp::LEN).map_err(short)?);
        let mut scores = [RaceScore::default(); 11];
        for score in &mut scores {
            score.planets = r.take_u16().map_err(short)?;
            score.capital_ships = r.take_u16().map_err(short)?;
            score.freighters = r.take_u16().map_err(short)?;
            score.starbases = r.take_u16().map_err(short)?;
        }
        let race = r.take_u16().map_err(short)?;
        let _password = r.take_bytes(20).map_err(short)?;
        if mode == GenMode::Result {
            let _marker = r.take_bytes(1).map_err(short)?;
        }
        let mut checksums = [0u32; 3];
        for checksum in &mut checksums {
            *checksum = r.take_u32().map_err(short)?;
        }
        if mode == GenMode::Result {
            let _filler = r.take_bytes(12).map_err(short)?;
        }
        let turn = r.take_u16().map_err(short)?;
        let _timestamp_checksum = r.take_u16().map_err(short)?;
        Ok(Self {
            timestamp,
            scores,
            race,
            checksums,
            turn,
        })
    }
}

// The timestamp must not be space-trimmed like an ordinary string field.
fn raw_str(r: &mut RecordReader, width: usize) -> Result<String, nubridge_codec::CodecError> {
    let bytes = r.take_bytes(width)?;
    Ok(bytes.iter().map(|&b| char::from(b)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> GenSection {
        let mut scores = [RaceScore::default(); 11];
        scores[6] = RaceScore {
            planets: 12,
            capital_ships: 3,
            freighters: 2,
            starbases: 1,
        };
        GenSection {
            timestamp: Timestamp::from_raw("08-21-202621:12:30"),
            scores,
            race: 7,
            checksums: [111, 222, 333],
            turn: 42,
        }
    }

    #[test]
    fn both_layouts_have_their_sizes() {
        let gen = section();
        assert_eq!(gen.encode(GenMode::Unpacked).len(), GenSection::SIZE_UNPACKED);
        assert_eq!(gen.encode(GenMode::Result).len(), GenSection::SIZE_RESULT);
    }

    #[test]
    fn result_layout_marks_the_password() {
        let bytes = section().encode(GenMode::Result);
        // 18 timestamp + 88 scores + 2 race + 20 password = offset 128.
        assert_eq!(bytes[128], b'?');
    }

    #[test]
    fn both_layouts_round_trip() {
        let gen = section();
        for mode in [GenMode::Unpacked, GenMode::Result] {
            let decoded = GenSection::decode(&gen.encode(mode), mode).unwrap();
            assert_eq!(decoded, gen);
        }
    }
}
