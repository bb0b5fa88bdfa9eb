//! Combat recording records.

use crate::{word, V3Error};
use nubridge_codec::{RecordReader, RecordWriter};
use nubridge_snapshot::{Vcr, VcrSide};

/// Signature word every combat record carries.
pub const VCR_SIGNATURE: u16 = 0x554E;

/// One combatant inside a combat record, 42 bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VcrSideRecord {
    pub name: String,
    pub damage: u16,
    pub crew: u16,
    pub object_id: u16,
    pub race: u16,
    /// Picture and hull packed as `picture + 1 + 256 * hull`.
    pub image_hull: u16,
    pub beam_type: u16,
    pub beam_count: u16,
    pub bay_count: u16,
    pub torp_type: u16,
    /// Torpedoes for tube armed combatants, fighters for carriers.
    pub ammo: u16,
    pub launcher_count: u16,
}

impl VcrSideRecord {
    fn from_snapshot(side: &VcrSide) -> Self {
        let ammo = if side.bay_count > 0 {
            side.fighters
        } else {
            side.torpedos
        };
        Self {
            name: side.name.clone(),
            damage: word(side.damage),
            crew: word(side.crew),
            object_id: word(side.object_id),
            race: word(side.race_id),
            image_hull: (1 + 256 * u32::from(word(side.hull_id))).min(u32::from(u16::MAX)) as u16,
            beam_type: word(side.beam_id),
            beam_count: word(side.beam_count),
            bay_count: word(side.bay_count),
            torp_type: word(side.torpedo_id),
            ammo: word(ammo),
            launcher_count: word(side.launcher_count),
        }
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put_str(&self.name, 20);
        w.put_u16(self.damage);
        w.put_u16(self.crew);
        w.put_u16(self.object_id);
        w.put_u16(self.race);
        w.put_u16(self.image_hull);
        w.put_u16(self.beam_type);
        w.put_u16(self.beam_count);
        w.put_u16(self.bay_count);
        w.put_u16(self.torp_type);
        w.put_u16(self.ammo);
        w.put_u16(self.launcher_count);
    }

    fn read(r: &mut RecordReader) -> Result<Self, nubridge_codec::CodecError> {
        Ok(Self {
            name: r.take_str(20)?,
            damage: r.take_u16()?,
            crew: r.take_u16()?,
            object_id: r.take_u16()?,
            race: r.take_u16()?,
            image_hull: r.take_u16()?,
            beam_type: r.take_u16()?,
            beam_count: r.take_u16()?,
            bay_count: r.take_u16()?,
            torp_type: r.take_u16()?,
            ammo: r.take_u16()?,
            launcher_count: r.take_u16()?,
        })
    }
}

/// One combat record, 100 bytes on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VcrRecord {
    pub seed: u16,
    pub temperature: u16,
    pub battle_type: u16,
    pub left_mass: u16,
    pub right_mass: u16,
    pub left: VcrSideRecord,
    pub right: VcrSideRecord,
    pub left_shield: u16,
    pub right_shield: u16,
}

impl VcrRecord {
    /// Encoded record size.
    pub const SIZE: usize = 100;

    /// Build the replayable record for one battle.
    pub fn from_snapshot(vcr: &Vcr) -> Self {
        Self {
            seed: word(vcr.seed),
            temperature: word(vcr.temperature),
            battle_type: word(vcr.battle_type),
            left_mass: word(vcr.left.mass),
            right_mass: word(vcr.right.mass),
            left: VcrSideRecord::from_snapshot(&vcr.left),
            right: VcrSideRecord::from_snapshot(&vcr.right),
            left_shield: word(vcr.left.shield),
            right_shield: word(vcr.right.shield),
        }
    }

    /// Encode to the 100-byte wire form.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = RecordWriter::with_capacity(Self::SIZE);
        w.put_u16(self.seed);
        w.put_u16(VCR_SIGNATURE);
        w.put_u16(self.temperature);
        w.put_u16(self.battle_type);
        w.put_u16(self.left_mass);
        w.put_u16(self.right_mass);
        self.left.write(&mut w);
        self.right.write(&mut w);
        w.put_u16(self.left_shield);
        w.put_u16(self.right_shield);
        debug_assert_eq!(w.len(), Self::SIZE);
        w.into_bytes()
    }

    /// Decode one record from its wire form.
    pub fn decode(data: &[u8]) -> Result<Self, V3Error> {
        let mut r = RecordReader::new(data);
        let short = |source| V3Error::Short {
            kind: "vcr",
            source,
        };
        let seed = r.take_u16().map_err(short)?;
        let _signature = r.take_u16().map_err(short)?;
        Ok(Self {
            seed,
            temperature: r.take_u16().map_err(short)?,
            battle_type: r.take_u16().map_err(short)?,
            left_mass: r.take_u16().map_err(short)?,
            right_mass: r.take_u16().map_err(short)?,
            left: VcrSideRecord::read(&mut r).map_err(short)?,
            right: VcrSideRecord::read(&mut r).map_err(short)?,
            left_shield: r.take_u16().map_err(short)?,
            right_shield: r.take_u16().map_err(short)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battle() -> Vcr {
        serde_json::from_value(serde_json::json!({
            "id": 1, "seed": 12345, "battletype": 0, "temperature": 50,
            "left": {
                "objectid": 10, "name": "Attacker", "raceid": 2, "hullid": 15,
                "beamid": 6, "beamcount": 4, "torpedoid": 7, "torpedos": 20,
                "launchercount": 3, "shield": 100, "crew": 430, "mass": 280
            },
            "right": {
                "objectid": 33, "name": "Defender", "raceid": 9, "hullid": 70,
                "baycount": 8, "fighters": 50, "shield": 90, "crew": 1000, "mass": 800
            }
        }))
        .unwrap()
    }

    #[test]
    fn signature_and_size_are_fixed() {
        let record = VcrRecord::from_snapshot(&battle());
        let bytes = record.encode();
        assert_eq!(bytes.len(), VcrRecord::SIZE);
        assert_eq!(&bytes[2..4], &VCR_SIGNATURE.to_le_bytes());
    }

    #[test]
    fn ammo_follows_the_armament() {
        let record = VcrRecord::from_snapshot(&battle());
        assert_eq!(record.left.ammo, 20); // tubes: torpedoes
        assert_eq!(record.right.ammo, 50); // bays: fighters
        assert_eq!(record.left.image_hull, 1 + 256 * 15);
    }

    #[test]
    fn record_round_trips() {
        let record = VcrRecord::from_snapshot(&battle());
        let decoded = VcrRecord::decode(&record.encode()).unwrap();
        assert_eq!(decoded, record);
    }
}
