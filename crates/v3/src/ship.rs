//! Ship and target records.

use crate::{word, V3Error, SHIP_LAYOUT, TARGET_LAYOUT};
use nubridge_codec::{RecordReader, RecordWriter};
use nubridge_snapshot::{PlayerMap, Ship};
use tracing::warn;

/// One 14-byte cargo block: an unload-to-planet order or a ship-to-ship
/// transfer, depending on which slot it occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CargoTransfer {
    pub neutronium: u16,
    pub tritanium: u16,
    pub duranium: u16,
    pub molybdenum: u16,
    pub clans: u16,
    pub supplies: u16,
    pub target_id: u16,
}

impl CargoTransfer {
    /// Whether every word in the block is zero.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether any cargo amount is set, regardless of target.
    pub fn has_cargo(&self) -> bool {
        self.neutronium != 0
            || self.tritanium != 0
            || self.duranium != 0
            || self.molybdenum != 0
            || self.clans != 0
            || self.supplies != 0
    }

    fn from_ship(ship: &Ship) -> Self {
        Self {
            neutronium: word(ship.transfer_neutronium),
            tritanium: word(ship.transfer_tritanium),
            duranium: word(ship.transfer_duranium),
            molybdenum: word(ship.transfer_molybdenum),
            clans: word(ship.transfer_clans),
            supplies: word(ship.transfer_supplies),
            target_id: word(ship.transfer_target_id),
        }
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put_u16(self.neutronium);
        w.put_u16(self.tritanium);
        w.put_u16(self.duranium);
        w.put_u16(self.molybdenum);
        w.put_u16(self.clans);
        w.put_u16(self.supplies);
        w.put_u16(self.target_id);
    }

    fn read(r: &mut RecordReader) -> Result<Self, nubridge_codec::CodecError> {
        Ok(Self {
            neutronium: r.take_u16()?,
            tritanium: r.take_u16()?,
            duranium: r.take_u16()?,
            molybdenum: r.take_u16()?,
            clans: r.take_u16()?,
            supplies: r.take_u16()?,
            target_id: r.take_u16()?,
        })
    }
}

/// One owned-ship record, 107 bytes on the wire.
///
/// Missions are 1-based here. The tow and intercept targets are separate
/// words even though the snapshot multiplexes them through one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipRecord {
    pub id: u16,
    pub race: u16,
    pub friendly_code: String,
    pub warp: u16,
    pub waypoint_dx: i16,
    pub waypoint_dy: i16,
    pub x: u16,
    pub y: u16,
    pub engine: u16,
    pub hull: u16,
    pub beam: u16,
    pub beam_count: u16,
    pub bay_count: u16,
    pub torp_type: u16,
    pub ammo: u16,
    pub tube_count: u16,
    pub mission: u16,
    pub primary_enemy: u16,
    pub tow_target: u16,
    pub damage: u16,
    pub crew: u16,
    pub clans: u16,
    pub name: String,
    pub neutronium: u16,
    pub tritanium: u16,
    pub duranium: u16,
    pub molybdenum: u16,
    pub supplies: u16,
    pub unload: CargoTransfer,
    pub transfer: CargoTransfer,
    pub intercept_target: u16,
    pub megacredits: u16,
}

/// Snapshot mission number for towing.
const MISSION_TOW: i32 = 6;
/// Snapshot mission number for intercepting.
const MISSION_INTERCEPT: i32 = 7;

impl ShipRecord {
    /// Encoded record size.
    pub const SIZE: usize = 107;

    /// Build the post-turn record for an owned ship.
    pub fn from_snapshot(ship: &Ship, players: &PlayerMap) -> Self {
        let (dx, dy) = ship.waypoint_delta();

        // The snapshot multiplexes the tow and intercept targets through
        // one field; the record keeps two words. Other missions have no
        // target word at all.
        let (tow_target, intercept_target) = match ship.mission {
            MISSION_TOW => (word(ship.mission_1_target), 0),
            MISSION_INTERCEPT => (0, word(ship.mission_1_target)),
            _ => (0, 0),
        };

        let mut unload = CargoTransfer::default();
        let mut transfer = CargoTransfer::default();
        match ship.transfer_target_type {
            0 => {}
            1 | 3 => {
                unload = CargoTransfer::from_ship(ship);
                if ship.transfer_target_type == 3 {
                    // Jettison shares the unload block with target 0; the
                    // reverse mapping is ambiguous, flag it here.
                    warn!(
                        ship = ship.id,
                        "jettison order packed as unload with target 0"
                    );
                    unload.target_id = 0;
                }
            }
            2 => transfer = CargoTransfer::from_ship(ship),
            other => {
                warn!(ship = ship.id, kind = other, "unknown transfer target type, dropped");
            }
        }
        if ship.transfer_megacredits != 0 {
            warn!(
                ship = ship.id,
                amount = ship.transfer_megacredits,
                "megacredit transfer has no slot in the ship record, dropped"
            );
        }

        Self {
            id: word(ship.id),
            race: players.race_of(ship.owner_id),
            friendly_code: ship.friendly_code.clone(),
            warp: word(ship.warp),
            waypoint_dx: dx.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16,
            waypoint_dy: dy.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16,
            x: word(ship.x),
            y: word(ship.y),
            engine: word(ship.engine_id),
            hull: word(ship.hull_id),
            beam: word(ship.beam_id),
            beam_count: word(ship.beams),
            bay_count: word(ship.bays),
            torp_type: word(ship.torpedo_id),
            ammo: word(ship.ammo),
            tube_count: word(ship.torps),
            mission: word(ship.mission + 1),
            primary_enemy: players.race_of(ship.enemy),
            tow_target,
            damage: word(ship.damage),
            crew: word(ship.crew),
            clans: word(ship.clans),
            name: ship.name.clone(),
            neutronium: word(ship.neutronium),
            tritanium: word(ship.tritanium),
            duranium: word(ship.duranium),
            molybdenum: word(ship.molybdenum),
            supplies: word(ship.supplies),
            unload,
            transfer,
            intercept_target,
            megacredits: word(ship.megacredits),
        }
    }

    /// Encode to the 107-byte wire form.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = RecordWriter::with_capacity(Self::SIZE);
        w.put_u16(self.id);
        w.put_u16(self.race);
        w.put_str(&self.friendly_code, 3);
        w.put_u16(self.warp);
        w.put_i16(self.waypoint_dx);
        w.put_i16(self.waypoint_dy);
        w.put_u16(self.x);
        w.put_u16(self.y);
        w.put_u16(self.engine);
        w.put_u16(self.hull);
        w.put_u16(self.beam);
        w.put_u16(self.beam_count);
        w.put_u16(self.bay_count);
        w.put_u16(self.torp_type);
        w.put_u16(self.ammo);
        w.put_u16(self.tube_count);
        w.put_u16(self.mission);
        w.put_u16(self.primary_enemy);
        w.put_u16(self.tow_target);
        w.put_u16(self.damage);
        w.put_u16(self.crew);
        w.put_u16(self.clans);
        w.put_str(&self.name, 20);
        w.put_u16(self.neutronium);
        w.put_u16(self.tritanium);
        w.put_u16(self.duranium);
        w.put_u16(self.molybdenum);
        w.put_u16(self.supplies);
        self.unload.write(&mut w);
        self.transfer.write(&mut w);
        w.put_u16(self.intercept_target);
        w.put_u16(self.megacredits);
        debug_assert_eq!(w.len(), SHIP_LAYOUT.byte_len());
        w.into_bytes()
    }

    /// Decode one record from its wire form.
    pub fn decode(data: &[u8]) -> Result<Self, V3Error> {
        let mut r = RecordReader::new(data);
        let short = |source| V3Error::Short {
            kind: "ship",
            source,
        };
        Ok(Self {
            id: r.take_u16().map_err(short)?,
            race: r.take_u16().map_err(short)?,
            friendly_code: r.take_str(3).map_err(short)?,
            warp: r.take_u16().map_err(short)?,
            waypoint_dx: r.take_i16().map_err(short)?,
            waypoint_dy: r.take_i16().map_err(short)?,
            x: r.take_u16().map_err(short)?,
            y: r.take_u16().map_err(short)?,
            engine: r.take_u16().map_err(short)?,
            hull: r.take_u16().map_err(short)?,
            beam: r.take_u16().map_err(short)?,
            beam_count: r.take_u16().map_err(short)?,
            bay_count: r.take_u16().map_err(short)?,
            torp_type: r.take_u16().map_err(short)?,
            ammo: r.take_u16().map_err(short)?,
            tube_count: r.take_u16().map_err(short)?,
            mission: r.take_u16().map_err(short)?,
            primary_enemy: r.take_u16().map_err(short)?,
            tow_target: r.take_u16().map_err(short)?,
            damage: r.take_u16().map_err(short)?,
            crew: r.take_u16().map_err(short)?,
            clans: r.take_u16().map_err(short)?,
            name: r.take_str(20).map_err(short)?,
            neutronium: r.take_u16().map_err(short)?,
            tritanium: r.take_u16().map_err(short)?,
            duranium: r.take_u16().map_err(short)?,
            molybdenum: r.take_u16().map_err(short)?,
            supplies: r.take_u16().map_err(short)?,
            unload: CargoTransfer::read(&mut r).map_err(short)?,
            transfer: CargoTransfer::read(&mut r).map_err(short)?,
            intercept_target: r.take_u16().map_err(short)?,
            megacredits: r.take_u16().map_err(short)?,
        })
    }
}

/// One foreign-ship record, 34 bytes on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetRecord {
    pub id: u16,
    pub race: u16,
    pub warp: u16,
    pub x: u16,
    pub y: u16,
    pub hull: u16,
    pub heading: i16,
    pub name: String,
}

impl TargetRecord {
    /// Encoded record size.
    pub const SIZE: usize = 34;

    /// Build the reduced-field record for a ship the local player can only
    /// see from outside.
    pub fn from_snapshot(ship: &Ship, players: &PlayerMap) -> Self {
        Self {
            id: word(ship.id),
            race: players.race_of(ship.owner_id),
            warp: word(ship.warp),
            x: word(ship.x),
            y: word(ship.y),
            hull: word(ship.hull_id),
            heading: ship.heading.clamp(-1, 359) as i16,
            name: ship.name.clone(),
        }
    }

    /// Encode to the 34-byte wire form.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = RecordWriter::with_capacity(Self::SIZE);
        w.put_u16(self.id);
        w.put_u16(self.race);
        w.put_u16(self.warp);
        w.put_u16(self.x);
        w.put_u16(self.y);
        w.put_u16(self.hull);
        w.put_i16(self.heading);
        w.put_str(&self.name, 20);
        debug_assert_eq!(w.len(), TARGET_LAYOUT.byte_len());
        w.into_bytes()
    }

    /// Decode one record from its wire form.
    pub fn decode(data: &[u8]) -> Result<Self, V3Error> {
        let mut r = RecordReader::new(data);
        let short = |source| V3Error::Short {
            kind: "target",
            source,
        };
        Ok(Self {
            id: r.take_u16().map_err(short)?,
            race: r.take_u16().map_err(short)?,
            warp: r.take_u16().map_err(short)?,
            x: r.take_u16().map_err(short)?,
            y: r.take_u16().map_err(short)?,
            hull: r.take_u16().map_err(short)?,
            heading: r.take_i16().map_err(short)?,
            name: r.take_str(20).map_err(short)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nubridge_snapshot::Player;

    fn players() -> PlayerMap {
        PlayerMap::new(&[
            Player {
                id: 1,
                race_id: 1,
                ..Default::default()
            },
            Player {
                id: 2,
                race_id: 5,
                ..Default::default()
            },
        ])
    }

    fn minimal_ship() -> Ship {
        Ship {
            id: 1,
            owner_id: 1,
            hull_id: 1,
            engine_id: 1,
            x: 1000,
            y: 1000,
            ..Default::default()
        }
    }

    #[test]
    fn minimal_ship_record_bytes() {
        let record = ShipRecord::from_snapshot(&minimal_ship(), &players());
        let bytes = record.encode();
        assert_eq!(bytes.len(), ShipRecord::SIZE);
        assert_eq!(
            &bytes[..20],
            &[
                0x01, 0x00, 0x01, 0x00, 0x20, 0x20, 0x20, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0xE8, 0x03, 0xE8, 0x03, 0x01, 0x00, 0x01,
            ]
        );
    }

    #[test]
    fn record_round_trips() {
        let mut ship = minimal_ship();
        ship.name = "Sabre Class".into();
        ship.friendly_code = "abc".into();
        ship.mission = 2;
        ship.warp = 9;
        let record = ShipRecord::from_snapshot(&ship, &players());
        let decoded = ShipRecord::decode(&record.encode()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn tow_and_intercept_use_distinct_slots() {
        let mut tow = minimal_ship();
        tow.mission = MISSION_TOW;
        tow.mission_1_target = 42;
        let record = ShipRecord::from_snapshot(&tow, &players());
        assert_eq!(record.mission, 7);
        assert_eq!(record.tow_target, 42);
        assert_eq!(record.intercept_target, 0);

        let mut intercept = minimal_ship();
        intercept.mission = MISSION_INTERCEPT;
        intercept.mission_1_target = 17;
        let record = ShipRecord::from_snapshot(&intercept, &players());
        assert_eq!(record.mission, 8);
        assert_eq!(record.tow_target, 0);
        assert_eq!(record.intercept_target, 17);
    }

    #[test]
    fn transfer_blocks_route_by_target_type() {
        let mut ship = minimal_ship();
        ship.transfer_target_type = 2;
        ship.transfer_supplies = 30;
        ship.transfer_target_id = 9;
        let record = ShipRecord::from_snapshot(&ship, &players());
        assert!(record.unload.is_empty());
        assert_eq!(record.transfer.supplies, 30);
        assert_eq!(record.transfer.target_id, 9);

        ship.transfer_target_type = 1;
        let record = ShipRecord::from_snapshot(&ship, &players());
        assert!(record.transfer.is_empty());
        assert_eq!(record.unload.supplies, 30);
    }

    #[test]
    fn foreign_owner_maps_to_race_slot() {
        let mut ship = minimal_ship();
        ship.owner_id = 2;
        let record = TargetRecord::from_snapshot(&ship, &players());
        assert_eq!(record.race, 5);
        let decoded = TargetRecord::decode(&record.encode()).unwrap();
        assert_eq!(decoded, record);
    }
}
