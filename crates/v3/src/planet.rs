//! Planet records.

use crate::{dword, word, V3Error, PLANET_LAYOUT};
use nubridge_codec::{RecordReader, RecordWriter};
use nubridge_snapshot::{Planet, PlayerMap};

/// One planet record, 85 bytes on the wire.
///
/// Temperature is stored inverted relative to the snapshot:
/// `temp_code = 100 - temp` for known temperatures, -1 for unknown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanetRecord {
    pub race: u16,
    pub id: u16,
    pub friendly_code: String,
    pub mines: u16,
    pub factories: u16,
    pub defense: u16,
    pub neutronium: u32,
    pub tritanium: u32,
    pub duranium: u32,
    pub molybdenum: u32,
    pub clans: u32,
    pub supplies: u32,
    pub megacredits: u32,
    /// Ground minerals in neutronium, tritanium, duranium, molybdenum order.
    pub ground_minerals: [u32; 4],
    /// Densities in the same order.
    pub densities: [u16; 4],
    pub colonist_tax: u16,
    pub native_tax: u16,
    pub colonist_happy: i16,
    pub native_happy: i16,
    pub native_government: u16,
    pub native_clans: u32,
    pub native_type: u16,
    pub temp_code: i16,
    pub build_base: u16,
}

impl PlanetRecord {
    /// Encoded record size.
    pub const SIZE: usize = 85;

    /// Build the post-turn record for a planet.
    pub fn from_snapshot(planet: &Planet, players: &PlayerMap) -> Self {
        Self {
            race: players.race_of(planet.owner_id),
            id: word(planet.id),
            friendly_code: planet.friendly_code.clone(),
            mines: word(planet.mines),
            factories: word(planet.factories),
            defense: word(planet.defense),
            neutronium: dword(planet.neutronium),
            tritanium: dword(planet.tritanium),
            duranium: dword(planet.duranium),
            molybdenum: dword(planet.molybdenum),
            clans: dword(planet.clans),
            supplies: dword(planet.supplies),
            megacredits: dword(planet.megacredits),
            ground_minerals: [
                dword(planet.ground_neutronium),
                dword(planet.ground_tritanium),
                dword(planet.ground_duranium),
                dword(planet.ground_molybdenum),
            ],
            densities: [
                word(planet.density_neutronium),
                word(planet.density_tritanium),
                word(planet.density_duranium),
                word(planet.density_molybdenum),
            ],
            colonist_tax: word(planet.colonist_tax_rate),
            native_tax: word(planet.native_tax_rate),
            colonist_happy: planet.colonist_happy_points.clamp(-500, 500) as i16,
            native_happy: planet.native_happy_points.clamp(-500, 500) as i16,
            native_government: word(planet.native_government),
            native_clans: dword(planet.native_clans),
            native_type: word(planet.native_type),
            temp_code: if planet.temp >= 0 {
                (100 - planet.temp) as i16
            } else {
                -1
            },
            build_base: u16::from(planet.building_starbase),
        }
    }

    /// Whether this planet belongs in the packed file set: anything beyond
    /// an all-defaults record with friendly code `???` counts as seen.
    pub fn is_visible(planet: &Planet) -> bool {
        planet.friendly_code != "???" || planet.is_populated()
    }

    /// Encode to the 85-byte wire form.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = RecordWriter::with_capacity(Self::SIZE);
        w.put_u16(self.race);
        w.put_u16(self.id);
        w.put_str(&self.friendly_code, 3);
        w.put_u16(self.mines);
        w.put_u16(self.factories);
        w.put_u16(self.defense);
        w.put_u32(self.neutronium);
        w.put_u32(self.tritanium);
        w.put_u32(self.duranium);
        w.put_u32(self.molybdenum);
        w.put_u32(self.clans);
        w.put_u32(self.supplies);
        w.put_u32(self.megacredits);
        for ground in self.ground_minerals {
            w.put_u32(ground);
        }
        for density in self.densities {
            w.put_u16(density);
        }
        w.put_u16(self.colonist_tax);
        w.put_u16(self.native_tax);
        w.put_i16(self.colonist_happy);
        w.put_i16(self.native_happy);
        w.put_u16(self.native_government);
        w.put_u32(self.native_clans);
        w.put_u16(self.native_type);
        w.put_i16(self.temp_code);
        w.put_u16(self.build_base);
        debug_assert_eq!(w.len(), PLANET_LAYOUT.byte_len());
        w.into_bytes()
    }

    /// Decode one record from its wire form.
    pub fn decode(data: &[u8]) -> Result<Self, V3Error> {
        let mut r = RecordReader::new(data);
        let short = |source| V3Error::Short {
            kind: "planet",
            source,
        };
        Ok(Self {
            race: r.take_u16().map_err(short)?,
            id: r.take_u16().map_err(short)?,
            friendly_code: r.take_str(3).map_err(short)?,
            mines: r.take_u16().map_err(short)?,
            factories: r.take_u16().map_err(short)?,
            defense: r.take_u16().map_err(short)?,
            neutronium: r.take_u32().map_err(short)?,
            tritanium: r.take_u32().map_err(short)?,
            duranium: r.take_u32().map_err(short)?,
            molybdenum: r.take_u32().map_err(short)?,
            clans: r.take_u32().map_err(short)?,
            supplies: r.take_u32().map_err(short)?,
            megacredits: r.take_u32().map_err(short)?,
            ground_minerals: {
                let mut ground = [0u32; 4];
                for slot in &mut ground {
                    *slot = r.take_u32().map_err(short)?;
                }
                ground
            },
            densities: {
                let mut densities = [0u16; 4];
                for slot in &mut densities {
                    *slot = r.take_u16().map_err(short)?;
                }
                densities
            },
            colonist_tax: r.take_u16().map_err(short)?,
            native_tax: r.take_u16().map_err(short)?,
            colonist_happy: r.take_i16().map_err(short)?,
            native_happy: r.take_i16().map_err(short)?,
            native_government: r.take_u16().map_err(short)?,
            native_clans: r.take_u32().map_err(short)?,
            native_type: r.take_u16().map_err(short)?,
            temp_code: r.take_i16().map_err(short)?,
            build_base: r.take_u16().map_err(short)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet(json: serde_json::Value) -> Planet {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn temperature_is_inverted() {
        let players = PlayerMap::default();
        let cold = planet(serde_json::json!({"id": 1, "temp": 0}));
        assert_eq!(PlanetRecord::from_snapshot(&cold, &players).temp_code, 100);

        let hot = planet(serde_json::json!({"id": 1, "temp": 100}));
        assert_eq!(PlanetRecord::from_snapshot(&hot, &players).temp_code, 0);

        let unknown = planet(serde_json::json!({"id": 1}));
        let record = PlanetRecord::from_snapshot(&unknown, &players);
        assert_eq!(record.temp_code, -1);
        // The sentinel survives the wire as 0xFFFF.
        let bytes = record.encode();
        assert_eq!(&bytes[PlanetRecord::SIZE - 4..PlanetRecord::SIZE - 2], &[0xFF, 0xFF]);
    }

    #[test]
    fn unseen_planets_are_invisible() {
        let unseen = planet(serde_json::json!({"id": 5, "friendlycode": "???"}));
        assert!(!PlanetRecord::is_visible(&unseen));

        let scanned = planet(serde_json::json!({"id": 5, "friendlycode": "???", "clans": 1}));
        assert!(PlanetRecord::is_visible(&scanned));

        let coded = planet(serde_json::json!({"id": 5, "friendlycode": "abc"}));
        assert!(PlanetRecord::is_visible(&coded));
    }

    #[test]
    fn record_round_trips() {
        let players = PlayerMap::default();
        let source = planet(serde_json::json!({
            "id": 42, "friendlycode": "xyz", "mines": 7, "factories": 11,
            "neutronium": 1200, "clans": 333, "temp": 55, "nativeclans": 9000,
            "colonisthappypoints": -30
        }));
        let record = PlanetRecord::from_snapshot(&source, &players);
        let decoded = PlanetRecord::decode(&record.encode()).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.colonist_happy, -30);
    }
}
