//! The ship position file: 999 quadruples of x, y, race, mass, indexed by
//! ship id with zero padding for gaps.

use crate::word;
use nubridge_codec::RecordWriter;
use nubridge_snapshot::{PlayerMap, Ship};

/// Entry count; one per possible ship id.
pub const SHIPXY_ENTRIES: usize = 999;

/// Encoded file size.
pub const SHIPXY_SIZE: usize = SHIPXY_ENTRIES * 8;

/// Encode the position table for every ship in the snapshot.
pub fn encode_shipxy(ships: &[Ship], players: &PlayerMap) -> Vec<u8> {
    let mut entries = [(0u16, 0u16, 0u16, 0u16); SHIPXY_ENTRIES];
    for ship in ships {
        if ship.id >= 1 && (ship.id as usize) <= SHIPXY_ENTRIES {
            entries[ship.id as usize - 1] = (
                word(ship.x),
                word(ship.y),
                players.race_of(ship.owner_id),
                word(ship.mass),
            );
        }
    }

    let mut w = RecordWriter::with_capacity(SHIPXY_SIZE);
    for (x, y, race, mass) in entries {
        w.put_u16(x);
        w.put_u16(y);
        w.put_u16(race);
        w.put_u16(mass);
    }
    w.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nubridge_snapshot::Player;

    #[test]
    fn entries_are_indexed_by_ship_id() {
        let players = PlayerMap::new(&[Player {
            id: 3,
            race_id: 9,
            ..Default::default()
        }]);
        let ships = vec![Ship {
            id: 2,
            owner_id: 3,
            x: 1200,
            y: 2400,
            mass: 180,
            ..Default::default()
        }];
        let bytes = encode_shipxy(&ships, &players);
        assert_eq!(bytes.len(), SHIPXY_SIZE);
        // Ship 2 occupies the second entry.
        assert_eq!(&bytes[8..16], &[0xB0, 0x04, 0x60, 0x09, 0x09, 0x00, 0xB4, 0x00]);
        // Gap entries stay zero.
        assert!(bytes[..8].iter().all(|&b| b == 0));
    }
}
