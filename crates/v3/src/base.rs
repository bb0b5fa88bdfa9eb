//! Starbase records.

use crate::{word, V3Error, BASE_LAYOUT};
use nubridge_codec::{RecordReader, RecordWriter};
use nubridge_snapshot::{stock_type, Starbase, Stock};
use tracing::warn;

/// One starbase record, 156 bytes on the wire.
///
/// Hull stocks are indexed by build slot (position in the owner's
/// buildable-hull list), not by hull id; `build_hull_slot` uses the same
/// 1-based numbering, 0 when nothing is being built.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseRecord {
    pub planet_id: u16,
    pub race: u16,
    pub defense: u16,
    pub damage: u16,
    pub engine_tech: u16,
    pub hull_tech: u16,
    pub beam_tech: u16,
    pub torp_tech: u16,
    pub engine_stock: [u16; 9],
    pub hull_stock: [u16; 20],
    pub beam_stock: [u16; 10],
    pub launcher_stock: [u16; 10],
    pub torpedo_stock: [u16; 10],
    pub fighters: u16,
    pub target_ship: u16,
    pub ship_mission: u16,
    pub mission: u16,
    pub build_hull_slot: u16,
    pub build_engine: u16,
    pub build_beam: u16,
    pub build_beam_count: u16,
    pub build_torp: u16,
    pub build_torp_count: u16,
    pub reserved: u16,
}

impl Default for BaseRecord {
    fn default() -> Self {
        Self {
            planet_id: 0,
            race: 0,
            defense: 0,
            damage: 0,
            engine_tech: 1,
            hull_tech: 1,
            beam_tech: 1,
            torp_tech: 1,
            engine_stock: [0; 9],
            hull_stock: [0; 20],
            beam_stock: [0; 10],
            launcher_stock: [0; 10],
            torpedo_stock: [0; 10],
            fighters: 0,
            target_ship: 0,
            ship_mission: 0,
            mission: 0,
            build_hull_slot: 0,
            build_engine: 0,
            build_beam: 0,
            build_beam_count: 0,
            build_torp: 0,
            build_torp_count: 0,
            reserved: 0,
        }
    }
}

impl BaseRecord {
    /// Encoded record size.
    pub const SIZE: usize = 156;

    /// Build the post-turn record for a starbase the local player owns.
    ///
    /// `stocks` is the full snapshot stock list; only lines for this base
    /// are read. `racehull_ids` is the owner's buildable-hull list in
    /// build-slot order.
    pub fn from_snapshot(
        base: &Starbase,
        race: u16,
        stocks: &[Stock],
        racehull_ids: &[i32],
    ) -> Self {
        let mut record = Self {
            planet_id: word(base.planet_id),
            race,
            defense: word(base.defense),
            damage: word(base.damage),
            engine_tech: word(base.engine_tech_level.max(1)),
            hull_tech: word(base.hull_tech_level.max(1)),
            beam_tech: word(base.beam_tech_level.max(1)),
            torp_tech: word(base.torp_tech_level.max(1)),
            fighters: word(base.fighters),
            target_ship: word(base.target_ship_id),
            ship_mission: word(base.ship_mission),
            mission: word(base.mission),
            build_engine: word(base.build_engine_id),
            build_beam: word(base.build_beam_id),
            build_beam_count: word(base.build_beam_count),
            build_torp: word(base.build_torpedo_id),
            build_torp_count: word(base.build_torp_count),
            ..Self::default()
        };

        for stock in stocks.iter().filter(|s| s.starbase_id == base.id) {
            let amount = word(stock.amount);
            match stock.stock_type {
                stock_type::HULL => {
                    match hull_slot(racehull_ids, stock.stock_id) {
                        Some(slot) if slot <= 20 => record.hull_stock[slot - 1] = amount,
                        _ => warn!(
                            base = base.id,
                            hull = stock.stock_id,
                            "hull stock for a hull the owner cannot build, skipped"
                        ),
                    }
                }
                stock_type::ENGINE => put_slot(&mut record.engine_stock, stock.stock_id, amount),
                stock_type::BEAM => put_slot(&mut record.beam_stock, stock.stock_id, amount),
                stock_type::LAUNCHER => {
                    put_slot(&mut record.launcher_stock, stock.stock_id, amount)
                }
                stock_type::TORPEDO => put_slot(&mut record.torpedo_stock, stock.stock_id, amount),
                other => warn!(base = base.id, kind = other, "unknown stock type, skipped"),
            }
        }

        if base.is_building {
            match hull_slot(racehull_ids, base.build_hull_id) {
                Some(slot) => record.build_hull_slot = slot as u16,
                None => {
                    warn!(
                        base = base.id,
                        hull = base.build_hull_id,
                        "build order names a hull the owner cannot build, cleared"
                    );
                    record.build_hull_slot = 0;
                }
            }
        }

        record
    }

    /// Encode to the 156-byte wire form.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = RecordWriter::with_capacity(Self::SIZE);
        w.put_u16(self.planet_id);
        w.put_u16(self.race);
        w.put_u16(self.defense);
        w.put_u16(self.damage);
        w.put_u16(self.engine_tech);
        w.put_u16(self.hull_tech);
        w.put_u16(self.beam_tech);
        w.put_u16(self.torp_tech);
        for stock in self.engine_stock {
            w.put_u16(stock);
        }
        for stock in self.hull_stock {
            w.put_u16(stock);
        }
        for stock in self.beam_stock {
            w.put_u16(stock);
        }
        for stock in self.launcher_stock {
            w.put_u16(stock);
        }
        for stock in self.torpedo_stock {
            w.put_u16(stock);
        }
        w.put_u16(self.fighters);
        w.put_u16(self.target_ship);
        w.put_u16(self.ship_mission);
        w.put_u16(self.mission);
        w.put_u16(self.build_hull_slot);
        w.put_u16(self.build_engine);
        w.put_u16(self.build_beam);
        w.put_u16(self.build_beam_count);
        w.put_u16(self.build_torp);
        w.put_u16(self.build_torp_count);
        w.put_u16(self.reserved);
        debug_assert_eq!(w.len(), BASE_LAYOUT.byte_len());
        w.into_bytes()
    }

    /// Decode one record from its wire form.
    pub fn decode(data: &[u8]) -> Result<Self, V3Error> {
        let mut r = RecordReader::new(data);
        let short = |source| V3Error::Short {
            kind: "base",
            source,
        };
        let mut record = Self {
            planet_id: r.take_u16().map_err(short)?,
            race: r.take_u16().map_err(short)?,
            defense: r.take_u16().map_err(short)?,
            damage: r.take_u16().map_err(short)?,
            engine_tech: r.take_u16().map_err(short)?,
            hull_tech: r.take_u16().map_err(short)?,
            beam_tech: r.take_u16().map_err(short)?,
            torp_tech: r.take_u16().map_err(short)?,
            ..Self::default()
        };
        for slot in &mut record.engine_stock {
            *slot = r.take_u16().map_err(short)?;
        }
        for slot in &mut record.hull_stock {
            *slot = r.take_u16().map_err(short)?;
        }
        for slot in &mut record.beam_stock {
            *slot = r.take_u16().map_err(short)?;
        }
        for slot in &mut record.launcher_stock {
            *slot = r.take_u16().map_err(short)?;
        }
        for slot in &mut record.torpedo_stock {
            *slot = r.take_u16().map_err(short)?;
        }
        record.fighters = r.take_u16().map_err(short)?;
        record.target_ship = r.take_u16().map_err(short)?;
        record.ship_mission = r.take_u16().map_err(short)?;
        record.mission = r.take_u16().map_err(short)?;
        record.build_hull_slot = r.take_u16().map_err(short)?;
        record.build_engine = r.take_u16().map_err(short)?;
        record.build_beam = r.take_u16().map_err(short)?;
        record.build_beam_count = r.take_u16().map_err(short)?;
        record.build_torp = r.take_u16().map_err(short)?;
        record.build_torp_count = r.take_u16().map_err(short)?;
        record.reserved = r.take_u16().map_err(short)?;
        Ok(record)
    }
}

/// 1-based build slot of a hull id within the owner's buildable list.
pub fn hull_slot(racehull_ids: &[i32], hull_id: i32) -> Option<usize> {
    racehull_ids.iter().position(|&id| id == hull_id).map(|p| p + 1)
}

fn put_slot(slots: &mut [u16], component_id: i32, amount: u16) {
    if component_id >= 1 && (component_id as usize) <= slots.len() {
        slots[component_id as usize - 1] = amount;
    } else {
        warn!(component = component_id, "stock component id out of range, skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(base: i32, kind: i32, id: i32, amount: i32) -> Stock {
        Stock {
            id: 100 + id,
            starbase_id: base,
            stock_type: kind,
            stock_id: id,
            amount,
            ..Default::default()
        }
    }

    #[test]
    fn stocks_land_in_their_slots() {
        let base = Starbase {
            id: 7,
            planet_id: 10,
            ..Default::default()
        };
        let stocks = vec![
            stock(7, stock_type::ENGINE, 3, 2),
            stock(7, stock_type::HULL, 16, 1),
            stock(7, stock_type::TORPEDO, 10, 40),
            stock(8, stock_type::ENGINE, 1, 99), // other base, ignored
        ];
        let record = BaseRecord::from_snapshot(&base, 4, &stocks, &[15, 16, 17]);
        assert_eq!(record.engine_stock[2], 2);
        assert_eq!(record.hull_stock[1], 1); // hull 16 is build slot 2
        assert_eq!(record.torpedo_stock[9], 40);
        assert_eq!(record.engine_stock[0], 0);
    }

    #[test]
    fn unbuildable_hull_clears_the_build_order() {
        let base = Starbase {
            id: 7,
            planet_id: 10,
            build_hull_id: 99,
            is_building: true,
            ..Default::default()
        };
        let record = BaseRecord::from_snapshot(&base, 4, &[], &[15, 16, 17]);
        assert_eq!(record.build_hull_slot, 0);

        let mut buildable = base.clone();
        buildable.build_hull_id = 17;
        let record = BaseRecord::from_snapshot(&buildable, 4, &[], &[15, 16, 17]);
        assert_eq!(record.build_hull_slot, 3);
    }

    #[test]
    fn record_round_trips() {
        let base = Starbase {
            id: 7,
            planet_id: 10,
            defense: 60,
            hull_tech_level: 6,
            fighters: 20,
            ..Default::default()
        };
        let record = BaseRecord::from_snapshot(&base, 4, &[], &[]);
        let decoded = BaseRecord::decode(&record.encode()).unwrap();
        assert_eq!(decoded, record);
    }
}
