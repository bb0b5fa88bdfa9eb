//! The maketurn pipeline: read the client's edited `.dat` files, diff them
//! against the snapshot, and serialize command records for upload.
//!
//! Planets come first so their coordinates (absent from the planet file,
//! filled in from the snapshot) are available when base flows are
//! reconciled against orbiting ships.

use crate::command::{CommandRecord, TurnDocument};
use crate::config::PackConfig;
use crate::stock::StockReconciler;
use anyhow::{bail, ensure, Context, Result};
use nubridge_snapshot::{stock_type, Planet, PlayerMap, Ship, Snapshot, Starbase};
use nubridge_v3::{BaseRecord, CargoTransfer, PlanetRecord, ShipRecord, V3Error};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Read the edited v3 tree and produce the upload document.
pub fn maketurn(snapshot: &Snapshot, config: &PackConfig) -> Result<TurnDocument> {
    let race = snapshot.local_race_slot();
    ensure!(
        (1..=11).contains(&race),
        "player race slot {race} is out of range"
    );
    let players = snapshot.player_map();
    let racehull_ids = snapshot.racehull_ids();
    let dir = &config.work_dir;

    let ship_records: Vec<ShipRecord> =
        read_counted(dir, &format!("ship{race}.dat"), ShipRecord::SIZE)?
            .iter()
            .map(|bytes| ShipRecord::decode(bytes))
            .collect::<Result<_, _>>()?;
    let planet_records: Vec<PlanetRecord> =
        read_counted(dir, &format!("pdata{race}.dat"), PlanetRecord::SIZE)?
            .iter()
            .map(|bytes| PlanetRecord::decode(bytes))
            .collect::<Result<_, _>>()?;
    let base_records: Vec<BaseRecord> =
        read_counted(dir, &format!("bdata{race}.dat"), BaseRecord::SIZE)?
            .iter()
            .map(|bytes| BaseRecord::decode(bytes))
            .collect::<Result<_, _>>()?;
    info!(
        ships = ship_records.len(),
        planets = planet_records.len(),
        bases = base_records.len(),
        "loaded client tree"
    );

    // Planets: only the local player's records carry orders.
    let mut updated_planets = Vec::new();
    for record in planet_records.iter().filter(|r| r.race == race) {
        let Some(snap) = snapshot.planet(i32::from(record.id)) else {
            bail!("planet {} is not part of the snapshot", record.id);
        };
        updated_planets.push(apply_planet_record(snap, record));
    }

    // Ships.
    let mut updated_ships = Vec::new();
    for record in ship_records.iter().filter(|r| r.race == race) {
        let Some(snap) = snapshot.ship(i32::from(record.id)) else {
            bail!("ship {} is not part of the snapshot", record.id);
        };
        updated_ships.push(apply_ship_record(snap, record, &players));
    }

    // Bases, with ammo flows reconciled against orbiting ships.
    let mut reconciler = StockReconciler::new(&snapshot.stock);
    let mut updated_bases = Vec::new();
    for record in base_records.iter().filter(|r| r.race == race) {
        let planet_id = i32::from(record.planet_id);
        let Some(snap_base) = snapshot.starbase_at(planet_id) else {
            bail!("starbase at planet {planet_id} is not part of the snapshot");
        };
        let planet = snapshot
            .planet(planet_id)
            .with_context(|| format!("planet {planet_id} missing for its starbase"))?;

        let mut fighters_built =
            i64::from(record.fighters) - i64::from(snap_base.fighters)
                + i64::from(snap_base.built_fighters);
        let mut torps_built = [0i64; 10];
        for torp_type in 1..=10usize {
            let (amount, built) = torp_stock_line(snapshot, snap_base.id, torp_type as i32);
            torps_built[torp_type - 1] =
                i64::from(record.torpedo_stock[torp_type - 1]) - i64::from(amount)
                    + i64::from(built);
        }

        // Ammo a docked ship loaded or returned counts as base production.
        for ship_record in ship_records.iter().filter(|r| r.race == race) {
            if i32::from(ship_record.x) != planet.x || i32::from(ship_record.y) != planet.y {
                continue;
            }
            let Some(snap_ship) = snapshot.ship(i32::from(ship_record.id)) else {
                continue;
            };
            let delta = i64::from(ship_record.ammo) - i64::from(snap_ship.ammo);
            if ship_record.bay_count > 0 {
                fighters_built += delta;
            } else if (1..=10).contains(&ship_record.torp_type) && ship_record.tube_count > 0 {
                torps_built[usize::from(ship_record.torp_type) - 1] += delta;
            }
        }

        let mut updated = apply_base_record(snap_base, record, &racehull_ids);
        updated.built_fighters = clamp_i32(fighters_built);

        for (slot, &hull_id) in racehull_ids.iter().take(20).enumerate() {
            reconciler.update(
                snap_base.id,
                stock_type::HULL,
                hull_id,
                i32::from(record.hull_stock[slot]),
            );
        }
        for engine_id in 1..=9usize {
            reconciler.update(
                snap_base.id,
                stock_type::ENGINE,
                engine_id as i32,
                i32::from(record.engine_stock[engine_id - 1]),
            );
        }
        for beam_id in 1..=10usize {
            reconciler.update(
                snap_base.id,
                stock_type::BEAM,
                beam_id as i32,
                i32::from(record.beam_stock[beam_id - 1]),
            );
        }
        for launcher_id in 1..=10usize {
            reconciler.update(
                snap_base.id,
                stock_type::LAUNCHER,
                launcher_id as i32,
                i32::from(record.launcher_stock[launcher_id - 1]),
            );
        }
        for torp_type in 1..=10usize {
            reconciler.update_with_built(
                snap_base.id,
                stock_type::TORPEDO,
                torp_type as i32,
                i32::from(record.torpedo_stock[torp_type - 1]),
                clamp_i32(torps_built[torp_type - 1]),
            );
        }

        updated_bases.push(updated);
    }

    let mut document = TurnDocument::default();
    for planet in &updated_planets {
        let entity = serde_json::to_value(planet).context("serializing planet")?;
        document.push(&CommandRecord::from_entity("Planet", planet.id.into(), &entity));
    }
    for ship in &updated_ships {
        let entity = serde_json::to_value(ship).context("serializing ship")?;
        document.push(&CommandRecord::from_entity("Ship", ship.id.into(), &entity));
    }
    for base in &updated_bases {
        let entity = serde_json::to_value(base).context("serializing starbase")?;
        document.push(&CommandRecord::from_entity("Starbase", base.id.into(), &entity));
    }

    if reconciler.created_any() {
        warn!("new stock records were allocated; re-downloading the turn is advisable");
    }
    for stock in reconciler.into_stocks() {
        let entity = serde_json::to_value(&stock).context("serializing stock")?;
        document.push(&CommandRecord::from_entity("Stock", stock.id.into(), &entity));
    }

    Ok(document)
}

fn torp_stock_line(snapshot: &Snapshot, base_id: i32, torp_type: i32) -> (i32, i32) {
    snapshot
        .stock
        .iter()
        .find(|s| {
            s.starbase_id == base_id
                && s.stock_type == stock_type::TORPEDO
                && s.stock_id == torp_type
        })
        .map_or((0, 0), |s| (s.amount, s.built_amount))
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Fold an edited planet record back into the snapshot entity.
fn apply_planet_record(snap: &Planet, record: &PlanetRecord) -> Planet {
    let mut planet = snap.clone();
    planet.friendly_code = record.friendly_code.clone();

    planet.built_mines += i32::from(record.mines) - snap.mines;
    planet.mines = i32::from(record.mines);
    planet.built_factories += i32::from(record.factories) - snap.factories;
    planet.factories = i32::from(record.factories);
    planet.built_defense += i32::from(record.defense) - snap.defense;
    planet.defense = i32::from(record.defense);

    planet.neutronium = record.neutronium as i32;
    planet.tritanium = record.tritanium as i32;
    planet.duranium = record.duranium as i32;
    planet.molybdenum = record.molybdenum as i32;
    planet.clans = record.clans as i32;
    planet.supplies = record.supplies as i32;
    planet.megacredits = record.megacredits as i32;
    planet.colonist_tax_rate = i32::from(record.colonist_tax);
    planet.native_tax_rate = i32::from(record.native_tax);
    planet.building_starbase = record.build_base != 0;

    // Supplies that disappeared without becoming structures were sold.
    let structure_cost = (planet.mines - snap.mines)
        + (planet.factories - snap.factories)
        + (planet.defense - snap.defense);
    planet.supplies_sold =
        (snap.supplies + snap.supplies_sold - planet.supplies - structure_cost).max(0);

    planet
}

/// Fold an edited ship record back into the snapshot entity.
fn apply_ship_record(snap: &Ship, record: &ShipRecord, players: &PlayerMap) -> Ship {
    let mut ship = snap.clone();
    ship.friendly_code = record.friendly_code.clone();
    ship.warp = i32::from(record.warp);

    let dx = i32::from(record.waypoint_dx);
    let dy = i32::from(record.waypoint_dy);
    if dx != 0 || dy != 0 {
        ship.target_x = Some(ship.x + dx);
        ship.target_y = Some(ship.y + dy);
    } else if snap.target_x.is_some() || snap.target_y.is_some() {
        ship.target_x = Some(ship.x);
        ship.target_y = Some(ship.y);
    }

    ship.mission = i32::from(record.mission.max(1)) - 1;
    // The record keeps tow and intercept targets in separate words; the
    // snapshot field they fold back into depends on the mission.
    ship.mission_1_target = match ship.mission {
        6 => i32::from(record.tow_target),
        7 => i32::from(record.intercept_target),
        _ => snap.mission_1_target,
    };

    ship.enemy = if record.primary_enemy == 0 {
        0
    } else {
        let owner = players.owner_of(record.primary_enemy);
        if owner == 0 {
            warn!(
                ship = ship.id,
                race = record.primary_enemy,
                "primary enemy is not a seat in this game, cleared"
            );
        }
        owner
    };

    // A 20-column rename that matches the truncated original is no rename.
    let snap20: String = snap.name.chars().take(20).collect();
    if record.name != snap20.trim_end() {
        ship.name = record.name.clone();
    }

    ship.neutronium = i32::from(record.neutronium);
    ship.tritanium = i32::from(record.tritanium);
    ship.duranium = i32::from(record.duranium);
    ship.molybdenum = i32::from(record.molybdenum);
    ship.supplies = i32::from(record.supplies);
    ship.megacredits = i32::from(record.megacredits);
    ship.clans = i32::from(record.clans);
    ship.ammo = i32::from(record.ammo);

    apply_ship_transfers(&mut ship, record);
    ship
}

fn apply_ship_transfers(ship: &mut Ship, record: &ShipRecord) {
    let unload = record.unload;
    let mut transfer = record.transfer;

    if !unload.is_empty() && !transfer.is_empty() {
        warn!(
            ship = ship.id,
            "unload and ship transfer cannot coexist, dropping the transfer"
        );
        transfer = CargoTransfer::default();
    }

    let (block, target_type) = if !transfer.is_empty() {
        (transfer, 2)
    } else if !unload.is_empty() {
        if unload.target_id == 0 {
            // Target 0 with cargo set is a jettison; the block itself
            // cannot distinguish it from an unload.
            warn!(ship = ship.id, "unload block with target 0 treated as jettison");
            (unload, 3)
        } else {
            (unload, 1)
        }
    } else {
        (CargoTransfer::default(), 0)
    };

    ship.transfer_neutronium = i32::from(block.neutronium);
    ship.transfer_tritanium = i32::from(block.tritanium);
    ship.transfer_duranium = i32::from(block.duranium);
    ship.transfer_molybdenum = i32::from(block.molybdenum);
    ship.transfer_clans = i32::from(block.clans);
    ship.transfer_supplies = i32::from(block.supplies);
    ship.transfer_target_id = i32::from(block.target_id);
    ship.transfer_target_type = target_type;
    // Megacredit and ammo transfers have no slot in the cargo blocks; the
    // snapshot values pass through untouched.
}

/// Fold an edited base record back into the snapshot entity.
fn apply_base_record(snap: &Starbase, record: &BaseRecord, racehull_ids: &[i32]) -> Starbase {
    let mut base = snap.clone();
    base.built_defense += i32::from(record.defense) - snap.defense;
    base.defense = i32::from(record.defense);

    base.engine_tech_up += i32::from(record.engine_tech) - snap.engine_tech_level;
    base.engine_tech_level = i32::from(record.engine_tech);
    base.hull_tech_up += i32::from(record.hull_tech) - snap.hull_tech_level;
    base.hull_tech_level = i32::from(record.hull_tech);
    base.beam_tech_up += i32::from(record.beam_tech) - snap.beam_tech_level;
    base.beam_tech_level = i32::from(record.beam_tech);
    base.torp_tech_up += i32::from(record.torp_tech) - snap.torp_tech_level;
    base.torp_tech_level = i32::from(record.torp_tech);

    base.fighters = i32::from(record.fighters);
    base.mission = i32::from(record.mission);
    base.ship_mission = i32::from(record.ship_mission);
    base.target_ship_id = i32::from(record.target_ship);

    if record.build_hull_slot > 0 {
        match racehull_ids.get(usize::from(record.build_hull_slot) - 1) {
            Some(&hull_id) => {
                base.build_hull_id = hull_id;
                base.is_building = true;
            }
            None => {
                warn!(
                    base = base.id,
                    slot = record.build_hull_slot,
                    "build slot has no hull in the buildable list, order cleared"
                );
                base.build_hull_id = 0;
                base.is_building = false;
            }
        }
    } else {
        base.build_hull_id = 0;
        base.is_building = false;
    }
    base.build_engine_id = i32::from(record.build_engine);
    base.build_beam_id = i32::from(record.build_beam);
    base.build_beam_count = i32::from(record.build_beam_count);
    base.build_torpedo_id = i32::from(record.build_torp);
    base.build_torp_count = i32::from(record.build_torp_count);

    base
}

fn read_counted(dir: &Path, name: &str, record_size: usize) -> Result<Vec<Vec<u8>>> {
    let path = dir.join(name);
    let bytes =
        fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
    if bytes.len() < 2 {
        return Err(V3Error::FormatMismatch {
            file: name.to_string(),
            expected: 2,
            actual: bytes.len(),
        }
        .into());
    }
    let count = usize::from(u16::from_le_bytes([bytes[0], bytes[1]]));
    let expected = 2 + count * record_size;
    if bytes.len() != expected {
        return Err(V3Error::FormatMismatch {
            file: name.to_string(),
            expected,
            actual: bytes.len(),
        }
        .into());
    }
    Ok((0..count)
        .map(|index| bytes[2 + index * record_size..2 + (index + 1) * record_size].to_vec())
        .collect())
}
