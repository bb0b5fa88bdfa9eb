//! The pack pipeline: one snapshot in, one v3 tree out.
//!
//! Bases are packed before planets and planets before ships, so every
//! build has charged the flow ledger before a resource holder reclaims
//! it. A mid-run failure leaves a partial tree; callers discard it.

use crate::config::{PackConfig, PackMode, PackReport};
use crate::flow::{FlowLedger, Location, Resource};
use crate::messages::render_turn_messages;
use anyhow::{ensure, Context, Result};
use nubridge_codec::{byte_checksum, RecordWriter};
use nubridge_snapshot::{stock_type, Planet, PlayerMap, Snapshot, Starbase};
use nubridge_v3::{
    encode_message_file, encode_shipxy, hull_slot, BaseRecord, ControlVector, GenMode, GenSection,
    PlanetRecord, RaceScore, ShipRecord, SpecSynthesizer, TargetRecord, TemplateSource, Timestamp,
    UtilWriter, VcrRecord,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// Structure and component costs the ledger charges per unit built.
const MINE_COST_MC: i64 = 4;
const FACTORY_COST_MC: i64 = 3;
const PLANET_DEFENSE_COST_MC: i64 = 10;
const STRUCTURE_COST_SUPPLIES: i64 = 1;
const BASE_DEFENSE_COST_MC: i64 = 10;
const FIGHTER_COST_MC: i64 = 100;
const FIGHTER_COST_TRI: i64 = 3;
const FIGHTER_COST_MOL: i64 = 2;
const STARBASE_COST_MC: i64 = 900;
const STARBASE_COST_TRI: i64 = 402;
const STARBASE_COST_DUR: i64 = 120;
const STARBASE_COST_MOL: i64 = 340;

/// Pack one snapshot into the configured working directory.
pub fn pack(snapshot: &Snapshot, config: &PackConfig) -> Result<PackReport> {
    let race = snapshot.local_race_slot();
    ensure!(
        (1..=11).contains(&race),
        "player race slot {race} is out of range"
    );
    info!(race, turn = snapshot.game.turn, mode = ?config.mode, "packing turn");

    let players = snapshot.player_map();
    let mut ledger = FlowLedger::new();
    let mut report = PackReport::default();

    write_spec_files(snapshot, config, &mut report)?;
    let timestamp = Timestamp::from_host_start(&snapshot.settings.host_start);

    // Entity sections, in ledger order: builds charge, holders reclaim.
    let bases = pack_bases(snapshot, &players, &mut ledger);
    let planets = pack_planets(snapshot, &players, &mut ledger);
    let (ships, targets) = pack_ships(snapshot, &players, &mut ledger);

    let messages = render_turn_messages(snapshot);
    let vcrs: Vec<Vec<u8>> = snapshot
        .vcrs
        .iter()
        .map(|vcr| VcrRecord::from_snapshot(vcr).encode())
        .collect();
    let shipxy = encode_shipxy(&snapshot.ships, &players);

    let mut control = ControlVector::new();
    for (id, dat, _) in &ships {
        control.set_ship(*id, byte_checksum(dat));
    }
    for (id, dat, _) in &planets {
        control.set_planet(*id, byte_checksum(dat));
    }
    for (id, dat, _) in &bases {
        control.set_base(*id, byte_checksum(dat));
    }

    let gen_mode = match config.mode {
        PackMode::Unpacked => GenMode::Unpacked,
        PackMode::Result => GenMode::Result,
    };
    let gen = GenSection {
        timestamp: timestamp.clone(),
        scores: gen_scores(snapshot, &players),
        race,
        checksums: [
            section_checksum(&ships, gen_mode),
            section_checksum(&planets, gen_mode),
            section_checksum(&bases, gen_mode),
        ],
        turn: snapshot.game.turn.clamp(0, i32::from(u16::MAX)) as u16,
    };

    let util = build_util_stream(snapshot, &players, &timestamp, race);

    match config.mode {
        PackMode::Unpacked => {
            let dir = &config.work_dir;
            write_file(&mut report, dir, &format!("ship{race}.dat"), &counted(&ships, Section::Dat))?;
            write_file(&mut report, dir, &format!("ship{race}.dis"), &counted(&ships, Section::Dis))?;
            write_file(&mut report, dir, &format!("pdata{race}.dat"), &counted(&planets, Section::Dat))?;
            write_file(&mut report, dir, &format!("pdata{race}.dis"), &counted(&planets, Section::Dis))?;
            write_file(&mut report, dir, &format!("bdata{race}.dat"), &counted(&bases, Section::Dat))?;
            write_file(&mut report, dir, &format!("bdata{race}.dis"), &counted(&bases, Section::Dis))?;
            write_file(&mut report, dir, &format!("target{race}.dat"), &counted_plain(&targets))?;
            write_file(&mut report, dir, &format!("mdata{race}.dat"), &encode_message_file(&messages))?;
            write_file(&mut report, dir, &format!("mess{race}.dat"), &encode_message_file(&[]))?;
            write_file(&mut report, dir, &format!("shipxy{race}.dat"), &shipxy)?;
            write_file(&mut report, dir, &format!("gen{race}.dat"), &gen.encode(GenMode::Unpacked))?;
            write_file(&mut report, dir, &format!("vcr{race}.dat"), &counted_plain(&vcrs))?;
            write_file(&mut report, dir, &format!("contrl{race}.dat"), &control.encode())?;
            write_file(&mut report, dir, &format!("util{race}.dat"), &util)?;

            remove_dead_files(dir, race);
            write_file(&mut report, dir, "init.tmp", &updated_init_tmp(dir, race))?;

            if let Some(residuals) = ledger.residual_report() {
                warn!("flow ledger finished with residuals; undo will be incomplete");
                write_file(&mut report, dir, "c2flow.txt", residuals.as_bytes())?;
                report.residuals = true;
            }
        }
        PackMode::Result => {
            let rst = assemble_rst(&[
                counted(&ships, Section::Dat),
                counted_plain(&targets),
                counted(&planets, Section::Dat),
                counted(&bases, Section::Dat),
                encode_message_file(&messages),
                shipxy,
                gen.encode(GenMode::Result),
                counted_plain(&vcrs),
            ]);
            write_file(&mut report, &config.work_dir, &format!("player{race}.rst"), &rst)?;
            write_file(&mut report, &config.work_dir, &format!("util{race}.dat"), &util)?;
        }
    }

    Ok(report)
}

/// Pack only the combat recordings and the spec files needed to view them.
pub fn pack_vcr_only(snapshot: &Snapshot, config: &PackConfig) -> Result<PackReport> {
    let race = snapshot.local_race_slot();
    ensure!(
        (1..=11).contains(&race),
        "player race slot {race} is out of range"
    );
    let mut report = PackReport::default();
    write_spec_files(snapshot, config, &mut report)?;
    let vcrs: Vec<Vec<u8>> = snapshot
        .vcrs
        .iter()
        .map(|vcr| VcrRecord::from_snapshot(vcr).encode())
        .collect();
    write_file(&mut report, &config.work_dir, &format!("vcr{race}.dat"), &counted_plain(&vcrs))?;
    Ok(report)
}

fn write_spec_files(
    snapshot: &Snapshot,
    config: &PackConfig,
    report: &mut PackReport,
) -> Result<()> {
    let templates = TemplateSource::new(&config.work_dir, &config.root_dir);
    let synth = SpecSynthesizer::new(snapshot, &templates);
    let dir = &config.work_dir;
    write_file(report, dir, "beamspec.dat", &synth.beamspec())?;
    write_file(report, dir, "torpspec.dat", &synth.torpspec())?;
    write_file(report, dir, "engspec.dat", &synth.engspec())?;
    write_file(report, dir, "hullspec.dat", &synth.hullspec())?;
    write_file(report, dir, "xyplan.dat", &synth.xyplan())?;
    write_file(report, dir, "planet.nm", &synth.planet_names())?;
    write_file(report, dir, "race.nm", &synth.race_names())?;
    write_file(report, dir, "truehull.dat", &synth.truehull())?;
    write_file(report, dir, "hullfunc.txt", synth.hullfunc().as_bytes())?;
    Ok(())
}

/// (entity id, dat bytes, dis bytes) triples for one section.
type Packed = Vec<(u16, Vec<u8>, Vec<u8>)>;

enum Section {
    Dat,
    Dis,
}

fn counted(records: &Packed, section: Section) -> Vec<u8> {
    let mut w = RecordWriter::new();
    w.put_u16(records.len() as u16);
    for (_, dat, dis) in records {
        match section {
            Section::Dat => w.put_bytes(dat),
            Section::Dis => w.put_bytes(dis),
        }
    }
    w.into_bytes()
}

fn counted_plain(records: &[Vec<u8>]) -> Vec<u8> {
    let mut w = RecordWriter::new();
    w.put_u16(records.len() as u16);
    for record in records {
        w.put_bytes(record);
    }
    w.into_bytes()
}

fn section_checksum(records: &Packed, mode: GenMode) -> u32 {
    let body: u32 = records.iter().map(|(_, dat, _)| byte_checksum(dat)).sum();
    match mode {
        // The count prefix participates in result mode only.
        GenMode::Result => {
            body + byte_checksum(&(records.len() as u16).to_le_bytes())
        }
        GenMode::Unpacked => body,
    }
}

fn pack_bases(snapshot: &Snapshot, players: &PlayerMap, ledger: &mut FlowLedger) -> Packed {
    let racehull_ids = snapshot.racehull_ids();
    let mut bases: Vec<&Starbase> = snapshot
        .starbases
        .iter()
        .filter(|base| {
            snapshot
                .planet(base.planet_id)
                .is_some_and(|p| p.owner_id == snapshot.local_owner_id())
        })
        .collect();
    bases.sort_by_key(|base| base.planet_id);

    let mut packed = Packed::new();
    for base in bases {
        let planet = snapshot
            .planet(base.planet_id)
            .expect("filtered on planet presence");
        let loc = (planet.x, planet.y);

        charge_base_builds(snapshot, ledger, loc, base);

        let dat = BaseRecord::from_snapshot(base, players.race_of(planet.owner_id), &snapshot.stock, &racehull_ids);
        let dis = base_dis_record(&dat, base, snapshot, &racehull_ids, ledger, loc);
        packed.push((dat.planet_id, dat.encode(), dis.encode()));
    }
    packed
}

fn charge_base_builds(
    snapshot: &Snapshot,
    ledger: &mut FlowLedger,
    loc: Location,
    base: &Starbase,
) {
    let defense = i64::from(base.built_defense.max(0));
    ledger.charge(loc, Resource::Cash, defense * BASE_DEFENSE_COST_MC);

    let fighters = i64::from(base.built_fighters.max(0));
    ledger.charge(loc, Resource::Cash, fighters * FIGHTER_COST_MC);
    ledger.charge(loc, Resource::Tritanium, fighters * FIGHTER_COST_TRI);
    ledger.charge(loc, Resource::Molybdenum, fighters * FIGHTER_COST_MOL);
    ledger.produce_fighters(loc, fighters);

    for (level, bought) in [
        (base.engine_tech_level, base.engine_tech_up),
        (base.hull_tech_level, base.hull_tech_up),
        (base.beam_tech_level, base.beam_tech_up),
        (base.torp_tech_level, base.torp_tech_up),
    ] {
        ledger.charge(loc, Resource::Cash, tech_up_cost(level, bought));
    }

    for stock in snapshot.stock.iter().filter(|s| s.starbase_id == base.id) {
        let built = i64::from(stock.built_amount.max(0));
        if built == 0 {
            continue;
        }
        let cost = match stock.stock_type {
            stock_type::HULL => snapshot
                .hull(stock.stock_id)
                .map(|h| (h.cost, h.tritanium, h.duranium, h.molybdenum)),
            stock_type::ENGINE => snapshot
                .engine(stock.stock_id)
                .map(|e| (e.cost, e.tritanium, e.duranium, e.molybdenum)),
            stock_type::BEAM => snapshot
                .beam(stock.stock_id)
                .map(|b| (b.cost, b.tritanium, b.duranium, b.molybdenum)),
            stock_type::LAUNCHER => snapshot
                .torpedo(stock.stock_id)
                .map(|t| (t.launcher_cost, t.tritanium, t.duranium, t.molybdenum)),
            stock_type::TORPEDO => {
                // Each torpedo costs its cash price and one of each mineral.
                ledger.produce_torps(loc, stock.stock_id.max(0) as usize, built);
                snapshot.torpedo(stock.stock_id).map(|t| (t.torpedo_cost, 1, 1, 1))
            }
            other => {
                warn!(kind = other, "unknown stock type while charging builds");
                None
            }
        };
        match cost {
            Some((mc, tri, dur, mol)) => {
                ledger.charge(loc, Resource::Cash, built * i64::from(mc.max(0)));
                ledger.charge(loc, Resource::Tritanium, built * i64::from(tri.max(0)));
                ledger.charge(loc, Resource::Duranium, built * i64::from(dur.max(0)));
                ledger.charge(loc, Resource::Molybdenum, built * i64::from(mol.max(0)));
            }
            None => warn!(
                kind = stock.stock_type,
                component = stock.stock_id,
                "component definition missing, build cost not charged"
            ),
        }
    }
}

/// Cost of raising one tech kind by `bought` levels up to `level`.
fn tech_up_cost(level: i32, bought: i32) -> i64 {
    let bought = bought.clamp(0, 10);
    ((level - bought)..level)
        .filter(|l| *l > 0)
        .map(|l| 100 * i64::from(l))
        .sum()
}

fn base_dis_record(
    dat: &BaseRecord,
    base: &Starbase,
    snapshot: &Snapshot,
    racehull_ids: &[i32],
    ledger: &mut FlowLedger,
    loc: Location,
) -> BaseRecord {
    let mut dis = dat.clone();
    dis.defense = dat.defense.saturating_sub(base.built_defense.max(0) as u16);
    dis.engine_tech = rewind_tech(dat.engine_tech, base.engine_tech_up);
    dis.hull_tech = rewind_tech(dat.hull_tech, base.hull_tech_up);
    dis.beam_tech = rewind_tech(dat.beam_tech, base.beam_tech_up);
    dis.torp_tech = rewind_tech(dat.torp_tech, base.torp_tech_up);

    for stock in snapshot
        .stock
        .iter()
        .filter(|s| s.starbase_id == base.id && s.built_amount != 0)
    {
        let rewind = |amount: u16| -> u16 {
            (i32::from(amount) - stock.built_amount).clamp(0, i32::from(u16::MAX)) as u16
        };
        match stock.stock_type {
            stock_type::HULL => {
                if let Some(slot) = hull_slot(racehull_ids, stock.stock_id).filter(|&s| s <= 20) {
                    dis.hull_stock[slot - 1] = rewind(dat.hull_stock[slot - 1]);
                }
            }
            stock_type::ENGINE => rewind_slot(&mut dis.engine_stock, stock.stock_id, stock.built_amount),
            stock_type::BEAM => rewind_slot(&mut dis.beam_stock, stock.stock_id, stock.built_amount),
            stock_type::LAUNCHER => {
                rewind_slot(&mut dis.launcher_stock, stock.stock_id, stock.built_amount)
            }
            _ => {}
        }
    }

    // Torpedoes and fighters flow through the production counters so
    // orbiting ships can absorb what the base handed over.
    for torp_type in 1..=10usize {
        let new_value = i64::from(dat.torpedo_stock[torp_type - 1]);
        dis.torpedo_stock[torp_type - 1] =
            ledger.consume_torps(loc, torp_type, new_value).clamp(0, i64::from(u16::MAX)) as u16;
    }
    dis.fighters = ledger
        .consume_fighters(loc, i64::from(dat.fighters))
        .clamp(0, i64::from(u16::MAX)) as u16;

    // Build orders are this turn's orders; the pre-turn state has none.
    dis.build_hull_slot = 0;
    dis.build_engine = 0;
    dis.build_beam = 0;
    dis.build_beam_count = 0;
    dis.build_torp = 0;
    dis.build_torp_count = 0;
    dis
}

fn rewind_tech(tech: u16, bought: i32) -> u16 {
    (i32::from(tech) - bought.clamp(0, 10)).clamp(1, 10) as u16
}

fn rewind_slot(slots: &mut [u16], component_id: i32, built: i32) {
    if component_id >= 1 && (component_id as usize) <= slots.len() {
        let slot = &mut slots[component_id as usize - 1];
        *slot = (i32::from(*slot) - built).clamp(0, i32::from(u16::MAX)) as u16;
    }
}

fn pack_planets(snapshot: &Snapshot, players: &PlayerMap, ledger: &mut FlowLedger) -> Packed {
    let mut planets: Vec<&Planet> = snapshot
        .planets
        .iter()
        .filter(|planet| PlanetRecord::is_visible(planet))
        .collect();
    planets.sort_by_key(|planet| planet.id);

    let mut packed = Packed::new();
    for planet in planets {
        let owned = planet.owner_id == snapshot.local_owner_id();
        let loc = (planet.x, planet.y);
        if owned {
            charge_planet_builds(ledger, loc, planet);
        }
        let dat = PlanetRecord::from_snapshot(planet, players);
        let dis = if owned {
            planet_dis_record(&dat, planet, ledger, loc)
        } else {
            dat.clone()
        };
        packed.push((dat.id, dat.encode(), dis.encode()));
    }
    packed
}

fn charge_planet_builds(ledger: &mut FlowLedger, loc: Location, planet: &Planet) {
    for (built, cash_each) in [
        (planet.built_mines, MINE_COST_MC),
        (planet.built_factories, FACTORY_COST_MC),
        (planet.built_defense, PLANET_DEFENSE_COST_MC),
    ] {
        let built = i64::from(built.max(0));
        ledger.charge(loc, Resource::Cash, built * cash_each);
        ledger.charge(loc, Resource::Supplies, built * STRUCTURE_COST_SUPPLIES);
    }
    if planet.building_starbase {
        ledger.charge(loc, Resource::Cash, STARBASE_COST_MC);
        ledger.charge(loc, Resource::Tritanium, STARBASE_COST_TRI);
        ledger.charge(loc, Resource::Duranium, STARBASE_COST_DUR);
        ledger.charge(loc, Resource::Molybdenum, STARBASE_COST_MOL);
    }
}

fn planet_dis_record(
    dat: &PlanetRecord,
    planet: &Planet,
    ledger: &mut FlowLedger,
    loc: Location,
) -> PlanetRecord {
    let mut dis = dat.clone();
    dis.mines = dat.mines.saturating_sub(planet.built_mines.max(0) as u16);
    dis.factories = dat.factories.saturating_sub(planet.built_factories.max(0) as u16);
    dis.defense = dat.defense.saturating_sub(planet.built_defense.max(0) as u16);

    dis.neutronium = reclaim_u32(ledger, loc, Resource::Neutronium, dat.neutronium);
    dis.tritanium = reclaim_u32(ledger, loc, Resource::Tritanium, dat.tritanium);
    dis.duranium = reclaim_u32(ledger, loc, Resource::Duranium, dat.duranium);
    dis.molybdenum = reclaim_u32(ledger, loc, Resource::Molybdenum, dat.molybdenum);

    let sold = i64::from(planet.supplies_sold.max(0));
    let supplies = ledger.reclaim(loc, Resource::Supplies, i64::from(dat.supplies)) + sold;
    dis.supplies = supplies.clamp(0, i64::from(u32::MAX)) as u32;

    // Selling supplies made cash this turn; the pre-turn purse excludes it.
    // When the sale outran what the planet still holds, the surplus went to
    // a ship, which consumes it from the ledger later.
    let cash = ledger.reclaim(loc, Resource::Cash, i64::from(dat.megacredits)) - sold;
    if cash < 0 {
        ledger.produce_cash(loc, -cash);
        dis.megacredits = 0;
    } else {
        dis.megacredits = cash.clamp(0, i64::from(u32::MAX)) as u32;
    }

    dis.build_base = 0;
    dis
}

fn reclaim_u32(ledger: &mut FlowLedger, loc: Location, resource: Resource, new_value: u32) -> u32 {
    ledger
        .reclaim(loc, resource, i64::from(new_value))
        .clamp(0, i64::from(u32::MAX)) as u32
}

fn reclaim_u16(ledger: &mut FlowLedger, loc: Location, resource: Resource, new_value: u16) -> u16 {
    ledger
        .reclaim(loc, resource, i64::from(new_value))
        .clamp(0, i64::from(u16::MAX)) as u16
}

fn pack_ships(
    snapshot: &Snapshot,
    players: &PlayerMap,
    ledger: &mut FlowLedger,
) -> (Packed, Vec<Vec<u8>>) {
    let mut owned = Packed::new();
    let mut targets = Vec::new();

    let mut ships: Vec<_> = snapshot.ships.iter().collect();
    ships.sort_by_key(|ship| ship.id);

    for ship in ships {
        if ship.owner_id == snapshot.local_owner_id() {
            let dat = ShipRecord::from_snapshot(ship, players);
            let dis = ship_dis_record(&dat, ledger);
            owned.push((dat.id, dat.encode(), dis.encode()));
        } else {
            targets.push(TargetRecord::from_snapshot(ship, players).encode());
        }
    }
    (owned, targets)
}

fn ship_dis_record(dat: &ShipRecord, ledger: &mut FlowLedger) -> ShipRecord {
    let loc = (i32::from(dat.x), i32::from(dat.y));
    let mut dis = dat.clone();
    dis.neutronium = reclaim_u16(ledger, loc, Resource::Neutronium, dat.neutronium);
    dis.tritanium = reclaim_u16(ledger, loc, Resource::Tritanium, dat.tritanium);
    dis.duranium = reclaim_u16(ledger, loc, Resource::Duranium, dat.duranium);
    dis.molybdenum = reclaim_u16(ledger, loc, Resource::Molybdenum, dat.molybdenum);
    dis.supplies = reclaim_u16(ledger, loc, Resource::Supplies, dat.supplies);

    if dat.bay_count > 0 {
        dis.ammo = ledger
            .consume_fighters(loc, i64::from(dat.ammo))
            .clamp(0, i64::from(u16::MAX)) as u16;
    } else if (1..=10).contains(&dat.torp_type) && dat.tube_count > 0 {
        dis.ammo = ledger
            .consume_torps(loc, usize::from(dat.torp_type), i64::from(dat.ammo))
            .clamp(0, i64::from(u16::MAX)) as u16;
    }

    dis.megacredits = ledger
        .consume_cash_made(loc, i64::from(dat.megacredits))
        .clamp(0, i64::from(u16::MAX)) as u16;

    // Cargo transfers are this turn's orders.
    dis.unload = Default::default();
    dis.transfer = Default::default();
    dis
}

fn gen_scores(snapshot: &Snapshot, players: &PlayerMap) -> [RaceScore; 11] {
    let mut scores = [RaceScore::default(); 11];
    for score in &snapshot.scores {
        let race = players.race_of(score.owner_id);
        if (1..=11).contains(&race) {
            scores[usize::from(race) - 1] = RaceScore {
                planets: score.planets.clamp(0, i32::from(u16::MAX)) as u16,
                capital_ships: score.capital_ships.clamp(0, i32::from(u16::MAX)) as u16,
                freighters: score.freighters.clamp(0, i32::from(u16::MAX)) as u16,
                starbases: score.starbases.clamp(0, i32::from(u16::MAX)) as u16,
            };
        }
    }
    scores
}

fn build_util_stream(
    snapshot: &Snapshot,
    players: &PlayerMap,
    timestamp: &Timestamp,
    race: u16,
) -> Vec<u8> {
    let mut util = UtilWriter::new();
    util.turn_metadata(
        timestamp,
        snapshot.game.turn.clamp(0, i32::from(u16::MAX)) as u16,
        race,
    );
    for storm in &snapshot.ionstorms {
        util.ion_storm(storm);
    }
    for field in &snapshot.minefields {
        util.minefield(field, players);
    }
    for base in &snapshot.starbases {
        if let Some(planet) = snapshot.planet(base.planet_id) {
            if planet.owner_id != 0 && planet.owner_id != snapshot.local_owner_id() {
                util.allied_base(
                    base.planet_id.clamp(0, i32::from(u16::MAX)) as u16,
                    players.race_of(planet.owner_id),
                );
            }
        }
    }

    let mut military = [-1i32; 11];
    let mut inventory = [-1i32; 11];
    let mut priority = [-1i32; 11];
    for score in &snapshot.scores {
        let race = players.race_of(score.owner_id);
        if (1..=11).contains(&race) {
            let index = usize::from(race) - 1;
            military[index] = score.military_score;
            inventory[index] = score.inventory_score;
            priority[index] = score.priority_points;
        }
    }
    util.score_table("Inventory Score", 1, &inventory);
    util.score_table("Military Score", 2, &military);
    util.score_table("Priority Points", 3, &priority);

    util.into_bytes()
}

fn assemble_rst(sections: &[Vec<u8>; 8]) -> Vec<u8> {
    let mut position = 32usize;
    let mut w = RecordWriter::with_capacity(
        position + sections.iter().map(Vec::len).sum::<usize>(),
    );
    for section in sections {
        w.put_u32(position as u32 + 1);
        position += section.len();
    }
    for section in sections {
        w.put_bytes(section);
    }
    w.into_bytes()
}

fn write_file(report: &mut PackReport, dir: &Path, name: &str, bytes: &[u8]) -> Result<()> {
    let path = dir.join(name);
    fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(file = name, bytes = bytes.len(), "wrote");
    report.files.push(path);
    Ok(())
}

/// Remove files a previous client session may have left that no longer
/// describe this turn.
fn remove_dead_files(dir: &Path, race: u16) {
    let names = [
        format!("kore{race}.dat"),
        format!("skore{race}.dat"),
        format!("mess35{race}.dat"),
        "control.dat".to_string(),
        format!("player{race}.trn"),
    ];
    for name in names {
        match fs::remove_file(dir.join(&name)) {
            Ok(()) => debug!(file = %name, "removed stale file"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(file = %name, %err, "could not remove stale file"),
        }
    }
}

/// Mark the local race slot active in `init.tmp`, preserving other slots.
fn updated_init_tmp(dir: &Path, race: u16) -> Vec<u8> {
    let mut words = match fs::read(dir.join("init.tmp")) {
        Ok(bytes) if bytes.len() == 22 => bytes,
        _ => vec![0; 22],
    };
    let index = usize::from(race - 1) * 2;
    words[index] = 1;
    words[index + 1] = 0;
    words
}
