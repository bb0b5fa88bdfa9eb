//! Maketurn over a tree the pack pipeline just produced: an untouched
//! tree serializes back to snapshot values, and client edits surface as
//! changed command fields.

use nubridge_snapshot::Snapshot;
use nubridge_turn::{maketurn, pack, PackConfig, TurnDocument};
use nubridge_v3::{BaseRecord, ShipRecord, V3Error};
use serde_json::json;
use std::fs;
use std::path::Path;

fn fixture() -> Snapshot {
    Snapshot::from_value(json!({
        "player": {"id": 1, "raceid": 3},
        "settings": {"hoststart": "8/21/2026 9:12:30 PM", "name": "Echo Cluster"},
        "game": {"id": 100, "turn": 7, "name": "Echo Cluster"},
        "players": [{"id": 1, "raceid": 3}, {"id": 2, "raceid": 5}],
        "hulls": [{"id": 15, "name": "Small Transport", "cargo": 70, "engines": 1, "cost": 50}],
        "torpedos": [{"id": 1, "name": "Mark 1 Photon", "torpedocost": 1, "launchercost": 1,
                      "tritanium": 1, "duranium": 1, "molybdenum": 1}],
        "engines": [{"id": 1, "name": "StarDrive 1", "cost": 1}],
        "racehulls": [{"id": 1, "raceid": 3, "hullid": 15}],
        "planets": [{
            "id": 10, "ownerid": 1, "name": "Meridian", "x": 500, "y": 500,
            "friendlycode": "abc", "temp": 50, "clans": 100,
            "mines": 20, "builtmines": 10, "supplies": 90, "megacredits": 170,
            "sneakyserverfield": "keepme"
        }],
        "ships": [{
            "id": 1, "ownerid": 1, "name": "Extremely Long Cruiser Name",
            "friendlycode": "xyz", "x": 500, "y": 500, "hullid": 15, "engineid": 1,
            "mission": 1, "mission1target": 5, "mission2target": 8,
            "enemy": 2, "neutronium": 20
        }],
        "starbases": [{"id": 5, "planetid": 10, "defense": 10,
                       "enginetechlevel": 1, "hulltechlevel": 2,
                       "beamtechlevel": 1, "torptechlevel": 1}],
        "stock": [{"id": 50, "starbaseid": 5, "stocktype": 5, "stockid": 1,
                   "amount": 20, "builtamount": 0}]
    }))
    .unwrap()
}

fn command<'a>(document: &'a TurnDocument, prefix: &str) -> &'a str {
    document
        .commands
        .iter()
        .find(|c| c.starts_with(prefix))
        .unwrap_or_else(|| panic!("no command starting with {prefix}"))
}

fn has_field(command: &str, key: &str, value: &str) -> bool {
    let body = command.split_once('=').unwrap().1;
    body.split("|||").any(|f| f == format!("{key}:::{value}"))
}

#[test]
fn untouched_tree_serializes_back_to_snapshot_values() {
    let dir = tempfile::tempdir().unwrap();
    let config = PackConfig::new(dir.path());
    let snapshot = fixture();
    pack(&snapshot, &config).unwrap();

    let document = maketurn(&snapshot, &config).unwrap();
    assert_eq!(document.commands.len(), 4); // planet, ship, base, stock

    let planet = command(&document, "Planet10=");
    assert!(has_field(planet, "friendlycode", "abc"));
    assert!(has_field(planet, "mines", "20"));
    assert!(has_field(planet, "builtmines", "10"));
    assert!(has_field(planet, "supplies", "90"));
    assert!(has_field(planet, "megacredits", "170"));
    assert!(has_field(planet, "suppliessold", "0"));
    // Fields the core never interpreted are echoed back.
    assert!(has_field(planet, "sneakyserverfield", "keepme"));

    let ship = command(&document, "Ship1=");
    assert!(has_field(ship, "friendlycode", "xyz"));
    assert!(has_field(ship, "mission", "1"));
    assert!(has_field(ship, "mission1target", "5"));
    assert!(has_field(ship, "mission2target", "8"));
    assert!(has_field(ship, "enemy", "2"));
    // The 20-column record name matches the truncated original, so the
    // longer original name survives.
    assert!(has_field(ship, "name", "Extremely Long Cruiser Name"));

    let base = command(&document, "Starbase5=");
    assert!(has_field(base, "hulltechlevel", "2"));
    assert!(has_field(base, "builtfighters", "0"));

    let stock = command(&document, "Stock50=");
    assert!(has_field(stock, "amount", "20"));
    assert!(has_field(stock, "builtamount", "0"));
    // Nothing was edited, so no surrogate stock ids appeared.
    assert!(!document.commands.iter().any(|c| c.starts_with("Stock51=")));

    let json: serde_json::Value = serde_json::from_str(&document.to_json()).unwrap();
    assert!(json["commands"].is_array());
}

fn rewrite_ship(dir: &Path, edit: impl FnOnce(&mut ShipRecord)) {
    let path = dir.join("ship3.dat");
    let bytes = fs::read(&path).unwrap();
    let mut record = ShipRecord::decode(&bytes[2..]).unwrap();
    edit(&mut record);
    let mut out = 1u16.to_le_bytes().to_vec();
    out.extend(record.encode());
    fs::write(&path, out).unwrap();
}

#[test]
fn mission_targets_route_back_into_the_multiplexed_field() {
    let dir = tempfile::tempdir().unwrap();
    let config = PackConfig::new(dir.path());
    let snapshot = fixture();
    pack(&snapshot, &config).unwrap();

    // The client orders an intercept of ship 17: record mission 8,
    // target in the intercept word.
    rewrite_ship(dir.path(), |record| {
        record.mission = 8;
        record.intercept_target = 17;
        record.tow_target = 0;
    });
    let document = maketurn(&snapshot, &config).unwrap();
    let ship = command(&document, "Ship1=");
    assert!(has_field(ship, "mission", "7"));
    assert!(has_field(ship, "mission1target", "17"));
    // The unrelated second target slot passes through.
    assert!(has_field(ship, "mission2target", "8"));
}

#[test]
fn conflicting_cargo_orders_drop_the_transfer() {
    let dir = tempfile::tempdir().unwrap();
    let config = PackConfig::new(dir.path());
    let snapshot = fixture();
    pack(&snapshot, &config).unwrap();

    rewrite_ship(dir.path(), |record| {
        record.unload.supplies = 5;
        record.unload.target_id = 10;
        record.transfer.neutronium = 3;
        record.transfer.target_id = 44;
    });
    let document = maketurn(&snapshot, &config).unwrap();
    let ship = command(&document, "Ship1=");
    assert!(has_field(ship, "transfertargettype", "1"));
    assert!(has_field(ship, "transfersupplies", "5"));
    assert!(has_field(ship, "transfertargetid", "10"));
    assert!(has_field(ship, "transferneutronium", "0"));
}

#[test]
fn new_base_stock_allocates_a_surrogate_id() {
    let dir = tempfile::tempdir().unwrap();
    let config = PackConfig::new(dir.path());
    let snapshot = fixture();
    pack(&snapshot, &config).unwrap();

    // The client builds two engines the snapshot had no stock line for.
    let path = dir.path().join("bdata3.dat");
    let bytes = fs::read(&path).unwrap();
    let mut record = BaseRecord::decode(&bytes[2..]).unwrap();
    record.engine_stock[0] = 2;
    let mut out = 1u16.to_le_bytes().to_vec();
    out.extend(record.encode());
    fs::write(&path, out).unwrap();

    let document = maketurn(&snapshot, &config).unwrap();
    let stock = command(&document, "Stock51=");
    assert!(has_field(stock, "stocktype", "2"));
    assert!(has_field(stock, "stockid", "1"));
    assert!(has_field(stock, "amount", "2"));
}

#[test]
fn truncated_files_are_a_format_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let config = PackConfig::new(dir.path());
    let snapshot = fixture();
    pack(&snapshot, &config).unwrap();

    let path = dir.path().join("ship3.dat");
    let mut bytes = fs::read(&path).unwrap();
    bytes.truncate(bytes.len() - 10);
    fs::write(&path, bytes).unwrap();

    let error = maketurn(&snapshot, &config).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<V3Error>(),
        Some(V3Error::FormatMismatch { .. })
    ));
}
