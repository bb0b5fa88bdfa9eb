//! Specification file synthesis.
//!
//! Each file carries a fixed number of fixed-size records, one per
//! component id. Fields the snapshot supplies are written from it; fields
//! it omits come from a template of the same name found in the working or
//! root directory. With no template and no snapshot entity, records fall
//! back to zeros with a `#k` placeholder name.

use crate::word;
use nubridge_codec::RecordWriter;
use nubridge_snapshot::Snapshot;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Record count and size for each spec file.
pub const BEAMSPEC_ENTRIES: usize = 10;
const BEAMSPEC_RECORD: usize = 36;
pub const TORPSPEC_ENTRIES: usize = 10;
const TORPSPEC_RECORD: usize = 38;
pub const ENGSPEC_ENTRIES: usize = 9;
const ENGSPEC_RECORD: usize = 66;
pub const HULLSPEC_ENTRIES: usize = 105;
const HULLSPEC_RECORD: usize = 60;
const XYPLAN_ENTRIES: usize = 500;
const XYPLAN_RECORD: usize = 6;
const PLANET_NAME_ENTRIES: usize = 500;
const PLANET_NAME_RECORD: usize = 20;
const RACE_NAME_ENTRIES: usize = 11;
const RACE_NAME_RECORD: usize = 62;
const TRUEHULL_RACES: usize = 11;
const TRUEHULL_SLOTS: usize = 20;

/// Locates template spec files: the working directory first, then a
/// configured root directory.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    work_dir: PathBuf,
    root_dir: PathBuf,
}

impl TemplateSource {
    /// Template lookup over the two standard directories.
    pub fn new(work_dir: &Path, root_dir: &Path) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
            root_dir: root_dir.to_path_buf(),
        }
    }

    /// Load a template by file name, or warn and return `None`.
    pub fn load(&self, name: &str) -> Option<Vec<u8>> {
        for dir in [&self.work_dir, &self.root_dir] {
            let path = dir.join(name);
            if let Ok(bytes) = fs::read(&path) {
                return Some(bytes);
            }
        }
        warn!(name, "no template found, synthesizing from snapshot only");
        None
    }
}

/// Renders the static spec files from one snapshot.
pub struct SpecSynthesizer<'a> {
    snapshot: &'a Snapshot,
    templates: &'a TemplateSource,
}

/// Slice of one template record, if the template is large enough.
fn template_record(template: Option<&Vec<u8>>, index: usize, size: usize) -> Option<Vec<u8>> {
    template
        .and_then(|t| t.get(index * size..(index + 1) * size))
        .map(<[u8]>::to_vec)
}

/// All-zero record with a `#k` placeholder name at the front.
fn placeholder_record(id: usize, name_width: usize, size: usize) -> Vec<u8> {
    let mut w = RecordWriter::with_capacity(size);
    w.put_str(&format!("#{id}"), name_width);
    let mut bytes = w.into_bytes();
    bytes.resize(size, 0);
    bytes
}

impl<'a> SpecSynthesizer<'a> {
    /// Synthesizer over a snapshot and template source.
    pub fn new(snapshot: &'a Snapshot, templates: &'a TemplateSource) -> Self {
        Self {
            snapshot,
            templates,
        }
    }

    /// `beamspec.dat`: 10 beam weapon records, 360 bytes.
    pub fn beamspec(&self) -> Vec<u8> {
        let template = self.templates.load("beamspec.dat");
        let mut out = Vec::with_capacity(BEAMSPEC_ENTRIES * BEAMSPEC_RECORD);
        for id in 1..=BEAMSPEC_ENTRIES {
            let record = match self.snapshot.beam(id as i32) {
                Some(beam) => {
                    let mut w = RecordWriter::with_capacity(BEAMSPEC_RECORD);
                    w.put_str(&beam.name, 20);
                    w.put_u16(word(beam.cost));
                    w.put_u16(word(beam.tritanium));
                    w.put_u16(word(beam.duranium));
                    w.put_u16(word(beam.molybdenum));
                    w.put_u16(word(beam.mass));
                    w.put_u16(word(beam.tech_level));
                    w.put_u16(word(beam.crew_kill));
                    w.put_u16(word(beam.damage));
                    w.into_bytes()
                }
                None => template_record(template.as_ref(), id - 1, BEAMSPEC_RECORD)
                    .unwrap_or_else(|| placeholder_record(id, 20, BEAMSPEC_RECORD)),
            };
            out.extend_from_slice(&record);
        }
        out
    }

    /// `torpspec.dat`: 10 torpedo records, 380 bytes.
    pub fn torpspec(&self) -> Vec<u8> {
        let template = self.templates.load("torpspec.dat");
        let mut out = Vec::with_capacity(TORPSPEC_ENTRIES * TORPSPEC_RECORD);
        for id in 1..=TORPSPEC_ENTRIES {
            let record = match self.snapshot.torpedo(id as i32) {
                Some(torp) => {
                    let mut w = RecordWriter::with_capacity(TORPSPEC_RECORD);
                    w.put_str(&torp.name, 20);
                    w.put_u16(word(torp.torpedo_cost));
                    w.put_u16(word(torp.launcher_cost));
                    w.put_u16(word(torp.tritanium));
                    w.put_u16(word(torp.duranium));
                    w.put_u16(word(torp.molybdenum));
                    w.put_u16(word(torp.mass));
                    w.put_u16(word(torp.tech_level));
                    w.put_u16(word(torp.crew_kill));
                    w.put_u16(word(torp.damage));
                    w.into_bytes()
                }
                None => template_record(template.as_ref(), id - 1, TORPSPEC_RECORD)
                    .unwrap_or_else(|| placeholder_record(id, 20, TORPSPEC_RECORD)),
            };
            out.extend_from_slice(&record);
        }
        out
    }

    /// `engspec.dat`: 9 engine records, 594 bytes.
    pub fn engspec(&self) -> Vec<u8> {
        let template = self.templates.load("engspec.dat");
        let mut out = Vec::with_capacity(ENGSPEC_ENTRIES * ENGSPEC_RECORD);
        for id in 1..=ENGSPEC_ENTRIES {
            let record = match self.snapshot.engine(id as i32) {
                Some(engine) => {
                    let mut w = RecordWriter::with_capacity(ENGSPEC_RECORD);
                    w.put_str(&engine.name, 20);
                    w.put_u16(word(engine.cost));
                    w.put_u16(word(engine.tritanium));
                    w.put_u16(word(engine.duranium));
                    w.put_u16(word(engine.molybdenum));
                    w.put_u16(word(engine.tech_level));
                    for fuel in engine.fuel_curve() {
                        w.put_u32(fuel.max(0) as u32);
                    }
                    w.into_bytes()
                }
                None => template_record(template.as_ref(), id - 1, ENGSPEC_RECORD)
                    .unwrap_or_else(|| placeholder_record(id, 20, ENGSPEC_RECORD)),
            };
            out.extend_from_slice(&record);
        }
        out
    }

    /// `hullspec.dat`: 105 hull records, 6300 bytes.
    ///
    /// The picture number is not part of the snapshot; it survives from the
    /// template when one exists.
    pub fn hullspec(&self) -> Vec<u8> {
        let template = self.templates.load("hullspec.dat");
        let mut out = Vec::with_capacity(HULLSPEC_ENTRIES * HULLSPEC_RECORD);
        for id in 1..=HULLSPEC_ENTRIES {
            let from_template = template_record(template.as_ref(), id - 1, HULLSPEC_RECORD);
            let record = match self.snapshot.hull(id as i32) {
                Some(hull) => {
                    let picture = from_template
                        .as_ref()
                        .map(|t| u16::from_le_bytes([t[30], t[31]]))
                        .unwrap_or(0);
                    let mut w = RecordWriter::with_capacity(HULLSPEC_RECORD);
                    w.put_str(&hull.name, 30);
                    w.put_u16(picture);
                    w.put_u16(0);
                    w.put_u16(word(hull.tritanium));
                    w.put_u16(word(hull.duranium));
                    w.put_u16(word(hull.molybdenum));
                    w.put_u16(word(hull.fuel_tank));
                    w.put_u16(word(hull.crew));
                    w.put_u16(word(hull.engines));
                    w.put_u16(word(hull.mass));
                    w.put_u16(word(hull.tech_level));
                    w.put_u16(word(hull.cargo));
                    w.put_u16(word(hull.fighter_bays));
                    w.put_u16(word(hull.launchers));
                    w.put_u16(word(hull.beams));
                    w.put_u16(word(hull.cost));
                    w.into_bytes()
                }
                None => from_template
                    .unwrap_or_else(|| placeholder_record(id, 30, HULLSPEC_RECORD)),
            };
            out.extend_from_slice(&record);
        }
        out
    }

    /// `xyplan.dat`: 500 planet positions, 3000 bytes.
    pub fn xyplan(&self) -> Vec<u8> {
        let template = self.templates.load("xyplan.dat");
        let mut out = Vec::with_capacity(XYPLAN_ENTRIES * XYPLAN_RECORD);
        for id in 1..=XYPLAN_ENTRIES {
            match self.snapshot.planet(id as i32) {
                Some(planet) => {
                    let mut w = RecordWriter::with_capacity(XYPLAN_RECORD);
                    w.put_u16(word(planet.x));
                    w.put_u16(word(planet.y));
                    w.put_u16(0);
                    out.extend_from_slice(w.as_slice());
                }
                None => match template_record(template.as_ref(), id - 1, XYPLAN_RECORD) {
                    Some(record) => out.extend_from_slice(&record),
                    None => out.extend_from_slice(&[0; XYPLAN_RECORD]),
                },
            }
        }
        out
    }

    /// `planet.nm`: 500 planet names, 10000 bytes.
    pub fn planet_names(&self) -> Vec<u8> {
        let template = self.templates.load("planet.nm");
        let mut out = Vec::with_capacity(PLANET_NAME_ENTRIES * PLANET_NAME_RECORD);
        for id in 1..=PLANET_NAME_ENTRIES {
            match self.snapshot.planet(id as i32).filter(|p| !p.name.is_empty()) {
                Some(planet) => {
                    let mut w = RecordWriter::with_capacity(PLANET_NAME_RECORD);
                    w.put_str(&planet.name, PLANET_NAME_RECORD);
                    out.extend_from_slice(w.as_slice());
                }
                None => {
                    let record =
                        template_record(template.as_ref(), id - 1, PLANET_NAME_RECORD)
                            .unwrap_or_else(|| placeholder_record(id, PLANET_NAME_RECORD, PLANET_NAME_RECORD));
                    out.extend_from_slice(&record);
                }
            }
        }
        out
    }

    /// `race.nm`: full name, short name, and adjective for eleven races,
    /// 682 bytes.
    pub fn race_names(&self) -> Vec<u8> {
        let template = self.templates.load("race.nm");
        let mut out = Vec::with_capacity(RACE_NAME_ENTRIES * RACE_NAME_RECORD);
        for id in 1..=RACE_NAME_ENTRIES {
            match self.snapshot.race(id as i32) {
                Some(race) => {
                    let mut w = RecordWriter::with_capacity(RACE_NAME_RECORD);
                    w.put_str(&race.name, 30);
                    w.put_str(&race.short_name, 20);
                    w.put_str(&race.adjective, 12);
                    out.extend_from_slice(w.as_slice());
                }
                None => {
                    let record = template_record(template.as_ref(), id - 1, RACE_NAME_RECORD)
                        .unwrap_or_else(|| placeholder_record(id, 30, RACE_NAME_RECORD));
                    out.extend_from_slice(&record);
                }
            }
        }
        out
    }

    /// `truehull.dat`: the 11x20 matrix of buildable hull ids, 440 bytes.
    ///
    /// Only the local player's row is rewritten from the snapshot; foreign
    /// rows survive from the template.
    pub fn truehull(&self) -> Vec<u8> {
        let template = self.templates.load("truehull.dat");
        let expected = TRUEHULL_RACES * TRUEHULL_SLOTS * 2;
        let mut matrix = match template {
            Some(bytes) if bytes.len() >= expected => bytes[..expected].to_vec(),
            Some(_) | None => vec![0; expected],
        };

        let row = usize::from(self.snapshot.local_race_slot());
        if (1..=TRUEHULL_RACES).contains(&row) {
            let hull_ids = self.snapshot.racehull_ids();
            let base = (row - 1) * TRUEHULL_SLOTS * 2;
            for slot in 0..TRUEHULL_SLOTS {
                let hull_id = hull_ids.get(slot).copied().unwrap_or(0);
                let bytes = word(hull_id).to_le_bytes();
                matrix[base + slot * 2] = bytes[0];
                matrix[base + slot * 2 + 1] = bytes[1];
            }
        }
        matrix
    }

    /// `hullfunc.txt`: hull function assignments as a text document.
    ///
    /// Every hull keeps its built-in function set; the only override the
    /// snapshot expresses is an explicit cloak grant.
    pub fn hullfunc(&self) -> String {
        let mut doc = String::from("%hullfunc\n\nInit = Default\n");
        for hull in self.snapshot.hulls.iter().filter(|h| h.can_cloak) {
            doc.push_str(&format!(
                "\nHull = {}\nFunction = Cloak\nRacesAllowed = +\n",
                hull.id
            ));
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> Snapshot {
        Snapshot::from_value(value).unwrap()
    }

    fn base_snapshot() -> serde_json::Value {
        json!({
            "player": {"id": 1, "raceid": 2},
            "settings": {"hoststart": "1/1/2026 1:00:00 AM"},
            "game": {"turn": 1}
        })
    }

    fn no_templates() -> TemplateSource {
        let missing = Path::new("/nonexistent");
        TemplateSource::new(missing, missing)
    }

    #[test]
    fn spec_files_have_exact_sizes() {
        let snapshot = snapshot(base_snapshot());
        let templates = no_templates();
        let synth = SpecSynthesizer::new(&snapshot, &templates);
        assert_eq!(synth.beamspec().len(), 360);
        assert_eq!(synth.torpspec().len(), 380);
        assert_eq!(synth.engspec().len(), 594);
        assert_eq!(synth.hullspec().len(), 6300);
        assert_eq!(synth.xyplan().len(), 3000);
        assert_eq!(synth.planet_names().len(), 10000);
        assert_eq!(synth.race_names().len(), 682);
        assert_eq!(synth.truehull().len(), 440);
    }

    #[test]
    fn known_components_are_rendered() {
        let mut value = base_snapshot();
        value.as_object_mut().unwrap().insert(
            "beams".into(),
            json!([{"id": 1, "name": "Laser", "cost": 1, "mass": 1, "techlevel": 1,
                    "crewkill": 10, "damage": 3}]),
        );
        let snapshot = snapshot(value);
        let templates = no_templates();
        let bytes = SpecSynthesizer::new(&snapshot, &templates).beamspec();
        assert_eq!(&bytes[..5], b"Laser");
        // Missing beams fall back to placeholder names.
        assert_eq!(&bytes[36..38], b"#2");
    }

    #[test]
    fn truehull_rewrites_only_the_local_row() {
        let dir = std::env::temp_dir().join(format!(
            "truehull_test_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        // Template with every slot set to 0x0101.
        std::fs::write(dir.join("truehull.dat"), vec![1u8; 440]).unwrap();

        let mut value = base_snapshot();
        value.as_object_mut().unwrap().insert(
            "racehulls".into(),
            json!([{"id": 1, "raceid": 2, "hullid": 15}, {"id": 2, "raceid": 2, "hullid": 16}]),
        );
        let snapshot = snapshot(value);
        let templates = TemplateSource::new(&dir, Path::new("/nonexistent"));
        let matrix = SpecSynthesizer::new(&snapshot, &templates).truehull();

        // Row 1 (race 1) survives from the template.
        assert_eq!(&matrix[..2], &[1, 1]);
        // Row 2 (the local race) is rewritten: hull 15, hull 16, then zeros.
        assert_eq!(&matrix[40..46], &[15, 0, 16, 0, 0, 0]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn hullfunc_grants_cloak_only_where_flagged() {
        let mut value = base_snapshot();
        value.as_object_mut().unwrap().insert(
            "hulls".into(),
            json!([{"id": 21, "name": "Shade", "cancloak": true},
                   {"id": 22, "name": "Barge", "cancloak": false}]),
        );
        let snapshot = snapshot(value);
        let templates = no_templates();
        let doc = SpecSynthesizer::new(&snapshot, &templates).hullfunc();
        assert!(doc.contains("Hull = 21"));
        assert!(!doc.contains("Hull = 22"));
        assert!(doc.starts_with("%hullfunc"));
    }
}
