//! Table-driven record schemas.
//!
//! The hand-written encoders in this crate are the authority for the byte
//! stream; these tables describe the same layouts declaratively so tests
//! can verify record sizes and owner-mapped fields without re-reading the
//! encoder source.

/// Wire type of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Unsigned 16-bit little-endian word.
    U16,
    /// Signed 16-bit word stored as its two's-complement bit pattern.
    I16,
    /// Unsigned 32-bit little-endian word.
    U32,
    /// Fixed-width space-padded string.
    Str(usize),
    /// Repeated unsigned 16-bit words.
    U16Rep(usize),
    /// Repeated unsigned 32-bit words.
    U32Rep(usize),
}

impl FieldType {
    /// Encoded width in bytes.
    pub fn byte_len(self) -> usize {
        match self {
            FieldType::U16 | FieldType::I16 => 2,
            FieldType::U32 => 4,
            FieldType::Str(n) => n,
            FieldType::U16Rep(n) => 2 * n,
            FieldType::U32Rep(n) => 4 * n,
        }
    }
}

/// One field in a record layout.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Field name, matching the record struct.
    pub name: &'static str,
    /// Wire type.
    pub ty: FieldType,
    /// Whether the value is an owner reference rewritten through the
    /// seat-to-race mapping.
    pub owner_mapped: bool,
}

const fn field(name: &'static str, ty: FieldType) -> FieldDef {
    FieldDef {
        name,
        ty,
        owner_mapped: false,
    }
}

const fn owner(name: &'static str, ty: FieldType) -> FieldDef {
    FieldDef {
        name,
        ty,
        owner_mapped: true,
    }
}

/// A full record schema.
#[derive(Debug, Clone, Copy)]
pub struct RecordLayout {
    /// Record kind.
    pub name: &'static str,
    /// Fields in wire order.
    pub fields: &'static [FieldDef],
}

impl RecordLayout {
    /// Total encoded size of one record.
    pub fn byte_len(&self) -> usize {
        self.fields.iter().map(|f| f.ty.byte_len()).sum()
    }

    /// Names of all owner-mapped fields.
    pub fn owner_mapped_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|f| f.owner_mapped)
            .map(|f| f.name)
    }
}

/// Owned-ship record layout (107 bytes).
pub const SHIP_LAYOUT: RecordLayout = RecordLayout {
    name: "ship",
    fields: &[
        field("id", FieldType::U16),
        owner("race", FieldType::U16),
        field("friendly_code", FieldType::Str(3)),
        field("warp", FieldType::U16),
        field("waypoint_dx", FieldType::I16),
        field("waypoint_dy", FieldType::I16),
        field("x", FieldType::U16),
        field("y", FieldType::U16),
        field("engine", FieldType::U16),
        field("hull", FieldType::U16),
        field("beam", FieldType::U16),
        field("beam_count", FieldType::U16),
        field("bay_count", FieldType::U16),
        field("torp_type", FieldType::U16),
        field("ammo", FieldType::U16),
        field("tube_count", FieldType::U16),
        field("mission", FieldType::U16),
        owner("primary_enemy", FieldType::U16),
        field("tow_target", FieldType::U16),
        field("damage", FieldType::U16),
        field("crew", FieldType::U16),
        field("clans", FieldType::U16),
        field("name", FieldType::Str(20)),
        field("neutronium", FieldType::U16),
        field("tritanium", FieldType::U16),
        field("duranium", FieldType::U16),
        field("molybdenum", FieldType::U16),
        field("supplies", FieldType::U16),
        field("unload", FieldType::U16Rep(7)),
        field("transfer", FieldType::U16Rep(7)),
        field("intercept_target", FieldType::U16),
        field("megacredits", FieldType::U16),
    ],
};

/// Foreign-ship (target) record layout (34 bytes).
pub const TARGET_LAYOUT: RecordLayout = RecordLayout {
    name: "target",
    fields: &[
        field("id", FieldType::U16),
        owner("race", FieldType::U16),
        field("warp", FieldType::U16),
        field("x", FieldType::U16),
        field("y", FieldType::U16),
        field("hull", FieldType::U16),
        field("heading", FieldType::I16),
        field("name", FieldType::Str(20)),
    ],
};

/// Planet record layout (85 bytes).
pub const PLANET_LAYOUT: RecordLayout = RecordLayout {
    name: "planet",
    fields: &[
        owner("race", FieldType::U16),
        field("id", FieldType::U16),
        field("friendly_code", FieldType::Str(3)),
        field("mines", FieldType::U16),
        field("factories", FieldType::U16),
        field("defense", FieldType::U16),
        field("neutronium", FieldType::U32),
        field("tritanium", FieldType::U32),
        field("duranium", FieldType::U32),
        field("molybdenum", FieldType::U32),
        field("clans", FieldType::U32),
        field("supplies", FieldType::U32),
        field("megacredits", FieldType::U32),
        field("ground_minerals", FieldType::U32Rep(4)),
        field("densities", FieldType::U16Rep(4)),
        field("colonist_tax", FieldType::U16),
        field("native_tax", FieldType::U16),
        field("colonist_happy", FieldType::I16),
        field("native_happy", FieldType::I16),
        field("native_government", FieldType::U16),
        field("native_clans", FieldType::U32),
        field("native_type", FieldType::U16),
        field("temp_code", FieldType::I16),
        field("build_base", FieldType::U16),
    ],
};

/// Starbase record layout (156 bytes).
pub const BASE_LAYOUT: RecordLayout = RecordLayout {
    name: "base",
    fields: &[
        field("planet_id", FieldType::U16),
        owner("race", FieldType::U16),
        field("defense", FieldType::U16),
        field("damage", FieldType::U16),
        field("engine_tech", FieldType::U16),
        field("hull_tech", FieldType::U16),
        field("beam_tech", FieldType::U16),
        field("torp_tech", FieldType::U16),
        field("engine_stock", FieldType::U16Rep(9)),
        field("hull_stock", FieldType::U16Rep(20)),
        field("beam_stock", FieldType::U16Rep(10)),
        field("launcher_stock", FieldType::U16Rep(10)),
        field("torpedo_stock", FieldType::U16Rep(10)),
        field("fighters", FieldType::U16),
        field("target_ship", FieldType::U16),
        field("ship_mission", FieldType::U16),
        field("mission", FieldType::U16),
        field("build_hull_slot", FieldType::U16),
        field("build_engine", FieldType::U16),
        field("build_beam", FieldType::U16),
        field("build_beam_count", FieldType::U16),
        field("build_torp", FieldType::U16),
        field("build_torp_count", FieldType::U16),
        field("reserved", FieldType::U16),
    ],
};
