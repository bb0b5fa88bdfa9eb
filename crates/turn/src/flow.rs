//! The flow ledger.
//!
//! The snapshot shows post-turn state; the `.dis` files need
//! beginning-of-turn state. Where a direct diff is impossible, resources
//! that moved between units sharing a location are reconstructed through
//! per-coordinate counters: builds charge their costs, resource holders
//! reclaim them, ammo consumers absorb production. Anything left over when
//! packing finishes is a residual: undo information that is partially
//! lost, reported but never fatal.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Map coordinate pair; resources move freely between units sharing one.
pub type Location = (i32, i32);

/// Resources a build can consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Neutronium,
    Tritanium,
    Duranium,
    Molybdenum,
    Supplies,
    Cash,
}

/// Counter bag for one location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowCounters {
    pub neutronium_used: i64,
    pub tritanium_used: i64,
    pub duranium_used: i64,
    pub molybdenum_used: i64,
    pub supplies_used: i64,
    pub cash_used: i64,
    /// Cash produced by supply sales beyond what the seller still holds.
    pub cash_made: i64,
    pub fighters_built: i64,
    /// Torpedoes built this turn, indexed by torpedo type 1..10.
    pub torps_built: [i64; 10],
}

impl FlowCounters {
    fn used_mut(&mut self, resource: Resource) -> &mut i64 {
        match resource {
            Resource::Neutronium => &mut self.neutronium_used,
            Resource::Tritanium => &mut self.tritanium_used,
            Resource::Duranium => &mut self.duranium_used,
            Resource::Molybdenum => &mut self.molybdenum_used,
            Resource::Supplies => &mut self.supplies_used,
            Resource::Cash => &mut self.cash_used,
        }
    }

    /// Whether every counter is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-location flow counters for one pack run.
#[derive(Debug, Default)]
pub struct FlowLedger {
    counters: BTreeMap<Location, FlowCounters>,
}

impl FlowLedger {
    /// Empty ledger; created at pack start.
    pub fn new() -> Self {
        Self::default()
    }

    fn at(&mut self, location: Location) -> &mut FlowCounters {
        self.counters.entry(location).or_default()
    }

    /// Charge a build cost to a location.
    pub fn charge(&mut self, location: Location, resource: Resource, amount: i64) {
        if amount > 0 {
            *self.at(location).used_mut(resource) += amount;
        }
    }

    /// Record fighters produced at a location.
    pub fn produce_fighters(&mut self, location: Location, amount: i64) {
        if amount > 0 {
            self.at(location).fighters_built += amount;
        }
    }

    /// Record torpedoes of one type produced at a location.
    pub fn produce_torps(&mut self, location: Location, torp_type: usize, amount: i64) {
        if amount > 0 && (1..=10).contains(&torp_type) {
            self.at(location).torps_built[torp_type - 1] += amount;
        }
    }

    /// Record cash produced beyond what the selling planet still holds.
    pub fn produce_cash(&mut self, location: Location, amount: i64) {
        if amount > 0 {
            self.at(location).cash_made += amount;
        }
    }

    /// Reclaim a used-counter into a pre-build value: the counter is added
    /// to the post-turn value and zeroed.
    pub fn reclaim(&mut self, location: Location, resource: Resource, new_value: i64) -> i64 {
        let counter = self.at(location).used_mut(resource);
        let old_value = new_value + *counter;
        *counter = 0;
        old_value
    }

    /// Absorb fighter production into a pre-turn ammo value. When more was
    /// built than the holder now carries, the value clamps to zero and the
    /// remainder stays for a later consumer.
    pub fn consume_fighters(&mut self, location: Location, new_value: i64) -> i64 {
        consume(&mut self.at(location).fighters_built, new_value)
    }

    /// Absorb torpedo production of one type, like [`Self::consume_fighters`].
    pub fn consume_torps(&mut self, location: Location, torp_type: usize, new_value: i64) -> i64 {
        if (1..=10).contains(&torp_type) {
            consume(&mut self.at(location).torps_built[torp_type - 1], new_value)
        } else {
            new_value
        }
    }

    /// Absorb sale proceeds into a pre-turn cash value.
    pub fn consume_cash_made(&mut self, location: Location, new_value: i64) -> i64 {
        consume(&mut self.at(location).cash_made, new_value)
    }

    /// Whether every counter everywhere is back to zero.
    pub fn is_clean(&self) -> bool {
        self.counters.values().all(FlowCounters::is_zero)
    }

    /// Locations with non-zero counters.
    pub fn residuals(&self) -> impl Iterator<Item = (&Location, &FlowCounters)> {
        self.counters.iter().filter(|(_, c)| !c.is_zero())
    }

    /// Human-readable residual listing, or `None` when the ledger is clean.
    pub fn residual_report(&self) -> Option<String> {
        if self.is_clean() {
            return None;
        }
        let mut report = String::from("Unattributed resource flows after packing.\n");
        report.push_str("Undo information for these locations is incomplete.\n\n");
        for (&(x, y), counters) in self.residuals() {
            let _ = writeln!(report, "({x},{y}):");
            for (label, value) in [
                ("neutronium used", counters.neutronium_used),
                ("tritanium used", counters.tritanium_used),
                ("duranium used", counters.duranium_used),
                ("molybdenum used", counters.molybdenum_used),
                ("supplies used", counters.supplies_used),
                ("cash used", counters.cash_used),
                ("cash made", counters.cash_made),
                ("fighters built", counters.fighters_built),
            ] {
                if value != 0 {
                    let _ = writeln!(report, "  {label}: {value}");
                }
            }
            for (index, &built) in counters.torps_built.iter().enumerate() {
                if built != 0 {
                    let _ = writeln!(report, "  torpedoes (type {}) built: {built}", index + 1);
                }
            }
        }
        Some(report)
    }
}

fn consume(counter: &mut i64, new_value: i64) -> i64 {
    if *counter > new_value {
        *counter -= new_value;
        0
    } else {
        let old_value = new_value - *counter;
        *counter = 0;
        old_value
    }
}
