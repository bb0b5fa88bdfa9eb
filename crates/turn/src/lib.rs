//! Turn conversion pipelines.
//!
//! `pack` turns one Nu snapshot into the v3 file tree a native client can
//! edit, tracking resource flows so beginning-of-turn state can be
//! reconstructed. `maketurn` reads the edited tree back, diffs it against
//! the snapshot, and serializes the command records the server accepts.
//!
//! Everything is single-threaded and synchronous; a pipeline owns its
//! working directory for the duration of a call.

mod command;
mod config;
mod flow;
mod maketurn;
mod messages;
mod pack;
mod stock;

pub use command::{render_value, CommandRecord, TurnDocument};
pub use config::{PackConfig, PackMode, PackReport};
pub use flow::{FlowCounters, FlowLedger, Location, Resource};
pub use maketurn::maketurn;
pub use messages::{
    config_digest_messages, ion_storm_message, minefield_message, render_message,
    render_turn_messages, strip_html, word_wrap,
};
pub use pack::{pack, pack_vcr_only};
pub use stock::StockReconciler;
