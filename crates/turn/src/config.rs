//! Pack configuration and the report a run returns.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which output shape a pack run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackMode {
    /// Per-entity `.dat` + `.dis` pairs that preserve undo.
    #[default]
    Unpacked,
    /// A single result file the native client unpacks itself.
    Result,
}

/// Where a run reads templates and writes its output.
///
/// The run assumes exclusive ownership of the working directory; nothing
/// here takes a lock, and concurrent runs against the same directory
/// produce undefined output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackConfig {
    /// Directory the v3 tree is written into; also the first place
    /// template spec files are looked up.
    pub work_dir: PathBuf,
    /// Second template lookup location.
    pub root_dir: PathBuf,
    /// Output shape.
    #[serde(default)]
    pub mode: PackMode,
}

impl PackConfig {
    /// Configuration with the working directory doubling as the root.
    pub fn new(work_dir: impl AsRef<Path>) -> Self {
        let work_dir = work_dir.as_ref().to_path_buf();
        Self {
            root_dir: work_dir.clone(),
            work_dir,
            mode: PackMode::default(),
        }
    }

    /// Same configuration with a different template root.
    pub fn with_root(mut self, root_dir: impl AsRef<Path>) -> Self {
        self.root_dir = root_dir.as_ref().to_path_buf();
        self
    }

    /// Same configuration in result mode.
    pub fn result_mode(mut self) -> Self {
        self.mode = PackMode::Result;
        self
    }
}

/// What a pack run produced.
#[derive(Debug, Clone, Default)]
pub struct PackReport {
    /// Files written, in order.
    pub files: Vec<PathBuf>,
    /// Whether the flow ledger finished with unattributed residuals.
    pub residuals: bool,
}
