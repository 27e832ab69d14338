use std::path::PathBuf;

use anyhow::Result;

use crate::config::DEFAULT_CONFIG_DIR;
use crate::model::EntityKind;

#[derive(Clone, Debug)]
pub struct TuiRunOptions {
    /// The `.studio` directory holding `config.json` and `state.json`.
    pub config_dir: PathBuf,
    /// Screen shown first.
    pub entity: EntityKind,
}

impl Default for TuiRunOptions {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            entity: EntityKind::Requirements,
        }
    }
}

pub fn run() -> Result<()> {
    crate::tui_shell::run()
}

pub fn run_with_options(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run_with_options(opts)
}
