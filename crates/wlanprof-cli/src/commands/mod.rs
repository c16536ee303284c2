//! Command dispatch: bridges CLI args -> store operations -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod profiles;
pub mod suggest;
pub mod util;

use std::path::PathBuf;

use clap::ValueEnum;

use wlanprof_config::Config;
use wlanprof_core::ProfileStore;

use crate::cli::{ColorMode, Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Everything a store-bound command needs: resolved config plus the
/// effective output settings.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
    store_override: Option<PathBuf>,
}

impl Context {
    /// Resolve config (flag > env > file > defaults) and output settings.
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = wlanprof_config::load_config(&config_file(global))?;
        let output = match global.output {
            Some(format) => format,
            None => parse_setting("defaults.output", &config.defaults.output)?,
        };
        let color_mode = match global.color {
            Some(mode) => mode,
            None => parse_setting::<ColorMode>("defaults.color", &config.defaults.color)?,
        };
        Ok(Self {
            output,
            color: output::should_color(color_mode),
            quiet: global.quiet,
            yes: global.yes,
            store_override: global.store.clone(),
            config,
        })
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_override
            .clone()
            .unwrap_or_else(|| self.config.store_path())
    }

    /// Open the store; a missing file is an empty store.
    pub fn open_store(&self) -> Result<ProfileStore, CliError> {
        let path = self.store_path();
        ProfileStore::open(&path).map_err(|e| CliError::store(&path, e))
    }

    pub fn save_store(&self, store: &ProfileStore) -> Result<(), CliError> {
        let path = self.store_path();
        store.save(&path).map_err(|e| CliError::store(&path, e))
    }

    pub fn mask(&self) -> &str {
        &self.config.defaults.mask
    }
}

/// The config file in effect: `--config`, else the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(wlanprof_config::config_path)
}

fn parse_setting<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

/// Dispatch a store-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Profiles(args) => profiles::handle(args, ctx),
        Command::Suggest(args) => suggest::handle(*args, ctx),
        Command::Check(args) => check::handle(args, ctx),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
