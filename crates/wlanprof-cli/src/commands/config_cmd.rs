//! Config subcommand handlers.

use wlanprof_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::{config_file, util};

fn detail(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("<unrenderable config: {e}>"))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config_file(global);
    match args.command {
        ConfigCommand::Init => {
            if path.exists()
                && !util::confirm(
                    &format!("Overwrite existing config at {}?", path.display()),
                    global.yes,
                )?
            {
                return Ok(());
            }
            let mut cfg = Config::default();
            cfg.store = Some(cfg.store_path());
            wlanprof_config::save_config(&cfg, &path)?;
            output::print_status(&format!("Wrote {}", path.display()), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = wlanprof_config::load_config(&path)?;
            let format = global.output.unwrap_or(OutputFormat::Table);
            let out = output::render_single(format, &cfg, detail, |c| {
                c.store_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
