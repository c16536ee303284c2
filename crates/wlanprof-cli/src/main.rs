mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = u8::try_from(err.exit_code()).unwrap_or(1);
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}

/// Log to stderr at a level picked by `-v` count; `RUST_LOG` wins when set.
fn init_tracing(verbosity: u8) {
    let level = ["warn", "info", "debug"]
        .get(usize::from(verbosity))
        .copied()
        .unwrap_or("trace");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "wlanprof",
                &mut std::io::stdout(),
            );
            Ok(())
        }

        // config subcommands locate the file themselves
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        cmd => {
            let ctx = Context::load(&cli.global)?;
            tracing::debug!(store = %ctx.store_path().display(), "store resolved");
            commands::dispatch(cmd, &ctx)
        }
    }
}
