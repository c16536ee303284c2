//! Capability check command handler.

use tabled::Tabled;

use wlanprof_core::{CapabilityReport, check_profile};

use crate::cli::CheckArgs;
use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Usable")]
    usable: String,
    #[tabled(rename = "Connects with")]
    types: String,
    #[tabled(rename = "Issues")]
    issues: String,
}

impl ReportRow {
    fn new(r: &CapabilityReport, color: bool) -> Self {
        Self {
            key: r.key.clone(),
            usable: output::yes_no(r.is_usable(), color),
            types: join(&r.usable),
            issues: join(&r.issues),
        }
    }
}

fn join<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        return "-".into();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn handle(args: CheckArgs, ctx: &Context) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    let caps = &ctx.config.capabilities;
    let reports: Vec<CapabilityReport> = match &args.profile {
        Some(identifier) => {
            let profile = store
                .find(identifier)
                .ok_or_else(|| CliError::profile_not_found(identifier))?;
            vec![check_profile(profile, caps)]
        }
        None => store.iter().map(|p| check_profile(p, caps)).collect(),
    };
    let out = output::render_list(
        ctx.output,
        &reports,
        |r| ReportRow::new(r, ctx.color),
        |r| format!("{}\t{}", r.key, if r.is_usable() { "usable" } else { "unusable" }),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
