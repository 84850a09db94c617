//! Normalize command handler

use crate::commands::{DomainArg, NormalizeArgs};
use crate::error::{CliError, CliResult};
use rentprobe::{normalize, Domain, SupportedValue, COUNTRIES, LOCATIONS};

/// Option set named by the `--kind` flag
#[must_use]
pub const fn domain_for(kind: DomainArg) -> &'static Domain {
    match kind {
        DomainArg::Location => &LOCATIONS,
        DomainArg::Country => &COUNTRIES,
    }
}

/// One output line for a matched value
#[must_use]
pub fn format_value(value: &SupportedValue) -> String {
    format!("{} ({})", value.canonical, value.code)
}

/// Execute the normalize command
pub fn execute_normalize(args: &NormalizeArgs) -> CliResult<()> {
    let domain = domain_for(args.kind);
    if args.list {
        for value in domain.values {
            println!("{}", format_value(value));
        }
        return Ok(());
    }

    let raw = args
        .value
        .as_deref()
        .ok_or_else(|| CliError::invalid_argument("a value is required unless --list is given"))?;
    let value = normalize(raw, domain)?;
    println!("{}", format_value(value));
    Ok(())
}
