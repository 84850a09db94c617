//! Parse-date command handler

use crate::commands::ParseDateArgs;
use crate::error::CliResult;
use rentprobe::CalendarTarget;

/// Summary of a parsed date: the date, its weekday and calendar month label
#[must_use]
pub fn describe(target: &CalendarTarget) -> String {
    format!(
        "{target} ({}) in {}",
        target.date().format("%A"),
        target.month().label()
    )
}

/// Execute the parse-date command
pub fn execute_parse_date(args: &ParseDateArgs) -> CliResult<()> {
    let target = CalendarTarget::parse(&args.date)?;
    println!("{}", describe(&target));
    Ok(())
}
