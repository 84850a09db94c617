//! rentprobe CLI library
//!
//! Command-line surface over the rentprobe page objects: normalize free
//! text, check dates, build availability requests, run the search form end
//! to end and load test the availability API.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, DemoArgs, DomainArg, LoadArgs, LoadOutputFormat, NormalizeArgs,
    ParseDateArgs, SearchArgs, SearchFormat,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::Reporter;
