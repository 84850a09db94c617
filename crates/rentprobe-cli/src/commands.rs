//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// rentprobe: drive and load test a vehicle rental booking site
#[derive(Parser, Debug)]
#[command(name = "rentprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Suite configuration file (YAML)
    #[arg(short, long, global = true, env = "RENTPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve free text to a supported location or country
    Normalize(NormalizeArgs),

    /// Check a YYYY-MM-DD date and show its calendar month
    ParseDate(ParseDateArgs),

    /// Build an availability search request
    Search(SearchArgs),

    /// Fill in the search form end to end and read every field back
    Demo(DemoArgs),

    /// Load test the availability API
    Load(LoadArgs),

    /// Show or validate the suite configuration
    Config(ConfigArgs),
}

/// Which fixed option set to normalize against
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DomainArg {
    /// Pickup and drop-off locations
    #[default]
    Location,
    /// Driver's licence countries
    Country,
}

/// Arguments for the normalize command
#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    /// Raw input, e.g. "  queenstown "
    #[arg(required_unless_present = "list")]
    pub value: Option<String>,

    /// Option set to match against
    #[arg(short, long, default_value = "location")]
    pub kind: DomainArg,

    /// List the supported values instead of matching
    #[arg(long)]
    pub list: bool,
}

/// Arguments for the parse-date command
#[derive(Parser, Debug)]
pub struct ParseDateArgs {
    /// Date in zero-padded YYYY-MM-DD form
    pub date: String,
}

/// Output format for the search command
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchFormat {
    /// Request URL
    #[default]
    Url,
    /// Query parameters as JSON
    Json,
}

/// Arguments for the search command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Pickup location
    #[arg(long)]
    pub pickup: String,

    /// Drop-off location (defaults to the pickup location)
    #[arg(long)]
    pub dropoff: Option<String>,

    /// Pickup date (YYYY-MM-DD)
    #[arg(long)]
    pub from: String,

    /// Drop-off date (YYYY-MM-DD)
    #[arg(long)]
    pub to: String,

    /// Number of adults
    #[arg(long, default_value = "1")]
    pub adults: u8,

    /// Number of children
    #[arg(long, default_value = "0")]
    pub children: u8,

    /// Driver's licence country
    #[arg(long)]
    pub licence: Option<String>,

    /// API root (overrides the configuration)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "url")]
    pub format: SearchFormat,
}

/// Arguments for the demo command
#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Pickup location
    #[arg(long, default_value = "Auckland")]
    pub pickup: String,

    /// Drop-off location
    #[arg(long, default_value = "Queenstown")]
    pub dropoff: String,

    /// Pickup date (YYYY-MM-DD, defaults to four weeks from today)
    #[arg(long)]
    pub from: Option<String>,

    /// Drop-off date (YYYY-MM-DD, defaults to a week after pickup)
    #[arg(long)]
    pub to: Option<String>,

    /// Number of adults
    #[arg(long, default_value = "2")]
    pub adults: u8,

    /// Number of children
    #[arg(long, default_value = "0")]
    pub children: u8,

    /// Driver's licence country
    #[arg(long, default_value = "New Zealand")]
    pub licence: String,

    /// First month the simulated calendar shows (YYYY-MM, defaults to the current month)
    #[arg(long)]
    pub calendar_start: Option<String>,

    /// Attempts per step when a widget fails to open
    #[arg(long, default_value = "1")]
    pub attempts: usize,

    /// Drive the configured site in Chromium instead of the simulated site
    #[arg(long)]
    pub live: bool,

    /// Save a screenshot of the finished form
    #[arg(long)]
    pub screenshot: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Output format for load test results
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadOutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON result
    Json,
}

/// Arguments for the load command
#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// API root (overrides the configuration)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Pickup location
    #[arg(long, default_value = "Auckland")]
    pub pickup: String,

    /// Drop-off location (defaults to the pickup location)
    #[arg(long)]
    pub dropoff: Option<String>,

    /// Pickup date, YYYY-MM-DD (defaults to four weeks from today)
    #[arg(long)]
    pub from: Option<String>,

    /// Drop-off date, YYYY-MM-DD (defaults to a week after pickup)
    #[arg(long)]
    pub to: Option<String>,

    /// Number of adults
    #[arg(long, default_value = "1")]
    pub adults: u8,

    /// Number of children
    #[arg(long, default_value = "0")]
    pub children: u8,

    /// Driver's licence country
    #[arg(long)]
    pub licence: Option<String>,

    /// Concurrent workers
    #[arg(long, default_value = "4")]
    pub concurrency: usize,

    /// Run length (e.g. "30s", "2m")
    #[arg(long, default_value = "30s")]
    pub duration: String,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value = "10000")]
    pub request_timeout_ms: u64,

    /// Fail when p95 latency exceeds this many milliseconds
    #[arg(long, default_value = "2000")]
    pub max_p95_ms: f64,

    /// Fail when the error rate exceeds this fraction
    #[arg(long, default_value = "0.01")]
    pub max_error_rate: f64,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: LoadOutputFormat,

    /// Write the JSON result to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Print the effective configuration as YAML
    #[arg(long)]
    pub show: bool,

    /// Only check that the configuration loads
    #[arg(long)]
    pub validate: bool,

    /// Print the built-in defaults as YAML
    #[arg(long)]
    pub defaults: bool,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
