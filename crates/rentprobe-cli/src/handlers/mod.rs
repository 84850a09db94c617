//! Command handlers - one module per subcommand
//!
//! Each handler keeps its pure helpers public so they can be tested without
//! spawning the binary.

pub mod config;
pub mod date;
pub mod demo;
pub mod load;
pub mod normalize;
pub mod search;

pub use config::execute_config;
pub use date::execute_parse_date;
pub use demo::{execute_demo, run_flow, DemoPlan, DemoReport};
pub use load::{execute_load, load_query, parse_duration};
pub use normalize::execute_normalize;
pub use search::{build_query, execute_search, trip_dates, Trip};
