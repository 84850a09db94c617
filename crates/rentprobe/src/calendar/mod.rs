//! Date-picker support: strict date parsing, the visible month window and
//! forward-only navigation.

mod date;
mod navigator;
mod window;

pub use date::CalendarTarget;
pub use navigator::{CalendarNavigator, CalendarPhase, NavigationReport, DEFAULT_MAX_MONTH_ADVANCES};
pub use window::{CalendarMonth, VisibleMonthWindow};
