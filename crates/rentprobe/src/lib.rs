//! rentprobe: page-object interaction layer for a vehicle rental booking site
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      rentprobe Architecture                      │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  free text ──► Normalizer ──► Dependency Gate                    │
//! │                                    │                             │
//! │                                    ▼                             │
//! │        ┌───────────────┬───────────────────┬────────────────┐    │
//! │        │ Option        │ Calendar          │ Passenger      │    │
//! │        │ Resolver      │ Navigator         │ Stepper        │    │
//! │        └───────┬───────┴─────────┬─────────┴───────┬────────┘    │
//! │                └──────── PageDriver ───────────────┘             │
//! │                   ChromiumDriver │ MockBookingSite               │
//! │                                                                  │
//! │  SearchPage owns the driver and SelectionState, exposes          │
//! │  read-backs and assertions                                       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rentprobe::prelude::*;
//!
//! let mut page = SearchPage::new(MockBookingSite::new(), PageConfig::default());
//! page.goto().await?;
//! page.select_pickup_location("auckland").await?;
//! page.select_dropoff_location("Auckland").await?;
//! page.assert_pickup_contains("Auckland", "round trip").await?;
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Availability API query and response model
#[allow(clippy::cast_possible_truncation, clippy::missing_errors_doc)]
pub mod api;

/// Chromium driver (feature `browser`)
#[cfg(feature = "browser")]
#[allow(clippy::cast_possible_truncation, clippy::missing_errors_doc)]
pub mod browser;

/// Calendar targets, month windows and forward navigation
#[allow(clippy::cast_possible_truncation)]
pub mod calendar;

pub mod config;
pub mod domain;
pub mod driver;

/// Load testing for the availability API (feature `load`)
#[cfg(feature = "load")]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc
)]
pub mod loadtest;

pub mod locator;

/// In-memory booking site
#[allow(clippy::cast_possible_truncation, clippy::unused_self)]
pub mod mock;

#[allow(clippy::cast_possible_truncation)]
pub mod option;
#[allow(clippy::cast_possible_truncation)]
pub mod passengers;
#[allow(clippy::cast_possible_truncation)]
pub mod page;

mod result;
pub mod retry;
pub mod selection;
pub mod site;

pub use api::{validate_search_response, AvailabilityQuery, SearchResponse, ValidationIssue};
#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use calendar::{CalendarMonth, CalendarNavigator, CalendarTarget, NavigationReport, VisibleMonthWindow};
pub use config::SuiteConfig;
pub use domain::{normalize, Domain, SupportedValue, COUNTRIES, LOCATIONS};
pub use driver::{DriverConfig, PageDriver};
#[cfg(feature = "load")]
pub use loadtest::{AvailabilityClient, LoadTest, LoadTestConfig, LoadTestResult, Thresholds};
pub use locator::{Locator, Role, Selector};
pub use mock::{MockBookingSite, MockCall};
pub use option::{resolve_and_select, OptionScope};
pub use page::{Field, PageConfig, PageObject, SearchPage};
pub use passengers::{PassengerCount, PassengerKind, PassengerLimits};
pub use result::{ProbeError, ProbeResult};
pub use retry::{retry_on, RetryConfig};
pub use selection::{assert_prerequisite, Prerequisite, SelectionState};
pub use site::SiteContract;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::api::*;
    #[cfg(feature = "browser")]
    pub use super::browser::*;
    pub use super::calendar::*;
    pub use super::config::*;
    pub use super::domain::*;
    pub use super::driver::*;
    #[cfg(feature = "load")]
    pub use super::loadtest::*;
    pub use super::locator::*;
    pub use super::mock::*;
    pub use super::option::*;
    pub use super::page::*;
    pub use super::passengers::*;
    pub use super::result::*;
    pub use super::retry::*;
    pub use super::selection::*;
    pub use super::site::*;
}
