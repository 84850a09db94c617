//! Page Object Model for the vehicle search form.
//!
//! [`SearchPage`] is the orchestrator: each selection operation normalizes its
//! input, checks the dependency gate, drives the option resolver, calendar
//! navigator or passenger stepper, and records the canonical value in its
//! [`SelectionState`] only once the UI interaction succeeded.
//!
//! ```ignore
//! let mut page = SearchPage::new(driver, PageConfig::new("https://rentals.example"));
//! page.goto().await?;
//! page.select_pickup_location("  auckland ").await?;
//! page.select_dropoff_location("QueensTown").await?;
//! page.select_dates("2026-11-12", "2026-11-20").await?;
//! page.assert_dropoff_contains("Queenstown", "drop-off follows selection").await?;
//! ```

use crate::calendar::{CalendarNavigator, CalendarTarget, NavigationReport, DEFAULT_MAX_MONTH_ADVANCES};
use crate::domain::{normalize, COUNTRIES, LOCATIONS};
use crate::driver::PageDriver;
use crate::locator::{Locator, Selector, DEFAULT_TIMEOUT_MS};
use crate::option::resolve_and_select;
use crate::passengers::{self, PassengerCount, PassengerLimits};
use crate::result::{ProbeError, ProbeResult};
use crate::selection::{assert_prerequisite, Prerequisite, SelectionState};
use crate::site::SiteContract;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Trait for page objects representing one page of the site
pub trait PageObject {
    /// Path of this page relative to the base URL (e.g. "/", "/search")
    fn url_pattern(&self) -> &str;

    /// Page name for logging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether `url` belongs to this page
    fn matches_url(&self, url: &str) -> bool {
        let pattern = self.url_pattern().trim_end_matches('/');
        pattern.is_empty() || url.contains(pattern)
    }
}

/// Settings for one [`SearchPage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    /// Site root, e.g. "https://rentals.example"
    pub base_url: String,
    /// DOM contract of the site
    pub site: SiteContract,
    /// Bound for waits on always-present elements
    pub element_timeout: Duration,
    /// Bound for popovers and panels to open
    pub widget_timeout: Duration,
    /// Bound for a filtered option to appear
    pub option_timeout: Duration,
    /// Forward clicks allowed per calendar alignment
    pub max_month_advances: u32,
    /// Accepted passenger counts
    pub passenger_limits: PassengerLimits,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

impl PageConfig {
    /// Defaults for a site rooted at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            site: SiteContract::default(),
            element_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            widget_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            option_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_month_advances: DEFAULT_MAX_MONTH_ADVANCES,
            passenger_limits: PassengerLimits::default(),
        }
    }

    /// Use one timeout for every wait
    #[must_use]
    pub const fn with_timeouts(mut self, timeout: Duration) -> Self {
        self.element_timeout = timeout;
        self.widget_timeout = timeout;
        self.option_timeout = timeout;
        self
    }

    /// Replace the site contract
    #[must_use]
    pub fn with_site(mut self, site: SiteContract) -> Self {
        self.site = site;
        self
    }

    /// Set the calendar advance bound
    #[must_use]
    pub const fn with_max_month_advances(mut self, max: u32) -> Self {
        self.max_month_advances = max;
        self
    }

    /// Set passenger limits
    #[must_use]
    pub const fn with_passenger_limits(mut self, limits: PassengerLimits) -> Self {
        self.passenger_limits = limits;
        self
    }
}

/// Read-back fields on the search form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Pickup location button
    Pickup,
    /// Drop-off location button
    Dropoff,
    /// Date range button
    Dates,
    /// Passengers button
    Passengers,
    /// Licence country combobox
    LicenceCountry,
}

impl Field {
    /// All fields in form order
    pub const ALL: [Self; 5] = [
        Self::Pickup,
        Self::Dropoff,
        Self::Dates,
        Self::Passengers,
        Self::LicenceCountry,
    ];

    /// Human-readable field name used in assertion failures
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pickup => "pickup location",
            Self::Dropoff => "drop-off location",
            Self::Dates => "dates",
            Self::Passengers => "passengers",
            Self::LicenceCountry => "licence country",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The vehicle search form
#[derive(Debug)]
pub struct SearchPage<D: PageDriver> {
    driver: D,
    config: PageConfig,
    state: SelectionState,
}

impl<D: PageDriver> PageObject for SearchPage<D> {
    fn url_pattern(&self) -> &str {
        "/"
    }

    fn page_name(&self) -> &str {
        "search"
    }
}

impl<D: PageDriver> SearchPage<D> {
    /// Wrap a driver
    #[must_use]
    pub fn new(driver: D, config: PageConfig) -> Self {
        Self {
            driver,
            config,
            state: SelectionState::new(),
        }
    }

    /// Selections made since the last [`goto`](Self::goto)
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Page settings
    #[must_use]
    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Underlying driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Underlying driver, mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Give back the driver
    #[must_use]
    pub fn into_driver(self) -> D {
        self.driver
    }

    fn site(&self) -> &SiteContract {
        &self.config.site
    }

    fn locator(&self, selector: Selector) -> Locator {
        Locator::new(selector).with_timeout(self.config.element_timeout)
    }

    /// Open the search page and forget every previous selection
    pub async fn goto(&mut self) -> ProbeResult<()> {
        self.state.reset();
        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.url_pattern()
        );
        info!(%url, page = self.page_name(), "opening page");
        self.driver.navigate(&url).await?;
        self.locator(self.site().pickup_trigger())
            .wait_for(&self.driver)
            .await
    }

    /// Choose the pickup location; returns the canonical name selected
    pub async fn select_pickup_location(&mut self, raw: &str) -> ProbeResult<&'static str> {
        let value = normalize(raw, &LOCATIONS)?;
        debug!(raw, value = value.canonical, "pickup location normalized");
        let scope = self.site().pickup_scope();
        resolve_and_select(&mut self.driver, &scope, value.canonical, self.config.option_timeout).await?;
        self.state.pickup_location = Some(value.canonical);
        info!(value = value.canonical, "pickup location selected");
        Ok(value.canonical)
    }

    /// Choose the drop-off location; requires a pickup location first
    pub async fn select_dropoff_location(&mut self, raw: &str) -> ProbeResult<&'static str> {
        assert_prerequisite(&self.state, Prerequisite::PickupLocation, "select_dropoff_location")?;
        let value = normalize(raw, &LOCATIONS)?;
        debug!(raw, value = value.canonical, "drop-off location normalized");
        let scope = self.site().dropoff_scope();
        resolve_and_select(&mut self.driver, &scope, value.canonical, self.config.option_timeout).await?;
        self.state.dropoff_location = Some(value.canonical);
        info!(value = value.canonical, "drop-off location selected");
        Ok(value.canonical)
    }

    /// Choose the travel dates (`YYYY-MM-DD` each).
    ///
    /// Both dates are parsed and ordered before the calendar is touched.
    pub async fn select_dates(&mut self, start: &str, end: &str) -> ProbeResult<NavigationReport> {
        let start = CalendarTarget::parse(start)?;
        let end = CalendarTarget::parse(end)?;
        let report = CalendarNavigator::new(
            &self.config.site,
            self.config.widget_timeout,
            self.config.max_month_advances,
        )
        .select_date_range(&mut self.driver, start, end)
        .await?;
        self.state.dates = Some((start, end));
        Ok(report)
    }

    /// Set the passenger counters
    pub async fn set_passengers(&mut self, adults: u8, children: u8) -> ProbeResult<PassengerCount> {
        let count = PassengerCount::new(adults, children);
        self.config.passenger_limits.validate(count)?;
        passengers::set_passengers(&mut self.driver, &self.config.site, count, self.config.widget_timeout)
            .await?;
        self.state.passengers = Some(count);
        info!(%count, "passengers set");
        Ok(count)
    }

    /// Choose the driver's licence country; returns the canonical name
    pub async fn select_licence_country(&mut self, raw: &str) -> ProbeResult<&'static str> {
        let value = normalize(raw, &COUNTRIES)?;
        debug!(raw, value = value.canonical, "licence country normalized");
        let scope = self.site().country_scope();
        resolve_and_select(&mut self.driver, &scope, value.canonical, self.config.option_timeout).await?;
        self.state.licence_country = Some(value.canonical);
        info!(value = value.canonical, "licence country selected");
        Ok(value.canonical)
    }

    /// Submit the form and wait for the results landmark
    pub async fn search(&mut self) -> ProbeResult<()> {
        let button = self.locator(self.site().search_button());
        button.click(&mut self.driver).await?;
        let results = self.site().results();
        let timeout = self.config.widget_timeout;
        self.driver
            .wait_for_visible(&results, timeout)
            .await
            .map_err(|e| match e {
                ProbeError::Timeout { .. } => ProbeError::WidgetNotOpen {
                    widget: "search results",
                    timeout_ms: timeout.as_millis() as u64,
                },
                other => other,
            })?;
        info!("search results shown");
        Ok(())
    }

    /// Trimmed text of the results landmark
    pub async fn results_text(&self) -> ProbeResult<String> {
        self.locator(self.site().results()).text(&self.driver).await
    }

    /// Trimmed, displayed value of `field`
    pub async fn read(&self, field: Field) -> ProbeResult<String> {
        let site = self.site();
        match field {
            Field::Pickup => self.locator(site.pickup_trigger()).text(&self.driver).await,
            Field::Dropoff => self.locator(site.dropoff_trigger()).text(&self.driver).await,
            Field::Dates => self.locator(site.dates_trigger()).text(&self.driver).await,
            Field::Passengers => self.locator(site.passengers_trigger()).text(&self.driver).await,
            Field::LicenceCountry => self.locator(site.licence_input()).value(&self.driver).await,
        }
    }

    /// Text on the pickup location button
    pub async fn pickup_button_text(&self) -> ProbeResult<String> {
        self.read(Field::Pickup).await
    }

    /// Text on the drop-off location button
    pub async fn dropoff_button_text(&self) -> ProbeResult<String> {
        self.read(Field::Dropoff).await
    }

    /// Text on the date range button
    pub async fn dates_button_text(&self) -> ProbeResult<String> {
        self.read(Field::Dates).await
    }

    /// Text on the passengers button
    pub async fn passengers_button_text(&self) -> ProbeResult<String> {
        self.read(Field::Passengers).await
    }

    /// Value of the licence country combobox
    pub async fn licence_country_value(&self) -> ProbeResult<String> {
        self.read(Field::LicenceCountry).await
    }

    /// Fail with [`ProbeError::AssertionFailed`] unless `field` contains `expected`
    pub async fn assert_field_contains(
        &self,
        field: Field,
        expected: &str,
        message: &str,
    ) -> ProbeResult<()> {
        let actual = self.read(field).await?;
        if actual.contains(expected) {
            Ok(())
        } else {
            Err(ProbeError::AssertionFailed {
                field: field.label(),
                expected: expected.to_string(),
                actual,
                message: message.to_string(),
            })
        }
    }

    /// Assert on the pickup location button
    pub async fn assert_pickup_contains(&self, expected: &str, message: &str) -> ProbeResult<()> {
        self.assert_field_contains(Field::Pickup, expected, message).await
    }

    /// Assert on the drop-off location button
    pub async fn assert_dropoff_contains(&self, expected: &str, message: &str) -> ProbeResult<()> {
        self.assert_field_contains(Field::Dropoff, expected, message).await
    }

    /// Assert on the date range button
    pub async fn assert_dates_contains(&self, expected: &str, message: &str) -> ProbeResult<()> {
        self.assert_field_contains(Field::Dates, expected, message).await
    }

    /// Assert on the passengers button
    pub async fn assert_passengers_contains(&self, expected: &str, message: &str) -> ProbeResult<()> {
        self.assert_field_contains(Field::Passengers, expected, message).await
    }

    /// Assert on the licence country combobox
    pub async fn assert_licence_country_contains(
        &self,
        expected: &str,
        message: &str,
    ) -> ProbeResult<()> {
        self.assert_field_contains(Field::LicenceCountry, expected, message).await
    }

    /// Save a screenshot of the page
    pub async fn screenshot(&self, path: &Path) -> ProbeResult<()> {
        debug!(path = %path.display(), "taking screenshot");
        self.driver.screenshot(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarMonth;
    use crate::mock::{MockBookingSite, MockCall};

    fn page() -> SearchPage<MockBookingSite> {
        let mock = MockBookingSite::new().with_calendar_start(CalendarMonth::new(2026, 10));
        let config = PageConfig::new("https://rentals.test").with_timeouts(Duration::from_millis(20));
        SearchPage::new(mock, config)
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = PageConfig::default();
            assert_eq!(config.max_month_advances, DEFAULT_MAX_MONTH_ADVANCES);
            assert_eq!(config.widget_timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        }

        #[test]
        fn test_field_labels() {
            assert_eq!(Field::Dropoff.to_string(), "drop-off location");
            assert_eq!(Field::ALL.len(), 5);
        }

        #[test]
        fn test_page_object_url() {
            let p = page();
            assert_eq!(p.page_name(), "search");
            assert!(p.matches_url("https://rentals.test/"));
        }
    }

    mod orchestrator_tests {
        use super::*;

        #[tokio::test]
        async fn test_goto_resets_state() {
            let mut p = page();
            p.goto().await.unwrap();
            p.select_pickup_location("auckland").await.unwrap();
            assert!(!p.state().is_empty());

            p.goto().await.unwrap();
            assert!(p.state().is_empty());
            assert_eq!(
                p.driver().history().last(),
                Some(&MockCall::Navigate("https://rentals.test/".to_string()))
            );
        }

        #[tokio::test]
        async fn test_dropoff_gate_checked_before_normalizing() {
            let mut p = page();
            p.goto().await.unwrap();
            let err = p.select_dropoff_location("").await.unwrap_err();
            match err {
                ProbeError::Precondition { required, .. } => {
                    assert_eq!(required, "select_pickup_location");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test]
        async fn test_unsupported_value_leaves_state_untouched() {
            let mut p = page();
            p.goto().await.unwrap();
            p.select_pickup_location("Queenstown").await.unwrap();
            let err = p.select_pickup_location("Wellington").await.unwrap_err();
            assert!(err.to_string().contains("Auckland, Christchurch, Queenstown"));
            assert_eq!(p.state().pickup_location, Some("Queenstown"));
        }

        #[tokio::test]
        async fn test_passengers_validated_before_ui() {
            let mut p = page();
            p.goto().await.unwrap();
            p.driver_mut().clear_history();
            let err = p.set_passengers(0, 2).await.unwrap_err();
            assert!(matches!(err, ProbeError::InvalidPassengerCount { .. }));
            assert!(p.driver().history().is_empty());
        }

        #[tokio::test]
        async fn test_passengers_read_back() {
            let mut p = page();
            p.goto().await.unwrap();
            p.set_passengers(2, 1).await.unwrap();
            assert_eq!(p.passengers_button_text().await.unwrap(), "2 Adults, 1 Child");
            assert_eq!(p.state().passengers, Some(PassengerCount::new(2, 1)));
        }

        #[tokio::test]
        async fn test_licence_country_alias() {
            let mut p = page();
            p.goto().await.unwrap();
            assert_eq!(p.select_licence_country("nz").await.unwrap(), "New Zealand");
            assert_eq!(p.licence_country_value().await.unwrap(), "New Zealand");
        }

        #[tokio::test]
        async fn test_search_shows_results() {
            let mut p = page();
            p.goto().await.unwrap();
            p.select_pickup_location("Auckland").await.unwrap();
            p.search().await.unwrap();
            assert!(p.results_text().await.unwrap().contains("Auckland"));
        }
    }

    mod assertion_tests {
        use super::*;

        #[tokio::test]
        async fn test_assertion_failure_names_field_and_expected() {
            let mut p = page();
            p.goto().await.unwrap();
            p.select_pickup_location("Christchurch").await.unwrap();
            let err = p
                .assert_pickup_contains("Auckland", "pickup should be Auckland")
                .await
                .unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("pickup location"));
            assert!(msg.contains("Auckland"));
            assert!(msg.contains("Christchurch"));
        }

        #[tokio::test]
        async fn test_read_back_is_trimmed() {
            let mut p = page();
            p.goto().await.unwrap();
            p.select_pickup_location("Christchurch").await.unwrap();
            assert_eq!(p.pickup_button_text().await.unwrap(), "Christchurch");
            p.assert_pickup_contains("Christchurch", "trimmed").await.unwrap();
        }
    }
}
