//! Demo command handler
//!
//! Fills in every field of the search form, submits it, then reads each
//! field back. Runs against [`MockBookingSite`] by default and against the
//! configured site in Chromium with `--live`.

use crate::commands::DemoArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::handlers::search::trip_dates;
use crate::output::Reporter;
use chrono::{NaiveDate, Utc};
use rentprobe::retry::{retry_on, Attempt, RetryConfig};
use rentprobe::{
    AvailabilityQuery, CalendarMonth, CalendarTarget, MockBookingSite, PageDriver, PassengerCount,
    ProbeError, ProbeResult, SearchPage, SuiteConfig,
};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Inputs for one run of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoPlan {
    /// Pickup location, free text
    pub pickup: String,
    /// Drop-off location, free text
    pub dropoff: String,
    /// Pickup date, `YYYY-MM-DD`
    pub from: String,
    /// Drop-off date, `YYYY-MM-DD`
    pub to: String,
    /// Adults
    pub adults: u8,
    /// Children
    pub children: u8,
    /// Licence country, free text
    pub licence: String,
}

impl DemoPlan {
    /// Plan from CLI arguments, filling missing dates relative to `today`
    #[must_use]
    pub fn from_args(args: &DemoArgs, today: NaiveDate) -> Self {
        let (from, to) = trip_dates(args.from.as_deref(), args.to.as_deref(), today);
        Self {
            pickup: args.pickup.clone(),
            dropoff: args.dropoff.clone(),
            from,
            to,
            adults: args.adults,
            children: args.children,
            licence: args.licence.clone(),
        }
    }
}

/// What the form showed after the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoReport {
    /// Pickup button text
    pub pickup: String,
    /// Drop-off button text
    pub dropoff: String,
    /// Dates button text
    pub dates: String,
    /// Passengers button text
    pub passengers: String,
    /// Licence combobox value
    pub licence_country: String,
    /// Forward calendar clicks made
    pub month_advances: u32,
    /// Results landmark text
    pub results: String,
    /// Availability request equivalent to the selection
    pub query_url: String,
}

/// Retry budget for `attempts` tries per step
#[must_use]
pub fn retry_config(attempts: usize) -> RetryConfig {
    RetryConfig::new(Duration::from_secs(120))
        .with_poll_interval(Duration::from_millis(250))
        .with_max_attempts(attempts.max(1))
}

/// Parse `YYYY-MM` into a calendar month
pub fn parse_month(raw: &str) -> CliResult<CalendarMonth> {
    CalendarTarget::parse(&format!("{raw}-01"))
        .map(|t| t.month())
        .map_err(|_| CliError::invalid_argument(format!("--calendar-start must be YYYY-MM, got {raw:?}")))
}

async fn step<D, R, F>(page: &mut SearchPage<D>, retry: &RetryConfig, op: F) -> ProbeResult<R>
where
    D: PageDriver + 'static,
    F: for<'t> FnMut(&'t mut SearchPage<D>) -> Attempt<'t, R>,
{
    Ok(retry_on(page, retry, ProbeError::is_widget_error, op).await?.value)
}

/// Drive the whole form on `page` and read every field back
pub async fn run_flow<D: PageDriver + 'static>(
    page: &mut SearchPage<D>,
    plan: &DemoPlan,
    retry: &RetryConfig,
    api_url: &str,
    reporter: &Reporter,
) -> ProbeResult<DemoReport> {
    page.goto().await?;

    let raw = plan.pickup.clone();
    let pickup = step(page, retry, move |p| {
        let raw = raw.clone();
        Box::pin(async move { p.select_pickup_location(&raw).await })
    })
    .await?;
    reporter.success(&format!("pickup location {pickup}"));

    let raw = plan.dropoff.clone();
    let dropoff = step(page, retry, move |p| {
        let raw = raw.clone();
        Box::pin(async move { p.select_dropoff_location(&raw).await })
    })
    .await?;
    reporter.success(&format!("drop-off location {dropoff}"));

    let (from, to) = (plan.from.clone(), plan.to.clone());
    let navigation = step(page, retry, move |p| {
        let (from, to) = (from.clone(), to.clone());
        Box::pin(async move { p.select_dates(&from, &to).await })
    })
    .await?;
    reporter.success(&format!(
        "dates {} to {} ({} month advance(s))",
        plan.from,
        plan.to,
        navigation.advances()
    ));

    let (adults, children) = (plan.adults, plan.children);
    let count: PassengerCount = step(page, retry, move |p| Box::pin(p.set_passengers(adults, children))).await?;
    reporter.success(&format!("passengers {count}"));

    let raw = plan.licence.clone();
    let licence = step(page, retry, move |p| {
        let raw = raw.clone();
        Box::pin(async move { p.select_licence_country(&raw).await })
    })
    .await?;
    reporter.success(&format!("licence country {licence}"));

    step(page, retry, |p| Box::pin(p.search())).await?;
    reporter.success("search submitted");

    page.assert_pickup_contains(pickup, "pickup read-back").await?;
    page.assert_dropoff_contains(dropoff, "drop-off read-back").await?;
    page.assert_passengers_contains(&count.to_string(), "passengers read-back")
        .await?;
    page.assert_licence_country_contains(licence, "licence read-back")
        .await?;

    Ok(DemoReport {
        pickup: page.pickup_button_text().await?,
        dropoff: page.dropoff_button_text().await?,
        dates: page.dates_button_text().await?,
        passengers: page.passengers_button_text().await?,
        licence_country: page.licence_country_value().await?,
        month_advances: navigation.advances(),
        results: page.results_text().await?,
        query_url: AvailabilityQuery::from_selection(page.state())?.url(api_url),
    })
}

/// Render the report as aligned text lines
#[must_use]
pub fn render_report(report: &DemoReport) -> String {
    [
        ("Pickup", report.pickup.clone()),
        ("Drop-off", report.dropoff.clone()),
        ("Dates", report.dates.clone()),
        ("Passengers", report.passengers.clone()),
        ("Licence", report.licence_country.clone()),
        ("Month advances", report.month_advances.to_string()),
        ("Results", report.results.clone()),
        ("Query", report.query_url.clone()),
    ]
    .iter()
    .map(|(label, value)| format!("{:<16}{value}", format!("{label}:")))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Execute the demo command
pub async fn execute_demo(config: &CliConfig, args: &DemoArgs, reporter: &Reporter) -> CliResult<()> {
    let suite = config.suite()?;
    let plan = DemoPlan::from_args(args, Utc::now().date_naive());
    let retry = retry_config(args.attempts);
    debug!(live = args.live, attempts = retry.max_attempts, from = %plan.from, to = %plan.to, "demo planned");

    let report = if args.live {
        reporter.info(&format!("driving {} in Chromium", suite.base_url));
        run_live(&suite, &plan, &retry, args.screenshot.as_deref(), reporter).await?
    } else {
        let mut mock = MockBookingSite::new()
            .with_site(suite.site())
            .with_passenger_limits(suite.passengers);
        if let Some(ref start) = args.calendar_start {
            mock = mock.with_calendar_start(parse_month(start)?);
        }
        let mut page = SearchPage::new(mock, suite.page_config());
        let report = run_flow(&mut page, &plan, &retry, &suite.api_url, reporter).await?;
        if let Some(ref path) = args.screenshot {
            page.screenshot(path).await?;
            reporter.info(&format!("form saved to {}", path.display()));
        }
        report
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_report(&report));
    }
    Ok(())
}

#[cfg(feature = "browser")]
async fn run_live(
    suite: &SuiteConfig,
    plan: &DemoPlan,
    retry: &RetryConfig,
    screenshot: Option<&Path>,
    reporter: &Reporter,
) -> CliResult<DemoReport> {
    let driver = rentprobe::ChromiumDriver::launch(suite.driver_config()).await?;
    let mut page = SearchPage::new(driver, suite.page_config());
    let outcome = run_flow(&mut page, plan, retry, &suite.api_url, reporter).await;

    let path = screenshot.map(Path::to_path_buf).or_else(|| {
        outcome
            .is_err()
            .then(|| std::env::temp_dir().join("rentprobe-failure.png"))
    });
    if let Some(path) = path {
        match page.screenshot(&path).await {
            Ok(()) => reporter.info(&format!("screenshot saved to {}", path.display())),
            Err(e) => reporter.warning(&format!("screenshot failed: {e}")),
        }
    }

    page.into_driver().close().await?;
    Ok(outcome?)
}

#[cfg(not(feature = "browser"))]
#[allow(clippy::unused_async)]
async fn run_live(
    _suite: &SuiteConfig,
    _plan: &DemoPlan,
    _retry: &RetryConfig,
    _screenshot: Option<&Path>,
    _reporter: &Reporter,
) -> CliResult<DemoReport> {
    Err(CliError::FeatureDisabled { feature: "browser" })
}
