//! Forward-only navigation of the two-month date-picker.
//!
//! ```text
//! Closed ─click trigger─► Open ─next month*─► MonthAligned(start) ─click day─► StartSelected
//!    ▲                                                                    │
//!    └──── EndSelected ◄─click day── MonthAligned(end) ◄─next month*──────┘
//! ```
//!
//! Alignment for the end date starts wherever the window sits after the start
//! date was clicked.

use super::date::CalendarTarget;
use super::window::VisibleMonthWindow;
use crate::driver::PageDriver;
use crate::result::{ProbeError, ProbeResult};
use crate::site::SiteContract;
use std::time::Duration;
use tracing::{debug, info};

/// Default bound on forward clicks per alignment pass
pub const DEFAULT_MAX_MONTH_ADVANCES: u32 = 24;

/// Navigator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarPhase {
    /// Widget not open
    Closed,
    /// Widget open, nothing aligned yet
    Open,
    /// Window shows the start month
    AlignedStart,
    /// Start day clicked
    StartSelected,
    /// Window shows the end month
    AlignedEnd,
    /// End day clicked
    EndSelected,
}

/// What a completed date-range selection did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationReport {
    /// Forward clicks before the start day
    pub start_advances: u32,
    /// Forward clicks between the start and end days
    pub end_advances: u32,
}

impl NavigationReport {
    /// Total forward clicks
    #[must_use]
    pub const fn advances(&self) -> u32 {
        self.start_advances + self.end_advances
    }
}

/// Drives one date-range selection against a [`PageDriver`]
#[derive(Debug)]
pub struct CalendarNavigator<'a> {
    site: &'a SiteContract,
    widget_timeout: Duration,
    max_advances: u32,
    phase: CalendarPhase,
}

impl<'a> CalendarNavigator<'a> {
    /// Create a navigator for one selection flow
    #[must_use]
    pub fn new(site: &'a SiteContract, widget_timeout: Duration, max_advances: u32) -> Self {
        Self {
            site,
            widget_timeout,
            max_advances,
            phase: CalendarPhase::Closed,
        }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> CalendarPhase {
        self.phase
    }

    /// Select `start` then `end`.
    ///
    /// `end` before `start` fails with [`ProbeError::InvalidDateRange`] before
    /// any interaction.
    pub async fn select_date_range<D: PageDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        start: CalendarTarget,
        end: CalendarTarget,
    ) -> ProbeResult<NavigationReport> {
        if end < start {
            return Err(ProbeError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        self.open(driver).await?;

        let start_advances = self.align(driver, &start).await?;
        self.phase = CalendarPhase::AlignedStart;
        self.click_day(driver, &start).await?;
        self.phase = CalendarPhase::StartSelected;

        let end_advances = self.align(driver, &end).await?;
        self.phase = CalendarPhase::AlignedEnd;
        self.click_day(driver, &end).await?;
        self.phase = CalendarPhase::EndSelected;

        let report = NavigationReport {
            start_advances,
            end_advances,
        };
        info!(%start, %end, advances = report.advances(), "date range selected");
        self.phase = CalendarPhase::Closed;
        Ok(report)
    }

    /// Open the widget unless a month label is already visible
    async fn open<D: PageDriver + ?Sized>(&mut self, driver: &mut D) -> ProbeResult<()> {
        let labels = self.site.month_labels();
        if !driver.is_visible(&labels).await? {
            driver.click(&self.site.dates_trigger()).await?;
        }
        driver
            .wait_for_visible(&labels, self.widget_timeout)
            .await
            .map_err(|e| match e {
                ProbeError::Timeout { .. } => ProbeError::WidgetNotOpen {
                    widget: "calendar",
                    timeout_ms: self.widget_timeout.as_millis() as u64,
                },
                other => other,
            })?;
        self.phase = CalendarPhase::Open;
        Ok(())
    }

    async fn read_window<D: PageDriver + ?Sized>(&self, driver: &D) -> ProbeResult<VisibleMonthWindow> {
        let labels = driver.all_text_contents(&self.site.month_labels()).await?;
        VisibleMonthWindow::from_labels(&labels)
    }

    /// Click "next month" until the target month is rendered; returns clicks made
    async fn align<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        target: &CalendarTarget,
    ) -> ProbeResult<u32> {
        let month = target.month();
        let mut window = self.read_window(driver).await?;

        let Some(needed) = window.advances_to(&month) else {
            return Err(ProbeError::UnreachableMonth {
                target: month.label(),
                earliest: window.first().label(),
            });
        };
        debug!(month = %month, visible = %window.first(), needed, "aligning calendar");

        let mut attempts = 0;
        while !window.contains(&month) {
            if attempts >= self.max_advances {
                return Err(ProbeError::MonthNotReachable {
                    target: month.label(),
                    attempts,
                    last_visible: window.last().label(),
                });
            }
            driver.click(&self.site.next_month()).await?;
            attempts += 1;

            let previous = window;
            window = self.read_window(driver).await?;
            if window.first() <= previous.first() {
                return Err(ProbeError::widget_state(format!(
                    "calendar did not advance past {} after clicking next month",
                    previous.first()
                )));
            }
        }
        Ok(attempts)
    }

    async fn click_day<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        target: &CalendarTarget,
    ) -> ProbeResult<()> {
        let cell = self.site.day_cell(&target.month().label(), target.day());
        driver
            .wait_for_visible(&cell, self.widget_timeout)
            .await
            .map_err(|e| match e {
                ProbeError::Timeout { .. } => ProbeError::OptionNotFound {
                    value: target.to_string(),
                    timeout_ms: self.widget_timeout.as_millis() as u64,
                },
                other => other,
            })?;
        debug!(date = %target, "clicking day cell");
        driver.click(&cell).await
    }
}
