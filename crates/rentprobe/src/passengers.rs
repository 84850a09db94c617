//! Passenger counts and the +/- stepper popover.

use crate::driver::PageDriver;
use crate::result::{ProbeError, ProbeResult};
use crate::site::SiteContract;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Which counter a stepper controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassengerKind {
    /// Adults (at least one per booking)
    Adults,
    /// Children
    Children,
}

impl PassengerKind {
    /// Noun used in stepper accessible names
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Adults => "adults",
            Self::Children => "children",
        }
    }
}

/// Stepper direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// "+" button
    Increase,
    /// "-" button
    Decrease,
}

impl Step {
    /// Verb used in stepper accessible names
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Increase => "Increase",
            Self::Decrease => "Decrease",
        }
    }
}

/// Requested travellers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PassengerCount {
    /// Number of adults
    pub adults: u8,
    /// Number of children
    pub children: u8,
}

impl PassengerCount {
    /// Create a count
    #[must_use]
    pub const fn new(adults: u8, children: u8) -> Self {
        Self { adults, children }
    }

    /// Count for one kind
    #[must_use]
    pub const fn get(&self, kind: PassengerKind) -> u8 {
        match kind {
            PassengerKind::Adults => self.adults,
            PassengerKind::Children => self.children,
        }
    }

    /// Adults plus children
    #[must_use]
    pub const fn total(&self) -> u16 {
        self.adults as u16 + self.children as u16
    }
}

impl Default for PassengerCount {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl fmt::Display for PassengerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let adults = if self.adults == 1 { "Adult" } else { "Adults" };
        write!(f, "{} {adults}", self.adults)?;
        if self.children > 0 {
            let children = if self.children == 1 { "Child" } else { "Children" };
            write!(f, ", {} {children}", self.children)?;
        }
        Ok(())
    }
}

/// Bounds the widget enforces on passenger counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassengerLimits {
    /// Minimum adults
    pub min_adults: u8,
    /// Maximum adults
    pub max_adults: u8,
    /// Maximum children
    pub max_children: u8,
    /// Maximum adults plus children
    pub max_total: u8,
}

impl Default for PassengerLimits {
    fn default() -> Self {
        Self {
            min_adults: 1,
            max_adults: 6,
            max_children: 4,
            max_total: 6,
        }
    }
}

impl PassengerLimits {
    /// Check `count` against the limits
    pub fn validate(&self, count: PassengerCount) -> ProbeResult<()> {
        let fail = |message: String| Err(ProbeError::InvalidPassengerCount { message });
        if count.adults < self.min_adults {
            return fail(format!("at least {} adult(s) required, got {}", self.min_adults, count.adults));
        }
        if count.adults > self.max_adults {
            return fail(format!("at most {} adults allowed, got {}", self.max_adults, count.adults));
        }
        if count.children > self.max_children {
            return fail(format!(
                "at most {} children allowed, got {}",
                self.max_children, count.children
            ));
        }
        if count.total() > u16::from(self.max_total) {
            return fail(format!(
                "at most {} passengers allowed, got {}",
                self.max_total,
                count.total()
            ));
        }
        Ok(())
    }
}

/// Open the passengers popover and step both counters to `target`.
///
/// Each counter is read, stepped by the exact number of clicks and read back.
/// A counter being lowered is stepped first so the running total stays under
/// the widget's cap.
pub async fn set_passengers<D: PageDriver + ?Sized>(
    driver: &mut D,
    site: &SiteContract,
    target: PassengerCount,
    timeout: Duration,
) -> ProbeResult<()> {
    let adults = site.passenger_counter(PassengerKind::Adults);
    if !driver.is_visible(&adults).await? {
        driver.click(&site.passengers_trigger()).await?;
    }
    driver
        .wait_for_visible(&adults, timeout)
        .await
        .map_err(|e| match e {
            ProbeError::Timeout { .. } => ProbeError::WidgetNotOpen {
                widget: "passengers",
                timeout_ms: timeout.as_millis() as u64,
            },
            other => other,
        })?;

    let current = PassengerCount::new(
        read_counter(driver, site, PassengerKind::Adults).await?,
        read_counter(driver, site, PassengerKind::Children).await?,
    );

    // Shrink before growing so the running total never exceeds the cap
    let mut order = [PassengerKind::Adults, PassengerKind::Children];
    if target.get(PassengerKind::Adults) > current.adults {
        order.reverse();
    }
    for kind in order {
        step_to(driver, site, kind, current.get(kind), target.get(kind)).await?;
    }
    Ok(())
}

async fn read_counter<D: PageDriver + ?Sized>(
    driver: &D,
    site: &SiteContract,
    kind: PassengerKind,
) -> ProbeResult<u8> {
    let raw = driver.text_content(&site.passenger_counter(kind)).await?;
    raw.trim().parse().map_err(|_| {
        ProbeError::widget_state(format!("{} counter shows {:?}, not a number", kind.noun(), raw.trim()))
    })
}

async fn step_to<D: PageDriver + ?Sized>(
    driver: &mut D,
    site: &SiteContract,
    kind: PassengerKind,
    from: u8,
    to: u8,
) -> ProbeResult<()> {
    let (step, clicks) = if to >= from {
        (Step::Increase, to - from)
    } else {
        (Step::Decrease, from - to)
    };
    debug!(kind = kind.noun(), from, to, clicks, "stepping passenger counter");

    let button = site.passenger_stepper(kind, step);
    for _ in 0..clicks {
        driver.click(&button).await?;
    }

    let shown = read_counter(driver, site, kind).await?;
    if shown == to {
        Ok(())
    } else {
        Err(ProbeError::widget_state(format!(
            "{} counter shows {shown} after stepping from {from} to {to}",
            kind.noun()
        )))
    }
}
