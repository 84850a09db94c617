//! Suite configuration.
//!
//! A `rentprobe.yaml` file describes where the site and API live, how long
//! each kind of wait may take, and optionally overrides parts of the
//! [`SiteContract`]. Every key is optional. After the file is read,
//! `RENTPROBE_BASE_URL`, `RENTPROBE_API_URL` and `RENTPROBE_HEADLESS` override
//! the corresponding values.

use crate::calendar::DEFAULT_MAX_MONTH_ADVANCES;
use crate::driver::DriverConfig;
use crate::locator::DEFAULT_TIMEOUT_MS;
use crate::page::PageConfig;
use crate::passengers::PassengerLimits;
use crate::result::{ProbeError, ProbeResult};
use crate::site::SiteContract;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Environment variable overriding `base_url`
pub const ENV_BASE_URL: &str = "RENTPROBE_BASE_URL";
/// Environment variable overriding `api_url`
pub const ENV_API_URL: &str = "RENTPROBE_API_URL";
/// Environment variable overriding `browser.headless`
pub const ENV_HEADLESS: &str = "RENTPROBE_HEADLESS";

/// Wait bounds in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Always-present elements
    pub element_ms: u64,
    /// Popovers, panels and the calendar
    pub widget_ms: u64,
    /// Filtered options
    pub option_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            element_ms: DEFAULT_TIMEOUT_MS,
            widget_ms: DEFAULT_TIMEOUT_MS,
            option_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Calendar navigation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Forward clicks allowed per alignment
    pub max_month_advances: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            max_month_advances: DEFAULT_MAX_MONTH_ADVANCES,
        }
    }
}

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run without a window
    pub headless: bool,
    /// Chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Keep the Chromium sandbox enabled
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chromium_path: None,
            sandbox: true,
        }
    }
}

/// Complete suite configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Booking site root
    pub base_url: String,
    /// Availability API root
    pub api_url: String,
    /// Wait bounds
    pub timeouts: TimeoutConfig,
    /// Calendar navigation
    pub calendar: CalendarConfig,
    /// Passenger limits
    pub passengers: PassengerLimits,
    /// Browser launch
    pub browser: BrowserConfig,
    /// DOM contract override; unset keys keep their defaults
    pub site: Option<SiteContract>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_url: "http://localhost:3000/api".to_string(),
            timeouts: TimeoutConfig::default(),
            calendar: CalendarConfig::default(),
            passengers: PassengerLimits::default(),
            browser: BrowserConfig::default(),
            site: None,
        }
    }
}

impl SuiteConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path`, apply environment overrides and validate
    pub fn load(path: &Path) -> ProbeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ProbeError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_yaml(&text)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        debug!(path = %path.display(), base_url = %config.base_url, "configuration loaded");
        Ok(config)
    }

    /// Defaults plus environment overrides, for runs without a file
    pub fn from_env() -> ProbeResult<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML without consulting the environment
    pub fn from_yaml(yaml: &str) -> ProbeResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ProbeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Apply overrides read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ProbeResult<()> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(raw) = lookup(ENV_HEADLESS) {
            self.browser.headless = parse_flag(&raw).ok_or_else(|| {
                ProbeError::config(format!("{ENV_HEADLESS} must be true or false, got {raw:?}"))
            })?;
        }
        Ok(())
    }

    /// Reject values no run could succeed with
    pub fn validate(&self) -> ProbeResult<()> {
        for (key, url) in [("base_url", &self.base_url), ("api_url", &self.api_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ProbeError::config(format!("{key} must be an http(s) URL, got {url:?}")));
            }
        }
        let t = &self.timeouts;
        if t.element_ms == 0 || t.widget_ms == 0 || t.option_ms == 0 {
            return Err(ProbeError::config("timeouts must be greater than zero"));
        }
        if self.calendar.max_month_advances == 0 {
            return Err(ProbeError::config("calendar.max_month_advances must be at least 1"));
        }
        let p = &self.passengers;
        if p.min_adults == 0 || p.min_adults > p.max_adults || p.min_adults > p.max_total {
            return Err(ProbeError::config(format!(
                "passenger limits are inconsistent: min_adults {} max_adults {} max_total {}",
                p.min_adults, p.max_adults, p.max_total
            )));
        }
        Ok(())
    }

    /// Set the site root
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API root
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.browser.headless = headless;
        self
    }

    /// Set the calendar advance bound
    #[must_use]
    pub const fn with_max_month_advances(mut self, max: u32) -> Self {
        self.calendar.max_month_advances = max;
        self
    }

    /// Effective DOM contract
    #[must_use]
    pub fn site(&self) -> SiteContract {
        self.site.clone().unwrap_or_default()
    }

    /// Settings for a [`SearchPage`](crate::SearchPage)
    #[must_use]
    pub fn page_config(&self) -> PageConfig {
        PageConfig {
            base_url: self.base_url.clone(),
            site: self.site(),
            element_timeout: Duration::from_millis(self.timeouts.element_ms),
            widget_timeout: Duration::from_millis(self.timeouts.widget_ms),
            option_timeout: Duration::from_millis(self.timeouts.option_ms),
            max_month_advances: self.calendar.max_month_advances,
            passenger_limits: self.passengers,
        }
    }

    /// Settings for launching a browser
    #[must_use]
    pub fn driver_config(&self) -> DriverConfig {
        let mut config = DriverConfig::new().headless(self.browser.headless);
        if let Some(path) = &self.browser.chromium_path {
            config = config.chromium_path(path);
        }
        if !self.browser.sandbox {
            config = config.no_sandbox();
        }
        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
