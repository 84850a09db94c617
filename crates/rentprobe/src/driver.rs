//! PageDriver - Abstract Browser Automation Trait
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  PageDriver (Abstract Trait)                                      │
//! ├───────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────┐          ┌─────────────────────┐         │
//! │  │  ChromiumDriver     │          │  MockBookingSite    │         │
//! │  │  (feature browser)  │          │  (always built)     │         │
//! │  │  CDP via            │          │  In-memory model of │         │
//! │  │  chromiumoxide      │          │  the booking widget │         │
//! │  └─────────────────────┘          └─────────────────────┘         │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The interaction layer depends only on this trait. Every primitive may fail
//! or time out; failures surface as [`ProbeError`](crate::ProbeError) values.

use crate::locator::Selector;
use crate::result::ProbeResult;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Browser configuration for driver
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Polling interval used by `wait_for_visible`
    pub poll_interval: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1440,
            viewport_height: 900,
            chromium_path: None,
            sandbox: true,
            poll_interval: Duration::from_millis(crate::locator::DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Browser automation primitives consumed by the interaction layer.
///
/// Mutating primitives take `&mut self`: one page instance is driven by one
/// sequential caller. Actions on a selector matching several elements apply
/// to the first in document order.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to URL
    async fn navigate(&mut self, url: &str) -> ProbeResult<()>;

    /// Click the first visible element matching `selector`
    async fn click(&mut self, selector: &Selector) -> ProbeResult<()>;

    /// Replace the value of the first input matching `selector`
    async fn fill(&mut self, selector: &Selector, text: &str) -> ProbeResult<()>;

    /// Wait until an element matching `selector` is visible
    ///
    /// Fails with [`ProbeError::Timeout`](crate::ProbeError::Timeout) once
    /// `timeout` elapses.
    async fn wait_for_visible(&self, selector: &Selector, timeout: Duration) -> ProbeResult<()>;

    /// Whether an element matching `selector` is visible right now
    async fn is_visible(&self, selector: &Selector) -> ProbeResult<bool>;

    /// Raw text content of the first match (untrimmed)
    async fn text_content(&self, selector: &Selector) -> ProbeResult<String>;

    /// Raw text content of every visible match, in document order
    async fn all_text_contents(&self, selector: &Selector) -> ProbeResult<Vec<String>>;

    /// Current value of the first matching input (untrimmed)
    async fn input_value(&self, selector: &Selector) -> ProbeResult<String>;

    /// Save a PNG screenshot of the page to `path`
    async fn screenshot(&self, path: &Path) -> ProbeResult<()>;

    /// Get current URL
    async fn current_url(&self) -> ProbeResult<String>;
}
