//! Locator abstraction for element selection and interaction.
//!
//! # Design Philosophy
//!
//! - **Auto-Waiting**: [`Locator`] actions wait for the element to be visible
//!   before acting, bounded by the locator timeout
//! - **First Match**: when several elements match, actions apply to the first
//!   one in document order
//! - **Scoping**: [`Selector::within`] restricts a selector to descendants of
//!   another, e.g. a day cell inside one month panel

use std::fmt;
use std::time::Duration;

use crate::driver::PageDriver;
use crate::result::ProbeResult;

/// Default timeout for auto-waiting (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default polling interval for auto-waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// ARIA roles the booking widget exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// `button`
    Button,
    /// `textbox`
    TextBox,
    /// `combobox`
    ComboBox,
    /// `option`
    Option,
    /// `listbox`
    ListBox,
    /// `grid` (one calendar month panel)
    Grid,
    /// `heading`
    Heading,
    /// `dialog`
    Dialog,
    /// `status`
    Status,
}

impl Role {
    /// ARIA role name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::TextBox => "textbox",
            Self::ComboBox => "combobox",
            Self::Option => "option",
            Self::ListBox => "listbox",
            Self::Grid => "grid",
            Self::Heading => "heading",
            Self::Dialog => "dialog",
            Self::Status => "status",
        }
    }

    /// CSS selector matching elements with this role, explicit or implicit
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::Button => "button, [role=\"button\"]",
            Self::TextBox => "input:not([type=\"hidden\"]), textarea, [role=\"textbox\"]",
            Self::ComboBox => "[role=\"combobox\"], select",
            Self::Option => "[role=\"option\"], option",
            Self::ListBox => "[role=\"listbox\"], datalist",
            Self::Grid => "[role=\"grid\"], table",
            Self::Heading => "h1, h2, h3, h4, h5, h6, [role=\"heading\"]",
            Self::Dialog => "dialog, [role=\"dialog\"]",
            Self::Status => "[role=\"status\"], output",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g. ".calendar-month-label")
    Css(String),
    /// Test ID selector (data-testid attribute)
    TestId(String),
    /// Role plus accessible name
    Role {
        /// ARIA role
        role: Role,
        /// Accessible name to match
        name: String,
        /// Exact (case-sensitive, whole string) or case-insensitive substring
        exact: bool,
    },
    /// `inner` restricted to descendants of elements matching `scope`
    Within {
        /// Containing element selector
        scope: Box<Selector>,
        /// Descendant selector
        inner: Box<Selector>,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Role selector with exact accessible-name match
    #[must_use]
    pub fn role(role: Role, name: impl Into<String>) -> Self {
        Self::Role {
            role,
            name: name.into(),
            exact: true,
        }
    }

    /// Role selector with case-insensitive substring accessible-name match
    #[must_use]
    pub fn role_containing(role: Role, name: impl Into<String>) -> Self {
        Self::Role {
            role,
            name: name.into(),
            exact: false,
        }
    }

    /// Restrict `inner` to descendants of `self`
    #[must_use]
    pub fn within(self, inner: Selector) -> Self {
        Self::Within {
            scope: Box::new(self),
            inner: Box::new(inner),
        }
    }

    /// JavaScript expression evaluating to an array of matching elements,
    /// in document order
    #[must_use]
    pub fn to_query_all(&self) -> String {
        self.query_in("document")
    }

    fn query_in(&self, root: &str) -> String {
        match self {
            Self::Css(css) => format!("Array.from({root}.querySelectorAll({css:?}))"),
            Self::TestId(id) => {
                let css = format!("[data-testid={id:?}]");
                format!("Array.from({root}.querySelectorAll({css:?}))")
            }
            Self::Role { role, name, exact } => {
                let css = role.css();
                let test = if *exact {
                    format!("=== {name:?}")
                } else {
                    format!(".toLowerCase().includes({:?})", name.to_lowercase())
                };
                format!(
                    "Array.from({root}.querySelectorAll({css:?})).filter(el => {ACCESSIBLE_NAME_JS}(el){test})"
                )
            }
            Self::Within { scope, inner } => {
                format!("{}.flatMap(scope => {})", scope.query_in(root), inner.query_in("scope"))
            }
        }
    }
}

/// Accessible name: aria-label, then label text, then placeholder, then text
const ACCESSIBLE_NAME_JS: &str = "(el => (el.getAttribute('aria-label') \
    || (el.labels && el.labels.length ? el.labels[0].textContent : '') \
    || el.getAttribute('placeholder') || el.textContent || '').trim())";

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "css={css}"),
            Self::TestId(id) => write!(f, "test-id={id}"),
            Self::Role { role, name, exact } => {
                if *exact {
                    write!(f, "role={role}[name={name:?}]")
                } else {
                    write!(f, "role={role}[name~={name:?}]")
                }
            }
            Self::Within { scope, inner } => write!(f, "{scope} >> {inner}"),
        }
    }
}

/// Locator options for customizing behavior
#[derive(Debug, Clone)]
pub struct LocatorOptions {
    /// Timeout for auto-waiting
    pub timeout: Duration,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

/// A locator for finding and interacting with elements.
///
/// Locators are plain values; they resolve against the page every time an
/// action runs and never hold on to a rendered element.
#[derive(Debug, Clone)]
pub struct Locator {
    selector: Selector,
    options: LocatorOptions,
}

impl Locator {
    /// Create a locator from a selector
    #[must_use]
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            options: LocatorOptions::default(),
        }
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Wait until the element is visible
    pub async fn wait_for<D: PageDriver + ?Sized>(&self, driver: &D) -> ProbeResult<()> {
        driver
            .wait_for_visible(&self.selector, self.options.timeout)
            .await
    }

    /// Whether the element is currently visible (no waiting)
    pub async fn is_visible<D: PageDriver + ?Sized>(&self, driver: &D) -> ProbeResult<bool> {
        driver.is_visible(&self.selector).await
    }

    /// Wait for the element, then click it
    pub async fn click<D: PageDriver + ?Sized>(&self, driver: &mut D) -> ProbeResult<()> {
        self.wait_for(driver).await?;
        driver.click(&self.selector).await
    }

    /// Wait for the element, then replace its value with `text`
    pub async fn fill<D: PageDriver + ?Sized>(&self, driver: &mut D, text: &str) -> ProbeResult<()> {
        self.wait_for(driver).await?;
        driver.fill(&self.selector, text).await
    }

    /// Wait for the element, then read its trimmed text content
    pub async fn text<D: PageDriver + ?Sized>(&self, driver: &D) -> ProbeResult<String> {
        self.wait_for(driver).await?;
        Ok(driver.text_content(&self.selector).await?.trim().to_string())
    }

    /// Wait for the element, then read its trimmed input value
    pub async fn value<D: PageDriver + ?Sized>(&self, driver: &D) -> ProbeResult<String> {
        self.wait_for(driver).await?;
        Ok(driver.input_value(&self.selector).await?.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_display_forms() {
            assert_eq!(Selector::css(".label").to_string(), "css=.label");
            assert_eq!(Selector::test_id("adults").to_string(), "test-id=adults");
            assert_eq!(
                Selector::role(Role::Button, "Next month").to_string(),
                "role=button[name=\"Next month\"]"
            );
            let scoped = Selector::role(Role::Grid, "October 2026")
                .within(Selector::role(Role::Button, "1"));
            assert_eq!(
                scoped.to_string(),
                "role=grid[name=\"October 2026\"] >> role=button[name=\"1\"]"
            );
        }

        #[test]
        fn test_css_query() {
            let q = Selector::css(".month").to_query_all();
            assert_eq!(q, "Array.from(document.querySelectorAll(\".month\"))");
        }

        #[test]
        fn test_exact_role_query_uses_strict_equality() {
            let q = Selector::role(Role::Button, "1").to_query_all();
            assert!(q.contains("=== \"1\""));
            assert!(!q.contains("includes"));
        }

        #[test]
        fn test_substring_role_query_is_case_insensitive() {
            let q = Selector::role_containing(Role::Option, "AUCK").to_query_all();
            assert!(q.contains(".toLowerCase().includes(\"auck\")"));
        }

        #[test]
        fn test_within_query_scopes_inner() {
            let q = Selector::test_id("panel")
                .within(Selector::css("button"))
                .to_query_all();
            assert!(q.contains(".flatMap(scope => Array.from(scope.querySelectorAll(\"button\")))"));
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_default_timeout() {
            let loc = Locator::new(Selector::css("button"));
            assert_eq!(loc.options().timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        }

        #[test]
        fn test_with_timeout() {
            let loc = Locator::new(Selector::css("button")).with_timeout(Duration::from_millis(10));
            assert_eq!(loc.options().timeout, Duration::from_millis(10));
            assert_eq!(loc.selector(), &Selector::css("button"));
        }
    }
}
