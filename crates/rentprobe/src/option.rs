//! Option resolution for suggestion dropdowns.
//!
//! Reveal the list, type the canonical value, wait for the option whose full
//! accessible name equals that value, click it. When several options carry the
//! same name the first in document order wins.

use crate::driver::PageDriver;
use crate::locator::{Role, Selector};
use crate::result::{ProbeError, ProbeResult};
use std::time::Duration;
use tracing::debug;

/// Where one dropdown lives on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionScope {
    /// Widget name used in errors
    pub widget: &'static str,
    /// Control that reveals the search input
    pub trigger: Selector,
    /// Search input receiving the typed value
    pub input: Selector,
    /// Container the options render inside
    pub list: Selector,
}

impl OptionScope {
    /// Option with this exact display text inside the list
    #[must_use]
    pub fn option(&self, canonical: &str) -> Selector {
        self.list.clone().within(Selector::role(Role::Option, canonical))
    }
}

/// Reveal, filter and click the option for `canonical`.
///
/// # Errors
///
/// - [`ProbeError::WidgetNotOpen`] if the search input never appears
/// - [`ProbeError::OptionNotFound`] if no option with the exact text appears
/// - any other driver error unchanged
pub async fn resolve_and_select<D: PageDriver + ?Sized>(
    driver: &mut D,
    scope: &OptionScope,
    canonical: &str,
    timeout: Duration,
) -> ProbeResult<()> {
    if !driver.is_visible(&scope.input).await? {
        debug!(widget = scope.widget, "revealing option list");
        driver.click(&scope.trigger).await?;
    }
    driver
        .wait_for_visible(&scope.input, timeout)
        .await
        .map_err(|e| match e {
            ProbeError::Timeout { .. } => ProbeError::WidgetNotOpen {
                widget: scope.widget,
                timeout_ms: timeout.as_millis() as u64,
            },
            other => other,
        })?;

    driver.fill(&scope.input, canonical).await?;

    let option = scope.option(canonical);
    driver
        .wait_for_visible(&option, timeout)
        .await
        .map_err(|e| match e {
            ProbeError::Timeout { .. } => ProbeError::OptionNotFound {
                value: canonical.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            },
            other => other,
        })?;

    debug!(widget = scope.widget, value = canonical, "selecting option");
    driver.click(&option).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBookingSite, MockCall};
    use crate::site::SiteContract;

    const TIMEOUT: Duration = Duration::from_millis(20);

    #[tokio::test]
    async fn test_selects_existing_option() {
        let site = SiteContract::default();
        let mut mock = MockBookingSite::new();
        resolve_and_select(&mut mock, &site.pickup_scope(), "Christchurch", TIMEOUT)
            .await
            .unwrap();

        let label = mock.text_content(&site.pickup_trigger()).await.unwrap();
        assert_eq!(label.trim(), "Christchurch");
    }

    #[tokio::test]
    async fn test_missing_option_names_value() {
        let site = SiteContract::default();
        let mut mock = MockBookingSite::new().with_locations(&["Auckland", "Queenstown"]);
        let err = resolve_and_select(&mut mock, &site.pickup_scope(), "Christchurch", TIMEOUT)
            .await
            .unwrap_err();

        match err {
            ProbeError::OptionNotFound { value, .. } => assert_eq!(value, "Christchurch"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_does_not_reclick_open_trigger() {
        let site = SiteContract::default();
        let scope = site.pickup_scope();
        let mut mock = MockBookingSite::new();
        mock.click(&scope.trigger).await.unwrap();
        mock.clear_history();

        resolve_and_select(&mut mock, &scope, "Auckland", TIMEOUT).await.unwrap();
        assert!(!mock.history().contains(&MockCall::Click(scope.trigger.to_string())));
    }

    #[tokio::test]
    async fn test_widget_that_never_opens() {
        let site = SiteContract::default();
        let mut mock = MockBookingSite::new().with_broken_location_panels();
        let err = resolve_and_select(&mut mock, &site.dropoff_scope(), "Auckland", TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProbeError::WidgetNotOpen {
                widget: "drop-off location",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_duplicate_names_pick_first_in_document_order() {
        let site = SiteContract::default();
        let mut mock = MockBookingSite::new().with_locations(&["Auckland", "Auckland", "Queenstown"]);
        resolve_and_select(&mut mock, &site.pickup_scope(), "Auckland", TIMEOUT)
            .await
            .unwrap();
        assert_eq!(mock.last_clicked_option_index(), Some(0));
    }
}
