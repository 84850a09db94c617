//! Chromium driver over the Chrome DevTools Protocol.
//!
//! Every selector is compiled to a JavaScript query with
//! [`Selector::to_query_all`] and evaluated in the page, so role and
//! accessible-name matching behaves the same as in [`MockBookingSite`].
//!
//! [`MockBookingSite`]: crate::MockBookingSite

use crate::driver::{DriverConfig, PageDriver};
use crate::locator::Selector;
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

const VISIBLE_JS: &str =
    "(el => !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length))";

/// Browser page driven through chromiumoxide
#[derive(Debug)]
pub struct ChromiumDriver {
    config: DriverConfig,
    browser: Mutex<Browser>,
    page: Mutex<Page>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page
    pub async fn launch(config: DriverConfig) -> ProbeResult<Self> {
        let mut builder = CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder
            .build()
            .map_err(|message| ProbeError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            Browser::launch(cdp_config)
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ProbeError::BrowserLaunch {
                message: e.to_string(),
            })?;
        debug!(headless = config.headless, "chromium launched");

        Ok(Self {
            config,
            browser: Mutex::new(browser),
            page: Mutex::new(page),
            handle,
        })
    }

    /// Launch settings
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Close the browser
    pub async fn close(self) -> ProbeResult<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.map_err(|e| ProbeError::driver(e.to_string()))?;
        Ok(())
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> ProbeResult<T> {
        let page = self.page.lock().await;
        let result = page
            .evaluate(script)
            .await
            .map_err(|e| ProbeError::driver(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| ProbeError::driver(e.to_string()))
    }

    /// Run `body` with `el` bound to the first visible match; `body` returns
    /// a JSON value, `null` means "no match"
    async fn with_first<T: DeserializeOwned>(&self, selector: &Selector, body: &str) -> ProbeResult<T> {
        let script = format!(
            "(() => {{ const el = {}.find({VISIBLE_JS}); if (!el) return null; {body} }})()",
            selector.to_query_all()
        );
        let value: Option<T> = self.eval(script).await?;
        value.ok_or_else(|| ProbeError::ElementNotFound {
            selector: selector.to_string(),
        })
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        let page = self.page.lock().await;
        page.goto(url).await.map_err(|e| ProbeError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    async fn click(&mut self, selector: &Selector) -> ProbeResult<()> {
        let _: bool = self
            .with_first(
                selector,
                "el.scrollIntoView({ block: 'center' }); el.click(); return true;",
            )
            .await?;
        Ok(())
    }

    async fn fill(&mut self, selector: &Selector, text: &str) -> ProbeResult<()> {
        let text = serde_json::to_string(text)?;
        let body = format!(
            "el.focus(); \
             const proto = Object.getPrototypeOf(el); \
             const desc = Object.getOwnPropertyDescriptor(proto, 'value'); \
             if (desc && desc.set) {{ desc.set.call(el, {text}); }} else {{ el.value = {text}; }} \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true;"
        );
        let _: bool = self.with_first(selector, &body).await?;
        Ok(())
    }

    async fn wait_for_visible(&self, selector: &Selector, timeout: Duration) -> ProbeResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_visible(selector).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ProbeError::Timeout {
                    selector: selector.to_string(),
                    ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    async fn is_visible(&self, selector: &Selector) -> ProbeResult<bool> {
        self.eval(format!("{}.some({VISIBLE_JS})", selector.to_query_all()))
            .await
    }

    async fn text_content(&self, selector: &Selector) -> ProbeResult<String> {
        self.with_first(selector, "return el.textContent || '';").await
    }

    async fn all_text_contents(&self, selector: &Selector) -> ProbeResult<Vec<String>> {
        self.eval(format!(
            "{}.filter({VISIBLE_JS}).map(el => el.textContent || '')",
            selector.to_query_all()
        ))
        .await
    }

    async fn input_value(&self, selector: &Selector) -> ProbeResult<String> {
        self.with_first(selector, "return el.value ?? '';").await
    }

    async fn screenshot(&self, path: &Path) -> ProbeResult<()> {
        let page = self.page.lock().await;
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        page.save_screenshot(params, path)
            .await
            .map_err(|e| ProbeError::Screenshot {
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        let page = self.page.lock().await;
        let url = page.url().await.map_err(|e| ProbeError::driver(e.to_string()))?;
        Ok(url.unwrap_or_default())
    }
}
