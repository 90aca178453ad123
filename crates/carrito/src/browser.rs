//! Browser control over the Chrome DevTools Protocol.
//!
//! This is the driver adapter the page objects script against: click, fill,
//! read text, count, explicit waits, and network-response confirmation. All
//! DOM access is JavaScript built by [`crate::locator::Selector`] and
//! evaluated over CDP, one code path for every operation.

use crate::config::SiteConfig;
use crate::locator::Selector;
use crate::network::UrlPattern;
use crate::result::{CarritoError, CarritoResult};
use crate::wait::WaitOptions;

use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams as NetworkEnableParams, EventResponseReceived,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Browser instance with a live CDP connection
#[derive(Debug)]
pub struct Browser {
    config: SiteConfig,
    inner: Arc<Mutex<CdpBrowser>>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Launch a browser for the configured site.
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be launched
    pub async fn launch(config: SiteConfig) -> CarritoResult<Self> {
        let mut builder =
            CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }

        builder = builder.no_sandbox();

        if let Some(ref path) = config.chromium_path {
            if !std::path::Path::new(path).exists() {
                return Err(CarritoError::BrowserNotFound);
            }
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(|e| CarritoError::BrowserLaunch {
            message: e.to_string(),
        })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| CarritoError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        // Drive the CDP message loop for the lifetime of the browser
        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            config,
            inner: Arc::new(Mutex::new(browser)),
            handle,
        })
    }

    /// Open a new page on the storefront's login screen
    ///
    /// # Errors
    ///
    /// Returns error if the page cannot be created
    pub async fn new_page(&self) -> CarritoResult<StorePage> {
        let browser = self.inner.lock().await;
        let cdp_page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| CarritoError::page(e.to_string()))?;

        Ok(StorePage {
            inner: Arc::new(Mutex::new(cdp_page)),
            waits: WaitOptions::new().with_timeout(self.config.action_timeout_ms),
        })
    }

    /// The site configuration this browser was launched for
    #[must_use]
    pub const fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Close the browser
    pub async fn close(self) -> CarritoResult<()> {
        let mut browser = self.inner.lock().await;
        browser
            .close()
            .await
            .map_err(|e| CarritoError::BrowserLaunch {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

/// A storefront page driven over CDP
#[derive(Clone, Debug)]
pub struct StorePage {
    inner: Arc<Mutex<CdpPage>>,
    waits: WaitOptions,
}

impl StorePage {
    /// Default wait options for this page (derived from the action timeout)
    #[must_use]
    pub const fn waits(&self) -> &WaitOptions {
        &self.waits
    }

    /// Navigate to a URL
    pub async fn goto(&self, url: &str) -> CarritoResult<()> {
        let page = self.inner.lock().await;
        page.goto(url)
            .await
            .map_err(|e| CarritoError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Current page URL
    pub async fn current_url(&self) -> CarritoResult<String> {
        let page = self.inner.lock().await;
        let url = page
            .url()
            .await
            .map_err(|e| CarritoError::page(e.to_string()))?;
        url.ok_or_else(|| CarritoError::page("page has no URL"))
    }

    /// Evaluate a JS expression and deserialize its value
    pub async fn eval<T: serde::de::DeserializeOwned>(&self, expr: &str) -> CarritoResult<T> {
        let page = self.inner.lock().await;
        let result = page
            .evaluate(expr)
            .await
            .map_err(|e| CarritoError::page(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| CarritoError::page(e.to_string()))
    }

    /// Click the first element matching the selector
    pub async fn click(&self, selector: &Selector) -> CarritoResult<()> {
        let script = format!(
            "(() => {{ const el = {}; if (!el) return false; el.click(); return true; }})()",
            selector.to_query()
        );
        let clicked: bool = self.eval(&script).await?;
        if clicked {
            Ok(())
        } else {
            Err(CarritoError::ElementNotFound {
                selector: selector.describe(),
            })
        }
    }

    /// Click a descendant of the idx-th element matching `container`
    pub async fn click_within(
        &self,
        container: &Selector,
        idx: usize,
        inner: &Selector,
    ) -> CarritoResult<()> {
        let inner_css = inner.as_str();
        let script = format!(
            "(() => {{ const c = ({})[{idx}]; if (!c) return false; \
             const el = c.querySelector({inner_css:?}); if (!el) return false; \
             el.click(); return true; }})()",
            container.to_array_query()
        );
        let clicked: bool = self.eval(&script).await?;
        if clicked {
            Ok(())
        } else {
            Err(CarritoError::ElementNotFound {
                selector: format!("{container} [{idx}] {inner}"),
            })
        }
    }

    /// Fill an input, firing input/change events so the app sees the edit
    pub async fn fill(&self, selector: &Selector, value: &str) -> CarritoResult<()> {
        let script = format!(
            "(() => {{ const el = {}; if (!el) return false; \
             el.focus(); el.value = {value:?}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true; }})()",
            selector.to_query()
        );
        let filled: bool = self.eval(&script).await?;
        if filled {
            Ok(())
        } else {
            Err(CarritoError::ElementNotFound {
                selector: selector.describe(),
            })
        }
    }

    /// Fill an input inside the idx-th element matching `container`
    pub async fn fill_within(
        &self,
        container: &Selector,
        idx: usize,
        inner: &Selector,
        value: &str,
    ) -> CarritoResult<()> {
        let inner_css = inner.as_str();
        let script = format!(
            "(() => {{ const c = ({})[{idx}]; if (!c) return false; \
             const el = c.querySelector({inner_css:?}); if (!el) return false; \
             el.focus(); el.value = {value:?}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true; }})()",
            container.to_array_query()
        );
        let filled: bool = self.eval(&script).await?;
        if filled {
            Ok(())
        } else {
            Err(CarritoError::ElementNotFound {
                selector: format!("{container} [{idx}] {inner}"),
            })
        }
    }

    /// Trimmed inner text of the first matching element
    pub async fn inner_text(&self, selector: &Selector) -> CarritoResult<String> {
        let text = self.try_inner_text(selector).await?;
        text.ok_or_else(|| CarritoError::ElementNotFound {
            selector: selector.describe(),
        })
    }

    /// Trimmed inner text of the first matching element, None when absent
    pub async fn try_inner_text(&self, selector: &Selector) -> CarritoResult<Option<String>> {
        self.eval(&selector.to_text_query()).await
    }

    /// Trimmed inner text of a descendant of the idx-th matching element,
    /// None when either level is absent
    pub async fn try_inner_text_within(
        &self,
        container: &Selector,
        idx: usize,
        inner: &Selector,
    ) -> CarritoResult<Option<String>> {
        let inner_css = inner.as_str();
        let script = format!(
            "(() => {{ const c = ({})[{idx}]; if (!c) return null; \
             const el = c.querySelector({inner_css:?}); \
             return el ? el.innerText.trim() : null; }})()",
            container.to_array_query()
        );
        self.eval(&script).await
    }

    /// Paired descendant texts for every element matching `container`, in
    /// DOM order. Used to scrape basket lines in one round trip.
    pub async fn inner_text_pairs(
        &self,
        container: &Selector,
        first: &Selector,
        second: &Selector,
    ) -> CarritoResult<Vec<(String, String)>> {
        let (first_css, second_css) = (first.as_str(), second.as_str());
        let script = format!(
            "({}).map(c => {{ \
             const a = c.querySelector({first_css:?}); \
             const b = c.querySelector({second_css:?}); \
             return [a ? a.innerText.trim() : '', b ? b.innerText.trim() : '']; }})",
            container.to_array_query()
        );
        self.eval(&script).await
    }

    /// Number of elements matching the selector
    pub async fn count(&self, selector: &Selector) -> CarritoResult<usize> {
        self.eval(&selector.to_count_query()).await
    }

    /// Whether the first matching element exists and is enabled
    pub async fn is_enabled(&self, selector: &Selector) -> CarritoResult<bool> {
        self.eval(&selector.to_enabled_query()).await
    }

    /// Scroll the viewport back to the top
    pub async fn scroll_to_top(&self) -> CarritoResult<()> {
        let _: serde_json::Value = self.eval("window.scrollTo(0, 0) ?? null").await?;
        Ok(())
    }

    /// Poll a boolean JS expression until it is true or the wait times out
    pub async fn wait_until(
        &self,
        waited_for: &str,
        expr: &str,
        options: &WaitOptions,
    ) -> CarritoResult<()> {
        let deadline = options.start();
        loop {
            if self.eval::<bool>(expr).await? {
                return Ok(());
            }
            if deadline.expired() {
                return Err(CarritoError::Timeout {
                    ms: options.timeout_ms,
                    waited_for: waited_for.to_string(),
                });
            }
            tokio::time::sleep(options.poll_interval()).await;
        }
    }

    /// Wait until at least one element matches the selector
    pub async fn wait_for_selector(&self, selector: &Selector) -> CarritoResult<()> {
        let expr = format!("({}) > 0", selector.to_count_query());
        let waits = self.waits.clone();
        self.wait_until(&selector.describe(), &expr, &waits).await
    }

    /// Wait until the first matching element's text equals `expected`
    pub async fn wait_for_text(&self, selector: &Selector, expected: &str) -> CarritoResult<()> {
        let expr = format!("({}) === {expected:?}", selector.to_text_query());
        let waits = self.waits.clone();
        self.wait_until(
            &format!("{selector} to read {expected:?}"),
            &expr,
            &waits,
        )
        .await
    }

    /// Start watching for responses matching the given URL patterns.
    ///
    /// Subscribe *before* triggering the request, then `await` the watcher
    /// after the click, or the response can slip past unobserved.
    pub async fn watch_responses(&self, patterns: Vec<UrlPattern>) -> CarritoResult<ResponseWatcher> {
        let page = self.inner.lock().await;
        page.execute(NetworkEnableParams::default())
            .await
            .map_err(|e| CarritoError::page(e.to_string()))?;
        let events = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| CarritoError::page(e.to_string()))?;
        Ok(ResponseWatcher {
            events: Box::pin(events),
            patterns,
        })
    }
}

/// In-flight subscription to network responses
pub struct ResponseWatcher {
    events: Pin<Box<dyn futures::Stream<Item = Arc<EventResponseReceived>> + Send>>,
    patterns: Vec<UrlPattern>,
}

impl std::fmt::Debug for ResponseWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseWatcher")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl ResponseWatcher {
    /// Wait until every watched pattern has seen an HTTP 200 response.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` when the options expire first.
    pub async fn confirmed(mut self, options: &WaitOptions) -> CarritoResult<()> {
        let mut seen = vec![false; self.patterns.len()];
        let outcome = tokio::time::timeout(options.timeout(), async {
            while let Some(event) = self.events.next().await {
                if event.response.status != 200 {
                    continue;
                }
                for (i, pattern) in self.patterns.iter().enumerate() {
                    if pattern.matches(&event.response.url) {
                        seen[i] = true;
                    }
                }
                if seen.iter().all(|s| *s) {
                    return;
                }
            }
        })
        .await;

        match outcome {
            Ok(()) => Ok(()),
            Err(_) => Err(CarritoError::Timeout {
                ms: options.timeout_ms,
                waited_for: format!("{} confirmed responses", self.patterns.len()),
            }),
        }
    }
}
