//! Site configuration for the storefront under test.
//!
//! Defaults mirror the live enotes deployment; everything can be overridden
//! through the environment so the suite can point at a staging copy.

use std::time::Duration;

/// Default base URL of the storefront
pub const DEFAULT_BASE_URL: &str = "https://enotes.pointschool.ru";

/// Default per-action timeout (35 seconds)
pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 35_000;

/// Default whole-scenario timeout (45 seconds)
pub const DEFAULT_SCENARIO_TIMEOUT_MS: u64 = 45_000;

/// Immutable configuration for a test session
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Base URL of the storefront
    pub base_url: String,
    /// Username of the fixed test account
    pub username: String,
    /// Password of the fixed test account
    pub password: String,
    /// Per-action timeout in milliseconds
    pub action_timeout_ms: u64,
    /// Whole-scenario timeout in milliseconds
    pub scenario_timeout_ms: u64,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Run the browser headless
    pub headless: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: "test".to_string(),
            password: "test".to_string(),
            action_timeout_ms: DEFAULT_ACTION_TIMEOUT_MS,
            scenario_timeout_ms: DEFAULT_SCENARIO_TIMEOUT_MS,
            viewport_width: 1280,
            viewport_height: 720,
            headless: true,
            chromium_path: None,
        }
    }
}

impl SiteConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from the environment, falling back to defaults.
    ///
    /// Recognized variables: `CARRITO_BASE_URL`, `CARRITO_USERNAME`,
    /// `CARRITO_PASSWORD`, `CARRITO_HEADFUL` (any value disables headless),
    /// `CHROMIUM_PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("CARRITO_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(user) = std::env::var("CARRITO_USERNAME") {
            config.username = user;
        }
        if let Ok(pass) = std::env::var("CARRITO_PASSWORD") {
            config.password = pass;
        }
        if std::env::var("CARRITO_HEADFUL").is_ok() {
            config.headless = false;
        }
        if let Ok(path) = std::env::var("CHROMIUM_PATH") {
            config.chromium_path = Some(path);
        }
        config
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the test-account credentials
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Set the per-action timeout
    #[must_use]
    pub const fn with_action_timeout(mut self, timeout_ms: u64) -> Self {
        self.action_timeout_ms = timeout_ms;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Resolve a site-relative path against the base URL
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Per-action timeout as a `Duration`
    #[must_use]
    pub const fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }

    /// Whole-scenario timeout as a `Duration`
    #[must_use]
    pub const fn scenario_timeout(&self) -> Duration {
        Duration::from_millis(self.scenario_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_live_site() {
        let config = SiteConfig::default();
        assert_eq!(config.base_url, "https://enotes.pointschool.ru");
        assert_eq!(config.username, "test");
        assert_eq!(config.action_timeout_ms, 35_000);
        assert!(config.headless);
    }

    #[test]
    fn test_builder_chain() {
        let config = SiteConfig::new()
            .with_base_url("http://localhost:8080/")
            .with_credentials("qa", "secret")
            .with_action_timeout(1_000)
            .with_viewport(800, 600)
            .with_headless(false);

        assert_eq!(config.base_url, "http://localhost:8080/");
        assert_eq!(config.username, "qa");
        assert_eq!(config.password, "secret");
        assert_eq!(config.action_timeout(), Duration::from_millis(1_000));
        assert_eq!(config.viewport_width, 800);
        assert!(!config.headless);
    }

    #[test]
    fn test_url_join_handles_slashes() {
        let config = SiteConfig::new().with_base_url("http://localhost:8080/");
        assert_eq!(config.url("/login"), "http://localhost:8080/login");
        assert_eq!(config.url("basket"), "http://localhost:8080/basket");
    }
}
