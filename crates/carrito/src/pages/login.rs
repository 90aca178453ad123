//! Credentials-form page object.

use crate::browser::StorePage;
use crate::config::SiteConfig;
use crate::result::{CarritoError, CarritoResult};
use crate::selectors::LoginSelectors;
use tracing::info;

/// Page object for the login form
#[derive(Debug)]
pub struct LoginPage {
    page: StorePage,
    selectors: LoginSelectors,
    login_url: String,
}

impl LoginPage {
    /// Create a login page object for the configured site
    #[must_use]
    pub fn new(page: StorePage, config: &SiteConfig) -> Self {
        Self {
            page,
            selectors: LoginSelectors::default(),
            login_url: config.url("/login"),
        }
    }

    /// Navigate to the login form
    pub async fn open(&self) -> CarritoResult<()> {
        self.page.goto(&self.login_url).await?;
        self.page
            .wait_for_selector(&self.selectors.login_button)
            .await
    }

    /// Submit credentials.
    ///
    /// # Errors
    ///
    /// Returns `LoginDisabled` when the submit control stays disabled after
    /// both fields are filled. That is a precondition violation, not a
    /// retry case.
    pub async fn login(&self, username: &str, password: &str) -> CarritoResult<()> {
        self.page
            .fill(&self.selectors.username_input, username)
            .await?;
        self.page
            .fill(&self.selectors.password_input, password)
            .await?;

        if !self.page.is_enabled(&self.selectors.login_button).await? {
            return Err(CarritoError::LoginDisabled);
        }

        info!(username, "submitting credentials");
        self.page.click(&self.selectors.login_button).await
    }
}
