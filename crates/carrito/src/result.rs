//! Result and error types for Carrito.

use thiserror::Error;

/// Result type for Carrito operations
pub type CarritoResult<T> = Result<T, CarritoError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum CarritoError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Element not present in the DOM when an action needed it
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector that matched nothing
        selector: String,
    },

    /// Operation timed out
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// What was being waited for
        waited_for: String,
    },

    /// Login precondition violated: the submit control stayed disabled
    #[error("Login button is disabled after filling credentials")]
    LoginDisabled,

    /// Pagination ran out before a required product was found
    #[error("Catalog exhausted: no more pages while looking for {looking_for}")]
    CatalogExhausted {
        /// Description of the product predicate
        looking_for: String,
    },

    /// A rendered basket line or total disagrees with the recorded session
    #[error("Cart mismatch at line {index}: {message}")]
    CartMismatch {
        /// Basket line index (0-based)
        index: usize,
        /// Description of the disagreement
        message: String,
    },

    /// The rendered basket total disagrees with the session arithmetic
    #[error("Total mismatch: expected {expected}, basket shows {actual}")]
    TotalMismatch {
        /// Sum over the recorded session
        expected: u64,
        /// Numeric value of the rendered total
        actual: u64,
    },

    /// A DOM text fragment did not parse as a price token
    #[error("Unparseable price text: {text:?}")]
    PriceParse {
        /// The offending text
        text: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CarritoError {
    /// Shorthand for a page-level driver failure
    pub fn page(message: impl Into<String>) -> Self {
        Self::Page {
            message: message.into(),
        }
    }
}
