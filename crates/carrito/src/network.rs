//! URL matching for network-response confirmation.
//!
//! Cart clearing on the storefront is only observable through the network:
//! the suite waits for both `/basket/clear` and `/basket/get` to come back
//! 200 before trusting the DOM again.

/// Exact-match pattern for response URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPattern {
    url: String,
}

impl UrlPattern {
    /// Pattern matching exactly one URL
    #[must_use]
    pub fn exact(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        url == self.url
    }
}

/// The basket endpoints whose 200s confirm a completed clear
#[derive(Debug, Clone)]
pub struct BasketEndpoints {
    /// Clear-basket endpoint
    pub clear: UrlPattern,
    /// Get-basket endpoint
    pub get: UrlPattern,
}

impl BasketEndpoints {
    /// Endpoints for a given base URL
    #[must_use]
    pub fn for_base(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            clear: UrlPattern::exact(format!("{base}/basket/clear")),
            get: UrlPattern::exact(format!("{base}/basket/get")),
        }
    }

    /// Both patterns, in confirmation order
    #[must_use]
    pub fn all(&self) -> [&UrlPattern; 2] {
        [&self.clear, &self.get]
    }
}
