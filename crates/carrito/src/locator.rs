//! Selector abstraction and JS query generation.
//!
//! All DOM access in this suite goes through JavaScript evaluated over CDP,
//! so every selector must render to a query expression. The storefront's
//! DOM contract is a single CSS dialect.

/// CSS selector for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector(String);

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    /// The raw selector text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable form for error messages
    #[must_use]
    pub fn describe(&self) -> String {
        self.0.clone()
    }

    /// JS expression evaluating to the first matching element (or null)
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("document.querySelector({:?})", self.0)
    }

    /// JS expression evaluating to an array of all matching elements
    #[must_use]
    pub fn to_array_query(&self) -> String {
        format!("Array.from(document.querySelectorAll({:?}))", self.0)
    }

    /// JS expression evaluating to the number of matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("document.querySelectorAll({:?}).length", self.0)
    }

    /// JS expression evaluating to the trimmed inner text of the first match
    /// (or null when absent)
    #[must_use]
    pub fn to_text_query(&self) -> String {
        format!(
            "(() => {{ const el = {}; return el ? el.innerText.trim() : null; }})()",
            self.to_query()
        )
    }

    /// JS expression evaluating to whether the first match is enabled
    /// (false when absent or disabled)
    #[must_use]
    pub fn to_enabled_query(&self) -> String {
        format!(
            "(() => {{ const el = {}; return !!el && !el.disabled; }})()",
            self.to_query()
        )
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
