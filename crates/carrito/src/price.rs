//! Price tokens as the storefront renders them.
//!
//! Prices appear as an integer followed by `р.`, optionally prefixed with a
//! minus sign on discounted renderings ("-123 р."). Catalog cards may show
//! the old price struck through after the token; only the first numeric token
//! counts.

use crate::result::{CarritoError, CarritoResult};
use regex::Regex;
use std::sync::OnceLock;

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*р\.").expect("static regex"))
}

fn discount_render_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-\s*\d+\s*р\.").expect("static regex"))
}

/// A parsed price token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceToken {
    /// Numeric amount in rubles
    pub amount: u64,
    /// Whether the source text carried a discount marker
    pub discounted: bool,
}

impl PriceToken {
    /// Parse the first price token out of rendered text.
    ///
    /// # Errors
    ///
    /// Returns `PriceParse` if the text contains no token or the number
    /// overflows.
    pub fn parse(text: &str) -> CarritoResult<Self> {
        let trimmed = text.trim();
        let captures = token_re()
            .captures(trimmed)
            .ok_or_else(|| CarritoError::PriceParse {
                text: text.to_string(),
            })?;
        let digits = &captures[1];
        let amount = digits.parse().map_err(|_| CarritoError::PriceParse {
            text: text.to_string(),
        })?;
        // The marker precedes the number, so only look at the prefix
        let number_start = captures.get(1).map_or(0, |m| m.start());
        let discounted = trimmed[..number_start].contains('-');
        Ok(Self { amount, discounted })
    }

    /// Canonical token form with the marker stripped, e.g. `"123 р."`
    #[must_use]
    pub fn token(&self) -> String {
        format!("{} р.", self.amount)
    }

    /// Rendered form including the discount marker when present
    #[must_use]
    pub fn rendered(&self) -> String {
        if self.discounted {
            format!("-{} р.", self.amount)
        } else {
            self.token()
        }
    }
}

impl std::fmt::Display for PriceToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rendered())
    }
}

/// Whether rendered text matches the discounted rendering (`-<number> р.`)
#[must_use]
pub fn is_discounted_rendering(text: &str) -> bool {
    discount_render_re().is_match(text.trim())
}

/// Numeric value of text after stripping every non-digit character.
///
/// This is how the basket total is reconciled: the total line carries
/// currency and whitespace noise around the number.
#[must_use]
pub fn digits_only(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}
