//! Cart reconciliation: recorded session against rendered basket state.
//!
//! Pure functions so every reconciliation rule is testable without a
//! browser. The page objects feed these with scraped DOM text.

use crate::price::{digits_only, is_discounted_rendering, PriceToken};
use crate::result::{CarritoError, CarritoResult};
use crate::session::{CartSession, RecordedPurchase};

/// A basket line as scraped from the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// Line-item title text
    pub title: String,
    /// Line-item price text, possibly carrying the discount marker
    pub price_text: String,
}

impl RenderedLine {
    /// Create a rendered line from scraped text
    #[must_use]
    pub fn new(title: impl Into<String>, price_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price_text: price_text.into(),
        }
    }
}

/// Check one basket line against the i-th recorded purchase.
///
/// Name must match exactly (whitespace-trimmed). Price follows the discount
/// policy: a discounted record requires the `-<number> р.` rendering and an
/// equal numeric token once the marker is stripped; a non-discounted record
/// requires the token verbatim after stripping any stray leading marker.
pub fn verify_line(
    index: usize,
    rendered: &RenderedLine,
    expected: &RecordedPurchase,
) -> CarritoResult<()> {
    let title = rendered.title.trim();
    if title != expected.name {
        return Err(CarritoError::CartMismatch {
            index,
            message: format!("name {title:?}, recorded {:?}", expected.name),
        });
    }

    let price_text = rendered.price_text.trim();
    if expected.price.discounted {
        if !is_discounted_rendering(price_text) {
            return Err(CarritoError::CartMismatch {
                index,
                message: format!("price {price_text:?} lacks the discount marker"),
            });
        }
        let rendered_price = PriceToken::parse(price_text)?;
        if rendered_price.token() != expected.price.token() {
            return Err(CarritoError::CartMismatch {
                index,
                message: format!(
                    "discounted price {}, recorded {}",
                    rendered_price.token(),
                    expected.price.token()
                ),
            });
        }
    } else {
        let cleaned = price_text.trim_start_matches('-').trim();
        if cleaned != expected.price.token() {
            return Err(CarritoError::CartMismatch {
                index,
                message: format!("price {cleaned:?}, recorded {:?}", expected.price.token()),
            });
        }
    }

    Ok(())
}

/// Check every basket line against the session, in order.
///
/// Line count and session length must agree; a shorter rendering means the
/// site dropped an item, a longer one means a leftover from a prior run.
pub fn verify_lines(rendered: &[RenderedLine], session: &CartSession) -> CarritoResult<()> {
    if rendered.len() != session.len() {
        return Err(CarritoError::CartMismatch {
            index: rendered.len().min(session.len()),
            message: format!(
                "basket renders {} lines, session recorded {}",
                rendered.len(),
                session.len()
            ),
        });
    }
    for (index, (line, expected)) in rendered.iter().zip(session.records()).enumerate() {
        verify_line(index, line, expected)?;
    }
    Ok(())
}

/// Check the rendered basket total against the session arithmetic.
pub fn verify_total(total_text: &str, session: &CartSession) -> CarritoResult<()> {
    let actual = digits_only(total_text).ok_or_else(|| CarritoError::PriceParse {
        text: total_text.to_string(),
    })?;
    let expected = session.expected_total();
    if actual != expected {
        return Err(CarritoError::TotalMismatch { expected, actual });
    }
    Ok(())
}

/// Full reconciliation: every line plus the total.
pub fn verify_cart(
    rendered: &[RenderedLine],
    total_text: &str,
    session: &CartSession,
) -> CarritoResult<()> {
    verify_lines(rendered, session)?;
    verify_total(total_text, session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Product;

    fn session_with(entries: &[(&str, u64, bool, u32)]) -> CartSession {
        let mut session = CartSession::new();
        for (name, amount, discounted, quantity) in entries {
            session.record(
                &Product {
                    name: (*name).to_string(),
                    price: PriceToken {
                        amount: *amount,
                        discounted: *discounted,
                    },
                    discounted: *discounted,
                    available_quantity: 0,
                },
                *quantity,
            );
        }
        session
    }

    mod line_tests {
        use super::*;

        #[test]
        fn test_matching_non_discounted_line() {
            let session = session_with(&[("Блокнот", 150, false, 1)]);
            let line = RenderedLine::new("Блокнот", "150 р.");
            assert!(verify_line(0, &line, &session.records()[0]).is_ok());
        }

        #[test]
        fn test_non_discounted_tolerates_stray_marker() {
            // The basket page occasionally renders a leading "-" on plain items
            let session = session_with(&[("Блокнот", 150, false, 1)]);
            let line = RenderedLine::new("Блокнот", "- 150 р.");
            assert!(verify_line(0, &line, &session.records()[0]).is_ok());
        }

        #[test]
        fn test_discounted_line_requires_marker() {
            let session = session_with(&[("Щипчики", 340, true, 1)]);

            let with_marker = RenderedLine::new("Щипчики", "-340 р.");
            assert!(verify_line(0, &with_marker, &session.records()[0]).is_ok());

            let without = RenderedLine::new("Щипчики", "340 р.");
            let err = verify_line(0, &without, &session.records()[0]).unwrap_err();
            assert!(matches!(err, CarritoError::CartMismatch { index: 0, .. }));
        }

        #[test]
        fn test_name_mismatch() {
            let session = session_with(&[("Щипчики", 340, true, 1)]);
            let line = RenderedLine::new("Ножницы", "-340 р.");
            assert!(verify_line(0, &line, &session.records()[0]).is_err());
        }

        #[test]
        fn test_discounted_amount_mismatch() {
            let session = session_with(&[("Щипчики", 340, true, 1)]);
            let line = RenderedLine::new("Щипчики", "-341 р.");
            assert!(verify_line(0, &line, &session.records()[0]).is_err());
        }
    }

    mod full_cart_tests {
        use super::*;

        #[test]
        fn test_order_must_align() {
            let session = session_with(&[("A", 10, false, 1), ("B", 20, false, 1)]);
            let swapped = vec![
                RenderedLine::new("B", "20 р."),
                RenderedLine::new("A", "10 р."),
            ];
            assert!(verify_lines(&swapped, &session).is_err());

            let aligned = vec![
                RenderedLine::new("A", "10 р."),
                RenderedLine::new("B", "20 р."),
            ];
            assert!(verify_lines(&aligned, &session).is_ok());
        }

        #[test]
        fn test_line_count_mismatch() {
            let session = session_with(&[("A", 10, false, 1)]);
            let err = verify_lines(&[], &session).unwrap_err();
            assert!(matches!(err, CarritoError::CartMismatch { .. }));
        }

        #[test]
        fn test_total_reconciliation_mixed_cart() {
            let session = session_with(&[("A", 100, false, 1), ("B", 340, true, 1)]);
            assert!(verify_total("Итого: 440 р.", &session).is_ok());
            assert!(matches!(
                verify_total("Итого: 439 р.", &session),
                Err(CarritoError::TotalMismatch {
                    expected: 440,
                    actual: 439
                })
            ));
        }

        #[test]
        fn test_total_multiplies_bulk_quantities() {
            // 5 units at 58 plus 4 units at 40: two rows, nine units
            let session = session_with(&[("Ручка", 58, true, 5), ("Карандаш", 40, true, 4)]);
            assert!(verify_total("450 р.", &session).is_ok());
            assert_eq!(session.total_units(), 9);
        }

        #[test]
        fn test_cleared_topup_does_not_misalign_verification() {
            // A buy made while normalizing the cart to empty, then cleared
            // remotely, must not shift every later line check by one.
            let lines = vec![RenderedLine::new("Щипчики", "-340 р.")];

            let stale = session_with(&[("Блокнот", 150, false, 1), ("Щипчики", 340, true, 1)]);
            assert!(matches!(
                verify_lines(&lines, &stale).unwrap_err(),
                CarritoError::CartMismatch { index: 1, .. }
            ));

            let mut session = session_with(&[("Блокнот", 150, false, 1)]);
            session.clear();
            session.record(
                &Product {
                    name: "Щипчики".to_string(),
                    price: PriceToken {
                        amount: 340,
                        discounted: true,
                    },
                    discounted: true,
                    available_quantity: 0,
                },
                1,
            );
            assert!(verify_lines(&lines, &session).is_ok());
        }

        #[test]
        fn test_verify_cart_single_item() {
            let session = session_with(&[("Гостевая книга", 120, false, 1)]);
            let lines = vec![RenderedLine::new("Гостевая книга", "120 р.")];
            assert!(verify_cart(&lines, "120 р.", &session).is_ok());
        }

        #[test]
        fn test_unparseable_total() {
            let session = session_with(&[("A", 10, false, 1)]);
            assert!(matches!(
                verify_total("р.", &session),
                Err(CarritoError::PriceParse { .. })
            ));
        }
    }
}
