//! Per-test cart bookkeeping.
//!
//! A `CartSession` records every purchase a scenario makes, in click order,
//! so the verifier can reconcile it against the basket rendering. Names are
//! unique within a run: re-encountering an already-recorded product is a
//! skip, not a second row. Name and price live in the same record, so the
//! 1:1 ordering invariant between them cannot be broken by construction.

use crate::price::PriceToken;

/// A product as read off its catalog card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Product name, unique within a cart run
    pub name: String,
    /// Price token at time of purchase
    pub price: PriceToken,
    /// Whether the card carried the discount marker
    pub discounted: bool,
    /// Available stock (meaningful for discounted bulk items)
    pub available_quantity: u32,
}

/// One recorded purchase transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPurchase {
    /// Product name
    pub name: String,
    /// Unit price token
    pub price: PriceToken,
    /// Units bought in this transaction
    pub quantity: u32,
}

/// Insertion-ordered record of everything a scenario added to the cart
#[derive(Debug, Clone, Default)]
pub struct CartSession {
    records: Vec<RecordedPurchase>,
}

impl CartSession {
    /// Create an empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a purchase of `quantity` units.
    ///
    /// Returns `false` (recording skipped) when the product name is already
    /// in the session.
    pub fn record(&mut self, product: &Product, quantity: u32) -> bool {
        if self.contains(&product.name) {
            return false;
        }
        self.records.push(RecordedPurchase {
            name: product.name.trim().to_string(),
            price: product.price.clone(),
            quantity,
        });
        true
    }

    /// Drop every recorded purchase, restarting the session.
    ///
    /// Used after cart normalization: a top-up buy made while emptying the
    /// remote basket must not count against the scenario's own purchases.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Whether a product name has already been recorded
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim();
        self.records.iter().any(|r| r.name == name)
    }

    /// Number of distinct recorded products
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total units across all transactions
    #[must_use]
    pub fn total_units(&self) -> u32 {
        self.records.iter().map(|r| r.quantity).sum()
    }

    /// The recorded purchases, in click order
    #[must_use]
    pub fn records(&self) -> &[RecordedPurchase] {
        &self.records
    }

    /// Expected basket total: sum of unit amount times quantity
    #[must_use]
    pub fn expected_total(&self) -> u64 {
        self.records
            .iter()
            .map(|r| r.price.amount * u64::from(r.quantity))
            .sum()
    }
}
