//! The storefront's DOM contract as immutable selector records.
//!
//! One selector dialect (CSS) for the whole suite. Records are constructed
//! once and injected into page objects, never shared as mutable state.

use crate::locator::Selector;

/// Selectors for the credentials form
#[derive(Debug, Clone)]
pub struct LoginSelectors {
    /// Username input
    pub username_input: Selector,
    /// Password input
    pub password_input: Selector,
    /// Submit button
    pub login_button: Selector,
}

impl Default for LoginSelectors {
    fn default() -> Self {
        Self {
            username_input: Selector::css("#loginform-username"),
            password_input: Selector::css("#loginform-password"),
            login_button: Selector::css("button[name='login-button']"),
        }
    }
}

/// Selectors for the product listing
#[derive(Debug, Clone)]
pub struct CatalogSelectors {
    /// Any product card
    pub product: Selector,
    /// Product card without a discount
    pub non_discounted_product: Selector,
    /// Product card with a discount marker
    pub discounted_product: Selector,
    /// Buy control inside a card
    pub buy_button: Selector,
    /// Name span inside a card
    pub product_name: Selector,
    /// Price span inside a card
    pub product_price: Selector,
    /// Available-stock span inside a card
    pub product_count: Selector,
    /// Quantity input inside a card
    pub quantity_input: Selector,
    /// Discount filter checkbox
    pub discount_filter: Selector,
    /// Pagination controls excluding the active page
    pub pagination_next: Selector,
    /// The currently active pagination control
    pub pagination_active: Selector,
}

impl Default for CatalogSelectors {
    fn default() -> Self {
        Self {
            product: Selector::css(".note-item.card"),
            non_discounted_product: Selector::css(".note-item.card:not(.hasDiscount)"),
            discounted_product: Selector::css(".note-item.card.hasDiscount"),
            buy_button: Selector::css(".actionBuyProduct"),
            product_name: Selector::css(".product_name"),
            product_price: Selector::css(".product_price"),
            product_count: Selector::css(".product_count"),
            quantity_input: Selector::css("input[name='product-enter-count']"),
            discount_filter: Selector::css("input[name='is-discount']"),
            pagination_next: Selector::css(".page-item:not(.active)"),
            pagination_active: Selector::css(".page-item.active"),
        }
    }
}

/// Selectors for the basket dropdown and basket page
#[derive(Debug, Clone)]
pub struct BasketSelectors {
    /// Basket dropdown toggle
    pub dropdown: Selector,
    /// The opened dropdown menu
    pub dropdown_menu: Selector,
    /// Item-count badge on the toggle
    pub count_badge: Selector,
    /// Link from the dropdown to the basket page
    pub go_to_basket: Selector,
    /// Clear-basket control
    pub clear_basket: Selector,
    /// A rendered basket line item
    pub item: Selector,
    /// Title span inside a line item
    pub item_title: Selector,
    /// Price span inside a line item
    pub item_price: Selector,
    /// Rendered basket total
    pub total_price: Selector,
}

impl Default for BasketSelectors {
    fn default() -> Self {
        Self {
            dropdown: Selector::css("#dropdownBasket"),
            dropdown_menu: Selector::css(".dropdown-menu-right.show"),
            count_badge: Selector::css(".basket-count-items"),
            go_to_basket: Selector::css("a.btn-primary[href*='/basket']"),
            clear_basket: Selector::css(".actionClearBasket a"),
            item: Selector::css(".basket-item"),
            item_title: Selector::css(".basket-item-title"),
            item_price: Selector::css(".basket-item-price"),
            total_price: Selector::css(".basket_price"),
        }
    }
}

/// The complete selector set for the storefront
#[derive(Debug, Clone, Default)]
pub struct StoreSelectors {
    /// Credentials form
    pub login: LoginSelectors,
    /// Product listing
    pub catalog: CatalogSelectors,
    /// Basket widgets
    pub basket: BasketSelectors,
}

impl StoreSelectors {
    /// Create the default selector set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_predicates_partition_cards() {
        let catalog = CatalogSelectors::default();
        assert_eq!(catalog.product.describe(), ".note-item.card");
        assert_eq!(
            catalog.discounted_product.describe(),
            ".note-item.card.hasDiscount"
        );
        assert_eq!(
            catalog.non_discounted_product.describe(),
            ".note-item.card:not(.hasDiscount)"
        );
    }

    #[test]
    fn test_pagination_controls_partition_on_active() {
        let catalog = CatalogSelectors::default();
        assert_eq!(catalog.pagination_next.describe(), ".page-item:not(.active)");
        assert_eq!(catalog.pagination_active.describe(), ".page-item.active");
    }

    #[test]
    fn test_records_clone_independently() {
        let a = StoreSelectors::new();
        let b = a.clone();
        assert_eq!(a.basket.dropdown, b.basket.dropdown);
    }
}
