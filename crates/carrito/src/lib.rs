//! Carrito: end-to-end shopping-cart test suite for the enotes storefront.
//!
//! Page objects over a CDP (Chrome DevTools Protocol) driver script the
//! user journeys (login, browse, add-to-cart) and reconcile the recorded
//! purchases against the rendered basket state and price arithmetic.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     CARRITO Architecture                        │
//! ├────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌─────────────┐    ┌────────────┐          │
//! │   │ Scenarios  │    │ Page        │    │ Headless   │          │
//! │   │ (tests/)   │───►│ Objects     │───►│ Browser    │          │
//! │   │            │    │ + Session   │    │ (chromium) │          │
//! │   └────────────┘    └─────────────┘    └────────────┘          │
//! │                           │                                     │
//! │                     ┌─────┴─────┐                               │
//! │                     │ verify /  │   pure, browser-free          │
//! │                     │ price     │   reconciliation rules        │
//! │                     └───────────┘                               │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pure domain (selectors, price tokens, session bookkeeping, cart
//! reconciliation) compiles without default features; enable `browser` for
//! real CDP control and the live scenarios.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Driver adapter over chromiumoxide
#[cfg(feature = "browser")]
pub mod browser;
/// Site configuration with environment overrides
pub mod config;
/// Selector abstraction and JS query generation
pub mod locator;
/// URL matching for network-response confirmation
pub mod network;
/// Page objects for the storefront
#[cfg(feature = "browser")]
pub mod pages;
/// Price tokens as the storefront renders them
pub mod price;
/// Result and error types
pub mod result;
/// The storefront's DOM contract
pub mod selectors;
/// Per-test cart bookkeeping
pub mod session;
/// Cart reconciliation rules
pub mod verify;
/// Wait policy for driver synchronization
pub mod wait;

#[cfg(feature = "browser")]
pub use browser::{Browser, ResponseWatcher, StorePage};
pub use config::SiteConfig;
pub use locator::Selector;
pub use network::{BasketEndpoints, UrlPattern};
#[cfg(feature = "browser")]
pub use pages::{CartPage, LoginPage};
pub use price::PriceToken;
pub use result::{CarritoError, CarritoResult};
pub use selectors::{BasketSelectors, CatalogSelectors, LoginSelectors, StoreSelectors};
pub use session::{CartSession, Product, RecordedPurchase};
pub use verify::{verify_cart, verify_line, verify_lines, verify_total, RenderedLine};
pub use wait::WaitOptions;
