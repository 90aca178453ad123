//! Page objects for the storefront.
//!
//! Each page object owns a clone of the driver page plus the immutable
//! selector records it scripts against. State that must survive a scenario
//! (the recorded cart session) lives on the page object, created fresh per
//! test.

mod cart;
mod login;

pub use cart::CartPage;
pub use login::LoginPage;
