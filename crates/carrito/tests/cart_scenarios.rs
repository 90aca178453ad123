//! Live end-to-end journeys against the storefront.
//!
//! These drive a real Chromium over CDP against the configured site
//! (default: the live enotes deployment). They are guarded by the
//! `CARRITO_LIVE` environment variable so `cargo test --features browser`
//! stays green on machines without network access or a browser install.
//!
//! Run with: `CARRITO_LIVE=1 cargo test --features browser --test cart_scenarios`

use carrito::{Browser, CartPage, LoginPage, SiteConfig};

fn live_config() -> Option<SiteConfig> {
    if std::env::var("CARRITO_LIVE").is_err() {
        eprintln!("skipping: set CARRITO_LIVE=1 to run live storefront scenarios");
        return None;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("carrito=debug")),
        )
        .try_init();
    Some(SiteConfig::from_env())
}

/// Launch, log in, and normalize the cart to empty.
async fn launch_session() -> Option<(Browser, CartPage)> {
    let config = live_config()?;

    let browser = Browser::launch(config.clone())
        .await
        .expect("Should launch browser");
    let page = browser.new_page().await.expect("Should open a page");

    let login = LoginPage::new(page.clone(), &config);
    login.open().await.expect("Should open the login form");
    login
        .login(&config.username, &config.password)
        .await
        .expect("Should log in with the test account");

    let mut cart = CartPage::new(page, &config);
    cart.manage_cart_state()
        .await
        .expect("Should normalize the cart to empty");

    Some((browser, cart))
}

/// Bound a journey by the configured whole-scenario timeout.
async fn within_scenario<F: std::future::Future<Output = ()>>(browser: &Browser, journey: F) {
    tokio::time::timeout(browser.config().scenario_timeout(), journey)
        .await
        .expect("Scenario should finish within the configured timeout");
}

#[tokio::test]
async fn empty_cart_opens_and_navigates_to_basket() {
    let Some((browser, cart)) = launch_session().await else {
        return;
    };

    within_scenario(&browser, async {
        cart.open_cart().await.expect("Should open the dropdown");
        cart.check_dropdown_visible()
            .await
            .expect("Dropdown menu should render");
        cart.go_to_cart().await.expect("Should follow the basket link");
        cart.verify_cart_url()
            .await
            .expect("Should land on the basket page");
    })
    .await;

    browser.close().await.ok();
}

#[tokio::test]
async fn one_non_discounted_product_reconciles() {
    let Some((browser, mut cart)) = launch_session().await else {
        return;
    };

    within_scenario(&browser, async {
        let product = cart
            .buy_first_non_discounted()
            .await
            .expect("Should buy a non-discounted product");
        assert!(!product.discounted, "card price carried a discount marker");
        assert_eq!(cart.session().len(), 1);
        assert_eq!(cart.session().expected_total(), product.price.amount);

        cart.check_cart_item_count(1)
            .await
            .expect("Badge should read 1");
        cart.open_cart().await.expect("Should open the dropdown");
        cart.verify_rendered_cart()
            .await
            .expect("Dropdown should match the recorded purchase");

        cart.go_to_cart().await.expect("Should follow the basket link");
        cart.verify_cart_url()
            .await
            .expect("Should land on the basket page");
        cart.verify_rendered_cart()
            .await
            .expect("Basket page should match the recorded purchase");
    })
    .await;

    browser.close().await.ok();
}

#[tokio::test]
async fn one_discounted_product_reconciles() {
    let Some((browser, mut cart)) = launch_session().await else {
        return;
    };

    within_scenario(&browser, async {
        cart.apply_discount_filter()
            .await
            .expect("Should filter to discounted products");
        let product = cart
            .buy_first_discounted()
            .await
            .expect("Should buy a discounted product");
        assert!(product.discounted, "card price lacked the discount marker");

        cart.check_cart_item_count(1)
            .await
            .expect("Badge should read 1");
        cart.open_cart().await.expect("Should open the dropdown");
        cart.verify_rendered_cart()
            .await
            .expect("Dropdown should match the recorded purchase");

        cart.go_to_cart().await.expect("Should follow the basket link");
        cart.verify_cart_url()
            .await
            .expect("Should land on the basket page");
        cart.verify_rendered_cart()
            .await
            .expect("Basket page should match the recorded purchase");
    })
    .await;

    browser.close().await.ok();
}

#[tokio::test]
async fn nine_distinct_products_reconcile() {
    let Some((browser, mut cart)) = launch_session().await else {
        return;
    };

    within_scenario(&browser, async {
        cart.apply_discount_filter()
            .await
            .expect("Should filter to discounted products");
        cart.buy_first_discounted()
            .await
            .expect("Should buy a discounted product");
        cart.check_cart_item_count(1)
            .await
            .expect("Badge should read 1");

        cart.remove_discount_filter()
            .await
            .expect("Should restore the full catalog");
        cart.buy_multiple_products(9)
            .await
            .expect("Should accumulate nine distinct products");
        assert_eq!(cart.session().len(), 9);

        cart.check_cart_item_count(9)
            .await
            .expect("Badge should read 9");
        cart.open_cart().await.expect("Should open the dropdown");
        cart.verify_rendered_cart()
            .await
            .expect("Dropdown should match all nine purchases");

        cart.go_to_cart().await.expect("Should follow the basket link");
        cart.verify_cart_url()
            .await
            .expect("Should land on the basket page");
        cart.verify_rendered_cart()
            .await
            .expect("Basket page should match all nine purchases");
    })
    .await;

    browser.close().await.ok();
}

#[tokio::test]
async fn nine_units_of_one_discounted_name_reconcile() {
    let Some((browser, mut cart)) = launch_session().await else {
        return;
    };

    within_scenario(&browser, async {
        cart.buy_discounted_with_quantity(9)
            .await
            .expect("Should accumulate nine discounted units");
        assert_eq!(cart.session().total_units(), 9);

        cart.check_cart_item_count(9)
            .await
            .expect("Badge should read 9");
        cart.open_cart().await.expect("Should open the dropdown");
        cart.verify_rendered_cart()
            .await
            .expect("Dropdown should match the bulk purchase");

        cart.go_to_cart().await.expect("Should follow the basket link");
        cart.verify_cart_url()
            .await
            .expect("Should land on the basket page");
        cart.verify_rendered_cart()
            .await
            .expect("Basket page should match the bulk purchase");
    })
    .await;

    browser.close().await.ok();
}
