//! Tier precedence and normalization, driven through `scrape_single`

mod common;

use common::{FakeBackend, listing_html, product_json_ld, test_config};
use kodegen_tools_listingscrape::{ItemStatus, ProductRecord, ScrapeConfig, scrape_single};

const URL: &str = "https://jp.mercari.com/item/m99511546897";

const PRICE_META: &str = r#"<meta name="product:price:amount" content="9999">"#;
const DOM_PRICE: &str = r#"<div class="item-price-box"><span data-testid="price">¥3,480</span></div>"#;

async fn extract_html(html: String) -> ProductRecord {
    extract_with(&test_config(), html).await
}

async fn extract_with(config: &ScrapeConfig, html: String) -> ProductRecord {
    let backend = FakeBackend::new().with_html(URL, html);
    let record = scrape_single(&backend, config, URL)
        .await
        .expect("single extraction should not fail at batch level");
    assert!(record.error.is_none(), "unexpected failure: {:?}", record.error);
    record
}

#[tokio::test]
async fn structured_price_wins_over_meta_and_dom() {
    let html = listing_html(
        &[&product_json_ld("Film camera", "3,480", "https://schema.org/InStock")],
        PRICE_META,
        DOM_PRICE,
    );

    let record = extract_html(html).await;
    assert_eq!(record.price, "3480");
    assert_eq!(record.title, "Film camera");
    assert_eq!(record.description, "Film camera in good condition");
    assert_eq!(
        record.first_image,
        "https://static.mercdn.net/item/detail/orig/photos/m1_1.jpg"
    );
}

#[tokio::test]
async fn meta_price_used_without_structured_data() {
    let record = extract_html(listing_html(&[], PRICE_META, DOM_PRICE)).await;
    assert_eq!(record.price, "9999");
}

#[tokio::test]
async fn dom_price_is_stripped_to_digits() {
    let record = extract_html(listing_html(&[], "", DOM_PRICE)).await;
    assert_eq!(record.price, "3480");
}

#[tokio::test]
async fn class_name_price_pattern_is_last_resort() {
    let body = r#"<span class="ItemPrice__price">¥12,000</span>"#;
    let record = extract_html(listing_html(&[], "", body)).await;
    assert_eq!(record.price, "12000");
}

#[tokio::test]
async fn missing_price_is_empty_string() {
    let record = extract_html(listing_html(&[], "", "<h1>Nothing for sale</h1>")).await;
    assert_eq!(record.price, "");
    assert_eq!(record.title, "Nothing for sale");

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["price"], "");
    assert!(json["sellerName"].is_null());
}

#[tokio::test]
async fn digitless_structured_price_falls_through_to_meta() {
    let html = listing_html(
        &[&product_json_ld("Lens", "free", "https://schema.org/InStock")],
        PRICE_META,
        "",
    );
    let record = extract_html(html).await;
    assert_eq!(record.price, "9999");
}

#[tokio::test]
async fn malformed_block_is_skipped() {
    let html = listing_html(
        &[
            "{ this is not json",
            &product_json_ld("Tripod", "2500", "https://schema.org/SoldOut"),
        ],
        "",
        "",
    );
    let record = extract_html(html).await;
    assert_eq!(record.title, "Tripod");
    assert_eq!(record.price, "2500");
    assert_eq!(record.item_status, Some(ItemStatus::SoldOut));
}

#[tokio::test]
async fn non_product_blocks_are_ignored() {
    let breadcrumb = r#"{"@context":"https://schema.org","@type":"BreadcrumbList","name":"Home"}"#;
    let html = listing_html(&[breadcrumb], "", "<h1>  Vintage watch  </h1>");
    let record = extract_html(html).await;
    assert_eq!(record.title, "Vintage watch");
}

#[tokio::test]
async fn image_falls_back_to_og_image_then_asset_host() {
    let og = r#"<meta property="og:image" content="/static/og/m1.jpg">"#;
    let record = extract_html(listing_html(&[], og, "")).await;
    assert_eq!(record.first_image, "https://jp.mercari.com/static/og/m1.jpg");

    let body = r#"
        <img src="https://ads.example/banner.png">
        <img src="https://static.mercdn.net/item/detail/orig/photos/m9_1.jpg">
    "#;
    let record = extract_html(listing_html(&[], "", body)).await;
    assert_eq!(
        record.first_image,
        "https://static.mercdn.net/item/detail/orig/photos/m9_1.jpg"
    );
}

#[tokio::test]
async fn description_falls_back_to_meta() {
    let head = r#"<meta name="description" content=" Barely used. ">"#;
    let record = extract_html(listing_html(&[], head, "")).await;
    assert_eq!(record.description, "Barely used.");
}

#[tokio::test]
async fn availability_is_classified() {
    let sold = listing_html(
        &[&product_json_ld("A", "1", "https://schema.org/SoldOut")],
        "",
        "",
    );
    assert_eq!(extract_html(sold).await.item_status, Some(ItemStatus::SoldOut));

    let in_stock = listing_html(
        &[&product_json_ld("B", "1", "https://schema.org/InStock")],
        "",
        "",
    );
    assert_eq!(
        extract_html(in_stock).await.item_status,
        Some(ItemStatus::Available)
    );

    let unknown = listing_html(
        &[&product_json_ld("C", "1", "https://schema.org/PreOrder")],
        "",
        "",
    );
    assert_eq!(extract_html(unknown).await.item_status, Some(ItemStatus::Unknown));
}

#[tokio::test]
async fn absent_availability_uses_configured_default() {
    let html = listing_html(&[], "", "<h1>No offers</h1>");

    assert_eq!(
        extract_html(html.clone()).await.item_status,
        Some(ItemStatus::Unknown)
    );

    let config = ScrapeConfig::builder()
        .endpoint(common::TEST_ENDPOINT)
        .navigation_timeout_secs(1)
        .default_item_status(ItemStatus::Available)
        .build()
        .unwrap();
    assert_eq!(
        extract_with(&config, html).await.item_status,
        Some(ItemStatus::Available)
    );
}

#[tokio::test]
async fn seller_identity_comes_from_offers() {
    let html = listing_html(
        &[&product_json_ld("Camera", "100", "https://schema.org/InStock")],
        "",
        "",
    );
    let record = extract_html(html).await;
    assert_eq!(record.seller_name.as_deref(), Some("camera_shop"));
    assert_eq!(record.seller_id.as_deref(), Some("seller-42"));
}

#[tokio::test]
async fn graph_wrapped_product_with_top_level_seller() {
    let block = r#"{
        "@context": "https://schema.org",
        "@graph": [
            {"@type": "WebPage", "name": "page"},
            {
                "@type": ["Product", "Thing"],
                "name": "Mirrorless body",
                "image": "https://static.mercdn.net/item/m5.jpg",
                "offers": [{"@type": "Offer", "price": 54000, "availability": "InStock"}],
                "seller": {"name": "lens_house", "@id": "u-7"}
            }
        ]
    }"#;
    let record = extract_html(listing_html(&[block], "", "")).await;
    assert_eq!(record.title, "Mirrorless body");
    assert_eq!(record.price, "54000");
    assert_eq!(record.first_image, "https://static.mercdn.net/item/m5.jpg");
    assert_eq!(record.item_status, Some(ItemStatus::Available));
    assert_eq!(record.seller_name.as_deref(), Some("lens_house"));
    assert_eq!(record.seller_id.as_deref(), Some("u-7"));
}
