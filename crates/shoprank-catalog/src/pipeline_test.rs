use serde_json::json;
use shoprank_core::NaverCredentials;
use shoprank_scraper::{NaverClient, UpstreamClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn seeded(registry: Registry) -> AggregationPipeline {
    AggregationPipeline::new(
        registry,
        PipelineSettings {
            inter_request_delay: Duration::ZERO,
            synthetic_seed: Some(2024),
        },
    )
}

fn request(platform: Platform) -> PipelineRequest {
    PipelineRequest {
        platform,
        category: None,
        sort: SortKey::Rank,
        offset: 0,
        count: 100,
        query: None,
        mode: FallbackMode::Lenient,
    }
}

fn record(rank: u32, review_count: u32, rating: f64, price: u64) -> ProductRecord {
    ProductRecord {
        rank,
        title: format!("상품 {rank}"),
        price,
        original_price: price,
        discount_rate: 0,
        image: String::new(),
        link: String::new(),
        mall_name: "테스트몰".into(),
        category: Category::Food,
        platform: Platform::Gmarket,
        rating,
        review_count,
        brand: None,
        product_id: None,
        delivery_info: None,
        free_shipping: None,
        is_rocket: None,
        vendor_name: None,
    }
}

async fn naver_registry(server: &MockServer) -> Registry {
    let client = NaverClient::with_base_url(
        NaverCredentials {
            client_id: "id".into(),
            client_secret: "secret".into(),
        },
        &server.uri(),
        5,
        "shoprank-test/0.1",
    )
    .expect("failed to build test NaverClient");
    let mut registry = Registry::synthetic_only();
    registry.set_upstream(Platform::Naver, Upstream::Ready(UpstreamClient::Naver(client)));
    registry
}

#[test]
fn popularity_weighs_reviews_by_rating() {
    let mut records = vec![record(1, 50, 5.0, 1_000), record(2, 100, 4.0, 1_000)];
    sort_records(&mut records, SortKey::Popularity);
    assert_eq!(records[0].review_count, 100);
}

#[test]
fn sorting_is_stable_for_ties() {
    let mut records = vec![
        record(1, 10, 4.5, 3_000),
        record(2, 10, 4.5, 1_000),
        record(3, 10, 4.5, 3_000),
    ];
    sort_records(&mut records, SortKey::Rating);
    let ranks: Vec<u32> = records.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);

    sort_records(&mut records, SortKey::PriceDesc);
    let ranks: Vec<u32> = records.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 3, 2]);
}

#[test]
fn recency_keeps_source_order() {
    let mut records = vec![record(1, 1, 1.0, 9), record(2, 9, 5.0, 1)];
    sort_records(&mut records, SortKey::Recency);
    assert_eq!(records[0].rank, 1);
}

#[tokio::test]
async fn synthetic_run_fills_window_with_contiguous_ranks() {
    let pipeline = seeded(Registry::synthetic_only());
    let mut req = request(Platform::Gmarket);
    req.offset = 20;
    req.count = 30;

    let out = pipeline.run(&req).await.unwrap();

    assert_eq!(out.total, 100);
    assert_eq!(out.products.len(), 30);
    let ranks: Vec<u32> = out.products.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, (21..=50).collect::<Vec<_>>());
    assert_eq!(out.source, DataSource::Synthetic);
    assert!(out.notes.iter().any(|n| n.contains("no live integration")));
    assert!(out.products.iter().all(ProductRecord::is_consistent));
}

#[tokio::test]
async fn window_past_catalog_size_grows_the_catalog() {
    let pipeline = seeded(Registry::synthetic_only());
    let mut req = request(Platform::Naver);
    req.offset = 250;
    req.count = 10;

    let out = pipeline.run(&req).await.unwrap();

    assert_eq!(out.total, 260);
    assert_eq!(out.products.first().map(|r| r.rank), Some(251));
    assert_eq!(out.products.len(), 10);
}

#[tokio::test]
async fn category_filter_reports_filtered_total() {
    let pipeline = seeded(Registry::synthetic_only());
    let mut req = request(Platform::Naver);
    req.category = Some(Category::Beauty);
    req.count = 200;

    let out = pipeline.run(&req).await.unwrap();

    assert!(out.total > 0 && out.total < 200, "total = {}", out.total);
    assert_eq!(out.products.len(), out.total);
    assert!(out.products.iter().all(|r| r.category == Category::Beauty));
    assert_eq!(out.products.first().map(|r| r.rank), Some(1));
}

#[tokio::test]
async fn offset_beyond_total_yields_empty_window() {
    let pipeline = seeded(Registry::synthetic_only());
    let mut req = request(Platform::Lotte);
    req.category = Some(Category::Food);
    req.offset = 90;
    req.count = 10;

    let out = pipeline.run(&req).await.unwrap();

    assert!(out.products.is_empty());
    assert!(out.total < 90);
}

#[tokio::test]
async fn price_sort_orders_the_window() {
    let pipeline = seeded(Registry::synthetic_only());
    let mut req = request(Platform::Coupang);
    req.sort = SortKey::PriceAsc;

    let out = pipeline.run(&req).await.unwrap();

    assert!(out.products.windows(2).all(|w| w[0].price <= w[1].price));
    assert_eq!(out.products[0].rank, 1);
}

#[tokio::test]
async fn strict_mode_refuses_unconfigured_integration() {
    let pipeline = seeded(Registry::synthetic_only());
    let mut req = request(Platform::Coupang);
    req.mode = FallbackMode::Strict;

    let err = pipeline.run(&req).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Unavailable {
            platform: "coupang",
            ..
        }
    ));
}

#[tokio::test]
async fn strict_mode_still_serves_synthetic_only_platforms() {
    let pipeline = seeded(Registry::synthetic_only());
    let mut req = request(Platform::Elevenst);
    req.mode = FallbackMode::Strict;

    let out = pipeline.run(&req).await.unwrap();
    assert_eq!(out.products.len(), 100);
}

#[tokio::test]
async fn upstream_failure_falls_back_to_synthetic_with_note() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search/shop.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let pipeline = seeded(naver_registry(&server).await);
    let mut req = request(Platform::Naver);
    req.mode = FallbackMode::Strict;

    let out = pipeline.run(&req).await.unwrap();

    assert_eq!(out.products.len(), 100);
    assert_eq!(out.source, DataSource::Synthetic);
    assert!(out.notes.iter().any(|n| n.contains("live search failed")));
}

#[tokio::test]
async fn partial_live_results_are_padded_and_ranked_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search/shop.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "items": [
                {"title": "<b>라이브</b> 상품 A", "lprice": "15000", "hprice": "20000",
                 "productId": "A", "link": "https://search.shopping.naver.com/catalog/A"},
                {"title": "라이브 상품 B", "lprice": "9900", "hprice": "",
                 "productId": "B", "link": "https://search.shopping.naver.com/catalog/B"}
            ]
        })))
        .mount(&server)
        .await;

    let pipeline = seeded(naver_registry(&server).await);
    let mut req = request(Platform::Naver);
    req.query = Some("라이브".into());
    req.count = 5;

    let out = pipeline.run(&req).await.unwrap();

    assert_eq!(out.source, DataSource::Mixed);
    assert_eq!(out.total, 200);
    assert_eq!(out.products[0].title, "라이브 상품 A");
    assert_eq!(out.products[0].discount_rate, 25);
    assert_eq!(out.products[1].product_id.as_deref(), Some("B"));
    assert_eq!(out.products[2].rank, 3);
    assert!(out.notes.iter().any(|n| n.contains("returned 2 live items")));
}

fn naver_page(first: u32, len: u32) -> serde_json::Value {
    let items: Vec<_> = (first..first + len)
        .map(|id| {
            json!({
                "title": format!("라이브 {id}"),
                "lprice": "12000",
                "hprice": "",
                "productId": id.to_string(),
                "link": format!("https://search.shopping.naver.com/catalog/{id}")
            })
        })
        .collect();
    json!({ "total": 1000, "items": items })
}

async fn mount_naver_page(server: &MockServer, start: u32, body: serde_json::Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/search/shop.json"))
        .and(query_param("start", start.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn deep_window_is_served_from_later_live_pages() {
    let server = MockServer::start().await;
    mount_naver_page(&server, 1, naver_page(1, 100), 1).await;
    mount_naver_page(&server, 101, naver_page(101, 100), 1).await;
    mount_naver_page(&server, 201, naver_page(201, 100), 0).await;

    let pipeline = seeded(naver_registry(&server).await);
    let mut req = request(Platform::Naver);
    req.query = Some("q".into());
    req.offset = 100;
    req.count = 50;

    let out = pipeline.run(&req).await.unwrap();

    assert_eq!(out.source, DataSource::Live);
    assert_eq!(out.products.len(), 50);
    assert_eq!(out.products[0].title, "라이브 101");
    assert_eq!(out.products[0].rank, 101);
    assert_eq!(out.products[49].product_id.as_deref(), Some("150"));
    assert!(!out.notes.iter().any(|n| n.contains("live items")));
}

#[tokio::test]
async fn source_describes_the_returned_window() {
    let server = MockServer::start().await;
    mount_naver_page(&server, 1, naver_page(1, 3), 2).await;

    let pipeline = seeded(naver_registry(&server).await);
    let mut req = request(Platform::Naver);
    req.query = Some("q".into());

    req.count = 3;
    let head = pipeline.run(&req).await.unwrap();
    assert_eq!(head.source, DataSource::Live);

    req.offset = 50;
    req.count = 10;
    let tail = pipeline.run(&req).await.unwrap();
    assert_eq!(tail.source, DataSource::Synthetic);
    assert!(tail.notes.iter().any(|n| n.contains("returned 3 live items")));
}

#[tokio::test]
async fn run_all_interleaves_platforms_by_rank() {
    let pipeline = seeded(Registry::synthetic_only());
    let mut req = request(Platform::Naver);
    req.count = 16;

    let out = pipeline.run_all(&req).await.unwrap();

    let first_round: Vec<Platform> = out.products.iter().take(8).map(|r| r.platform).collect();
    assert_eq!(first_round, Platform::ALL.to_vec());
    let ranks: Vec<u32> = out.products.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, (1..=16).collect::<Vec<_>>());
    assert_eq!(out.total, 200 + 200 + 6 * 100);
}

#[tokio::test]
async fn run_all_strict_skips_unconfigured_platforms() {
    let pipeline = seeded(Registry::synthetic_only());
    let mut req = request(Platform::Naver);
    req.mode = FallbackMode::Strict;

    let out = pipeline.run_all(&req).await.unwrap();

    assert!(out
        .products
        .iter()
        .all(|r| r.platform != Platform::Naver && r.platform != Platform::Coupang));
    assert!(out.notes.iter().any(|n| n.contains("skipped")));
}
