//! Integration tests for `ImageProxy::fetch` against a wiremock server.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shoprank_scraper::{ImageProxy, ProxyError, MAX_IMAGE_BYTES};

fn local_proxy() -> ImageProxy {
    ImageProxy::new(vec!["127.0.0.1".into()], 5, "shoprank-test/0.1")
        .expect("failed to build test ImageProxy")
}

#[tokio::test]
async fn fetch_relays_bytes_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/thumb.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(vec![0x89, b'P', b'N', b'G']),
        )
        .mount(&server)
        .await;

    let image = local_proxy()
        .fetch(&format!("{}/thumb.png", server.uri()))
        .await
        .expect("fetch should succeed");

    assert_eq!(image.content_type, "image/png");
    assert_eq!(image.bytes, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn fetch_defaults_content_type_to_jpeg() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/raw"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .mount(&server)
        .await;

    let image = local_proxy()
        .fetch(&format!("{}/raw", server.uri()))
        .await
        .unwrap();
    assert_eq!(image.content_type, "image/jpeg");
}

#[tokio::test]
async fn fetch_passes_through_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = local_proxy()
        .fetch(&format!("{}/missing.jpg", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::UpstreamStatus { status: 404 }), "got: {err:?}");
}

#[tokio::test]
async fn fetch_rejects_oversized_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/huge.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; MAX_IMAGE_BYTES + 1]))
        .mount(&server)
        .await;

    let err = local_proxy()
        .fetch(&format!("{}/huge.jpg", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::TooLarge { .. }), "got: {err:?}");
}

#[tokio::test]
async fn fetch_refuses_hosts_outside_allow_list() {
    let proxy = ImageProxy::new(vec!["pstatic.net".into()], 5, "test").unwrap();
    let err = proxy.fetch("http://127.0.0.1:1/a.jpg").await.unwrap_err();
    assert!(matches!(err, ProxyError::ForbiddenHost(_)));
}

#[tokio::test]
async fn fetch_refuses_redirects_off_the_allow_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/moved.jpg"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "https://tracker.example.net/p.gif"),
        )
        .mount(&server)
        .await;

    let err = local_proxy()
        .fetch(&format!("{}/moved.jpg", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(&err, ProxyError::ForbiddenHost(host) if host == "tracker.example.net"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_follows_redirects_that_stay_on_the_allow_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old.jpg"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new.jpg"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(vec![0xFF, 0xD8]),
        )
        .mount(&server)
        .await;

    let image = local_proxy()
        .fetch(&format!("{}/old.jpg", server.uri()))
        .await
        .expect("redirect within the allow-list should be followed");
    assert_eq!(image.bytes, vec![0xFF, 0xD8]);
}
