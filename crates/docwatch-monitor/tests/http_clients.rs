//! Integration tests for the HTTP-backed collaborators.
//!
//! Uses `wiremock` to stand up a local server per test so no real network
//! traffic is made. Covers the primary page source (headers, retries, error
//! mapping), the direct status endpoint fallback (AJAX headers, single
//! attempt), the translation client, and the webhook notifier.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use docwatch_monitor::{
    FallbackFetcher, HttpFallbackFetcher, HttpPageSource, HttpTranslator, MonitorError, Notifier,
    PageSource, Translator, WebhookNotifier,
};

const TEST_UA: &str = "docwatch-test/0.1";

/// Primary source with retries disabled; retry behavior gets its own tests.
fn page_source(base: &str) -> HttpPageSource {
    HttpPageSource::new(base, 5, TEST_UA, 0, 0).expect("failed to build HttpPageSource")
}

fn fallback_fetcher(base: &str) -> HttpFallbackFetcher {
    HttpFallbackFetcher::new(base, "/Home/CurrentSessionStatus", 5, TEST_UA)
        .expect("failed to build HttpFallbackFetcher")
}

// ---------------------------------------------------------------------------
// Primary page source
// ---------------------------------------------------------------------------

#[tokio::test]
async fn page_source_fetches_body_with_session_id_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("sessionId", "1320864"))
        .and(header("user-agent", TEST_UA))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Status page</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let source = page_source(&server.uri());
    let body = source.fetch_page("1320864").await.expect("fetch failed");
    assert_eq!(body, b"<html>Status page</html>");
}

#[tokio::test]
async fn page_source_maps_http_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = page_source(&server.uri())
        .fetch_page("1320864")
        .await
        .unwrap_err();
    assert!(
        matches!(err, MonitorError::UnexpectedStatus { status: 403, .. }),
        "expected UnexpectedStatus 403, got: {err:?}"
    );
}

#[tokio::test]
async fn page_source_retries_server_errors_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    // Zero-second backoff base keeps the test fast.
    let source =
        HttpPageSource::new(&server.uri(), 5, TEST_UA, 2, 0).expect("failed to build source");
    let body = source.fetch_page("1320864").await.expect("fetch failed");
    assert_eq!(body, b"<html>ok</html>");
}

#[tokio::test]
async fn page_source_does_not_retry_client_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let source =
        HttpPageSource::new(&server.uri(), 5, TEST_UA, 3, 0).expect("failed to build source");
    let err = source.fetch_page("1320864").await.unwrap_err();
    assert!(matches!(
        err,
        MonitorError::UnexpectedStatus { status: 404, .. }
    ));
}

// ---------------------------------------------------------------------------
// Direct status endpoint fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fallback_calls_status_endpoint_with_ajax_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Home/CurrentSessionStatus"))
        .and(query_param("sessionId", "1320864"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Документ видано 2024-03-15"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fallback_fetcher(&server.uri());
    let body = fetcher.fetch_direct("1320864").await.expect("fetch failed");
    assert_eq!(body, "Документ видано 2024-03-15".as_bytes());
}

#[tokio::test]
async fn fallback_makes_a_single_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Home/CurrentSessionStatus"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = fallback_fetcher(&server.uri())
        .fetch_direct("1320864")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MonitorError::UnexpectedStatus { status: 500, .. }
    ));
}

// ---------------------------------------------------------------------------
// Translation client
// ---------------------------------------------------------------------------

fn translator(base: &str) -> HttpTranslator {
    HttpTranslator::new(&format!("{base}/translate_a/single"), "uk", "en", 5)
        .expect("failed to build HttpTranslator")
}

#[tokio::test]
async fn translator_joins_translated_segments() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("client", "gtx"))
        .and(query_param("sl", "uk"))
        .and(query_param("tl", "en"))
        .and(query_param("q", "Документ видано\n2024-03-15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!([
            [
                ["Document issued\n", "Документ видано\n", null],
                ["2024-03-15", "2024-03-15", null]
            ],
            null,
            "uk"
        ])))
        .mount(&server)
        .await;

    let text = translator(&server.uri())
        .translate("Документ видано\n2024-03-15")
        .await
        .expect("translation failed");
    assert_eq!(text, "Document issued\n2024-03-15");
}

#[tokio::test]
async fn translator_rejects_unexpected_payload_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"error": "quota"})))
        .mount(&server)
        .await;

    let err = translator(&server.uri())
        .translate("Документ видано")
        .await
        .unwrap_err();
    assert!(matches!(err, MonitorError::Translate { .. }));
}

#[tokio::test]
async fn translator_skips_the_network_for_blank_input() {
    // No mock server at all; a request would fail to connect.
    let t = HttpTranslator::new("http://127.0.0.1:9/translate_a/single", "uk", "en", 1)
        .expect("failed to build HttpTranslator");
    assert_eq!(t.translate("   ").await.unwrap(), "   ");
}

// ---------------------------------------------------------------------------
// Webhook notifier
// ---------------------------------------------------------------------------

#[tokio::test]
async fn webhook_posts_status_and_change_flag() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(json!({
            "status": "Status\tDate\nDocument issued\t2024-03-15",
            "changed": true,
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let notifier =
        WebhookNotifier::new(&format!("{}/hook", server.uri()), 5).expect("failed to build");
    notifier
        .notify("Status\tDate\nDocument issued\t2024-03-15", true)
        .await
        .expect("notify failed");
}

#[tokio::test]
async fn webhook_reports_non_success_responses() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let notifier =
        WebhookNotifier::new(&format!("{}/hook", server.uri()), 5).expect("failed to build");
    let err = notifier.notify("status", false).await.unwrap_err();
    assert!(matches!(err, MonitorError::Notify { .. }));
}
