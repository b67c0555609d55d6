//! Fetcher behavior against a live mock server: retry, identity, redirects

use crate::{create_test_config, create_test_fetcher};
use hiring_radar::fetch::FetchKind;
use hiring_radar::FetchError;
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_retries_transient_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let fetcher = create_test_fetcher(&config);

    let page = fetcher
        .fetch(&format!("{}/flaky", server.uri()), FetchKind::Json)
        .await
        .unwrap();

    assert_eq!(page.status_code, 200);
    assert_eq!(page.body, "{}");
}

#[tokio::test]
async fn test_gives_up_after_max_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let fetcher = create_test_fetcher(&config);

    let err = fetcher
        .fetch(&format!("{}/down", server.uri()), FetchKind::Json)
        .await
        .unwrap_err();

    match err {
        FetchError::Exhausted {
            attempts, source, ..
        } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*source, FetchError::Status { status: 500, .. }));
        }
        other => panic!("Expected Exhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_failure_is_exhausted() {
    let config = create_test_config("http://127.0.0.1:1");
    let fetcher = create_test_fetcher(&config);

    let err = fetcher
        .fetch("http://127.0.0.1:1/jobs", FetchKind::Html)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Exhausted { attempts: 3, .. }));
}

#[tokio::test]
async fn test_rejects_non_http_urls_without_a_request() {
    let config = create_test_config("http://127.0.0.1:1");
    let fetcher = create_test_fetcher(&config);

    let err = fetcher
        .fetch("file:///etc/passwd", FetchKind::Html)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl { .. }));

    let err = fetcher.fetch("not a url", FetchKind::Json).await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl { .. }));
}

#[tokio::test]
async fn test_identity_depends_on_request_kind() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri());
    let api = config.user_agent.api_identity();
    let browser = config.user_agent.browser_identity();

    Mock::given(method("GET"))
        .and(path("/api"))
        .and(header("user-agent", api.as_str()))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", browser.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = create_test_fetcher(&config);
    fetcher
        .fetch(&format!("{}/api", server.uri()), FetchKind::Json)
        .await
        .unwrap();
    fetcher
        .fetch(&format!("{}/page", server.uri()), FetchKind::Html)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_follows_redirects_and_reports_final_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old-careers"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", "/careers"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/careers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let fetcher = create_test_fetcher(&config);

    let page = fetcher
        .fetch(&format!("{}/old-careers", server.uri()), FetchKind::Html)
        .await
        .unwrap();

    assert_eq!(page.final_url, format!("{}/careers", server.uri()));
    assert_eq!(page.body, "ok");
}

#[tokio::test]
async fn test_redirect_limit_is_not_retried() {
    let server = MockServer::start().await;

    for (from, to) in [("/a", "/b"), ("/b", "/c"), ("/c", "/d")] {
        Mock::given(method("GET"))
            .and(path(from))
            .respond_with(ResponseTemplate::new(302).insert_header("location", to))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/d"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.fetcher.max_redirects = 1;
    let fetcher = create_test_fetcher(&config);

    let err = fetcher
        .fetch(&format!("{}/a", server.uri()), FetchKind::Html)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Redirect { .. }));
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.iter().filter(|r| r.url.path() == "/a").count(), 1);
}

#[tokio::test]
async fn test_politeness_pause_after_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.fetcher.politeness_delay_ms = 200;
    let fetcher = create_test_fetcher(&config);

    let start = Instant::now();
    fetcher
        .fetch(&format!("{}/page", server.uri()), FetchKind::Html)
        .await
        .unwrap();

    assert!(start.elapsed() >= Duration::from_millis(200));
}
