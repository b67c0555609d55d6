//! End-to-end pipeline tests against mocked providers and career pages

use crate::{create_test_config, create_test_fetcher};
use hiring_radar::config::Config;
use hiring_radar::{Pipeline, RunReport, Source};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_pipeline(config: &Config, targets: &[&str]) -> RunReport {
    let pipeline = Pipeline::with_fetcher(config, create_test_fetcher(config));
    pipeline.run(targets).await
}

async fn mount_greenhouse_board(server: &MockServer, slug: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/boards/{}/jobs", slug)))
        .and(query_param("content", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn career_page_html() -> &'static str {
    r#"<html><body>
        <nav><a href="/about">About us</a></nav>
        <ul>
            <li><a href="/jobs/1">  Data
                Engineer </a></li>
            <li><a href="/jobs/2"></a></li>
        </ul>
    </body></html>"#
}

#[tokio::test]
async fn test_greenhouse_board_end_to_end() {
    let server = MockServer::start().await;
    mount_greenhouse_board(
        &server,
        "acme",
        json!({"jobs":[{
            "title":"Backend Engineer",
            "absolute_url":"https://x.io/1",
            "location":{"name":"Remote"},
            "updated_at":"2024-03-01T00:00:00Z"
        }]}),
    )
    .await;

    let config = create_test_config(&server.uri());
    let report = run_pipeline(&config, &["https://boards.greenhouse.io/acme"]).await;

    let records: Vec<Value> = report
        .records
        .iter()
        .map(|r| serde_json::to_value(r).unwrap())
        .collect();

    assert_eq!(
        records,
        vec![json!({
            "title": "Backend Engineer",
            "department": "Engineering",
            "location": "Remote",
            "date": "2024-03-01",
            "url": "https://x.io/1",
            "source": "greenhouse",
            "company": "Acme"
        })]
    );
    assert_eq!(report.stats.targets, 1);
    assert_eq!(report.stats.records_accepted, 1);
}

#[tokio::test]
async fn test_per_site_cap() {
    let server = MockServer::start().await;
    let jobs: Vec<Value> = (0..600)
        .map(|i| {
            json!({
                "title": format!("Engineer {}", i),
                "absolute_url": format!("https://x.io/{}", i)
            })
        })
        .collect();
    mount_greenhouse_board(&server, "acme", json!({ "jobs": jobs })).await;

    let config = create_test_config(&server.uri());
    assert_eq!(config.output.max_per_site, 500);

    let report = run_pipeline(&config, &["https://job-boards.greenhouse.io/acme"]).await;

    assert_eq!(report.records.len(), 500);
    assert_eq!(report.records[0].title.as_deref(), Some("Engineer 0"));
    assert_eq!(report.records[499].title.as_deref(), Some("Engineer 499"));
    assert_eq!(report.stats.listings_extracted, 600);
    assert_eq!(report.stats.listings_capped, 100);
}

#[tokio::test]
async fn test_invalid_records_are_dropped() {
    let server = MockServer::start().await;
    mount_greenhouse_board(
        &server,
        "acme",
        json!({"jobs":[
            {"title":"Designer","absolute_url":"https://x.io/1"},
            {"title":"No Link"},
            {"title":"Relative","absolute_url":"/jobs/3"},
            {"absolute_url":"https://x.io/4"},
            "not an object"
        ]}),
    )
    .await;

    let config = create_test_config(&server.uri());
    let report = run_pipeline(&config, &["https://boards.greenhouse.io/acme"]).await;

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].title.as_deref(), Some("Designer"));
    assert_eq!(report.stats.listings_extracted, 5);
    assert_eq!(report.stats.records_rejected, 4);
}

#[tokio::test]
async fn test_empty_board_is_not_a_failure() {
    let server = MockServer::start().await;
    mount_greenhouse_board(&server, "acme", json!({"meta": {"total": 0}})).await;

    let config = create_test_config(&server.uri());
    let report = run_pipeline(&config, &["https://boards.greenhouse.io/acme"]).await;

    assert!(report.records.is_empty());
    assert_eq!(report.stats.empty_targets, 1);
    assert_eq!(report.stats.extraction_failures, 0);
}

#[tokio::test]
async fn test_lever_falls_back_to_legacy_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/postings/acme"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/legacy/v0/postings/acme"))
        .and(query_param("mode", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "text": "Account Executive",
            "hostedUrl": "https://jobs.lever.co/acme/1",
            "categories": {"location": "NYC", "team": "Sales"},
            "createdAt": 1709251200000i64
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let report = run_pipeline(&config, &["https://jobs.lever.co/acme"]).await;

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.title.as_deref(), Some("Account Executive"));
    assert_eq!(record.department.as_deref(), Some("Sales"));
    assert_eq!(record.location.as_deref(), Some("NYC"));
    assert_eq!(record.date.as_deref(), Some("2024-03-01"));
    assert_eq!(record.company.as_deref(), Some("Acme"));
    assert_eq!(record.source, Source::Lever);
}

#[tokio::test]
async fn test_failing_target_does_not_stop_others() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/postings/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/legacy/v0/postings/broken"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_greenhouse_board(
        &server,
        "acme",
        json!({"jobs":[{"title":"Designer","absolute_url":"https://x.io/1"}]}),
    )
    .await;

    let config = create_test_config(&server.uri());
    let report = run_pipeline(
        &config,
        &[
            "https://jobs.lever.co/broken",
            "https://boards.greenhouse.io/acme",
        ],
    )
    .await;

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].source, Source::Greenhouse);
    assert_eq!(report.stats.extraction_failures, 1);
}

#[tokio::test]
async fn test_malformed_payload_is_a_target_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/boards/acme/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let report = run_pipeline(&config, &["https://boards.greenhouse.io/acme"]).await;

    assert!(report.records.is_empty());
    assert_eq!(report.stats.extraction_failures, 1);
}

#[tokio::test]
async fn test_skipped_targets_are_counted() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri());

    let report = run_pipeline(
        &config,
        &[
            "https://boards.greenhouse.io/",
            "not a url",
            "ftp://acme.io/jobs",
        ],
    )
    .await;

    assert!(report.records.is_empty());
    assert_eq!(report.stats.targets, 3);
    assert_eq!(report.stats.skipped_missing_slug, 1);
    assert_eq!(report.stats.skipped_non_matching, 2);
}

#[tokio::test]
async fn test_career_page_allowed_by_robots() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /\n").await;
    Mock::given(method("GET"))
        .and(path("/careers"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(career_page_html()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let target = format!("{}/careers", server.uri());
    let report = run_pipeline(&config, &[target.as_str()]).await;

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].title.as_deref(), Some("Data Engineer"));
    assert_eq!(
        report.records[0].url.as_deref(),
        Some(format!("{}/jobs/1", server.uri()).as_str())
    );
    assert_eq!(report.records[0].department.as_deref(), Some("Engineering"));
    assert_eq!(report.records[1].title.as_deref(), Some("Job"));
    assert!(report.records.iter().all(|r| r.source == Source::Unknown));
}

#[tokio::test]
async fn test_career_page_denied_by_robots() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /careers\n").await;
    Mock::given(method("GET"))
        .and(path("/careers"))
        .respond_with(ResponseTemplate::new(200).set_body_string(career_page_html()))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let target = format!("{}/careers", server.uri());
    let report = run_pipeline(&config, &[target.as_str()]).await;

    assert!(report.records.is_empty());
    assert_eq!(report.stats.robots_denied, 1);
}

#[tokio::test]
async fn test_unavailable_robots_denies_career_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/careers"))
        .respond_with(ResponseTemplate::new(200).set_body_string(career_page_html()))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let target = format!("{}/careers", server.uri());
    let report = run_pipeline(&config, &[target.as_str()]).await;

    assert!(report.records.is_empty());
    assert_eq!(report.stats.robots_denied, 1);
}

#[tokio::test]
async fn test_provider_targets_skip_robots() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"))
        .expect(0)
        .mount(&server)
        .await;
    mount_greenhouse_board(
        &server,
        "acme",
        json!({"jobs":[{"title":"Designer","absolute_url":"https://x.io/1"}]}),
    )
    .await;

    let config = create_test_config(&server.uri());
    let report = run_pipeline(&config, &["https://boards.greenhouse.io/acme"]).await;

    assert_eq!(report.records.len(), 1);
}

#[tokio::test]
async fn test_crawl_delay_is_honored() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nCrawl-delay: 0.3\nAllow: /\n").await;
    Mock::given(method("GET"))
        .and(path("/careers"))
        .respond_with(ResponseTemplate::new(200).set_body_string(career_page_html()))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let target = format!("{}/careers", server.uri());

    let start = Instant::now();
    let report = run_pipeline(&config, &[target.as_str()]).await;

    assert!(start.elapsed() >= Duration::from_millis(300));
    assert_eq!(report.records.len(), 2);
}

#[tokio::test]
async fn test_concurrent_hosts_keep_input_order() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /\n").await;
    Mock::given(method("GET"))
        .and(path("/careers"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<a href="/jobs/9">Recruiter</a>"#),
        )
        .mount(&server)
        .await;
    mount_greenhouse_board(
        &server,
        "alpha",
        json!({"jobs":[{"title":"Alpha Role","absolute_url":"https://x.io/a"}]}),
    )
    .await;
    mount_greenhouse_board(
        &server,
        "beta",
        json!({"jobs":[{"title":"Beta Role","absolute_url":"https://x.io/b"}]}),
    )
    .await;

    let mut config = create_test_config(&server.uri());
    config.fetcher.max_concurrent_hosts = 4;

    let page = format!("{}/careers", server.uri());
    let report = run_pipeline(
        &config,
        &[
            "https://boards.greenhouse.io/alpha",
            page.as_str(),
            "https://boards.greenhouse.io/beta",
        ],
    )
    .await;

    let titles: Vec<&str> = report
        .records
        .iter()
        .filter_map(|r| r.title.as_deref())
        .collect();
    assert_eq!(titles, vec!["Alpha Role", "Recruiter", "Beta Role"]);
}

async fn mount_slow_board(server: &MockServer, slug: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/boards/{}/jobs", slug)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"jobs":[{"title":"Designer","absolute_url":"https://x.io/1"}]}))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_board_hosts_sharing_an_api_host_run_sequentially() {
    let server = MockServer::start().await;
    mount_slow_board(&server, "a", Duration::from_millis(600)).await;
    mount_slow_board(&server, "b", Duration::from_millis(600)).await;

    let mut config = create_test_config(&server.uri());
    config.fetcher.max_concurrent_hosts = 2;

    let start = Instant::now();
    let report = run_pipeline(
        &config,
        &[
            "https://boards.greenhouse.io/a",
            "https://job-boards.greenhouse.io/b",
        ],
    )
    .await;

    assert_eq!(report.records.len(), 2);
    assert!(start.elapsed() >= Duration::from_millis(1200));
}

#[tokio::test]
async fn test_politeness_delay_is_kept_per_request_host() {
    let server = MockServer::start().await;
    mount_slow_board(&server, "a", Duration::ZERO).await;
    mount_slow_board(&server, "b", Duration::ZERO).await;

    let mut config = create_test_config(&server.uri());
    config.fetcher.max_concurrent_hosts = 4;
    config.fetcher.politeness_delay_ms = 300;

    let start = Instant::now();
    run_pipeline(
        &config,
        &[
            "https://boards.greenhouse.io/a",
            "https://job-boards.greenhouse.io/b",
        ],
    )
    .await;

    assert!(start.elapsed() >= Duration::from_millis(600));
}

#[tokio::test]
async fn test_distinct_request_hosts_run_concurrently() {
    let api = MockServer::start().await;
    mount_slow_board(&api, "acme", Duration::from_millis(800)).await;

    let site = MockServer::start().await;
    mount_robots(&site, "User-agent: *\nAllow: /\n").await;
    Mock::given(method("GET"))
        .and(path("/careers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(career_page_html())
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&site)
        .await;

    let mut config = create_test_config(&api.uri());
    config.fetcher.max_concurrent_hosts = 2;

    let page = format!("{}/careers", site.uri());
    let start = Instant::now();
    let report = run_pipeline(&config, &["https://boards.greenhouse.io/acme", page.as_str()]).await;

    assert_eq!(report.records.len(), 3);
    assert!(start.elapsed() < Duration::from_millis(1500));
}

async fn mount_redirect(from: &MockServer, to: &MockServer) {
    mount_robots(from, "User-agent: *\nAllow: /\n").await;
    Mock::given(method("GET"))
        .and(path("/careers"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/careers", to.uri()).as_str()),
        )
        .mount(from)
        .await;
    Mock::given(method("GET"))
        .and(path("/careers"))
        .respond_with(ResponseTemplate::new(200).set_body_string(career_page_html()))
        .mount(to)
        .await;
}

#[tokio::test]
async fn test_cross_origin_redirect_checks_target_robots() {
    let old_site = MockServer::start().await;
    let new_site = MockServer::start().await;
    mount_redirect(&old_site, &new_site).await;
    mount_robots(&new_site, "User-agent: *\nDisallow: /careers\n").await;

    let config = create_test_config(&old_site.uri());
    let target = format!("{}/careers", old_site.uri());
    let report = run_pipeline(&config, &[target.as_str()]).await;

    assert!(report.records.is_empty());
    assert_eq!(report.stats.robots_denied, 1);
    assert_eq!(report.stats.extraction_failures, 0);
}

#[tokio::test]
async fn test_cross_origin_redirect_allowed_resolves_against_final_page() {
    let old_site = MockServer::start().await;
    let new_site = MockServer::start().await;
    mount_redirect(&old_site, &new_site).await;
    mount_robots(&new_site, "User-agent: *\nAllow: /\n").await;

    let config = create_test_config(&old_site.uri());
    let target = format!("{}/careers", old_site.uri());
    let report = run_pipeline(&config, &[target.as_str()]).await;

    assert_eq!(report.records.len(), 2);
    assert_eq!(
        report.records[0].url.as_deref(),
        Some(format!("{}/jobs/1", new_site.uri()).as_str())
    );
}
