//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use web_scraper::auth::{LoginDriver, SessionCookie};
use web_scraper::config::{load_config, CrawlConfig, LoginConfig};
use web_scraper::crawler::{run_crawl, Coordinator};
use web_scraper::output::file_name_for;
use web_scraper::ScraperError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a log-mode test configuration for the given seeds
fn create_test_config(seeds: Vec<String>, dir: &TempDir) -> CrawlConfig {
    let mut config = CrawlConfig::new(seeds);
    config.max_host_depth = Some(0);
    config.concurrency = 3;
    config.file_types = vec!["html".to_string(), "pdf".to_string()];
    config.url_log_file_path = Some(dir.path().join("urls.log"));
    config.cookie_folder = dir.path().join("cookies");
    config
}

/// 200 response with an HTML body
///
/// `set_body_raw` is required: `set_body_string` pins the content type to
/// `text/plain` regardless of any inserted header.
fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

fn redirect(location: String) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("location", location.as_str())
}

fn logged_urls(dir: &TempDir) -> Vec<String> {
    std::fs::read_to_string(dir.path().join("urls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Login driver that counts invocations and hands out a fixed session
#[derive(Default)]
struct CountingLogin {
    calls: AtomicUsize,
}

#[async_trait]
impl LoginDriver for CountingLogin {
    async fn login(
        &self,
        _login_url: &str,
        _login: &LoginConfig,
    ) -> Result<Vec<SessionCookie>, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![SessionCookie::new("session", "abc123")])
    }
}

fn login_config() -> LoginConfig {
    LoginConfig {
        login_url: None,
        username_selector: "#user".to_string(),
        username: "alice".to_string(),
        password_selector: "#pass".to_string(),
        password: "secret".to_string(),
        submit_selector: "button[type=submit]".to_string(),
    }
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html><body>
            <a href="/page1">Page 1</a>
            <a href="{}/page2">Page 2</a>
            <a href="mailto:someone@example.com">Mail</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(r#"<a href="/">Home</a><a href="/page2/">Two</a>"#.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html("<p>Content 2</p>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(vec![format!("{}/", base_url)], &dir);

    let summary = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.visited, 3);
    assert_eq!(summary.persisted, 3);
    assert_eq!(summary.failed, 0);
    assert!(summary.is_complete());

    let mut logged = logged_urls(&dir);
    logged.sort();
    assert_eq!(
        logged,
        vec![
            base_url.clone(),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url)
        ]
    );
}

#[tokio::test]
async fn test_cross_host_link_blocked_at_host_depth_zero() {
    let mock_server = MockServer::start().await;
    let port = mock_server.address().port();
    let base_url = format!("http://127.0.0.1:{}", port);

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(format!(
            r#"<a href="/b">B</a><a href="http://localhost:{}/c">C</a>"#,
            port
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html("<p>B</p>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Reached via "localhost", a different host than the seed
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(html("<p>C</p>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(vec![format!("{}/a", base_url)], &dir);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert_eq!(summary.visited, 2);
    assert!(!coordinator
        .frontier()
        .is_visited(&format!("http://localhost:{}/c", port)));
}

#[tokio::test]
async fn test_allowed_domain_overrides_host_depth() {
    let mock_server = MockServer::start().await;
    let port = mock_server.address().port();

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(format!(
            r#"<a href="http://localhost:{}/c">C</a>"#,
            port
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(html("<p>C</p>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(vec![format!("http://127.0.0.1:{}/a", port)], &dir);
    config.allowed_domains = vec!["localhost".to_string()];

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert_eq!(summary.visited, 2);
    assert!(coordinator
        .frontier()
        .is_visited(&format!("http://localhost:{}/c", port)));
}

#[tokio::test]
async fn test_cross_host_redirect_is_not_followed() {
    let mock_server = MockServer::start().await;
    let port = mock_server.address().port();
    let base_url = format!("http://127.0.0.1:{}", port);

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<a href="/b">B</a>"#.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(redirect(format!("http://localhost:{}/c", port)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(html(r#"<a href="/d">D</a>"#.to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(vec![format!("{}/a", base_url)], &dir);

    let summary = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.visited, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(logged_urls(&dir), vec![format!("{}/a", base_url)]);
}

#[tokio::test]
async fn test_same_host_redirect_resolves_links_against_target() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(redirect(format!("{}/docs/new", base_url)))
        .expect(1)
        .mount(&mock_server)
        .await;

    // "guide" is relative to /docs/new, not to /old
    Mock::given(method("GET"))
        .and(path("/docs/new"))
        .respond_with(html(r#"<a href="guide">Guide</a><a href="new">Self</a>"#.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/guide"))
        .respond_with(html("<p>guide</p>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(html("<p>wrong base</p>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(vec![format!("{}/old", base_url)], &dir);

    let summary = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.persisted, 2);
    assert_eq!(summary.failed, 0);

    let mut logged = logged_urls(&dir);
    logged.sort();
    assert_eq!(
        logged,
        vec![format!("{}/docs/guide", base_url), format!("{}/old", base_url)]
    );
}

#[tokio::test]
async fn test_zero_page_depth_fetches_only_seeds() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/level1">Level 1</a>"#.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level1"))
        .respond_with(html("<p>Level 1</p>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(vec![format!("{}/", base_url)], &dir);
    config.max_page_depth = Some(0);

    let summary = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.visited, 1);
    assert_eq!(summary.pending, 0);
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for (page, next) in [("/", "/level1"), ("/level1", "/level2"), ("/level2", "/level3")] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html(format!(r#"<a href="{}">next</a>"#, next)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(html("<p>Level 3</p>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(vec![format!("{}/", base_url)], &dir);
    config.max_page_depth = Some(2);

    let summary = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.visited, 3);
    assert_eq!(logged_urls(&dir).len(), 3);
}

#[tokio::test]
async fn test_protected_crawl_logs_in_once_per_host() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(header("cookie", "session=abc123"))
        .respond_with(html("<p>members only</p>".to_string()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(
        vec![format!("{}/one", base_url), format!("{}/two", base_url)],
        &dir,
    );
    config.protected = true;
    config.login_config = Some(login_config());

    let driver = Arc::new(CountingLogin::default());
    let mut coordinator = Coordinator::with_login_driver(config, driver.clone())
        .expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert_eq!(driver.calls.load(Ordering::SeqCst), 1);
    assert_eq!(summary.persisted, 2);

    let cookie_file = dir.path().join("cookies").join("127.0.0.1.txt");
    let saved: Vec<SessionCookie> =
        serde_json::from_str(&std::fs::read_to_string(cookie_file).unwrap()).unwrap();
    assert_eq!(saved, vec![SessionCookie::new("session", "abc123")]);
}

#[tokio::test]
async fn test_protected_crawl_reuses_persisted_cookies() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(header("cookie", "sid=persisted"))
        .respond_with(html("<p>members only</p>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let cookie_folder = dir.path().join("cookies");
    std::fs::create_dir_all(&cookie_folder).unwrap();
    std::fs::write(
        cookie_folder.join("127.0.0.1.txt"),
        r#"[{"name":"sid","value":"persisted"}]"#,
    )
    .unwrap();

    let mut config = create_test_config(vec![format!("{}/", base_url)], &dir);
    config.protected = true;
    config.login_config = Some(login_config());

    let driver = Arc::new(CountingLogin::default());
    let mut coordinator = Coordinator::with_login_driver(config, driver.clone())
        .expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert_eq!(driver.calls.load(Ordering::SeqCst), 0);
    assert_eq!(summary.persisted, 1);
}

#[tokio::test]
async fn test_http_error_is_visited_but_not_persisted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(vec![format!("{}/missing", base_url)], &dir);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert_eq!(summary.visited, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.persisted, 0);
    assert!(logged_urls(&dir).is_empty());
}

#[tokio::test]
async fn test_save_mode_writes_exact_bytes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let pdf_bytes: Vec<u8> = b"%PDF-1.4\n\x00\x01\x02 binary body".to_vec();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/report.pdf">Report</a>"#.to_string()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(pdf_bytes.clone(), "application/pdf"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("downloads");
    let mut config = create_test_config(vec![format!("{}/", base_url)], &dir);
    config.download_files = true;
    config.output_folder = Some(output.clone());
    config.url_log_file_path = None;

    let summary = run_crawl(config).await.expect("Crawl failed");
    assert_eq!(summary.persisted, 2);

    let pdf_url = format!("{}/report.pdf", base_url);
    let saved = std::fs::read(output.join(file_name_for(&pdf_url, "application/pdf"))).unwrap();
    assert_eq!(saved, pdf_bytes);

    let index = output.join(file_name_for(&base_url, "text/html"));
    assert!(index.exists());
}

#[tokio::test]
async fn test_content_type_filtering() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/image.png">Image</a><a href="/paper.pdf">Paper</a>"#.to_string(),
        ))
        .mount(&mock_server)
        .await;

    // Rejected media type: fetched, nothing persisted, links never extracted
    Mock::given(method("GET"))
        .and(path("/image.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/hidden">not html</a>"#, "image/png"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html("<p>hidden</p>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    // Accepted but not HTML: persisted, never parsed for links
    Mock::given(method("GET"))
        .and(path("/paper.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/hidden">inside pdf</a>"#, "application/pdf"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(vec![format!("{}/", base_url)], &dir);

    let summary = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.visited, 3);
    assert_eq!(summary.failed, 1);

    let logged = logged_urls(&dir);
    assert!(logged.contains(&format!("{}/paper.pdf", base_url)));
    assert!(!logged.contains(&format!("{}/image.png", base_url)));
}

#[tokio::test]
async fn test_crawl_from_json_config_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>hello</p>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("found.log");
    let config_path = dir.path().join("crawl.json");
    let json = serde_json::json!({
        "startUrls": [format!("{}/", base_url)],
        "maxHostDepth": 0,
        "concurrency": 2,
        "fileTypes": ["html"],
        "urlLogFilePath": log_path,
    });
    std::fs::write(&config_path, json.to_string()).unwrap();

    let config = load_config(&config_path).expect("Failed to load config");
    let summary = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.persisted, 1);
    let logged = std::fs::read_to_string(log_path).unwrap();
    assert_eq!(logged, format!("{}\n", base_url));
}

#[tokio::test]
async fn test_invalid_config_aborts_before_fetching() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("<p>never</p>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(vec![format!("{}/", mock_server.uri())], &dir);
    config.concurrency = 0;

    let result = run_crawl(config).await;
    assert!(matches!(result, Err(ScraperError::Config(_))));
}
