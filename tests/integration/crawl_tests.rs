//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use mailsift::config::{Config, RobotsMode};
use mailsift::crawler::{crawl, Coordinator};
use mailsift::output::{load_recipients, MemorySink};
use mailsift::state::{FailureReason, SkipReason};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing addresses below `dir`
fn create_test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.delay = 0.0;
    config.crawler.request_timeout = 5;
    config.crawler.robots_timeout = 2;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.emails_path = dir.join("emails.txt").to_string_lossy().into_owned();
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, content: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(content))
        .mount(server)
        .await;
}

fn paths(pages: &[url::Url]) -> Vec<&str> {
    pages.iter().map(|u| u.path()).collect()
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<p>General enquiries: info@shop.test</p>
           <a href="/team">Team</a>
           <a href="/contact/">Contact</a>
           <a href="https://elsewhere.test/page">Partner</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/team",
        r#"<span data-email="jane.doe@shop.test"></span>
           <a href="/">Home</a>
           <a href="/contact?ref=team">Contact</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/contact",
        r#"<a href="mailto:sales@shop.test?subject=Order">Sales</a>
           <p>Also INFO@shop.test and broken@@x</p>"#,
    )
    .await;

    let config = create_test_config(dir.path());
    let emails_path = config.output.emails_path.clone();
    let report = crawl(config, &format!("{}/", server.uri())).await.unwrap();

    assert!(!report.interrupted);
    assert_eq!(paths(&report.discovered_pages), vec!["/", "/team", "/contact"]);
    assert_eq!(
        report.emails,
        vec!["info@shop.test", "jane.doe@shop.test", "sales@shop.test"]
    );

    // Every address is on disk exactly once, in discovery order
    let content = std::fs::read_to_string(&emails_path).unwrap();
    assert_eq!(content, "info@shop.test\njane.doe@shop.test\nsales@shop.test\n");

    let recipients = load_recipients(&emails_path).unwrap();
    assert_eq!(recipients[1].name, "Jane Doe");

    assert_eq!(report.stats.pages_fetched, 3);
    assert_eq!(report.stats.emails_found, 3);
}

#[tokio::test]
async fn test_discovered_pages_stay_on_site() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="http://other.test/b">External</a>
           <a href="//other.test/c">Protocol relative</a>
           <a href="/local">Local</a>"#,
    )
    .await;
    mount_page(&server, "/local", "<p>nothing here</p>").await;

    let report = crawl(create_test_config(dir.path()), &server.uri())
        .await
        .unwrap();

    let host = url::Url::parse(&server.uri())
        .unwrap()
        .host_str()
        .unwrap()
        .to_string();
    assert_eq!(report.discovered_pages.len(), 2);
    for page in &report.discovered_pages {
        assert_eq!(page.host_str(), Some(host.as_str()));
    }
}

#[tokio::test]
async fn test_max_pages_one_fetches_only_seed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html("a"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html("b"))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(dir.path());
    config.crawler.max_pages = 1;
    let report = crawl(config, &server.uri()).await.unwrap();

    assert_eq!(paths(&report.discovered_pages), vec!["/"]);
}

#[tokio::test]
async fn test_missing_robots_means_unrestricted() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/", r#"<a href="/admin">Admin</a>"#).await;
    mount_page(&server, "/admin", "<p>admin@shop.test</p>").await;

    let mut config = create_test_config(dir.path());
    config.crawler.robots_mode = RobotsMode::Strict;
    let report = crawl(config, &server.uri()).await.unwrap();

    assert_eq!(report.discovered_pages.len(), 2);
    assert_eq!(report.stats.skipped_for(SkipReason::RobotsDisallowed), 0);
}

#[tokio::test]
async fn test_strict_robots_skips_disallowed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_robots(&server, "User-agent: *\nDisallow: /private\n").await;
    mount_page(
        &server,
        "/",
        r#"<a href="/private/page">Private</a><a href="/public">Public</a>"#,
    )
    .await;
    mount_page(&server, "/public", "<p>ok</p>").await;
    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(html("secret@shop.test"))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(dir.path());
    config.crawler.robots_mode = RobotsMode::Strict;
    let report = crawl(config, &server.uri()).await.unwrap();

    assert_eq!(paths(&report.discovered_pages), vec!["/", "/public"]);
    assert_eq!(report.stats.skipped_for(SkipReason::RobotsDisallowed), 1);
    assert!(report.emails.is_empty());
}

#[tokio::test]
async fn test_permissive_robots_crawls_anyway() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_robots(&server, "User-agent: *\nDisallow: /private\n").await;
    mount_page(&server, "/", r#"<a href="/private/page">Private</a>"#).await;
    mount_page(&server, "/private/page", "<p>secret@shop.test</p>").await;

    let report = crawl(create_test_config(dir.path()), &server.uri())
        .await
        .unwrap();

    assert_eq!(paths(&report.discovered_pages), vec!["/", "/private/page"]);
    assert_eq!(report.emails, vec!["secret@shop.test"]);
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/level1">1</a>"#).await;
    mount_page(&server, "/level1", r#"<a href="/level2">2</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html("too deep"))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(dir.path());
    config.crawler.max_depth = 1;
    let report = crawl(config, &server.uri()).await.unwrap();

    assert_eq!(paths(&report.discovered_pages), vec!["/", "/level1"]);
}

#[tokio::test]
async fn test_failures_do_not_stop_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/broken">Broken</a><a href="/gone">Gone</a><a href="/ok">OK</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>ok@shop.test</p>").await;

    let report = crawl(create_test_config(dir.path()), &server.uri())
        .await
        .unwrap();

    assert_eq!(paths(&report.discovered_pages), vec!["/", "/ok"]);
    assert_eq!(report.emails, vec!["ok@shop.test"]);
    // /gone is unmatched and answered with 404 by the mock server
    assert_eq!(report.stats.http_failures.get(&500), Some(&1));
    assert_eq!(report.stats.http_failures.get(&404), Some(&1));
    assert_eq!(report.stats.total_failed(), 2);

    let outcome = FailureReason::HttpStatus(500).to_string();
    assert_eq!(outcome, "HTTP 500");
}

#[tokio::test]
async fn test_content_type_handling() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/data">Data</a><a href="/brochure.pdf">PDF</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"email":"json@shop.test"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/brochure.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = crawl(create_test_config(dir.path()), &server.uri())
        .await
        .unwrap();

    assert_eq!(paths(&report.discovered_pages), vec!["/"]);
    assert_eq!(report.stats.skipped_for(SkipReason::NonHtmlContent), 1);
    assert_eq!(report.stats.skipped_for(SkipReason::NonHtmlExtension), 1);
    assert!(report.emails.is_empty());
}

#[tokio::test]
async fn test_no_page_fetched_twice() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Every page links to every other page, in several spellings
    let links = r#"<a href="/">Home</a><a href="/a">A</a><a href="/a/">A/</a>
                   <a href="/b?x=1">B</a><a href="/b#frag">B#</a>"#;
    mount_page(&server, "/", links).await;
    mount_page(&server, "/a", links).await;
    mount_page(&server, "/b", links).await;

    let report = crawl(create_test_config(dir.path()), &server.uri())
        .await
        .unwrap();

    assert_eq!(paths(&report.discovered_pages), vec!["/", "/a", "/b"]);
    // The server's expect(1) checks run when it is dropped
}

#[tokio::test]
async fn test_redirect_off_site_is_not_harvested() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<p>home@shop.test</p><a href="/out">Out</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/out"))
        .respond_with(ResponseTemplate::new(302).insert_header(
            "location",
            format!("http://localhost:{}/landing", other.address().port()).as_str(),
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&other, "/landing", "<p>offsite@other.test</p>").await;

    let config = create_test_config(dir.path());
    let emails_path = config.output.emails_path.clone();
    let report = crawl(config, &server.uri()).await.unwrap();

    assert_eq!(paths(&report.discovered_pages), vec!["/"]);
    assert_eq!(report.emails, vec!["home@shop.test"]);
    assert_eq!(report.stats.skipped_for(SkipReason::OffSiteRedirect), 1);
    assert!(!std::fs::read_to_string(&emails_path)
        .unwrap()
        .contains("offsite@other.test"));
}

#[tokio::test]
async fn test_redirect_target_counts_as_visited() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/home"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/home",
        r#"<p>desk@shop.test</p><a href="/home">Home</a><a href="/">Root</a>"#,
    )
    .await;

    let report = crawl(create_test_config(dir.path()), &server.uri())
        .await
        .unwrap();

    assert_eq!(paths(&report.discovered_pages), vec!["/"]);
    assert_eq!(report.emails, vec!["desk@shop.test"]);
    // /home is fetched once, through the redirect
}

#[tokio::test]
async fn test_rerun_does_not_duplicate_file_entries() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>Repeat@Shop.test</p>"))
        .expect(2)
        .mount(&server)
        .await;

    let config = create_test_config(dir.path());
    let emails_path = config.output.emails_path.clone();

    let first = crawl(config.clone(), &server.uri()).await.unwrap();
    let second = crawl(config, &server.uri()).await.unwrap();

    assert_eq!(first.emails, vec!["Repeat@Shop.test"]);
    assert_eq!(second.emails, vec!["Repeat@Shop.test"]);
    assert_eq!(
        std::fs::read_to_string(&emails_path).unwrap(),
        "Repeat@Shop.test\n"
    );
}

#[tokio::test]
async fn test_crawl_delay_raises_politeness_delay() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_robots(&server, "User-agent: *\nDisallow: /nothing\nCrawl-delay: 1\n").await;
    mount_page(&server, "/", r#"<a href="/next">Next</a>"#).await;
    mount_page(&server, "/next", "<p>done</p>").await;

    let started = std::time::Instant::now();
    let report = crawl(create_test_config(dir.path()), &server.uri())
        .await
        .unwrap();

    assert_eq!(report.discovered_pages.len(), 2);
    assert!(started.elapsed() >= Duration::from_millis(900));
}

#[tokio::test]
async fn test_interrupt_keeps_partial_results() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<p>first@shop.test</p><a href="/slow">Slow</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("late@shop.test").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let sink = Box::new(MemorySink::new());
    let coordinator =
        Coordinator::with_sink(create_test_config(dir.path()), &server.uri(), sink).unwrap();

    let report = coordinator
        .run_until(tokio::time::sleep(Duration::from_millis(500)))
        .await
        .unwrap();

    assert!(report.interrupted);
    assert_eq!(paths(&report.discovered_pages), vec!["/"]);
    assert_eq!(report.emails, vec!["first@shop.test"]);
}

#[tokio::test]
async fn test_invalid_seed_makes_no_requests() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(html(""))
        .expect(0)
        .mount(&server)
        .await;

    let result = crawl(create_test_config(dir.path()), "not-a-url").await;
    assert!(matches!(
        result,
        Err(mailsift::MailsiftError::InvalidSeed { .. })
    ));
}
