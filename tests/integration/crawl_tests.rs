//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a miniature storefront and run the
//! full crawl cycle end-to-end: listing traversal, product extraction, the
//! age-gate bypass, and the offsite and duplicate filters.

use serde_json::Value;
use steam_products::config::Config;
use steam_products::crawler::{run_crawl, Seed};
use steam_products::output::{CrawlStatistics, JsonLinesSink};
use steam_products::state::PageState;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock storefront
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.crawler.store_url = format!("{}/", base_url);
    config.crawler.start_url = format!("{}/search/?sort_by=Released_DESC", base_url);
    config.crawler.allowed_domains = vec!["127.0.0.1".to_string()];
    config.crawler.request_timeout = 5;
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

fn redirect(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("Location", location)
}

fn product_page(title: &str) -> String {
    format!(
        r#"<html><body>
        <div class="apphub_AppName">{}</div>
        <div class="game_purchase_price price">$9.99</div>
        <div class="release_date"><div class="date">1 Jan, 2020</div></div>
        </body></html>"#,
        title
    )
}

fn gate_page(app: u32) -> String {
    format!(
        r#"<html><body><div id="agegate_box">
        <form action="/agecheckset/app/{}/" method="post">
            <input type="hidden" name="snr" value="1_agecheck_agecheck__age-gate">
            <select name="ageDay"><option>1</option></select>
        </form></div></body></html>"#,
        app
    )
}

async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn crawl(config: Config, seed: Seed) -> (Vec<Value>, CrawlStatistics) {
    let mut sink = JsonLinesSink::new(Vec::new());
    let stats = run_crawl(config, seed, &mut sink)
        .await
        .expect("Crawl should complete");

    let output = String::from_utf8(sink.into_inner()).unwrap();
    let records = output
        .lines()
        .map(|line| serde_json::from_str(line).expect("Each line is a JSON object"))
        .collect();
    (records, stats)
}

fn ids(records: &[Value]) -> Vec<&str> {
    records.iter().filter_map(|r| r["id"].as_str()).collect()
}

#[tokio::test]
async fn test_listing_crawl_extracts_products() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/search/",
        html(format!(
            r#"<html><body>
            <div id="search_result_container">
                <a href="{base}/app/1/First_Game/?snr=1_7_7_230_150_1">First</a>
                <a href="/app/2/Second_Game/?snr=1_7_7_230_150_1">Second</a>
                <a href="http://offsite.example.com/app/99/">Elsewhere</a>
            </div>
            <div class="search_pagination_right">
                <a href="/search/more/?sort_by=Released_DESC&page=2">2</a>
            </div>
            <div id="footer"><a href="/app/77/Not_Listed/">Ignored</a></div>
            </body></html>"#,
            base = base_url
        )),
    )
    .await;

    mount_get(
        &mock_server,
        "/search/more/",
        html(
            r#"<html><body>
            <div id="search_result_container">
                <a href="/app/3/Third_Game/">Third</a>
                <a href="/app/1/First_Game/?snr=1_7_7_230_150_2">First again</a>
            </div>
            </body></html>"#
                .to_string(),
        ),
    )
    .await;

    mount_get(&mock_server, "/app/1/First_Game/", html(product_page("First Game"))).await;
    mount_get(&mock_server, "/app/2/Second_Game/", html(product_page("Second Game"))).await;
    mount_get(&mock_server, "/app/3/Third_Game/", html(product_page("Third Game"))).await;

    let config = create_test_config(&base_url);
    let seed = Seed::from_config(&config, None).unwrap();
    let (records, stats) = crawl(config, seed).await;

    assert_eq!(ids(&records), vec!["1", "2", "3"]);
    assert_eq!(records[0]["title"], "First Game");
    assert_eq!(records[0]["price"], "$9.99");
    assert_eq!(records[0]["release_date"], "1 Jan, 2020");
    assert_eq!(records[0]["n_reviews"], "0");
    assert_eq!(
        records[0]["reviews_url"],
        "http://steamcommunity.com/app/1/reviews/?browsefilter=mostrecent&p=1"
    );

    // Canonical URLs carry no session tracking parameter
    for record in &records {
        assert!(!record["url"].as_str().unwrap().contains("snr="));
    }

    assert_eq!(stats.count(PageState::Traversed), 2);
    assert_eq!(stats.count(PageState::Extracted), 3);
    assert_eq!(stats.offsite_dropped, 1);
    // Dropped links were never fetched, so they are not pages
    let pages: u64 = stats.pages_by_state.values().sum();
    assert_eq!(pages, 5);
    assert_eq!(stats.duplicates_dropped, 1);
    assert_eq!(stats.requests_sent, 5);
    assert_eq!(stats.records_written, 3);
    assert_eq!(stats.total_errors(), 0);
}

#[tokio::test]
async fn test_age_gate_bypass() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(&mock_server, "/app/10/", redirect("/agecheck/app/10/")).await;
    mount_get(&mock_server, "/agecheck/app/10/", html(gate_page(10))).await;
    mount_get(&mock_server, "/app/10/Mature_Game/", html(product_page("Mature Game"))).await;

    Mock::given(method("POST"))
        .and(path("/agecheckset/app/10/"))
        .and(body_string_contains("snr=1_agecheck_agecheck__age-gate"))
        .and(body_string_contains("ageDay=1"))
        .and(body_string_contains("ageMonth=1"))
        .and(body_string_contains("ageYear=1955"))
        .respond_with(redirect("/app/10/Mature_Game/"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let seed = Seed::from_config(&config, Some("10")).unwrap();
    let (records, stats) = crawl(config, seed).await;

    assert_eq!(ids(&records), vec!["10"]);
    assert_eq!(records[0]["title"], "Mature Game");
    assert_eq!(stats.count(PageState::AgeGated), 1);
    assert_eq!(stats.count(PageState::Extracted), 1);
    assert_eq!(stats.requests_sent, 2);
}

#[tokio::test]
async fn test_repeated_age_gate_fails_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(&mock_server, "/app/20/", redirect("/agecheck/app/20/")).await;
    mount_get(&mock_server, "/agecheck/app/20/", html(gate_page(20))).await;

    Mock::given(method("POST"))
        .and(path("/agecheckset/app/20/"))
        .respond_with(redirect("/agecheck/app/20/"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let seed = Seed::from_config(&config, Some("20")).unwrap();
    let (records, stats) = crawl(config, seed).await;

    assert!(records.is_empty());
    assert_eq!(stats.count(PageState::AgeGated), 1);
    assert_eq!(stats.count(PageState::Failed), 1);
    assert_eq!(stats.requests_sent, 2);
}

#[tokio::test]
async fn test_direct_product_seed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/app/570/",
        html(
            r#"<html><body>
            <div class="apphub_AppName"> Dota 2 </div>
            <div class="game_area_purchase_game">
                <div class="discount_block">
                    <div class="discount_original_price">$19.99</div>
                    <div class="discount_final_price">$4.99</div>
                </div>
            </div>
            <div class="early_access_header">Early Access Game</div>
            </body></html>"#
                .to_string(),
        ),
    )
    .await;

    let config = create_test_config(&base_url);
    let seed = Seed::from_config(&config, Some("570")).unwrap();
    let (records, stats) = crawl(config, seed).await;

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["id"], "570");
    assert_eq!(record["title"], "Dota 2");
    assert_eq!(record["price"], "$19.99");
    assert_eq!(record["discount_price"], "$4.99");
    assert_eq!(record["early_access"], true);
    assert_eq!(record["url"], format!("{}/app/570/", base_url));
    assert!(record.get("metascore").is_none());
    assert_eq!(stats.requests_sent, 1);
}

#[tokio::test]
async fn test_failed_pages_do_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/search/",
        html(
            r#"<div id="search_result_container">
                <a href="/app/404/Missing/">Missing</a>
                <a href="/app/5/Image_Only/">Image</a>
                <a href="/app/6/Fine/">Fine</a>
            </div>"#
                .to_string(),
        ),
    )
    .await;
    mount_get(
        &mock_server,
        "/app/5/Image_Only/",
        ResponseTemplate::new(200).set_body_raw(vec![0u8; 16], "image/png"),
    )
    .await;
    mount_get(&mock_server, "/app/6/Fine/", html(product_page("Fine"))).await;

    let config = create_test_config(&base_url);
    let seed = Seed::from_config(&config, None).unwrap();
    let (records, stats) = crawl(config, seed).await;

    assert_eq!(ids(&records), vec!["6"]);
    assert_eq!(stats.count(PageState::DeadLink), 1);
    assert_eq!(stats.count(PageState::ContentMismatch), 1);
    assert_eq!(stats.total_errors(), 2);
}

#[tokio::test]
async fn test_request_cap() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/search/",
        html(
            r#"<div id="search_result_container">
                <a href="/app/1/One/">One</a>
                <a href="/app/2/Two/">Two</a>
                <a href="/app/3/Three/">Three</a>
            </div>"#
                .to_string(),
        ),
    )
    .await;
    for (id, name) in [(1, "One"), (2, "Two"), (3, "Three")] {
        mount_get(
            &mock_server,
            &format!("/app/{}/{}/", id, name),
            html(product_page(name)),
        )
        .await;
    }

    let mut config = create_test_config(&base_url);
    config.crawler.max_requests = 2;
    let seed = Seed::from_config(&config, None).unwrap();
    let (records, stats) = crawl(config, seed).await;

    assert_eq!(ids(&records), vec!["1"]);
    assert_eq!(stats.requests_sent, 2);
}

#[tokio::test]
async fn test_start_url_is_configurable() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/search/",
        html(r#"<div id="search_result_container"></div>"#.to_string()),
    )
    .await;

    let config = create_test_config(&base_url);
    let seed = Seed::from_config(&config, None).unwrap();
    let expected = Url::parse(&format!("{}/search/?sort_by=Released_DESC", base_url)).unwrap();
    assert_eq!(seed, Seed::Listing(expected));

    let (records, stats) = crawl(config, seed).await;
    assert!(records.is_empty());
    assert_eq!(stats.count(PageState::Traversed), 1);
}
