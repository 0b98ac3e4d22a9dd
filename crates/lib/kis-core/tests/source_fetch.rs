use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use kis_core::source::{MSG_INVALID_SOURCE_URL, SourceFetcher, SourceFetcherConfig};
use kis_store::models::FetchStatus;

const CATALOG_BASE: &str = "https://github.com/koreainvestment/open-trading-api/blob/main/examples_llm";

async fn serve_file(
    State(hits): State<Arc<AtomicUsize>>,
    Path((category, function_name, file)): Path<(String, String, String)>,
) -> Result<String, StatusCode> {
    hits.fetch_add(1, Ordering::SeqCst);
    if function_name == "missing" {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(format!("# {category}/{function_name}/{file}"))
}

/// Starts a stand-in for the raw code host and returns its base URL.
async fn spawn_code_host(hits: Arc<AtomicUsize>) -> String {
    let app = Router::new()
        .route("/examples_llm/:category/:function_name/:file", get(serve_file))
        .with_state(hits);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind code host");
    let addr = listener.local_addr().expect("code host addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("code host");
    });
    format!("http://{addr}/examples_llm")
}

fn build_fetcher(base_url: String) -> SourceFetcher {
    let config = SourceFetcherConfig::new(base_url)
        .with_timeout(Duration::from_secs(5))
        .with_request_delay(Duration::ZERO);
    SourceFetcher::new(config).expect("fetcher should build")
}

fn catalog_url(category: &str, function_name: &str, check: bool) -> String {
    let prefix = if check { "chk_" } else { "" };
    format!("{CATALOG_BASE}/{category}/{function_name}/{prefix}{function_name}.py")
}

#[tokio::test]
async fn fetches_main_and_check_files() {
    let hits = Arc::new(AtomicUsize::new(0));
    let fetcher = build_fetcher(spawn_code_host(hits.clone()).await);
    let main = catalog_url("domestic_stock", "inquire_price", false);
    let check = catalog_url("domestic_stock", "inquire_price", true);

    let report = fetcher.fetch(Some(main.as_str()), Some(check.as_str())).await;

    assert_eq!(report.status, FetchStatus::Success);
    assert_eq!(report.message, "Fetched all sources (2/2)");
    let main_file = report.results.main.expect("main result");
    assert_eq!(main_file.content, "# domestic_stock/inquire_price/inquire_price.py");
    assert_eq!(main_file.url, main);
    let check_file = report.results.check.expect("check result");
    assert_eq!(check_file.content, "# domestic_stock/inquire_price/chk_inquire_price.py");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn repeated_fetches_are_served_from_cache() {
    let hits = Arc::new(AtomicUsize::new(0));
    let fetcher = build_fetcher(spawn_code_host(hits.clone()).await);
    let main = catalog_url("auth", "auth_token", false);

    let first = fetcher.fetch(Some(main.as_str()), None).await;
    let second = fetcher.clone().fetch(Some(main.as_str()), None).await;

    assert_eq!(first, second);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_check_file_is_a_partial_success() {
    let hits = Arc::new(AtomicUsize::new(0));
    let fetcher = build_fetcher(spawn_code_host(hits).await);
    let main = catalog_url("elw", "volume_rank", false);
    let check = catalog_url("elw", "missing", true);

    let report = fetcher.fetch(Some(main.as_str()), Some(check.as_str())).await;

    assert_eq!(report.status, FetchStatus::PartialSuccess);
    assert_eq!(report.message, "Fetched some sources (1/2)");
    let check_file = report.results.check.expect("check result");
    assert_eq!(check_file.status, FetchStatus::Error);
    assert!(check_file.message.starts_with("Failed to fetch source"));
    assert!(check_file.content.is_empty());
}

#[tokio::test]
async fn malformed_url_never_reaches_the_host() {
    let hits = Arc::new(AtomicUsize::new(0));
    let fetcher = build_fetcher(spawn_code_host(hits.clone()).await);

    let report = fetcher
        .fetch(Some("https://example.com/not-an-example.txt"), Some(""))
        .await;

    assert_eq!(report.status, FetchStatus::Error);
    assert_eq!(report.message, "Failed to fetch any source (0/1)");
    let main_file = report.results.main.expect("main result");
    assert_eq!(main_file.message, MSG_INVALID_SOURCE_URL);
    assert!(main_file.resolved_url.is_none());
    assert!(report.results.check.is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}
