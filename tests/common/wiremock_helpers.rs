use wiremock::matchers::{any, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use northscrape_lib::config::{DelaysConfig, SourcesConfig};
use northscrape_lib::{DirectorySource, SearchEngine};

/// Creates a mock HTTP server that answers every request with the given
/// status code and body.
pub async fn mock_status_server(status_code: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(status_code).set_body_string(body.to_string()))
        .mount(&server)
        .await;

    server
}

/// Creates a mock directory that serves `html` for GET requests at `url_path`.
/// Any other path gets a 404.
pub async fn mock_directory_page(url_path: &str, html: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html.to_string())
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    server
}

/// Creates a mock search engine at `/html/` that only answers form POSTs
/// whose body contains `form_fragment`.
pub async fn mock_search_page(form_fragment: &str, html: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(body_string_contains(form_fragment))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html.to_string())
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    server
}

fn sources_for(server_uri: &str) -> SourcesConfig {
    SourcesConfig {
        directory_base_url: server_uri.to_string(),
        search_url: format!("{}/html/", server_uri),
        generate_timeout_secs: 5,
        lookup_timeout_secs: 5,
        ..SourcesConfig::default()
    }
}

/// A directory client pointed at the mock server, with pauses disabled.
///
/// Blocking clients must be built, used and dropped off the async runtime,
/// so call this from `tokio::task::spawn_blocking`.
pub fn directory_at(server_uri: &str) -> DirectorySource {
    DirectorySource::new(&sources_for(server_uri), &DelaysConfig::disabled()).unwrap()
}

/// A search client pointed at the mock server's `/html/` endpoint.
///
/// Same runtime caveat as [`directory_at`].
pub fn search_at(server_uri: &str) -> SearchEngine {
    SearchEngine::new(&sources_for(server_uri), &DelaysConfig::disabled()).unwrap()
}
