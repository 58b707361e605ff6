//! Integration tests for the issue searcher against a local mock of the
//! GitHub search endpoint.

use std::time::Duration;

use chrono::{Datelike, Utc};
use mockito::{Matcher, Server};
use serde_json::json;

use hacktoberfest_issues_lib::{
    IssueSearcher, QueryBuilder, SearchConfig, SearchError, SearchFilters,
};

fn searcher_for(server: &Server) -> IssueSearcher {
    let config = SearchConfig::default()
        .with_api_base_url(server.url())
        .with_timeout(Duration::from_secs(5));
    IssueSearcher::new(config).expect("valid config")
}

fn issue(repo: &str, year: i32) -> serde_json::Value {
    json!({
        "title": format!("Fix docs in {}", repo),
        "html_url": format!("https://github.com/{}/issues/1", repo),
        "repository_url": format!("https://api.github.com/repos/{}", repo),
        "body": "Steps to reproduce: ".repeat(30),
        "labels": [{ "name": "good first issue" }, { "name": "hacktoberfest" }],
        "updated_at": format!("{}-01-02T00:00:00Z", year),
    })
}

#[tokio::test]
async fn test_search_sends_headers_and_normalizes_items() {
    let mut server = Server::new_async().await;
    let year = Utc::now().year();
    let mock = server
        .mock("GET", "/search/issues")
        .match_query(Matcher::AllOf(vec![
            Matcher::Regex("state(%3A|:)open".into()),
            Matcher::Regex("language(%3A|:)rust".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("per_page".into(), "5".into()),
        ]))
        .match_header("accept", "application/vnd.github+json")
        .match_header("x-github-api-version", "2022-11-28")
        .match_header("user-agent", "hacktoberfest-issues")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total_count": 812,
                "incomplete_results": false,
                "items": [issue("owner/repo", year), issue("acme/old", year - 3)],
            })
            .to_string(),
        )
        .create_async()
        .await;

    let searcher = searcher_for(&server);
    let filters = SearchFilters::default().language("Rust").page(2).per_page(5);
    let results = searcher.search(&filters).await.expect("search succeeds");

    mock.assert_async().await;
    assert_eq!(results.total_count, 1);
    assert_eq!(results.provider_total, 812);

    let first = &results.items[0];
    assert_eq!(first.repository_name, "owner/repo");
    assert_eq!(first.repository_url, "https://github.com/owner/repo");
    assert_eq!(first.labels, vec!["good first issue", "hacktoberfest"]);
    assert!(first.body_excerpt.chars().count() <= 200);
}

#[tokio::test]
async fn test_all_time_search_keeps_provider_items() {
    let mut server = Server::new_async().await;
    let year = Utc::now().year();
    let _mock = server
        .mock("GET", "/search/issues")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "total_count": 2,
                "items": [issue("a/b", year), issue("c/d", year - 1)],
            })
            .to_string(),
        )
        .create_async()
        .await;

    let config = SearchConfig::default()
        .with_api_base_url(server.url())
        .with_recency_filter(false);
    let searcher = IssueSearcher::new(config).unwrap();
    let results = searcher.search(&SearchFilters::default()).await.unwrap();

    assert_eq!(results.total_count, 2);
    assert_eq!(results.items[1].repository_name, "c/d");
}

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search/issues")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer s3cret")
        .with_status(200)
        .with_body(r#"{"total_count":0,"items":[]}"#)
        .create_async()
        .await;

    let config = SearchConfig::default()
        .with_api_base_url(server.url())
        .with_token("s3cret");
    let searcher = IssueSearcher::new(config).unwrap();
    let results = searcher.search(&SearchFilters::default()).await.unwrap();

    mock.assert_async().await;
    assert!(results.is_empty());
    assert_eq!(results.total_count, 0);
}

#[tokio::test]
async fn test_missing_items_is_malformed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search/issues")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"total_count":3}"#)
        .create_async()
        .await;

    let err = searcher_for(&server)
        .search(&SearchFilters::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::MalformedResponse(_)), "{:?}", err);
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search/issues")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = searcher_for(&server)
        .search(&SearchFilters::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::MalformedResponse(_)), "{:?}", err);
}

#[tokio::test]
async fn test_error_statuses_carry_provider_message() {
    for (status, body, expected) in [
        (404, r#"{"message":"Not Found"}"#, "Not Found"),
        (403, r#"{"message":"API rate limit exceeded"}"#, "API rate limit exceeded"),
        (500, "", "GitHub API request failed with status 500"),
    ] {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/issues")
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await;

        let err = searcher_for(&server)
            .search(&SearchFilters::default())
            .await
            .unwrap_err();
        match err {
            SearchError::RemoteApi {
                status: got,
                message,
            } => {
                assert_eq!(got, status as u16);
                assert_eq!(message, expected);
            }
            other => panic!("expected RemoteApi for {}, got {:?}", status, other),
        }
    }
}

#[tokio::test]
async fn test_validated_search_rejects_unknown_language_without_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search/issues")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let filters = SearchFilters::default().language("NotARealLanguage");
    let err = searcher_for(&server)
        .search_validated(&filters)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, SearchError::Validation { .. }), "{:?}", err);
}

#[tokio::test]
async fn test_execute_accepts_prebuilt_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search/issues")
        .match_query(Matcher::Regex("label(%3A|:)bug".into()))
        .with_status(200)
        .with_body(r#"{"total_count":0,"items":[]}"#)
        .create_async()
        .await;

    let query = QueryBuilder::build(&SearchFilters::default().label("bug"));
    let results = searcher_for(&server).execute(&query, 1, 10).await.unwrap();

    mock.assert_async().await;
    assert_eq!(results.total_count, 0);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _hold = tokio::spawn(async move {
        // Accept and never answer
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let config = SearchConfig::default()
        .with_api_base_url(format!("http://{}", addr))
        .with_timeout(Duration::from_millis(200));
    let searcher = IssueSearcher::new(config).unwrap();

    let err = searcher.search(&SearchFilters::default()).await.unwrap_err();
    assert!(
        matches!(err, SearchError::Timeout(d) if d == Duration::from_millis(200)),
        "{:?}",
        err
    );
}

#[tokio::test]
async fn test_label_with_hash_keeps_paging_parameters() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search/issues")
        .match_query(Matcher::AllOf(vec![
            Matcher::Regex("priority(%20| )(%23|#)1".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("per_page".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"total_count":0,"items":[]}"#)
        .create_async()
        .await;

    let filters = SearchFilters::default().label("priority #1").page(2);
    searcher_for(&server).search(&filters).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_out_of_range_paging_is_clamped_before_sending() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search/issues")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("per_page".into(), "20".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"total_count":0,"items":[]}"#)
        .create_async()
        .await;

    let filters = SearchFilters {
        page: 0,
        per_page: 500,
        ..SearchFilters::default()
    };
    searcher_for(&server).search(&filters).await.unwrap();

    mock.assert_async().await;
}
