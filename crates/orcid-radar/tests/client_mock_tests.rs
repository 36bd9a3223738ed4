//! Mock-based client and pipeline tests using wiremock.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use orcid_radar::config::Config;
use orcid_radar::engine;
use orcid_radar::error::{ClientError, EngineError};
use orcid_radar::EuropePmcClient;

const TARGET: &str = "0000-0002-1825-0097";

fn test_client(mock_server: &MockServer) -> EuropePmcClient {
    EuropePmcClient::new(Config::for_testing(&mock_server.uri())).unwrap()
}

/// One result entry in the Europe PMC `core` shape.
fn result_json(pmid: &str, title: &str, authors: &[(&str, &str, Option<&str>)]) -> serde_json::Value {
    let authors: Vec<serde_json::Value> = authors
        .iter()
        .map(|(full, first, id)| {
            let mut a = json!({"fullName": full, "firstName": first});
            if let Some(id) = id {
                a["authorId"] = json!({"type": "ORCID", "value": id});
            }
            a
        })
        .collect();

    json!({
        "pmid": pmid,
        "title": title,
        "pubYear": "2020",
        "authorString": "…",
        "authorList": {"author": authors}
    })
}

fn page_json(next_cursor: Option<&str>, results: Vec<serde_json::Value>) -> serde_json::Value {
    let mut body = json!({"resultList": {"result": results}});
    if let Some(c) = next_cursor {
        body["nextCursorMark"] = json!(c);
    }
    body
}

fn empty_page() -> serde_json::Value {
    page_json(Some("end"), vec![])
}

#[tokio::test]
async fn search_follows_cursor_marks_across_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "Darwin C"))
        .and(query_param("cursorMark", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            Some("c2"),
            vec![result_json("1", "Paper One", &[("Darwin C", "Charles", Some(TARGET))])],
        )))
        .mount(&mock_server)
        .await;

    // Final page repeats the request cursor, Solr-style.
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("cursorMark", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            Some("c2"),
            vec![result_json("2", "Paper Two", &[("Darwin C", "Charles", Some(TARGET))])],
        )))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let outcome = client.search("Darwin C").await.unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.corpus.len(), 2);
    assert!(outcome.corpus.papers.contains_key("1"));
    assert!(outcome.corpus.papers.contains_key("2"));
    assert_eq!(outcome.corpus.authors[TARGET].papers.len(), 2);
}

#[tokio::test]
async fn search_skips_records_without_pmid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("cursorMark", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            None,
            vec![
                json!({"title": "Preprint without pmid"}),
                result_json("1", "Real Paper", &[("Darwin C", "Charles", None)]),
            ],
        )))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let outcome = client.search("Darwin C").await.unwrap();

    assert_eq!(outcome.corpus.len(), 1);
    assert!(outcome.corpus.papers.contains_key("1"));
}

#[tokio::test]
async fn first_page_failure_is_a_hard_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.search("Darwin C").await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 500, .. }));
}

#[tokio::test]
async fn mid_pagination_failure_returns_partial_corpus_with_resume_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("cursorMark", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            Some("c2"),
            vec![result_json("1", "Paper One", &[("Darwin C", "Charles", None)])],
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("cursorMark", "c2"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let outcome = client.search("Darwin C").await.unwrap();

    assert!(!outcome.is_complete());
    assert_eq!(outcome.resume_cursor.as_deref(), Some("c2"));
    assert_eq!(outcome.corpus.len(), 1);
}

#[tokio::test]
async fn search_from_resumes_at_saved_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("cursorMark", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            Some("c2"),
            vec![result_json("2", "Paper Two", &[("Darwin C", "Charles", None)])],
        )))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let outcome = client.search_from("Darwin C", "c2").await.unwrap();

    assert!(outcome.is_complete());
    assert!(outcome.corpus.papers.contains_key("2"));
}

#[tokio::test]
async fn run_attributes_candidate_via_shared_collaborator_identifier() {
    let mock_server = MockServer::start().await;

    // ORCID query: one confirmed paper with an identified collaborator.
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", TARGET))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            None,
            vec![result_json(
                "1",
                "Confirmed Paper",
                &[("Darwin C", "Charles", Some(TARGET)), ("Wallace AR", "Alfred", Some("id-wallace"))],
            )],
        )))
        .mount(&mock_server)
        .await;

    // Name query: the confirmed paper again, plus a candidate sharing the
    // collaborator's identifier, plus an unrelated name twin.
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "Darwin C"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            None,
            vec![
                result_json(
                    "1",
                    "Confirmed Paper",
                    &[
                        ("Darwin C", "Charles", Some(TARGET)),
                        ("Wallace AR", "Alfred", Some("id-wallace")),
                    ],
                ),
                result_json(
                    "101",
                    "Unlinked Paper",
                    &[("Darwin C", "Chris", None), ("Wallace AR", "Alfred", Some("id-wallace"))],
                ),
                result_json("102", "Name Twin Paper", &[("Darwin C", "Chris", None)]),
            ],
        )))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let report = engine::run(&client, TARGET).await.unwrap();

    assert_eq!(report.linked_count, 1);
    assert_eq!(report.potential_count, 2);
    assert_eq!(report.new_found.len(), 1);
    assert!(report.new_found.contains("101"));
    assert!(report.rounds[0].by_propagation.contains(&"101".to_string()));
}

#[tokio::test]
async fn run_with_unknown_orcid_is_invalid_target() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = engine::run(&client, "0000-0000-0000-0000").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidTarget { .. }));
}

#[tokio::test]
async fn run_without_resolvable_target_name_is_invalid_target() {
    let mock_server = MockServer::start().await;

    // Confirmed paper exists but the target's entry carries no name.
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", TARGET))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            None,
            vec![json!({
                "pmid": "1",
                "title": "Confirmed Paper",
                "authorList": {"author": [{"authorId": {"type": "ORCID", "value": TARGET}}]}
            })],
        )))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = engine::run(&client, TARGET).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidTarget { .. }));
}
