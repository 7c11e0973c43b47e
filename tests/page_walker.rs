//! Page walker tests against wiremock.
//!
//! Each test mounts a chain of pages linked by `next` references and checks
//! what the walker gathers and which requests it makes.

use nbee::{NationBuilderClient, NbError, PageWalker, ResultFormat, Results};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn next_ref(token: u32) -> String {
    format!("/api/v1/people?__nonce=abc&__token={token}")
}

fn people(ids: std::ops::Range<u64>) -> Vec<Value> {
    ids.map(|id| json!({ "id": id, "email": format!("p{id}@example.com") }))
        .collect()
}

/// Mount `pages` as a chain: the first answers the plain request, page `i`
/// answers `__token=i`.
async fn mount_chain(server: &MockServer, pages: &[Vec<Value>]) {
    for (i, items) in pages.iter().enumerate() {
        let next = if i + 1 < pages.len() {
            Value::String(next_ref(i as u32 + 1))
        } else {
            Value::Null
        };
        let body = json!({ "results": items, "next": next });

        let mock = Mock::given(method("GET")).and(path("/api/v1/people"));
        let mock = if i == 0 {
            mock.and(query_param_is_missing("__token"))
        } else {
            mock.and(query_param("__token", i.to_string()))
        };

        mock.respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&body)
                .insert_header("nation-ratelimit-remaining", "42"),
        )
        .expect(1)
        .mount(server)
        .await;
    }
}

fn client(server: &MockServer) -> NationBuilderClient {
    NationBuilderClient::with_origin("demo", "test-token", &server.uri())
        .unwrap()
        .with_page_limit(3)
}

#[tokio::test]
async fn test_walks_every_page_in_order() {
    let server = MockServer::start().await;
    let pages = vec![people(1..4), people(4..7), people(7..8)];
    mount_chain(&server, &pages).await;

    let client = client(&server);
    let first = client.get("people").await.unwrap();
    let results = PageWalker::new(&client).walk(&first).await.unwrap();

    assert_eq!(results.len(), 7);
    let ids: Vec<u64> = results.iter().map(|p| p["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, (1..8).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_uneven_and_empty_pages_are_concatenated() {
    let server = MockServer::start().await;
    let pages = vec![people(1..2), Vec::new(), people(2..6), people(6..8)];
    mount_chain(&server, &pages).await;

    let client = client(&server);
    let first = client.get("people").await.unwrap();
    let results = PageWalker::new(&client).walk(&first).await.unwrap();

    let expected: usize = pages.iter().map(Vec::len).sum();
    assert_eq!(results.len(), expected);
    assert_eq!(results.items()[1]["id"], 2);
}

#[tokio::test]
async fn test_single_page_issues_no_follow_up() {
    let server = MockServer::start().await;
    mount_chain(&server, &[people(1..3)]).await;

    // Any follow-up request would hit this and fail the expectation.
    Mock::given(method("GET"))
        .and(query_param("__token", "1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let first = client.get("people").await.unwrap();
    let results = PageWalker::new(&client).walk(&first).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results.items()[0]["id"], 1);
}

#[tokio::test]
async fn test_follow_ups_carry_auth_and_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/people"))
        .and(query_param_is_missing("__token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": people(1..2),
            "next": next_ref(1)
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/people"))
        .and(query_param("__nonce", "abc"))
        .and(query_param("__token", "1"))
        .and(query_param("access_token", "test-token"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": people(2..3),
            "next": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let first = client.get("people").await.unwrap();
    let results = PageWalker::new(&client).walk(&first).await.unwrap();

    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_absent_next_ends_the_walk() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"name": "volunteer"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let first = client.get("tags").await.unwrap();
    let results = PageWalker::new(&client).walk(&first).await.unwrap();

    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_page_cap_stops_a_cycle() {
    let server = MockServer::start().await;

    // Every page points back at itself.
    Mock::given(method("GET"))
        .and(path("/api/v1/people"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": people(1..2),
            "next": next_ref(1)
        })))
        .expect(4)
        .mount(&server)
        .await;

    let client = client(&server);
    let first = client.get("people").await.unwrap();
    let err = PageWalker::new(&client)
        .with_max_pages(4)
        .walk(&first)
        .await
        .unwrap_err();

    assert!(matches!(err, NbError::PageLimitExceeded { max_pages: 4 }));
}

#[tokio::test]
async fn test_cap_not_hit_when_server_finishes() {
    let server = MockServer::start().await;
    mount_chain(&server, &[people(1..2), people(2..3)]).await;

    let client = client(&server);
    let first = client.get("people").await.unwrap();
    let results = PageWalker::new(&client)
        .with_max_pages(2)
        .walk(&first)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_malformed_follow_up_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/people"))
        .and(query_param_is_missing("__token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": people(1..2),
            "next": next_ref(1)
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/people"))
        .and(query_param("__token", "1"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "code": "rate_limited"
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let first = client.get("people").await.unwrap();
    let err = PageWalker::new(&client).walk(&first).await.unwrap_err();

    match err {
        NbError::MalformedPage { url, .. } => {
            assert!(url.contains("__token=1"));
            assert!(!url.contains("test-token"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_collect_as_table_unions_columns() {
    let server = MockServer::start().await;
    let pages = vec![
        vec![json!({"id": 1, "email": "a@example.com"})],
        vec![json!({"id": 2, "phone": "555-0100"})],
    ];
    mount_chain(&server, &pages).await;

    let client = client(&server);
    let first = client.get("people").await.unwrap();
    let results = PageWalker::new(&client)
        .collect(&first, ResultFormat::Table)
        .await
        .unwrap();

    let Results::Table(table) = results else {
        panic!("expected a table");
    };
    assert_eq!(table.len(), 2);
    assert_eq!(table.columns(), ["id", "email", "phone"]);
    assert!(table.get(0, "phone").is_none());
    assert!(table.get(1, "email").is_none());
    assert_eq!(table.get(1, "phone"), Some(&json!("555-0100")));
}
