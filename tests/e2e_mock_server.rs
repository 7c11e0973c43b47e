//! E2E tests using the mock NationBuilder server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use std::time::Duration;

use nbee::mock_server::{Fixtures, MockServer, MockState, DEFAULT_RATE_LIMIT, DEFAULT_SITE};
use nbee::{
    Endpoint, Guarded, Nation, NationBuilderClient, NbError, PageWalker, ResultFormat, Results,
};
use serde_json::json;

fn nation(server: &MockServer) -> Nation {
    let client = NationBuilderClient::with_origin("demo", "test-token", server.url()).unwrap();
    Nation::new(client, None)
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    // Both servers should have different URLs
    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    // After shutdown, server should not respond
    let client = reqwest::Client::new();
    let result = client.get(format!("{}/health", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Pagination Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_walk_all_people() {
    let server = MockServer::start().await;
    let nation = nation(&server);

    // Five people, two per page: three requests in total.
    let first = nation.people().index(&[]).await.expect("Failed to list people");
    let results = nation
        .all_results(&first, ResultFormat::Items)
        .await
        .expect("Failed to walk pages");

    let Results::Items(people) = results else {
        panic!("asked for items");
    };
    let ids: Vec<u64> = people.iter().map(|p| p["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    let state = server.state();
    let state = state.read().await;
    assert_eq!(state.reads, 3);
    assert_eq!(state.rate_limit_remaining, DEFAULT_RATE_LIMIT - 3);

    server.shutdown().await;
}

#[tokio::test]
async fn test_large_collection_with_uneven_last_page() {
    let state = MockState::new()
        .with_collection("people", Fixtures::people(23))
        .with_page_size(5);
    let server = MockServer::with_state(state).await;
    let client = NationBuilderClient::with_origin("demo", "t", server.url()).unwrap();

    let first = client.get("people").await.unwrap();
    let people = PageWalker::new(&client).walk(&first).await.unwrap();

    assert_eq!(people.len(), 23);
    assert_eq!(people.items()[22]["id"], 23);

    server.shutdown().await;
}

#[tokio::test]
async fn test_client_limit_smaller_than_server_page() {
    let state = MockState::new()
        .with_collection("people", Fixtures::people(6))
        .with_page_size(100);
    let server = MockServer::with_state(state).await;
    let client = NationBuilderClient::with_origin("demo", "t", server.url())
        .unwrap()
        .with_page_limit(4);

    let first = client.get("people").await.unwrap();
    let people = PageWalker::new(&client).walk(&first).await.unwrap();

    assert_eq!(people.len(), 6);
    assert_eq!(server.state().read().await.reads, 2);

    server.shutdown().await;
}

#[tokio::test]
async fn test_cycle_is_stopped_by_page_cap() {
    let state = MockState::new()
        .with_collection("tags", vec![Fixtures::tag("a"), Fixtures::tag("b"), Fixtures::tag("c")])
        .with_page_size(2)
        .with_cycle("tags");
    let server = MockServer::with_state(state).await;
    let client = NationBuilderClient::with_origin("demo", "t", server.url()).unwrap();

    let first = client.get("tags").await.unwrap();
    let err = PageWalker::new(&client)
        .with_max_pages(5)
        .walk(&first)
        .await
        .unwrap_err();

    assert!(matches!(err, NbError::PageLimitExceeded { max_pages: 5 }));
    assert_eq!(server.state().read().await.reads, 5);

    server.shutdown().await;
}

#[tokio::test]
async fn test_uncapped_walker_keeps_following_a_cycle() {
    let state = MockState::new()
        .with_collection("tags", vec![Fixtures::tag("a"), Fixtures::tag("b"), Fixtures::tag("c")])
        .with_page_size(2)
        .with_cycle("tags");
    let server = MockServer::with_state(state).await;
    let client = NationBuilderClient::with_origin("demo", "t", server.url()).unwrap();

    let first = client.get("tags").await.unwrap();
    let walker = PageWalker::new(&client);
    let walk = walker.walk(&first);
    let outcome = tokio::time::timeout(Duration::from_millis(500), walk).await;

    // Still walking when the timeout fires, well past the two real pages.
    assert!(outcome.is_err());
    assert!(server.state().read().await.reads > 3);

    server.shutdown().await;
}

#[tokio::test]
async fn test_people_table_has_union_of_columns() {
    let server = MockServer::start().await;
    let nation = nation(&server);

    let results = nation
        .people()
        .all(&[], ResultFormat::Table)
        .await
        .unwrap();
    let Results::Table(table) = results else {
        panic!("asked for a table");
    };

    assert_eq!(table.len(), 5);
    assert!(table.columns().iter().any(|c| c == "phone"));
    assert_eq!(table.get(0, "phone"), Some(&json!("555-0100")));
    assert!(table.get(1, "phone").is_none());

    server.shutdown().await;
}

// =============================================================================
// Site Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_index_sites_then_list_events() {
    let server = MockServer::start().await;
    let mut nation = nation(&server);

    nation.index_sites().await.unwrap();
    assert_eq!(nation.sites().len(), 2);

    nation.set_site("Main Site").await.unwrap();
    assert_eq!(nation.default_site(), Some(DEFAULT_SITE));

    let events = nation
        .resource(Endpoint::EVENTS)
        .unwrap()
        .all(&[], ResultFormat::Items)
        .await
        .unwrap();
    assert_eq!(events.len(), 2);

    server.shutdown().await;
}

// =============================================================================
// Write Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_writes_reach_server_only_when_safe_mode_off() {
    let server = MockServer::start().await;
    let nation = nation(&server);
    let events = nation.events_for(DEFAULT_SITE).unwrap();
    let rsvp = json!({"rsvp": {"person_id": 1}});

    let blocked = events.create_rsvp(10, &rsvp).await.unwrap();
    assert!(blocked.is_blocked());
    assert!(server.state().read().await.writes.is_empty());

    nation.set_safe_mode(false);
    let sent = events.create_rsvp(10, &rsvp).await.unwrap();
    let Guarded::Executed(response) = sent else {
        panic!("write was blocked");
    };
    assert_eq!(response.status().as_u16(), 201);

    let state = server.state();
    let state = state.read().await;
    assert_eq!(state.writes.len(), 1);
    assert_eq!(state.writes[0].method, "POST");
    assert_eq!(state.writes[0].path, "sites/main/pages/events/10/rsvps");
    assert_eq!(state.writes[0].body, Some(rsvp));

    drop(state);
    server.shutdown().await;
}

#[tokio::test]
async fn test_destroy_event() {
    let server = MockServer::start().await;
    let nation = nation(&server);
    nation.set_safe_mode(false);

    let outcome = nation
        .events_for(DEFAULT_SITE)
        .unwrap()
        .destroy(11)
        .await
        .unwrap();
    assert_eq!(outcome.executed().unwrap().status().as_u16(), 204);

    server.shutdown().await;
}

#[tokio::test]
async fn test_wrong_token_is_returned_as_401() {
    let state = MockState::new()
        .with_collection("people", Fixtures::people(1))
        .with_required_token("right");
    let server = MockServer::with_state(state).await;
    let client = NationBuilderClient::with_origin("demo", "wrong", server.url()).unwrap();

    let response = client.get("people").await.unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // Walking a 401 body fails as a malformed page.
    let err = PageWalker::new(&client).walk(&response).await.unwrap_err();
    assert!(matches!(err, NbError::MalformedPage { .. }));

    server.shutdown().await;
}
