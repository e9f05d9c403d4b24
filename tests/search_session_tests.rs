mod common;

use std::sync::Arc;

use serde_json::json;

use common::{client_with, query_param, FakeTransport};
use flotiq_cli::api::ApiError;
use flotiq_cli::search::SearchSession;

fn session_with(transport: Arc<FakeTransport>) -> SearchSession {
    SearchSession::new(Arc::new(client_with(transport)), "blogpost")
}

#[tokio::test]
async fn short_input_never_reaches_the_client() {
    let transport = Arc::new(FakeTransport::new());
    let mut session = session_with(transport.clone());

    assert!(session.on_input("").await.unwrap().is_none());
    assert!(session.on_input("ab").await.unwrap().is_none());
    assert!(session.on_input("abc").await.unwrap().is_none());
    assert!(session.on_input("   ").await.unwrap().is_none());

    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn long_enough_input_queries_and_caches() {
    let transport = Arc::new(FakeTransport::new());
    let mut session = session_with(transport.clone());

    transport.push_json(200, json!({ "data": [{ "id": "post-1" }, { "id": "post-2" }] }));
    let results = session.on_input("rust").await.unwrap().expect("query fires");
    assert_eq!(results.len(), 2);
    assert_eq!(transport.request_count(), 1);

    // The result is readable back through the cache under the same key.
    let cached = session.last_results().expect("cached");
    assert_eq!(cached.objects, results);
    assert_eq!(cached.query, "rust");
}

#[tokio::test]
async fn same_trimmed_length_edit_holds() {
    let transport = Arc::new(FakeTransport::new());
    let mut session = session_with(transport.clone());

    transport.push_json(200, json!({ "data": [] }));
    session.on_input("rust").await.unwrap();
    assert_eq!(transport.request_count(), 1);

    assert!(session.on_input("ruby").await.unwrap().is_none());
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn manual_confirm_requeries_when_armed() {
    let transport = Arc::new(FakeTransport::new());
    let mut session = session_with(transport.clone());

    transport.push_json(200, json!({ "data": [] }));
    session.on_input("rust").await.unwrap();

    transport.push_json(200, json!({ "data": [{ "id": "post-1" }] }));
    let results = session.confirm().await.unwrap().expect("manual re-query");
    assert_eq!(results.len(), 1);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn confirm_without_an_armed_gate_does_nothing() {
    let transport = Arc::new(FakeTransport::new());
    let mut session = session_with(transport.clone());

    session.on_input("ab").await.unwrap();
    assert!(session.confirm().await.unwrap().is_none());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn switching_content_type_forces_a_query() {
    let transport = Arc::new(FakeTransport::new());
    let mut session = session_with(transport.clone());

    transport.push_json(200, json!({ "data": [] }));
    session.on_input("rust").await.unwrap();

    transport.push_json(200, json!({ "data": [{ "id": "prod-1" }] }));
    let results = session
        .select_content_type("product")
        .await
        .unwrap()
        .expect("type switch queries");
    assert_eq!(results.len(), 1);
    assert_eq!(session.content_type(), "product");

    // The query went to the new type's endpoint.
    let request = transport.last_request();
    assert!(request.url.path().ends_with("/v1/content/product"));
    assert_eq!(
        query_param(&request, "filters").as_deref(),
        Some(r#"{"*":{"type":"contains","filter":"rust"}}"#)
    );
}

#[tokio::test]
async fn switching_content_type_with_short_input_stays_quiet() {
    let transport = Arc::new(FakeTransport::new());
    let mut session = session_with(transport.clone());

    session.on_input("ab").await.unwrap();
    assert!(session.select_content_type("product").await.unwrap().is_none());
    assert_eq!(transport.request_count(), 0);

    // But the switch armed the gate, so a manual confirm would now be
    // honored once the input is long enough.
    assert!(session.gate().confirm());
}

#[tokio::test]
async fn reselecting_the_same_type_is_a_no_op() {
    let transport = Arc::new(FakeTransport::new());
    let mut session = session_with(transport.clone());

    transport.push_json(200, json!({ "data": [] }));
    session.on_input("rust").await.unwrap();
    assert!(session.select_content_type("blogpost").await.unwrap().is_none());
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn truncated_input_queries_with_fifty_chars() {
    let transport = Arc::new(FakeTransport::new());
    let mut session = session_with(transport.clone());

    transport.push_json(200, json!({ "data": [] }));
    let long = "x".repeat(80);
    session.on_input(&long).await.unwrap().expect("query fires");

    let request = transport.last_request();
    let filters = query_param(&request, "filters").unwrap();
    assert!(filters.contains(&"x".repeat(50)));
    assert!(!filters.contains(&"x".repeat(51)));
}

#[tokio::test]
async fn failures_propagate_and_clear_the_in_flight_flag() {
    let transport = Arc::new(FakeTransport::new());
    let mut session = session_with(transport.clone());

    transport.push_error("connection refused");
    match session.on_input("rust").await {
        Err(ApiError::Transport(_)) => {}
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(!session.is_in_flight());

    // The session recovers: the next qualifying input queries again.
    transport.push_json(200, json!({ "data": [] }));
    assert!(session.on_input("rust async").await.unwrap().is_some());
}

#[tokio::test]
async fn search_miss_renders_as_empty_results() {
    let transport = Arc::new(FakeTransport::new());
    let mut session = session_with(transport.clone());

    transport.push_json(404, json!({ "error": "Content type not found" }));
    let results = session.on_input("rust").await.unwrap().expect("query fires");
    assert!(results.is_empty());
    assert_eq!(session.last_results().unwrap().objects.len(), 0);
}
