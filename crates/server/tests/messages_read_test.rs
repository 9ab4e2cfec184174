mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{remote_message, FakeNetwork};
use std::sync::Arc;

async fn setup() -> (TestServer, sqlx::SqlitePool, Arc<FakeNetwork>) {
    let pool = common::setup_test_db().await;
    let network = Arc::new(FakeNetwork::default());
    let app = common::create_test_app(pool.clone(), network.clone());
    let server = TestServer::new(app).unwrap();
    (server, pool, network)
}

#[tokio::test]
async fn uncached_room_is_fetched_and_cached_in_order() {
    let (server, pool, network) = setup().await;
    // the network lists newest first
    network.seed(
        "T1",
        vec![
            remote_message("hash-b", "0xbob", 200.0, "second"),
            remote_message("hash-a", "0xalice", 100.0, "first"),
        ],
    );

    let res = server.get("/api/messages/T1").await;

    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "hash-a");
    assert_eq!(items[0]["queryId"], "T1");
    assert_eq!(items[0]["content"], "first");
    assert_eq!(items[0]["sender"], "0xalice");
    assert_eq!(items[0]["timestamp"], "1970-01-01T00:01:40Z");
    assert_eq!(items[1]["id"], "hash-b");
    assert_eq!(items[1]["timestamp"], "1970-01-01T00:03:20Z");

    assert_eq!(network.fetch_count(), 1);
    assert_eq!(common::cached_count(&pool, "T1").await, 2);
}

#[tokio::test]
async fn cached_room_does_not_touch_network() {
    let (server, pool, network) = setup().await;
    network.seed("T1", vec![remote_message("hash-a", "0xalice", 100.0, "first")]);

    server.get("/api/messages/T1").await.assert_status_ok();
    assert_eq!(network.fetch_count(), 1);

    // remote log grows behind our back; the cache stays authoritative
    network.seed(
        "T1",
        vec![
            remote_message("hash-a", "0xalice", 100.0, "first"),
            remote_message("hash-c", "0xcarol", 300.0, "third"),
        ],
    );

    let res = server.get("/api/messages/T1").await;
    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(network.fetch_count(), 1);
    assert_eq!(common::cached_count(&pool, "T1").await, 1);
}

#[tokio::test]
async fn empty_remote_leaves_room_uncached() {
    let (server, pool, network) = setup().await;

    let res = server.get("/api/messages/T2").await;
    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body, serde_json::json!([]));
    assert_eq!(common::cached_count(&pool, "T2").await, 0);

    server.get("/api/messages/T2").await.assert_status_ok();
    assert_eq!(network.fetch_count(), 2);
}

#[tokio::test]
async fn remote_failure_returns_500_and_retries_next_read() {
    let (server, pool, network) = setup().await;
    network.set_fail_fetch(true);

    let res = server.get("/api/messages/T1").await;
    res.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json();
    assert_eq!(body["error"], "Failed to fetch messages");
    assert_eq!(common::cached_count(&pool, "T1").await, 0);

    network.set_fail_fetch(false);
    network.seed("T1", vec![remote_message("hash-a", "0xalice", 100.0, "first")]);

    let res = server.get("/api/messages/T1").await;
    res.assert_status_ok();
    assert_eq!(network.fetch_count(), 2);
    assert_eq!(common::cached_count(&pool, "T1").await, 1);
}

#[tokio::test]
async fn rooms_are_partitioned() {
    let (server, _pool, network) = setup().await;
    network.seed("T1", vec![remote_message("hash-a", "0xalice", 100.0, "for t1")]);
    network.seed("T2", vec![remote_message("hash-b", "0xbob", 100.0, "for t2")]);

    let t1: serde_json::Value = server.get("/api/messages/T1").await.json();
    let t2: serde_json::Value = server.get("/api/messages/T2").await.json();

    assert_eq!(t1[0]["content"], "for t1");
    assert_eq!(t2[0]["content"], "for t2");
    assert_eq!(t1.as_array().unwrap().len(), 1);
    assert_eq!(t2.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn cached_reads_sort_by_timestamp_then_insertion() {
    let (server, pool, network) = setup().await;

    for (id, ts) in [("late", 3_000_i64), ("tie-1", 2_000), ("early", 1_000), ("tie-2", 2_000)] {
        sqlx::query(
            "INSERT INTO messages (id, room_id, content, sender, timestamp) VALUES (?, 'T9', 'x', 'alice', ?)",
        )
        .bind(id)
        .bind(ts)
        .execute(&pool)
        .await
        .unwrap();
    }

    let body: serde_json::Value = server.get("/api/messages/T9").await.json();
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["early", "tie-1", "tie-2", "late"]);
    assert_eq!(network.fetch_count(), 0);
}

#[tokio::test]
async fn invalid_room_id_is_rejected() {
    let (server, _pool, network) = setup().await;

    let res = server.get("/api/messages/has%20space").await;

    res.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(network.fetch_count(), 0);
}
