//! HubClient against an in-process fake hub.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use mcphub_core::{HubApiPort, ServerStatus};
use mcphub_runtime::{HubClient, HubClientConfig};
use serde_json::{Value, json};

type Calls = Arc<Mutex<Vec<String>>>;

fn server_name(body: &Value) -> String {
    body["server_name"].as_str().unwrap_or_default().to_string()
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "servers": [
            {
                "name": "files",
                "status": "connected",
                "type": "stdio",
                "tools": [{ "name": "read_file", "description": null }],
                "resources": [],
                "prompts": []
            },
            { "name": "search", "status": "disconnected", "disabled": true }
        ]
    }))
}

async fn servers() -> Json<Value> {
    Json(json!({ "servers": [{ "name": "files", "status": "connecting" }] }))
}

async fn start(State(calls): State<Calls>, Json(body): Json<Value>) -> Json<Value> {
    calls.lock().unwrap().push(format!("start {}", server_name(&body)));
    Json(json!({ "status": "ok" }))
}

async fn stop(
    State(calls): State<Calls>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let disable = query.get("disable").map_or("-", String::as_str);
    calls
        .lock()
        .unwrap()
        .push(format!("stop {} disable={disable}", server_name(&body)));
    Json(json!({ "status": "ok" }))
}

async fn refresh() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn restart() -> &'static str {
    "restarting"
}

async fn spawn_fake_hub() -> (SocketAddr, Calls) {
    let calls: Calls = Arc::default();
    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/servers", get(servers))
        .route("/api/servers/start", post(start))
        .route("/api/servers/stop", post(stop))
        .route("/api/servers/refresh", post(refresh))
        .route("/api/restart", post(restart))
        .with_state(calls.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, calls)
}

fn client_for(addr: SocketAddr) -> HubClient {
    HubClient::new(HubClientConfig {
        host: "127.0.0.1".to_string(),
        port: addr.port(),
        read_timeout: Duration::from_secs(2),
        write_timeout: Duration::from_secs(2),
    })
    .unwrap()
}

#[tokio::test]
async fn health_decodes_roster() {
    let (addr, _) = spawn_fake_hub().await;
    let client = client_for(addr);

    let snapshot = client.health().await.expect("health payload");
    assert_eq!(snapshot.hub_status(), Some("ok"));
    assert_eq!(snapshot.servers.len(), 2);

    let files = &snapshot.servers[0];
    assert_eq!(files.status, ServerStatus::Connected);
    assert_eq!(files.transport().to_string(), "stdio");
    assert_eq!(files.tools[0].description, "");

    let search = &snapshot.servers[1];
    assert!(search.disabled);
    assert_eq!(search.display_status(), ServerStatus::Disabled);
}

#[tokio::test]
async fn list_servers_accepts_wrapped_payload() {
    let (addr, _) = spawn_fake_hub().await;
    let servers = client_for(addr).list_servers().await.unwrap();
    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0].status, ServerStatus::Connecting);
}

#[tokio::test]
async fn mutating_calls_send_server_name_and_disable_flag() {
    let (addr, calls) = spawn_fake_hub().await;
    let client = client_for(addr);

    assert!(client.start_server("files").await.is_some());
    assert!(client.stop_server("files", true).await.is_some());
    assert!(client.stop_server("search", false).await.is_some());

    assert_eq!(
        *calls.lock().unwrap(),
        [
            "start files",
            "stop files disable=true",
            "stop search disable=-"
        ]
    );
}

#[tokio::test]
async fn error_status_and_non_json_body_yield_none() {
    let (addr, _) = spawn_fake_hub().await;
    let client = client_for(addr);

    assert!(client.refresh_server("files").await.is_none());
    assert!(client.restart_hub().await.is_none());
}

#[tokio::test]
async fn set_port_retargets_subsequent_calls() {
    let (addr, _) = spawn_fake_hub().await;
    let client = client_for(addr);
    assert!(client.health().await.is_some());

    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed_port = closed.local_addr().unwrap().port();
    drop(closed);

    client.set_port(closed_port);
    assert!(client.health().await.is_none());

    client.set_port(addr.port());
    assert!(client.health().await.is_some());
}
