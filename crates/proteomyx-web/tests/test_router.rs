//! Router tests against a mock expansion service.
//!
//! Run with: cargo test --package proteomyx-web --test test_router

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use proteomyx_config::Config;
use proteomyx_web::router::build_router;
use proteomyx_web::state::AppState;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(server: &MockServer) -> Router {
    let mut config = Config::default();
    config.expansion.base_url = Some(server.uri());
    config.expansion.timeout_secs = 5;
    build_router(AppState::new(config).unwrap())
}

fn sample_network() -> Value {
    json!({
        "directed": false,
        "multigraph": false,
        "nodes": [
            { "id": "PLN", "Drugbank_data": { "Name": ["Digoxin"] } },
            { "id": "SLN" },
            { "id": "ATP2A2" }
        ],
        "links": [
            { "source": "PLN", "target": "ATP2A2", "combined_score": 999 },
            { "source": "SLN", "target": "ATP2A2", "combined_score": 300, "experiments": 120 }
        ]
    })
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

/// Polls the session until its phase leaves `loading`.
async fn settled(app: &Router, id: &str) -> Value {
    for _ in 0..100 {
        let (_, snap) = send(app, get(&format!("/api/sessions/{}", id))).await;
        if snap["phase"]["state"] != "loading" {
            return snap;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("session {} never settled", id);
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let app = app_for(&server);
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 0);
    assert_eq!(body["expansion_service"], format!("{}/flaskapi/api", server.uri()));
}

#[tokio::test]
async fn test_proxy_passes_network_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaskapi/api/return_network/PLN,SLN/PageRank/string/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_network()))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server);
    let (status, body) = send(
        &app,
        get("/network?seeds=PLN,SLN&expansionMethod=PageRank&interactome=string"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, sample_network());
}

#[tokio::test]
async fn test_proxy_alias_and_default_tags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaskapi/api/return_network/TP53/default/default/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nodes": [], "links": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server);
    let (status, body) = send(&app, get("/api/protein-network?seeds=TP53")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "nodes": [], "links": [] }));
}

#[tokio::test]
async fn test_proxy_upstream_failure_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = app_for(&server);
    let (status, body) = send(&app, get("/network?seeds=PLN&expansionMethod=PageRank&interactome=string")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch protein network" }));
}

#[tokio::test]
async fn test_proxy_requires_seeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_network()))
        .expect(0)
        .mount(&server)
        .await;

    let app = app_for(&server);
    let (status, body) = send(&app, get("/network?expansionMethod=PageRank")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("seed"));

    let (status, _) = send(&app, get("/network?seeds=,,")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_exploration_flow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaskapi/api/return_network/PLN,SLN/PageRank/string/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_network()))
        .expect(1)
        .mount(&server)
        .await;
    let app = app_for(&server);

    let (status, snap) = send(&app, empty("POST", "/api/sessions")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(snap["phase"]["state"], "idle");
    assert_eq!(snap["show_prompt"], true);
    let id = snap["id"].as_str().unwrap().to_string();
    let base = format!("/api/sessions/{}", id);

    let (status, snap) = send(
        &app,
        with_json("PUT", &format!("{}/recipe", base), json!({ "seeds": "pln, sln" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snap["phase"]["state"], "loading");

    let snap = settled(&app, &id).await;
    assert_eq!(snap["phase"]["state"], "ready");
    assert_eq!(snap["network"]["complete"]["edge_count"], 2);
    assert_eq!(snap["network"]["filtered"]["links"].as_array().unwrap().len(), 2);
    assert_eq!(snap["network"]["hints"]["nodes"][0]["label"], "PLN 💊 1");

    let (status, snap) = send(
        &app,
        with_json("PUT", &format!("{}/threshold", base), json!({ "value": 400 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snap["network"]["filtered"]["links"].as_array().unwrap().len(), 1);
    assert_eq!(snap["network"]["filtered"]["nodes"].as_array().unwrap().len(), 2);

    let (_, snap) = send(&app, empty("POST", &format!("{}/threshold/bin/0", base))).await;
    assert_eq!(snap["threshold"], 0.0);
    let (_, snap) = send(&app, empty("DELETE", &format!("{}/threshold", base))).await;
    assert_eq!(snap["network"]["filtered"]["links"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, get(&format!("{}/details", base))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, snap) = send(
        &app,
        with_json("PUT", &format!("{}/selection", base), json!({ "node_id": "PLN" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snap["selection"]["details_open"], true);
    let (status, details) = send(&app, get(&format!("{}/details", base))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["id"], "PLN");
    assert_eq!(details["drugbank"], json!(["Digoxin"]));

    let (_, snap) = send(&app, empty("DELETE", &format!("{}/selection", base))).await;
    assert_eq!(snap["selection"]["details_open"], false);
    assert_eq!(snap["selection"]["node_id"], "PLN");

    let (_, notes) = send(&app, get(&format!("{}/notifications", base))).await;
    assert_eq!(notes, json!([]));

    let (status, _) = send(&app, empty("DELETE", &base)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, get(&base)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_fetch_failure_notifies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let app = app_for(&server);

    let (_, snap) = send(&app, empty("POST", "/api/sessions")).await;
    let id = snap["id"].as_str().unwrap().to_string();
    let base = format!("/api/sessions/{}", id);

    send(&app, with_json("PUT", &format!("{}/recipe", base), json!({ "seeds": ["tp53"] }))).await;
    let snap = settled(&app, &id).await;
    assert_eq!(snap["phase"]["state"], "error");
    assert_eq!(snap["network"], Value::Null);
    assert_eq!(snap["pending_notifications"], 1);

    let (_, notes) = send(&app, get(&format!("{}/notifications", base))).await;
    assert_eq!(notes.as_array().unwrap().len(), 1);
    assert_eq!(
        notes[0]["message"],
        "Failed to fetch protein network. Please try again later."
    );
    let (_, notes) = send(&app, get(&format!("{}/notifications", base))).await;
    assert_eq!(notes, json!([]));

    let (status, snap) = send(&app, empty("POST", &format!("{}/refresh", base))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snap["phase"]["state"], "loading");
    assert_eq!(snap["generation"], 2);
}

#[tokio::test]
async fn test_session_bad_input() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    let (status, body) = send(&app, get(&format!("/api/sessions/{}", uuid::Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("Session not found"));

    let (status, body) = send(&app, get("/api/sessions/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, snap) = send(&app, empty("POST", "/api/sessions")).await;
    let base = format!("/api/sessions/{}", snap["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        with_json("PUT", &format!("{}/threshold", base), json!({ "value": 1500 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        with_json("PUT", &format!("{}/threshold", base), json!({ "value": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, empty("POST", &format!("{}/threshold/bin/20", base))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, empty("POST", &format!("{}/threshold/bin/first", base))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, empty("POST", &format!("{}/refresh", base))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        with_json("PUT", &format!("{}/recipe", base), json!({ "seeds": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        with_json("PUT", &format!("{}/selection", base), json!({ "node_id": "PLN" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_bodies_are_json_400s() {
    let server = MockServer::start().await;
    let app = app_for(&server);
    let (_, snap) = send(&app, empty("POST", "/api/sessions")).await;
    let base = format!("/api/sessions/{}", snap["id"].as_str().unwrap());

    let truncated = Request::builder()
        .method("PUT")
        .uri(format!("{}/recipe", base))
        .header("content-type", "application/json")
        .body(Body::from(r#"{"seeds": "#))
        .unwrap();
    let (status, body) = send(&app, truncated).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        with_json("PUT", &format!("{}/recipe", base), json!({ "seeds": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let no_content_type = Request::builder()
        .method("PUT")
        .uri(format!("{}/selection", base))
        .body(Body::from(r#"{"node_id": null}"#))
        .unwrap();
    let (status, body) = send(&app, no_content_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Nothing was fetched or changed
    let (_, snap) = send(&app, get(&base)).await;
    assert_eq!(snap["phase"]["state"], "idle");
}
