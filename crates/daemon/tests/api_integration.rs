//! Drives the API router end to end without binding a socket

use axum::body::Body;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use http::{HeaderMap, Method, Request, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use shelf_daemon::http_server;
use shelf_daemon::{AuthConfig, ServiceState};

const BOOTSTRAP: &str = "first-run-secret";

struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

fn setup(protect_documents: bool) -> (Router, TempDir) {
    let temp = TempDir::new().unwrap();
    let auth_path = temp.path().join("auth");
    std::fs::create_dir_all(&auth_path).unwrap();

    let auth = AuthConfig {
        bootstrap_token: Some(BOOTSTRAP.to_string()),
        hash_cost: 4,
        protect_documents,
        ..Default::default()
    };
    let state = ServiceState::open(&temp.path().join("database"), &auth_path, &auth).unwrap();
    let config = http_server::Config::new("127.0.0.1:0".parse().unwrap());

    (http_server::router(config, state), temp)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    auth: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("accept", "application/json");
    if let Some(auth) = auth {
        builder = builder.header(AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    Response {
        status,
        headers,
        body,
    }
}

/// Register `handle` through the bootstrap secret and log it in
async fn bootstrap_admin(app: &Router, handle: &str) -> String {
    let registered = send(
        app,
        Method::POST,
        "/api/v0/admin/register",
        Some(json!({"identity": handle, "password": "pw", "token": BOOTSTRAP})),
        None,
    )
    .await;
    assert_eq!(registered.status, StatusCode::OK);

    let login = send(
        app,
        Method::POST,
        "/api/v0/admin/login",
        Some(json!({"identity": handle, "password": "pw"})),
        None,
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
    login.body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_notes_over_http() {
    let (app, _temp) = setup(false);

    let created = send(
        &app,
        Method::POST,
        "/api/v0/collections",
        Some(json!({"name": "notes"})),
        None,
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let collection = created.body["collection"].as_str().unwrap().to_string();
    assert_eq!(created.body["config"]["slug"], "notes");

    let records = format!("/api/v0/collection/{collection}");
    let record = send(&app, Method::POST, &records, Some(json!({"title": "a"})), None).await;
    assert_eq!(record.status, StatusCode::CREATED);
    let id = record.body["id"].as_str().unwrap().to_string();

    let listed = send(&app, Method::GET, &records, None, None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["count"], 1);
    assert_eq!(listed.body["items"][0]["body"]["title"], "a");

    let item = format!("{records}/{id}");
    let updated = send(&app, Method::PATCH, &item, Some(json!({"title": "b"})), None).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["title"], "b");

    let read = send(&app, Method::GET, &item, None, None).await;
    assert_eq!(read.body, json!({"title": "b"}));

    let info = send(
        &app,
        Method::GET,
        &format!("/api/v0/collections/{collection}"),
        None,
        None,
    )
    .await;
    assert_eq!(info.body["count"], 1);
    assert_eq!(info.body["config"]["name"], "notes");

    assert_eq!(
        send(&app, Method::DELETE, &item, None, None).await.status,
        StatusCode::OK
    );
    let gone = send(&app, Method::GET, &item, None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["error"], "not_found");
}

#[tokio::test]
async fn test_collection_management() {
    let (app, _temp) = setup(false);

    let upserted = send(
        &app,
        Method::PUT,
        "/api/v0/collections/inbox",
        Some(json!({"name": "Inbox"})),
        None,
    )
    .await;
    assert_eq!(upserted.status, StatusCode::OK);
    assert!(upserted.body["config"]["updated"].is_string());
    assert!(upserted.body["config"]["created"].is_string());

    send(
        &app,
        Method::PUT,
        "/api/v0/collections/archive",
        Some(json!({"name": "Archive"})),
        None,
    )
    .await;

    let taken = send(
        &app,
        Method::POST,
        "/api/v0/collections/inbox/rename",
        Some(json!({"to": "archive"})),
        None,
    )
    .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);
    assert_eq!(taken.body["error"], "already_exists");

    let renamed = send(
        &app,
        Method::POST,
        "/api/v0/collections/inbox/rename",
        Some(json!({"to": "old-inbox"})),
        None,
    )
    .await;
    assert_eq!(renamed.status, StatusCode::OK);

    let listed = send(&app, Method::GET, "/api/v0/collections", None, None).await;
    assert_eq!(listed.body["collections"], json!(["archive", "old-inbox"]));

    let deleted = send(&app, Method::DELETE, "/api/v0/collections/archive", None, None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    let again = send(&app, Method::DELETE, "/api/v0/collections/archive", None, None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_input_maps_to_400() {
    let (app, temp) = setup(false);

    let hidden = send(&app, Method::GET, "/api/v0/collections/.hidden", None, None).await;
    assert_eq!(hidden.status, StatusCode::BAD_REQUEST);
    assert_eq!(hidden.body["error"], "invalid_name");

    let empty = send(
        &app,
        Method::POST,
        "/api/v0/collections",
        Some(json!({"name": "  "})),
        None,
    )
    .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.body["error"], "invalid_format");

    let not_object = send(
        &app,
        Method::POST,
        "/api/v0/collection/notes",
        Some(json!([1, 2, 3])),
        None,
    )
    .await;
    assert_eq!(not_object.status, StatusCode::BAD_REQUEST);
    assert_eq!(not_object.body["error"], "invalid_format");

    let missing = send(&app, Method::GET, "/api/v0/collection/nothing", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    // a stray file under the root is not a collection
    std::fs::write(temp.path().join("database").join("stray"), b"{}").unwrap();
    let stray = send(&app, Method::GET, "/api/v0/collections/stray", None, None).await;
    assert_eq!(stray.status, StatusCode::NOT_FOUND);
    let stray_records = send(&app, Method::GET, "/api/v0/collection/stray", None, None).await;
    assert_eq!(stray_records.status, StatusCode::NOT_FOUND);
    assert_eq!(stray_records.body["error"], "not_found");
}

#[tokio::test]
async fn test_login_check_and_rate_limit() {
    let (app, _temp) = setup(false);
    let token = bootstrap_admin(&app, "alice").await;

    let ok = send(
        &app,
        Method::POST,
        "/api/v0/admin/check",
        Some(json!({"username": "alice", "token": token})),
        None,
    )
    .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["user"], "alice");

    let wrong = send(
        &app,
        Method::POST,
        "/api/v0/admin/login",
        Some(json!({"identity": "alice", "password": "nope"})),
        None,
    )
    .await;
    assert_eq!(wrong.status, StatusCode::FORBIDDEN);
    assert_eq!(wrong.body["error"], "unauthorized");

    // one successful and one failed attempt spent, one left in the burst
    let third = send(
        &app,
        Method::POST,
        "/api/v0/admin/login",
        Some(json!({"identity": "alice", "password": "pw"})),
        None,
    )
    .await;
    assert_eq!(third.status, StatusCode::OK);

    let limited = send(
        &app,
        Method::POST,
        "/api/v0/admin/login",
        Some(json!({"identity": "alice", "password": "pw"})),
        None,
    )
    .await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(limited.body["error"], "rate_limited");
    assert!(limited.headers.contains_key(RETRY_AFTER));

    let forged = send(
        &app,
        Method::POST,
        "/api/v0/admin/check",
        Some(json!({"username": "alice", "token": "forged"})),
        None,
    )
    .await;
    assert_eq!(forged.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invites_gate_registration() {
    let (app, _temp) = setup(false);
    let token = bootstrap_admin(&app, "root").await;

    let second_bootstrap = send(
        &app,
        Method::POST,
        "/api/v0/admin/register",
        Some(json!({"identity": "eve", "password": "pw", "token": BOOTSTRAP})),
        None,
    )
    .await;
    assert_eq!(second_bootstrap.status, StatusCode::FORBIDDEN);

    let unauthenticated = send(&app, Method::POST, "/api/v0/admin/invite", None, None).await;
    assert_eq!(unauthenticated.status, StatusCode::UNAUTHORIZED);

    let bearer = format!("Bearer root:{token}");
    let invite = send(&app, Method::POST, "/api/v0/admin/invite", None, Some(&bearer)).await;
    assert_eq!(invite.status, StatusCode::CREATED);
    let code = invite.body["code"].as_str().unwrap().to_string();

    let register = json!({"identity": "carol", "password": "pw", "name": "Carol", "token": code});
    let created = send(
        &app,
        Method::POST,
        "/api/v0/customer/register",
        Some(register.clone()),
        None,
    )
    .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["user"], "carol");

    let reused = send(
        &app,
        Method::POST,
        "/api/v0/customer/register",
        Some(register),
        None,
    )
    .await;
    assert_eq!(reused.status, StatusCode::FORBIDDEN);

    let no_customer_invites = send(
        &app,
        Method::POST,
        "/api/v0/customer/invite",
        None,
        Some(&bearer),
    )
    .await;
    assert_eq!(no_customer_invites.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_protected_documents() {
    let (app, _temp) = setup(true);
    let token = bootstrap_admin(&app, "root").await;

    let anonymous = send(&app, Method::GET, "/api/v0/collections", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let forged = send(
        &app,
        Method::GET,
        "/api/v0/collections",
        None,
        Some("Bearer root:forged"),
    )
    .await;
    assert_eq!(forged.status, StatusCode::FORBIDDEN);

    let bearer = format!("Bearer root:{token}");
    let allowed = send(&app, Method::GET, "/api/v0/collections", None, Some(&bearer)).await;
    assert_eq!(allowed.status, StatusCode::OK);

    let password = send(&app, Method::GET, "/api/v0/collections", None, Some("root:pw")).await;
    assert_eq!(password.status, StatusCode::OK);

    // auth routes stay reachable
    let login = send(
        &app,
        Method::POST,
        "/api/v0/admin/check",
        Some(json!({"username": "root", "token": token})),
        None,
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_status_routes() {
    let (app, _temp) = setup(false);

    assert_eq!(
        send(&app, Method::GET, "/_status/livez", None, None).await.status,
        StatusCode::OK
    );
    assert_eq!(
        send(&app, Method::GET, "/_status/readyz", None, None).await.status,
        StatusCode::OK
    );
    let version = send(&app, Method::GET, "/_status/version", None, None).await;
    assert_eq!(version.body["name"], "shelf-daemon");

    let unknown = send(&app, Method::GET, "/nowhere", None, None).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.body["error"], "not_found");
}
