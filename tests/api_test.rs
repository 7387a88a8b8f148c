use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

use indieserv::api::models::{EntryView, MentionAccepted, ProfileView};
use indieserv::api::{AppState, router};
use indieserv::config::Config;
use indieserv::store::BlogStore;

const TOKEN: &str = "test-admin-token";
const BASE: &str = "https://blog.example";

/// Creates a minimal config for testing, bypassing file-based loading
fn create_test_config(base_url: &str) -> Config {
    let config_toml = format!(
        r#"
[server]
max_body_bytes = 65536

[site]
base_url = "{base_url}"
entry_path_prefix = "/post/"
    "#
    );

    let mut config: Config = toml::from_str(&config_toml).expect("Failed to parse test config");
    config.server.admin_token = Some(TOKEN.to_string());
    config
}

/// Builds a test app over a throwaway store
fn build_test_app() -> (Router, TempDir) {
    build_test_app_at(BASE)
}

fn build_test_app_at(base_url: &str) -> (Router, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = BlogStore::open(temp_dir.path().join("blog")).expect("Failed to open test store");
    let state = AppState::new(create_test_config(base_url), store).expect("Failed to build state");
    (router(state), temp_dir)
}

fn authed(builder: axum::http::request::Builder) -> axum::http::request::Builder {
    builder.header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    authed(Request::builder().method(method).uri(uri))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str, with_auth: bool) -> Request<Body> {
    let builder = Request::builder().method("GET").uri(uri);
    let builder = if with_auth { authed(builder) } else { builder };
    builder.body(Body::empty()).unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn publish(app: &Router, body: serde_json::Value) -> EntryView {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/entries", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn test_publish_note_and_fetch() {
    let (app, _temp_dir) = build_test_app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/entries", json!({"content": "hello"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    let created: EntryView = body_json(response).await;

    assert_eq!(created.kind, "note");
    assert_eq!(created.content, "hello");
    assert_eq!(location, format!("{BASE}/post/{}", created.id));

    let response = app
        .oneshot(get(&format!("/post/{}", created.id), false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: EntryView = body_json(response).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_named_submission_becomes_article() {
    let (app, _temp_dir) = build_test_app();
    let created = publish(&app, json!({"name": "A", "content": "long form"})).await;
    assert_eq!(created.kind, "article");
    assert_eq!(created.title.as_deref(), Some("A"));
}

#[tokio::test]
async fn test_listing_hides_drafts_from_readers() {
    let (app, _temp_dir) = build_test_app();
    let note = publish(&app, json!({"content": "hello"})).await;
    let draft = publish(&app, json!({"name": "A", "content": "", "draft": true})).await;

    let response = app.clone().oneshot(get("/entries", false)).await.unwrap();
    let public: Vec<EntryView> = body_json(response).await;
    assert_eq!(public, vec![note.clone()]);

    let response = app.clone().oneshot(get("/entries", true)).await.unwrap();
    let owner: Vec<EntryView> = body_json(response).await;
    assert_eq!(owner, vec![draft.clone(), note]);

    let response = app
        .clone()
        .oneshot(get(&format!("/post/{}", draft.id), false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get(&format!("/post/{}", draft.id), true))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_and_malformed_ids_are_not_found() {
    let (app, _temp_dir) = build_test_app();

    for id in ["AgI", "%21%21"] {
        let response = app
            .clone()
            .oneshot(get(&format!("/post/{id}"), true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_writes_require_token() {
    let (app, _temp_dir) = build_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/entries")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"content": "sneaky"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("POST")
        .uri("/entries")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "Bearer wrong")
        .body(Body::from(r#"{"content": "sneaky"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.oneshot(get("/entries", false)).await.unwrap();
    let listed: Vec<EntryView> = body_json(response).await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_empty_submission_rejected() {
    let (app, _temp_dir) = build_test_app();
    let response = app
        .oneshot(json_request("POST", "/entries", json!({"content": "   "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blank_name_without_content_rejected() {
    let (app, _temp_dir) = build_test_app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/entries", json!({"name": "   ", "content": ""})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/entries", true)).await.unwrap();
    let listed: Vec<EntryView> = body_json(response).await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_mention_of_published_location_under_base_path() {
    let base = "https://blog.example/~andy";
    let (app, _temp_dir) = build_test_app_at(base);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/entries", json!({"content": "hello"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    let created: EntryView = body_json(response).await;
    assert_eq!(location, format!("{base}/post/{}", created.id));

    let mention = json!({
        "source": "https://other.example/reply",
        "target": location,
        "data": {"items": [{"type": ["h-entry"], "properties": {}}]}
    });
    let response = app
        .oneshot(json_request("POST", "/webmention/verified", mention))
        .await
        .unwrap();
    let accepted: MentionAccepted = body_json(response).await;
    assert_eq!(accepted.outcome, "attached");
    assert_eq!(accepted.id.as_deref(), Some(created.id.as_str()));
}

#[tokio::test]
async fn test_verified_mention_attaches_to_note() {
    let (app, _temp_dir) = build_test_app();
    let note = publish(&app, json!({"content": "hello"})).await;

    let mention = json!({
        "source": "https://other.example/reply",
        "target": format!("{BASE}/post/{}", note.id),
        "data": {
            "items": [{
                "type": ["h-entry"],
                "properties": {
                    "content": [{"html": "<p>nice post</p>", "value": "nice post"}],
                    "url": ["https://other.example/reply"]
                }
            }]
        }
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/webmention/verified", mention))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let accepted: MentionAccepted = body_json(response).await;
    assert_eq!(accepted.outcome, "attached");
    assert_eq!(accepted.id.as_deref(), Some(note.id.as_str()));

    let response = app
        .oneshot(get(&format!("/post/{}", note.id), false))
        .await
        .unwrap();
    let fetched: EntryView = body_json(response).await;
    assert_eq!(fetched.mentions.len(), 1);
    assert_eq!(fetched.mentions[0].source, "https://other.example/reply");
    assert_eq!(fetched.mentions[0].content, "nice post");
    assert_eq!(fetched.mentions[0].url, "https://other.example/reply");
}

#[tokio::test]
async fn test_mention_of_non_entry_page() {
    let (app, _temp_dir) = build_test_app();
    let mention = json!({
        "source": "https://other.example/reply",
        "target": format!("{BASE}/"),
        "data": {"items": []}
    });
    let response = app
        .oneshot(json_request("POST", "/webmention/verified", mention))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let accepted: MentionAccepted = body_json(response).await;
    assert_eq!(accepted.outcome, "not_an_entry");
    assert_eq!(accepted.id, None);
}

#[tokio::test]
async fn test_profile_hides_password() {
    let (app, _temp_dir) = build_test_app();

    let response = app.clone().oneshot(get("/profile", false)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let update = json!({
        "name": "Andy",
        "home_url": BASE,
        "github": "andy",
        "host": "blog.example",
        "password": "hunter2"
    });
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/profile", update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/profile", false)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(!String::from_utf8_lossy(&body).contains("hunter2"));
    let profile: ProfileView = serde_json::from_slice(&body).unwrap();
    assert_eq!(profile.name, "Andy");
}

#[tokio::test]
async fn test_health() {
    let (app, _temp_dir) = build_test_app();
    let response = app.oneshot(get("/health", false)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: serde_json::Value = body_json(response).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["components"]["fjall"], "healthy");
}
