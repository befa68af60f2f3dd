use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use umbriel::visibility::sink::{apply_directives, DocumentHead};
use umbriel::visibility::types::Group;
use umbriel::visibility::{loader, resolver, web, VisibilityState};

/// Write a rules directory and field registry matching a small forum setup:
/// "Favorite Color" gated by group names, "Discord Handle" by group ids.
fn write_fixtures(dir: &TempDir) -> (PathBuf, PathBuf) {
    let rules_dir = dir.path().join("rules");
    std::fs::create_dir(&rules_dir).unwrap();
    std::fs::write(
        rules_dir.join("visibility.kdl"),
        r#"
field "Favorite Color" allowed-groups="staff|vip"

rule "Discord Handle" {
    allowed-groups {
        - 12
    }
}
"#,
    )
    .unwrap();

    let registry = dir.path().join("user_fields.json");
    std::fs::write(
        &registry,
        r#"{
  "user_fields": [
    {"id": 7, "name": "Favorite Color"},
    {"id": 9, "name": "Discord Handle", "dasherized_name": "discord-handle"}
  ]
}"#,
    )
    .unwrap();

    (rules_dir, registry)
}

fn vip() -> Vec<Group> {
    vec![Group {
        id: 12,
        name: "vip".into(),
    }]
}

#[test]
fn test_load_resolve_apply_end_to_end() {
    let dir = TempDir::new().unwrap();
    let (rules_dir, registry) = write_fixtures(&dir);

    let state = loader::load_state(&rules_dir, &registry).unwrap();
    assert_eq!(state.fields.len(), 2);
    assert_eq!(state.rules.len(), 2);

    // vip satisfies both rules: one hide + one show per field
    let directives = resolver::resolve(&vip(), &state.fields, &state.rules);
    let ids: Vec<String> = directives.iter().map(|d| d.element_id()).collect();
    assert_eq!(
        ids,
        vec!["hide-7", "show-7-rule-0", "hide-9", "show-9-rule-1"]
    );

    let mut head = DocumentHead::new();
    apply_directives(&mut head, &directives);
    let html = head.to_html();
    assert!(html.contains("<style id=\"hide-7\">"));
    assert!(html.contains("<style id=\"show-9-rule-1\">"));
    assert!(html.contains(".public-user-field.favorite-color { display: none !important; }"));
    assert!(html.contains(".user-field-9 { display: block !important; }"));

    // re-running initialization replaces rather than accumulates
    apply_directives(&mut head, &directives);
    assert_eq!(head.len(), 4);
}

#[test]
fn test_anonymous_viewer_sees_hides_only() {
    let dir = TempDir::new().unwrap();
    let (rules_dir, registry) = write_fixtures(&dir);
    let state = loader::load_state(&rules_dir, &registry).unwrap();

    let directives = resolver::resolve(&[], &state.fields, &state.rules);
    let ids: Vec<String> = directives.iter().map(|d| d.element_id()).collect();
    assert_eq!(ids, vec!["hide-7", "hide-9"]);
}

#[test]
fn test_missing_registry_yields_no_directives() {
    let dir = TempDir::new().unwrap();
    let (rules_dir, _) = write_fixtures(&dir);

    let state = loader::load_state(&rules_dir, &dir.path().join("absent.json")).unwrap();
    assert!(resolver::resolve(&vip(), &state.fields, &state.rules).is_empty());
}

fn test_state() -> Arc<VisibilityState> {
    let dir = TempDir::new().unwrap();
    let (rules_dir, registry) = write_fixtures(&dir);
    Arc::new(loader::load_state(&rules_dir, &registry).unwrap())
}

#[tokio::test]
async fn test_healthz() {
    let app = web::router(test_state());
    let resp = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_resolve_endpoint_returns_directives() {
    let app = web::router(test_state());
    let body = serde_json::json!({ "groups": [{"id": 12, "name": "vip"}] });
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/resolve")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let directives = json["directives"].as_array().unwrap();
    assert_eq!(directives.len(), 4);
    assert_eq!(directives[0]["id"], "hide-7");
    assert_eq!(directives[0]["display"], "hidden");
    assert_eq!(directives[1]["id"], "show-7-rule-0");
    assert_eq!(directives[1]["display"], "shown");
    assert_eq!(directives[1]["rule_index"], 0);
}

#[tokio::test]
async fn test_resolve_endpoint_anonymous_viewer() {
    let app = web::router(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/resolve")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"groups": []}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let directives = json["directives"].as_array().unwrap();
    assert_eq!(directives.len(), 2);
    assert!(directives.iter().all(|d| d["display"] == "hidden"));
}

#[tokio::test]
async fn test_stylesheet_endpoint_renders_css() {
    let app = web::router(test_state());
    let body = serde_json::json!({ "groups": [{"id": 3, "name": "staff"}] });
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/stylesheet")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "text/css; charset=utf-8"
    );

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let css = String::from_utf8(bytes.to_vec()).unwrap();

    // staff matches the name-based rule but not group id 12
    assert!(css.contains("/* hide-7 */"));
    assert!(css.contains("/* show-7-rule-0 */"));
    assert!(css.contains("/* hide-9 */"));
    assert!(!css.contains("show-9"));

    // hide precedes show for the same field
    assert!(css.find("/* hide-7 */").unwrap() < css.find("/* show-7-rule-0 */").unwrap());
}
