mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::{json, Value};
use setlist_backend::domain::models::user::Permission;

async fn create_bundle(app: &TestApp, token: &str, name: &str, parent_id: i64) -> Value {
    let response = app.request("POST", "/api/v1/bundles", Some(token), Some(json!({
        "name": name,
        "parent_id": parent_id
    }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    parse_body(response).await["bundle"].clone()
}

fn song_payload(bundle_id: i64, title: &str, key: &str) -> Value {
    json!({
        "bundle_id": bundle_id,
        "title": title,
        "subtitle": "",
        "key": key,
        "bpm": 72,
        "chord_sheet": {"Verse 1": "G D Em C", "Chorus": "C G D"}
    })
}

#[tokio::test]
async fn test_bundle_tree_and_leaf_removal() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("member@example.com", Permission::Member).await;

    let root = create_bundle(&app, &token, "Hymnal", 0).await;
    let root_id = root["id"].as_i64().unwrap();
    let child = create_bundle(&app, &token, "Advent", root_id).await;
    let child_id = child["id"].as_i64().unwrap();
    assert_eq!(child["parent_id"], root_id);

    let missing_parent = app.request("POST", "/api/v1/bundles", Some(token.as_str()), Some(json!({
        "name": "Orphan",
        "parent_id": 9999
    }))).await;
    assert_eq!(missing_parent.status(), StatusCode::NOT_FOUND);

    let negative_parent = app.request("POST", "/api/v1/bundles", Some(token.as_str()), Some(json!({
        "name": "Negative",
        "parent_id": -1
    }))).await;
    assert_eq!(negative_parent.status(), StatusCode::BAD_REQUEST);

    let not_leaf = app.request("DELETE", &format!("/api/v1/bundles/{}", root_id), Some(token.as_str()), None).await;
    assert_eq!(not_leaf.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(not_leaf).await;
    assert_eq!(body["error"], "given id is not a leaf bundle");

    let leaf = app.request("DELETE", &format!("/api/v1/bundles/{}", child_id), Some(token.as_str()), None).await;
    assert_eq!(leaf.status(), StatusCode::OK);

    let now_leaf = app.request("DELETE", &format!("/api/v1/bundles/{}", root_id), Some(token.as_str()), None).await;
    assert_eq!(now_leaf.status(), StatusCode::OK);

    let listed = parse_body(app.request("GET", "/api/v1/bundles", None, None).await).await;
    assert!(listed["bundles"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_guest_cannot_create_bundles() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("guest@example.com", Permission::Guest).await;

    let response = app.request("POST", "/api/v1/bundles", Some(token.as_str()), Some(json!({"name": "Nope"}))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_song_lifecycle() {
    let app = TestApp::new().await;
    let (member, token) = app.user_with_token("member@example.com", Permission::Member).await;
    let bundle_id = create_bundle(&app, &token, "Worship", 0).await["id"].as_i64().unwrap();

    let created = app.request("POST", "/api/v1/songs", Some(token.as_str()), Some(song_payload(bundle_id, "Amazing Grace", "G"))).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let song = parse_body(created).await["song"].clone();
    let song_id = song["id"].as_i64().unwrap();
    assert_eq!(song["creator_id"], member.id);
    assert_eq!(song["key"], "G");
    assert_eq!(song["chord_sheet"]["Chorus"], "C G D");

    let fetched = parse_body(app.request("GET", &format!("/api/v1/songs/{}", song_id), None, None).await).await;
    assert_eq!(fetched["song"]["title"], "Amazing Grace");

    let mut update = song_payload(bundle_id, "Amazing Grace", "A");
    update["creator_id"] = json!(member.id);
    let updated = app.request("PUT", &format!("/api/v1/songs/{}", song_id), Some(token.as_str()), Some(update)).await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(parse_body(updated).await["song"]["key"], "A");

    let deleted = app.request("DELETE", &format!("/api/v1/songs/{}", song_id), Some(token.as_str()), None).await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let gone = app.request("GET", &format!("/api/v1/songs/{}", song_id), None, None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_song_validation() {
    let app = TestApp::new().await;
    let (member, token) = app.user_with_token("member@example.com", Permission::Member).await;
    let bundle_id = create_bundle(&app, &token, "Worship", 0).await["id"].as_i64().unwrap();

    let bad_key = app.request("POST", "/api/v1/songs", Some(token.as_str()), Some(song_payload(bundle_id, "Bad Key", "H"))).await;
    assert_eq!(bad_key.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(bad_key).await["error"], "invalid key");

    let mut bad_tag = song_payload(bundle_id, "Bad Tag", "C");
    bad_tag["chord_sheet"] = json!({"Refrain": "C F G"});
    let bad_tag = app.request("POST", "/api/v1/songs", Some(token.as_str()), Some(bad_tag)).await;
    assert_eq!(bad_tag.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(bad_tag).await["error"], "Refrain is not a valid tag");

    let missing_bundle = app.request("POST", "/api/v1/songs", Some(token.as_str()), Some(song_payload(9999, "Lost", "C"))).await;
    assert_eq!(missing_bundle.status(), StatusCode::NOT_FOUND);

    let mut other_creator = song_payload(bundle_id, "Ghostwritten", "C");
    other_creator["creator_id"] = json!(member.id + 1);
    let other_creator = app.request("POST", "/api/v1/songs", Some(token.as_str()), Some(other_creator)).await;
    assert_eq!(other_creator.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_song_permissions() {
    let app = TestApp::new().await;
    let (_, owner_token) = app.user_with_token("owner@example.com", Permission::Member).await;
    let (_, other_token) = app.user_with_token("other@example.com", Permission::Member).await;
    let (_, guest_token) = app.user_with_token("guest@example.com", Permission::Guest).await;
    let (_, editor_token) = app.user_with_token("editor@example.com", Permission::Editor).await;

    let bundle_id = create_bundle(&app, &owner_token, "Worship", 0).await["id"].as_i64().unwrap();

    let guest_create = app.request("POST", "/api/v1/songs", Some(guest_token.as_str()), Some(song_payload(bundle_id, "Guest Song", "C"))).await;
    assert_eq!(guest_create.status(), StatusCode::UNAUTHORIZED);

    let created = app.request("POST", "/api/v1/songs", Some(owner_token.as_str()), Some(song_payload(bundle_id, "Owned", "D"))).await;
    let song_id = parse_body(created).await["song"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/songs/{}", song_id);

    let other_delete = app.request("DELETE", &uri, Some(other_token.as_str()), None).await;
    assert_eq!(other_delete.status(), StatusCode::UNAUTHORIZED);

    let guest_delete = app.request("DELETE", &uri, Some(guest_token.as_str()), None).await;
    assert_eq!(guest_delete.status(), StatusCode::UNAUTHORIZED);

    let editor_delete = app.request("DELETE", &uri, Some(editor_token.as_str()), None).await;
    assert_eq!(editor_delete.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_song_filters() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("member@example.com", Permission::Member).await;
    let first = create_bundle(&app, &token, "First", 0).await["id"].as_i64().unwrap();
    let second = create_bundle(&app, &token, "Second", 0).await["id"].as_i64().unwrap();

    for (bundle_id, title, key) in [(first, "Abide With Me", "Eb"), (first, "Above All", "A"), (second, "Be Thou My Vision", "D")] {
        let response = app.request("POST", "/api/v1/songs", Some(token.as_str()), Some(song_payload(bundle_id, title, key))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let titles = |body: Value| -> Vec<String> {
        body["songs"].as_array().unwrap()
            .iter()
            .map(|song| song["title"].as_str().unwrap().to_string())
            .collect()
    };

    let all = parse_body(app.request("GET", "/api/v1/songs", None, None).await).await;
    assert_eq!(titles(all).len(), 3);

    let by_bundle = parse_body(app.request("GET", &format!("/api/v1/songs?bids={}", first), None, None).await).await;
    assert_eq!(titles(by_bundle), vec!["Abide With Me", "Above All"]);

    let by_key = parse_body(app.request("GET", "/api/v1/songs?keys=D,Eb", None, None).await).await;
    assert_eq!(titles(by_key), vec!["Abide With Me", "Be Thou My Vision"]);

    let by_prefix = parse_body(app.request("GET", "/api/v1/songs?title=Ab", None, None).await).await;
    assert_eq!(titles(by_prefix), vec!["Abide With Me", "Above All"]);

    let bad_ids = app.request("GET", "/api/v1/songs?ids=1,x", None, None).await;
    assert_eq!(bad_ids.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_title_filter_matches_wildcards_literally() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("member@example.com", Permission::Member).await;
    let bundle_id = create_bundle(&app, &token, "Modern", 0).await["id"].as_i64().unwrap();

    for title in ["100% Yes", "1000 Voices", "A_B Medley", "AxB Medley"] {
        let response = app.request("POST", "/api/v1/songs", Some(token.as_str()), Some(song_payload(bundle_id, title, "G"))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let titles = |body: Value| -> Vec<String> {
        body["songs"].as_array().unwrap()
            .iter()
            .map(|song| song["title"].as_str().unwrap().to_string())
            .collect()
    };

    let percent = parse_body(app.request("GET", "/api/v1/songs?title=100%25", None, None).await).await;
    assert_eq!(titles(percent), vec!["100% Yes"]);

    let underscore = parse_body(app.request("GET", "/api/v1/songs?title=A_", None, None).await).await;
    assert_eq!(titles(underscore), vec!["A_B Medley"]);

    let lone_underscore = parse_body(app.request("GET", "/api/v1/songs?title=_", None, None).await).await;
    assert!(titles(lone_underscore).is_empty());
}
