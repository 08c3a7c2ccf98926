//! Boards, lists and items over HTTP.

mod common;

use axum::http::StatusCode;
use common::{body_json, create, delete, get, patch_json, post_json, session, titles};
use serde_json::{json, Value};

async fn board(app: &axum::Router, token: &str, title: &str) -> String {
    create(
        app,
        "/api/v1/boards",
        token,
        json!({ "title": title, "text": "", "color": "green" }),
    )
    .await
}

async fn list(app: &axum::Router, token: &str, board_id: &str, title: &str) -> String {
    create(
        app,
        "/api/v1/lists",
        token,
        json!({ "board_id": board_id, "title": title }),
    )
    .await
}

async fn item(app: &axum::Router, token: &str, list_id: &str, title: &str, tags: Value) -> String {
    create(
        app,
        "/api/v1/items",
        token,
        json!({ "list_id": list_id, "title": title, "text": "", "tags": tags }),
    )
    .await
}

async fn board_titles(app: &axum::Router, token: &str) -> Vec<String> {
    let response = get(app, "/api/v1/boards", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    titles(&body_json(response).await["data"])
}

async fn detail(app: &axum::Router, token: &str, board_id: &str) -> Value {
    let response = get(app, &format!("/api/v1/boards/{board_id}"), token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn boards_list_in_creation_order() {
    let app = common::build_test_app().await;
    let token = session(&app, "ada").await;
    for title in ["a", "b", "c"] {
        board(&app, &token, title).await;
    }
    assert_eq!(board_titles(&app, &token).await, ["a", "b", "c"]);
}

#[tokio::test]
async fn invalid_color_is_bad_request() {
    let app = common::build_test_app().await;
    let token = session(&app, "ada").await;
    let response = post_json(
        &app,
        "/api/v1/boards",
        &token,
        json!({ "title": "b", "color": "purple" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn move_board_to_head_and_after() {
    let app = common::build_test_app().await;
    let token = session(&app, "ada").await;
    let a = board(&app, &token, "a").await;
    board(&app, &token, "b").await;
    let c = board(&app, &token, "c").await;

    let response = patch_json(
        &app,
        &format!("/api/v1/boards/{c}/move"),
        &token,
        json!({ "before": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(board_titles(&app, &token).await, ["c", "a", "b"]);

    patch_json(
        &app,
        &format!("/api/v1/boards/{c}/move"),
        &token,
        json!({ "before": a }),
    )
    .await;
    assert_eq!(board_titles(&app, &token).await, ["a", "c", "b"]);
}

#[tokio::test]
async fn update_board_fields() {
    let app = common::build_test_app().await;
    let token = session(&app, "ada").await;
    let id = board(&app, &token, "a").await;

    let response = patch_json(
        &app,
        &format!("/api/v1/boards/{id}"),
        &token,
        json!({ "title": "renamed", "color": "red" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "renamed");
    assert_eq!(json["data"]["color"], "red");
}

#[tokio::test]
async fn boards_are_private_to_their_owner() {
    let app = common::build_test_app().await;
    let ada = session(&app, "ada").await;
    let bob = session(&app, "bob").await;
    let id = board(&app, &ada, "secret").await;

    assert!(board_titles(&app, &bob).await.is_empty());
    let response = get(&app, &format!("/api/v1/boards/{id}"), &bob).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = delete(&app, &format!("/api/v1/boards/{id}"), &bob).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(board_titles(&app, &ada).await, ["secret"]);
}

#[tokio::test]
async fn delete_board_cascades() {
    let app = common::build_test_app().await;
    let token = session(&app, "ada").await;
    let b = board(&app, &token, "b").await;
    let l = list(&app, &token, &b, "todo").await;
    let i = item(&app, &token, &l, "task", json!([])).await;

    let response = delete(&app, &format!("/api/v1/boards/{b}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &format!("/api/v1/boards/{b}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = patch_json(
        &app,
        &format!("/api/v1/lists/{l}"),
        &token,
        json!({ "title": "x" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = delete(&app, &format!("/api/v1/items/{i}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Lists and items
// ---------------------------------------------------------------------------

#[tokio::test]
async fn board_detail_is_ordered_at_every_level() {
    let app = common::build_test_app().await;
    let token = session(&app, "ada").await;
    let b = board(&app, &token, "b").await;
    let todo = list(&app, &token, &b, "todo").await;
    let done = list(&app, &token, &b, "done").await;
    item(&app, &token, &todo, "x", json!([])).await;
    let y = item(&app, &token, &todo, "y", json!([])).await;

    patch_json(
        &app,
        &format!("/api/v1/lists/{done}/move"),
        &token,
        json!({ "before": null }),
    )
    .await;
    patch_json(
        &app,
        &format!("/api/v1/items/{y}/move"),
        &token,
        json!({ "list_id": done, "before": "" }),
    )
    .await;

    let detail = detail(&app, &token, &b).await;
    assert_eq!(detail["title"], "b");
    assert_eq!(titles(&detail["lists"]), ["done", "todo"]);
    assert_eq!(titles(&detail["lists"][0]["items"]), ["y"]);
    assert_eq!(titles(&detail["lists"][1]["items"]), ["x"]);
}

#[tokio::test]
async fn list_on_unknown_board_is_not_found() {
    let app = common::build_test_app().await;
    let token = session(&app, "ada").await;
    let response = post_json(
        &app,
        "/api/v1/lists",
        &token,
        json!({ "board_id": "0190a0b0-0000-7000-8000-000000000001", "title": "lost" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_list_splices_neighbors() {
    let app = common::build_test_app().await;
    let token = session(&app, "ada").await;
    let b = board(&app, &token, "b").await;
    list(&app, &token, &b, "one").await;
    let two = list(&app, &token, &b, "two").await;
    list(&app, &token, &b, "three").await;

    let response = delete(&app, &format!("/api/v1/lists/{two}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(titles(&detail(&app, &token, &b).await["lists"]), ["one", "three"]);
}

#[tokio::test]
async fn items_take_catalog_tags_only() {
    let app = common::build_test_app().await;
    let token = session(&app, "ada").await;
    let b = board(&app, &token, "b").await;
    let l = list(&app, &token, &b, "todo").await;

    let response = get(&app, "/api/v1/resources", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let resources = body_json(response).await;
    let tags = resources["data"]["tags"].as_array().unwrap().clone();
    assert_eq!(tags.len(), 4);
    assert_eq!(resources["data"]["colors"], json!(["red", "blue", "green", "yellow"]));

    let id = item(&app, &token, &l, "tagged", json!([tags[0]["id"]])).await;
    let response = patch_json(
        &app,
        &format!("/api/v1/items/{id}"),
        &token,
        json!({ "tags": ["0190a0b0-0000-7000-8000-00000000beef"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let detail = detail(&app, &token, &b).await;
    assert_eq!(detail["lists"][0]["items"][0]["tags"], json!([tags[0]["id"]]));
}

#[tokio::test]
async fn nil_id_delete_is_bad_request() {
    let app = common::build_test_app().await;
    let token = session(&app, "ada").await;
    let response = delete(
        &app,
        "/api/v1/items/00000000-0000-0000-0000-000000000000",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
