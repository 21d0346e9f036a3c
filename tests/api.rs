//! REST surface exercised through the router, without a socket.

#![allow(clippy::panic)]

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use site_manager::domain::MessageId;
use tower::ServiceExt;

use common::TestApp;

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let Ok(resp) = app.app.clone().oneshot(req).await else {
        panic!("router call failed");
    };
    let status = resp.status();
    let body = tokio_test::assert_ok!(to_bytes(resp.into_body(), usize::MAX).await);
    (status, body.to_vec())
}

async fn send_json(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, req).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    tokio_test::assert_ok!(Request::get(uri).body(Body::empty()))
}

fn delete(uri: &str) -> Request<Body> {
    tokio_test::assert_ok!(Request::delete(uri).body(Body::empty()))
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    tokio_test::assert_ok!(
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
    )
}

fn book_form() -> Value {
    json!({
        "title": "The Pragmatic Programmer",
        "cover": "https://covers.example/pragprog.jpg",
        "status": "Reading",
        "summary": "Care about your craft.",
        "keyTakeaways": "dry,orthogonality",
        "lessons": "tracer bullets",
        "notes": "",
        "links": "https://pragprog.com"
    })
}

#[tokio::test]
async fn health_reports_listening_inbox() {
    let app = TestApp::new().await;
    let (status, body) = send_json(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").and_then(Value::as_str), Some("healthy"));
    assert_eq!(body.get("inbox_listening").and_then(Value::as_bool), Some(true));
}

#[tokio::test]
async fn inbox_lists_streamed_messages_in_order() {
    let app = TestApp::new().await;
    app.messages.insert("ana", "first").await;
    app.messages.insert("bo", "second").await;
    app.wait_for_inbox(2).await;

    let (status, body) = send_json(&app, get("/api/v1/messages")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("total").and_then(Value::as_u64), Some(2));
    let contents: Vec<&str> = body
        .get("data")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|m| m.get("content").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(contents, vec!["first", "second"]);
}

#[tokio::test]
async fn unparsable_timestamp_renders_placeholder() {
    let app = TestApp::new().await;
    app.messages
        .put_document(
            MessageId::new("odd"),
            json!({ "createdAt": "sometime", "sender": "ana", "content": "hi" }),
        )
        .await;
    app.wait_for_inbox(1).await;

    let (_, body) = send_json(&app, get("/api/v1/messages")).await;
    assert_eq!(
        body.pointer("/data/0/sent_at").and_then(Value::as_str),
        Some("Invalid timestamp")
    );
}

#[tokio::test]
async fn delete_message_removes_it_everywhere() {
    let app = TestApp::new().await;
    let id = app.messages.insert("ana", "spam").await;
    app.messages.insert("bo", "keep").await;
    app.wait_for_inbox(2).await;

    let (status, _) = send(&app, delete(&format!("/api/v1/messages/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(!app.messages.contains(&id).await);
    assert_eq!(app.state.inbox.len().await, 1);
}

#[tokio::test]
async fn failed_delete_keeps_message() {
    let app = TestApp::new().await;
    let id = app.messages.insert("ana", "stays").await;
    app.wait_for_inbox(1).await;
    app.messages.set_fail_deletes(true);

    let (status, body) = send_json(&app, delete(&format!("/api/v1/messages/{id}"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.pointer("/error/code").and_then(Value::as_u64), Some(3001));
    assert_eq!(app.state.inbox.len().await, 1);
}

#[tokio::test]
async fn add_book_then_browse_gallery_and_detail() {
    let app = TestApp::new().await;

    let (status, created) = send_json(&app, post_json("/api/v1/books", &book_form())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        created.get("keyTakeaways"),
        Some(&json!(["dry", "orthogonality"]))
    );
    assert_eq!(created.get("notes"), Some(&json!([])));
    let Some(id) = created.get("id").and_then(Value::as_i64) else {
        panic!("created book has no id");
    };

    let (status, gallery) = send_json(&app, get("/api/v1/books")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(gallery.pointer("/pagination/total").and_then(Value::as_u64), Some(1));
    assert_eq!(
        gallery.pointer("/data/0/title").and_then(Value::as_str),
        Some("The Pragmatic Programmer")
    );

    let (status, detail) = send_json(&app, get(&format!("/api/v1/books/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail.get("lessons"), Some(&json!(["tracer bullets"])));
}

#[tokio::test]
async fn unknown_book_is_404() {
    let app = TestApp::new().await;
    let (status, body) = send_json(&app, get("/api/v1/books/12345")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.pointer("/error/code").and_then(Value::as_u64), Some(2001));
}

#[tokio::test]
async fn incomplete_forms_never_reach_the_store() {
    let app = TestApp::new().await;

    for (field, code) in [("title", 1001), ("summary", 1002), ("cover", 1003)] {
        let mut form = book_form();
        if let Some(obj) = form.as_object_mut() {
            obj.insert(field.to_string(), json!(""));
        }
        let (status, body) = send_json(&app, post_json("/api/v1/books", &form)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "field {field}");
        assert_eq!(body.pointer("/error/code").and_then(Value::as_u64), Some(code));
    }
    assert_eq!(app.books.insert_calls(), 0);
}

#[tokio::test]
async fn uploaded_cover_is_served_back() {
    let app = TestApp::new().await;
    let bytes = vec![0xff, 0xd8, 0xff, 0xe0];

    let req = tokio_test::assert_ok!(
        Request::post("/api/v1/covers")
            .header("content-type", "application/octet-stream")
            .body(Body::from(bytes.clone()))
    );
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let Some(url) = body.get("url").and_then(Value::as_str) else {
        panic!("upload response has no url");
    };
    let Some(path) = url.strip_prefix(common::PUBLIC_BASE_URL) else {
        panic!("unexpected url {url}");
    };
    assert!(path.starts_with("/book_images/"));

    let (status, served) = send(&app, get(&format!("/files{path}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, bytes);
}

#[tokio::test]
async fn empty_cover_upload_is_rejected() {
    let app = TestApp::new().await;
    let req = tokio_test::assert_ok!(Request::post("/api/v1/covers").body(Body::empty()));
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let (status, doc) = send_json(&app, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc.pointer("/paths/~1api~1v1~1messages").is_some());
}
