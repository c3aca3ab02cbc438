//! End-to-end API tests over an in-memory database and object store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use whitecube_api::storage::{MemoryStore, ObjectStore};
use whitecube_api::{build_router, AppState};
use whitecube_common::Bucket;

async fn test_app() -> (Router, Arc<MemoryStore>) {
    let db = whitecube_common::db::connect_memory().await.unwrap();
    let store = Arc::new(MemoryStore::new());
    let app = build_router(AppState::new(db, store.clone()));
    (app, store)
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create_exhibition(app: &Router, slug: &str) -> Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/exhibitions",
            json!({
                "title": "Light Studies",
                "artist_name": "Mina Cho",
                "start_date": "2025-01-10",
                "end_date": "2025-03-10",
                "slug": slug,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = test_app().await;
    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "whitecube-api");
}

#[tokio::test]
async fn exhibition_crud_round_trip() {
    let (app, _) = test_app().await;
    let created = create_exhibition(&app, "light-studies").await;
    let id = created["id"].as_str().unwrap();
    // Dates in the past relative to 2025? start 2025-01-10: derived status
    // depends on today, so only check it is one of the derived values.
    assert_ne!(created["status"], "draft");

    let response = app
        .clone()
        .oneshot(get_request("/exhibitions/slug/light-studies"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], created["id"]);

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/exhibitions/{}", id),
            json!({"title": "Light Studies II"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["title"], "Light Studies II");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/exhibitions/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get_request(&format!("/exhibitions/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_date_range_is_rejected() {
    let (app, _) = test_app().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/exhibitions",
            json!({
                "title": "Backwards",
                "artist_name": "X",
                "start_date": "2025-03-10",
                "end_date": "2025-01-10",
                "slug": "backwards",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn newsletter_subscribe_conflict_and_unsubscribe() {
    let (app, _) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/newsletter/subscribe",
            json!({"email": "Visitor@Example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["email"], "visitor@example.com");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/newsletter/subscribe",
            json!({"email": "visitor@example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/newsletter/unsubscribe",
            json!({"email": "visitor@example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get_request("/newsletter/subscribers?active_only=true"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

const BOUNDARY: &str = "whitecube-test-boundary";

fn multipart_part(name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut part = Vec::new();
    part.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    part.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            name, file_name
        )
        .as_bytes(),
    );
    part.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    part.extend_from_slice(bytes);
    part.extend_from_slice(b"\r\n");
    part
}

fn multipart_field(name: &str, value: &str) -> Vec<u8> {
    format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
        BOUNDARY, name, value
    )
    .into_bytes()
}

fn multipart_request(uri: &str, parts: Vec<Vec<u8>>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(&part);
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn upload_batch_reports_per_file_outcomes() {
    let (app, store) = test_app().await;
    let created = create_exhibition(&app, "uploads").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(multipart_request(
            &format!("/exhibitions/{}/images", id),
            vec![
                multipart_field("image_type", "installation"),
                multipart_part("files", "wall.jpg", "image/jpeg", &[0u8; 16]),
                multipart_part("files", "floorplan.pdf", "application/pdf", &[0u8; 16]),
                multipart_part("files", "corner.png", "image/png", &[0u8; 16]),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    let created_records = body["created"].as_array().unwrap();
    let failures = body["failures"].as_array().unwrap();
    assert_eq!(created_records.len(), 2);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["file_name"], "floorplan.pdf");
    assert_eq!(store.object_count(Bucket::Exhibitions), 2);

    // Records carry sequential display order and the requested type.
    assert_eq!(created_records[0]["image_type"], "installation");
    assert_eq!(created_records[0]["display_order"], 0);
    assert_eq!(created_records[1]["display_order"], 1);
}

#[tokio::test]
async fn upload_to_missing_exhibition_is_404() {
    let (app, store) = test_app().await;
    let response = app
        .oneshot(multipart_request(
            &format!("/exhibitions/{}/images", uuid::Uuid::new_v4()),
            vec![multipart_part("files", "a.jpg", "image/jpeg", &[0u8; 4])],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.object_count(Bucket::Exhibitions), 0);
}

#[tokio::test]
async fn promotion_keeps_a_single_poster() {
    let (app, _) = test_app().await;
    let created = create_exhibition(&app, "posters").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(multipart_request(
            &format!("/exhibitions/{}/images", id),
            vec![
                multipart_part("files", "a.jpg", "image/jpeg", &[0u8; 4]),
                multipart_part("files", "b.jpg", "image/jpeg", &[0u8; 4]),
            ],
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    let first = body["created"][0]["id"].as_str().unwrap().to_string();
    let second = body["created"][1]["id"].as_str().unwrap().to_string();

    for image_id in [&first, &second] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/exhibitions/{}/images/{}/promote", id, image_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get_request(&format!("/exhibitions/{}/poster", id)))
        .await
        .unwrap();
    let poster = json_body(response).await;
    assert_eq!(poster["id"].as_str().unwrap(), second);

    // The grouped view shows exactly one poster; the demoted image is an
    // artwork again.
    let response = app
        .oneshot(get_request(&format!("/exhibitions/{}/images/grouped", id)))
        .await
        .unwrap();
    let grouped = json_body(response).await;
    assert_eq!(grouped["count"]["poster"], 1);
    assert_eq!(grouped["count"]["artwork"], 1);
}

#[tokio::test]
async fn reorder_rejects_images_from_other_exhibitions() {
    let (app, _) = test_app().await;
    let ours = create_exhibition(&app, "ours").await;
    let theirs = create_exhibition(&app, "theirs").await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            &format!("/exhibitions/{}/images", theirs["id"].as_str().unwrap()),
            vec![multipart_part("files", "a.jpg", "image/jpeg", &[0u8; 4])],
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    let foreign_image = body["created"][0]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!(
                "/exhibitions/{}/images/reorder",
                ours["id"].as_str().unwrap()
            ),
            json!({"ids": [foreign_image], "orders": [42]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The other exhibition's image kept its order.
    let response = app
        .oneshot(get_request(&format!(
            "/exhibitions/{}/images",
            theirs["id"].as_str().unwrap()
        )))
        .await
        .unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed[0]["display_order"], 0);
}

#[tokio::test]
async fn cleanup_endpoint_removes_orphans() {
    let (app, store) = test_app().await;
    let created = create_exhibition(&app, "sweep").await;
    let id = created["id"].as_str().unwrap();

    // One referenced object via the API, one orphan written directly.
    app.clone()
        .oneshot(multipart_request(
            &format!("/exhibitions/{}/images", id),
            vec![multipart_part("files", "kept.jpg", "image/jpeg", &[0u8; 4])],
        ))
        .await
        .unwrap();
    store
        .put_object(Bucket::Exhibitions, "stray.jpg", vec![0], "image/jpeg")
        .await
        .unwrap();
    assert_eq!(store.object_count(Bucket::Exhibitions), 2);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/storage/cleanup",
            json!({"bucket": "exhibitions"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["removed"], 1);
    assert_eq!(store.object_count(Bucket::Exhibitions), 1);

    // The general bucket has no path tracking to diff against.
    let response = app
        .oneshot(json_request(
            "POST",
            "/storage/cleanup",
            json!({"bucket": "general"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn artist_profile_image_upload_and_artwork_crud() {
    let (app, store) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/artists",
            json!({"name": "Mina Cho", "slug": "mina-cho"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let artist = json_body(response).await;
    let artist_id = artist["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(multipart_request(
            &format!("/artists/{}/profile-image", artist_id),
            vec![multipart_part("file", "portrait.jpg", "image/jpeg", &[0u8; 8])],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body(response).await;
    let path = updated["profile_image_path"].as_str().unwrap();
    assert!(path.starts_with(&format!("artist_{}/profile_", artist_id)));
    assert!(store.contains(Bucket::Artists, path));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/artworks",
            json!({
                "title": "Untitled I",
                "artist_id": artist_id,
                "slug": "untitled-i",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let artwork = json_body(response).await;

    let response = app
        .oneshot(get_request(&format!(
            "/artworks?artist_id={}",
            artist_id
        )))
        .await
        .unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], artwork["id"]);
}

#[tokio::test]
async fn news_sync_and_visibility_flow() {
    let (app, _store) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/news/sync",
            json!({
                "instagram_post_id": "ig42",
                "caption": "Vernissage tonight",
                "image_urls": ["https://cdn.example.com/ig42.jpg"],
                "instagram_url": "https://instagram.com/p/ig42",
                "post_date": "2025-06-01",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let post = json_body(response).await;
    let post_id = post["id"].as_str().unwrap().to_string();

    // Hide it, then sync the same Instagram post again: same record, content
    // refreshed, still hidden.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/news/{}/visibility", post_id),
            json!({ "is_visible": false }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/news/sync",
            json!({
                "instagram_post_id": "ig42",
                "caption": "Vernissage (recap)",
                "image_urls": ["https://cdn.example.com/ig42.jpg"],
                "instagram_url": "https://instagram.com/p/ig42",
                "post_date": "2025-06-02",
            }),
        ))
        .await
        .unwrap();
    let resynced = json_body(response).await;
    assert_eq!(resynced["id"], post["id"]);
    assert_eq!(resynced["caption"], "Vernissage (recap)");
    assert_eq!(resynced["is_visible"], false);

    // Hidden posts stay out of the public recent feed but count in stats.
    let response = app.clone().oneshot(get_request("/news/recent")).await.unwrap();
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 0);

    let response = app.oneshot(get_request("/news/stats")).await.unwrap();
    let stats = json_body(response).await;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["hidden"], 1);
}

#[tokio::test]
async fn duplicate_news_post_is_a_conflict() {
    let (app, _store) = test_app().await;

    let new_post = json!({
        "instagram_post_id": "ig7",
        "caption": "Studio visit",
        "post_date": "2025-04-01",
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/news", new_post.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request("POST", "/news", new_post))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn video_catalogue_round_trip() {
    let (app, _store) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/videos",
            json!({
                "title": "Gallery walkthrough",
                "youtube_url": "https://youtube.com/watch?v=walk1",
                "youtube_id": "walk1",
                "category": "tour",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let video = json_body(response).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/videos",
            json!({
                "title": "Gallery walkthrough (dupe)",
                "youtube_url": "https://youtube.com/watch?v=walk1",
                "youtube_id": "walk1",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(get_request("/videos/youtube/walk1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], video["id"]);

    let response = app
        .clone()
        .oneshot(get_request("/videos/categories"))
        .await
        .unwrap();
    assert_eq!(json_body(response).await, json!(["tour"]));

    let video_id = video["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/videos/{}", video_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get_request("/videos")).await.unwrap();
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 0);
}
