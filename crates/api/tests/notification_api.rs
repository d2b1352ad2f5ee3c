//! Notification inbox and the unread-count event stream.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::StatusCode;
use capstone_api::notifications::dispatch::publish_created;
use capstone_api::router::build_app_router;
use capstone_db::models::notification::CreateNotification;
use capstone_db::repositories::NotificationRepo;
use common::{body_json, create_user, get_auth, post_auth, submit, token_for};
use http_body_util::BodyExt;
use sqlx::PgPool;

fn like_note(recipient_id: i64, sender_id: i64) -> CreateNotification {
    CreateNotification {
        recipient_id,
        sender_id: Some(sender_id),
        project_id: None,
        kind: "like",
        message: "Someone liked your project \"Rover\"".into(),
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_mark_read_is_idempotent_and_scoped(pool: PgPool) {
    let owner = create_user(&pool, "owner@school.edu", "user", "active").await;
    let other = create_user(&pool, "other@school.edu", "user", "active").await;
    let note = NotificationRepo::create(&pool, &like_note(owner.id, other.id))
        .await
        .unwrap();
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/notifications/{}/read", note.id);

    let first = body_json(post_auth(app.clone(), &uri, &token_for(&owner)).await).await;
    assert_eq!(first["data"]["read"], true);

    let second = body_json(post_auth(app.clone(), &uri, &token_for(&owner)).await).await;
    assert_eq!(second["data"]["read"], true);
    assert_eq!(second["data"]["read_at"], first["data"]["read_at"]);

    let response = post_auth(app.clone(), &uri, &token_for(&other)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(get_auth(app, "/api/v1/notifications/unread-count", &token_for(&owner)).await).await;
    assert_eq!(json["data"]["count"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_read_all_and_unread_filter(pool: PgPool) {
    let owner = create_user(&pool, "owner@school.edu", "user", "active").await;
    let other = create_user(&pool, "other@school.edu", "user", "active").await;
    for _ in 0..3 {
        NotificationRepo::create(&pool, &like_note(owner.id, other.id))
            .await
            .unwrap();
    }
    let app = common::build_test_app(pool);
    let token = token_for(&owner);

    let json = body_json(get_auth(app.clone(), "/api/v1/notifications?unread_only=true&limit=2", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json = body_json(post_auth(app.clone(), "/api/v1/notifications/read-all", &token).await).await;
    assert_eq!(json["data"]["marked_read"], 3);

    let json = body_json(get_auth(app.clone(), "/api/v1/notifications?unread_only=true", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    let json = body_json(get_auth(app, "/api/v1/notifications", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_likes_notify_the_owner_but_not_self(pool: PgPool) {
    let admin = create_user(&pool, "admin@school.edu", "admin", "active").await;
    let owner = create_user(&pool, "owner@school.edu", "user", "active").await;
    let fan = create_user(&pool, "fan@school.edu", "user", "active").await;
    let project = submit(&pool, &owner, "Rover").await;
    let app = common::build_test_app(pool.clone());

    post_auth(
        app.clone(),
        &format!("/api/v1/admin/projects/{}/approve", project.id),
        &token_for(&admin),
    )
    .await;
    NotificationRepo::mark_all_read(&pool, owner.id).await.unwrap();

    let like_uri = format!("/api/v1/projects/{}/like", project.id);
    post_auth(app.clone(), &like_uri, &token_for(&owner)).await;
    assert_eq!(NotificationRepo::unread_count(&pool, owner.id).await.unwrap(), 0);

    post_auth(app.clone(), &like_uri, &token_for(&fan)).await;
    let json = body_json(get_auth(app, "/api/v1/notifications?unread_only=true", &token_for(&owner)).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["type"], "like");
    assert_eq!(json["data"][0]["sender_id"], fan.id);
    assert_eq!(json["data"][0]["message"], "Someone liked your project \"Rover\"");
}

async fn next_frame(body: &mut Body) -> String {
    let frame = tokio::time::timeout(Duration::from_secs(5), body.frame())
        .await
        .expect("stream frame in time")
        .unwrap()
        .unwrap();
    String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_stream_pushes_unread_count(pool: PgPool) {
    let owner = create_user(&pool, "owner@school.edu", "user", "active").await;
    let other = create_user(&pool, "other@school.edu", "user", "active").await;
    NotificationRepo::create(&pool, &like_note(owner.id, other.id))
        .await
        .unwrap();

    let state = common::test_state(pool.clone());
    let app = build_app_router(state.clone(), &common::test_config());

    let response = get_auth(app, "/api/v1/notifications/stream", &token_for(&owner)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let mut body = response.into_body();

    let first = next_frame(&mut body).await;
    assert!(first.contains("event: unread_count"), "{first}");
    assert!(first.contains(r#"data: {"count":1}"#), "{first}");

    // Another user's notification does not wake this stream; ours does.
    let foreign = NotificationRepo::create(&pool, &like_note(other.id, owner.id))
        .await
        .unwrap();
    publish_created(&state.event_bus, &foreign);
    let ours = NotificationRepo::create(&pool, &like_note(owner.id, other.id))
        .await
        .unwrap();
    publish_created(&state.event_bus, &ours);

    let second = next_frame(&mut body).await;
    assert!(second.contains(r#"data: {"count":2}"#), "{second}");

    state.shutdown.cancel();
}
