//! Project submission, feed visibility, engagement, profiles and OCR.

mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use capstone_api::error::AppError;
use capstone_db::repositories::EngagementRepo;
use common::{
    body_json, create_user, delete_auth, get, get_auth, post_auth, post_json_auth, project_body,
    put_json_auth, submit, token_for,
};
use sqlx::PgPool;

async fn approve(app: axum::Router, admin_token: &str, id: i64) {
    let response = post_auth(
        app,
        &format!("/api/v1/admin/projects/{id}/approve"),
        admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_submit_validates_then_lands_pending(pool: PgPool) {
    let owner = create_user(&pool, "owner@school.edu", "user", "active").await;
    let app = common::build_test_app(pool);
    let token = token_for(&owner);

    let mut bad = project_body("Rover");
    bad["abstract"] = serde_json::json!("too short");
    bad["pdf_url"] = serde_json::json!("not-a-link");
    let response = post_json_auth(app.clone(), "/api/v1/projects", bad, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("Abstract"), "{message}");
    assert!(message.contains("PDF link"), "{message}");

    let response =
        post_json_auth(app.clone(), "/api/v1/projects", project_body("Rover"), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["user_id"], owner.id);

    let json = body_json(get_auth(app, "/api/v1/projects/mine", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["author_name"], "owner");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_feed_only_shows_approved(pool: PgPool) {
    let admin = create_user(&pool, "admin@school.edu", "admin", "active").await;
    let owner = create_user(&pool, "owner@school.edu", "user", "active").await;
    let viewer = create_user(&pool, "viewer@school.edu", "user", "active").await;
    let project = submit(&pool, &owner, "Rover").await;
    let app = common::build_test_app(pool);
    let viewer_token = token_for(&viewer);

    let json = body_json(get_auth(app.clone(), "/api/v1/projects", &viewer_token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    // Hidden from others, visible to the owner and moderators.
    let uri = format!("/api/v1/projects/{}", project.id);
    let response = get_auth(app.clone(), &uri, &viewer_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get_auth(app.clone(), &uri, &token_for(&owner)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_auth(app.clone(), &uri, &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Likes on hidden projects are refused.
    let response = post_auth(app.clone(), &format!("{uri}/like"), &viewer_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    approve(app.clone(), &token_for(&admin), project.id).await;

    let json = body_json(get_auth(app.clone(), "/api/v1/projects", &viewer_token).await).await;
    let feed = json["data"].as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["title"], "Rover");
    assert_eq!(feed[0]["status"], "approved");

    let response = get_auth(app, &uri, &viewer_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_like_and_bookmark_toggle(pool: PgPool) {
    let admin = create_user(&pool, "admin@school.edu", "admin", "active").await;
    let owner = create_user(&pool, "owner@school.edu", "user", "active").await;
    let viewer = create_user(&pool, "viewer@school.edu", "user", "active").await;
    let project = submit(&pool, &owner, "Rover").await;
    let app = common::build_test_app(pool);
    approve(app.clone(), &token_for(&admin), project.id).await;
    let token = token_for(&viewer);
    let uri = format!("/api/v1/projects/{}", project.id);

    let json = body_json(post_auth(app.clone(), &format!("{uri}/like"), &token).await).await;
    assert_eq!(json["data"]["liked"], true);
    assert_eq!(json["data"]["like_count"], 1);

    let json = body_json(post_auth(app.clone(), &format!("{uri}/bookmark"), &token).await).await;
    assert_eq!(json["data"]["bookmarked"], true);
    assert_eq!(json["data"]["bookmark_count"], 1);

    let json = body_json(get_auth(app.clone(), &uri, &token).await).await;
    assert_eq!(json["data"]["liked"], true);
    assert_eq!(json["data"]["bookmarked"], true);
    assert_eq!(json["data"]["like_count"], 1);

    let json = body_json(get_auth(app.clone(), "/api/v1/projects/bookmarked", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let json = body_json(post_auth(app.clone(), &format!("{uri}/like"), &token).await).await;
    assert_eq!(json["data"]["liked"], false);
    assert_eq!(json["data"]["like_count"], 0);

    // The owner sees their own project without the viewer's marks.
    let json = body_json(get_auth(app, &uri, &token_for(&owner)).await).await;
    assert_eq!(json["data"]["liked"], false);
    assert_eq!(json["data"]["bookmarked"], false);
    assert_eq!(json["data"]["bookmark_count"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_toggle_on_vanished_project_is_not_found(pool: PgPool) {
    let viewer = create_user(&pool, "viewer@school.edu", "user", "active").await;
    let owner = create_user(&pool, "owner@school.edu", "user", "active").await;
    let project = submit(&pool, &owner, "Rover").await;

    // The project passed the handler's check, then was deleted before the insert.
    sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(project.id)
        .execute(&pool)
        .await
        .unwrap();
    let err = EngagementRepo::toggle_bookmark(&pool, project.id, viewer.id)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.code()).as_deref(),
        Some("23503")
    );

    let response = AppError::from(err).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_rejected_project_can_be_resubmitted(pool: PgPool) {
    let admin = create_user(&pool, "admin@school.edu", "admin", "active").await;
    let owner = create_user(&pool, "owner@school.edu", "user", "active").await;
    let project = submit(&pool, &owner, "Rover").await;
    let app = common::build_test_app(pool);
    let token = token_for(&owner);
    let resubmit_uri = format!("/api/v1/projects/{}/resubmit", project.id);

    // Pending projects cannot be resubmitted.
    let response =
        post_json_auth(app.clone(), &resubmit_uri, project_body("Rover v2"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/admin/projects/{}/disapprove", project.id),
        serde_json::json!({ "notes": "Video link is private" }),
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response =
        post_json_auth(app.clone(), &resubmit_uri, project_body("Rover v2"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["title"], "Rover v2");
    assert!(json["data"]["admin_notes"].is_null());
    assert!(json["data"]["reviewed_by"].is_null());

    // Only the owner may resubmit.
    let other = token_for(&admin);
    let response = post_json_auth(app, &resubmit_uri, project_body("Hijack"), &other).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_owner_deletes_own_project(pool: PgPool) {
    let owner = create_user(&pool, "owner@school.edu", "user", "active").await;
    let other = create_user(&pool, "other@school.edu", "user", "active").await;
    let project = submit(&pool, &owner, "Rover").await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/projects/{}", project.id);

    let response = delete_auth(app.clone(), &uri, &token_for(&other)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.clone(), &uri, &token_for(&owner)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &uri, &token_for(&owner)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_comments_and_search(pool: PgPool) {
    let admin = create_user(&pool, "admin@school.edu", "admin", "active").await;
    let owner = create_user(&pool, "owner@school.edu", "user", "active").await;
    let viewer = create_user(&pool, "viewer@school.edu", "user", "active").await;
    let rover = submit(&pool, &owner, "Mars Rover").await;
    let hidden = submit(&pool, &owner, "Rover Prototype").await;
    let app = common::build_test_app(pool);
    approve(app.clone(), &token_for(&admin), rover.id).await;
    let token = token_for(&viewer);
    let comments_uri = format!("/api/v1/projects/{}/comments", rover.id);

    let response = post_json_auth(
        app.clone(),
        &comments_uri,
        serde_json::json!({ "comment": "   " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        &comments_uri,
        serde_json::json!({ "comment": "  Great demo! " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(get_auth(app.clone(), &comments_uri, &token).await).await;
    let comments = json["data"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["comment"], "Great demo!");
    assert_eq!(comments[0]["author_name"], "viewer");

    let json = body_json(get_auth(app.clone(), "/api/v1/projects/search?q=rover", &token).await).await;
    let results = json["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], rover.id);
    assert_ne!(results[0]["id"], hidden.id);
    assert_eq!(results[0]["comment_count"], 1);

    let json = body_json(get_auth(app, "/api/v1/projects/search?q=%20", &token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_profile_read_update_and_search(pool: PgPool) {
    let user = create_user(&pool, "ana.cruz@school.edu", "user", "active").await;
    let other = create_user(&pool, "ben@school.edu", "user", "active").await;
    let app = common::build_test_app(pool);
    let token = token_for(&user);

    let json = body_json(get_auth(app.clone(), "/api/v1/profile", &token).await).await;
    assert_eq!(json["data"]["email"], "ana.cruz@school.edu");
    assert!(json["data"].get("password_hash").is_none());

    let response = put_json_auth(
        app.clone(),
        "/api/v1/profile",
        serde_json::json!({ "full_name": "  " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/profile",
        serde_json::json!({ "full_name": " Ana Cruz ", "bio": "Robotics" }),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["full_name"], "Ana Cruz");
    assert_eq!(json["data"]["bio"], "Robotics");
    assert_eq!(json["data"]["year_level"], "4th Year");

    let json = body_json(
        get_auth(app.clone(), "/api/v1/profiles/search?q=cruz", &token_for(&other)).await,
    )
    .await;
    let found = json["data"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], user.id);
    assert!(found[0].get("email").is_none());

    let response = get_auth(
        app,
        &format!("/api/v1/profiles/{}", user.id),
        &token_for(&other),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["full_name"], "Ana Cruz");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_ocr_errors_surface_as_json(pool: PgPool) {
    let user = create_user(&pool, "u@school.edu", "user", "active").await;
    let app = common::build_test_app(pool);
    let token = token_for(&user);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/ocr",
        serde_json::json!({ "image": "not base64!!" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    // Nothing listens on the configured OCR port.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/ocr",
        serde_json::json!({ "image": "data:image/png;base64,aGVsbG8=" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "OCR_UNAVAILABLE");

    let json = body_json(get(app, "/api/v1/ocr/health").await).await;
    assert_eq!(json["data"]["reachable"], false);
}
