//! Teacher approval, rejection, promotion and demotion over HTTP.

mod common;

use axum::http::StatusCode;
use capstone_db::repositories::{NotificationRepo, UserRepo};
use common::{body_json, create_user, get_auth, post_auth, post_json, token_for, TEST_PASSWORD};
use sqlx::PgPool;

async fn login_status(app: axum::Router, email: &str) -> (StatusCode, serde_json::Value) {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": email, "password": TEST_PASSWORD }),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_approved_teacher_can_sign_in(pool: PgPool) {
    let admin = create_user(&pool, "admin@school.edu", "admin", "active").await;
    let teacher = create_user(&pool, "t@school.edu", "teacher", "pending").await;
    let app = common::build_test_app(pool);
    let token = token_for(&admin);

    let json = body_json(get_auth(app.clone(), "/api/v1/admin/teachers?status=pending", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], teacher.id);

    let uri = format!("/api/v1/admin/teachers/{}/approve", teacher.id);
    let response = post_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "active");

    // Approving again conflicts.
    let response = post_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let (status, json) = login_status(app.clone(), "t@school.edu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["route"], "standard");

    let teacher_token = json["data"]["access_token"].as_str().unwrap().to_string();
    let json = body_json(get_auth(app, "/api/v1/notifications", &teacher_token).await).await;
    assert_eq!(json["data"][0]["type"], "teacher_approved");
    assert_eq!(json["data"][0]["read"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_rejected_teacher_is_turned_away(pool: PgPool) {
    let admin = create_user(&pool, "admin@school.edu", "admin", "active").await;
    let teacher = create_user(&pool, "t@school.edu", "teacher", "pending").await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/admin/teachers/{}/reject", teacher.id);
    let response = post_auth(app.clone(), &uri, &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "rejected");

    let (status, json) = login_status(app, "t@school.edu").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["route"], "rejected");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_promote_then_demote_restores_teacher(pool: PgPool) {
    let admin = create_user(&pool, "admin@school.edu", "admin", "active").await;
    let teacher = create_user(&pool, "t@school.edu", "teacher", "active").await;
    let app = common::build_test_app(pool);
    let token = token_for(&admin);

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/admin/teachers/{}/promote", teacher.id),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["role"], "teacher_admin");

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/admin/teachers/{}/promote", teacher.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_auth(
        app,
        &format!("/api/v1/admin/teachers/{}/demote", teacher.id),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "teacher");
    assert_eq!(json["data"]["status"], "active");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_targets(pool: PgPool) {
    let ta = create_user(&pool, "ta@school.edu", "teacher_admin", "active").await;
    let user = create_user(&pool, "u@school.edu", "user", "active").await;
    let pending = create_user(&pool, "p@school.edu", "teacher", "pending").await;
    let app = common::build_test_app(pool);
    let token = token_for(&ta);

    // Own account.
    let response = post_auth(
        app.clone(),
        &format!("/api/v1/admin/teachers/{}/demote", ta.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Not a teacher.
    let response = post_auth(
        app.clone(),
        &format!("/api/v1/admin/teachers/{}/approve", user.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Pending teachers cannot be promoted.
    let response = post_auth(
        app.clone(),
        &format!("/api/v1/admin/teachers/{}/promote", pending.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_auth(app, "/api/v1/admin/teachers/424242/approve", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_list_has_only_user_role(pool: PgPool) {
    let admin = create_user(&pool, "admin@school.edu", "admin", "active").await;
    create_user(&pool, "u@school.edu", "user", "active").await;
    create_user(&pool, "t@school.edu", "teacher", "active").await;
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(app.clone(), "/api/v1/admin/users", &token_for(&admin)).await).await;
    let users = json["data"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "u@school.edu");

    let json = body_json(get_auth(app, "/api/v1/admin/teachers", &token_for(&admin)).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_racing_teacher_approvals_apply_once(pool: PgPool) {
    let admin = create_user(&pool, "admin@school.edu", "admin", "active").await;
    let ta = create_user(&pool, "ta@school.edu", "teacher_admin", "active").await;
    let app = common::build_test_app(pool.clone());
    let admin_token = token_for(&admin);
    let ta_token = token_for(&ta);

    for round in 0..5 {
        let teacher = create_user(&pool, &format!("t{round}@school.edu"), "teacher", "pending").await;
        let uri = format!("/api/v1/admin/teachers/{}/approve", teacher.id);

        let (a, b) = tokio::join!(
            post_auth(app.clone(), &uri, &admin_token),
            post_auth(app.clone(), &uri, &ta_token),
        );
        let mut statuses = [a.status(), b.status()];
        statuses.sort();
        assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT], "round {round}");

        let stored = UserRepo::find_by_id(&pool, teacher.id).await.unwrap().unwrap();
        assert_eq!(stored.status, "active");
        assert_eq!(
            NotificationRepo::unread_count(&pool, teacher.id).await.unwrap(),
            1,
            "round {round}"
        );
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_teacher_list_status_filter(pool: PgPool) {
    let admin = create_user(&pool, "admin@school.edu", "admin", "active").await;
    create_user(&pool, "pending@school.edu", "teacher", "pending").await;
    create_user(&pool, "active@school.edu", "teacher", "active").await;
    let app = common::build_test_app(pool);
    let token = token_for(&admin);

    for (uri, expected) in [
        ("/api/v1/admin/teachers", 2),
        ("/api/v1/admin/teachers?status=all", 2),
        ("/api/v1/admin/teachers?status=pending", 1),
    ] {
        let response = get_auth(app.clone(), uri, &token).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), expected, "{uri}");
    }

    let response = get_auth(app, "/api/v1/admin/teachers?status=pendng", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
