//! Fixtures shared by the repository integration tests.

#![allow(dead_code)]

use capstone_core::accounts::initial_status;
use capstone_db::models::project::{CreateProject, Project};
use capstone_db::models::user::{CreateUser, User};
use capstone_db::repositories::{ProjectRepo, UserRepo};
use sqlx::PgPool;

pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        full_name: format!("User {email}"),
        role: role.to_string(),
        status: initial_status(role).to_string(),
        year_level: Some("4th Year".to_string()),
        block: Some("A".to_string()),
        gender: None,
    };
    UserRepo::create(pool, &input).await.unwrap()
}

pub fn new_project(title: &str) -> CreateProject {
    CreateProject {
        title: title.to_string(),
        title_description: "A short tagline".to_string(),
        abstract_text: "An abstract long enough to satisfy the submission rules for projects."
            .to_string(),
        source_code_url: "https://github.com/example/project".to_string(),
        video_url: "https://youtu.be/demo".to_string(),
        pdf_url: "https://cdn.example.com/paper.pdf".to_string(),
        category: "Web".to_string(),
    }
}

pub async fn submit(pool: &PgPool, owner: &User, title: &str) -> Project {
    ProjectRepo::create(pool, owner.id, &new_project(title))
        .await
        .unwrap()
}
