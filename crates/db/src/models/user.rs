//! User account models and DTOs.

use capstone_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A full row from the `users` table.
///
/// Not `Serialize`: it carries the password hash. Handlers convert it into
/// [`UserProfile`] or [`PublicProfile`] before responding.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub status: String,
    pub year_level: Option<String>,
    pub block: Option<String>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What the account owner and moderators see.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub status: String,
    pub year_level: Option<String>,
    pub block: Option<String>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: Timestamp,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            role: u.role,
            status: u.status,
            year_level: u.year_level,
            block: u.block,
            gender: u.gender,
            bio: u.bio,
            profile_picture_url: u.profile_picture_url,
            created_at: u.created_at,
        }
    }
}

/// What other users see. Omits email and account status.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub id: DbId,
    pub full_name: String,
    pub role: String,
    pub year_level: Option<String>,
    pub block: Option<String>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl From<User> for PublicProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            full_name: u.full_name,
            role: u.role,
            year_level: u.year_level,
            block: u.block,
            gender: u.gender,
            bio: u.bio,
            profile_picture_url: u.profile_picture_url,
        }
    }
}

/// DTO for inserting a user. `email` is expected to be normalized already.
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub status: String,
    pub year_level: Option<String>,
    pub block: Option<String>,
    pub gender: Option<String>,
}

/// DTO for profile edits. Only non-`None` fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub year_level: Option<String>,
    pub block: Option<String>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
}
