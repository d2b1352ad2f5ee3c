//! Well-known role name constants.
//!
//! These must match the `chk_users_role` constraint in the initial migration.

pub const ROLE_USER: &str = "user";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_TEACHER_ADMIN: &str = "teacher_admin";
pub const ROLE_ADMIN: &str = "admin";

/// Roles that belong to the teacher account lifecycle.
pub const TEACHER_ROLES: &[&str] = &[ROLE_TEACHER, ROLE_TEACHER_ADMIN];

/// Roles a new account may request at signup.
pub const SIGNUP_ROLES: &[&str] = &[ROLE_USER, ROLE_TEACHER];

/// Whether the role opens the admin screen set (project moderation, teacher
/// management, analytics).
pub fn is_moderator(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_TEACHER_ADMIN
}

pub fn is_teacher(role: &str) -> bool {
    TEACHER_ROLES.contains(&role)
}

/// Validate the role requested in a signup form.
pub fn validate_signup_role(role: &str) -> Result<(), String> {
    if SIGNUP_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            SIGNUP_ROLES.join(", ")
        ))
    }
}
