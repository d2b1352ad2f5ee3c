//! Input validation for forms that reach the API: project submissions,
//! signups, and comments.
//!
//! All checks run before any database request. Project validation collects
//! every failing field so the client can mark them all at once.

use crate::error::CoreError;

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_TITLE_DESCRIPTION_LENGTH: usize = 100;
pub const MIN_ABSTRACT_LENGTH: usize = 50;
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Borrowed view of the fields of a project submission.
#[derive(Debug, Clone, Copy)]
pub struct ProjectDraft<'a> {
    pub title: &'a str,
    pub title_description: &'a str,
    pub abstract_text: &'a str,
    pub source_code_url: &'a str,
    pub video_url: &'a str,
    pub pdf_url: &'a str,
    pub category: &'a str,
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

fn check_url(errors: &mut Vec<String>, label: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(format!("{label} is required"));
    } else if !is_http_url(value) {
        errors.push(format!("{label} must be a valid http(s) URL"));
    }
}

/// Validate a project submission.
pub fn validate_project_draft(draft: &ProjectDraft<'_>) -> Result<(), CoreError> {
    let mut errors = Vec::new();

    let title = draft.title.trim();
    if title.is_empty() {
        errors.push("Project title is required".to_string());
    } else if title.chars().count() > MAX_TITLE_LENGTH {
        errors.push(format!(
            "Project title must be {MAX_TITLE_LENGTH} characters or less"
        ));
    }

    let title_description = draft.title_description.trim();
    if title_description.is_empty() {
        errors.push("Project title description is required".to_string());
    } else if title_description.chars().count() > MAX_TITLE_DESCRIPTION_LENGTH {
        errors.push(format!(
            "Project title description must be {MAX_TITLE_DESCRIPTION_LENGTH} characters or less"
        ));
    }

    let abstract_text = draft.abstract_text.trim();
    if abstract_text.is_empty() {
        errors.push("Abstract is required".to_string());
    } else if abstract_text.chars().count() < MIN_ABSTRACT_LENGTH {
        errors.push(format!(
            "Abstract must be at least {MIN_ABSTRACT_LENGTH} characters long"
        ));
    }

    check_url(&mut errors, "Source code link", draft.source_code_url);
    check_url(&mut errors, "Video link", draft.video_url);
    check_url(&mut errors, "PDF link", draft.pdf_url);

    if draft.category.trim().is_empty() {
        errors.push("Category is required".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(errors.join("; ")))
    }
}

/// Validate the non-secret signup fields and the password confirmation.
///
/// Password strength is checked separately by the auth layer.
pub fn validate_signup(
    full_name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), CoreError> {
    if full_name.trim().is_empty() {
        return Err(CoreError::Validation("Full name is required".into()));
    }

    let email = email.trim();
    if email.is_empty() {
        return Err(CoreError::Validation("Email is required".into()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => {
            return Err(CoreError::Validation(
                "Please enter a valid email address".into(),
            ))
        }
    }

    if password.is_empty() {
        return Err(CoreError::Validation("Password is required".into()));
    }
    if password != confirm_password {
        return Err(CoreError::Validation("Passwords do not match".into()));
    }
    Ok(())
}

/// Validate and trim a comment body.
pub fn validate_comment(comment: &str) -> Result<String, CoreError> {
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(CoreError::Validation("Comment cannot be empty".into()));
    }
    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment must be {MAX_COMMENT_LENGTH} characters or less"
        )));
    }
    Ok(comment.to_string())
}
