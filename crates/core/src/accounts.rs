//! Account status lifecycle, teacher approval, and session routing.
//!
//! Teachers sign up `pending` and cannot open a session until a moderator
//! approves them. Approved teachers may be promoted to `teacher_admin` and
//! demoted back. Every other account is `active` from signup.

use serde::Serialize;

use crate::error::CoreError;
use crate::roles::{is_moderator, is_teacher, ROLE_TEACHER, ROLE_TEACHER_ADMIN};

pub const ACCOUNT_PENDING: &str = "pending";
pub const ACCOUNT_ACTIVE: &str = "active";
pub const ACCOUNT_REJECTED: &str = "rejected";

/// Status assigned to a freshly created account with the given role.
pub fn initial_status(role: &str) -> &'static str {
    if is_teacher(role) {
        ACCOUNT_PENDING
    } else {
        ACCOUNT_ACTIVE
    }
}

// ---------------------------------------------------------------------------
// Teacher lifecycle
// ---------------------------------------------------------------------------

/// A moderator action on a teacher account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeacherAction {
    Approve,
    Reject,
    Promote,
    Demote,
}

impl TeacherAction {
    pub fn as_str(self) -> &'static str {
        match self {
            TeacherAction::Approve => "approve",
            TeacherAction::Reject => "reject",
            TeacherAction::Promote => "promote",
            TeacherAction::Demote => "demote",
        }
    }
}

/// A guarded role/status update. The repository applies it only while the
/// row still holds `from_role` and `from_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountTransition {
    pub from_role: &'static str,
    pub from_status: &'static str,
    pub to_role: &'static str,
    pub to_status: &'static str,
}

fn teacher_role(role: &str) -> Result<&'static str, CoreError> {
    match role {
        ROLE_TEACHER => Ok(ROLE_TEACHER),
        ROLE_TEACHER_ADMIN => Ok(ROLE_TEACHER_ADMIN),
        other => Err(CoreError::Validation(format!(
            "Account with role '{other}' is not a teacher account"
        ))),
    }
}

fn account_status(status: &str) -> Result<&'static str, CoreError> {
    match status {
        ACCOUNT_PENDING => Ok(ACCOUNT_PENDING),
        ACCOUNT_ACTIVE => Ok(ACCOUNT_ACTIVE),
        ACCOUNT_REJECTED => Ok(ACCOUNT_REJECTED),
        other => Err(CoreError::Internal(format!(
            "Account has unknown status '{other}'"
        ))),
    }
}

/// Decide the role/status change `action` makes to a teacher account.
pub fn plan_teacher_action(
    action: TeacherAction,
    current_role: &str,
    current_status: &str,
) -> Result<AccountTransition, CoreError> {
    let from_role = teacher_role(current_role)?;
    let from_status = account_status(current_status)?;

    let (to_role, to_status) = match action {
        TeacherAction::Approve | TeacherAction::Reject => {
            if from_status != ACCOUNT_PENDING {
                return Err(CoreError::Conflict(format!(
                    "Teacher account is already {from_status}"
                )));
            }
            let to_status = if action == TeacherAction::Approve {
                ACCOUNT_ACTIVE
            } else {
                ACCOUNT_REJECTED
            };
            (from_role, to_status)
        }
        TeacherAction::Promote | TeacherAction::Demote => {
            if from_status != ACCOUNT_ACTIVE {
                return Err(CoreError::Conflict(format!(
                    "Only active teachers can be promoted or demoted (account is {from_status})"
                )));
            }
            match (action, from_role) {
                (TeacherAction::Promote, ROLE_TEACHER) => (ROLE_TEACHER_ADMIN, from_status),
                (TeacherAction::Demote, ROLE_TEACHER_ADMIN) => (ROLE_TEACHER, from_status),
                (TeacherAction::Promote, _) => {
                    return Err(CoreError::Conflict(
                        "Teacher is already a teacher admin".into(),
                    ))
                }
                _ => {
                    return Err(CoreError::Conflict(
                        "Teacher is not a teacher admin".into(),
                    ))
                }
            }
        }
    };

    Ok(AccountTransition {
        from_role,
        from_status,
        to_role,
        to_status,
    })
}

// ---------------------------------------------------------------------------
// Session routing
// ---------------------------------------------------------------------------

/// Which screen set a session opens into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionRoute {
    Admin,
    Standard,
    PendingApproval,
    Rejected,
}

impl SessionRoute {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionRoute::Admin => "admin",
            SessionRoute::Standard => "standard",
            SessionRoute::PendingApproval => "pending_approval",
            SessionRoute::Rejected => "rejected",
        }
    }

    /// Whether the route lets the session proceed.
    pub fn is_allowed(self) -> bool {
        matches!(self, SessionRoute::Admin | SessionRoute::Standard)
    }

    /// Message shown on the explanatory screen of a denied route.
    pub fn denial_message(self) -> Option<&'static str> {
        match self {
            SessionRoute::PendingApproval => Some(
                "Your teacher account is pending approval. \
                 You will be able to log in once an administrator approves it.",
            ),
            SessionRoute::Rejected => Some(
                "Your teacher account registration was rejected. \
                 Please contact an administrator for more information.",
            ),
            SessionRoute::Admin | SessionRoute::Standard => None,
        }
    }
}

/// Route a session from the account's current role and status.
pub fn resolve_session_route(role: &str, status: &str) -> SessionRoute {
    match status {
        ACCOUNT_REJECTED => SessionRoute::Rejected,
        ACCOUNT_PENDING if is_teacher(role) => SessionRoute::PendingApproval,
        _ if is_moderator(role) => SessionRoute::Admin,
        _ => SessionRoute::Standard,
    }
}

/// Resolve the route and turn a denied one into [`CoreError::SessionDenied`].
pub fn ensure_session_allowed(role: &str, status: &str) -> Result<SessionRoute, CoreError> {
    let route = resolve_session_route(role, status);
    match route.denial_message() {
        None => Ok(route),
        Some(message) => Err(CoreError::SessionDenied {
            route: route.as_str(),
            message: message.to_string(),
        }),
    }
}
