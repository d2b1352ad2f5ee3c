//! Project moderation state machine.
//!
//! A submitted project starts `pending`. A moderator either approves it or
//! disapproves it with notes; both outcomes are terminal for the moderator.
//! The owner may resubmit a rejected project, which returns it to `pending`.
//!
//! ```text
//! pending --approve-------------> approved
//! pending --disapprove(notes)---> rejected --resubmit--> pending
//! ```

use crate::error::CoreError;

/// Awaiting moderator review.
pub const PROJECT_PENDING: &str = "pending";

/// Visible in the public feed.
pub const PROJECT_APPROVED: &str = "approved";

/// Returned to the owner with admin notes.
pub const PROJECT_REJECTED: &str = "rejected";

/// All valid project status values.
pub const VALID_PROJECT_STATUSES: &[&str] = &[PROJECT_PENDING, PROJECT_APPROVED, PROJECT_REJECTED];

/// Validate that a status string is one of the accepted values.
pub fn validate_project_status(status: &str) -> Result<(), String> {
    if VALID_PROJECT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid project status '{status}'. Must be one of: {}",
            VALID_PROJECT_STATUSES.join(", ")
        ))
    }
}

/// A moderator's verdict on a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Disapprove { notes: String },
}

impl Decision {
    /// Build a disapproval, rejecting empty or whitespace-only notes.
    ///
    /// The stored notes are trimmed.
    pub fn disapprove(notes: &str) -> Result<Self, CoreError> {
        let notes = notes.trim();
        if notes.is_empty() {
            return Err(CoreError::Validation(
                "Admin notes are required when disapproving a project".into(),
            ));
        }
        Ok(Decision::Disapprove {
            notes: notes.to_string(),
        })
    }

    /// The status this decision moves a project into.
    pub fn target_status(&self) -> &'static str {
        match self {
            Decision::Approve => PROJECT_APPROVED,
            Decision::Disapprove { .. } => PROJECT_REJECTED,
        }
    }

    pub fn notes(&self) -> Option<&str> {
        match self {
            Decision::Approve => None,
            Decision::Disapprove { notes } => Some(notes),
        }
    }
}

/// What applying a [`Decision`] to a project's current status amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Update the row, guarded on `from` still being the stored status.
    Apply {
        from: &'static str,
        to: &'static str,
    },
    /// The project already carries this decision; nothing to write.
    NoOp,
}

/// Decide how `decision` applies to a project currently in `current_status`.
///
/// Repeating a decision is a no-op. Reversing a decision is a conflict: an
/// approved project cannot be rejected and vice versa.
pub fn plan_decision(current_status: &str, decision: &Decision) -> Result<Transition, CoreError> {
    let target = decision.target_status();

    match current_status {
        PROJECT_PENDING => Ok(Transition::Apply {
            from: PROJECT_PENDING,
            to: target,
        }),
        s if s == target => Ok(Transition::NoOp),
        PROJECT_APPROVED => Err(CoreError::Conflict(
            "Project is already approved and cannot be disapproved".into(),
        )),
        PROJECT_REJECTED => Err(CoreError::Conflict(
            "Project was disapproved and must be resubmitted by its owner first".into(),
        )),
        other => Err(CoreError::Internal(format!(
            "Project has unknown status '{other}'"
        ))),
    }
}

/// Check that the owner may resubmit a project in `current_status`.
pub fn plan_resubmission(current_status: &str) -> Result<Transition, CoreError> {
    match current_status {
        PROJECT_REJECTED => Ok(Transition::Apply {
            from: PROJECT_REJECTED,
            to: PROJECT_PENDING,
        }),
        PROJECT_PENDING => Err(CoreError::Conflict(
            "Project is already awaiting review".into(),
        )),
        _ => Err(CoreError::Conflict(
            "Only disapproved projects can be resubmitted".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn approve_pending_applies() {
        let t = plan_decision(PROJECT_PENDING, &Decision::Approve).unwrap();
        assert_eq!(
            t,
            Transition::Apply {
                from: PROJECT_PENDING,
                to: PROJECT_APPROVED
            }
        );
    }

    #[test]
    fn disapprove_pending_applies() {
        let d = Decision::disapprove("missing abstract").unwrap();
        let t = plan_decision(PROJECT_PENDING, &d).unwrap();
        assert_eq!(
            t,
            Transition::Apply {
                from: PROJECT_PENDING,
                to: PROJECT_REJECTED
            }
        );
    }

    #[test]
    fn approving_twice_is_a_noop() {
        assert_eq!(
            plan_decision(PROJECT_APPROVED, &Decision::Approve).unwrap(),
            Transition::NoOp
        );
    }

    #[test]
    fn disapproving_twice_is_a_noop() {
        let d = Decision::disapprove("still broken").unwrap();
        assert_eq!(plan_decision(PROJECT_REJECTED, &d).unwrap(), Transition::NoOp);
    }

    #[test]
    fn reversing_a_decision_conflicts() {
        let d = Decision::disapprove("late change of mind").unwrap();
        assert_matches!(plan_decision(PROJECT_APPROVED, &d), Err(CoreError::Conflict(_)));
        assert_matches!(
            plan_decision(PROJECT_REJECTED, &Decision::Approve),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn unknown_status_is_internal() {
        assert_matches!(
            plan_decision("archived", &Decision::Approve),
            Err(CoreError::Internal(_))
        );
    }

    #[test]
    fn empty_notes_rejected() {
        assert_matches!(Decision::disapprove(""), Err(CoreError::Validation(_)));
        assert_matches!(Decision::disapprove("   \n\t"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn notes_are_trimmed() {
        let d = Decision::disapprove("  needs a demo video \n").unwrap();
        assert_eq!(d.notes(), Some("needs a demo video"));
        assert_eq!(d.target_status(), PROJECT_REJECTED);
    }

    #[test]
    fn resubmission_only_from_rejected() {
        assert_eq!(
            plan_resubmission(PROJECT_REJECTED).unwrap(),
            Transition::Apply {
                from: PROJECT_REJECTED,
                to: PROJECT_PENDING
            }
        );
        assert_matches!(plan_resubmission(PROJECT_PENDING), Err(CoreError::Conflict(_)));
        assert_matches!(plan_resubmission(PROJECT_APPROVED), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn status_validation() {
        for s in VALID_PROJECT_STATUSES {
            assert!(validate_project_status(s).is_ok());
        }
        assert!(validate_project_status("deleted").is_err());
    }
}
