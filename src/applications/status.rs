// src/applications/status.rs
//! Application status machine
//!
//! `submitted < reviewed < accepted` along the main line, with `rejected`
//! and `withdrawn` off to the side. Terminal states are left only through
//! an explicit reopen.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Submitted,
    Reviewed,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "submitted" => Some(Self::Submitted),
            "reviewed" => Some(Self::Reviewed),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            "withdrawn" => Some(Self::Withdrawn),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Reviewed => "reviewed",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Human label used in notifications
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Reviewed => "Reviewed",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::Withdrawn => "Withdrawn",
        }
    }

    /// Position on the main line; `None` for the side states.
    fn order(&self) -> Option<u8> {
        match self {
            Self::Submitted => Some(0),
            Self::Reviewed => Some(1),
            Self::Accepted => Some(2),
            Self::Rejected | Self::Withdrawn => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Withdrawn)
    }

    /// An application blocks a fresh apply unless it was withdrawn.
    pub fn is_open(&self) -> bool {
        *self != Self::Withdrawn
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is asking for the change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Applicant,
    /// The owning company or an admin
    Reviewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Changed {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    NotPermitted(String),
    Invalid(String),
}

impl TransitionError {
    pub fn message(&self) -> &str {
        match self {
            Self::NotPermitted(msg) | Self::Invalid(msg) => msg,
        }
    }
}

/// Checks one requested status change.
pub fn transition(
    current: ApplicationStatus,
    requested: ApplicationStatus,
    actor: Actor,
) -> Result<Transition, TransitionError> {
    use ApplicationStatus::*;

    match (actor, requested) {
        (Actor::Applicant, Withdrawn) => {}
        (Actor::Applicant, _) => {
            return Err(TransitionError::NotPermitted(
                "Applicants can only withdraw their applications".to_string(),
            ))
        }
        (Actor::Reviewer, Withdrawn) => {
            return Err(TransitionError::NotPermitted(
                "Only the applicant can withdraw an application".to_string(),
            ))
        }
        (Actor::Reviewer, _) => {}
    }

    if current == requested {
        return Ok(Transition::Unchanged);
    }

    if current.is_terminal() {
        return Err(TransitionError::Invalid(format!(
            "Cannot change status from '{}' to '{}'",
            current, requested
        )));
    }

    let allowed = match requested {
        Rejected | Withdrawn => true,
        _ => match (current.order(), requested.order()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        },
    };

    if allowed {
        Ok(Transition::Changed {
            from: current,
            to: requested,
        })
    } else {
        Err(TransitionError::Invalid(format!(
            "Invalid status transition from '{}' to '{}'. Status can only move forward.",
            current, requested
        )))
    }
}

/// Reopening by a reviewer: `rejected -> reviewed` only.
pub fn reopen(current: ApplicationStatus) -> Result<ApplicationStatus, TransitionError> {
    match current {
        ApplicationStatus::Rejected => Ok(ApplicationStatus::Reviewed),
        ApplicationStatus::Accepted => Err(TransitionError::Invalid(
            "Accepted applications cannot be reopened".to_string(),
        )),
        other => Err(TransitionError::Invalid(format!(
            "Only rejected applications can be reopened (current status: '{}')",
            other
        ))),
    }
}
