// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use roster::{CoreError, EntityKind, ErrorKind};
use roster_domain::DomainError;

use crate::password_policy::PasswordPolicyError;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The credential or session store could not be read or written.
    Internal {
        /// A description of the failure.
        message: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Internal { message } => write!(f, "Authentication backend error: {message}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// `kind()` names the category the server maps to a status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor may not perform the operation.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// A human-readable description of the refusal.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A user has the wrong role for the operation.
    InvalidRole {
        /// A human-readable description of the mismatch.
        message: String,
    },
    /// A scheduling or uniqueness rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: ErrorKind,
        /// A human-readable description of the violation.
        message: String,
    },
    /// A record changed underneath the request.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl ApiError {
    /// Returns the stable machine-readable category of this error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed { .. } => "Unauthenticated",
            Self::Forbidden { .. } => ErrorKind::Forbidden.as_str(),
            Self::ResourceNotFound { .. } => ErrorKind::NotFound.as_str(),
            Self::InvalidInput { .. } | Self::PasswordPolicyViolation { .. } => {
                ErrorKind::InvalidInput.as_str()
            }
            Self::InvalidRole { .. } => ErrorKind::InvalidRole.as_str(),
            Self::DomainRuleViolation { rule, .. } => rule.as_str(),
            Self::Conflict { .. } => ErrorKind::Conflict.as_str(),
            Self::Internal { .. } => ErrorKind::Internal.as_str(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { action, message } => {
                write!(f, "Forbidden '{action}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::InvalidRole { message } => write!(f, "Invalid role: {message}"),
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Internal { message } => Self::Internal { message },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// Every domain error is a field validation failure, so the translation only
/// has to name the offending field.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let field: &str = match &err {
        DomainError::InvalidName(_) => "full_name",
        DomainError::InvalidEmail(_) => "email",
        DomainError::InvalidRole(_) => "role",
        DomainError::InvalidSubject(_) => "subject",
        DomainError::InvalidClassroomName(_) => "name",
        DomainError::InvalidTimeOfDay { .. } | DomainError::InvalidOperatingHours { .. } => {
            "time"
        }
        DomainError::InvalidWeekday(_) | DomainError::NoActiveDays => "days",
    };
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    let message: String = err.to_string();
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::NotFound { entity, .. } => ApiError::ResourceNotFound {
            resource_type: match entity {
                EntityKind::User => String::from("User"),
                EntityKind::Classroom => String::from("Classroom"),
            },
            message,
        },
        CoreError::InvalidRole { .. } => ApiError::InvalidRole { message },
        CoreError::Forbidden { action, .. } => ApiError::Forbidden {
            action: action.to_string(),
            message,
        },
        CoreError::BootstrapClosed => ApiError::Forbidden {
            action: String::from("create_first_principal"),
            message,
        },
        CoreError::AlreadyAssigned { .. }
        | CoreError::ClassroomHasTeacher { .. }
        | CoreError::OutOfHours { .. }
        | CoreError::InvalidDay { .. }
        | CoreError::InvalidRange { .. }
        | CoreError::TimeConflict { .. }
        | CoreError::Duplicate { .. } => ApiError::DomainRuleViolation {
            rule: err.kind(),
            message,
        },
        CoreError::Conflict { .. } | CoreError::IncompleteAssignment { .. } => {
            ApiError::Conflict { message }
        }
        CoreError::Store(msg) => ApiError::Internal { message: msg },
    }
}
