// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Validates a person's full name.
///
/// # Errors
///
/// Returns an error if the name is empty or only whitespace.
pub fn validate_full_name(full_name: &str) -> Result<(), DomainError> {
    if full_name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates an email address.
///
/// Only the shape is checked: a non-empty local part, a single `@`, and a
/// domain containing a dot. Deliverability is not our concern.
///
/// # Errors
///
/// Returns an error if the email is empty or malformed.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let email: &str = email.trim();
    if email.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email cannot be empty",
        )));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::InvalidEmail(format!(
            "'{email}' is missing an '@'"
        )));
    };

    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(DomainError::InvalidEmail(format!(
            "'{email}' is not a valid address"
        )));
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(DomainError::InvalidEmail(format!(
            "'{email}' has an invalid domain"
        )));
    }

    Ok(())
}

/// Validates a period subject label.
///
/// # Errors
///
/// Returns an error if the subject is empty or only whitespace.
pub fn validate_subject(subject: &str) -> Result<(), DomainError> {
    if subject.trim().is_empty() {
        return Err(DomainError::InvalidSubject(String::from(
            "Subject cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a classroom name.
///
/// # Errors
///
/// Returns an error if the name is empty or only whitespace.
pub fn validate_classroom_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidClassroomName(String::from(
            "Classroom name cannot be empty",
        )));
    }
    Ok(())
}
