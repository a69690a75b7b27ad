// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy validation for user credentials.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password does not mix enough character classes.
    #[error(
        "Password must contain at least {required} of the following: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password repeats the account's own identity.
    #[error("Password must not match the user's {field}")]
    MatchesIdentity { field: &'static str },

    /// Password and confirmation do not match.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Password policy configuration.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    /// Minimum password length in characters.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 12,
            min_complexity: 3,
        }
    }
}

/// Character classes counted towards complexity.
#[derive(Default)]
struct CharacterClasses {
    uppercase: bool,
    lowercase: bool,
    digit: bool,
    symbol: bool,
}

impl CharacterClasses {
    fn of(password: &str) -> Self {
        password.chars().fold(Self::default(), |mut classes, c| {
            if c.is_uppercase() {
                classes.uppercase = true;
            } else if c.is_lowercase() {
                classes.lowercase = true;
            } else if c.is_ascii_digit() {
                classes.digit = true;
            } else if !c.is_whitespace() {
                classes.symbol = true;
            }
            classes
        })
    }

    fn count(&self) -> usize {
        [self.uppercase, self.lowercase, self.digit, self.symbol]
            .iter()
            .filter(|present| **present)
            .count()
    }
}

impl PasswordPolicy {
    /// Validates a password for the user identified by `email` and `full_name`.
    ///
    /// The password may not equal the email, its local part, or the full name,
    /// compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns a `PasswordPolicyError` if the password does not meet policy requirements.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        email: &str,
        full_name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let complexity: usize = Self::calculate_complexity(password);
        if complexity < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found: complexity,
            });
        }

        let password_lower: String = password.to_lowercase();
        let email_lower: String = email.trim().to_lowercase();
        let local_part: &str = email_lower.split('@').next().unwrap_or_default();

        if password_lower == email_lower || password_lower == local_part {
            return Err(PasswordPolicyError::MatchesIdentity { field: "email" });
        }

        if password_lower == full_name.trim().to_lowercase() {
            return Err(PasswordPolicyError::MatchesIdentity { field: "full name" });
        }

        Ok(())
    }

    /// Returns the number of character classes present in `password`.
    fn calculate_complexity(password: &str) -> usize {
        CharacterClasses::of(password).count()
    }
}
