// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session-based authentication.
//!
//! Authorization is not decided here. An authenticated caller becomes a core
//! [`Actor`] and every operation checks the access policy itself.

use roster::Actor;
use roster_domain::{Role, User, UserId};
use roster_persistence::{CredentialData, Persistence, PersistenceError, SessionData};
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// An authenticated user with the role that drives authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The authenticated user's identifier.
    pub user_id: UserId,
    /// The user's email address.
    pub email: String,
    /// The user's role.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(user_id: UserId, email: String, role: Role) -> Self {
        Self {
            user_id,
            email,
            role,
        }
    }

    /// Converts this authenticated actor into the actor the engine checks
    /// against the access policy.
    #[must_use]
    pub const fn to_actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}

impl From<&User> for AuthenticatedActor {
    fn from(user: &User) -> Self {
        Self::new(user.user_id, user.email.clone(), user.role)
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session lifetime (30 days).
    pub const DEFAULT_SESSION_TTL: Duration = Duration::days(30);

    /// Authenticates a user by email and password and creates a session.
    ///
    /// Expired sessions are purged as a side effect. Unknown emails and wrong
    /// passwords produce the same error.
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `user`, `session`)
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails or the session cannot be stored.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
        session_ttl: Duration,
    ) -> Result<(String, User, SessionData), AuthError> {
        let credentials: Option<CredentialData> = persistence
            .get_credentials_by_email(email)
            .map_err(Self::map_persistence_error)?;

        let Some(credentials) = credentials else {
            warn!("Login rejected: unknown email");
            return Err(Self::invalid_credentials());
        };

        let password_valid: bool = persistence
            .verify_password(password, &credentials.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !password_valid {
            warn!(user_id = credentials.user_id, "Login rejected: wrong password");
            return Err(Self::invalid_credentials());
        }

        let user: User = persistence
            .get_user(UserId::new(credentials.user_id))
            .map_err(Self::map_persistence_error)?;

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        persistence
            .delete_expired_sessions(&Self::format_timestamp(now)?)
            .map_err(Self::map_persistence_error)?;

        let session_token: String = Self::generate_session_token(now);
        let expires_at: String = Self::format_timestamp(now + session_ttl)?;

        persistence
            .create_session(&session_token, credentials.user_id, &expires_at)
            .map_err(Self::map_persistence_error)?;

        let session: SessionData = persistence
            .get_session_by_token(&session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::Internal {
                message: String::from("Session not found after creation"),
            })?;

        info!(user_id = %user.user_id, role = %user.role, "User logged in");
        Ok((session_token, user, session))
    }

    /// Validates a session token and returns the authenticated user.
    ///
    /// An expired session is deleted on sight.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown, expired, or its user no
    /// longer exists.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, User), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT).map_err(|e| {
                AuthError::Internal {
                    message: format!("Failed to parse session expiration: {e}"),
                }
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            debug!(session_id = session.session_id, "Session expired");
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: User = persistence
            .get_user(UserId::new(session.user_id))
            .map_err(|e| match e {
                PersistenceError::UserNotFound(_) => AuthError::AuthenticationFailed {
                    reason: String::from("User not found"),
                },
                other => Self::map_persistence_error(other),
            })?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok((AuthenticatedActor::from(&user), user))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)?;

        info!("Session closed");
        Ok(())
    }

    /// Generates an opaque session token.
    fn generate_session_token(now: OffsetDateTime) -> String {
        format!(
            "session_{}_{:016x}{:016x}",
            now.unix_timestamp_nanos(),
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    fn format_timestamp(at: OffsetDateTime) -> Result<String, AuthError> {
        at.format(&Iso8601::DEFAULT).map_err(|e| AuthError::Internal {
            message: format!("Failed to format timestamp: {e}"),
        })
    }

    fn invalid_credentials() -> AuthError {
        AuthError::AuthenticationFailed {
            reason: String::from("Invalid email or password"),
        }
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::Internal {
            message: format!("Database error: {err}"),
        }
    }
}
