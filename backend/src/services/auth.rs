//! Credential verification.
//!
//! The emptiness rule for login input is defined once here, in
//! [`validate_login_input`]. [`AuthenticationService::screen_input`] pairs it
//! with the failure audit event; handlers call that to skip a storage
//! round-trip for blank fields, and `authenticate` applies it again before
//! delegating to the repository.

use std::sync::Arc;

use crate::{
    error::StorageError,
    models::auth::{AuthFailure, AuthenticationResult},
    repositories::credential::CredentialRepository,
    services::audit_log::{AuditEventType, AuditLogEntry, AuditLogServiceTrait},
};

/// Rejects blank or whitespace-only input; username is checked first.
pub fn validate_login_input(username: &str, password: &str) -> Result<(), AuthFailure> {
    if username.trim().is_empty() {
        return Err(AuthFailure::EmptyUsername);
    }
    if password.trim().is_empty() {
        return Err(AuthFailure::EmptyPassword);
    }
    Ok(())
}

#[derive(Clone)]
pub struct AuthenticationService {
    repository: Arc<dyn CredentialRepository>,
    audit: Arc<dyn AuditLogServiceTrait>,
}

impl AuthenticationService {
    pub fn new(
        repository: Arc<dyn CredentialRepository>,
        audit: Arc<dyn AuditLogServiceTrait>,
    ) -> Self {
        Self { repository, audit }
    }

    /// Applies [`validate_login_input`] and audits a rejection.
    pub fn screen_input(
        &self,
        username: &str,
        password: &str,
        client_addr: Option<&str>,
    ) -> Result<(), AuthFailure> {
        validate_login_input(username, password).inspect_err(|failure| {
            self.record_failure(username, *failure, client_addr);
        })
    }

    /// Verifies a username/password pair.
    ///
    /// Trimming only decides emptiness; the repository sees the raw values.
    /// `Err` is reserved for storage failures so callers can answer with a
    /// server error instead of a retry prompt.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        client_addr: Option<&str>,
    ) -> Result<AuthenticationResult, StorageError> {
        if let Err(failure) = self.screen_input(username, password, client_addr) {
            return Ok(AuthenticationResult::Failure(failure));
        }

        tracing::debug!(username, "Authenticating user");
        let user = match self.repository.find_by_credentials(username, password).await {
            Ok(user) => user,
            Err(err) => {
                tracing::error!(
                    username,
                    client_addr,
                    error = %err,
                    "Credential store unavailable during login"
                );
                return Err(err);
            }
        };

        match user {
            Some(user) => {
                self.audit.record_event(
                    AuditLogEntry::success(AuditEventType::LoginSuccess)
                        .actor(user.id, &user.username)
                        .ip(client_addr),
                );
                Ok(AuthenticationResult::Success(user))
            }
            None => {
                let failure = AuthFailure::InvalidCredentials;
                self.record_failure(username, failure, client_addr);
                Ok(AuthenticationResult::Failure(failure))
            }
        }
    }

    fn record_failure(&self, username: &str, failure: AuthFailure, client_addr: Option<&str>) {
        self.audit.record_event(
            AuditLogEntry::failure(AuditEventType::LoginFailure, failure.code())
                .username(username)
                .ip(client_addr),
        );
    }
}
