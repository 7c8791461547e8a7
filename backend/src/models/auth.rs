//! Outcomes of a login attempt.

use serde::Serialize;

use crate::models::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailure {
    EmptyUsername,
    EmptyPassword,
    InvalidCredentials,
}

impl AuthFailure {
    pub fn code(&self) -> &'static str {
        match self {
            AuthFailure::EmptyUsername => "empty_username",
            AuthFailure::EmptyPassword => "empty_password",
            AuthFailure::InvalidCredentials => "invalid_credentials",
        }
    }

    /// Message shown on the login form. Invalid credentials never say which
    /// field was wrong.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthFailure::EmptyUsername | AuthFailure::EmptyPassword => {
                "Please enter your username and password"
            }
            AuthFailure::InvalidCredentials => "Invalid username or password",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationResult {
    Success(User),
    Failure(AuthFailure),
}

impl AuthenticationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthenticationResult::Success(_))
    }
}
