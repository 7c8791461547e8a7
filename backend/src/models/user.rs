//! Models that represent user identities and login payloads.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
/// Authenticated identity as it leaves the credential repository.
///
/// The stored password is deliberately absent; it never crosses the
/// repository boundary.
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Unique, case-sensitive login name.
    pub username: String,
    pub email: String,
    /// Display name shown on the home view.
    pub full_name: String,
}

#[derive(Debug, Clone)]
/// Row inserted by the bootstrap step, password included.
pub struct SeedUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
}

impl SeedUser {
    pub fn new(username: &str, password: &str, email: &str, full_name: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
        }
    }
}

/// Rows inserted into an empty credential store at startup.
pub fn bootstrap_users() -> Vec<SeedUser> {
    vec![
        SeedUser::new("admin", "admin123", "admin@example.com", "管理者"),
        SeedUser::new("user1", "pass123", "user1@example.com", "山田太郎"),
        SeedUser::new("user2", "pass456", "user2@example.com", "佐藤花子"),
    ]
}

#[derive(Debug, Default, Deserialize)]
/// Form fields posted to `/login`. Missing fields deserialize as empty.
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
