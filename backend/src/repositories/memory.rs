//! Credential repository held entirely in process memory.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{
    error::StorageError,
    models::user::{bootstrap_users, SeedUser, User},
    repositories::credential::CredentialRepository,
    types::UserId,
};

#[derive(Debug, Clone)]
struct StoredUser {
    id: UserId,
    username: String,
    password: String,
    email: String,
    full_name: String,
}

impl StoredUser {
    fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCredentialRepository {
    rows: RwLock<Vec<StoredUser>>,
}

impl InMemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository holding `users`, ids assigned in order from 1.
    pub fn with_users(users: Vec<SeedUser>) -> Result<Self, StorageError> {
        let repo = Self::new();
        for user in users {
            repo.insert(user)?;
        }
        Ok(repo)
    }

    /// Inserts a row, enforcing the unique username constraint.
    pub fn insert(&self, seed: SeedUser) -> Result<User, StorageError> {
        push_row(&mut self.rows.write(), seed)
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, StorageError> {
        let rows = self.rows.read();
        Ok(rows
            .iter()
            .find(|row| row.username == username && row.password == password)
            .map(StoredUser::to_user))
    }

    async fn ensure_seeded(&self) -> Result<(), StorageError> {
        let mut rows = self.rows.write();
        if !rows.is_empty() {
            return Ok(());
        }
        for seed in bootstrap_users() {
            push_row(&mut rows, seed)?;
        }
        tracing::info!(rows = rows.len(), "Seeded in-memory credential store");
        Ok(())
    }
}

fn push_row(rows: &mut Vec<StoredUser>, seed: SeedUser) -> Result<User, StorageError> {
    if seed.username.is_empty() {
        return Err(StorageError::Constraint(
            "username must not be empty".to_string(),
        ));
    }
    if rows.iter().any(|row| row.username == seed.username) {
        return Err(StorageError::Constraint(format!(
            "duplicate username {}",
            seed.username
        )));
    }
    let stored = StoredUser {
        id: UserId::new(rows.len() as i64 + 1),
        username: seed.username,
        password: seed.password,
        email: seed.email,
        full_name: seed.full_name,
    };
    let user = stored.to_user();
    rows.push(stored);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_repository_finds_exact_match() {
        let repo = InMemoryCredentialRepository::new();
        repo.ensure_seeded().await.expect("seed");

        let user = repo
            .find_by_credentials("admin", "admin123")
            .await
            .expect("lookup")
            .expect("admin exists");
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.email, "admin@example.com");
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive_and_exact() {
        let repo = InMemoryCredentialRepository::with_users(bootstrap_users()).expect("repo");

        for (username, password) in [
            ("Admin", "admin123"),
            ("admin", "ADMIN123"),
            ("admin ", "admin123"),
            ("adm", "admin123"),
            ("admin", "admin12"),
            ("user1", "pass456"),
        ] {
            let found = repo
                .find_by_credentials(username, password)
                .await
                .expect("lookup");
            assert!(found.is_none(), "{username}/{password} should not match");
        }
    }

    #[tokio::test]
    async fn ensure_seeded_is_idempotent() {
        let repo = InMemoryCredentialRepository::new();
        repo.ensure_seeded().await.expect("first seed");
        repo.ensure_seeded().await.expect("second seed");
        assert_eq!(repo.len(), bootstrap_users().len());
    }

    #[test]
    fn insert_rejects_duplicate_username() {
        let repo = InMemoryCredentialRepository::new();
        repo.insert(SeedUser::new("alice", "a", "a@example.com", "Alice"))
            .expect("first insert");
        let err = repo
            .insert(SeedUser::new("alice", "b", "b@example.com", "Alice B"))
            .expect_err("duplicate");
        assert!(err.to_string().contains("duplicate username"));
    }
}
