//! SQLite-backed credential repository.

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::{
    db::connection::DbPool,
    error::StorageError,
    models::user::{bootstrap_users, User},
    repositories::credential::CredentialRepository,
};

const SELECT_BY_CREDENTIALS: &str =
    "SELECT id, username, email, full_name FROM users WHERE username = ? AND password = ?";

pub struct SqlCredentialRepository {
    pool: DbPool,
    seeded: OnceCell<()>,
}

impl SqlCredentialRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            seeded: OnceCell::new(),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn migrate_and_seed(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;

        let mut tx = self.pool.begin().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;
        if count == 0 {
            let seeds = bootstrap_users();
            for seed in &seeds {
                sqlx::query(
                    "INSERT INTO users (username, password, email, full_name) VALUES (?, ?, ?, ?)",
                )
                .bind(&seed.username)
                .bind(&seed.password)
                .bind(&seed.email)
                .bind(&seed.full_name)
                .execute(&mut *tx)
                .await?;
            }
            tracing::info!(rows = seeds.len(), "Inserted bootstrap users");
        }
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialRepository for SqlCredentialRepository {
    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(SELECT_BY_CREDENTIALS)
            .bind(username)
            .bind(password)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, "Credential lookup failed");
                StorageError::from(err)
            })?;
        Ok(user)
    }

    async fn ensure_seeded(&self) -> Result<(), StorageError> {
        self.seeded
            .get_or_try_init(|| self.migrate_and_seed())
            .await
            .map(|_| ())
    }
}
