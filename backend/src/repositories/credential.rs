use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::user::User;

/// Persistence boundary for login credentials.
///
/// `Ok(None)` means no row matched; `Err` means the store could not be asked.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Exact, case-sensitive match on both username and password.
    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, StorageError>;

    /// Creates the backing table if needed and inserts the bootstrap rows
    /// into an empty store. Safe to call more than once.
    async fn ensure_seeded(&self) -> Result<(), StorageError>;
}
