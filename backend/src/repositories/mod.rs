pub mod credential;
pub mod memory;
pub mod sql;

pub use credential::*;
pub use memory::InMemoryCredentialRepository;
pub use sql::SqlCredentialRepository;
