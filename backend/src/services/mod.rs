pub mod audit_log;
pub mod auth;
pub mod session_store;

pub use audit_log::{AuditLogEntry, AuditLogService, AuditLogServiceTrait};
pub use auth::{validate_login_input, AuthenticationService};
pub use session_store::{InMemorySessionStore, SessionStore};
