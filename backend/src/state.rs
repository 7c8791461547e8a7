use std::sync::Arc;

use crate::{
    config::Config,
    repositories::credential::CredentialRepository,
    services::{
        audit_log::AuditLogServiceTrait, auth::AuthenticationService,
        session_store::SessionStore,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: Arc<dyn SessionStore>,
    pub auth: AuthenticationService,
    pub audit: Arc<dyn AuditLogServiceTrait>,
}

impl AppState {
    /// Wires the services around an already-seeded repository.
    pub fn new(
        config: Config,
        repository: Arc<dyn CredentialRepository>,
        sessions: Arc<dyn SessionStore>,
        audit: Arc<dyn AuditLogServiceTrait>,
    ) -> Self {
        let auth = AuthenticationService::new(repository, Arc::clone(&audit));
        Self {
            config,
            sessions,
            auth,
            audit,
        }
    }
}
