use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

pub const AUDIT_TARGET: &str = "audit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    LoginSuccess,
    LoginFailure,
    SessionCreate,
    Logout,
    SessionInvalidate,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::LoginSuccess => "login_success",
            AuditEventType::LoginFailure => "login_failure",
            AuditEventType::SessionCreate => "session_create",
            AuditEventType::Logout => "logout",
            AuditEventType::SessionInvalidate => "session_invalidate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLogEntry {
    pub occurred_at: DateTime<Utc>,
    pub event_type: AuditEventType,
    /// User id of the acting identity, when known.
    pub actor_id: Option<String>,
    /// Username as typed or as stored.
    pub username: Option<String>,
    /// Session fingerprint, never the full token.
    pub session: Option<String>,
    pub result: &'static str,
    pub error_code: Option<String>,
    pub ip: Option<String>,
    pub metadata: Option<Value>,
}

impl AuditLogEntry {
    pub fn new(event_type: AuditEventType, result: &'static str) -> Self {
        Self {
            occurred_at: Utc::now(),
            event_type,
            actor_id: None,
            username: None,
            session: None,
            result,
            error_code: None,
            ip: None,
            metadata: None,
        }
    }

    pub fn success(event_type: AuditEventType) -> Self {
        Self::new(event_type, "success")
    }

    pub fn failure(event_type: AuditEventType, error_code: &str) -> Self {
        let mut entry = Self::new(event_type, "failure");
        entry.error_code = Some(error_code.to_string());
        entry
    }

    pub fn actor(mut self, actor_id: impl ToString, username: &str) -> Self {
        self.actor_id = Some(actor_id.to_string());
        self.username = Some(username.to_string());
        self
    }

    pub fn username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    pub fn session(mut self, fingerprint: String) -> Self {
        self.session = Some(fingerprint);
        self
    }

    pub fn ip(mut self, ip: Option<&str>) -> Self {
        self.ip = ip.map(str::to_string);
        self
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait AuditLogServiceTrait: Send + Sync {
    fn record_event(&self, entry: AuditLogEntry);
}

/// Writes audit entries as structured `tracing` events on the `audit` target.
#[derive(Debug, Clone, Default)]
pub struct AuditLogService;

impl AuditLogService {
    pub fn new() -> Self {
        Self
    }
}

impl AuditLogServiceTrait for AuditLogService {
    fn record_event(&self, entry: AuditLogEntry) {
        let metadata = entry.metadata.as_ref().map(Value::to_string);
        if entry.result == "success" {
            tracing::info!(
                target: AUDIT_TARGET,
                occurred_at = %entry.occurred_at,
                event_type = entry.event_type.as_str(),
                actor_id = entry.actor_id.as_deref(),
                username = entry.username.as_deref(),
                session = entry.session.as_deref(),
                ip = entry.ip.as_deref(),
                metadata = metadata.as_deref(),
                "audit event"
            );
        } else {
            tracing::warn!(
                target: AUDIT_TARGET,
                occurred_at = %entry.occurred_at,
                event_type = entry.event_type.as_str(),
                actor_id = entry.actor_id.as_deref(),
                username = entry.username.as_deref(),
                session = entry.session.as_deref(),
                error_code = entry.error_code.as_deref(),
                ip = entry.ip.as_deref(),
                metadata = metadata.as_deref(),
                "audit event"
            );
        }
    }
}
