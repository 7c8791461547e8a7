pub mod id;

pub use id::{InvalidSessionId, SessionId, UserId};
