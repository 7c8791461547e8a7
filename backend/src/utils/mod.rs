pub mod cookies;
pub mod net;

pub use cookies::*;
pub use net::*;
