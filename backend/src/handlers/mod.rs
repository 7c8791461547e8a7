pub mod auth;
pub mod pages;
pub mod reply;

pub use reply::{Outcome, Reply, View};

pub const INDEX_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";
pub const HOME_PATH: &str = "/home";

pub const INDEX_VIEW: &str = "index";
pub const LOGIN_VIEW: &str = "login";
pub const HOME_VIEW: &str = "home";
