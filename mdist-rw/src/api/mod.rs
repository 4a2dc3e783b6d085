//! HTTP API handlers for mdist-rw

pub mod actor;
pub mod admin;
pub mod assets;
pub mod health;
pub mod library;
pub mod releases;
pub mod wizard;

pub use actor::{ROLE_HEADER, USER_HEADER};
pub use health::health_routes;
