//! # mdist Common Library
//!
//! Shared code for the mdist services including:
//! - Database initialization, migrations and settings
//! - Event types (MdistEvent enum) and the EventBus
//! - Configuration loading and root folder resolution
//! - SSE helpers
//! - Utility functions

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod sse;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use events::{EventBus, MdistEvent, ReleaseStatus};
