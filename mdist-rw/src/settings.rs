//! Runtime settings read from the `settings` table at startup

use mdist_common::db::settings::{get_setting, EVENT_BUS_CAPACITY, RELEASE_MIN_LEAD_DAYS};
use mdist_common::Result;
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::warn;

use crate::validators::DEFAULT_MIN_LEAD_DAYS;

pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub release_min_lead_days: u32,
    pub event_bus_capacity: usize,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            release_min_lead_days: DEFAULT_MIN_LEAD_DAYS,
            event_bus_capacity: DEFAULT_EVENT_BUS_CAPACITY,
        }
    }
}

impl RuntimeSettings {
    /// Unparsable values fall back to defaults with a warning
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            release_min_lead_days: parse_or(
                RELEASE_MIN_LEAD_DAYS,
                get_setting(pool, RELEASE_MIN_LEAD_DAYS).await?,
                defaults.release_min_lead_days,
            ),
            event_bus_capacity: parse_or(
                EVENT_BUS_CAPACITY,
                get_setting(pool, EVENT_BUS_CAPACITY).await?,
                defaults.event_bus_capacity,
            ),
        })
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        None => default,
        Some(text) => text.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value '{}' for setting {}, using {}", text, key, default);
            default
        }),
    }
}
