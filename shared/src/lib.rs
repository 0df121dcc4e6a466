// shared/src/lib.rs

use std::time::Duration;

/// Errors raised by a cache transport.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Time-to-live for a cache entry, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlMs(pub u64);

impl TtlMs {
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1000)
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

pub mod config;
