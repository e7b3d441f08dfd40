//! Note identifier generation
//!
//! The default strategy renders the creation time as decimal nanoseconds since
//! the Unix epoch. Readings are forced strictly increasing through an atomic
//! high-water mark, so two notes created within one clock tick still get
//! distinct ids.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// How new note ids are derived
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Monotonic nanosecond timestamp, e.g. `1718030204123456789`
    #[default]
    Timestamp,
    /// Random UUID v4
    Uuid,
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp => write!(f, "timestamp"),
            Self::Uuid => write!(f, "uuid"),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "timestamp" => Ok(Self::Timestamp),
            "uuid" => Ok(Self::Uuid),
            _ => Err(format!("Unknown id strategy: {}", s)),
        }
    }
}

/// Hands out unique note ids
#[derive(Debug, Default)]
pub struct NoteIdGenerator {
    strategy: IdStrategy,
    last_nanos: AtomicU64,
}

impl NoteIdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            last_nanos: AtomicU64::new(0),
        }
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Produce the next id
    pub fn next_id(&self) -> String {
        match self.strategy {
            IdStrategy::Timestamp => self.next_timestamp().to_string(),
            IdStrategy::Uuid => Uuid::new_v4().to_string(),
        }
    }

    fn next_timestamp(&self) -> u64 {
        // Pre-epoch clocks read as 0; the high-water mark still keeps ids unique.
        let now = Utc::now()
            .timestamp_nanos_opt()
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0);

        let mut last = self.last_nanos.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self.last_nanos.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}
