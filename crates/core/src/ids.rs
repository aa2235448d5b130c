//! Run identifiers.
//!
//! A [`RunId`] is a millisecond-precision, compact UTC timestamp followed by
//! a short random suffix: `20260728T143002117-9f1c2a04`. The timestamp
//! prefix makes reverse-lexicographic ordering of run ids equivalent to
//! reverse-chronological ordering, which `w3rt-trace`'s `list_runs` relies
//! on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a single workflow run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Build a `RunId` from an already-formatted string (e.g. when loading
    /// one back off disk). Does not validate the timestamp-prefix
    /// convention — any non-empty string round-trips.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Generate a fresh run id from the given timestamp and random suffix
    /// bytes. Kept side-effect-free (no direct `Utc::now()`/`Uuid::new_v4()`
    /// calls) so callers can inject both for deterministic tests.
    pub fn generate(now: chrono::DateTime<chrono::Utc>, suffix: uuid::Uuid) -> Self {
        let ts = now.format("%Y%m%dT%H%M%S%3f");
        let short = &suffix.simple().to_string()[..8];
        Self(format!("{ts}-{short}"))
    }

    /// Generate a fresh run id using the current time and a random suffix.
    pub fn new() -> Self {
        Self::generate(chrono::Utc::now(), uuid::Uuid::new_v4())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RunId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn generate_is_sortable_by_time() {
        let earlier = RunId::generate(
            chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            uuid::Uuid::nil(),
        );
        let later = RunId::generate(
            chrono::Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap(),
            uuid::Uuid::nil(),
        );
        assert!(earlier.as_str() < later.as_str());
    }

    #[test]
    fn display_matches_as_str() {
        let id = RunId::from_string("20260728T143002117-9f1c2a04");
        assert_eq!(id.to_string(), id.as_str());
    }
}
