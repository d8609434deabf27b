//! When to leave an existing release alone
//!
//! Every body OctoCheese writes ends with a `<!-- Octocheese: Last Updated
//! YYYY-MM-DD -->` marker. A release whose last update (the marker, or its
//! creation time when there is no marker) is older than the policy's maximum
//! age is considered settled and is not edited again, which keeps the number
//! of API calls down on repositories with a long release history.

use crate::github::types::GitHubRelease;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;

const MARKER_PATTERN: &str = r"<!-- Octocheese: Last Updated (\d{4}-\d{2}-\d{2}) -->";

/// The machine-readable marker that ends every release body
pub fn marker(date: NaiveDate) -> String {
    format!("<!-- Octocheese: Last Updated {} -->", date.format("%Y-%m-%d"))
}

/// Date recorded by the last marker in a release body, if any parses
pub fn parse_last_updated(body: &str) -> Option<NaiveDate> {
    let re = Regex::new(MARKER_PATTERN).ok()?;
    re.captures_iter(body)
        .filter_map(|caps| NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok())
        .last()
}

/// When a release was last touched: its marker date (midnight UTC), falling
/// back to its creation time
pub fn last_updated(release: &GitHubRelease) -> DateTime<Utc> {
    parse_last_updated(release.body())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(release.created_at)
}

/// Maximum age after which existing releases are skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    max_age: Option<Duration>,
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self {
            max_age: Some(Duration::days(7)),
        }
    }
}

impl StalenessPolicy {
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age: Some(max_age),
        }
    }

    /// Never skip: every existing release is edited
    pub fn disabled() -> Self {
        Self { max_age: None }
    }

    /// `0` disables the policy
    pub fn from_days(days: u32) -> Self {
        if days == 0 {
            Self::disabled()
        } else {
            Self::new(Duration::days(i64::from(days)))
        }
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// `true` if the release was last updated more than `max_age` before
    /// `now` and should be left as it is.
    pub fn is_stale(&self, release: &GitHubRelease, now: DateTime<Utc>) -> bool {
        match self.max_age {
            Some(max_age) => now - last_updated(release) > max_age,
            None => false,
        }
    }
}
