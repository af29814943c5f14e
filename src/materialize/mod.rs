//! Entity materializers: raw snapshot records to uniform graph nodes.
//!
//! One function per entity kind. Materializers never fail; optional
//! references that are absent become `None` or empty lists.

pub mod deployment_groups;
pub mod environment_groups;
pub mod environments;
pub mod groups;
pub mod labels;
pub mod schedules;
pub mod workloads;

pub use deployment_groups::deployment_groups;
pub use environment_groups::environment_groups;
pub use environments::environments;
pub use groups::groups;
pub use labels::labels;
pub use schedules::schedules;
pub use workloads::workloads;

use chrono::{DateTime, Utc};

/// Display name, falling back to the natural id when the record has none.
fn display_name(name: Option<&str>, fallback: impl ToString) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => fallback.to_string(),
    }
}

/// Unix seconds to UTC; out-of-range values are dropped.
fn timestamp(seconds: Option<i64>) -> Option<DateTime<Utc>> {
    seconds.and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(display_name(Some("edge-01"), 1), "edge-01");
        assert_eq!(display_name(Some("  "), 1), "1");
        assert_eq!(display_name(None, "abc"), "abc");
    }

    #[test]
    fn test_timestamp() {
        let ts = timestamp(Some(1_700_000_000)).unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert!(timestamp(None).is_none());
        assert!(timestamp(Some(i64::MAX)).is_none());
    }
}
