//! ISO-8601-without-timezone timestamp rendering (spec.md §4.6.2 step 5).

use chrono::{DateTime, Utc};

/// Renders `dt` as ISO-8601 without a timezone designator, e.g.
/// `2019-11-10T08:04:27` — the shape the patch schema expects (spec.md §4.6.2
/// step 5), as distinct from `DateTime<Utc>`'s default `+00:00`-suffixed
/// `to_rfc3339`.
pub fn naive_iso8601(dt: DateTime<Utc>) -> String {
    dt.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string()
}
