//! The data model of spec.md §3: [`ResourceRecord`], [`ProbeOutcome`], and
//! [`AuditRow`], expressed as named record types rather than the original's
//! duck-typed tuples (REDESIGN FLAGS).

use crate::ids::{DatasetId, ResourceId};
use crate::status::Status;
use chrono::{DateTime, Utc};
use url::Url;

/// A resource as read from the catalog, immutable for the duration of a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub url: Url,
    pub resource_id: ResourceId,
    pub format: String,
    pub dataset_id: DatasetId,
    pub stored_size: Option<u64>,
    pub stored_last_modified: Option<DateTime<Utc>>,
    pub stored_hash: Option<String>,
    pub stored_broken: bool,
}

impl ResourceRecord {
    /// The `host[:port]` of [`Self::url`] (the glossary's "netloc").
    pub fn netloc(&self) -> Option<String> {
        let host = self.url.host_str()?;
        Some(match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }
}

/// What a single probe (HEAD in phase 1, GET+hash in phase 2) observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub size: Option<u64>,
    /// Raw `Last-Modified` header value (RFC-1123), parsed lazily on use.
    pub last_modified: Option<String>,
    /// An HTTP ETag in phase 1, or a computed content digest in phase 2.
    pub digest: Option<String>,
    pub status: Status,
}

impl ProbeOutcome {
    pub fn failed(status: Status) -> Self {
        Self {
            size: None,
            last_modified: None,
            digest: None,
            status,
        }
    }

    pub fn parsed_last_modified(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_modified.as_deref()?;
        httpdate::parse_http_date(raw)
            .ok()
            .map(DateTime::<Utc>::from)
    }
}

/// A fixed-shape audit record for one resource across both probe phases,
/// matching the ordered key list of spec.md §6. Every field is always
/// present; `N/A` fields are rendered as the empty string at the reporting
/// boundary rather than omitted, so the shape never varies row to row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditRow {
    pub resource_id: Option<ResourceId>,
    pub existing_hash: bool,
    pub existing_modified: bool,
    pub existing_size: bool,
    pub existing_broken: bool,
    pub set_broken: bool,
    pub head_status: Option<String>,
    pub head_error: Option<String>,
    pub get_status: Option<String>,
    pub get_error: Option<String>,
    pub new_etag: Option<String>,
    pub etag_changed: bool,
    pub new_modified: Option<String>,
    pub modified_changed: bool,
    pub modified_newer: bool,
    pub modified_value: Option<ModifiedValueSource>,
    pub new_size: Option<u64>,
    pub size_changed: bool,
    pub new_hash: Option<String>,
    pub hash_changed: bool,
    pub update: bool,
}

/// Which source won the last-modified resolution of spec.md §4.6.2 step 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifiedValueSource {
    Today,
    Http,
}

impl AuditRow {
    pub fn new(resource_id: ResourceId, existing: &ResourceRecord) -> Self {
        Self {
            resource_id: Some(resource_id),
            existing_hash: existing.stored_hash.is_some(),
            existing_modified: existing.stored_last_modified.is_some(),
            existing_size: existing.stored_size.is_some(),
            existing_broken: existing.stored_broken,
            ..Default::default()
        }
    }

    fn yn(value: bool) -> &'static str {
        if value {
            "Y"
        } else {
            "N"
        }
    }

    /// The ordered `(key, value)` pairs of spec.md §6, in the exact key order
    /// named there. Used to render both the CSV dump and the summary table.
    pub fn ordered_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Existing Hash", Self::yn(self.existing_hash).to_string()),
            (
                "Existing Modified",
                Self::yn(self.existing_modified).to_string(),
            ),
            ("Existing Size", Self::yn(self.existing_size).to_string()),
            (
                "Existing Broken",
                Self::yn(self.existing_broken).to_string(),
            ),
            ("Set Broken", Self::yn(self.set_broken).to_string()),
            (
                "Head Status",
                self.head_status.clone().unwrap_or_default(),
            ),
            ("Head Error", self.head_error.clone().unwrap_or_default()),
            ("Get Status", self.get_status.clone().unwrap_or_default()),
            ("Get Error", self.get_error.clone().unwrap_or_default()),
            ("New ETag", self.new_etag.clone().unwrap_or_default()),
            ("ETag Changed", Self::yn(self.etag_changed).to_string()),
            (
                "New Modified",
                self.new_modified.clone().unwrap_or_default(),
            ),
            (
                "Modified Changed",
                Self::yn(self.modified_changed).to_string(),
            ),
            (
                "Modified Newer",
                Self::yn(self.modified_newer).to_string(),
            ),
            (
                "Modified Value",
                match self.modified_value {
                    Some(ModifiedValueSource::Today) => "today".to_string(),
                    Some(ModifiedValueSource::Http) => "http".to_string(),
                    None => String::new(),
                },
            ),
            (
                "New Size",
                self.new_size.map(|s| s.to_string()).unwrap_or_default(),
            ),
            ("Size Changed", Self::yn(self.size_changed).to_string()),
            ("New Hash", self.new_hash.clone().unwrap_or_default()),
            ("Hash Changed", Self::yn(self.hash_changed).to_string()),
            ("Update", Self::yn(self.update).to_string()),
        ]
    }

    /// The fixed column headers, in order (the keys of [`Self::ordered_fields`]).
    pub fn headers() -> Vec<&'static str> {
        Self::default()
            .ordered_fields()
            .into_iter()
            .map(|(k, _)| k)
            .collect()
    }
}
