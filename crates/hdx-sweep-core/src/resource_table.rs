//! Resource Table (C1, spec.md §4.1).
//!
//! The catalog API client itself (search/read/revise) is an out-of-scope
//! collaborator (spec.md §1); this module only consumes whatever iterator of
//! raw records it hands back and turns it into the typed, filtered
//! [`ResourceRecord`] set the rest of the sweep operates on.

use crate::ids::{DatasetId, ResourceId};
use crate::model::ResourceRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// A resource record as handed back by the catalog client, before parsing
/// and filtering. Mirrors the tuple the original's `DatasetProcessor.process`
/// assembles from a raw HDX API resource dict.
///
/// `Serialize`/`Deserialize` support the replay fixture client's
/// `--save`/`--use-saved` round-trip, not the catalog API itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResourceRecord {
    pub url: String,
    pub resource_id: String,
    pub format: String,
    pub dataset_id: String,
    pub stored_size: Option<u64>,
    pub stored_last_modified: Option<DateTime<Utc>>,
    pub stored_hash: Option<String>,
    pub stored_broken: bool,
}

/// In-memory keyed store of resource records consumed from the catalog (C1).
#[derive(Debug, Default)]
pub struct ResourceTable {
    records: Vec<ResourceRecord>,
    netlocs: HashSet<String>,
}

impl ResourceTable {
    /// Loads and filters raw catalog records (spec.md §4.1):
    /// - drops records whose URL has no parseable netloc (structural error,
    ///   not a runtime error — spec.md §7 category 4),
    /// - drops records whose netloc is in `netloc_ignore`,
    /// - drops records whose format is in `format_ignore`,
    /// - optionally restricts to resource ids with the given hex `shard_prefix`
    ///   (a local safety net mirroring the catalog-side `id:<prefix>*` filter
    ///   of spec.md §4.8, in case the supplied iterator isn't already scoped).
    ///
    /// Duplicate `resource_id`s keep the last-seen record, per spec.md §9's
    /// open question (callers should ensure uniqueness upstream).
    pub fn load(
        raw_records: impl IntoIterator<Item = RawResourceRecord>,
        netloc_ignore: &HashSet<String>,
        format_ignore: &HashSet<String>,
        shard_prefix: Option<&str>,
    ) -> Self {
        let mut by_id = std::collections::HashMap::new();
        let mut netlocs = HashSet::new();

        for raw in raw_records {
            if let Some(prefix) = shard_prefix {
                if !raw.resource_id.starts_with(prefix) {
                    continue;
                }
            }

            let Ok(url) = Url::parse(&raw.url) else {
                tracing::debug!(url = %raw.url, "dropping resource with unparseable URL");
                continue;
            };
            let Some(host) = url.host_str() else {
                tracing::debug!(url = %raw.url, "dropping resource with no netloc");
                continue;
            };
            let netloc = match url.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            };

            if netloc_ignore.contains(&netloc) {
                continue;
            }
            if format_ignore.contains(&raw.format) {
                continue;
            }

            netlocs.insert(netloc);
            by_id.insert(
                raw.resource_id.clone(),
                ResourceRecord {
                    url,
                    resource_id: ResourceId(raw.resource_id),
                    format: raw.format,
                    dataset_id: DatasetId(raw.dataset_id),
                    stored_size: raw.stored_size,
                    stored_last_modified: raw.stored_last_modified,
                    stored_hash: raw.stored_hash,
                    stored_broken: raw.stored_broken,
                },
            );
        }

        Self {
            records: by_id.into_values().collect(),
            netlocs,
        }
    }

    pub fn records(&self) -> &[ResourceRecord] {
        &self.records
    }

    /// The distinct netlocs observed across all loaded records, used to
    /// pre-size the host scheduler (spec.md §4.1).
    pub fn netlocs(&self) -> &HashSet<String> {
        &self.netlocs
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
