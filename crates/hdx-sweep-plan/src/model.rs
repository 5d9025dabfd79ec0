//! `RevisionPlan` / `DatasetRevision` / `Patch` (spec.md §3), the smallest
//! per-resource update document the external catalog updater understands.

use hdx_sweep_core::{DatasetId, ResourceId};
use serde::Serialize;
use std::collections::BTreeMap;

/// A revision patch for one resource: either the resource is newly known to
/// be broken, or a subset of `{hash, size, last_modified}` changed (spec.md
/// §3, §6). The two shapes are mutually exclusive in the original schema, so
/// this is an enum rather than a struct with all-optional fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Patch {
    BrokenLink {
        broken_link: bool,
    },
    Fields {
        #[serde(skip_serializing_if = "Option::is_none")]
        hash: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<u64>,
        /// ISO-8601 without a timezone designator (spec.md §4.6.2 step 5).
        #[serde(skip_serializing_if = "Option::is_none")]
        last_modified: Option<String>,
    },
}

impl Patch {
    pub fn broken_link() -> Self {
        Patch::BrokenLink { broken_link: true }
    }

    pub fn fields() -> FieldsBuilder {
        FieldsBuilder::default()
    }

    /// True for a [`Patch::Fields`] patch with no fields actually set (the
    /// result of building one and never calling a setter); such a patch
    /// carries no information and should not be emitted.
    pub fn is_empty(&self) -> bool {
        matches!(
            self,
            Patch::Fields {
                hash: None,
                size: None,
                last_modified: None,
            }
        )
    }
}

/// Accumulates a `Fields` patch one field at a time, mirroring how the
/// decision engine (C6) discovers ETag/size/modified changes independently
/// and only then decides whether to emit the patch.
#[derive(Debug, Clone, Default)]
pub struct FieldsBuilder {
    hash: Option<String>,
    size: Option<u64>,
    last_modified: Option<String>,
}

impl FieldsBuilder {
    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn last_modified(mut self, last_modified: impl Into<String>) -> Self {
        self.last_modified = Some(last_modified.into());
        self
    }

    pub fn has_hash(&self) -> bool {
        self.hash.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.hash.is_none() && self.size.is_none() && self.last_modified.is_none()
    }

    pub fn build(self) -> Patch {
        Patch::Fields {
            hash: self.hash,
            size: self.size,
            last_modified: self.last_modified,
        }
    }
}

/// Identifies the dataset a [`DatasetRevision`] applies to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetMatch {
    pub id: DatasetId,
}

/// One dataset's worth of accumulated resource patches (spec.md §3, §4.7).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetRevision {
    #[serde(rename = "match")]
    pub match_: DatasetMatch,
    pub update_resources: BTreeMap<ResourceId, Patch>,
}

impl DatasetRevision {
    fn new(dataset_id: DatasetId) -> Self {
        Self {
            match_: DatasetMatch { id: dataset_id },
            update_resources: BTreeMap::new(),
        }
    }
}

/// `mapping dataset_id → DatasetRevision` (spec.md §3), the full output
/// handed to the external catalog updater at sweep end.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevisionPlan {
    #[serde(flatten)]
    datasets: BTreeMap<DatasetId, DatasetRevision>,
}

impl RevisionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn datasets(&self) -> &BTreeMap<DatasetId, DatasetRevision> {
        &self.datasets
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn resource_count(&self) -> usize {
        self.datasets
            .values()
            .map(|d| d.update_resources.len())
            .sum()
    }

    /// Merges one `(dataset_id, resource_id, patch)` triple into the plan
    /// (spec.md §4.7). If `resource_id` already has a patch in this plan
    /// (e.g. HEAD decided a size change, GET later decided a hash change),
    /// the new patch **replaces** the earlier one rather than merging fields.
    pub fn add_patch(&mut self, dataset_id: DatasetId, resource_id: ResourceId, patch: Patch) {
        self.datasets
            .entry(dataset_id.clone())
            .or_insert_with(|| DatasetRevision::new(dataset_id))
            .update_resources
            .insert(resource_id, patch);
    }
}
