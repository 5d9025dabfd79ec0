//! Revision Plan Aggregator (C7, spec.md §4.7): `RevisionPlan`/`DatasetRevision`/
//! `Patch` types and the per-dataset merge.

pub mod model;

pub use model::{DatasetMatch, DatasetRevision, FieldsBuilder, Patch, RevisionPlan};
