//! Shared data model, status taxonomy, configuration, and error types for the
//! HDX resource change-detection sweep.

pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod ids;
pub mod model;
pub mod resource_table;
pub mod status;

pub use config::SweepConfig;
pub use error::{SweepError, SweepResult};
pub use ids::{DatasetId, ResourceId};
pub use model::{AuditRow, ModifiedValueSource, ProbeOutcome, ResourceRecord};
pub use resource_table::{RawResourceRecord, ResourceTable};
pub use status::Status;
