//! Decision Engine (C6, spec.md §4.6): the two-pass reconciliation of probe
//! outcomes against stored catalog metadata, plus the audit report (spec.md
//! §6).

pub mod pass1;
pub mod pass2;
pub mod report;
pub mod timestamp;

pub use pass1::{decide_head, Pass1Decision};
pub use pass2::decide_get;
pub use report::AuditReport;
