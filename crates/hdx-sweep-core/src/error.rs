//! Sweep-level errors (spec.md §7).
//!
//! Per-resource failures (transient transport, permanent endpoint,
//! validation, structural) are always recovered locally into a [`crate::Status`]
//! before they reach the decision engine — the decision engine never raises
//! (spec.md §7 policy). Only the catastrophic class here crosses a sweep or
//! shard boundary.

use thiserror::Error;

/// Errors that can abort a sweep or shard outright. Unlike [`crate::Status`],
/// which records a per-resource outcome, this type only ever surfaces for
/// conditions spec.md §7 classifies as "catastrophic" or as a structural
/// configuration problem discovered before any probing starts.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The shared KV store backing the task partitioner (C8) is unreachable.
    #[error("shared key-value store unreachable: {0}")]
    SharedStoreUnavailable(String),

    /// The catalog source could not be read at all (distinct from a single
    /// malformed record, which is dropped during loading, not an error).
    #[error("catalog source unavailable: {0}")]
    CatalogUnavailable(String),

    /// Configuration failed to load or validate.
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// The audit report could not be written to `csv_path`.
    #[error("failed to write audit report to {path}: {source}")]
    AuditReportWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The shared `reqwest::Client` used by the probers could not be built
    /// (e.g. an invalid configured `user_agent` or TLS backend failure).
    #[error("failed to build HTTP client: {0}")]
    ProbeClientUnavailable(String),
}

pub type SweepResult<T> = Result<T, SweepError>;
