//! Outcome classification (spec.md §4.3), ported from the original's
//! `utilities.is_server_error` / `server_error.is_server_error`.

/// What a single probe attempt failed with, before retry/backoff decides
/// whether to try again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    /// An HTTP response was received with this non-200 status.
    Http(u16),
    /// A transport-level failure: connect timeout, read timeout, DNS
    /// failure, connection refused. The original's `aiohttp.ServerTimeoutError`
    /// and bare `Exception` catch-all collapse into this one variant.
    Transport,
}

/// HTTP statuses that are retried (spec.md §4.3 "Retryable server conditions").
pub const RETRYABLE_STATUSES: &[u16] = &[408, 409, 429, 500, 502, 503, 504];

impl Failure {
    /// True for transport timeouts and the closed set of retryable statuses.
    /// Any other HTTP status (403, 404, 410, 451, ...) is non-retryable.
    pub fn is_retryable(self) -> bool {
        match self {
            Failure::Transport => true,
            Failure::Http(code) => RETRYABLE_STATUSES.contains(&code),
        }
    }
}
