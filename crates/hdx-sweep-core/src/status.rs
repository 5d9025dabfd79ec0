//! The closed status taxonomy of spec.md §4.6.3 / §6.
//!
//! Rather than threading the original's bare negative integers through the
//! whole engine (REDESIGN FLAGS, "error-status sentinel values"), outcomes
//! carry a tagged [`Status`]. The integer and the symbolic name are derived
//! from it only at the audit/report boundary.

use http::StatusCode;
use std::fmt;

/// The outcome of a single probe (HEAD or GET+hash), closed per spec.md §4.6.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// An HTTP response was received with this status code (includes 200).
    Http(u16),
    /// GET-path success with a body-computed digest (distinct from `Http(200)`,
    /// which on the GET path means an ETag short-circuit with no body read).
    Success,
    /// Declared Content-Type doesn't match any mimetype expected for the format.
    MimetypeMismatch,
    /// The first four bytes don't match any signature expected for the format.
    SignatureMismatch,
    /// Final byte count didn't match the declared Content-Length.
    SizeMismatch,
    /// Declared Content-Length exceeded the hashing threshold and had no ETag.
    TooLarge,
    /// DNS failure, malformed URL, connection refused, or retries exhausted
    /// against a transport-level failure.
    TransportFailure,
}

impl Status {
    /// The integer taxonomy of spec.md §4.6.3 / §6.
    pub fn code(self) -> i32 {
        match self {
            Status::Http(code) => i32::from(code),
            Status::Success => 0,
            Status::MimetypeMismatch => -1,
            Status::SignatureMismatch => -2,
            Status::SizeMismatch => -3,
            Status::TooLarge => -11,
            Status::TransportFailure => -101,
        }
    }

    /// The symbolic name used in audit rows (spec.md §6): the uppercase HTTP
    /// reason phrase for positive statuses, a fixed string for negative ones.
    pub fn symbolic_name(self) -> String {
        match self {
            Status::Http(code) => StatusCode::from_u16(code)
                .ok()
                .and_then(|sc| sc.canonical_reason())
                .map(|reason| reason.to_uppercase().replace(' ', "_"))
                .unwrap_or_else(|| format!("HTTP_{code}")),
            Status::Success => "OK".to_string(),
            Status::MimetypeMismatch => "MIMETYPE != HDX FORMAT".to_string(),
            Status::SignatureMismatch => "SIGNATURE != HDX FORMAT".to_string(),
            Status::SizeMismatch => "SIZE != HTTP SIZE".to_string(),
            Status::TooLarge => "TOO LARGE TO HASH".to_string(),
            Status::TransportFailure => "UNSPECIFIED SERVER ERROR".to_string(),
        }
    }

    /// True for the HEAD statuses that, per spec.md §4.6.1 step 3, force a
    /// phase-2 GET instead of a broken-link patch: the server may be refusing
    /// or rate-limiting the HEAD method itself rather than reporting the
    /// resource is actually gone.
    pub fn forces_phase_2_on_head(self) -> bool {
        matches!(self, Status::Http(403 | 405 | 408 | 409 | 429))
    }

    /// True for `Http(200)`.
    pub fn is_http_ok(self) -> bool {
        matches!(self, Status::Http(200))
    }

    /// True for `Http(429)` specifically (spec.md §4.6.2 step 2: audit-only,
    /// never treated as broken).
    pub fn is_rate_limited(self) -> bool {
        matches!(self, Status::Http(429))
    }

    /// True for any positive HTTP status other than 200 (a real, non-rate-limited
    /// endpoint-level failure).
    pub fn is_http_error(self) -> bool {
        matches!(self, Status::Http(code) if code != 200)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbolic_name())
    }
}
