//! Pass 2 of the decision engine: reconciling GET+hash outcomes (spec.md
//! §4.6.2).

use crate::timestamp::naive_iso8601;
use chrono::{DateTime, Utc};
use hdx_sweep_core::model::ModifiedValueSource;
use hdx_sweep_core::{AuditRow, ProbeOutcome, ResourceRecord, Status};
use hdx_sweep_plan::Patch;

/// Updates `audit` in place (it was already populated by pass 1) and returns
/// the patch, if any, that this GET outcome warrants.
pub fn decide_get(
    audit: &mut AuditRow,
    record: &ResourceRecord,
    outcome: &ProbeOutcome,
    today: DateTime<Utc>,
) -> Option<Patch> {
    audit.get_status = Some(outcome.status.symbolic_name());

    match outcome.status {
        Status::TransportFailure => {
            audit.get_error = Some(outcome.status.symbolic_name());
            if record.stored_broken {
                return None;
            }
            audit.set_broken = true;
            return Some(Patch::broken_link());
        }
        // Declared-too-large (-11): no body was ever read, so there is no
        // digest to compare and nothing further to decide here.
        Status::TooLarge => {
            audit.get_error = Some(outcome.status.symbolic_name());
            return None;
        }
        Status::Http(429) => return None,
        Status::Http(code) if code != 200 => {
            audit.get_error = Some(outcome.status.symbolic_name());
            if record.stored_broken {
                return None;
            }
            audit.set_broken = true;
            return Some(Patch::broken_link());
        }
        // Http(200) (ETag short-circuit), Success (body-computed digest), and
        // the validation mismatches (Mimetype/Signature/Size) all had a
        // digest computed and fall through to the comparison below.
        _ => {}
    }

    let field_is_etag = outcome.status.is_http_ok();
    let mut fields = Patch::fields();
    let mut hash_changed = false;
    let mut update = false;

    if let Some(digest) = &outcome.digest {
        if field_is_etag {
            audit.new_etag = Some(digest.clone());
        } else {
            audit.new_hash = Some(digest.clone());
        }
        if record.stored_hash.as_deref() != Some(digest.as_str()) {
            fields = fields.hash(digest.clone());
            audit.hash_changed = true;
            if field_is_etag {
                audit.etag_changed = true;
            }
            hash_changed = true;
            update = true;
        }
    }

    if let Some(size) = outcome.size {
        audit.new_size = Some(size);
        if record.stored_size != Some(size) {
            fields = fields.size(size);
            audit.size_changed = true;
            update = true;
        }
    }

    if update {
        let parsed = outcome.parsed_last_modified();
        let upstream_wins = match parsed {
            Some(dt) => match record.stored_last_modified {
                Some(stored) => dt > stored,
                None => true,
            },
            None => false,
        };

        let resolved = if upstream_wins {
            audit.modified_value = Some(ModifiedValueSource::Http);
            parsed.expect("upstream_wins implies parsed is Some")
        } else {
            let resolved = match record.stored_last_modified {
                Some(stored) if stored > today => stored,
                _ => today,
            };
            if resolved == today {
                audit.modified_value = Some(ModifiedValueSource::Today);
            }
            resolved
        };

        // Never move the timestamp forward unless content actually changed.
        if hash_changed {
            let resolved_str = naive_iso8601(resolved);
            let differs = record
                .stored_last_modified
                .map(naive_iso8601)
                .as_deref()
                != Some(resolved_str.as_str());
            if differs {
                audit.new_modified = Some(resolved_str.clone());
                audit.modified_changed = true;
                fields = fields.last_modified(resolved_str);
            }
        }
    }

    if update {
        audit.update = true;
        Some(fields.build())
    } else {
        None
    }
}
