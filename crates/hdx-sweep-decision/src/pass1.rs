//! Pass 1 of the decision engine: reconciling HEAD outcomes (spec.md §4.6.1).

use crate::timestamp::naive_iso8601;
use hdx_sweep_core::{AuditRow, ProbeOutcome, ResourceRecord, Status};
use hdx_sweep_plan::Patch;

/// What pass 1 decided for one resource.
pub struct Pass1Decision {
    pub audit: AuditRow,
    pub patch: Option<Patch>,
    /// Whether this resource must proceed to phase 2 (a GET+hash probe).
    pub enqueue_phase2: bool,
}

/// Reconciles a HEAD [`ProbeOutcome`] against the stored [`ResourceRecord`]
/// (spec.md §4.6.1). Never panics or returns an error: per spec.md §7, the
/// decision engine never raises, only records what it observed.
pub fn decide_head(record: &ResourceRecord, outcome: &ProbeOutcome) -> Pass1Decision {
    let mut audit = AuditRow::new(record.resource_id.clone(), record);
    audit.head_status = Some(outcome.status.symbolic_name());

    if !outcome.status.is_http_ok() {
        if outcome.status.forces_phase_2_on_head() {
            // The server may be refusing or rate-limiting HEAD itself, not
            // reporting the resource gone — force a GET instead of guessing.
            return Pass1Decision {
                audit,
                patch: None,
                enqueue_phase2: true,
            };
        }

        let mut patch = None;
        if !record.stored_broken {
            patch = Some(Patch::broken_link());
            audit.set_broken = true;
        }
        audit.head_error = Some(outcome.status.symbolic_name());
        return Pass1Decision {
            audit,
            patch,
            enqueue_phase2: false,
        };
    }

    let mut resource_info = Patch::fields();
    let mut get_resource = false;

    match &outcome.digest {
        Some(etag) => {
            audit.new_etag = Some(etag.clone());
            if record.stored_hash.as_deref() != Some(etag.as_str()) {
                resource_info = resource_info.hash(etag.clone());
                audit.etag_changed = true;
            }
        }
        None => get_resource = true,
    }

    if let Some(size) = outcome.size {
        audit.new_size = Some(size);
        if record.stored_size != Some(size) {
            audit.size_changed = true;
            if resource_info.is_empty() {
                get_resource = true;
            } else {
                resource_info = resource_info.size(size);
            }
        }
    }

    if let Some(parsed) = outcome.parsed_last_modified() {
        audit.new_modified = Some(outcome.last_modified.clone().unwrap_or_default());
        let newer = match record.stored_last_modified {
            Some(stored) => parsed > stored,
            None => true,
        };
        if newer {
            audit.modified_changed = true;
            audit.modified_newer = true;
            if resource_info.is_empty() {
                get_resource = true;
            } else {
                resource_info = resource_info.last_modified(naive_iso8601(parsed));
            }
        } else if record.stored_last_modified != Some(parsed) {
            // Strictly older: record the audit only, it's not worth a GET.
            audit.modified_changed = true;
        }
    }

    if get_resource {
        return Pass1Decision {
            audit,
            patch: None,
            enqueue_phase2: true,
        };
    }

    let patch = if resource_info.is_empty() {
        None
    } else {
        audit.update = true;
        Some(resource_info.build())
    };

    Pass1Decision {
        audit,
        patch,
        enqueue_phase2: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hdx_sweep_core::{DatasetId, ResourceId};
    use url::Url;

    fn record() -> ResourceRecord {
        ResourceRecord {
            url: Url::parse("https://example.org/f.csv").unwrap(),
            resource_id: ResourceId::from("r1"),
            format: "csv".to_string(),
            dataset_id: DatasetId::from("ds1"),
            stored_size: Some(357_102),
            stored_last_modified: Some(Utc.with_ymd_and_hms(2019, 11, 10, 8, 4, 26).unwrap()),
            stored_hash: Some("1234".to_string()),
            stored_broken: false,
        }
    }

    #[test]
    fn unchanged_resource_head_200_emits_no_patch() {
        let outcome = ProbeOutcome {
            size: Some(357_102),
            last_modified: Some("Sun, 10 Nov 2019 08:04:26 GMT".to_string()),
            digest: Some("1234".to_string()),
            status: Status::Http(200),
        };
        let decision = decide_head(&record(), &outcome);
        assert!(decision.patch.is_none());
        assert!(!decision.enqueue_phase2);
        assert_eq!(decision.audit.head_status.as_deref(), Some("OK"));
        assert!(!decision.audit.etag_changed);
        assert!(!decision.audit.update);
    }

    #[test]
    fn etag_change_with_unchanged_mtime_emits_hash_patch_only() {
        let outcome = ProbeOutcome {
            size: Some(357_102),
            last_modified: Some("Sun, 10 Nov 2019 08:04:26 GMT".to_string()),
            digest: Some("1235".to_string()),
            status: Status::Http(200),
        };
        let decision = decide_head(&record(), &outcome);
        assert!(!decision.enqueue_phase2);
        assert!(decision.audit.etag_changed);
        assert!(decision.audit.update);
        assert_eq!(
            decision.patch,
            Some(hdx_sweep_plan::Patch::fields().hash("1235").build())
        );
    }

    #[test]
    fn head_forbidden_enqueues_phase_2_without_a_patch() {
        let outcome = ProbeOutcome::failed(Status::Http(403));
        let decision = decide_head(&record(), &outcome);
        assert!(decision.enqueue_phase2);
        assert!(decision.patch.is_none());
        assert_eq!(decision.audit.head_status.as_deref(), Some("FORBIDDEN"));
    }

    #[test]
    fn head_gone_emits_broken_link_patch() {
        let outcome = ProbeOutcome::failed(Status::Http(410));
        let decision = decide_head(&record(), &outcome);
        assert!(!decision.enqueue_phase2);
        assert_eq!(decision.patch, Some(Patch::broken_link()));
        assert!(decision.audit.set_broken);
    }

    #[test]
    fn already_broken_resource_never_gets_a_second_broken_patch() {
        let mut r = record();
        r.stored_broken = true;
        let outcome = ProbeOutcome::failed(Status::Http(410));
        let decision = decide_head(&r, &outcome);
        assert!(decision.patch.is_none());
        assert!(!decision.audit.set_broken);
    }

    #[test]
    fn missing_etag_forces_a_get() {
        let outcome = ProbeOutcome {
            size: Some(357_102),
            last_modified: Some("Sun, 10 Nov 2019 08:04:26 GMT".to_string()),
            digest: None,
            status: Status::Http(200),
        };
        let decision = decide_head(&record(), &outcome);
        assert!(decision.enqueue_phase2);
        assert!(decision.patch.is_none());
    }

    #[test]
    fn size_change_without_etag_change_forces_a_get() {
        let outcome = ProbeOutcome {
            size: Some(999),
            last_modified: Some("Sun, 10 Nov 2019 08:04:26 GMT".to_string()),
            digest: Some("1234".to_string()),
            status: Status::Http(200),
        };
        let decision = decide_head(&record(), &outcome);
        assert!(decision.enqueue_phase2);
    }

    #[test]
    fn size_change_with_etag_change_bundles_into_one_patch() {
        let outcome = ProbeOutcome {
            size: Some(999),
            last_modified: Some("Sun, 10 Nov 2019 08:04:26 GMT".to_string()),
            digest: Some("1235".to_string()),
            status: Status::Http(200),
        };
        let decision = decide_head(&record(), &outcome);
        assert!(!decision.enqueue_phase2);
        assert_eq!(
            decision.patch,
            Some(Patch::fields().hash("1235").size(999).build())
        );
    }

    #[test]
    fn older_last_modified_is_audited_but_not_fetched() {
        let outcome = ProbeOutcome {
            size: Some(357_102),
            last_modified: Some("Fri, 01 Jan 2010 00:00:00 GMT".to_string()),
            digest: Some("1234".to_string()),
            status: Status::Http(200),
        };
        let decision = decide_head(&record(), &outcome);
        assert!(!decision.enqueue_phase2);
        assert!(decision.patch.is_none());
        assert!(decision.audit.modified_changed);
        assert!(!decision.audit.modified_newer);
    }
}
