//! Status idempotence (spec.md §8): running the decision engine twice on
//! identical inputs yields identical audit rows and identical patches.

use chrono::{TimeZone, Utc};
use hdx_sweep_core::{DatasetId, ResourceId, ResourceRecord, Status};
use hdx_sweep_decision::{decide_get, decide_head};
use hdx_sweep_plan::Patch;
use proptest::prelude::*;
use url::Url;

fn arb_status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Http(200)),
        Just(Status::Http(403)),
        Just(Status::Http(410)),
        Just(Status::Http(429)),
        Just(Status::Http(500)),
        Just(Status::Success),
        Just(Status::MimetypeMismatch),
        Just(Status::SignatureMismatch),
        Just(Status::SizeMismatch),
        Just(Status::TooLarge),
        Just(Status::TransportFailure),
    ]
}

fn record() -> ResourceRecord {
    ResourceRecord {
        url: Url::parse("https://example.org/f.csv").unwrap(),
        resource_id: ResourceId::from("r1"),
        format: "csv".to_string(),
        dataset_id: DatasetId::from("ds1"),
        stored_size: Some(100),
        stored_last_modified: Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
        stored_hash: Some("abc".to_string()),
        stored_broken: false,
    }
}

proptest! {
    #[test]
    fn decide_head_is_deterministic(
        status in arb_status(),
        size in prop::option::of(1u64..1000),
        digest in prop::option::of("[a-f0-9]{4}"),
    ) {
        let r = record();
        let outcome = hdx_sweep_core::ProbeOutcome { size, last_modified: None, digest, status };
        let first = decide_head(&r, &outcome);
        let second = decide_head(&r, &outcome);
        prop_assert_eq!(first.audit, second.audit);
        prop_assert_eq!(first.patch, second.patch);
        prop_assert_eq!(first.enqueue_phase2, second.enqueue_phase2);
    }

    #[test]
    fn decide_get_is_deterministic(
        status in arb_status(),
        size in prop::option::of(1u64..1000),
        digest in prop::option::of("[a-f0-9]{4}"),
    ) {
        let r = record();
        let today = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        let outcome = hdx_sweep_core::ProbeOutcome { size, last_modified: None, digest, status };

        let mut audit1 = hdx_sweep_core::AuditRow::new(r.resource_id.clone(), &r);
        let patch1 = decide_get(&mut audit1, &r, &outcome, today);
        let mut audit2 = hdx_sweep_core::AuditRow::new(r.resource_id.clone(), &r);
        let patch2 = decide_get(&mut audit2, &r, &outcome, today);

        prop_assert_eq!(audit1, audit2);
        prop_assert_eq!(patch1, patch2);
    }
}

#[test]
fn broken_resource_never_gets_a_broken_patch_regardless_of_status() {
    let mut r = record();
    r.stored_broken = true;
    for status in [Status::Http(410), Status::Http(404), Status::TransportFailure] {
        let outcome = hdx_sweep_core::ProbeOutcome::failed(status);
        let decision = decide_head(&r, &outcome);
        assert_ne!(decision.patch, Some(Patch::broken_link()));

        let mut audit = hdx_sweep_core::AuditRow::new(r.resource_id.clone(), &r);
        let patch = decide_get(&mut audit, &r, &outcome, Utc::now());
        assert_ne!(patch, Some(Patch::broken_link()));
    }
}
