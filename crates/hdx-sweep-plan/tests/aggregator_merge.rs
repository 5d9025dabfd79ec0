//! Property test for spec.md §8's aggregator-merge invariant: for any
//! sequence of patches, the resulting `RevisionPlan` has exactly one entry
//! per affected dataset, and each resource reflects only the last patch
//! applied to it.

use hdx_sweep_core::{DatasetId, ResourceId};
use hdx_sweep_plan::{Patch, RevisionPlan};
use proptest::prelude::*;
use std::collections::HashMap;

fn arb_patch() -> impl Strategy<Value = Patch> {
    prop_oneof![
        Just(Patch::broken_link()),
        (1u64..1_000).prop_map(|size| Patch::fields().size(size).build()),
        "[a-f0-9]{8}".prop_map(|hash| Patch::fields().hash(hash).build()),
    ]
}

proptest! {
    #[test]
    fn last_patch_per_resource_wins_and_datasets_are_exact(
        entries in prop::collection::vec(
            (0usize..4, 0usize..6, arb_patch()),
            0..50,
        )
    ) {
        let mut plan = RevisionPlan::new();
        // Independently track "what should have won" with a plain HashMap,
        // then assert the aggregator agrees.
        let mut expected: HashMap<(usize, usize), Patch> = HashMap::new();
        let mut expected_datasets: std::collections::HashSet<usize> = std::collections::HashSet::new();

        for (dataset_idx, resource_idx, patch) in entries {
            let dataset_id = DatasetId::from(format!("ds{dataset_idx}"));
            let resource_id = ResourceId::from(format!("r{resource_idx}"));
            plan.add_patch(dataset_id, resource_id, patch.clone());
            expected.insert((dataset_idx, resource_idx), patch);
            expected_datasets.insert(dataset_idx);
        }

        prop_assert_eq!(plan.datasets().len(), expected_datasets.len());

        for ((dataset_idx, resource_idx), patch) in &expected {
            let dataset_id = DatasetId::from(format!("ds{dataset_idx}"));
            let resource_id = ResourceId::from(format!("r{resource_idx}"));
            let revision = plan.datasets().get(&dataset_id).expect("dataset must be present");
            let actual = revision.update_resources.get(&resource_id).expect("resource must be present");
            prop_assert_eq!(actual, patch);
        }
    }
}
