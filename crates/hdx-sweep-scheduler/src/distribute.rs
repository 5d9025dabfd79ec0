//! The list-distribute transform of spec.md §4.2: given a flat list of items
//! keyed by netloc, produce a permuted list whose successive elements have
//! maximally different netlocs, so scheduling bursts spread across hosts
//! instead of hammering one host head-of-line. Ported from the original's
//! `list_distribute_contents` (`hdx.utilities.dictandlist`).

use std::collections::VecDeque;
use std::hash::Hash;

/// Groups `items` by `key_fn`, orders the groups longest-first (ties keep
/// first-seen order), then round-robins one item per group until every group
/// is drained.
pub fn list_distribute<T, K, F>(items: Vec<T>, key_fn: F) -> Vec<T>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut order: Vec<K> = Vec::new();
    let mut buckets: std::collections::HashMap<K, VecDeque<T>> = std::collections::HashMap::new();

    for item in items {
        let key = key_fn(&item);
        if !buckets.contains_key(&key) {
            order.push(key.clone());
        }
        buckets.entry(key).or_default().push_back(item);
    }

    order.sort_by_key(|k| std::cmp::Reverse(buckets[k].len()));

    let mut output = Vec::new();
    loop {
        let mut progressed = false;
        for key in &order {
            if let Some(item) = buckets.get_mut(key).and_then(VecDeque::pop_front) {
                output.push(item);
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    output
}
