mod common;

use std::collections::HashSet;

use catalog_manager::catalog::{apply_search, merge_category, resolve_created_id, DisplayWindow};
use catalog_manager::models::{Category, Product};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use common::product;

fn category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn products(max_len: usize) -> impl Strategy<Value = Vec<Product>> {
    prop::collection::vec((0i64..40, category(), "[a-z ]{0,12}"), 0..max_len).prop_map(|rows| {
        rows.into_iter()
            .map(|(id, category, title)| product(id, &title, category))
            .collect()
    })
}

proptest! {
    #[test]
    fn merged_listing_has_unique_ids(remote in products(30), local in products(30), category in category()) {
        let merged = merge_category(remote, &local, category);
        let mut seen = HashSet::new();
        for p in &merged {
            prop_assert!(seen.insert(p.id), "duplicate id {}", p.id);
        }
    }

    #[test]
    fn merged_local_records_match_category(remote in products(20), local in products(20), category in category()) {
        let remote_ids: HashSet<i64> = remote.iter().map(|p| p.id).collect();
        let merged = merge_category(remote, &local, category);
        for p in merged.iter().filter(|p| !remote_ids.contains(&p.id)) {
            prop_assert_eq!(p.category, category);
        }
    }

    #[test]
    fn search_results_contain_query(base in products(30), query in "[a-z]{1,3}") {
        let found = apply_search(base.clone(), &query);
        prop_assert!(found.len() <= base.len());
        for p in &found {
            let haystack = format!("{} {}", p.title, p.description).to_lowercase();
            prop_assert!(haystack.contains(&query));
        }
    }

    #[test]
    fn window_never_runs_far_past_the_listing(len in 0usize..200, attempts in 0usize..30) {
        let mut window = DisplayWindow::new(12);
        for _ in 0..attempts {
            let before = window.display_count();
            if window.begin_load_more(len) {
                prop_assert!(window.finish_load_more());
                prop_assert_eq!(window.display_count(), before + 12);
            } else {
                prop_assert_eq!(window.display_count(), before);
            }
            prop_assert!(window.display_count() <= (len + 11).max(12));
        }
        window.reset();
        prop_assert_eq!(window.display_count(), 12);
    }

    #[test]
    fn created_ids_never_collide(
        existing in prop::collection::hash_set(prop_oneof![1i64..100_000, (i64::MAX - 2_000)..=i64::MAX], 0..50),
        remote_id in prop::option::of(prop_oneof![0i64..100_000, (i64::MAX - 2_000)..=i64::MAX]),
        now in 0i64..200_000,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let id = resolve_created_id(remote_id, &existing, now, &mut rng);
        prop_assert!(!existing.contains(&id));
        prop_assert!(id != 0);
    }
}
