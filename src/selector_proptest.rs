//! Property-based tests for the version selector.
//!
//! These tests use proptest to generate random candidate listings and verify
//! that the selection invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::selector::{select, Candidate};
    use crate::version::VersionFloor;
    use proptest::prelude::*;

    fn uri(components: &[u32]) -> String {
        let rendered: Vec<String> = components.iter().map(|c| c.to_string()).collect();
        format!("http://host/{}", rendered.join("."))
    }

    fn minor_candidates() -> impl Strategy<Value = Vec<Candidate>> {
        prop::collection::vec((6u32..10, 0u32..12, prop::option::of(0u32..5)), 0..30).prop_map(
            |entries| {
                entries
                    .into_iter()
                    .map(|(major, minor, z)| {
                        let mut components = vec![major, minor];
                        components.extend(z);
                        let uri = uri(&components);
                        Candidate::new(components, uri)
                    })
                    .collect()
            },
        )
    }

    proptest! {
        /// Property: every emitted key is at or above the floor
        #[test]
        fn selected_keys_respect_floor(candidates in minor_candidates()) {
            let floor = VersionFloor::minor(7, 5);
            let catalog = select(&candidates, &floor, 2);
            for key in catalog.keys() {
                prop_assert!(floor.admits(key.components()), "{} is below the floor", key);
            }
        }

        /// Property: a key is emitted exactly when some admitted candidate carries it
        #[test]
        fn selected_keys_are_exactly_the_present_versions(candidates in minor_candidates()) {
            let floor = VersionFloor::minor(7, 5);
            let catalog = select(&candidates, &floor, 2);
            let mut expected: Vec<Vec<u32>> = candidates
                .iter()
                .filter(|c| floor.admits(&c.components))
                .map(|c| c.components[..2].to_vec())
                .collect();
            expected.sort();
            expected.dedup();
            let actual: Vec<Vec<u32>> = catalog.keys().map(|k| k.components().to_vec()).collect();
            prop_assert_eq!(actual, expected);
        }

        /// Property: no candidate with the same key has a larger z-stream than the winner
        #[test]
        fn winner_has_newest_zstream(candidates in minor_candidates()) {
            let catalog = select(&candidates, &VersionFloor::minor(7, 5), 2);
            for (key, winner) in &catalog {
                let best = candidates
                    .iter()
                    .filter(|c| c.components[..2] == *key.components())
                    .map(|c| c.components.get(2).copied().unwrap_or(0))
                    .max();
                let chosen = candidates
                    .iter()
                    .find(|c| &c.uri == winner)
                    .map(|c| c.components.get(2).copied().unwrap_or(0));
                prop_assert_eq!(chosen, best);
            }
        }

        /// Property: the input order of candidates does not change the selected keys
        #[test]
        fn selection_keys_ignore_input_order(candidates in minor_candidates()) {
            let floor = VersionFloor::minor(7, 5);
            let forward = select(&candidates, &floor, 2);
            let mut reversed_input = candidates.clone();
            reversed_input.reverse();
            let backward = select(&reversed_input, &floor, 2);
            prop_assert_eq!(
                forward.keys().collect::<Vec<_>>(),
                backward.keys().collect::<Vec<_>>()
            );
        }

        /// Property: single-level selection never errors on gaps and is idempotent
        #[test]
        fn major_selection_is_deterministic(majors in prop::collection::vec(20u32..60, 0..20)) {
            let candidates: Vec<Candidate> = majors
                .iter()
                .map(|m| Candidate::new(vec![*m], uri(&[*m])))
                .collect();
            let floor = VersionFloor::major(28);
            let first = serde_json::to_string(&select(&candidates, &floor, 1)).unwrap();
            let second = serde_json::to_string(&select(&candidates, &floor, 1)).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
