//! Search Tests
//!
//! Ranking, tie-breaking, k handling and mean-centred projections.

use crate::*;

// =============================================================================
// RANKING
// =============================================================================

#[test]
fn test_two_entry_scenario() {
    let index = scenario_index();
    index.add("a", &[1.0, 2.0, 9.0, 9.0]).unwrap();
    index.add("b", &[3.0, 4.0, 0.0, 0.0]).unwrap();

    let hits = index.search(&[1.0, 2.0, 0.0, 0.0], 1).unwrap();
    assert_eq!(pairs(&hits), vec![("a", 0.0)]);

    let hits = index.search(&[1.0, 2.0, 0.0, 0.0], 2).unwrap();
    assert_eq!(pairs(&hits), vec![("a", 0.0), ("b", 8.0)]);
}

#[test]
fn test_distance_is_squared_euclidean() {
    let index = scenario_index();
    index.add("far", &feature(3.0, 4.0)).unwrap();

    let hits = index.search(&feature(0.0, 0.0), 1).unwrap();
    assert_eq!(hits[0].distance, 25.0);
}

#[test]
fn test_results_sorted_ascending() {
    let index = scenario_index();
    for (id, x) in [("d", 4.0), ("b", 2.0), ("a", 1.0), ("c", 3.0)] {
        index.add(id, &feature(x, 0.0)).unwrap();
    }

    let hits = index.search(&feature(0.0, 0.0), 4).unwrap();
    assert_eq!(
        pairs(&hits),
        vec![("a", 1.0), ("b", 4.0), ("c", 9.0), ("d", 16.0)]
    );
}

#[test]
fn test_ties_keep_insertion_order() {
    let index = scenario_index();
    index.add("east", &feature(1.0, 0.0)).unwrap();
    index.add("north", &feature(0.0, 1.0)).unwrap();
    index.add("west", &feature(-1.0, 0.0)).unwrap();
    index.add("south", &feature(0.0, -1.0)).unwrap();

    let hits = index.search(&feature(0.0, 0.0), 3).unwrap();
    assert_eq!(
        pairs(&hits),
        vec![("east", 1.0), ("north", 1.0), ("west", 1.0)]
    );
}

#[test]
fn test_k_larger_than_count() {
    let index = scenario_index();
    index.add("a", &feature(1.0, 0.0)).unwrap();
    index.add("b", &feature(2.0, 0.0)).unwrap();

    let hits = index.search(&feature(0.0, 0.0), 100).unwrap();
    assert_eq!(hits.len(), 2);
}

#[test]
fn test_ignored_dimensions_do_not_affect_ranking() {
    let index = scenario_index();
    index.add("a", &[1.0, 1.0, 1000.0, -1000.0]).unwrap();
    index.add("b", &[2.0, 2.0, 0.0, 0.0]).unwrap();

    let hits = index.search(&[1.0, 1.0, -5.0, 5.0], 1).unwrap();
    assert_eq!(pairs(&hits), vec![("a", 0.0)]);
}

// =============================================================================
// MEAN-CENTRED PROJECTION
// =============================================================================

#[test]
fn test_mean_is_subtracted_before_projection() {
    init_tracing();
    let matrix = scenario_matrix().with_mean(vec![10.0, 10.0, 0.0, 0.0]);
    let index = Index::builder()
        .dimensions(4, 2)
        .matrix(matrix)
        .build()
        .unwrap();

    index.add("origin", &feature(10.0, 10.0)).unwrap();
    index.add("offset", &feature(13.0, 14.0)).unwrap();

    let hits = index.search(&feature(10.0, 10.0), 2).unwrap();
    assert_eq!(pairs(&hits), vec![("origin", 0.0), ("offset", 25.0)]);
}

// =============================================================================
// HIGHER DIMENSIONS
// =============================================================================

#[test]
fn test_exact_match_ranks_first_with_random_projection() {
    let index = random_index(64, 16, 11);
    let features = random_features(200, 64, 12);
    for (i, f) in features.iter().enumerate() {
        index.add(&format!("item-{}", i), f).unwrap();
    }

    for target in [0usize, 57, 199] {
        let hits = index.search(&features[target], 1).unwrap();
        assert_eq!(hits[0].identifier, format!("item-{}", target));
        assert_eq!(hits[0].distance, 0.0);
    }
}

#[test]
fn test_default_dimensions_end_to_end() {
    let index = random_index(DEFAULT_INPUT_DIMENSION, DEFAULT_OUTPUT_DIMENSION, 3);
    let features = random_features(20, DEFAULT_INPUT_DIMENSION, 4);
    index
        .add_batch(
            features
                .iter()
                .enumerate()
                .map(|(i, f)| (format!("img-{:04}", i), f.as_slice())),
        )
        .unwrap();

    let hits = index.search(&features[7], 5).unwrap();
    assert_eq!(hits.len(), 5);
    assert_eq!(hits[0].identifier, "img-0007");
}
