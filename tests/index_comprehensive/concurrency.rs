//! Concurrency Tests
//!
//! Shared `Arc<Index>` use from many threads: concurrent adds, searches
//! racing writers, and loads racing readers.

use crate::*;
use std::io::Cursor;
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;

#[test]
fn test_concurrent_adds_are_all_counted() {
    let index = Arc::new(scenario_index());
    let barrier = Arc::new(Barrier::new(THREADS));
    let per_thread = 200;

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..per_thread {
                    index
                        .add(&format!("t{}-{}", t, i), &feature(t as f32, i as f32))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(index.count().unwrap(), THREADS * per_thread);
}

#[test]
fn test_concurrent_adds_keep_per_thread_order() {
    let index = Arc::new(scenario_index());
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = ["left", "right"]
        .into_iter()
        .map(|side| {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..100 {
                    index.add(&format!("{}-{:03}", side, i), &feature(0.0, 0.0)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Every entry ties at distance 0, so results come back in insertion order.
    let hits = index.search(&feature(0.0, 0.0), 200).unwrap();
    for side in ["left", "right"] {
        let ids: Vec<&str> = hits
            .iter()
            .map(|h| h.identifier.as_str())
            .filter(|id| id.starts_with(side))
            .collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 100);
    }
}

#[test]
fn test_searches_during_adds_see_consistent_prefixes() {
    let index = Arc::new(scenario_index());
    index.add("anchor", &feature(0.0, 0.0)).unwrap();
    let barrier = Arc::new(Barrier::new(THREADS + 1));

    let writer = {
        let index = Arc::clone(&index);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 1..=500 {
                index.add(&format!("w{}", i), &feature(i as f32, 0.0)).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..THREADS)
        .map(|_| {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..200 {
                    let hits = index.search(&feature(0.0, 0.0), 1000).unwrap();
                    assert_eq!(hits[0].identifier, "anchor");
                    // Entries appear in order, so a snapshot is always a prefix.
                    for (i, hit) in hits.iter().enumerate().skip(1) {
                        assert_eq!(hit.identifier, format!("w{}", i));
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(index.count().unwrap(), 501);
}

#[test]
fn test_load_races_with_searches() {
    let source = scenario_index();
    for i in 0..50 {
        source.add(&format!("s{}", i), &feature(i as f32, 1.0)).unwrap();
    }
    let mut bytes = Vec::new();
    source.save(&mut bytes).unwrap();
    let bytes = Arc::new(bytes);

    let index = Arc::new(scenario_index());
    for i in 0..10 {
        index.add(&format!("old{}", i), &feature(i as f32, 1.0)).unwrap();
    }
    let barrier = Arc::new(Barrier::new(THREADS + 1));

    let loader = {
        let index = Arc::clone(&index);
        let barrier = Arc::clone(&barrier);
        let bytes = Arc::clone(&bytes);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..20 {
                index.load(Cursor::new(bytes.as_slice())).unwrap();
                index.clear().unwrap();
            }
            index.load(Cursor::new(bytes.as_slice())).unwrap();
        })
    };

    let readers: Vec<_> = (0..THREADS)
        .map(|_| {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..100 {
                    let hits = index.search(&feature(0.0, 1.0), 100).unwrap();
                    // Each search sees exactly one of: old contents, empty, loaded contents.
                    assert!(
                        matches!(hits.len(), 0 | 10 | 50),
                        "observed partial state with {} entries",
                        hits.len()
                    );
                    let prefix = hits.first().map(|h| &h.identifier[..1]);
                    assert!(hits.iter().all(|h| Some(&h.identifier[..1]) == prefix));
                }
            })
        })
        .collect();

    loader.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(index.count().unwrap(), 50);
}

#[test]
fn test_search_is_deterministic_across_threads() {
    let index = Arc::new(random_index(32, 8, 21));
    for (i, f) in random_features(300, 32, 22).iter().enumerate() {
        index.add(&format!("item-{}", i), f).unwrap();
    }
    let query = Arc::new(random_features(1, 32, 23).remove(0));
    let expected = index.search(&query, 10).unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let index = Arc::clone(&index);
            let query = Arc::clone(&query);
            thread::spawn(move || index.search(&query, 10).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
