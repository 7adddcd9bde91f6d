//! Many threads on one collection.

use crate::common::*;
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;

#[test]
fn concurrent_readers_share_entries() {
    let shelter = Arc::new(open_shelter(16));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let shelter = Arc::clone(&shelter);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..100 {
                    for b in ["Labrador", "Poodle", "Beagle"] {
                        let dogs = shelter.read(&breed(b), false).unwrap();
                        assert!(dogs.iter().all(|d| d.get("breed") == Some(&Value::from(b))));
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(shelter.cache().len(), 3);
    let stats = shelter.cache_stats();
    assert_eq!(stats.hits + stats.misses, (THREADS * 300) as u64);
    // Racing misses may each query the store, but never more than once per thread and key
    assert!(finds(&shelter) <= (THREADS * 3) as u64);
}

#[test]
fn concurrent_creates_all_land_in_index() {
    let shelter = Arc::new(open_shelter(4));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let shelter = Arc::clone(&shelter);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..25 {
                    shelter
                        .create(&dog(&format!("pup-{t}-{i}"), "Husky"))
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(shelter.lookup(&Value::from("Husky")).len(), THREADS * 25);
    assert_eq!(shelter.store().inner().inner().len(), 4 + THREADS * 25);
}

#[test]
fn reads_after_last_write_are_fresh() {
    let shelter = Arc::new(open_shelter(8));
    let barrier = Arc::new(Barrier::new(THREADS + 1));

    let readers: Vec<_> = (0..THREADS)
        .map(|_| {
            let shelter = Arc::clone(&shelter);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..200 {
                    shelter.read(&breed("Husky"), false).unwrap();
                }
            })
        })
        .collect();

    let writer = {
        let shelter = Arc::clone(&shelter);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 0..50 {
                shelter.create(&dog(&format!("sled-{i}"), "Husky")).unwrap();
            }
        })
    };

    for h in readers {
        h.join().unwrap();
    }
    writer.join().unwrap();

    // Once writes have quiesced, a cached read must agree with the store
    let cached = shelter.read(&breed("Husky"), false).unwrap();
    let fresh = shelter.read(&breed("Husky"), true).unwrap();
    assert_eq!(cached.len(), 50);
    assert_eq!(cached.len(), fresh.len());
}

#[test]
fn clear_races_with_reads_without_panicking() {
    let shelter = Arc::new(open_shelter(2));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let shelter = Arc::clone(&shelter);
            thread::spawn(move || {
                for i in 0..200 {
                    if (t + i) % 7 == 0 {
                        shelter.clear_cache();
                    } else {
                        let b = ["Labrador", "Poodle", "Beagle"][(t + i) % 3];
                        shelter.read(&breed(b), false).unwrap();
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert!(shelter.cache().len() <= 2);
}

#[test]
fn rebuild_racing_creates_goes_stale_not_corrupt() {
    let shelter = Arc::new(open_shelter(4));
    let barrier = Arc::new(Barrier::new(THREADS + 1));

    let writers: Vec<_> = (0..THREADS)
        .map(|t| {
            let shelter = Arc::clone(&shelter);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..25 {
                    shelter
                        .create(&dog(&format!("pup-{t}-{i}"), "Husky"))
                        .unwrap();
                }
            })
        })
        .collect();

    let rebuilder = {
        let shelter = Arc::clone(&shelter);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..20 {
                shelter.rebuild_index().unwrap();
            }
        })
    };

    for h in writers {
        h.join().unwrap();
    }
    rebuilder.join().unwrap();

    let total = 4 + THREADS * 25;
    assert_eq!(shelter.store().inner().inner().len(), total);

    // A swap can drop inserts, and an insert the scan already saw can be
    // appended again, but every bucket only holds records of its own value
    for b in ["Labrador", "Poodle", "Beagle", "Husky"] {
        let bucket = shelter.lookup(&Value::from(b));
        assert!(bucket.iter().all(|d| d.get("breed") == Some(&Value::from(b))));
    }

    assert_eq!(shelter.rebuild_index().unwrap(), total);
    assert_eq!(shelter.lookup(&Value::from("Husky")).len(), THREADS * 25);
    assert_eq!(shelter.lookup(&Value::from("Labrador")).len(), 2);
}
