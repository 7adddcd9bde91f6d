//! Bypass reads go to the store and leave the cache exactly as it was.

use crate::common::*;
use std::sync::Arc;

#[test]
fn bypass_does_not_populate() {
    let shelter = open_shelter(4);

    let dogs = shelter.read(&breed("Labrador"), true).unwrap();
    assert_eq!(dogs.len(), 2);
    assert!(shelter.cache().is_empty());
    assert_eq!(shelter.cache_stats().misses, 0);
    assert_eq!(finds(&shelter), 1);
}

#[test]
fn bypass_ignores_cached_entry() {
    let shelter = open_shelter(4);
    let cached = shelter.read(&breed("Labrador"), false).unwrap();
    let stats = shelter.cache_stats();

    let fresh = shelter.read(&breed("Labrador"), true).unwrap();
    assert_eq!(*fresh, *cached);
    assert!(!Arc::ptr_eq(&fresh, &cached));
    assert_eq!(shelter.cache_stats(), stats);
    assert_eq!(finds(&shelter), 2);
}

#[test]
fn bypass_does_not_refresh_recency() {
    let shelter = open_shelter(2);
    shelter.read(&breed("Labrador"), false).unwrap();
    shelter.read(&breed("Poodle"), false).unwrap();

    // A cached read would promote Labrador; a bypass read must not.
    shelter.read(&breed("Labrador"), true).unwrap();
    shelter.read(&breed("Beagle"), false).unwrap();

    assert!(!shelter.cache().contains(&QueryKey::from_filter(&breed("Labrador"))));
    assert!(shelter.cache().contains(&QueryKey::from_filter(&breed("Poodle"))));
}

#[test]
fn bypass_sees_writes_the_cache_missed() {
    let shelter = open_shelter(4);
    shelter.read(&breed("Beagle"), false).unwrap();

    // Write straight to the store, behind the collection's back
    shelter
        .store()
        .inner()
        .inner()
        .insert(&dog("Rex", "Beagle"))
        .unwrap();

    assert_eq!(shelter.read(&breed("Beagle"), false).unwrap().len(), 1);
    assert_eq!(shelter.read(&breed("Beagle"), true).unwrap().len(), 2);
}
