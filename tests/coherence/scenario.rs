//! Capacity-2 walkthrough: LRU recency, eviction, purge on create.

use crate::common::*;

#[test]
fn lru_eviction_then_purge_on_create() {
    let shelter = open_shelter(2);
    let labrador = QueryKey::from_filter(&breed("Labrador"));
    let poodle = QueryKey::from_filter(&breed("Poodle"));
    let beagle = QueryKey::from_filter(&breed("Beagle"));

    // Miss, store call #1
    assert_eq!(shelter.read(&breed("Labrador"), false).unwrap().len(), 2);
    assert_eq!(finds(&shelter), 1);

    // Miss, store call #2; both cached
    assert_eq!(shelter.read(&breed("Poodle"), false).unwrap().len(), 1);
    assert_eq!(finds(&shelter), 2);
    assert!(shelter.cache().contains(&labrador));
    assert!(shelter.cache().contains(&poodle));

    // Hit, refreshes Labrador
    assert_eq!(shelter.read(&breed("Labrador"), false).unwrap().len(), 2);
    assert_eq!(finds(&shelter), 2);

    // Miss, store call #3; Poodle is the least recently used
    assert_eq!(shelter.read(&breed("Beagle"), false).unwrap().len(), 1);
    assert_eq!(finds(&shelter), 3);
    assert_eq!(shelter.cache().len(), 2);
    assert!(shelter.cache().contains(&labrador));
    assert!(shelter.cache().contains(&beagle));
    assert!(!shelter.cache().contains(&poodle));

    assert!(shelter.create(&dog("Rex", "Beagle")).unwrap());
    assert!(shelter.cache().is_empty());

    // Previously a hit, now a miss: store call #4
    assert_eq!(shelter.read(&breed("Labrador"), false).unwrap().len(), 2);
    assert_eq!(finds(&shelter), 4);

    let stats = shelter.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 4);
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.purges, 1);
}

#[test]
fn created_record_is_visible_after_purge() {
    let shelter = open_shelter(2);
    assert_eq!(shelter.read(&breed("Beagle"), false).unwrap().len(), 1);

    shelter.create(&dog("Rex", "Beagle")).unwrap();

    let beagles = shelter.read(&breed("Beagle"), false).unwrap();
    assert_eq!(beagles.len(), 2);
    assert!(beagles.contains(&dog("Rex", "Beagle")));
}
