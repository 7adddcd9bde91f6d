//! Attribute index accuracy after create, staleness after update/delete.

use crate::common::*;
use proptest::prelude::*;

fn breed_only(b: &str) -> Record {
    Record::new().with("breed", b)
}

#[test]
fn open_indexes_projected_records() {
    let shelter = open_shelter(4);
    assert_eq!(shelter.index().field(), "breed");
    assert_eq!(shelter.index().len(), 3);
    assert_eq!(
        shelter.lookup(&Value::from("Labrador")),
        vec![breed_only("Labrador"), breed_only("Labrador")]
    );
    assert!(shelter.lookup(&Value::from("Husky")).is_empty());
}

#[test]
fn create_appends_whole_record() {
    let shelter = open_shelter(4);
    shelter.create(&dog("Rex", "Beagle")).unwrap();

    let beagles = shelter.lookup(&Value::from("Beagle"));
    assert_eq!(beagles, vec![breed_only("Beagle"), dog("Rex", "Beagle")]);
}

#[test]
fn create_opens_new_bucket() {
    let shelter = open_shelter(4);
    shelter.create(&dog("Nanook", "Husky")).unwrap();
    assert_eq!(shelter.lookup(&Value::from("Husky")), vec![dog("Nanook", "Husky")]);
    assert_eq!(shelter.index().len(), 4);
}

#[test]
fn record_without_indexed_field_is_stored_but_not_indexed() {
    let shelter = open_shelter(4);
    let stray = Record::new().with("name", "Stray");
    assert!(shelter.create(&stray).unwrap());

    assert_eq!(shelter.index().record_count(), 4);
    assert_eq!(shelter.read(&Filter::match_all(), false).unwrap().len(), 5);
}

#[test]
fn blank_indexed_field_counts_as_absent() {
    let shelter = open_shelter(4);
    let blanks = [
        Record::new().with("name", "Mystery").with("breed", Value::Null),
        Record::new().with("name", "Ghost").with("breed", ""),
        Record::new().with("name", "Zero").with("breed", 0),
    ];
    for record in &blanks {
        assert!(shelter.create(record).unwrap());
    }

    assert!(shelter.lookup(&Value::Null).is_empty());
    assert!(shelter.lookup(&Value::from("")).is_empty());
    assert!(shelter.lookup(&Value::Int(0)).is_empty());
    assert_eq!(shelter.index().record_count(), 4);

    // Stored all the same, and a rebuild skips them too
    assert_eq!(shelter.read(&Filter::match_all(), true).unwrap().len(), 7);
    assert_eq!(shelter.rebuild_index().unwrap(), 4);
    assert!(shelter.lookup(&Value::from("")).is_empty());
}

#[test]
fn update_leaves_index_stale_until_rebuild() {
    let shelter = open_shelter(4);
    let modified = shelter
        .update(&breed("Poodle"), &Record::new().with("breed", "Labradoodle"))
        .unwrap();
    assert_eq!(modified, 1);

    // The store moved on, the index did not
    assert_eq!(shelter.lookup(&Value::from("Poodle")).len(), 1);
    assert!(shelter.lookup(&Value::from("Labradoodle")).is_empty());
    assert!(shelter.read(&breed("Poodle"), false).unwrap().is_empty());

    assert_eq!(shelter.rebuild_index().unwrap(), 4);
    assert!(shelter.lookup(&Value::from("Poodle")).is_empty());
    assert_eq!(
        shelter.lookup(&Value::from("Labradoodle")),
        vec![breed_only("Labradoodle")]
    );
}

#[test]
fn delete_leaves_index_stale_until_rebuild() {
    let shelter = open_shelter(4);
    assert_eq!(shelter.delete(&breed("Labrador")).unwrap(), 2);

    assert_eq!(shelter.lookup(&Value::from("Labrador")).len(), 2);

    assert_eq!(shelter.rebuild_index().unwrap(), 2);
    assert!(shelter.lookup(&Value::from("Labrador")).is_empty());
    assert_eq!(shelter.index().len(), 2);
}

#[test]
fn custom_index_field() {
    init_tracing();
    let records = vec![
        dog("Bella", "Labrador").with("size", "large"),
        dog("Coco", "Poodle").with("size", "small"),
    ];
    let config = EngineConfig::default().with_index_field("size");
    let shelter = CoherentCollection::open(store_with(records), config).unwrap();

    assert_eq!(shelter.index().field(), "size");
    assert_eq!(
        shelter.lookup(&Value::from("small")),
        vec![Record::new().with("size", "small")]
    );
    assert!(shelter.lookup(&Value::from("Poodle")).is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_created_record_is_found(
        breeds in prop::collection::vec("[A-Z][a-z]{2,8}", 1..20),
    ) {
        let shelter = open_shelter(4);
        for (i, b) in breeds.iter().enumerate() {
            let record = dog(&format!("dog-{i}"), b);
            shelter.create(&record).unwrap();
            prop_assert!(shelter.lookup(&Value::from(b.as_str())).contains(&record));
        }
        for (i, b) in breeds.iter().enumerate() {
            let record = dog(&format!("dog-{i}"), b);
            prop_assert!(shelter.lookup(&Value::from(b.as_str())).contains(&record));
        }
    }
}
