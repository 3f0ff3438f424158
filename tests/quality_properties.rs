//! Quality Check Properties
//!
//! For all batches:
//! - required fields pass iff no record lacks a listed field
//! - the duplicate check passes iff the duplicate ratio is within threshold
//! - the foreign-key check counts exactly the references with no parent
//! - cleaning keeps every record and is idempotent

use proptest::prelude::*;

use lakegate::promotion::clean_records;
use lakegate::quality::checks;
use lakegate::record::{FieldValue, Record};
use lakegate::schema::ForeignKey;

fn record(id: &str) -> Record {
    let mut r = Record::new();
    r.insert("id".into(), FieldValue::text(id));
    r.insert("name".into(), FieldValue::text(format!("  name {} ", id)));
    r
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_required_fields(drops in prop::collection::vec(prop::option::of(0usize..3), 0..40)) {
        let fields: Vec<String> = ["id", "name", "email"].iter().map(|s| s.to_string()).collect();
        let records: Vec<Record> = drops
            .iter()
            .enumerate()
            .map(|(i, drop)| {
                let mut r = record(&format!("R-{}", i));
                r.insert("email".into(), FieldValue::text("a@b.io"));
                if let Some(idx) = drop {
                    // absent and null are equivalent
                    if i % 2 == 0 {
                        r.remove(&fields[*idx]);
                    } else {
                        r.insert(fields[*idx].clone(), FieldValue::Null);
                    }
                }
                r
            })
            .collect();

        let expected = drops.iter().filter(|d| d.is_some()).count();
        let outcome = checks::required_fields(&records, &fields);
        prop_assert_eq!(outcome.passed, expected == 0);
        prop_assert_eq!(&outcome.details["records_with_missing"], &serde_json::json!(expected));
        prop_assert!(outcome.details["sample_issues"].as_array().unwrap().len() <= checks::SAMPLE_LIMIT);
    }

    #[test]
    fn prop_duplicate_ratio_boundary(
        distinct in 1usize..60,
        repeats in 0usize..10,
        threshold in 0.0f64..50.0,
    ) {
        let mut records: Vec<Record> = (0..distinct).map(|i| record(&format!("C-{}", i))).collect();
        records.extend((0..repeats).map(|i| record(&format!("C-{}", i % distinct))));

        let outcome = checks::duplicates(&records, "id", threshold);
        let ratio = repeats as f64 * 100.0 / (distinct + repeats) as f64;
        prop_assert_eq!(outcome.passed, ratio <= threshold);
        prop_assert_eq!(&outcome.details["duplicate_count"], &serde_json::json!(repeats));
    }

    #[test]
    fn prop_foreign_key_integrity(
        parents in 0usize..20,
        refs in prop::collection::vec((any::<bool>(), 0usize..20), 0..40),
    ) {
        let parent_records: Vec<Record> = (0..parents).map(|i| record(&format!("P-{}", i))).collect();
        let fk = ForeignKey {
            field: "parent_id".into(),
            parent_entity: "parents".into(),
            parent_id_field: "id".into(),
        };

        let mut orphans = 0usize;
        let children: Vec<Record> = refs
            .iter()
            .enumerate()
            .map(|(i, (set, target))| {
                let mut r = record(&format!("K-{}", i));
                if *set {
                    if *target >= parents {
                        orphans += 1;
                    }
                    r.insert("parent_id".into(), FieldValue::text(format!("P-{}", target)));
                }
                r
            })
            .collect();

        let outcome = checks::foreign_key(&children, &fk, &parent_records);
        prop_assert_eq!(outcome.passed, orphans == 0);
        prop_assert_eq!(&outcome.details["orphaned_count"], &serde_json::json!(orphans));
        prop_assert_eq!(&outcome.details["parent_record_count"], &serde_json::json!(parents));
    }

    #[test]
    fn prop_cleaning_keeps_records_and_is_idempotent(ids in prop::collection::vec("[A-Z]-[0-9]{1,3}", 0..30)) {
        let records: Vec<Record> = ids.iter().map(|id| record(id)).collect();
        let transient = vec!["extracted_at".to_string()];

        let once = clean_records(&records, "id", &transient);
        prop_assert_eq!(once.len(), records.len());
        let twice = clean_records(&once, "id", &transient);
        prop_assert_eq!(&once, &twice);
        let sorted = once.windows(2).all(|w| w[0]["id"].raw_text() <= w[1]["id"].raw_text());
        prop_assert!(sorted);
    }
}
