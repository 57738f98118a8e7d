//! Database-backed integration tests: every scenario here opens a real `redb` file through
//! [`warrendb::typed::database::Database`] rather than exercising the query engine in isolation,
//! covering index maintenance, access-path selection, and the post-processing pipeline together.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use warrendb::codecs::SafeForRmpSerde;
use warrendb::descriptor::{Descriptor, IndexedField};
use warrendb::querying::{Query, KEY_FIELD};
use warrendb::typed::database::Database;
use warrendb::value::Value;
use warrendb::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Account {
    id: u64,
    name: String,
    age: i64,
    region: String,
    tags: Vec<String>,
}

unsafe impl SafeForRmpSerde for Account {}

impl Descriptor for Account {
    fn bucket_name() -> &'static str {
        "Account"
    }

    fn primary_key(&self) -> Option<Value> {
        Some(Value::from(self.id))
    }

    fn field(&self, name: &str) -> Result<Value, Error> {
        match name {
            "Name" => Ok(Value::from(self.name.clone())),
            "Age" => Ok(Value::from(self.age)),
            "Region" => Ok(Value::from(self.region.clone())),
            "Tags" => Ok(Value::from(self.tags.clone())),
            other => Err(Error::FieldNotFound { field: Box::leak(other.to_string().into_boxed_str()) }),
        }
    }

    fn indexed_fields() -> &'static [IndexedField] {
        &[IndexedField::scalar("Age"), IndexedField::slice("Tags")]
    }
}

fn sample_accounts() -> Vec<Account> {
    vec![
        Account { id: 1, name: "Ada".into(), age: 30, region: "East".into(), tags: vec!["admin".into(), "staff".into()] },
        Account { id: 2, name: "Grace".into(), age: 40, region: "West".into(), tags: vec!["staff".into()] },
        Account { id: 3, name: "Alan".into(), age: 30, region: "East".into(), tags: vec!["guest".into()] },
    ]
}

/// Opens a fresh database in a scratch file that's removed once the test drops it.
fn open_scratch_db() -> (tempfile::NamedTempFile, Database) {
    let file = tempfile::NamedTempFile::new().expect("create scratch file");
    let db = Database::open(file.path()).expect("open database");
    (file, db)
}

fn seed(db: &Database, mut accounts: Vec<Account>, shuffle: bool) -> Result<(), Error> {
    if shuffle {
        accounts.shuffle(&mut rand::rng());
    }
    let mut txn = db.write()?;
    for account in &accounts {
        txn.insert(account)?;
    }
    txn.commit()
}

#[test]
fn index_driven_and_full_scan_access_paths_agree() -> Result<(), Error> {
    let (_file, db) = open_scratch_db();
    seed(&db, sample_accounts(), false)?;

    let txn = db.read()?;

    // `.field("Age").eq(30)` alone drives an index-backed lookup (Age is a scalar index). OR-ing
    // the same conjunction against itself disables the access path (`Query::index_access_path`
    // bails out whenever branches are present) and forces a full scan instead.
    let index_driven = txn.find::<Account>(Query::new().field("Age").eq(30))?;
    let full_scan = txn.find::<Account>(Query::new().field("Age").eq(30).or().field("Age").eq(30))?;

    let mut indexed_ids: Vec<u64> = index_driven.iter().map(|a| a.id).collect();
    let mut scanned_ids: Vec<u64> = full_scan.iter().map(|a| a.id).collect();
    indexed_ids.sort_unstable();
    scanned_ids.sort_unstable();

    assert_eq!(indexed_ids, vec![1, 3]);
    assert_eq!(indexed_ids, scanned_ids);
    Ok(())
}

#[test]
fn insert_populates_every_declared_index() -> Result<(), Error> {
    let (_file, db) = open_scratch_db();
    seed(&db, sample_accounts(), false)?;

    let txn = db.read()?;
    let by_age = txn.find::<Account>(Query::new().field("Age").eq(40))?;
    assert_eq!(by_age.len(), 1);
    assert_eq!(by_age[0].id, 2);

    let by_tag = txn.find::<Account>(Query::new().field("Tags").contains("staff"))?;
    let mut ids: Vec<u64> = by_tag.iter().map(|a| a.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);
    Ok(())
}

#[test]
fn delete_matching_removes_records_and_their_index_entries() -> Result<(), Error> {
    let (_file, db) = open_scratch_db();
    seed(&db, sample_accounts(), false)?;

    let mut txn = db.write()?;
    let removed = txn.delete_matching::<Account>(&Query::new().field("Tags").contains("staff"))?;
    assert_eq!(removed, 2);
    txn.commit()?;

    let txn = db.read()?;
    assert!(txn.find::<Account>(Query::new().field("Tags").contains("staff"))?.is_empty());
    // Alan (id 3) never carried the "staff" tag and should be untouched.
    let remaining = txn.find::<Account>(Query::new().field(KEY_FIELD).eq(3_u64))?;
    assert_eq!(remaining.len(), 1);
    Ok(())
}

#[test]
fn update_matching_keeps_the_age_index_consistent() -> Result<(), Error> {
    let (_file, db) = open_scratch_db();
    seed(&db, sample_accounts(), false)?;

    let mut txn = db.write()?;
    let updated =
        txn.update_matching::<Account>(&Query::new().field("Name").eq("Ada"), |a| a.age = 99)?;
    assert_eq!(updated, 1);
    txn.commit()?;

    let txn = db.read()?;
    let still_thirty = txn.find::<Account>(Query::new().field("Age").eq(30))?;
    assert_eq!(still_thirty.len(), 1);
    assert_eq!(still_thirty[0].id, 3);

    let now_ninety_nine = txn.find::<Account>(Query::new().field("Age").eq(99))?;
    assert_eq!(now_ninety_nine.len(), 1);
    assert_eq!(now_ninety_nine[0].id, 1);
    Ok(())
}

#[test]
fn post_processing_pipeline_runs_distinct_then_sort_then_limit() -> Result<(), Error> {
    let (_file, db) = open_scratch_db();
    // Insertion order shouldn't matter: the pipeline's own sort_by is what orders the output.
    seed(&db, sample_accounts(), true)?;

    let txn = db.read()?;
    let query = Query::new()
        .field("Age")
        .eq(30)
        .or()
        .field("Age")
        .eq(30)
        .sort_by("Name")
        .distinct()
        .limit(1);
    let results = txn.find::<Account>(query)?;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Ada");
    Ok(())
}

#[test]
fn aggregate_groups_by_region_and_reduces_age() -> Result<(), Error> {
    let (_file, db) = open_scratch_db();
    seed(&db, sample_accounts(), false)?;

    let txn = db.read()?;
    let groups = txn.aggregate::<Account>(Query::new(), &["Region"])?;
    assert_eq!(groups.len(), 2);

    let east = groups.iter().find(|g| g.key()[0].equal(&Value::from("East"))).unwrap();
    assert_eq!(east.count(), 2);
    assert_eq!(east.sum("Age")?, 60.0);
    assert_eq!(east.avg("Age")?, 30.0);
    Ok(())
}

#[test]
fn eq_against_nil_operand_surfaces_type_mismatch() -> Result<(), Error> {
    let (_file, db) = open_scratch_db();
    seed(&db, sample_accounts(), false)?;

    let txn = db.read()?;
    let err = txn.find::<Account>(Query::new().field("Age").eq(Value::Nil));
    assert!(matches!(err, Err(Error::TypeMismatch { .. })));
    Ok(())
}

#[test]
fn index_hint_drives_the_query_off_the_named_field() -> Result<(), Error> {
    let (_file, db) = open_scratch_db();
    seed(&db, sample_accounts(), false)?;

    let txn = db.read()?;
    let query = Query::new().field("Age").eq(30).field("Tags").contains("guest").index_hint("Tags");
    let results = txn.find::<Account>(query)?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 3);
    Ok(())
}

#[test]
fn auto_increment_keys_are_assigned_when_primary_key_is_absent() -> Result<(), Error> {
    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct Event {
        label: String,
    }

    unsafe impl SafeForRmpSerde for Event {}

    impl Descriptor for Event {
        fn bucket_name() -> &'static str {
            "Event"
        }

        fn primary_key(&self) -> Option<Value> {
            None
        }

        fn field(&self, name: &str) -> Result<Value, Error> {
            match name {
                "Label" => Ok(Value::from(self.label.clone())),
                other => Err(Error::FieldNotFound { field: Box::leak(other.to_string().into_boxed_str()) }),
            }
        }

        fn indexed_fields() -> &'static [IndexedField] {
            &[]
        }
    }

    let (_file, db) = open_scratch_db();
    let mut txn = db.write()?;
    let first = txn.insert(&Event { label: "first".into() })?;
    let second = txn.insert(&Event { label: "second".into() })?;
    txn.commit()?;

    assert_ne!(first, second);
    Ok(())
}
