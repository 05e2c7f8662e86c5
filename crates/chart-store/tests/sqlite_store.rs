// File: crates/chart-store/tests/sqlite_store.rs
// Purpose: SQLite store behavior: validation, ordering, project scoping and on-disk persistence.

use chart_store::{ChartSpecStore, ProjectStore, SqliteStore, StoreError};
use serde_json::json;

#[test]
fn create_project_trims_and_validates() {
    let store = SqliteStore::open_in_memory().expect("open");
    let p = store.create_project("  MD runs ", "\tRMSD analysis\n").expect("create");
    assert_eq!(p.name, "MD runs");
    assert_eq!(p.description, "RMSD analysis");
    assert_eq!(p.created_date, p.last_modified);

    let err = store.create_project("   ", "desc").unwrap_err();
    assert!(matches!(err, StoreError::Validation(ref m) if m == "Project name is required"));
    let err = store.create_project("name", "").unwrap_err();
    assert!(matches!(err, StoreError::Validation(ref m) if m == "Project description is required"));

    assert_eq!(store.list_projects().unwrap(), vec![p.clone()]);
    assert_eq!(store.get_project(&p.id).unwrap(), Some(p));
    assert_eq!(store.get_project("missing").unwrap(), None);
}

#[test]
fn specs_round_trip_verbatim_in_creation_order() {
    let store = SqliteStore::open_in_memory().expect("open");
    let project = store.create_project("p", "d").unwrap();
    // never interpreted: unknown keys and odd shapes survive
    let first = json!({"plot_type": "pie", "plot_properties": {"x_column_names": "time"}, "extra": [1, null]});
    let second = json!({"plot_type": "bar", "x_column_names": ["cat1", "cat2"], "y_column_names": ["v"]});

    let a = store.save(&project.id, "first", None, &first).unwrap();
    let b = store.save(&project.id, "second", Some("bars"), &second).unwrap();
    assert_ne!(a, b);

    let got = store.get(&project.id, &b).unwrap().expect("present");
    assert_eq!(got.name, "second");
    assert_eq!(got.description.as_deref(), Some("bars"));
    assert_eq!(got.project_id, project.id);
    assert_eq!(got.config, second);

    let listed = store.list(&project.id).unwrap();
    let ids: Vec<_> = listed.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, [a.as_str(), b.as_str()]);
    assert_eq!(listed[0].config, first);
    assert_eq!(listed[0].description, None);
}

#[test]
fn specs_are_scoped_to_their_project() {
    let store = SqliteStore::open_in_memory().expect("open");
    let p1 = store.create_project("one", "d").unwrap();
    let p2 = store.create_project("two", "d").unwrap();
    let id = store.save(&p1.id, "s", None, &json!({})).unwrap();

    assert!(store.get(&p2.id, &id).unwrap().is_none());
    assert!(store.list(&p2.id).unwrap().is_empty());
    assert_eq!(store.list(&p1.id).unwrap().len(), 1);
}

#[test]
fn records_serialize_with_camel_case_timestamps() {
    let store = SqliteStore::open_in_memory().expect("open");
    let p = store.create_project("p", "d").unwrap();
    let id = store.save(&p.id, "s", None, &json!({"title": "t"})).unwrap();
    let rec = store.get(&p.id, &id).unwrap().unwrap();
    let v = serde_json::to_value(&rec).unwrap();
    assert!(v.get("createdDate").is_some());
    assert!(v.get("lastModified").is_some());
    assert_eq!(v["projectId"], p.id.as_str());
    assert_eq!(v["config"]["title"], "t");
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("data").join("projects.db");

    let (project_id, spec_id) = {
        let store = SqliteStore::open(&path).expect("open");
        let p = store.create_project("persisted", "on disk").unwrap();
        let s = store.save(&p.id, "spec", None, &json!({"plot_type": "line"})).unwrap();
        (p.id, s)
    };

    let store = SqliteStore::open(&path).expect("reopen");
    assert_eq!(store.list_projects().unwrap().len(), 1);
    let rec = store.get(&project_id, &spec_id).unwrap().expect("persisted spec");
    assert_eq!(rec.config, json!({"plot_type": "line"}));
}

#[test]
fn store_is_usable_across_threads() {
    let store = std::sync::Arc::new(SqliteStore::open_in_memory().expect("open"));
    let p = store.create_project("p", "d").unwrap();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = store.clone();
            let pid = p.id.clone();
            std::thread::spawn(move || store.save(&pid, &format!("s{i}"), None, &json!({"i": i})).unwrap())
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(store.list(&p.id).unwrap().len(), 4);
}
