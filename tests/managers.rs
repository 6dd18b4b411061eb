//! Integration tests for the real-data and simulation managers.

mod common;

use chrono::NaiveDate;
use common::{FixtureBuilder, Retrieval};
use simsense::{
    find_dataset_files, AssetLayout, ConfigLoader, RealDataManager, SimsenseError,
    SimulationManager, Timestamp, Value, DEFAULT_EXTENSION,
};
use tempfile::tempdir;

fn day(d: u32) -> Timestamp {
    NaiveDate::from_ymd_opt(2023, 1, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn three_days(dir: &std::path::Path) {
    for d in 1..=3 {
        FixtureBuilder::measurement("mira2_data", &format!("2023-01-0{} 00-00-00", d))
            .with_retrieval(Retrieval::new("retrieval").with_scale(d as f64))
            .write(dir, &format!("mira2_2023-01-0{}_00-00-00.hdf5", d));
    }
}

#[test]
fn locate_filter_and_read_one_day() {
    let dir = tempdir().unwrap();
    three_days(dir.path());

    let paths = find_dataset_files(dir.path(), DEFAULT_EXTENSION, None).unwrap();
    assert_eq!(paths.len(), 3);
    assert!(paths[0].ends_with("mira2_2023-01-01_00-00-00.hdf5"));
    assert!(paths[2].ends_with("mira2_2023-01-03_00-00-00.hdf5"));

    let mut manager = RealDataManager::with_source(paths, "mira2_data").unwrap();
    manager.filter_by_date(day(2), day(2));
    let mapping = manager.to_mapping(None).unwrap();

    assert_eq!(mapping.len(), 1);
    let (start, record) = mapping.iter().next().unwrap();
    assert_eq!(*start, day(2));
    assert_eq!(record.timestamp_field("measurement_start").unwrap(), day(2));
}

#[test]
fn mapping_with_mask_and_wrapping() {
    let dir = tempdir().unwrap();
    three_days(dir.path());
    let paths = find_dataset_files(dir.path(), DEFAULT_EXTENSION, None).unwrap();

    let mut manager = RealDataManager::with_source(paths, "retrieval").unwrap();
    let wrapped = manager.to_dotted(Some(&[true, false, true])).unwrap();

    assert_eq!(wrapped.keys().copied().collect::<Vec<_>>(), vec![day(1), day(3)]);
    assert_eq!(manager.paths().len(), 2);
    assert_eq!(manager.timestamps(), &[day(1), day(3)]);

    let third = &wrapped[&day(3)];
    let x = third.value("x").unwrap().as_array().unwrap();
    assert!(x.iter().all(|v| *v == 3.0));
}

#[test]
fn get_dataset_for_known_and_unknown_days() {
    let dir = tempdir().unwrap();
    three_days(dir.path());
    let paths = find_dataset_files(dir.path(), DEFAULT_EXTENSION, None).unwrap();

    let mut manager = RealDataManager::with_source(paths, "retrieval").unwrap();
    assert!(manager.get_dataset_for(day(9)).unwrap().is_none());

    let found = manager.get_dataset_for(day(3)).unwrap().unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[&day(3)].get("vmr_field").is_ok());
    assert_eq!(manager.paths().len(), 1);
}

#[test]
fn duplicate_start_times_keep_the_last_file() {
    let dir = tempdir().unwrap();
    FixtureBuilder::measurement("mira2_data", "2023-01-01 00-00-00")
        .with_spectrum(vec![1.0])
        .write(dir.path(), "a_2023-01-01_00-00-00.hdf5");
    FixtureBuilder::measurement("mira2_data", "2023-01-01 00-00-00")
        .with_spectrum(vec![2.0])
        .write(dir.path(), "b_2023-01-01_00-00-00.hdf5");
    let paths = find_dataset_files(dir.path(), DEFAULT_EXTENSION, None).unwrap();

    let mut manager = RealDataManager::with_source(paths, "mira2_data").unwrap();
    let mapping = manager.to_mapping(None).unwrap();

    assert_eq!(mapping.len(), 1);
    let y = mapping[&day(1)].array_field("y").unwrap();
    assert_eq!(y[[0]], 2.0);
}

#[test]
fn manager_from_configuration() {
    let dir = tempdir().unwrap();
    common::write_config(dir.path(), "retrieval.json", "retrieval");
    let loader = ConfigLoader::new(AssetLayout::new(dir.path()));

    let manager = RealDataManager::new(Vec::new(), "retrieval.json", &loader).unwrap();

    assert_eq!(manager.source(), "retrieval");
    let config = manager.config().unwrap();
    assert_eq!(config.fieldname().unwrap(), "retrieval");
    assert!(config.get_str("abs_lookup").unwrap().ends_with("/assets/LUT/lut.xml"));
}

#[test]
fn bad_file_name_fails_construction() {
    let err = RealDataManager::with_source(vec!["/data/short.hdf5".into()], "mira2_data")
        .unwrap_err();
    assert!(matches!(err, SimsenseError::Parse { .. }));
}

#[test]
fn simulations_by_inferred_name() {
    let dir = tempdir().unwrap();
    common::write_simulation(dir.path(), "run_b.hdf5", 260.0);
    common::write_simulation(dir.path(), "run_a.hdf5", 250.0);

    let mut manager = SimulationManager::new(dir.path()).unwrap();
    let mapping = manager.to_mapping().unwrap();
    assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["run_a", "run_b"]);

    let t = mapping.get("run_b").unwrap().array_field("t_field").unwrap();
    assert!(t.iter().all(|v| *v == 260.0));

    assert_eq!(manager.infer_names(), &["run_a".to_string(), "run_b".to_string()]);
    let run_a = manager.get("run_a").unwrap();
    assert_eq!(run_a.get("n_iter").and_then(Value::as_scalar), Some(7.0));

    let err = manager.get("run_c").unwrap_err();
    assert!(matches!(err, SimsenseError::NameNotFound { .. }));
}

#[test]
fn simulations_with_explicit_names() {
    let dir = tempdir().unwrap();
    common::write_simulation(dir.path(), "run_a.hdf5", 250.0);
    common::write_simulation(dir.path(), "run_b.hdf5", 260.0);

    let mut manager = SimulationManager::new(dir.path()).unwrap();
    manager.set_names(["cold", "warm"]);

    let dotted = manager.to_dotted().unwrap();
    assert_eq!(dotted.keys().collect::<Vec<_>>(), vec!["cold", "warm"]);
    assert_eq!(dotted.path("warm.jacobian.scale").unwrap().as_scalar(), Some(0.5));
    assert_eq!(dotted.path("cold.n_iter").unwrap().as_scalar(), Some(7.0));

    manager.set_names(["only_one"]);
    let err = manager.to_mapping().unwrap_err();
    assert!(matches!(err, SimsenseError::LengthMismatch { .. }));
    assert!(manager.to_dotted().is_err());
}
