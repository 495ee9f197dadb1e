#![cfg(all(feature = "serde", feature = "reference-engine"))]
#![allow(non_snake_case)]

use engine_bridge::{
    algebra::*,
    engine::ReferenceEngine,
    io::ConfigurablePrintTarget,
    session::{LinearSystem, Session, SessionSettings, SessionSettingsBuilder},
};
use std::io::{Seek, SeekFrom, Write};

#[test]
fn test_json_round_trip_and_replay() {
    let mut session = Session::new(ReferenceEngine::new(), SessionSettings::default()).unwrap();
    let mut x = [0.0; 3];
    session
        .solve_sparse_linear_system(
            3,
            &[0usize, 1, 2, 2],
            &[0, 1, 2, 0],
            &[1.0, 2.0, 4.0, 1.0],
            &[1.0, 2.0, 5.0],
            &mut x,
        )
        .unwrap();

    let system = session.last_linear_system().unwrap();
    assert_eq!(system.n(), 3);
    assert_eq!(system.A.get(2, 0), 1.0);

    let mut file = tempfile::tempfile().unwrap();
    system.write_to_file(&mut file).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let system2 = LinearSystem::read_from_file(&mut file).unwrap();
    assert_eq!(system, system2);

    // replay on a fresh engine
    let mut session2 = Session::new(ReferenceEngine::new(), SessionSettings::default()).unwrap();
    let x2 = session2.solve_linear_system(&system2).unwrap();
    assert_eq!(x.to_vec(), x2);
}

#[test]
fn test_json_rejects_malformed_system() {
    let mut file = tempfile::tempfile().unwrap();
    // 2x2 matrix with a row index out of range
    write!(
        file,
        r#"{{"A":{{"m":2,"n":2,"colptr":[0,1,1],"rowval":[5],"nzval":[1.0]}},"b":[1.0,1.0]}}"#
    )
    .unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    assert!(LinearSystem::read_from_file(&mut file).is_err());

    let mut file = tempfile::tempfile().unwrap();
    write!(
        file,
        r#"{{"A":{{"m":1,"n":1,"colptr":[0,1],"rowval":[0],"nzval":[1.0]}},"b":[1.0,1.0]}}"#
    )
    .unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    assert!(LinearSystem::read_from_file(&mut file).is_err());
}

#[test]
fn test_settings_json() {
    let settings = SessionSettingsBuilder::default()
        .solve_prefix("SYS")
        .output_capacity(1024)
        .build()
        .unwrap();
    let json = serde_json::to_string(&settings).unwrap();
    let back: SessionSettings = serde_json::from_str(&json).unwrap();
    assert_eq!(settings, back);

    // missing fields take their defaults
    let partial: SessionSettings = serde_json::from_str(r#"{"verbose": false}"#).unwrap();
    assert!(!partial.verbose);
    assert_eq!(partial.solve_prefix, "LS");
    assert!(partial.validate().is_ok());
}

#[test]
fn test_failed_solve_snapshot() {
    let mut session = Session::new(ReferenceEngine::new(), SessionSettings::default()).unwrap();
    session.print_to_sink();
    assert!(session.last_linear_system().is_none());

    let mut x = [0.0; 2];
    let res = session.solve_sparse_linear_system(2, &[0usize, 1], &[0, 0], &[1.0, 1.0], &[1.0, 1.0], &mut x);
    assert!(res.is_err());

    let system = session.last_linear_system().unwrap();
    let A = CscMatrix::new_from_triplets(2, 2, &[0, 1], &[0, 0], &[1.0, 1.0]).unwrap();
    assert_eq!(system, LinearSystem::new(A, vec![1.0, 1.0]));
}
