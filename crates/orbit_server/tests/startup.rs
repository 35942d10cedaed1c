use clap::Parser;
use orbit_server::config::ServerConfig;
use orbit_server::{build_state, StartupError};

fn config_for(database: &std::path::Path, secret: &str) -> ServerConfig {
    ServerConfig::try_parse_from([
        "orbit",
        "--jwt-secret",
        secret,
        "--database",
        database.to_str().unwrap(),
    ])
    .unwrap()
}

#[test]
fn build_state_creates_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("data").join("orbit.sqlite3");

    let state = build_state(&config_for(&database, "s3cret")).unwrap();
    drop(state);

    assert!(database.exists());
    // Reopening an already migrated file is fine.
    build_state(&config_for(&database, "s3cret")).unwrap();
}

#[test]
fn build_state_rejects_blank_secret_before_touching_storage() {
    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("orbit.sqlite3");

    let err = build_state(&config_for(&database, "  ")).err().unwrap();

    assert!(matches!(err, StartupError::Config(_)));
    assert!(!database.exists());
}
