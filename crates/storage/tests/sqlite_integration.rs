use journey_core::model::{ProgressState, Route};
use storage::repository::{ProgressRecord, ProgressRepository};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_defaults_to_zero_on_first_run() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_first_run?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let record = repo.load().await.unwrap();
    assert_eq!(record, ProgressRecord::default());
}

#[tokio::test]
async fn sqlite_roundtrip_persists_both_fields() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let route = Route::fellowship();
    let state = ProgressState::at_steps(&route, 96_000);
    repo.save(&ProgressRecord::from_state(&state)).await.unwrap();

    let loaded = repo.load().await.unwrap().into_state();
    assert_eq!(loaded, state);
    assert_eq!(loaded.snapshot(&route).waypoint().name(), "Lothlórien");
}

#[tokio::test]
async fn sqlite_save_overwrites_previous_record() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let route = Route::fellowship();
    let early = ProgressState::at_steps(&route, 8_000);
    let late = ProgressState::at_steps(&route, 24_000);

    repo.save(&ProgressRecord::from_state(&early)).await.unwrap();
    repo.save(&ProgressRecord::from_state(&late)).await.unwrap();

    let loaded = repo.load().await.unwrap();
    assert_eq!(loaded.total_steps, 24_000);
    assert_eq!(loaded.waypoint_index, 3);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let record = repo.load().await.unwrap();
    assert_eq!(record, ProgressRecord::default());
}
