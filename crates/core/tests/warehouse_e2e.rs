//! End-to-end transform tests against a live PostgreSQL database
//!
//! These tests need a reachable database and are ignored by default.
//! Point PLAYLOG_TEST_DB at a scratch database and run with:
//!
//! ```sh
//! PLAYLOG_TEST_DB="host=localhost user=postgres dbname=playlog_test" \
//!     cargo test --test warehouse_e2e -- --ignored
//! ```
//!
//! The staging tables are populated directly instead of via bulk-copy,
//! which the postgres dialect does not support. Everything downstream
//! of staging (DDL and all five transforms) runs exactly as a pipeline
//! run would execute it. The all-or-nothing bulk-copy failure behavior
//! is enforced by the warehouse itself and stays unverified here; it
//! needs a live Redshift cluster.

use playlog_core::catalog::{Dialect, QueryCatalog};
use playlog_core::config::WarehouseConfig;
use tokio_postgres::{Client, NoTls};

const CONFIG: &str = r#"
    [cluster]
    host = "localhost"
    dbname = "playlog_test"
    user = "postgres"
    password = "unused"
    port = 5432

    [s3]
    log_data = "s3://bucket/log_data"
    log_jsonpath = "s3://bucket/log_json_path.json"
    song_data = "s3://bucket/song_data"

    [iam_role]
    arn = "arn:aws:iam::123456789012:role/dwhRole"
"#;

async fn connect() -> Client {
    let params = std::env::var("PLAYLOG_TEST_DB")
        .expect("PLAYLOG_TEST_DB must point at a scratch database");
    let (client, connection) = tokio_postgres::connect(&params, NoTls)
        .await
        .expect("connect to test database");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("test connection error: {e}");
        }
    });
    client
}

fn catalog() -> QueryCatalog {
    let config = WarehouseConfig::from_toml_str(CONFIG).expect("test config parses");
    QueryCatalog::new(&config, Dialect::Postgres).expect("test catalog builds")
}

/// Reset the schema and load one play event with its matching song.
async fn seed(client: &Client, catalog: &QueryCatalog) {
    for statement in catalog.drop_table_queries() {
        client.batch_execute(&statement.sql).await.expect("drop");
    }
    for statement in catalog.create_table_queries() {
        client.batch_execute(&statement.sql).await.expect("create");
    }

    // One NextSong event plus one page view that must not reach the schema.
    client
        .batch_execute(
            r#"INSERT INTO staging_events
    (artist, auth, firstName, gender, itemInSession, lastName, length,
     level, location, method, page, registration, sessionId, song,
     status, ts, userAgent, userId)
VALUES
    ('A', 'Logged In', 'Lily', 'F', 5, 'Koch', 200.0,
     'free', 'X', 'PUT', 'NextSong', 1541048010796,
     1, 'S', 200, 1541105830796, 'UA', 10),
    ('A', 'Logged In', 'Lily', 'F', 6, 'Koch', 0,
     'free', 'X', 'GET', 'Home', 1541048010796,
     1, '', 200, 1541105900796, 'UA', 10)"#,
        )
        .await
        .expect("seed staging_events");

    client
        .batch_execute(
            r#"INSERT INTO staging_songs
    (num_songs, artist_id, artist_latitude, artist_longitude,
     artist_location, artist_name, song_id, title, duration, year)
VALUES
    (1, 'AID1', 49.80388, 15.47491, 'Dubai UAE', 'A',
     'SID1', 'S', 200.0, 2000)"#,
        )
        .await
        .expect("seed staging_songs");
}

async fn run_transforms(client: &Client, catalog: &QueryCatalog) {
    for statement in catalog.insert_table_queries() {
        client
            .batch_execute(&statement.sql)
            .await
            .unwrap_or_else(|e| panic!("transform into {}: {e}", statement.table));
    }
}

async fn count(client: &Client, table: &str) -> i64 {
    let row = client
        .query_one(&format!("SELECT COUNT(*) FROM {table}"), &[])
        .await
        .expect("count");
    row.get(0)
}

#[tokio::test]
#[ignore]
async fn test_single_play_event_populates_star_schema() {
    let client = connect().await;
    let catalog = catalog();
    seed(&client, &catalog).await;
    run_transforms(&client, &catalog).await;

    assert_eq!(count(&client, "songplays").await, 1);
    assert_eq!(count(&client, "users").await, 1);
    assert_eq!(count(&client, "songs").await, 1);
    assert_eq!(count(&client, "artists").await, 1);
    assert_eq!(count(&client, "time").await, 1);

    let play = client
        .query_one(
            "SELECT user_id, level, song_id, artist_id, session_id FROM songplays",
            &[],
        )
        .await
        .expect("songplay row");
    assert_eq!(play.get::<_, i32>("user_id"), 10);
    assert_eq!(play.get::<_, String>("song_id"), "SID1");
    assert_eq!(play.get::<_, String>("artist_id"), "AID1");
    assert_eq!(play.get::<_, i32>("session_id"), 1);

    // ts 1541105830796 is 2018-11-01T21:37:10.796Z
    let time = client
        .query_one("SELECT hour, day, month, year, weekday FROM time", &[])
        .await
        .expect("time row");
    assert_eq!(time.get::<_, i32>("hour"), 21);
    assert_eq!(time.get::<_, i32>("day"), 1);
    assert_eq!(time.get::<_, i32>("month"), 11);
    assert_eq!(time.get::<_, i32>("year"), 2018);
    // 2018-11-01 is a Thursday
    assert_eq!(time.get::<_, i32>("weekday"), 4);
}

#[tokio::test]
#[ignore]
async fn test_dimension_inserts_are_rerun_safe() {
    let client = connect().await;
    let catalog = catalog();
    seed(&client, &catalog).await;
    run_transforms(&client, &catalog).await;
    run_transforms(&client, &catalog).await;

    // Anti-joined dimensions are unchanged; the fact table is not
    // protected and doubles on the second pass.
    assert_eq!(count(&client, "users").await, 1);
    assert_eq!(count(&client, "songs").await, 1);
    assert_eq!(count(&client, "artists").await, 1);
    assert_eq!(count(&client, "time").await, 1);
    assert_eq!(count(&client, "songplays").await, 2);
}

#[tokio::test]
#[ignore]
async fn test_user_upgrading_mid_log_yields_one_row_at_latest_level() {
    let client = connect().await;
    let catalog = catalog();
    seed(&client, &catalog).await;

    // Same listener plays again after upgrading.
    client
        .batch_execute(
            r#"INSERT INTO staging_events
    (artist, auth, firstName, gender, itemInSession, lastName, length,
     level, location, method, page, registration, sessionId, song,
     status, ts, userAgent, userId)
VALUES
    ('A', 'Logged In', 'Lily', 'F', 7, 'Koch', 200.0,
     'paid', 'X', 'PUT', 'NextSong', 1541048010796,
     2, 'S', 200, 1541116600796, 'UA', 10)"#,
        )
        .await
        .expect("seed upgraded event");

    run_transforms(&client, &catalog).await;

    assert_eq!(count(&client, "users").await, 1);
    let user = client
        .query_one("SELECT level FROM users WHERE user_id = 10", &[])
        .await
        .expect("user row");
    assert_eq!(user.get::<_, String>("level"), "paid");
}

#[tokio::test]
#[ignore]
async fn test_unmatched_event_keeps_user_but_not_songplay() {
    let client = connect().await;
    let catalog = catalog();
    seed(&client, &catalog).await;

    // Second listener plays a song absent from the catalog.
    client
        .batch_execute(
            r#"INSERT INTO staging_events
    (artist, auth, firstName, gender, itemInSession, lastName, length,
     level, location, method, page, registration, sessionId, song,
     status, ts, userAgent, userId)
VALUES
    ('Unknown Artist', 'Logged In', 'Jacob', 'M', 1, 'Klein', 180.0,
     'paid', 'Tampa-St. Petersburg-Clearwater, FL', 'PUT', 'NextSong',
     1540558108796, 954, 'Untitled Track', 200, 1541106106796,
     'Mozilla/5.0', 73)"#,
        )
        .await
        .expect("seed unmatched event");

    run_transforms(&client, &catalog).await;

    // The inner join drops the unmatched play from the fact table, but
    // the listener and timestamp still land in their dimensions.
    assert_eq!(count(&client, "songplays").await, 1);
    assert_eq!(count(&client, "users").await, 2);
    assert_eq!(count(&client, "time").await, 2);
}
