//! DDL statements for the staging tables and the star schema
//!
//! Drops list staging tables before the tables the transforms feed.
//! Creates run in dependency order: staging tables, then the fact
//! table, then the dimensions. Both lists are idempotent (`IF EXISTS`
//! / `IF NOT EXISTS`).

use super::Statement;
use super::dialect::Dialect;

/// All seven tables, staging tables first
pub(crate) const DROP_ORDER: [&str; 7] = [
    "staging_events",
    "staging_songs",
    "songplays",
    "users",
    "songs",
    "artists",
    "time",
];

pub(crate) fn drop_statements() -> Vec<Statement> {
    DROP_ORDER
        .iter()
        .map(|table| Statement::new(table, format!("DROP TABLE IF EXISTS {table}")))
        .collect()
}

pub(crate) fn create_statements(dialect: Dialect) -> Vec<Statement> {
    vec![
        Statement::new(
            "staging_events",
            r#"CREATE TABLE IF NOT EXISTS staging_events (
    artist          VARCHAR NOT NULL,
    auth            VARCHAR NOT NULL,
    firstName       VARCHAR NOT NULL,
    gender          VARCHAR NOT NULL,
    itemInSession   INTEGER NOT NULL,
    lastName        VARCHAR NOT NULL,
    length          DOUBLE PRECISION NOT NULL,
    level           VARCHAR NOT NULL,
    location        VARCHAR NOT NULL,
    method          VARCHAR NOT NULL,
    page            VARCHAR NOT NULL,
    registration    BIGINT NOT NULL,
    sessionId       INTEGER NOT NULL,
    song            VARCHAR NOT NULL,
    status          INTEGER NOT NULL,
    ts              BIGINT NOT NULL,
    userAgent       VARCHAR NOT NULL,
    userId          INTEGER NOT NULL
)"#
            .to_string(),
        ),
        Statement::new(
            "staging_songs",
            r#"CREATE TABLE IF NOT EXISTS staging_songs (
    num_songs           INTEGER NOT NULL,
    artist_id           VARCHAR NOT NULL,
    artist_latitude     DOUBLE PRECISION NOT NULL,
    artist_longitude    DOUBLE PRECISION NOT NULL,
    artist_location     VARCHAR NOT NULL,
    artist_name         VARCHAR NOT NULL,
    song_id             VARCHAR NOT NULL,
    title               VARCHAR NOT NULL,
    duration            DOUBLE PRECISION NOT NULL,
    year                INTEGER NOT NULL
)"#
            .to_string(),
        ),
        Statement::new(
            "songplays",
            format!(
                r#"CREATE TABLE IF NOT EXISTS songplays (
    songplay_id     {identity},
    start_time      TIMESTAMP NOT NULL,
    user_id         INTEGER NOT NULL,
    level           VARCHAR NOT NULL,
    song_id         VARCHAR,
    artist_id       VARCHAR,
    session_id      INTEGER NOT NULL,
    location        VARCHAR NOT NULL,
    user_agent      VARCHAR NOT NULL
)"#,
                identity = dialect.identity_primary_key()
            ),
        ),
        Statement::new(
            "users",
            r#"CREATE TABLE IF NOT EXISTS users (
    user_id     INTEGER PRIMARY KEY,
    first_name  VARCHAR NOT NULL,
    last_name   VARCHAR NOT NULL,
    gender      VARCHAR NOT NULL,
    level       VARCHAR NOT NULL
)"#
            .to_string(),
        ),
        Statement::new(
            "songs",
            r#"CREATE TABLE IF NOT EXISTS songs (
    song_id     VARCHAR PRIMARY KEY,
    title       VARCHAR NOT NULL,
    artist_id   VARCHAR NOT NULL,
    year        INTEGER NOT NULL,
    duration    DOUBLE PRECISION NOT NULL
)"#
            .to_string(),
        ),
        Statement::new(
            "artists",
            r#"CREATE TABLE IF NOT EXISTS artists (
    artist_id   VARCHAR PRIMARY KEY,
    name        VARCHAR NOT NULL,
    location    VARCHAR NOT NULL,
    latitude    DOUBLE PRECISION NOT NULL,
    longitude   DOUBLE PRECISION NOT NULL
)"#
            .to_string(),
        ),
        Statement::new(
            "time",
            r#"CREATE TABLE IF NOT EXISTS time (
    start_time  TIMESTAMP PRIMARY KEY,
    hour        INTEGER NOT NULL,
    day         INTEGER NOT NULL,
    week        INTEGER NOT NULL,
    month       INTEGER NOT NULL,
    year        INTEGER NOT NULL,
    weekday     INTEGER NOT NULL
)"#
            .to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_statements_are_idempotent_and_ordered() {
        let drops = drop_statements();
        assert_eq!(drops.len(), 7);
        assert!(drops.iter().all(|s| s.sql.contains("IF EXISTS")));
        // Staging tables listed before the tables that depend on them
        assert_eq!(drops[0].table, "staging_events");
        assert_eq!(drops[1].table, "staging_songs");
        assert_eq!(drops[2].table, "songplays");
    }

    #[test]
    fn test_create_statements_in_dependency_order() {
        let creates = create_statements(Dialect::Redshift);
        let order: Vec<&str> = creates.iter().map(|s| s.table).collect();
        assert_eq!(
            order,
            vec![
                "staging_events",
                "staging_songs",
                "songplays",
                "users",
                "songs",
                "artists",
                "time"
            ]
        );
        assert!(creates.iter().all(|s| s.sql.contains("IF NOT EXISTS")));
    }

    #[test]
    fn test_staging_columns_all_not_null() {
        let creates = create_statements(Dialect::Redshift);
        for stmt in creates.iter().take(2) {
            for line in stmt.sql.lines().filter(|l| l.starts_with("    ")) {
                assert!(line.contains("NOT NULL"), "{}: {line}", stmt.table);
            }
        }
    }

    #[test]
    fn test_fact_table_keys_nullable() {
        let creates = create_statements(Dialect::Postgres);
        let songplays = &creates[2];
        assert!(songplays.sql.contains("BIGSERIAL PRIMARY KEY"));
        for line in songplays.sql.lines() {
            if line.contains("song_id") || line.contains("artist_id") {
                assert!(!line.contains("NOT NULL"), "{line}");
            }
        }
    }

    #[test]
    fn test_dimension_primary_keys() {
        let creates = create_statements(Dialect::Redshift);
        for (table, key) in [
            ("users", "user_id"),
            ("songs", "song_id"),
            ("artists", "artist_id"),
            ("time", "start_time"),
        ] {
            let stmt = creates.iter().find(|s| s.table == table).unwrap();
            let key_line = stmt
                .sql
                .lines()
                .find(|l| l.trim_start().starts_with(key))
                .unwrap();
            assert!(key_line.contains("PRIMARY KEY"), "{table}: {key_line}");
        }
    }
}
