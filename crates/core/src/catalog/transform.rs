//! Bulk-copy and transform statements
//!
//! The two copy statements land raw records in the staging tables; the
//! five insert statements move them into the star schema. Statement
//! order is fixed: the fact table first, then users, songs, artists,
//! time. No insert reads another insert's output within a run, so the
//! order only serves readability.

use super::dialect::Dialect;
use super::error::CatalogError;
use super::{Statement, sql_literal};
use crate::config::SourceConfig;

/// Bulk-copy statements, one per staging table.
///
/// The events source carries an explicit JSON-path mapping document to
/// reconcile camelCase source field names with the declared columns;
/// the song catalog maps fields to columns automatically.
pub(crate) fn copy_statements(
    sources: &SourceConfig,
    iam_role: &str,
    dialect: Dialect,
) -> Result<Vec<Statement>, CatalogError> {
    if !dialect.supports_bulk_copy() {
        return Err(CatalogError::Unsupported {
            dialect: dialect.name(),
            operation: "Bulk-copy from object storage",
        });
    }

    Ok(vec![
        Statement::new(
            "staging_events",
            format!(
                "COPY staging_events\nFROM {}\nIAM_ROLE {}\nFORMAT AS JSON {}",
                sql_literal(&sources.log_data),
                sql_literal(iam_role),
                sql_literal(&sources.log_jsonpath),
            ),
        ),
        Statement::new(
            "staging_songs",
            format!(
                "COPY staging_songs\nFROM {}\nIAM_ROLE {}\nFORMAT AS JSON 'auto'",
                sql_literal(&sources.song_data),
                sql_literal(iam_role),
            ),
        ),
    ])
}

/// Transform statements in execution order.
///
/// The fact insert keeps the page predicate inside the join's ON clause
/// and carries no anti-join: re-running it against loaded staging
/// tables duplicates fact rows. The four dimension inserts are re-run
/// safe through NOT IN anti-joins on their natural keys, and take one
/// row per key within the batch itself (the most recent event for
/// users, where the same listener appears at two subscription levels)
/// so a key duplicated in staging cannot violate the destination
/// primary key.
pub(crate) fn insert_statements(dialect: Dialect) -> Vec<Statement> {
    let event_ts = dialect.epoch_millis_to_timestamp("events.ts");
    let staging_ts = dialect.epoch_millis_to_timestamp("ts");
    let weekday = dialect.weekday_part();

    vec![
        Statement::new(
            "songplays",
            format!(
                r#"INSERT INTO songplays (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
SELECT DISTINCT {event_ts} AS start_time,
    events.userId AS user_id,
    events.level AS level,
    songs.song_id AS song_id,
    songs.artist_id AS artist_id,
    events.sessionId AS session_id,
    events.location AS location,
    events.userAgent AS user_agent
FROM staging_events events
JOIN staging_songs songs
    ON (events.song = songs.title AND events.artist = songs.artist_name)
    AND events.page = 'NextSong'"#
            ),
        ),
        Statement::new(
            "users",
            r#"INSERT INTO users (user_id, first_name, last_name, gender, level)
SELECT user_id, first_name, last_name, gender, level
FROM (
    SELECT userId AS user_id,
        firstName AS first_name,
        lastName AS last_name,
        gender,
        level,
        ROW_NUMBER() OVER (PARTITION BY userId ORDER BY ts DESC) AS row_rank
    FROM staging_events
    WHERE page = 'NextSong'
) AS ranked
WHERE row_rank = 1
    AND user_id NOT IN (SELECT DISTINCT user_id FROM users)"#
                .to_string(),
        ),
        Statement::new(
            "songs",
            r#"INSERT INTO songs (song_id, title, artist_id, year, duration)
SELECT song_id, title, artist_id, year, duration
FROM (
    SELECT song_id,
        title,
        artist_id,
        year,
        duration,
        ROW_NUMBER() OVER (PARTITION BY song_id ORDER BY year DESC) AS row_rank
    FROM staging_songs
) AS ranked
WHERE row_rank = 1
    AND song_id NOT IN (SELECT DISTINCT song_id FROM songs)"#
                .to_string(),
        ),
        Statement::new(
            "artists",
            r#"INSERT INTO artists (artist_id, name, location, latitude, longitude)
SELECT artist_id, name, location, latitude, longitude
FROM (
    SELECT artist_id,
        artist_name AS name,
        artist_location AS location,
        artist_latitude AS latitude,
        artist_longitude AS longitude,
        ROW_NUMBER() OVER (PARTITION BY artist_id ORDER BY artist_name) AS row_rank
    FROM staging_songs
) AS ranked
WHERE row_rank = 1
    AND artist_id NOT IN (SELECT DISTINCT artist_id FROM artists)"#
                .to_string(),
        ),
        Statement::new(
            "time",
            format!(
                r#"INSERT INTO time (start_time, hour, day, week, month, year, weekday)
SELECT start_time,
    EXTRACT(hour FROM start_time)::INTEGER AS hour,
    EXTRACT(day FROM start_time)::INTEGER AS day,
    EXTRACT(week FROM start_time)::INTEGER AS week,
    EXTRACT(month FROM start_time)::INTEGER AS month,
    EXTRACT(year FROM start_time)::INTEGER AS year,
    EXTRACT({weekday} FROM start_time)::INTEGER AS weekday
FROM (SELECT DISTINCT {staging_ts} AS start_time FROM staging_events) AS event_times
WHERE start_time NOT IN (SELECT DISTINCT start_time FROM time)"#
            ),
        ),
    ]
}
