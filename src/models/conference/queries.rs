use sqlx::PgPool;
use std::collections::HashMap;

use super::types::*;
use crate::catalog::types::RawConference;
use crate::errors::AppError;

/// Fetch every conference joined with its deadlines, ready for the
/// normalizer. Deadline order within a conference is insertion order.
pub async fn find_all_raw(pool: &PgPool) -> Result<Vec<RawConference>, AppError> {
    let conferences = sqlx::query_as::<_, ConferenceRow>(
        "SELECT id, name, conf_start_date, conf_end_date, location, site_url, \
                areas, tags, note, timezone \
         FROM conferences",
    )
    .fetch_all(pool)
    .await?;

    #[derive(sqlx::FromRow)]
    struct DeadlineJoinRow {
        conference_id: String,
        deadline_type: String,
        due_date: chrono::DateTime<chrono::Utc>,
    }

    let deadline_rows = sqlx::query_as::<_, DeadlineJoinRow>(
        "SELECT conference_id, deadline_type, due_date FROM deadlines ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;

    let mut by_conference: HashMap<String, Vec<DeadlineInput>> = HashMap::new();
    for row in deadline_rows {
        by_conference
            .entry(row.conference_id)
            .or_default()
            .push(DeadlineInput {
                deadline_type: row.deadline_type,
                due_date: row.due_date,
            });
    }

    Ok(conferences
        .into_iter()
        .map(|conf| {
            let deadlines = by_conference.remove(&conf.id).unwrap_or_default();
            conf.into_raw(deadlines)
        })
        .collect())
}

/// All conference rows without deadlines, for the admin list.
pub async fn find_all(pool: &PgPool) -> Result<Vec<ConferenceRow>, AppError> {
    let rows = sqlx::query_as::<_, ConferenceRow>(
        "SELECT id, name, conf_start_date, conf_end_date, location, site_url, \
                areas, tags, note, timezone \
         FROM conferences ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<ConferenceRow>, AppError> {
    let row = sqlx::query_as::<_, ConferenceRow>(
        "SELECT id, name, conf_start_date, conf_end_date, location, site_url, \
                areas, tags, note, timezone \
         FROM conferences WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn insert(pool: &PgPool, row: &ConferenceRow) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO conferences \
             (id, name, conf_start_date, conf_end_date, location, site_url, \
              areas, tags, note, timezone) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(&row.id)
    .bind(&row.name)
    .bind(row.conf_start_date)
    .bind(row.conf_end_date)
    .bind(&row.location)
    .bind(&row.site_url)
    .bind(&row.areas)
    .bind(&row.tags)
    .bind(&row.note)
    .bind(&row.timezone)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update(pool: &PgPool, id: &str, patch: &ConferenceUpdate) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE conferences \
         SET name = $2, conf_start_date = $3, conf_end_date = $4, location = $5, \
             site_url = $6, note = $7, timezone = $8, areas = $9 \
         WHERE id = $1",
    )
    .bind(id)
    .bind(&patch.name)
    .bind(patch.conf_start_date)
    .bind(patch.conf_end_date)
    .bind(&patch.location)
    .bind(&patch.site_url)
    .bind(&patch.note)
    .bind(&patch.timezone)
    .bind(&patch.areas)
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete a conference; its deadlines go with it (FK cascade).
pub async fn delete(pool: &PgPool, id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM conferences WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn deadlines_for(pool: &PgPool, conference_id: &str) -> Result<Vec<DeadlineInput>, AppError> {
    let rows = sqlx::query_as::<_, DeadlineInput>(
        "SELECT deadline_type, due_date FROM deadlines \
         WHERE conference_id = $1 ORDER BY id ASC",
    )
    .bind(conference_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert_deadlines(
    pool: &PgPool,
    conference_id: &str,
    deadlines: &[DeadlineInput],
) -> Result<(), AppError> {
    for d in deadlines {
        sqlx::query(
            "INSERT INTO deadlines (conference_id, deadline_type, due_date) \
             VALUES ($1, $2, $3)",
        )
        .bind(conference_id)
        .bind(&d.deadline_type)
        .bind(d.due_date)
        .execute(pool)
        .await?;
    }
    Ok(())
}

pub async fn delete_deadlines(pool: &PgPool, conference_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM deadlines WHERE conference_id = $1")
        .bind(conference_id)
        .execute(pool)
        .await?;
    Ok(())
}
