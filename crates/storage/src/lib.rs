use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;
use uuid::Uuid;

use shared::{
    calendar::{CalendarDay, Selection},
    domain::{ContractType, Position, Submission, SubmissionId, SubmissionInput},
};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(if database_url.contains(":memory:") { 1 } else { 5 })
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Stores `input` under a fresh UUID v4 id. The row and its dates land in
    /// one transaction, so a failure leaves nothing behind.
    pub async fn insert_submission(&self, input: &SubmissionInput) -> Result<Submission> {
        let id = SubmissionId(Uuid::new_v4().to_string());
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO submissions (id, first_name, last_name, contract, position, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.as_str())
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.contract.as_str())
        .bind(input.position.as_str())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .context("failed to insert submission")?;

        for day in &input.dates {
            sqlx::query("INSERT INTO submission_dates (submission_id, day) VALUES (?, ?)")
                .bind(id.as_str())
                .bind(day.to_string())
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to insert date {day}"))?;
        }

        tx.commit().await?;
        debug!(submission_id = %id, dates = input.dates.len(), "stored submission");
        Ok(Submission::from_input(id, input.clone()))
    }

    /// All submissions in creation order, each with its dates ascending.
    pub async fn list_submissions(&self) -> Result<Vec<Submission>> {
        let date_rows = sqlx::query("SELECT submission_id, day FROM submission_dates")
            .fetch_all(&self.pool)
            .await?;
        let mut dates: HashMap<String, Selection> = HashMap::new();
        for row in date_rows {
            let submission_id: String = row.try_get("submission_id")?;
            let raw_day: String = row.try_get("day")?;
            let day = CalendarDay::from_str(&raw_day)
                .with_context(|| format!("corrupt date for submission {submission_id}"))?;
            dates.entry(submission_id).or_default().insert(day);
        }

        let rows = sqlx::query(
            "SELECT id, first_name, last_name, contract, position
             FROM submissions
             ORDER BY seq ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut submissions = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id")?;
            let contract = ContractType::from_str(&row.try_get::<String, _>("contract")?)
                .with_context(|| format!("corrupt contract for submission {id}"))?;
            let position = Position::from_str(&row.try_get::<String, _>("position")?)
                .with_context(|| format!("corrupt position for submission {id}"))?;
            submissions.push(Submission {
                dates: dates.remove(&id).unwrap_or_default(),
                id: SubmissionId(id),
                first_name: row.try_get("first_name")?,
                last_name: row.try_get("last_name")?,
                contract,
                position,
            });
        }
        Ok(submissions)
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.contains(":memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
