use crate::db::Database;
use crate::error::{CropwiseError, Result};
use crate::models::{Feedback, FeatureVector, HistoryEntry, RecommendationRecord};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tracing::warn;

pub const DEFAULT_HISTORY_LIMIT: usize = 20;

// Recommendation history

impl Database {
    pub fn save_run(&self, entry: &HistoryEntry) -> Result<i64> {
        let features_json = serde_json::to_string(&entry.features)?;
        let recommendations_json = serde_json::to_string(&entry.recommendations)?;

        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO recommendation_runs
                    (created_at, month, scoring_policy, top_crop, features_json,
                     recommendations_json, narrative)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    entry.created_at.to_rfc3339(),
                    entry.month,
                    entry.scoring_policy,
                    entry.top_crop,
                    features_json,
                    recommendations_json,
                    entry.narrative,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Most recent runs first. Rows whose payload no longer parses are skipped.
    pub fn recent_runs(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM recommendation_runs ORDER BY created_at DESC, id DESC LIMIT ?1",
            )?;
            let runs = stmt
                .query_map([limit as i64], row_to_stored_run)?
                .filter_map(|r| r.ok())
                .filter_map(|stored| {
                    let id = stored.id;
                    stored
                        .into_entry()
                        .map_err(|e| warn!(id, error = %e, "Skipping unreadable history row"))
                        .ok()
                })
                .collect();
            Ok(runs)
        })
    }

    pub fn get_run(&self, id: i64) -> Result<Option<HistoryEntry>> {
        let stored = self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM recommendation_runs WHERE id = ?1",
                [id],
                row_to_stored_run,
            )
            .optional()
            .map_err(Into::into)
        })?;

        stored.map(StoredRun::into_entry).transpose()
    }

    pub fn delete_run(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM recommendation_runs WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(CropwiseError::NotFound(format!("history entry {}", id)));
            }
            Ok(())
        })
    }

    pub fn count_runs(&self) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM recommendation_runs", [], |row| {
                row.get(0)
            })?)
        })
    }
}

// Feedback Queries

impl Database {
    /// Record a verdict on a saved run. The run must exist.
    pub fn save_feedback(&self, feedback: &Feedback) -> Result<i64> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM recommendation_runs WHERE id = ?1)",
                [feedback.run_id],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(CropwiseError::NotFound(format!(
                    "history entry {}",
                    feedback.run_id
                )));
            }

            conn.execute(
                r#"
                INSERT INTO feedbacks (run_id, helpful, notes, created_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    feedback.run_id,
                    feedback.helpful,
                    feedback.notes,
                    feedback.created_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Feedback on one run, oldest first.
    pub fn feedback_for(&self, run_id: i64) -> Result<Vec<Feedback>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM feedbacks WHERE run_id = ?1 ORDER BY created_at, id",
            )?;
            let feedback = stmt
                .query_map([run_id], row_to_feedback)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(feedback)
        })
    }
}

fn row_to_feedback(row: &Row) -> rusqlite::Result<Feedback> {
    let created_at_str: String = row.get("created_at")?;

    Ok(Feedback {
        id: Some(row.get("id")?),
        run_id: row.get("run_id")?,
        helpful: row.get("helpful")?,
        notes: row.get("notes")?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

struct StoredRun {
    id: i64,
    created_at: String,
    month: u32,
    scoring_policy: String,
    top_crop: String,
    features_json: String,
    recommendations_json: String,
    narrative: String,
}

impl StoredRun {
    fn into_entry(self) -> Result<HistoryEntry> {
        let features: FeatureVector = serde_json::from_str(&self.features_json)?;
        let recommendations: Vec<RecommendationRecord> =
            serde_json::from_str(&self.recommendations_json)?;

        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| {
                warn!(id = self.id, created_at = %self.created_at, "Bad timestamp in history row");
                Utc::now()
            });

        Ok(HistoryEntry {
            id: Some(self.id),
            created_at,
            month: self.month,
            scoring_policy: self.scoring_policy,
            top_crop: self.top_crop,
            features,
            recommendations,
            narrative: self.narrative,
        })
    }
}

fn row_to_stored_run(row: &Row) -> rusqlite::Result<StoredRun> {
    Ok(StoredRun {
        id: row.get("id")?,
        created_at: row.get("created_at")?,
        month: row.get("month")?,
        scoring_policy: row.get("scoring_policy")?,
        top_crop: row.get("top_crop")?,
        features_json: row.get("features_json")?,
        recommendations_json: row.get("recommendations_json")?,
        narrative: row.get("narrative")?,
    })
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
