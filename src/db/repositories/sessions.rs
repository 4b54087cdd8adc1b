use anyhow::{Context, Result};
use chrono::Utc;
use log::debug;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, to_i64, to_u64},
};
use crate::models::{NewStudySession, StudySession, Subject};

const SESSION_COLUMNS: &str =
    "id, date, subject_id, subject_name, subject_color, content_type, duration_secs";

fn row_to_session(row: &Row) -> Result<StudySession> {
    let date: String = row.get("date")?;
    let content_type: String = row.get("content_type")?;
    let duration_secs: i64 = row.get("duration_secs")?;

    Ok(StudySession {
        id: row.get("id")?,
        date: parse_datetime(&date, "date")?,
        subject: Subject {
            id: row.get("subject_id")?,
            name: row.get("subject_name")?,
            color: row.get("subject_color")?,
        },
        content_type: content_type.parse()?,
        duration: to_u64(duration_secs, "duration_secs")?,
    })
}

impl Database {
    pub async fn insert_session(&self, session: NewStudySession) -> Result<StudySession> {
        let record = session.into_session(Uuid::new_v4().to_string());
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO sessions (id, date, subject_id, subject_name, subject_color, content_type, duration_secs, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.date.to_rfc3339(),
                    record.subject.id,
                    record.subject.name,
                    record.subject.color,
                    record.content_type.as_str(),
                    to_i64(record.duration)?,
                    Utc::now().to_rfc3339(),
                ],
            )
            .context("failed to insert session")?;
            Ok(record)
        })
        .await
    }

    /// Most recent first.
    pub async fn list_sessions(&self) -> Result<Vec<StudySession>> {
        self.execute(|conn| {
            let query = format!("SELECT {SESSION_COLUMNS} FROM sessions ORDER BY date DESC");
            let mut stmt = conn.prepare(&query)?;

            let mut rows = stmt.query([])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }

            Ok(sessions)
        })
        .await
    }

    /// Deleting an id that is already gone is not an error.
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn
                .execute("DELETE FROM sessions WHERE id = ?1", params![session_id])
                .context("failed to delete session")?;

            if rows_affected == 0 {
                debug!("delete_session: {session_id} was not stored");
            }
            Ok(())
        })
        .await
    }
}
