use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::{params, ErrorCode, Row};
use uuid::Uuid;

use crate::db::connection::Database;
use crate::models::{Subject, SubjectInput};

fn row_to_subject(row: &Row) -> Result<Subject> {
    Ok(Subject {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
    })
}

impl Database {
    /// Create a new subject.
    /// Fails when a subject with the same name (ignoring case) exists.
    pub async fn create_subject(&self, input: SubjectInput) -> Result<Subject> {
        self.execute(move |conn| {
            let subject = Subject {
                id: Uuid::new_v4().to_string(),
                name: input.name.trim().to_string(),
                color: input.color,
            };

            let inserted = conn.execute(
                "INSERT INTO subjects (id, name, color, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    subject.id,
                    subject.name,
                    subject.color,
                    Utc::now().to_rfc3339(),
                ],
            );

            match inserted {
                Ok(_) => Ok(subject),
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Err(anyhow!("subject '{}' already exists", subject.name))
                }
                Err(err) => Err(anyhow::Error::new(err).context("failed to insert subject")),
            }
        })
        .await
    }

    /// All subjects in creation order.
    pub async fn get_subjects(&self) -> Result<Vec<Subject>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, color FROM subjects ORDER BY created_at ASC, rowid ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut subjects = Vec::new();
            while let Some(row) = rows.next()? {
                subjects.push(row_to_subject(row)?);
            }

            Ok(subjects)
        })
        .await
    }
}
