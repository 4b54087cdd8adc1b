//! The persistence collaborator as seen by the store.
//!
//! Implementations own ids and durability; the store owns validation and the
//! in-memory view. [`crate::db::Database`] is the SQLite implementation.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{NewStudySession, StudySession, Subject, SubjectInput};

#[async_trait]
pub trait StudyRepository: Send + Sync {
    /// Persist a session and return it with its assigned id.
    async fn create_session(&self, session: NewStudySession) -> Result<StudySession>;

    async fn delete_session(&self, session_id: &str) -> Result<()>;

    async fn list_sessions(&self) -> Result<Vec<StudySession>>;

    async fn list_subjects(&self) -> Result<Vec<Subject>>;

    async fn create_subject(&self, input: SubjectInput) -> Result<Subject>;
}
