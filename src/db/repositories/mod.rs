mod sessions;
mod subjects;

use anyhow::Result;
use async_trait::async_trait;

use crate::db::connection::Database;
use crate::models::{NewStudySession, StudySession, Subject, SubjectInput};
use crate::repository::StudyRepository;

#[async_trait]
impl StudyRepository for Database {
    async fn create_session(&self, session: NewStudySession) -> Result<StudySession> {
        self.insert_session(session).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        Database::delete_session(self, session_id).await
    }

    async fn list_sessions(&self) -> Result<Vec<StudySession>> {
        Database::list_sessions(self).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.get_subjects().await
    }

    async fn create_subject(&self, input: SubjectInput) -> Result<Subject> {
        Database::create_subject(self, input).await
    }
}
