//! In-memory view of the user's subjects and sessions.
//!
//! The store is created once and shared (`Arc<StudyStore>`) with whatever
//! needs it. Mutations go to the repository first; the local lists change
//! only after the repository confirms.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, TimeZone, Utc};
use log::error;

use crate::error::{StudyError, StudyResult, ValidationError};
use crate::models::{ManualSessionInput, NewStudySession, StudySession, Subject, SubjectInput};
use crate::reports::{self, HistoryFilter, MonthlyReport};
use crate::repository::StudyRepository;
use crate::{log_debug, log_info};

const ENABLE_LOGS: bool = true;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

pub struct StudyStore {
    repo: Arc<dyn StudyRepository>,
    sessions: RwLock<Vec<StudySession>>,
    subjects: RwLock<Vec<Subject>>,
}

impl StudyStore {
    /// Load subjects and sessions from the repository.
    pub async fn load(repo: Arc<dyn StudyRepository>) -> StudyResult<Self> {
        let store = Self {
            repo,
            sessions: RwLock::new(Vec::new()),
            subjects: RwLock::new(Vec::new()),
        };
        store.refresh().await?;
        Ok(store)
    }

    /// Replace the local lists with what the repository currently holds.
    pub async fn refresh(&self) -> StudyResult<()> {
        let subjects = self.repo.list_subjects().await.map_err(|err| {
            error!("Failed to list subjects: {err:#}");
            StudyError::from(err)
        })?;
        let sessions = self.repo.list_sessions().await.map_err(|err| {
            error!("Failed to list sessions: {err:#}");
            StudyError::from(err)
        })?;

        log_debug!(
            "Loaded {} subjects and {} sessions",
            subjects.len(),
            sessions.len()
        );

        *write(&self.subjects) = subjects;
        *write(&self.sessions) = sessions;
        Ok(())
    }

    pub fn sessions(&self) -> Vec<StudySession> {
        read(&self.sessions).clone()
    }

    pub fn subjects(&self) -> Vec<Subject> {
        read(&self.subjects).clone()
    }

    pub fn subject(&self, subject_id: &str) -> Option<Subject> {
        read(&self.subjects)
            .iter()
            .find(|subject| subject.id == subject_id)
            .cloned()
    }

    /// Persist a session produced by the timer.
    pub async fn add_session(&self, session: NewStudySession) -> StudyResult<StudySession> {
        if session.duration == 0 {
            return Err(ValidationError::ZeroDuration.into());
        }

        let saved = self.repo.create_session(session).await.map_err(|err| {
            error!("Failed to save session: {err:#}");
            StudyError::from(err)
        })?;

        log_info!(
            "Saved session {} ({} - {})",
            saved.id,
            saved.subject.name,
            reports::format_duration(saved.duration)
        );

        write(&self.sessions).push(saved.clone());
        Ok(saved)
    }

    /// Persist a hand-entered session. The subject is resolved from the
    /// current subject list and embedded as a snapshot.
    pub async fn add_manual_session(&self, input: ManualSessionInput) -> StudyResult<StudySession> {
        let subject = self
            .subject(&input.subject_id)
            .ok_or_else(|| StudyError::UnknownSubject(input.subject_id.clone()))?;

        self.add_session(NewStudySession {
            date: input.date,
            subject,
            content_type: input.content_type,
            duration: input.duration_secs(),
        })
        .await
    }

    pub async fn delete_session(&self, session_id: &str) -> StudyResult<()> {
        self.repo.delete_session(session_id).await.map_err(|err| {
            error!("Failed to delete session {session_id}: {err:#}");
            StudyError::from(err)
        })?;

        write(&self.sessions).retain(|session| session.id != session_id);
        log_info!("Deleted session {session_id}");
        Ok(())
    }

    /// Duplicate names (ignoring case and surrounding whitespace) are
    /// rejected before the repository is called.
    pub async fn create_subject(&self, input: SubjectInput) -> StudyResult<Subject> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptySubjectName.into());
        }

        if read(&self.subjects)
            .iter()
            .any(|subject| input.same_name_as(subject))
        {
            return Err(StudyError::DuplicateName(name.to_string()));
        }

        let subject = self.repo.create_subject(input).await.map_err(|err| {
            error!("Failed to create subject: {err:#}");
            StudyError::from(err)
        })?;

        log_info!("Created subject {} ({})", subject.name, subject.id);
        write(&self.subjects).push(subject.clone());
        Ok(subject)
    }

    pub fn sessions_by_month<Tz: TimeZone>(
        &self,
        month: u32,
        year: i32,
        tz: &Tz,
    ) -> Vec<StudySession> {
        let sessions = read(&self.sessions);
        reports::sessions_by_month(sessions.iter(), month, year, tz)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn sessions_by_subject(&self, subject_id: &str) -> Vec<StudySession> {
        let sessions = read(&self.sessions);
        reports::sessions_by_subject(sessions.iter(), subject_id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn sessions_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<StudySession> {
        let sessions = read(&self.sessions);
        reports::sessions_by_date_range(sessions.iter(), start, end)
            .into_iter()
            .cloned()
            .collect()
    }

    /// All-time total, not scoped to a month.
    pub fn total_duration_by_subject(&self, subject_id: &str) -> u64 {
        reports::total_duration_by_subject(read(&self.sessions).iter(), subject_id)
    }

    pub fn study_days<Tz: TimeZone>(&self, month: u32, year: i32, tz: &Tz) -> usize {
        reports::study_days(read(&self.sessions).iter(), month, year, tz)
    }

    pub fn monthly_report<Tz: TimeZone>(&self, month: u32, year: i32, tz: &Tz) -> MonthlyReport {
        let subjects = read(&self.subjects);
        let sessions = read(&self.sessions);
        MonthlyReport::build(&subjects, &sessions, month, year, tz)
    }

    pub fn history(&self, filter: &HistoryFilter, now: DateTime<Utc>) -> Vec<StudySession> {
        let sessions = read(&self.sessions);
        reports::history(&sessions, filter, now)
            .into_iter()
            .cloned()
            .collect()
    }
}
