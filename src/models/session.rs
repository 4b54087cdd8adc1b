use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Subject;

/// The activity performed during a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    #[serde(rename = "video")]
    Video,
    #[default]
    #[serde(rename = "leitura")]
    Reading,
    #[serde(rename = "exercício")]
    Exercise,
    #[serde(rename = "revisão")]
    Review,
    #[serde(rename = "outro")]
    Other,
}

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        ContentType::Video,
        ContentType::Reading,
        ContentType::Exercise,
        ContentType::Review,
        ContentType::Other,
    ];

    /// Stored tag, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Reading => "leitura",
            ContentType::Exercise => "exercício",
            ContentType::Review => "revisão",
            ContentType::Other => "outro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Video => "Vídeo",
            ContentType::Reading => "Leitura",
            ContentType::Exercise => "Exercício",
            ContentType::Review => "Revisão",
            ContentType::Other => "Outro",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContentType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        ContentType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| anyhow!("unknown content type '{value}'"))
    }
}

/// One recorded block of study time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub date: DateTime<Utc>,
    /// Snapshot of the subject when the session was saved.
    pub subject: Subject,
    pub content_type: ContentType,
    /// Whole seconds.
    pub duration: u64,
}

/// A session that has not been assigned an id by the repository yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewStudySession {
    pub date: DateTime<Utc>,
    pub subject: Subject,
    pub content_type: ContentType,
    pub duration: u64,
}

impl NewStudySession {
    pub fn into_session(self, id: String) -> StudySession {
        StudySession {
            id,
            date: self.date,
            subject: self.subject,
            content_type: self.content_type,
            duration: self.duration,
        }
    }
}

/// Hand-entered session from the history screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualSessionInput {
    pub subject_id: String,
    #[serde(default)]
    pub content_type: ContentType,
    pub date: DateTime<Utc>,
    pub hours: u32,
    pub minutes: u32,
}

impl ManualSessionInput {
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60
    }
}
