use serde::{Deserialize, Serialize};

/// A named, colored study category. Sessions embed a copy of it at save time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// Display color as a hex string, e.g. `#8b5cf6`.
    pub color: String,
}

/// Input data for creating a subject
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInput {
    pub name: String,
    #[serde(default = "SubjectInput::default_color")]
    pub color: String,
}

impl SubjectInput {
    pub const DEFAULT_COLOR: &'static str = "#8b5cf6";

    fn default_color() -> String {
        Self::DEFAULT_COLOR.to_string()
    }

    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    /// Case-insensitive comparison used for the duplicate-name check.
    pub fn same_name_as(&self, subject: &Subject) -> bool {
        subject.name.trim().to_lowercase() == self.name.trim().to_lowercase()
    }
}
