use std::cmp::Reverse;

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{StudySession, Subject};

use super::queries::{sessions_by_month, study_days, total_duration, total_duration_by_subject};

/// Seconds studied on one day of the month (bar chart input).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    pub day: u32,
    pub seconds: u64,
}

impl DailyTotal {
    pub fn hours(&self) -> f64 {
        self.seconds as f64 / 3600.0
    }
}

/// Seconds studied for one subject within a month (pie chart input).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubjectTotal {
    pub subject: Subject,
    pub seconds: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub total_seconds: u64,
    pub study_days: usize,
    pub session_count: usize,
}

/// Number of days in a zero-based month; `0` for an invalid month.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    let Some(first) = month
        .checked_add(1)
        .and_then(|month1| NaiveDate::from_ymd_opt(year, month1, 1))
    else {
        return 0;
    };
    first
        .checked_add_months(Months::new(1))
        .map(|next| next.signed_duration_since(first).num_days() as u32)
        .unwrap_or(0)
}

/// One entry per day `1..=days_in_month`, including days with no study.
pub fn daily_totals<Tz: TimeZone>(
    sessions: &[StudySession],
    month: u32,
    year: i32,
    tz: &Tz,
) -> Vec<DailyTotal> {
    let in_month = sessions_by_month(sessions, month, year, tz);

    (1..=days_in_month(month, year))
        .map(|day| DailyTotal {
            day,
            seconds: total_duration(
                in_month
                    .iter()
                    .copied()
                    .filter(|session| session.date.with_timezone(tz).day() == day),
            ),
        })
        .collect()
}

/// Month-scoped totals in subject-list order. Subjects without study time in
/// the month are left out.
pub fn subject_totals<Tz: TimeZone>(
    subjects: &[Subject],
    sessions: &[StudySession],
    month: u32,
    year: i32,
    tz: &Tz,
) -> Vec<SubjectTotal> {
    let in_month = sessions_by_month(sessions, month, year, tz);

    subjects
        .iter()
        .map(|subject| SubjectTotal {
            subject: subject.clone(),
            seconds: total_duration_by_subject(in_month.iter().copied(), &subject.id),
        })
        .filter(|total| total.seconds > 0)
        .collect()
}

pub fn monthly_summary<Tz: TimeZone>(
    sessions: &[StudySession],
    month: u32,
    year: i32,
    tz: &Tz,
) -> MonthlySummary {
    let in_month = sessions_by_month(sessions, month, year, tz);
    MonthlySummary {
        total_seconds: total_duration(in_month.iter().copied()),
        study_days: study_days(in_month.iter().copied(), month, year, tz),
        session_count: in_month.len(),
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HistoryPeriod {
    Week,
    #[default]
    Month,
    All,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFilter {
    /// `None` keeps every subject.
    pub subject_id: Option<String>,
    #[serde(default)]
    pub period: HistoryPeriod,
}

/// Sessions for the history table, most recent first.
pub fn history<'a>(
    sessions: &'a [StudySession],
    filter: &HistoryFilter,
    now: DateTime<Utc>,
) -> Vec<&'a StudySession> {
    let since = match filter.period {
        HistoryPeriod::Week => Some(now - chrono::Duration::days(7)),
        HistoryPeriod::Month => now.checked_sub_months(Months::new(1)),
        HistoryPeriod::All => None,
    };

    let mut matching: Vec<&StudySession> = sessions
        .iter()
        .filter(|session| {
            filter
                .subject_id
                .as_deref()
                .map_or(true, |id| session.subject.id == id)
        })
        .filter(|session| since.map_or(true, |since| session.date >= since))
        .collect();

    matching.sort_by_key(|session| Reverse(session.date));
    matching
}
