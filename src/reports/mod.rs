//! Derived report data: filters, per-day and per-subject totals, formatting.

pub mod charts;
pub mod format;
pub mod queries;

use chrono::TimeZone;
use serde::Serialize;

use crate::models::{StudySession, Subject};

pub use charts::{
    daily_totals, days_in_month, history, monthly_summary, subject_totals, DailyTotal,
    HistoryFilter, HistoryPeriod, MonthlySummary, SubjectTotal,
};
pub use format::{format_clock, format_duration, format_hours_minutes};
pub use queries::{
    sessions_by_date_range, sessions_by_month, sessions_by_subject, study_days, total_duration,
    total_duration_by_subject,
};

/// Everything the monthly report screen shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    /// Zero based.
    pub month: u32,
    pub year: i32,
    pub summary: MonthlySummary,
    pub daily: Vec<DailyTotal>,
    pub by_subject: Vec<SubjectTotal>,
}

impl MonthlyReport {
    pub fn build<Tz: TimeZone>(
        subjects: &[Subject],
        sessions: &[StudySession],
        month: u32,
        year: i32,
        tz: &Tz,
    ) -> Self {
        Self {
            month,
            year,
            summary: monthly_summary(sessions, month, year, tz),
            daily: daily_totals(sessions, month, year, tz),
            by_subject: subject_totals(subjects, sessions, month, year, tz),
        }
    }

    pub fn has_data(&self) -> bool {
        self.summary.session_count > 0
    }
}
