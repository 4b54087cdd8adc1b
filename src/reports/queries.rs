//! Filters and sums over the session log.
//!
//! Every function recomputes from the slice it is given; none of them fail.
//! Month arguments are zero based (`0` = January). Calendar components are
//! taken in the supplied timezone, so a session near midnight UTC can land
//! in a different day or month depending on where the user is.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::models::StudySession;

pub fn sessions_by_month<'a, I, Tz>(
    sessions: I,
    month: u32,
    year: i32,
    tz: &Tz,
) -> Vec<&'a StudySession>
where
    I: IntoIterator<Item = &'a StudySession>,
    Tz: TimeZone,
{
    sessions
        .into_iter()
        .filter(|session| {
            let local = session.date.with_timezone(tz);
            local.month0() == month && local.year() == year
        })
        .collect()
}

pub fn sessions_by_subject<'a, I>(sessions: I, subject_id: &str) -> Vec<&'a StudySession>
where
    I: IntoIterator<Item = &'a StudySession>,
{
    sessions
        .into_iter()
        .filter(|session| session.subject.id == subject_id)
        .collect()
}

/// Inclusive on both ends.
pub fn sessions_by_date_range<'a, I>(
    sessions: I,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<&'a StudySession>
where
    I: IntoIterator<Item = &'a StudySession>,
{
    sessions
        .into_iter()
        .filter(|session| start <= session.date && session.date <= end)
        .collect()
}

pub fn total_duration<'a, I>(sessions: I) -> u64
where
    I: IntoIterator<Item = &'a StudySession>,
{
    sessions.into_iter().map(|session| session.duration).sum()
}

pub fn total_duration_by_subject<'a, I>(sessions: I, subject_id: &str) -> u64
where
    I: IntoIterator<Item = &'a StudySession>,
{
    total_duration(sessions_by_subject(sessions, subject_id))
}

/// Distinct days of the month with at least one session.
pub fn study_days<'a, I, Tz>(sessions: I, month: u32, year: i32, tz: &Tz) -> usize
where
    I: IntoIterator<Item = &'a StudySession>,
    Tz: TimeZone,
{
    sessions_by_month(sessions, month, year, tz)
        .into_iter()
        .map(|session| session.date.with_timezone(tz).day())
        .collect::<HashSet<_>>()
        .len()
}


#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::fixtures::{at, session};
    use super::*;

    fn march_sessions() -> Vec<StudySession> {
        vec![
            session("a", "2024-03-05T09:00:00Z", "1", 600),
            session("b", "2024-03-05T13:00:00Z", "1", 900),
            session("c", "2024-03-05T20:00:00Z", "1", 300),
        ]
    }

    #[test]
    fn same_day_sessions_are_one_study_day() {
        let sessions = march_sessions();

        let in_march = sessions_by_month(&sessions, 2, 2024, &Utc);
        assert_eq!(in_march.len(), 3);
        assert_eq!(study_days(&sessions, 2, 2024, &Utc), 1);
        assert_eq!(total_duration_by_subject(&sessions, "1"), 1800);
    }

    #[test]
    fn month_filter_excludes_other_months_and_years() {
        let mut sessions = march_sessions();
        sessions.push(session("d", "2024-04-01T09:00:00Z", "1", 60));
        sessions.push(session("e", "2023-03-05T09:00:00Z", "1", 60));

        let ids: Vec<&str> = sessions_by_month(&sessions, 2, 2024, &Utc)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(sessions_by_month(&sessions, 12, 2024, &Utc).is_empty());
    }

    #[test]
    fn month_uses_local_calendar_components() {
        let sessions = vec![session("late", "2024-04-01T01:30:00Z", "1", 60)];
        let sao_paulo = FixedOffset::west_opt(3 * 3600).unwrap();

        assert_eq!(sessions_by_month(&sessions, 3, 2024, &Utc).len(), 1);
        assert_eq!(sessions_by_month(&sessions, 2, 2024, &sao_paulo).len(), 1);
        assert_eq!(study_days(&sessions, 2, 2024, &sao_paulo), 1);
    }

    #[test]
    fn distinct_days_are_counted_separately() {
        let mut sessions = march_sessions();
        sessions.push(session("d", "2024-03-06T09:00:00Z", "2", 60));
        sessions.push(session("e", "2024-03-31T23:00:00Z", "2", 60));
        assert_eq!(study_days(&sessions, 2, 2024, &Utc), 3);
    }

    #[test]
    fn subject_totals_cover_exactly_that_subject() {
        let mut sessions = march_sessions();
        sessions.push(session("d", "2024-03-06T09:00:00Z", "2", 45));

        assert_eq!(total_duration_by_subject(&sessions, "2"), 45);
        assert_eq!(total_duration_by_subject(&sessions, "missing"), 0);
        assert_eq!(sessions_by_subject(&sessions, "1").len(), 3);
    }

    #[test]
    fn date_range_is_inclusive() {
        let sessions = march_sessions();
        let hits = sessions_by_date_range(
            &sessions,
            at("2024-03-05T09:00:00Z"),
            at("2024-03-05T13:00:00Z"),
        );
        let ids: Vec<&str> = hits.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn empty_log_yields_empty_results() {
        let sessions: Vec<StudySession> = Vec::new();
        assert!(sessions_by_month(&sessions, 0, 2024, &Utc).is_empty());
        assert_eq!(study_days(&sessions, 0, 2024, &Utc), 0);
        assert_eq!(total_duration(&sessions), 0);
    }
}
