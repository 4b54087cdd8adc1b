use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{ContentType, NewStudySession, Subject};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

/// The study timer as a plain state machine. Every transition takes the
/// current time explicitly; nothing here reads a clock or touches a host API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub status: TimerStatus,
    pub subject: Option<Subject>,
    pub content_type: ContentType,
    /// Whole seconds as of the last sync.
    pub elapsed_secs: u64,
    /// Milliseconds accumulated by earlier running windows; combines with
    /// `running_anchor` to give the true elapsed time.
    #[serde(skip)]
    pub elapsed_ms_baseline: u64,
    #[serde(skip)]
    pub running_anchor: Option<DateTime<Utc>>,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn select_subject(&mut self, subject: Option<Subject>) {
        self.subject = subject;
    }

    pub fn select_content_type(&mut self, content_type: ContentType) {
        self.content_type = content_type;
    }

    /// Total elapsed milliseconds at `now`. A clock that went backwards
    /// contributes nothing rather than a negative span.
    pub fn current_elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        match (self.status, self.running_anchor) {
            (TimerStatus::Running, Some(anchor)) => {
                let running = (now - anchor).num_milliseconds().max(0) as u64;
                self.elapsed_ms_baseline.saturating_add(running)
            }
            _ => self.elapsed_ms_baseline,
        }
    }

    /// Partial seconds are truncated.
    pub fn current_elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        self.current_elapsed_ms(now) / 1000
    }

    /// Recompute `elapsed_secs` from the anchor. Safe to call any number of
    /// times; each call yields the same value for the same `now`.
    pub fn resync(&mut self, now: DateTime<Utc>) {
        self.elapsed_secs = self.current_elapsed_secs(now);
    }

    /// Start or resume. Already running is a no-op.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if self.subject.is_none() {
            return Err(ValidationError::NoSubjectSelected);
        }
        if self.is_running() {
            return Ok(());
        }

        self.status = TimerStatus::Running;
        self.running_anchor = Some(now);
        self.resync(now);
        Ok(())
    }

    /// Fold the current running window into the baseline. Only valid while
    /// running; otherwise nothing changes.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        if !self.is_running() {
            return;
        }

        self.elapsed_ms_baseline = self.current_elapsed_ms(now);
        self.running_anchor = None;
        self.status = TimerStatus::Paused;
        self.elapsed_secs = self.elapsed_ms_baseline / 1000;
    }

    /// Single start/pause button. Requires a subject either way.
    pub fn toggle(&mut self, now: DateTime<Utc>) -> Result<TimerStatus, ValidationError> {
        if self.subject.is_none() {
            return Err(ValidationError::NoSubjectSelected);
        }
        if self.is_running() {
            self.pause(now);
        } else {
            self.start(now)?;
        }
        Ok(self.status)
    }

    /// The session that committing at `now` would produce. Leaves the state
    /// untouched.
    pub fn draft_session(&self, now: DateTime<Utc>) -> Result<NewStudySession, ValidationError> {
        let subject = self
            .subject
            .clone()
            .ok_or(ValidationError::NoSubjectSelected)?;
        let duration = self.current_elapsed_secs(now);
        if duration == 0 {
            return Err(ValidationError::ZeroDuration);
        }

        Ok(NewStudySession {
            date: now,
            subject,
            content_type: self.content_type,
            duration,
        })
    }

    /// Emit the session and return to idle. On error the state is unchanged.
    pub fn commit(&mut self, now: DateTime<Utc>) -> Result<NewStudySession, ValidationError> {
        let session = self.draft_session(now)?;
        self.reset();
        Ok(session)
    }

    /// Back to idle with zero elapsed. Subject and content type stay selected.
    pub fn reset(&mut self) {
        self.status = TimerStatus::Idle;
        self.elapsed_secs = 0;
        self.elapsed_ms_baseline = 0;
        self.running_anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()
    }

    fn ms(value: i64) -> Duration {
        Duration::milliseconds(value)
    }

    fn math() -> Subject {
        Subject {
            id: "1".into(),
            name: "Matemática".into(),
            color: "#8b5cf6".into(),
        }
    }

    fn with_subject() -> TimerState {
        let mut state = TimerState::new();
        state.select_subject(Some(math()));
        state
    }

    #[test]
    fn start_requires_a_subject() {
        let mut state = TimerState::new();
        assert_eq!(state.start(t0()), Err(ValidationError::NoSubjectSelected));
        assert_eq!(state.status, TimerStatus::Idle);
    }

    #[test]
    fn elapsed_is_floored_from_milliseconds() {
        let mut state = with_subject();
        state.start(t0()).unwrap();
        assert_eq!(state.current_elapsed_secs(t0() + ms(999)), 0);
        assert_eq!(state.current_elapsed_secs(t0() + ms(1999)), 1);
    }

    #[test]
    fn pause_keeps_partial_seconds_for_the_next_window() {
        let mut state = with_subject();
        state.start(t0()).unwrap();
        state.pause(t0() + ms(1500));
        assert_eq!(state.elapsed_secs, 1);

        let resume = t0() + ms(60_000);
        state.start(resume).unwrap();
        assert_eq!(state.current_elapsed_secs(resume + ms(500)), 2);
    }

    #[test]
    fn paused_time_does_not_count() {
        let mut state = with_subject();
        state.start(t0()).unwrap();
        state.pause(t0() + ms(10_000));
        assert_eq!(state.current_elapsed_secs(t0() + ms(500_000)), 10);
    }

    #[test]
    fn resync_catches_up_after_missed_ticks() {
        let mut state = with_subject();
        state.start(t0()).unwrap();
        state.resync(t0() + ms(3_600_000));
        assert_eq!(state.elapsed_secs, 3600);
        state.resync(t0() + ms(3_600_000));
        assert_eq!(state.elapsed_secs, 3600);
    }

    #[test]
    fn start_while_running_keeps_the_anchor() {
        let mut state = with_subject();
        state.start(t0()).unwrap();
        state.start(t0() + ms(5000)).unwrap();
        assert_eq!(state.running_anchor, Some(t0()));
    }

    #[test]
    fn clock_going_backwards_counts_as_zero() {
        let mut state = with_subject();
        state.start(t0()).unwrap();
        assert_eq!(state.current_elapsed_secs(t0() - ms(5000)), 0);
    }

    #[test]
    fn toggle_alternates_and_validates() {
        let mut state = TimerState::new();
        assert!(state.toggle(t0()).is_err());

        state.select_subject(Some(math()));
        assert_eq!(state.toggle(t0()), Ok(TimerStatus::Running));
        assert_eq!(state.toggle(t0() + ms(2000)), Ok(TimerStatus::Paused));
        assert_eq!(state.elapsed_secs, 2);
    }

    #[test]
    fn commit_with_zero_elapsed_fails_and_changes_nothing() {
        let mut state = with_subject();
        assert_eq!(state.commit(t0()), Err(ValidationError::ZeroDuration));

        state.start(t0()).unwrap();
        assert_eq!(state.commit(t0() + ms(999)), Err(ValidationError::ZeroDuration));
        assert!(state.is_running());
    }

    #[test]
    fn commit_without_subject_fails() {
        let mut state = TimerState::new();
        assert_eq!(state.commit(t0()), Err(ValidationError::NoSubjectSelected));
    }

    #[test]
    fn ninety_seconds_with_one_resync() {
        let mut state = with_subject();
        state.select_content_type(ContentType::Exercise);
        state.start(t0()).unwrap();
        state.resync(t0() + ms(45_000));
        let now = t0() + ms(90_000);

        let session = state.commit(now).unwrap();
        assert_eq!(session.duration, 90);
        assert_eq!(session.date, now);
        assert_eq!(session.subject, math());
        assert_eq!(session.content_type, ContentType::Exercise);

        assert_eq!(state.status, TimerStatus::Idle);
        assert_eq!(state.current_elapsed_secs(now + ms(10_000)), 0);
        assert_eq!(state.subject, Some(math()));
    }

    #[derive(Debug, Clone)]
    enum Step {
        Start,
        Pause,
        Resync,
        Wait(i64),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            Just(Step::Start),
            Just(Step::Pause),
            Just(Step::Resync),
            (0i64..120_000).prop_map(Step::Wait),
        ]
    }

    proptest! {
        #[test]
        fn elapsed_matches_total_running_wall_clock(steps in prop::collection::vec(step(), 0..60)) {
            let mut state = with_subject();
            let mut now = t0();
            let mut running_ms: i64 = 0;

            for step in steps {
                match step {
                    Step::Start => state.start(now).unwrap(),
                    Step::Pause => state.pause(now),
                    Step::Resync => state.resync(now),
                    Step::Wait(delta) => {
                        if state.is_running() {
                            running_ms += delta;
                        }
                        now += ms(delta);
                    }
                }
                prop_assert_eq!(state.current_elapsed_secs(now), (running_ms / 1000) as u64);
            }
        }
    }
}
