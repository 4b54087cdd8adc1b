use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{StudyError, StudyResult},
    events::{TimerEvent, TimerEventSink},
    log_debug, log_info,
    models::{ContentType, StudySession},
    reports::format_clock,
    settings::AppSettings,
    store::StudyStore,
};

use super::{Clock, SystemClock, TimerState, TimerStatus, Visibility};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Serialize, Clone)]
pub struct TimerSnapshot {
    pub state: TimerState,
    /// `HH:MM:SS` of `state.elapsed_secs`.
    pub display: String,
}

impl TimerSnapshot {
    pub fn from_state(state: TimerState) -> Self {
        Self {
            display: format_clock(state.elapsed_secs),
            state,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    pub tick_interval: Duration,
    pub heartbeat_every_ticks: u32,
}

impl TimerConfig {
    pub fn from_settings(settings: &AppSettings) -> Self {
        let debug_mode = std::env::var("STUDYTIME_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            tick_interval: Duration::from_millis(settings.tick_interval_ms.max(1)),
            heartbeat_every_ticks: if debug_mode {
                1
            } else {
                settings.heartbeat_every_ticks.max(1)
            },
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::from_settings(&AppSettings::default())
    }
}

/// Owns the single active timer. Transitions happen under the state lock,
/// persistence happens outside it. Saves are serialized by `saving`.
#[derive(Clone)]
pub struct TimerController {
    state: Arc<Mutex<TimerState>>,
    saving: Arc<Mutex<()>>,
    store: Arc<StudyStore>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn TimerEventSink>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    config: TimerConfig,
}

impl TimerController {
    pub fn new(store: Arc<StudyStore>, events: Arc<dyn TimerEventSink>, config: TimerConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(TimerState::new())),
            saving: Arc::new(Mutex::new(())),
            store,
            clock: Arc::new(SystemClock),
            events,
            ticker: Arc::new(Mutex::new(None)),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn get_state(&self) -> TimerState {
        let mut guard = self.state.lock().await;
        guard.resync(self.clock.now());
        guard.clone()
    }

    pub async fn get_snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from_state(self.get_state().await)
    }

    pub async fn elapsed_secs(&self) -> u64 {
        self.state.lock().await.current_elapsed_secs(self.clock.now())
    }

    /// `None` clears the selection.
    pub async fn select_subject(&self, subject_id: Option<&str>) -> StudyResult<TimerState> {
        let subject = subject_id
            .map(|id| {
                self.store
                    .subject(id)
                    .ok_or_else(|| StudyError::UnknownSubject(id.to_string()))
            })
            .transpose()?;

        self.state.lock().await.select_subject(subject);
        self.emit_state_changed().await;
        Ok(self.get_state().await)
    }

    pub async fn select_content_type(&self, content_type: ContentType) -> TimerState {
        self.state.lock().await.select_content_type(content_type);
        self.emit_state_changed().await;
        self.get_state().await
    }

    /// Start or resume. Passing a subject id selects it first.
    pub async fn start_timer(&self, subject_id: Option<&str>) -> StudyResult<TimerState> {
        if let Some(id) = subject_id {
            self.select_subject(Some(id)).await?;
        }

        self.state.lock().await.start(self.clock.now())?;
        self.spawn_ticker().await;
        log_info!("Timer running");

        self.emit_state_changed().await;
        Ok(self.get_state().await)
    }

    pub async fn pause_timer(&self) -> TimerState {
        self.state.lock().await.pause(self.clock.now());
        self.cancel_ticker().await;
        log_info!("Timer paused");

        self.emit_state_changed().await;
        self.get_state().await
    }

    pub async fn toggle_timer(&self) -> StudyResult<TimerState> {
        let status = self.state.lock().await.toggle(self.clock.now())?;
        match status {
            TimerStatus::Running => self.spawn_ticker().await,
            _ => self.cancel_ticker().await,
        }

        self.emit_state_changed().await;
        Ok(self.get_state().await)
    }

    /// Recompute elapsed time from the wall clock. Called when the host comes
    /// back to the foreground, since ticks may not have fired meanwhile.
    pub async fn resync(&self) -> TimerState {
        let state = {
            let mut guard = self.state.lock().await;
            guard.resync(self.clock.now());
            guard.clone()
        };
        log_debug!("Timer resynced at {}s", state.elapsed_secs);

        self.events
            .emit(TimerEvent::StateChanged(TimerSnapshot::from_state(state.clone())));
        state
    }

    /// Save the current timer as a session. The timer resets only once the
    /// store confirms; on failure it keeps running (or stays paused).
    ///
    /// Overlapping calls run one at a time: a save that waited behind another
    /// drafts from the already reset timer and fails with `ZeroDuration`.
    pub async fn save_session(&self) -> StudyResult<StudySession> {
        let saving = self.saving.lock().await;

        let draft = self.state.lock().await.draft_session(self.clock.now())?;

        let saved = self.store.add_session(draft).await?;

        self.state.lock().await.reset();
        self.cancel_ticker().await;
        drop(saving);

        self.emit_state_changed().await;
        self.events.emit(TimerEvent::SessionSaved(saved.clone()));
        Ok(saved)
    }

    pub async fn reset_timer(&self) -> TimerState {
        self.state.lock().await.reset();
        self.cancel_ticker().await;

        self.emit_state_changed().await;
        self.get_state().await
    }

    /// Resync whenever `visibility` transitions to foreground. Cancel the
    /// returned token to detach.
    pub fn watch_visibility(&self, mut visibility: watch::Receiver<Visibility>) -> CancellationToken {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let controller = self.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    changed = visibility.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let current = *visibility.borrow_and_update();
                        if current == Visibility::Foreground {
                            controller.resync().await;
                        }
                    }
                }
            }
            log_debug!("Visibility watcher stopped");
        });

        token
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let clock = self.clock.clone();
        let events = self.events.clone();
        let TimerConfig {
            tick_interval,
            heartbeat_every_ticks,
        } = self.config;
        let heartbeat_every_ticks = heartbeat_every_ticks.max(1);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut ticks: u32 = 0;
            loop {
                interval.tick().await;

                let snapshot = {
                    let mut guard = state.lock().await;
                    if guard.status != TimerStatus::Running {
                        break;
                    }
                    guard.resync(clock.now());
                    TimerSnapshot::from_state(guard.clone())
                };

                ticks = ticks.wrapping_add(1);
                if ticks % heartbeat_every_ticks == 0 {
                    log_debug!("Timer heartbeat at {}", snapshot.display);
                    events.emit(TimerEvent::Heartbeat(snapshot.clone()));
                }
                events.emit(TimerEvent::Tick(snapshot));
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn emit_state_changed(&self) {
        let snapshot = self.get_snapshot().await;
        self.events.emit(TimerEvent::StateChanged(snapshot));
    }
}
