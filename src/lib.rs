pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod reports;
pub mod repository;
pub mod settings;
pub mod store;
pub mod timer;
pub mod utils;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::info;
use tokio_util::sync::CancellationToken;

use db::Database;
use events::BroadcastSink;
use settings::SettingsStore;
use store::StudyStore;
use timer::{TimerConfig, TimerController, VisibilityNotifier};

pub use error::{StudyError, StudyResult, ValidationError};

const DB_FILE: &str = "studytime.sqlite3";
const SETTINGS_FILE: &str = "settings.json";

/// Everything a host needs, wired together once at startup.
pub struct AppState {
    pub db: Database,
    pub store: Arc<StudyStore>,
    pub timer: TimerController,
    pub settings: SettingsStore,
    pub events: BroadcastSink,
    pub visibility: VisibilityNotifier,
    visibility_watch: CancellationToken,
}

impl AppState {
    /// Stop background work. The timer state itself is not persisted.
    pub async fn shutdown(&self) {
        self.visibility_watch.cancel();
        self.timer.reset_timer().await;
        info!("StudyTime shut down");
    }
}

/// `STUDYTIME_DATA_DIR`, or `<platform data dir>/studytime`.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("STUDYTIME_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|dir| dir.join("studytime"))
        .ok_or_else(|| anyhow!("could not determine a data directory; set STUDYTIME_DATA_DIR"))
}

/// Open the database and settings under `data_dir` and build the app.
/// Must run inside a Tokio runtime.
pub async fn bootstrap(data_dir: &Path) -> Result<AppState> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let database = Database::new(data_dir.join(DB_FILE))?;
    let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;
    let app_settings = settings.get();

    let store = Arc::new(
        StudyStore::load(Arc::new(database.clone()))
            .await
            .context("failed to load study data")?,
    );

    let events = BroadcastSink::new(64);
    let timer = TimerController::new(
        store.clone(),
        Arc::new(events.clone()),
        TimerConfig::from_settings(&app_settings),
    );
    timer
        .select_content_type(app_settings.default_content_type)
        .await;

    let visibility = VisibilityNotifier::new();
    let visibility_watch = timer.watch_visibility(visibility.subscribe());

    info!(
        "StudyTime ready: {} subjects, {} sessions",
        store.subjects().len(),
        store.sessions().len()
    );

    Ok(AppState {
        db: database,
        store,
        timer,
        settings,
        events,
        visibility,
        visibility_watch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;
    use crate::settings::AppSettings;
    use crate::timer::TimerStatus;

    #[tokio::test]
    async fn bootstrap_creates_files_and_applies_settings() {
        let dir = tempfile::tempdir().unwrap();
        SettingsStore::new(dir.path().join(SETTINGS_FILE))
            .unwrap()
            .update(AppSettings {
                default_content_type: ContentType::Exercise,
                ..AppSettings::default()
            })
            .unwrap();

        let app = bootstrap(dir.path()).await.unwrap();
        assert!(dir.path().join(DB_FILE).exists());
        assert_eq!(app.store.subjects().len(), 5);

        let state = app.timer.get_state().await;
        assert_eq!(state.content_type, ContentType::Exercise);
        assert_eq!(state.status, TimerStatus::Idle);

        app.shutdown().await;
    }
}
