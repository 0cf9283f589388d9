pub mod core;
pub mod models;
pub mod platform;

use crate::core::auth::LocalAuth;
use crate::core::capture_session::{CaptureSession, SessionState};
use crate::core::config::Config;
use crate::core::dashboard::{Dashboard, DashboardView};
use crate::core::database::Database;
use crate::core::gesture_detector::{GestureDetector, ModelHandle};
use crate::core::gesture_estimator::GestureEstimator;
use crate::core::translation_pipeline::TranslationPipeline;
use crate::core::translation_store::{SqliteTranslationStore, TranslationStore};
use crate::models::auth::User;
use crate::models::translation::{
    StatusFilter, TranslationInput, TranslationRecord, TranslationStats,
};
use crate::platform::capture::FrameSource;
use crate::platform::pose::{DefaultHandPose, HandPoseModel};
use serde::Serialize;
use std::sync::Arc;

// Application state
pub struct AppState {
    pub config: Config,
    pub auth: Arc<LocalAuth>,
    pub store: Arc<dyn TranslationStore>,
    pub pipeline: TranslationPipeline,
    pub capture: CaptureSession,
}

impl AppState {
    /// Open the configured database and wire every component
    pub async fn init(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::init(&config.database_path).await?;
        Ok(Self::with_database(config, db, Arc::new(DefaultHandPose::default())))
    }

    /// Same wiring over a throwaway in-memory database
    pub async fn in_memory(
        config: Config,
        pose_model: Arc<dyn HandPoseModel>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::in_memory().await?;
        Ok(Self::with_database(config, db, pose_model))
    }

    fn with_database(config: Config, db: Database, pose_model: Arc<dyn HandPoseModel>) -> Self {
        let store: Arc<dyn TranslationStore> = Arc::new(SqliteTranslationStore::new(Arc::new(db)));
        let pipeline = TranslationPipeline::new(
            store.clone(),
            Arc::new(config.translator()),
            config.retry_policy(),
        );

        let detection = config.detection();
        let detector = GestureDetector::new(
            Arc::new(ModelHandle::new(pose_model)),
            GestureEstimator::with_sign_gestures(),
            detection.min_gesture_score,
        );
        let capture = CaptureSession::new(Arc::new(detector), detection.frame_interval());

        Self {
            config,
            auth: Arc::new(LocalAuth::new()),
            store,
            pipeline,
            capture,
        }
    }
}

/// Dashboard payload returned to the caller
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// Set when nobody is signed in; the caller should navigate there
    pub redirect: Option<String>,
    pub user: Option<User>,
    pub stats: TranslationStats,
    pub records: Vec<TranslationRecord>,
}

async fn run_translation(
    input: TranslationInput,
    state: &AppState,
) -> Result<TranslationRecord, String> {
    let handle = state
        .pipeline
        .submit(input)
        .await
        .map_err(|e| format!("Failed to create translation: {}", e))?;

    state
        .pipeline
        .process(&handle)
        .await
        .map_err(|e| format!("Failed to process translation: {}", e))?;

    state
        .store
        .get(&handle.id)
        .await
        .map_err(|e| format!("Failed to read translation: {}", e))?
        .ok_or_else(|| format!("Translation {} disappeared", handle.id))
}

// Translation commands
pub async fn translate_text(text: String, state: &AppState) -> Result<TranslationRecord, String> {
    run_translation(TranslationInput::text(text), state).await
}

pub async fn upload_video(
    file_name: String,
    state: &AppState,
) -> Result<TranslationRecord, String> {
    run_translation(TranslationInput::video(file_name), state).await
}

// Live capture commands
pub async fn start_webcam(
    source: Arc<dyn FrameSource>,
    state: &AppState,
) -> Result<SessionState, String> {
    state
        .capture
        .start(source)
        .await
        .map_err(|e| format!("Failed to start gesture detection: {}", e))?;

    Ok(state.capture.state().await)
}

pub async fn stop_webcam(state: &AppState) -> Result<Vec<String>, String> {
    state.capture.stop_and_wait().await;
    Ok(state.capture.labels().await)
}

pub async fn get_detected_gestures(state: &AppState) -> Result<Vec<String>, String> {
    Ok(state.capture.labels().await)
}

/// Turn the labels collected so far into one translation record
pub async fn submit_detected_gestures(state: &AppState) -> Result<TranslationRecord, String> {
    let labels = state.capture.take_labels().await;
    run_translation(TranslationInput::gestures(labels), state).await
}

// Dashboard and auth commands
pub async fn sign_in(email: String, state: &AppState) -> Result<User, String> {
    state
        .auth
        .sign_in(&email)
        .await
        .map_err(|e| format!("Failed to sign in: {}", e))
}

pub async fn sign_out(state: &AppState) -> Result<String, String> {
    let view = Dashboard::open(state.auth.clone(), state.store.clone())
        .await
        .map_err(|e| format!("Failed to check session: {}", e))?;

    let route = match view {
        DashboardView::Ready(dashboard) => dashboard
            .sign_out()
            .await
            .map_err(|e| format!("Failed to sign out: {}", e))?,
        DashboardView::Redirect(route) => route,
    };

    Ok(route.path().to_string())
}

pub async fn get_dashboard(
    filter: String,
    state: &AppState,
) -> Result<DashboardSnapshot, String> {
    let filter = StatusFilter::from_string(&filter).map_err(|e| format!("Invalid filter: {}", e))?;

    let view = Dashboard::open(state.auth.clone(), state.store.clone())
        .await
        .map_err(|e| format!("Failed to check session: {}", e))?;

    Ok(match view {
        DashboardView::Redirect(route) => DashboardSnapshot {
            redirect: Some(route.path().to_string()),
            user: None,
            stats: TranslationStats::default(),
            records: Vec::new(),
        },
        DashboardView::Ready(dashboard) => DashboardSnapshot {
            redirect: None,
            user: Some(dashboard.user().clone()),
            stats: dashboard.stats(),
            records: dashboard.records(filter).into_iter().cloned().collect(),
        },
    })
}
