use crate::core::gesture_detector::GestureDetector;
use crate::models::gesture::{PoseError, PoseResult};
use crate::platform::capture::FrameSource;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    LoadingModel,
    Active,
    /// The hand pose model failed to load; detection is unavailable
    DetectionDisabled,
}

// ==============================================================================
// Capture Session
// ==============================================================================

/// A live detection session accumulating gesture labels frame by frame
pub struct CaptureSession {
    detector: Arc<GestureDetector>,
    frame_interval: Duration,
    is_active: Arc<RwLock<bool>>,
    generation: Arc<AtomicU64>,
    state: Arc<RwLock<SessionState>>,
    labels: Arc<RwLock<Vec<String>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl CaptureSession {
    pub fn new(detector: Arc<GestureDetector>, frame_interval: Duration) -> Self {
        Self {
            detector,
            frame_interval,
            is_active: Arc::new(RwLock::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(RwLock::new(SessionState::Idle)),
            labels: Arc::new(RwLock::new(Vec::new())),
            task: Mutex::new(None),
        }
    }

    /// Load the model if needed and start the per-frame detection loop
    pub async fn start(&self, source: Arc<dyn FrameSource>) -> PoseResult<()> {
        // Reserve the session; the model loads without holding the flag
        let run = {
            let is_active = self.is_active.read().await;
            let mut state = self.state.write().await;
            if *is_active || *state == SessionState::LoadingModel {
                return Err(PoseError::AlreadyRunning);
            }
            *state = SessionState::LoadingModel;
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        // A stopped loop may still be finishing its last frame
        let previous = self.task.lock().await.take();
        if let Some(handle) = previous {
            if let Err(e) = handle.await {
                log::warn!("Previous capture loop ended abnormally: {}", e);
            }
        }

        if let Err(e) = self.detector.initialize().await {
            log::error!("Failed to load hand pose model: {}", e);
            let mut state = self.state.write().await;
            if self.generation.load(Ordering::SeqCst) == run {
                *state = SessionState::DetectionDisabled;
            }
            return Err(e);
        }

        {
            let mut is_active = self.is_active.write().await;
            let mut state = self.state.write().await;
            // Stopped (or superseded by a newer start) while the model was loading
            if *state != SessionState::LoadingModel || self.generation.load(Ordering::SeqCst) != run
            {
                log::info!("Capture session {} cancelled before it started", run);
                return Ok(());
            }
            *is_active = true;
            *state = SessionState::Active;
        }

        let detector = self.detector.clone();
        let is_active_flag = self.is_active.clone();
        let generation = self.generation.clone();
        let state = self.state.clone();
        let labels = self.labels.clone();
        let frame_interval = self.frame_interval;

        let handle = tokio::spawn(async move {
            Self::detection_loop(
                detector,
                source,
                frame_interval,
                RunFlag {
                    is_active: is_active_flag,
                    generation,
                    run,
                },
                state,
                labels,
            )
            .await;
        });
        *self.task.lock().await = Some(handle);

        log::info!("Started capture session {}", run);
        Ok(())
    }

    /// Stop scheduling detection; an in-flight frame is allowed to finish
    pub async fn stop(&self) {
        let mut is_active = self.is_active.write().await;
        if !*is_active {
            drop(is_active);
            // Cancels a start that is still loading the model
            let mut state = self.state.write().await;
            if *state == SessionState::LoadingModel {
                *state = SessionState::Idle;
            }
            return;
        }
        *is_active = false;
        drop(is_active);

        *self.state.write().await = SessionState::Idle;
        log::info!("Stopped capture session");
    }

    /// Stop and wait for the loop task to exit
    pub async fn stop_and_wait(&self) {
        self.stop().await;
        if let Some(handle) = self.task.lock().await.take() {
            if let Err(e) = handle.await {
                log::warn!("Capture loop ended abnormally: {}", e);
            }
        }
    }

    /// Wait for the loop to end on its own (e.g. the source ran dry)
    pub async fn wait(&self) {
        if let Some(handle) = self.task.lock().await.take() {
            if let Err(e) = handle.await {
                log::warn!("Capture loop ended abnormally: {}", e);
            }
        }
    }

    pub async fn is_active(&self) -> bool {
        *self.is_active.read().await
    }

    pub async fn state(&self) -> SessionState {
        *self.state.read().await
    }

    pub async fn labels(&self) -> Vec<String> {
        self.labels.read().await.clone()
    }

    /// Drain the accumulated labels, e.g. to submit them as one translation
    pub async fn take_labels(&self) -> Vec<String> {
        std::mem::take(&mut *self.labels.write().await)
    }

    async fn detection_loop(
        detector: Arc<GestureDetector>,
        source: Arc<dyn FrameSource>,
        frame_interval: Duration,
        flag: RunFlag,
        state: Arc<RwLock<SessionState>>,
        labels: Arc<RwLock<Vec<String>>>,
    ) {
        loop {
            if !flag.is_current().await {
                break;
            }

            // Wait one frame interval before pulling the next frame
            tokio::time::sleep(frame_interval).await;
            if !flag.is_current().await {
                break;
            }

            let frame = match source.next_frame().await {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    log::info!("Frame source exhausted, ending capture session");
                    break;
                }
                Err(e) => {
                    log::warn!("Skipping unreadable frame: {}", e);
                    continue;
                }
            };

            match detector.detect(&frame).await {
                Ok(Some(gesture)) => {
                    log::debug!(
                        "Detected gesture {} ({:.2})",
                        gesture.label,
                        gesture.confidence
                    );
                    labels.write().await.push(gesture.label);
                }
                Ok(None) => {}
                Err(e) => log::warn!("Error detecting gestures: {}", e),
            }
        }

        // Only the current run may end the session
        let mut active = flag.is_active.write().await;
        if *active && flag.generation.load(Ordering::SeqCst) == flag.run {
            *active = false;
            *state.write().await = SessionState::Idle;
        }
    }
}

/// Cancellation view of one run: live while the session is active and no newer run started
struct RunFlag {
    is_active: Arc<RwLock<bool>>,
    generation: Arc<AtomicU64>,
    run: u64,
}

impl RunFlag {
    async fn is_current(&self) -> bool {
        *self.is_active.read().await && self.generation.load(Ordering::SeqCst) == self.run
    }
}
