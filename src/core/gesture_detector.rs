use crate::core::gesture_estimator::GestureEstimator;
use crate::models::gesture::{DetectedGesture, PoseError, PoseResult, VideoFrame};
use crate::platform::pose::HandPoseModel;
use std::sync::Arc;
use tokio::sync::OnceCell;

// ==============================================================================
// Model Handle
// ==============================================================================

/// Owned, lazily loaded hand pose model
///
/// Starts unloaded. `initialize` loads it once; concurrent callers wait on the
/// same load, later callers return immediately. A failed load leaves the
/// handle unloaded so the next call retries.
pub struct ModelHandle {
    model: Arc<dyn HandPoseModel>,
    loaded: OnceCell<()>,
}

impl ModelHandle {
    pub fn new(model: Arc<dyn HandPoseModel>) -> Self {
        Self {
            model,
            loaded: OnceCell::new(),
        }
    }

    pub async fn initialize(&self) -> PoseResult<()> {
        self.loaded
            .get_or_try_init(|| async {
                log::info!("Loading hand pose model: {}", self.model.model_info());
                self.model.load().await
            })
            .await?;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    /// The model, or `NotInitialized` if `initialize` has not succeeded yet
    pub fn get(&self) -> PoseResult<&Arc<dyn HandPoseModel>> {
        if self.is_loaded() {
            Ok(&self.model)
        } else {
            Err(PoseError::NotInitialized)
        }
    }

    pub fn model_info(&self) -> String {
        self.model.model_info()
    }
}

// ==============================================================================
// Gesture Detector
// ==============================================================================

pub struct GestureDetector {
    model: Arc<ModelHandle>,
    estimator: GestureEstimator,
    min_score: f32,
}

impl GestureDetector {
    pub fn new(model: Arc<ModelHandle>, estimator: GestureEstimator, min_score: f32) -> Self {
        Self {
            model,
            estimator,
            min_score,
        }
    }

    pub fn model(&self) -> &Arc<ModelHandle> {
        &self.model
    }

    pub async fn initialize(&self) -> PoseResult<()> {
        self.model.initialize().await
    }

    /// Detect the single most confident gesture in a frame
    ///
    /// Returns `Ok(None)` when no hand is found or no gesture clears the
    /// minimum score. Only the first detected hand is classified.
    pub async fn detect(&self, frame: &VideoFrame) -> PoseResult<Option<DetectedGesture>> {
        let model = self.model.get()?;

        let hands = model.estimate_hands(frame).await?;
        let hand = match hands.first() {
            Some(hand) => hand,
            None => return Ok(None),
        };

        let estimations = self.estimator.estimate(&hand.landmarks, self.min_score);
        Ok(Self::most_confident(estimations))
    }

    /// Highest confidence wins; on a tie the earlier candidate is kept
    fn most_confident(candidates: Vec<DetectedGesture>) -> Option<DetectedGesture> {
        candidates.into_iter().reduce(|best, next| {
            if next.confidence > best.confidence {
                next
            } else {
                best
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::gesture::{HandPose, Handedness, Keypoint3D, PoseError, PoseResult, VideoFrame};
    use crate::platform::pose::HandPoseModel;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Pose model returning a fixed hand (or none), counting loads
    pub struct StubHandPose {
        pub hand: Option<Vec<Keypoint3D>>,
        pub load_delay: Duration,
        pub fail_loads: AtomicUsize,
        pub loads: AtomicUsize,
        pub estimates: AtomicUsize,
    }

    impl StubHandPose {
        pub fn with_hand(landmarks: Vec<Keypoint3D>) -> Self {
            Self {
                hand: Some(landmarks),
                load_delay: Duration::ZERO,
                fail_loads: AtomicUsize::new(0),
                loads: AtomicUsize::new(0),
                estimates: AtomicUsize::new(0),
            }
        }

        pub fn without_hand() -> Self {
            Self {
                hand: None,
                load_delay: Duration::ZERO,
                fail_loads: AtomicUsize::new(0),
                loads: AtomicUsize::new(0),
                estimates: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HandPoseModel for StubHandPose {
        async fn load(&self) -> PoseResult<()> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if !self.load_delay.is_zero() {
                tokio::time::sleep(self.load_delay).await;
            }
            if self.fail_loads.load(Ordering::SeqCst) > 0 {
                self.fail_loads.fetch_sub(1, Ordering::SeqCst);
                return Err(PoseError::ModelLoadFailed("stub load failure".to_string()));
            }
            Ok(())
        }

        async fn estimate_hands(&self, _frame: &VideoFrame) -> PoseResult<Vec<HandPose>> {
            self.estimates.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .hand
                .iter()
                .map(|landmarks| HandPose {
                    handedness: Handedness::Right,
                    landmarks: landmarks.clone(),
                    confidence: 0.95,
                })
                .collect())
        }

        fn model_info(&self) -> String {
            "stub".to_string()
        }
    }

    pub fn blank_frame() -> VideoFrame {
        VideoFrame::new(2, 2, vec![0; 12], 0).unwrap()
    }
}
