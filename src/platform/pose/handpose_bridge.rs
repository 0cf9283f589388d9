// Hand pose model integration bridge
// Abstracts the landmark extractor so a native or remote backend can be plugged in

use crate::models::gesture::{HandPose, PoseResult, VideoFrame};
use async_trait::async_trait;

/// Hand landmark extractor
///
/// `load` brings the model into memory and may be slow; callers go through
/// [`crate::core::gesture_detector::ModelHandle`], which guarantees it runs
/// at most once successfully. `estimate_hands` may return an empty list.
#[async_trait]
pub trait HandPoseModel: Send + Sync {
    /// Load weights and prepare the model for inference
    async fn load(&self) -> PoseResult<()>;

    /// Extract one landmark set per detected hand
    async fn estimate_hands(&self, frame: &VideoFrame) -> PoseResult<Vec<HandPose>>;

    /// Human-readable backend description
    fn model_info(&self) -> String;
}

// ==============================================================================
// Dummy Implementation (no inference backend wired in)
// ==============================================================================

#[derive(Debug, Default)]
pub struct DummyHandPose;

#[async_trait]
impl HandPoseModel for DummyHandPose {
    async fn load(&self) -> PoseResult<()> {
        log::info!("Using dummy hand pose model (no inference)");
        Ok(())
    }

    async fn estimate_hands(&self, _frame: &VideoFrame) -> PoseResult<Vec<HandPose>> {
        Ok(vec![])
    }

    fn model_info(&self) -> String {
        "Dummy hand pose model (no ML inference)".to_string()
    }
}

pub type DefaultHandPose = DummyHandPose;
