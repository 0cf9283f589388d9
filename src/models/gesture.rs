// Data models for hand tracking and gesture detection

use serde::{Deserialize, Serialize};

// ==============================================================================
// Video Frame
// ==============================================================================

/// One decoded video frame (RGB8, row-major)
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub timestamp: i64,
}

impl VideoFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>, timestamp: i64) -> PoseResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(PoseError::InvalidFrame(format!(
                "expected {} bytes for {}x{} RGB8, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            data,
            timestamp,
        })
    }

    /// Decode an encoded still (PNG, JPEG, ...) into an RGB8 frame
    pub fn decode(bytes: &[u8], timestamp: i64) -> PoseResult<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| PoseError::InvalidFrame(e.to_string()))?
            .to_rgb8();
        let (width, height) = image.dimensions();

        Ok(Self {
            width,
            height,
            data: image.into_raw(),
            timestamp,
        })
    }
}

// ==============================================================================
// Hand Tracking (21 keypoints per hand)
// ==============================================================================

/// Hand pose tracking result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandPose {
    pub handedness: Handedness,
    pub landmarks: Vec<Keypoint3D>, // 21 hand landmarks
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    Right,
}

/// Hand landmark indices (21 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

pub const HAND_LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The five digits, each described by three joints from base to tip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub fn all() -> [Finger; 5] {
        [
            Finger::Thumb,
            Finger::Index,
            Finger::Middle,
            Finger::Ring,
            Finger::Pinky,
        ]
    }

    /// (base, middle joint, tip) used to measure how straight the finger is
    pub fn joints(self) -> (HandLandmark, HandLandmark, HandLandmark) {
        match self {
            Finger::Thumb => (HandLandmark::ThumbMcp, HandLandmark::ThumbIp, HandLandmark::ThumbTip),
            Finger::Index => (
                HandLandmark::IndexFingerMcp,
                HandLandmark::IndexFingerPip,
                HandLandmark::IndexFingerTip,
            ),
            Finger::Middle => (
                HandLandmark::MiddleFingerMcp,
                HandLandmark::MiddleFingerPip,
                HandLandmark::MiddleFingerTip,
            ),
            Finger::Ring => (
                HandLandmark::RingFingerMcp,
                HandLandmark::RingFingerPip,
                HandLandmark::RingFingerTip,
            ),
            Finger::Pinky => (HandLandmark::PinkyMcp, HandLandmark::PinkyPip, HandLandmark::PinkyTip),
        }
    }
}

// ==============================================================================
// Shared: 3D Keypoint
// ==============================================================================

/// A 3D keypoint with confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint3D {
    pub x: f32, // Normalized [0, 1] for image coordinates
    pub y: f32, // Normalized [0, 1] for image coordinates
    pub z: f32, // Depth relative to the wrist
    pub confidence: f32,
}

impl Keypoint3D {
    pub fn new(x: f32, y: f32, z: f32, confidence: f32) -> Self {
        Self {
            x,
            y,
            z,
            confidence,
        }
    }
}

// ==============================================================================
// Gesture Results
// ==============================================================================

/// A single gesture recognized in a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedGesture {
    pub label: String,
    pub confidence: f32,
}

/// Lower and upper bound of a gesture matcher score
pub const MIN_GESTURE_SCORE: f32 = 0.0;
pub const MAX_GESTURE_SCORE: f32 = 10.0;

// ==============================================================================
// Configuration
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub target_fps: u32,        // Frames per second to process (default: 30)
    pub min_gesture_score: f32, // Minimum matcher score to count as a match (default: 7.5)
}

impl DetectionConfig {
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(1000 / self.target_fps.max(1) as u64)
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            min_gesture_score: 7.5,
        }
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("Hand pose model not initialized")]
    NotInitialized,

    #[error("Gesture detection already running")]
    AlreadyRunning,

    #[error("Model loading failed: {0}")]
    ModelLoadFailed(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type PoseResult<T> = Result<T, PoseError>;
