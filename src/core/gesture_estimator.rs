// Rule-based gesture matching over hand landmarks
// Each matcher scores a landmark set on a 0..=10 scale

use crate::models::gesture::{
    Finger, HandLandmark, Keypoint3D, DetectedGesture, HAND_LANDMARK_COUNT, MAX_GESTURE_SCORE,
    MIN_GESTURE_SCORE,
};

/// Joint angle (degrees, 0..=180) at `b` formed by `a` and `c` in the image plane
pub fn calculate_angle(a: &Keypoint3D, b: &Keypoint3D, c: &Keypoint3D) -> f32 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut angle = (radians.to_degrees()).abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    angle
}

fn distance(a: &Keypoint3D, b: &Keypoint3D) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Angle above which a finger counts as straight
const EXTENDED_ANGLE_DEG: f32 = 150.0;

/// A finger is extended when it is nearly straight and its tip reaches past the middle joint
pub fn finger_extended(landmarks: &[Keypoint3D], finger: Finger) -> bool {
    if landmarks.len() < HAND_LANDMARK_COUNT {
        return false;
    }
    let (base, middle, tip) = finger.joints();
    let wrist = &landmarks[HandLandmark::Wrist.index()];
    let base = &landmarks[base.index()];
    let middle = &landmarks[middle.index()];
    let tip = &landmarks[tip.index()];

    calculate_angle(base, middle, tip) >= EXTENDED_ANGLE_DEG
        && distance(wrist, tip) > distance(wrist, middle)
}

// ==============================================================================
// Matchers
// ==============================================================================

/// Scores a landmark set against one named gesture
pub trait GestureMatcher: Send + Sync {
    fn name(&self) -> &str;

    /// Confidence in `MIN_GESTURE_SCORE..=MAX_GESTURE_SCORE`
    fn score(&self, landmarks: &[Keypoint3D]) -> f32;
}

/// Gesture described by which fingers are extended (true) or curled (false)
///
/// The score is the fraction of fingers in the expected state, scaled to 0..=10.
#[derive(Debug, Clone)]
pub struct FingerShapeGesture {
    name: String,
    shape: [bool; 5],
}

impl FingerShapeGesture {
    /// `shape` is ordered thumb, index, middle, ring, pinky
    pub fn new(name: impl Into<String>, shape: [bool; 5]) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }
}

impl GestureMatcher for FingerShapeGesture {
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&self, landmarks: &[Keypoint3D]) -> f32 {
        if landmarks.len() < HAND_LANDMARK_COUNT {
            return MIN_GESTURE_SCORE;
        }

        let matching = Finger::all()
            .iter()
            .zip(self.shape.iter())
            .filter(|(finger, expected)| finger_extended(landmarks, **finger) == **expected)
            .count();

        MAX_GESTURE_SCORE * matching as f32 / 5.0
    }
}

/// Gesture backed by an arbitrary scoring function
pub struct RuleGesture {
    name: String,
    rule: Box<dyn Fn(&[Keypoint3D]) -> f32 + Send + Sync>,
}

impl RuleGesture {
    pub fn new(
        name: impl Into<String>,
        rule: impl Fn(&[Keypoint3D]) -> f32 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            rule: Box::new(rule),
        }
    }
}

impl GestureMatcher for RuleGesture {
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&self, landmarks: &[Keypoint3D]) -> f32 {
        (self.rule)(landmarks).clamp(MIN_GESTURE_SCORE, MAX_GESTURE_SCORE)
    }
}

/// Basic ISL alphabet handshapes
pub fn sign_gestures() -> Vec<Box<dyn GestureMatcher>> {
    vec![
        Box::new(FingerShapeGesture::new("A", [true, false, false, false, false])),
        Box::new(FingerShapeGesture::new("B", [false, true, true, true, true])),
        Box::new(FingerShapeGesture::new("L", [true, true, false, false, false])),
        Box::new(FingerShapeGesture::new("V", [false, true, true, false, false])),
        Box::new(FingerShapeGesture::new("Y", [true, false, false, false, true])),
    ]
}

// ==============================================================================
// Estimator
// ==============================================================================

pub struct GestureEstimator {
    matchers: Vec<Box<dyn GestureMatcher>>,
}

impl GestureEstimator {
    pub fn new(matchers: Vec<Box<dyn GestureMatcher>>) -> Self {
        Self { matchers }
    }

    pub fn with_sign_gestures() -> Self {
        Self::new(sign_gestures())
    }

    pub fn gesture_names(&self) -> Vec<&str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Every gesture scoring at least `min_score`, in registration order
    pub fn estimate(&self, landmarks: &[Keypoint3D], min_score: f32) -> Vec<DetectedGesture> {
        self.matchers
            .iter()
            .filter_map(|matcher| {
                let confidence = matcher.score(landmarks);
                (confidence >= min_score).then(|| DetectedGesture {
                    label: matcher.name().to_string(),
                    confidence,
                })
            })
            .collect()
    }
}

impl Default for GestureEstimator {
    fn default() -> Self {
        Self::with_sign_gestures()
    }
}
