// Hand pose model integration
// Provides the landmark extractor bridge and its default backend

pub mod handpose_bridge;

pub use handpose_bridge::{DefaultHandPose, DummyHandPose, HandPoseModel};
