// Frame capture sources
// Live cameras and recorded stills share the FrameSource interface

pub mod frame_source;

pub use frame_source::{FrameSource, ImageSequenceSource, MemoryFrameSource};
