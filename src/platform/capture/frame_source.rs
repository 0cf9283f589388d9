// Live frame sources feeding a capture session

use crate::models::gesture::{PoseError, PoseResult, VideoFrame};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Anything that yields successive video frames
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Next frame, or `None` once the source is exhausted
    async fn next_frame(&self) -> PoseResult<Option<VideoFrame>>;
}

// ==============================================================================
// Image Sequence (directory of stills)
// ==============================================================================

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Replays image files from a directory in lexical order
pub struct ImageSequenceSource {
    pending: Mutex<VecDeque<PathBuf>>,
}

impl ImageSequenceSource {
    pub fn from_dir(dir: &Path) -> PoseResult<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            PoseError::InvalidFrame(format!("cannot read frame directory {}: {}", dir.display(), e))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        log::debug!("Found {} frames in {}", paths.len(), dir.display());

        Ok(Self {
            pending: Mutex::new(paths.into()),
        })
    }

    pub async fn remaining(&self) -> usize {
        self.pending.lock().await.len()
    }
}

#[async_trait]
impl FrameSource for ImageSequenceSource {
    async fn next_frame(&self) -> PoseResult<Option<VideoFrame>> {
        let path = match self.pending.lock().await.pop_front() {
            Some(path) => path,
            None => return Ok(None),
        };

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| PoseError::InvalidFrame(format!("{}: {}", path.display(), e)))?;
        let timestamp = chrono::Utc::now().timestamp_millis();

        VideoFrame::decode(&bytes, timestamp).map(Some)
    }
}

// ==============================================================================
// In-memory frames
// ==============================================================================

/// Yields pre-decoded frames, optionally repeating the last one forever
pub struct MemoryFrameSource {
    frames: Mutex<VecDeque<VideoFrame>>,
    repeat_last: bool,
}

impl MemoryFrameSource {
    pub fn new(frames: Vec<VideoFrame>) -> Self {
        Self {
            frames: Mutex::new(frames.into()),
            repeat_last: false,
        }
    }

    /// A source that never runs dry; models a live camera
    pub fn endless(frame: VideoFrame) -> Self {
        Self {
            frames: Mutex::new(VecDeque::from(vec![frame])),
            repeat_last: true,
        }
    }
}

#[async_trait]
impl FrameSource for MemoryFrameSource {
    async fn next_frame(&self) -> PoseResult<Option<VideoFrame>> {
        let mut frames = self.frames.lock().await;
        if self.repeat_last && frames.len() == 1 {
            return Ok(frames.front().cloned());
        }
        Ok(frames.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, shade: u8) {
        image::RgbImage::from_pixel(2, 2, image::Rgb([shade, shade, shade]))
            .save(path)
            .unwrap();
    }

    #[tokio::test]
    async fn test_image_sequence_in_lexical_order() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("frame_002.png"), 20);
        write_png(&dir.path().join("frame_001.png"), 10);
        std::fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let source = ImageSequenceSource::from_dir(dir.path()).unwrap();
        assert_eq!(source.remaining().await, 2);

        let first = source.next_frame().await.unwrap().unwrap();
        assert_eq!(first.data[0], 10);
        let second = source.next_frame().await.unwrap().unwrap();
        assert_eq!(second.data[0], 20);
        assert!(source.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let result = ImageSequenceSource::from_dir(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(PoseError::InvalidFrame(_))));
    }

    #[tokio::test]
    async fn test_endless_source_repeats() {
        let frame = VideoFrame::new(1, 1, vec![1, 2, 3], 0).unwrap();
        let source = MemoryFrameSource::endless(frame);
        for _ in 0..5 {
            assert!(source.next_frame().await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_finite_source_drains() {
        let frame = VideoFrame::new(1, 1, vec![1, 2, 3], 0).unwrap();
        let source = MemoryFrameSource::new(vec![frame.clone(), frame]);
        assert!(source.next_frame().await.unwrap().is_some());
        assert!(source.next_frame().await.unwrap().is_some());
        assert!(source.next_frame().await.unwrap().is_none());
    }
}
