use crate::core::translation_pipeline::{PlaceholderTranslator, RetryPolicy};
use crate::models::gesture::DetectionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// SQLite file holding translation records
    pub database_path: PathBuf,
    /// Live detection frames per second
    pub target_fps: u32,
    /// Minimum gesture matcher score (0.0-10.0)
    pub gesture_min_score: f32,
    /// Simulated processing time for text input
    pub text_processing_delay_ms: u64,
    /// Simulated processing time for uploaded video
    pub video_processing_delay_ms: u64,
    /// How many times the completion update is attempted
    pub completion_retry_attempts: u32,
    /// Delay before the second attempt; doubles afterwards
    pub completion_retry_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let mut database_path = data_dir();
        database_path.push("database");
        database_path.push("signlink.db");

        Self {
            database_path,
            target_fps: 30,
            gesture_min_score: 7.5,
            text_processing_delay_ms: 1500,
            video_processing_delay_ms: 2000,
            completion_retry_attempts: 3,
            completion_retry_backoff_ms: 250,
        }
    }
}

fn data_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());

    let mut path = PathBuf::from(home);
    path.push(".signlink");
    path
}

impl Config {
    /// Load configuration from the default location, creating it with defaults if missing
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            log::info!("No config at {}, writing defaults", path.display());
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.target_fps == 0 || self.target_fps > 60 {
            return Err(format!(
                "Invalid target FPS: {}. Must be between 1 and 60",
                self.target_fps
            )
            .into());
        }

        if !(0.0..=10.0).contains(&self.gesture_min_score) {
            return Err(format!(
                "Invalid gesture minimum score: {}. Must be between 0.0 and 10.0",
                self.gesture_min_score
            )
            .into());
        }

        if self.completion_retry_attempts == 0 || self.completion_retry_attempts > 10 {
            return Err(format!(
                "Invalid completion retry attempts: {}. Must be between 1 and 10",
                self.completion_retry_attempts
            )
            .into());
        }

        if self.completion_retry_backoff_ms > 60_000 {
            return Err(format!(
                "Invalid completion retry backoff: {}ms. Must be at most 60000",
                self.completion_retry_backoff_ms
            )
            .into());
        }

        if self.database_path.as_os_str().is_empty() {
            return Err("Database path cannot be empty".into());
        }

        Ok(())
    }

    /// Reset to default configuration
    pub fn reset() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    pub fn detection(&self) -> DetectionConfig {
        DetectionConfig {
            target_fps: self.target_fps,
            min_gesture_score: self.gesture_min_score,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.completion_retry_attempts,
            initial_backoff: Duration::from_millis(self.completion_retry_backoff_ms),
        }
    }

    pub fn translator(&self) -> PlaceholderTranslator {
        PlaceholderTranslator::new(
            Duration::from_millis(self.text_processing_delay_ms),
            Duration::from_millis(self.video_processing_delay_ms),
        )
    }

    /// Get the configuration file path
    pub fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let mut path = data_dir();
        path.push("config");
        path.push("settings.json");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.gesture_min_score, 7.5);
        assert_eq!(config.text_processing_delay_ms, 1500);
        assert_eq!(config.video_processing_delay_ms, 2000);
        assert_eq!(config.completion_retry_attempts, 3);
        assert!(config.database_path.ends_with("database/signlink.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.target_fps = 0;
        assert!(config.validate().is_err());
        config.target_fps = 120;
        assert!(config.validate().is_err());
        config.target_fps = 30;

        config.gesture_min_score = 10.5;
        assert!(config.validate().is_err());
        config.gesture_min_score = -1.0;
        assert!(config.validate().is_err());
        config.gesture_min_score = 7.5;

        config.completion_retry_attempts = 0;
        assert!(config.validate().is_err());
        config.completion_retry_attempts = 3;

        config.database_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_creates_defaults_then_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("settings.json");

        let created = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created, Config::default());

        let mut changed = created.clone();
        changed.target_fps = 15;
        changed.gesture_min_score = 8.0;
        changed.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), changed);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut config = Config::default();
        config.target_fps = 0;
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        assert!(Config::load_from(&path).is_err());
        assert!(config.save_to(&path).is_err());
    }

    #[test]
    fn test_derived_settings() {
        let config = Config::default();
        assert_eq!(config.detection().frame_interval(), Duration::from_millis(33));
        assert_eq!(config.retry_policy().max_attempts, 3);
        assert_eq!(
            config.retry_policy().initial_backoff,
            Duration::from_millis(250)
        );
    }
}
