// Data models for translation records and their lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==============================================================================
// Record
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Video,
    Text,
}

impl SourceType {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            SourceType::Video => "video",
            SourceType::Text => "text",
        }
    }

    pub fn from_db_string(s: &str) -> TranslationResult<Self> {
        match s {
            "video" => Ok(SourceType::Video),
            "text" => Ok(SourceType::Text),
            other => Err(TranslationError::StoreUnavailable(format!(
                "unknown source type in store: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStatus {
    Pending,
    Completed,
    Failed,
}

impl TranslationStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            TranslationStatus::Pending => "pending",
            TranslationStatus::Completed => "completed",
            TranslationStatus::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> TranslationResult<Self> {
        match s {
            "pending" => Ok(TranslationStatus::Pending),
            "completed" => Ok(TranslationStatus::Completed),
            "failed" => Ok(TranslationStatus::Failed),
            other => Err(TranslationError::StoreUnavailable(format!(
                "unknown status in store: {}",
                other
            ))),
        }
    }

    /// Pending is the only state a record may leave
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TranslationStatus::Pending)
    }
}

impl std::fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// One persisted translation attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub id: String,
    pub source_type: SourceType,
    pub source_text: String,
    pub translated_text: Option<String>,
    pub status: TranslationStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when a record is created
#[derive(Debug, Clone, PartialEq)]
pub struct NewTranslation {
    pub source_type: SourceType,
    pub source_text: String,
}

/// Identifies a freshly created record awaiting processing
#[derive(Debug, Clone, PartialEq)]
pub struct RecordHandle {
    pub id: String,
    pub input: TranslationInput,
    pub created_at: DateTime<Utc>,
}

// ==============================================================================
// Pipeline Input
// ==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TranslationInput {
    /// An uploaded clip, identified by its file name
    Video { file_name: String },
    /// Free text typed by the user
    Text { text: String },
    /// Labels accumulated during a live capture session
    GestureSequence { labels: Vec<String> },
}

impl TranslationInput {
    pub fn text(text: impl Into<String>) -> Self {
        TranslationInput::Text { text: text.into() }
    }

    pub fn video(file_name: impl Into<String>) -> Self {
        TranslationInput::Video {
            file_name: file_name.into(),
        }
    }

    pub fn gestures(labels: Vec<String>) -> Self {
        TranslationInput::GestureSequence { labels }
    }

    /// Validate and turn the input into the record to insert
    pub fn to_new_translation(&self) -> TranslationResult<NewTranslation> {
        match self {
            TranslationInput::Text { text } => {
                if text.trim().is_empty() {
                    return Err(TranslationError::EmptyInput);
                }
                Ok(NewTranslation {
                    source_type: SourceType::Text,
                    source_text: text.clone(),
                })
            }
            TranslationInput::Video { file_name } => {
                if file_name.trim().is_empty() {
                    return Err(TranslationError::EmptyInput);
                }
                Ok(NewTranslation {
                    source_type: SourceType::Video,
                    source_text: file_name.clone(),
                })
            }
            TranslationInput::GestureSequence { labels } => {
                if labels.iter().all(|l| l.trim().is_empty()) {
                    return Err(TranslationError::EmptyInput);
                }
                Ok(NewTranslation {
                    source_type: SourceType::Video,
                    source_text: labels.join(" "),
                })
            }
        }
    }
}

// ==============================================================================
// Dashboard Views
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    All,
    Completed,
    Pending,
    Failed,
}

impl StatusFilter {
    pub fn matches(&self, status: TranslationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => status == TranslationStatus::Completed,
            StatusFilter::Pending => status == TranslationStatus::Pending,
            StatusFilter::Failed => status == TranslationStatus::Failed,
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "completed" => Ok(StatusFilter::Completed),
            "pending" => Ok(StatusFilter::Pending),
            "failed" => Ok(StatusFilter::Failed),
            _ => Err(format!("Unknown status filter: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub failed: usize,
}

impl TranslationStats {
    pub fn from_records(records: &[TranslationRecord]) -> Self {
        records.iter().fold(Self::default(), |mut stats, record| {
            stats.total += 1;
            match record.status {
                TranslationStatus::Completed => stats.completed += 1,
                TranslationStatus::Pending => stats.pending += 1,
                TranslationStatus::Failed => stats.failed += 1,
            }
            stats
        })
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Translation store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Translation record not found: {0}")]
    NotFound(String),

    #[error("Translation record {id} is already {status}")]
    InvalidTransition {
        id: String,
        status: TranslationStatus,
    },

    #[error("Translation failed: {0}")]
    TranslationFailed(String),
}

impl From<sqlx::Error> for TranslationError {
    fn from(e: sqlx::Error) -> Self {
        TranslationError::StoreUnavailable(e.to_string())
    }
}

pub type TranslationResult<T> = Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: TranslationStatus) -> TranslationRecord {
        TranslationRecord {
            id: uuid::Uuid::new_v4().to_string(),
            source_type: SourceType::Text,
            source_text: "hello".to_string(),
            translated_text: None,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_text_input_rejects_blank() {
        assert!(matches!(
            TranslationInput::text("").to_new_translation(),
            Err(TranslationError::EmptyInput)
        ));
        assert!(matches!(
            TranslationInput::text("  \n\t ").to_new_translation(),
            Err(TranslationError::EmptyInput)
        ));
    }

    #[test]
    fn test_text_input_keeps_raw_text() {
        let new = TranslationInput::text(" hello ").to_new_translation().unwrap();
        assert_eq!(new.source_type, SourceType::Text);
        assert_eq!(new.source_text, " hello ");
    }

    #[test]
    fn test_gesture_sequence_is_video_origin() {
        let input = TranslationInput::gestures(vec!["A".to_string(), "B".to_string()]);
        let new = input.to_new_translation().unwrap();
        assert_eq!(new.source_type, SourceType::Video);
        assert_eq!(new.source_text, "A B");

        assert!(matches!(
            TranslationInput::gestures(vec![]).to_new_translation(),
            Err(TranslationError::EmptyInput)
        ));
    }

    #[test]
    fn test_status_round_trip_and_terminal() {
        for status in [
            TranslationStatus::Pending,
            TranslationStatus::Completed,
            TranslationStatus::Failed,
        ] {
            assert_eq!(
                TranslationStatus::from_db_string(status.to_db_string()).unwrap(),
                status
            );
        }
        assert!(!TranslationStatus::Pending.is_terminal());
        assert!(TranslationStatus::Completed.is_terminal());
        assert!(TranslationStatus::Failed.is_terminal());
        assert!(TranslationStatus::from_db_string("done").is_err());
    }

    #[test]
    fn test_stats_and_filter() {
        let records = vec![
            record(TranslationStatus::Pending),
            record(TranslationStatus::Completed),
            record(TranslationStatus::Completed),
            record(TranslationStatus::Failed),
        ];

        let stats = TranslationStats::from_records(&records);
        assert_eq!(
            stats,
            TranslationStats {
                total: 4,
                completed: 2,
                pending: 1,
                failed: 1,
            }
        );

        let completed = records
            .iter()
            .filter(|r| StatusFilter::Completed.matches(r.status))
            .count();
        assert_eq!(completed, 2);
        assert!(StatusFilter::from_string("Pending").is_ok());
        assert!(StatusFilter::from_string("archived").is_err());
    }
}
