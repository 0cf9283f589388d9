use crate::core::translation_store::TranslationStore;
use crate::models::translation::{
    RecordHandle, TranslationError, TranslationInput, TranslationResult, TranslationStatus,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

// ==============================================================================
// Translator
// ==============================================================================

/// Produces the translated text for a submitted input
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, input: &TranslationInput) -> TranslationResult<String>;
}

/// Stand-in for a real translation model: waits, then returns canned output
#[derive(Debug, Clone)]
pub struct PlaceholderTranslator {
    text_delay: Duration,
    video_delay: Duration,
}

impl PlaceholderTranslator {
    pub fn new(text_delay: Duration, video_delay: Duration) -> Self {
        Self {
            text_delay,
            video_delay,
        }
    }
}

impl Default for PlaceholderTranslator {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500), Duration::from_millis(2000))
    }
}

#[async_trait]
impl Translator for PlaceholderTranslator {
    async fn translate(&self, input: &TranslationInput) -> TranslationResult<String> {
        match input {
            TranslationInput::Text { .. } => {
                tokio::time::sleep(self.text_delay).await;
                Ok("Sample ISL translation".to_string())
            }
            TranslationInput::Video { .. } => {
                tokio::time::sleep(self.video_delay).await;
                Ok("Sample translation for video".to_string())
            }
            // Live labels are fingerspelled letters; the word is their concatenation
            TranslationInput::GestureSequence { labels } => Ok(labels.concat()),
        }
    }
}

// ==============================================================================
// Retry Policy
// ==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    /// Delay before attempt `attempt` (1-based); doubles each time
    pub fn backoff_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(2)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
        }
    }
}

// ==============================================================================
// Pipeline
// ==============================================================================

#[derive(Clone)]
pub struct TranslationPipeline {
    store: Arc<dyn TranslationStore>,
    translator: Arc<dyn Translator>,
    retry: RetryPolicy,
}

impl TranslationPipeline {
    pub fn new(
        store: Arc<dyn TranslationStore>,
        translator: Arc<dyn Translator>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            translator,
            retry,
        }
    }

    /// Validate the input and create its pending record
    ///
    /// Blank input is rejected before the store is touched. If the insert
    /// fails no record exists and the caller must not call `process`.
    pub async fn submit(&self, input: TranslationInput) -> TranslationResult<RecordHandle> {
        let new = input.to_new_translation()?;

        let record = self.store.insert(new).await.map_err(|e| {
            log::error!("Failed to create translation record: {}", e);
            match e {
                TranslationError::StoreUnavailable(_) => e,
                other => TranslationError::StoreUnavailable(other.to_string()),
            }
        })?;

        log::info!(
            "Created {} translation {}",
            record.source_type.to_db_string(),
            record.id
        );

        Ok(RecordHandle {
            id: record.id,
            input,
            created_at: record.created_at,
        })
    }

    /// Translate and move the record to its terminal status
    ///
    /// The completion update is retried per the retry policy. If it never
    /// lands, or the translator fails, the record is marked failed instead.
    pub async fn process(&self, handle: &RecordHandle) -> TranslationResult<TranslationStatus> {
        let translated = match self.translator.translate(&handle.input).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("Translation {} failed: {}", handle.id, e);
                self.fail(&handle.id).await;
                return Err(e);
            }
        };

        let mut last_error = None;
        for attempt in 1..=self.retry.max_attempts.max(1) {
            let backoff = self.retry.backoff_before(attempt);
            if !backoff.is_zero() {
                tokio::time::sleep(backoff).await;
            }

            match self.store.complete(&handle.id, &translated).await {
                Ok(()) => {
                    log::info!("Completed translation {}", handle.id);
                    return Ok(TranslationStatus::Completed);
                }
                // Another writer already finished it; nothing left to retry
                Err(e @ TranslationError::InvalidTransition { .. })
                | Err(e @ TranslationError::NotFound(_)) => return Err(e),
                Err(e) => {
                    log::warn!(
                        "Completing translation {} failed (attempt {}/{}): {}",
                        handle.id,
                        attempt,
                        self.retry.max_attempts,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        if let Some(e) = last_error {
            log::error!("Giving up on completing translation {}: {}", handle.id, e);
        }
        self.fail(&handle.id).await;
        Ok(TranslationStatus::Failed)
    }

    /// Submit then process in one call
    pub async fn translate(&self, input: TranslationInput) -> TranslationResult<RecordHandle> {
        let handle = self.submit(input).await?;
        self.process(&handle).await?;
        Ok(handle)
    }

    /// Run `process` in the background; the task always ends in a terminal transition attempt
    pub fn spawn_process(
        &self,
        handle: RecordHandle,
    ) -> JoinHandle<TranslationResult<TranslationStatus>> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.process(&handle).await })
    }

    async fn fail(&self, id: &str) {
        if let Err(e) = self.store.mark_failed(id).await {
            log::error!("Could not mark translation {} as failed: {}", id, e);
        }
    }
}
