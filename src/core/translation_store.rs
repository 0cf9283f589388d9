use crate::core::database::Database;
use crate::models::translation::{
    NewTranslation, SourceType, TranslationError, TranslationRecord, TranslationResult,
    TranslationStatus,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Table-like store of translation records
///
/// Updates only ever move a record out of `pending`; a record that already
/// reached a terminal status is left untouched and `InvalidTransition` is
/// returned.
#[async_trait]
pub trait TranslationStore: Send + Sync {
    /// Insert a pending record; id and created_at are assigned here
    async fn insert(&self, new: NewTranslation) -> TranslationResult<TranslationRecord>;

    /// pending -> completed, setting the translated text
    async fn complete(&self, id: &str, translated_text: &str) -> TranslationResult<()>;

    /// pending -> failed
    async fn mark_failed(&self, id: &str) -> TranslationResult<()>;

    async fn get(&self, id: &str) -> TranslationResult<Option<TranslationRecord>>;

    /// All records, newest first
    async fn list_recent(&self) -> TranslationResult<Vec<TranslationRecord>>;
}

// ==============================================================================
// SQLite Store
// ==============================================================================

#[derive(Debug, Clone, sqlx::FromRow)]
struct TranslationRow {
    id: String,
    source_type: String,
    source_text: String,
    translated_text: Option<String>,
    status: String,
    created_at: i64,
}

impl TranslationRow {
    fn into_record(self) -> TranslationResult<TranslationRecord> {
        let created_at: DateTime<Utc> = Utc
            .timestamp_millis_opt(self.created_at)
            .single()
            .ok_or_else(|| {
                TranslationError::StoreUnavailable(format!(
                    "invalid created_at {} for {}",
                    self.created_at, self.id
                ))
            })?;

        Ok(TranslationRecord {
            source_type: SourceType::from_db_string(&self.source_type)?,
            status: TranslationStatus::from_db_string(&self.status)?,
            id: self.id,
            source_text: self.source_text,
            translated_text: self.translated_text,
            created_at,
        })
    }
}

pub struct SqliteTranslationStore {
    db: Arc<Database>,
}

impl SqliteTranslationStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn finish(
        &self,
        id: &str,
        status: TranslationStatus,
        translated_text: Option<&str>,
    ) -> TranslationResult<()> {
        let result = sqlx::query(
            "UPDATE translations SET status = ?, translated_text = COALESCE(?, translated_text)
             WHERE id = ? AND status = 'pending'",
        )
        .bind(status.to_db_string())
        .bind(translated_text)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        match self.get(id).await? {
            Some(record) if record.status.is_terminal() => {
                Err(TranslationError::InvalidTransition {
                    id: id.to_string(),
                    status: record.status,
                })
            }
            Some(record) => Err(TranslationError::StoreUnavailable(format!(
                "update of {} did not apply while still {}",
                id, record.status
            ))),
            None => Err(TranslationError::NotFound(id.to_string())),
        }
    }
}

#[async_trait]
impl TranslationStore for SqliteTranslationStore {
    async fn insert(&self, new: NewTranslation) -> TranslationResult<TranslationRecord> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO translations (id, source_type, source_text, translated_text, status, created_at)
             VALUES (?, ?, ?, NULL, 'pending', ?)",
        )
        .bind(&id)
        .bind(new.source_type.to_db_string())
        .bind(&new.source_text)
        .bind(created_at.timestamp_millis())
        .execute(self.db.pool())
        .await?;

        Ok(TranslationRecord {
            id,
            source_type: new.source_type,
            source_text: new.source_text,
            translated_text: None,
            status: TranslationStatus::Pending,
            created_at,
        })
    }

    async fn complete(&self, id: &str, translated_text: &str) -> TranslationResult<()> {
        self.finish(id, TranslationStatus::Completed, Some(translated_text))
            .await
    }

    async fn mark_failed(&self, id: &str) -> TranslationResult<()> {
        self.finish(id, TranslationStatus::Failed, None).await
    }

    async fn get(&self, id: &str) -> TranslationResult<Option<TranslationRecord>> {
        let row = sqlx::query_as::<_, TranslationRow>("SELECT * FROM translations WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.map(TranslationRow::into_record).transpose()
    }

    async fn list_recent(&self) -> TranslationResult<Vec<TranslationRecord>> {
        let rows = sqlx::query_as::<_, TranslationRow>(
            "SELECT * FROM translations ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter().map(TranslationRow::into_record).collect()
    }
}
