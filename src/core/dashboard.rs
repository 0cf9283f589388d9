use crate::core::auth::AuthProvider;
use crate::core::translation_store::TranslationStore;
use crate::models::auth::{AuthResult, Route, User};
use crate::models::translation::{StatusFilter, TranslationRecord, TranslationStats};
use std::sync::Arc;

/// Result of opening the dashboard
pub enum DashboardView {
    /// Nobody is signed in; go here instead
    Redirect(Route),
    Ready(Dashboard),
}

/// A signed-in user's snapshot of their translations, newest first
pub struct Dashboard {
    auth: Arc<dyn AuthProvider>,
    user: User,
    records: Vec<TranslationRecord>,
}

impl Dashboard {
    pub async fn open(
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn TranslationStore>,
    ) -> AuthResult<DashboardView> {
        let user = match auth.current_user().await? {
            Some(user) => user,
            None => return Ok(DashboardView::Redirect(Route::Auth)),
        };

        // A failed read shows an empty dashboard rather than an error page
        let records = match store.list_recent().await {
            Ok(records) => records,
            Err(e) => {
                log::error!("Failed to load translations: {}", e);
                Vec::new()
            }
        };

        Ok(DashboardView::Ready(Self {
            auth,
            user,
            records,
        }))
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn records(&self, filter: StatusFilter) -> Vec<&TranslationRecord> {
        self.records
            .iter()
            .filter(|r| filter.matches(r.status))
            .collect()
    }

    pub fn stats(&self) -> TranslationStats {
        TranslationStats::from_records(&self.records)
    }

    pub async fn sign_out(self) -> AuthResult<Route> {
        self.auth.sign_out().await?;
        Ok(Route::Home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::LocalAuth;
    use crate::core::database::Database;
    use crate::core::translation_store::SqliteTranslationStore;
    use crate::models::translation::{
        NewTranslation, SourceType, TranslationError, TranslationResult, TranslationStatus,
    };
    use async_trait::async_trait;

    async fn sqlite_store() -> Arc<dyn TranslationStore> {
        let db = Database::in_memory()
            .await
            .expect("Failed to create in-memory database");
        Arc::new(SqliteTranslationStore::new(Arc::new(db)))
    }

    async fn signed_in() -> Arc<LocalAuth> {
        let auth = Arc::new(LocalAuth::new());
        auth.sign_in("signer@example.com").await.unwrap();
        auth
    }

    async fn seed(store: &Arc<dyn TranslationStore>, text: &str, status: TranslationStatus) {
        let record = store
            .insert(NewTranslation {
                source_type: SourceType::Text,
                source_text: text.to_string(),
            })
            .await
            .unwrap();
        match status {
            TranslationStatus::Pending => {}
            TranslationStatus::Completed => store.complete(&record.id, "done").await.unwrap(),
            TranslationStatus::Failed => store.mark_failed(&record.id).await.unwrap(),
        }
        tokio::time::sleep(std::time::Duration::from_millis(3)).await;
    }

    #[tokio::test]
    async fn test_redirects_without_user() {
        let auth = Arc::new(LocalAuth::new());
        let view = Dashboard::open(auth, sqlite_store().await).await.unwrap();
        assert!(matches!(view, DashboardView::Redirect(Route::Auth)));
    }

    #[tokio::test]
    async fn test_filters_and_stats() {
        let store = sqlite_store().await;
        seed(&store, "one", TranslationStatus::Pending).await;
        seed(&store, "two", TranslationStatus::Completed).await;
        seed(&store, "three", TranslationStatus::Completed).await;
        seed(&store, "four", TranslationStatus::Failed).await;

        let dashboard = match Dashboard::open(signed_in().await, store).await.unwrap() {
            DashboardView::Ready(d) => d,
            DashboardView::Redirect(_) => panic!("expected dashboard"),
        };

        let completed = dashboard.records(StatusFilter::Completed);
        assert_eq!(completed.len(), 2);
        assert!(completed
            .iter()
            .all(|r| r.status == TranslationStatus::Completed));
        // Newest first within the filtered view too
        assert_eq!(completed[0].source_text, "three");
        assert_eq!(completed[1].source_text, "two");

        let all: Vec<&str> = dashboard
            .records(StatusFilter::All)
            .iter()
            .map(|r| r.source_text.as_str())
            .collect();
        assert_eq!(all, vec!["four", "three", "two", "one"]);

        let stats = dashboard.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(dashboard.records(StatusFilter::Failed).len(), 1);
    }

    #[tokio::test]
    async fn test_sign_out_returns_home() {
        let auth = signed_in().await;
        let dashboard = match Dashboard::open(auth.clone(), sqlite_store().await)
            .await
            .unwrap()
        {
            DashboardView::Ready(d) => d,
            DashboardView::Redirect(_) => panic!("expected dashboard"),
        };
        assert_eq!(dashboard.user().email, "signer@example.com");

        assert_eq!(dashboard.sign_out().await.unwrap(), Route::Home);
        assert!(auth.current_user().await.unwrap().is_none());
    }

    struct BrokenStore;

    #[async_trait]
    impl TranslationStore for BrokenStore {
        async fn insert(&self, _new: NewTranslation) -> TranslationResult<TranslationRecord> {
            Err(TranslationError::StoreUnavailable("down".into()))
        }
        async fn complete(&self, _id: &str, _text: &str) -> TranslationResult<()> {
            Err(TranslationError::StoreUnavailable("down".into()))
        }
        async fn mark_failed(&self, _id: &str) -> TranslationResult<()> {
            Err(TranslationError::StoreUnavailable("down".into()))
        }
        async fn get(&self, _id: &str) -> TranslationResult<Option<TranslationRecord>> {
            Err(TranslationError::StoreUnavailable("down".into()))
        }
        async fn list_recent(&self) -> TranslationResult<Vec<TranslationRecord>> {
            Err(TranslationError::StoreUnavailable("down".into()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_shows_empty_dashboard() {
        let view = Dashboard::open(signed_in().await, Arc::new(BrokenStore))
            .await
            .unwrap();
        match view {
            DashboardView::Ready(d) => assert_eq!(d.stats().total, 0),
            DashboardView::Redirect(_) => panic!("expected dashboard"),
        }
    }
}
