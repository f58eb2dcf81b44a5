//! Best-effort activity logging.

use crate::models::NewActivity;
use crate::stores::ActivityStore;

/// Append an activity entry, logging instead of failing when the store does.
///
/// The operation that produced the entry has already succeeded; a lost log
/// line must not turn it into an error response.
pub async fn record(store: &dyn ActivityStore, entry: NewActivity) {
    let action = entry.action;
    if let Err(e) = store.append(entry).await {
        tracing::warn!(error = %e, action = ?action, "Failed to record activity");
    }
}

#[cfg(test)]
mod tests {
    use shopsphere_core::{ActivityAction, UserId};

    use super::*;
    use crate::stores::memory::MemoryActivityStore;

    #[tokio::test]
    async fn test_record_appends() {
        let store = MemoryActivityStore::default();
        record(
            &store,
            NewActivity::new(Some(UserId::new(3)), ActivityAction::Login),
        )
        .await;
        assert_eq!(store.entries().await.len(), 1);
    }

    #[tokio::test]
    async fn test_record_swallows_store_failure() {
        let store = MemoryActivityStore::default();
        store.set_unavailable(true);
        record(&store, NewActivity::new(None, ActivityAction::Search)).await;
        assert!(store.entries().await.is_empty());
    }
}
