//! Best-effort notification emitter.

use std::sync::Arc;

use tracing::warn;

use readygo_database::store::NotificationStore;
use readygo_entity::notification::NewNotification;

/// Records user-facing events after a transition has committed.
///
/// Failures are logged and swallowed: a notification never rolls back the
/// transition that triggered it.
#[derive(Debug, Clone)]
pub struct Notifier {
    store: Arc<dyn NotificationStore>,
}

impl Notifier {
    /// Creates a notifier writing to `store`.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Emits one notification.
    pub async fn notify(&self, notification: NewNotification) {
        let user_id = notification.user_id;
        let row = notification.into_notification();
        if let Err(e) = self.store.insert_notification(&row).await {
            warn!(user_id = %user_id, error = %e, "Failed to record notification");
        }
    }
}
