use super::entities::NotificationEvent;
use shared_types::BatchOperation;

/// Dispatcher configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Attempts for read-state and delete commits before reporting
    /// `StoreUnavailable`.
    pub max_commit_attempts: u32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_commit_attempts: 5,
        }
    }
}

/// A notification built but not yet written.
///
/// `ops` persist the entry and its inbox index; the caller commits them in
/// its own batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedNotification {
    pub event: NotificationEvent,
    pub ops: Vec<BatchOperation>,
}
