//! # Treewatch Application Facade
//!
//! ## Call Flow
//!
//! ```text
//! HTTP layer ──► TreewatchApp ──spawn_blocking──► Record Store / Engine / Dispatcher
//!                     │                                   │
//!                     │◄──────────── committed ───────────┘
//!                     ▼
//!                 Event Bus ──► AuditHandler
//! ```
//!
//! Subsystem calls may block on storage I/O, so they run on tokio's
//! blocking pool. Events are published only after the commit returned.

use std::collections::HashMap;
use std::sync::Arc;

use shared_bus::{EventPublisher, TreewatchEvent};
use shared_types::{NotificationId, Principal, RecordId};
use tracing::{debug, instrument};
use tw_01_record_store::{NewTree, RecordFilter, RecordStoreApi, RecordSummary, TreeRecord};
use tw_02_moderation::{Decision, EditRequest, ModerationApi, TransitionOutcome};
use tw_03_notifications::{NotificationApi, NotificationEvent};

use crate::api::errors::ApiError;
use crate::api::views::{FlaggedView, NotificationView, SubmissionView};
use crate::container::ServiceContainer;

/// Boundary operations exposed to the rest of the application.
#[derive(Clone)]
pub struct TreewatchApp {
    container: Arc<ServiceContainer>,
}

impl TreewatchApp {
    pub fn new(container: Arc<ServiceContainer>) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &Arc<ServiceContainer> {
        &self.container
    }

    async fn run_blocking<T, F>(&self, op: &'static str, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&ServiceContainer) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let container = Arc::clone(&self.container);
        tokio::task::spawn_blocking(move || f(&container))
            .await
            .map_err(|e| ApiError::StoreUnavailable(format!("{op} task failed: {e}")))?
    }

    async fn publish(&self, event: TreewatchEvent) {
        let topic = event.topic();
        let receivers = self.container.event_bus.publish(event).await;
        debug!(?topic, receivers, "Published post-commit event");
    }

    async fn list_records(
        &self,
        op: &'static str,
        filter: RecordFilter,
    ) -> Result<Vec<TreeRecord>, ApiError> {
        self.run_blocking(op, move |c| Ok(c.records.list(&filter)?))
            .await
    }

    // =========================================================================
    // SUBMISSIONS
    // =========================================================================

    /// Submit a new tree owned by `owner`.
    #[instrument(skip_all, fields(owner = %owner.id))]
    pub async fn submit(&self, owner: &Principal, input: NewTree) -> Result<RecordId, ApiError> {
        let owner_id = owner.id;
        let record = self
            .run_blocking("submit", move |c| Ok(c.records.create(owner_id, input)?))
            .await?;

        self.publish(TreewatchEvent::TreeSubmitted {
            record_id: record.id,
            owner: record.owner,
            species: record.species.clone(),
        })
        .await;
        Ok(record.id)
    }

    /// Every non-deleted submission, oldest first.
    pub async fn list_active(&self) -> Result<Vec<SubmissionView>, ApiError> {
        let records = self.list_records("list_active", RecordFilter::AllActive).await?;
        Ok(records.iter().map(SubmissionView::from).collect())
    }

    /// The moderation queue: flagged, non-deleted submissions.
    pub async fn list_flagged(&self) -> Result<Vec<FlaggedView>, ApiError> {
        let records = self
            .list_records("list_flagged", RecordFilter::FlaggedActive)
            .await?;
        Ok(records.iter().map(FlaggedView::from).collect())
    }

    /// Non-deleted submissions of `principal`.
    pub async fn list_owned(&self, principal: &Principal) -> Result<Vec<SubmissionView>, ApiError> {
        let records = self
            .list_records("list_owned", RecordFilter::OwnedBy(principal.id))
            .await?;
        Ok(records
            .iter()
            .filter(|r| !r.is_deleted)
            .map(SubmissionView::from)
            .collect())
    }

    /// Distinct species of non-deleted submissions, sorted.
    pub async fn list_species(&self) -> Result<Vec<String>, ApiError> {
        self.run_blocking("list_species", |c| Ok(c.records.species()?))
            .await
    }

    /// Non-deleted submissions of one species.
    pub async fn list_by_species(&self, species: &str) -> Result<Vec<SubmissionView>, ApiError> {
        let records = self
            .list_records("list_by_species", RecordFilter::Species(species.to_string()))
            .await?;
        Ok(records.iter().map(SubmissionView::from).collect())
    }

    /// Status breakdown over every stored submission.
    pub async fn summary(&self) -> Result<RecordSummary, ApiError> {
        self.run_blocking("summary", |c| Ok(c.records.summary()?))
            .await
    }

    // =========================================================================
    // MODERATION
    // =========================================================================

    /// Flag a submission for review.
    #[instrument(skip_all, fields(principal = %principal.id, record = %record_id))]
    pub async fn flag(
        &self,
        principal: &Principal,
        record_id: RecordId,
        reason: &str,
    ) -> Result<SubmissionView, ApiError> {
        let actor = *principal;
        let reason = reason.to_string();
        let outcome = self
            .run_blocking("flag", move |c| {
                Ok(c.moderation.flag(&actor, record_id, &reason)?)
            })
            .await?;

        if let Some(notification) = &outcome.notification {
            self.publish(TreewatchEvent::TreeFlagged {
                record_id,
                owner: outcome.record.owner,
                flagged_by: actor.id,
                reason: outcome.record.flag_reason.clone(),
                notification_id: notification.id,
            })
            .await;
        }
        Ok(SubmissionView::from(&outcome.record))
    }

    /// Clear a flag. Moderators only.
    #[instrument(skip_all, fields(principal = %principal.id, record = %record_id))]
    pub async fn unflag(
        &self,
        principal: &Principal,
        record_id: RecordId,
    ) -> Result<SubmissionView, ApiError> {
        let actor = *principal;
        let outcome = self
            .run_blocking("unflag", move |c| Ok(c.moderation.unflag(&actor, record_id)?))
            .await?;

        if let Some(notification) = &outcome.notification {
            self.publish(TreewatchEvent::TreeUnflagged {
                record_id,
                owner: outcome.record.owner,
                moderator: actor.id,
                notification_id: notification.id,
            })
            .await;
        }
        Ok(SubmissionView::from(&outcome.record))
    }

    /// Soft delete a submission. Moderators only.
    #[instrument(skip_all, fields(principal = %principal.id, record = %record_id))]
    pub async fn soft_delete(&self, principal: &Principal, record_id: RecordId) -> Result<(), ApiError> {
        let actor = *principal;
        let outcome: TransitionOutcome = self
            .run_blocking("soft_delete", move |c| {
                Ok(c.moderation.soft_delete(&actor, record_id)?)
            })
            .await?;

        if let Some(notification) = &outcome.notification {
            self.publish(TreewatchEvent::TreeDeleted {
                record_id,
                owner: outcome.record.owner,
                moderator: actor.id,
                notification_id: notification.id,
            })
            .await;
        }
        Ok(())
    }

    /// Overwrite species and/or description. Moderators only.
    #[instrument(skip_all, fields(principal = %principal.id, record = %record_id))]
    pub async fn edit(
        &self,
        principal: &Principal,
        record_id: RecordId,
        request: EditRequest,
    ) -> Result<SubmissionView, ApiError> {
        let actor = *principal;
        let outcome = self
            .run_blocking("edit", move |c| {
                Ok(c.moderation.edit(&actor, record_id, &request)?)
            })
            .await?;

        self.publish(TreewatchEvent::TreeEdited {
            record_id,
            moderator: actor.id,
        })
        .await;
        Ok(SubmissionView::from(&outcome.record))
    }

    /// Whether `principal` may perform `action` on the committed record.
    ///
    /// Used by the presentation layer to decide which controls to show.
    pub async fn can_perform(
        &self,
        principal: &Principal,
        record_id: RecordId,
        action: &str,
    ) -> Result<Decision, ApiError> {
        let actor = *principal;
        let action = action.to_string();
        self.run_blocking("can_perform", move |c| {
            Ok(c.moderation.check(&actor, record_id, &action)?)
        })
        .await
    }

    // =========================================================================
    // NOTIFICATIONS
    // =========================================================================

    /// The inbox of `principal`, newest first.
    pub async fn notifications_for(
        &self,
        principal: &Principal,
    ) -> Result<Vec<NotificationView>, ApiError> {
        let recipient = principal.id;
        self.run_blocking("notifications_for", move |c| {
            let events: Vec<NotificationEvent> = c.notifications.list_for(recipient)?;
            let mut known: HashMap<RecordId, bool> = HashMap::new();
            let mut views = Vec::with_capacity(events.len());
            for event in &events {
                let exists = match known.get(&event.subject) {
                    Some(exists) => *exists,
                    None => {
                        let exists = c.records.exists(event.subject)?;
                        known.insert(event.subject, exists);
                        exists
                    }
                };
                views.push(NotificationView::new(event, exists));
            }
            Ok(views)
        })
        .await
    }

    /// Unread entries in the inbox of `principal`.
    pub async fn count_unread(&self, principal: &Principal) -> Result<usize, ApiError> {
        let recipient = principal.id;
        self.run_blocking("count_unread", move |c| {
            Ok(c.notifications.count_unread(recipient)?)
        })
        .await
    }

    /// Mark one entry read. Only its recipient may do so.
    pub async fn mark_read(
        &self,
        principal: &Principal,
        notification_id: NotificationId,
    ) -> Result<(), ApiError> {
        let recipient = principal.id;
        let was_unread = self
            .run_blocking("mark_read", move |c| {
                let before = c.notifications.get(notification_id)?;
                c.notifications.mark_read(notification_id, recipient)?;
                Ok(!before.is_read)
            })
            .await?;

        if was_unread {
            self.publish(TreewatchEvent::NotificationsRead {
                recipient,
                count: 1,
            })
            .await;
        }
        Ok(())
    }

    /// Mark the whole inbox read; returns how many entries changed.
    pub async fn mark_all_read(&self, principal: &Principal) -> Result<usize, ApiError> {
        let recipient = principal.id;
        let count = self
            .run_blocking("mark_all_read", move |c| {
                Ok(c.notifications.mark_all_read(recipient)?)
            })
            .await?;

        if count > 0 {
            self.publish(TreewatchEvent::NotificationsRead { recipient, count })
                .await;
        }
        Ok(count)
    }

    /// Delete the entries of `ids` addressed to `principal`; returns how
    /// many were deleted.
    pub async fn delete_notifications(
        &self,
        principal: &Principal,
        ids: Vec<NotificationId>,
    ) -> Result<usize, ApiError> {
        let recipient = principal.id;
        let count = self
            .run_blocking("delete_notifications", move |c| {
                Ok(c.notifications.delete(&ids, recipient)?)
            })
            .await?;

        if count > 0 {
            self.publish(TreewatchEvent::NotificationsDeleted { recipient, count })
                .await;
        }
        Ok(count)
    }
}
