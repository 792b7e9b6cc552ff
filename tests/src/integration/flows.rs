//! # Integration Test Flows
//!
//! End-to-end moderation scenarios driven through `TreewatchApp`, checked
//! against the Record Store, the Notification Dispatcher and the event bus.
//!
//! ## Flows Tested:
//!
//! 1. **Flag → Unflag**: a community flag, a rejected owner unflag, a moderator unflag
//! 2. **Double delete**: the second delete is refused and emits nothing
//! 3. **Round-trip**: flag then unflag restores the lifecycle fields exactly
//! 4. **Inbox housekeeping**: read state and deletion scoped to the recipient

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use crate::integration::harness::{alice, bob, carol, moderator, oak, Harness};
    use app_runtime::ApiError;
    use shared_bus::{EventFilter, EventTopic, TreewatchEvent};
    use shared_types::{DenialReason, KeyValueStore, NotificationId, PrincipalId};
    use tw_01_record_store::{NewTree, RecordStoreApi};
    use tw_02_moderation::EditRequest;
    use tw_03_notifications::{NotificationApi, NotificationKind};

    // =========================================================================
    // SCENARIO: FLAG, REJECTED UNFLAG, MODERATOR UNFLAG
    // =========================================================================

    #[tokio::test]
    async fn test_flag_then_moderator_unflag() {
        let h = Harness::new();
        let r = h.app.submit(&alice(), oak()).await.unwrap();

        let view = h.app.flag(&bob(), r, "looks fake").await.unwrap();
        assert!(view.is_flagged);
        let record = h.container.records.get(r).unwrap();
        assert!(record.is_flagged);
        assert_eq!(record.flagged_by, Some(PrincipalId(2)));
        assert_eq!(record.flag_reason, "looks fake");

        let err = h.app.unflag(&alice(), r).await.unwrap_err();
        assert_eq!(err, ApiError::Forbidden(DenialReason::ModeratorOnly));
        assert!(h.container.records.get(r).unwrap().is_flagged);

        h.clock.advance(60_000);
        h.app.unflag(&moderator(), r).await.unwrap();

        let inbox = h.app.notifications_for(&alice()).await.unwrap();
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[0].kind, NotificationKind::TreeUnflagged);
        assert_eq!(inbox[0].sender, Some(moderator().id));
        assert_eq!(
            inbox[0].message,
            "Your White Oak submission was reviewed and restored."
        );
        assert_eq!(inbox[1].kind, NotificationKind::TreeFlagged);
        assert_eq!(inbox[1].sender, Some(PrincipalId(2)));
        assert_eq!(
            inbox[1].message,
            "Your White Oak submission was flagged for review. Reason: looks fake"
        );

        // Nobody else was notified.
        assert!(h.app.notifications_for(&bob()).await.unwrap().is_empty());
        assert!(h.app.notifications_for(&moderator()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_owner_can_never_flag_own_record() {
        let h = Harness::new();
        let r = h.app.submit(&alice(), oak()).await.unwrap();

        let err = h.app.flag(&alice(), r, "").await.unwrap_err();
        assert_eq!(err, ApiError::Forbidden(DenialReason::OwnSubmission));

        // Holds for moderators flagging their own submission too.
        let m = moderator();
        let own = h.app.submit(&m, oak()).await.unwrap();
        let err = h.app.flag(&m, own, "").await.unwrap_err();
        assert_eq!(err, ApiError::Forbidden(DenialReason::OwnSubmission));
    }

    #[tokio::test]
    async fn test_reflag_is_refused_until_unflagged() {
        let h = Harness::new();
        let r = h.app.submit(&alice(), oak()).await.unwrap();

        h.app.flag(&bob(), r, "wrong species").await.unwrap();
        let err = h.app.flag(&carol(), r, "also wrong").await.unwrap_err();
        assert_eq!(err, ApiError::Forbidden(DenialReason::AlreadyFlagged));
        assert_eq!(h.container.records.get(r).unwrap().flag_reason, "wrong species");

        h.app.unflag(&moderator(), r).await.unwrap();
        h.app.flag(&carol(), r, "also wrong").await.unwrap();
        assert_eq!(h.app.count_unread(&alice()).await.unwrap(), 3);
    }

    // =========================================================================
    // SCENARIO: DOUBLE DELETE
    // =========================================================================

    #[tokio::test]
    async fn test_double_delete_emits_one_notification() {
        let h = Harness::new();
        let r = h.app.submit(&alice(), oak()).await.unwrap();

        h.app.soft_delete(&moderator(), r).await.unwrap();
        let err = h.app.soft_delete(&moderator(), r).await.unwrap_err();
        assert_eq!(err, ApiError::Forbidden(DenialReason::AlreadyDeleted));

        let deletions: Vec<_> = h
            .app
            .notifications_for(&alice())
            .await
            .unwrap()
            .into_iter()
            .filter(|n| n.kind == NotificationKind::TreeDeleted)
            .collect();
        assert_eq!(deletions.len(), 1);
    }

    #[tokio::test]
    async fn test_deleted_record_is_terminal() {
        let h = Harness::new();
        let r = h.app.submit(&alice(), oak()).await.unwrap();
        h.app.flag(&bob(), r, "spam").await.unwrap();
        h.app.soft_delete(&moderator(), r).await.unwrap();
        let before = h.container.records.get(r).unwrap();

        assert_eq!(
            h.app.flag(&carol(), r, "").await.unwrap_err(),
            ApiError::Forbidden(DenialReason::RecordDeleted)
        );
        assert_eq!(
            h.app.unflag(&moderator(), r).await.unwrap_err(),
            ApiError::Forbidden(DenialReason::RecordDeleted)
        );
        let edit = EditRequest {
            species: Some("Pin Oak".into()),
            description: None,
        };
        assert_eq!(
            h.app.edit(&moderator(), r, edit).await.unwrap_err(),
            ApiError::Forbidden(DenialReason::RecordDeleted)
        );

        let after = h.container.records.get(r).unwrap();
        assert_eq!(before, after);
        // Flag metadata survives deletion.
        assert!(after.is_deleted && after.is_flagged);
        assert_eq!(after.flag_reason, "spam");
        assert!(h.app.list_active().await.unwrap().is_empty());
        assert!(h.app.list_flagged().await.unwrap().is_empty());
    }

    // =========================================================================
    // ROUND-TRIP
    // =========================================================================

    #[tokio::test]
    async fn test_flag_unflag_round_trip_restores_lifecycle() {
        let h = Harness::new();
        let r = h.app.submit(&alice(), oak()).await.unwrap();
        let before = h.container.records.get(r).unwrap().lifecycle_fields();

        h.app.flag(&moderator(), r, "reason").await.unwrap();
        h.clock.advance(5_000);
        h.app.unflag(&moderator(), r).await.unwrap();

        let after = h.container.records.get(r).unwrap().lifecycle_fields();
        assert_eq!(before, after);

        let kinds: Vec<_> = h
            .container
            .notifications
            .list_for(alice().id)
            .unwrap()
            .into_iter()
            .map(|n| n.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::TreeUnflagged, NotificationKind::TreeFlagged]
        );
    }

    // =========================================================================
    // NO PARTIAL APPLICATION
    // =========================================================================

    #[tokio::test]
    async fn test_refused_transitions_write_nothing() {
        let h = Harness::new();
        let r = h.app.submit(&alice(), oak()).await.unwrap();
        let snapshot = h.store.prefix_scan(b"").unwrap();

        let _ = h.app.flag(&alice(), r, "").await;
        let _ = h.app.unflag(&bob(), r).await;
        let _ = h.app.soft_delete(&bob(), r).await;
        let _ = h
            .app
            .edit(&bob(), r, EditRequest {
                species: Some("Elm".into()),
                description: None,
            })
            .await;
        let long_reason = "x".repeat(10_000);
        let _ = h.app.flag(&bob(), r, &long_reason).await;

        assert_eq!(h.store.prefix_scan(b"").unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_error_precedence_is_lookup_then_guard_then_input() {
        let h = Harness::new();
        let missing = shared_types::RecordId::new();
        let err = h
            .app
            .edit(&moderator(), missing, EditRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "not_found");

        let r = h.app.submit(&alice(), oak()).await.unwrap();
        let long_reason = "x".repeat(10_000);
        let err = h.app.flag(&alice(), r, &long_reason).await.unwrap_err();
        assert_eq!(err, ApiError::Forbidden(DenialReason::OwnSubmission));

        let err = h.app.flag(&bob(), r, &long_reason).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_input");

        h.app.soft_delete(&moderator(), r).await.unwrap();
        let err = h
            .app
            .edit(&moderator(), r, EditRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Forbidden(DenialReason::RecordDeleted));
    }

    // =========================================================================
    // INBOX HOUSEKEEPING
    // =========================================================================

    #[tokio::test]
    async fn test_mark_all_read_returns_prior_unread_count() {
        let h = Harness::new();
        for i in 0..4 {
            let r = h
                .app
                .submit(&alice(), NewTree::new(format!("Tree {i}"), 10.0, 10.0))
                .await
                .unwrap();
            h.app.flag(&bob(), r, "").await.unwrap();
            h.clock.advance(10);
        }
        let inbox = h.app.notifications_for(&alice()).await.unwrap();
        h.app.mark_read(&alice(), inbox[1].id).await.unwrap();

        let unread_before = h.app.count_unread(&alice()).await.unwrap();
        assert_eq!(unread_before, 3);
        assert_eq!(h.app.mark_all_read(&alice()).await.unwrap(), unread_before);
        assert_eq!(h.app.count_unread(&alice()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_notifications_only_touches_own_entries() {
        let h = Harness::new();
        let a = h.app.submit(&alice(), oak()).await.unwrap();
        let b = h.app.submit(&bob(), oak()).await.unwrap();
        h.app.flag(&carol(), a, "").await.unwrap();
        h.app.flag(&carol(), b, "").await.unwrap();

        let mut ids: Vec<NotificationId> = h
            .app
            .notifications_for(&bob())
            .await
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        ids.push(NotificationId::new());

        // Alice asks to delete Bob's entry plus an unknown id.
        assert_eq!(h.app.delete_notifications(&alice(), ids.clone()).await.unwrap(), 0);
        assert_eq!(h.app.notifications_for(&bob()).await.unwrap().len(), 1);

        assert_eq!(h.app.delete_notifications(&bob(), ids).await.unwrap(), 1);
        assert!(h.app.notifications_for(&bob()).await.unwrap().is_empty());
        assert_eq!(h.app.notifications_for(&alice()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dangling_subject_renders_as_unknown() {
        let h = Harness::new();
        let r = h.app.submit(&alice(), oak()).await.unwrap();
        h.app.flag(&bob(), r, "").await.unwrap();

        // An unrelated process hard-removes the record.
        h.store
            .delete(&tw_01_record_store::domain::keys::record_key(&r))
            .unwrap();

        let inbox = h.app.notifications_for(&alice()).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].subject, None);
        assert!(inbox[0].message.contains("White Oak"));
    }

    // =========================================================================
    // EVENT BUS
    // =========================================================================

    #[tokio::test]
    async fn test_transitions_publish_events_in_commit_order() {
        let h = Harness::new();
        let mut sub = h
            .container
            .event_bus
            .subscribe(EventFilter::topics(vec![EventTopic::Moderation]));

        let r = h.app.submit(&alice(), oak()).await.unwrap();
        h.app.flag(&bob(), r, "odd").await.unwrap();
        h.app.unflag(&moderator(), r).await.unwrap();
        h.app
            .edit(&moderator(), r, EditRequest {
                species: None,
                description: Some("Fixed".into()),
            })
            .await
            .unwrap();
        h.app.soft_delete(&moderator(), r).await.unwrap();

        let mut names = Vec::new();
        for _ in 0..4 {
            let event = timeout(Duration::from_millis(100), sub.recv())
                .await
                .expect("timeout waiting for event")
                .expect("bus closed");
            assert_eq!(event.record_id(), Some(r));
            names.push(match event {
                TreewatchEvent::TreeFlagged { .. } => "flagged",
                TreewatchEvent::TreeUnflagged { .. } => "unflagged",
                TreewatchEvent::TreeEdited { .. } => "edited",
                TreewatchEvent::TreeDeleted { .. } => "deleted",
                other => panic!("unexpected event {other:?}"),
            });
        }
        assert_eq!(names, vec!["flagged", "unflagged", "edited", "deleted"]);
    }

    // =========================================================================
    // DURABLE BACKEND
    // =========================================================================

    #[cfg(feature = "rocksdb")]
    #[tokio::test]
    async fn test_rocksdb_flow_survives_restart() {
        use app_runtime::container::{AppConfig, ServiceContainer, StorageBackend};
        use app_runtime::TreewatchApp;
        use std::sync::Arc;

        let dir = tempfile::TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::RocksDb;
        config.storage.data_dir = dir.path().to_path_buf();
        config.storage.sync_writes = false;

        let r = {
            let app = TreewatchApp::new(Arc::new(ServiceContainer::new(config.clone()).unwrap()));
            let r = app.submit(&alice(), oak()).await.unwrap();
            app.flag(&bob(), r, "check").await.unwrap();
            r
        };

        let app = TreewatchApp::new(Arc::new(ServiceContainer::new(config).unwrap()));
        let flagged = app.list_flagged().await.unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].id, r);
        assert_eq!(app.count_unread(&alice()).await.unwrap(), 1);
    }
}
