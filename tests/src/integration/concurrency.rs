//! # Concurrency Tests
//!
//! Racing transitions on one record, driven from OS threads straight into
//! the Moderation Engine so the commits genuinely interleave.
//!
//! Every race must end in a state some serial order could have produced,
//! with exactly one notification per committed flag/unflag/delete.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use crate::integration::harness::{alice, moderator, oak, Harness};
    use shared_types::{DenialReason, Principal, RecordId};
    use tw_01_record_store::RecordStoreApi;
    use tw_02_moderation::{ModerationApi, ModerationError, TransitionOutcome};
    use tw_03_notifications::{NotificationApi, NotificationKind};

    fn submit(h: &Harness) -> RecordId {
        h.container.records.create(alice().id, oak()).unwrap().id
    }

    type Outcome = Result<TransitionOutcome, ModerationError>;
    type Action = Box<dyn FnOnce(&Harness) -> Outcome + Send>;

    fn action(f: impl FnOnce(&Harness) -> Outcome + Send + 'static) -> Action {
        Box::new(f)
    }

    /// Run each action on its own thread, released together.
    fn race(h: &Harness, actions: Vec<Action>) -> Vec<Outcome> {
        let barrier = Arc::new(Barrier::new(actions.len()));
        thread::scope(|scope| {
            let handles: Vec<_> = actions
                .into_iter()
                .map(|act| {
                    let barrier = Arc::clone(&barrier);
                    scope.spawn(move || {
                        barrier.wait();
                        act(h)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        })
    }

    #[test]
    fn test_two_concurrent_flags_one_wins() {
        for _ in 0..25 {
            let h = Harness::new();
            let r = submit(&h);

            let results = race(
                &h,
                vec![
                    action(move |h| h.container.moderation.flag(&Principal::standard(2), r, "a")),
                    action(move |h| h.container.moderation.flag(&Principal::standard(3), r, "b")),
                ],
            );

            let wins = results.iter().filter(|r| r.is_ok()).count();
            assert_eq!(wins, 1);
            let loser = results.iter().find_map(|r| r.as_ref().err()).unwrap();
            assert_eq!(loser, &ModerationError::Forbidden(DenialReason::AlreadyFlagged));

            let inbox = h.container.notifications.list_for(alice().id).unwrap();
            assert_eq!(inbox.len(), 1);
            assert_eq!(inbox[0].kind, NotificationKind::TreeFlagged);

            let record = h.container.records.get(r).unwrap();
            assert_eq!(inbox[0].sender, record.flagged_by);
        }
    }

    #[test]
    fn test_many_flaggers_one_notification() {
        let h = Harness::new();
        let r = submit(&h);

        let actions = (10..18u64)
            .map(|id| {
                action(move |h| h.container.moderation.flag(&Principal::standard(id), r, ""))
            })
            .collect();
        let results = race(&h, actions);

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(h.container.notifications.count_unread(alice().id).unwrap(), 1);
    }

    #[test]
    fn test_delete_racing_flag_is_consistent() {
        for _ in 0..25 {
            let h = Harness::new();
            let r = submit(&h);

            let results = race(
                &h,
                vec![
                    action(move |h| h.container.moderation.flag(&Principal::standard(2), r, "x")),
                    action(move |h| h.container.moderation.soft_delete(&moderator(), r)),
                ],
            );

            let record = h.container.records.get(r).unwrap();
            assert!(record.is_deleted);
            assert!(results[1].is_ok(), "delete always commits");

            let kinds: Vec<_> = h
                .container
                .notifications
                .list_for(alice().id)
                .unwrap()
                .into_iter()
                .map(|n| n.kind)
                .collect();

            match &results[0] {
                // Flag committed first; delete kept its metadata.
                Ok(_) => {
                    assert!(record.is_flagged);
                    assert_eq!(kinds.len(), 2);
                    assert!(kinds.contains(&NotificationKind::TreeFlagged));
                    assert!(kinds.contains(&NotificationKind::TreeDeleted));
                }
                // Delete committed first; the flag was re-checked and refused.
                Err(err) => {
                    assert_eq!(err, &ModerationError::Forbidden(DenialReason::RecordDeleted));
                    assert!(!record.is_flagged);
                    assert_eq!(kinds, vec![NotificationKind::TreeDeleted]);
                }
            }
        }
    }

    #[test]
    fn test_concurrent_deletes_emit_once() {
        let h = Harness::new();
        let r = submit(&h);

        let results = race(
            &h,
            vec![
                action(move |h| h.container.moderation.soft_delete(&Principal::moderator(100), r)),
                action(move |h| h.container.moderation.soft_delete(&Principal::moderator(101), r)),
                action(move |h| h.container.moderation.soft_delete(&Principal::moderator(102), r)),
            ],
        );

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|e| {
            *e == ModerationError::Forbidden(DenialReason::AlreadyDeleted)
        }));
        assert_eq!(h.container.notifications.list_for(alice().id).unwrap().len(), 1);
    }

    #[test]
    fn test_transitions_on_different_records_do_not_interfere() {
        let h = Harness::new();
        let records: Vec<RecordId> = (0..6).map(|_| submit(&h)).collect();

        let actions = records
            .iter()
            .enumerate()
            .map(|(i, &r)| {
                action(move |h| {
                    h.container.moderation.flag(&Principal::standard(50 + i as u64), r, "")
                })
            })
            .collect();
        let results = race(&h, actions);

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(h.container.notifications.count_unread(alice().id).unwrap(), 6);
    }

    #[test]
    fn test_mark_all_read_racing_delete_never_resurrects() {
        for _ in 0..10 {
            let h = Harness::new();
            for _ in 0..5 {
                let r = submit(&h);
                h.container.moderation.flag(&Principal::standard(2), r, "").unwrap();
            }
            let ids: Vec<_> = h
                .container
                .notifications
                .list_for(alice().id)
                .unwrap()
                .iter()
                .map(|n| n.id)
                .collect();

            let barrier = Barrier::new(2);
            let (read, deleted) = thread::scope(|scope| {
                let reader = scope.spawn(|| {
                    barrier.wait();
                    h.container.notifications.mark_all_read(alice().id).unwrap()
                });
                let deleter = scope.spawn(|| {
                    barrier.wait();
                    h.container.notifications.delete(&ids, alice().id).unwrap()
                });
                (reader.join().unwrap(), deleter.join().unwrap())
            });

            assert_eq!(deleted, 5);
            assert!(read <= 5);
            assert!(h.container.notifications.list_for(alice().id).unwrap().is_empty());
            assert_eq!(h.container.notifications.count_unread(alice().id).unwrap(), 0);
        }
    }
}
