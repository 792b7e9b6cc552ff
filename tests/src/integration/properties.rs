//! # Randomized Workflow Properties
//!
//! Seeded random sequences of moderation and inbox operations from a mix
//! of standard and moderator principals. After every step the stored state
//! is checked against the workflow invariants.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::integration::harness::Harness;
    use shared_types::{DenialReason, Principal, PrincipalId, RecordId};
    use tw_01_record_store::{NewTree, RecordStoreApi, TreeRecord};
    use tw_02_moderation::{EditRequest, ModerationApi, ModerationError};
    use tw_03_notifications::NotificationApi;

    const PRINCIPALS: [Principal; 5] = [
        Principal { id: PrincipalId(1), role: shared_types::Role::Standard },
        Principal { id: PrincipalId(2), role: shared_types::Role::Standard },
        Principal { id: PrincipalId(3), role: shared_types::Role::Standard },
        Principal { id: PrincipalId(10), role: shared_types::Role::Moderator },
        Principal { id: PrincipalId(11), role: shared_types::Role::Moderator },
    ];

    fn check_record(record: &TreeRecord, previous: Option<&TreeRecord>) {
        assert!(record.flag_fields_consistent(), "flag fields leaked: {record:?}");
        if let Some(previous) = previous {
            if previous.is_deleted {
                assert_eq!(previous, record, "a deleted record changed");
            }
        }
    }

    fn run(seed: u64, steps: usize) {
        let mut rng = StdRng::seed_from_u64(seed);
        let h = Harness::new();
        let engine = &h.container.moderation;
        let records_api = &h.container.records;
        let inbox = &h.container.notifications;

        // Committed flag/unflag/delete transitions per owner.
        let mut expected_notifications: HashMap<PrincipalId, usize> = HashMap::new();
        let mut records: Vec<RecordId> = Vec::new();
        let mut last_seen: HashMap<RecordId, TreeRecord> = HashMap::new();

        for step in 0..steps {
            h.clock.advance(rng.gen_range(0..3));
            let actor = PRINCIPALS[rng.gen_range(0..PRINCIPALS.len())];

            if records.is_empty() || rng.gen_bool(0.15) {
                let species = ["Oak", "Maple", "Elm"][rng.gen_range(0..3)];
                let record = records_api
                    .create(actor.id, NewTree::new(species, 40.0, -75.0))
                    .unwrap();
                records.push(record.id);
                last_seen.insert(record.id, record);
                continue;
            }

            let id = records[rng.gen_range(0..records.len())];
            let before = records_api.get(id).unwrap();
            let owner = before.owner;

            let result = match rng.gen_range(0..6) {
                0 | 1 => engine.flag(&actor, id, "random check"),
                2 => engine.unflag(&actor, id),
                3 => engine.soft_delete(&actor, id),
                4 => engine.edit(
                    &actor,
                    id,
                    &EditRequest {
                        species: Some(format!("Species {step}")),
                        description: None,
                    },
                ),
                _ => {
                    let unread = inbox.count_unread(actor.id).unwrap();
                    assert_eq!(inbox.mark_all_read(actor.id).unwrap(), unread);
                    assert_eq!(inbox.count_unread(actor.id).unwrap(), 0);
                    continue;
                }
            };

            match result {
                Ok(outcome) => {
                    if let Some(notification) = outcome.notification {
                        assert_eq!(notification.recipient, owner);
                        assert_eq!(notification.sender, Some(actor.id));
                        *expected_notifications.entry(owner).or_default() += 1;
                    }
                    if outcome.record.is_flagged && !before.is_flagged {
                        assert_ne!(actor.id, owner, "owner flagged their own record");
                    }
                }
                Err(ModerationError::Forbidden(reason)) => {
                    assert_eq!(records_api.get(id).unwrap(), before, "denied call mutated");
                    if before.is_deleted {
                        assert!(matches!(
                            reason,
                            DenialReason::RecordDeleted
                                | DenialReason::AlreadyDeleted
                                | DenialReason::ModeratorOnly
                                | DenialReason::OwnSubmission
                        ));
                    }
                }
                Err(other) => panic!("unexpected error at step {step}: {other}"),
            }

            let after = records_api.get(id).unwrap();
            check_record(&after, last_seen.get(&id));
            last_seen.insert(id, after);
        }

        for principal in PRINCIPALS {
            let expected = expected_notifications
                .get(&principal.id)
                .copied()
                .unwrap_or(0);
            assert_eq!(inbox.list_for(principal.id).unwrap().len(), expected);
        }
    }

    #[test]
    fn test_random_workflows_keep_invariants() {
        for seed in 0..20 {
            run(seed, 300);
        }
    }
}
