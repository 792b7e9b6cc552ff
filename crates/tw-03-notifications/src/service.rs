//! # Notification Dispatcher Service

use crate::adapters::serializer::{decode_event, encode_event};
use crate::domain::entities::{NotificationEvent, NotificationKind};
use crate::domain::errors::NotificationError;
use crate::domain::keys::{id_from_inbox_key, inbox_key, inbox_prefix, notification_key};
use crate::domain::value_objects::{DispatcherConfig, StagedNotification};
use crate::ports::inbound::NotificationApi;
use shared_types::{
    BatchOperation, DenialReason, KVStoreError, KeyValueStore, NotificationId, Precondition,
    PrincipalId, RecordId, TimeSource,
};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// An entry as read, with its committed bytes for conditional writes.
struct Loaded {
    event: NotificationEvent,
    raw: Vec<u8>,
}

/// The Notification Dispatcher.
pub struct NotificationDispatcher<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    kv_store: KV,
    time_source: TS,
    config: DispatcherConfig,
}

impl<KV, TS> NotificationDispatcher<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    pub fn new(kv_store: KV, time_source: TS, config: DispatcherConfig) -> Self {
        Self {
            kv_store,
            time_source,
            config,
        }
    }

    fn load(&self, id: &NotificationId) -> Result<Option<Loaded>, NotificationError> {
        match self.kv_store.get(&notification_key(id))? {
            Some(raw) => Ok(Some(Loaded {
                event: decode_event(&raw)?,
                raw,
            })),
            None => Ok(None),
        }
    }

    fn inbox(&self, principal: PrincipalId) -> Result<Vec<Loaded>, NotificationError> {
        let mut entries = Vec::new();
        for (key, _) in self.kv_store.prefix_scan(&inbox_prefix(principal))? {
            let Some(id) = id_from_inbox_key(&key) else {
                continue;
            };
            // An index entry without its body is skipped, never surfaced.
            if let Some(loaded) = self.load(&id)? {
                if loaded.event.is_for(principal) {
                    entries.push(loaded);
                }
            }
        }
        Ok(entries)
    }

    /// Run `attempt` until it commits without a write conflict.
    fn with_retries<T>(
        &self,
        what: &str,
        mut attempt: impl FnMut() -> Result<Result<T, KVStoreError>, NotificationError>,
    ) -> Result<T, NotificationError> {
        for n in 1..=self.config.max_commit_attempts {
            match attempt()? {
                Ok(value) => return Ok(value),
                Err(e) if e.is_conflict() => {
                    warn!(operation = what, attempt = n, "notification commit conflicted, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(NotificationError::StoreUnavailable(format!(
            "{what} stayed contended after {} attempts",
            self.config.max_commit_attempts
        )))
    }
}

impl<KV, TS> NotificationApi for NotificationDispatcher<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    fn emit(
        &self,
        recipient: PrincipalId,
        sender: Option<PrincipalId>,
        kind: NotificationKind,
        subject: RecordId,
        message: String,
    ) -> Result<NotificationEvent, NotificationError> {
        let staged = self.stage(recipient, sender, kind, subject, message)?;
        self.kv_store.atomic_batch_write(staged.ops)?;
        debug!(id = %staged.event.id, recipient = %recipient, kind = %kind, "notification emitted");
        Ok(staged.event)
    }

    fn stage(
        &self,
        recipient: PrincipalId,
        sender: Option<PrincipalId>,
        kind: NotificationKind,
        subject: RecordId,
        message: String,
    ) -> Result<StagedNotification, NotificationError> {
        let event = NotificationEvent {
            id: NotificationId::new(),
            recipient,
            sender,
            kind,
            subject,
            message,
            is_read: false,
            created_at: self.time_source.now(),
        };
        let ops = vec![
            BatchOperation::put(notification_key(&event.id), encode_event(&event)?),
            BatchOperation::put(inbox_key(recipient, &event.id), Vec::new()),
        ];
        Ok(StagedNotification { event, ops })
    }

    fn get(&self, id: NotificationId) -> Result<NotificationEvent, NotificationError> {
        self.load(&id)?
            .map(|l| l.event)
            .ok_or(NotificationError::NotFound(id))
    }

    fn list_for(&self, principal: PrincipalId) -> Result<Vec<NotificationEvent>, NotificationError> {
        let mut events: Vec<_> = self.inbox(principal)?.into_iter().map(|l| l.event).collect();
        events.sort_by(NotificationEvent::newest_first);
        Ok(events)
    }

    fn count_unread(&self, principal: PrincipalId) -> Result<usize, NotificationError> {
        Ok(self
            .inbox(principal)?
            .iter()
            .filter(|l| !l.event.is_read)
            .count())
    }

    fn mark_read(
        &self,
        id: NotificationId,
        principal: PrincipalId,
    ) -> Result<NotificationEvent, NotificationError> {
        self.with_retries("mark_read", || {
            let loaded = self.load(&id)?.ok_or(NotificationError::NotFound(id))?;
            if !loaded.event.is_for(principal) {
                return Err(NotificationError::Forbidden(DenialReason::NotRecipient));
            }
            if loaded.event.is_read {
                return Ok(Ok(loaded.event));
            }

            let key = notification_key(&id);
            let mut event = loaded.event;
            event.is_read = true;
            let write = self.kv_store.compare_and_batch_write(
                &[Precondition::unchanged(key.clone(), loaded.raw)],
                vec![BatchOperation::put(key, encode_event(&event)?)],
            );
            Ok(write.map(|_| event))
        })
    }

    fn mark_all_read(&self, principal: PrincipalId) -> Result<usize, NotificationError> {
        let count = self.with_retries("mark_all_read", || {
            let unread: Vec<Loaded> = self
                .inbox(principal)?
                .into_iter()
                .filter(|l| !l.event.is_read)
                .collect();
            if unread.is_empty() {
                return Ok(Ok(0));
            }

            let mut preconditions = Vec::with_capacity(unread.len());
            let mut ops = Vec::with_capacity(unread.len());
            for loaded in unread {
                let key = notification_key(&loaded.event.id);
                let mut event = loaded.event;
                event.is_read = true;
                ops.push(BatchOperation::put(key.clone(), encode_event(&event)?));
                preconditions.push(Precondition::unchanged(key, loaded.raw));
            }
            let count = ops.len();
            Ok(self
                .kv_store
                .compare_and_batch_write(&preconditions, ops)
                .map(|_| count))
        })?;

        debug!(principal = %principal, count, "notifications marked read");
        Ok(count)
    }

    fn delete(
        &self,
        ids: &[NotificationId],
        principal: PrincipalId,
    ) -> Result<usize, NotificationError> {
        let wanted: BTreeSet<NotificationId> = ids.iter().copied().collect();

        let count = self.with_retries("delete", || {
            let mut preconditions = Vec::new();
            let mut ops = Vec::new();
            for id in &wanted {
                let Some(loaded) = self.load(id)? else {
                    continue;
                };
                if !loaded.event.is_for(principal) {
                    continue;
                }
                let key = notification_key(id);
                ops.push(BatchOperation::delete(key.clone()));
                ops.push(BatchOperation::delete(inbox_key(principal, id)));
                preconditions.push(Precondition::unchanged(key, loaded.raw));
            }
            if preconditions.is_empty() {
                return Ok(Ok(0));
            }
            let count = preconditions.len();
            Ok(self
                .kv_store
                .compare_and_batch_write(&preconditions, ops)
                .map(|_| count))
        })?;

        debug!(principal = %principal, requested = wanted.len(), count, "notifications deleted");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{InMemoryKVStore, MockTimeSource};
    use std::sync::Arc;

    type TestDispatcher = NotificationDispatcher<Arc<InMemoryKVStore>, Arc<MockTimeSource>>;

    const OWNER: PrincipalId = PrincipalId(1);
    const OTHER: PrincipalId = PrincipalId(2);
    const MODERATOR: PrincipalId = PrincipalId(9);

    fn make_dispatcher() -> (TestDispatcher, Arc<InMemoryKVStore>, Arc<MockTimeSource>) {
        let kv = Arc::new(InMemoryKVStore::new());
        let time = Arc::new(MockTimeSource::new(100));
        let dispatcher =
            NotificationDispatcher::new(kv.clone(), time.clone(), DispatcherConfig::default());
        (dispatcher, kv, time)
    }

    fn emit_to(d: &TestDispatcher, recipient: PrincipalId) -> NotificationEvent {
        d.emit(
            recipient,
            Some(MODERATOR),
            NotificationKind::TreeFlagged,
            RecordId::new(),
            "Your Oak submission was flagged for review.".into(),
        )
        .unwrap()
    }

    #[test]
    fn test_emit_persists_unread_entry() {
        let (d, _, _) = make_dispatcher();
        let event = emit_to(&d, OWNER);

        assert!(!event.is_read);
        assert_eq!(event.created_at, 100);
        assert_eq!(d.get(event.id).unwrap(), event);
        assert_eq!(d.count_unread(OWNER).unwrap(), 1);
        assert_eq!(d.count_unread(OTHER).unwrap(), 0);
    }

    #[test]
    fn test_stage_writes_nothing() {
        let (d, kv, _) = make_dispatcher();
        let staged = d
            .stage(OWNER, None, NotificationKind::TreeDeleted, RecordId::new(), "gone".into())
            .unwrap();

        assert_eq!(staged.ops.len(), 2);
        assert!(kv.is_empty());

        kv.atomic_batch_write(staged.ops).unwrap();
        assert_eq!(d.list_for(OWNER).unwrap(), vec![staged.event]);
    }

    #[test]
    fn test_list_for_newest_first() {
        let (d, _, time) = make_dispatcher();
        let first = emit_to(&d, OWNER);
        time.advance(5);
        let second = emit_to(&d, OWNER);
        emit_to(&d, OTHER);

        let ids: Vec<_> = d.list_for(OWNER).unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_mark_read_by_recipient() {
        let (d, _, _) = make_dispatcher();
        let event = emit_to(&d, OWNER);

        let read = d.mark_read(event.id, OWNER).unwrap();
        assert!(read.is_read);
        assert_eq!(d.count_unread(OWNER).unwrap(), 0);

        // Second call is a no-op.
        assert!(d.mark_read(event.id, OWNER).unwrap().is_read);
    }

    #[test]
    fn test_mark_read_by_other_is_forbidden() {
        let (d, _, _) = make_dispatcher();
        let event = emit_to(&d, OWNER);

        assert_eq!(
            d.mark_read(event.id, OTHER),
            Err(NotificationError::Forbidden(DenialReason::NotRecipient))
        );
        assert!(!d.get(event.id).unwrap().is_read);
    }

    #[test]
    fn test_mark_read_unknown_is_not_found() {
        let (d, _, _) = make_dispatcher();
        let id = NotificationId::new();
        assert_eq!(d.mark_read(id, OWNER), Err(NotificationError::NotFound(id)));
    }

    #[test]
    fn test_mark_all_read_returns_prior_unread_count() {
        let (d, _, _) = make_dispatcher();
        let a = emit_to(&d, OWNER);
        emit_to(&d, OWNER);
        emit_to(&d, OWNER);
        emit_to(&d, OTHER);
        d.mark_read(a.id, OWNER).unwrap();

        let before = d.count_unread(OWNER).unwrap();
        assert_eq!(d.mark_all_read(OWNER).unwrap(), before);
        assert_eq!(before, 2);
        assert_eq!(d.count_unread(OWNER).unwrap(), 0);
        assert_eq!(d.count_unread(OTHER).unwrap(), 1);
        assert_eq!(d.mark_all_read(OWNER).unwrap(), 0);
    }

    #[test]
    fn test_delete_only_own_entries() {
        let (d, _, _) = make_dispatcher();
        let mine = emit_to(&d, OWNER);
        let theirs = emit_to(&d, OTHER);
        let unknown = NotificationId::new();

        let deleted = d.delete(&[mine.id, theirs.id, unknown, mine.id], OWNER).unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(d.get(mine.id), Err(NotificationError::NotFound(mine.id)));
        assert_eq!(d.get(theirs.id).unwrap(), theirs);
        assert!(d.list_for(OWNER).unwrap().is_empty());
    }

    #[test]
    fn test_delete_removes_inbox_index() {
        let (d, kv, _) = make_dispatcher();
        let event = emit_to(&d, OWNER);
        d.delete(&[event.id], OWNER).unwrap();
        assert!(kv.is_empty());
    }

    #[test]
    fn test_system_generated_sender() {
        let (d, _, _) = make_dispatcher();
        let event = d
            .emit(OWNER, None, NotificationKind::TreeDeleted, RecordId::new(), "x".into())
            .unwrap();
        assert_eq!(event.sender, None);
    }
}
