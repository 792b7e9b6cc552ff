//! # Moderation Engine
//!
//! lookup → authorize → validate input → mutate → stage notification → one
//! conditional commit. A conflicting commit restarts from a fresh read so the
//! Guard always judges the committed state.

use crate::domain::errors::ModerationError;
use crate::domain::guard::{authorize, authorize_named, Action, Decision};
use crate::domain::transitions;
use crate::domain::value_objects::{EditRequest, ModerationConfig, TransitionOutcome};
use crate::ports::inbound::ModerationApi;
use shared_types::{Principal, RecordId, TimeSource, Timestamp};
use tracing::{debug, info, warn};
use tw_01_record_store::{RecordStoreApi, RecordStoreError, TreeRecord};
use tw_03_notifications::{render_message, NotificationApi};

/// The Moderation Engine.
pub struct ModerationEngine<RS, N, TS>
where
    RS: RecordStoreApi,
    N: NotificationApi,
    TS: TimeSource,
{
    records: RS,
    notifications: N,
    time_source: TS,
    config: ModerationConfig,
}

impl<RS, N, TS> ModerationEngine<RS, N, TS>
where
    RS: RecordStoreApi,
    N: NotificationApi,
    TS: TimeSource,
{
    /// `records` and `notifications` must persist through the same store.
    pub fn new(records: RS, notifications: N, time_source: TS, config: ModerationConfig) -> Self {
        Self {
            records,
            notifications,
            time_source,
            config,
        }
    }

    pub fn config(&self) -> &ModerationConfig {
        &self.config
    }

    fn transition(
        &self,
        principal: &Principal,
        record_id: RecordId,
        action: Action,
        reason: &str,
        apply: impl Fn(&TreeRecord, Timestamp) -> Result<TreeRecord, ModerationError>,
    ) -> Result<TransitionOutcome, ModerationError> {
        for attempt in 1..=self.config.max_commit_attempts {
            let snapshot = self.records.snapshot(record_id)?;

            if let Decision::Denied(denial) = authorize(principal, action, &snapshot.record) {
                debug!(
                    record = %record_id,
                    principal = %principal.id,
                    action = %action,
                    reason = ?denial,
                    "moderation action denied"
                );
                return Err(ModerationError::Forbidden(denial));
            }

            // Input is validated only after the Guard allows the call.
            let next = apply(&snapshot.record, self.time_source.now())?;

            let staged = match transitions::notification_kind(action) {
                Some(kind) => Some(self.notifications.stage(
                    snapshot.record.owner,
                    Some(principal.id),
                    kind,
                    record_id,
                    render_message(kind, &snapshot.record.species, reason),
                )?),
                None => None,
            };
            let extra_ops = staged.as_ref().map(|s| s.ops.clone()).unwrap_or_default();

            match self.records.commit(&snapshot, next, extra_ops) {
                Ok(record) => {
                    info!(
                        record = %record_id,
                        principal = %principal.id,
                        action = %action,
                        version = record.version,
                        "moderation action committed"
                    );
                    return Ok(TransitionOutcome {
                        record,
                        notification: staged.map(|s| s.event),
                    });
                }
                Err(RecordStoreError::Conflict(_)) => {
                    warn!(
                        record = %record_id,
                        action = %action,
                        attempt,
                        "record changed during moderation, re-evaluating"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ModerationError::StoreUnavailable(format!(
            "record {record_id} stayed contended after {} attempts",
            self.config.max_commit_attempts
        )))
    }
}

impl<RS, N, TS> ModerationApi for ModerationEngine<RS, N, TS>
where
    RS: RecordStoreApi,
    N: NotificationApi,
    TS: TimeSource,
{
    fn flag(
        &self,
        principal: &Principal,
        record_id: RecordId,
        reason: &str,
    ) -> Result<TransitionOutcome, ModerationError> {
        self.transition(principal, record_id, Action::Flag, reason, |r, now| {
            self.config.validate_reason(reason)?;
            Ok(transitions::flag(r, principal.id, reason, now))
        })
    }

    fn unflag(
        &self,
        principal: &Principal,
        record_id: RecordId,
    ) -> Result<TransitionOutcome, ModerationError> {
        self.transition(principal, record_id, Action::Unflag, "", |r, _| {
            Ok(transitions::unflag(r))
        })
    }

    fn soft_delete(
        &self,
        principal: &Principal,
        record_id: RecordId,
    ) -> Result<TransitionOutcome, ModerationError> {
        self.transition(principal, record_id, Action::Delete, "", |r, _| {
            Ok(transitions::soft_delete(r))
        })
    }

    fn edit(
        &self,
        principal: &Principal,
        record_id: RecordId,
        request: &EditRequest,
    ) -> Result<TransitionOutcome, ModerationError> {
        self.transition(principal, record_id, Action::Edit, "", |r, _| {
            self.config.validate_edit(request)?;
            Ok(transitions::edit(r, request))
        })
    }

    fn check(
        &self,
        principal: &Principal,
        record_id: RecordId,
        action: &str,
    ) -> Result<Decision, ModerationError> {
        let record = self.records.get(record_id)?;
        Ok(authorize_named(principal, action, &record))
    }
}
