// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciling a fetched message history with the local thread.
//!
//! The merged thread is laid out as:
//! 1. server-confirmed messages in the order the server returned them,
//! 2. locally confirmed messages the server did not return,
//! 3. pending and failed messages in submission order.
//!
//! Entries already known locally keep their `local_id`. Pending and failed
//! entries are never dropped.

use std::collections::{HashMap, HashSet};

use portal_core::types::{MessageId, MessageRecord};
use portal_core::{JobId, LocalId};
use tracing::debug;

use crate::message::ThreadMessage;

pub(crate) fn merge_history(
    existing: &[ThreadMessage],
    job_id: JobId,
    records: &[MessageRecord],
    mut allocate: impl FnMut() -> LocalId,
) -> Vec<ThreadMessage> {
    let known: HashMap<MessageId, LocalId> = existing
        .iter()
        .filter_map(|m| m.server_id().map(|id| (id, m.local_id)))
        .collect();

    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(existing.len() + records.len());

    for record in records {
        if record.job_id != job_id {
            debug!(%job_id, other = %record.job_id, id = %record.id, "skipping message for another job");
            continue;
        }
        if !seen.insert(record.id) {
            continue;
        }
        let local_id = known.get(&record.id).copied().unwrap_or_else(&mut allocate);
        merged.push(ThreadMessage::from_record(local_id, record));
    }

    merged.extend(
        existing
            .iter()
            .filter(|m| m.server_id().is_some_and(|id| !seen.contains(&id)))
            .cloned(),
    );
    merged.extend(existing.iter().filter(|m| m.server_id().is_none()).cloned());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::DeliveryState;
    use portal_core::SenderRole;
    use proptest::prelude::*;

    const JOB: JobId = JobId(101);

    fn record(id: i64, text: &str) -> MessageRecord {
        MessageRecord {
            id: MessageId(id),
            job_id: JOB,
            sender: SenderRole::Staff,
            text: text.into(),
            media: None,
        }
    }

    fn local(local_id: u64, state: DeliveryState) -> ThreadMessage {
        ThreadMessage {
            local_id: LocalId(local_id),
            job_id: JOB,
            sender: SenderRole::Customer,
            text: format!("local {local_id}"),
            media: Vec::new(),
            state,
        }
    }

    fn counter(start: u64) -> impl FnMut() -> LocalId {
        let mut next = start;
        move || {
            next += 1;
            LocalId(next)
        }
    }

    #[test]
    fn server_order_then_pending() {
        let existing = vec![
            local(1, DeliveryState::Pending),
            local(2, DeliveryState::Confirmed { id: MessageId(20) }),
        ];
        let records = vec![record(10, "first"), record(20, "second")];

        let merged = merge_history(&existing, JOB, &records, counter(100));

        let ids: Vec<_> = merged.iter().map(|m| m.local_id.0).collect();
        assert_eq!(ids, vec![101, 2, 1]);
        assert_eq!(merged[1].text, "second", "server text wins for known ids");
        assert!(merged[2].state.is_pending());
    }

    #[test]
    fn locally_confirmed_messages_missing_from_server_are_kept() {
        let existing = vec![local(1, DeliveryState::Confirmed { id: MessageId(5) })];
        let merged = merge_history(&existing, JOB, &[], counter(0));
        assert_eq!(merged, existing);
    }

    #[test]
    fn duplicate_and_foreign_records_are_ignored() {
        let mut foreign = record(30, "other job");
        foreign.job_id = JobId(999);
        let records = vec![record(10, "a"), record(10, "a again"), foreign];

        let merged = merge_history(&[], JOB, &records, counter(0));

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "a");
    }

    #[test]
    fn failed_entries_stay_in_submission_order() {
        let existing = vec![
            local(
                1,
                DeliveryState::Failed {
                    reason: "offline".into(),
                },
            ),
            local(2, DeliveryState::Pending),
        ];
        let merged = merge_history(&existing, JOB, &[record(7, "hi")], counter(10));
        let ids: Vec<_> = merged.iter().map(|m| m.local_id.0).collect();
        assert_eq!(ids, vec![11, 1, 2]);
    }

    proptest! {
        #[test]
        fn merge_never_drops_unconfirmed_and_never_duplicates(
            server_ids in proptest::collection::vec(1i64..40, 0..12),
            local_states in proptest::collection::vec(proptest::option::of(1i64..40), 0..12),
        ) {
            let existing: Vec<ThreadMessage> = local_states
                .iter()
                .enumerate()
                .map(|(i, state)| {
                    let state = match state {
                        Some(id) => DeliveryState::Confirmed { id: MessageId(*id) },
                        None => DeliveryState::Pending,
                    };
                    local(i as u64, state)
                })
                .collect();
            let records: Vec<_> = server_ids.iter().map(|id| record(*id, "s")).collect();

            let merged = merge_history(&existing, JOB, &records, counter(1_000));

            // Every pending entry survives, in its original relative order.
            let pending_before: Vec<_> = existing.iter().filter(|m| m.state.is_pending()).map(|m| m.local_id).collect();
            let pending_after: Vec<_> = merged.iter().filter(|m| m.state.is_pending()).map(|m| m.local_id).collect();
            prop_assert_eq!(pending_before, pending_after);

            // Pending entries sort after every confirmed entry.
            let first_pending = merged.iter().position(|m| m.state.is_pending()).unwrap_or(merged.len());
            prop_assert!(merged[first_pending..].iter().all(|m| m.state.is_pending()));

            // Server ids appear in first-seen server order at the front.
            let mut expected = Vec::new();
            for id in &server_ids {
                if !expected.contains(id) {
                    expected.push(*id);
                }
            }
            let leading: Vec<_> = merged.iter().take(expected.len()).filter_map(|m| m.server_id()).map(|id| id.0).collect();
            prop_assert_eq!(leading, expected);

            // Local ids are unique.
            let mut locals: Vec<_> = merged.iter().map(|m| m.local_id).collect();
            locals.sort();
            locals.dedup();
            prop_assert_eq!(locals.len(), merged.len());
        }
    }
}
