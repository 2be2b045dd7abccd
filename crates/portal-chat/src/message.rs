// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread entries and their delivery lifecycle.

use portal_core::types::{MessageId, MessageRecord};
use portal_core::{JobId, LocalId, SenderRole};

/// Where a thread entry is in its delivery lifecycle.
///
/// `Pending` moves to exactly one of `Confirmed` or `Failed`. A retry moves
/// `Failed` back to `Pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryState {
    Pending,
    Confirmed { id: MessageId },
    Failed { reason: String },
}

impl DeliveryState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn server_id(&self) -> Option<MessageId> {
        match self {
            Self::Confirmed { id } => Some(*id),
            _ => None,
        }
    }
}

/// One entry in a job's message thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    /// Stable client-side identity; survives confirmation and reloads.
    pub local_id: LocalId,
    pub job_id: JobId,
    pub sender: SenderRole,
    pub text: String,
    pub media: Vec<String>,
    pub state: DeliveryState,
}

impl ThreadMessage {
    pub(crate) fn pending(
        local_id: LocalId,
        job_id: JobId,
        sender: SenderRole,
        text: String,
        media: Vec<String>,
    ) -> Self {
        Self {
            local_id,
            job_id,
            sender,
            text,
            media,
            state: DeliveryState::Pending,
        }
    }

    pub(crate) fn from_record(local_id: LocalId, record: &MessageRecord) -> Self {
        Self {
            local_id,
            job_id: record.job_id,
            sender: record.sender.clone(),
            text: record.text.clone(),
            media: record.media.clone().unwrap_or_default(),
            state: DeliveryState::Confirmed { id: record.id },
        }
    }

    pub fn server_id(&self) -> Option<MessageId> {
        self.state.server_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_without_media_has_empty_list() {
        let record = MessageRecord {
            id: MessageId(9),
            job_id: JobId(101),
            sender: SenderRole::Staff,
            text: "On our way".into(),
            media: None,
        };
        let entry = ThreadMessage::from_record(LocalId(3), &record);
        assert!(entry.media.is_empty());
        assert_eq!(entry.server_id(), Some(MessageId(9)));
        assert_eq!(entry.local_id, LocalId(3));
    }

    #[test]
    fn only_confirmed_has_server_id() {
        assert_eq!(DeliveryState::Pending.server_id(), None);
        assert_eq!(
            DeliveryState::Failed {
                reason: "offline".into()
            }
            .server_id(),
            None
        );
        assert!(
            DeliveryState::Failed {
                reason: String::new()
            }
            .is_failed()
        );
    }
}
