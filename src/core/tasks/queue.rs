use std::sync::Mutex;

use crate::core::models::MasteryStatus;

/// One pending progress persistence request. Idempotent server-side per
/// (word id, target status): replaying or reordering deliveries cannot
/// double-apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressCommand {
    pub word_id: String,
    pub status: MasteryStatus,
    pub list_id: Option<String>,
}

/// At-least-once delivery queue behind optimistic progress updates. At most
/// one command per word: a newer target status coalesces over an older
/// pending one, and an identical command dedupes. There is no timer-driven
/// retry; a failed delivery is re-enqueued and rides the next flush.
#[derive(Default)]
pub struct ProgressQueue {
    pending: Mutex<Vec<ProgressCommand>>,
}

impl ProgressQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when an identical command is already pending.
    pub fn enqueue(&self, command: ProgressCommand) -> bool {
        let mut pending = self.pending.lock().expect("progress queue lock");
        if let Some(existing) = pending.iter_mut().find(|c| c.word_id == command.word_id) {
            if *existing == command {
                return false;
            }
            *existing = command;
            return true;
        }
        pending.push(command);
        true
    }

    /// Drain everything currently pending, in enqueue order.
    pub fn take_pending(&self) -> Vec<ProgressCommand> {
        std::mem::take(&mut *self.pending.lock().expect("progress queue lock"))
    }

    /// Put a failed delivery back, unless a newer command for the same word
    /// arrived while it was out.
    pub fn requeue(&self, command: ProgressCommand) {
        let mut pending = self.pending.lock().expect("progress queue lock");
        if pending.iter().any(|c| c.word_id == command.word_id) {
            return;
        }
        pending.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().expect("progress queue lock").is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().expect("progress queue lock").len()
    }
}
