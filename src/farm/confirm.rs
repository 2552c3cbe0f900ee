//! Delayed harvest confirmation.
//!
//! The harvest step mutates state synchronously; the only deferred piece
//! is a cosmetic confirmation notification 1.5 s later. It is modelled as
//! an explicit pending entry so it can be cancelled — cancellation is a
//! safe no-op because the entry carries no state.

use bevy::prelude::*;
use crate::shared::*;

#[derive(Debug)]
pub struct PendingConfirmation {
    pub index: usize,
    pub timer: Timer,
}

#[derive(Resource, Debug, Default)]
pub struct PendingConfirmations {
    pub entries: Vec<PendingConfirmation>,
}

impl PendingConfirmations {
    pub fn schedule(&mut self, index: usize) {
        self.entries.push(PendingConfirmation {
            index,
            timer: Timer::from_seconds(CONFIRM_DELAY_SECS, TimerMode::Once),
        });
    }

    pub fn cancel(&mut self, index: usize) {
        self.entries.retain(|entry| entry.index != index);
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }
}

/// Tick pending timers; fired entries become a notification and drop out.
pub fn tick_confirmations(
    time: Res<Time>,
    mut pending: ResMut<PendingConfirmations>,
    mut notifications: EventWriter<NotificationEvent>,
) {
    if pending.entries.is_empty() {
        return;
    }

    for entry in pending.entries.iter_mut() {
        entry.timer.tick(time.delta());
        if entry.timer.just_finished() {
            notifications.send(NotificationEvent {
                message: format!("Harvest confirmed for {}", FarmGrid::cell_id(entry.index)),
            });
        }
    }
    pending.entries.retain(|entry| !entry.timer.finished());
}

/// A bulk reset drops every pending entry.
pub fn cancel_all_on_reset(
    mut reset_events: EventReader<ResetRequestEvent>,
    mut pending: ResMut<PendingConfirmations>,
) {
    for _ in reset_events.read() {
        pending.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_cancel() {
        let mut pending = PendingConfirmations::default();
        pending.schedule(2);
        pending.schedule(5);
        assert_eq!(pending.entries.len(), 2);

        pending.cancel(2);
        assert_eq!(pending.entries.len(), 1);
        assert_eq!(pending.entries[0].index, 5);

        // Cancelling something never scheduled is a no-op.
        pending.cancel(99);
        assert_eq!(pending.entries.len(), 1);

        pending.cancel_all();
        assert!(pending.entries.is_empty());
    }
}
