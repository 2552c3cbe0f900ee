//! Bridges NotificationEvents into the dashboard log and a toast.

use bevy::prelude::*;
use crate::shared::*;

pub fn log_notifications(
    mut notification_events: EventReader<NotificationEvent>,
    mut log: ResMut<NotificationLog>,
    mut toast_events: EventWriter<ToastEvent>,
) {
    for ev in notification_events.read() {
        log.push(ev.message.clone());
        toast_events.send(ToastEvent {
            message: ev.message.clone(),
            duration_secs: 2.5,
        });
    }
}
