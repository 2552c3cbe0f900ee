//! Admin domain — grant/reset actions behind the debug panel.
//!
//! The handlers are plain event systems so tests (and the UI keybinds)
//! can drive them without any panel widgets.

use bevy::prelude::*;
use crate::shared::*;

pub struct AdminPlugin;

impl Plugin for AdminPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (handle_grant_resource, handle_grant_points)
                .run_if(not(in_state(AppState::Loading))),
        );
    }
}

pub fn handle_grant_resource(
    mut grant_events: EventReader<AdminGrantResourceEvent>,
    mut ledger: ResMut<ResourceLedger>,
    mut toast_events: EventWriter<ToastEvent>,
) {
    for ev in grant_events.read() {
        ledger.grant(ev.kind, ev.amount);
        info!("[Admin] Granted {} x{}", ev.kind.name(), ev.amount);
        toast_events.send(ToastEvent {
            message: format!("Admin: +{} {}", ev.amount, ev.kind.name()),
            duration_secs: 2.0,
        });
    }
}

pub fn handle_grant_points(
    mut grant_events: EventReader<AdminGrantPointsEvent>,
    mut points_events: EventWriter<PointsAwardEvent>,
) {
    for ev in grant_events.read() {
        info!("[Admin] Granted {} points", ev.amount);
        points_events.send(PointsAwardEvent {
            amount: ev.amount,
            reason: String::from("Admin grant"),
        });
    }
}
