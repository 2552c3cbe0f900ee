//! Farm domain — plot lifecycle transitions, resource bookkeeping,
//! aggregate progress, and the delayed harvest confirmation.
//!
//! Communicates with other domains exclusively through crate::shared
//! events/resources.

use bevy::prelude::*;
use crate::shared::*;

pub mod confirm;
pub mod lifecycle;
pub mod progress;

pub struct FarmPlugin;

impl Plugin for FarmPlugin {
    fn build(&self, app: &mut App) {
        app
            // Internal resources
            .init_resource::<confirm::PendingConfirmations>()
            // ------------------------------------------------------------------
            // Plot actions — only from the main dashboard view
            // ------------------------------------------------------------------
            .add_systems(
                Update,
                (
                    lifecycle::handle_cell_actions,
                    lifecycle::handle_fertilize,
                )
                    .run_if(in_state(AppState::Dashboard)),
            )
            // ------------------------------------------------------------------
            // Bookkeeping — runs in every state so pending timers and stats
            // are never starved by an open overlay screen
            // ------------------------------------------------------------------
            .add_systems(
                Update,
                (
                    confirm::tick_confirmations,
                    confirm::cancel_all_on_reset,
                    progress::record_progress_samples,
                ),
            );
    }
}
