//! UI layer — dashboard grid view, HUD, toasts, overlay screens, input.
//!
//! Deliberately minimal: flat colored nodes and the engine's default
//! font. Layout polish is out of scope; everything here is wiring from
//! shared state to the screen and from keys to shared events.

mod grid_view;
mod hud;
mod input;
mod notifications;
mod screens;
mod toast;

use bevy::prelude::*;
use crate::shared::*;

pub use toast::{ToastContainer, ToastItem};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GridSelection>()
            .init_resource::<screens::TaskScreenOptions>();

        // ─── TOASTS — always present ───
        app.add_systems(Startup, toast::spawn_toast_container);
        app.add_systems(Update, (toast::handle_toast_events, toast::update_toasts));

        // ─── NOTIFICATION LOG ───
        app.add_systems(Update, notifications::log_notifications);

        // ─── DASHBOARD — grid + HUD ───
        app.add_systems(OnEnter(AppState::Dashboard), (grid_view::spawn_grid, hud::spawn_hud));
        app.add_systems(
            OnExit(AppState::Dashboard),
            (grid_view::despawn_grid, hud::despawn_hud),
        );
        app.add_systems(
            Update,
            (
                grid_view::sync_cell_sprites,
                grid_view::sync_selection_cursor,
                hud::update_points_display,
                hud::update_coins_display,
                hud::update_progress_display,
                hud::update_resource_display,
                hud::update_notification_panel,
                input::grid_navigation,
                input::cell_action_input,
            )
                .run_if(in_state(AppState::Dashboard)),
        );

        // ─── OVERLAY SCREENS ───
        app.add_systems(OnEnter(AppState::Market), screens::spawn_market_screen);
        app.add_systems(OnExit(AppState::Market), screens::despawn_screen);
        app.add_systems(
            Update,
            (screens::update_market_screen, input::market_input)
                .run_if(in_state(AppState::Market)),
        );

        app.add_systems(OnEnter(AppState::Leaderboard), screens::spawn_leaderboard_screen);
        app.add_systems(OnExit(AppState::Leaderboard), screens::despawn_screen);
        app.add_systems(
            Update,
            screens::update_leaderboard_screen.run_if(in_state(AppState::Leaderboard)),
        );

        app.add_systems(OnEnter(AppState::Tasks), screens::spawn_tasks_screen);
        app.add_systems(OnExit(AppState::Tasks), screens::despawn_screen);
        app.add_systems(
            Update,
            (screens::update_tasks_screen, input::tasks_input)
                .run_if(in_state(AppState::Tasks)),
        );

        // ─── GLOBAL KEYS — screen switching + admin/storage actions ───
        app.add_systems(
            Update,
            input::global_keys.run_if(not(in_state(AppState::Loading))),
        );
    }
}

/// Which plot the keyboard cursor is on.
#[derive(Resource, Debug, Default)]
pub struct GridSelection {
    pub index: usize,
}
