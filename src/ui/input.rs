//! Keyboard input — grid navigation, plot actions, screen switching,
//! and the debug/admin keybinds.

use bevy::prelude::*;
use crate::shared::*;
use super::screens::TaskScreenOptions;
use super::GridSelection;
use crate::tasks::{TaskFilter, TaskSort};

/// Arrow keys move the plot cursor within the grid.
pub fn grid_navigation(
    keys: Res<ButtonInput<KeyCode>>,
    mut selection: ResMut<GridSelection>,
) {
    let (row, col) = FarmGrid::row_col(selection.index);
    let (mut row, mut col) = (row as i32, col as i32);

    if keys.just_pressed(KeyCode::ArrowLeft) {
        col -= 1;
    }
    if keys.just_pressed(KeyCode::ArrowRight) {
        col += 1;
    }
    if keys.just_pressed(KeyCode::ArrowUp) {
        row -= 1;
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        row += 1;
    }

    let row = row.clamp(0, GRID_ROWS as i32 - 1) as usize;
    let col = col.clamp(0, GRID_COLS as i32 - 1) as usize;
    let index = row * GRID_COLS + col;
    if index != selection.index {
        selection.index = index;
    }
}

/// Space advances the selected plot; F spends Fertilizer on it.
pub fn cell_action_input(
    keys: Res<ButtonInput<KeyCode>>,
    selection: Res<GridSelection>,
    mut action_events: EventWriter<CellActionEvent>,
    mut fertilize_events: EventWriter<FertilizeEvent>,
) {
    if keys.just_pressed(KeyCode::Space) {
        action_events.send(CellActionEvent {
            index: selection.index,
        });
    }
    if keys.just_pressed(KeyCode::KeyF) {
        fertilize_events.send(FertilizeEvent {
            index: selection.index,
        });
    }
}

/// Number keys buy the corresponding market listing.
pub fn market_input(
    keys: Res<ButtonInput<KeyCode>>,
    catalog: Res<MarketCatalog>,
    mut purchase_events: EventWriter<PurchaseEvent>,
) {
    const DIGITS: [KeyCode; 9] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
    for (i, key) in DIGITS.iter().enumerate() {
        if keys.just_pressed(*key) {
            if let Some(listing) = catalog.listings.get(i) {
                purchase_events.send(PurchaseEvent {
                    listing_id: listing.id.clone(),
                });
            }
        }
    }
}

/// F cycles the task filter, S flips the sort.
pub fn tasks_input(keys: Res<ButtonInput<KeyCode>>, mut options: ResMut<TaskScreenOptions>) {
    if keys.just_pressed(KeyCode::KeyF) {
        options.filter = match options.filter {
            TaskFilter::All => TaskFilter::Active,
            TaskFilter::Active => TaskFilter::Completed,
            TaskFilter::Completed => TaskFilter::All,
        };
    }
    if keys.just_pressed(KeyCode::KeyS) {
        options.sort = match options.sort {
            TaskSort::Title => TaskSort::RewardDesc,
            TaskSort::RewardDesc => TaskSort::Title,
        };
    }
}

/// Screen switching plus the storage/admin keybinds:
/// M/L/T open screens, Esc returns to the dashboard,
/// F6 grants 5 of every resource, F7 grants 100 points,
/// F9 imports from the dropped bundle, F10 exports, F12 resets.
pub fn global_keys(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut grant_resource_events: EventWriter<AdminGrantResourceEvent>,
    mut grant_points_events: EventWriter<AdminGrantPointsEvent>,
    mut import_events: EventWriter<ImportFileRequestEvent>,
    mut export_events: EventWriter<ExportRequestEvent>,
    mut reset_events: EventWriter<ResetRequestEvent>,
) {
    if keys.just_pressed(KeyCode::Escape) && *state.get() != AppState::Dashboard {
        next_state.set(AppState::Dashboard);
    }
    if *state.get() == AppState::Dashboard {
        if keys.just_pressed(KeyCode::KeyM) {
            next_state.set(AppState::Market);
        }
        if keys.just_pressed(KeyCode::KeyL) {
            next_state.set(AppState::Leaderboard);
        }
        if keys.just_pressed(KeyCode::KeyT) {
            next_state.set(AppState::Tasks);
        }
    }

    if keys.just_pressed(KeyCode::F6) {
        for kind in ResourceKind::ALL {
            grant_resource_events.send(AdminGrantResourceEvent { kind, amount: 5 });
        }
    }
    if keys.just_pressed(KeyCode::F7) {
        grant_points_events.send(AdminGrantPointsEvent { amount: 100 });
    }
    if keys.just_pressed(KeyCode::F9) {
        import_events.send(ImportFileRequestEvent);
    }
    if keys.just_pressed(KeyCode::F10) {
        export_events.send(ExportRequestEvent);
    }
    if keys.just_pressed(KeyCode::F12) {
        reset_events.send(ResetRequestEvent);
    }
}
