//! The farm grid view — one colored sprite per plot plus a selection
//! cursor. Placeholder colors stand in for art.

use bevy::prelude::*;
use crate::shared::*;
use super::GridSelection;

const CELL_SIZE: f32 = 56.0;
const CELL_GAP: f32 = 8.0;

/// Marker for one plot sprite.
#[derive(Component, Debug)]
pub struct CellSprite {
    pub index: usize,
}

/// Marker for the selection outline.
#[derive(Component)]
pub struct SelectionCursor;

/// Placeholder color per status; locked plots are flattened to dark gray.
pub fn cell_color(status: CellStatus, locked: bool) -> Color {
    if locked {
        return Color::srgb(0.18, 0.18, 0.20);
    }
    match status {
        CellStatus::Empty => Color::srgb(0.45, 0.32, 0.20),
        CellStatus::Planted => Color::srgb(0.55, 0.62, 0.30),
        CellStatus::Growing => Color::srgb(0.35, 0.65, 0.30),
        CellStatus::Ready => Color::srgb(0.90, 0.75, 0.25),
        CellStatus::Harvested => Color::srgb(0.60, 0.45, 0.60),
    }
}

fn cell_translation(index: usize) -> Vec3 {
    let (row, col) = FarmGrid::row_col(index);
    let step = CELL_SIZE + CELL_GAP;
    // Centre the grid on the origin, rows growing downward.
    let origin_x = -(GRID_COLS as f32 - 1.0) * step / 2.0;
    let origin_y = (GRID_ROWS as f32 - 1.0) * step / 2.0;
    Vec3::new(
        origin_x + col as f32 * step,
        origin_y - row as f32 * step,
        1.0,
    )
}

pub fn spawn_grid(mut commands: Commands, grid: Res<FarmGrid>, selection: Res<GridSelection>) {
    for (index, cell) in grid.cells.iter().enumerate() {
        commands.spawn((
            Sprite {
                color: cell_color(cell.status, FarmGrid::is_locked(index)),
                custom_size: Some(Vec2::splat(CELL_SIZE)),
                ..default()
            },
            Transform::from_translation(cell_translation(index)),
            CellSprite { index },
        ));
    }

    commands.spawn((
        Sprite {
            color: Color::srgba(1.0, 1.0, 1.0, 0.25),
            custom_size: Some(Vec2::splat(CELL_SIZE + 6.0)),
            ..default()
        },
        Transform::from_translation(cell_translation(selection.index).with_z(0.5)),
        SelectionCursor,
    ));
}

pub fn despawn_grid(
    mut commands: Commands,
    sprites: Query<Entity, With<CellSprite>>,
    cursor: Query<Entity, With<SelectionCursor>>,
) {
    for entity in sprites.iter().chain(cursor.iter()) {
        commands.entity(entity).despawn();
    }
}

/// Repaints plot sprites whenever the grid changes.
pub fn sync_cell_sprites(
    grid: Res<FarmGrid>,
    mut sprites: Query<(&CellSprite, &mut Sprite)>,
) {
    if !grid.is_changed() {
        return;
    }
    for (cell_sprite, mut sprite) in &mut sprites {
        if let Some(cell) = grid.cells.get(cell_sprite.index) {
            sprite.color = cell_color(cell.status, FarmGrid::is_locked(cell_sprite.index));
        }
    }
}

pub fn sync_selection_cursor(
    selection: Res<GridSelection>,
    mut cursor: Query<&mut Transform, With<SelectionCursor>>,
) {
    if !selection.is_changed() {
        return;
    }
    for mut transform in &mut cursor {
        transform.translation = cell_translation(selection.index).with_z(0.5);
    }
}
