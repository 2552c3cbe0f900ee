//! Overlay screens — marketplace, leaderboard, task board. Each is one
//! full-screen panel with a text body rebuilt from shared state.

use bevy::prelude::*;
use crate::shared::*;
use crate::leaderboard::{player_rank, standings};
use crate::tasks::{filter_and_sort, TaskFilter, TaskSort};

/// Root of whichever overlay screen is open.
#[derive(Component)]
pub struct ScreenRoot;

/// Marker for the screen's text body.
#[derive(Component)]
pub struct ScreenBody;

/// Display options for the task board, toggled from input.
#[derive(Resource, Debug)]
pub struct TaskScreenOptions {
    pub filter: TaskFilter,
    pub sort: TaskSort,
}

impl Default for TaskScreenOptions {
    fn default() -> Self {
        Self {
            filter: TaskFilter::All,
            sort: TaskSort::Title,
        }
    }
}

fn spawn_screen(commands: &mut Commands, title: &str, footer: &str) {
    commands
        .spawn((
            ScreenRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(24.0)),
                row_gap: Val::Px(12.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.05, 0.05, 0.08, 0.95)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title.to_string()),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                ScreenBody,
            ));
            parent.spawn((
                Text::new(footer.to_string()),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
            ));
        });
}

pub fn despawn_screen(mut commands: Commands, query: Query<Entity, With<ScreenRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Marketplace
// ─────────────────────────────────────────────────────────────────────────────

pub fn spawn_market_screen(mut commands: Commands) {
    spawn_screen(&mut commands, "Marketplace", "1-9: buy   Esc: back");
}

pub fn update_market_screen(
    catalog: Res<MarketCatalog>,
    profile: Res<PlayerProfile>,
    mut query: Query<&mut Text, With<ScreenBody>>,
) {
    for mut text in &mut query {
        let mut body = format!("Balance: {} coins\n\n", profile.coins);
        for (i, listing) in catalog.listings.iter().enumerate() {
            body.push_str(&format!(
                "[{}] {} x{} — {} coins\n",
                i + 1,
                listing.kind.name(),
                listing.pack_size,
                listing.price_coins
            ));
        }
        **text = body;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Leaderboard
// ─────────────────────────────────────────────────────────────────────────────

pub fn spawn_leaderboard_screen(mut commands: Commands) {
    spawn_screen(&mut commands, "Leaderboard", "Esc: back");
}

pub fn update_leaderboard_screen(
    board: Res<Leaderboard>,
    profile: Res<PlayerProfile>,
    mut query: Query<&mut Text, With<ScreenBody>>,
) {
    for mut text in &mut query {
        let mut body = format!("Your rank: #{}\n\n", player_rank(&board, &profile));
        for (i, entry) in standings(&board, &profile).iter().enumerate() {
            let marker = if entry.is_player { " <- you" } else { "" };
            body.push_str(&format!(
                "{:>2}. {:<10} {:>6} pts{}\n",
                i + 1,
                entry.name,
                entry.points,
                marker
            ));
        }
        **text = body;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task board
// ─────────────────────────────────────────────────────────────────────────────

pub fn spawn_tasks_screen(mut commands: Commands) {
    spawn_screen(
        &mut commands,
        "Tasks",
        "F: filter   S: sort   Esc: back",
    );
}

pub fn update_tasks_screen(
    catalog: Res<TaskCatalog>,
    log: Res<TaskLog>,
    options: Res<TaskScreenOptions>,
    mut query: Query<&mut Text, With<ScreenBody>>,
) {
    for mut text in &mut query {
        let filter_name = match options.filter {
            TaskFilter::All => "all",
            TaskFilter::Active => "active",
            TaskFilter::Completed => "completed",
        };
        let sort_name = match options.sort {
            TaskSort::Title => "title",
            TaskSort::RewardDesc => "reward",
        };
        let mut body = format!("Showing: {} (by {})\n\n", filter_name, sort_name);

        for task in filter_and_sort(&catalog, &log, options.filter, options.sort) {
            let line = if log.is_completed(&task.id) {
                format!("[done] {} (+{} pts)\n", task.title, task.reward_points)
            } else {
                let progress = log.progress.get(&task.id).copied().unwrap_or(0);
                format!(
                    "[{}/{}] {} (+{} pts)\n",
                    progress.min(task.target),
                    task.target,
                    task.title,
                    task.reward_points
                )
            };
            body.push_str(&line);
        }
        **text = body;
    }
}
