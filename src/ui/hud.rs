//! Dashboard HUD — points, coins, progress, resource counts, and the
//! recent-notification panel.

use bevy::prelude::*;
use crate::shared::*;
use crate::farm::progress::farm_progress;
use crate::wallet::format_coins;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HudPointsText;

#[derive(Component)]
pub struct HudCoinsText;

#[derive(Component)]
pub struct HudProgressText;

#[derive(Component)]
pub struct HudResourceText;

#[derive(Component)]
pub struct HudNotificationText;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

fn resource_line(ledger: &ResourceLedger) -> String {
    ResourceKind::ALL
        .iter()
        .map(|&kind| format!("{} {}", kind.name(), ledger.quantity(kind)))
        .collect::<Vec<_>>()
        .join("  ")
}

fn notification_lines(log: &NotificationLog) -> String {
    log.entries
        .iter()
        .take(4)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

fn hud_text(font_size: f32) -> (TextFont, TextColor) {
    (
        TextFont {
            font_size,
            ..default()
        },
        TextColor(Color::WHITE),
    )
}

pub fn spawn_hud(
    mut commands: Commands,
    profile: Res<PlayerProfile>,
    grid: Res<FarmGrid>,
    ledger: Res<ResourceLedger>,
    log: Res<NotificationLog>,
) {
    // Spawn with live values so re-entering the dashboard never shows
    // stale text while the change-gated update systems are idle.
    let points_line = format!("{} pts", profile.points);
    let coins_line = format_coins(profile.coins);
    let progress_line = format!("Progress {}%", farm_progress(&grid));
    let resource_line = resource_line(&ledger);
    let notification_lines = notification_lines(&log);

    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            },
            PickingBehavior::IGNORE,
        ))
        .with_children(|parent| {
            // ─── TOP BAR ───
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        padding: UiRect::all(Val::Px(8.0)),
                        column_gap: Val::Px(24.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                    PickingBehavior::IGNORE,
                ))
                .with_children(|bar| {
                    bar.spawn((Text::new(points_line), hud_text(16.0), HudPointsText));
                    bar.spawn((Text::new(coins_line), hud_text(16.0), HudCoinsText));
                    bar.spawn((Text::new(progress_line), hud_text(16.0), HudProgressText));
                    bar.spawn((Text::new(resource_line), hud_text(16.0), HudResourceText));
                });

            // ─── BOTTOM: notifications + key help ───
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        padding: UiRect::all(Val::Px(8.0)),
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(4.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                    PickingBehavior::IGNORE,
                ))
                .with_children(|panel| {
                    panel.spawn((
                        Text::new(notification_lines),
                        hud_text(12.0),
                        HudNotificationText,
                    ));
                    panel.spawn((
                        Text::new(
                            "Arrows: select   Space: advance   F: fertilize   \
                             M: market   L: leaderboard   T: tasks",
                        ),
                        TextFont {
                            font_size: 11.0,
                            ..default()
                        },
                        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
                    ));
                });
        });
}

pub fn despawn_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn update_points_display(
    profile: Res<PlayerProfile>,
    mut query: Query<&mut Text, With<HudPointsText>>,
) {
    if !profile.is_changed() {
        return;
    }
    for mut text in &mut query {
        **text = format!("{} pts", profile.points);
    }
}

pub fn update_coins_display(
    profile: Res<PlayerProfile>,
    mut query: Query<&mut Text, With<HudCoinsText>>,
) {
    if !profile.is_changed() {
        return;
    }
    for mut text in &mut query {
        **text = format_coins(profile.coins);
    }
}

pub fn update_progress_display(
    grid: Res<FarmGrid>,
    mut query: Query<&mut Text, With<HudProgressText>>,
) {
    if !grid.is_changed() {
        return;
    }
    for mut text in &mut query {
        **text = format!("Progress {}%", farm_progress(&grid));
    }
}

pub fn update_resource_display(
    ledger: Res<ResourceLedger>,
    mut query: Query<&mut Text, With<HudResourceText>>,
) {
    if !ledger.is_changed() {
        return;
    }
    for mut text in &mut query {
        **text = resource_line(&ledger);
    }
}

pub fn update_notification_panel(
    log: Res<NotificationLog>,
    mut query: Query<&mut Text, With<HudNotificationText>>,
) {
    if !log.is_changed() {
        return;
    }
    for mut text in &mut query {
        **text = notification_lines(&log);
    }
}
