//! Wallet domain — central application of point awards and coin changes.
//!
//! Every earn/spend in the app goes through these two systems so the
//! profile is the single place balances get mutated.

use bevy::prelude::*;
use crate::shared::*;

pub struct WalletPlugin;

impl Plugin for WalletPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (apply_point_awards, apply_coin_changes)
                .run_if(not(in_state(AppState::Loading))),
        );
    }
}

/// Applies PointsAwardEvents to the profile. Points only ever go up;
/// lifetime points track the running total across resets of `points`.
pub fn apply_point_awards(
    mut point_events: EventReader<PointsAwardEvent>,
    mut profile: ResMut<PlayerProfile>,
    mut notifications: EventWriter<NotificationEvent>,
) {
    for ev in point_events.read() {
        profile.points = profile.points.saturating_add(ev.amount);
        profile.lifetime_points = profile.lifetime_points.saturating_add(ev.amount);
        info!(
            "[Wallet] +{} pts: {}. Total: {}",
            ev.amount, ev.reason, profile.points
        );
        notifications.send(NotificationEvent {
            message: format!("+{} points — {}", ev.amount, ev.reason),
        });
    }
}

/// Applies CoinChangeEvents to the coin balance.
/// Overspends should have been validated upstream; the balance is clamped
/// to zero rather than going negative.
pub fn apply_coin_changes(
    mut coin_events: EventReader<CoinChangeEvent>,
    mut profile: ResMut<PlayerProfile>,
) {
    for ev in coin_events.read() {
        let target = (profile.coins as i64).saturating_add(ev.amount);
        if target < 0 {
            warn!(
                "[Wallet] Overspend of {} coins (reason: {}). Clamping to 0.",
                -target, ev.reason
            );
        }
        profile.coins = target.clamp(0, u32::MAX as i64) as u32;
        info!(
            "[Wallet] Coins {:+}: {}. Balance: {}",
            ev.amount, ev.reason, profile.coins
        );
    }
}

/// Format a coin amount as a display string (e.g. "1,234c").
/// Groups from the least significant digit, then un-reverses.
pub fn format_coins(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let mut out: String = grouped.chars().rev().collect();
    out.push('c');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coins() {
        assert_eq!(format_coins(0), "0c");
        assert_eq!(format_coins(200), "200c");
        assert_eq!(format_coins(1234), "1,234c");
        assert_eq!(format_coins(1000000), "1,000,000c");
    }

    #[test]
    fn test_profile_defaults() {
        let profile = PlayerProfile::default();
        assert_eq!(profile.points, 0);
        assert_eq!(profile.lifetime_points, 0);
        assert_eq!(profile.coins, 200);
    }
}
