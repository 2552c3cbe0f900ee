//! Leaderboard domain — mock competitor standings around the live player.

use bevy::prelude::*;
use rand::Rng;
use crate::shared::*;

/// How often rivals earn a mock point bump.
const DRIFT_INTERVAL_SECS: f32 = 20.0;
const DRIFT_MAX_POINTS: u64 = 15;

#[derive(Resource, Debug)]
pub struct RivalDriftTimer {
    pub timer: Timer,
}

impl Default for RivalDriftTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(DRIFT_INTERVAL_SECS, TimerMode::Repeating),
        }
    }
}

pub struct LeaderboardPlugin;

impl Plugin for LeaderboardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RivalDriftTimer>().add_systems(
            Update,
            drift_rival_scores.run_if(not(in_state(AppState::Loading))),
        );
    }
}

/// Merge the player into the mock rivals and sort: points descending,
/// name ascending as tiebreak.
pub fn standings(board: &Leaderboard, profile: &PlayerProfile) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = board.rivals.clone();
    entries.push(LeaderboardEntry {
        name: profile.display_name.clone(),
        points: profile.points,
        is_player: true,
    });
    entries.sort_by(|a, b| b.points.cmp(&a.points).then(a.name.cmp(&b.name)));
    entries
}

/// The player's 1-based rank in the standings.
pub fn player_rank(board: &Leaderboard, profile: &PlayerProfile) -> usize {
    standings(board, profile)
        .iter()
        .position(|e| e.is_player)
        .map(|i| i + 1)
        .unwrap_or(1)
}

/// Mock competitors slowly gain points so the board stays in motion.
pub fn drift_rival_scores(
    time: Res<Time>,
    mut drift: ResMut<RivalDriftTimer>,
    mut board: ResMut<Leaderboard>,
) {
    drift.timer.tick(time.delta());
    if !drift.timer.just_finished() {
        return;
    }

    let mut rng = rand::thread_rng();
    for rival in board.rivals.iter_mut() {
        rival.points = rival.points.saturating_add(rng.gen_range(0..=DRIFT_MAX_POINTS));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Leaderboard {
        Leaderboard {
            rivals: vec![
                LeaderboardEntry {
                    name: "Clover".into(),
                    points: 300,
                    is_player: false,
                },
                LeaderboardEntry {
                    name: "Barley".into(),
                    points: 120,
                    is_player: false,
                },
            ],
        }
    }

    #[test]
    fn test_standings_sorted_by_points_desc() {
        let mut profile = PlayerProfile::default();
        profile.points = 150;
        let entries = standings(&board(), &profile);
        assert_eq!(entries[0].name, "Clover");
        assert_eq!(entries[1].name, "Farmer");
        assert_eq!(entries[2].name, "Barley");
    }

    #[test]
    fn test_name_tiebreak_is_ascending() {
        let mut profile = PlayerProfile::default();
        profile.display_name = "Aster".into();
        profile.points = 300;
        let entries = standings(&board(), &profile);
        // Aster ties Clover on 300 and wins the alphabetical tiebreak.
        assert_eq!(entries[0].name, "Aster");
        assert_eq!(entries[1].name, "Clover");
    }

    #[test]
    fn test_player_rank() {
        let mut profile = PlayerProfile::default();
        profile.points = 0;
        assert_eq!(player_rank(&board(), &profile), 3);
        profile.points = 1000;
        assert_eq!(player_rank(&board(), &profile), 1);
    }
}
