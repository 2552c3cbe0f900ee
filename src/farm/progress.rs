//! Aggregate farm progress and the stats time series.

use bevy::prelude::*;
use crate::shared::*;

/// Aggregate progress: mean over ALL plots (locked ones included) of the
/// fixed status weights, rounded to the nearest integer percent.
pub fn farm_progress(grid: &FarmGrid) -> u8 {
    if grid.cells.is_empty() {
        return 0;
    }
    let sum: u32 = grid.cells.iter().map(|c| c.status.progress_value()).sum();
    ((sum as f64 / grid.cells.len() as f64).round()) as u8
}

/// Append one stats sample after every successful transition.
pub fn record_progress_samples(
    mut transition_events: EventReader<CellTransitionEvent>,
    grid: Res<FarmGrid>,
    profile: Res<PlayerProfile>,
    mut history: ResMut<FarmStatsHistory>,
) {
    // One sample per frame is enough even if several plots moved at once.
    if transition_events.read().next().is_none() {
        return;
    }
    transition_events.clear();

    history.push(ProgressSample {
        timestamp: unix_timestamp(),
        progress: farm_progress(&grid),
        points: profile.points,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_empty_grid_is_zero() {
        assert_eq!(farm_progress(&FarmGrid::default()), 0);
    }

    #[test]
    fn test_progress_all_harvested_is_hundred() {
        let mut grid = FarmGrid::default();
        for cell in grid.cells.iter_mut() {
            cell.status = CellStatus::Harvested;
        }
        assert_eq!(farm_progress(&grid), 100);
    }

    #[test]
    fn test_progress_rounds_to_nearest() {
        // One Planted plot out of 25: 25/25 = 1.0 → 1.
        let mut grid = FarmGrid::default();
        grid.cells[0].status = CellStatus::Planted;
        assert_eq!(farm_progress(&grid), 1);

        // One Growing plot out of 25: 50/25 = 2.0 → 2.
        grid.cells[0].status = CellStatus::Growing;
        assert_eq!(farm_progress(&grid), 2);

        // Ready (75) + Planted (25): 100/25 = 4.
        grid.cells[0].status = CellStatus::Ready;
        grid.cells[1].status = CellStatus::Planted;
        assert_eq!(farm_progress(&grid), 4);
    }

    #[test]
    fn test_progress_is_idempotent() {
        let mut grid = FarmGrid::default();
        grid.cells[0].status = CellStatus::Ready;
        grid.cells[4].status = CellStatus::Planted;
        let first = farm_progress(&grid);
        let second = farm_progress(&grid);
        assert_eq!(first, second);
    }

    #[test]
    fn test_history_cap() {
        let mut history = FarmStatsHistory::default();
        for i in 0..(STATS_HISTORY_CAP + 10) {
            history.push(ProgressSample {
                timestamp: i as u64,
                progress: 0,
                points: 0,
            });
        }
        assert_eq!(history.samples.len(), STATS_HISTORY_CAP);
        // Oldest samples were dropped.
        assert_eq!(history.samples[0].timestamp, 10);
    }
}
