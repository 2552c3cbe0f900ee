//! Data layer — populates the static catalogs at boot.
//!
//! Runs in OnEnter(AppState::Loading), fills TaskCatalog, MarketCatalog,
//! and the mock Leaderboard from hard-coded design data in the
//! submodules. No other domain needs to seed these resources; everything
//! can safely read them once AppState has advanced past Loading.

mod leaderboard;
mod market;
mod tasks;

use bevy::prelude::*;
use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Loading), load_all_data);
    }
}

/// Single system that populates every catalog. The storage plugin's
/// restore system (same schedule) handles the persisted records and the
/// transition out of Loading; the catalogs here are static and disjoint
/// from anything it touches.
fn load_all_data(
    mut task_catalog: ResMut<TaskCatalog>,
    mut market_catalog: ResMut<MarketCatalog>,
    mut board: ResMut<Leaderboard>,
) {
    info!("DataPlugin: populating catalogs…");

    tasks::populate_tasks(&mut task_catalog);
    info!("  Tasks loaded: {}", task_catalog.tasks.len());

    market::populate_market(&mut market_catalog);
    info!("  Market listings loaded: {}", market_catalog.listings.len());

    leaderboard::populate_rivals(&mut board);
    info!("  Leaderboard rivals loaded: {}", board.rivals.len());
}
