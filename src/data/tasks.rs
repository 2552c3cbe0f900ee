//! Hard-coded task catalog.

use crate::shared::*;

fn task(id: &str, title: &str, goal: TaskGoalKind, target: u32, reward_points: u64) -> TaskDef {
    TaskDef {
        id: id.to_string(),
        title: title.to_string(),
        goal,
        target,
        reward_points,
    }
}

pub fn populate_tasks(catalog: &mut TaskCatalog) {
    catalog.tasks = vec![
        task("first_seed", "Break Ground", TaskGoalKind::PlantCells, 1, 20),
        task("green_thumb", "Green Thumb", TaskGoalKind::PlantCells, 5, 75),
        task("first_harvest", "First Harvest", TaskGoalKind::HarvestCells, 1, 50),
        task("bumper_crop", "Bumper Crop", TaskGoalKind::HarvestCells, 10, 250),
        task("window_shopper", "Window Shopper", TaskGoalKind::BuyPacks, 1, 15),
        task("stockpiler", "Stockpiler", TaskGoalKind::BuyPacks, 5, 100),
        task("soil_booster", "Soil Booster", TaskGoalKind::SpendFertilizer, 2, 40),
    ];
}
