//! Tasks domain — goal tracking driven by the same events the rest of
//! the app already emits, plus the pure list helpers the dashboard uses.

use bevy::prelude::*;
use crate::shared::*;

pub struct TaskPlugin;

impl Plugin for TaskPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (track_transition_goals, track_purchase_goals, complete_tasks)
                .chain()
                .run_if(not(in_state(AppState::Loading))),
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Progress tracking
// ─────────────────────────────────────────────────────────────────────────────

fn bump(log: &mut TaskLog, catalog: &TaskCatalog, goal: TaskGoalKind) {
    for task in catalog.tasks.iter().filter(|t| t.goal == goal) {
        if log.is_completed(&task.id) {
            continue;
        }
        let entry = log.progress.entry(task.id.clone()).or_insert(0);
        *entry = entry.saturating_add(1);
    }
}

/// Plot transitions feed the plant/harvest/fertilizer goals.
pub fn track_transition_goals(
    mut transition_events: EventReader<CellTransitionEvent>,
    catalog: Res<TaskCatalog>,
    mut log: ResMut<TaskLog>,
) {
    for ev in transition_events.read() {
        if ev.from == CellStatus::Empty && ev.to == CellStatus::Planted {
            bump(&mut log, &catalog, TaskGoalKind::PlantCells);
        }
        if ev.to == CellStatus::Harvested {
            bump(&mut log, &catalog, TaskGoalKind::HarvestCells);
        }
        if ev.consumed == Some(ResourceKind::Fertilizer) {
            bump(&mut log, &catalog, TaskGoalKind::SpendFertilizer);
        }
    }
}

/// Completed market purchases feed the buy-packs goal.
pub fn track_purchase_goals(
    mut purchase_events: EventReader<PurchaseCompletedEvent>,
    catalog: Res<TaskCatalog>,
    mut log: ResMut<TaskLog>,
) {
    for _ in purchase_events.read() {
        bump(&mut log, &catalog, TaskGoalKind::BuyPacks);
    }
}

/// Tasks whose progress reached the target complete exactly once and pay
/// their point reward.
pub fn complete_tasks(
    catalog: Res<TaskCatalog>,
    mut log: ResMut<TaskLog>,
    mut points_events: EventWriter<PointsAwardEvent>,
    mut completed_events: EventWriter<TaskCompletedEvent>,
) {
    for task in catalog.tasks.iter() {
        if log.is_completed(&task.id) {
            continue;
        }
        let progress = log.progress.get(&task.id).copied().unwrap_or(0);
        if progress >= task.target {
            log.completed.push(task.id.clone());
            info!("[Tasks] Completed '{}' (+{} pts)", task.title, task.reward_points);
            points_events.send(PointsAwardEvent {
                amount: task.reward_points,
                reason: format!("Task: {}", task.title),
            });
            completed_events.send(TaskCompletedEvent {
                task_id: task.id.clone(),
                reward_points: task.reward_points,
            });
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard list helpers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSort {
    Title,
    RewardDesc,
}

/// Filter + sort the catalog for display. Pure; the UI calls this every
/// frame it redraws the list.
pub fn filter_and_sort<'a>(
    catalog: &'a TaskCatalog,
    log: &TaskLog,
    filter: TaskFilter,
    sort: TaskSort,
) -> Vec<&'a TaskDef> {
    let mut tasks: Vec<&TaskDef> = catalog
        .tasks
        .iter()
        .filter(|t| match filter {
            TaskFilter::All => true,
            TaskFilter::Active => !log.is_completed(&t.id),
            TaskFilter::Completed => log.is_completed(&t.id),
        })
        .collect();

    match sort {
        TaskSort::Title => tasks.sort_by(|a, b| a.title.cmp(&b.title)),
        TaskSort::RewardDesc => {
            tasks.sort_by(|a, b| b.reward_points.cmp(&a.reward_points).then(a.title.cmp(&b.title)))
        }
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TaskCatalog {
        TaskCatalog {
            tasks: vec![
                TaskDef {
                    id: "plant3".into(),
                    title: "Green Thumb".into(),
                    goal: TaskGoalKind::PlantCells,
                    target: 3,
                    reward_points: 30,
                },
                TaskDef {
                    id: "harvest1".into(),
                    title: "First Harvest".into(),
                    goal: TaskGoalKind::HarvestCells,
                    target: 1,
                    reward_points: 100,
                },
                TaskDef {
                    id: "buy2".into(),
                    title: "Big Spender".into(),
                    goal: TaskGoalKind::BuyPacks,
                    target: 2,
                    reward_points: 50,
                },
            ],
        }
    }

    #[test]
    fn test_bump_only_touches_matching_active_tasks() {
        let catalog = catalog();
        let mut log = TaskLog::default();
        log.completed.push("plant3".into());

        bump(&mut log, &catalog, TaskGoalKind::PlantCells);
        assert!(log.progress.get("plant3").is_none());

        bump(&mut log, &catalog, TaskGoalKind::HarvestCells);
        assert_eq!(log.progress.get("harvest1"), Some(&1));
        assert!(log.progress.get("buy2").is_none());
    }

    #[test]
    fn test_filter_active_and_completed() {
        let catalog = catalog();
        let mut log = TaskLog::default();
        log.completed.push("buy2".into());

        let active = filter_and_sort(&catalog, &log, TaskFilter::Active, TaskSort::Title);
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|t| t.id != "buy2"));

        let done = filter_and_sort(&catalog, &log, TaskFilter::Completed, TaskSort::Title);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, "buy2");
    }

    #[test]
    fn test_sort_by_reward_desc() {
        let catalog = catalog();
        let log = TaskLog::default();
        let sorted = filter_and_sort(&catalog, &log, TaskFilter::All, TaskSort::RewardDesc);
        let rewards: Vec<u64> = sorted.iter().map(|t| t.reward_points).collect();
        assert_eq!(rewards, vec![100, 50, 30]);
    }

    #[test]
    fn test_sort_by_title() {
        let catalog = catalog();
        let log = TaskLog::default();
        let sorted = filter_and_sort(&catalog, &log, TaskFilter::All, TaskSort::Title);
        let titles: Vec<&str> = sorted.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Big Spender", "First Harvest", "Green Thumb"]);
    }
}
