//! Plot lifecycle — the transition table and the systems that apply it.
//!
//! The whole contract lives in two pure functions (`transition_for`,
//! `apply_cell_action`) so it can be tested without an App; the Bevy
//! systems below are thin event plumbing around them.

use bevy::prelude::*;
use crate::shared::*;
use super::confirm::PendingConfirmations;

// ─────────────────────────────────────────────────────────────────────────────
// Transition table
// ─────────────────────────────────────────────────────────────────────────────

/// One row of the lifecycle table: what the step costs and where it leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSpec {
    pub cost: Option<ResourceKind>,
    pub next: CellStatus,
    /// Only the Ready → Harvested step pays out.
    pub awards_harvest: bool,
}

/// The fixed per-status transition table. Every status has exactly one
/// successor; growing and ready steps are free.
pub fn transition_for(status: CellStatus) -> TransitionSpec {
    match status {
        CellStatus::Empty => TransitionSpec {
            cost: Some(ResourceKind::Seeds),
            next: CellStatus::Planted,
            awards_harvest: false,
        },
        CellStatus::Planted => TransitionSpec {
            cost: Some(ResourceKind::Water),
            next: CellStatus::Growing,
            awards_harvest: false,
        },
        CellStatus::Growing => TransitionSpec {
            cost: None,
            next: CellStatus::Ready,
            awards_harvest: false,
        },
        CellStatus::Ready => TransitionSpec {
            cost: None,
            next: CellStatus::Harvested,
            awards_harvest: true,
        },
        CellStatus::Harvested => TransitionSpec {
            cost: Some(ResourceKind::Tools),
            next: CellStatus::Empty,
            awards_harvest: false,
        },
    }
}

/// What a successful step did, for event emission and payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub from: CellStatus,
    pub to: CellStatus,
    pub consumed: Option<ResourceKind>,
    pub harvested: bool,
}

/// Advance the plot at `index` one lifecycle step.
///
/// Rejections leave both the grid and the ledger untouched:
/// - a locked plot is rejected before anything else is looked at;
/// - a required resource at zero rejects the step (the spend is clamped,
///   never negative).
///
/// `now` stamps `planted_at`/`harvested_at` on the matching steps; the
/// Harvested → Empty step clears both.
pub fn apply_cell_action(
    grid: &mut FarmGrid,
    ledger: &mut ResourceLedger,
    index: usize,
    now: u64,
) -> Result<TransitionOutcome, CellActionError> {
    if FarmGrid::is_locked(index) {
        return Err(CellActionError::Locked);
    }

    let from = grid.cells[index].status;
    let spec = transition_for(from);

    if let Some(kind) = spec.cost {
        if !ledger.spend_one(kind) {
            return Err(CellActionError::InsufficientResource(kind));
        }
    }

    let cell = &mut grid.cells[index];
    cell.status = spec.next;
    match spec.next {
        CellStatus::Planted => cell.planted_at = Some(now),
        CellStatus::Harvested => cell.harvested_at = Some(now),
        CellStatus::Empty => {
            cell.planted_at = None;
            cell.harvested_at = None;
        }
        _ => {}
    }

    Ok(TransitionOutcome {
        from,
        to: spec.next,
        consumed: spec.cost,
        harvested: spec.awards_harvest,
    })
}

/// Spend one Fertilizer to advance a Planted or Growing plot without its
/// normal cost. Returns Ok(None) when the plot isn't in a boostable
/// status (silently ignored, matching how invalid tool use is treated).
pub fn apply_fertilizer(
    grid: &mut FarmGrid,
    ledger: &mut ResourceLedger,
    index: usize,
) -> Result<Option<TransitionOutcome>, CellActionError> {
    if FarmGrid::is_locked(index) {
        return Err(CellActionError::Locked);
    }

    let from = grid.cells[index].status;
    if !matches!(from, CellStatus::Planted | CellStatus::Growing) {
        return Ok(None);
    }

    if !ledger.spend_one(ResourceKind::Fertilizer) {
        return Err(CellActionError::InsufficientResource(ResourceKind::Fertilizer));
    }

    let to = from.next();
    grid.cells[index].status = to;

    Ok(Some(TransitionOutcome {
        from,
        to,
        consumed: Some(ResourceKind::Fertilizer),
        harvested: false,
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

/// Apply CellActionEvents. Successful steps emit CellTransitionEvent;
/// the harvest step additionally pays points + coins synchronously and
/// schedules the delayed confirmation. Rejections become a toast and a
/// typed rejection event; nothing is retried.
pub fn handle_cell_actions(
    mut action_events: EventReader<CellActionEvent>,
    mut grid: ResMut<FarmGrid>,
    mut ledger: ResMut<ResourceLedger>,
    mut pending: ResMut<PendingConfirmations>,
    mut transition_events: EventWriter<CellTransitionEvent>,
    mut rejected_events: EventWriter<CellActionRejectedEvent>,
    mut points_events: EventWriter<PointsAwardEvent>,
    mut coin_events: EventWriter<CoinChangeEvent>,
    mut toast_events: EventWriter<ToastEvent>,
) {
    for event in action_events.read() {
        let index = event.index;
        if index >= grid.cells.len() {
            continue;
        }

        match apply_cell_action(&mut grid, &mut ledger, index, unix_timestamp()) {
            Ok(outcome) => {
                info!(
                    "[Farm] {} {:?} -> {:?}",
                    FarmGrid::cell_id(index),
                    outcome.from,
                    outcome.to
                );
                transition_events.send(CellTransitionEvent {
                    index,
                    from: outcome.from,
                    to: outcome.to,
                    consumed: outcome.consumed,
                });
                if outcome.harvested {
                    points_events.send(PointsAwardEvent {
                        amount: HARVEST_POINTS,
                        reason: format!("Harvested {}", FarmGrid::cell_id(index)),
                    });
                    coin_events.send(CoinChangeEvent {
                        amount: HARVEST_COINS as i64,
                        reason: format!("Harvest payout for {}", FarmGrid::cell_id(index)),
                    });
                    pending.schedule(index);
                }
            }
            Err(reason) => {
                toast_events.send(ToastEvent {
                    message: reason.message(),
                    duration_secs: 2.0,
                });
                rejected_events.send(CellActionRejectedEvent { index, reason });
            }
        }
    }
}

/// Apply FertilizeEvents — the one-Fertilizer bonus step.
pub fn handle_fertilize(
    mut fertilize_events: EventReader<FertilizeEvent>,
    mut grid: ResMut<FarmGrid>,
    mut ledger: ResMut<ResourceLedger>,
    mut transition_events: EventWriter<CellTransitionEvent>,
    mut rejected_events: EventWriter<CellActionRejectedEvent>,
    mut toast_events: EventWriter<ToastEvent>,
) {
    for event in fertilize_events.read() {
        let index = event.index;
        if index >= grid.cells.len() {
            continue;
        }

        match apply_fertilizer(&mut grid, &mut ledger, index) {
            Ok(Some(outcome)) => {
                info!(
                    "[Farm] Fertilized {}: {:?} -> {:?}",
                    FarmGrid::cell_id(index),
                    outcome.from,
                    outcome.to
                );
                transition_events.send(CellTransitionEvent {
                    index,
                    from: outcome.from,
                    to: outcome.to,
                    consumed: outcome.consumed,
                });
            }
            Ok(None) => {} // not a boostable status, ignore
            Err(reason) => {
                toast_events.send(ToastEvent {
                    message: reason.message(),
                    duration_secs: 2.0,
                });
                rejected_events.send(CellActionRejectedEvent { index, reason });
            }
        }
    }
}
