//! Shared components, resources, events, and states for Harvestboard.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

// ═══════════════════════════════════════════════════════════════════════
// APP STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum AppState {
    #[default]
    Loading,
    Dashboard,
    Market,
    Leaderboard,
    Tasks,
}

// ═══════════════════════════════════════════════════════════════════════
// FARM GRID
// ═══════════════════════════════════════════════════════════════════════

/// Lifecycle status of a single plot. The only valid progression is the
/// fixed cycle Empty → Planted → Growing → Ready → Harvested → Empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CellStatus {
    #[default]
    Empty,
    Planted,
    Growing,
    Ready,
    Harvested,
}

impl CellStatus {
    pub fn next(self) -> Self {
        match self {
            CellStatus::Empty => CellStatus::Planted,
            CellStatus::Planted => CellStatus::Growing,
            CellStatus::Growing => CellStatus::Ready,
            CellStatus::Ready => CellStatus::Harvested,
            CellStatus::Harvested => CellStatus::Empty,
        }
    }

    /// Weight used by the aggregate farm-progress mean.
    pub fn progress_value(self) -> u32 {
        match self {
            CellStatus::Empty => 0,
            CellStatus::Planted => 25,
            CellStatus::Growing => 50,
            CellStatus::Ready => 75,
            CellStatus::Harvested => 100,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CellStatus::Empty => "Empty",
            CellStatus::Planted => "Planted",
            CellStatus::Growing => "Growing",
            CellStatus::Ready => "Ready",
            CellStatus::Harvested => "Harvested",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FarmCell {
    pub status: CellStatus,
    pub planted_at: Option<u64>,
    pub harvested_at: Option<u64>,
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct FarmGrid {
    /// Row-major, GRID_ROWS × GRID_COLS.
    pub cells: Vec<FarmCell>,
}

impl Default for FarmGrid {
    fn default() -> Self {
        Self {
            cells: vec![FarmCell::default(); GRID_CELLS],
        }
    }
}

impl FarmGrid {
    /// Plots past the unlock limit never transition.
    pub fn is_locked(index: usize) -> bool {
        index >= UNLOCKED_CELLS
    }

    pub fn row_col(index: usize) -> (usize, usize) {
        (index / GRID_COLS, index % GRID_COLS)
    }

    /// Stable display id for a plot, e.g. "r1c3".
    pub fn cell_id(index: usize) -> String {
        let (row, col) = Self::row_col(index);
        format!("r{}c{}", row, col)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES (the consumable kind, not Bevy's)
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Seeds,
    Water,
    Tools,
    Fertilizer,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Seeds,
        ResourceKind::Water,
        ResourceKind::Tools,
        ResourceKind::Fertilizer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Seeds => "Seeds",
            ResourceKind::Water => "Water",
            ResourceKind::Tools => "Tools",
            ResourceKind::Fertilizer => "Fertilizer",
        }
    }
}

/// Named non-negative counters consumed by plot actions.
/// Quantities never go below zero; decrements are clamped.
#[derive(Resource, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResourceLedger {
    pub quantities: HashMap<ResourceKind, u32>,
}

impl ResourceLedger {
    /// The ledger a fresh player starts with.
    pub fn starting() -> Self {
        let mut ledger = Self::default();
        ledger.grant(ResourceKind::Seeds, 5);
        ledger.grant(ResourceKind::Water, 5);
        ledger.grant(ResourceKind::Tools, 3);
        ledger.grant(ResourceKind::Fertilizer, 2);
        ledger
    }

    pub fn quantity(&self, kind: ResourceKind) -> u32 {
        self.quantities.get(&kind).copied().unwrap_or(0)
    }

    pub fn grant(&mut self, kind: ResourceKind, amount: u32) {
        let entry = self.quantities.entry(kind).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Spend one unit. Returns false (and changes nothing) when the
    /// counter is already at zero.
    pub fn spend_one(&mut self, kind: ResourceKind) -> bool {
        match self.quantities.get_mut(&kind) {
            Some(qty) if *qty > 0 => {
                *qty -= 1;
                true
            }
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER PROFILE & WALLET
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub display_name: String,
    pub points: u64,
    pub lifetime_points: u64,
    pub coins: u32,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            display_name: String::from("Farmer"),
            points: 0,
            lifetime_points: 0,
            coins: 200,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TASKS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskGoalKind {
    PlantCells,
    HarvestCells,
    BuyPacks,
    SpendFertilizer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDef {
    pub id: String,
    pub title: String,
    pub goal: TaskGoalKind,
    pub target: u32,
    pub reward_points: u64,
}

/// Static task catalog, seeded by the data plugin. Not persisted.
#[derive(Resource, Debug, Clone, Default)]
pub struct TaskCatalog {
    pub tasks: Vec<TaskDef>,
}

impl TaskCatalog {
    pub fn get(&self, id: &str) -> Option<&TaskDef> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

/// Per-player task progress. Persisted.
#[derive(Resource, Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaskLog {
    pub progress: HashMap<String, u32>,
    pub completed: Vec<String>,
}

impl TaskLog {
    pub fn is_completed(&self, task_id: &str) -> bool {
        self.completed.iter().any(|id| id == task_id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// MARKETPLACE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketListing {
    pub id: String,
    pub kind: ResourceKind,
    pub pack_size: u32,
    pub price_coins: u32,
}

/// Static marketplace catalog, seeded by the data plugin.
#[derive(Resource, Debug, Clone, Default)]
pub struct MarketCatalog {
    pub listings: Vec<MarketListing>,
}

impl MarketCatalog {
    pub fn get(&self, id: &str) -> Option<&MarketListing> {
        self.listings.iter().find(|l| l.id == id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// LEADERBOARD
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub points: u64,
    pub is_player: bool,
}

/// Mock competitor standings. The player's own entry is merged in at
/// display time from PlayerProfile.
#[derive(Resource, Debug, Clone, Default)]
pub struct Leaderboard {
    pub rivals: Vec<LeaderboardEntry>,
}

// ═══════════════════════════════════════════════════════════════════════
// FARM STATS TIME SERIES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProgressSample {
    pub timestamp: u64,
    pub progress: u8,
    pub points: u64,
}

/// Rolling history of aggregate farm progress, one sample per successful
/// transition. Capped at STATS_HISTORY_CAP. Persisted.
#[derive(Resource, Debug, Clone, Serialize, Deserialize, Default)]
pub struct FarmStatsHistory {
    pub samples: Vec<ProgressSample>,
}

impl FarmStatsHistory {
    pub fn push(&mut self, sample: ProgressSample) {
        self.samples.push(sample);
        if self.samples.len() > STATS_HISTORY_CAP {
            let overflow = self.samples.len() - STATS_HISTORY_CAP;
            self.samples.drain(..overflow);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// NOTIFICATIONS
// ═══════════════════════════════════════════════════════════════════════

/// Recent notifications shown in the dashboard list. Session-local.
#[derive(Resource, Debug, Clone, Default)]
pub struct NotificationLog {
    pub entries: VecDeque<String>,
}

impl NotificationLog {
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push_front(message.into());
        while self.entries.len() > NOTIFICATION_CAP {
            self.entries.pop_back();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════

/// The two recoverable rejection reasons a plot action can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellActionError {
    Locked,
    InsufficientResource(ResourceKind),
}

impl CellActionError {
    pub fn message(self) -> String {
        match self {
            CellActionError::Locked => String::from("This plot is locked"),
            CellActionError::InsufficientResource(_) => String::from("Not enough resources"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// User-triggered request to advance a plot one lifecycle step.
#[derive(Event, Debug, Clone)]
pub struct CellActionEvent {
    pub index: usize,
}

/// User-triggered request to spend Fertilizer on a plot for a bonus step.
#[derive(Event, Debug, Clone)]
pub struct FertilizeEvent {
    pub index: usize,
}

/// Emitted after a plot successfully changed status.
#[derive(Event, Debug, Clone)]
pub struct CellTransitionEvent {
    pub index: usize,
    pub from: CellStatus,
    pub to: CellStatus,
    pub consumed: Option<ResourceKind>,
}

/// Emitted when a plot action was rejected.
#[derive(Event, Debug, Clone)]
pub struct CellActionRejectedEvent {
    pub index: usize,
    pub reason: CellActionError,
}

#[derive(Event, Debug, Clone)]
pub struct PointsAwardEvent {
    pub amount: u64,
    pub reason: String,
}

/// Positive = earn, negative = spend. Applied centrally by the wallet.
#[derive(Event, Debug, Clone)]
pub struct CoinChangeEvent {
    pub amount: i64,
    pub reason: String,
}

/// Request to buy a marketplace listing.
#[derive(Event, Debug, Clone)]
pub struct PurchaseEvent {
    pub listing_id: String,
}

/// Emitted after a purchase debited coins and credited the ledger.
#[derive(Event, Debug, Clone)]
pub struct PurchaseCompletedEvent {
    pub listing_id: String,
    pub kind: ResourceKind,
    pub quantity: u32,
}

#[derive(Event, Debug, Clone)]
pub struct TaskCompletedEvent {
    pub task_id: String,
    pub reward_points: u64,
}

/// A line for the dashboard notification list (also toasted).
#[derive(Event, Debug, Clone)]
pub struct NotificationEvent {
    pub message: String,
}

/// Transient on-screen message.
#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
    pub duration_secs: f32,
}

// ── Storage events ──────────────────────────────────────────────────────

/// Bundle profile + grid + resources into one JSON document on disk.
#[derive(Event, Debug, Clone)]
pub struct ExportRequestEvent;

/// Apply an export bundle: every top-level key present overwrites the
/// matching storage entry and in-memory resource.
#[derive(Event, Debug, Clone)]
pub struct ImportRequestEvent {
    pub json: String,
}

/// Read the import document from the store (native: `storage/import.json`,
/// wasm: the import localStorage key) and apply it as a bundle.
#[derive(Event, Debug, Clone)]
pub struct ImportFileRequestEvent;

/// Wipe every storage key and restore all persisted resources to defaults.
#[derive(Event, Debug, Clone)]
pub struct ResetRequestEvent;

// ── Admin events ────────────────────────────────────────────────────────

#[derive(Event, Debug, Clone)]
pub struct AdminGrantResourceEvent {
    pub kind: ResourceKind,
    pub amount: u32,
}

#[derive(Event, Debug, Clone)]
pub struct AdminGrantPointsEvent {
    pub amount: u64,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const GRID_ROWS: usize = 5;
pub const GRID_COLS: usize = 5;
pub const GRID_CELLS: usize = GRID_ROWS * GRID_COLS;
/// Plots with index >= this never transition.
pub const UNLOCKED_CELLS: usize = 10;

pub const HARVEST_POINTS: u64 = 50;
pub const HARVEST_COINS: u32 = 10;
/// Delay before the harvest confirmation notification fires.
pub const CONFIRM_DELAY_SECS: f32 = 1.5;

pub const STATS_HISTORY_CAP: usize = 200;
pub const NOTIFICATION_CAP: usize = 20;

pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

/// Current unix time in seconds, used for plot timestamps and stats
/// samples. Returns 0 on wasm where SystemTime is unavailable.
#[cfg(not(target_arch = "wasm32"))]
pub fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
pub fn unix_timestamp() -> u64 {
    0
}
