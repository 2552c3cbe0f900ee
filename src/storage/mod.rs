//! Storage domain — per-key JSON persistence, export/import, and reset.
//!
//! Every persisted record lives under its own key, JSON-encoded, with no
//! schema versioning. Native builds keep one `<key>.json` file per key in
//! a `storage/` directory next to the executable; wasm builds use the
//! browser's localStorage. Writes are fire-and-forget: a change-detection
//! system persists a record whenever its resource mutates, and there is
//! no transactional guarantee across keys.
//!
//! Import reads a document the user drops at `storage/import.json`
//! (wasm: the import localStorage key); export writes next to the saves
//! (wasm: dedicated export localStorage keys).

use bevy::prelude::*;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// KEYS
// ═══════════════════════════════════════════════════════════════════════

pub const KEY_PROFILE: &str = "harvestboard.profile";
pub const KEY_GRID: &str = "harvestboard.grid";
pub const KEY_RESOURCES: &str = "harvestboard.resources";
pub const KEY_TASKS: &str = "harvestboard.tasks";
pub const KEY_STATS: &str = "harvestboard.stats";

pub const ALL_KEYS: [&str; 5] = [KEY_PROFILE, KEY_GRID, KEY_RESOURCES, KEY_TASKS, KEY_STATS];

// ═══════════════════════════════════════════════════════════════════════
// EXPORT BUNDLE
// ═══════════════════════════════════════════════════════════════════════

/// The download document: the three primary records under fixed top-level
/// keys. On import, each key that is present overwrites its record; the
/// rest are left alone.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExportBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<PlayerProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<FarmGrid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceLedger>,
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct StoragePlugin;

impl Plugin for StoragePlugin {
    fn build(&self, app: &mut App) {
        app
            // Boot: restore whatever the store has, then enter the dashboard.
            .add_systems(OnEnter(AppState::Loading), restore_persisted_state)
            .add_systems(
                Update,
                (
                    persist_on_change,
                    handle_export_request,
                    handle_import_file_request,
                    handle_import_request,
                    handle_reset_request,
                )
                    .chain()
                    .run_if(not(in_state(AppState::Loading))),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// KEY/VALUE BACKEND — native files
// ═══════════════════════════════════════════════════════════════════════

#[cfg(not(target_arch = "wasm32"))]
fn storage_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("storage")
}

#[cfg(not(target_arch = "wasm32"))]
fn key_path(key: &str) -> PathBuf {
    storage_directory().join(format!("{}.json", key))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write_key(key: &str, json: &str) -> Result<(), String> {
    let dir = storage_directory();
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| format!("Could not create storage directory: {}", e))?;
    }
    let path = key_path(key);
    // Write to a temp file first, then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)
        .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
    fs::rename(&tmp_path, &path).map_err(|e| format!("Rename failed: {}", e))?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn read_key(key: &str) -> Result<Option<String>, String> {
    let path = key_path(key);
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(&path)
        .map(Some)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn delete_key(key: &str) -> Result<(), String> {
    let path = key_path(key);
    if path.exists() {
        fs::remove_file(&path).map_err(|e| format!("Delete failed for {}: {}", path.display(), e))?;
    }
    Ok(())
}

/// Where the user drops a bundle for F9 import.
#[cfg(not(target_arch = "wasm32"))]
pub fn import_file_path() -> PathBuf {
    storage_directory().join("import.json")
}

#[cfg(not(target_arch = "wasm32"))]
fn read_import_document() -> Result<Option<String>, String> {
    let path = import_file_path();
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(&path)
        .map(Some)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))
}

// ═══════════════════════════════════════════════════════════════════════
// KEY/VALUE BACKEND — browser localStorage
// ═══════════════════════════════════════════════════════════════════════

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .ok_or_else(|| String::from("No window object"))?
        .local_storage()
        .map_err(|_| String::from("localStorage unavailable"))?
        .ok_or_else(|| String::from("localStorage unavailable"))
}

#[cfg(target_arch = "wasm32")]
pub fn write_key(key: &str, json: &str) -> Result<(), String> {
    local_storage()?
        .set_item(key, json)
        .map_err(|_| format!("localStorage write failed for {}", key))
}

#[cfg(target_arch = "wasm32")]
pub fn read_key(key: &str) -> Result<Option<String>, String> {
    local_storage()?
        .get_item(key)
        .map_err(|_| format!("localStorage read failed for {}", key))
}

#[cfg(target_arch = "wasm32")]
pub fn delete_key(key: &str) -> Result<(), String> {
    local_storage()?
        .remove_item(key)
        .map_err(|_| format!("localStorage delete failed for {}", key))
}

#[cfg(target_arch = "wasm32")]
const KEY_IMPORT: &str = "harvestboard.import";
#[cfg(target_arch = "wasm32")]
const KEY_EXPORT: &str = "harvestboard.export";
#[cfg(target_arch = "wasm32")]
const KEY_EXPORT_STATS: &str = "harvestboard.export.stats";

#[cfg(target_arch = "wasm32")]
fn read_import_document() -> Result<Option<String>, String> {
    read_key(KEY_IMPORT)
}

// ═══════════════════════════════════════════════════════════════════════
// RECORD HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn persist_record<T: Serialize>(key: &str, record: &T) {
    match serde_json::to_string(record) {
        Ok(json) => {
            if let Err(e) = write_key(key, &json) {
                warn!("[Storage] Persist failed for {}: {}", key, e);
            }
        }
        Err(e) => warn!("[Storage] Serialization failed for {}: {}", key, e),
    }
}

fn load_record<T: DeserializeOwned>(key: &str) -> Option<T> {
    match read_key(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("[Storage] Corrupt record under {}: {}. Using defaults.", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("[Storage] Read failed for {}: {}", key, e);
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Boot restore: each persisted record overwrites its resource if the
/// store has it; otherwise the resource gets first-load defaults. Then
/// the app enters the dashboard.
pub fn restore_persisted_state(
    mut profile: ResMut<PlayerProfile>,
    mut grid: ResMut<FarmGrid>,
    mut ledger: ResMut<ResourceLedger>,
    mut task_log: ResMut<TaskLog>,
    mut stats: ResMut<FarmStatsHistory>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    *profile = load_record(KEY_PROFILE).unwrap_or_default();
    *grid = load_record(KEY_GRID).unwrap_or_default();
    *ledger = load_record(KEY_RESOURCES).unwrap_or_else(ResourceLedger::starting);
    *task_log = load_record(KEY_TASKS).unwrap_or_default();
    *stats = load_record(KEY_STATS).unwrap_or_default();

    info!("[Storage] State restored. Entering dashboard.");
    next_state.set(AppState::Dashboard);
}

/// Fire-and-forget persistence: any persisted resource that changed this
/// frame is written back under its key.
pub fn persist_on_change(
    profile: Res<PlayerProfile>,
    grid: Res<FarmGrid>,
    ledger: Res<ResourceLedger>,
    task_log: Res<TaskLog>,
    stats: Res<FarmStatsHistory>,
) {
    if profile.is_changed() {
        persist_record(KEY_PROFILE, &*profile);
    }
    if grid.is_changed() {
        persist_record(KEY_GRID, &*grid);
    }
    if ledger.is_changed() {
        persist_record(KEY_RESOURCES, &*ledger);
    }
    if task_log.is_changed() {
        persist_record(KEY_TASKS, &*task_log);
    }
    if stats.is_changed() {
        persist_record(KEY_STATS, &*stats);
    }
}

// ── Export ──────────────────────────────────────────────────────────────

#[cfg(not(target_arch = "wasm32"))]
fn write_export_files(bundle_json: &str, stats_csv: &str) -> Result<String, String> {
    let dir = storage_directory().join("exports");
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| format!("Could not create exports directory: {}", e))?;
    }
    let stamp = unix_timestamp();
    let bundle_path = dir.join(format!("harvestboard_export_{}.json", stamp));
    fs::write(&bundle_path, bundle_json)
        .map_err(|e| format!("Write failed for {}: {}", bundle_path.display(), e))?;
    let csv_path = dir.join(format!("harvestboard_stats_{}.csv", stamp));
    fs::write(&csv_path, stats_csv)
        .map_err(|e| format!("Write failed for {}: {}", csv_path.display(), e))?;
    Ok(bundle_path.display().to_string())
}

/// Browser export: park the documents under dedicated localStorage keys
/// so the user can pull them out of devtools or a future download link.
#[cfg(target_arch = "wasm32")]
fn write_export_files(bundle_json: &str, stats_csv: &str) -> Result<String, String> {
    write_key(KEY_EXPORT, bundle_json)?;
    write_key(KEY_EXPORT_STATS, stats_csv)?;
    Ok(format!("localStorage key {}", KEY_EXPORT))
}

/// Render the stats time series as a CSV document.
pub fn stats_csv(history: &FarmStatsHistory) -> String {
    let mut out = String::from("timestamp,progress,points\n");
    for sample in history.samples.iter() {
        out.push_str(&format!(
            "{},{},{}\n",
            sample.timestamp, sample.progress, sample.points
        ));
    }
    out
}

/// Bundle the three primary records into one JSON document and offer it
/// as a download, plus the stats series as CSV.
pub fn handle_export_request(
    mut export_events: EventReader<ExportRequestEvent>,
    profile: Res<PlayerProfile>,
    grid: Res<FarmGrid>,
    ledger: Res<ResourceLedger>,
    stats: Res<FarmStatsHistory>,
    mut toast_events: EventWriter<ToastEvent>,
) {
    for _ in export_events.read() {
        let bundle = ExportBundle {
            profile: Some(profile.clone()),
            grid: Some(grid.clone()),
            resources: Some(ledger.clone()),
        };
        let json = match serde_json::to_string_pretty(&bundle) {
            Ok(json) => json,
            Err(e) => {
                warn!("[Storage] Export serialization failed: {}", e);
                toast_events.send(ToastEvent {
                    message: String::from("Export failed"),
                    duration_secs: 3.0,
                });
                continue;
            }
        };

        match write_export_files(&json, &stats_csv(&stats)) {
            Ok(dest) => {
                info!("[Storage] Exported to {}", dest);
                toast_events.send(ToastEvent {
                    message: String::from("Export saved"),
                    duration_secs: 3.0,
                });
            }
            Err(e) => {
                warn!("[Storage] Export failed: {}", e);
                toast_events.send(ToastEvent {
                    message: String::from("Export failed"),
                    duration_secs: 3.0,
                });
            }
        }
    }
}

// ── Import ──────────────────────────────────────────────────────────────

/// F9 path: read the import document from the store and forward it to
/// the bundle handler. A missing document is reported, not an error.
pub fn handle_import_file_request(
    mut file_events: EventReader<ImportFileRequestEvent>,
    mut import_events: EventWriter<ImportRequestEvent>,
    mut toast_events: EventWriter<ToastEvent>,
) {
    for _ in file_events.read() {
        match read_import_document() {
            Ok(Some(json)) => {
                import_events.send(ImportRequestEvent { json });
            }
            Ok(None) => {
                toast_events.send(ToastEvent {
                    message: String::from("No import file found"),
                    duration_secs: 3.0,
                });
            }
            Err(e) => {
                warn!("[Storage] Import read failed: {}", e);
                toast_events.send(ToastEvent {
                    message: String::from("Import failed"),
                    duration_secs: 3.0,
                });
            }
        }
    }
}

/// Apply an export bundle: every top-level key present overwrites its
/// record (in memory and in the store). Malformed JSON is caught and
/// surfaced as a generic failure; nothing changes.
pub fn handle_import_request(
    mut import_events: EventReader<ImportRequestEvent>,
    mut profile: ResMut<PlayerProfile>,
    mut grid: ResMut<FarmGrid>,
    mut ledger: ResMut<ResourceLedger>,
    mut toast_events: EventWriter<ToastEvent>,
) {
    for ev in import_events.read() {
        let bundle: ExportBundle = match serde_json::from_str(&ev.json) {
            Ok(bundle) => bundle,
            Err(e) => {
                warn!("[Storage] Import parse failed: {}", e);
                toast_events.send(ToastEvent {
                    message: String::from("Import failed"),
                    duration_secs: 3.0,
                });
                continue;
            }
        };

        if let Some(imported) = bundle.profile {
            *profile = imported;
            persist_record(KEY_PROFILE, &*profile);
        }
        if let Some(imported) = bundle.grid {
            *grid = imported;
            persist_record(KEY_GRID, &*grid);
        }
        if let Some(imported) = bundle.resources {
            *ledger = imported;
            persist_record(KEY_RESOURCES, &*ledger);
        }

        info!("[Storage] Import applied.");
        toast_events.send(ToastEvent {
            message: String::from("Import complete"),
            duration_secs: 3.0,
        });
    }
}

// ── Reset ───────────────────────────────────────────────────────────────

/// Bulk reset: delete every storage key and restore all persisted
/// resources to their first-load defaults.
pub fn handle_reset_request(
    mut reset_events: EventReader<ResetRequestEvent>,
    mut profile: ResMut<PlayerProfile>,
    mut grid: ResMut<FarmGrid>,
    mut ledger: ResMut<ResourceLedger>,
    mut task_log: ResMut<TaskLog>,
    mut stats: ResMut<FarmStatsHistory>,
    mut toast_events: EventWriter<ToastEvent>,
) {
    for _ in reset_events.read() {
        for key in ALL_KEYS {
            if let Err(e) = delete_key(key) {
                warn!("[Storage] Could not delete {}: {}", key, e);
            }
        }

        *profile = PlayerProfile::default();
        *grid = FarmGrid::default();
        *ledger = ResourceLedger::starting();
        *task_log = TaskLog::default();
        *stats = FarmStatsHistory::default();

        info!("[Storage] All data reset.");
        toast_events.send(ToastEvent {
            message: String::from("All data reset"),
            duration_secs: 3.0,
        });
    }
}
