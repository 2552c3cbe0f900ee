//! Harvestboard library crate — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual app entry point.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can import types, systems, and resources without needing a
//! window or GPU.

pub mod shared;
pub mod farm;
pub mod wallet;
pub mod market;
pub mod tasks;
pub mod leaderboard;
pub mod admin;
pub mod storage;
pub mod data;
pub mod ui;
