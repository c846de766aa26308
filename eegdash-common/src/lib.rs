//! # EEG Dashboard Common Library
//!
//! Shared code for the EEG dashboard client crates including:
//! - Wire models for the analysis backend (jobs, results, subjects, reports)
//! - Configuration loading (CLI → ENV → TOML → compiled defaults)
//! - Durable key/value storage for session state
//! - Client event bus
//! - Date and file size formatting helpers

pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod models;
pub mod storage;

pub use error::{Error, Result};
pub use events::{ClientEvent, EventBus};
pub use storage::{DurableStorage, FileStorage, MemoryStorage};
