//! Beacon Colors Library
//!
//! A color-override engine for hosts that only offer a fixed palette:
//! a persistent per-beacon override store, hooks that substitute the stored
//! color wherever the host paints a beacon, and an HSV picker to choose it.

pub mod beacons;
pub mod cli;
pub mod config;
pub mod constants;
pub mod host;
pub mod intercept;
pub mod logging;
pub mod models;
pub mod picker;
pub mod store;
#[cfg(feature = "ratatui")]
pub mod tui;

// Re-export commonly used types
pub use config::Config;
pub use host::{Hook, HookError, HookPoint, Host};
pub use intercept::{InstallReport, InterceptionLayer, SharedStore};
pub use models::{EntityId, Hsv, Palette, Rgba};
pub use picker::ColorPicker;
pub use store::OverrideStore;
