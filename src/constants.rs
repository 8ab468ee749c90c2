//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the override file identity.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Beacon Colors";

/// Directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "BeaconColors";

/// Fixed identifier the override file is named after.
pub const PLUGIN_ID: &str = "com.beaconcolors.picker";

/// File name of the log written while the terminal UI owns the screen.
pub const LOG_FILE_NAME: &str = "beacon-colors.log";
