//! Data models for colors, palettes and host entities.
//!
//! Models are independent of the host, the override engine and the UI.

pub mod color;
pub mod entity;
pub mod palette;

// Re-export all model types
pub use color::{ColorParseError, Hsv, Rgba};
pub use entity::EntityId;
pub use palette::{Palette, PaletteEntry};
