//! Persistent table of user-chosen beacon colors.
//!
//! Entries exist only for beacons the user colored by hand; a missing entry
//! means "use the host palette color". Callers flush the table after every
//! mutation. Persistence is never fatal: I/O and parse failures are logged
//! and the in-memory table stays authoritative.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{EntityId, Rgba};

/// Mapping from entity id to override color, backed by a JSON file.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideStore {
    path: PathBuf,
    colors: BTreeMap<EntityId, Rgba>,
}

impl OverrideStore {
    /// Creates an empty store persisting to `path`. Nothing is read.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            colors: BTreeMap::new(),
        }
    }

    /// Creates a store at the path derived from `config` and loads it.
    pub fn open(config: &Config) -> Result<Self> {
        let mut store = Self::at(config.store_path()?);
        store.load();
        Ok(store)
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the override for `id`, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Rgba> {
        self.colors.get(id).copied()
    }

    /// Inserts or replaces the override for `id`. Channels are clamped to `[0, 1]`.
    pub fn set(&mut self, id: EntityId, color: Rgba) {
        self.colors.insert(id, color.clamped());
    }

    /// Removes the override for `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<Rgba> {
        self.colors.remove(id)
    }

    /// Number of overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns true if no beacon has an override.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Iterates overrides ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &Rgba)> {
        self.colors.iter()
    }

    /// Writes the whole table to disk, replacing the previous file.
    ///
    /// Failures are logged and swallowed.
    pub fn save(&self) {
        match self.try_save() {
            Ok(()) => debug!(path = %self.path.display(), count = self.colors.len(), "saved custom colors"),
            Err(err) => warn!("Failed to save custom colors: {err:#}"),
        }
    }

    /// Writes the whole table to disk, reporting failures to the caller.
    ///
    /// Uses temp file + rename so a crash mid-write never truncates the table.
    pub fn try_save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).context(format!(
                "Failed to create override directory: {}",
                dir.display()
            ))?;
        }

        let json = serde_json::to_string_pretty(&self.colors)
            .context("Failed to serialize custom colors")?;

        let temp_path = self.path.with_extension("json.tmp");

        fs::write(&temp_path, json).context(format!(
            "Failed to write temp override file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, &self.path).context(format!(
            "Failed to rename temp override file to: {}",
            self.path.display()
        ))?;

        Ok(())
    }

    /// Replaces the in-memory table with the file contents.
    ///
    /// A missing file leaves the store empty. An unreadable or unparsable file
    /// is logged and treated as empty; it is not rewritten until the next save.
    pub fn load(&mut self) {
        if !self.path.exists() {
            self.colors.clear();
            return;
        }

        match self.read_file() {
            Ok(colors) => {
                debug!(path = %self.path.display(), count = colors.len(), "loaded custom colors");
                self.colors = colors;
            }
            Err(err) => {
                warn!("Failed to load custom colors: {err:#}");
                self.colors.clear();
            }
        }
    }

    fn read_file(&self) -> Result<BTreeMap<EntityId, Rgba>> {
        let json = fs::read_to_string(&self.path).context(format!(
            "Failed to read override file: {}",
            self.path.display()
        ))?;

        // A literal `null` is an empty table, not corruption
        let colors: Option<BTreeMap<EntityId, Rgba>> = serde_json::from_str(&json).context(
            format!("Failed to parse override file: {}", self.path.display()),
        )?;

        Ok(colors
            .unwrap_or_default()
            .into_iter()
            .map(|(id, color)| (id, color.clamped()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    const RED: Rgba = Rgba::opaque(1.0, 0.0, 0.0);

    fn store_in(dir: &TempDir) -> OverrideStore {
        OverrideStore::at(dir.path().join("overrides.json"))
    }

    #[test]
    fn test_get_set_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        assert_eq!(store.get("beacon-1"), None);

        store.set("beacon-1".into(), RED);
        assert_eq!(store.get("beacon-1"), Some(RED));

        // Last write wins
        let blue = Rgba::opaque(0.0, 0.0, 1.0);
        store.set("beacon-1".into(), blue);
        assert_eq!(store.get("beacon-1"), Some(blue));
        assert_eq!(store.len(), 1);

        assert_eq!(store.remove("beacon-1"), Some(blue));
        assert_eq!(store.remove("beacon-1"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_clamps_channels() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set("b".into(), Rgba::new(2.0, -1.0, 0.5, 1.0));
        assert_eq!(store.get("b"), Some(Rgba::new(1.0, 0.0, 0.5, 1.0)));
    }

    #[test]
    fn test_save_then_load_reproduces_mapping() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set("beacon-1".into(), RED);
        store.set("beacon-9".into(), Rgba::new(0.2, 0.4, 0.6, 0.8));
        store.save();

        let mut restarted = store_in(&dir);
        restarted.load();
        assert_eq!(restarted, store);
        assert!(!dir.path().join("overrides.json.tmp").exists());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set("stale".into(), RED);
        store.load();
        assert!(store.is_empty());
    }

    #[test]
    #[traced_test]
    fn test_load_corrupt_file_is_empty_and_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("overrides.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = OverrideStore::at(&path);
        store.set("stale".into(), RED);
        store.load();

        assert!(store.is_empty());
        assert!(logs_contain("Failed to load custom colors"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_load_null_file_is_empty_without_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("overrides.json");
        fs::write(&path, "null").unwrap();

        let mut store = OverrideStore::at(&path);
        store.load();
        assert!(store.is_empty());
    }

    #[test]
    #[traced_test]
    fn test_save_failure_is_swallowed() {
        let dir = TempDir::new().unwrap();
        // The parent "directory" is a regular file, so nothing can be created under it
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let mut store = OverrideStore::at(blocker.join("overrides.json"));
        store.set("beacon-1".into(), RED);
        store.save();

        assert!(logs_contain("Failed to save custom colors"));
        assert_eq!(store.get("beacon-1"), Some(RED));
    }

    #[test]
    fn test_file_shape() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set("beacon-1".into(), RED);
        store.save();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"beacon-1": {"r": 1.0, "g": 0.0, "b": 0.0, "a": 1.0}})
        );
    }
}
