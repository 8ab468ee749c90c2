//! Headless commands for inspecting and editing the override file.
//!
//! These run as a separate process from the terminal UI and talk to the
//! same JSON file through [`OverrideStore`].

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use std::io::Write;
use tracing::info;

use crate::models::{EntityId, Rgba};
use crate::store::OverrideStore;

/// Subcommands of the `beacon-colors` binary.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the interactive beacon demo (default)
    Tui,
    /// Print every stored override
    List(ListArgs),
    /// Store a custom color for a beacon
    Set(SetArgs),
    /// Remove a beacon's custom color
    Clear(ClearArgs),
}

/// Print every stored override
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Store a custom color for a beacon
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Beacon id
    pub id: String,
    /// Color as #RRGGBB or #RRGGBBAA
    #[arg(value_name = "HEX")]
    pub color: String,
}

/// Remove a beacon's custom color
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Beacon id
    pub id: String,
}

impl ListArgs {
    /// Writes one `id  #RRGGBBAA` line per override, sorted by id.
    pub fn execute(&self, store: &OverrideStore, out: &mut impl Write) -> Result<()> {
        if self.json {
            let map: serde_json::Map<String, serde_json::Value> = store
                .iter()
                .map(|(id, color)| (id.to_string(), color.to_hex_rgba().into()))
                .collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&map)?)?;
            return Ok(());
        }

        if store.is_empty() {
            writeln!(out, "No custom colors in {}", store.path().display())?;
            return Ok(());
        }
        for (id, color) in store.iter() {
            writeln!(out, "{id}  {}", color.to_hex_rgba())?;
        }
        Ok(())
    }
}

impl SetArgs {
    /// Parses the color, stores it and writes the file.
    pub fn execute(&self, store: &mut OverrideStore, out: &mut impl Write) -> Result<()> {
        let id = EntityId::new(self.id.trim());
        if id.is_empty() {
            bail!("Beacon id must not be empty");
        }
        let color = Rgba::from_hex(&self.color)
            .with_context(|| format!("Invalid color '{}'", self.color))?;

        store.set(id.clone(), color);
        store.try_save()?;
        info!(%id, %color, "custom color stored");
        writeln!(out, "{id}  {}", color.to_hex_rgba())?;
        Ok(())
    }
}

impl ClearArgs {
    /// Removes the override. Clearing an id without one is not an error.
    pub fn execute(&self, store: &mut OverrideStore, out: &mut impl Write) -> Result<()> {
        if store.remove(self.id.trim()).is_some() {
            store.try_save()?;
            writeln!(out, "Cleared custom color for {}", self.id.trim())?;
        } else {
            writeln!(out, "No custom color for {}", self.id.trim())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> OverrideStore {
        OverrideStore::at(dir.path().join("overrides.json"))
    }

    #[test]
    fn test_set_then_list() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let mut out = Vec::new();

        SetArgs {
            id: "beacon-1".to_string(),
            color: "#FF0000".to_string(),
        }
        .execute(&mut store, &mut out)
        .unwrap();

        let mut reloaded = store_in(&dir);
        reloaded.load();
        let mut listed = Vec::new();
        ListArgs { json: false }
            .execute(&reloaded, &mut listed)
            .unwrap();
        assert_eq!(String::from_utf8(listed).unwrap(), "beacon-1  #FF0000FF\n");
    }

    #[test]
    fn test_set_accepts_alpha() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        SetArgs {
            id: "b".to_string(),
            color: "00ff0080".to_string(),
        }
        .execute(&mut store, &mut Vec::new())
        .unwrap();
        assert_eq!(store.get("b").unwrap().to_hex_rgba(), "#00FF0080");
    }

    #[test]
    fn test_set_rejects_bad_hex() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let err = SetArgs {
            id: "b".to_string(),
            color: "#12345".to_string(),
        }
        .execute(&mut store, &mut Vec::new())
        .unwrap_err();
        assert!(err.to_string().contains("Invalid color"));
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_rejects_empty_id() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let result = SetArgs {
            id: "  ".to_string(),
            color: "#FFFFFF".to_string(),
        }
        .execute(&mut store, &mut Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set("b".into(), Rgba::BLACK);

        let mut out = Vec::new();
        let clear = ClearArgs { id: "b".to_string() };
        clear.execute(&mut store, &mut out).unwrap();
        clear.execute(&mut store, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Cleared custom color for b\n"));
        assert!(text.ends_with("No custom color for b\n"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_json() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set("b".into(), Rgba::opaque(0.0, 0.0, 1.0));

        let mut out = Vec::new();
        ListArgs { json: true }.execute(&store, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["b"], "#0000FFFF");
    }

    #[test]
    fn test_list_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut out = Vec::new();
        ListArgs { json: false }.execute(&store, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("No custom colors"));
    }
}
