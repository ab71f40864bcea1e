//! Named access to the shared files under `fixtures/`.
//!
//! `fixtures/manifest.json` maps a fixture name to a path relative to that directory,
//! grouped by kind: JSON scenes, base64 blobs and playback CSV tables.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<std::result::Result<Manifest, String>> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).map_err(|e| e.to_string())
});

#[derive(Debug, Deserialize)]
struct Manifest {
    scenes: HashMap<String, String>,
    blobs: HashMap<String, String>,
    playback: HashMap<String, String>,
}

fn manifest() -> Result<&'static Manifest> {
    MANIFEST
        .as_ref()
        .map_err(|e| anyhow!("fixtures manifest failed to parse: {e}"))
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

fn sorted_keys(map: &HashMap<String, String>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

pub mod scenes {
    use super::*;

    pub fn keys() -> Result<Vec<String>> {
        Ok(sorted_keys(&manifest()?.scenes))
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&manifest()?.scenes, "scene", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let text = json(name)?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse scene fixture {name}"))
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(&manifest()?.scenes, "scene", name)?))
    }
}

pub mod blobs {
    use super::*;

    pub fn keys() -> Result<Vec<String>> {
        Ok(sorted_keys(&manifest()?.blobs))
    }

    /// Base64 text with surrounding whitespace removed.
    pub fn base64(name: &str) -> Result<String> {
        let text = read_to_string(lookup(&manifest()?.blobs, "blob", name)?)?;
        Ok(text.trim().to_string())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(&manifest()?.blobs, "blob", name)?))
    }
}

pub mod playback {
    use super::*;

    pub fn keys() -> Result<Vec<String>> {
        Ok(sorted_keys(&manifest()?.playback))
    }

    pub fn csv(name: &str) -> Result<String> {
        read_to_string(lookup(&manifest()?.playback, "playback", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(&manifest()?.playback, "playback", name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_exists() {
        for name in scenes::keys().unwrap() {
            assert!(scenes::path(&name).unwrap().is_file(), "scene {name}");
        }
        for name in blobs::keys().unwrap() {
            assert!(!blobs::base64(&name).unwrap().is_empty(), "blob {name}");
        }
        for name in playback::keys().unwrap() {
            assert!(playback::csv(&name).unwrap().lines().count() > 0, "playback {name}");
        }
    }

    #[test]
    fn unknown_names_are_errors() {
        assert!(scenes::json("does-not-exist").is_err());
        assert!(blobs::base64("does-not-exist").is_err());
    }
}
