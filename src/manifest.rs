/*
 * Steve Launcher - A Minecraft Launcher
 * Copyright (C) 2025 Josh Kropf <josh@slashdev.ca>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use url::Url;

#[derive(thiserror::Error, Debug)]
pub enum ManifestError {
    #[error("Unable to fetch {what}: {reason}")]
    SourceUnavailable { what: String, reason: String },
    #[error("Mod list is not a JSON array: {0}")]
    MalformedModList(String),
    #[error("Minecraft version '{0}' not found")]
    UnknownVersion(String),
    #[error("Path {0} is listed more than once")]
    DuplicatePath(PathBuf),
    #[error("Path {0} is not relative to the launcher directory")]
    UnsafePath(PathBuf)
}

impl ManifestError {
    pub(crate) fn unavailable<W: Into<String>>(what: W, err: anyhow::Error) -> Self {
        Self::SourceUnavailable { what: what.into(), reason: format!("{err:#}") }
    }
}

/// File that should exist under the launcher directory
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub source: Url,
    /// Expected length, not every maven repository reports one
    pub size: Option<u64>,
    pub sha1: String,
    /// Relative to the launcher directory
    pub path: PathBuf
}

/// Arguments and classpath for starting the game
#[derive(Debug, Clone, Default)]
pub struct LaunchProfile {
    pub main_class: String,
    pub jvm_args: Vec<String>,
    pub game_args: Vec<String>,
    /// Relative to the launcher directory, in classpath order
    pub classpath: Vec<PathBuf>,
    pub asset_index: String,
    pub version_type: String
}

/// Desired state of an installation
#[derive(Debug, Clone)]
pub struct Manifest {
    pub game_version: String,
    pub mod_loader_version: String,
    entries: Vec<FileEntry>,
    managed_dirs: Vec<PathBuf>,
    pub launch: LaunchProfile
}

impl Manifest {
    pub fn new(
        game_version: &str,
        mod_loader_version: &str,
        entries: Vec<FileEntry>,
        managed_dirs: Vec<PathBuf>,
        launch: LaunchProfile
    ) -> Result<Self, ManifestError> {
        let mut seen = HashSet::new();

        for path in entries.iter().map(|e| &e.path).chain(managed_dirs.iter()) {
            if !is_safe_relative(path) {
                return Err(ManifestError::UnsafePath(path.clone()));
            }
        }

        for entry in &entries {
            if !seen.insert(&entry.path) {
                return Err(ManifestError::DuplicatePath(entry.path.clone()));
            }
        }

        Ok(Self {
            game_version: game_version.to_string(),
            mod_loader_version: mod_loader_version.to_string(),
            entries,
            managed_dirs,
            launch
        })
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn managed_dirs(&self) -> &[PathBuf] {
        &self.managed_dirs
    }
}

fn is_safe_relative(path: &Path) -> bool {
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Entry of the mod list file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ModRef {
    #[serde(rename(deserialize = "projectId"))]
    pub project_id: u32,
    #[serde(rename(deserialize = "fileId"))]
    pub file_id: u32
}

/// Read the ordered list of CurseForge mods, skipping malformed elements
pub fn load_mod_list(path: &Path) -> Result<Vec<ModRef>, ManifestError> {
    let json = fs::read_to_string(path)
        .map_err(|e| ManifestError::SourceUnavailable {
            what: format!("mod list {}", path.display()),
            reason: e.to_string()
        })?;

    parse_mod_list(&json)
}

pub fn parse_mod_list(json: &str) -> Result<Vec<ModRef>, ManifestError> {
    let doc: Value = serde_json::from_str(json)
        .map_err(|e| ManifestError::MalformedModList(e.to_string()))?;

    let Value::Array(elements) = doc else {
        return Err(ManifestError::MalformedModList("top level value is not an array".to_string()));
    };

    Ok(elements.into_iter()
        .enumerate()
        .filter_map(|(i, elem)| match serde_json::from_value::<ModRef>(elem) {
            Ok(mod_ref) => Some(mod_ref),
            Err(e) => {
                log::warn!("Skipping mod list element {i}: {e}");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str) -> FileEntry {
        FileEntry {
            source: Url::parse("https://example.com/file").unwrap(),
            size: Some(1),
            sha1: "0".repeat(40),
            path: PathBuf::from(path)
        }
    }

    #[test]
    fn mod_list_skips_malformed_elements() {
        let mods = parse_mod_list(r#"[
            { "projectId": 306612, "fileId": 4586218 },
            { "projectId": "not a number", "fileId": 1 },
            { "fileId": 2 },
            { "projectId": 394468, "fileId": 4610126 }
        ]"#).unwrap();

        assert_eq!(mods, vec![
            ModRef { project_id: 306612, file_id: 4586218 },
            ModRef { project_id: 394468, file_id: 4610126 }
        ]);
    }

    #[test]
    fn mod_list_must_be_array() {
        assert!(matches!(
            parse_mod_list(r#"{ "projectId": 1, "fileId": 2 }"#),
            Err(ManifestError::MalformedModList(_))
        ));
        assert!(matches!(parse_mod_list("not json"), Err(ManifestError::MalformedModList(_))));
    }

    #[test]
    fn missing_mod_list_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_mod_list(&dir.path().join("mods.json"));

        assert!(matches!(result, Err(ManifestError::SourceUnavailable { .. })));
    }

    #[test]
    fn duplicate_paths_rejected() {
        let result = Manifest::new(
            "1.20.1", "0.14.21",
            vec![entry("mods/a.jar"), entry("mods/a.jar")],
            vec![PathBuf::from("mods")],
            LaunchProfile::default()
        );

        assert!(matches!(result, Err(ManifestError::DuplicatePath(_))));
    }

    #[test]
    fn unsafe_paths_rejected() {
        for path in ["../escape.jar", "/etc/passwd", "mods/../../x", ""] {
            let result = Manifest::new(
                "1.20.1", "0.14.21",
                vec![entry(path)],
                Vec::new(),
                LaunchProfile::default()
            );

            assert!(matches!(result, Err(ManifestError::UnsafePath(_))), "{path}");
        }
    }
}
