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

use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "config.properties";
const LOG_FILE: &str = "launcher.log";
const LOCK_FILE: &str = ".mcli.lock";

/// Directory structure of the launcher root.
///
/// Functions without `&self` return paths relative to the root, which is
/// how manifest entries address files.
pub struct Layout {
    root: PathBuf
}

impl Layout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join(LOG_FILE)
    }

    pub fn lock_file(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.root.join(Self::libraries())
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn natives_dir(&self) -> PathBuf {
        self.root.join("natives")
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.root.join(Self::mods())
    }

    pub fn libraries() -> PathBuf {
        PathBuf::from("libraries")
    }

    pub fn mods() -> PathBuf {
        PathBuf::from("mods")
    }

    pub fn library(maven_path: &str) -> PathBuf {
        Self::libraries().join(maven_path)
    }

    pub fn version_json(mc_version: &str) -> PathBuf {
        PathBuf::from("versions")
            .join(mc_version)
            .join(format!("{mc_version}.json"))
    }

    pub fn client_jar(mc_version: &str) -> PathBuf {
        PathBuf::from("versions")
            .join(mc_version)
            .join(format!("{mc_version}.jar"))
    }

    pub fn asset_index(index_id: &str) -> PathBuf {
        PathBuf::from("assets")
            .join("indexes")
            .join(format!("{index_id}.json"))
    }

    pub fn asset_object(hash: &str) -> PathBuf {
        // first 2 chars of hash is used for directory of objects
        PathBuf::from("assets")
            .join("objects")
            .join(hash.get(0..2).unwrap_or(hash))
            .join(hash)
    }

    pub fn mod_file(file_name: &str) -> PathBuf {
        Self::mods().join(file_name)
    }
}
