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

use std::fs;
use std::path::PathBuf;

use crate::{env, Error, Layout, PropertiesFile, SettingsStore};

pub const DEFAULT_GAME_VERSION: &str = "1.20.1";
pub const DEFAULT_FABRIC_VERSION: &str = "0.14.21";
pub const DEFAULT_MAX_RAM_MB: u32 = 2048;

const MAX_RAM_KEY: &str = "maxRam";

/// Options given on the command line
#[derive(Debug, Clone)]
pub struct LauncherOptions {
    pub game_version: String,
    pub fabric_version: String,
    pub mods_file: Option<PathBuf>,
    pub max_ram_mb: u32,
    pub launcher_dir: PathBuf
}

impl Default for LauncherOptions {
    fn default() -> Self {
        Self {
            game_version: DEFAULT_GAME_VERSION.to_string(),
            fabric_version: DEFAULT_FABRIC_VERSION.to_string(),
            mods_file: None,
            max_ram_mb: DEFAULT_MAX_RAM_MB,
            launcher_dir: env::default_launcher_dir()
        }
    }
}

/// Command line options merged with the settings file in the launcher directory
pub struct LauncherConfig {
    options: LauncherOptions,
    layout: Layout,
    settings: PropertiesFile
}

impl LauncherConfig {
    pub fn load(options: LauncherOptions) -> Result<Self, Error> {
        let launcher_dir = &options.launcher_dir;

        fs::create_dir_all(launcher_dir)
            .map_err(|e| Error::LauncherDir(launcher_dir.clone(), e))?;

        let layout = Layout::new(launcher_dir);
        let settings = PropertiesFile::load(layout.settings_file())?;

        Ok(Self { options, layout, settings })
    }

    pub fn options(&self) -> &LauncherOptions {
        &self.options
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn settings_mut(&mut self) -> &mut PropertiesFile {
        &mut self.settings
    }

    /// Max heap in megabytes, the `maxRam` setting overrides the command line
    pub fn max_ram_mb(&self) -> u32 {
        match self.settings.get(MAX_RAM_KEY) {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(ram) if ram > 0 => ram,
                _ => {
                    log::warn!("Ignoring invalid {MAX_RAM_KEY} setting '{value}'");
                    self.options.max_ram_mb
                }
            },
            None => self.options.max_ram_mb
        }
    }
}
