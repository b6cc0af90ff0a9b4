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

use std::path::PathBuf;

use crate::{env, Error, Identity, LaunchCommand, Layout, Manifest};

#[cfg(windows)]
const CLASSPATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const CLASSPATH_SEPARATOR: &str = ":";

/// Everything needed to start the game once the installation is verified
pub struct LaunchRequest<'a> {
    pub identity: Identity,
    pub layout: &'a Layout,
    pub manifest: &'a Manifest,
    pub max_ram_mb: u32,
    pub java_path: PathBuf
}

pub fn build_launch_command(request: LaunchRequest) -> Result<LaunchCommand, Error> {
    let LaunchRequest { identity, layout, manifest, max_ram_mb, java_path } = request;
    let profile = &manifest.launch;

    let classpath = profile.classpath.iter()
        .map(|path| {
            let path = layout.root().join(path);
            let entry = path.to_string_lossy().to_string();

            if entry.contains(CLASSPATH_SEPARATOR) {
                Err(Error::InvalidClasspath(path))
            } else {
                Ok(entry)
            }
        })
        .collect::<Result<Vec<_>, _>>()?
        .join(CLASSPATH_SEPARATOR);

    let mut cmd = LaunchCommand::new(layout.root(), &java_path);

    cmd.arg(format!("-Xmx{max_ram_mb}M"))
        .args(&profile.jvm_args)
        .arg(&profile.main_class)
        .args(&profile.game_args);

    cmd.arg_ctx("natives_directory", layout.natives_dir().to_string_lossy())
        .arg_ctx("launcher_name", env::get_package_name())
        .arg_ctx("launcher_version", env::get_package_version())
        .arg_ctx("classpath", classpath)
        .arg_ctx("classpath_separator", CLASSPATH_SEPARATOR)
        .arg_ctx("library_directory", layout.libraries_dir().to_string_lossy())
        .arg_ctx("version_name", &manifest.game_version)
        .arg_ctx("version_type", &profile.version_type)
        .arg_ctx("game_directory", layout.root().to_string_lossy())
        .arg_ctx("assets_root", layout.assets_dir().to_string_lossy())
        .arg_ctx("assets_index_name", &profile.asset_index)
        .arg_ctx("auth_player_name", &identity.display_name)
        .arg_ctx("auth_uuid", &identity.subject_id)
        .arg_ctx("auth_access_token", &identity.session_token)
        .arg_ctx("auth_xuid", "")
        .arg_ctx("clientid", "")
        .arg_ctx("user_type", identity.user_type())
        .arg_ctx("user_properties", "{}");

    log::info!(
        "Launching minecraft {} as {} with {max_ram_mb}M heap",
        manifest.game_version, identity.display_name
    );

    Ok(cmd)
}
