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

use anyhow::{Context, Result};
use std::fs;
use std::process::ExitCode;

use mcli::{build_launch_command, env, Identity, LaunchRequest, LauncherConfig, Manifest};

pub fn launch_game(config: &LauncherConfig, identity: Identity, manifest: &Manifest) -> Result<ExitCode> {
    let layout = config.layout();

    fs::create_dir_all(layout.natives_dir())
        .with_context(|| format!("Unable to create {}", layout.natives_dir().display()))?;

    let mut command = build_launch_command(LaunchRequest {
        identity,
        layout,
        manifest,
        max_ram_mb: config.max_ram_mb(),
        java_path: env::get_java_path()
    })?;

    println!("Launching Minecraft {}...", manifest.game_version);

    let mut child = command.spawn()
        .context("Unable to start java, is it installed or JAVA_HOME set?")?;

    let status = child.wait()?;
    log::info!("Game exited with {status}");

    Ok(match status.code() {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => {
            println!("Game exited with code {code}");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        },
        None => ExitCode::FAILURE
    })
}
