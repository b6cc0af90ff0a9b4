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

use anyhow::Result;
use console::style;

use mcli::{load_mod_list, CancelToken, HttpFileSource, LauncherConfig, Manifest, ManifestResolver, SyncEngine, SyncOptions};

use crate::progress::ProgressHandler;

/// Resolve and sync the installation, None when files failed to install
pub async fn update_install(
    config: &LauncherConfig,
    concurrency: u8,
    cancel: CancelToken
) -> Result<Option<Manifest>> {
    let options = config.options();

    let mods = match &options.mods_file {
        Some(path) => Some(load_mod_list(path)?),
        None => None
    };

    let manifest = ManifestResolver::new()
        .resolve(&options.game_version, &options.fabric_version, mods.as_deref())
        .await?;

    let sync_options = SyncOptions {
        concurrency: concurrency.into(),
        ..Default::default()
    };

    let engine = SyncEngine::new(HttpFileSource::new(), sync_options, cancel);
    let progress = ProgressHandler::new();

    let report = engine.sync(&manifest, config.layout().root(), &progress).await;
    progress.finish();
    let report = report?;

    println!(
        "{} downloaded, {} removed, {} up to date",
        report.downloaded, report.deleted, report.skipped
    );

    if report.is_success() {
        return Ok(Some(manifest));
    }

    for (path, err) in &report.failures {
        log::error!("{}: {err}", path.display());
        eprintln!("{} {err}", style("Failed:").red());
    }

    eprintln!("{} files could not be installed, see the log for details", report.failures.len());

    Ok(None)
}
