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

mod cli;
mod cmds;
mod progress;

use anyhow::{Context, Result};
use console::style;
use env_logger::{Env, Target, WriteStyle};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::io;

use cli::{Cli, Parser};
use cmds::{authenticate, launch_game, logout, update_install};
use mcli::{cancel_pair, env, InstallLock, LauncherConfig, LauncherOptions};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("{} {e:#}", style("Error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let launcher_dir = match &cli.launcher_dir {
        Some(dir) => absolute_path(dir)?,
        None => env::default_launcher_dir()
    };

    let options = LauncherOptions {
        game_version: cli.game_version,
        fabric_version: cli.fabric_version,
        mods_file: cli.mods.as_deref().map(absolute_path).transpose()?,
        max_ram_mb: cli.max_ram,
        launcher_dir
    };

    let mut config = LauncherConfig::load(options)?;
    init_logging(config.layout().log_file())?;

    println!("{}", style("=== Minecraft CLI Launcher ===").bold());
    log::info!("{} {} in {}", env::get_package_name(), env::get_package_version(), config.layout().root().display());

    if cli.logout {
        logout(&mut config);
        println!("Saved credentials removed");
        return Ok(ExitCode::SUCCESS);
    }

    let (cancel_handle, cancel) = cancel_pair();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, finishing in-flight work");
            cancel_handle.cancel();
        }
    });

    let identity = authenticate(&mut config, cli.offline, cancel.clone()).await?;

    let manifest = {
        let _lock = InstallLock::acquire(config.layout())?;

        match update_install(&config, cli.concurrency, cancel).await? {
            Some(manifest) => manifest,
            None => return Ok(ExitCode::FAILURE)
        }
    };

    if cli.no_launch {
        return Ok(ExitCode::SUCCESS);
    }

    launch_game(&config, identity, &manifest)
}

fn init_logging(log_file: PathBuf) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Unable to open log file {}", log_file.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .write_style(WriteStyle::Never)
        .init();

    Ok(())
}

fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    Ok(if !path.is_absolute() {
        std::env::current_dir()?.join(path)
    } else {
        path.to_owned()
    })
}
