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

mod account;
mod api_client;
mod asset_client;
mod auth;
mod cancel;
mod config;
mod credentials;
mod curse_client;
mod json;
mod launch;
mod launch_cmd;
mod layout;
mod lock;
mod manifest;
mod resolver;
mod rules;
mod settings;

pub mod env;
pub mod sync;

use std::path::PathBuf;

pub use {
    account::{IdentityProvider, LoginCallback, MicrosoftProvider, ProviderProfile, ProviderSession},
    auth::{AuthError, AuthResolver, AuthState, Identity, IdentitySource, UsernamePrompt},
    cancel::{cancel_pair, CancelHandle, CancelToken},
    config::{LauncherConfig, LauncherOptions},
    credentials::CredentialRecord,
    launch::{build_launch_command, LaunchRequest},
    launch_cmd::LaunchCommand,
    layout::Layout,
    lock::InstallLock,
    manifest::{load_mod_list, FileEntry, LaunchProfile, Manifest, ManifestError, ModRef},
    resolver::ManifestResolver,
    settings::{PropertiesFile, SettingsStore},
    sync::{
        HttpFileSource, ProgressSink, RemoteFile, RemoteFileSource, SilentProgress, SyncEngine,
        SyncError, SyncOptions, SyncPhase, SyncPlan, SyncReport
    }
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unable to read settings file {path}: {source}")]
    SettingsRead { path: PathBuf, source: std::io::Error },
    #[error("Unable to write settings file {path}: {source}")]
    SettingsWrite { path: PathBuf, source: std::io::Error },
    #[error("Launcher directory {0} could not be created")]
    LauncherDir(PathBuf, #[source] std::io::Error),
    #[error("Launcher directory {0} is in use by another launcher process")]
    LauncherDirLocked(PathBuf),
    #[error("Lock file {0} could not be opened")]
    LockFile(PathBuf, #[source] std::io::Error),
    #[error("Classpath entry {0} contains a path separator")]
    InvalidClasspath(PathBuf)
}
