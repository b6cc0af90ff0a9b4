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

//! Incremental installation of manifest files under the launcher directory

mod apply;
mod checksum;
mod plan;
mod progress;
mod source;

#[cfg(test)]
mod tests;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{CancelToken, Manifest};

pub use plan::SyncPlan;
pub use progress::{ProgressSink, SilentProgress, SyncPhase};
pub use source::{ByteStream, HttpFileSource, RemoteFile, RemoteFileSource};

const MAX_CONCURRENCY: usize = 16;

#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    #[error("Download of {path} failed: {reason}")]
    NetworkFailure { path: PathBuf, reason: String },
    #[error("Checksum mismatch for {path}, expected {expected} got {actual}")]
    IntegrityFailure { path: PathBuf, expected: String, actual: String },
    #[error("Filesystem error at {path}: {source}")]
    FilesystemFailure { path: PathBuf, source: io::Error },
    #[error("Download of {0} cancelled")]
    Cancelled(PathBuf)
}

impl SyncError {
    fn filesystem(path: &Path, source: io::Error) -> Self {
        Self::FilesystemFailure { path: path.to_path_buf(), source }
    }
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Parallel downloads, clamped to 1..=16
    pub concurrency: usize,
    pub max_attempts: u32,
    /// Grows linearly with each attempt
    pub retry_delay: Duration
}

impl SyncOptions {
    pub fn concurrency(&self) -> usize {
        self.concurrency.clamp(1, MAX_CONCURRENCY)
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            concurrency: 6,
            max_attempts: 3,
            retry_delay: Duration::from_secs(1)
        }
    }
}

/// Outcome of applying a plan
#[derive(Debug, Default)]
pub struct SyncReport {
    pub downloaded: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub failures: Vec<(PathBuf, SyncError)>
}

impl SyncReport {
    /// The game must not be launched unless this is true
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct SyncEngine<R: RemoteFileSource> {
    source: R,
    options: SyncOptions,
    cancel: CancelToken
}

impl<R: RemoteFileSource> SyncEngine<R> {
    pub fn new(source: R, options: SyncOptions, cancel: CancelToken) -> Self {
        Self { source, options, cancel }
    }

    /// Compare the manifest to the files under `root`, hashing local files as needed
    pub fn plan(&self, manifest: &Manifest, root: &Path) -> Result<SyncPlan, SyncError> {
        plan::compute_plan(manifest, root)
    }

    /// Delete, download then verify.
    ///
    /// Every target is written to a `.part` file and renamed once its size
    /// and sha1 check out, an interrupted pass never leaves a partial file
    /// at a target path.
    pub async fn apply(
        &self,
        plan: &SyncPlan,
        root: &Path,
        progress: &dyn ProgressSink
    ) -> Result<SyncReport, SyncError> {
        apply::apply_plan(self, plan, root, progress).await
    }

    pub async fn sync(
        &self,
        manifest: &Manifest,
        root: &Path,
        progress: &dyn ProgressSink
    ) -> Result<SyncReport, SyncError> {
        progress.phase(SyncPhase::ReadingManifest);

        let plan = plan::compute_plan_blocking(manifest, root).await?;
        self.apply(&plan, root, progress).await
    }
}
