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

use std::collections::HashSet;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use super::checksum::{file_sha1, sha1_matches};
use super::SyncError;
use crate::{FileEntry, Manifest};

/// Difference between a manifest and the files on disk
#[derive(Debug, Default)]
pub struct SyncPlan {
    pub to_download: Vec<FileEntry>,
    /// Relative to the launcher directory
    pub to_delete: Vec<PathBuf>,
    pub to_verify_only: Vec<FileEntry>
}

impl SyncPlan {
    pub fn is_noop(&self) -> bool {
        self.to_download.is_empty() && self.to_delete.is_empty()
    }
}

pub(super) fn compute_plan(manifest: &Manifest, root: &Path) -> Result<SyncPlan, SyncError> {
    let mut plan = SyncPlan::default();

    for entry in manifest.entries() {
        if local_file_matches(entry, root)? {
            plan.to_verify_only.push(entry.clone());
        } else {
            plan.to_download.push(entry.clone());
        }
    }

    let claimed: HashSet<&Path> = manifest.entries().iter()
        .map(|e| e.path.as_path())
        .collect();

    for dir in manifest.managed_dirs() {
        plan.to_delete.extend(unclaimed_files(dir, root, &claimed)?);
    }

    log::debug!(
        "Sync plan: {} to download, {} to delete, {} up to date",
        plan.to_download.len(), plan.to_delete.len(), plan.to_verify_only.len()
    );

    Ok(plan)
}

/// `compute_plan` on the blocking pool, hashing every installed file would
/// otherwise stall the runtime thread
pub(super) async fn compute_plan_blocking(manifest: &Manifest, root: &Path) -> Result<SyncPlan, SyncError> {
    let manifest = manifest.clone();
    let plan_root = root.to_path_buf();

    tokio::task::spawn_blocking(move || compute_plan(&manifest, &plan_root)).await
        .map_err(|e| SyncError::filesystem(root, io::Error::other(e)))?
}

fn local_file_matches(entry: &FileEntry, root: &Path) -> Result<bool, SyncError> {
    let target = root.join(&entry.path);

    let meta = match fs::metadata(&target) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(SyncError::filesystem(&target, e))
    };

    if !meta.is_file() {
        return Ok(false);
    }

    // size mismatch is a repair without reading the file
    if entry.size.is_some_and(|size| size != meta.len()) {
        log::debug!("Size mismatch for {}", entry.path.display());
        return Ok(false);
    }

    let actual = file_sha1(&target)
        .map_err(|e| SyncError::filesystem(&target, e))?;

    Ok(sha1_matches(&actual, &entry.sha1))
}

/// Files directly inside a managed dir that no entry claims, leftover `.part` files included
fn unclaimed_files(dir: &Path, root: &Path, claimed: &HashSet<&Path>) -> Result<Vec<PathBuf>, SyncError> {
    let abs_dir = root.join(dir);

    let read_dir = match fs::read_dir(&abs_dir) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(SyncError::filesystem(&abs_dir, e))
    };

    let mut unclaimed = Vec::new();

    for dir_entry in read_dir {
        let dir_entry = dir_entry.map_err(|e| SyncError::filesystem(&abs_dir, e))?;
        let file_type = dir_entry.file_type()
            .map_err(|e| SyncError::filesystem(&dir_entry.path(), e))?;

        if !file_type.is_file() {
            continue;
        }

        let rel_path = dir.join(dir_entry.file_name());
        if !claimed.contains(rel_path.as_path()) {
            unclaimed.push(rel_path);
        }
    }

    unclaimed.sort();
    Ok(unclaimed)
}
