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

use futures_util::{stream, StreamExt};
use sha1::{Digest, Sha1};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use super::checksum::{file_sha1, sha1_matches};
use super::{ProgressSink, RemoteFileSource, SyncEngine, SyncError, SyncPhase, SyncPlan, SyncReport};
use crate::FileEntry;

/// Report counters shared by concurrent downloads
struct Tally {
    downloaded: AtomicUsize,
    bytes: AtomicU64,
    total_bytes: u64,
    installed: Mutex<Vec<FileEntry>>,
    failures: Mutex<Vec<(PathBuf, SyncError)>>
}

impl Tally {
    fn new(total_bytes: u64) -> Self {
        Self {
            downloaded: AtomicUsize::new(0),
            bytes: AtomicU64::new(0),
            total_bytes,
            installed: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new())
        }
    }

    fn add_bytes(&self, n: u64) -> u64 {
        self.bytes.fetch_add(n, Ordering::SeqCst) + n
    }

    fn sub_bytes(&self, n: u64) {
        self.bytes.fetch_sub(n, Ordering::SeqCst);
    }

    fn installed(&self, entry: &FileEntry) {
        self.downloaded.fetch_add(1, Ordering::SeqCst);
        lock(&self.installed).push(entry.clone());
    }

    fn fail(&self, entry: &FileEntry, err: SyncError) {
        lock(&self.failures).push((entry.path.clone(), err));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(super) async fn apply_plan<R: RemoteFileSource>(
    engine: &SyncEngine<R>,
    plan: &SyncPlan,
    root: &Path,
    progress: &dyn ProgressSink
) -> Result<SyncReport, SyncError> {
    fs::create_dir_all(root).await
        .map_err(|e| SyncError::filesystem(root, e))?;

    // every deletion completes before the first download starts
    progress.phase(SyncPhase::Deleting);
    let mut deleted = 0;

    for rel_path in &plan.to_delete {
        let path = root.join(rel_path);

        match fs::remove_file(&path).await {
            Ok(()) => {
                log::info!("Deleted {}", rel_path.display());
                deleted += 1;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(SyncError::filesystem(&path, e))
        }
    }

    progress.phase(SyncPhase::Downloading);

    let total_bytes = plan.to_download.iter().filter_map(|e| e.size).sum();
    let tally = Tally::new(total_bytes);

    let mut downloads = stream::iter(&plan.to_download)
        .map(|entry| download_entry(engine, entry, root, &tally, progress))
        .buffer_unordered(engine.options.concurrency());

    while let Some(result) = downloads.next().await {
        // filesystem failures abort the pass, in-flight downloads are dropped
        result?;
    }

    drop(downloads);

    progress.phase(SyncPhase::Verifying);

    let mut downloaded = tally.downloaded.into_inner();
    let mut failures = tally.failures.into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let installed = tally.installed.into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    for entry in installed {
        let target = root.join(&entry.path);
        let actual = hash_blocking(target.clone()).await?;

        if !sha1_matches(&actual, &entry.sha1) {
            log::error!("{} changed after install, removing", entry.path.display());
            remove_if_exists(&target).await;

            downloaded -= 1;
            failures.push((entry.path.clone(), SyncError::IntegrityFailure {
                path: entry.path.clone(),
                expected: entry.sha1.clone(),
                actual
            }));
        }
    }

    progress.phase(SyncPhase::Done);

    Ok(SyncReport {
        downloaded,
        deleted,
        skipped: plan.to_verify_only.len(),
        failures
    })
}

/// Download one entry with retries.
///
/// Only filesystem failures are returned as errors, other failures are
/// recorded in the tally once attempts are exhausted.
async fn download_entry<R: RemoteFileSource>(
    engine: &SyncEngine<R>,
    entry: &FileEntry,
    root: &Path,
    tally: &Tally,
    progress: &dyn ProgressSink
) -> Result<(), SyncError> {
    if engine.cancel.is_cancelled() {
        tally.fail(entry, SyncError::Cancelled(entry.path.clone()));
        return Ok(());
    }

    let target = root.join(&entry.path);

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await
            .map_err(|e| SyncError::filesystem(parent, e))?;
    }

    let part = part_path(&target);
    let max_attempts = engine.options.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let mut written = 0;

        match fetch_to_part(engine, entry, &part, &mut written, tally, progress).await {
            Ok(()) => {
                fs::rename(&part, &target).await
                    .map_err(|e| SyncError::filesystem(&target, e))?;

                log::info!("Downloaded {}", entry.path.display());
                tally.installed(entry);
                progress.file_done(&entry.path);

                return Ok(());
            }

            Err(err) => {
                remove_if_exists(&part).await;
                tally.sub_bytes(written);

                if let SyncError::FilesystemFailure { .. } = err {
                    return Err(err);
                }

                if attempt >= max_attempts {
                    log::error!("Giving up on {} after {attempt} attempts: {err}", entry.path.display());
                    remove_if_exists(&target).await;
                    tally.fail(entry, err);
                    return Ok(());
                }

                if engine.cancel.is_cancelled() {
                    tally.fail(entry, SyncError::Cancelled(entry.path.clone()));
                    return Ok(());
                }

                log::warn!("Download failed (attempt {attempt}/{max_attempts}): {err}. Retrying...");
                tokio::time::sleep(engine.options.retry_delay * attempt).await;
                attempt += 1;
            }
        }
    }
}

/// Stream the remote file into `part`, checking size and sha1 of what was written
async fn fetch_to_part<R: RemoteFileSource>(
    engine: &SyncEngine<R>,
    entry: &FileEntry,
    part: &Path,
    written: &mut u64,
    tally: &Tally,
    progress: &dyn ProgressSink
) -> Result<(), SyncError> {
    let network_failure = |reason: String| SyncError::NetworkFailure {
        path: entry.path.clone(),
        reason
    };

    let remote = engine.source.fetch(&entry.source).await
        .map_err(|e| network_failure(format!("{e:#}")))?;

    let mut file = File::create(part).await
        .map_err(|e| SyncError::filesystem(part, e))?;

    let mut hasher = Sha1::new();
    let mut stream = remote.stream;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| network_failure(e.to_string()))?;

        hasher.update(&chunk);
        file.write_all(&chunk).await
            .map_err(|e| SyncError::filesystem(part, e))?;

        *written += chunk.len() as u64;
        progress.bytes(tally.add_bytes(chunk.len() as u64), tally.total_bytes);
    }

    file.flush().await
        .and(file.sync_all().await)
        .map_err(|e| SyncError::filesystem(part, e))?;

    if let Some(size) = entry.size {
        if size != *written {
            return Err(SyncError::IntegrityFailure {
                path: entry.path.clone(),
                expected: format!("{size} bytes"),
                actual: format!("{written} bytes")
            });
        }
    }

    let actual = format!("{:x}", hasher.finalize());

    if !sha1_matches(&actual, &entry.sha1) {
        return Err(SyncError::IntegrityFailure {
            path: entry.path.clone(),
            expected: entry.sha1.clone(),
            actual
        });
    }

    Ok(())
}

/// Temp file beside the target, `name.jar` downloads into `name.jar.part`
fn part_path(target: &Path) -> PathBuf {
    let mut name = target.file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();

    name.push(".part");
    target.with_file_name(name)
}

async fn remove_if_exists(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => log::warn!("Unable to remove {}: {e}", path.display())
    }
}

async fn hash_blocking(path: PathBuf) -> Result<String, SyncError> {
    let hash_path = path.clone();

    tokio::task::spawn_blocking(move || file_sha1(&hash_path)).await
        .map_err(io::Error::other)
        .and_then(|result| result)
        .map_err(|e| SyncError::filesystem(&path, e))
}
