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

use anyhow::anyhow;
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use super::checksum::sha1_hex;
use super::*;
use crate::{cancel_pair, CancelToken, FileEntry, LaunchProfile, Manifest};

enum Serve {
    Body(&'static [u8]),
    /// Network error for the first n fetches
    FailTimes(usize, &'static [u8]),
    /// Sends the prefix then never completes
    Hang(&'static [u8])
}

struct FakeSource {
    files: HashMap<String, Serve>,
    fetches: Mutex<HashMap<String, usize>>,
    /// Paths that must already be gone when any fetch starts
    deleted_before_fetch: Vec<PathBuf>,
    barrier_violations: Mutex<usize>
}

impl FakeSource {
    fn new(files: Vec<(&str, Serve)>) -> Self {
        Self {
            files: files.into_iter().map(|(k, v)| (url(k).to_string(), v)).collect(),
            fetches: Mutex::new(HashMap::new()),
            deleted_before_fetch: Vec::new(),
            barrier_violations: Mutex::new(0)
        }
    }

    fn fetch_count(&self, name: &str) -> usize {
        *self.fetches.lock().unwrap().get(url(name).as_str()).unwrap_or(&0)
    }
}

impl RemoteFileSource for &FakeSource {
    async fn fetch(&self, url: &Url) -> anyhow::Result<RemoteFile> {
        if self.deleted_before_fetch.iter().any(|p| p.exists()) {
            *self.barrier_violations.lock().unwrap() += 1;
        }

        let count = {
            let mut fetches = self.fetches.lock().unwrap();
            let count = fetches.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let body: ByteStream = match self.files.get(url.as_str()) {
            Some(Serve::Body(body)) => body_stream(*body),
            Some(Serve::FailTimes(n, _)) if count <= *n => return Err(anyhow!("connection reset")),
            Some(Serve::FailTimes(_, body)) => body_stream(*body),
            Some(Serve::Hang(prefix)) => Box::pin(body_stream(*prefix).chain(stream::pending())),
            None => return Err(anyhow!("404 Not Found"))
        };

        Ok(RemoteFile { length: None, stream: body })
    }
}

fn body_stream(body: &'static [u8]) -> ByteStream {
    Box::pin(stream::iter(vec![Ok::<_, io::Error>(Bytes::from_static(body))]))
}

fn url(name: &str) -> Url {
    Url::parse(&format!("https://files.example.com/{name}")).unwrap()
}

fn entry(path: &str, content: &[u8]) -> FileEntry {
    FileEntry {
        source: url(path),
        size: Some(content.len() as u64),
        sha1: sha1_hex(content),
        path: PathBuf::from(path)
    }
}

fn manifest(entries: Vec<FileEntry>) -> Manifest {
    Manifest::new("1.20.1", "0.14.21", entries, vec![PathBuf::from("mods")], LaunchProfile::default())
        .unwrap()
}

fn options() -> SyncOptions {
    SyncOptions {
        concurrency: 4,
        max_attempts: 3,
        retry_delay: Duration::ZERO
    }
}

fn engine<'a>(source: &'a FakeSource) -> SyncEngine<&'a FakeSource> {
    SyncEngine::new(source, options(), CancelToken::none())
}

#[derive(Default)]
struct MockProgress {
    phases: Mutex<Vec<SyncPhase>>,
    files_done: Mutex<Vec<PathBuf>>
}

impl ProgressSink for MockProgress {
    fn phase(&self, phase: SyncPhase) {
        self.phases.lock().unwrap().push(phase);
    }

    fn bytes(&self, downloaded: u64, total: u64) {
        assert!(downloaded <= total || total == 0);
    }

    fn file_done(&self, path: &Path) {
        self.files_done.lock().unwrap().push(path.to_path_buf());
    }
}

const CLIENT: &[u8] = b"client jar bytes";
const MOD: &[u8] = b"fabric api jar bytes";

#[tokio::test]
async fn second_sync_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let source = FakeSource::new(vec![
        ("versions/1.20.1/1.20.1.jar", Serve::Body(CLIENT)),
        ("mods/fabric-api.jar", Serve::Body(MOD))
    ]);
    let manifest = manifest(vec![
        entry("versions/1.20.1/1.20.1.jar", CLIENT),
        entry("mods/fabric-api.jar", MOD)
    ]);
    let engine = engine(&source);
    let progress = MockProgress::default();

    let report = engine.sync(&manifest, dir.path(), &progress).await.unwrap();
    assert!(report.is_success());
    assert_eq!(report.downloaded, 2);
    assert_eq!(fs::read(dir.path().join("mods/fabric-api.jar")).unwrap(), MOD);
    assert_eq!(*progress.phases.lock().unwrap(), vec![
        SyncPhase::ReadingManifest, SyncPhase::Deleting, SyncPhase::Downloading,
        SyncPhase::Verifying, SyncPhase::Done
    ]);
    assert_eq!(progress.files_done.lock().unwrap().len(), 2);

    let plan = engine.plan(&manifest, dir.path()).unwrap();
    assert!(plan.is_noop());
    assert_eq!(plan.to_verify_only.len(), 2);

    let report = engine.apply(&plan, dir.path(), &SilentProgress).await.unwrap();
    assert_eq!(report.downloaded, 0);
    assert_eq!(report.skipped, 2);
    assert_eq!(source.fetch_count("mods/fabric-api.jar"), 1);
}

#[tokio::test]
async fn corrupt_download_fails_after_max_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let source = FakeSource::new(vec![("mods/sodium.jar", Serve::Body(b"tampered bytes here!"))]);
    let manifest = manifest(vec![entry("mods/sodium.jar", MOD)]);

    // stale copy from an older install
    fs::create_dir_all(dir.path().join("mods")).unwrap();
    fs::write(dir.path().join("mods/sodium.jar"), b"old").unwrap();

    let report = engine(&source).sync(&manifest, dir.path(), &SilentProgress).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].1, SyncError::IntegrityFailure { .. }));
    assert_eq!(source.fetch_count("mods/sodium.jar"), 3);
    assert!(!dir.path().join("mods/sodium.jar").exists());
    assert!(!dir.path().join("mods/sodium.jar.part").exists());
}

#[tokio::test]
async fn network_failure_retried() {
    let dir = tempfile::tempdir().unwrap();
    let source = FakeSource::new(vec![("mods/fabric-api.jar", Serve::FailTimes(2, MOD))]);
    let manifest = manifest(vec![entry("mods/fabric-api.jar", MOD)]);

    let report = engine(&source).sync(&manifest, dir.path(), &SilentProgress).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.downloaded, 1);
    assert_eq!(source.fetch_count("mods/fabric-api.jar"), 3);
}

#[tokio::test]
async fn missing_remote_is_network_failure() {
    let dir = tempfile::tempdir().unwrap();
    let source = FakeSource::new(vec![("mods/fabric-api.jar", Serve::Body(MOD))]);
    let manifest = manifest(vec![
        entry("mods/fabric-api.jar", MOD),
        entry("mods/gone.jar", b"gone")
    ]);

    let report = engine(&source).sync(&manifest, dir.path(), &SilentProgress).await.unwrap();

    assert_eq!(report.downloaded, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, PathBuf::from("mods/gone.jar"));
    assert!(matches!(report.failures[0].1, SyncError::NetworkFailure { .. }));
}

#[tokio::test]
async fn unlisted_mods_deleted_before_downloads() {
    let dir = tempfile::tempdir().unwrap();
    let mods_dir = dir.path().join("mods");
    fs::create_dir_all(&mods_dir).unwrap();
    fs::create_dir_all(dir.path().join("saves")).unwrap();
    fs::write(mods_dir.join("removed-mod.jar"), b"old mod").unwrap();
    fs::write(mods_dir.join("fabric-api.jar.part"), b"fabric").unwrap();
    fs::write(dir.path().join("saves/level.dat"), b"world").unwrap();

    let mut source = FakeSource::new(vec![("mods/fabric-api.jar", Serve::Body(MOD))]);
    source.deleted_before_fetch = vec![
        mods_dir.join("removed-mod.jar"),
        mods_dir.join("fabric-api.jar.part")
    ];
    let manifest = manifest(vec![entry("mods/fabric-api.jar", MOD)]);

    let engine = engine(&source);
    let plan = engine.plan(&manifest, dir.path()).unwrap();
    assert_eq!(plan.to_delete, vec![
        PathBuf::from("mods/fabric-api.jar.part"),
        PathBuf::from("mods/removed-mod.jar")
    ]);

    let report = engine.apply(&plan, dir.path(), &SilentProgress).await.unwrap();

    assert_eq!(report.deleted, 2);
    assert_eq!(report.downloaded, 1);
    assert_eq!(*source.barrier_violations.lock().unwrap(), 0);
    assert!(dir.path().join("saves/level.dat").exists());
}

#[tokio::test]
async fn deleted_path_can_be_downloaded_again() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("mods/a.jar");
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(&target, b"old a").unwrap();

    let mut source = FakeSource::new(vec![("mods/a.jar", Serve::Body(MOD))]);
    source.deleted_before_fetch = vec![target.clone()];

    let plan = SyncPlan {
        to_download: vec![entry("mods/a.jar", MOD)],
        to_delete: vec![PathBuf::from("mods/a.jar")],
        to_verify_only: Vec::new()
    };

    let report = engine(&source).apply(&plan, dir.path(), &SilentProgress).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.deleted, 1);
    assert_eq!(report.downloaded, 1);
    assert_eq!(*source.barrier_violations.lock().unwrap(), 0);
    assert_eq!(fs::read(&target).unwrap(), MOD);
}

#[tokio::test]
async fn blocking_plan_matches_direct_plan() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("mods")).unwrap();
    fs::write(dir.path().join("mods/fabric-api.jar"), MOD).unwrap();
    fs::write(dir.path().join("mods/stale.jar"), b"stale").unwrap();

    let manifest = manifest(vec![
        entry("mods/fabric-api.jar", MOD),
        entry("versions/1.20.1/1.20.1.jar", CLIENT)
    ]);

    let direct = plan::compute_plan(&manifest, dir.path()).unwrap();
    let blocking = plan::compute_plan_blocking(&manifest, dir.path()).await.unwrap();

    assert_eq!(blocking.to_download, direct.to_download);
    assert_eq!(blocking.to_delete, vec![PathBuf::from("mods/stale.jar")]);
    assert_eq!(blocking.to_verify_only, direct.to_verify_only);
    assert_eq!(blocking.to_verify_only.len(), 1);
}

#[tokio::test]
async fn size_mismatch_is_repaired() {
    let dir = tempfile::tempdir().unwrap();
    let source = FakeSource::new(vec![("versions/1.20.1/1.20.1.jar", Serve::Body(CLIENT))]);
    let manifest = manifest(vec![entry("versions/1.20.1/1.20.1.jar", CLIENT)]);

    let target = dir.path().join("versions/1.20.1/1.20.1.jar");
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(&target, b"truncated").unwrap();

    let engine = engine(&source);
    let plan = engine.plan(&manifest, dir.path()).unwrap();
    assert_eq!(plan.to_download.len(), 1);

    let report = engine.apply(&plan, dir.path(), &SilentProgress).await.unwrap();
    assert!(report.is_success());
    assert_eq!(fs::read(&target).unwrap(), CLIENT);
}

#[tokio::test]
async fn interrupted_download_leaves_target_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let source = FakeSource::new(vec![("mods/fabric-api.jar", Serve::Hang(b"fabric"))]);
    let manifest = manifest(vec![entry("mods/fabric-api.jar", MOD)]);

    let target = dir.path().join("mods/fabric-api.jar");
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(&target, b"previous version").unwrap();

    let engine = engine(&source);
    let interrupted = tokio::time::timeout(
        Duration::from_millis(200),
        engine.sync(&manifest, dir.path(), &SilentProgress)
    ).await;

    assert!(interrupted.is_err());
    assert_eq!(fs::read(&target).unwrap(), b"previous version");
}

#[tokio::test]
async fn cancelled_before_apply() {
    let dir = tempfile::tempdir().unwrap();
    let source = FakeSource::new(vec![
        ("mods/a.jar", Serve::Body(b"a")),
        ("mods/b.jar", Serve::Body(b"b"))
    ]);
    let manifest = manifest(vec![entry("mods/a.jar", b"a"), entry("mods/b.jar", b"b")]);

    let (handle, token) = cancel_pair();
    handle.cancel();

    let engine = SyncEngine::new(&source, options(), token);
    let report = engine.sync(&manifest, dir.path(), &SilentProgress).await.unwrap();

    assert_eq!(report.failures.len(), 2);
    assert!(report.failures.iter().all(|(_, e)| matches!(e, SyncError::Cancelled(_))));
    assert_eq!(source.fetch_count("mods/a.jar"), 0);
}

#[test]
fn concurrency_is_clamped() {
    let mut options = SyncOptions::default();
    assert_eq!(options.concurrency(), 6);

    options.concurrency = 0;
    assert_eq!(options.concurrency(), 1);

    options.concurrency = 64;
    assert_eq!(options.concurrency(), 16);
}
