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

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    ReadingManifest,
    Deleting,
    Downloading,
    Verifying,
    Done
}

/// Receives sync progress, called from concurrent downloads
pub trait ProgressSink: Send + Sync {
    fn phase(&self, phase: SyncPhase);

    /// Bytes received so far out of the known total
    fn bytes(&self, downloaded: u64, total: u64);

    fn file_done(&self, _path: &Path) {}
}

pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn phase(&self, _phase: SyncPhase) {}

    fn bytes(&self, _downloaded: u64, _total: u64) {}
}
