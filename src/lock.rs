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

use fs2::FileExt;
use std::fs::{File, OpenOptions};

use crate::{Error, Layout};

/// Exclusive hold on a launcher directory, released on drop
pub struct InstallLock {
    file: File
}

impl InstallLock {
    pub fn acquire(layout: &Layout) -> Result<Self, Error> {
        let path = layout.lock_file();

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| Error::LockFile(path.clone(), e))?;

        file.try_lock_exclusive()
            .map_err(|_| Error::LauncherDirLocked(layout.root().to_path_buf()))?;

        log::debug!("Acquired install lock {}", path.display());

        Ok(Self { file })
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());

        let held = InstallLock::acquire(&layout).unwrap();
        assert!(matches!(InstallLock::acquire(&layout), Err(Error::LauncherDirLocked(_))));

        drop(held);
        assert!(InstallLock::acquire(&layout).is_ok());
    }
}
