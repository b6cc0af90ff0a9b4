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

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;

use mcli::{ProgressSink, SyncPhase};

pub struct ProgressHandler {
    progress: ProgressBar
}

impl ProgressHandler {
    pub fn new() -> Self {
        let bar_style = ProgressStyle::with_template("{bar:40.cyan/blue} {bytes}/{total_bytes} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());

        ProgressHandler {
            progress: ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stdout())
                .with_style(bar_style)
        }
    }

    pub fn finish(&self) {
        self.progress.finish_and_clear();
    }
}

fn step_text(phase: SyncPhase) -> &'static str {
    match phase {
        SyncPhase::ReadingManifest => "Reading the JSON file...",
        SyncPhase::Deleting => "Removing outdated files...",
        SyncPhase::Downloading => "Downloading game files...",
        SyncPhase::Verifying => "Verifying downloads...",
        SyncPhase::Done => "Done!"
    }
}

impl ProgressSink for ProgressHandler {
    fn phase(&self, phase: SyncPhase) {
        let text = step_text(phase);

        log::info!("{text}");
        self.progress.println(format!("{}", style(text).cyan()));
    }

    fn bytes(&self, downloaded: u64, total: u64) {
        self.progress.set_length(total);
        self.progress.set_position(downloaded);
    }

    fn file_done(&self, path: &Path) {
        log::debug!("Installed {}", path.display());
        self.progress.set_message(path.display().to_string());
    }
}
