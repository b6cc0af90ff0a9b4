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

pub use clap::Parser;
use std::path::PathBuf;

/// Minecraft launcher for a fabric installation with a curated mod list
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Minecraft version to install and launch
    #[arg(long, default_value = "1.20.1")]
    pub game_version: String,

    /// Fabric loader version
    #[arg(long, default_value = "0.14.21")]
    pub fabric_version: String,

    /// JSON array of {"projectId", "fileId"} CurseForge mods
    #[arg(long, value_name = "FILE")]
    pub mods: Option<PathBuf>,

    /// Maximum java heap in megabytes, the maxRam setting takes precedence
    #[arg(long, value_name = "MB", default_value_t = 2048)]
    pub max_ram: u32,

    /// Directory for game files and launcher settings
    /// [default: ./Minecraft-CLI-Launcher]
    #[arg(long, value_name = "DIR", verbatim_doc_comment)]
    pub launcher_dir: Option<PathBuf>,

    /// Play offline, prompts for a username when not given
    #[arg(long, value_name = "USERNAME", num_args = 0..=1)]
    pub offline: Option<Option<String>>,

    /// Forget saved Microsoft tokens and offline username, then exit
    #[arg(long)]
    pub logout: bool,

    /// Number of parallel downloads
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(1..=16))]
    pub concurrency: u8,

    /// Install or repair game files without launching
    #[arg(long)]
    pub no_launch: bool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["mcli"]).unwrap();

        assert_eq!(cli.game_version, "1.20.1");
        assert_eq!(cli.fabric_version, "0.14.21");
        assert_eq!(cli.max_ram, 2048);
        assert_eq!(cli.concurrency, 6);
        assert!(cli.offline.is_none());
    }

    #[test]
    fn offline_with_and_without_username() {
        let cli = Cli::try_parse_from(["mcli", "--offline"]).unwrap();
        assert_eq!(cli.offline, Some(None));

        let cli = Cli::try_parse_from(["mcli", "--offline", "Steve"]).unwrap();
        assert_eq!(cli.offline, Some(Some("Steve".to_string())));
    }

    #[test]
    fn unknown_argument_rejected() {
        assert!(Cli::try_parse_from(["mcli", "--fullscreen"]).is_err());
        assert!(Cli::try_parse_from(["mcli", "--concurrency", "32"]).is_err());
    }
}
