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

use std::env;
use std::path::PathBuf;

/// Client id of the official launcher, used when `MCLI_MSA_CLIENT_ID` is unset
const DEFAULT_MSA_CLIENT_ID: &str = "9c203c7d-1816-4d24-87f2-9731ce05e187";

const LAUNCHER_DIR_NAME: &str = "Minecraft-CLI-Launcher";

/// Default launcher directory, `Minecraft-CLI-Launcher` in the working directory
pub fn default_launcher_dir() -> PathBuf {
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(LAUNCHER_DIR_NAME)
}

pub fn get_host_os() -> &'static str {
    match env::consts::OS {
        // mojang json files uses "osx" instead of "macos" for os name
        "macos" => "osx",
        os => os
    }
}

pub fn get_host_arch() -> &'static str {
    match env::consts::ARCH {
        "aarch64" => "arm64",
        arch => arch
    }
}

pub fn get_package_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}

pub fn get_package_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn get_msa_client_id() -> String {
    env::var("MCLI_MSA_CLIENT_ID")
        .unwrap_or_else(|_| DEFAULT_MSA_CLIENT_ID.to_string())
}

pub fn get_curse_api_key() -> Option<String> {
    env::var("CURSEFORGE_API_KEY").ok()
        .filter(|key| !key.is_empty())
}

/// Java executable from `JAVA_HOME`, or "java" in the system path
pub fn get_java_path() -> PathBuf {
    match env::var_os("JAVA_HOME") {
        Some(home) => {
            let exe = if cfg!(windows) { "java.exe" } else { "java" };
            PathBuf::from(home).join("bin").join(exe)
        }
        None => PathBuf::from("java")
    }
}
