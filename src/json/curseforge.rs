/*
 * Steve Launcher - A Minecraft Launcher
 * Copyright (C) 2023 Josh Kropf <josh@slashdev.ca>
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

use serde::Deserialize;
use serde_repr::Deserialize_repr;

#[derive(Deserialize)]
pub struct CurseForgeResponse<T> {
    pub data: T
}

#[derive(Deserialize)]
// https://docs.curseforge.com/#tocS_File
pub struct CurseForgeFile {
    #[serde(rename(deserialize = "id"))]
    pub file_id: u32,
    #[serde(rename(deserialize = "displayName"))]
    pub display_name: String,
    #[serde(rename(deserialize = "fileName"))]
    pub file_name: String,
    pub hashes: Vec<FileHash>,
    #[serde(rename(deserialize = "fileLength"))]
    pub file_size: u64,
    #[serde(rename(deserialize = "downloadUrl"))]
    pub download_url: Option<String>
}

impl CurseForgeFile {
    pub fn sha1(&self) -> Option<&str> {
        self.hashes.iter()
            .find(|h| h.algo == HashAlgo::Sha1)
            .map(|h| h.value.as_str())
    }

    /// Download url, or the cdn location when the author disabled third party distribution
    pub fn resolved_download_url(&self) -> String {
        match &self.download_url {
            Some(url) => url.clone(),
            None => format!(
                "https://edge.forgecdn.net/files/{}/{}/{}",
                self.file_id / 1000,
                self.file_id % 1000,
                self.file_name
            )
        }
    }
}

#[derive(Deserialize)]
pub struct FileHash {
    pub value: String,
    pub algo: HashAlgo
}

#[derive(Deserialize_repr, PartialEq)]
#[repr(u8)]
pub enum HashAlgo {
    Sha1 = 1,
    Md5 = 2
}
