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

use anyhow::{anyhow, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::json;

use crate::api_client::ApiClient;
use crate::json::{CurseForgeFile, CurseForgeResponse};

const CURSE_API_URL: &str = "https://api.curseforge.com/v1/";

pub struct CurseClient {
    client: Client,
    api_key: Option<String>
}

impl CurseClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self { client: Client::new(), api_key }
    }

    /// Metadata for each file id, in the order requested
    pub async fn get_files(&self, file_ids: &[u32]) -> Result<Vec<CurseForgeFile>> {
        // avoid 400 bad request
        if file_ids.is_empty() {
            return Ok(Vec::new())
        }

        if self.api_key.is_none() {
            return Err(anyhow!("CURSEFORGE_API_KEY is not set"));
        }

        let response: CurseForgeResponse<Vec<CurseForgeFile>> =
            self.post("mods/files", &json!({"fileIds": file_ids}))
            .await?;

        // randomly curseforge returns duplicate entries, remove duplicates
        let mut data = response.data;
        data.sort_by_key(|f| f.file_id);
        data.dedup_by_key(|f| f.file_id);

        file_ids.iter()
            .map(|id| {
                let pos = data.binary_search_by_key(id, |f| f.file_id)
                    .map_err(|_| anyhow!("CurseForge file {id} not found"))?;
                Ok(pos)
            })
            .collect::<Result<Vec<_>>>()
            .map(|positions| reorder(data, &positions))
    }
}

fn reorder(data: Vec<CurseForgeFile>, positions: &[usize]) -> Vec<CurseForgeFile> {
    let mut slots: Vec<Option<CurseForgeFile>> = data.into_iter().map(Some).collect();
    positions.iter()
        .filter_map(|&pos| slots[pos].take())
        .collect()
}

impl ApiClient for CurseClient {
    fn request(&self, method: Method, uri: &str) -> RequestBuilder {
        let url = String::from(CURSE_API_URL) + uri;
        self.client.request(method, url)
            .header("x-api-key", self.api_key.as_deref().unwrap_or_default())
    }
}
