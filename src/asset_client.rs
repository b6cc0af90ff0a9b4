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

use anyhow::{anyhow, Result};
use reqwest::{Client, Method, RequestBuilder};

use crate::api_client::ApiClient;
use crate::json::{AssetManifest, FabricProfile, GameManifest, VersionManifest};

const VERSION_MANIFEST_URL: &str = "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";
const FABRIC_META_URL: &str = "https://meta.fabricmc.net/v2";
const RESOURCES_URL: &str = "https://resources.download.minecraft.net";

/// Client for mojang and fabric metadata
pub struct AssetClient {
    client: Client
}

impl AssetClient {
    pub fn new() -> Self {
        AssetClient { client: Client::new() }
    }

    pub async fn get_version_manifest(&self) -> Result<VersionManifest> {
        self.get(VERSION_MANIFEST_URL).await
    }

    pub async fn get_game_manifest(&self, url: &str) -> Result<GameManifest> {
        self.get(url).await
    }

    pub async fn get_asset_manifest(&self, url: &str) -> Result<AssetManifest> {
        self.get(url).await
    }

    pub async fn get_fabric_profile(&self, mc_version: &str, loader_version: &str) -> Result<FabricProfile> {
        self.get(&format!(
            "{FABRIC_META_URL}/versions/loader/{mc_version}/{loader_version}/profile/json"
        )).await
    }

    /// Checksum published beside a maven artifact
    pub async fn get_maven_sha1(&self, artifact_url: &str) -> Result<String> {
        let text = self.get_text(&format!("{artifact_url}.sha1")).await?;

        // some repositories append the file name after the hash
        let hash = text.split_whitespace().next()
            .ok_or_else(|| anyhow!("Empty checksum for {artifact_url}"))?;

        Ok(hash.to_lowercase())
    }
}

impl ApiClient for AssetClient {
    fn request(&self, method: Method, uri: &str) -> RequestBuilder {
        self.client.request(method, uri)
    }
}

/// Download location of an asset object, `None` for a hash too short to shard
pub fn asset_object_url(hash: &str) -> Option<String> {
    let prefix = hash.get(0..2)?;
    Some(format!("{RESOURCES_URL}/{prefix}/{hash}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url() {
        assert_eq!(
            asset_object_url("bdf48ef6b5d0d23bbb02e17d04865216179f510a").as_deref(),
            Some("https://resources.download.minecraft.net/bd/bdf48ef6b5d0d23bbb02e17d04865216179f510a")
        );
    }

    #[test]
    fn short_hash_has_no_url() {
        assert!(asset_object_url("a").is_none());
        assert!(asset_object_url("").is_none());
        assert!(asset_object_url("€").is_none());
    }
}
