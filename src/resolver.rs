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

use std::collections::HashSet;
use std::path::PathBuf;
use url::Url;

use crate::asset_client::{asset_object_url, AssetClient};
use crate::curse_client::CurseClient;
use crate::json::{CurseForgeFile, FabricProfile, GameManifest};
use crate::{env, FileEntry, LaunchProfile, Layout, Manifest, ManifestError, ModRef};

/// Builds the manifest of a fabric installation from the remote metadata services
pub struct ManifestResolver {
    assets: AssetClient,
    curse: CurseClient
}

impl ManifestResolver {
    pub fn new() -> Self {
        Self {
            assets: AssetClient::new(),
            curse: CurseClient::new(env::get_curse_api_key())
        }
    }

    /// Without a mod list the mods directory is left alone, with one it is
    /// managed and unlisted mods are removed on sync
    pub async fn resolve(
        &self,
        game_version: &str,
        fabric_version: &str,
        mods: Option<&[ModRef]>
    ) -> Result<Manifest, ManifestError> {
        let mut entries = EntryCollector::default();

        let version_manifest = self.assets.get_version_manifest().await
            .map_err(|e| ManifestError::unavailable("version manifest", e))?;

        let version = version_manifest.find(game_version)
            .ok_or_else(|| ManifestError::UnknownVersion(game_version.to_string()))?;

        let game = self.assets.get_game_manifest(&version.url).await
            .map_err(|e| ManifestError::unavailable(format!("version {game_version}"), e))?;

        entries.push(&version.url, None, &version.sha1, Layout::version_json(game_version))?;

        let client = game.client_download()
            .ok_or_else(|| ManifestError::SourceUnavailable {
                what: format!("version {game_version}"),
                reason: "no client download listed".to_string()
            })?;
        let client_jar = Layout::client_jar(game_version);
        entries.push(&client.url, Some(client.size), &client.sha1, client_jar.clone())?;

        let vanilla_classpath = self.collect_libraries(&game, &mut entries)?;
        self.collect_assets(&game, &mut entries).await?;

        let fabric = self.assets.get_fabric_profile(game_version, fabric_version).await
            .map_err(|e| ManifestError::unavailable(format!("fabric {fabric_version}"), e))?;

        let fabric_classpath = self.collect_fabric(&fabric, &mut entries).await?;

        let mut managed_dirs = Vec::new();

        if let Some(mods) = mods {
            self.collect_mods(mods, &mut entries).await?;
            managed_dirs.push(Layout::mods());
        }

        let mut classpath = fabric_classpath;
        classpath.extend(vanilla_classpath);
        classpath.push(client_jar);

        let launch = launch_profile(&game, &fabric, classpath);

        log::info!(
            "Resolved {} files for minecraft {game_version} fabric {fabric_version}",
            entries.entries.len()
        );

        Manifest::new(
            game_version,
            fabric_version,
            entries.entries,
            managed_dirs,
            launch
        )
    }

    fn collect_libraries(
        &self,
        game: &GameManifest,
        entries: &mut EntryCollector
    ) -> Result<Vec<PathBuf>, ManifestError> {
        let mut classpath = Vec::new();

        for lib in game.matched_libraries() {
            let artifacts = match lib.artifacts_for_download() {
                Ok(artifacts) => artifacts,
                Err(e) => {
                    log::warn!("Skipping library: {e}");
                    continue;
                }
            };

            for artifact in artifacts {
                let path = Layout::library(&artifact.path);
                let d = &artifact.download;

                if entries.push(&d.url, Some(d.size), &d.sha1, path.clone())? {
                    classpath.push(path);
                }
            }
        }

        Ok(classpath)
    }

    async fn collect_assets(
        &self,
        game: &GameManifest,
        entries: &mut EntryCollector
    ) -> Result<(), ManifestError> {
        let index = &game.asset_index;

        entries.push(
            &index.download.url,
            Some(index.download.size),
            &index.download.sha1,
            Layout::asset_index(&index.id)
        )?;

        let assets = self.assets.get_asset_manifest(&index.download.url).await
            .map_err(|e| ManifestError::unavailable(format!("asset index {}", index.id), e))?;

        for (hash, size) in assets.unique_objects() {
            let Some(url) = asset_object_url(hash) else {
                log::warn!("Skipping asset object with malformed hash '{hash}'");
                continue;
            };

            entries.push(&url, Some(size), hash, Layout::asset_object(hash))?;
        }

        Ok(())
    }

    async fn collect_fabric(
        &self,
        fabric: &FabricProfile,
        entries: &mut EntryCollector
    ) -> Result<Vec<PathBuf>, ManifestError> {
        let mut classpath = Vec::new();

        for lib in &fabric.libraries {
            let (Some(maven_path), Some(url)) = (lib.maven_path(), lib.download_url()) else {
                log::warn!("Skipping fabric library with malformed name {}", lib.name);
                continue;
            };

            let sha1 = match &lib.sha1 {
                Some(sha1) => sha1.clone(),
                None => self.assets.get_maven_sha1(&url).await
                    .map_err(|e| ManifestError::unavailable(format!("checksum of {}", lib.name), e))?
            };

            let path = Layout::library(&maven_path);

            if entries.push(&url, lib.size, &sha1, path.clone())? {
                classpath.push(path);
            }
        }

        Ok(classpath)
    }

    async fn collect_mods(
        &self,
        mods: &[ModRef],
        entries: &mut EntryCollector
    ) -> Result<(), ManifestError> {
        let file_ids: Vec<u32> = mods.iter().map(|m| m.file_id).collect();

        let files = self.curse.get_files(&file_ids).await
            .map_err(|e| ManifestError::unavailable("curseforge mod files", e))?;

        for file in &files {
            push_mod_file(file, entries)?;
        }

        Ok(())
    }
}

/// A mod without a sha1 cannot be verified, leaving it out would delete the installed copy
fn push_mod_file(file: &CurseForgeFile, entries: &mut EntryCollector) -> Result<(), ManifestError> {
    let sha1 = file.sha1()
        .ok_or_else(|| ManifestError::SourceUnavailable {
            what: format!("mod file {} ({})", file.file_id, file.display_name),
            reason: "CurseForge lists no sha1 checksum".to_string()
        })?;

    entries.push(
        &file.resolved_download_url(),
        Some(file.file_size),
        sha1,
        Layout::mod_file(&file.file_name)
    )?;

    Ok(())
}

fn launch_profile(game: &GameManifest, fabric: &FabricProfile, classpath: Vec<PathBuf>) -> LaunchProfile {
    let (mut jvm_args, mut game_args): (Vec<String>, Vec<String>) = match &game.arguments {
        Some(args) => (args.jvm.matched_args().collect(), args.game.matched_args().collect()),
        None => (Vec::new(), Vec::new())
    };

    jvm_args.extend(fabric.arguments.jvm.iter().cloned());
    game_args.extend(fabric.arguments.game.iter().cloned());

    LaunchProfile {
        main_class: fabric.main_class.clone(),
        jvm_args,
        game_args,
        classpath,
        asset_index: game.asset_index.id.clone(),
        version_type: game.release_type.clone()
    }
}

/// Manifest entries in resolution order, the first claim on a path wins
#[derive(Default)]
struct EntryCollector {
    entries: Vec<FileEntry>,
    seen: HashSet<PathBuf>
}

impl EntryCollector {
    /// Returns false when the path was already claimed
    fn push(&mut self, url: &str, size: Option<u64>, sha1: &str, path: PathBuf) -> Result<bool, ManifestError> {
        if self.seen.contains(&path) {
            log::debug!("Duplicate path {} from {url}", path.display());
            return Ok(false);
        }

        let source = Url::parse(url)
            .map_err(|e| ManifestError::SourceUnavailable {
                what: path.display().to_string(),
                reason: format!("invalid url {url}: {e}")
            })?;

        self.seen.insert(path.clone());
        self.entries.push(FileEntry {
            source,
            size,
            sha1: sha1.to_lowercase(),
            path
        });

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_claim_on_path_wins() {
        let mut entries = EntryCollector::default();
        let path = Layout::library("org/ow2/asm/asm/9.5/asm-9.5.jar");

        assert!(entries.push("https://maven.fabricmc.net/a.jar", None, "AB", path.clone()).unwrap());
        assert!(!entries.push("https://libraries.minecraft.net/a.jar", Some(1), "cd", path).unwrap());

        assert_eq!(entries.entries.len(), 1);
        assert_eq!(entries.entries[0].sha1, "ab");
        assert_eq!(entries.entries[0].source.host_str(), Some("maven.fabricmc.net"));
    }

    #[test]
    fn invalid_url_is_unavailable() {
        let mut entries = EntryCollector::default();
        let result = entries.push("not a url", None, "ab", Layout::mod_file("a.jar"));

        assert!(matches!(result, Err(ManifestError::SourceUnavailable { .. })));
    }

    fn curse_file(hashes: &str) -> CurseForgeFile {
        serde_json::from_str(&format!(r#"{{
            "id": 4586218,
            "displayName": "Fabric API",
            "fileName": "fabric-api-0.83.0+1.20.1.jar",
            "hashes": {hashes},
            "fileLength": 1998753,
            "downloadUrl": "https://edge.forgecdn.net/files/4586/218/fabric-api-0.83.0+1.20.1.jar"
        }}"#)).unwrap()
    }

    #[test]
    fn mod_without_sha1_is_an_error() {
        let mut entries = EntryCollector::default();
        let file = curse_file(r#"[{ "value": "9f2a1d3c4b5e6f708192a3b4c5d6e7f8", "algo": 2 }]"#);

        let result = push_mod_file(&file, &mut entries);

        match result {
            Err(ManifestError::SourceUnavailable { what, .. }) => assert!(what.contains("4586218")),
            _ => panic!("expected SourceUnavailable")
        }
        assert!(entries.entries.is_empty());
    }

    #[test]
    fn mod_with_sha1_is_listed() {
        let mut entries = EntryCollector::default();
        let file = curse_file(r#"[{ "value": "1A3B0C7B2E8C0E0B6C0B3D1A5E5E2F0E6A8D7C3B", "algo": 1 }]"#);

        push_mod_file(&file, &mut entries).unwrap();

        assert_eq!(entries.entries.len(), 1);
        assert_eq!(entries.entries[0].path, Layout::mod_file("fabric-api-0.83.0+1.20.1.jar"));
        assert_eq!(entries.entries[0].sha1, "1a3b0c7b2e8c0e0b6c0b3d1a5e5e2f0e6a8d7c3b");
        assert_eq!(entries.entries[0].size, Some(1998753));
    }

    #[test]
    fn fabric_args_follow_vanilla() {
        let game: GameManifest = serde_json::from_str(r#"{
            "arguments": { "game": ["--version", "${version_name}"], "jvm": ["-cp", "${classpath}"] },
            "assetIndex": { "id": "5", "sha1": "ab", "size": 1, "totalSize": 2, "url": "https://example.com/5.json" },
            "downloads": {},
            "id": "1.20.1",
            "libraries": [],
            "mainClass": "net.minecraft.client.main.Main",
            "type": "release"
        }"#).unwrap();

        let fabric: FabricProfile = serde_json::from_str(r#"{
            "id": "fabric-loader-0.14.21-1.20.1",
            "inheritsFrom": "1.20.1",
            "mainClass": "net.fabricmc.loader.impl.launch.knot.KnotClient",
            "arguments": { "game": [], "jvm": ["-DFabricMcEmu= net.minecraft.client.main.Main "] },
            "libraries": []
        }"#).unwrap();

        let profile = launch_profile(&game, &fabric, vec![Layout::client_jar("1.20.1")]);

        assert_eq!(profile.main_class, "net.fabricmc.loader.impl.launch.knot.KnotClient");
        assert_eq!(profile.jvm_args, vec!["-cp", "${classpath}", "-DFabricMcEmu= net.minecraft.client.main.Main "]);
        assert_eq!(profile.game_args, vec!["--version", "${version_name}"]);
        assert_eq!(profile.asset_index, "5");
        assert_eq!(profile.version_type, "release");
    }
}
