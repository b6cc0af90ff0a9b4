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

use serde::Deserialize;

const FABRIC_MAVEN_URL: &str = "https://maven.fabricmc.net/";

/// Launch profile from the fabric meta service, layered on a vanilla version
#[derive(Deserialize)]
pub struct FabricProfile {
    #[serde(rename(deserialize = "mainClass"))]
    pub main_class: String,
    #[serde(default)]
    pub arguments: FabricArguments,
    pub libraries: Vec<FabricLibrary>
}

#[derive(Deserialize, Default)]
pub struct FabricArguments {
    #[serde(default)]
    pub game: Vec<String>,
    #[serde(default)]
    pub jvm: Vec<String>
}

#[derive(Deserialize)]
pub struct FabricLibrary {
    /// Maven coordinate `group:artifact:version`
    pub name: String,
    #[serde(default = "default_maven_url")]
    pub url: String,
    pub sha1: Option<String>,
    pub size: Option<u64>
}

fn default_maven_url() -> String {
    FABRIC_MAVEN_URL.to_string()
}

impl FabricLibrary {
    /// Path of the jar relative to the repository root, `None` for a malformed coordinate
    pub fn maven_path(&self) -> Option<String> {
        let mut parts = self.name.split(':');

        let (group, artifact, version) = (parts.next()?, parts.next()?, parts.next()?);
        let classifier = parts.next();

        if group.is_empty() || artifact.is_empty() || version.is_empty() {
            return None;
        }

        let file_name = match classifier {
            Some(c) => format!("{artifact}-{version}-{c}.jar"),
            None => format!("{artifact}-{version}.jar")
        };

        Some(format!("{}/{artifact}/{version}/{file_name}", group.replace('.', "/")))
    }

    pub fn download_url(&self) -> Option<String> {
        let base = self.url.trim_end_matches('/');
        self.maven_path().map(|path| format!("{base}/{path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_profile() {
        let profile: FabricProfile = serde_json::from_str(r#"{
            "id": "fabric-loader-0.14.21-1.20.1",
            "inheritsFrom": "1.20.1",
            "releaseTime": "2023-06-14T15:56:53+0000",
            "time": "2023-06-14T15:56:53+0000",
            "type": "release",
            "mainClass": "net.fabricmc.loader.impl.launch.knot.KnotClient",
            "arguments": {
                "game": [],
                "jvm": ["-DFabricMcEmu= net.minecraft.client.main.Main "]
            },
            "libraries": [
                { "name": "net.fabricmc:tiny-mappings-parser:0.3.0+build.17", "url": "https://maven.fabricmc.net/" },
                { "name": "org.ow2.asm:asm:9.5", "url": "https://maven.fabricmc.net/",
                  "sha1": "dc6ea1875f4d64fbc85e1691c95b96a3d8569c90", "size": 121863 },
                { "name": "net.fabricmc:fabric-loader:0.14.21" }
            ]
        }"#).unwrap();

        assert_eq!(profile.main_class, "net.fabricmc.loader.impl.launch.knot.KnotClient");
        assert_eq!(profile.arguments.jvm.len(), 1);
        assert_eq!(profile.libraries[1].size, Some(121863));
        assert_eq!(
            profile.libraries[2].download_url().unwrap(),
            "https://maven.fabricmc.net/net/fabricmc/fabric-loader/0.14.21/fabric-loader-0.14.21.jar"
        );
    }

    #[test]
    fn maven_path_with_classifier() {
        let lib = FabricLibrary {
            name: "org.lwjgl:lwjgl:3.3.1:natives-linux".to_string(),
            url: default_maven_url(),
            sha1: None,
            size: None
        };

        assert_eq!(
            lib.maven_path().unwrap(),
            "org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1-natives-linux.jar"
        );
    }

    #[test]
    fn malformed_coordinate() {
        let lib = FabricLibrary {
            name: "fabric-loader".to_string(),
            url: default_maven_url(),
            sha1: None,
            size: None
        };

        assert!(lib.maven_path().is_none());
    }
}
