use serde::Deserialize;

#[derive(Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionManifestEntry>
}

impl VersionManifest {
    pub fn find(&self, mc_version: &str) -> Option<&VersionManifestEntry> {
        self.versions.iter().find(|v| v.id == mc_version)
    }
}

#[derive(Deserialize)]
pub struct VersionManifestEntry {
    pub id: String,
    pub url: String,
    pub sha1: String
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_version() {
        let manifest: VersionManifest = serde_json::from_str(r#"{
            "latest": { "release": "1.20.1", "snapshot": "23w31a" },
            "versions": [{
                "id": "1.20.1",
                "type": "release",
                "url": "https://piston-meta.mojang.com/v1/packages/715ccf3330885e75b205124f09f8712542cbe7e0/1.20.1.json",
                "time": "2023-06-12T13:25:51+00:00",
                "releaseTime": "2023-06-12T13:25:51+00:00",
                "sha1": "715ccf3330885e75b205124f09f8712542cbe7e0",
                "complianceLevel": 1
            }]
        }"#).unwrap();

        let entry = manifest.find("1.20.1").unwrap();
        assert_eq!(entry.sha1, "715ccf3330885e75b205124f09f8712542cbe7e0");
        assert!(manifest.find("1.7.10").is_none());
    }
}
