use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Deserialize)]
pub struct AssetManifest {
    pub objects: HashMap<String, AssetObject>
}

impl AssetManifest {
    /// Objects keyed by hash, many asset names can share one object
    pub fn unique_objects(&self) -> BTreeMap<&str, u64> {
        self.objects.values()
            .map(|o| (o.hash.as_str(), o.size))
            .collect()
    }
}

#[derive(Deserialize)]
pub struct AssetObject {
    pub hash: String,
    pub size: u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_objects_are_deduplicated() {
        let manifest: AssetManifest = serde_json::from_str(r#"{
            "objects": {
                "minecraft/sounds/a.ogg": { "hash": "bdf48ef6b5d0d23bbb02e17d04865216179f510a", "size": 10 },
                "minecraft/sounds/b.ogg": { "hash": "bdf48ef6b5d0d23bbb02e17d04865216179f510a", "size": 10 },
                "icons/icon_16x16.png": { "hash": "5ff04807c356f1beed0b86ccf659b44b9983e3fa", "size": 3665 }
            }
        }"#).unwrap();

        let objects = manifest.unique_objects();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects.keys().next(), Some(&"5ff04807c356f1beed0b86ccf659b44b9983e3fa"));
    }
}
