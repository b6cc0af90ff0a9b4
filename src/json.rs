mod asset_manifest;
mod curseforge;
mod fabric_profile;
mod game_manifest;
mod version_manifest;

pub use asset_manifest::*;
pub use curseforge::*;
pub use fabric_profile::*;
pub use game_manifest::*;
pub use version_manifest::*;
