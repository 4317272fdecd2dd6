//! Resource types: the typed namespaces the project database is partitioned
//! into. Each type owns exactly one root directory in the project tree;
//! identifiers are unique within their type, never across types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of resource a quest project declares.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Map,
    Tileset,
    Sprite,
    Music,
    Sound,
    Item,
    Enemy,
    Language,
}

impl ResourceType {
    /// Every type, in the order the tree presents them.
    pub const ALL: [ResourceType; 8] = [
        ResourceType::Map,
        ResourceType::Tileset,
        ResourceType::Sprite,
        ResourceType::Music,
        ResourceType::Sound,
        ResourceType::Item,
        ResourceType::Enemy,
        ResourceType::Language,
    ];

    /// Root directory this type owns in the project tree.
    pub fn dir_name(self) -> &'static str {
        match self {
            ResourceType::Map => "maps",
            ResourceType::Tileset => "tilesets",
            ResourceType::Sprite => "sprites",
            ResourceType::Music => "musics",
            ResourceType::Sound => "sounds",
            ResourceType::Item => "items",
            ResourceType::Enemy => "enemies",
            ResourceType::Language => "languages",
        }
    }

    /// Human-readable label used in prompts and tables.
    pub fn label(self) -> &'static str {
        match self {
            ResourceType::Map => "map",
            ResourceType::Tileset => "tileset",
            ResourceType::Sprite => "sprite",
            ResourceType::Music => "music",
            ResourceType::Sound => "sound",
            ResourceType::Item => "item",
            ResourceType::Enemy => "enemy",
            ResourceType::Language => "language",
        }
    }

    /// Parse a type from its label (also accepts the root directory name).
    pub fn parse(name: &str) -> Option<ResourceType> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == name || kind.dir_name() == name)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_names_are_distinct() {
        for a in ResourceType::ALL {
            for b in ResourceType::ALL {
                if a != b {
                    assert_ne!(a.dir_name(), b.dir_name());
                }
            }
        }
    }

    #[test]
    fn test_parse_label_and_dir_name() {
        assert_eq!(ResourceType::parse("sprite"), Some(ResourceType::Sprite));
        assert_eq!(ResourceType::parse("sprites"), Some(ResourceType::Sprite));
        assert_eq!(ResourceType::parse("shader"), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ResourceType::Tileset).unwrap();
        assert_eq!(json, "\"tileset\"");
        let back: ResourceType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ResourceType::Tileset);
    }
}
