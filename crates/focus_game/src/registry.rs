//! Ordered list of playable levels

use std::path::{Path, PathBuf};

use crate::level::{Level1, Level2, Level3, Level4, LevelConfig, LevelVariant};

/// Builds an uninitialized level
pub type LevelConstructor = fn(&LevelConfig) -> LevelVariant;

/// A level and the scene file it plays in
#[derive(Clone, Debug)]
pub struct LevelEntry {
    pub name: String,
    pub scene_path: PathBuf,
    pub build: LevelConstructor,
}

/// Levels in play order
#[derive(Clone, Debug, Default)]
pub struct LevelRegistry {
    entries: Vec<LevelEntry>,
}

impl LevelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four standard levels reading `levelN.ron` from `scene_dir`
    pub fn standard(scene_dir: impl AsRef<Path>) -> Self {
        let dir = scene_dir.as_ref();
        Self::new()
            .with_level("Level 1", dir.join("level1.ron"), |c| LevelVariant::Level1(Level1::new(c)))
            .with_level("Level 2", dir.join("level2.ron"), |c| LevelVariant::Level2(Level2::new(c)))
            .with_level("Level 3", dir.join("level3.ron"), |c| LevelVariant::Level3(Level3::new(c)))
            .with_level("Level 4", dir.join("level4.ron"), |c| LevelVariant::Level4(Level4::new(c)))
    }

    /// Append a level
    pub fn with_level(
        mut self,
        name: impl Into<String>,
        scene_path: impl Into<PathBuf>,
        build: LevelConstructor,
    ) -> Self {
        self.entries.push(LevelEntry {
            name: name.into(),
            scene_path: scene_path.into(),
            build,
        });
        self
    }

    pub fn get(&self, index: usize) -> Option<&LevelEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelEntry> {
        self.entries.iter()
    }
}
