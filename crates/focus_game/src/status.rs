//! Level outcome

/// What a level reports after each frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LevelStatus {
    /// Still playing
    #[default]
    Running,
    /// The goal was reached; sticky until the level is switched
    Won,
    /// The player fell out of the world; cleared by a reset
    Lost,
}

impl LevelStatus {
    pub fn is_won(self) -> bool {
        self == LevelStatus::Won
    }

    pub fn is_lost(self) -> bool {
        self == LevelStatus::Lost
    }
}

impl std::fmt::Display for LevelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelStatus::Running => write!(f, "running"),
            LevelStatus::Won => write!(f, "won"),
            LevelStatus::Lost => write!(f, "lost"),
        }
    }
}
