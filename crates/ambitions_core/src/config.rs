//! Where the game keeps its saves.
//!
//! The location is always passed in as a value so callers (and tests) can
//! point the editor at any directory. `from_env` derives the stock Windows
//! location from the user's profile directory.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable the CLI reads to override the save directory.
pub const SAVES_DIR_ENV: &str = "AMBITIONS_SAVES_DIR";

const GAME_ROOT_COMPONENTS: [&str; 4] = ["AppData", "LocalLow", "Hovgaard Games", "Big Ambitions"];
const SAVES_SUBDIR: &str = "SaveGames";

/// The directory named by [`SAVES_DIR_ENV`], if set and non-empty.
pub fn saves_dir_override() -> Option<PathBuf> {
    env::var_os(SAVES_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDirs {
    game_root: PathBuf,
}

impl SaveDirs {
    pub fn new(game_root: impl Into<PathBuf>) -> Self {
        Self {
            game_root: game_root.into(),
        }
    }

    /// Game root under a given user profile directory.
    pub fn from_home(home: impl AsRef<Path>) -> Self {
        let mut root = home.as_ref().to_path_buf();
        root.extend(GAME_ROOT_COMPONENTS);
        Self::new(root)
    }

    /// Uses `USERPROFILE`, falling back to `HOME`.
    pub fn from_env() -> Option<Self> {
        env::var_os("USERPROFILE")
            .filter(|v| !v.is_empty())
            .or_else(|| env::var_os("HOME").filter(|v| !v.is_empty()))
            .map(Self::from_home)
    }

    pub fn game_root(&self) -> &Path {
        &self.game_root
    }

    pub fn saves_dir(&self) -> PathBuf {
        self.game_root.join(SAVES_SUBDIR)
    }

    /// The first of `SaveGames` or the game root that exists as a directory.
    pub fn search_dir(&self) -> Option<PathBuf> {
        let saves = self.saves_dir();
        if saves.is_dir() {
            Some(saves)
        } else if self.game_root.is_dir() {
            Some(self.game_root.clone())
        } else {
            None
        }
    }
}
