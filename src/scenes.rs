/// Application scenes and shared reading progress.
use bevy::prelude::*;
use std::collections::HashSet;

use crate::config::GameId;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum Scene {
    #[default]
    Title,
    Reading,
}

/// Completion flags, one per embedded game. A flag is set the first time a
/// validated completion notification for that game arrives and is never
/// cleared afterwards.
#[derive(Resource, Default)]
pub struct Progress {
    completed: HashSet<GameId>,
}

impl Progress {
    /// Mark a game finished. Returns false if the flag was already set.
    pub fn complete(&mut self, game: GameId) -> bool {
        self.completed.insert(game)
    }

    pub fn is_complete(&self, game: GameId) -> bool {
        self.completed.contains(&game)
    }
}
