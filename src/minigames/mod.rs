//! Embedded mini-games. Each one mounts its interface under the surface
//! content node when its surface opens and reports completion with a single
//! generation-stamped notification. The gate controller treats those
//! notifications as untrusted input; nothing here touches reading state
//! directly.

pub mod hacking;
pub mod maze;

use bevy::prelude::*;

pub struct MinigamesPlugin;

impl Plugin for MinigamesPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((hacking::HackingPlugin, maze::MazePlugin));
    }
}
