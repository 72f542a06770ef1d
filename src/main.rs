// Main
mod config;
mod gate;
mod minigames;
mod modal;
mod navigator;
mod pages;
mod scenes;
mod title;
mod transition;

use bevy::prelude::*;

use config::ComicConfig;
use gate::GatePlugin;
use minigames::MinigamesPlugin;
use modal::ModalPlugin;
use navigator::NavigatorPlugin;
use pages::PagesPlugin;
use scenes::{Progress, Scene};
use title::TitlePlugin;
use transition::TransitionPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .init_state::<Scene>()
        .insert_resource(ComicConfig::load())
        .init_resource::<Progress>()
        .insert_resource(ClearColor(Color::BLACK))
        .add_systems(Startup, spawn_camera)
        .add_plugins((
            TitlePlugin,
            PagesPlugin,
            NavigatorPlugin,
            GatePlugin,
            ModalPlugin,
            MinigamesPlugin,
            TransitionPlugin,
        ))
        .run();
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
