// Title screen

use bevy::prelude::*;

use crate::scenes::Scene;

pub struct TitlePlugin;

impl Plugin for TitlePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Scene::Title), setup_title).add_systems(
            Update,
            (button_visuals, button_actions, about_back).run_if(in_state(Scene::Title)),
        );
    }
}

const NORMAL_BUTTON: Color = Color::srgb(0.15, 0.15, 0.15);
const HOVERED_BUTTON: Color = Color::srgb(0.25, 0.25, 0.25);
const PRESSED_BUTTON: Color = Color::srgb(0.35, 0.35, 0.35);

#[derive(Component)]
enum TitleButton {
    Start,
    About,
    #[cfg(not(target_arch = "wasm32"))]
    Exit,
}

#[derive(Component)]
struct AboutOverlay;

#[derive(Component)]
struct AboutBack;

fn setup_title(mut commands: Commands) {
    // Root container.
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(24.0),
                ..default()
            },
            DespawnOnExit(Scene::Title),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("NIGHTWIRE"),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new("an interactive comic"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgba(0.8, 0.8, 0.8, 1.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(32.0)),
                    ..default()
                },
            ));

            spawn_button(parent, "Start", TitleButton::Start);

            spawn_button(parent, "About", TitleButton::About);

            // Exit button (native only).
            #[cfg(not(target_arch = "wasm32"))]
            spawn_button(parent, "Exit", TitleButton::Exit);
        });
}

fn spawn_button(parent: &mut ChildSpawnerCommands, label: &str, marker: TitleButton) {
    parent
        .spawn((
            marker,
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.3)),
            BackgroundColor(NORMAL_BUTTON),
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn button_visuals(
    mut query: Query<
        (&Interaction, &mut BackgroundColor, &mut BorderColor),
        (Changed<Interaction>, With<TitleButton>),
    >,
) {
    for (interaction, mut bg, mut border) in &mut query {
        match *interaction {
            Interaction::Pressed => {
                *bg = PRESSED_BUTTON.into();
                *border = BorderColor::all(Color::WHITE);
            }
            Interaction::Hovered => {
                *bg = HOVERED_BUTTON.into();
                *border = BorderColor::all(Color::WHITE);
            }
            Interaction::None => {
                *bg = NORMAL_BUTTON.into();
                *border = BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.3));
            }
        }
    }
}

fn button_actions(
    query: Query<(&Interaction, &TitleButton), Changed<Interaction>>,
    mut next_state: ResMut<NextState<Scene>>,
    mut commands: Commands,
    #[cfg(not(target_arch = "wasm32"))] mut exit: MessageWriter<AppExit>,
) {
    for (interaction, button) in &query {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match button {
            TitleButton::Start => {
                next_state.set(Scene::Reading);
            }
            TitleButton::About => {
                spawn_about_overlay(&mut commands);
            }
            #[cfg(not(target_arch = "wasm32"))]
            TitleButton::Exit => {
                exit.write(AppExit::Success);
            }
        }
    }
}

fn spawn_about_overlay(commands: &mut Commands) {
    commands
        .spawn((
            AboutOverlay,
            DespawnOnExit(Scene::Title),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 99.)),
            GlobalZIndex(200),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("About"),
                TextFont {
                    font_size: 36.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            let lines = [
                "Arrow keys or Space turn the pages.",
                "Some pages stay locked until you beat their game.",
                "Escape backs out of a running game.",
                "",
                "Made with Bevy",
            ];
            for line in lines {
                parent.spawn((
                    Text::new(line),
                    TextFont {
                        font_size: 20.0,
                        ..default()
                    },
                    TextColor(Color::srgba(0.8, 0.8, 0.8, 1.0)),
                ));
            }

            // Back button.
            parent
                .spawn((
                    AboutBack,
                    Button,
                    Node {
                        width: Val::Px(120.0),
                        height: Val::Px(40.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        border: UiRect::all(Val::Px(2.0)),
                        margin: UiRect::top(Val::Px(24.0)),
                        ..default()
                    },
                    BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.3)),
                    BackgroundColor(NORMAL_BUTTON),
                ))
                .with_children(|btn| {
                    btn.spawn((
                        Text::new("Back"),
                        TextFont {
                            font_size: 20.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                });
        });
}

fn about_back(
    mut commands: Commands,
    overlay: Query<Entity, With<AboutOverlay>>,
    buttons: Query<&Interaction, (Changed<Interaction>, With<AboutBack>)>,
) {
    for interaction in &buttons {
        if *interaction == Interaction::Pressed {
            for entity in &overlay {
                commands.entity(entity).despawn();
            }
        }
    }
}
