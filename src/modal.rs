//! Blocking notice shown when the reader tries to leave a gated page before
//! finishing its game.

use bevy::prelude::*;

use crate::config::ComicConfig;
use crate::gate::Surface;
use crate::navigator::{GateBlocked, NavAffordances, PageCursor, compute_affordances};
use crate::scenes::{Progress, Scene};

pub struct ModalPlugin;

impl Plugin for ModalPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (show_notice, dismiss_notice)
                .chain()
                .run_if(in_state(Scene::Reading)),
        );
    }
}

#[derive(Component)]
struct NoticeOverlay;

#[derive(Component)]
struct NoticeButton;

fn show_notice(
    mut blocked: MessageReader<GateBlocked>,
    mut commands: Commands,
    config: Res<ComicConfig>,
    existing: Query<Entity, With<NoticeOverlay>>,
) {
    let Some(message) = blocked.read().last() else {
        return;
    };
    let title = config
        .game(message.game)
        .map(|entry| entry.title.clone())
        .unwrap_or_else(|| message.game.to_string());

    // A repeated attempt replaces the notice rather than stacking another.
    for entity in &existing {
        commands.entity(entity).despawn();
    }
    spawn_notice(
        &mut commands,
        &format!("You need to complete the {title} first!"),
    );
}

fn dismiss_notice(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    surface: Res<Surface>,
    buttons: Query<&Interaction, (Changed<Interaction>, With<NoticeButton>)>,
    overlays: Query<Entity, With<NoticeOverlay>>,
    mut affordances: ResMut<NavAffordances>,
    config: Res<ComicConfig>,
    progress: Res<Progress>,
    cursor: Res<PageCursor>,
) {
    if overlays.is_empty() {
        return;
    }
    // Escape belongs to the surface while a game is up.
    let key = !surface.is_active()
        && (keyboard.just_pressed(KeyCode::Escape) || keyboard.just_pressed(KeyCode::Enter));
    let clicked = buttons
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed);
    if !key && !clicked {
        return;
    }

    for entity in &overlays {
        commands.entity(entity).despawn();
    }
    // The flag may have flipped while the notice was up.
    *affordances = compute_affordances(&config, &progress, &cursor);
}

fn spawn_notice(commands: &mut Commands, message: &str) {
    commands
        .spawn((
            NoticeOverlay,
            DespawnOnExit(Scene::Reading),
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
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            GlobalZIndex(200),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(16.0),
                        padding: UiRect::all(Val::Px(32.0)),
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    BorderColor::all(Color::WHITE),
                    BackgroundColor(Color::srgb(0.2, 0.2, 0.2)),
                ))
                .with_children(|panel| {
                    panel.spawn((
                        Text::new(message),
                        TextFont {
                            font_size: 22.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));

                    panel
                        .spawn((
                            NoticeButton,
                            Button,
                            Node {
                                width: Val::Px(120.0),
                                height: Val::Px(40.0),
                                justify_content: JustifyContent::Center,
                                align_items: AlignItems::Center,
                                border: UiRect::all(Val::Px(2.0)),
                                ..default()
                            },
                            BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.3)),
                            BackgroundColor(Color::srgb(0.15, 0.15, 0.15)),
                        ))
                        .with_children(|btn| {
                            btn.spawn((
                                Text::new("OK"),
                                TextFont {
                                    font_size: 18.0,
                                    ..default()
                                },
                                TextColor(Color::WHITE),
                            ));
                        });
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameId;

    fn app() -> App {
        let config = ComicConfig::builtin();
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(PageCursor::new(config.total_pages));
        app.insert_resource(config);
        app.init_resource::<Progress>();
        app.init_resource::<NavAffordances>();
        app.init_resource::<Surface>();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.add_message::<GateBlocked>();
        app.add_systems(Update, (show_notice, dismiss_notice).chain());
        app
    }

    fn notice_count(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<NoticeOverlay>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn blocked_advance_raises_a_notice() {
        let mut app = app();
        app.world_mut().write_message(GateBlocked {
            game: GameId::Hacking,
        });
        app.update();
        assert_eq!(notice_count(&mut app), 1);
    }

    #[test]
    fn repeated_blocks_do_not_stack_notices() {
        let mut app = app();
        app.world_mut().write_message(GateBlocked {
            game: GameId::Hacking,
        });
        app.update();
        app.world_mut().write_message(GateBlocked {
            game: GameId::Hacking,
        });
        app.update();
        assert_eq!(notice_count(&mut app), 1);
    }

    #[test]
    fn dismissal_recomputes_affordances() {
        let mut app = app();
        app.world_mut().write_message(GateBlocked {
            game: GameId::Hacking,
        });
        app.update();
        assert!(!app.world().resource::<NavAffordances>().next_visible);

        // The game finishes while the notice is up; dismissing it must pick
        // up the new flag state.
        app.world_mut()
            .resource_mut::<Progress>()
            .complete(GameId::Hacking);
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Enter);
        app.update();
        assert_eq!(notice_count(&mut app), 0);
        assert!(app.world().resource::<NavAffordances>().next_visible);
    }
}
