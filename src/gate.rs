//! Embedded game surfaces: activation, completion notifications, teardown,
//! and the post-completion automatic page turn.

use bevy::prelude::*;

use crate::config::{ComicConfig, GameId};
use crate::navigator::{NavAffordances, NavRequest, PageCursor, compute_affordances};
use crate::scenes::{Progress, Scene};

pub struct GatePlugin;

/// Label for the surface lifecycle systems. Mini-games order their boot
/// after this so a freshly spawned content node exists before they mount
/// into it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GateSystems;

impl Plugin for GatePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Surface>()
            .add_message::<ActivateGame>()
            .add_message::<CloseSurface>()
            .add_message::<SurfaceOpened>()
            .add_message::<GameComplete>()
            .add_systems(OnExit(Scene::Reading), exit_reading)
            .add_systems(
                Update,
                (
                    escape_closes_surface,
                    close_button,
                    activate_games,
                    close_surfaces,
                    apply_completions,
                    tick_auto_advance,
                )
                    .chain()
                    .in_set(GateSystems)
                    .run_if(in_state(Scene::Reading)),
            );
    }
}

/// Open the surface for a configured game.
#[derive(Message)]
pub struct ActivateGame {
    pub game: GameId,
}

/// Tear down the active surface without completing its game.
#[derive(Message)]
pub struct CloseSurface;

/// A surface came up; the matching mini-game mounts its interface under
/// `content` in response.
#[derive(Message)]
pub struct SurfaceOpened {
    pub game: GameId,
    pub generation: u64,
    pub content: Entity,
}

/// One-way completion notification from an embedded game. Untrusted until
/// correlated against the open surface.
#[derive(Message)]
pub struct GameComplete {
    pub game: GameId,
    pub generation: u64,
}

/// The embedded surface slot. At most one game runs at a time; every
/// activation is stamped with a fresh generation so notifications from a
/// torn-down or replaced surface can be rejected outright.
#[derive(Resource, Default)]
pub struct Surface {
    active: Option<(GameId, u64)>,
    generation: u64,
}

impl Surface {
    /// Open a surface for `game`, replacing whatever was up. Returns the
    /// generation stamped on this activation.
    pub fn activate(&mut self, game: GameId) -> u64 {
        self.generation += 1;
        self.active = Some((game, self.generation));
        self.generation
    }

    /// Idempotent.
    pub fn close(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_game(&self) -> Option<GameId> {
        self.active.map(|(game, _)| game)
    }

    /// Whether a notification stamped (game, generation) belongs to the
    /// surface that is open right now.
    pub fn accepts(&self, game: GameId, generation: u64) -> bool {
        self.active == Some((game, generation))
    }
}

/// Pending automatic page turn, scheduled when a gating game with a
/// configured delay completes on its own page. Dropped if the reader leaves
/// that page before it fires.
#[derive(Resource)]
pub struct AutoAdvance {
    timer: Timer,
    page: u32,
}

#[derive(Component)]
struct SurfaceOverlay;

/// Node the active mini-game mounts its interface under.
#[derive(Component)]
pub struct SurfaceContent;

#[derive(Component)]
struct SurfaceCloseButton;

fn escape_closes_surface(
    keyboard: Res<ButtonInput<KeyCode>>,
    surface: Res<Surface>,
    mut close: MessageWriter<CloseSurface>,
) {
    if surface.is_active() && keyboard.just_pressed(KeyCode::Escape) {
        close.write(CloseSurface);
    }
}

fn close_button(
    buttons: Query<&Interaction, (Changed<Interaction>, With<SurfaceCloseButton>)>,
    mut close: MessageWriter<CloseSurface>,
) {
    for interaction in &buttons {
        if *interaction == Interaction::Pressed {
            close.write(CloseSurface);
        }
    }
}

fn activate_games(
    mut requests: MessageReader<ActivateGame>,
    mut surface: ResMut<Surface>,
    mut opened: MessageWriter<SurfaceOpened>,
    mut commands: Commands,
    config: Res<ComicConfig>,
    overlays: Query<Entity, With<SurfaceOverlay>>,
) {
    for request in requests.read() {
        let Some(entry) = config.game(request.game) else {
            warn!("activate request for unconfigured game {}", request.game);
            continue;
        };
        // Re-activation replaces the previous surface; its generation is
        // retired, so anything it still emits gets dropped.
        for entity in &overlays {
            commands.entity(entity).despawn();
        }
        let generation = surface.activate(request.game);
        let content = spawn_overlay(&mut commands, &entry.title);
        opened.write(SurfaceOpened {
            game: request.game,
            generation,
            content,
        });
    }
}

fn close_surfaces(
    mut requests: MessageReader<CloseSurface>,
    mut surface: ResMut<Surface>,
    mut commands: Commands,
    overlays: Query<Entity, With<SurfaceOverlay>>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();
    surface.close();
    for entity in &overlays {
        commands.entity(entity).despawn();
    }
}

fn apply_completions(
    mut notifications: MessageReader<GameComplete>,
    mut surface: ResMut<Surface>,
    mut progress: ResMut<Progress>,
    mut affordances: ResMut<NavAffordances>,
    mut commands: Commands,
    config: Res<ComicConfig>,
    cursor: Res<PageCursor>,
    overlays: Query<Entity, With<SurfaceOverlay>>,
) {
    for notification in notifications.read() {
        // Correlate against the open surface. Stale, duplicate, or forged
        // notifications (wrong game, retired generation, nothing open) are
        // dropped without touching any state.
        if !surface.accepts(notification.game, notification.generation) {
            continue;
        }

        progress.complete(notification.game);
        surface.close();
        for entity in &overlays {
            commands.entity(entity).despawn();
        }
        *affordances = compute_affordances(&config, &progress, &cursor);

        let Some(entry) = config.game(notification.game) else {
            continue;
        };
        if !config.auto_advance {
            continue;
        }
        if let Some(delay) = entry.auto_advance_delay {
            if cursor.current() == entry.required_page {
                commands.insert_resource(AutoAdvance {
                    timer: Timer::from_seconds(delay, TimerMode::Once),
                    page: cursor.current(),
                });
            }
        }
    }
}

fn tick_auto_advance(
    advance: Option<ResMut<AutoAdvance>>,
    cursor: Res<PageCursor>,
    time: Res<Time>,
    mut commands: Commands,
    mut requests: MessageWriter<NavRequest>,
) {
    let Some(mut advance) = advance else {
        return;
    };
    // The reader moved off the page by hand; drop the pending turn.
    if cursor.current() != advance.page {
        commands.remove_resource::<AutoAdvance>();
        return;
    }
    if advance.timer.tick(time.delta()).just_finished() {
        commands.remove_resource::<AutoAdvance>();
        requests.write(NavRequest::Advance);
    }
}

fn exit_reading(mut commands: Commands, mut surface: ResMut<Surface>) {
    surface.close();
    commands.remove_resource::<AutoAdvance>();
}

fn spawn_overlay(commands: &mut Commands, title: &str) -> Entity {
    let mut content = Entity::PLACEHOLDER;
    commands
        .spawn((
            SurfaceOverlay,
            DespawnOnExit(Scene::Reading),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(20.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.85)),
            GlobalZIndex(150),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            content = parent
                .spawn((
                    SurfaceContent,
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(12.0),
                        ..default()
                    },
                ))
                .id();

            parent
                .spawn((
                    SurfaceCloseButton,
                    Button,
                    Node {
                        width: Val::Px(120.0),
                        height: Val::Px(40.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        border: UiRect::all(Val::Px(2.0)),
                        margin: UiRect::top(Val::Px(12.0)),
                        ..default()
                    },
                    BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.3)),
                    BackgroundColor(Color::srgb(0.15, 0.15, 0.15)),
                ))
                .with_children(|btn| {
                    btn.spawn((
                        Text::new("Close"),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                });
        });
    content
}
