// Brief full-screen fade when the page turns.

use bevy::prelude::*;

use crate::config::ComicConfig;
use crate::navigator::PageCursor;
use crate::scenes::Scene;

pub struct TransitionPlugin;

impl Plugin for TransitionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                spawn_fade.run_if(resource_exists_and_changed::<PageCursor>),
                fade_out,
            )
                .run_if(in_state(Scene::Reading)),
        );
    }
}

const FADE_START_ALPHA: f32 = 0.6;

#[derive(Component)]
struct PageFade {
    timer: Timer,
}

fn spawn_fade(
    mut commands: Commands,
    cursor: Res<PageCursor>,
    config: Res<ComicConfig>,
    existing: Query<Entity, With<PageFade>>,
) {
    // The first show is not a turn.
    if cursor.is_added() || config.transition_delay <= 0.0 {
        return;
    }
    // A fast reader restarts the fade instead of layering a second one.
    for entity in &existing {
        commands.entity(entity).despawn();
    }
    commands.spawn((
        PageFade {
            timer: Timer::from_seconds(config.transition_delay, TimerMode::Once),
        },
        DespawnOnExit(Scene::Reading),
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, FADE_START_ALPHA)),
        GlobalZIndex(100),
    ));
}

fn fade_out(
    mut commands: Commands,
    time: Res<Time>,
    mut fades: Query<(Entity, &mut PageFade, &mut BackgroundColor)>,
) {
    for (entity, mut fade, mut background) in &mut fades {
        fade.timer.tick(time.delta());
        if fade.timer.finished() {
            commands.entity(entity).despawn();
            continue;
        }
        let alpha = FADE_START_ALPHA * fade.timer.fraction_remaining();
        background.0 = Color::srgba(0.0, 0.0, 0.0, alpha);
    }
}
