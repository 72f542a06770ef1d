//! Page navigation: the cursor, gate checks, and the proceed/back
//! affordances the presentation layer mirrors.

use bevy::prelude::*;

use crate::config::{ComicConfig, GameId};
use crate::gate::Surface;
use crate::scenes::{Progress, Scene};

pub struct NavigatorPlugin;

impl Plugin for NavigatorPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<NavRequest>()
            .add_message::<GateBlocked>()
            .add_systems(OnEnter(Scene::Reading), enter_reading)
            .add_systems(OnExit(Scene::Reading), exit_reading)
            .add_systems(
                Update,
                (keyboard_nav, handle_nav_requests)
                    .chain()
                    .run_if(in_state(Scene::Reading)),
            );

        #[cfg(debug_assertions)]
        app.add_systems(OnEnter(Scene::Reading), spawn_state_readout)
            .add_systems(
                Update,
                update_state_readout.run_if(in_state(Scene::Reading)),
            );
    }
}

/// A request to move the cursor, from keyboard or button input.
#[derive(Message)]
pub enum NavRequest {
    Advance,
    Retreat,
}

/// Advancing was refused because the current page's game is unfinished.
#[derive(Message)]
pub struct GateBlocked {
    pub game: GameId,
}

/// The reader's position in the page sequence. 1-based, always in bounds.
#[derive(Resource)]
pub struct PageCursor {
    current: u32,
    total: u32,
}

impl PageCursor {
    pub fn new(total: u32) -> Self {
        Self { current: 1, total }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

/// Which navigation affordances the active page offers.
#[derive(Resource, Default, Debug, PartialEq, Eq)]
pub struct NavAffordances {
    pub next_visible: bool,
    pub back_visible: bool,
}

/// The game gating `page`, if one is configured and still unfinished.
pub fn unsatisfied_gate(
    config: &ComicConfig,
    progress: &Progress,
    page: u32,
) -> Option<GameId> {
    config
        .gate_for(page)
        .filter(|game| !progress.is_complete(*game))
}

/// Affordances for the cursor's page: proceed is offered iff the page is
/// ungated or its game is finished; back is offered past page 1.
pub fn compute_affordances(
    config: &ComicConfig,
    progress: &Progress,
    cursor: &PageCursor,
) -> NavAffordances {
    NavAffordances {
        next_visible: unsatisfied_gate(config, progress, cursor.current).is_none(),
        back_visible: cursor.current > 1,
    }
}

/// Move the cursor to `page` and recompute affordances. Targets without a
/// page are ignored, leaving the cursor where it was.
pub fn show_page(
    cursor: &mut PageCursor,
    affordances: &mut NavAffordances,
    config: &ComicConfig,
    progress: &Progress,
    page: u32,
) {
    if page < 1 || page > cursor.total {
        return;
    }
    cursor.current = page;
    *affordances = compute_affordances(config, progress, cursor);
}

fn enter_reading(mut commands: Commands, config: Res<ComicConfig>, progress: Res<Progress>) {
    let cursor = PageCursor::new(config.total_pages);
    let affordances = compute_affordances(&config, &progress, &cursor);
    commands.insert_resource(cursor);
    commands.insert_resource(affordances);
}

fn exit_reading(mut commands: Commands) {
    commands.remove_resource::<PageCursor>();
    commands.remove_resource::<NavAffordances>();
}

/// Arrow keys and space drive the cursor while no game surface is open.
fn keyboard_nav(
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<ComicConfig>,
    surface: Res<Surface>,
    mut requests: MessageWriter<NavRequest>,
) {
    if !config.keyboard || surface.is_active() {
        return;
    }
    if keyboard.just_pressed(KeyCode::ArrowRight) || keyboard.just_pressed(KeyCode::Space) {
        requests.write(NavRequest::Advance);
    }
    if keyboard.just_pressed(KeyCode::ArrowLeft) {
        requests.write(NavRequest::Retreat);
    }
}

pub(crate) fn handle_nav_requests(
    mut requests: MessageReader<NavRequest>,
    mut cursor: ResMut<PageCursor>,
    mut affordances: ResMut<NavAffordances>,
    mut blocked: MessageWriter<GateBlocked>,
    config: Res<ComicConfig>,
    progress: Res<Progress>,
) {
    for request in requests.read() {
        let target = match request {
            NavRequest::Advance => {
                if cursor.current >= cursor.total {
                    continue;
                }
                // Leaving a gated page requires its game to be finished.
                if let Some(game) = unsatisfied_gate(&config, &progress, cursor.current) {
                    blocked.write(GateBlocked { game });
                    continue;
                }
                cursor.current + 1
            }
            NavRequest::Retreat => {
                if cursor.current <= 1 {
                    continue;
                }
                cursor.current - 1
            }
        };
        show_page(&mut cursor, &mut affordances, &config, &progress, target);
    }
}

#[cfg(debug_assertions)]
#[derive(Component)]
struct StateReadout;

#[cfg(debug_assertions)]
fn spawn_state_readout(mut commands: Commands) {
    commands.spawn((
        StateReadout,
        DespawnOnExit(Scene::Reading),
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgba(0.6, 1.0, 0.6, 0.9)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
        GlobalZIndex(300),
    ));
}

#[cfg(debug_assertions)]
fn update_state_readout(
    cursor: Res<PageCursor>,
    progress: Res<Progress>,
    surface: Res<Surface>,
    mut readout: Query<&mut Text, With<StateReadout>>,
) {
    use strum::IntoEnumIterator;

    let Ok(mut text) = readout.single_mut() else {
        return;
    };
    let flags = GameId::iter()
        .map(|game| format!("{game}={}", progress.is_complete(game)))
        .collect::<Vec<_>>()
        .join(" ");
    **text = format!(
        "page {}/{} | {} | surface: {:?}",
        cursor.current(),
        cursor.total(),
        flags,
        surface.active_game()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComicConfig;

    const GATED: &str = r#"
total_pages = 7

[games.hacking]
title = "Hacking Challenge"
required_page = 1
auto_advance_delay = 2.0
trigger = { top = 200.0, left = 60.0 }

[games.maze]
title = "Maze Challenge"
required_page = 3
trigger = { top = 300.0, left = 40.0 }
"#;

    #[derive(Resource, Default)]
    struct BlockedLog(Vec<GameId>);

    fn log_blocked(mut blocked: MessageReader<GateBlocked>, mut log: ResMut<BlockedLog>) {
        for message in blocked.read() {
            log.0.push(message.game);
        }
    }

    fn app() -> App {
        let config = ComicConfig::parse(GATED).unwrap();
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(PageCursor::new(config.total_pages));
        app.insert_resource(config);
        app.init_resource::<Progress>();
        app.init_resource::<NavAffordances>();
        app.init_resource::<BlockedLog>();
        app.add_message::<NavRequest>();
        app.add_message::<GateBlocked>();
        app.add_systems(Update, (handle_nav_requests, log_blocked).chain());
        app
    }

    fn request(app: &mut App, request: NavRequest) {
        app.world_mut().write_message(request);
        app.update();
    }

    fn current(app: &App) -> u32 {
        app.world().resource::<PageCursor>().current()
    }

    fn blocked(app: &App) -> &[GameId] {
        &app.world().resource::<BlockedLog>().0
    }

    #[test]
    fn gated_page_blocks_and_names_the_game() {
        let mut app = app();
        request(&mut app, NavRequest::Advance);
        assert_eq!(current(&app), 1);
        assert_eq!(blocked(&app), &[GameId::Hacking]);
    }

    #[test]
    fn satisfied_gate_advances() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<Progress>()
            .complete(GameId::Hacking);
        request(&mut app, NavRequest::Advance);
        assert_eq!(current(&app), 2);
        assert!(blocked(&app).is_empty());
    }

    #[test]
    fn ungated_page_advances_without_notice() {
        let mut app = app();
        app.world_mut().resource_mut::<PageCursor>().current = 2;
        request(&mut app, NavRequest::Advance);
        assert_eq!(current(&app), 3);
        assert!(blocked(&app).is_empty());
    }

    #[test]
    fn advance_at_last_page_is_a_noop() {
        let mut app = app();
        app.world_mut().resource_mut::<PageCursor>().current = 7;
        request(&mut app, NavRequest::Advance);
        assert_eq!(current(&app), 7);
        assert!(blocked(&app).is_empty());
    }

    #[test]
    fn retreat_at_first_page_is_a_noop() {
        let mut app = app();
        request(&mut app, NavRequest::Retreat);
        assert_eq!(current(&app), 1);
    }

    #[test]
    fn retreat_is_never_gated() {
        let mut app = app();
        // Page 3 is gated by the unfinished maze game; going back still works.
        app.world_mut().resource_mut::<PageCursor>().current = 3;
        request(&mut app, NavRequest::Retreat);
        assert_eq!(current(&app), 2);
        assert!(blocked(&app).is_empty());
    }

    #[test]
    fn each_blocked_attempt_emits_one_notice() {
        let mut app = app();
        request(&mut app, NavRequest::Advance);
        request(&mut app, NavRequest::Advance);
        assert_eq!(blocked(&app), &[GameId::Hacking, GameId::Hacking]);
    }

    #[test]
    fn show_page_out_of_range_is_a_noop() {
        let config = ComicConfig::parse(GATED).unwrap();
        let progress = Progress::default();
        let mut cursor = PageCursor::new(config.total_pages);
        let mut affordances = compute_affordances(&config, &progress, &cursor);

        show_page(&mut cursor, &mut affordances, &config, &progress, 0);
        assert_eq!(cursor.current(), 1);
        show_page(&mut cursor, &mut affordances, &config, &progress, 8);
        assert_eq!(cursor.current(), 1);
        show_page(&mut cursor, &mut affordances, &config, &progress, 5);
        assert_eq!(cursor.current(), 5);
    }

    #[test]
    fn affordances_follow_gates() {
        let config = ComicConfig::parse(GATED).unwrap();
        let mut progress = Progress::default();
        let mut cursor = PageCursor::new(config.total_pages);
        let mut affordances = compute_affordances(&config, &progress, &cursor);

        // Page 1: gated, unfinished, nothing behind.
        assert!(!affordances.next_visible);
        assert!(!affordances.back_visible);

        // Finishing the game opens the gate.
        progress.complete(GameId::Hacking);
        affordances = compute_affordances(&config, &progress, &cursor);
        assert!(affordances.next_visible);

        // Page 2: ungated.
        show_page(&mut cursor, &mut affordances, &config, &progress, 2);
        assert!(affordances.next_visible);
        assert!(affordances.back_visible);

        // Page 3: gated by the unfinished maze.
        show_page(&mut cursor, &mut affordances, &config, &progress, 3);
        assert!(!affordances.next_visible);
        assert!(affordances.back_visible);
    }
}
