//! Comic page presentation: page artwork, navigation buttons, and the
//! per-page game trigger overlays.

use bevy::prelude::*;

use crate::config::{ComicConfig, GameId};
use crate::gate::ActivateGame;
use crate::navigator::{NavAffordances, NavRequest, PageCursor};
use crate::scenes::Scene;

pub struct PagesPlugin;

impl Plugin for PagesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Scene::Reading), spawn_reading_ui)
            .add_systems(
                Update,
                (
                    sync_page_visibility.run_if(resource_exists_and_changed::<PageCursor>),
                    sync_nav_buttons.run_if(resource_exists_and_changed::<NavAffordances>),
                    button_visuals,
                    button_actions,
                )
                    .run_if(in_state(Scene::Reading)),
            );
    }
}

#[derive(Component)]
struct ComicPage(u32);

#[derive(Component)]
enum NavButton {
    Back,
    Next,
}

#[derive(Component)]
struct TriggerButton(GameId);

fn spawn_reading_ui(
    mut commands: Commands,
    config: Res<ComicConfig>,
    asset_server: Res<AssetServer>,
) {
    // One node per page; the cursor decides which one shows.
    for page in 1..=config.total_pages {
        commands
            .spawn((
                ComicPage(page),
                DespawnOnExit(Scene::Reading),
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    position_type: PositionType::Absolute,
                    ..default()
                },
                Visibility::Hidden,
            ))
            .with_children(|parent| {
                parent.spawn((
                    ImageNode::new(asset_server.load(ComicConfig::page_art(page))),
                    Node {
                        height: Val::Percent(100.0),
                        ..default()
                    },
                ));
            });
    }

    spawn_nav_button(&mut commands, "Back", NavButton::Back, Val::Px(24.0), Val::Auto);
    spawn_nav_button(
        &mut commands,
        "Next Page",
        NavButton::Next,
        Val::Auto,
        Val::Px(24.0),
    );

    // Trigger buttons sit over the artwork at their configured spots,
    // visible only on the page their game gates.
    for (game, entry) in config.games() {
        commands
            .spawn((
                TriggerButton(game),
                Button,
                DespawnOnExit(Scene::Reading),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(entry.trigger.top),
                    left: Val::Percent(entry.trigger.left),
                    padding: UiRect::axes(Val::Px(28.0), Val::Px(14.0)),
                    border: UiRect::all(Val::Px(2.0)),
                    ..default()
                },
                BorderColor::all(Color::BLACK),
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.9)),
                Visibility::Hidden,
                GlobalZIndex(50),
            ))
            .with_children(|btn| {
                btn.spawn((
                    Text::new(entry.title.clone()),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(Color::BLACK),
                ));
            });
    }
}

fn spawn_nav_button(commands: &mut Commands, label: &str, marker: NavButton, left: Val, right: Val) {
    commands
        .spawn((
            marker,
            Button,
            DespawnOnExit(Scene::Reading),
            Node {
                position_type: PositionType::Absolute,
                left,
                right,
                bottom: Val::Px(24.0),
                width: Val::Px(160.0),
                height: Val::Px(48.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.3)),
            BackgroundColor(Color::srgb(0.15, 0.15, 0.15)),
            Visibility::Hidden,
            GlobalZIndex(50),
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn sync_page_visibility(
    cursor: Res<PageCursor>,
    config: Res<ComicConfig>,
    mut pages: Query<(&ComicPage, &mut Visibility), Without<TriggerButton>>,
    mut triggers: Query<(&TriggerButton, &mut Visibility), Without<ComicPage>>,
) {
    for (page, mut visibility) in &mut pages {
        *visibility = if page.0 == cursor.current() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    for (trigger, mut visibility) in &mut triggers {
        let on_page = config
            .game(trigger.0)
            .is_some_and(|entry| entry.required_page == cursor.current());
        *visibility = if on_page {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

fn sync_nav_buttons(
    affordances: Res<NavAffordances>,
    mut buttons: Query<(&NavButton, &mut Visibility)>,
) {
    for (button, mut visibility) in &mut buttons {
        let visible = match button {
            NavButton::Next => affordances.next_visible,
            NavButton::Back => affordances.back_visible,
        };
        *visibility = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

/// Border highlight for the dark buttons, background pop for the pale
/// trigger buttons.
fn button_visuals(
    mut buttons: Query<
        (&Interaction, &mut BorderColor),
        (Changed<Interaction>, With<Button>, Without<TriggerButton>),
    >,
    mut triggers: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<TriggerButton>),
    >,
) {
    for (interaction, mut border) in &mut buttons {
        *border = match interaction {
            Interaction::Pressed | Interaction::Hovered => BorderColor::all(Color::WHITE),
            Interaction::None => BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.3)),
        };
    }
    for (interaction, mut background) in &mut triggers {
        *background = match interaction {
            Interaction::Pressed | Interaction::Hovered => BackgroundColor(Color::WHITE),
            Interaction::None => BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.9)),
        };
    }
}

fn button_actions(
    nav_buttons: Query<(&Interaction, &NavButton), Changed<Interaction>>,
    trigger_buttons: Query<(&Interaction, &TriggerButton), Changed<Interaction>>,
    mut nav: MessageWriter<NavRequest>,
    mut activate: MessageWriter<ActivateGame>,
) {
    for (interaction, button) in &nav_buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }
        nav.write(match button {
            NavButton::Next => NavRequest::Advance,
            NavButton::Back => NavRequest::Retreat,
        });
    }
    for (interaction, button) in &trigger_buttons {
        if *interaction == Interaction::Pressed {
            activate.write(ActivateGame { game: button.0 });
        }
    }
}
