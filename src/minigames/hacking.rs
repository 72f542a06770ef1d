// Code-breaking game: key in the access sequence shown on screen.

use bevy::prelude::*;
use rand::Rng;

use crate::config::GameId;
use crate::gate::{GameComplete, GateSystems, SurfaceOpened};
use crate::scenes::Scene;

pub struct HackingPlugin;

impl Plugin for HackingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (boot, keypad_input)
                .chain()
                .after(GateSystems)
                .run_if(in_state(Scene::Reading)),
        );
    }
}

const CODE_LEN: usize = 4;

const DIGIT_KEYS: [(KeyCode, u8); 10] = [
    (KeyCode::Digit0, 0),
    (KeyCode::Digit1, 1),
    (KeyCode::Digit2, 2),
    (KeyCode::Digit3, 3),
    (KeyCode::Digit4, 4),
    (KeyCode::Digit5, 5),
    (KeyCode::Digit6, 6),
    (KeyCode::Digit7, 7),
    (KeyCode::Digit8, 8),
    (KeyCode::Digit9, 9),
];

#[derive(Component)]
struct HackingGame {
    code: Vec<u8>,
    entered: usize,
    generation: u64,
    done: bool,
}

#[derive(Component)]
struct EntryReadout;

fn boot(mut opened: MessageReader<SurfaceOpened>, mut commands: Commands) {
    for surface in opened.read() {
        if surface.game != GameId::Hacking {
            continue;
        }
        let mut rng = rand::rng();
        let code: Vec<u8> = (0..CODE_LEN).map(|_| rng.random_range(0..=9)).collect();

        commands.entity(surface.content).with_children(|parent| {
            parent.spawn((
                HackingGame {
                    code: code.clone(),
                    entered: 0,
                    generation: surface.generation,
                    done: false,
                },
                Text::new(format!("ACCESS SEQUENCE: {}", render_code(&code))),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.3, 1.0, 0.4)),
            ));
            parent.spawn((
                EntryReadout,
                Text::new(format!("> {}", render_entry(&code, 0))),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.3, 1.0, 0.4)),
            ));
            parent.spawn((
                Text::new("Type the digits in order. A wrong key resets the lock."),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgba(0.7, 0.7, 0.7, 1.0)),
            ));
        });
    }
}

fn keypad_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut games: Query<&mut HackingGame>,
    mut readouts: Query<&mut Text, With<EntryReadout>>,
    mut complete: MessageWriter<GameComplete>,
) {
    let Ok(game) = games.single_mut() else {
        return;
    };
    let game = game.into_inner();
    if game.done {
        return;
    }

    let mut touched = false;
    for (key, digit) in DIGIT_KEYS {
        if !keyboard.just_pressed(key) {
            continue;
        }
        game.entered = next_entry(&game.code, game.entered, digit);
        touched = true;
        if game.entered == game.code.len() {
            game.done = true;
            complete.write(GameComplete {
                game: GameId::Hacking,
                generation: game.generation,
            });
            break;
        }
    }
    if !touched {
        return;
    }

    if let Ok(mut text) = readouts.single_mut() {
        **text = format!("> {}", render_entry(&game.code, game.entered));
    }
}

/// Entry position after pressing `digit`: advance on a match, reset on a
/// miss. A miss that happens to match the first digit starts a new attempt.
fn next_entry(code: &[u8], entered: usize, digit: u8) -> usize {
    if code.get(entered) == Some(&digit) {
        entered + 1
    } else if code.first() == Some(&digit) {
        1
    } else {
        0
    }
}

fn render_code(code: &[u8]) -> String {
    code.iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_entry(code: &[u8], entered: usize) -> String {
    code.iter()
        .enumerate()
        .map(|(i, digit)| {
            if i < entered {
                digit.to_string()
            } else {
                "_".into()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_digits_advance_to_completion() {
        let code = [7, 3, 1, 9];
        let mut entered = 0;
        for digit in code {
            entered = next_entry(&code, entered, digit);
        }
        assert_eq!(entered, code.len());
    }

    #[test]
    fn wrong_digit_resets() {
        let code = [7, 3, 1, 9];
        let mut entered = 0;
        entered = next_entry(&code, entered, 7);
        entered = next_entry(&code, entered, 3);
        entered = next_entry(&code, entered, 5);
        assert_eq!(entered, 0);
    }

    #[test]
    fn wrong_digit_matching_the_start_begins_a_new_attempt() {
        let code = [7, 3, 1, 9];
        let mut entered = 0;
        entered = next_entry(&code, entered, 7);
        entered = next_entry(&code, entered, 3);
        entered = next_entry(&code, entered, 7);
        assert_eq!(entered, 1);
    }

    #[test]
    fn readouts_mask_the_remainder() {
        let code = [7, 3, 1, 9];
        assert_eq!(render_entry(&code, 0), "_ _ _ _");
        assert_eq!(render_entry(&code, 2), "7 3 _ _");
        assert_eq!(render_code(&code), "7 3 1 9");
    }
}
