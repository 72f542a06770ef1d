// Maze game: walk the grid from the entrance to the lit exit cell.

use bevy::prelude::*;
use rand::seq::SliceRandom;

use crate::config::GameId;
use crate::gate::{GameComplete, GateSystems, SurfaceOpened};
use crate::scenes::Scene;

pub struct MazePlugin;

impl Plugin for MazePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (boot, walk)
                .chain()
                .after(GateSystems)
                .run_if(in_state(Scene::Reading)),
        );
    }
}

const MAZE_COLS: usize = 9;
const MAZE_ROWS: usize = 6;
const CELL_PX: f32 = 44.0;
const WALL_PX: f32 = 3.0;
const DOT_PAD: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dir {
    North,
    East,
    South,
    West,
}

const DIRS: [Dir; 4] = [Dir::North, Dir::East, Dir::South, Dir::West];

fn wall_bit(dir: Dir) -> u8 {
    match dir {
        Dir::North => 1,
        Dir::East => 2,
        Dir::South => 4,
        Dir::West => 8,
    }
}

fn opposite(dir: Dir) -> Dir {
    match dir {
        Dir::North => Dir::South,
        Dir::East => Dir::West,
        Dir::South => Dir::North,
        Dir::West => Dir::East,
    }
}

const ALL_WALLS: u8 = 0b1111;

struct MazeGrid {
    cols: usize,
    rows: usize,
    walls: Vec<u8>,
}

impl MazeGrid {
    /// Carve a maze with iterative depth-first backtracking. Every cell ends
    /// up reachable from the entrance.
    fn generate(cols: usize, rows: usize) -> Self {
        let mut grid = Self {
            cols,
            rows,
            walls: vec![ALL_WALLS; cols * rows],
        };
        let mut rng = rand::rng();
        let mut visited = vec![false; cols * rows];
        let mut stack = vec![(0usize, 0usize)];
        visited[0] = true;

        while let Some(&(x, y)) = stack.last() {
            let mut dirs = DIRS;
            dirs.shuffle(&mut rng);
            let next = dirs.iter().find_map(|&dir| {
                grid.neighbour(x, y, dir)
                    .filter(|&(nx, ny)| !visited[grid.index(nx, ny)])
                    .map(|cell| (dir, cell))
            });
            match next {
                Some((dir, (nx, ny))) => {
                    grid.knock_through(x, y, nx, ny, dir);
                    visited[grid.index(nx, ny)] = true;
                    stack.push((nx, ny));
                }
                None => {
                    stack.pop();
                }
            }
        }
        grid
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    fn neighbour(&self, x: usize, y: usize, dir: Dir) -> Option<(usize, usize)> {
        match dir {
            Dir::North => (y > 0).then(|| (x, y - 1)),
            Dir::East => (x + 1 < self.cols).then(|| (x + 1, y)),
            Dir::South => (y + 1 < self.rows).then(|| (x, y + 1)),
            Dir::West => (x > 0).then(|| (x - 1, y)),
        }
    }

    fn knock_through(&mut self, x: usize, y: usize, nx: usize, ny: usize, dir: Dir) {
        let here = self.index(x, y);
        self.walls[here] &= !wall_bit(dir);
        let there = self.index(nx, ny);
        self.walls[there] &= !wall_bit(opposite(dir));
    }

    /// Whether the wall toward `dir` is open from (x, y).
    fn open(&self, x: usize, y: usize, dir: Dir) -> bool {
        self.walls[self.index(x, y)] & wall_bit(dir) == 0
    }

    fn wall_px(&self, x: usize, y: usize, dir: Dir) -> f32 {
        if self.open(x, y, dir) { 0.0 } else { WALL_PX }
    }
}

#[derive(Component)]
struct MazeGame {
    grid: MazeGrid,
    player: (usize, usize),
    generation: u64,
    done: bool,
}

#[derive(Component)]
struct PlayerDot;

fn dot_position(cell: (usize, usize)) -> (f32, f32) {
    (
        cell.0 as f32 * CELL_PX + DOT_PAD,
        cell.1 as f32 * CELL_PX + DOT_PAD,
    )
}

fn boot(mut opened: MessageReader<SurfaceOpened>, mut commands: Commands) {
    for surface in opened.read() {
        if surface.game != GameId::Maze {
            continue;
        }
        let grid = MazeGrid::generate(MAZE_COLS, MAZE_ROWS);
        let exit = (MAZE_COLS - 1, MAZE_ROWS - 1);

        commands.entity(surface.content).with_children(|parent| {
            let mut board = parent.spawn((
                Node {
                    width: Val::Px(MAZE_COLS as f32 * CELL_PX),
                    height: Val::Px(MAZE_ROWS as f32 * CELL_PX),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.08, 0.08, 0.12)),
            ));
            board.with_children(|board| {
                for y in 0..MAZE_ROWS {
                    for x in 0..MAZE_COLS {
                        let border = UiRect {
                            top: Val::Px(grid.wall_px(x, y, Dir::North)),
                            right: Val::Px(grid.wall_px(x, y, Dir::East)),
                            bottom: Val::Px(grid.wall_px(x, y, Dir::South)),
                            left: Val::Px(grid.wall_px(x, y, Dir::West)),
                        };
                        let mut cell = board.spawn((
                            Node {
                                position_type: PositionType::Absolute,
                                left: Val::Px(x as f32 * CELL_PX),
                                top: Val::Px(y as f32 * CELL_PX),
                                width: Val::Px(CELL_PX),
                                height: Val::Px(CELL_PX),
                                border,
                                ..default()
                            },
                            BorderColor::all(Color::srgb(0.55, 0.55, 0.7)),
                        ));
                        if (x, y) == exit {
                            cell.insert(BackgroundColor(Color::srgb(0.2, 0.7, 0.3)));
                        }
                    }
                }

                let (left, top) = dot_position((0, 0));
                board.spawn((
                    PlayerDot,
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Px(left),
                        top: Val::Px(top),
                        width: Val::Px(CELL_PX - 2.0 * DOT_PAD),
                        height: Val::Px(CELL_PX - 2.0 * DOT_PAD),
                        ..default()
                    },
                    BorderRadius::MAX,
                    BackgroundColor(Color::srgb(1.0, 0.85, 0.3)),
                ));
            });
            board.insert(MazeGame {
                player: (0, 0),
                generation: surface.generation,
                done: false,
                grid,
            });

            parent.spawn((
                Text::new("Arrow keys walk the maze. Reach the green cell."),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgba(0.7, 0.7, 0.7, 1.0)),
            ));
        });
    }
}

fn walk(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut games: Query<&mut MazeGame>,
    mut dots: Query<&mut Node, With<PlayerDot>>,
    mut complete: MessageWriter<GameComplete>,
) {
    let Ok(game) = games.single_mut() else {
        return;
    };
    let game = game.into_inner();
    if game.done {
        return;
    }

    let steps = [
        (KeyCode::ArrowUp, Dir::North),
        (KeyCode::ArrowRight, Dir::East),
        (KeyCode::ArrowDown, Dir::South),
        (KeyCode::ArrowLeft, Dir::West),
    ];
    let mut moved = false;
    for (key, dir) in steps {
        if !keyboard.just_pressed(key) {
            continue;
        }
        let (x, y) = game.player;
        if !game.grid.open(x, y, dir) {
            continue;
        }
        if let Some(next) = game.grid.neighbour(x, y, dir) {
            game.player = next;
            moved = true;
        }
    }
    if !moved {
        return;
    }

    if let Ok(mut node) = dots.single_mut() {
        let (left, top) = dot_position(game.player);
        node.left = Val::Px(left);
        node.top = Val::Px(top);
    }

    if game.player == (MAZE_COLS - 1, MAZE_ROWS - 1) {
        game.done = true;
        complete.write(GameComplete {
            game: GameId::Maze,
            generation: game.generation,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cell_is_reachable() {
        let grid = MazeGrid::generate(MAZE_COLS, MAZE_ROWS);
        let mut seen = vec![false; MAZE_COLS * MAZE_ROWS];
        let mut queue = vec![(0usize, 0usize)];
        seen[0] = true;
        let mut count = 1;
        while let Some((x, y)) = queue.pop() {
            for dir in DIRS {
                if !grid.open(x, y, dir) {
                    continue;
                }
                if let Some((nx, ny)) = grid.neighbour(x, y, dir) {
                    let i = grid.index(nx, ny);
                    if !seen[i] {
                        seen[i] = true;
                        count += 1;
                        queue.push((nx, ny));
                    }
                }
            }
        }
        assert_eq!(count, MAZE_COLS * MAZE_ROWS);
    }

    #[test]
    fn walls_match_from_both_sides() {
        let grid = MazeGrid::generate(MAZE_COLS, MAZE_ROWS);
        for y in 0..MAZE_ROWS {
            for x in 0..MAZE_COLS {
                for dir in DIRS {
                    match grid.neighbour(x, y, dir) {
                        Some((nx, ny)) => {
                            assert_eq!(grid.open(x, y, dir), grid.open(nx, ny, opposite(dir)));
                        }
                        // The outer boundary is never carved.
                        None => assert!(!grid.open(x, y, dir)),
                    }
                }
            }
        }
    }

    #[test]
    fn entrance_has_at_least_one_opening() {
        let grid = MazeGrid::generate(MAZE_COLS, MAZE_ROWS);
        assert!(DIRS.iter().any(|&dir| grid.open(0, 0, dir)));
    }
}
