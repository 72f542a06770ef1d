//! Static comic configuration: the page count, which games exist, which
//! pages they gate, and how navigation behaves.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

const CONFIG_TOML: &str = include_str!("../assets/comic.toml");

/// Identifier for an embedded game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameId {
    Hacking,
    Maze,
}

/// Overlay trigger placement: pixels from the top edge, percent from the
/// left edge.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TriggerPlacement {
    pub top: f32,
    pub left: f32,
}

#[derive(Debug, Clone)]
pub struct GameEntry {
    pub title: String,
    /// The page this game gates: advancing off it requires completion.
    pub required_page: u32,
    /// Seconds to wait before turning the page automatically after
    /// completion. None disables the automatic turn for this game.
    pub auto_advance_delay: Option<f32>,
    pub trigger: TriggerPlacement,
}

// Raw document shape. Validated into ComicConfig before anything reads it.

#[derive(Deserialize)]
struct ComicDoc {
    total_pages: u32,
    #[serde(default)]
    navigation: NavigationDoc,
    games: HashMap<GameId, GameDoc>,
}

#[derive(Deserialize)]
#[serde(default)]
struct NavigationDoc {
    keyboard: bool,
    auto_advance: bool,
    transition_delay: f32,
}

impl Default for NavigationDoc {
    fn default() -> Self {
        Self {
            keyboard: true,
            auto_advance: true,
            transition_delay: 0.5,
        }
    }
}

#[derive(Deserialize)]
struct GameDoc {
    title: String,
    required_page: u32,
    auto_advance_delay: Option<f32>,
    trigger: TriggerPlacement,
}

#[derive(Resource, Clone)]
pub struct ComicConfig {
    pub total_pages: u32,
    pub keyboard: bool,
    pub auto_advance: bool,
    pub transition_delay: f32,
    games: Vec<(GameId, GameEntry)>,
}

impl ComicConfig {
    /// Parse and validate the embedded document, falling back to the
    /// built-in configuration if it is rejected.
    pub fn load() -> Self {
        match Self::parse(CONFIG_TOML) {
            Ok(config) => config,
            Err(e) => {
                warn!("invalid comic.toml: {e}; using built-in configuration");
                Self::builtin()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let doc: ComicDoc = toml::from_str(content).map_err(|e| e.to_string())?;
        Self::from_doc(doc)
    }

    fn from_doc(doc: ComicDoc) -> Result<Self, String> {
        if doc.total_pages == 0 {
            return Err("total_pages must be at least 1".into());
        }

        let mut games: Vec<(GameId, GameEntry)> = doc
            .games
            .into_iter()
            .map(|(id, game)| {
                (
                    id,
                    GameEntry {
                        title: game.title,
                        required_page: game.required_page,
                        auto_advance_delay: game.auto_advance_delay,
                        trigger: game.trigger,
                    },
                )
            })
            .collect();
        games.sort_by_key(|(_, entry)| entry.required_page);

        for (id, entry) in &games {
            if entry.required_page < 1 || entry.required_page > doc.total_pages {
                return Err(format!(
                    "game {id} gates page {} but there are only {} pages",
                    entry.required_page, doc.total_pages
                ));
            }
            if entry.auto_advance_delay.is_some_and(|delay| delay <= 0.0) {
                return Err(format!("game {id} has a non-positive auto_advance_delay"));
            }
        }
        // One gating game per page. Sorted above, so duplicates are adjacent.
        for pair in games.windows(2) {
            if pair[0].1.required_page == pair[1].1.required_page {
                return Err(format!(
                    "games {} and {} both gate page {}",
                    pair[0].0, pair[1].0, pair[0].1.required_page
                ));
            }
        }

        Ok(Self {
            total_pages: doc.total_pages,
            keyboard: doc.navigation.keyboard,
            auto_advance: doc.navigation.auto_advance,
            transition_delay: doc.navigation.transition_delay,
            games,
        })
    }

    /// Hardcoded fallback configuration, mirroring the shipped document.
    pub fn builtin() -> Self {
        Self {
            total_pages: 7,
            keyboard: true,
            auto_advance: true,
            transition_delay: 0.5,
            games: vec![
                (
                    GameId::Hacking,
                    GameEntry {
                        title: "Hacking Challenge".into(),
                        required_page: 1,
                        auto_advance_delay: Some(2.0),
                        trigger: TriggerPlacement {
                            top: 200.0,
                            left: 60.0,
                        },
                    },
                ),
                (
                    GameId::Maze,
                    GameEntry {
                        title: "Maze Challenge".into(),
                        required_page: 3,
                        auto_advance_delay: Some(2.0),
                        trigger: TriggerPlacement {
                            top: 300.0,
                            left: 40.0,
                        },
                    },
                ),
            ],
        }
    }

    pub fn game(&self, id: GameId) -> Option<&GameEntry> {
        self.games
            .iter()
            .find(|(game, _)| *game == id)
            .map(|(_, entry)| entry)
    }

    pub fn games(&self) -> impl Iterator<Item = (GameId, &GameEntry)> {
        self.games.iter().map(|(id, entry)| (*id, entry))
    }

    /// The game gating `page`, if the configuration defines one.
    pub fn gate_for(&self, page: u32) -> Option<GameId> {
        self.games
            .iter()
            .find(|(_, entry)| entry.required_page == page)
            .map(|(id, _)| *id)
    }

    /// Asset path for a page's artwork.
    pub fn page_art(page: u32) -> String {
        format!("pages/page{page}.png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_document_is_valid() {
        let config = ComicConfig::parse(CONFIG_TOML).unwrap();
        assert_eq!(config.total_pages, 7);
        assert_eq!(config.gate_for(1), Some(GameId::Hacking));
        assert_eq!(config.gate_for(3), Some(GameId::Maze));
        assert_eq!(config.gate_for(2), None);
    }

    #[test]
    fn builtin_matches_shipped_gates() {
        let config = ComicConfig::builtin();
        assert_eq!(config.gate_for(1), Some(GameId::Hacking));
        assert_eq!(config.gate_for(3), Some(GameId::Maze));
        assert_eq!(config.game(GameId::Hacking).unwrap().auto_advance_delay, Some(2.0));
    }

    #[test]
    fn rejects_two_games_on_one_page() {
        let doc = r#"
total_pages = 5

[games.hacking]
title = "A"
required_page = 2
trigger = { top = 0.0, left = 0.0 }

[games.maze]
title = "B"
required_page = 2
trigger = { top = 0.0, left = 0.0 }
"#;
        let err = ComicConfig::parse(doc).unwrap_err();
        assert!(err.contains("both gate page 2"), "{err}");
    }

    #[test]
    fn rejects_gate_past_last_page() {
        let doc = r#"
total_pages = 3

[games.maze]
title = "B"
required_page = 4
trigger = { top = 0.0, left = 0.0 }
"#;
        assert!(ComicConfig::parse(doc).is_err());
    }

    #[test]
    fn rejects_zero_pages() {
        let doc = r#"
total_pages = 0

[games]
"#;
        assert!(ComicConfig::parse(doc).is_err());
    }

    #[test]
    fn rejects_non_positive_delay() {
        let doc = r#"
total_pages = 3

[games.maze]
title = "B"
required_page = 1
auto_advance_delay = 0.0
trigger = { top = 0.0, left = 0.0 }
"#;
        assert!(ComicConfig::parse(doc).is_err());
    }

    #[test]
    fn navigation_defaults_apply() {
        let doc = r#"
total_pages = 2

[games.hacking]
title = "A"
required_page = 1
trigger = { top = 0.0, left = 0.0 }
"#;
        let config = ComicConfig::parse(doc).unwrap();
        assert!(config.keyboard);
        assert!(config.auto_advance);
        assert_eq!(config.transition_delay, 0.5);
        assert_eq!(config.game(GameId::Hacking).unwrap().auto_advance_delay, None);
    }
}
