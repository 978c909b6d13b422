//! Difficulty and level configuration
//!
//! Read from the page URL query (`?difficulty=hard&level=2`) or from an
//! embedded JSON blob. Nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::consts::{LEVEL_CELL_STEP, MIN_CELL_SIZE};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Target cell size in pixels at level 1
    pub fn base_cell_size(&self) -> u32 {
        match self {
            Difficulty::Easy => 54,
            Difficulty::Medium => 36,
            Difficulty::Hard => 28,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// 1-based level; higher levels shrink the cells
    pub level: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            level: 1,
        }
    }
}

impl Settings {
    /// Same settings at `difficulty`, back to level 1
    pub fn with_difficulty(&self, difficulty: Difficulty) -> Self {
        Self { difficulty, level: 1 }
    }

    /// Target cell size for the layout engine
    pub fn target_cell_size(&self) -> u32 {
        let shrink = self.level.saturating_sub(1).saturating_mul(LEVEL_CELL_STEP);
        self.difficulty
            .base_cell_size()
            .saturating_sub(shrink)
            .max(MIN_CELL_SIZE)
    }

    /// Parse a URL query string; unknown keys and bad values are ignored
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "difficulty" | "d" => {
                    if let Some(d) = Difficulty::from_str(value) {
                        settings.difficulty = d;
                    } else {
                        log::warn!("Ignoring unknown difficulty {:?}", value);
                    }
                }
                "level" => match value.parse::<u32>() {
                    Ok(level) if level >= 1 => settings.level = level,
                    _ => log::warn!("Ignoring bad level {:?}", value),
                },
                _ => {}
            }
        }
        settings
    }

    /// Parse a JSON config blob; missing fields take defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.level = settings.level.max(1);
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        // Plain enum + integer: serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_cell_sizes() {
        let at = |difficulty, level| Settings { difficulty, level }.target_cell_size();
        assert_eq!(at(Difficulty::Easy, 1), 54);
        assert_eq!(at(Difficulty::Medium, 1), 36);
        assert_eq!(at(Difficulty::Hard, 1), 28);
        assert_eq!(at(Difficulty::Hard, 3), 24);
        assert_eq!(at(Difficulty::Hard, 50), MIN_CELL_SIZE);
        assert_eq!(at(Difficulty::Easy, u32::MAX), MIN_CELL_SIZE);
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("EASY"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_str("med"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str(" hard "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_from_query() {
        let s = Settings::from_query("?difficulty=hard&level=3&debug=1");
        assert_eq!(s, Settings { difficulty: Difficulty::Hard, level: 3 });

        let s = Settings::from_query("level=0&difficulty=wat");
        assert_eq!(s, Settings::default());

        assert_eq!(Settings::from_query(""), Settings::default());
    }

    #[test]
    fn test_json_round_trip_and_defaults() {
        let s = Settings { difficulty: Difficulty::Easy, level: 2 };
        assert_eq!(s.to_json(), r#"{"difficulty":"easy","level":2}"#);
        assert_eq!(Settings::from_json(&s.to_json()).unwrap(), s);

        let partial = Settings::from_json(r#"{"difficulty":"hard"}"#).unwrap();
        assert_eq!(partial, Settings { difficulty: Difficulty::Hard, level: 1 });

        assert!(Settings::from_json(r#"{"difficulty":"insane"}"#).is_err());
    }

    #[test]
    fn test_with_difficulty_resets_level() {
        let s = Settings { difficulty: Difficulty::Medium, level: 5 };
        assert_eq!(s.with_difficulty(Difficulty::Easy), Settings { difficulty: Difficulty::Easy, level: 1 });
    }
}
