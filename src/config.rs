//! Game configuration
//!
//! Every tunable of the engine lives in [`GameConfig`]. Game variants
//! (narrow vs. wide invaders, formation size, bullet spawned from the ship's
//! edge or centre) are [`Preset`]s rather than separate code paths.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Cell, Playfield, Span};

/// Named starting points for a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// 3×8 single-cell invaders on a 32×24 grid.
    #[default]
    Classic,
    /// 3×6 two-cell invaders, three-cell ship firing from its centre.
    Wide,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Wide => "wide",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("playfield must be at least 1x1 (got {width}x{height})")]
    EmptyPlayfield { width: u16, height: u16 },
    #[error("formation must have at least one row and one column")]
    EmptyFormation,
    #[error("invader footprint must be 1 or 2 cells (got {0})")]
    Footprint(i32),
    #[error("invader spacing {h_spacing}x{v_spacing} would overlap sprites of footprint {footprint}")]
    Spacing {
        h_spacing: i32,
        v_spacing: i32,
        footprint: i32,
    },
    #[error("player width {player_width} does not fit a {width}-column playfield")]
    PlayerWidth { player_width: i32, width: u16 },
    #[error("player start column {0} is outside the playfield")]
    PlayerStart(i32),
    #[error("player row {row} must lie below the top row {top_row} and inside {height} rows")]
    PlayerRow { row: i32, top_row: i32, height: u16 },
    #[error("top playable row must be at least 1 (row 0 holds the score)")]
    TopRow,
    #[error("formation does not fit between the invader bounds and above the player")]
    FormationOutOfBounds,
    #[error("bullet spawn offset {offset} lies outside a {player_width}-cell ship")]
    SpawnOffset { offset: i32, player_width: i32 },
    #[error("step delay must be at least one tick")]
    StepDelay,
    #[error("display refresh rate must be non-zero")]
    RefreshRate,
    #[error("reward {reward} for {count} invaders overflows the score")]
    Reward { reward: u32, count: usize },
    #[error("banner centre column {0} is outside the playfield")]
    BannerCentre(i32),
}

/// Engine parameters. Missing JSON fields fall back to the classic preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Grid ===
    pub width: u16,
    pub height: u16,
    /// Topmost row a bullet may occupy; row 0 is the score header.
    pub top_row: i32,

    // === Player ===
    pub player_row: i32,
    pub player_start: i32,
    pub player_width: i32,
    /// Column offset from the ship's left edge where a new bullet appears.
    pub bullet_spawn_offset: i32,

    // === Formation ===
    pub rows: usize,
    pub columns: usize,
    pub h_spacing: i32,
    pub v_spacing: i32,
    pub column_offset: i32,
    pub row_offset: i32,
    /// Width of an invader sprite in cells (1 or 2).
    pub footprint: i32,
    /// Columns kept clear on each side of the grid when the formation turns.
    pub margin: i32,
    /// Ticks between formation steps. Higher is slower.
    pub step_delay: u32,
    pub reward: u32,

    // === Messages ===
    /// Column the win/lose banners are centred on.
    pub banner_centre: i32,

    // === Pacing ===
    /// Display refresh ticks to wait after each frame.
    pub frame_ticks: u32,
    pub refresh_hz: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 24,
            top_row: 1,

            player_row: 22,
            player_start: 15,
            player_width: 1,
            bullet_spawn_offset: 0,

            rows: 3,
            columns: 8,
            h_spacing: 3,
            v_spacing: 2,
            column_offset: 4,
            row_offset: 2,
            footprint: 1,
            margin: 1,
            step_delay: 6,
            reward: 10,

            banner_centre: 14,

            frame_ticks: 2,
            refresh_hz: 50,
        }
    }
}

impl GameConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Classic => Self::default(),
            Preset::Wide => Self {
                player_start: 14,
                player_width: 3,
                bullet_spawn_offset: 1,
                columns: 6,
                h_spacing: 4,
                footprint: 2,
                ..Self::default()
            },
        }
    }

    /// Parse a JSON document whose fields override `base`.
    pub fn from_json(json: &str, base: &GameConfig) -> Result<Self, ConfigError> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(base)?;
        if let (Some(target), Some(source)) = (merged.as_object_mut(), overrides.as_object()) {
            for (key, value) in source {
                target.insert(key.clone(), value.clone());
            }
        }
        let config: GameConfig = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file layered over `base`.
    pub fn load(path: &Path, base: &GameConfig) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json, base)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check that every entity the engine can produce stays on the grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyPlayfield {
                width: self.width,
                height: self.height,
            });
        }
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyFormation);
        }
        if !(1..=2).contains(&self.footprint) {
            return Err(ConfigError::Footprint(self.footprint));
        }
        if self.h_spacing < self.footprint || self.v_spacing < 1 {
            return Err(ConfigError::Spacing {
                h_spacing: self.h_spacing,
                v_spacing: self.v_spacing,
                footprint: self.footprint,
            });
        }
        if self.player_width < 1 || self.player_width > self.width as i32 {
            return Err(ConfigError::PlayerWidth {
                player_width: self.player_width,
                width: self.width,
            });
        }
        if !self.player_span().holds(self.player_start, self.player_width) {
            return Err(ConfigError::PlayerStart(self.player_start));
        }
        if self.top_row < 1 {
            return Err(ConfigError::TopRow);
        }
        if self.player_row <= self.top_row || self.player_row >= self.height as i32 {
            return Err(ConfigError::PlayerRow {
                row: self.player_row,
                top_row: self.top_row,
                height: self.height,
            });
        }
        if !(0..self.player_width).contains(&self.bullet_spawn_offset) {
            return Err(ConfigError::SpawnOffset {
                offset: self.bullet_spawn_offset,
                player_width: self.player_width,
            });
        }

        let last_column = last_slot(self.column_offset, self.columns, self.h_spacing)
            .ok_or(ConfigError::FormationOutOfBounds)?;
        let last_row = last_slot(self.row_offset, self.rows, self.v_spacing)
            .ok_or(ConfigError::FormationOutOfBounds)?;
        if self.margin < 0 {
            return Err(ConfigError::FormationOutOfBounds);
        }
        let span = self.invader_span();
        if !span.holds(self.column_offset, self.footprint)
            || !span.holds(last_column, self.footprint)
            || self.row_offset < self.top_row
            || last_row >= self.player_row
        {
            return Err(ConfigError::FormationOutOfBounds);
        }

        let kills = u32::try_from(self.invader_count()).ok();
        if kills.and_then(|n| n.checked_mul(self.reward)).is_none() {
            return Err(ConfigError::Reward {
                reward: self.reward,
                count: self.invader_count(),
            });
        }
        if !self.playfield().contains(Cell::new(self.banner_centre, 0)) {
            return Err(ConfigError::BannerCentre(self.banner_centre));
        }

        if self.step_delay == 0 {
            return Err(ConfigError::StepDelay);
        }
        if self.refresh_hz == 0 {
            return Err(ConfigError::RefreshRate);
        }
        Ok(())
    }

    pub fn playfield(&self) -> Playfield {
        Playfield::new(self.width, self.height)
    }

    /// Columns an invader sprite may occupy.
    pub fn invader_span(&self) -> Span {
        Span::new(self.margin, self.width as i32 - 1 - self.margin)
    }

    /// Columns the player's ship may occupy.
    pub fn player_span(&self) -> Span {
        Span::new(0, self.width as i32 - 1)
    }

    /// Row a freshly fired bullet appears on.
    pub fn bullet_spawn_row(&self) -> i32 {
        self.player_row - 1
    }

    pub fn invader_count(&self) -> usize {
        self.rows.saturating_mul(self.columns)
    }

    /// Score for clearing the whole formation.
    pub fn max_score(&self) -> u32 {
        u32::try_from(self.invader_count())
            .unwrap_or(u32::MAX)
            .saturating_mul(self.reward)
    }

    /// Wall-clock budget of one frame.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(self.frame_ticks as u64) / self.refresh_hz.max(1)
    }
}

/// Offset of the last of `count` slots spaced `spacing` apart from `first`,
/// or `None` if it does not fit in an `i32`.
fn last_slot(first: i32, count: usize, spacing: i32) -> Option<i32> {
    let gaps = i32::try_from(count.checked_sub(1)?).ok()?;
    gaps.checked_mul(spacing)?.checked_add(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        GameConfig::from_preset(Preset::Classic).validate().unwrap();
        GameConfig::from_preset(Preset::Wide).validate().unwrap();
    }

    #[test]
    fn classic_matches_grid_layout() {
        let c = GameConfig::default();
        assert_eq!(c.invader_span(), Span::new(1, 30));
        assert_eq!(c.bullet_spawn_row(), 21);
        assert_eq!(c.max_score(), 240);
        assert_eq!(c.frame_duration(), Duration::from_millis(40));
    }

    #[test]
    fn json_overrides_preset_fields() {
        let base = GameConfig::from_preset(Preset::Wide);
        let c = GameConfig::from_json(r#"{ "step_delay": 3, "reward": 25 }"#, &base).unwrap();
        assert_eq!(c.step_delay, 3);
        assert_eq!(c.reward, 25);
        assert_eq!(c.footprint, 2);
        assert_eq!(c.columns, 6);
    }

    #[test]
    fn json_rejects_bad_footprint() {
        let err = GameConfig::from_json(r#"{ "footprint": 3 }"#, &GameConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Footprint(3)));
    }

    #[test]
    fn json_rejects_malformed_input() {
        let err = GameConfig::from_json("{ step_delay", &GameConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn formation_must_fit_inside_bounds() {
        let c = GameConfig {
            columns: 10,
            ..GameConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::FormationOutOfBounds)));

        let c = GameConfig {
            rows: 11,
            ..GameConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::FormationOutOfBounds)));
    }

    #[test]
    fn spawn_offset_must_land_on_the_ship() {
        let c = GameConfig {
            bullet_spawn_offset: 1,
            ..GameConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::SpawnOffset { .. })));
    }

    #[test]
    fn zero_step_delay_is_rejected() {
        let c = GameConfig {
            step_delay: 0,
            ..GameConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::StepDelay)));
    }

    #[test]
    fn huge_spacing_is_an_error_not_a_panic() {
        let err = GameConfig::from_json(r#"{ "h_spacing": 1500000000 }"#, &GameConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::FormationOutOfBounds));

        let err = GameConfig::from_json(r#"{ "v_spacing": 2000000000, "rows": 4 }"#, &GameConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::FormationOutOfBounds));

        let err = GameConfig::from_json(r#"{ "column_offset": 2147483647 }"#, &GameConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::FormationOutOfBounds));
    }

    #[test]
    fn reward_must_not_overflow_the_score() {
        let c = GameConfig {
            reward: u32::MAX / 10,
            ..GameConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::Reward { count: 24, .. })));

        let c = GameConfig {
            reward: u32::MAX / 24,
            ..GameConfig::default()
        };
        c.validate().unwrap();
        assert_eq!(c.max_score(), (u32::MAX / 24) * 24);
    }

    #[test]
    fn banner_centre_must_be_on_the_grid() {
        let c = GameConfig {
            banner_centre: 32,
            ..GameConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::BannerCentre(32))));
    }
}
