//! League configuration: scoring rules and scheduling settings, read from env once
//! in the binary and passed down to the logic functions.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Points and match format used when recording results and building standings.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub win_points: u32,
    pub draw_points: u32,
    pub loss_points: u32,
    /// Legs needed to take a match (best-of-(2n-1)).
    pub legs_to_win: u32,
    /// Whether a level leg count is accepted as a draw.
    pub allow_draws: bool,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            win_points: 3,
            draw_points: 1,
            loss_points: 0,
            legs_to_win: 3,
            allow_draws: false,
        }
    }
}

/// Full runtime configuration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub host: String,
    pub port: u16,
    pub scoring: ScoringRules,
    /// Days between consecutive matchday deadlines; 0 leaves deadlines unset.
    pub matchday_offset_days: u32,
    /// Grace period after a matchday deadline before a fixture counts as overdue.
    pub match_timeout_minutes: u32,
    /// How often the binary checks for overdue fixtures.
    pub deadline_sweep_secs: u64,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            scoring: ScoringRules::default(),
            matchday_offset_days: 7,
            match_timeout_minutes: 60,
            deadline_sweep_secs: 30 * 60,
        }
    }
}

impl LeagueConfig {
    /// Read every setting from the environment, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let scoring = ScoringRules {
            win_points: env_or("WIN_POINTS", defaults.scoring.win_points),
            draw_points: env_or("DRAW_POINTS", defaults.scoring.draw_points),
            loss_points: env_or("LOSS_POINTS", defaults.scoring.loss_points),
            legs_to_win: env_or("LEGS_TO_WIN", defaults.scoring.legs_to_win).max(1),
            allow_draws: env_or("ALLOW_DRAWS", defaults.scoring.allow_draws),
        };
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            scoring,
            matchday_offset_days: env_or("MATCHDAY_OFFSET_DAYS", defaults.matchday_offset_days),
            match_timeout_minutes: env_or("MATCH_TIMEOUT_MINUTES", defaults.match_timeout_minutes),
            deadline_sweep_secs: env_or("DEADLINE_SWEEP_SECS", defaults.deadline_sweep_secs).max(1),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
