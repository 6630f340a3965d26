//! @ai:module:intent Configuration structs for normalization, caching and reports
//! @ai:module:layer infrastructure
//! @ai:module:public_api HoopstatConfig, NormalizationConfig, PercentScale, CacheConfig, ReportConfig
//! @ai:module:stateless true

use crate::metrics::Metric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// @ai:intent Main configuration, loaded from hoopstat.toml
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoopstatConfig {
    #[serde(default)]
    pub normalization: NormalizationConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// @ai:intent How a provider reports percentage metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PercentScale {
    /// 0.0 to 1.0
    #[default]
    Fraction,
    /// 0 to 100
    Hundred,
    /// Values above 1.0 are read as 0-100, everything else as a fraction
    Auto,
}

impl PercentScale {
    /// @ai:intent Convert a raw percentage into a fraction
    /// @ai:effects pure
    pub fn to_fraction(self, raw: f64) -> f64 {
        match self {
            PercentScale::Fraction => raw,
            PercentScale::Hundred => raw / 100.0,
            PercentScale::Auto if raw > 1.0 => raw / 100.0,
            PercentScale::Auto => raw,
        }
    }
}

/// @ai:intent Field-name aliases and unit policy for one stats provider
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationConfig {
    #[serde(default = "default_season_fields")]
    pub season_fields: Vec<String>,
    #[serde(default = "default_team_fields")]
    pub team_fields: Vec<String>,
    #[serde(default = "default_player_fields")]
    pub player_fields: Vec<String>,
    /// Provider field names per metric, tried in order after the canonical name.
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<Metric, Vec<String>>,
    #[serde(default)]
    pub percent_scale: PercentScale,
}

/// @ai:intent Where the payload cache lives and how long entries stay fresh
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: i64,
}

/// @ai:intent Presentation settings for text and Markdown output
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    #[serde(default = "default_show_trend")]
    pub show_trend: bool,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            season_fields: default_season_fields(),
            team_fields: default_team_fields(),
            player_fields: default_player_fields(),
            aliases: default_aliases(),
            percent_scale: PercentScale::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            max_age_hours: default_max_age_hours(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            show_trend: default_show_trend(),
        }
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn default_season_fields() -> Vec<String> {
    strings(&["season_id", "season", "SEASON_ID", "year", "game.season"])
}

fn default_team_fields() -> Vec<String> {
    strings(&["team_id", "team.id", "TEAM_ID", "team_abbreviation", "team"])
}

fn default_player_fields() -> Vec<String> {
    strings(&["player_id", "player.id", "PLAYER_ID"])
}

fn default_aliases() -> BTreeMap<Metric, Vec<String>> {
    BTreeMap::from([
        (Metric::Points, strings(&["pts", "PTS"])),
        (Metric::Rebounds, strings(&["reb", "REB", "trb"])),
        (Metric::Assists, strings(&["ast", "AST"])),
        (Metric::Steals, strings(&["stl", "STL"])),
        (Metric::Blocks, strings(&["blk", "BLK"])),
        (Metric::Minutes, strings(&["min", "MIN", "mp"])),
        (Metric::GamesPlayed, strings(&["gp", "GP", "g"])),
        (Metric::FieldGoalPct, strings(&["fg_pct", "FG_PCT"])),
        (Metric::ThreePointPct, strings(&["fg3_pct", "FG3_PCT", "three_pct"])),
        (Metric::FreeThrowPct, strings(&["ft_pct", "FT_PCT"])),
        (Metric::Turnovers, strings(&["turnover", "tov", "TOV"])),
    ])
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("data/cache.json")
}

fn default_max_age_hours() -> i64 {
    24
}

fn default_decimals() -> usize {
    1
}

fn default_show_trend() -> bool {
    true
}

impl HoopstatConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl NormalizationConfig {
    /// @ai:intent Field names recognized for a metric: canonical name first, then aliases
    /// @ai:effects pure
    pub fn fields_for(&self, metric: Metric) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(metric.as_str()).chain(
            self.aliases
                .get(&metric)
                .into_iter()
                .flatten()
                .map(String::as_str),
        )
    }
}
