//! @ai:module:intent Domain types for season records, career aggregates and comparisons
//! @ai:module:layer domain
//! @ai:module:public_api Metric, SeasonRecord, CareerAggregate, ComparisonResult, SeasonDeltas, MetricDelta, PercentDelta
//! @ai:module:stateless true

use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// @ai:intent Canonical statistic names, declared in canonical output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Minutes,
    GamesPlayed,
    FieldGoalPct,
    ThreePointPct,
    FreeThrowPct,
    Turnovers,
}

impl Metric {
    pub const ALL: [Metric; 11] = [
        Metric::Points,
        Metric::Rebounds,
        Metric::Assists,
        Metric::Steals,
        Metric::Blocks,
        Metric::Minutes,
        Metric::GamesPlayed,
        Metric::FieldGoalPct,
        Metric::ThreePointPct,
        Metric::FreeThrowPct,
        Metric::Turnovers,
    ];

    /// @ai:intent Canonical snake_case name used in configs and output
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Points => "points",
            Metric::Rebounds => "rebounds",
            Metric::Assists => "assists",
            Metric::Steals => "steals",
            Metric::Blocks => "blocks",
            Metric::Minutes => "minutes",
            Metric::GamesPlayed => "games_played",
            Metric::FieldGoalPct => "field_goal_pct",
            Metric::ThreePointPct => "three_point_pct",
            Metric::FreeThrowPct => "free_throw_pct",
            Metric::Turnovers => "turnovers",
        }
    }

    /// @ai:intent Human-readable label for tables
    /// @ai:effects pure
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Points => "Points",
            Metric::Rebounds => "Rebounds",
            Metric::Assists => "Assists",
            Metric::Steals => "Steals",
            Metric::Blocks => "Blocks",
            Metric::Minutes => "Minutes",
            Metric::GamesPlayed => "Games Played",
            Metric::FieldGoalPct => "FG%",
            Metric::ThreePointPct => "3P%",
            Metric::FreeThrowPct => "FT%",
            Metric::Turnovers => "Turnovers",
        }
    }

    /// @ai:intent Whether values of this metric are ratios in [0, 1]
    /// @ai:effects pure
    pub fn is_percentage(&self) -> bool {
        matches!(
            self,
            Metric::FieldGoalPct | Metric::ThreePointPct | Metric::FreeThrowPct
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::UnknownMetric(s.to_string()))
    }
}

// Metrics are used as map keys in both TOML and JSON, so they go through plain strings.
impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Metric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// @ai:intent One player's statistics for one season stint with one team
/// @ai:invariant a metric missing from the map is absent, never zero
/// @ai:invariant games_played >= 0, percentages within [0, 1], all values finite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRecord {
    season_id: String,
    team_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    player_id: Option<String>,
    metrics: BTreeMap<Metric, f64>,
}

impl SeasonRecord {
    /// @ai:intent Start a record with no metrics present
    /// @ai:effects pure
    pub fn new(season_id: impl Into<String>, team_id: impl Into<String>) -> Self {
        Self {
            season_id: season_id.into(),
            team_id: team_id.into(),
            player_id: None,
            metrics: BTreeMap::new(),
        }
    }

    /// @ai:intent Attach a player identity
    /// @ai:effects pure
    pub fn with_player(mut self, player_id: impl Into<String>) -> Self {
        self.player_id = Some(player_id.into());
        self
    }

    /// @ai:intent Set a metric value, dropping values that break the record invariants
    /// @ai:effects pure
    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        if is_valid_value(metric, value) {
            self.metrics.insert(metric, value);
        } else {
            tracing::warn!(
                season = %self.season_id,
                %metric,
                value,
                "dropping out-of-range metric value"
            );
        }
        self
    }

    pub fn season_id(&self) -> &str {
        &self.season_id
    }

    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    pub fn player_id(&self) -> Option<&str> {
        self.player_id.as_deref()
    }

    /// @ai:intent Value of a metric, None when absent
    /// @ai:effects pure
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }

    /// @ai:intent Present metrics in canonical order
    /// @ai:effects pure
    pub fn metrics(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.metrics.iter().map(|(m, v)| (*m, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// @ai:intent Check a value against the record invariants for its metric
/// @ai:effects pure
pub(crate) fn is_valid_value(metric: Metric, value: f64) -> bool {
    if !value.is_finite() {
        return false;
    }
    match metric {
        Metric::GamesPlayed => value >= 0.0,
        m if m.is_percentage() => (0.0..=1.0).contains(&value),
        _ => true,
    }
}

/// @ai:intent Order a player's history by season, breaking ties by team
/// @ai:effects pure
pub fn sort_history(records: &mut [SeasonRecord]) {
    records.sort_by(|a, b| {
        a.season_id
            .cmp(&b.season_id)
            .then_with(|| a.team_id.cmp(&b.team_id))
    });
}

/// @ai:intent Career-long totals and averages derived from season records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerAggregate {
    pub player_id: Option<String>,
    /// Season id of every record used, in input order; one entry per team stint.
    pub seasons_included: Vec<String>,
    pub totals: BTreeMap<Metric, f64>,
    pub averages: BTreeMap<Metric, f64>,
    /// Number of records in which each metric was present.
    pub counts: BTreeMap<Metric, usize>,
}

/// @ai:intent Relative change against a baseline, undefined for a zero baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentDelta {
    Defined(f64),
    Undefined,
}

impl PercentDelta {
    pub fn value(&self) -> Option<f64> {
        match self {
            PercentDelta::Defined(v) => Some(*v),
            PercentDelta::Undefined => None,
        }
    }
}

impl Serialize for PercentDelta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PercentDelta::Defined(v) => serializer.serialize_f64(*v),
            PercentDelta::Undefined => serializer.serialize_str("undefined"),
        }
    }
}

impl<'de> Deserialize<'de> for PercentDelta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(PercentDelta::Defined(v)),
            Raw::Text(s) if s == "undefined" => Ok(PercentDelta::Undefined),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "invalid percent delta: {s}"
            ))),
        }
    }
}

/// @ai:intent Both compared values of one metric with their absolute and relative difference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub baseline: f64,
    pub compared: f64,
    pub absolute_delta: f64,
    pub percent_delta: PercentDelta,
}

/// @ai:intent Deltas of one compared record against the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonDeltas {
    pub season_id: String,
    pub team_id: String,
    pub deltas: BTreeMap<Metric, MetricDelta>,
}

/// @ai:intent N-way comparison expressed as pairwise deltas against one baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub baseline_season_id: String,
    pub baseline_team_id: String,
    pub compared_season_ids: Vec<String>,
    pub deltas: Vec<SeasonDeltas>,
}

impl ComparisonResult {
    /// @ai:intent Look up a delta by compared season and metric
    /// @ai:effects pure
    pub fn delta(&self, season_id: &str, metric: Metric) -> Option<&MetricDelta> {
        self.deltas
            .iter()
            .find(|d| d.season_id == season_id)
            .and_then(|d| d.deltas.get(&metric))
    }
}
