//! @ai:module:intent Project aggregates and comparisons into a stable serializable shape
//! @ai:module:layer application
//! @ai:module:public_api ResultFormatter, Summary, FormattedReport, FormattedAggregate, FormattedComparison
//! @ai:module:stateless true

use crate::error::Result;
use crate::metrics::{CareerAggregate, ComparisonResult, Metric, PercentDelta, SeasonDeltas};
use serde::{Deserialize, Serialize};

/// @ai:intent What the formatter is asked to render
#[derive(Debug, Clone, Copy)]
pub enum Summary<'a> {
    Aggregate(&'a CareerAggregate),
    Comparison(&'a ComparisonResult),
    Progression(&'a [ComparisonResult]),
}

/// @ai:intent One metric row of a career aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub metric: Metric,
    pub seasons: usize,
    pub total: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedAggregate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    pub seasons_included: Vec<String>,
    pub metrics: Vec<AggregateRow>,
}

/// @ai:intent One metric row of a pairwise comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaRow {
    pub metric: Metric,
    pub baseline: f64,
    pub compared: f64,
    pub absolute_delta: f64,
    pub percent_delta: PercentDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedSeasonDeltas {
    pub season_id: String,
    pub team_id: String,
    pub metrics: Vec<DeltaRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedComparison {
    pub baseline_season_id: String,
    pub baseline_team_id: String,
    pub compared_season_ids: Vec<String>,
    pub comparisons: Vec<FormattedSeasonDeltas>,
}

/// @ai:intent Canonical output shape consumed by CLI and web presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormattedReport {
    Aggregate(FormattedAggregate),
    Comparison(FormattedComparison),
    Progression { steps: Vec<FormattedComparison> },
}

impl FormattedReport {
    /// @ai:intent Compact JSON, byte-identical for identical input
    /// @ai:effects pure
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// @ai:effects pure
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// @ai:intent Structural projection of results, rows in canonical metric order
pub struct ResultFormatter;

impl ResultFormatter {
    /// @ai:intent Create a new formatter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Render an aggregate, comparison or progression
    /// @ai:post absent metrics are omitted, never emitted as null
    /// @ai:effects pure
    pub fn format(&self, summary: Summary<'_>) -> FormattedReport {
        match summary {
            Summary::Aggregate(aggregate) => {
                FormattedReport::Aggregate(Self::format_aggregate(aggregate))
            }
            Summary::Comparison(comparison) => {
                FormattedReport::Comparison(Self::format_comparison(comparison))
            }
            Summary::Progression(steps) => FormattedReport::Progression {
                steps: steps.iter().map(Self::format_comparison).collect(),
            },
        }
    }

    fn format_aggregate(aggregate: &CareerAggregate) -> FormattedAggregate {
        // BTreeMap<Metric, _> iterates in declaration order, independent of insertion order.
        let metrics = aggregate
            .totals
            .iter()
            .filter_map(|(metric, total)| {
                Some(AggregateRow {
                    metric: *metric,
                    seasons: *aggregate.counts.get(metric)?,
                    total: *total,
                    average: *aggregate.averages.get(metric)?,
                })
            })
            .collect();

        FormattedAggregate {
            player_id: aggregate.player_id.clone(),
            seasons_included: aggregate.seasons_included.clone(),
            metrics,
        }
    }

    fn format_comparison(comparison: &ComparisonResult) -> FormattedComparison {
        FormattedComparison {
            baseline_season_id: comparison.baseline_season_id.clone(),
            baseline_team_id: comparison.baseline_team_id.clone(),
            compared_season_ids: comparison.compared_season_ids.clone(),
            comparisons: comparison.deltas.iter().map(Self::format_deltas).collect(),
        }
    }

    fn format_deltas(deltas: &SeasonDeltas) -> FormattedSeasonDeltas {
        FormattedSeasonDeltas {
            season_id: deltas.season_id.clone(),
            team_id: deltas.team_id.clone(),
            metrics: deltas
                .deltas
                .iter()
                .map(|(metric, delta)| DeltaRow {
                    metric: *metric,
                    baseline: delta.baseline,
                    compared: delta.compared,
                    absolute_delta: delta.absolute_delta,
                    percent_delta: delta.percent_delta,
                })
                .collect(),
        }
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new()
    }
}
