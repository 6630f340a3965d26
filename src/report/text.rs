//! @ai:module:intent Human-readable terminal output with colored deltas and trend sparklines
//! @ai:module:layer presentation
//! @ai:module:public_api OutputFormat, render, render_trend, sparkline
//! @ai:module:stateless true

use crate::error::Result;
use crate::metrics::{Metric, PercentDelta, SeasonRecord};
use crate::report::format::{FormattedComparison, FormattedReport};
use crate::report::{display_delta, display_percent, display_value};
use colored::Colorize;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Render a formatted report in the requested output format
/// @ai:effects pure
pub fn render(report: &FormattedReport, format: OutputFormat, decimals: usize) -> Result<String> {
    match format {
        OutputFormat::Json => report.to_json(),
        OutputFormat::JsonPretty => report.to_json_pretty(),
        OutputFormat::Text => Ok(render_text(report, decimals)),
    }
}

fn render_text(report: &FormattedReport, decimals: usize) -> String {
    let mut output = String::new();

    match report {
        FormattedReport::Aggregate(aggregate) => {
            let player = aggregate.player_id.as_deref().unwrap_or("unknown player");
            output.push_str(&format!(
                "{} {} ({} seasons)\n",
                "Career".bold(),
                player,
                aggregate.seasons_included.len()
            ));

            for row in &aggregate.metrics {
                output.push_str(&format!(
                    "  {:<14} {:>10} {}\n",
                    row.metric.label(),
                    display_value(row.metric, row.average, decimals),
                    format!("avg over {}", row.seasons).dimmed()
                ));
            }
        }
        FormattedReport::Comparison(comparison) => {
            output.push_str(&render_comparison_text(comparison, decimals));
        }
        FormattedReport::Progression { steps } => {
            for step in steps {
                output.push_str(&render_comparison_text(step, decimals));
            }
        }
    }

    output
}

fn render_comparison_text(comparison: &FormattedComparison, decimals: usize) -> String {
    let mut output = String::new();

    for season in &comparison.comparisons {
        output.push_str(&format!(
            "{} {} vs {}\n",
            "Season".bold(),
            season.season_id,
            comparison.baseline_season_id.dimmed()
        ));

        if season.metrics.is_empty() {
            output.push_str(&format!("  {}\n", "no shared metrics".dimmed()));
            continue;
        }

        for row in &season.metrics {
            let delta = display_delta(row.metric, row.absolute_delta, decimals);
            let percent = display_percent(row.percent_delta, decimals);

            let percent = match row.percent_delta {
                PercentDelta::Undefined => percent.dimmed(),
                PercentDelta::Defined(p) if p > 0.0 => percent.green(),
                PercentDelta::Defined(p) if p < 0.0 => percent.red(),
                PercentDelta::Defined(_) => percent.normal(),
            };

            output.push_str(&format!(
                "  {:<14} {:>10} {:>10} {:>10} {:>10}\n",
                row.metric.label(),
                display_value(row.metric, row.baseline, decimals),
                display_value(row.metric, row.compared, decimals),
                delta,
                percent
            ));
        }
    }

    output
}

/// @ai:intent Render a sparkline, blank for absent values
/// @ai:effects pure
pub fn sparkline(values: &[Option<f64>]) -> String {
    let present = values.iter().flatten();
    let min = present.clone().copied().fold(f64::INFINITY, f64::min);
    let max = present.copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    values
        .iter()
        .map(|value| match value {
            None => ' ',
            Some(_) if span <= f64::EPSILON => BARS[BARS.len() / 2],
            Some(v) => {
                let level = ((v - min) / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[level.min(BARS.len() - 1)]
            }
        })
        .collect()
}

/// @ai:intent One sparkline row per metric reported in any season, history order as given
/// @ai:effects pure
pub fn render_trend(records: &[SeasonRecord], decimals: usize) -> String {
    let mut output = String::new();

    for metric in Metric::ALL {
        let values: Vec<Option<f64>> = records.iter().map(|r| r.metric(metric)).collect();
        let Some(last) = values.iter().rev().flatten().next() else {
            continue;
        };

        output.push_str(&format!(
            "  {:<14} {} {}\n",
            metric.label(),
            sparkline(&values),
            display_value(metric, *last, decimals).dimmed()
        ));
    }

    output
}
