//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::error::Result;
use crate::report::format::{FormattedAggregate, FormattedComparison, FormattedReport};
use crate::report::{display_delta, display_percent, display_value};
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from a formatted result
    fn generate(&self, report: &FormattedReport, output_path: &Path) -> Result<()>;
}

/// @ai:intent Renders formatted results as Markdown tables
pub struct MarkdownReporter {
    decimals: usize,
}

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self { decimals: 1 }
    }

    pub fn with_decimals(decimals: usize) -> Self {
        Self { decimals }
    }

    /// @ai:intent Render a report to a Markdown string
    /// @ai:effects pure
    pub fn render(&self, report: &FormattedReport) -> String {
        match report {
            FormattedReport::Aggregate(aggregate) => self.render_aggregate(aggregate),
            FormattedReport::Comparison(comparison) => {
                let mut output = String::from("# Season Comparison\n\n");
                output.push_str(&self.render_comparison(comparison));
                output
            }
            FormattedReport::Progression { steps } => {
                let mut output = String::from("# Season Progression\n\n");
                for step in steps {
                    output.push_str(&self.render_comparison(step));
                }
                output
            }
        }
    }

    /// @ai:intent Generate career summary table
    /// @ai:effects pure
    fn render_aggregate(&self, aggregate: &FormattedAggregate) -> String {
        let mut output = String::new();

        writeln!(output, "# Career Summary").unwrap();
        writeln!(output).unwrap();
        if let Some(player_id) = &aggregate.player_id {
            writeln!(output, "**Player:** {}", player_id).unwrap();
        }
        writeln!(
            output,
            "**Seasons:** {}",
            aggregate.seasons_included.join(", ")
        )
        .unwrap();
        writeln!(output).unwrap();

        writeln!(output, "| Metric | Seasons | Total | Average |").unwrap();
        writeln!(output, "|--------|---------|-------|---------|").unwrap();

        for row in &aggregate.metrics {
            // Totals of ratios carry no meaning.
            let total = if row.metric.is_percentage() {
                "-".to_string()
            } else {
                display_value(row.metric, row.total, self.decimals)
            };

            writeln!(
                output,
                "| {} | {} | {} | {} |",
                row.metric.label(),
                row.seasons,
                total,
                display_value(row.metric, row.average, self.decimals)
            )
            .unwrap();
        }

        output
    }

    /// @ai:intent Generate one delta table per compared season
    /// @ai:effects pure
    fn render_comparison(&self, comparison: &FormattedComparison) -> String {
        let mut output = String::new();

        for season in &comparison.comparisons {
            writeln!(
                output,
                "## {} ({}) vs {} ({})",
                season.season_id,
                season.team_id,
                comparison.baseline_season_id,
                comparison.baseline_team_id
            )
            .unwrap();
            writeln!(output).unwrap();

            if season.metrics.is_empty() {
                writeln!(output, "_No metrics reported in both seasons._").unwrap();
                writeln!(output).unwrap();
                continue;
            }

            writeln!(
                output,
                "| Metric | {} | {} | Delta | Change |",
                comparison.baseline_season_id, season.season_id
            )
            .unwrap();
            writeln!(output, "|--------|------|------|-------|--------|").unwrap();

            for row in &season.metrics {
                writeln!(
                    output,
                    "| {} | {} | {} | {} | {} |",
                    row.metric.label(),
                    display_value(row.metric, row.baseline, self.decimals),
                    display_value(row.metric, row.compared, self.decimals),
                    display_delta(row.metric, row.absolute_delta, self.decimals),
                    display_percent(row.percent_delta, self.decimals)
                )
                .unwrap();
            }
            writeln!(output).unwrap();
        }

        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, report: &FormattedReport, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, self.render(report))?;
        Ok(())
    }
}
