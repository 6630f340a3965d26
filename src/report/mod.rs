//! @ai:module:intent Formatting and report generation for aggregates and comparisons
//! @ai:module:layer infrastructure
//! @ai:module:public_api ResultFormatter, FormattedReport, ReportGenerator, JsonReporter, MarkdownReporter

pub mod format;
pub mod json_report;
pub mod markdown_report;
pub mod text;

pub use format::{FormattedReport, ResultFormatter, Summary};
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};
pub use text::OutputFormat;

use crate::error::Result;
use crate::metrics::{Metric, PercentDelta};
use std::path::Path;

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new(decimals: usize) -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::with_decimals(decimals),
        }
    }

    /// @ai:intent Generate all reports
    /// @ai:effects fs:write
    pub fn generate_all(&self, report: &FormattedReport, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;

        self.json.generate(report, &output_dir.join("report.json"))?;
        self.markdown
            .generate(report, &output_dir.join("report.md"))?;

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(())
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

/// @ai:intent Display a metric value; percentages as 0-100 with a % sign
/// @ai:effects pure
pub(crate) fn display_value(metric: Metric, value: f64, decimals: usize) -> String {
    if metric.is_percentage() {
        format!("{:.*}%", decimals, value * 100.0)
    } else {
        format!("{:.*}", decimals, value)
    }
}

/// @ai:intent Display a signed delta; percentage metrics in percentage points
/// @ai:effects pure
pub(crate) fn display_delta(metric: Metric, delta: f64, decimals: usize) -> String {
    if metric.is_percentage() {
        format!("{:+.*} pp", decimals, delta * 100.0)
    } else {
        format!("{:+.*}", decimals, delta)
    }
}

/// @ai:intent Display a relative change with sign, n/a when undefined
/// @ai:effects pure
pub(crate) fn display_percent(percent: PercentDelta, decimals: usize) -> String {
    match percent {
        PercentDelta::Defined(p) => format!("{:+.*}%", decimals, p * 100.0),
        PercentDelta::Undefined => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::format::FormattedAggregate;
    use tempfile::TempDir;

    #[test]
    fn test_display_helpers() {
        assert_eq!(display_value(Metric::Points, 27.345, 1), "27.3");
        assert_eq!(display_value(Metric::ThreePointPct, 0.412, 1), "41.2%");
        assert_eq!(display_delta(Metric::Rebounds, 0.0, 1), "+0.0");
        assert_eq!(display_delta(Metric::Steals, -0.4, 2), "-0.40");
        assert_eq!(display_delta(Metric::FreeThrowPct, 0.03, 1), "+3.0 pp");
        assert_eq!(display_percent(PercentDelta::Defined(0.25), 1), "+25.0%");
        assert_eq!(display_percent(PercentDelta::Undefined, 1), "n/a");
    }

    #[test]
    fn test_generate_all_writes_both_files() {
        let temp = TempDir::new().unwrap();
        let report = FormattedReport::Aggregate(FormattedAggregate {
            player_id: None,
            seasons_included: vec!["2023".to_string()],
            metrics: vec![],
        });

        ReportGenerator::default()
            .generate_all(&report, &temp.path().join("out"))
            .unwrap();

        assert!(temp.path().join("out").join("report.json").exists());
        assert!(temp.path().join("out").join("report.md").exists());
    }
}
