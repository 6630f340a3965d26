//! @ai:module:intent Season-against-baseline and season-over-season comparison
//! @ai:module:layer application
//! @ai:module:public_api SeasonComparator, SeasonComparatorTrait
//! @ai:module:stateless true

use crate::error::ComparisonError;
use crate::metrics::types::{
    ComparisonResult, MetricDelta, PercentDelta, SeasonDeltas, SeasonRecord,
};
use std::collections::BTreeMap;

/// @ai:intent Trait for season comparison
pub trait SeasonComparatorTrait: Send + Sync {
    /// @ai:intent Compare every record in `others` against `baseline`
    fn compare(
        &self,
        baseline: &SeasonRecord,
        others: &[SeasonRecord],
    ) -> Result<ComparisonResult, ComparisonError>;

    /// @ai:intent Compare each record against the one before it
    fn compare_consecutive(
        &self,
        records: &[SeasonRecord],
    ) -> Result<Vec<ComparisonResult>, ComparisonError>;
}

/// @ai:intent Computes per-metric deltas between season records
pub struct SeasonComparator;

impl SeasonComparator {
    /// @ai:intent Create a new season comparator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Deltas for metrics present on both sides
    /// @ai:effects pure
    fn pairwise(baseline: &SeasonRecord, compared: &SeasonRecord) -> SeasonDeltas {
        let deltas: BTreeMap<_, _> = baseline
            .metrics()
            .filter_map(|(metric, base)| {
                compared
                    .metric(metric)
                    .map(|value| (metric, Self::delta(base, value)))
            })
            .collect();

        SeasonDeltas {
            season_id: compared.season_id().to_string(),
            team_id: compared.team_id().to_string(),
            deltas,
        }
    }

    /// @ai:intent Absolute and relative change from `base` to `value`
    /// @ai:effects pure
    fn delta(base: f64, value: f64) -> MetricDelta {
        let absolute_delta = value - base;
        let percent_delta = if base == 0.0 {
            PercentDelta::Undefined
        } else {
            PercentDelta::Defined(absolute_delta / base)
        };

        MetricDelta {
            baseline: base,
            compared: value,
            absolute_delta,
            percent_delta,
        }
    }
}

impl Default for SeasonComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonComparatorTrait for SeasonComparator {
    /// @ai:effects pure
    fn compare(
        &self,
        baseline: &SeasonRecord,
        others: &[SeasonRecord],
    ) -> Result<ComparisonResult, ComparisonError> {
        if others.is_empty() {
            return Err(ComparisonError::EmptyComparisonSet {
                baseline_season_id: baseline.season_id().to_string(),
            });
        }

        let deltas: Vec<_> = others
            .iter()
            .map(|other| Self::pairwise(baseline, other))
            .collect();

        tracing::debug!(
            baseline = baseline.season_id(),
            compared = others.len(),
            "compared seasons against baseline"
        );

        Ok(ComparisonResult {
            baseline_season_id: baseline.season_id().to_string(),
            baseline_team_id: baseline.team_id().to_string(),
            compared_season_ids: others.iter().map(|r| r.season_id().to_string()).collect(),
            deltas,
        })
    }

    /// @ai:effects pure
    fn compare_consecutive(
        &self,
        records: &[SeasonRecord],
    ) -> Result<Vec<ComparisonResult>, ComparisonError> {
        match records {
            [] => Err(ComparisonError::EmptyComparisonSet {
                baseline_season_id: String::new(),
            }),
            [only] => Err(ComparisonError::EmptyComparisonSet {
                baseline_season_id: only.season_id().to_string(),
            }),
            _ => records
                .windows(2)
                .map(|pair| self.compare(&pair[0], &pair[1..]))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::types::Metric;
    use pretty_assertions::assert_eq;

    fn baseline() -> SeasonRecord {
        SeasonRecord::new("2022", "MIL")
            .with_metric(Metric::Points, 20.0)
            .with_metric(Metric::Rebounds, 5.0)
    }

    fn compared() -> SeasonRecord {
        SeasonRecord::new("2023", "MIL")
            .with_metric(Metric::Points, 25.0)
            .with_metric(Metric::Rebounds, 5.0)
            .with_metric(Metric::Assists, 3.0)
    }

    #[test]
    fn test_scenario_points_rebounds_assists() {
        let result = SeasonComparator::new()
            .compare(&baseline(), &[compared()])
            .unwrap();

        let points = result.delta("2023", Metric::Points).unwrap();
        assert!((points.absolute_delta - 5.0).abs() < 1e-9);
        assert_eq!(points.percent_delta, PercentDelta::Defined(0.25));

        let rebounds = result.delta("2023", Metric::Rebounds).unwrap();
        assert_eq!(rebounds.absolute_delta, 0.0);
        assert_eq!(rebounds.percent_delta, PercentDelta::Defined(0.0));

        assert!(result.delta("2023", Metric::Assists).is_none());
        assert_eq!((points.baseline, points.compared), (20.0, 25.0));
    }

    #[test]
    fn test_zero_baseline_is_undefined() {
        let base = SeasonRecord::new("2022", "MIL").with_metric(Metric::Blocks, 0.0);
        let other = SeasonRecord::new("2023", "MIL").with_metric(Metric::Blocks, 1.2);

        let result = SeasonComparator::new().compare(&base, &[other]).unwrap();
        let blocks = result.delta("2023", Metric::Blocks).unwrap();

        assert!((blocks.absolute_delta - 1.2).abs() < 1e-9);
        assert_eq!(blocks.percent_delta, PercentDelta::Undefined);
    }

    #[test]
    fn test_antisymmetry() {
        let a = baseline();
        let b = compared();
        let comparator = SeasonComparator::new();

        let forward = comparator.compare(&a, &[b.clone()]).unwrap();
        let backward = comparator.compare(&b, &[a.clone()]).unwrap();

        for metric in [Metric::Points, Metric::Rebounds] {
            let f = forward.delta("2023", metric).unwrap();
            let r = backward.delta("2022", metric).unwrap();
            assert!((f.absolute_delta + r.absolute_delta).abs() < 1e-9);
        }
    }

    #[test]
    fn test_antisymmetry_with_zero_side() {
        let zero = SeasonRecord::new("2022", "MIL").with_metric(Metric::Blocks, 0.0);
        let some = SeasonRecord::new("2023", "MIL").with_metric(Metric::Blocks, 2.0);
        let comparator = SeasonComparator::new();

        let forward = comparator.compare(&zero, &[some.clone()]).unwrap();
        let backward = comparator.compare(&some, &[zero.clone()]).unwrap();

        let f = forward.delta("2023", Metric::Blocks).unwrap();
        let r = backward.delta("2022", Metric::Blocks).unwrap();
        assert_eq!(f.absolute_delta, 2.0);
        assert_eq!(r.absolute_delta, -2.0);
        assert_eq!(f.percent_delta, PercentDelta::Undefined);
        assert_eq!(r.percent_delta, PercentDelta::Defined(-1.0));
    }

    #[test]
    fn test_n_way_against_single_baseline() {
        let third = SeasonRecord::new("2024", "MIL").with_metric(Metric::Points, 30.0);
        let result = SeasonComparator::new()
            .compare(&baseline(), &[compared(), third])
            .unwrap();

        assert_eq!(result.compared_season_ids, vec!["2023", "2024"]);
        assert_eq!(result.deltas.len(), 2);
        let points = result.delta("2024", Metric::Points).unwrap();
        assert!((points.absolute_delta - 10.0).abs() < 1e-9);
        assert!(result.delta("2024", Metric::Rebounds).is_none());
    }

    #[test]
    fn test_empty_comparison_set() {
        let err = SeasonComparator::new().compare(&baseline(), &[]).unwrap_err();
        assert_eq!(
            err,
            ComparisonError::EmptyComparisonSet {
                baseline_season_id: "2022".to_string()
            }
        );
    }

    #[test]
    fn test_consecutive_progression() {
        let third = SeasonRecord::new("2024", "MIL").with_metric(Metric::Points, 30.0);
        let steps = SeasonComparator::new()
            .compare_consecutive(&[baseline(), compared(), third])
            .unwrap();

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].baseline_season_id, "2022");
        assert_eq!(steps[1].baseline_season_id, "2023");
        let step = steps[1].delta("2024", Metric::Points).unwrap();
        assert_eq!(step.percent_delta, PercentDelta::Defined(0.2));
    }

    #[test]
    fn test_consecutive_needs_two_records() {
        let comparator = SeasonComparator::new();
        assert!(comparator.compare_consecutive(&[baseline()]).is_err());
        assert!(comparator.compare_consecutive(&[]).is_err());
    }
}
