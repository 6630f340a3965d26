//! @ai:module:intent Career aggregation over a player's season records
//! @ai:module:layer application
//! @ai:module:public_api StatAggregator, StatAggregatorTrait
//! @ai:module:stateless true

use crate::error::AggregationError;
use crate::metrics::types::{CareerAggregate, Metric, SeasonRecord};
use std::collections::BTreeMap;

/// @ai:intent Trait for career aggregation
pub trait StatAggregatorTrait: Send + Sync {
    /// @ai:intent Aggregate season records of a single player
    fn aggregate(&self, records: &[SeasonRecord]) -> Result<CareerAggregate, AggregationError>;
}

/// @ai:intent Computes per-metric totals and unweighted per-season averages
pub struct StatAggregator;

impl StatAggregator {
    /// @ai:intent Create a new stat aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Resolve the player identity shared by all records
    /// @ai:effects pure
    fn check_identity(records: &[SeasonRecord]) -> Result<Option<String>, AggregationError> {
        let mut expected: Option<&str> = None;

        for (index, record) in records.iter().enumerate() {
            let Some(found) = record.player_id() else {
                continue;
            };

            match expected {
                None => expected = Some(found),
                Some(exp) if exp != found => {
                    return Err(AggregationError::MixedPlayerIdentity {
                        expected: exp.to_string(),
                        found: found.to_string(),
                        season_id: record.season_id().to_string(),
                        index,
                    });
                }
                Some(_) => {}
            }
        }

        Ok(expected.map(str::to_string))
    }
}

impl Default for StatAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatAggregatorTrait for StatAggregator {
    /// @ai:intent Sum present values left to right and divide by the present count
    /// @ai:effects pure
    fn aggregate(&self, records: &[SeasonRecord]) -> Result<CareerAggregate, AggregationError> {
        if records.is_empty() {
            return Err(AggregationError::EmptySequence);
        }

        let player_id = Self::check_identity(records)?;

        let mut totals: BTreeMap<Metric, f64> = BTreeMap::new();
        let mut counts: BTreeMap<Metric, usize> = BTreeMap::new();

        for record in records {
            for (metric, value) in record.metrics() {
                *totals.entry(metric).or_insert(0.0) += value;
                *counts.entry(metric).or_insert(0) += 1;
            }
        }

        let averages = totals
            .iter()
            .map(|(metric, total)| (*metric, total / counts[metric] as f64))
            .collect();

        tracing::debug!(
            records = records.len(),
            metrics = totals.len(),
            "aggregated season records"
        );

        Ok(CareerAggregate {
            player_id,
            seasons_included: records.iter().map(|r| r.season_id().to_string()).collect(),
            totals,
            averages,
            counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn season(id: &str, points: Option<f64>) -> SeasonRecord {
        let record = SeasonRecord::new(id, "DEN");
        match points {
            Some(p) => record.with_metric(Metric::Points, p),
            None => record,
        }
    }

    #[test]
    fn test_average_counts_only_present_seasons() {
        let records = vec![
            season("2021", Some(10.0)),
            season("2022", Some(20.0)),
            season("2023", None),
        ];

        let agg = StatAggregator::new().aggregate(&records).unwrap();

        assert!((agg.averages[&Metric::Points] - 15.0).abs() < 1e-9);
        assert!((agg.totals[&Metric::Points] - 30.0).abs() < 1e-9);
        assert_eq!(agg.counts[&Metric::Points], 2);
        assert_eq!(agg.seasons_included, vec!["2021", "2022", "2023"]);
    }

    #[test]
    fn test_metric_absent_everywhere_is_omitted() {
        let records = vec![season("2021", Some(10.0)), season("2022", None)];
        let agg = StatAggregator::new().aggregate(&records).unwrap();

        assert!(!agg.totals.contains_key(&Metric::Assists));
        assert!(!agg.averages.contains_key(&Metric::Assists));
        assert!(!agg.counts.contains_key(&Metric::Assists));
    }

    #[test]
    fn test_zero_is_a_real_observation() {
        let records = vec![
            SeasonRecord::new("2021", "DEN").with_metric(Metric::Blocks, 0.0),
            SeasonRecord::new("2022", "DEN").with_metric(Metric::Blocks, 2.0),
        ];
        let agg = StatAggregator::new().aggregate(&records).unwrap();
        assert!((agg.averages[&Metric::Blocks] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let err = StatAggregator::new().aggregate(&[]).unwrap_err();
        assert_eq!(err, AggregationError::EmptySequence);
    }

    #[test]
    fn test_mixed_players_rejected() {
        let records = vec![
            SeasonRecord::new("2021", "DEN").with_player("246"),
            SeasonRecord::new("2022", "DEN"),
            SeasonRecord::new("2023", "DEN").with_player("115"),
        ];

        let err = StatAggregator::new().aggregate(&records).unwrap_err();
        assert_eq!(
            err,
            AggregationError::MixedPlayerIdentity {
                expected: "246".to_string(),
                found: "115".to_string(),
                season_id: "2023".to_string(),
                index: 2,
            }
        );
    }

    #[test]
    fn test_records_without_player_are_trusted() {
        let records = vec![
            SeasonRecord::new("2021", "DEN"),
            SeasonRecord::new("2022", "DEN").with_player("246"),
        ];
        let agg = StatAggregator::new().aggregate(&records).unwrap();
        assert_eq!(agg.player_id.as_deref(), Some("246"));
    }

    #[test]
    fn test_traded_season_counts_each_stint() {
        let records = vec![
            SeasonRecord::new("2022", "BKN").with_metric(Metric::Points, 27.1),
            SeasonRecord::new("2022", "PHX").with_metric(Metric::Points, 26.0),
        ];
        let agg = StatAggregator::new().aggregate(&records).unwrap();
        assert_eq!(agg.seasons_included, vec!["2022", "2022"]);
        assert_eq!(agg.counts[&Metric::Points], 2);
    }
}
