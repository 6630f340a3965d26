//! @ai:module:intent Season records, career aggregation and season comparison
//! @ai:module:layer application
//! @ai:module:public_api Metric, SeasonRecord, CareerAggregate, ComparisonResult, StatAggregator, SeasonComparator

pub mod aggregator;
pub mod comparator;
pub mod types;

pub use aggregator::{StatAggregator, StatAggregatorTrait};
pub use comparator::{SeasonComparator, SeasonComparatorTrait};
pub use types::{
    sort_history, CareerAggregate, ComparisonResult, Metric, MetricDelta, PercentDelta,
    SeasonDeltas, SeasonRecord,
};
