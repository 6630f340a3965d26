//! @ai:module:intent Season statistics normalization, career aggregation and season comparison
//! @ai:module:layer application
//! @ai:module:public_api config, cache, error, metrics, normalize, report, source
//!
//! # hoopstat
//!
//! Turns raw per-season player payloads from a stats provider into canonical
//! season records, then derives career aggregates and season-over-season
//! deltas. A metric a provider did not report stays absent all the way
//! through; it is never treated as zero.
//!
//! ## Example
//!
//! ```rust
//! use hoopstat::metrics::{Metric, SeasonComparator, SeasonComparatorTrait};
//! use hoopstat::normalize::{SeasonNormalizer, SeasonNormalizerTrait};
//! use hoopstat::NormalizationConfig;
//! use serde_json::json;
//!
//! let mapping = NormalizationConfig::default();
//! let normalizer = SeasonNormalizer::new();
//!
//! let base = normalizer
//!     .normalize(&json!({"season": 2022, "team": "MIL", "pts": 20, "reb": 5}), &mapping)
//!     .unwrap();
//! let next = normalizer
//!     .normalize(&json!({"season": 2023, "team": "MIL", "pts": 25, "reb": 5, "ast": 3}), &mapping)
//!     .unwrap();
//!
//! let result = SeasonComparator::new().compare(&base, &[next]).unwrap();
//! assert_eq!(result.delta("2023", Metric::Points).unwrap().absolute_delta, 5.0);
//! assert!(result.delta("2023", Metric::Assists).is_none());
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod report;
pub mod source;

pub use cache::SeasonCache;
pub use config::{HoopstatConfig, NormalizationConfig, PercentScale};
pub use error::{AggregationError, ComparisonError, Error, NormalizationError, Result};
pub use metrics::{
    CareerAggregate, ComparisonResult, Metric, SeasonComparator, SeasonRecord, StatAggregator,
};
pub use normalize::{GameLogRollup, SeasonNormalizer};
pub use report::{FormattedReport, ReportGenerator, ResultFormatter, Summary};
pub use source::PayloadLoader;
