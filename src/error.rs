//! @ai:module:intent Define error types for normalization, aggregation, comparison and I/O
//! @ai:module:layer domain
//! @ai:module:public_api NormalizationError, AggregationError, ComparisonError, RequiredField, Error, Result
//! @ai:module:stateless true

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Identity fields a season payload cannot do without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    SeasonId,
    TeamId,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredField::SeasonId => f.write_str("season_id"),
            RequiredField::TeamId => f.write_str("team_id"),
        }
    }
}

/// @ai:intent Failure to turn a raw provider payload into a season record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizationError {
    /// `season_id` is filled in when the season could be read but the team could not.
    /// `game_index` is set when the payload came from a game log.
    #[error(
        "missing required field {field} (season: {}, game: {})",
        .season_id.as_deref().unwrap_or("unknown"),
        .game_index.map(|i| i.to_string()).unwrap_or_else(|| "-".to_string())
    )]
    MissingRequiredField {
        field: RequiredField,
        season_id: Option<String>,
        game_index: Option<usize>,
    },
}

impl NormalizationError {
    /// @ai:intent Attach the position of the offending game within a game log
    /// @ai:effects pure
    pub fn at_game(self, index: usize) -> Self {
        match self {
            NormalizationError::MissingRequiredField {
                field, season_id, ..
            } => NormalizationError::MissingRequiredField {
                field,
                season_id,
                game_index: Some(index),
            },
        }
    }
}

/// @ai:intent Failure to aggregate a sequence of season records
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    #[error("cannot aggregate an empty sequence of season records")]
    EmptySequence,

    #[error(
        "record {index} (season {season_id}) belongs to player {found}, expected {expected}"
    )]
    MixedPlayerIdentity {
        expected: String,
        found: String,
        season_id: String,
        index: usize,
    },
}

/// @ai:intent Failure to compare season records
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    #[error("nothing to compare against baseline season {baseline_season_id}")]
    EmptyComparisonSet { baseline_season_id: String },
}

/// @ai:intent Unified error type for the I/O-facing parts of the crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid payload in {path} at entry {index}: expected a JSON object")]
    InvalidPayload { path: PathBuf, index: usize },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error(transparent)]
    Comparison(#[from] ComparisonError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_season() {
        let err = NormalizationError::MissingRequiredField {
            field: RequiredField::TeamId,
            season_id: Some("2023".to_string()),
            game_index: None,
        };
        assert_eq!(
            err.to_string(),
            "missing required field team_id (season: 2023, game: -)"
        );
    }

    #[test]
    fn test_at_game_sets_index() {
        let err = NormalizationError::MissingRequiredField {
            field: RequiredField::SeasonId,
            season_id: None,
            game_index: None,
        }
        .at_game(4);
        assert!(err.to_string().contains("game: 4"));
        assert!(err.to_string().contains("season: unknown"));
    }

    #[test]
    fn test_mixed_identity_message() {
        let err = AggregationError::MixedPlayerIdentity {
            expected: "237".to_string(),
            found: "115".to_string(),
            season_id: "2019".to_string(),
            index: 2,
        };
        assert_eq!(
            err.to_string(),
            "record 2 (season 2019) belongs to player 115, expected 237"
        );
    }
}
