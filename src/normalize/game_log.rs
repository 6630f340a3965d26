//! @ai:module:intent Roll per-game box scores up into per-season records
//! @ai:module:layer domain
//! @ai:module:public_api GameLogRollup, GameLogRollupTrait
//! @ai:module:stateless true

use crate::config::NormalizationConfig;
use crate::error::NormalizationError;
use crate::metrics::{Metric, SeasonRecord};
use crate::normalize::normalizer::{SeasonNormalizer, SeasonNormalizerTrait};
use serde_json::Value;
use std::collections::BTreeMap;

/// @ai:intent Trait for game log rollup
pub trait GameLogRollupTrait: Send + Sync {
    /// @ai:intent Average per-game payloads into one record per season stint
    fn rollup_games(
        &self,
        games: &[Value],
        mapping: &NormalizationConfig,
    ) -> Result<Vec<SeasonRecord>, NormalizationError>;
}

/// @ai:intent Builds season averages from game logs
pub struct GameLogRollup {
    normalizer: SeasonNormalizer,
}

/// Running sums for one (player, season, team) group.
struct StintAccumulator {
    player_id: Option<String>,
    season_id: String,
    team_id: String,
    games: usize,
    sums: BTreeMap<Metric, (f64, usize)>,
}

impl StintAccumulator {
    fn from_game(game: &SeasonRecord) -> Self {
        Self {
            player_id: game.player_id().map(str::to_string),
            season_id: game.season_id().to_string(),
            team_id: game.team_id().to_string(),
            games: 0,
            sums: BTreeMap::new(),
        }
    }

    fn matches(&self, game: &SeasonRecord) -> bool {
        self.player_id.as_deref() == game.player_id()
            && self.season_id == game.season_id()
            && self.team_id == game.team_id()
    }

    fn add(&mut self, game: &SeasonRecord) {
        self.games += 1;
        for (metric, value) in game.metrics() {
            if metric == Metric::GamesPlayed {
                continue;
            }
            let entry = self.sums.entry(metric).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    fn finish(self) -> SeasonRecord {
        let mut record = SeasonRecord::new(self.season_id, self.team_id);
        if let Some(player_id) = self.player_id {
            record = record.with_player(player_id);
        }

        for (metric, (sum, count)) in self.sums {
            record = record.with_metric(metric, sum / count as f64);
        }
        record.with_metric(Metric::GamesPlayed, self.games as f64)
    }
}

impl GameLogRollup {
    /// @ai:intent Create a new rollup
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            normalizer: SeasonNormalizer::new(),
        }
    }
}

impl Default for GameLogRollup {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogRollupTrait for GameLogRollup {
    /// @ai:intent Group games by stint in first-appearance order and average present values
    /// @ai:post games_played equals the number of games in each stint
    /// @ai:effects pure
    fn rollup_games(
        &self,
        games: &[Value],
        mapping: &NormalizationConfig,
    ) -> Result<Vec<SeasonRecord>, NormalizationError> {
        let mut stints: Vec<StintAccumulator> = Vec::new();

        for (index, raw) in games.iter().enumerate() {
            let game = self
                .normalizer
                .normalize(raw, mapping)
                .map_err(|e| e.at_game(index))?;

            match stints.iter().position(|s| s.matches(&game)) {
                Some(i) => stints[i].add(&game),
                None => {
                    let mut stint = StintAccumulator::from_game(&game);
                    stint.add(&game);
                    stints.push(stint);
                }
            }
        }

        tracing::debug!(games = games.len(), stints = stints.len(), "rolled up game log");

        Ok(stints.into_iter().map(StintAccumulator::finish).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequiredField;
    use serde_json::json;

    fn rollup(games: Vec<Value>) -> Result<Vec<SeasonRecord>, NormalizationError> {
        GameLogRollup::new().rollup_games(&games, &NormalizationConfig::default())
    }

    #[test]
    fn test_average_over_present_games() {
        let records = rollup(vec![
            json!({"season": 2023, "team": {"id": 2}, "pts": 10, "min": "30:00"}),
            json!({"season": 2023, "team": {"id": 2}, "pts": 20, "min": "36:00"}),
            json!({"season": 2023, "team": {"id": 2}, "min": "33:00"}),
        ])
        .unwrap();

        assert_eq!(records.len(), 1);
        let season = &records[0];
        assert_eq!(season.metric(Metric::Points), Some(15.0));
        assert_eq!(season.metric(Metric::Minutes), Some(33.0));
        assert_eq!(season.metric(Metric::GamesPlayed), Some(3.0));
        assert_eq!(season.metric(Metric::Assists), None);
    }

    #[test]
    fn test_trade_splits_into_stints() {
        let records = rollup(vec![
            json!({"season": 2022, "team": "BKN", "pts": 30}),
            json!({"season": 2022, "team": "PHX", "pts": 20}),
            json!({"season": 2022, "team": "BKN", "pts": 26}),
        ])
        .unwrap();

        let stints: Vec<_> = records
            .iter()
            .map(|r| (r.team_id(), r.metric(Metric::Points), r.metric(Metric::GamesPlayed)))
            .collect();
        assert_eq!(
            stints,
            vec![("BKN", Some(28.0), Some(2.0)), ("PHX", Some(20.0), Some(1.0))]
        );
    }

    #[test]
    fn test_bad_game_reports_index() {
        let err = rollup(vec![
            json!({"season": 2022, "team": "BKN", "pts": 30}),
            json!({"team": "BKN", "pts": 30}),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            NormalizationError::MissingRequiredField {
                field: RequiredField::SeasonId,
                season_id: None,
                game_index: Some(1),
            }
        );
    }

    #[test]
    fn test_provider_game_rows_with_nested_identity() {
        let records = rollup(vec![
            json!({"id": 1, "game": {"id": 10, "season": 2023}, "team": {"id": 2},
                   "player": {"id": 237}, "pts": 10, "min": "30:00"}),
            json!({"id": 2, "game": {"id": 11, "season": 2023}, "team": {"id": 2},
                   "player": {"id": 237}, "pts": 30, "min": "36:00"}),
        ])
        .unwrap();

        assert_eq!(records.len(), 1);
        let season = &records[0];
        assert_eq!(season.season_id(), "2023");
        assert_eq!(season.team_id(), "2");
        assert_eq!(season.player_id(), Some("237"));
        assert_eq!(season.metric(Metric::Points), Some(20.0));
        assert_eq!(season.metric(Metric::Minutes), Some(33.0));
        assert_eq!(season.metric(Metric::GamesPlayed), Some(2.0));
    }

    #[test]
    fn test_empty_log() {
        assert!(rollup(vec![]).unwrap().is_empty());
    }
}
