//! @ai:module:intent Normalization of raw provider payloads into season records
//! @ai:module:layer domain
//! @ai:module:public_api SeasonNormalizer, GameLogRollup

pub mod game_log;
pub mod normalizer;

pub use game_log::{GameLogRollup, GameLogRollupTrait};
pub use normalizer::{SeasonNormalizer, SeasonNormalizerTrait};
