//! @ai:module:intent Map provider-specific season payloads onto canonical season records
//! @ai:module:layer domain
//! @ai:module:public_api SeasonNormalizer, SeasonNormalizerTrait
//! @ai:module:stateless true

use crate::config::NormalizationConfig;
use crate::error::{NormalizationError, RequiredField};
use crate::metrics::{Metric, SeasonRecord};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// @ai:intent Trait for season payload normalization
pub trait SeasonNormalizerTrait: Send + Sync {
    /// @ai:intent Normalize one raw payload with the given field mapping
    fn normalize(
        &self,
        raw: &Value,
        mapping: &NormalizationConfig,
    ) -> Result<SeasonRecord, NormalizationError>;
}

/// @ai:intent Converts raw key-value payloads into season records
pub struct SeasonNormalizer {
    clock_regex: Regex,
}

impl SeasonNormalizer {
    /// @ai:intent Create a new normalizer
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            clock_regex: Regex::new(r"^(\d+):([0-5]?\d)$").expect("clock pattern is valid"),
        }
    }

    /// @ai:intent Parse a value as a number, accepting numeric strings
    /// @ai:effects pure
    fn numeric(&self, value: &Value, metric: Metric) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => {
                let s = s.trim();
                if let Ok(v) = s.parse::<f64>() {
                    return Some(v);
                }
                if metric == Metric::Minutes {
                    return self.clock_minutes(s);
                }
                None
            }
            _ => None,
        }
    }

    /// @ai:intent Parse "MM:SS" into decimal minutes
    /// @ai:effects pure
    fn clock_minutes(&self, s: &str) -> Option<f64> {
        let caps = self.clock_regex.captures(s)?;
        let minutes: f64 = caps[1].parse().ok()?;
        let seconds: f64 = caps[2].parse().ok()?;
        Some(minutes + seconds / 60.0)
    }

    /// @ai:intent Read the first usable identity among candidate fields
    /// @ai:effects pure
    fn identity(payload: &Map<String, Value>, fields: &[String]) -> Option<String> {
        fields
            .iter()
            .filter_map(|field| lookup(payload, field))
            .find_map(identity_string)
    }

    /// @ai:intent Read a metric from the first alias holding a numeric value
    /// @ai:effects pure
    fn metric_value(
        &self,
        payload: &Map<String, Value>,
        metric: Metric,
        mapping: &NormalizationConfig,
    ) -> Option<f64> {
        let raw = mapping
            .fields_for(metric)
            .filter_map(|field| lookup(payload, field))
            .find_map(|value| self.numeric(value, metric))?;

        if metric.is_percentage() {
            Some(mapping.percent_scale.to_fraction(raw))
        } else {
            Some(raw)
        }
    }

    /// @ai:intent Log top-level fields that no alias refers to
    /// @ai:effects log
    fn trace_unrecognized(payload: &Map<String, Value>, mapping: &NormalizationConfig) {
        if !tracing::enabled!(tracing::Level::TRACE) {
            return;
        }

        let mut known: HashSet<&str> = HashSet::new();
        let identity_fields = mapping
            .season_fields
            .iter()
            .chain(&mapping.team_fields)
            .chain(&mapping.player_fields)
            .map(String::as_str);
        let metric_fields = Metric::ALL.iter().flat_map(|m| mapping.fields_for(*m));

        for field in identity_fields.chain(metric_fields) {
            known.insert(field.split('.').next().unwrap_or(field));
        }

        for key in payload.keys().filter(|k| !known.contains(k.as_str())) {
            tracing::trace!(field = %key, "dropping unrecognized field");
        }
    }
}

impl Default for SeasonNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonNormalizerTrait for SeasonNormalizer {
    /// @ai:intent Map aliases to canonical metrics, leaving unusable values absent
    /// @ai:post Err only when season_id or team_id cannot be determined
    /// @ai:effects pure
    fn normalize(
        &self,
        raw: &Value,
        mapping: &NormalizationConfig,
    ) -> Result<SeasonRecord, NormalizationError> {
        let empty = Map::new();
        let payload = raw.as_object().unwrap_or(&empty);

        let season_id = Self::identity(payload, &mapping.season_fields).ok_or(
            NormalizationError::MissingRequiredField {
                field: RequiredField::SeasonId,
                season_id: None,
                game_index: None,
            },
        )?;

        let team_id = Self::identity(payload, &mapping.team_fields).ok_or_else(|| {
            NormalizationError::MissingRequiredField {
                field: RequiredField::TeamId,
                season_id: Some(season_id.clone()),
                game_index: None,
            }
        })?;

        let mut record = SeasonRecord::new(season_id, team_id);
        if let Some(player_id) = Self::identity(payload, &mapping.player_fields) {
            record = record.with_player(player_id);
        }

        for metric in Metric::ALL {
            match self.metric_value(payload, metric, mapping) {
                Some(value) => record = record.with_metric(metric, value),
                None => tracing::debug!(season = record.season_id(), %metric, "metric absent"),
            }
        }

        Self::trace_unrecognized(payload, mapping);

        Ok(record)
    }
}

/// @ai:intent Resolve a field name, falling back to a dotted path into nested objects
/// @ai:effects pure
pub(crate) fn lookup<'a>(payload: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    if let Some(value) = payload.get(field) {
        return Some(value);
    }

    let mut parts = field.split('.');
    let mut current = payload.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// @ai:intent Render an identity value as an opaque string
/// @ai:effects pure
fn identity_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(
            n.as_i64()
                .map(|i| i.to_string())
                .or_else(|| n.as_u64().map(|u| u.to_string()))
                .unwrap_or_else(|| n.to_string()),
        ),
        _ => None,
    }
}
