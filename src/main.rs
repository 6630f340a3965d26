//! @ai:module:intent CLI for season aggregation and comparison
//! @ai:module:layer presentation

use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hoopstat::{
    config::HoopstatConfig,
    metrics::{
        sort_history, SeasonComparator, SeasonComparatorTrait, SeasonRecord, StatAggregator,
        StatAggregatorTrait,
    },
    normalize::{GameLogRollup, GameLogRollupTrait, SeasonNormalizer, SeasonNormalizerTrait},
    report::{text, OutputFormat, ReportGenerator, ResultFormatter, Summary},
    source::{PayloadLoader, PayloadLoaderTrait},
    SeasonCache,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hoopstat")]
#[command(about = "Career aggregates and season comparisons from player statistics payloads")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Career totals and averages
    Aggregate {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Compare seasons against a baseline season
    Compare {
        #[command(flatten)]
        input: InputArgs,

        /// Baseline season id
        #[arg(short, long)]
        baseline: String,

        /// Seasons to compare (comma-separated); defaults to every other season
        #[arg(short, long)]
        seasons: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Season-over-season growth
    Progression {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Write JSON and Markdown reports to a directory
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Baseline season id; writes a comparison report instead of a career summary
        #[arg(short, long)]
        baseline: Option<String>,

        /// Output directory for reports
        #[arg(short, long, default_value = "reports")]
        output: PathBuf,
    },

    /// Inspect or invalidate the payload cache
    Cache {
        /// Cache file (defaults to the configured path)
        #[arg(long)]
        file: Option<PathBuf>,

        #[command(subcommand)]
        action: CacheAction,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "hoopstat.toml")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Payload file or directory; omit to read the player's cached payloads
    path: Option<PathBuf>,

    /// Only use records of this player
    #[arg(short, long)]
    player: Option<String>,

    /// Treat payloads as per-game logs and roll them up into seasons
    #[arg(long)]
    games: bool,

    /// Record loaded season payloads in this cache file
    #[arg(long)]
    cache: Option<PathBuf>,
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached (player, season) keys
    List,

    /// Drop one season, or every season of a player
    Invalidate {
        #[arg(short, long)]
        player: String,

        #[arg(short, long)]
        season: Option<String>,
    },

    /// Drop entries older than the given age
    Prune {
        /// Maximum age in hours (defaults to the configured value)
        #[arg(long)]
        max_age_hours: Option<i64>,
    },

    /// Remove every entry
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hoopstat=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = load_or_default_config(cli.config)?;

    match cli.command {
        Commands::Aggregate { input, format } => aggregate(&config, input, format.into()),
        Commands::Compare {
            input,
            baseline,
            seasons,
            format,
        } => compare(&config, input, &baseline, seasons, format.into()),
        Commands::Progression { input, format } => progression(&config, input, format.into()),
        Commands::Report {
            input,
            baseline,
            output,
        } => report(&config, input, baseline, &output),
        Commands::Cache { file, action } => cache(&config, file, action),
        Commands::Init { output } => init_config(output),
    }
}

/// @ai:intent Print career aggregate, with a trend line per metric in text mode
/// @ai:effects fs:read, stdout
fn aggregate(config: &HoopstatConfig, input: InputArgs, format: OutputFormat) -> Result<()> {
    let records = load_records(config, &input)?;
    let aggregate = StatAggregator::new().aggregate(&records)?;
    let report = ResultFormatter::new().format(Summary::Aggregate(&aggregate));

    print!("{}", text::render(&report, format, config.report.decimals)?);
    if format == OutputFormat::Text && config.report.show_trend {
        print!("{}", text::render_trend(&records, config.report.decimals));
    }
    Ok(())
}

/// @ai:intent Print deltas of selected seasons against the baseline season
/// @ai:effects fs:read, stdout
fn compare(
    config: &HoopstatConfig,
    input: InputArgs,
    baseline: &str,
    seasons: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let records = load_records(config, &input)?;
    let (base, others) = split_baseline(records, baseline, seasons)?;

    let comparison = SeasonComparator::new().compare(&base, &others)?;
    let report = ResultFormatter::new().format(Summary::Comparison(&comparison));

    print!("{}", text::render(&report, format, config.report.decimals)?);
    Ok(())
}

/// @ai:intent Print growth between consecutive seasons
/// @ai:effects fs:read, stdout
fn progression(config: &HoopstatConfig, input: InputArgs, format: OutputFormat) -> Result<()> {
    let records = load_records(config, &input)?;
    let steps = SeasonComparator::new().compare_consecutive(&records)?;
    let report = ResultFormatter::new().format(Summary::Progression(&steps));

    print!("{}", text::render(&report, format, config.report.decimals)?);
    Ok(())
}

/// @ai:intent Write report files for an aggregate or a comparison
/// @ai:effects fs:read, fs:write
fn report(
    config: &HoopstatConfig,
    input: InputArgs,
    baseline: Option<String>,
    output: &Path,
) -> Result<()> {
    let records = load_records(config, &input)?;
    let formatter = ResultFormatter::new();

    let formatted = match baseline {
        Some(baseline) => {
            let (base, others) = split_baseline(records, &baseline, None)?;
            let comparison = SeasonComparator::new().compare(&base, &others)?;
            formatter.format(Summary::Comparison(&comparison))
        }
        None => {
            let aggregate = StatAggregator::new().aggregate(&records)?;
            formatter.format(Summary::Aggregate(&aggregate))
        }
    };

    ReportGenerator::new(config.report.decimals).generate_all(&formatted, output)?;
    println!("Reports written to {}", output.display());
    Ok(())
}

/// @ai:intent Manage the payload cache file
/// @ai:effects fs:read, fs:write, stdout
fn cache(config: &HoopstatConfig, file: Option<PathBuf>, action: CacheAction) -> Result<()> {
    let path = file.unwrap_or_else(|| config.cache.path.clone());
    let mut cache = SeasonCache::load(&path)
        .with_context(|| format!("Failed to load cache {}", path.display()))?;

    match action {
        CacheAction::List => {
            for key in cache.keys() {
                let fetched_at = cache
                    .get(&key.player_id, &key.season_id)
                    .map(|e| e.fetched_at.to_rfc3339())
                    .unwrap_or_default();
                println!("{:<12} {:<10} {}", key.player_id, key.season_id, fetched_at);
            }
            println!("{} entries", cache.len());
            return Ok(());
        }
        CacheAction::Invalidate { player, season } => {
            let removed = match season {
                Some(season) => usize::from(cache.invalidate(&player, &season)),
                None => cache.invalidate_player(&player),
            };
            println!("Removed {} entries", removed);
        }
        CacheAction::Prune { max_age_hours } => {
            let hours = max_age_hours.unwrap_or(config.cache.max_age_hours);
            let removed = cache.invalidate_older_than(Duration::hours(hours), Utc::now());
            println!("Removed {} entries older than {}h", removed, hours);
        }
        CacheAction::Clear => {
            println!("Removed {} entries", cache.len());
            cache.clear();
        }
    }

    cache.save(&path)?;
    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = HoopstatConfig::default();
    config.save(&output)?;
    println!("Configuration written to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<HoopstatConfig> {
    match path {
        Some(p) => load_config_at(&p),
        None => {
            let default_path = PathBuf::from("hoopstat.toml");
            if default_path.exists() {
                load_config_at(&default_path)
            } else {
                Ok(HoopstatConfig::default())
            }
        }
    }
}

/// @ai:intent Load a config file, naming the file in any error
/// @ai:effects fs:read
fn load_config_at(path: &Path) -> Result<HoopstatConfig> {
    HoopstatConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))
}

/// @ai:intent Load payloads from disk or cache and normalize them into a sorted history
/// @ai:effects fs:read, fs:write
fn load_records(config: &HoopstatConfig, input: &InputArgs) -> Result<Vec<SeasonRecord>> {
    let payloads = match &input.path {
        Some(path) => PayloadLoader::new()
            .load(path)
            .with_context(|| format!("Failed to load payloads from {}", path.display()))?,
        None => cached_payloads(config, input)?,
    };

    tracing::info!("Loaded {} payloads", payloads.len());

    let mapping = &config.normalization;
    let mut records = if input.games {
        GameLogRollup::new().rollup_games(&payloads, mapping)?
    } else {
        let normalizer = SeasonNormalizer::new();
        payloads
            .iter()
            .enumerate()
            .map(|(i, p)| {
                normalizer
                    .normalize(p, mapping)
                    .with_context(|| format!("Payload {} could not be normalized", i))
            })
            .collect::<Result<Vec<_>>>()?
    };

    if let (Some(cache_path), Some(_), false) = (&input.cache, &input.path, input.games) {
        record_in_cache(cache_path, &payloads, &records)?;
    }

    if let Some(player) = &input.player {
        records.retain(|r| r.player_id() == Some(player.as_str()));
    }

    if records.is_empty() {
        bail!("No season records to work with");
    }

    sort_history(&mut records);
    Ok(records)
}

/// @ai:intent Read a player's payloads from the cache, skipping stale entries
/// @ai:effects fs:read
fn cached_payloads(config: &HoopstatConfig, input: &InputArgs) -> Result<Vec<Value>> {
    let Some(player) = &input.player else {
        bail!("Either a payload path or --player is required");
    };

    let path = input.cache.clone().unwrap_or_else(|| config.cache.path.clone());
    let mut cache = SeasonCache::load(&path)
        .with_context(|| format!("Failed to load cache {}", path.display()))?;

    let stale = cache.invalidate_older_than(Duration::hours(config.cache.max_age_hours), Utc::now());
    if stale > 0 {
        tracing::warn!("Ignoring {} stale cache entries", stale);
    }

    Ok(cache
        .entries_for_player(player)
        .map(|(_, entry)| entry.payload.clone())
        .collect())
}

/// @ai:intent Store season payloads under their (player, season) key
/// @ai:effects fs:read, fs:write
fn record_in_cache(path: &Path, payloads: &[Value], records: &[SeasonRecord]) -> Result<()> {
    let mut cache = SeasonCache::load(path)
        .with_context(|| format!("Failed to load cache {}", path.display()))?;
    let now = Utc::now();

    for (payload, record) in payloads.iter().zip(records) {
        match record.player_id() {
            Some(player) => {
                cache.insert(player, record.season_id(), payload.clone(), now);
            }
            None => tracing::debug!(
                season = record.season_id(),
                "payload without player id not cached"
            ),
        }
    }

    cache.save(path)?;
    tracing::info!("Cache at {} holds {} entries", path.display(), cache.len());
    Ok(())
}

/// @ai:intent Pick the baseline record and the records compared against it
/// @ai:effects pure
fn split_baseline(
    records: Vec<SeasonRecord>,
    baseline: &str,
    seasons: Option<String>,
) -> Result<(SeasonRecord, Vec<SeasonRecord>)> {
    let wanted: Option<Vec<String>> =
        seasons.map(|s| s.split(',').map(|x| x.trim().to_string()).collect());

    let mut base = None;
    let mut others = Vec::new();

    for record in records {
        if base.is_none() && record.season_id() == baseline {
            base = Some(record);
            continue;
        }

        let selected = wanted
            .as_ref()
            .map(|w| w.iter().any(|s| s == record.season_id()))
            .unwrap_or(true);
        if selected {
            others.push(record);
        }
    }

    let Some(base) = base else {
        bail!("Baseline season {} not found", baseline);
    };
    Ok((base, others))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_malformed_config_error_names_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hoopstat.toml");
        std::fs::write(&path, "[report\ndecimals = ").unwrap();

        let err = load_config_at(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load config"));
        assert!(err.to_string().contains("hoopstat.toml"));
    }

    #[test]
    fn test_split_baseline_selects_listed_seasons() {
        let records = vec![
            SeasonRecord::new("2021", "MIL"),
            SeasonRecord::new("2022", "MIL"),
            SeasonRecord::new("2023", "MIL"),
        ];

        let (base, others) =
            split_baseline(records, "2021", Some("2023".to_string())).unwrap();
        assert_eq!(base.season_id(), "2021");
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].season_id(), "2023");
    }
}
