//! One batch run: load everything, assess and merge per occupation, write everything.

use super::domain::OccupationSource;
use super::merge::{occupation_sources, MergeEngine, MergeError, MergedOccupationRecord};
use super::report::{project, quality, write_json, IndexRecord, PipelineSummary, Projection};
use super::scoring::{assess, Assessment, AssessmentCache, ResilienceInputs};
use super::sources::{Datasets, SourceLoader};
use crate::config::DataConfig;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

pub const FULL_ARTIFACT: &str = "careers.json";
pub const INDEX_ARTIFACT: &str = "careers-index.json";

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Ignore the assessment cache and stamp every classification with `now`.
    pub refresh: bool,
    pub now: DateTime<Utc>,
}

impl PipelineOptions {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            refresh: false,
            now,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub records: Vec<MergedOccupationRecord>,
    pub index: Vec<IndexRecord>,
    pub summary: PipelineSummary,
    pub artifacts: Vec<PathBuf>,
}

/// Runs the whole batch against the filesystem.
pub fn run(config: &DataConfig, options: &PipelineOptions) -> Result<PipelineOutcome, AppError> {
    let datasets = SourceLoader::new(&config.data_dir).load()?;

    let cache_path = config.cache_path();
    let cache = if options.refresh {
        info!("refresh requested; ignoring assessment cache");
        AssessmentCache::default()
    } else {
        AssessmentCache::load(&cache_path)
    };

    let (mut outcome, next_cache) = build(datasets, &cache, config, options.now)?;

    let full_path = config.output_dir.join(FULL_ARTIFACT);
    let index_path = config.output_dir.join(INDEX_ARTIFACT);
    write_json(&full_path, &outcome.records)?;
    write_json(&index_path, &outcome.index)?;
    outcome.artifacts = vec![full_path, index_path];

    if let Err(err) = next_cache.save(&cache_path) {
        warn!(error = %err, "assessment cache not saved");
    }

    let summary = &outcome.summary;
    info!(
        total = summary.total,
        sourced = summary.sourced,
        manual = summary.manual,
        classified = summary.classified,
        unclassified = summary.unclassified,
        imputed = summary.imputed,
        data_warnings = summary.data_warnings,
        exposure_sources = ?summary.exposure_breakdown(),
        tiers = ?summary.tiers,
        missing = ?summary.missing_datasets,
        degraded = ?summary.degraded_datasets,
        "career data pipeline complete"
    );

    Ok(outcome)
}

/// Everything between loading and writing. Pure apart from logging.
///
/// Returns the outcome and the cache to persist for the next run.
pub fn build(
    datasets: Datasets,
    cache: &AssessmentCache,
    config: &DataConfig,
    now: DateTime<Utc>,
) -> Result<(PipelineOutcome, AssessmentCache), MergeError> {
    let Datasets {
        base,
        manual,
        signals,
        overlays,
        report,
    } = datasets;

    let sources = occupation_sources(base, manual)?;

    let assess_one = |source: &OccupationSource| {
        let inputs = ResilienceInputs::gather(source, &signals, &overlays.legacy_risk);
        (source.key().to_string(), assess(&inputs))
    };
    let assessed: Vec<(String, Assessment)> = if config.parallel {
        sources.par_iter().map(assess_one).collect()
    } else {
        sources.iter().map(assess_one).collect()
    };

    let mut next_cache = AssessmentCache::default();
    let assessments: HashMap<String, Assessment> = assessed
        .into_iter()
        .map(|(key, assessment)| {
            let fingerprint = assessment.fingerprint();
            let assessed_at = cache.timestamp_for(&key, &fingerprint, now);
            if assessment.resilience.is_some() {
                next_cache.record(key.clone(), fingerprint, assessed_at);
            }
            (key, assessment.stamped(assessed_at))
        })
        .collect();

    let records = MergeEngine::new(&overlays, &assessments)
        .parallel(config.parallel)
        .merge_sources(sources);

    for record in &records {
        for issue in quality::issues(record) {
            warn!(occupation = record.key(), %issue, "data quality warning");
        }
    }

    let summary =
        PipelineSummary::from_records(&records, config.parallel).with_load_report(&report);
    let Projection { full, index } = project(records, config.description_budget);

    Ok((
        PipelineOutcome {
            records: full,
            index,
            summary,
            artifacts: Vec::new(),
        },
        next_cache,
    ))
}
