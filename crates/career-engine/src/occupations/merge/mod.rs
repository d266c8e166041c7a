//! Record Merge Engine: seeds one record per occupation and runs the overlay chain over it.

mod record;
mod steps;

pub use record::{MergedOccupationRecord, OverlayLookup, RecordOrigin, SkillsSource};
pub use steps::{
    apply_legacy_risk, attach_inside_look, attach_video, layer_legacy_risk, override_category,
    replace_skills, MergeStep,
};

use crate::occupations::domain::{BaseOccupation, ManualOccupation, OccupationSource};
use crate::occupations::scoring::Assessment;
use crate::occupations::sources::{sort_key, Overlays};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("base dataset contains no occupations")]
    NoBaseRecords,
}

/// Tags base and manual occupations. A run without base occupations is refused.
pub fn occupation_sources(
    base: Vec<BaseOccupation>,
    manual: Vec<ManualOccupation>,
) -> Result<Vec<OccupationSource>, MergeError> {
    if base.is_empty() {
        return Err(MergeError::NoBaseRecords);
    }

    Ok(base
        .into_iter()
        .map(OccupationSource::Sourced)
        .chain(manual.into_iter().map(OccupationSource::Manual))
        .collect())
}

/// Read-only inputs shared by every per-occupation merge.
pub struct MergeEngine<'a> {
    overlays: &'a Overlays,
    assessments: &'a HashMap<String, Assessment>,
    parallel: bool,
}

impl<'a> MergeEngine<'a> {
    pub fn new(overlays: &'a Overlays, assessments: &'a HashMap<String, Assessment>) -> Self {
        Self {
            overlays,
            assessments,
            parallel: false,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn merge(
        &self,
        base: Vec<BaseOccupation>,
        manual: Vec<ManualOccupation>,
    ) -> Result<Vec<MergedOccupationRecord>, MergeError> {
        let sources = occupation_sources(base, manual)?;
        Ok(self.merge_sources(sources))
    }

    /// Merges every source and returns records sorted by display title.
    pub fn merge_sources(&self, sources: Vec<OccupationSource>) -> Vec<MergedOccupationRecord> {
        let mut records: Vec<MergedOccupationRecord> = if self.parallel {
            sources
                .into_par_iter()
                .map(|source| self.merge_one(source))
                .collect()
        } else {
            sources
                .into_iter()
                .map(|source| self.merge_one(source))
                .collect()
        };

        records.sort_by_cached_key(|record| (sort_key(&record.title), record.key().to_string()));
        debug!(records = records.len(), "merge complete");
        records
    }

    pub fn merge_one(&self, source: OccupationSource) -> MergedOccupationRecord {
        let assessment = self
            .assessments
            .get(source.key())
            .cloned()
            .unwrap_or_default();
        let seed = MergedOccupationRecord::seed(source, assessment);

        MergeStep::ordered()
            .into_iter()
            .fold(seed, |record, step| {
                if step.applies_to(&record.origin) {
                    step.apply(record, self.overlays)
                } else {
                    record
                }
            })
            .with_completeness()
    }
}
