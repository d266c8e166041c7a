use super::quality;
use crate::occupations::domain::ExposureSource;
use crate::occupations::merge::{MergedOccupationRecord, SkillsSource};
use crate::occupations::scoring::ResilienceTier;
use crate::occupations::sources::LoadReport;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Run totals, built by tallying each record on its own and combining the tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub total: usize,
    pub sourced: usize,
    pub manual: usize,
    pub classified: usize,
    pub unclassified: usize,
    pub exposure_sources: BTreeMap<ExposureSource, usize>,
    pub tiers: BTreeMap<ResilienceTier, usize>,
    /// Classified records with at least one imputed dimension.
    pub imputed: usize,
    pub data_warnings: usize,
    pub curated_skills: usize,
    pub videos: usize,
    pub inside_looks: usize,
    pub missing_datasets: Vec<&'static str>,
    pub degraded_datasets: Vec<&'static str>,
    pub rejected_entries: usize,
}

impl PipelineSummary {
    pub fn tally(record: &MergedOccupationRecord) -> Self {
        let mut summary = Self {
            total: 1,
            data_warnings: quality::issues(record).len(),
            ..Self::default()
        };

        if record.is_manual() {
            summary.manual = 1;
        } else {
            summary.sourced = 1;
        }

        match &record.ai_resilience {
            Some(classification) => {
                summary.classified = 1;
                summary.tiers.insert(classification.result.tier, 1);
                if !classification.imputed.is_empty() {
                    summary.imputed = 1;
                }
            }
            None => summary.unclassified = 1,
        }

        if let Some(exposure) = &record.ai_exposure {
            summary.exposure_sources.insert(exposure.source, 1);
        }
        if record.skills_source == SkillsSource::Curated {
            summary.curated_skills = 1;
        }
        if record.video.found().is_some() {
            summary.videos = 1;
        }
        if record.inside_look.found().is_some() {
            summary.inside_looks = 1;
        }

        summary
    }

    pub fn combine(mut self, other: Self) -> Self {
        self.total += other.total;
        self.sourced += other.sourced;
        self.manual += other.manual;
        self.classified += other.classified;
        self.unclassified += other.unclassified;
        self.imputed += other.imputed;
        self.data_warnings += other.data_warnings;
        self.curated_skills += other.curated_skills;
        self.videos += other.videos;
        self.inside_looks += other.inside_looks;
        self.rejected_entries += other.rejected_entries;
        for (source, count) in other.exposure_sources {
            *self.exposure_sources.entry(source).or_default() += count;
        }
        for (tier, count) in other.tiers {
            *self.tiers.entry(tier).or_default() += count;
        }
        self.missing_datasets.extend(other.missing_datasets);
        self.degraded_datasets.extend(other.degraded_datasets);
        self
    }

    pub fn from_records(records: &[MergedOccupationRecord], parallel: bool) -> Self {
        if parallel {
            records
                .par_iter()
                .map(Self::tally)
                .reduce(Self::default, Self::combine)
        } else {
            records
                .iter()
                .map(Self::tally)
                .fold(Self::default(), Self::combine)
        }
    }

    pub fn with_load_report(self, report: &LoadReport) -> Self {
        Self {
            missing_datasets: report.missing(),
            degraded_datasets: report.degraded(),
            rejected_entries: report.rejected_entries(),
            ..self
        }
    }

    pub fn exposure_count(&self, source: ExposureSource) -> usize {
        self.exposure_sources.get(&source).copied().unwrap_or(0)
    }

    /// Exposure counts labelled in fallback order, zero counts included.
    pub fn exposure_breakdown(&self) -> Vec<(&'static str, usize)> {
        ExposureSource::ordered()
            .into_iter()
            .map(|source| (source.label(), self.exposure_count(source)))
            .collect()
    }

    pub fn tier_count(&self, tier: ResilienceTier) -> usize {
        self.tiers.get(&tier).copied().unwrap_or(0)
    }
}
