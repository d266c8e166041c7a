pub mod categories;
pub mod domain;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod sources;

#[cfg(test)]
mod tests;

pub use domain::{
    BaseOccupation, EpochScores, ExposureRecord, ExposureSource, GrowthRecord, HumanAdvantage,
    ManualOccupation, OccupationCode, OccupationSource, RiskProfile,
};
pub use merge::{MergeEngine, MergeError, MergedOccupationRecord};
pub use pipeline::{PipelineOptions, PipelineOutcome};
pub use report::{IndexRecord, PipelineSummary, TrainingTime};
pub use scoring::{ResilienceClassification, ResilienceTier};
pub use sources::{Datasets, LoadError, SourceLoader};
