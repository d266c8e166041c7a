//! AI Resilience v2.0: three dimension scores summed into one of four tiers.

mod cache;
mod exposure;
mod policy;
mod rules;

pub use cache::{AssessmentCache, AssessmentFingerprint};
pub use exposure::{
    editorial_estimate, resolve as resolve_exposure, LEGACY_RISK_SCALE, SECONDARY_SCALE,
};
pub use policy::{classify, ClassificationResult, ResilienceTier, MAX_SCORE};
pub use rules::{
    score_exposure, score_growth, score_human_advantage, AdvantageLevel, DimensionLevel,
    DimensionScore, ExposureLevel, GrowthTrend,
};

use super::domain::{
    EpochScores, ExposureRecord, GrowthRecord, HumanAdvantage, OccupationCode, OccupationSource,
};
use super::merge::layer_legacy_risk;
use super::sources::{Dataset, LegacyRisk, SignalDatasets};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

pub const MODEL_VERSION: &str = "2.0";

/// Raw classification inputs for one occupation, before resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResilienceInputs {
    pub primary_exposure: Option<f64>,
    pub secondary_exposure: Option<f64>,
    /// Already on the [0, 1] scale.
    pub editorial_estimate: Option<f64>,
    pub growth: Option<GrowthRecord>,
    pub human_advantage: Option<HumanAdvantage>,
}

impl ResilienceInputs {
    /// Collects inputs from the signal datasets.
    ///
    /// Sourced occupations look up their full code and then the SOC part. Manual occupations
    /// prefer their inline signals and otherwise look up their optional SOC code.
    pub fn gather(
        source: &OccupationSource,
        signals: &SignalDatasets,
        legacy_risk: &Dataset<LegacyRisk>,
    ) -> Self {
        let legacy_estimate =
            layer_legacy_risk(source.ai_risk().cloned(), legacy_risk.get(source.key()))
                .map(|risk| editorial_estimate(risk.score()));

        match source {
            OccupationSource::Sourced(base) => {
                let code = &base.code;
                Self {
                    primary_exposure: by_code(&signals.primary_exposure, code)
                        .map(|entry| entry.score),
                    secondary_exposure: by_code(&signals.secondary_exposure, code)
                        .map(|entry| entry.score),
                    editorial_estimate: legacy_estimate,
                    growth: by_code(&signals.projections, code).cloned(),
                    human_advantage: by_code(&signals.epoch, code)
                        .and_then(|scores| validated(source.key(), *scores)),
                }
            }
            OccupationSource::Manual(manual) => {
                let soc = manual.soc_code.as_deref().filter(|key| !key.is_empty());
                Self {
                    primary_exposure: soc
                        .and_then(|key| signals.primary_exposure.get(key))
                        .map(|entry| entry.score),
                    secondary_exposure: soc
                        .and_then(|key| signals.secondary_exposure.get(key))
                        .map(|entry| entry.score),
                    editorial_estimate: manual.signals.ai_exposure.or(legacy_estimate),
                    growth: manual
                        .signals
                        .growth_percent
                        .map(GrowthRecord::from_percent)
                        .or_else(|| soc.and_then(|key| signals.projections.get(key)).cloned()),
                    human_advantage: manual
                        .signals
                        .epoch
                        .or_else(|| soc.and_then(|key| signals.epoch.get(key)).copied())
                        .and_then(|scores| validated(source.key(), scores)),
                }
            }
        }
    }
}

fn by_code<'a, T>(dataset: &'a Dataset<T>, code: &OccupationCode) -> Option<&'a T> {
    dataset
        .get(code.as_str())
        .or_else(|| dataset.get(code.soc()))
}

fn validated(key: &str, scores: EpochScores) -> Option<HumanAdvantage> {
    match HumanAdvantage::new(scores) {
        Ok(advantage) => Some(advantage),
        Err(err) => {
            warn!(occupation = key, error = %err, "ignoring out-of-range EPOCH scores");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Exposure,
    Growth,
    HumanAdvantage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionScores {
    pub exposure: DimensionScore<ExposureLevel>,
    pub growth: DimensionScore<GrowthTrend>,
    pub human_advantage: DimensionScore<AdvantageLevel>,
}

/// Classification as published on a merged record.
#[derive(Debug, Clone, Serialize)]
pub struct ResilienceClassification {
    pub model_version: &'static str,
    #[serde(flatten)]
    pub result: ClassificationResult,
    pub dimensions: DimensionScores,
    /// Dimensions whose input was missing and were scored at their middle level.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imputed: Vec<Dimension>,
    /// Audit only; ignored by equality.
    pub assessed_at: Option<DateTime<Utc>>,
}

impl PartialEq for ResilienceClassification {
    fn eq(&self, other: &Self) -> bool {
        self.model_version == other.model_version
            && self.result == other.result
            && self.dimensions == other.dimensions
            && self.imputed == other.imputed
    }
}

/// Resolved signals plus, when any signal exists, the classification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assessment {
    pub exposure: Option<ExposureRecord>,
    pub growth: Option<GrowthRecord>,
    pub human_advantage: Option<HumanAdvantage>,
    pub resilience: Option<ResilienceClassification>,
}

impl Assessment {
    pub fn fingerprint(&self) -> AssessmentFingerprint {
        AssessmentFingerprint {
            model_version: MODEL_VERSION.to_string(),
            exposure: self.exposure,
            growth_percent: self.growth.as_ref().map(|growth| growth.percent_change),
            epoch_sum: self.human_advantage.map(|advantage| advantage.epoch_sum),
        }
    }

    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        if let Some(resilience) = self.resilience.as_mut() {
            resilience.assessed_at = Some(at);
        }
        self
    }
}

/// Pure and deterministic; no clock is consulted.
pub fn assess(inputs: &ResilienceInputs) -> Assessment {
    let finite = |value: Option<f64>| value.filter(|value| value.is_finite());
    let exposure = match (
        finite(inputs.primary_exposure),
        finite(inputs.secondary_exposure),
        finite(inputs.editorial_estimate),
    ) {
        (None, None, None) => None,
        (primary, secondary, estimate) => {
            Some(resolve_exposure(primary, secondary, estimate.unwrap_or(0.0)))
        }
    };
    let growth = inputs
        .growth
        .clone()
        .filter(|growth| growth.percent_change.is_finite());
    let human_advantage = inputs.human_advantage;

    if exposure.is_none() && growth.is_none() && human_advantage.is_none() {
        return Assessment::default();
    }

    let mut imputed = Vec::new();
    let exposure_score = match &exposure {
        Some(record) => score_exposure(record.value),
        None => {
            imputed.push(Dimension::Exposure);
            DimensionScore::new(ExposureLevel::neutral())
        }
    };
    let growth_score = match &growth {
        Some(record) => score_growth(record.percent_change),
        None => {
            imputed.push(Dimension::Growth);
            DimensionScore::new(GrowthTrend::neutral())
        }
    };
    let advantage_score = match &human_advantage {
        Some(advantage) => score_human_advantage(advantage.epoch_sum),
        None => {
            imputed.push(Dimension::HumanAdvantage);
            DimensionScore::new(AdvantageLevel::neutral())
        }
    };

    let result = classify(
        exposure_score.label,
        growth_score.label,
        advantage_score.label,
    );

    Assessment {
        exposure,
        growth,
        human_advantage,
        resilience: Some(ResilienceClassification {
            model_version: MODEL_VERSION,
            result,
            dimensions: DimensionScores {
                exposure: exposure_score,
                growth: growth_score,
                human_advantage: advantage_score,
            },
            imputed,
            assessed_at: None,
        }),
    }
}
