use crate::occupations::domain::{
    BaseOccupation, ExposureRecord, GrowthRecord, HumanAdvantage, InsideLook, ManualOccupation,
    OccupationCode, OccupationSource, ProgressionStep, RiskProfile, TrainingYears, VideoRef,
};
use crate::occupations::scoring::{Assessment, ResilienceClassification};
use crate::occupations::sources::slugify;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "data_source", rename_all = "snake_case")]
pub enum RecordOrigin {
    Sourced { code: OccupationCode },
    Manual,
}

/// Outcome of a secondary-key overlay lookup.
///
/// `Missing` serializes as `null` while `Unchecked` is omitted, so consumers can tell
/// "looked up, nothing there" from "never looked up".
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayLookup<T> {
    Unchecked,
    Missing,
    Found(T),
}

impl<T> Default for OverlayLookup<T> {
    fn default() -> Self {
        Self::Unchecked
    }
}

impl<T> OverlayLookup<T> {
    pub fn is_unchecked(&self) -> bool {
        matches!(self, OverlayLookup::Unchecked)
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            OverlayLookup::Found(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for OverlayLookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => OverlayLookup::Found(value),
            None => OverlayLookup::Missing,
        }
    }
}

impl<T: Serialize> Serialize for OverlayLookup<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OverlayLookup::Found(value) => serializer.serialize_some(value),
            OverlayLookup::Missing | OverlayLookup::Unchecked => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillsSource {
    Base,
    Curated,
}

/// One published occupation. Rebuilt from scratch every run; never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedOccupationRecord {
    #[serde(flatten)]
    pub origin: RecordOrigin,
    pub slug: String,
    pub title: String,
    pub soc_code: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub median_pay: Option<u32>,
    pub training: Option<TrainingYears>,
    pub education: Option<String>,
    pub skills: Vec<String>,
    pub skills_source: SkillsSource,
    pub progression: Vec<ProgressionStep>,
    pub ai_risk: Option<RiskProfile>,
    pub ai_exposure: Option<ExposureRecord>,
    pub growth: Option<GrowthRecord>,
    pub human_advantage: Option<HumanAdvantage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_resilience: Option<ResilienceClassification>,
    #[serde(skip_serializing_if = "OverlayLookup::is_unchecked")]
    pub video: OverlayLookup<VideoRef>,
    #[serde(skip_serializing_if = "OverlayLookup::is_unchecked")]
    pub inside_look: OverlayLookup<InsideLook>,
    /// Percentage of enrichment checks satisfied, 0..=100.
    pub data_completeness: u8,
}

impl MergedOccupationRecord {
    /// Seeds a record from its source and assessment; overlays are applied afterwards.
    pub fn seed(source: OccupationSource, assessment: Assessment) -> Self {
        let soc_code = source.soc_key().map(str::to_string);
        let Assessment {
            exposure,
            growth,
            human_advantage,
            resilience,
        } = assessment;

        let record = match source {
            OccupationSource::Sourced(base) => Self::from_base(base, soc_code),
            OccupationSource::Manual(manual) => Self::from_manual(manual, soc_code),
        };

        Self {
            ai_exposure: exposure,
            growth,
            human_advantage,
            ai_resilience: resilience,
            ..record
        }
    }

    fn from_base(base: BaseOccupation, soc_code: Option<String>) -> Self {
        let slug = base
            .slug
            .filter(|slug| !slug.trim().is_empty())
            .unwrap_or_else(|| slugify(&base.title));

        Self {
            origin: RecordOrigin::Sourced { code: base.code },
            slug,
            title: base.title,
            soc_code,
            category: base.category,
            subcategory: base.subcategory,
            description: base.description,
            median_pay: base.median_pay,
            training: base.training,
            education: base.education,
            skills: base.skills,
            skills_source: SkillsSource::Base,
            progression: base.progression,
            ai_risk: base.ai_risk,
            ai_exposure: None,
            growth: None,
            human_advantage: None,
            ai_resilience: None,
            video: OverlayLookup::Unchecked,
            inside_look: OverlayLookup::Unchecked,
            data_completeness: 0,
        }
    }

    fn from_manual(manual: ManualOccupation, soc_code: Option<String>) -> Self {
        Self {
            origin: RecordOrigin::Manual,
            slug: manual.slug,
            title: manual.title,
            soc_code,
            category: Some(manual.category),
            subcategory: manual.subcategory,
            description: manual.description,
            median_pay: manual.median_pay,
            training: manual.training,
            education: manual.education,
            skills: manual.skills,
            skills_source: SkillsSource::Base,
            progression: manual.progression,
            ai_risk: manual.ai_risk,
            ai_exposure: None,
            growth: None,
            human_advantage: None,
            ai_resilience: None,
            video: OverlayLookup::Unchecked,
            inside_look: OverlayLookup::Unchecked,
            data_completeness: 0,
        }
    }

    /// Code for sourced records, slug for manual ones.
    pub fn key(&self) -> &str {
        match &self.origin {
            RecordOrigin::Sourced { code } => code.as_str(),
            RecordOrigin::Manual => &self.slug,
        }
    }

    pub fn code(&self) -> Option<&OccupationCode> {
        match &self.origin {
            RecordOrigin::Sourced { code } => Some(code),
            RecordOrigin::Manual => None,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self.origin, RecordOrigin::Manual)
    }

    pub fn completeness(&self) -> u8 {
        let checks = [
            self.description
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty()),
            self.median_pay.is_some(),
            self.training.is_some(),
            !self.skills.is_empty(),
            self.ai_exposure.is_some(),
            self.growth.is_some(),
            self.human_advantage.is_some(),
            self.ai_resilience.is_some(),
        ];
        let satisfied = checks.iter().filter(|check| **check).count();
        ((satisfied * 100) / checks.len()) as u8
    }

    pub fn with_completeness(self) -> Self {
        let data_completeness = self.completeness();
        Self {
            data_completeness,
            ..self
        }
    }
}
