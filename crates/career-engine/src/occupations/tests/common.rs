use std::collections::HashMap;

use serde_json::{json, Value};

use crate::occupations::domain::{
    BaseOccupation, EpochScores, GrowthRecord, HumanAdvantage, InsideLook, ManualOccupation,
    OccupationSource, RiskProfile, VideoRef,
};
use crate::occupations::merge::{MergeEngine, MergedOccupationRecord};
use crate::occupations::scoring::{assess, Assessment, ResilienceInputs};
use crate::occupations::sources::{CuratedSkills, LegacyRisk, Overlays};

pub(super) fn base(code: &str, title: &str) -> BaseOccupation {
    base_from(json!({ "code": code, "title": title }))
}

pub(super) fn base_from(value: Value) -> BaseOccupation {
    serde_json::from_value(value).expect("valid base occupation")
}

pub(super) fn manual(slug: &str, title: &str, category: &str) -> ManualOccupation {
    manual_from(json!({ "slug": slug, "title": title, "category": category }))
}

pub(super) fn manual_from(value: Value) -> ManualOccupation {
    serde_json::from_value(value).expect("valid manual occupation")
}

/// Five in-range dimensions adding up to `sum` (5..=25).
pub(super) fn epoch_with_sum(sum: u8) -> EpochScores {
    let floor = sum / 5;
    let extra = sum % 5;
    let dim = |index: u8| floor + u8::from(index < extra);
    EpochScores::new(dim(0), dim(1), dim(2), dim(3), dim(4)).expect("sum within 5..=25")
}

pub(super) fn inputs(beta: f64, growth_percent: f64, epoch_sum: u8) -> ResilienceInputs {
    ResilienceInputs {
        primary_exposure: Some(beta),
        growth: Some(GrowthRecord::from_percent(growth_percent)),
        human_advantage: Some(
            HumanAdvantage::new(epoch_with_sum(epoch_sum)).expect("valid EPOCH scores"),
        ),
        ..ResilienceInputs::default()
    }
}

pub(super) fn curated(skills: &[&str]) -> CuratedSkills {
    CuratedSkills {
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
    }
}

pub(super) fn legacy(score: f64) -> LegacyRisk {
    LegacyRisk { score, label: None }
}

pub(super) fn detailed_risk(score: f64) -> RiskProfile {
    RiskProfile::Detailed {
        score,
        label: "Moderate".to_string(),
        factors: vec!["routine documentation".to_string()],
        rationale: "Charting is automatable; bedside care is not.".to_string(),
    }
}

pub(super) fn video(url: &str) -> VideoRef {
    VideoRef {
        url: url.to_string(),
        title: None,
        thumbnail: None,
        duration_seconds: None,
    }
}

pub(super) fn inside_look(narrative: &str) -> InsideLook {
    InsideLook {
        headline: None,
        narrative: narrative.to_string(),
        highlights: Vec::new(),
        challenges: Vec::new(),
    }
}

#[derive(Default)]
pub(super) struct OverlayBuilder {
    skills: Vec<(String, CuratedSkills)>,
    risk: Vec<(String, LegacyRisk)>,
    videos: Vec<(String, VideoRef)>,
    narratives: Vec<(String, InsideLook)>,
}

impl OverlayBuilder {
    pub(super) fn skills(mut self, key: &str, skills: &[&str]) -> Self {
        self.skills.push((key.to_string(), curated(skills)));
        self
    }

    pub(super) fn legacy_risk(mut self, key: &str, score: f64) -> Self {
        self.risk.push((key.to_string(), legacy(score)));
        self
    }

    pub(super) fn video(mut self, soc: &str, url: &str) -> Self {
        self.videos.push((soc.to_string(), video(url)));
        self
    }

    pub(super) fn inside_look(mut self, soc: &str, narrative: &str) -> Self {
        self.narratives.push((soc.to_string(), inside_look(narrative)));
        self
    }

    pub(super) fn build(self) -> Overlays {
        Overlays {
            curated_skills: self.skills.into_iter().collect(),
            legacy_risk: self.risk.into_iter().collect(),
            videos: self.videos.into_iter().collect(),
            inside_look: self.narratives.into_iter().collect(),
        }
    }
}

pub(super) fn overlays() -> OverlayBuilder {
    OverlayBuilder::default()
}

/// Merges sources with assessments computed from the given per-key inputs.
pub(super) fn merge_with(
    sources: Vec<OccupationSource>,
    inputs: Vec<(&str, ResilienceInputs)>,
    overlays: &Overlays,
) -> Vec<MergedOccupationRecord> {
    let assessments: HashMap<String, Assessment> = inputs
        .into_iter()
        .map(|(key, inputs)| (key.to_string(), assess(&inputs)))
        .collect();
    MergeEngine::new(overlays, &assessments).merge_sources(sources)
}

pub(super) fn find<'a>(
    records: &'a [MergedOccupationRecord],
    key: &str,
) -> &'a MergedOccupationRecord {
    records
        .iter()
        .find(|record| record.key() == key)
        .unwrap_or_else(|| panic!("record {key} present"))
}
