use super::record::{MergedOccupationRecord, OverlayLookup, RecordOrigin, SkillsSource};
use crate::occupations::categories;
use crate::occupations::domain::{InsideLook, RiskProfile, VideoRef};
use crate::occupations::sources::{normalize_skills, CuratedSkills, Dataset, LegacyRisk, Overlays};
use serde::Serialize;

/// Overlay transforms in precedence order; a later step overrides an earlier one.
///
/// Each step takes and returns a whole record so any prefix of the chain can be run and
/// inspected on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStep {
    CategoryOverride,
    CuratedSkills,
    LegacyRisk,
    Media,
    Narrative,
}

impl MergeStep {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::CategoryOverride,
            Self::CuratedSkills,
            Self::LegacyRisk,
            Self::Media,
            Self::Narrative,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CategoryOverride => "category_override",
            Self::CuratedSkills => "curated_skills",
            Self::LegacyRisk => "legacy_risk",
            Self::Media => "media",
            Self::Narrative => "narrative",
        }
    }

    /// Manual records carry their own category and skip the override table.
    pub fn applies_to(self, origin: &RecordOrigin) -> bool {
        match (self, origin) {
            (Self::CategoryOverride, RecordOrigin::Manual) => false,
            _ => true,
        }
    }

    pub fn apply(
        self,
        record: MergedOccupationRecord,
        overlays: &Overlays,
    ) -> MergedOccupationRecord {
        match self {
            Self::CategoryOverride => override_category(record),
            Self::CuratedSkills => {
                let curated = overlays.curated_skills.get(record.key()).cloned();
                replace_skills(record, curated)
            }
            Self::LegacyRisk => {
                let legacy = overlays.legacy_risk.get(record.key());
                apply_legacy_risk(record, legacy)
            }
            Self::Media => attach_video(record, &overlays.videos),
            Self::Narrative => attach_inside_look(record, &overlays.inside_look),
        }
    }
}

/// Recomputed from the category table on every run, whatever the base record says.
pub fn override_category(record: MergedOccupationRecord) -> MergedOccupationRecord {
    let Some(assignment) = record.code().and_then(categories::assign) else {
        return record;
    };

    // A subcategory only survives when it still belongs to the assigned category.
    let kept_subcategory = match record.category.as_deref() {
        Some(existing) if existing == assignment.category => record.subcategory.clone(),
        _ => None,
    };

    MergedOccupationRecord {
        category: Some(assignment.category.to_string()),
        subcategory: assignment
            .subcategory
            .map(str::to_string)
            .or(kept_subcategory),
        ..record
    }
}

/// A curated list replaces the existing skills outright.
pub fn replace_skills(
    record: MergedOccupationRecord,
    curated: Option<CuratedSkills>,
) -> MergedOccupationRecord {
    match curated {
        Some(curated) => MergedOccupationRecord {
            skills: normalize_skills(curated.skills),
            skills_source: SkillsSource::Curated,
            ..record
        },
        None => record,
    }
}

/// The legacy scalar never displaces a detailed profile.
pub fn layer_legacy_risk(
    current: Option<RiskProfile>,
    legacy: Option<&LegacyRisk>,
) -> Option<RiskProfile> {
    match (current, legacy) {
        (Some(current), _) if current.is_detailed() => Some(current),
        (_, Some(legacy)) => Some(legacy.to_profile()),
        (current, None) => current,
    }
}

pub fn apply_legacy_risk(
    record: MergedOccupationRecord,
    legacy: Option<&LegacyRisk>,
) -> MergedOccupationRecord {
    let ai_risk = layer_legacy_risk(record.ai_risk.clone(), legacy);
    MergedOccupationRecord { ai_risk, ..record }
}

/// Looks the video up by SOC code. A miss is recorded explicitly.
pub fn attach_video(
    record: MergedOccupationRecord,
    videos: &Dataset<VideoRef>,
) -> MergedOccupationRecord {
    let video = lookup_by_soc(&record, videos);
    MergedOccupationRecord { video, ..record }
}

pub fn attach_inside_look(
    record: MergedOccupationRecord,
    narratives: &Dataset<InsideLook>,
) -> MergedOccupationRecord {
    let inside_look = lookup_by_soc(&record, narratives);
    MergedOccupationRecord {
        inside_look,
        ..record
    }
}

fn lookup_by_soc<T: Clone>(
    record: &MergedOccupationRecord,
    dataset: &Dataset<T>,
) -> OverlayLookup<T> {
    record
        .soc_code
        .as_deref()
        .and_then(|soc| dataset.get(soc))
        .cloned()
        .into()
}
