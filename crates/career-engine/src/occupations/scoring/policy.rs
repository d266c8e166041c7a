use super::rules::{AdvantageLevel, DimensionLevel, ExposureLevel, GrowthTrend};
use serde::{Deserialize, Serialize};

pub const MAX_SCORE: u8 = 6;

const BALANCED_PHRASE: &str = "balanced mix of exposure, growth and human-advantage factors";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResilienceTier {
    #[serde(rename = "AI-Resilient")]
    AiResilient,
    #[serde(rename = "AI-Augmented")]
    AiAugmented,
    #[serde(rename = "In Transition")]
    InTransition,
    #[serde(rename = "High Disruption Risk")]
    HighDisruptionRisk,
}

impl ResilienceTier {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::AiResilient,
            Self::AiAugmented,
            Self::InTransition,
            Self::HighDisruptionRisk,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AiResilient => "AI-Resilient",
            Self::AiAugmented => "AI-Augmented",
            Self::InTransition => "In Transition",
            Self::HighDisruptionRisk => "High Disruption Risk",
        }
    }

    /// Total partition of 0..=6; totals above six are treated as six.
    pub const fn from_total(total: u8) -> Self {
        match total {
            0..=1 => Self::HighDisruptionRisk,
            2 => Self::InTransition,
            3..=4 => Self::AiAugmented,
            _ => Self::AiResilient,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub total_score: u8,
    pub tier: ResilienceTier,
    pub rationale: String,
}

pub fn classify(
    exposure: ExposureLevel,
    growth: GrowthTrend,
    advantage: AdvantageLevel,
) -> ClassificationResult {
    let total_score = exposure.points() + growth.points() + advantage.points();
    let phrases: Vec<&str> = [exposure.phrase(), growth.phrase(), advantage.phrase()]
        .into_iter()
        .flatten()
        .collect();

    ClassificationResult {
        total_score,
        tier: ResilienceTier::from_total(total_score),
        rationale: rationale(total_score, &phrases),
    }
}

fn rationale(total_score: u8, phrases: &[&str]) -> String {
    let body = if phrases.is_empty() {
        BALANCED_PHRASE.to_string()
    } else {
        phrases.join(", ")
    };
    format!("Score {total_score}/{MAX_SCORE}: {body}")
}
