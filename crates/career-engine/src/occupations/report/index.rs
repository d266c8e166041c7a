use crate::occupations::domain::TrainingYears;
use crate::occupations::merge::MergedOccupationRecord;
use crate::occupations::scoring::ResilienceTier;
use serde::{Deserialize, Serialize};

/// Bucketed preparation time shown in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainingTime {
    #[serde(rename = "<6mo")]
    UnderSixMonths,
    #[serde(rename = "6-24mo")]
    SixToTwentyFourMonths,
    #[serde(rename = "2-4yr")]
    TwoToFourYears,
    #[serde(rename = "4+yr")]
    FourPlusYears,
}

impl TrainingTime {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::UnderSixMonths,
            Self::SixToTwentyFourMonths,
            Self::TwoToFourYears,
            Self::FourPlusYears,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UnderSixMonths => "<6mo",
            Self::SixToTwentyFourMonths => "6-24mo",
            Self::TwoToFourYears => "2-4yr",
            Self::FourPlusYears => "4+yr",
        }
    }

    /// Each breakpoint belongs to the bucket above it.
    pub fn from_years(typical_years: f64) -> Self {
        if typical_years < 0.5 {
            Self::UnderSixMonths
        } else if typical_years < 2.0 {
            Self::SixToTwentyFourMonths
        } else if typical_years < 4.0 {
            Self::TwoToFourYears
        } else {
            Self::FourPlusYears
        }
    }
}

/// Lightweight listing row. Legacy risk fields sit beside the resilience fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexRecord {
    pub slug: String,
    pub title: String,
    pub code: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub median_pay: Option<u32>,
    pub training_time: Option<TrainingTime>,
    pub training_years: Option<TrainingYears>,
    pub description: Option<String>,
    pub ai_risk: Option<f64>,
    pub ai_risk_label: Option<String>,
    pub ai_resilience: Option<ResilienceTier>,
    pub ai_resilience_score: Option<u8>,
    pub data_completeness: u8,
}

impl IndexRecord {
    pub fn from_record(record: &MergedOccupationRecord, description_budget: usize) -> Self {
        let resilience = record.ai_resilience.as_ref().map(|class| &class.result);

        Self {
            slug: record.slug.clone(),
            title: record.title.clone(),
            code: record.code().map(|code| code.as_str().to_string()),
            category: record.category.clone(),
            subcategory: record.subcategory.clone(),
            median_pay: record.median_pay,
            training_time: record
                .training
                .map(|TrainingYears { typical, .. }| TrainingTime::from_years(typical)),
            training_years: record.training,
            description: record
                .description
                .as_deref()
                .map(|text| truncate(text, description_budget)),
            ai_risk: record.ai_risk.as_ref().map(|risk| risk.score()),
            ai_risk_label: record.ai_risk.as_ref().map(|risk| risk.label().to_string()),
            ai_resilience: resilience.map(|result| result.tier),
            ai_resilience_score: resilience.map(|result| result.total_score),
            data_completeness: record.data_completeness,
        }
    }
}

/// Keeps at most `budget` characters, never splitting one.
pub fn truncate(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => text[..cut].trim_end().to_string(),
        None => text.to_string(),
    }
}

/// Both published collections; `full` keeps the merged order.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub full: Vec<MergedOccupationRecord>,
    pub index: Vec<IndexRecord>,
}

/// Pure: reads nothing beyond its arguments.
pub fn project(records: Vec<MergedOccupationRecord>, description_budget: usize) -> Projection {
    let index = records
        .iter()
        .map(|record| IndexRecord::from_record(record, description_budget))
        .collect();

    Projection {
        full: records,
        index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints_fall_into_upper_bucket() {
        let cases = [
            (0.0, TrainingTime::UnderSixMonths),
            (0.49, TrainingTime::UnderSixMonths),
            (0.5, TrainingTime::SixToTwentyFourMonths),
            (1.99, TrainingTime::SixToTwentyFourMonths),
            (2.0, TrainingTime::TwoToFourYears),
            (3.99, TrainingTime::TwoToFourYears),
            (4.0, TrainingTime::FourPlusYears),
            (8.0, TrainingTime::FourPlusYears),
        ];
        for (years, bucket) in cases {
            assert_eq!(TrainingTime::from_years(years), bucket, "{years} years");
        }
    }

    #[test]
    fn labels_match_serialized_form() {
        for bucket in TrainingTime::ordered() {
            let json = serde_json::to_string(&bucket).expect("serialize");
            assert_eq!(json, format!("\"{}\"", bucket.label()));
        }
    }

    #[test]
    fn truncation_respects_character_budget() {
        assert_eq!(truncate("short", 150), "short");
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("café au lait", 4), "café");
        assert_eq!(truncate("two words", 4), "two");
    }
}
