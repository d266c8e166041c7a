use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Standardized occupation identifier: `DD-DDDD` with an optional `.DD` detail variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OccupationCode(String);

impl OccupationCode {
    pub fn parse(raw: &str) -> Result<Self, CodeError> {
        let trimmed = raw.trim();
        let (soc, variant) = match trimmed.split_once('.') {
            Some((soc, variant)) => (soc, Some(variant)),
            None => (trimmed, None),
        };

        let soc_valid = match soc.split_once('-') {
            Some((group, detail)) => is_digits(group, 2) && is_digits(detail, 4),
            None => false,
        };
        let variant_valid = variant.map_or(true, |value| is_digits(value, 2));

        if soc_valid && variant_valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(CodeError::Invalid(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `DD-DDDD` part, used to join datasets published without detail variants.
    pub fn soc(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(soc, _)| soc)
    }

    pub fn major_group(&self) -> &str {
        &self.0[..2]
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|byte| byte.is_ascii_digit())
}

impl TryFrom<String> for OccupationCode {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OccupationCode> for String {
    fn from(value: OccupationCode) -> Self {
        value.0
    }
}

impl fmt::Display for OccupationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("'{0}' is not an occupation code (expected DD-DDDD or DD-DDDD.DD)")]
    Invalid(String),
}

/// Five qualitative human-advantage dimensions, each rated 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochScores {
    pub empathy: u8,
    pub presence: u8,
    pub opinion: u8,
    pub creativity: u8,
    pub hope: u8,
}

impl EpochScores {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(
        empathy: u8,
        presence: u8,
        opinion: u8,
        creativity: u8,
        hope: u8,
    ) -> Result<Self, EpochError> {
        let scores = Self {
            empathy,
            presence,
            opinion,
            creativity,
            hope,
        };
        scores.validate()?;
        Ok(scores)
    }

    pub fn validate(&self) -> Result<(), EpochError> {
        for (dimension, value) in self.dimensions() {
            if !(Self::MIN..=Self::MAX).contains(&value) {
                return Err(EpochError::OutOfRange { dimension, value });
            }
        }
        Ok(())
    }

    /// Range 5..=25 for validated scores.
    pub fn sum(&self) -> u8 {
        self.dimensions()
            .iter()
            .fold(0u8, |total, (_, value)| total.saturating_add(*value))
    }

    fn dimensions(&self) -> [(&'static str, u8); 5] {
        [
            ("empathy", self.empathy),
            ("presence", self.presence),
            ("opinion", self.opinion),
            ("creativity", self.creativity),
            ("hope", self.hope),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EpochError {
    #[error("EPOCH dimension '{dimension}' must be within 1..=5, got {value}")]
    OutOfRange { dimension: &'static str, value: u8 },
}

/// Validated EPOCH scores alongside their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HumanAdvantage {
    pub scores: EpochScores,
    pub epoch_sum: u8,
}

impl HumanAdvantage {
    pub fn new(scores: EpochScores) -> Result<Self, EpochError> {
        scores.validate()?;
        Ok(Self {
            epoch_sum: scores.sum(),
            scores,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExposureSource {
    Primary,
    Secondary,
    EditorialEstimate,
}

impl ExposureSource {
    pub const fn ordered() -> [Self; 3] {
        [Self::Primary, Self::Secondary, Self::EditorialEstimate]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::EditorialEstimate => "editorial-estimate",
        }
    }
}

/// Canonical AI task exposure for one occupation. `value` is always within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureRecord {
    pub value: f64,
    /// The figure as supplied by the winning source, before rescaling.
    pub raw: f64,
    /// Upper end of the source's nominal scale.
    pub nominal_max: f64,
    pub source: ExposureSource,
}

/// Projected percentage employment change over the projection horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    #[serde(alias = "change_percent", alias = "growth_percent")]
    pub percent_change: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_base: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_projected: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon: Option<String>,
}

impl GrowthRecord {
    pub fn from_percent(percent_change: f64) -> Self {
        Self {
            percent_change,
            employment_base: None,
            employment_projected: None,
            horizon: None,
        }
    }
}

/// Years of preparation: shortest route, typical route, longest route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingYears {
    pub min: f64,
    pub typical: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionStep {
    pub title: String,
    #[serde(default)]
    pub years_experience: f64,
    #[serde(deserialize_with = "whole_dollars")]
    pub median_pay: u32,
}

/// Annual pay as published: whole dollars, or a fractional figure rounded to the dollar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "PayShape")]
struct Dollars(u32);

#[derive(Deserialize)]
#[serde(untagged)]
enum PayShape {
    Whole(u32),
    Fractional(f64),
}

impl TryFrom<PayShape> for Dollars {
    type Error = String;

    fn try_from(shape: PayShape) -> Result<Self, Self::Error> {
        match shape {
            PayShape::Whole(amount) => Ok(Self(amount)),
            PayShape::Fractional(amount)
                if amount.is_finite() && (0.0..=f64::from(u32::MAX)).contains(&amount) =>
            {
                Ok(Self(amount.round() as u32))
            }
            PayShape::Fractional(amount) => Err(format!("pay {amount} is out of range")),
        }
    }
}

fn whole_dollars<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Dollars::deserialize(deserializer).map(|Dollars(amount)| amount)
}

fn lenient_pay<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let pay: Option<Dollars> = lenient(deserializer)?;
    Ok(pay.map(|Dollars(amount)| amount))
}

/// Optional field groups never sink a whole occupation: a malformed value is logged and
/// read as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|err| {
        warn!(error = %err, "malformed occupation field; treating as absent");
        T::default()
    }))
}

/// AI risk as published before the resilience classification existed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskProfile {
    Detailed {
        score: f64,
        label: String,
        #[serde(default)]
        factors: Vec<String>,
        #[serde(default)]
        rationale: String,
    },
    Scalar {
        score: f64,
        label: String,
    },
}

impl RiskProfile {
    /// Score on the legacy 0..=10 scale.
    pub fn score(&self) -> f64 {
        match self {
            RiskProfile::Detailed { score, .. } | RiskProfile::Scalar { score, .. } => *score,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RiskProfile::Detailed { label, .. } | RiskProfile::Scalar { label, .. } => label,
        }
    }

    pub fn is_detailed(&self) -> bool {
        matches!(self, RiskProfile::Detailed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    #[serde(alias = "video_url")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsideLook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    pub narrative: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub challenges: Vec<String>,
}

/// One row of the canonical base dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BaseOccupation {
    pub code: OccupationCode,
    #[serde(default, deserialize_with = "lenient")]
    pub soc_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
    pub title: String,
    /// May be stale; the category table is reapplied on every run.
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub subcategory: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_pay")]
    pub median_pay: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub training: Option<TrainingYears>,
    #[serde(default, deserialize_with = "lenient")]
    pub education: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub progression: Vec<ProgressionStep>,
    #[serde(default, deserialize_with = "lenient")]
    pub ai_risk: Option<RiskProfile>,
}

/// Signals a hand-authored occupation may carry inline.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ManualSignals {
    #[serde(default)]
    pub ai_exposure: Option<f64>,
    #[serde(default)]
    pub growth_percent: Option<f64>,
    #[serde(default)]
    pub epoch: Option<EpochScores>,
}

/// A hand-authored occupation with no base-dataset code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManualOccupation {
    pub slug: String,
    pub title: String,
    pub category: String,
    #[serde(default, deserialize_with = "lenient")]
    pub subcategory: Option<String>,
    /// Optional join key into SOC-keyed datasets and overlays.
    #[serde(default, deserialize_with = "lenient")]
    pub soc_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_pay")]
    pub median_pay: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub training: Option<TrainingYears>,
    #[serde(default, deserialize_with = "lenient")]
    pub education: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub progression: Vec<ProgressionStep>,
    #[serde(default, deserialize_with = "lenient")]
    pub ai_risk: Option<RiskProfile>,
    #[serde(default, deserialize_with = "lenient")]
    pub signals: ManualSignals,
}

/// An occupation before merging: either joined from the base dataset or authored by hand.
#[derive(Debug, Clone, PartialEq)]
pub enum OccupationSource {
    Sourced(BaseOccupation),
    Manual(ManualOccupation),
}

impl OccupationSource {
    /// Key used by record-keyed overlays (curated skills, legacy risk).
    pub fn key(&self) -> &str {
        match self {
            OccupationSource::Sourced(base) => base.code.as_str(),
            OccupationSource::Manual(manual) => &manual.slug,
        }
    }

    /// Key used by SOC-keyed overlays (media, narrative).
    pub fn soc_key(&self) -> Option<&str> {
        match self {
            OccupationSource::Sourced(base) => {
                Some(base.soc_code.as_deref().unwrap_or_else(|| base.code.soc()))
            }
            OccupationSource::Manual(manual) => manual.soc_code.as_deref(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            OccupationSource::Sourced(base) => &base.title,
            OccupationSource::Manual(manual) => &manual.title,
        }
    }

    pub fn ai_risk(&self) -> Option<&RiskProfile> {
        match self {
            OccupationSource::Sourced(base) => base.ai_risk.as_ref(),
            OccupationSource::Manual(manual) => manual.ai_risk.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_soc_and_detail_codes() {
        let soc = OccupationCode::parse("15-1252").expect("soc code");
        assert_eq!(soc.soc(), "15-1252");
        assert_eq!(soc.major_group(), "15");

        let detail = OccupationCode::parse(" 29-1141.01 ").expect("detail code");
        assert_eq!(detail.as_str(), "29-1141.01");
        assert_eq!(detail.soc(), "29-1141");
    }

    #[test]
    fn rejects_malformed_codes() {
        for raw in ["", "151252", "15-125", "15-1252.1", "AB-1252", "15-1252.00.01"] {
            assert!(OccupationCode::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn progression_pay_rounds_to_whole_dollars() {
        let step: ProgressionStep = serde_json::from_value(serde_json::json!({
            "title": "Senior Machinist",
            "years_experience": 5,
            "median_pay": 61250.6
        }))
        .expect("fractional pay accepted");
        assert_eq!(step.median_pay, 61251);

        let numeric_cell: ProgressionStep = serde_json::from_value(serde_json::json!({
            "title": "Machinist",
            "median_pay": 51000.0
        }))
        .expect("float-typed whole pay accepted");
        assert_eq!(numeric_cell.median_pay, 51000);

        let negative = serde_json::from_value::<ProgressionStep>(serde_json::json!({
            "title": "Apprentice",
            "median_pay": -1
        }));
        assert!(negative.is_err());
    }

    #[test]
    fn epoch_scores_enforce_range() {
        let scores = EpochScores::new(5, 4, 4, 3, 5).expect("valid scores");
        assert_eq!(scores.sum(), 21);

        match EpochScores::new(5, 0, 4, 3, 5) {
            Err(EpochError::OutOfRange { dimension, value }) => {
                assert_eq!(dimension, "presence");
                assert_eq!(value, 0);
            }
            other => panic!("expected range error, got {other:?}"),
        }
        assert!(EpochScores::new(1, 1, 1, 1, 6).is_err());
    }

    #[test]
    fn sourced_records_fall_back_to_code_for_soc_key() {
        let base: BaseOccupation = serde_json::from_value(serde_json::json!({
            "code": "15-1252.00",
            "title": "Software Developers"
        }))
        .expect("base record");
        let source = OccupationSource::Sourced(base);
        assert_eq!(source.key(), "15-1252.00");
        assert_eq!(source.soc_key(), Some("15-1252"));
    }

    #[test]
    fn risk_profile_deserializes_tagged_variants() {
        let scalar: RiskProfile =
            serde_json::from_str(r#"{"kind":"scalar","score":6.5,"label":"Moderate"}"#)
                .expect("scalar risk");
        assert!(!scalar.is_detailed());
        assert_eq!(scalar.score(), 6.5);

        let detailed: RiskProfile = serde_json::from_str(
            r#"{"kind":"detailed","score":3.0,"label":"Low","factors":["hands-on work"]}"#,
        )
        .expect("detailed risk");
        assert!(detailed.is_detailed());
        assert_eq!(detailed.label(), "Low");
    }
}
