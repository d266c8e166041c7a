//! Source Loader: reads every dataset wholesale before processing starts.
//!
//! Only the base occupation dataset is required. Optional datasets that are absent come
//! back empty; optional datasets that cannot be parsed are reported as degraded and also
//! come back empty. Individual entries that fail to deserialize are skipped.

mod catalogue;
pub(crate) mod normalizer;
mod parser;

pub use catalogue::DatasetKind;
pub use normalizer::{normalize_skills, slugify, sort_key};

use crate::occupations::domain::{
    BaseOccupation, EpochScores, GrowthRecord, InsideLook, ManualOccupation, RiskProfile,
    VideoRef,
};
use catalogue::DocumentFormat;
use parser::{ParseError, ParsedDocument};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::btree_map::{self, BTreeMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("required base dataset not found at {}", path.display())]
    MissingBase { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid CSV in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error("{} must be a JSON object keyed by code or an array of records", path.display())]
    UnsupportedShape { path: PathBuf },
}

impl LoadError {
    fn from_parse(path: &Path, error: ParseError) -> Self {
        let path = path.to_path_buf();
        match error {
            ParseError::Json(source) => LoadError::Json { path, source },
            ParseError::Csv(source) => LoadError::Csv { path, source },
            ParseError::UnsupportedShape => LoadError::UnsupportedShape { path },
        }
    }
}

/// Read-only lookup table keyed by occupation code, SOC code or manual slug.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<T> {
    entries: BTreeMap<String, T>,
}

impl<T> Default for Dataset<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> Dataset<T> {
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, T> {
        self.entries.iter()
    }

    pub fn into_values(self) -> impl Iterator<Item = T> {
        self.entries.into_values()
    }
}

/// First entry for a key wins.
impl<T> FromIterator<(String, T)> for Dataset<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut entries = BTreeMap::new();
        for (key, value) in iter {
            entries.entry(key).or_insert(value);
        }
        Self { entries }
    }
}

/// Exposure estimate as published: a bare number or an object with a score field.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "ExposureShape")]
pub struct ExposureEntry {
    pub score: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExposureShape {
    Bare(f64),
    Fields {
        #[serde(alias = "beta", alias = "aioe", alias = "value")]
        score: f64,
    },
}

impl From<ExposureShape> for ExposureEntry {
    fn from(shape: ExposureShape) -> Self {
        match shape {
            ExposureShape::Bare(score) | ExposureShape::Fields { score } => Self { score },
        }
    }
}

/// Curated skill list: a bare array or `{ "skills": [...] }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "SkillsShape")]
pub struct CuratedSkills {
    pub skills: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillsShape {
    List(Vec<String>),
    Fields { skills: Vec<String> },
}

impl From<SkillsShape> for CuratedSkills {
    fn from(shape: SkillsShape) -> Self {
        match shape {
            SkillsShape::List(skills) | SkillsShape::Fields { skills } => Self { skills },
        }
    }
}

/// Legacy single-scalar risk mapping entry (0..=10).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "LegacyRiskShape")]
pub struct LegacyRisk {
    pub score: f64,
    pub label: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyRiskShape {
    Bare(f64),
    Fields {
        #[serde(alias = "ai_risk", alias = "risk")]
        score: f64,
        #[serde(default)]
        label: Option<String>,
    },
}

impl From<LegacyRiskShape> for LegacyRisk {
    fn from(shape: LegacyRiskShape) -> Self {
        match shape {
            LegacyRiskShape::Bare(score) => Self { score, label: None },
            LegacyRiskShape::Fields { score, label } => Self { score, label },
        }
    }
}

impl LegacyRisk {
    pub fn to_profile(&self) -> RiskProfile {
        RiskProfile::Scalar {
            score: self.score,
            label: self
                .label
                .clone()
                .unwrap_or_else(|| legacy_label(self.score).to_string()),
        }
    }
}

/// Label the legacy mapping used when a file carries bare scores.
pub fn legacy_label(score: f64) -> &'static str {
    if score < 4.0 {
        "Low"
    } else if score < 7.0 {
        "Moderate"
    } else {
        "High"
    }
}

/// Datasets that feed the resilience classification.
#[derive(Debug, Clone, Default)]
pub struct SignalDatasets {
    pub primary_exposure: Dataset<ExposureEntry>,
    pub secondary_exposure: Dataset<ExposureEntry>,
    pub projections: Dataset<GrowthRecord>,
    pub epoch: Dataset<EpochScores>,
}

/// Datasets that enrich or override fields on merged records.
#[derive(Debug, Clone, Default)]
pub struct Overlays {
    pub curated_skills: Dataset<CuratedSkills>,
    pub legacy_risk: Dataset<LegacyRisk>,
    pub videos: Dataset<VideoRef>,
    pub inside_look: Dataset<InsideLook>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetStatus {
    Loaded { entries: usize, rejected: usize },
    Missing,
    Degraded { reason: String },
}

/// Per-dataset outcome of a load, in catalogue order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub statuses: Vec<(DatasetKind, DatasetStatus)>,
}

impl LoadReport {
    fn record(&mut self, kind: DatasetKind, status: DatasetStatus) {
        self.statuses.push((kind, status));
    }

    pub fn status(&self, kind: DatasetKind) -> Option<&DatasetStatus> {
        self.statuses
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, status)| status)
    }

    pub fn missing(&self) -> Vec<&'static str> {
        self.filter_labels(|status| matches!(status, DatasetStatus::Missing))
    }

    pub fn degraded(&self) -> Vec<&'static str> {
        self.filter_labels(|status| matches!(status, DatasetStatus::Degraded { .. }))
    }

    pub fn rejected_entries(&self) -> usize {
        self.statuses
            .iter()
            .map(|(_, status)| match status {
                DatasetStatus::Loaded { rejected, .. } => *rejected,
                _ => 0,
            })
            .sum()
    }

    fn filter_labels(&self, predicate: impl Fn(&DatasetStatus) -> bool) -> Vec<&'static str> {
        self.statuses
            .iter()
            .filter(|(_, status)| predicate(status))
            .map(|(kind, _)| kind.label())
            .collect()
    }
}

/// Everything one run reads, loaded up front.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub base: Vec<BaseOccupation>,
    pub manual: Vec<ManualOccupation>,
    pub signals: SignalDatasets,
    pub overlays: Overlays,
    pub report: LoadReport,
}

pub struct SourceLoader {
    data_dir: PathBuf,
}

impl SourceLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn load(&self) -> Result<Datasets, LoadError> {
        let mut report = LoadReport::default();

        let base = self.load_base(&mut report)?;

        let signals = SignalDatasets {
            primary_exposure: self.load_optional(DatasetKind::PrimaryExposure, &mut report),
            secondary_exposure: self.load_optional(DatasetKind::SecondaryExposure, &mut report),
            projections: self.load_optional(DatasetKind::Projections, &mut report),
            epoch: self.load_optional(DatasetKind::EpochScores, &mut report),
        };

        let overlays = Overlays {
            curated_skills: self.load_optional(DatasetKind::CuratedSkills, &mut report),
            legacy_risk: self.load_optional(DatasetKind::LegacyRisk, &mut report),
            videos: self.load_optional(DatasetKind::Videos, &mut report),
            inside_look: self.load_optional(DatasetKind::InsideLook, &mut report),
        };

        let manual = self
            .load_optional::<ManualOccupation>(DatasetKind::ManualOccupations, &mut report)
            .into_values()
            .collect();

        info!(
            base = base.len(),
            missing = ?report.missing(),
            degraded = ?report.degraded(),
            "datasets loaded"
        );

        Ok(Datasets {
            base,
            manual,
            signals,
            overlays,
            report,
        })
    }

    fn load_base(&self, report: &mut LoadReport) -> Result<Vec<BaseOccupation>, LoadError> {
        let kind = DatasetKind::Occupations;
        let Some((path, format)) = kind.locate(&self.data_dir) else {
            return Err(LoadError::MissingBase {
                path: kind.expected_path(&self.data_dir),
            });
        };

        let reader = open(&path)?;
        let document =
            parse_document(reader, format, kind).map_err(|err| LoadError::from_parse(&path, err))?;
        let (dataset, rejected) = decode_entries::<BaseOccupation>(kind, document);

        report.record(
            kind,
            DatasetStatus::Loaded {
                entries: dataset.len(),
                rejected,
            },
        );
        Ok(dataset.into_values().collect())
    }

    fn load_optional<T: DeserializeOwned>(
        &self,
        kind: DatasetKind,
        report: &mut LoadReport,
    ) -> Dataset<T> {
        let Some((path, format)) = kind.locate(&self.data_dir) else {
            warn!(dataset = kind.label(), "optional dataset not found; skipping");
            report.record(kind, DatasetStatus::Missing);
            return Dataset::default();
        };

        let parsed = open(&path).and_then(|reader| {
            parse_document(reader, format, kind).map_err(|err| LoadError::from_parse(&path, err))
        });

        match parsed {
            Ok(document) => {
                let (dataset, rejected) = decode_entries(kind, document);
                debug!(dataset = kind.label(), entries = dataset.len(), rejected, "dataset loaded");
                report.record(
                    kind,
                    DatasetStatus::Loaded {
                        entries: dataset.len(),
                        rejected,
                    },
                );
                dataset
            }
            Err(err) => {
                warn!(dataset = kind.label(), error = %err, "optional dataset unreadable; skipping");
                report.record(
                    kind,
                    DatasetStatus::Degraded {
                        reason: err.to_string(),
                    },
                );
                Dataset::default()
            }
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_document<R: Read>(
    reader: R,
    format: DocumentFormat,
    kind: DatasetKind,
) -> Result<ParsedDocument, ParseError> {
    match format {
        DocumentFormat::Json => parser::parse_json(reader, kind.key_fields()),
        DocumentFormat::Csv => parser::parse_csv(reader, kind.key_fields()),
    }
}

/// Deserializes each entry independently; a bad entry is logged and counted, never fatal.
fn decode_entries<T: DeserializeOwned>(
    kind: DatasetKind,
    document: ParsedDocument,
) -> (Dataset<T>, usize) {
    let mut rejected = document.unkeyed;
    if document.unkeyed > 0 {
        warn!(dataset = kind.label(), count = document.unkeyed, "entries without a join key");
    }

    let mut decoded = Vec::with_capacity(document.entries.len());
    for entry in document.entries {
        match serde_json::from_value::<T>(entry.value) {
            Ok(value) => decoded.push((entry.key, value)),
            Err(err) => {
                rejected += 1;
                warn!(dataset = kind.label(), key = %entry.key, error = %err, "skipping malformed entry");
            }
        }
    }

    let total = decoded.len();
    let dataset: Dataset<T> = decoded.into_iter().collect();
    let duplicates = total - dataset.len();
    if duplicates > 0 {
        rejected += duplicates;
        warn!(dataset = kind.label(), duplicates, "duplicate keys; keeping first entry");
    }

    (dataset, rejected)
}

/// Parses one dataset from an in-memory JSON document; used by tests and tooling.
pub fn dataset_from_json<T: DeserializeOwned>(
    kind: DatasetKind,
    json: &str,
) -> Result<Dataset<T>, LoadError> {
    let path = kind.expected_path(Path::new("."));
    let document = parser::parse_json(json.as_bytes(), kind.key_fields())
        .map_err(|err| LoadError::from_parse(&path, err))?;
    Ok(decode_entries(kind, document).0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).expect("write fixture");
    }

    #[test]
    fn missing_base_dataset_is_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = SourceLoader::new(dir.path()).load().expect_err("base required");
        match error {
            LoadError::MissingBase { path } => assert!(path.ends_with("occupations.json")),
            other => panic!("expected missing base error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_base_dataset_is_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(dir.path(), "occupations.json", "{ not json");
        let error = SourceLoader::new(dir.path()).load().expect_err("malformed base");
        assert!(matches!(error, LoadError::Json { .. }));
    }

    #[test]
    fn optional_datasets_degrade_without_failing() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(
            dir.path(),
            "occupations.json",
            r#"[{"code": "15-1252.00", "title": "Software Developers"}]"#,
        );
        write(dir.path(), "videos.json", "[[[");
        write(dir.path(), "exposure_primary.json", r#"{"15-1252.00": 0.47}"#);

        let datasets = SourceLoader::new(dir.path()).load().expect("load succeeds");

        assert_eq!(datasets.base.len(), 1);
        assert_eq!(
            datasets
                .signals
                .primary_exposure
                .get("15-1252.00")
                .map(|entry| entry.score),
            Some(0.47)
        );
        assert!(datasets.overlays.videos.is_empty());
        assert_eq!(datasets.report.degraded(), vec!["videos"]);
        assert!(datasets.report.missing().contains(&"inside_look"));
        assert!(datasets.manual.is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped_and_counted() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(
            dir.path(),
            "occupations.json",
            r#"[
                {"code": "15-1252.00", "title": "Software Developers"},
                {"code": "not-a-code", "title": "Broken"},
                {"code": "29-1141.00"},
                {"code": "15-1252.00", "title": "Duplicate"}
            ]"#,
        );

        let datasets = SourceLoader::new(dir.path()).load().expect("load succeeds");

        assert_eq!(datasets.base.len(), 1);
        assert_eq!(datasets.base[0].title, "Software Developers");
        assert_eq!(
            datasets.report.status(DatasetKind::Occupations),
            Some(&DatasetStatus::Loaded {
                entries: 1,
                rejected: 3
            })
        );
    }

    #[test]
    fn malformed_optional_fields_keep_the_occupation() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(
            dir.path(),
            "occupations.json",
            r#"[
                {"code": "15-1252.00", "title": "Software Developers", "median_pay": 132270},
                {
                    "code": "29-1141.00",
                    "title": "Registered Nurses",
                    "median_pay": 86070.5,
                    "training": "two years",
                    "skills": ["Patient Care"],
                    "progression": [{"title": "Charge Nurse", "median_pay": "lots"}]
                },
                {"code": "43-9021.00", "title": "Data Entry Keyers", "median_pay": -5}
            ]"#,
        );

        let datasets = SourceLoader::new(dir.path()).load().expect("load succeeds");

        assert_eq!(datasets.base.len(), 3);
        let nurse = datasets
            .base
            .iter()
            .find(|occupation| occupation.code.as_str() == "29-1141.00")
            .expect("nurse kept");
        assert_eq!(nurse.median_pay, Some(86071));
        assert_eq!(nurse.training, None);
        assert_eq!(nurse.skills, vec!["Patient Care".to_string()]);
        assert!(nurse.progression.is_empty());

        let keyers = datasets
            .base
            .iter()
            .find(|occupation| occupation.code.as_str() == "43-9021.00")
            .expect("keyers kept");
        assert_eq!(keyers.median_pay, None);
        assert_eq!(
            datasets.report.status(DatasetKind::Occupations),
            Some(&DatasetStatus::Loaded {
                entries: 3,
                rejected: 0
            })
        );
    }

    #[test]
    fn csv_projections_load_by_code() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(
            dir.path(),
            "occupations.json",
            r#"{"15-1252.00": {"title": "Software Developers"}}"#,
        );
        write(
            dir.path(),
            "projections.csv",
            "code,percent_change,horizon\n15-1252.00,17.9,2023-2033\n",
        );

        let datasets = SourceLoader::new(dir.path()).load().expect("load succeeds");

        assert_eq!(datasets.base[0].code.as_str(), "15-1252.00");
        let growth = datasets
            .signals
            .projections
            .get("15-1252.00")
            .expect("projection present");
        assert_eq!(growth.percent_change, 17.9);
        assert_eq!(growth.horizon.as_deref(), Some("2023-2033"));
    }

    #[test]
    fn overlay_shapes_accept_bare_and_object_entries() {
        let skills: Dataset<CuratedSkills> = dataset_from_json(
            DatasetKind::CuratedSkills,
            r#"{"15-1252.00": ["Programming"], "nurse-navigator": {"skills": ["Triage"]}}"#,
        )
        .expect("skills parse");
        assert_eq!(skills.get("15-1252.00").map(|s| s.skills.len()), Some(1));
        assert_eq!(
            skills.get("nurse-navigator").map(|s| s.skills.clone()),
            Some(vec!["Triage".to_string()])
        );

        let risk: Dataset<LegacyRisk> = dataset_from_json(
            DatasetKind::LegacyRisk,
            r#"{"15-1252.00": 7.5, "29-1141.00": {"score": 2, "label": "Minimal"}}"#,
        )
        .expect("risk parse");
        assert_eq!(
            risk.get("15-1252.00").map(LegacyRisk::to_profile),
            Some(RiskProfile::Scalar {
                score: 7.5,
                label: "High".to_string()
            })
        );
        assert_eq!(
            risk.get("29-1141.00").map(|entry| entry.label.clone()),
            Some(Some("Minimal".to_string()))
        );
    }

    #[test]
    fn legacy_labels_follow_score_bands() {
        assert_eq!(legacy_label(0.0), "Low");
        assert_eq!(legacy_label(3.9), "Low");
        assert_eq!(legacy_label(4.0), "Moderate");
        assert_eq!(legacy_label(7.0), "High");
    }
}
