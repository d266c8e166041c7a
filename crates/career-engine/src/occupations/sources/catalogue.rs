use std::path::{Path, PathBuf};

/// Every dataset the loader knows about, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetKind {
    Occupations,
    PrimaryExposure,
    SecondaryExposure,
    Projections,
    EpochScores,
    CuratedSkills,
    LegacyRisk,
    Videos,
    InsideLook,
    ManualOccupations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DocumentFormat {
    Json,
    Csv,
}

impl DatasetKind {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Occupations,
            Self::PrimaryExposure,
            Self::SecondaryExposure,
            Self::Projections,
            Self::EpochScores,
            Self::CuratedSkills,
            Self::LegacyRisk,
            Self::Videos,
            Self::InsideLook,
            Self::ManualOccupations,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Occupations => "occupations",
            Self::PrimaryExposure => "exposure_primary",
            Self::SecondaryExposure => "exposure_secondary",
            Self::Projections => "projections",
            Self::EpochScores => "epoch_scores",
            Self::CuratedSkills => "curated_skills",
            Self::LegacyRisk => "ai_risk",
            Self::Videos => "videos",
            Self::InsideLook => "inside_look",
            Self::ManualOccupations => "manual_occupations",
        }
    }

    pub const fn required(self) -> bool {
        matches!(self, Self::Occupations)
    }

    const fn accepts_csv(self) -> bool {
        matches!(
            self,
            Self::PrimaryExposure | Self::SecondaryExposure | Self::Projections
        )
    }

    /// Fields consulted, in order, for the join key of list-shaped documents.
    pub(crate) const fn key_fields(self) -> &'static [&'static str] {
        match self {
            Self::ManualOccupations => &["slug"],
            Self::CuratedSkills | Self::LegacyRisk => &["code", "onet_code", "slug"],
            Self::Videos | Self::InsideLook => &["soc_code", "code"],
            _ => &["code", "onet_code", "soc_code"],
        }
    }

    /// Finds the dataset file under `data_dir`, preferring JSON over CSV.
    pub(crate) fn locate(self, data_dir: &Path) -> Option<(PathBuf, DocumentFormat)> {
        let json = data_dir.join(format!("{}.json", self.label()));
        if json.is_file() {
            return Some((json, DocumentFormat::Json));
        }

        if self.accepts_csv() {
            let csv = data_dir.join(format!("{}.csv", self.label()));
            if csv.is_file() {
                return Some((csv, DocumentFormat::Csv));
            }
        }

        None
    }

    pub(crate) fn expected_path(self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}.json", self.label()))
    }
}
