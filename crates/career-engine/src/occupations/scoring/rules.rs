use serde::{Deserialize, Serialize};

/// Below this the exposure is low; the boundary itself is medium.
pub const LOW_EXPOSURE_BELOW: f64 = 0.25;
/// Above this the exposure is high; the boundary itself is medium.
pub const HIGH_EXPOSURE_ABOVE: f64 = 0.50;
/// Growth strictly above this percentage counts as growing.
pub const GROWING_ABOVE: f64 = 5.0;
/// Growth strictly below this percentage counts as declining.
pub const DECLINING_BELOW: f64 = 0.0;
pub const STRONG_ADVANTAGE_FROM: u8 = 20;
pub const MODERATE_ADVANTAGE_FROM: u8 = 12;

/// A three-level ordinal outcome of one dimension scorer.
pub trait DimensionLevel: Copy {
    fn points(self) -> u8;
    fn label(self) -> &'static str;
    /// Rationale phrase; only the two extreme levels carry one.
    fn phrase(self) -> Option<&'static str>;
    /// Level assumed when the dimension's input is missing.
    fn neutral() -> Self;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExposureLevel {
    Low,
    Medium,
    High,
}

impl ExposureLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Medium, Self::High]
    }
}

impl DimensionLevel for ExposureLevel {
    fn points(self) -> u8 {
        match self {
            Self::Low => 2,
            Self::Medium => 1,
            Self::High => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    fn phrase(self) -> Option<&'static str> {
        match self {
            Self::Low => Some("low AI task exposure"),
            Self::Medium => None,
            Self::High => Some("high AI task exposure"),
        }
    }

    fn neutral() -> Self {
        Self::Medium
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthTrend {
    Growing,
    Stable,
    Declining,
}

impl GrowthTrend {
    pub const fn ordered() -> [Self; 3] {
        [Self::Growing, Self::Stable, Self::Declining]
    }
}

impl DimensionLevel for GrowthTrend {
    fn points(self) -> u8 {
        match self {
            Self::Growing => 2,
            Self::Stable => 1,
            Self::Declining => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Growing => "Growing",
            Self::Stable => "Stable",
            Self::Declining => "Declining",
        }
    }

    fn phrase(self) -> Option<&'static str> {
        match self {
            Self::Growing => Some("growing employment outlook"),
            Self::Stable => None,
            Self::Declining => Some("declining employment outlook"),
        }
    }

    fn neutral() -> Self {
        Self::Stable
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdvantageLevel {
    Strong,
    Moderate,
    Weak,
}

impl AdvantageLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Strong, Self::Moderate, Self::Weak]
    }
}

impl DimensionLevel for AdvantageLevel {
    fn points(self) -> u8 {
        match self {
            Self::Strong => 2,
            Self::Moderate => 1,
            Self::Weak => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
        }
    }

    fn phrase(self) -> Option<&'static str> {
        match self {
            Self::Strong => Some("strong human advantage"),
            Self::Moderate => None,
            Self::Weak => Some("weak human advantage"),
        }
    }

    fn neutral() -> Self {
        Self::Moderate
    }
}

/// `{points, label}` produced once per dimension and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScore<L> {
    pub points: u8,
    pub label: L,
}

impl<L: DimensionLevel> DimensionScore<L> {
    pub fn new(level: L) -> Self {
        Self {
            points: level.points(),
            label: level,
        }
    }
}

/// Lower exposure earns more points.
pub fn score_exposure(beta: f64) -> DimensionScore<ExposureLevel> {
    let level = if beta < LOW_EXPOSURE_BELOW {
        ExposureLevel::Low
    } else if beta <= HIGH_EXPOSURE_ABOVE {
        ExposureLevel::Medium
    } else {
        ExposureLevel::High
    };
    DimensionScore::new(level)
}

pub fn score_growth(percent_change: f64) -> DimensionScore<GrowthTrend> {
    let level = if percent_change > GROWING_ABOVE {
        GrowthTrend::Growing
    } else if percent_change >= DECLINING_BELOW {
        GrowthTrend::Stable
    } else {
        GrowthTrend::Declining
    };
    DimensionScore::new(level)
}

pub fn score_human_advantage(epoch_sum: u8) -> DimensionScore<AdvantageLevel> {
    let level = if epoch_sum >= STRONG_ADVANTAGE_FROM {
        AdvantageLevel::Strong
    } else if epoch_sum >= MODERATE_ADVANTAGE_FROM {
        AdvantageLevel::Moderate
    } else {
        AdvantageLevel::Weak
    };
    DimensionScore::new(level)
}
