use crate::occupations::domain::{ExposureRecord, ExposureSource};

/// Calibration divisor mapping the secondary source's wider scale onto [0, 1].
pub const SECONDARY_SCALE: f64 = 2.5;
/// The legacy risk score runs 0..=10.
pub const LEGACY_RISK_SCALE: f64 = 10.0;

/// Picks the canonical exposure: primary, else rescaled secondary, else the caller's estimate.
///
/// Non-finite inputs count as absent. Every path clamps into [0, 1].
pub fn resolve(primary: Option<f64>, secondary: Option<f64>, estimate: f64) -> ExposureRecord {
    if let Some(raw) = primary.filter(|value| value.is_finite()) {
        return ExposureRecord {
            value: raw.clamp(0.0, 1.0),
            raw,
            nominal_max: 1.0,
            source: ExposureSource::Primary,
        };
    }

    if let Some(raw) = secondary.filter(|value| value.is_finite()) {
        return ExposureRecord {
            value: (raw / SECONDARY_SCALE).clamp(0.0, 1.0),
            raw,
            nominal_max: SECONDARY_SCALE,
            source: ExposureSource::Secondary,
        };
    }

    let raw = if estimate.is_finite() { estimate } else { 0.0 };
    ExposureRecord {
        value: raw.clamp(0.0, 1.0),
        raw,
        nominal_max: 1.0,
        source: ExposureSource::EditorialEstimate,
    }
}

/// Editorial exposure estimate derived from a legacy 0..=10 risk score.
pub fn editorial_estimate(legacy_score: f64) -> f64 {
    legacy_score / LEGACY_RISK_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_wins_regardless_of_values() {
        let record = resolve(Some(0.9), Some(0.1), 0.0);
        assert_eq!(record.source, ExposureSource::Primary);
        assert_eq!(record.value, 0.9);

        let record = resolve(Some(0.0), Some(2.4), 0.7);
        assert_eq!(record.source, ExposureSource::Primary);
        assert_eq!(record.value, 0.0);
    }

    #[test]
    fn secondary_is_rescaled_and_clamped() {
        let record = resolve(None, Some(2.5), 0.0);
        assert_eq!(record.source, ExposureSource::Secondary);
        assert_eq!(record.value, 1.0);

        let record = resolve(None, Some(3.4), 0.0);
        assert_eq!(record.value, 1.0);
        assert_eq!(record.raw, 3.4);

        let record = resolve(None, Some(1.0), 0.0);
        assert!((record.value - 0.4).abs() < 1e-12);
        assert_eq!(record.nominal_max, SECONDARY_SCALE);
    }

    #[test]
    fn falls_through_to_editorial_estimate() {
        let record = resolve(None, None, editorial_estimate(6.0));
        assert_eq!(record.source, ExposureSource::EditorialEstimate);
        assert!((record.value - 0.6).abs() < 1e-12);
    }

    #[test]
    fn non_finite_sources_are_skipped() {
        let record = resolve(Some(f64::NAN), Some(1.25), 0.0);
        assert_eq!(record.source, ExposureSource::Secondary);
        assert_eq!(record.value, 0.5);

        let record = resolve(None, Some(f64::INFINITY), f64::NAN);
        assert_eq!(record.source, ExposureSource::EditorialEstimate);
        assert_eq!(record.value, 0.0);
    }
}
