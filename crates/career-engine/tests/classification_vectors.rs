use career_engine::occupations::domain::{EpochScores, GrowthRecord, HumanAdvantage};
use career_engine::occupations::scoring::{
    assess, resolve_exposure, ResilienceInputs, ResilienceTier,
};
use career_engine::occupations::ExposureSource;

fn advantage(scores: [u8; 5]) -> HumanAdvantage {
    let [empathy, presence, opinion, creativity, hope] = scores;
    let scores =
        EpochScores::new(empathy, presence, opinion, creativity, hope).expect("valid scores");
    HumanAdvantage::new(scores).expect("valid advantage")
}

fn classify_vector(beta: f64, growth: f64, epoch: [u8; 5]) -> (u8, ResilienceTier, String) {
    let inputs = ResilienceInputs {
        primary_exposure: Some(beta),
        growth: Some(GrowthRecord::from_percent(growth)),
        human_advantage: Some(advantage(epoch)),
        ..ResilienceInputs::default()
    };
    let classification = assess(&inputs).resilience.expect("classification present");
    (
        classification.result.total_score,
        classification.result.tier,
        classification.result.rationale,
    )
}

#[test]
fn resilient_profile() {
    let (total, tier, rationale) = classify_vector(0.04, 6.0, [5, 4, 4, 4, 4]);
    assert_eq!(total, 6);
    assert_eq!(tier, ResilienceTier::AiResilient);
    assert_eq!(
        rationale,
        "Score 6/6: low AI task exposure, growing employment outlook, strong human advantage"
    );
}

#[test]
fn transition_profile() {
    let (total, tier, rationale) = classify_vector(0.65, 4.0, [3, 3, 3, 3, 3]);
    assert_eq!(total, 2);
    assert_eq!(tier, ResilienceTier::InTransition);
    assert_eq!(rationale, "Score 2/6: high AI task exposure");
}

#[test]
fn disruption_profile() {
    let (total, tier, _) = classify_vector(0.90, -5.0, [2, 2, 2, 2, 2]);
    assert_eq!(total, 0);
    assert_eq!(tier, ResilienceTier::HighDisruptionRisk);
}

#[test]
fn upper_exposure_boundary_is_medium() {
    let (total, tier, rationale) = classify_vector(0.50, 4.0, [4, 3, 3, 3, 3]);
    assert_eq!(total, 3);
    assert_eq!(tier, ResilienceTier::AiAugmented);
    assert!(rationale.starts_with("Score 3/6: "));
    assert!(rationale.contains("balanced"));
}

#[test]
fn exposure_fallback_order() {
    let primary = resolve_exposure(Some(0.8), Some(0.2), 0.1);
    assert_eq!(primary.source, ExposureSource::Primary);
    assert_eq!(primary.value, 0.8);

    let secondary = resolve_exposure(None, Some(2.5), 0.1);
    assert_eq!(secondary.source, ExposureSource::Secondary);
    assert_eq!(secondary.value, 1.0);

    let estimate = resolve_exposure(None, None, 0.3);
    assert_eq!(estimate.source, ExposureSource::EditorialEstimate);
    assert_eq!(estimate.value, 0.3);
}
