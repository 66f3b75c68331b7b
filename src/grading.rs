use crate::models::{ComponentScores, EvaluationResult, Remark, TierClass};

pub const MAX_SCORE: f64 = 100.0;

/// Prelim, midterm, pre-finals, finals.
pub const WEIGHTS: [f64; 4] = [0.20, 0.20, 0.20, 0.40];

#[derive(Debug, Clone, Copy)]
pub struct Tier {
    pub min: f64,
    pub max: f64,
    pub gwa: f64,
    pub remark: Remark,
    pub class: TierClass,
}

const fn tier(min: f64, max: f64, gwa: f64, remark: Remark, class: TierClass) -> Tier {
    Tier {
        min,
        max,
        gwa,
        remark,
        class,
    }
}

/// Scanned in order, bounds inclusive. First match wins.
pub const TIERS: [Tier; 10] = [
    tier(97.50, 100.0, 1.00, Remark::Excellent, TierClass::Excellent),
    tier(94.50, 97.49, 1.25, Remark::VeryGood, TierClass::VeryGood),
    tier(91.50, 94.49, 1.50, Remark::VeryGood, TierClass::VeryGood),
    tier(86.50, 91.49, 1.75, Remark::VeryGood, TierClass::VeryGood),
    tier(81.50, 86.49, 2.00, Remark::Satisfactory, TierClass::Satisfactory),
    tier(76.00, 81.49, 2.25, Remark::Satisfactory, TierClass::Satisfactory),
    tier(70.50, 75.99, 2.50, Remark::Satisfactory, TierClass::Satisfactory),
    tier(65.00, 70.49, 2.75, Remark::Fair, TierClass::Fair),
    tier(59.50, 64.99, 3.00, Remark::Fair, TierClass::Fair),
    tier(0.00, 59.49, 5.00, Remark::Failed, TierClass::Failed),
];

const FALLBACK_GWA: f64 = 5.00;

/// Clamps a raw score into `[0, 100]`. NaN becomes 0.
pub fn normalize(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, MAX_SCORE)
}

/// Parses user-entered text. Anything unparseable comes back as NaN and
/// normalizes to 0.
pub fn parse_score(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn classify(average: f64) -> Option<&'static Tier> {
    TIERS
        .iter()
        .find(|tier| average >= tier.min && average <= tier.max)
}

pub fn weighted_average(scores: &ComponentScores) -> f64 {
    scores.prelim * WEIGHTS[0]
        + scores.midterm * WEIGHTS[1]
        + scores.pre_finals * WEIGHTS[2]
        + scores.finals * WEIGHTS[3]
}

pub fn evaluate(prelim: f64, midterm: f64, pre_finals: f64, finals: f64) -> EvaluationResult {
    let scores = ComponentScores {
        prelim: normalize(prelim),
        midterm: normalize(midterm),
        pre_finals: normalize(pre_finals),
        finals: normalize(finals),
    };

    let average = weighted_average(&scores).min(MAX_SCORE);

    let (gwa, remark, class) = match classify(average) {
        Some(tier) => (tier.gwa, tier.remark, tier.class),
        None => {
            tracing::warn!(average, "average matched no grade tier");
            (FALLBACK_GWA, Remark::NoGrade, TierClass::Neutral)
        }
    };

    EvaluationResult::new(scores, round2(average), format!("{gwa:.2}"), remark, class)
}
