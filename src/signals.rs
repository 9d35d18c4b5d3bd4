use serde::{Deserialize, Serialize};

use crate::quant_config::QuantConfig;

/// Which side the travel/fatigue penalty applies to. The orchestrator decides
/// this from travel direction; the fusion stage never assumes a side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltySide {
    Home,
    Away,
    #[default]
    Neither,
}

/// Final per-side goal expectancy after all adjustments. Immutable once
/// handed to the outcome engine; both values are strictly positive because
/// construction goes through the floor clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalExpectancy {
    pub xg_home: f64,
    pub xg_away: f64,
}

impl GoalExpectancy {
    pub fn floored(xg_home: f64, xg_away: f64, floor: f64) -> Self {
        let floor = floor.max(f64::EPSILON);
        Self {
            xg_home: if xg_home.is_finite() { xg_home.max(floor) } else { floor },
            xg_away: if xg_away.is_finite() { xg_away.max(floor) } else { floor },
        }
    }
}

/// Inputs to the fusion stage. Missing upstream signals are the caller's
/// problem: it supplies neutral values (multiplier 1.0, penalty 1.0) rather
/// than this stage inventing defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FusionInputs {
    pub base_xg_home: f64,
    pub base_xg_away: f64,
    /// Travel/altitude/rest penalty in (0, 1]; 1.0 means no penalty.
    pub fatigue_penalty: f64,
    pub penalty_side: PenaltySide,
    pub sentiment_mult_home: f64,
    pub sentiment_mult_away: f64,
}

/// Maps a 0-10 morale score onto a multiplicative adjustment centered so a
/// neutral 5 leaves the expectancy untouched. With the default slope the
/// range works out to [0.8, 1.2].
pub fn sentiment_multiplier(score: f64, slope: f64) -> f64 {
    let score = if score.is_finite() { score.clamp(0.0, 10.0) } else { 5.0 };
    1.0 + (score - 5.0) * slope
}

/// Signal fusion: baseline expectancies scaled by sentiment, with the fatigue
/// penalty applied to whichever side the caller tagged as disadvantaged.
/// Pure arithmetic; the only correction is the positive floor on the output.
pub fn compute_final_expectancy(inputs: &FusionInputs, cfg: &QuantConfig) -> GoalExpectancy {
    let (fatigue_home, fatigue_away) = match inputs.penalty_side {
        PenaltySide::Home => (inputs.fatigue_penalty, 1.0),
        PenaltySide::Away => (1.0, inputs.fatigue_penalty),
        PenaltySide::Neither => (1.0, 1.0),
    };

    GoalExpectancy::floored(
        inputs.base_xg_home * inputs.sentiment_mult_home * fatigue_home,
        inputs.base_xg_away * inputs.sentiment_mult_away * fatigue_away,
        cfg.xg_floor,
    )
}
