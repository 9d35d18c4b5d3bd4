use std::env;

use serde::{Deserialize, Serialize};

/// Tuning knobs for the fusion stage and the outcome/staking engine.
///
/// Passed explicitly into every entry point so a run is fully determined by
/// its arguments; nothing reads ambient globals at compute time. `from_env`
/// exists for the CLI so operators can override single knobs without a
/// config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantConfig {
    /// Goal counts modeled per side: 0..max_goals (exclusive cap).
    pub max_goals: u32,
    /// Minimum expectancy fed to the scoreline model. Anything the
    /// adjustments drive to zero or below is clamped up to this.
    pub xg_floor: f64,
    /// Multiplier slope per morale point away from the neutral 5.
    pub sentiment_slope: f64,
    /// Edge below or at this never produces a play.
    pub min_edge: f64,
    /// Edges are capped here before sizing; one noisy probability estimate
    /// must not translate into an outsized stake.
    pub edge_cap: f64,
    /// Fraction of full Kelly actually staked.
    pub kelly_fraction: f64,
    /// Hard per-play cap as a fraction of budget.
    pub exposure_ceiling: f64,
    /// Stricter cap applied once an edge looks speculative.
    pub speculative_ceiling: f64,
    /// Capped edge at or above this switches to the speculative ceiling.
    pub speculative_edge: f64,
    /// Capped edge at or above this is graded STRONG instead of VALUE.
    pub strong_edge: f64,
    /// Plays kept after ranking by edge.
    pub top_n: usize,
    /// Exact scorelines surfaced in the report.
    pub top_scorelines: usize,
}

impl Default for QuantConfig {
    fn default() -> Self {
        Self {
            max_goals: 10,
            xg_floor: 0.10,
            sentiment_slope: 0.04,
            min_edge: 0.05,
            edge_cap: 0.25,
            kelly_fraction: 0.25,
            exposure_ceiling: 0.05,
            speculative_ceiling: 0.02,
            speculative_edge: 0.18,
            strong_edge: 0.12,
            top_n: 3,
            top_scorelines: 5,
        }
    }
}

impl QuantConfig {
    /// Env overrides are clamped per knob, then reconciled across knobs:
    /// an operator can set any single variable without silently wedging the
    /// engine into a state where no play can ever qualify.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            max_goals: env_u32("QUANT_MAX_GOALS", d.max_goals, 4, 25),
            xg_floor: env_f64("QUANT_XG_FLOOR", d.xg_floor, 0.01, 0.50),
            sentiment_slope: env_f64("QUANT_SENTIMENT_SLOPE", d.sentiment_slope, 0.0, 0.10),
            min_edge: env_f64("QUANT_MIN_EDGE", d.min_edge, 0.0, 0.50),
            edge_cap: env_f64("QUANT_EDGE_CAP", d.edge_cap, 0.05, 1.00),
            kelly_fraction: env_f64("QUANT_KELLY_FRACTION", d.kelly_fraction, 0.05, 1.00),
            exposure_ceiling: env_f64("QUANT_EXPOSURE_CEILING", d.exposure_ceiling, 0.005, 0.25),
            speculative_ceiling: env_f64(
                "QUANT_SPECULATIVE_CEILING",
                d.speculative_ceiling,
                0.001,
                0.25,
            ),
            speculative_edge: env_f64("QUANT_SPECULATIVE_EDGE", d.speculative_edge, 0.05, 1.00),
            strong_edge: env_f64("QUANT_STRONG_EDGE", d.strong_edge, 0.0, 1.00),
            top_n: env_usize("QUANT_TOP_N", d.top_n, 1, 10),
            top_scorelines: env_usize("QUANT_TOP_SCORELINES", d.top_scorelines, 1, 20),
        }
        .reconciled()
    }

    /// Cross-field consistency. Precedence: `min_edge` is taken as intent
    /// and `edge_cap` is raised to meet it, so a qualifying edge is never
    /// capped below the threshold that admitted it; the speculative ceiling
    /// can only tighten the general one, never exceed it.
    fn reconciled(mut self) -> Self {
        if self.edge_cap < self.min_edge {
            self.edge_cap = self.min_edge;
        }
        if self.speculative_ceiling > self.exposure_ceiling {
            self.speculative_ceiling = self.exposure_ceiling;
        }
        self
    }
}

fn env_f64(key: &str, default: f64, lo: f64, hi: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(default)
        .clamp(lo, hi)
}

fn env_u32(key: &str, default: u32, lo: u32, hi: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
        .clamp(lo, hi)
}

fn env_usize(key: &str, default: usize, lo: usize, hi: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
        .clamp(lo, hi)
}
