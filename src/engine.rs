use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::market::{MarketBoard, MarketQuote, OutcomeKey};
use crate::quant_config::QuantConfig;
use crate::scoreline::{OutcomeProbs, ScorelineMatrix, ScorelinePick};
use crate::signals::{
    FusionInputs, GoalExpectancy, PenaltySide, compute_final_expectancy, sentiment_multiplier,
};

/// Coarse quality grade for a play. Presentational only; nothing downstream
/// branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayTier {
    Strong,
    Value,
}

/// One recommended bet, already sized and capped. A report artifact, not a
/// live order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuePlay {
    pub outcome: OutcomeKey,
    pub platform: String,
    pub price: f64,
    /// Model probability in percent, 2 decimals.
    pub model_prob_pct: f64,
    /// Capped edge in percent, 2 decimals.
    pub edge_pct: f64,
    /// Recommended stake in currency units, 2 decimals.
    pub stake: f64,
    pub tier: PlayTier,
}

/// Outcome probabilities as display percentages. Rounded to 2 decimals and
/// renormalized so the three always add up to exactly 100.00; the rounding
/// residue goes into draw where it is least visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomePcts {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OutcomePcts {
    fn from_probs(p: OutcomeProbs) -> Self {
        let mut home = round2(p.home * 100.0);
        let mut away = round2(p.away * 100.0);
        let mut draw = round2(100.0 - home - away);
        if draw < 0.0 {
            // Rounding pushed home + away past 100; take the overshoot out
            // of the larger side instead of reporting a negative draw.
            if home >= away {
                home = round2(home + draw);
            } else {
                away = round2(away + draw);
            }
            draw = 0.0;
        }
        Self { home, draw, away }
    }
}

/// Full result of one engine run. A pure function of the inputs: identical
/// inputs serialize to identical bytes. Timestamping is a delivery concern
/// and happens where the report leaves the process, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub expectancy: GoalExpectancy,
    pub probabilities: OutcomePcts,
    /// Bookmaker margin on the best prices, in percent. None when any
    /// outcome lacks a usable quote.
    pub overround_pct: Option<f64>,
    pub top_scorelines: Vec<ScorelinePick>,
    /// Empty when nothing clears the minimum edge or no market exists.
    /// That is a legitimate result, not an error.
    pub top_plays: Vec<ValuePlay>,
}

/// One analysis request as the orchestrator hands it over: tactical baseline
/// expectancies plus the raw fatigue/morale signals and whatever market
/// quotes were gathered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub fixture: String,
    pub base_xg_home: f64,
    pub base_xg_away: f64,
    #[serde(default = "default_penalty")]
    pub fatigue_penalty: f64,
    #[serde(default)]
    pub penalty_side: PenaltySide,
    /// Morale/sentiment scores on a 0-10 scale, 5 = neutral.
    #[serde(default = "default_morale")]
    pub morale_home: f64,
    #[serde(default = "default_morale")]
    pub morale_away: f64,
    #[serde(default)]
    pub market: MarketBoard,
    pub budget: f64,
}

fn default_penalty() -> f64 {
    1.0
}

fn default_morale() -> f64 {
    5.0
}

/// Fusion plus engine in one call, for the CLI and for callers that start
/// from raw signals instead of fused expectancies.
pub fn analyze_request(req: &AnalysisRequest, cfg: &QuantConfig) -> anyhow::Result<AnalysisReport> {
    let inputs = FusionInputs {
        base_xg_home: req.base_xg_home,
        base_xg_away: req.base_xg_away,
        fatigue_penalty: req.fatigue_penalty,
        penalty_side: req.penalty_side,
        sentiment_mult_home: sentiment_multiplier(req.morale_home, cfg.sentiment_slope),
        sentiment_mult_away: sentiment_multiplier(req.morale_away, cfg.sentiment_slope),
    };
    let xg = compute_final_expectancy(&inputs, cfg);
    run_outcome_engine(xg, &req.market, req.budget, cfg)
}

/// The probability-to-stake pipeline: scoreline matrix, outcome aggregation,
/// edge detection against the best market prices, fractional-Kelly sizing
/// with exposure caps, then ranking.
///
/// Business edge cases (no quotes, no qualifying edge, zero budget) all
/// produce a well-formed report. The only rejection is a structurally
/// invalid budget, which would otherwise turn into a nonsense stake.
pub fn run_outcome_engine(
    xg: GoalExpectancy,
    market: &MarketBoard,
    budget: f64,
    cfg: &QuantConfig,
) -> anyhow::Result<AnalysisReport> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(anyhow::anyhow!(
            "budget must be a finite non-negative amount, got {budget}"
        ));
    }

    // Defensive re-clamp: callers are supposed to come through the fusion
    // stage, but the engine is also a public entry point.
    let xg = GoalExpectancy::floored(xg.xg_home, xg.xg_away, cfg.xg_floor);

    let matrix = ScorelineMatrix::from_expectancy(xg, cfg.max_goals);
    let probs = matrix.outcome_probs();

    let mut plays: Vec<ValuePlay> = Vec::new();
    for key in OutcomeKey::ALL {
        let Some(quote) = market.best_quote(key) else {
            continue;
        };
        let p = match key {
            OutcomeKey::Home => probs.home,
            OutcomeKey::Draw => probs.draw,
            OutcomeKey::Away => probs.away,
        };
        if let Some(play) = size_play(key, quote, p, budget, cfg) {
            plays.push(play);
        }
    }

    plays.sort_by(|a, b| b.edge_pct.partial_cmp(&a.edge_pct).unwrap_or(Ordering::Equal));
    plays.truncate(cfg.top_n);

    Ok(AnalysisReport {
        expectancy: xg,
        probabilities: OutcomePcts::from_probs(probs),
        overround_pct: market.overround().map(|o| round2(o * 100.0)),
        top_scorelines: matrix.most_likely(cfg.top_scorelines),
        top_plays: plays,
    })
}

/// Edge check and stake sizing for a single outcome. Returns None when the
/// outcome is unplayable or the edge does not clear the minimum.
fn size_play(
    outcome: OutcomeKey,
    quote: &MarketQuote,
    true_prob: f64,
    budget: f64,
    cfg: &QuantConfig,
) -> Option<ValuePlay> {
    let price = quote.price;
    if !quote.is_usable() {
        return None;
    }

    // Expected value per unit staked at this price.
    let edge = true_prob * price - 1.0;
    if edge <= cfg.min_edge {
        return None;
    }

    // Cap the edge before sizing: a huge estimated edge is far more likely
    // a mis-estimated probability than free money.
    let edge = edge.min(cfg.edge_cap);
    let sizing_prob = ((1.0 + edge) / price).min(1.0);

    let net_odds = price - 1.0;
    if net_odds <= 0.0 {
        // price == 1.0 slips past is_usable only through float edge cases;
        // never divide by it.
        return None;
    }

    let full_kelly = (net_odds * sizing_prob - (1.0 - sizing_prob)) / net_odds;
    let fractional = full_kelly.max(0.0) * cfg.kelly_fraction;

    let ceiling = if edge >= cfg.speculative_edge {
        cfg.speculative_ceiling
    } else {
        cfg.exposure_ceiling
    };
    // Floor to cents: rounding must never lift a stake above its ceiling.
    let stake = floor2(budget * fractional.clamp(0.0, ceiling));

    let tier = if edge >= cfg.strong_edge {
        PlayTier::Strong
    } else {
        PlayTier::Value
    };

    Some(ValuePlay {
        outcome,
        platform: quote.platform.clone(),
        price,
        model_prob_pct: round2(true_prob * 100.0),
        edge_pct: round2(edge * 100.0),
        stake,
        tier,
    })
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn floor2(v: f64) -> f64 {
    (v * 100.0).floor() / 100.0
}
