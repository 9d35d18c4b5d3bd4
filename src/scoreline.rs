use serde::{Deserialize, Serialize};

use crate::signals::GoalExpectancy;

/// Match outcome probabilities, normalized to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbs {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OutcomeProbs {
    pub fn uniform() -> Self {
        Self {
            home: 1.0 / 3.0,
            draw: 1.0 / 3.0,
            away: 1.0 / 3.0,
        }
    }
}

/// One exact scoreline with its joint probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorelinePick {
    pub home_goals: u32,
    pub away_goals: u32,
    pub prob: f64,
}

/// Joint probability grid over (home_goals, away_goals), both in
/// 0..max_goals. Goals per side are modeled as independent Poisson counts,
/// so the grid is the outer product of the two marginal pmfs. Mass beyond
/// the cap is discarded; for realistic expectancies (lambda < 4) that
/// residual is below 0.1%.
///
/// Deliberately not Dixon-Coles: there is no low-score correlation term.
#[derive(Debug, Clone)]
pub struct ScorelineMatrix {
    max_goals: usize,
    // Row-major, home goals on rows.
    cells: Vec<f64>,
}

impl ScorelineMatrix {
    pub fn from_expectancy(xg: GoalExpectancy, max_goals: u32) -> Self {
        let max_goals = max_goals.max(1) as usize;
        let pmf_home = poisson_pmf(xg.xg_home, max_goals);
        let pmf_away = poisson_pmf(xg.xg_away, max_goals);

        let mut cells = vec![0.0; max_goals * max_goals];
        for (h, p_h) in pmf_home.iter().enumerate() {
            for (a, p_a) in pmf_away.iter().enumerate() {
                cells[h * max_goals + a] = p_h * p_a;
            }
        }

        Self { max_goals, cells }
    }

    pub fn max_goals(&self) -> usize {
        self.max_goals
    }

    pub fn prob(&self, home_goals: usize, away_goals: usize) -> f64 {
        if home_goals >= self.max_goals || away_goals >= self.max_goals {
            return 0.0;
        }
        self.cells[home_goals * self.max_goals + away_goals]
    }

    /// Total mass kept inside the cap: ~1.0 minus the truncation residual.
    pub fn total_mass(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Partition the grid into the three match outcomes: lower triangle is a
    /// home win, the diagonal a draw, upper triangle an away win. Normalized
    /// so the truncation residual and float drift cannot leak into callers.
    pub fn outcome_probs(&self) -> OutcomeProbs {
        let mut home = 0.0;
        let mut draw = 0.0;
        let mut away = 0.0;

        for h in 0..self.max_goals {
            for a in 0..self.max_goals {
                let p = self.cells[h * self.max_goals + a];
                if h > a {
                    home += p;
                } else if h < a {
                    away += p;
                } else {
                    draw += p;
                }
            }
        }

        let sum = home + draw + away;
        if sum > 0.0 {
            OutcomeProbs {
                home: home / sum,
                draw: draw / sum,
                away: away / sum,
            }
        } else {
            OutcomeProbs::uniform()
        }
    }

    /// The `n` most likely exact scorelines, highest probability first.
    pub fn most_likely(&self, n: usize) -> Vec<ScorelinePick> {
        let mut picks: Vec<ScorelinePick> = Vec::with_capacity(self.cells.len());
        for h in 0..self.max_goals {
            for a in 0..self.max_goals {
                picks.push(ScorelinePick {
                    home_goals: h as u32,
                    away_goals: a as u32,
                    prob: self.cells[h * self.max_goals + a],
                });
            }
        }
        picks.sort_by(|x, y| y.prob.partial_cmp(&x.prob).unwrap_or(std::cmp::Ordering::Equal));
        picks.truncate(n);
        picks
    }
}

/// Poisson pmf over 0..max_goals via the multiplicative recurrence
/// P(k) = P(k-1) * lambda / k, anchored at P(0) = e^(-lambda). Tail mass
/// past the cap is dropped, not folded back in.
fn poisson_pmf(lambda: f64, max_goals: usize) -> Vec<f64> {
    let lambda = lambda.max(0.0);
    let mut out = vec![0.0; max_goals];
    if max_goals == 0 {
        return out;
    }
    out[0] = (-lambda).exp();
    for k in 1..max_goals {
        out[k] = out[k - 1] * lambda / k as f64;
    }
    out
}
