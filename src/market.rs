use serde::{Deserialize, Serialize};

/// The three 1X2 outcomes a quote can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKey {
    Home,
    Draw,
    Away,
}

impl OutcomeKey {
    pub const ALL: [OutcomeKey; 3] = [OutcomeKey::Home, OutcomeKey::Draw, OutcomeKey::Away];

    pub fn label(self) -> &'static str {
        match self {
            OutcomeKey::Home => "HOME",
            OutcomeKey::Draw => "DRAW",
            OutcomeKey::Away => "AWAY",
        }
    }
}

/// One decimal price from one platform. A price at or below 1.0 can never
/// pay out more than the stake and is treated as "no market", not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    pub price: f64,
    pub platform: String,
}

impl MarketQuote {
    pub fn is_usable(&self) -> bool {
        self.price.is_finite() && self.price > 1.0
    }

    pub fn implied_prob(&self) -> Option<f64> {
        if self.is_usable() { Some(1.0 / self.price) } else { None }
    }
}

/// All quotes the orchestrator gathered for one fixture, keyed by outcome.
/// Any outcome may carry zero, one, or several platform quotes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketBoard {
    #[serde(default)]
    pub home: Vec<MarketQuote>,
    #[serde(default)]
    pub draw: Vec<MarketQuote>,
    #[serde(default)]
    pub away: Vec<MarketQuote>,
}

impl MarketBoard {
    pub fn quotes(&self, key: OutcomeKey) -> &[MarketQuote] {
        match key {
            OutcomeKey::Home => &self.home,
            OutcomeKey::Draw => &self.draw,
            OutcomeKey::Away => &self.away,
        }
    }

    /// Best (highest) usable price for an outcome, the one a bettor would
    /// actually take. Unusable quotes are skipped silently.
    pub fn best_quote(&self, key: OutcomeKey) -> Option<&MarketQuote> {
        self.quotes(key)
            .iter()
            .filter(|q| q.is_usable())
            .max_by(|a, b| {
                a.price
                    .partial_cmp(&b.price)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    pub fn has_any_usable(&self) -> bool {
        OutcomeKey::ALL.iter().any(|k| self.best_quote(*k).is_some())
    }

    /// Bookmaker margin implied by the best prices: sum of implied
    /// probabilities minus 1. Needs a usable quote on all three outcomes.
    /// Taking the best price per outcome means this can go slightly negative
    /// across platforms; that is real (an arb), not a bug.
    pub fn overround(&self) -> Option<f64> {
        let mut implied_sum = 0.0;
        for key in OutcomeKey::ALL {
            implied_sum += self.best_quote(key)?.implied_prob()?;
        }
        Some(implied_sum - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(price: f64, platform: &str) -> MarketQuote {
        MarketQuote {
            price,
            platform: platform.to_string(),
        }
    }

    #[test]
    fn prices_at_or_below_one_are_unusable() {
        assert!(!quote(1.0, "a").is_usable());
        assert!(!quote(0.95, "a").is_usable());
        assert!(!quote(f64::NAN, "a").is_usable());
        assert!(quote(1.01, "a").is_usable());
    }

    #[test]
    fn best_quote_takes_highest_usable_price() {
        let board = MarketBoard {
            home: vec![quote(2.05, "alpha"), quote(0.0, "junk"), quote(2.20, "beta")],
            ..MarketBoard::default()
        };
        let best = board.best_quote(OutcomeKey::Home).expect("usable quote");
        assert_eq!(best.platform, "beta");
        assert!(board.best_quote(OutcomeKey::Draw).is_none());
    }

    #[test]
    fn overround_needs_all_three_outcomes() {
        let mut board = MarketBoard {
            home: vec![quote(2.10, "a")],
            draw: vec![quote(3.40, "a")],
            away: vec![],
        };
        assert!(board.overround().is_none());

        board.away.push(quote(3.60, "a"));
        let over = board.overround().expect("full board");
        // 1/2.10 + 1/3.40 + 1/3.60 - 1 ~= 0.048
        assert!((over - 0.0481).abs() < 0.001);
    }
}
