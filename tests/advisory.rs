use pitchquant::engine::{AnalysisRequest, analyze_request, run_outcome_engine};
use pitchquant::market::{MarketBoard, MarketQuote, OutcomeKey};
use pitchquant::quant_config::QuantConfig;
use pitchquant::signals::GoalExpectancy;

fn quote(price: f64, platform: &str) -> MarketQuote {
    MarketQuote {
        price,
        platform: platform.to_string(),
    }
}

#[test]
fn full_request_from_json_produces_ranked_advice() {
    let raw = r#"{
        "fixture": "River Plate vs Bolivar",
        "base_xg_home": 1.9,
        "base_xg_away": 1.1,
        "fatigue_penalty": 0.88,
        "penalty_side": "away",
        "morale_home": 7.0,
        "morale_away": 4.0,
        "market": {
            "home": [
                {"price": 1.95, "platform": "betalpha"},
                {"price": 2.02, "platform": "betbeta"}
            ],
            "draw": [{"price": 3.60, "platform": "betalpha"}],
            "away": [{"price": 4.80, "platform": "betbeta"}]
        },
        "budget": 2000.0
    }"#;

    let req: AnalysisRequest = serde_json::from_str(raw).expect("valid request json");
    let cfg = QuantConfig::default();
    let report = analyze_request(&req, &cfg).expect("analysis runs");

    // Fusion: home boosted by morale, away dampened by morale and fatigue.
    assert!(report.expectancy.xg_home > 1.9);
    assert!(report.expectancy.xg_away < 1.1);

    let sum = report.probabilities.home + report.probabilities.draw + report.probabilities.away;
    assert!((sum - 100.0).abs() < 1e-9);
    assert!(report.probabilities.home > report.probabilities.away);

    assert!(report.top_plays.len() <= cfg.top_n);
    for pair in report.top_plays.windows(2) {
        assert!(pair[0].edge_pct >= pair[1].edge_pct);
    }
    for play in &report.top_plays {
        assert!(play.edge_pct > cfg.min_edge * 100.0);
        assert!(play.stake >= 0.0);
        assert!(play.stake <= req.budget * cfg.exposure_ceiling);
        // Best-price selection: any home play must come from the better book.
        if play.outcome == OutcomeKey::Home {
            assert_eq!(play.platform, "betbeta");
        }
    }
}

#[test]
fn minimal_request_uses_neutral_defaults() {
    // Only the mandatory fields; everything else defaults to neutral.
    let raw = r#"{"base_xg_home": 1.3, "base_xg_away": 1.3, "budget": 100.0}"#;
    let req: AnalysisRequest = serde_json::from_str(raw).expect("valid request json");
    assert_eq!(req.fatigue_penalty, 1.0);
    assert_eq!(req.morale_home, 5.0);

    let report = analyze_request(&req, &QuantConfig::default()).expect("analysis runs");
    // Symmetric expectancies: the model cannot prefer a side.
    assert!((report.probabilities.home - report.probabilities.away).abs() < 0.02);
    assert!(report.top_plays.is_empty());
}

#[test]
fn no_market_data_is_a_clean_result() {
    let cfg = QuantConfig::default();
    let report = run_outcome_engine(
        GoalExpectancy { xg_home: 1.55, xg_away: 1.15 },
        &MarketBoard::default(),
        400.0,
        &cfg,
    )
    .expect("engine runs without quotes");

    assert!(report.top_plays.is_empty());
    assert!(report.overround_pct.is_none());
    assert!(report.probabilities.draw > 20.0 && report.probabilities.draw < 32.0);
}

#[test]
fn stake_bound_holds_across_an_input_grid() {
    let cfg = QuantConfig::default();
    let budget = 1000.0;
    let board = MarketBoard {
        home: vec![quote(2.8, "a")],
        draw: vec![quote(3.9, "a")],
        away: vec![quote(5.5, "a")],
    };

    for hx in 1..=8 {
        for ax in 1..=8 {
            let xg = GoalExpectancy {
                xg_home: hx as f64 * 0.45,
                xg_away: ax as f64 * 0.45,
            };
            let report = run_outcome_engine(xg, &board, budget, &cfg).expect("engine runs");
            for play in &report.top_plays {
                assert!(play.stake >= 0.0);
                assert!(play.stake <= budget * cfg.exposure_ceiling);
                assert!(play.edge_pct > cfg.min_edge * 100.0);
            }
        }
    }
}

#[test]
fn report_round_trips_through_json() {
    let cfg = QuantConfig::default();
    let board = MarketBoard {
        home: vec![quote(2.4, "a")],
        draw: vec![quote(3.5, "a")],
        away: vec![quote(3.8, "a")],
    };
    let report = run_outcome_engine(
        GoalExpectancy { xg_home: 1.7, xg_away: 1.2 },
        &board,
        800.0,
        &cfg,
    )
    .expect("engine runs");

    let json = serde_json::to_string(&report).expect("serializes");
    let back: pitchquant::engine::AnalysisReport =
        serde_json::from_str(&json).expect("deserializes");
    assert_eq!(back.probabilities, report.probabilities);
    assert_eq!(back.top_plays, report.top_plays);
}
