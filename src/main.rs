use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use pitchquant::engine::{AnalysisReport, AnalysisRequest, analyze_request};
use pitchquant::quant_config::QuantConfig;

/// The engine report is pure and carries no clock; the delivery timestamp is
/// attached here, where the result leaves the process.
#[derive(Debug, Serialize)]
struct DeliveredReport<'a> {
    generated_at_unix: i64,
    #[serde(flatten)]
    report: &'a AnalysisReport,
}

// Thin orchestrator stand-in: load one analysis request, run the quant core,
// print the advice. Network signal gathering and chat delivery happen
// elsewhere; this binary is for manual runs and tuning iterations.
fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let mut as_json = false;
    let mut path: Option<PathBuf> = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => as_json = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => path = Some(PathBuf::from(other)),
        }
    }

    let raw = match path {
        Some(p) if p.as_os_str() != "-" => {
            fs::read_to_string(&p).with_context(|| format!("reading request {}", p.display()))?
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading request from stdin")?;
            buf
        }
    };

    let req: AnalysisRequest = serde_json::from_str(&raw).context("invalid request json")?;
    let cfg = QuantConfig::from_env();
    let report = analyze_request(&req, &cfg)?;

    if as_json {
        let delivered = DeliveredReport {
            generated_at_unix: Utc::now().timestamp(),
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&delivered)?);
    } else {
        print_report(&req, &report);
    }
    Ok(())
}

fn print_usage() {
    println!("usage: pitchquant [--json] [REQUEST.json | -]");
    println!("reads an analysis request as JSON (stdin when no path or '-')");
    println!("engine knobs can be overridden via QUANT_* env vars or .env");
}

fn print_report(req: &AnalysisRequest, report: &AnalysisReport) {
    if !req.fixture.is_empty() {
        println!("Fixture: {}", req.fixture);
    }
    println!(
        "Final xG: home {:.2}, away {:.2}",
        report.expectancy.xg_home, report.expectancy.xg_away
    );
    println!("Home: {:.2}%", report.probabilities.home);
    println!("Draw: {:.2}%", report.probabilities.draw);
    println!("Away: {:.2}%", report.probabilities.away);
    if let Some(over) = report.overround_pct {
        println!("Market overround: {over:.2}%");
    }

    if !report.top_scorelines.is_empty() {
        let lines: Vec<String> = report
            .top_scorelines
            .iter()
            .map(|s| format!("{}-{} ({:.1}%)", s.home_goals, s.away_goals, s.prob * 100.0))
            .collect();
        println!("Likely scorelines: {}", lines.join(", "));
    }

    if report.top_plays.is_empty() {
        println!("No value at current prices.");
        return;
    }
    println!("Value plays (budget {:.2}):", req.budget);
    for play in &report.top_plays {
        println!(
            "  {:?} {} @ {:.2} on {} | model {:.2}% | edge {:.2}% | stake {:.2}",
            play.tier,
            play.outcome.label(),
            play.price,
            play.platform,
            play.model_prob_pct,
            play.edge_pct,
            play.stake,
        );
    }
}
