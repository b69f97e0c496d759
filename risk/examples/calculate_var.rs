//! VaR calculation example
//!
//! Demonstrates VaR, CVaR, volatility and beta on a synthetic price history.
//!
//! Run with: cargo run --example calculate_var -- [config.yaml]

use riskcalc::returns::simple_returns;
use riskcalc::{greeks, var, OptionParams, RiskConfig, RiskEngine, VarMethod};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    riskcalc::init_tracing();

    println!("=== Value at Risk (VaR) Calculation Example ===\n");

    // 1. Load configuration (defaults when no file is given)
    let config = match std::env::args().nth(1) {
        Some(path) => RiskConfig::from_file(path)?,
        None => RiskConfig::default(),
    };
    let engine = RiskEngine::new(config)?;

    // 2. Simulate 250 days of closes for a portfolio and its benchmark
    let mut portfolio_prices = vec![100.0];
    let mut benchmark_prices = vec![100.0];
    for i in 1..250 {
        let market = (i as f64 * 0.1).sin() * 0.01 + ((i * 17) % 100) as f64 / 100.0 * 0.005
            - 0.0025;
        let idiosyncratic = ((i * 31) % 50) as f64 / 50.0 * 0.004 - 0.002;

        let last_portfolio = portfolio_prices[i - 1];
        let last_benchmark = benchmark_prices[i - 1];
        portfolio_prices.push(last_portfolio * (1.0 + 1.2 * market + idiosyncratic));
        benchmark_prices.push(last_benchmark * (1.0 + market));
    }

    let returns = simple_returns(&portfolio_prices)?;
    let benchmark = simple_returns(&benchmark_prices)?;

    // 3. Full report at the configured confidence and horizon
    let report = engine.report(&returns, Some(&benchmark))?;
    let cfg = engine.config();

    println!(
        "Confidence: {}%, horizon: {} day(s), observations: {}",
        cfg.confidence_level * 100.0,
        cfg.horizon_days,
        report.observations
    );
    println!("VaR:  {:.4}%", report.var.var * 100.0);
    println!("CVaR: {:.4}%", report.var.cvar * 100.0);
    println!("Volatility (periodic):   {:.4}%", report.volatility * 100.0);
    println!("Volatility (annualized): {:.2}%", report.annualized_volatility * 100.0);
    if let Some(metrics) = &report.benchmark {
        println!("Beta: {:.3}", metrics.beta);
        println!("Correlation: {:.3}", metrics.correlation);
        println!("Tracking error: {:.4}%", metrics.tracking_error * 100.0);
    }
    println!();

    // 4. Compare methodologies
    println!("--- Comparison of VaR Methods ---");
    println!("{:<14} {:>10} {:>10}", "Method", "VaR", "CVaR");
    for method in [VarMethod::Historical, VarMethod::Parametric, VarMethod::MonteCarlo] {
        let estimate = engine.var_with(&returns, cfg.confidence_level, cfg.horizon_days, method)?;
        println!(
            "{:<14} {:>9.4}% {:>9.4}%",
            format!("{:?}", method),
            estimate.var * 100.0,
            estimate.cvar * 100.0
        );
    }
    println!();

    // 5. Rolling backtest of one-day historical VaR
    println!("--- VaR Backtesting ---");
    let window = 100;
    let mut forecasts = Vec::new();
    let mut realized = Vec::new();
    for t in window..returns.len() {
        forecasts.push(var::historical_var(&returns[t - window..t], 0.95, 1)?);
        realized.push(returns[t]);
    }
    let backtest = var::backtest(&forecasts, &realized, 0.95)?;
    println!("Forecasts: {}", backtest.num_forecasts);
    println!("Violations: {}", backtest.num_violations);
    println!("Violation rate: {:.1}%", backtest.violation_rate * 100.0);
    println!("Expected rate: {:.1}%", backtest.expected_violation_rate * 100.0);
    println!("Validated: {}", backtest.validated);
    println!();

    // 6. Option delta hedge ratio
    let option = OptionParams::call(100.0, 100.0, 0.05, report.annualized_volatility, 0.25);
    let greeks = greeks::greeks(&option)?;
    println!("--- ATM 3M Call at realized volatility ---");
    println!("{}", serde_json::to_string_pretty(&greeks)?);

    Ok(())
}
