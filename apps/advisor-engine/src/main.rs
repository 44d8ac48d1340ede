//! Command-line entry point.
//!
//! Usage: `advisor-engine <chart_path> <symbol> <equity> [prompt...]`
//!
//! Reads configuration from `$ADVISOR_CONFIG` (or `config.yaml` when
//! present), runs the pipeline once, and prints the executive summary
//! followed by the full plan as JSON. Ctrl-C cancels the run at the
//! next stage boundary.

use anyhow::Context;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use advisor_engine::application::orchestrator::PipelineRequest;
use advisor_engine::application::ports::ChartSource;
use advisor_engine::config::load_config;
use advisor_engine::{telemetry, Advisor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("ADVISOR_CONFIG").ok();
    let config = load_config(config_path.as_deref())?;
    telemetry::init(&config.logging.level);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        anyhow::bail!("usage: advisor-engine <chart_path> <symbol> <equity> [prompt...]");
    }
    let chart = ChartSource::from_path(&args[0]);
    let symbol = args[1].clone();
    let equity: Decimal = args[2]
        .parse()
        .with_context(|| format!("equity must be a decimal number, got {:?}", args[2]))?;
    let prompt = (args.len() > 3).then(|| args[3..].join(" "));

    let advisor = Advisor::from_config(&config)?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling run");
            interrupt.cancel();
        }
    });

    let request = PipelineRequest {
        chart,
        symbol,
        equity: Some(equity),
        prompt,
    };
    match advisor.submit_with_cancellation(&request, &cancel).await {
        Ok(plan) => {
            println!("{}\n", plan.executive_summary());
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Err(error) => {
            if let Some(partial) = error.partial().filter(|p| !p.is_empty()) {
                eprintln!(
                    "completed artifacts before failure:\n{}",
                    serde_json::to_string_pretty(partial)?
                );
            }
            Err(error.into())
        }
    }
}
