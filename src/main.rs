use anyhow::Result;
use colored::Colorize;
use options_analyzer::analyzer::Analyzer;
use options_analyzer::collector::Collector;
use options_analyzer::market_client::PolygonClient;
use options_analyzer::query::AthenaQueryEngine;
use options_analyzer::rate_limit::FixedDelay;
use options_analyzer::store::S3SnapshotStore;
use options_analyzer::{api_server, config, logging};
use std::sync::Arc;

fn banner(title: &str) {
    println!("{}", "=".repeat(60).blue());
    println!("{}", title.green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();
}

/// Run one collection pass over the ticker list and persist the batch.
async fn run_collect() -> Result<()> {
    banner("Options Snapshot Collector");

    let market = Arc::new(PolygonClient::new()?);
    let store = Arc::new(S3SnapshotStore::from_env().await);
    let collector = Collector::new(market, store, Arc::new(FixedDelay));

    println!(
        "{} Collecting {} tickers (sequential, rate-limited)...",
        "→".cyan(),
        config::MAGNIFICENT_SEVEN.len()
    );
    println!();

    let start_time = std::time::Instant::now();
    let summary = collector.run().await?;
    let elapsed = start_time.elapsed();

    println!("{}", "Summary".cyan().bold());
    println!("{} {}", "✓".green(), summary.message);
    println!("{} Time taken: {:.2}s", "⏱".yellow(), elapsed.as_secs_f64());

    Ok(())
}

/// Run the analyzer once and print the ranked result.
async fn run_analyze() -> Result<()> {
    banner("Best-Value Options");

    let engine = Arc::new(AthenaQueryEngine::from_env().await);
    let analyzer = Analyzer::new(engine);

    match analyzer.run().await {
        Ok(data) => {
            println!(
                "{} Query {} via {}",
                "✓".green(),
                data.query_execution_id.yellow(),
                data.data_source
            );
            println!();
            for (rank, opt) in data.top_options.iter().enumerate() {
                println!(
                    "  {} {} {} → strike {:.2}, option {:.2}, volume {}, score {:.2}",
                    format!("#{}", rank + 1).cyan(),
                    opt.underlying_ticker.yellow(),
                    opt.contract_ticker,
                    opt.strike,
                    opt.option_price,
                    opt.volume,
                    opt.profit_score
                );
            }
            Ok(())
        }
        Err(err) => {
            println!("{} {}", "✗".red(), err);
            Err(err.into())
        }
    }
}

/// Serve the analyzer over HTTP.
async fn run_server() -> Result<()> {
    banner("Options API Server");

    let engine = Arc::new(AthenaQueryEngine::from_env().await);
    let analyzer = Arc::new(Analyzer::new(engine));

    api_server::start_server(analyzer, config::get_port()).await
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let mode = config::get_execution_mode();
    match mode.as_str() {
        "collect" => run_collect().await,
        "analyze" => run_analyze().await,
        "serve" => run_server().await,
        other => {
            eprintln!("{} Unknown mode: {}", "✗".red(), other);
            eprintln!("  Valid modes: collect | analyze | serve (OPTIONS_MODE)");
            anyhow::bail!("Unknown execution mode: {}", other)
        }
    }
}
