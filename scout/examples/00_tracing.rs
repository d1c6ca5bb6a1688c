//! Run with `RUST_LOG=debug cargo run -p scout --features tracing --example 00_tracing`.
mod common;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .init();

    let scout = common::builder().failure_threshold(1).build()?;

    // Cooldown waits, a failing primary being disabled, and the synthetic
    // fallback all show up as events.
    for text in ["ada", "FAIL", "grace", "nobody at all"] {
        match scout.search(text, 3).await {
            Ok(report) => println!(
                "{text:?}: {:?} with {} record(s), {} warning(s)",
                report.status,
                report.records.len(),
                report.warnings.len()
            ),
            Err(e) => println!("{text:?}: {e}"),
        }
    }

    scout.set_mode(true);
    let report = scout.search("ada", 3).await?;
    println!("fallback-only: {:?}", report.status);
    scout.set_mode(false);

    println!("health: {:?}", scout.health_check().await.overall);
    Ok(())
}
