mod common;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Build an orchestrator over two fixture-backed adapters.
    let scout = common::builder().build()?;

    // 2. A regular search: the primary answers.
    let report = scout.search("grace", 5).await?;
    println!("## 'grace' ({:?})", report.status);
    println!("{:<20} | {:>4} | {:<14} | Source", "Name", "Conf", "Adapter");
    println!("{:-<21}|{:-<6}|{:-<16}|{:-<40}", "", "", "", "");
    for r in &report.records {
        println!(
            "{:<20} | {:>4} | {:<14} | {}",
            r.display_name, r.confidence, r.provenance.adapter_id, r.source_uri
        );
    }

    // 3. Every adapter fails on this query; the session ends on the synthetic fallback.
    let report = scout.search("FAIL", 5).await?;
    println!("\n## 'FAIL' ({:?})", report.status);
    for attempt in &report.attempts {
        println!("  {} -> {:?} in {}ms", attempt.adapter_id, attempt.outcome, attempt.duration_ms);
    }

    // 4. Follow up on one record through the detail capability.
    let report = scout.search("ada", 1).await?;
    if let Some(first) = report.records.first() {
        let detail = scout.record_detail(&first.source_uri).await?;
        println!("\n## Detail for {}", detail.record.display_name);
        for (k, v) in &detail.attributes {
            println!("  {k}: {v}");
        }
    }

    // 5. System health.
    let snapshot = scout.health_check().await;
    println!("\n## Health: {:?}", snapshot.overall);
    for a in &snapshot.per_adapter {
        println!(
            "  {:<14} {:<12} quota={:<3} last_error={}",
            a.adapter_id,
            a.mode,
            a.remaining_quota,
            a.last_error.as_deref().unwrap_or("-")
        );
    }

    scout.close().await;
    Ok(())
}
