//! `bizscout harvest <query>` — run the full pipeline against a live
//! directory and export the results.

use crate::cli::output::{self, Styled};
use crate::config::HarvestConfig;
use crate::events::HarvestEvent;
use crate::export;
use crate::harvest::orchestrator::{Harvester, HarvestRequest};
use crate::harvest::HarvestError;
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;
use crate::session::page::LivePage;
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;

/// Run the harvest command.
pub async fn run(
    query: &str,
    location: Option<&str>,
    max_results: usize,
    output_path: Option<&str>,
    format: &str,
    headed: bool,
) -> Result<()> {
    let s = Styled::new();

    if !matches!(format, "csv" | "json") {
        bail!("unsupported format '{format}' (expected csv or json)");
    }
    if max_results == 0 {
        bail!("--max-results must be at least 1");
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bizscout=info".parse().unwrap()),
        )
        .init();

    info!("starting bizscout v{}", env!("CARGO_PKG_VERSION"));

    let renderer = ChromiumRenderer::with_headless(!headed)
        .await
        .map_err(|e| HarvestError::SessionUnavailable(format!("{e:#}")))?;
    let ctx = renderer
        .new_context()
        .await
        .map_err(|e| HarvestError::SessionUnavailable(format!("{e:#}")))?;
    let mut session = LivePage::new(ctx);

    let harvester = Harvester::new(HarvestConfig::default());
    let request = HarvestRequest {
        query: query.to_string(),
        location: location.map(|l| l.to_string()),
        max_results,
    };

    // Ctrl-C aborts at the next item boundary with partial results.
    let abort = harvester.abort_handle();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        abort.store(true, std::sync::atomic::Ordering::Relaxed);
    });

    // Progress consumer; the pipeline never blocks on it.
    let mut events = harvester.subscribe();
    let progress = if output::is_quiet() || output::is_json() {
        None
    } else {
        let bar = ProgressBar::new(max_results as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(bar)
    };
    let consumer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match (&progress, &event) {
                (Some(bar), HarvestEvent::ListingLoaded { realized, requested, .. }) => {
                    bar.set_length((*realized).min(*requested) as u64);
                    bar.set_message(format!("{realized} cards loaded"));
                }
                (Some(bar), HarvestEvent::ItemExtracted { name, .. }) => {
                    bar.inc(1);
                    bar.set_message(name.clone());
                }
                (Some(bar), HarvestEvent::ItemFailed { index, .. }) => {
                    bar.inc(1);
                    bar.set_message(format!("item {index} failed"));
                }
                _ => {}
            }
        }
        if let Some(bar) = progress {
            bar.finish_and_clear();
        }
    });

    let outcome = harvester.run(&mut session, &request).await?;
    drop(harvester);
    let _ = consumer.await;

    let _ = session.close().await;
    let _ = renderer.shutdown().await;

    // Export
    let extension = format;
    let path = match output_path {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(export::default_file_name(query, location, extension)),
    };
    match format {
        "json" => export::write_json(&outcome.records, &path)
            .context("failed to export JSON")?,
        _ => export::write_csv(&outcome.records, &path).context("failed to export CSV")?,
    }

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "records": outcome.records,
            "outcomes": outcome.outcomes,
            "output": path.display().to_string(),
        }));
        return Ok(());
    }

    if !output::is_quiet() {
        let failures = outcome.outcomes.iter().filter(|o| !o.extracted).count();
        println!(
            "  {} Harvested {} records ({} failures) -> {}",
            s.ok_sym(),
            outcome.records.len(),
            failures,
            path.display()
        );
        for record in &outcome.records {
            let mut parts = vec![record.name.clone()];
            if !record.phone.is_empty() {
                parts.push(record.phone.clone());
            }
            if !record.address.is_empty() {
                parts.push(record.address.clone());
            }
            println!("    - {}", parts.join(" | "));
        }
    }

    Ok(())
}
