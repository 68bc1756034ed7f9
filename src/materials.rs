//! Materials listing.
//!
//! Fetches the materials list and prints it. Used by the `scout materials`
//! CLI command; `scout watch` renders the same data through its own loop.

use anyhow::Result;
use serde::Serialize;

use crate::api::{BackendClient, FetchOutcome};
use crate::config::Config;
use crate::models::Material;

/// JSON envelope for `--json` output: callers can tell live data from the
/// built-in sample set.
#[derive(Debug, Serialize)]
struct MaterialsResponse<'a> {
    source: &'static str,
    materials: &'a [Material],
}

pub async fn run_materials(config: &Config, json: bool) -> Result<()> {
    let client = BackendClient::new(&config.backend)?;
    let outcome = client.list_materials().await;

    if json {
        let response = MaterialsResponse {
            source: outcome_source(&outcome),
            materials: outcome.data(),
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let materials = outcome.data();
    if materials.is_empty() {
        println!("No materials yet. Upload your first document to kick off the pipeline.");
        return Ok(());
    }

    println!(
        "{:<8} {:<36} {:<12} {:<8} CREATED",
        "ID", "TITLE", "STATUS", "SOURCE"
    );
    for material in materials {
        println!(
            "{:<8} {:<36} {:<12} {:<8} {}",
            material.id,
            truncate(&material.title, 36),
            material.status.as_str(),
            material.source.as_str(),
            material.created_at.format("%Y-%m-%d %H:%M"),
        );
    }

    if let FetchOutcome::Degraded { cause, .. } = &outcome {
        println!();
        println!("(backend unreachable — showing built-in sample data: {})", cause);
    }

    Ok(())
}

pub(crate) fn outcome_source<T>(outcome: &FetchOutcome<T>) -> &'static str {
    if outcome.is_degraded() {
        "fallback"
    } else {
        "live"
    }
}

pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", head)
}
