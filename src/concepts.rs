//! Concept listing for a single material.

use anyhow::Result;
use serde::Serialize;

use crate::api::{BackendClient, FetchOutcome};
use crate::config::Config;
use crate::materials::outcome_source;
use crate::models::Concept;

#[derive(Debug, Serialize)]
struct ConceptsResponse<'a> {
    source: &'static str,
    material_id: i64,
    concepts: &'a [Concept],
}

pub async fn run_concepts(config: &Config, material_id: i64, json: bool) -> Result<()> {
    let client = BackendClient::new(&config.backend)?;
    let outcome = client.list_concepts(material_id).await;

    if json {
        let response = ConceptsResponse {
            source: outcome_source(&outcome),
            material_id,
            concepts: outcome.data(),
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let concepts = outcome.data();
    if concepts.is_empty() {
        println!("No concepts extracted yet. The material may still be processing.");
        return Ok(());
    }

    println!("--- Concepts for material {} ---", material_id);
    for concept in concepts {
        println!();
        println!("[{}] {} (priority {})", concept.id, concept.title, concept.priority);
        if !concept.summary.is_empty() {
            println!("    {}", concept.summary);
        }
        if concept.matches.is_empty() {
            println!("    no video matches yet");
            continue;
        }
        for m in &concept.matches {
            println!(
                "    {:>4.0}s–{:<4.0}s  {:.2}  {} — {}",
                m.start_seconds, m.end_seconds, m.similarity, m.video_title, m.channel_title
            );
        }
    }

    if let FetchOutcome::Degraded { cause, .. } = &outcome {
        println!();
        println!("(backend unreachable — showing built-in sample data: {})", cause);
    }

    Ok(())
}
