//! One-shot advisory report.
//!
//! Builds a throwaway session (materials install + concept install for the
//! selected material), derives the advisory signals, and prints the firing
//! rules. One-shot invocations have no upload history, so
//! `last_upload_minutes` stays `None` and the staleness rule can only fire
//! inside `scout watch`.

use anyhow::{bail, Result};

use crate::advisory::build_advisories;
use crate::api::BackendClient;
use crate::config::Config;
use crate::session::{SessionEvent, SessionState};

pub async fn run_advise(config: &Config, material: Option<i64>, json: bool) -> Result<()> {
    let client = BackendClient::new(&config.backend)?;

    let materials = client.list_materials().await.into_data();
    if let Some(id) = material {
        if !materials.iter().any(|m| m.id == id) {
            bail!("Material {} not found", id);
        }
    }

    let mut state = SessionState::default();
    state.apply(SessionEvent::MaterialsLoaded {
        materials,
        preferred: material,
    });

    if let Some(id) = state.selected_material_id() {
        let concepts = client.list_concepts(id).await.into_data();
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: id,
            concepts,
        });
    }

    let advisories = build_advisories(&state.signals(None));

    if json {
        println!("{}", serde_json::to_string_pretty(&advisories)?);
        return Ok(());
    }

    if advisories.is_empty() {
        println!("No recommendations.");
        return Ok(());
    }

    for (i, advisory) in advisories.iter().enumerate() {
        println!("{}. [{}] {}", i + 1, advisory.id, advisory.agent);
        println!("   {}", advisory.message);
        println!("   impact: {}", advisory.impact);
    }

    Ok(())
}
