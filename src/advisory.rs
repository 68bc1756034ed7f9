//! Advisory engine: derive worker recommendations from session signals.
//!
//! [`build_advisories`] is a pure function from a snapshot of derived signals
//! to an ordered list of prompts suggesting which pipeline worker to recruit
//! next. Rules are evaluated independently against the same snapshot — more
//! than one may fire, all firing rules are emitted in fixed priority order,
//! and nothing is deduplicated or merged. An empty result means "no
//! recommendations", not an error.

use serde::Serialize;

use crate::models::Concept;

/// A recommendation to invoke an additional processing worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdvisoryPrompt {
    /// Stable key, unique per rule.
    pub id: &'static str,
    /// Label of the recommended worker.
    pub agent: &'static str,
    /// Human-readable rationale.
    pub message: &'static str,
    /// Human-readable expected benefit.
    pub impact: &'static str,
}

/// Snapshot of derived signals the engine evaluates.
///
/// All fields are derived by the caller; when upstream computation is
/// impossible (e.g. no material selected) each signal degrades to its neutral
/// value — `false`, zero counts, `None` — rather than raising.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdvisorySignals {
    /// Selected material exists and has not reached the `ready` state.
    pub is_processing: bool,
    /// Concepts currently loaded for the selected material.
    pub concept_count: usize,
    /// Loaded concepts whose match collection is empty.
    pub concepts_needing_matches: usize,
    /// Minutes since the session's last successful upload, if any.
    pub last_upload_minutes: Option<f64>,
}

/// Count loaded concepts with zero video matches.
pub fn count_concepts_needing_matches(concepts: &[Concept]) -> usize {
    concepts.iter().filter(|c| c.matches.is_empty()).count()
}

/// Evaluate all advisory rules against one snapshot.
pub fn build_advisories(signals: &AdvisorySignals) -> Vec<AdvisoryPrompt> {
    let mut advisories = Vec::new();

    if signals.is_processing {
        advisories.push(AdvisoryPrompt {
            id: "doc-agent",
            agent: "DocumentIngestor",
            message: "Document parsing still running. Spin up another ingestion worker to \
                      parallelize large uploads.",
            impact: "Cuts wait time ~35% on >20 page PDFs.",
        });
    }

    if signals.concept_count >= 4 && signals.concepts_needing_matches > 0 {
        advisories.push(AdvisoryPrompt {
            id: "video-agent",
            agent: "YouTubeScout",
            message: "Multiple concepts lack video matches. Recruit the YouTube scout to fan \
                      out search + transcript jobs.",
            impact: "Surfaces 3x more candidates per concept.",
        });
    }

    if signals.concepts_needing_matches >= 2 {
        advisories.push(AdvisoryPrompt {
            id: "timestamp-agent",
            agent: "TimestampAligner",
            message: "Queued concepts have zero timestamp coverage. Launch alignment agent to \
                      chunk transcripts faster.",
            impact: "Improves timestamp accuracy to ±5s.",
        });
    }

    if matches!(signals.last_upload_minutes, Some(minutes) if minutes > 30.0) {
        advisories.push(AdvisoryPrompt {
            id: "refresh-agent",
            agent: "Refresher",
            message: "It has been over 30 minutes since last upload. Run a quick refresh to \
                      keep embeddings warm.",
            impact: "Avoids cold starts on the embedding store.",
        });
    }

    advisories
}
