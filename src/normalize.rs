//! Wire-record deserialization and normalization.
//!
//! The backend serializes materials and concepts with nested `video` and
//! `segment` objects; this module flattens them into the core models. The
//! mapping is deliberately tolerant: absent `concepts`/`matches` arrays become
//! empty vectors (never null, never an error), unknown statuses map to
//! [`MaterialStatus::Unknown`], and unparseable timestamps fall back to the
//! Unix epoch rather than rejecting the record.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::models::{Concept, Material, MaterialStatus, SourceKind, VideoMatch};

/// `GET /materials/` list element as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub concepts: Option<Vec<ConceptRecord>>,
}

/// `GET /materials/{id}/concepts/` list element.
#[derive(Debug, Clone, Deserialize)]
pub struct ConceptRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub matches: Option<Vec<MatchRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRecord {
    pub id: i64,
    pub similarity: f64,
    pub video: VideoRecord,
    pub segment: SegmentRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentRecord {
    pub start_seconds: f64,
    pub end_seconds: f64,
    #[serde(default)]
    pub text: String,
}

pub fn normalize_material(record: MaterialRecord) -> Material {
    Material {
        id: record.id,
        title: record.title,
        status: MaterialStatus::from_wire(&record.status),
        source: SourceKind::from_wire(&record.source_type),
        created_at: parse_created_at(&record.created_at),
        metadata: record.metadata.unwrap_or_else(|| serde_json::json!({})),
        concepts: record
            .concepts
            .unwrap_or_default()
            .into_iter()
            .map(normalize_concept)
            .collect(),
    }
}

pub fn normalize_concept(record: ConceptRecord) -> Concept {
    Concept {
        id: record.id,
        title: record.title,
        summary: record.summary,
        priority: record.priority,
        matches: record
            .matches
            .unwrap_or_default()
            .into_iter()
            .map(normalize_match)
            .collect(),
    }
}

fn normalize_match(record: MatchRecord) -> VideoMatch {
    VideoMatch {
        id: record.id,
        video_id: record.video.video_id,
        video_title: record.video.title,
        channel_title: record.video.channel_title,
        thumbnail_url: record.video.thumbnail_url,
        start_seconds: record.segment.start_seconds,
        end_seconds: record.segment.end_seconds,
        similarity: record.similarity,
        segment_text: record.segment.text,
    }
}

/// Parse the backend's `created_at`. Accepts RFC 3339 with or without a
/// trailing zone designator; anything else normalizes to the epoch.
fn parse_created_at(value: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc();
    }
    DateTime::<Utc>::UNIX_EPOCH
}
