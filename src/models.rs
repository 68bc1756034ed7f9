//! Core data models used throughout Study Scout.
//!
//! These types represent the materials, concepts, and video matches that flow
//! from the backend pipeline into the client session. They are read-only from
//! the client's perspective: the backend creates and advances them, and the
//! client observes snapshots via refresh calls.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Lifecycle status of a material inside the processing pipeline.
///
/// The backend moves a material `Pending` → `Extracting` → `Ready`, or to
/// `Failed` when processing gives up. Wire values outside that set normalize
/// to [`MaterialStatus::Unknown`] instead of failing the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialStatus {
    Pending,
    Extracting,
    Ready,
    Failed,
    Unknown,
}

impl MaterialStatus {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "pending" => MaterialStatus::Pending,
            "extracting" => MaterialStatus::Extracting,
            "ready" => MaterialStatus::Ready,
            "failed" => MaterialStatus::Failed,
            _ => MaterialStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialStatus::Pending => "pending",
            MaterialStatus::Extracting => "extracting",
            MaterialStatus::Ready => "ready",
            MaterialStatus::Failed => "failed",
            MaterialStatus::Unknown => "unknown",
        }
    }

    /// `Ready` is the terminal state the pipeline settles into on success.
    pub fn is_ready(&self) -> bool {
        matches!(self, MaterialStatus::Ready)
    }
}

/// How a material entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Upload,
    Link,
}

impl SourceKind {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "link" => SourceKind::Link,
            _ => SourceKind::Upload,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Upload => "upload",
            SourceKind::Link => "link",
        }
    }
}

/// A unit of uploaded or linked study content tracked through the pipeline.
///
/// `concepts` is populated when the backend embeds them in the materials
/// listing; the canonical list is still fetched lazily per material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub id: i64,
    pub title: String,
    pub status: MaterialStatus,
    pub source: SourceKind,
    pub created_at: DateTime<Utc>,
    pub metadata: serde_json::Value,
    pub concepts: Vec<Concept>,
}

/// A topic extracted from a material, ranked by priority (lower = higher).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Concept {
    pub id: i64,
    pub title: String,
    /// May be empty while summary generation is still queued.
    pub summary: String,
    pub priority: u32,
    pub matches: Vec<VideoMatch>,
}

/// A recommended video segment aligned to a concept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoMatch {
    pub id: i64,
    pub video_id: String,
    pub video_title: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    /// Similarity score in `[0, 1]`.
    pub similarity: f64,
    pub segment_text: String,
}

impl VideoMatch {
    /// Watch URL seeking straight to the aligned segment.
    pub fn watch_url(&self) -> String {
        format!(
            "https://www.youtube.com/watch?v={}&t={}s",
            self.video_id, self.start_seconds as u64
        )
    }
}

/// Payload for `POST /upload-material/`.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    /// Required, non-empty.
    pub title: String,
    /// Free-text notes sent as `text_content`.
    pub notes: Option<String>,
    pub source: SourceKind,
    /// Optional file attached as the `original_file` part.
    pub file: Option<PathBuf>,
}
