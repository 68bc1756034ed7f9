//! Built-in fallback dataset.
//!
//! When the backend is unreachable, the read paths substitute this fixed
//! sample set instead of propagating the error, keeping the client usable in
//! offline and demo conditions. Every value here is pinned — including the
//! creation timestamp — so that two consecutive degraded fetches compare
//! identical.

use chrono::{TimeZone, Utc};

use crate::models::{Concept, Material, MaterialStatus, SourceKind, VideoMatch};

/// The two demo matches attached to the first sample concept.
pub fn sample_matches() -> Vec<VideoMatch> {
    vec![
        VideoMatch {
            id: 1,
            video_id: "demo-101".to_string(),
            video_title: "Understanding Gradient Descent".to_string(),
            channel_title: "LessonTeacherGPT".to_string(),
            thumbnail_url: "https://placehold.co/320x180".to_string(),
            start_seconds: 45.0,
            end_seconds: 120.0,
            similarity: 0.81,
            segment_text: "We analyze convergence criteria and build intuition with visuals."
                .to_string(),
        },
        VideoMatch {
            id: 2,
            video_id: "demo-102".to_string(),
            video_title: "Optimization Warmup".to_string(),
            channel_title: "LessonTeacherGPT".to_string(),
            thumbnail_url: "https://placehold.co/320x180".to_string(),
            start_seconds: 130.0,
            end_seconds: 190.0,
            similarity: 0.78,
            segment_text: "Review of partial derivatives before applying them in GD.".to_string(),
        },
    ]
}

/// Sample concepts: one fully matched, one still waiting on video search.
pub fn sample_concepts() -> Vec<Concept> {
    vec![
        Concept {
            id: 9001,
            title: "Gradient Descent Fundamentals".to_string(),
            summary: "Covers loss landscapes and update rules for convex functions.".to_string(),
            priority: 0,
            matches: sample_matches(),
        },
        Concept {
            id: 9002,
            title: "Learning Rate Schedules".to_string(),
            summary: "Practical heuristics for picking lr and adapting it over time.".to_string(),
            priority: 1,
            matches: Vec::new(),
        },
    ]
}

/// The sample materials list: a single ready material with embedded concepts.
pub fn sample_materials() -> Vec<Material> {
    vec![Material {
        id: 501,
        title: "Sample Deep Learning Notes".to_string(),
        status: MaterialStatus::Ready,
        source: SourceKind::Upload,
        created_at: Utc.with_ymd_and_hms(2024, 11, 5, 9, 30, 0).unwrap(),
        metadata: serde_json::json!({}),
        concepts: sample_concepts(),
    }]
}
