//! Session state: the selection synchronizer.
//!
//! A session tracks three nested selections — material → concept → match —
//! against collections that arrive asynchronously and change shape. All
//! mutation goes through [`SessionState::apply`], a reducer over
//! [`SessionEvent`]s, which keeps the selections valid in the same step that
//! installs a new collection:
//!
//! - a selection referencing a removed id is replaced or cleared, never left
//!   dangling;
//! - a concept snapshot for a material that is no longer selected is
//!   discarded wholesale (stale fetch);
//! - whenever the effective selected concept changes identity, the selected
//!   match resets to that concept's first match.
//!
//! The reducer is synchronous and pure with respect to I/O; callers dispatch
//! fetches, tag completions with the material id they were issued for, and
//! feed the results back in as events.

use crate::advisory::{count_concepts_needing_matches, AdvisorySignals};
use crate::models::{Concept, Material, VideoMatch};

/// One step of session input: a collection install, a user-driven selection,
/// or an upload confirmation.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A materials fetch resolved. `preferred` wins selection when present in
    /// the list (used after uploads); otherwise the previous selection is
    /// kept if still listed, else the first material is selected.
    MaterialsLoaded {
        materials: Vec<Material>,
        preferred: Option<i64>,
    },
    /// A concept fetch resolved. `material_id` is the material the fetch was
    /// dispatched for; results for anything but the currently selected
    /// material are discarded.
    ConceptsLoaded {
        material_id: i64,
        concepts: Vec<Concept>,
    },
    /// User picked a material from the list.
    MaterialSelected(i64),
    /// User picked a concept from the list.
    ConceptSelected(i64),
    /// User picked a match. Trusted: accepted without membership validation,
    /// and cleared again as soon as the owning concept changes.
    MatchSelected(VideoMatch),
    /// An upload was confirmed; the created material wins selection on the
    /// next materials install.
    UploadCompleted { material_id: i64 },
}

/// The mutable session state. Collections and selections are owned here and
/// mutated only through [`SessionState::apply`].
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    materials: Vec<Material>,
    selected_material: Option<i64>,
    concepts: Vec<Concept>,
    selected_concept: Option<i64>,
    selected_match: Option<VideoMatch>,
    /// Created-material id recorded by `UploadCompleted`, consumed by the
    /// next `MaterialsLoaded` without an explicit preference.
    upload_hint: Option<i64>,
}

impl SessionState {
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    pub fn selected_material_id(&self) -> Option<i64> {
        self.selected_material
    }

    pub fn selected_concept_id(&self) -> Option<i64> {
        self.selected_concept
    }

    pub fn selected_material(&self) -> Option<&Material> {
        self.selected_material
            .and_then(|id| self.materials.iter().find(|m| m.id == id))
    }

    pub fn selected_concept(&self) -> Option<&Concept> {
        self.selected_concept
            .and_then(|id| self.concepts.iter().find(|c| c.id == id))
    }

    pub fn selected_match(&self) -> Option<&VideoMatch> {
        self.selected_match.as_ref()
    }

    /// Match list of the selected concept, or empty when none is selected.
    pub fn matches(&self) -> &[VideoMatch] {
        self.selected_concept()
            .map(|c| c.matches.as_slice())
            .unwrap_or(&[])
    }

    /// Apply one event. Selections are repaired in the same step that
    /// installs a collection, so observers never see a dangling reference.
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::MaterialsLoaded {
                materials,
                preferred,
            } => {
                let preferred = preferred.or_else(|| self.upload_hint.take());
                let next = preferred
                    .filter(|id| materials.iter().any(|m| m.id == *id))
                    .or_else(|| {
                        self.selected_material
                            .filter(|id| materials.iter().any(|m| m.id == *id))
                    })
                    .or_else(|| materials.first().map(|m| m.id));
                self.materials = materials;
                self.install_material_selection(next);
            }
            SessionEvent::ConceptsLoaded {
                material_id,
                concepts,
            } => {
                if self.selected_material != Some(material_id) {
                    // Stale: the selection moved while this fetch was in
                    // flight. State reflects the latest requested material,
                    // not the latest completed fetch.
                    return;
                }
                self.selected_concept = self
                    .selected_concept
                    .filter(|id| concepts.iter().any(|c| c.id == *id))
                    .or_else(|| concepts.first().map(|c| c.id));
                self.concepts = concepts;
                // A fresh snapshot renews the concept's identity even under
                // an unchanged id, so the standing invariant fires.
                self.reset_match_to_first();
            }
            SessionEvent::MaterialSelected(id) => {
                if self.selected_material == Some(id) {
                    return;
                }
                if self.materials.iter().any(|m| m.id == id) {
                    self.install_material_selection(Some(id));
                }
            }
            SessionEvent::ConceptSelected(id) => {
                if self.selected_concept == Some(id) {
                    return;
                }
                if self.concepts.iter().any(|c| c.id == id) {
                    self.selected_concept = Some(id);
                    self.reset_match_to_first();
                }
            }
            SessionEvent::MatchSelected(m) => {
                self.selected_match = Some(m);
            }
            SessionEvent::UploadCompleted { material_id } => {
                self.upload_hint = Some(material_id);
            }
        }
    }

    /// Install a (possibly unchanged) material selection. On change the
    /// concept collection and both downstream selections are cleared; the
    /// concept fetch for the new material is the caller's to dispatch.
    fn install_material_selection(&mut self, next: Option<i64>) {
        if self.selected_material == next {
            return;
        }
        self.selected_material = next;
        self.concepts = Vec::new();
        self.selected_concept = None;
        self.selected_match = None;
    }

    fn reset_match_to_first(&mut self) {
        self.selected_match = self.selected_concept().and_then(|c| c.matches.first().cloned());
    }

    /// Assemble the advisory input snapshot. Signals degrade to neutral
    /// values when no material is selected.
    pub fn signals(&self, last_upload_minutes: Option<f64>) -> AdvisorySignals {
        AdvisorySignals {
            is_processing: self
                .selected_material()
                .map(|m| !m.status.is_ready())
                .unwrap_or(false),
            concept_count: self.concepts.len(),
            concepts_needing_matches: count_concepts_needing_matches(&self.concepts),
            last_upload_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaterialStatus, SourceKind};
    use chrono::{TimeZone, Utc};

    fn material(id: i64, status: MaterialStatus) -> Material {
        Material {
            id,
            title: format!("Material {}", id),
            status,
            source: SourceKind::Upload,
            created_at: Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap(),
            metadata: serde_json::json!({}),
            concepts: Vec::new(),
        }
    }

    fn concept(id: i64, match_ids: &[i64]) -> Concept {
        Concept {
            id,
            title: format!("Concept {}", id),
            summary: String::new(),
            priority: 0,
            matches: match_ids.iter().map(|&m| video_match(m)).collect(),
        }
    }

    fn video_match(id: i64) -> VideoMatch {
        VideoMatch {
            id,
            video_id: format!("vid-{}", id),
            video_title: format!("Video {}", id),
            channel_title: "Channel".to_string(),
            thumbnail_url: String::new(),
            start_seconds: 10.0,
            end_seconds: 20.0,
            similarity: 0.5,
            segment_text: String::new(),
        }
    }

    fn assert_valid(state: &SessionState) {
        if let Some(id) = state.selected_material_id() {
            assert!(state.materials().iter().any(|m| m.id == id));
        }
        if let Some(id) = state.selected_concept_id() {
            assert!(state.concepts().iter().any(|c| c.id == id));
        }
    }

    #[test]
    fn empty_list_clears_selection() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![material(1, MaterialStatus::Ready)],
            preferred: None,
        });
        assert_eq!(state.selected_material_id(), Some(1));

        state.apply(SessionEvent::MaterialsLoaded {
            materials: Vec::new(),
            preferred: None,
        });
        assert_eq!(state.selected_material_id(), None);
        assert!(state.concepts().is_empty());
        assert_valid(&state);
    }

    #[test]
    fn first_material_selected_by_default() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![
                material(3, MaterialStatus::Pending),
                material(1, MaterialStatus::Ready),
            ],
            preferred: None,
        });
        // List order as returned by the backend, not re-sorted.
        assert_eq!(state.selected_material_id(), Some(3));
    }

    #[test]
    fn preferred_id_wins_over_prior_selection() {
        let mut state = SessionState::default();
        let list = vec![
            material(1, MaterialStatus::Ready),
            material(2, MaterialStatus::Ready),
        ];
        state.apply(SessionEvent::MaterialsLoaded {
            materials: list.clone(),
            preferred: None,
        });
        assert_eq!(state.selected_material_id(), Some(1));

        state.apply(SessionEvent::MaterialsLoaded {
            materials: list,
            preferred: Some(2),
        });
        assert_eq!(state.selected_material_id(), Some(2));
    }

    #[test]
    fn absent_preferred_id_falls_back_to_sticky_selection() {
        let mut state = SessionState::default();
        let list = vec![
            material(1, MaterialStatus::Ready),
            material(2, MaterialStatus::Ready),
        ];
        state.apply(SessionEvent::MaterialsLoaded {
            materials: list.clone(),
            preferred: None,
        });
        state.apply(SessionEvent::MaterialSelected(2));

        state.apply(SessionEvent::MaterialsLoaded {
            materials: list,
            preferred: Some(99),
        });
        assert_eq!(state.selected_material_id(), Some(2));
    }

    #[test]
    fn sticky_selection_survives_identical_refresh() {
        let mut state = SessionState::default();
        let list = vec![
            material(1, MaterialStatus::Ready),
            material(2, MaterialStatus::Ready),
        ];
        state.apply(SessionEvent::MaterialsLoaded {
            materials: list.clone(),
            preferred: None,
        });
        state.apply(SessionEvent::MaterialSelected(2));
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 2,
            concepts: vec![concept(10, &[100])],
        });
        let match_before = state.selected_match().cloned();

        // Idempotent refresh: identical content moves nothing.
        state.apply(SessionEvent::MaterialsLoaded {
            materials: list,
            preferred: None,
        });
        assert_eq!(state.selected_material_id(), Some(2));
        assert_eq!(state.selected_concept_id(), Some(10));
        assert_eq!(state.selected_match().cloned(), match_before);
    }

    #[test]
    fn removed_selection_is_repaired_in_the_same_step() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![
                material(1, MaterialStatus::Ready),
                material(2, MaterialStatus::Ready),
            ],
            preferred: Some(2),
        });
        assert_eq!(state.selected_material_id(), Some(2));

        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![material(1, MaterialStatus::Ready)],
            preferred: None,
        });
        assert_eq!(state.selected_material_id(), Some(1));
        assert_valid(&state);
    }

    #[test]
    fn material_change_clears_downstream_selections() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![
                material(1, MaterialStatus::Ready),
                material(2, MaterialStatus::Ready),
            ],
            preferred: None,
        });
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 1,
            concepts: vec![concept(10, &[100, 101])],
        });
        assert_eq!(state.selected_concept_id(), Some(10));
        assert!(state.selected_match().is_some());

        state.apply(SessionEvent::MaterialSelected(2));
        assert_eq!(state.selected_concept_id(), None);
        assert!(state.concepts().is_empty());
        assert!(state.selected_match().is_none());
        assert!(state.matches().is_empty());
    }

    #[test]
    fn concept_install_keeps_surviving_selection() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![material(1, MaterialStatus::Ready)],
            preferred: None,
        });
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 1,
            concepts: vec![concept(10, &[]), concept(11, &[100])],
        });
        state.apply(SessionEvent::ConceptSelected(11));

        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 1,
            concepts: vec![concept(11, &[100]), concept(12, &[])],
        });
        assert_eq!(state.selected_concept_id(), Some(11));

        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 1,
            concepts: vec![concept(12, &[])],
        });
        assert_eq!(state.selected_concept_id(), Some(12));
        assert_valid(&state);
    }

    #[test]
    fn stale_concept_fetch_is_discarded() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![
                material(1, MaterialStatus::Ready),
                material(2, MaterialStatus::Ready),
            ],
            preferred: None,
        });
        // Fetch for material 1 dispatched; user moves to material 2 and its
        // fetch resolves first.
        state.apply(SessionEvent::MaterialSelected(2));
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 2,
            concepts: vec![concept(20, &[200])],
        });

        // Material 1's late result must not alter what is displayed.
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 1,
            concepts: vec![concept(10, &[100])],
        });
        assert_eq!(state.selected_concept_id(), Some(20));
        assert_eq!(state.concepts().len(), 1);
        assert_eq!(state.concepts()[0].id, 20);
    }

    #[test]
    fn match_resets_on_concept_change_even_with_identical_match_lists() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![material(1, MaterialStatus::Ready)],
            preferred: None,
        });
        // Concepts A and B carry content-identical match lists.
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 1,
            concepts: vec![concept(10, &[100, 101]), concept(11, &[100, 101])],
        });
        state.apply(SessionEvent::MatchSelected(video_match(101)));
        assert_eq!(state.selected_match().map(|m| m.id), Some(101));

        state.apply(SessionEvent::ConceptSelected(11));
        assert_eq!(state.selected_match().map(|m| m.id), Some(100));
    }

    #[test]
    fn reselecting_the_same_concept_keeps_the_match() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![material(1, MaterialStatus::Ready)],
            preferred: None,
        });
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 1,
            concepts: vec![concept(10, &[100, 101])],
        });
        state.apply(SessionEvent::MatchSelected(video_match(101)));

        state.apply(SessionEvent::ConceptSelected(10));
        assert_eq!(state.selected_match().map(|m| m.id), Some(101));
    }

    #[test]
    fn concept_refresh_renews_identity_and_resets_match() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![material(1, MaterialStatus::Ready)],
            preferred: None,
        });
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 1,
            concepts: vec![concept(10, &[100, 101])],
        });
        state.apply(SessionEvent::MatchSelected(video_match(101)));

        // Same concept id, fresh snapshot with a reshaped match list: the
        // reset is keyed on identity, not deep equality.
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 1,
            concepts: vec![concept(10, &[102, 100])],
        });
        assert_eq!(state.selected_concept_id(), Some(10));
        assert_eq!(state.selected_match().map(|m| m.id), Some(102));
    }

    #[test]
    fn concept_without_matches_yields_no_selected_match() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![material(1, MaterialStatus::Extracting)],
            preferred: None,
        });
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 1,
            concepts: vec![concept(10, &[])],
        });
        assert_eq!(state.selected_concept_id(), Some(10));
        assert!(state.selected_match().is_none());

        // Still-processing material with no concepts at all is a valid
        // transient state, not an error.
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 1,
            concepts: Vec::new(),
        });
        assert_eq!(state.selected_concept_id(), None);
        assert!(state.matches().is_empty());
    }

    #[test]
    fn unlisted_explicit_selections_are_ignored() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![material(1, MaterialStatus::Ready)],
            preferred: None,
        });
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 1,
            concepts: vec![concept(10, &[100])],
        });

        state.apply(SessionEvent::MaterialSelected(42));
        assert_eq!(state.selected_material_id(), Some(1));
        state.apply(SessionEvent::ConceptSelected(42));
        assert_eq!(state.selected_concept_id(), Some(10));
    }

    #[test]
    fn upload_hint_wins_the_next_install() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![material(1, MaterialStatus::Ready)],
            preferred: None,
        });

        state.apply(SessionEvent::UploadCompleted { material_id: 2 });
        // User wanders off before the refresh lands; the upload still wins.
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![
                material(1, MaterialStatus::Ready),
                material(2, MaterialStatus::Pending),
            ],
            preferred: None,
        });
        assert_eq!(state.selected_material_id(), Some(2));

        // The hint is consumed: a later refresh is back to sticky rules.
        state.apply(SessionEvent::MaterialSelected(1));
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![
                material(1, MaterialStatus::Ready),
                material(2, MaterialStatus::Ready),
            ],
            preferred: None,
        });
        assert_eq!(state.selected_material_id(), Some(1));
    }

    #[test]
    fn signals_degrade_to_neutral_without_a_selection() {
        let state = SessionState::default();
        let signals = state.signals(None);
        assert!(!signals.is_processing);
        assert_eq!(signals.concept_count, 0);
        assert_eq!(signals.concepts_needing_matches, 0);
        assert_eq!(signals.last_upload_minutes, None);
    }

    #[test]
    fn signals_reflect_selected_material_and_concepts() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::MaterialsLoaded {
            materials: vec![material(1, MaterialStatus::Extracting)],
            preferred: None,
        });
        state.apply(SessionEvent::ConceptsLoaded {
            material_id: 1,
            concepts: vec![concept(10, &[100]), concept(11, &[]), concept(12, &[])],
        });

        let signals = state.signals(Some(12.0));
        assert!(signals.is_processing);
        assert_eq!(signals.concept_count, 3);
        assert_eq!(signals.concepts_needing_matches, 2);
        assert_eq!(signals.last_upload_minutes, Some(12.0));
    }
}
