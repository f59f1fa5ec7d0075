//! Der zentrale Feature-Store: ID-indizierte Features, Selektion,
//! Koordinaten-Marker und gebündelte Render-Benachrichtigung.
//!
//! `IndexMap`/`IndexSet` halten die Reihenfolge stabil: Ausgaben iterieren
//! in Einfüge-Reihenfolge, das Ersetzen einer bestehenden ID behält ihre
//! Position, neue IDs hängen hinten an.

use super::{Feature, FeatureId, Geometry};
use crate::shared::EditError;
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

/// Marker für eine selektierte Einzelkoordinate (Vertex-Feedback).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCoordinate {
    /// Feature, zu dem die Koordinate gehört
    pub feature_id: FeatureId,
    /// Punkt-separierter Index-Pfad innerhalb der Geometrie
    pub coord_path: String,
}

/// Quittung eines offenen Render-Batches.
///
/// Wird von [`FeatureStore::create_render_batch`] ausgegeben und muss über
/// [`FeatureStore::finish_render_batch`] eingelöst werden. Beim Abschluss
/// feuert genau eine Benachrichtigung, falls innerhalb des Batches
/// mindestens ein Render angefordert wurde, sonst keine.
#[must_use = "Render-Batch muss mit finish_render_batch abgeschlossen werden"]
pub struct RenderBatch {
    _private: (),
}

/// Hält die autoritative Sammlung der editierbaren Features.
#[derive(Default)]
pub struct FeatureStore {
    features: IndexMap<FeatureId, Feature>,
    /// Selektierte IDs; Invariante: Teilmenge der gespeicherten IDs
    selected_ids: IndexSet<FeatureId>,
    selected_coordinates: Vec<SelectedCoordinate>,
    /// Seit dem letzten Render geänderte IDs (Anlage oder Koordinaten-Mutation)
    changed_ids: IndexSet<FeatureId>,
    last_render_changed: Vec<FeatureId>,
    batch_depth: u32,
    pending_render: bool,
    render_count: u64,
    on_render: Option<Box<dyn FnMut()>>,
}

impl std::fmt::Debug for FeatureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureStore")
            .field("features", &self.features)
            .field("selected_ids", &self.selected_ids)
            .field("selected_coordinates", &self.selected_coordinates)
            .field("changed_ids", &self.changed_ids)
            .field("last_render_changed", &self.last_render_changed)
            .field("batch_depth", &self.batch_depth)
            .field("pending_render", &self.pending_render)
            .field("render_count", &self.render_count)
            .field("on_render", &self.on_render.is_some())
            .finish()
    }
}

impl FeatureStore {
    /// Erstellt einen leeren Store.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Features ────────────────────────────────────────────────

    /// Gibt die Anzahl der Features zurück.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Gibt `true` zurück, wenn der Store leer ist.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Schlägt ein Feature per ID nach.
    pub fn get(&self, id: &str) -> Option<&Feature> {
        self.features.get(id)
    }

    /// Iteriert über alle Features in stabiler Reihenfolge.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Gibt alle IDs in stabiler Reihenfolge zurück.
    pub fn all_ids(&self) -> Vec<FeatureId> {
        self.features.keys().cloned().collect()
    }

    /// Fügt ein Feature ein bzw. ersetzt den Eintrag gleicher ID
    /// (dessen Position bleibt erhalten). Kein Render.
    pub fn add(&mut self, feature: Feature) {
        let id = feature.id().to_string();
        self.changed_ids.insert(id.clone());
        self.features.insert(id, feature);
    }

    /// Aktualisiert ein Feature in-place: Properties werden vollständig
    /// ersetzt, Koordinaten nur übernommen, wenn sie sich strukturell
    /// unterscheiden. Nur die Koordinaten-Mutation markiert das Feature
    /// als geändert.
    ///
    /// Gibt `true` zurück, wenn die Koordinaten übernommen wurden.
    pub fn update_feature(
        &mut self,
        id: &str,
        properties: Map<String, Value>,
        geometry: Geometry,
    ) -> bool {
        let Some(feature) = self.features.get_mut(id) else {
            return false;
        };
        feature.set_properties(properties);
        if feature.geometry() != &geometry {
            feature.update_coordinates(geometry);
            self.changed_ids.insert(id.to_string());
            true
        } else {
            false
        }
    }

    /// Setzt eine einzelne Property eines Features. Die Änderung wird für
    /// das nächste Render vorgemerkt, löst aber selbst keines aus.
    pub fn set_feature_property(
        &mut self,
        id: &str,
        key: &str,
        value: Value,
    ) -> Result<(), EditError> {
        let Some(feature) = self.features.get_mut(id) else {
            return Err(EditError::MissingFeature(id.to_string()));
        };
        feature.set_property(key, value);
        self.changed_ids.insert(id.to_string());
        Ok(())
    }

    /// Löscht die angegebenen IDs. Selektion und Koordinaten-Marker der
    /// gelöschten Features werden mitbereinigt. Gibt die Anzahl der
    /// tatsächlich entfernten Features zurück.
    pub fn delete(&mut self, ids: &[FeatureId], silent: bool) -> usize {
        let mut removed = 0;
        for id in ids {
            if self.features.shift_remove(id.as_str()).is_some() {
                removed += 1;
                self.selected_ids.shift_remove(id.as_str());
                self.changed_ids.shift_remove(id.as_str());
            }
        }
        if removed > 0 {
            let vorher = self.selected_coordinates.len();
            self.selected_coordinates
                .retain(|marker| self.features.contains_key(marker.feature_id.as_str()));
            if self.selected_coordinates.len() < vorher {
                log::debug!(
                    "{} Koordinaten-Marker gelöschter Features entfernt",
                    vorher - self.selected_coordinates.len()
                );
            }
            log::debug!("{} Features gelöscht", removed);
        }
        if !silent {
            self.render();
        }
        removed
    }

    // ── Selektion ───────────────────────────────────────────────

    /// Gibt die selektierten IDs in stabiler Reihenfolge zurück.
    pub fn selected_ids(&self) -> Vec<FeatureId> {
        self.selected_ids.iter().cloned().collect()
    }

    /// Ersetzt die Selektion. IDs ohne gespeichertes Feature werden
    /// verworfen (Invariante: Selektion ⊆ Store-IDs).
    pub fn set_selected(&mut self, ids: &[FeatureId], silent: bool) {
        let mut neue: IndexSet<FeatureId> = IndexSet::with_capacity(ids.len());
        for id in ids {
            if self.features.contains_key(id.as_str()) {
                neue.insert(id.clone());
            } else {
                log::warn!("Selektion verworfen, Feature unbekannt: {}", id);
            }
        }
        self.selected_ids = neue;
        if !silent {
            self.render();
        }
    }

    /// Gibt die selektierten Koordinaten-Marker zurück.
    pub fn selected_coordinates(&self) -> &[SelectedCoordinate] {
        &self.selected_coordinates
    }

    /// Ersetzt die Koordinaten-Marker. Marker ohne gespeichertes Feature
    /// werden verworfen.
    pub fn set_selected_coordinates(&mut self, markers: Vec<SelectedCoordinate>, silent: bool) {
        self.selected_coordinates = markers
            .into_iter()
            .filter(|marker| self.features.contains_key(marker.feature_id.as_str()))
            .collect();
        if !silent {
            self.render();
        }
    }

    /// Entfernt alle Koordinaten-Marker (immer still).
    pub fn clear_selected_coordinates(&mut self) {
        self.selected_coordinates.clear();
    }

    // ── Render-Benachrichtigung ─────────────────────────────────

    /// Setzt den Render-Listener des Hosts.
    pub fn set_render_listener(&mut self, listener: impl FnMut() + 'static) {
        self.on_render = Some(Box::new(listener));
    }

    /// Gibt die Anzahl der bisher gefeuerten Render-Benachrichtigungen zurück.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// IDs, die mit dem letzten Render als geändert gemeldet wurden.
    pub fn last_render_changed(&self) -> &[FeatureId] {
        &self.last_render_changed
    }

    /// Fordert ein Render an. Innerhalb eines Batches wird die
    /// Benachrichtigung bis zum Batch-Abschluss zurückgehalten.
    pub fn render(&mut self) {
        if self.batch_depth > 0 {
            self.pending_render = true;
        } else {
            self.emit_render();
        }
    }

    /// Öffnet einen Render-Batch. Batches dürfen geschachtelt werden;
    /// gefeuert wird erst beim Abschluss des äußersten.
    pub fn create_render_batch(&mut self) -> RenderBatch {
        self.batch_depth += 1;
        RenderBatch { _private: () }
    }

    /// Schließt einen Render-Batch ab und feuert die zurückgehaltene
    /// Benachrichtigung genau einmal, falls eine angefordert wurde.
    pub fn finish_render_batch(&mut self, batch: RenderBatch) {
        let RenderBatch { _private: () } = batch;
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 && std::mem::take(&mut self.pending_render) {
            self.emit_render();
        }
    }

    fn emit_render(&mut self) {
        self.render_count += 1;
        self.last_render_changed = self.changed_ids.drain(..).collect();
        if let Some(listener) = self.on_render.as_mut() {
            listener();
        }
    }
}
