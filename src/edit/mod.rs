//! Edit-Oberfläche: Reconciliation, Modus-Guard und die Host-API.
//!
//! `EditorState` bündelt Store, Modus-Engine, Optionen und Edit-Log in
//! einem einzigen besessenen Zustand; sämtliche Mutation läuft über die
//! Use-Case-Funktionen in `reconcile`, `guard` und `combine`.
//! `FeatureEditor` ist die dünne Fassade, die der Host aufruft.

pub mod combine;
pub mod guard;
pub mod reconcile;

use crate::core::{FeatureId, FeatureStore};
use crate::modes::{ModeEngine, ModeId, ModeOptions};
use crate::shared::{EditError, EditLog, EditorOptions};
use serde_json::{json, Value};

/// Gesamter veränderlicher Zustand des Editors.
#[derive(Debug)]
pub struct EditorState {
    /// Autoritative Feature-Sammlung samt Selektion
    pub store: FeatureStore,
    /// Aktueller Modus und Transitionen
    pub modes: ModeEngine,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
    /// Verlauf ausgeführter Edit-Operationen
    pub edit_log: EditLog,
}

impl EditorState {
    /// Erstellt einen leeren Zustand; der Startmodus kommt aus den Optionen.
    pub fn new(options: EditorOptions) -> Self {
        let mut modes = ModeEngine::new();
        match ModeId::from_tag(&options.default_mode) {
            ModeId::Select => {}
            ModeId::DirectSelect => {
                log::warn!("direct_select ist als Startmodus ungültig, verwende select");
            }
            custom @ ModeId::Custom(_) => {
                modes.register_mode(custom.as_tag());
                modes.set_initial(custom);
            }
        }
        Self {
            store: FeatureStore::new(),
            modes,
            options,
            edit_log: EditLog::new(),
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

/// Die öffentliche Edit-Oberfläche des Editors.
#[derive(Default, Debug)]
pub struct FeatureEditor {
    /// Gesamter Editor-Zustand (für Host-Verdrahtung und Tests zugänglich)
    pub state: EditorState,
}

impl FeatureEditor {
    /// Erstellt einen Editor mit Standard-Optionen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Erstellt einen Editor mit den angegebenen Optionen.
    pub fn with_options(options: EditorOptions) -> Self {
        Self {
            state: EditorState::new(options),
        }
    }

    /// Registriert einen Custom-Modus unter seinem Tag.
    pub fn register_mode(&mut self, tag: &str) -> &mut Self {
        self.state.modes.register_mode(tag);
        self
    }

    /// Alle verfügbaren Modus-Tags (eingebaute plus registrierte).
    pub fn available_modes(&self) -> Vec<String> {
        self.state.modes.mode_tags()
    }

    // ── Feature-Operationen ─────────────────────────────────────

    /// Ersetzt den gesamten Feature-Bestand durch die Eingabe-Sammlung.
    /// Gibt die aufgelösten IDs in Eingabe-Reihenfolge zurück.
    pub fn set(&mut self, collection: &Value) -> Result<Vec<FeatureId>, EditError> {
        reconcile::replace_all(&mut self.state, collection)
    }

    /// Fügt Features hinzu bzw. aktualisiert sie (FeatureCollection,
    /// einzelnes Feature oder nackte Geometrie).
    pub fn add(&mut self, geojson: &Value) -> Result<Vec<FeatureId>, EditError> {
        reconcile::upsert_all(&mut self.state, geojson)
    }

    /// Gibt ein Feature als GeoJSON zurück.
    pub fn get(&self, id: &str) -> Option<Value> {
        self.state.store.get(id).map(|feature| feature.to_geojson())
    }

    /// Gibt alle Features als FeatureCollection zurück (stabile Reihenfolge).
    pub fn get_all(&self) -> Value {
        let features: Vec<Value> = self
            .state
            .store
            .features()
            .map(|feature| feature.to_geojson())
            .collect();
        json!({"type": "FeatureCollection", "features": features})
    }

    /// Löscht die angegebenen Features (Modus-konsistent).
    pub fn delete(&mut self, ids: &[FeatureId]) -> Result<&mut Self, EditError> {
        guard::delete_features(&mut self.state, ids)?;
        Ok(self)
    }

    /// Löscht alle Features (Modus-konsistent).
    pub fn delete_all(&mut self) -> Result<&mut Self, EditError> {
        guard::delete_all_features(&mut self.state)?;
        Ok(self)
    }

    /// Löscht die aktuell selektierten Features (Modus-konsistent).
    pub fn trash(&mut self) -> Result<&mut Self, EditError> {
        let selektiert = self.state.store.selected_ids();
        guard::delete_features(&mut self.state, &selektiert)?;
        Ok(self)
    }

    /// Setzt eine einzelne Property eines Features.
    pub fn set_feature_property(
        &mut self,
        id: &str,
        key: &str,
        value: Value,
    ) -> Result<&mut Self, EditError> {
        self.state.store.set_feature_property(id, key, value)?;
        Ok(self)
    }

    // ── Selektion ───────────────────────────────────────────────

    /// Gibt die selektierten IDs in stabiler Reihenfolge zurück.
    pub fn get_selected_ids(&self) -> Vec<FeatureId> {
        self.state.store.selected_ids()
    }

    /// Gibt die selektierten Features als FeatureCollection zurück.
    pub fn get_selected(&self) -> Value {
        let features: Vec<Value> = self
            .state
            .store
            .selected_ids()
            .iter()
            .filter_map(|id| self.state.store.get(id))
            .map(|feature| feature.to_geojson())
            .collect();
        json!({"type": "FeatureCollection", "features": features})
    }

    /// Gibt die selektierten Einzelkoordinaten als Point-FeatureCollection
    /// zurück (Vertex-Feedback).
    pub fn get_selected_points(&self) -> Value {
        let features: Vec<Value> = self
            .state
            .store
            .selected_coordinates()
            .iter()
            .filter_map(|marker| {
                let feature = self.state.store.get(&marker.feature_id)?;
                let position = feature.geometry().coordinate_at(&marker.coord_path)?;
                Some(json!({
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "Point",
                        "coordinates": [position.x, position.y],
                    },
                }))
            })
            .collect();
        json!({"type": "FeatureCollection", "features": features})
    }

    // ── Modus ───────────────────────────────────────────────────

    /// Fordert einen Modus-Wechsel an (über den Guard, ggf. kurzgeschlossen).
    pub fn change_mode(
        &mut self,
        target: ModeId,
        options: ModeOptions,
    ) -> Result<&mut Self, EditError> {
        guard::request_mode_change(&mut self.state, target, options)?;
        Ok(self)
    }

    /// Gibt den aktuellen Modus zurück.
    pub fn get_mode(&self) -> ModeId {
        self.state.modes.current().clone()
    }

    // ── Kombinieren ─────────────────────────────────────────────

    /// Kombiniert die selektierten Features zu einem Multi-Feature.
    pub fn combine_features(&mut self) -> &mut Self {
        combine::combine_selected(&mut self.state);
        self
    }

    /// Zerlegt selektierte Multi-Features in Einzel-Features.
    pub fn uncombine_features(&mut self) -> &mut Self {
        combine::uncombine_selected(&mut self.state);
        self
    }
}
