//! Transition-Engine: besitzt den aktuellen Modus und führt Wechsel aus.
//!
//! Die Engine wendet die durch die Optionen implizierte Selektion an,
//! zählt Transitionen mit und fordert am Ende jedes Wechsels genau ein
//! Render an. `silent` unterdrückt nur die externe Modus-Benachrichtigung,
//! nie das Render der Transition selbst.

use super::{ModeId, ModeOptions, MODE_DIRECT_SELECT, MODE_SELECT};
use crate::core::{FeatureId, FeatureStore};
use crate::shared::EditError;
use indexmap::IndexSet;

/// Besitzt den aktuellen Editier-Modus und dessen Parameter.
#[derive(Default)]
pub struct ModeEngine {
    current: ModeId,
    /// Gebundenes Feature im DirectSelect-Modus
    bound_feature: Option<FeatureId>,
    /// Extern registrierte Custom-Modus-Tags
    registered: IndexSet<String>,
    transitions: u64,
    on_mode_change: Option<Box<dyn FnMut(&ModeId)>>,
}

impl std::fmt::Debug for ModeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeEngine")
            .field("current", &self.current)
            .field("bound_feature", &self.bound_feature)
            .field("registered", &self.registered)
            .field("transitions", &self.transitions)
            .field("on_mode_change", &self.on_mode_change.is_some())
            .finish()
    }
}

impl ModeEngine {
    /// Erstellt eine Engine im Select-Modus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gibt den aktuellen Modus zurück.
    pub fn current(&self) -> &ModeId {
        &self.current
    }

    /// Gibt die ID des gebundenen Features zurück (nur DirectSelect).
    pub fn bound_feature_id(&self) -> Option<&str> {
        self.bound_feature.as_deref()
    }

    /// Registriert einen Custom-Modus unter seinem Tag.
    pub fn register_mode(&mut self, tag: &str) {
        if self.registered.insert(tag.to_string()) {
            log::debug!("Custom-Modus registriert: {}", tag);
        }
    }

    /// Ist das Custom-Tag registriert?
    pub fn is_registered(&self, tag: &str) -> bool {
        self.registered.contains(tag)
    }

    /// Alle verfügbaren Modus-Tags (eingebaute plus registrierte).
    pub fn mode_tags(&self) -> Vec<String> {
        let mut tags = vec![MODE_SELECT.to_string(), MODE_DIRECT_SELECT.to_string()];
        tags.extend(self.registered.iter().cloned());
        tags
    }

    /// Anzahl der bisher ausgeführten Transitionen.
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Setzt den Listener für nicht-stille Modus-Wechsel.
    pub fn set_mode_listener(&mut self, listener: impl FnMut(&ModeId) + 'static) {
        self.on_mode_change = Some(Box::new(listener));
    }

    /// Setzt den Startmodus ohne Transition (nur Konstruktor-Pfad).
    pub fn set_initial(&mut self, mode: ModeId) {
        self.current = mode;
    }

    /// Führt einen Modus-Wechsel aus.
    ///
    /// Wendet die implizierte Selektion an, setzt den aktuellen Modus und
    /// fordert genau ein Render an. Bei `silent` unterbleibt nur die
    /// Modus-Benachrichtigung an den Host.
    pub fn change_mode(
        &mut self,
        store: &mut FeatureStore,
        target: ModeId,
        options: ModeOptions,
        silent: bool,
    ) -> Result<(), EditError> {
        match &target {
            ModeId::Select => {
                store.set_selected(&options.feature_ids, true);
                store.clear_selected_coordinates();
                self.bound_feature = None;
            }
            ModeId::DirectSelect => {
                let Some(id) = options.feature_id.clone() else {
                    return Err(EditError::Validation(
                        "direct_select benötigt eine Feature-ID".to_string(),
                    ));
                };
                if store.get(&id).is_none() {
                    return Err(EditError::MissingFeature(id));
                }
                store.set_selected(std::slice::from_ref(&id), true);
                store.clear_selected_coordinates();
                self.bound_feature = Some(id);
            }
            ModeId::Custom(tag) => {
                if !self.registered.contains(tag.as_str()) {
                    return Err(EditError::UnknownMode(tag.clone()));
                }
                // Custom-Modi verwalten ihre Selektion selbst
                self.bound_feature = None;
            }
        }

        let from = std::mem::replace(&mut self.current, target);
        self.transitions += 1;
        log::debug!("Moduswechsel {} → {}", from, self.current);

        if !silent {
            if let Some(listener) = self.on_mode_change.as_mut() {
                listener(&self.current);
            }
        }
        store.render();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Feature, Geometry};
    use glam::DVec2;
    use serde_json::Map;

    fn store_mit_punkt(id: &str) -> FeatureStore {
        let mut store = FeatureStore::new();
        store.add(Feature::new(
            id.to_string(),
            Geometry::Point(DVec2::new(1.0, 1.0)),
            Map::new(),
        ));
        store
    }

    #[test]
    fn test_direct_select_bindet_und_selektiert() {
        let mut store = store_mit_punkt("a");
        let mut engine = ModeEngine::new();

        engine
            .change_mode(
                &mut store,
                ModeId::DirectSelect,
                ModeOptions::with_feature_id("a".to_string()),
                true,
            )
            .expect("Wechsel erwartet");

        assert_eq!(engine.current(), &ModeId::DirectSelect);
        assert_eq!(engine.bound_feature_id(), Some("a"));
        assert_eq!(store.selected_ids(), vec!["a".to_string()]);
        assert_eq!(store.render_count(), 1);
    }

    #[test]
    fn test_direct_select_erfordert_vorhandenes_feature() {
        let mut store = FeatureStore::new();
        let mut engine = ModeEngine::new();

        let err = engine
            .change_mode(
                &mut store,
                ModeId::DirectSelect,
                ModeOptions::with_feature_id("geist".to_string()),
                true,
            )
            .unwrap_err();
        assert_eq!(err, EditError::MissingFeature("geist".to_string()));
        assert_eq!(engine.current(), &ModeId::Select);
        assert_eq!(engine.transition_count(), 0);
    }

    #[test]
    fn test_custom_modus_muss_registriert_sein() {
        let mut store = FeatureStore::new();
        let mut engine = ModeEngine::new();

        let err = engine
            .change_mode(
                &mut store,
                ModeId::Custom("lasso".to_string()),
                ModeOptions::default(),
                true,
            )
            .unwrap_err();
        assert_eq!(err, EditError::UnknownMode("lasso".to_string()));

        engine.register_mode("lasso");
        engine
            .change_mode(
                &mut store,
                ModeId::Custom("lasso".to_string()),
                ModeOptions::default(),
                true,
            )
            .expect("Wechsel erwartet");
        assert_eq!(engine.current().as_tag(), "lasso");
    }

    #[test]
    fn test_silent_unterdrueckt_listener_nicht_render() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut store = store_mit_punkt("a");
        let mut engine = ModeEngine::new();
        let gefeuert = Rc::new(Cell::new(0u32));
        let beobachter = Rc::clone(&gefeuert);
        engine.set_mode_listener(move |_| beobachter.set(beobachter.get() + 1));

        engine
            .change_mode(
                &mut store,
                ModeId::DirectSelect,
                ModeOptions::with_feature_id("a".to_string()),
                true,
            )
            .expect("Wechsel erwartet");
        assert_eq!(gefeuert.get(), 0);
        assert_eq!(store.render_count(), 1);

        engine
            .change_mode(&mut store, ModeId::Select, ModeOptions::default(), false)
            .expect("Wechsel erwartet");
        assert_eq!(gefeuert.get(), 1);
        assert_eq!(store.render_count(), 2);
    }
}
