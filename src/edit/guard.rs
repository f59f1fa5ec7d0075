//! Modus-Guard: fängt Modus- und Lösch-Anfragen ab.
//!
//! Vermeidet redundante Transitionen (Selektion wird im Select-Modus
//! direkt ersetzt statt den Modus neu aufzubauen) und erzwingt den
//! Ausstieg aus dem feature-gebundenen Modus, sobald dessen Feature
//! verschwindet. Eigene Fehlerarten führt der Guard nicht ein, Fehler
//! der Engine werden durchgereicht.

use super::EditorState;
use crate::core::FeatureId;
use crate::modes::{ModeId, ModeOptions};
use crate::shared::{EditError, EditOp};
use indexmap::IndexSet;

/// Vergleicht zwei ID-Mengen ungeordnet.
fn id_sets_equal(a: &[FeatureId], b: &[FeatureId]) -> bool {
    let a: IndexSet<&str> = a.iter().map(String::as_str).collect();
    let b: IndexSet<&str> = b.iter().map(String::as_str).collect();
    a.len() == b.len() && a.iter().all(|id| b.contains(*id))
}

/// Führt einen Modus-Wechsel aus, sofern er nicht kurzgeschlossen wird.
pub fn request_mode_change(
    state: &mut EditorState,
    target: ModeId,
    options: ModeOptions,
) -> Result<(), EditError> {
    // Kurzschluss 1: Select → Select mit identischer Selektion. Der Modus
    // wird nicht neu aufgebaut, die Selektion direkt überschrieben.
    if target == ModeId::Select && state.modes.current() == &ModeId::Select {
        let current = state.store.selected_ids();
        if id_sets_equal(&options.feature_ids, &current) {
            let count = options.feature_ids.len();
            state.store.set_selected(&options.feature_ids, true);
            state.store.render();
            state.edit_log.record(EditOp::SelectionReplace { count });
            log::debug!("Selektion im Select-Modus direkt ersetzt ({} IDs)", count);
            return Ok(());
        }
    }

    // Kurzschluss 2: DirectSelect → DirectSelect mit demselben gebundenen
    // Feature wie die aktuelle Einzel-Selektion.
    if target == ModeId::DirectSelect && state.modes.current() == &ModeId::DirectSelect {
        let selected = state.store.selected_ids();
        if options.feature_id.as_deref() == selected.first().map(String::as_str) {
            return Ok(());
        }
    }

    let from = state.modes.current().clone();
    state
        .modes
        .change_mode(&mut state.store, target.clone(), options, true)?;
    state.edit_log.record(EditOp::ModeChange { from, to: target });
    Ok(())
}

/// Löscht Features still und hält den Modus konsistent.
///
/// Die Reihenfolge ist tragend: erst die Modus-Prüfung, dann das Render.
/// Beobachter dürfen nie einen gebundenen Modus sehen, der auf ein
/// verschwundenes Feature zeigt.
pub fn delete_features(state: &mut EditorState, ids: &[FeatureId]) -> Result<(), EditError> {
    let removed = state.store.delete(ids, true);
    state.edit_log.record(EditOp::Delete { removed });

    if state.modes.current().is_feature_bound() && state.store.selected_ids().is_empty() {
        force_exit_bound_mode(state)?;
    } else {
        state.store.render();
    }
    Ok(())
}

/// Löscht alle Features des Stores still und hält den Modus konsistent.
///
/// Nach einem vollständigen Löschen kann kein Feature mehr selektiert
/// sein; die Prüfung reduziert sich auf den aktuellen Modus.
pub fn delete_all_features(state: &mut EditorState) -> Result<(), EditError> {
    let alle = state.store.all_ids();
    let removed = state.store.delete(&alle, true);
    state.edit_log.record(EditOp::Delete { removed });

    if state.modes.current().is_feature_bound() {
        force_exit_bound_mode(state)?;
    } else {
        state.store.render();
    }
    Ok(())
}

/// Erzwungener Ausstieg in den Select-Modus (still). Das Render der
/// Transition übernimmt die Engine.
fn force_exit_bound_mode(state: &mut EditorState) -> Result<(), EditError> {
    let from = state.modes.current().clone();
    state
        .modes
        .change_mode(&mut state.store, ModeId::Select, ModeOptions::default(), true)?;
    state.edit_log.record(EditOp::ModeChange {
        from,
        to: ModeId::Select,
    });
    Ok(())
}
