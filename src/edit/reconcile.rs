//! Reconciliation: "ersetze die gesamte Sammlung" als minimale
//! Add/Update/Delete-Schritte gegen den Store.
//!
//! Klassifiziert wird über das Paar (ID, Geometrietyp): gleiche ID mit
//! gleichem Typ wird in-place aktualisiert, gleiche ID mit anderem Typ
//! neu angelegt. So kann ein Aufrufer den Typ eines Features unter
//! Beibehaltung seiner ID wechseln, verliert dafür in diesem einen
//! Schritt die In-place-Semantik.

use super::{guard, EditorState};
use crate::core::{mint_feature_id, Feature, FeatureId};
use crate::geojson::{normalize_collection, require_feature_collection, NormalizedCollection};
use crate::shared::{EditError, EditOp};
use serde_json::Value;
use std::collections::HashSet;

/// Ersetzt den gesamten Store-Inhalt durch die Eingabe-Sammlung.
///
/// Validiert zuerst (bei Fehler bleibt der Store unberührt und es feuert
/// keine Benachrichtigung), dann innerhalb eines Render-Batches: Upsert
/// aller Eingabe-Features, anschließend Löschen aller IDs des vorherigen
/// Bestands, die in der neuen ID-Menge fehlen. Das Löschen läuft über den
/// Guard, damit ein verschwundenes gebundenes Feature den Modus-Ausstieg
/// auslöst. Nach außen sichtbar ist genau eine Render-Benachrichtigung.
pub fn replace_all(
    state: &mut EditorState,
    collection: &Value,
) -> Result<Vec<FeatureId>, EditError> {
    require_feature_collection(collection)?;
    let normalized =
        normalize_collection(collection, state.options.coordinate_precision_hints)?;

    let batch = state.store.create_render_batch();
    let bestand = state.store.all_ids();
    let new_ids = apply_upserts(state, normalized);

    let lookup: HashSet<&str> = new_ids.iter().map(String::as_str).collect();
    let veraltet: Vec<FeatureId> = bestand
        .into_iter()
        .filter(|id| !lookup.contains(id.as_str()))
        .collect();
    let delete_result = if veraltet.is_empty() {
        Ok(())
    } else {
        guard::delete_features(state, &veraltet)
    };

    state.store.finish_render_batch(batch);
    delete_result?;
    Ok(new_ids)
}

/// Fügt die Eingabe-Features dem Store hinzu bzw. aktualisiert sie.
///
/// Gibt die aufgelösten IDs in Eingabe-Reihenfolge zurück. Doppelte IDs
/// innerhalb einer Eingabe sind möglich; spätere Einträge gewinnen, auch
/// beim Geometrietyp (jeder Eintrag durchläuft die Klassifikation einzeln).
pub fn upsert_all(state: &mut EditorState, geojson: &Value) -> Result<Vec<FeatureId>, EditError> {
    let normalized = normalize_collection(geojson, state.options.coordinate_precision_hints)?;
    Ok(apply_upserts(state, normalized))
}

/// Führt die bereits validierten Upserts aus. Ab hier kann nichts mehr
/// fehlschlagen, der Store wird nie teilweise mutiert zurückgelassen.
fn apply_upserts(state: &mut EditorState, normalized: NormalizedCollection) -> Vec<FeatureId> {
    for hint in &normalized.hints {
        log::info!("Hinweis des Validators: {}", hint.reason);
    }

    let mut created = 0usize;
    let mut updated = 0usize;
    let mut ids = Vec::with_capacity(normalized.features.len());

    for raw in normalized.features {
        let id = raw.id.unwrap_or_else(mint_feature_id);
        let existing_type = state.store.get(&id).map(Feature::geometry_type);
        match existing_type {
            Some(typ) if typ == raw.geometry.geometry_type() => {
                state.store.update_feature(&id, raw.properties, raw.geometry);
                updated += 1;
            }
            _ => {
                state
                    .store
                    .add(Feature::new(id.clone(), raw.geometry, raw.properties));
                created += 1;
            }
        }
        ids.push(id);
    }

    log::debug!("Upsert: {} neu, {} aktualisiert", created, updated);
    state.edit_log.record(EditOp::Upsert { created, updated });
    state.store.render();
    ids
}
