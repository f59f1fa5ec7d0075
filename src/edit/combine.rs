//! Kombinieren und Zerlegen selektierter Features über Multi-Geometrien.
//!
//! Beide Operationen arbeiten auf der aktuellen Selektion und nur im
//! Select-Modus. Die neuen Features erhalten frisch geprägte IDs, die
//! Properties erben sie vom ersten bzw. vom jeweiligen Eltern-Feature.

use super::EditorState;
use crate::core::{combine_geometries, mint_feature_id, Feature, FeatureId, GeometryType};
use crate::modes::ModeId;
use crate::shared::EditOp;

/// Kombiniert die selektierten Features zu einem Multi-Feature.
///
/// Voraussetzung: mindestens zwei selektierte Features mit gemeinsamem
/// Basistyp (Point/MultiPoint mischbar, analog für die übrigen Typen).
/// Andernfalls passiert nichts. Das Ergebnis ist anschließend selektiert;
/// nach außen sichtbar ist genau eine Render-Benachrichtigung.
pub fn combine_selected(state: &mut EditorState) {
    if state.modes.current() != &ModeId::Select {
        log::debug!("Kombinieren nur im Select-Modus möglich");
        return;
    }
    let ids = state.store.selected_ids();
    if ids.len() < 2 {
        log::debug!("Kombinieren benötigt mindestens zwei selektierte Features");
        return;
    }

    let mut part_type: Option<GeometryType> = None;
    let mut parts = Vec::new();
    let mut properties = None;
    for id in &ids {
        let Some(feature) = state.store.get(id) else {
            continue;
        };
        let base = feature.geometry().part_type();
        match part_type {
            None => part_type = Some(base),
            Some(typ) if typ == base => {}
            Some(_) => {
                log::info!("Kombinieren abgebrochen: gemischte Geometrietypen in der Selektion");
                return;
            }
        }
        if properties.is_none() {
            properties = Some(feature.properties().clone());
        }
        parts.extend(feature.geometry().clone().into_parts());
    }
    let (Some(part_type), Some(properties)) = (part_type, properties) else {
        return;
    };

    let combined = combine_geometries(part_type, parts);
    let new_id = mint_feature_id();

    let batch = state.store.create_render_batch();
    state
        .store
        .add(Feature::new(new_id.clone(), combined, properties));
    state.store.delete(&ids, true);
    state.store.set_selected(std::slice::from_ref(&new_id), true);
    state.store.render();
    state.store.finish_render_batch(batch);

    state.edit_log.record(EditOp::Combine {
        sources: ids.len(),
    });
    log::debug!("{} Features zu {} kombiniert", ids.len(), new_id);
}

/// Zerlegt selektierte Multi-Features in Einzel-Features.
///
/// Einzel-Features der Selektion bleiben unverändert selektiert. Gibt es
/// kein Multi-Feature in der Selektion, passiert nichts.
pub fn uncombine_selected(state: &mut EditorState) {
    if state.modes.current() != &ModeId::Select {
        log::debug!("Zerlegen nur im Select-Modus möglich");
        return;
    }
    let ids = state.store.selected_ids();
    if ids.is_empty() {
        return;
    }

    let mut neue_selektion: Vec<FeatureId> = Vec::new();
    let mut zu_loeschen: Vec<FeatureId> = Vec::new();
    let mut neue_features: Vec<Feature> = Vec::new();
    for id in &ids {
        let Some(feature) = state.store.get(id) else {
            continue;
        };
        if !feature.geometry_type().is_multi() {
            neue_selektion.push(id.clone());
            continue;
        }
        let properties = feature.properties().clone();
        for part in feature.geometry().clone().into_parts() {
            let part_id = mint_feature_id();
            neue_features.push(Feature::new(part_id.clone(), part, properties.clone()));
            neue_selektion.push(part_id);
        }
        zu_loeschen.push(id.clone());
    }
    if zu_loeschen.is_empty() {
        log::debug!("Keine Multi-Features in der Selektion");
        return;
    }

    let created = neue_features.len();
    let batch = state.store.create_render_batch();
    for feature in neue_features {
        state.store.add(feature);
    }
    state.store.delete(&zu_loeschen, true);
    state.store.set_selected(&neue_selektion, true);
    state.store.render();
    state.store.finish_render_batch(batch);

    state.edit_log.record(EditOp::Uncombine { created });
    log::debug!(
        "{} Multi-Features in {} Einzel-Features zerlegt",
        zu_loeschen.len(),
        created
    );
}
