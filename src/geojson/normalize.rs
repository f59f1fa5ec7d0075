//! Normalisierung GeoJSON-artiger Eingaben in eine typ-uniforme Feature-Liste.
//!
//! Akzeptiert eine FeatureCollection, ein einzelnes Feature oder eine nackte
//! Geometrie und liefert entweder die normalisierte Liste samt
//! Informations-Hinweisen oder den ersten fatalen Prüfgrund. Es wird nichts
//! mutiert: die Reconciliation fasst den Store erst an, wenn die gesamte
//! Eingabe geprüft ist.

use crate::core::{FeatureId, Geometry, GeometryType};
use crate::shared::options::COORDINATE_PRECISION_DIGITS;
use crate::shared::EditError;
use serde_json::{Map, Value};

/// Schwere eines Prüf-Hinweises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informativ, nicht fatal
    Info,
    /// Fatal für den gesamten Aufruf
    Error,
}

/// Ein einzelner Prüf-Hinweis des Validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    /// Schwere des Hinweises
    pub severity: Severity,
    /// Begründung in Klartext
    pub reason: String,
}

/// Ein normalisiertes Eingabe-Feature vor der Reconciliation.
#[derive(Debug, Clone)]
pub struct RawFeature {
    /// Mitgelieferte ID; `None` lässt die Reconciliation eine frische prägen
    pub id: Option<FeatureId>,
    /// Property-Bag (fehlende oder `null`-Properties werden zu leerem Objekt)
    pub properties: Map<String, Value>,
    /// Bereits geparste, 2D-normalisierte Geometrie
    pub geometry: Geometry,
}

/// Ergebnis einer erfolgreichen Normalisierung.
#[derive(Debug, Clone)]
pub struct NormalizedCollection {
    /// Eingabe-Features in Original-Reihenfolge
    pub features: Vec<RawFeature>,
    /// Nicht-fatale Hinweise ([`Severity::Info`])
    pub hints: Vec<Hint>,
}

/// Prüft die strikte FeatureCollection-Form (Top-Level-Typ und
/// Feature-Array). `set` akzeptiert im Gegensatz zu `add` keine
/// Einzel-Features.
pub fn require_feature_collection(value: &Value) -> Result<(), EditError> {
    let tag = value.get("type").and_then(Value::as_str);
    if tag != Some("FeatureCollection") || !value.get("features").is_some_and(Value::is_array) {
        return Err(EditError::Validation(
            "Ungültige FeatureCollection".to_string(),
        ));
    }
    Ok(())
}

/// Normalisiert eine GeoJSON-artige Eingabe zu einer Feature-Liste.
///
/// `precision_hints` aktiviert Informations-Hinweise für Koordinaten mit
/// mehr als [`COORDINATE_PRECISION_DIGITS`] Nachkommastellen.
pub fn normalize_collection(
    value: &Value,
    precision_hints: bool,
) -> Result<NormalizedCollection, EditError> {
    let Some(tag) = value.get("type").and_then(Value::as_str) else {
        return Err(EditError::Validation(
            "Eingabe hat kein type-Feld".to_string(),
        ));
    };

    let mut hints = Vec::new();
    let features = match tag {
        "FeatureCollection" => {
            let Some(entries) = value.get("features").and_then(Value::as_array) else {
                return Err(EditError::Validation(
                    "FeatureCollection ohne features-Array".to_string(),
                ));
            };
            entries
                .iter()
                .map(|entry| normalize_feature(entry, precision_hints, &mut hints))
                .collect::<Result<Vec<_>, _>>()?
        }
        "Feature" => vec![normalize_feature(value, precision_hints, &mut hints)?],
        _ => {
            // Nackte Geometrie: in ein Feature ohne ID und Properties einpacken
            vec![normalize_bare_geometry(value, tag, precision_hints, &mut hints)?]
        }
    };

    Ok(NormalizedCollection { features, hints })
}

fn normalize_bare_geometry(
    value: &Value,
    tag: &str,
    precision_hints: bool,
    hints: &mut Vec<Hint>,
) -> Result<RawFeature, EditError> {
    if tag == "GeometryCollection" {
        return Err(EditError::UnsupportedGeometry(tag.to_string()));
    }
    if GeometryType::from_tag(tag).is_none() {
        return Err(EditError::Validation(format!(
            "Unbekannter GeoJSON-Typ: {tag}"
        )));
    }
    let Some(coordinates) = value.get("coordinates") else {
        return Err(EditError::Validation(
            "Geometrie ohne Koordinaten".to_string(),
        ));
    };
    let geometry = Geometry::from_geojson(tag, coordinates)?;
    if precision_hints {
        push_precision_hint(coordinates, hints);
    }
    Ok(RawFeature {
        id: None,
        properties: Map::new(),
        geometry,
    })
}

fn normalize_feature(
    value: &Value,
    precision_hints: bool,
    hints: &mut Vec<Hint>,
) -> Result<RawFeature, EditError> {
    if value.get("type").and_then(Value::as_str) != Some("Feature") {
        return Err(EditError::Validation(
            "Jedes Element der FeatureCollection muss ein Feature sein".to_string(),
        ));
    }

    let geometry_value = value.get("geometry").unwrap_or(&Value::Null);
    if geometry_value.is_null() {
        return Err(EditError::Validation("Geometrie ist null".to_string()));
    }
    let Some(tag) = geometry_value.get("type").and_then(Value::as_str) else {
        return Err(EditError::Validation(
            "Geometrie ohne type-Feld".to_string(),
        ));
    };
    let Some(coordinates) = geometry_value.get("coordinates") else {
        return Err(EditError::Validation(
            "Geometrie ohne Koordinaten".to_string(),
        ));
    };
    let geometry = Geometry::from_geojson(tag, coordinates)?;
    if precision_hints {
        push_precision_hint(coordinates, hints);
    }

    let id = match value.get("id") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let properties = match value.get("properties") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return Err(EditError::Validation(
                "Properties müssen ein Objekt sein".to_string(),
            ));
        }
    };

    Ok(RawFeature {
        id,
        properties,
        geometry,
    })
}

// ── Präzisions-Hinweise ─────────────────────────────────────────────

/// Meldet höchstens einen Hinweis pro Geometrie.
fn push_precision_hint(coordinates: &Value, hints: &mut Vec<Hint>) {
    if has_excess_precision(coordinates) {
        hints.push(Hint {
            severity: Severity::Info,
            reason: format!(
                "Koordinaten mit mehr als {} Nachkommastellen",
                COORDINATE_PRECISION_DIGITS
            ),
        });
    }
}

fn has_excess_precision(value: &Value) -> bool {
    match value {
        Value::Array(entries) => entries.iter().any(has_excess_precision),
        Value::Number(n) => n.as_f64().is_some_and(|v| {
            let scaled = v * 10f64.powi(COORDINATE_PRECISION_DIGITS as i32);
            (scaled - scaled.round()).abs() > 1e-3
        }),
        _ => false,
    }
}
