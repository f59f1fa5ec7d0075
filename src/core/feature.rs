//! Editierbare Features: eindeutige ID, Typ-Tag, Properties, Koordinaten.

use super::{Geometry, GeometryType};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Eindeutige Feature-ID innerhalb des Stores.
pub type FeatureId = String;

/// Erzeugt eine frische, global eindeutige Feature-ID.
/// Die Kollisionswahrscheinlichkeit wird als null behandelt.
pub fn mint_feature_id() -> FeatureId {
    Uuid::new_v4().simple().to_string()
}

/// Ein einzelnes editierbares Feature.
///
/// Das Geometrietyp-Tag ist nach dem Anlegen unveränderlich: ein
/// Typwechsel unter gleicher ID läuft über Löschen und Neuanlegen,
/// nicht über Mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: FeatureId,
    geometry: Geometry,
    properties: Map<String, Value>,
}

impl Feature {
    /// Erstellt ein neues Feature.
    pub fn new(id: FeatureId, geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            id,
            geometry,
            properties,
        }
    }

    /// Gibt die Feature-ID zurück.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Gibt die Geometrie zurück.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Gibt das Geometrietyp-Tag zurück.
    pub fn geometry_type(&self) -> GeometryType {
        self.geometry.geometry_type()
    }

    /// Gibt die Properties zurück.
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Ersetzt die Properties vollständig (kein Merge).
    pub fn set_properties(&mut self, properties: Map<String, Value>) {
        self.properties = properties;
    }

    /// Setzt eine einzelne Property.
    pub fn set_property(&mut self, key: &str, value: Value) {
        self.properties.insert(key.to_string(), value);
    }

    /// Ersetzt die Koordinaten durch eine Geometrie gleichen Typs.
    ///
    /// Der Typwechsel-Fall wird von der Reconciliation vorab als
    /// Neuanlage klassifiziert und landet nie hier.
    pub fn update_coordinates(&mut self, geometry: Geometry) {
        debug_assert_eq!(self.geometry.geometry_type(), geometry.geometry_type());
        self.geometry = geometry;
    }

    /// Serialisiert das Feature als GeoJSON-Objekt.
    pub fn to_geojson(&self) -> Value {
        json!({
            "id": self.id,
            "type": "Feature",
            "properties": Value::Object(self.properties.clone()),
            "geometry": self.geometry.to_geojson(),
        })
    }
}
