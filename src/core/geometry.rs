//! Geometrie-Modell: geschlossene Typ-Aufzählung mit typspezifischen Koordinaten.
//!
//! Der Dispatch auf den konkreten Typ passiert einmalig beim Anlegen
//! (`Geometry::from_geojson`), danach ist das Typ-Tag eines Features
//! unveränderlich. Positionen sind 2D (`DVec2`); eine dritte Komponente
//! der Eingabe (Höhe) wird bei der Normalisierung verworfen.

use crate::shared::EditError;
use glam::DVec2;
use serde_json::{json, Value};

/// Geometrietyp-Tag in GeoJSON-Schreibweise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryType {
    /// GeoJSON-Schreibweise des Tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
        }
    }

    /// Parst ein GeoJSON-Tag. `None` für alles außerhalb der Aufzählung.
    pub fn from_tag(tag: &str) -> Option<GeometryType> {
        match tag {
            "Point" => Some(GeometryType::Point),
            "LineString" => Some(GeometryType::LineString),
            "Polygon" => Some(GeometryType::Polygon),
            "MultiPoint" => Some(GeometryType::MultiPoint),
            "MultiLineString" => Some(GeometryType::MultiLineString),
            "MultiPolygon" => Some(GeometryType::MultiPolygon),
            _ => None,
        }
    }

    /// Ist der Typ ein Multi-Typ?
    pub fn is_multi(&self) -> bool {
        matches!(
            self,
            GeometryType::MultiPoint | GeometryType::MultiLineString | GeometryType::MultiPolygon
        )
    }

    /// Basistyp: Multi-Typen werden auf ihren Einzeltyp abgebildet,
    /// Einzeltypen bleiben unverändert.
    pub fn part_type(&self) -> GeometryType {
        match self {
            GeometryType::MultiPoint => GeometryType::Point,
            GeometryType::MultiLineString => GeometryType::LineString,
            GeometryType::MultiPolygon => GeometryType::Polygon,
            other => *other,
        }
    }
}

impl std::fmt::Display for GeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometrie eines Features: Typ-Tag plus typspezifische Koordinaten.
///
/// `PartialEq` liefert die tiefe strukturelle Gleichheit, über die die
/// Reconciliation unnötige Koordinaten-Mutationen vermeidet.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Einzelne Position
    Point(DVec2),
    /// Positionsfolge (mindestens zwei Positionen)
    LineString(Vec<DVec2>),
    /// Ringe; jeder Ring geschlossen mit mindestens vier Positionen
    Polygon(Vec<Vec<DVec2>>),
    /// Mehrere Einzelpositionen
    MultiPoint(Vec<DVec2>),
    /// Mehrere Positionsfolgen
    MultiLineString(Vec<Vec<DVec2>>),
    /// Mehrere Ring-Mengen
    MultiPolygon(Vec<Vec<Vec<DVec2>>>),
}

impl Geometry {
    /// Gibt das Typ-Tag zurück.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
        }
    }

    /// Basistyp der Geometrie (siehe [`GeometryType::part_type`]).
    pub fn part_type(&self) -> GeometryType {
        self.geometry_type().part_type()
    }

    /// Baut eine Geometrie aus GeoJSON-Tag und Koordinaten-Wert.
    ///
    /// Unbekannte Tags (auch GeometryCollection) werden mit
    /// [`EditError::UnsupportedGeometry`] abgelehnt, strukturell ungültige
    /// Koordinaten mit [`EditError::Validation`].
    pub fn from_geojson(tag: &str, coordinates: &Value) -> Result<Geometry, EditError> {
        let Some(geometry_type) = GeometryType::from_tag(tag) else {
            return Err(EditError::UnsupportedGeometry(tag.to_string()));
        };

        match geometry_type {
            GeometryType::Point => Ok(Geometry::Point(parse_position(coordinates)?)),
            GeometryType::LineString => Ok(Geometry::LineString(parse_line(coordinates)?)),
            GeometryType::Polygon => Ok(Geometry::Polygon(parse_rings(coordinates)?)),
            GeometryType::MultiPoint => Ok(Geometry::MultiPoint(parse_positions(coordinates)?)),
            GeometryType::MultiLineString => {
                let lines = as_array(coordinates)?
                    .iter()
                    .map(parse_line)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Geometry::MultiLineString(lines))
            }
            GeometryType::MultiPolygon => {
                let polygons = as_array(coordinates)?
                    .iter()
                    .map(parse_rings)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Geometry::MultiPolygon(polygons))
            }
        }
    }

    /// Serialisiert die Koordinaten als GeoJSON-Wert (verschachtelte Arrays).
    pub fn coordinates_value(&self) -> Value {
        match self {
            Geometry::Point(p) => position_value(*p),
            Geometry::LineString(ps) | Geometry::MultiPoint(ps) => {
                Value::Array(ps.iter().map(|p| position_value(*p)).collect())
            }
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => Value::Array(
                rings
                    .iter()
                    .map(|ring| Value::Array(ring.iter().map(|p| position_value(*p)).collect()))
                    .collect(),
            ),
            Geometry::MultiPolygon(polygons) => Value::Array(
                polygons
                    .iter()
                    .map(|rings| {
                        Value::Array(
                            rings
                                .iter()
                                .map(|ring| {
                                    Value::Array(
                                        ring.iter().map(|p| position_value(*p)).collect(),
                                    )
                                })
                                .collect(),
                        )
                    })
                    .collect(),
            ),
        }
    }

    /// Serialisiert die Geometrie als GeoJSON-Objekt.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": self.geometry_type().as_str(),
            "coordinates": self.coordinates_value(),
        })
    }

    /// Liest eine einzelne Position über einen Punkt-separierten Index-Pfad
    /// (z.B. `"2"` in einer LineString, `"0.1"` in einem Polygon-Ring,
    /// `"1.0.2"` in einem MultiPolygon). Bei einem Point wird der Pfad
    /// ignoriert. `None` bei ungültigem Pfad.
    pub fn coordinate_at(&self, path: &str) -> Option<DVec2> {
        let indices: Vec<usize> = if path.is_empty() {
            Vec::new()
        } else {
            path.split('.')
                .map(str::parse)
                .collect::<Result<_, _>>()
                .ok()?
        };

        match self {
            Geometry::Point(p) => Some(*p),
            Geometry::LineString(ps) | Geometry::MultiPoint(ps) => {
                let &[i] = indices.as_slice() else {
                    return None;
                };
                ps.get(i).copied()
            }
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                let &[i, j] = indices.as_slice() else {
                    return None;
                };
                rings.get(i)?.get(j).copied()
            }
            Geometry::MultiPolygon(polygons) => {
                let &[i, j, k] = indices.as_slice() else {
                    return None;
                };
                polygons.get(i)?.get(j)?.get(k).copied()
            }
        }
    }

    /// Zerlegt eine Multi-Geometrie in ihre Einzelteile.
    /// Einzeltypen liefern sich selbst als einziges Teil.
    pub fn into_parts(self) -> Vec<Geometry> {
        match self {
            Geometry::MultiPoint(ps) => ps.into_iter().map(Geometry::Point).collect(),
            Geometry::MultiLineString(lines) => {
                lines.into_iter().map(Geometry::LineString).collect()
            }
            Geometry::MultiPolygon(polygons) => {
                polygons.into_iter().map(Geometry::Polygon).collect()
            }
            single => vec![single],
        }
    }
}

/// Kombiniert Einzel-Geometrien eines gemeinsamen Basistyps zur
/// passenden Multi-Geometrie. Teile fremden Typs werden übergangen.
pub fn combine_geometries(part_type: GeometryType, parts: Vec<Geometry>) -> Geometry {
    match part_type {
        GeometryType::Point | GeometryType::MultiPoint => Geometry::MultiPoint(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Point(p) => Some(p),
                    _ => None,
                })
                .collect(),
        ),
        GeometryType::LineString | GeometryType::MultiLineString => Geometry::MultiLineString(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::LineString(ps) => Some(ps),
                    _ => None,
                })
                .collect(),
        ),
        GeometryType::Polygon | GeometryType::MultiPolygon => Geometry::MultiPolygon(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Polygon(rings) => Some(rings),
                    _ => None,
                })
                .collect(),
        ),
    }
}

// ── Koordinaten-Parsing ─────────────────────────────────────────────

fn position_value(p: DVec2) -> Value {
    json!([p.x, p.y])
}

fn as_array(value: &Value) -> Result<&Vec<Value>, EditError> {
    value.as_array().ok_or_else(|| {
        EditError::Validation("Koordinaten müssen als Array vorliegen".to_string())
    })
}

/// Parst eine Position `[x, y]` bzw. `[x, y, z]`; die Höhe wird verworfen.
fn parse_position(value: &Value) -> Result<DVec2, EditError> {
    let arr = value.as_array().filter(|a| a.len() >= 2).ok_or_else(|| {
        EditError::Validation(
            "Eine Position muss ein Array aus mindestens zwei Zahlen sein".to_string(),
        )
    })?;
    let x = arr[0].as_f64().ok_or_else(|| {
        EditError::Validation("Positions-Komponenten müssen Zahlen sein".to_string())
    })?;
    let y = arr[1].as_f64().ok_or_else(|| {
        EditError::Validation("Positions-Komponenten müssen Zahlen sein".to_string())
    })?;
    Ok(DVec2::new(x, y))
}

fn parse_positions(value: &Value) -> Result<Vec<DVec2>, EditError> {
    as_array(value)?.iter().map(parse_position).collect()
}

/// Parst eine Positionsfolge mit mindestens zwei Positionen.
fn parse_line(value: &Value) -> Result<Vec<DVec2>, EditError> {
    let positions = parse_positions(value)?;
    if positions.len() < 2 {
        return Err(EditError::Validation(
            "Ein LineString benötigt mindestens zwei Positionen".to_string(),
        ));
    }
    Ok(positions)
}

/// Parst einen geschlossenen LinearRing (mindestens vier Positionen,
/// erste gleich letzter).
fn parse_ring(value: &Value) -> Result<Vec<DVec2>, EditError> {
    let positions = parse_positions(value)?;
    if positions.len() < 4 {
        return Err(EditError::Validation(
            "Ein LinearRing benötigt mindestens vier Positionen".to_string(),
        ));
    }
    if positions.first() != positions.last() {
        return Err(EditError::Validation(
            "Erste und letzte Position eines LinearRings müssen übereinstimmen".to_string(),
        ));
    }
    Ok(positions)
}

fn parse_rings(value: &Value) -> Result<Vec<Vec<DVec2>>, EditError> {
    as_array(value)?.iter().map(parse_ring).collect()
}
