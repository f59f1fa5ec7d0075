//! GeoFeature Editor Library.
//! Kern des interaktiven GeoJSON-Feature-Editors: Reconciliation eingehender
//! FeatureCollections gegen den Feature-Store und Verwaltung des
//! Selektions-/Editier-Modus. Renderer, Hit-Testing und Persistenz liefert
//! der Host.

pub mod core;
pub mod edit;
pub mod geojson;
pub mod modes;
pub mod shared;

pub use core::{
    combine_geometries, mint_feature_id, Feature, FeatureId, FeatureStore, Geometry,
    GeometryType, RenderBatch, SelectedCoordinate,
};
pub use edit::{EditorState, FeatureEditor};
pub use geojson::{normalize_collection, Hint, NormalizedCollection, RawFeature, Severity};
pub use modes::{ModeEngine, ModeId, ModeOptions};
pub use shared::{EditError, EditLog, EditOp, EditorOptions};
