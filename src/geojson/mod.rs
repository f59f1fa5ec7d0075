//! GeoJSON-Leitungsformat: Normalisierung und Validierung roher Eingaben.

pub mod normalize;

pub use normalize::{
    normalize_collection, require_feature_collection, Hint, NormalizedCollection, RawFeature,
    Severity,
};
