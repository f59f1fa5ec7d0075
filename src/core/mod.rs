//! Core-Domänentypen: Geometrien, Features, Feature-Store.

pub mod feature;
pub mod geometry;
pub mod store;

pub use feature::{mint_feature_id, Feature, FeatureId};
pub use geometry::{combine_geometries, Geometry, GeometryType};
pub use store::{FeatureStore, RenderBatch, SelectedCoordinate};
