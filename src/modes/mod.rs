//! Modus-System: geschlossene Tag-Menge plus extern registrierbare Modi
//! und die Transition-Engine.

pub mod engine;

pub use engine::ModeEngine;

use crate::core::FeatureId;

/// Tag des Standard-Modus.
pub const MODE_SELECT: &str = "select";
/// Tag des feature-gebundenen Modus.
pub const MODE_DIRECT_SELECT: &str = "direct_select";

/// Tag eines Editier-Modus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ModeId {
    /// Standard: Features selektieren, keine Feature-Bindung
    #[default]
    Select,
    /// An genau ein selektiertes Feature gebundener Editier-Modus
    DirectSelect,
    /// Extern registrierter Modus (opaker Tag)
    Custom(String),
}

impl ModeId {
    /// Tag-Schreibweise des Modus.
    pub fn as_tag(&self) -> &str {
        match self {
            ModeId::Select => MODE_SELECT,
            ModeId::DirectSelect => MODE_DIRECT_SELECT,
            ModeId::Custom(tag) => tag,
        }
    }

    /// Parst ein Modus-Tag. Unbekannte Tags werden als Custom-Modus gelesen.
    pub fn from_tag(tag: &str) -> ModeId {
        match tag {
            MODE_SELECT => ModeId::Select,
            MODE_DIRECT_SELECT => ModeId::DirectSelect,
            other => ModeId::Custom(other.to_string()),
        }
    }

    /// Ist der Modus an ein einzelnes Feature gebunden?
    pub fn is_feature_bound(&self) -> bool {
        matches!(self, ModeId::DirectSelect)
    }
}

impl std::fmt::Display for ModeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Parameter eines Modus-Wechsels.
#[derive(Debug, Clone, Default)]
pub struct ModeOptions {
    /// Zu selektierende Features (Select-Modus)
    pub feature_ids: Vec<FeatureId>,
    /// Gebundenes Feature (DirectSelect-Modus)
    pub feature_id: Option<FeatureId>,
}

impl ModeOptions {
    /// Optionen für den Select-Modus mit vorgegebener Selektion.
    pub fn with_feature_ids(feature_ids: Vec<FeatureId>) -> Self {
        Self {
            feature_ids,
            feature_id: None,
        }
    }

    /// Optionen für den DirectSelect-Modus mit gebundenem Feature.
    pub fn with_feature_id(feature_id: FeatureId) -> Self {
        Self {
            feature_ids: Vec::new(),
            feature_id: Some(feature_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip() {
        assert_eq!(ModeId::from_tag("select"), ModeId::Select);
        assert_eq!(ModeId::from_tag("direct_select"), ModeId::DirectSelect);
        assert_eq!(
            ModeId::from_tag("lasso"),
            ModeId::Custom("lasso".to_string())
        );
        assert_eq!(ModeId::Custom("lasso".to_string()).as_tag(), "lasso");
    }

    #[test]
    fn test_feature_bindung() {
        assert!(ModeId::DirectSelect.is_feature_bound());
        assert!(!ModeId::Select.is_feature_bound());
        assert!(!ModeId::Custom("lasso".to_string()).is_feature_bound());
    }
}
