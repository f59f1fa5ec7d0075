//! Zentrale Konfiguration für den GeoFeature-Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Modi ────────────────────────────────────────────────────────────

/// Tag des Standard-Modus (Selektion ohne Feature-Bindung).
pub const DEFAULT_MODE_TAG: &str = "select";

// ── Validierung ─────────────────────────────────────────────────────

/// Ab so vielen Nachkommastellen gilt eine Koordinate als überpräzise.
pub const COORDINATE_PRECISION_DIGITS: u32 = 6;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird auf Wunsch des Hosts als TOML-Datei gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorOptions {
    /// Modus-Tag beim Start des Editors. `direct_select` ist als Startmodus
    /// ungültig (es gibt noch kein gebundenes Feature) und fällt auf
    /// `select` zurück.
    #[serde(default = "default_mode_tag")]
    pub default_mode: String,
    /// Informations-Hinweise für Koordinaten mit übermäßiger Präzision
    /// (mehr als [`COORDINATE_PRECISION_DIGITS`] Nachkommastellen) ausgeben.
    #[serde(default)]
    pub coordinate_precision_hints: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            default_mode: DEFAULT_MODE_TAG.to_string(),
            coordinate_precision_hints: false,
        }
    }
}

/// Serde-Default für `default_mode` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_mode_tag() -> String {
    DEFAULT_MODE_TAG.to_string()
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_optionen() {
        let opts = EditorOptions::default();
        assert_eq!(opts.default_mode, "select");
        assert!(!opts.coordinate_precision_hints);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut opts = EditorOptions::default();
        opts.coordinate_precision_hints = true;
        let text = toml::to_string_pretty(&opts).expect("Serialisierung erwartet");
        let geladen: EditorOptions = toml::from_str(&text).expect("Deserialisierung erwartet");
        assert_eq!(geladen.default_mode, opts.default_mode);
        assert!(geladen.coordinate_precision_hints);
    }

    #[test]
    fn test_leere_toml_datei_ergibt_defaults() {
        let geladen: EditorOptions = toml::from_str("").expect("leere TOML muss parsen");
        assert_eq!(geladen.default_mode, "select");
        assert!(!geladen.coordinate_precision_hints);
    }
}
