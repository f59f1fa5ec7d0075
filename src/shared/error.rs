//! Fehler-Taxonomie der Edit-Oberfläche.
//!
//! Alle öffentlichen Operationen schlagen mit `EditError` fehl.
//! Fehler anderer Kollaborateure werden unverändert weitergereicht,
//! es gibt keine automatischen Wiederholungen: der erste ungültige
//! Eintrag eines Batches bricht den gesamten Aufruf ab.

use thiserror::Error;

/// Fehler der Edit-Oberfläche.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditError {
    /// Eingabe ist keine wohlgeformte FeatureCollection oder enthält
    /// ungültige Geometrie. Trägt den ersten fatalen Prüfgrund unverändert.
    #[error("Ungültige Eingabe: {0}")]
    Validation(String),

    /// Geometrietyp außerhalb der unterstützten Aufzählung
    /// (z.B. GeometryCollection oder ein unbekanntes Tag).
    #[error("Ungültiger Geometrietyp: {0}")]
    UnsupportedGeometry(String),

    /// Modus-Tag wurde nie registriert.
    #[error("Unbekannter Modus: {0}")]
    UnknownMode(String),

    /// Feature-ID verweist auf kein vorhandenes Feature.
    #[error("Feature nicht vorhanden: {0}")]
    MissingFeature(String),
}
