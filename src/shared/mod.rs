//! Querschnitts-Typen: Fehler-Taxonomie, Laufzeit-Optionen, Edit-Log.

pub mod edit_log;
pub mod error;
pub mod options;

pub use edit_log::{EditLog, EditOp};
pub use error::EditError;
pub use options::EditorOptions;
