mod engine;
mod error;
mod types;

pub use engine::{Engine, Session, backup_path};
pub use error::{CoreError, CoreErrorCode};
pub use types::{EditReport, EditRequest, FieldChange, FieldRead, Inspection};
