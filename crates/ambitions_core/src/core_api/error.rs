use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    /// The source save does not exist or is not a regular file.
    NotFound,
    /// The input is not a valid gzip container.
    Format,
    Io,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code:?}: {message}")]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(path: &Path) -> Self {
        Self::new(
            CoreErrorCode::NotFound,
            format!("save file not found: {}", path.display()),
        )
    }

    /// Map an I/O failure on `path`, keeping missing files distinct.
    pub fn io(action: &str, path: &Path, err: io::Error) -> Self {
        let code = if err.kind() == io::ErrorKind::NotFound {
            CoreErrorCode::NotFound
        } else {
            CoreErrorCode::Io
        };
        Self::new(code, format!("failed to {action} {}: {err}", path.display()))
    }
}
