use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{self, Component, Path, PathBuf};

use log::{debug, info, warn};

use crate::container;
use crate::layout::FieldLocation;
use crate::locator;
use crate::schema::{FIELD_SCHEMA, FieldId};

use super::error::CoreError;
use super::types::{EditReport, EditRequest, FieldChange, FieldRead, Inspection};

const BACKUP_SUFFIX: &str = ".bak";

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

/// A decompressed save held in memory for the duration of one read or edit.
#[derive(Debug, Clone)]
pub struct Session {
    buffer: Vec<u8>,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Decompress an in-memory `.hsg` container.
    pub fn open_bytes<B: AsRef<[u8]>>(&self, compressed: B) -> Result<Session, CoreError> {
        container::decompress_bytes(compressed.as_ref()).map(Session::from_decompressed)
    }

    pub fn open_path(&self, path: impl AsRef<Path>) -> Result<Session, CoreError> {
        let path = path.as_ref();
        ensure_source_file(path)?;
        container::decompress_file(path).map(Session::from_decompressed)
    }

    /// Read every schema field without modifying anything on disk.
    pub fn inspect(&self, path: impl AsRef<Path>) -> Result<Inspection, CoreError> {
        let path = path.as_ref();
        let session = self.open_path(path)?;
        Ok(Inspection {
            path: path.to_path_buf(),
            values: session.read_all(),
        })
    }

    /// Patch the requested fields and write the result.
    ///
    /// A missing source fails before anything else happens. An empty edit
    /// set returns a report with `written == false` and leaves every file
    /// alone. Fields whose marker is absent are recorded as
    /// [`FieldChange::NotFound`] while the rest are still applied.
    ///
    /// The backup copy and the final write are separate steps: if the write
    /// fails, the backup stays on disk.
    pub fn edit(&self, request: &EditRequest) -> Result<EditReport, CoreError> {
        let input = request.input.as_path();
        let output = request.output_path();
        ensure_source_file(input)?;

        if request.edits.is_empty() {
            debug!("no edits requested for {}", input.display());
            return Ok(EditReport {
                input: input.to_path_buf(),
                output: output.to_path_buf(),
                backup: None,
                changes: BTreeMap::new(),
                written: false,
            });
        }

        let mut session = self.open_path(input)?;
        let changes = request
            .edits
            .iter()
            .map(|(&field, &value)| (field, session.set_field(field, value)))
            .collect();

        let backup = if request.backup && same_file_path(input, output) {
            Some(write_backup(input)?)
        } else {
            None
        };

        session.write_to(output)?;

        Ok(EditReport {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            backup,
            changes,
            written: true,
        })
    }
}

impl Session {
    pub fn from_decompressed(buffer: Vec<u8>) -> Self {
        Self { buffer }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn locate(&self, field: FieldId) -> Option<FieldLocation> {
        locator::locate(&self.buffer, field.descriptor())
    }

    pub fn read_field(&self, field: FieldId) -> FieldRead {
        let descriptor = field.descriptor();
        let found = self.locate(field).and_then(|location| {
            let offset = location.value_offset();
            descriptor
                .kind
                .read(&self.buffer, offset)
                .map(|value| FieldRead::Found { offset, value })
        });
        found.unwrap_or_else(|| {
            warn!("{} marker not found", descriptor.name);
            FieldRead::NotFound
        })
    }

    pub fn read_all(&self) -> BTreeMap<FieldId, FieldRead> {
        FIELD_SCHEMA
            .iter()
            .map(|descriptor| (descriptor.id, self.read_field(descriptor.id)))
            .collect()
    }

    /// Overwrite the value after `field`'s marker, returning what was there.
    pub fn set_field(&mut self, field: FieldId, value: f32) -> FieldChange {
        let kind = field.descriptor().kind;
        let FieldRead::Found { offset, value: old } = self.read_field(field) else {
            return FieldChange::NotFound;
        };
        if !kind.write(&mut self.buffer, offset, value) {
            return FieldChange::NotFound;
        }
        debug!("{field} at {offset:#x}: {old} -> {value}");
        FieldChange::Changed {
            offset,
            old,
            new: value,
        }
    }

    pub fn to_compressed_bytes(&self) -> Result<Vec<u8>, CoreError> {
        container::compress_bytes(&self.buffer)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        container::compress_to_file(&self.buffer, path.as_ref())
    }
}

/// `<input>.bak`, with the suffix appended to the full file name.
pub fn backup_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

fn write_backup(input: &Path) -> Result<PathBuf, CoreError> {
    let bak = backup_path(input);
    fs::copy(input, &bak).map_err(|e| CoreError::io("back up", input, e))?;
    info!("backed up {} to {}", input.display(), bak.display());
    Ok(bak)
}

fn ensure_source_file(path: &Path) -> Result<(), CoreError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CoreError::not_found(path))
    }
}

/// True when both paths name the same file, either after folding `.` and
/// `..` out of their absolute forms or after resolving links on disk.
fn same_file_path(a: &Path, b: &Path) -> bool {
    if normalize_lexically(a) == normalize_lexically(b) {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn normalize_lexically(p: &Path) -> PathBuf {
    let absolute = path::absolute(p).unwrap_or_else(|_| p.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{Session, backup_path, same_file_path};
    use crate::core_api::{FieldChange, FieldRead};
    use crate::schema::{ENERGY_MARKER, FieldId, MONEY_MARKER};

    fn payload() -> Vec<u8> {
        let mut buf = vec![0x10, 0x20];
        buf.extend_from_slice(MONEY_MARKER);
        buf.extend_from_slice(&1000.0f32.to_le_bytes());
        buf.extend_from_slice(&[0x00, 0x01]);
        buf.extend_from_slice(ENERGY_MARKER);
        buf.extend_from_slice(&0.5f32.to_le_bytes());
        buf
    }

    #[test]
    fn read_field_returns_value_after_marker() {
        let session = Session::from_decompressed(payload());
        assert_eq!(session.read_field(FieldId::Money).value(), Some(1000.0));
        assert_eq!(session.read_field(FieldId::Energy).value(), Some(0.5));
        assert_eq!(session.read_field(FieldId::NetWorth), FieldRead::NotFound);
    }

    #[test]
    fn set_field_reports_old_and_new() {
        let mut session = Session::from_decompressed(payload());
        let change = session.set_field(FieldId::Money, 5000.0);
        assert_eq!(change.old_new(), Some((1000.0, 5000.0)));
        assert_eq!(session.read_field(FieldId::Money).value(), Some(5000.0));
        assert_eq!(session.read_field(FieldId::Energy).value(), Some(0.5));
    }

    #[test]
    fn set_missing_field_leaves_buffer_untouched() {
        let original = payload();
        let mut session = Session::from_decompressed(original.clone());
        assert_eq!(
            session.set_field(FieldId::NetWorth, 1.0),
            FieldChange::NotFound
        );
        assert_eq!(session.as_bytes(), original.as_slice());
    }

    #[test]
    fn energy_accepts_out_of_domain_values() {
        let mut session = Session::from_decompressed(payload());
        session.set_field(FieldId::Energy, -42.25);
        assert_eq!(session.read_field(FieldId::Energy).value(), Some(-42.25));
    }

    #[test]
    fn backup_suffix_is_appended_to_full_name() {
        assert_eq!(
            backup_path(Path::new("saves/slot1.hsg")),
            Path::new("saves/slot1.hsg.bak")
        );
    }

    #[test]
    fn same_file_path_compares_absolute_forms() {
        let cwd = std::env::current_dir().expect("current dir");
        assert!(same_file_path(Path::new("a.hsg"), &cwd.join("a.hsg")));
        assert!(!same_file_path(Path::new("a.hsg"), Path::new("b.hsg")));
    }

    #[test]
    fn same_file_path_folds_dot_components() {
        assert!(same_file_path(
            Path::new("saves/slot.hsg"),
            Path::new("saves/sub/../slot.hsg")
        ));
        assert!(same_file_path(
            Path::new("./saves/slot.hsg"),
            Path::new("saves/./slot.hsg")
        ));
        assert!(!same_file_path(
            Path::new("saves/slot.hsg"),
            Path::new("saves/sub/slot.hsg")
        ));
    }
}
