use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::schema::FieldId;

/// Current value of one field, or the fact that its marker is missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FieldRead {
    Found { offset: usize, value: f32 },
    NotFound,
}

impl FieldRead {
    pub fn value(&self) -> Option<f32> {
        match *self {
            Self::Found { value, .. } => Some(value),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Outcome of patching one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FieldChange {
    Changed { offset: usize, old: f32, new: f32 },
    NotFound,
}

impl FieldChange {
    pub fn old_new(&self) -> Option<(f32, f32)> {
        match *self {
            Self::Changed { old, new, .. } => Some((old, new)),
            Self::NotFound => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Inspection {
    pub path: PathBuf,
    pub values: BTreeMap<FieldId, FieldRead>,
}

impl Inspection {
    pub fn get(&self, field: FieldId) -> FieldRead {
        self.values
            .get(&field)
            .copied()
            .unwrap_or(FieldRead::NotFound)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditRequest {
    pub input: PathBuf,
    /// Defaults to `input` when unset.
    pub output: Option<PathBuf>,
    pub edits: BTreeMap<FieldId, f32>,
    /// Copy the source to `<input>.bak` before overwriting it in place.
    pub backup: bool,
}

impl EditRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            edits: BTreeMap::new(),
            backup: true,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn set(mut self, field: FieldId, value: f32) -> Self {
        self.edits.insert(field, value);
        self
    }

    pub fn set_opt(self, field: FieldId, value: Option<f32>) -> Self {
        match value {
            Some(v) => self.set(field, v),
            None => self,
        }
    }

    pub fn output_path(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.input)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub backup: Option<PathBuf>,
    pub changes: BTreeMap<FieldId, FieldChange>,
    /// False when nothing was requested and no file was touched.
    pub written: bool,
}

impl EditReport {
    pub fn get(&self, field: FieldId) -> Option<FieldChange> {
        self.changes.get(&field).copied()
    }
}
