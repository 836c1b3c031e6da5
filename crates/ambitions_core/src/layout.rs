use serde::{Deserialize, Serialize};

use crate::schema::FieldId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Where a field's marker and value bytes sit inside a decompressed save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLocation {
    pub field: FieldId,
    pub marker: ByteRange,
    pub value: ByteRange,
}

impl FieldLocation {
    pub fn value_offset(&self) -> usize {
        self.value.start
    }
}
