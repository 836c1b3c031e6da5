//! Blind field location: find a marker, trust the bytes after it.

use log::debug;

use crate::layout::{ByteRange, FieldLocation};
use crate::schema::FieldDescriptor;

/// Offset of the first occurrence of `marker` in `buf`.
pub fn find_marker(buf: &[u8], marker: &[u8]) -> Option<usize> {
    if marker.is_empty() || marker.len() > buf.len() {
        return None;
    }
    buf.windows(marker.len()).position(|window| window == marker)
}

/// Offset of the byte right after the first `marker`, provided at least
/// `width` bytes follow it. Later occurrences are never considered.
pub fn find_value_offset(buf: &[u8], marker: &[u8], width: usize) -> Option<usize> {
    let start = find_marker(buf, marker)?;
    let value_start = start + marker.len();
    if value_start.checked_add(width)? > buf.len() {
        return None;
    }
    Some(value_start)
}

pub fn locate(buf: &[u8], descriptor: &FieldDescriptor) -> Option<FieldLocation> {
    let value_start = find_value_offset(buf, descriptor.marker, descriptor.width())?;
    let marker_start = value_start - descriptor.marker.len();
    debug!(
        "located {} marker at {:#x}, value at {:#x}",
        descriptor.name, marker_start, value_start
    );
    Some(FieldLocation {
        field: descriptor.id,
        marker: ByteRange::new(marker_start, descriptor.marker.len()),
        value: ByteRange::new(value_start, descriptor.width()),
    })
}
