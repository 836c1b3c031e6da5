//! Fixed-width value codec for the bytes that follow a field marker.
//!
//! Values are copied bit-for-bit. Nothing is rounded, clamped or checked
//! against what the field is supposed to hold.

pub const F32_WIDTH: usize = 4;

pub fn read_f32_le(buf: &[u8], offset: usize) -> Option<f32> {
    let end = offset.checked_add(F32_WIDTH)?;
    let bytes: [u8; F32_WIDTH] = buf.get(offset..end)?.try_into().ok()?;
    Some(f32::from_le_bytes(bytes))
}

/// Overwrite four bytes at `offset`. Returns `false` and leaves `buf`
/// untouched when the span does not fit.
pub fn write_f32_le(buf: &mut [u8], offset: usize, value: f32) -> bool {
    let Some(end) = offset.checked_add(F32_WIDTH) else {
        return false;
    };
    let Some(slot) = buf.get_mut(offset..end) else {
        return false;
    };
    slot.copy_from_slice(&value.to_le_bytes());
    true
}
