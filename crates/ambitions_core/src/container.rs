//! Gzip container adapter.
//!
//! Saves are one or more gzip members around the raw payload. Compression
//! settings are fixed; nothing about the container is configurable.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::core_api::{CoreError, CoreErrorCode};

pub const COMPRESSION_LEVEL: u32 = 9;

pub fn decompress_bytes(compressed: &[u8]) -> Result<Vec<u8>, CoreError> {
    let mut decoder = MultiGzDecoder::new(compressed);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(|e| {
        CoreError::new(CoreErrorCode::Format, format!("gzip decode failed: {e}"))
    })?;
    debug!(
        "decompressed {} bytes into {} bytes",
        compressed.len(),
        out.len()
    );
    Ok(out)
}

pub fn decompress_file(path: &Path) -> Result<Vec<u8>, CoreError> {
    let compressed = fs::read(path).map_err(|e| CoreError::io("read", path, e))?;
    decompress_bytes(&compressed).map_err(|e| {
        CoreError::new(e.code, format!("{}: {}", path.display(), e.message))
    })
}

pub fn compress_bytes(raw: &[u8]) -> Result<Vec<u8>, CoreError> {
    let encode_err =
        |e: std::io::Error| CoreError::new(CoreErrorCode::Io, format!("gzip encode failed: {e}"));

    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(COMPRESSION_LEVEL));
    encoder.write_all(raw).map_err(encode_err)?;
    encoder.finish().map_err(encode_err)
}

/// Compress `raw` and replace `path` with the result.
pub fn compress_to_file(raw: &[u8], path: &Path) -> Result<(), CoreError> {
    let compressed = compress_bytes(raw)?;
    write_replacing(path, &compressed)?;
    info!(
        "wrote {} compressed bytes to {}",
        compressed.len(),
        path.display()
    );
    Ok(())
}

/// Write through a sibling temp file and rename it over `path`, so a failed
/// write never leaves `path` truncated.
fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), CoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| CoreError::io("create temp file in", dir, e))?;
    tmp.write_all(bytes)
        .map_err(|e| CoreError::io("write", tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| CoreError::io("sync", tmp.path(), e))?;

    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| CoreError::io("copy permissions to", tmp.path(), e))?;
    }

    tmp.persist(path).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Io,
            format!("failed to write {}: {}", path.display(), e.error),
        )
    })?;
    Ok(())
}
