//! Locate-and-patch editing for Big Ambitions `.hsg` save games.
//!
//! A save is a gzip container around an unstructured binary payload. Each
//! editable field appears as its UTF-16LE name immediately followed by a
//! 4-byte little-endian float. The crate finds the first occurrence of a
//! field's marker, reads or overwrites the value bytes in place, and writes
//! the payload back out through gzip.

pub mod config;
pub mod container;
pub mod core_api;
pub mod layout;
pub mod locator;
pub mod scan;
pub mod schema;
pub mod value;
