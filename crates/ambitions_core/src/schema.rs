use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value;

/// Fields the editor knows how to find. Order matches `FIELD_SCHEMA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldId {
    Money,
    Energy,
    NetWorth,
}

impl FieldId {
    pub const ALL: [FieldId; 3] = [Self::Money, Self::Energy, Self::NetWorth];

    pub fn as_str(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn descriptor(&self) -> &'static FieldDescriptor {
        &FIELD_SCHEMA[*self as usize]
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "money" => Ok(Self::Money),
            "energy" => Ok(Self::Energy),
            "networth" | "net_worth" | "net-worth" => Ok(Self::NetWorth),
            _ => Err(format!(
                "unknown field '{value}', expected one of: Money, Energy, NetWorth"
            )),
        }
    }
}

/// How the bytes following a marker are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// IEEE-754 single precision, little-endian.
    F32Le,
}

impl ValueKind {
    pub const fn width(self) -> usize {
        match self {
            Self::F32Le => value::F32_WIDTH,
        }
    }

    pub fn read(self, buf: &[u8], offset: usize) -> Option<f32> {
        match self {
            Self::F32Le => value::read_f32_le(buf, offset),
        }
    }

    pub fn write(self, buf: &mut [u8], offset: usize, v: f32) -> bool {
        match self {
            Self::F32Le => value::write_f32_le(buf, offset, v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub name: &'static str,
    /// UTF-16LE encoding of `name`.
    pub marker: &'static [u8],
    pub kind: ValueKind,
}

impl FieldDescriptor {
    pub const fn width(&self) -> usize {
        self.kind.width()
    }
}

pub const MONEY_MARKER: &[u8] = b"M\0o\0n\0e\0y\0";
pub const ENERGY_MARKER: &[u8] = b"E\0n\0e\0r\0g\0y\0";
pub const NET_WORTH_MARKER: &[u8] = b"N\0e\0t\0W\0o\0r\0t\0h\0";

/// Every editable field. The value is trusted to start on the byte right
/// after the marker's last byte.
pub static FIELD_SCHEMA: [FieldDescriptor; 3] = [
    FieldDescriptor {
        id: FieldId::Money,
        name: "Money",
        marker: MONEY_MARKER,
        kind: ValueKind::F32Le,
    },
    FieldDescriptor {
        id: FieldId::Energy,
        name: "Energy",
        marker: ENERGY_MARKER,
        kind: ValueKind::F32Le,
    },
    FieldDescriptor {
        id: FieldId::NetWorth,
        name: "NetWorth",
        marker: NET_WORTH_MARKER,
        kind: ValueKind::F32Le,
    },
];

/// Encode an ASCII field name the way the save stores it.
pub fn utf16le_marker(name: &str) -> Vec<u8> {
    name.encode_utf16().flat_map(u16::to_le_bytes).collect()
}
