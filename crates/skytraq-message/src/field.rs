//! Fixed-width field codec.
//!
//! A [`FieldType`] pairs a wire integer type with a value domain and a
//! display form. A [`Field`] is a value that has been checked against its
//! type: construction and decoding both reject values outside the wire range
//! or the domain, so an existing `Field` always encodes without loss.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{MessageError, Result};
use crate::reference::{self, BAUD_RATES, DATUMS, ELLIPSOIDS};
use crate::registry::MessageRegistry;

/// Big-endian integer wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wire {
    U8,
    U16,
    I16,
    U32,
}

impl Wire {
    /// Encoded width in bytes.
    pub const fn width(self) -> usize {
        match self {
            Wire::U8 => 1,
            Wire::U16 | Wire::I16 => 2,
            Wire::U32 => 4,
        }
    }

    pub const fn min(self) -> i64 {
        match self {
            Wire::I16 => i16::MIN as i64,
            _ => 0,
        }
    }

    pub const fn max(self) -> i64 {
        match self {
            Wire::U8 => u8::MAX as i64,
            Wire::U16 => u16::MAX as i64,
            Wire::I16 => i16::MAX as i64,
            Wire::U32 => u32::MAX as i64,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(self, Wire::I16)
    }

    fn admits(self, value: i64) -> bool {
        (self.min()..=self.max()).contains(&value)
    }

    /// Append `value`, which must already be in range.
    fn put(self, value: i64, dst: &mut BytesMut) {
        match self {
            Wire::U8 => dst.put_u8(value as u8),
            Wire::U16 => dst.put_u16(value as u16),
            Wire::I16 => dst.put_i16(value as i16),
            Wire::U32 => dst.put_u32(value as u32),
        }
    }

    /// Read a value from exactly `width()` bytes.
    fn get(self, src: &[u8]) -> Option<i64> {
        let value = match self {
            Wire::U8 => i64::from(u8::from_be_bytes(src.try_into().ok()?)),
            Wire::U16 => i64::from(u16::from_be_bytes(src.try_into().ok()?)),
            Wire::I16 => i64::from(i16::from_be_bytes(src.try_into().ok()?)),
            Wire::U32 => i64::from(u32::from_be_bytes(src.try_into().ok()?)),
        };
        Some(value)
    }
}

/// The set of admissible values beyond the wire range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// Every value of the wire type.
    Any,
    /// An explicit list of values.
    Values(&'static [i64]),
    /// Codes with a label each.
    Labels(&'static [(i64, &'static str)]),
    /// Indices of the datum reference table.
    Datums,
    /// Indices of the ellipsoid reference table.
    Ellipsoids,
    /// Baud-rate codes.
    BaudRates,
}

impl Domain {
    pub fn admits(&self, value: i64) -> bool {
        match self {
            Domain::Any => true,
            Domain::Values(values) => values.contains(&value),
            Domain::Labels(labels) => labels.iter().any(|(code, _)| *code == value),
            Domain::Datums => u16::try_from(value).is_ok_and(|i| reference::datum(i).is_some()),
            Domain::Ellipsoids => {
                u8::try_from(value).is_ok_and(|i| reference::ellipsoid(i).is_some())
            }
            Domain::BaudRates => {
                u8::try_from(value).is_ok_and(|c| reference::baud_rate(c).is_some())
            }
        }
    }

    /// The label of a code, for labelled domains.
    pub fn label(&self, value: i64) -> Option<&'static str> {
        match self {
            Domain::Labels(labels) => labels
                .iter()
                .find(|(code, _)| *code == value)
                .map(|(_, label)| *label),
            _ => None,
        }
    }

    /// Human-readable list of admissible values.
    pub fn describe(&self) -> String {
        let codes: Vec<String> = match self {
            Domain::Any => return "any".to_string(),
            Domain::Values(values) => values.iter().map(|v| v.to_string()).collect(),
            Domain::Labels(labels) => labels
                .iter()
                .map(|(code, label)| format!("{code} ({label})"))
                .collect(),
            Domain::Datums => DATUMS.iter().map(|d| d.index.to_string()).collect(),
            Domain::Ellipsoids => ELLIPSOIDS.iter().map(|e| e.index.to_string()).collect(),
            Domain::BaudRates => BAUD_RATES
                .iter()
                .enumerate()
                .map(|(code, rate)| format!("{code} ({rate} bps)"))
                .collect(),
        };
        codes.join(", ")
    }
}

/// Fixed linear rescale between a real quantity and its stored integer.
///
/// `stored = round((real - baseline) * factor)`, `real = stored / factor + baseline`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub baseline: f64,
    pub factor: f64,
    /// Decimal places shown when displaying the real value.
    pub decimals: usize,
}

impl Scale {
    pub fn to_stored(&self, real: f64) -> f64 {
        ((real - self.baseline) * self.factor).round()
    }

    pub fn to_real(&self, stored: i64) -> f64 {
        stored as f64 / self.factor + self.baseline
    }
}

/// How a field value is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// Zero-padded hex of the full width.
    Hex,
    /// Decimal number followed by a unit.
    Unit(&'static str),
    /// The domain label.
    Label,
    /// `X.Y.Z` from the low three bytes.
    Version,
    /// `YY-MM-DD` from the low three bytes.
    Date,
    /// The rescaled real value.
    Real,
    /// Datum name and index.
    Datum,
    /// Ellipsoid name and index.
    Ellipsoid,
    /// Rate in bps for a baud-rate code.
    BaudRate,
    /// Name of the input message with this id.
    InputMessage,
}

/// Static description of one field.
#[derive(Debug, PartialEq)]
pub struct FieldType {
    pub name: &'static str,
    pub wire: Wire,
    pub domain: Domain,
    pub render: Render,
    pub scale: Option<Scale>,
}

impl FieldType {
    /// Encoded width in bytes.
    pub const fn width(&self) -> usize {
        self.wire.width()
    }
}

/// A validated field value.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    ty: &'static FieldType,
    value: i64,
}

impl Field {
    /// Create a field, rejecting out-of-range and non-admissible values.
    ///
    /// Booleans convert to 0/1.
    pub fn new(ty: &'static FieldType, value: impl Into<i64>) -> Result<Self> {
        let value = value.into();
        if !ty.wire.admits(value) {
            return Err(MessageError::ValueOutOfRange {
                field: ty.name,
                value,
                min: ty.wire.min(),
                max: ty.wire.max(),
            });
        }
        if !ty.domain.admits(value) {
            return Err(MessageError::ValueNotAllowed {
                field: ty.name,
                value,
                allowed: ty.domain.describe(),
            });
        }
        Ok(Self { ty, value })
    }

    /// Create a field from a real quantity, applying the type's scale.
    ///
    /// Unscaled types round to the nearest integer.
    pub fn from_real(ty: &'static FieldType, real: f64) -> Result<Self> {
        let stored = match ty.scale {
            Some(scale) => scale.to_stored(real),
            None => real.round(),
        };
        if !stored.is_finite() {
            return Err(MessageError::NotFinite { field: ty.name });
        }
        if stored < ty.wire.min() as f64 || stored > ty.wire.max() as f64 {
            return Err(MessageError::ValueOutOfRange {
                field: ty.name,
                value: stored as i64,
                min: ty.wire.min(),
                max: ty.wire.max(),
            });
        }
        Self::new(ty, stored as i64)
    }

    /// Decode a field from exactly `ty.width()` big-endian bytes.
    pub fn decode(ty: &'static FieldType, src: &[u8]) -> Result<Self> {
        let value = ty
            .wire
            .get(src)
            .ok_or(MessageError::FieldWidth {
                field: ty.name,
                expected: ty.width(),
                actual: src.len(),
            })?;
        Self::new(ty, value)
    }

    /// Append the big-endian encoding.
    pub fn encode(&self, dst: &mut BytesMut) {
        self.ty.wire.put(self.value, dst);
    }

    /// The big-endian encoding as a fresh buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.ty.width());
        self.encode(&mut buf);
        buf.freeze()
    }

    pub fn field_type(&self) -> &'static FieldType {
        self.ty
    }

    pub fn name(&self) -> &'static str {
        self.ty.name
    }

    /// The stored integer.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// The real quantity for scaled fields, the stored integer otherwise.
    pub fn real_value(&self) -> f64 {
        match self.ty.scale {
            Some(scale) => scale.to_real(self.value),
            None => self.value as f64,
        }
    }

    /// The domain label, for labelled fields.
    pub fn label(&self) -> Option<&'static str> {
        self.ty.domain.label(self.value)
    }

    /// `(X, Y, Z)` byte groups of the low three bytes.
    pub fn triple(&self) -> (u8, u8, u8) {
        (
            ((self.value >> 16) & 0xFF) as u8,
            ((self.value >> 8) & 0xFF) as u8,
            (self.value & 0xFF) as u8,
        )
    }

    pub fn as_bool(&self) -> bool {
        self.value != 0
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ty, other.ty) && self.value == other.value
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value;
        match self.ty.render {
            Render::Hex => {
                let digits = self.ty.width() * 2;
                let raw = value & ((1i64 << (self.ty.width() * 8)) - 1);
                write!(f, "0x{raw:0digits$x}")
            }
            Render::Unit(unit) => write!(f, "{value} {unit}"),
            Render::Label => match self.label() {
                Some(label) => write!(f, "{label}"),
                None => write!(f, "{value}"),
            },
            Render::Version => {
                let (x, y, z) = self.triple();
                write!(f, "{x}.{y}.{z}")
            }
            Render::Date => {
                let (yy, mm, dd) = self.triple();
                write!(f, "{yy:02}-{mm:02}-{dd:02}")
            }
            Render::Real => {
                let decimals = self.ty.scale.map_or(0, |s| s.decimals);
                write!(f, "{:.decimals$}", self.real_value())
            }
            Render::Datum => {
                match u16::try_from(value).ok().and_then(reference::datum) {
                    Some(datum) => write!(f, "{} ({})", datum.name, datum.index),
                    None => write!(f, "? ({value})"),
                }
            }
            Render::Ellipsoid => {
                match u8::try_from(value).ok().and_then(reference::ellipsoid) {
                    Some(ellipsoid) => write!(f, "{} ({})", ellipsoid.name, ellipsoid.index),
                    None => write!(f, "? ({value})"),
                }
            }
            Render::BaudRate => {
                match u8::try_from(value).ok().and_then(reference::baud_rate) {
                    Some(rate) => write!(f, "{rate} bps"),
                    None => write!(f, "code {value}"),
                }
            }
            Render::InputMessage => {
                let id = value as u8;
                let name = MessageRegistry::global().input(id).name;
                write!(f, "'{name}' (0x{id:02x})")
            }
        }
    }
}

const ENABLE_LABELS: &[(i64, &str)] = &[(0, "disable"), (1, "enable")];

pub static SOFTWARE_TYPE: FieldType = FieldType {
    name: "Software type",
    wire: Wire::U8,
    domain: Domain::Labels(&[(0, "reserved"), (1, "system code")]),
    render: Render::Label,
    scale: None,
};

pub static ACK_ID: FieldType = FieldType {
    name: "ACK ID",
    wire: Wire::U8,
    domain: Domain::Any,
    render: Render::InputMessage,
    scale: None,
};

pub static KERNEL_VERSION: FieldType = FieldType {
    name: "Kernel version",
    wire: Wire::U32,
    domain: Domain::Any,
    render: Render::Version,
    scale: None,
};

pub static ODM_VERSION: FieldType = FieldType {
    name: "ODM version",
    wire: Wire::U32,
    domain: Domain::Any,
    render: Render::Version,
    scale: None,
};

pub static REVISION: FieldType = FieldType {
    name: "Revision",
    wire: Wire::U32,
    domain: Domain::Any,
    render: Render::Date,
    scale: None,
};

pub static CRC: FieldType = FieldType {
    name: "CRC",
    wire: Wire::U16,
    domain: Domain::Any,
    render: Render::Hex,
    scale: None,
};

pub static UPDATE_RATE: FieldType = FieldType {
    name: "Update rate",
    wire: Wire::U8,
    domain: Domain::Values(&[1, 2, 4, 5, 8, 10, 20]),
    render: Render::Unit("Hz"),
    scale: None,
};

pub static WAAS_STATUS: FieldType = FieldType {
    name: "WAAS status",
    wire: Wire::U8,
    domain: Domain::Labels(ENABLE_LABELS),
    render: Render::Label,
    scale: None,
};

pub static POSITION_PINNING: FieldType = FieldType {
    name: "Position pinning",
    wire: Wire::U8,
    domain: Domain::Labels(ENABLE_LABELS),
    render: Render::Label,
    scale: None,
};

pub static PINNING_SPEED: FieldType = FieldType {
    name: "Pinning speed",
    wire: Wire::U16,
    domain: Domain::Any,
    render: Render::Unit("km/h"),
    scale: None,
};

pub static PINNING_COUNT: FieldType = FieldType {
    name: "Pinning count",
    wire: Wire::U16,
    domain: Domain::Any,
    render: Render::Unit("s"),
    scale: None,
};

pub static UNPINNING_SPEED: FieldType = FieldType {
    name: "Unpinning speed",
    wire: Wire::U16,
    domain: Domain::Any,
    render: Render::Unit("km/h"),
    scale: None,
};

pub static UNPINNING_COUNT: FieldType = FieldType {
    name: "Unpinning count",
    wire: Wire::U16,
    domain: Domain::Any,
    render: Render::Unit("s"),
    scale: None,
};

pub static UNPINNING_DISTANCE: FieldType = FieldType {
    name: "Unpinning distance",
    wire: Wire::U16,
    domain: Domain::Any,
    render: Render::Unit("m"),
    scale: None,
};

pub static ELLIPSOID_INDEX: FieldType = FieldType {
    name: "Ellipsoid index",
    wire: Wire::U8,
    domain: Domain::Ellipsoids,
    render: Render::Ellipsoid,
    scale: None,
};

pub static DATUM_INDEX: FieldType = FieldType {
    name: "Datum index",
    wire: Wire::U16,
    domain: Domain::Datums,
    render: Render::Datum,
    scale: None,
};

pub static DELTA_X: FieldType = FieldType {
    name: "Delta X",
    wire: Wire::I16,
    domain: Domain::Any,
    render: Render::Unit("m"),
    scale: None,
};

pub static DELTA_Y: FieldType = FieldType {
    name: "Delta Y",
    wire: Wire::I16,
    domain: Domain::Any,
    render: Render::Unit("m"),
    scale: None,
};

pub static DELTA_Z: FieldType = FieldType {
    name: "Delta Z",
    wire: Wire::I16,
    domain: Domain::Any,
    render: Render::Unit("m"),
    scale: None,
};

/// Stored in millimetres above 6 370 000 m.
pub static SEMI_MAJOR_AXIS: FieldType = FieldType {
    name: "Semi-major axis",
    wire: Wire::U32,
    domain: Domain::Any,
    render: Render::Real,
    scale: Some(Scale {
        baseline: 6_370_000.0,
        factor: 1_000.0,
        decimals: 3,
    }),
};

/// Stored in units of 1e-7 above 293.
pub static INVERSE_FLATTENING: FieldType = FieldType {
    name: "Inverse flattening",
    wire: Wire::U32,
    domain: Domain::Any,
    render: Render::Real,
    scale: Some(Scale {
        baseline: 293.0,
        factor: 10_000_000.0,
        decimals: 7,
    }),
};

pub static ATTRIBUTES: FieldType = FieldType {
    name: "Attributes",
    wire: Wire::U8,
    domain: Domain::Labels(&[(0, "update to SRAM"), (1, "update to both SRAM & FLASH")]),
    render: Render::Label,
    scale: None,
};

pub static BAUD_RATE: FieldType = FieldType {
    name: "Baud rate",
    wire: Wire::U8,
    domain: Domain::BaudRates,
    render: Render::BaudRate,
    scale: None,
};

pub static COM_PORT: FieldType = FieldType {
    name: "COM port",
    wire: Wire::U8,
    domain: Domain::Labels(&[(0, "COM1")]),
    render: Render::Label,
    scale: None,
};
