use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use skytraq_frame::Frame;

use crate::catalog;
use crate::error::{MessageError, Result};
use crate::field::{self, Field};
use crate::reference;
use crate::registry::{Direction, MessageType};

/// A host → receiver message: a registered input type plus validated field
/// values in layout order.
#[derive(Debug, Clone, PartialEq)]
pub struct InputMessage {
    ty: &'static MessageType,
    fields: Vec<Field>,
}

impl InputMessage {
    /// Build a message from already-validated fields.
    ///
    /// The fields must match the type's layout one for one.
    pub fn new(ty: &'static MessageType, fields: Vec<Field>) -> Result<Self> {
        if ty.direction != Direction::Input {
            return Err(MessageError::WrongDirection {
                id: ty.id,
                expected: Direction::Input,
            });
        }
        let layout = ty.fields().ok_or(MessageError::NotInterpretable {
            id: ty.id,
            name: ty.name,
        })?;
        let matches = layout.len() == fields.len()
            && layout
                .iter()
                .zip(&fields)
                .all(|(expected, field)| std::ptr::eq(*expected, field.field_type()));
        if !matches {
            return Err(MessageError::LayoutMismatch { id: ty.id });
        }
        Ok(Self { ty, fields })
    }

    /// Build a message from raw integer values, validating each against its
    /// field type.
    pub fn from_values(ty: &'static MessageType, values: &[i64]) -> Result<Self> {
        let layout = ty.fields().ok_or(MessageError::NotInterpretable {
            id: ty.id,
            name: ty.name,
        })?;
        if layout.len() != values.len() {
            return Err(MessageError::LayoutMismatch { id: ty.id });
        }
        let fields = layout
            .iter()
            .zip(values)
            .map(|(ty, value)| Field::new(ty, *value))
            .collect::<Result<Vec<_>>>()?;
        Self::new(ty, fields)
    }

    fn bodyless(ty: &'static MessageType) -> Self {
        Self {
            ty,
            fields: Vec::new(),
        }
    }

    /// Query software version (0x02).
    pub fn query_software_version(software_type: u8) -> Result<Self> {
        let fields = vec![Field::new(&field::SOFTWARE_TYPE, software_type)?];
        Self::new(&catalog::QUERY_SOFTWARE_VERSION, fields)
    }

    /// Query software CRC (0x03).
    pub fn query_software_crc(software_type: u8) -> Result<Self> {
        let fields = vec![Field::new(&field::SOFTWARE_TYPE, software_type)?];
        Self::new(&catalog::QUERY_SOFTWARE_CRC, fields)
    }

    /// Configure serial port (0x05) on COM1.
    ///
    /// `rate` is in bps and must be one of [`reference::BAUD_RATES`].
    pub fn configure_serial_port(rate: u32, permanent: bool) -> Result<Self> {
        let code = reference::baud_rate_code(rate).ok_or(MessageError::UnsupportedBaudRate(rate))?;
        let fields = vec![
            Field::new(&field::COM_PORT, 0)?,
            Field::new(&field::BAUD_RATE, code)?,
            Field::new(&field::ATTRIBUTES, permanent)?,
        ];
        Self::new(&catalog::CONFIGURE_SERIAL_PORT, fields)
    }

    /// Configure position update rate (0x0E), `rate` in Hz.
    pub fn configure_position_update_rate(rate: u8, permanent: bool) -> Result<Self> {
        let fields = vec![
            Field::new(&field::UPDATE_RATE, rate)?,
            Field::new(&field::ATTRIBUTES, permanent)?,
        ];
        Self::new(&catalog::CONFIGURE_POSITION_UPDATE_RATE, fields)
    }

    /// Query position update rate (0x10).
    pub fn query_position_update_rate() -> Self {
        Self::bodyless(&catalog::QUERY_POSITION_UPDATE_RATE)
    }

    /// Configure datum (0x29), filling the ellipsoid and offsets from the
    /// datum reference table.
    pub fn configure_datum(index: u16, permanent: bool) -> Result<Self> {
        let datum = reference::datum(index).ok_or(MessageError::UnknownDatum(index))?;
        let ellipsoid = datum.ellipsoid;
        let fields = vec![
            Field::new(&field::DATUM_INDEX, datum.index)?,
            Field::new(&field::ELLIPSOID_INDEX, ellipsoid.index)?,
            Field::new(&field::DELTA_X, datum.delta_x)?,
            Field::new(&field::DELTA_Y, datum.delta_y)?,
            Field::new(&field::DELTA_Z, datum.delta_z)?,
            Field::from_real(&field::SEMI_MAJOR_AXIS, ellipsoid.semi_major_axis)?,
            Field::from_real(&field::INVERSE_FLATTENING, ellipsoid.inverse_flattening)?,
            Field::new(&field::ATTRIBUTES, permanent)?,
        ];
        Self::new(&catalog::CONFIGURE_DATUM, fields)
    }

    /// Query datum (0x2D).
    pub fn query_datum() -> Self {
        Self::bodyless(&catalog::QUERY_DATUM)
    }

    /// Query WAAS status (0x38).
    pub fn query_waas_status() -> Self {
        Self::bodyless(&catalog::QUERY_WAAS_STATUS)
    }

    /// Configure position pinning (0x39).
    pub fn configure_position_pinning(enable: bool) -> Result<Self> {
        let fields = vec![Field::new(&field::POSITION_PINNING, enable)?];
        Self::new(&catalog::CONFIGURE_POSITION_PINNING, fields)
    }

    /// Query position pinning (0x3A).
    pub fn query_position_pinning() -> Self {
        Self::bodyless(&catalog::QUERY_POSITION_PINNING)
    }

    /// Query navigation mode (0x3D).
    pub fn query_navigation_mode() -> Self {
        Self::bodyless(&catalog::QUERY_NAVIGATION_MODE)
    }

    /// Query PPS mode (0x3F).
    pub fn query_pps_mode() -> Self {
        Self::bodyless(&catalog::QUERY_PPS_MODE)
    }

    pub fn message_type(&self) -> &'static MessageType {
        self.ty
    }

    pub fn id(&self) -> u8 {
        self.ty.id
    }

    pub fn name(&self) -> &'static str {
        self.ty.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Id byte followed by each field's encoding.
    pub fn payload(&self) -> Bytes {
        let len = 1 + self.fields.iter().map(|f| f.field_type().width()).sum::<usize>();
        let mut buf = BytesMut::with_capacity(len);
        buf.put_u8(self.ty.id);
        for field in &self.fields {
            field.encode(&mut buf);
        }
        buf.freeze()
    }

    pub fn to_frame(&self) -> Frame {
        Frame::new(self.payload())
    }

    /// Complete wire encoding.
    pub fn to_bytes(&self) -> Result<Bytes> {
        Ok(self.to_frame().to_bytes()?)
    }
}

impl fmt::Display for InputMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPS < Host: {}", self.ty.name)?;
        for field in &self.fields {
            write!(f, "\n  {}: {}", field.name(), field)?;
        }
        Ok(())
    }
}
