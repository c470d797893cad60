use std::fmt;

use bytes::Bytes;
use skytraq_frame::Frame;

use crate::error::{MessageError, Result};
use crate::field::Field;
use crate::ids;
use crate::registry::{MessageRegistry, MessageType};

/// A receiver → host message parsed against its registered layout.
#[derive(Debug, Clone)]
pub struct OutputMessage {
    ty: &'static MessageType,
    fields: Vec<Field>,
    payload: Bytes,
}

impl OutputMessage {
    /// Parse a payload using the built-in catalogue.
    pub fn parse(payload: impl Into<Bytes>) -> Result<Self> {
        Self::parse_with(MessageRegistry::global(), payload)
    }

    /// Parse a payload using `registry` to resolve the id.
    ///
    /// Fails with [`MessageError::UnsupportedMessage`] for unregistered ids and
    /// [`MessageError::NotInterpretable`] for registered ids without a layout.
    pub fn parse_with(registry: &MessageRegistry, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        let id = *payload.first().ok_or(MessageError::EmptyPayload)?;
        let ty = registry.output(id)?;
        let fields = ty.parse_fields(&payload)?;
        Ok(Self {
            ty,
            fields,
            payload,
        })
    }

    pub fn from_frame(frame: &Frame) -> Result<Self> {
        Self::parse(frame.payload.clone())
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

    /// First field with the given name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// The raw payload, id byte included.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn is_ack(&self) -> bool {
        self.ty.id == ids::ACK
    }

    pub fn is_nack(&self) -> bool {
        self.ty.id == ids::NACK
    }

    /// The input id an ACK or NACK refers to.
    pub fn acknowledged_id(&self) -> Option<u8> {
        if !self.is_ack() && !self.is_nack() {
            return None;
        }
        self.fields.first().map(|f| f.value() as u8)
    }
}

impl fmt::Display for OutputMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.ty.id, self.fields.as_slice()) {
            (ids::ACK, [ack_id]) => write!(f, "GPS acknowledges {ack_id}"),
            (ids::NACK, [ack_id]) => write!(f, "GPS rejects {ack_id}"),
            (ids::POSITION_UPDATE_RATE, [rate]) => {
                write!(f, "GPS update rate is {} Hz", rate.value())
            }
            (ids::POSITION_PINNING_STATUS, [pinning, parameters @ ..]) => {
                let state = if pinning.as_bool() { "on" } else { "off" };
                write!(f, "GPS position pinning is {state}.")?;
                for field in parameters {
                    write!(f, "\n  {}: {}", field.name(), field)?;
                }
                Ok(())
            }
            _ => {
                write!(f, "GPS > Host: {}", self.ty.name)?;
                for field in &self.fields {
                    write!(f, "\n  {}: {}", field.name(), field)?;
                }
                Ok(())
            }
        }
    }
}
