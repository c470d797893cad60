use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use tracing::debug;

use crate::catalog::{INPUT_TYPES, OUTPUT_TYPES, UNKNOWN_INPUT};
use crate::error::{MessageError, Result};
use crate::field::{Field, FieldType};

/// Which way a message travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Host → receiver.
    Input,
    /// Receiver → host.
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => f.write_str("input"),
            Direction::Output => f.write_str("output"),
        }
    }
}

/// Body layout of a message type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    /// Fixed sequence of fields following the id byte.
    Fields(&'static [&'static FieldType]),
    /// Known id whose body layout is not defined. Such types can be named
    /// but not built or parsed.
    Opaque,
}

/// Static description of one message type.
#[derive(Debug, PartialEq)]
pub struct MessageType {
    pub id: u8,
    pub name: &'static str,
    pub direction: Direction,
    pub layout: Layout,
}

impl MessageType {
    /// The field layout, if known.
    pub fn fields(&self) -> Option<&'static [&'static FieldType]> {
        match self.layout {
            Layout::Fields(fields) => Some(fields),
            Layout::Opaque => None,
        }
    }

    pub fn is_interpretable(&self) -> bool {
        matches!(self.layout, Layout::Fields(_))
    }

    /// Payload length including the id byte, if the layout is known.
    pub fn payload_len(&self) -> Option<usize> {
        self.fields()
            .map(|fields| 1 + fields.iter().map(|ty| ty.width()).sum::<usize>())
    }

    /// Decode the fields of `payload`, which must start with this type's id
    /// and have exactly the layout's length.
    pub fn parse_fields(&self, payload: &[u8]) -> Result<Vec<Field>> {
        let (&id, mut body) = payload.split_first().ok_or(MessageError::EmptyPayload)?;
        if id != self.id {
            return Err(MessageError::WrongMessageId {
                expected: self.id,
                actual: id,
            });
        }
        let layout = self.fields().ok_or(MessageError::NotInterpretable {
            id,
            name: self.name,
        })?;
        let expected = 1 + layout.iter().map(|ty| ty.width()).sum::<usize>();
        if payload.len() != expected {
            return Err(MessageError::PayloadLength {
                id,
                expected,
                actual: payload.len(),
            });
        }

        layout
            .iter()
            .map(|ty| {
                let (head, rest) = body.split_at(ty.width());
                body = rest;
                Field::decode(ty, head)
            })
            .collect()
    }
}

static GLOBAL: LazyLock<MessageRegistry> = LazyLock::new(MessageRegistry::new);

/// Id → type tables for both directions.
///
/// The tables are built once and read-only afterwards; [`MessageRegistry::global`]
/// holds the built-in catalogue.
#[derive(Debug, Clone)]
pub struct MessageRegistry {
    input: HashMap<u8, &'static MessageType>,
    output: HashMap<u8, &'static MessageType>,
}

impl MessageRegistry {
    /// Registry with the built-in catalogue.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(&UNKNOWN_INPUT);
        for ty in INPUT_TYPES.iter().chain(OUTPUT_TYPES.iter()) {
            registry.register(*ty);
        }
        debug!(
            inputs = registry.input.len(),
            outputs = registry.output.len(),
            "message registry built"
        );
        registry
    }

    /// Registry with no entries.
    pub fn empty() -> Self {
        Self {
            input: HashMap::new(),
            output: HashMap::new(),
        }
    }

    /// Shared instance holding the built-in catalogue.
    pub fn global() -> &'static MessageRegistry {
        &GLOBAL
    }

    /// Add or replace a type, returning the previous entry for its id.
    pub fn register(&mut self, ty: &'static MessageType) -> Option<&'static MessageType> {
        let table = match ty.direction {
            Direction::Input => &mut self.input,
            Direction::Output => &mut self.output,
        };
        table.insert(ty.id, ty)
    }

    /// Exact lookup in one direction's table.
    pub fn lookup(&self, direction: Direction, id: u8) -> Option<&'static MessageType> {
        let table = match direction {
            Direction::Input => &self.input,
            Direction::Output => &self.output,
        };
        table.get(&id).copied()
    }

    /// Input type for `id`, falling back to the unknown placeholder.
    pub fn input(&self, id: u8) -> &'static MessageType {
        self.lookup(Direction::Input, id).unwrap_or(&UNKNOWN_INPUT)
    }

    /// Output type for `id`.
    pub fn output(&self, id: u8) -> Result<&'static MessageType> {
        self.lookup(Direction::Output, id)
            .ok_or(MessageError::UnsupportedMessage(id))
    }

    /// Registered ids of one direction, ascending.
    pub fn ids(&self, direction: Direction) -> Vec<u8> {
        let table = match direction {
            Direction::Input => &self.input,
            Direction::Output => &self.output,
        };
        let mut ids: Vec<u8> = table.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Input type by case-insensitive name.
    pub fn input_by_name(&self, name: &str) -> Option<&'static MessageType> {
        self.input
            .values()
            .copied()
            .find(|ty| ty.name.eq_ignore_ascii_case(name))
    }
}

impl Default for MessageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
