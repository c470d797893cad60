//! The built-in message catalogue.
//!
//! Every type the receiver is known to speak is listed here, including ids
//! whose body layout is undocumented ([`Layout::Opaque`]); those still get a
//! name so acknowledgements for them can be reported.

use crate::field::{self, FieldType};
use crate::ids;
use crate::registry::{Direction, Layout, MessageType};

static NO_FIELDS: [&FieldType; 0] = [];
static SOFTWARE_TYPE_FIELDS: [&FieldType; 1] = [&field::SOFTWARE_TYPE];
static SERIAL_PORT_FIELDS: [&FieldType; 3] =
    [&field::COM_PORT, &field::BAUD_RATE, &field::ATTRIBUTES];
static UPDATE_RATE_CONFIG_FIELDS: [&FieldType; 2] = [&field::UPDATE_RATE, &field::ATTRIBUTES];
static DATUM_CONFIG_FIELDS: [&FieldType; 8] = [
    &field::DATUM_INDEX,
    &field::ELLIPSOID_INDEX,
    &field::DELTA_X,
    &field::DELTA_Y,
    &field::DELTA_Z,
    &field::SEMI_MAJOR_AXIS,
    &field::INVERSE_FLATTENING,
    &field::ATTRIBUTES,
];
static PINNING_CONFIG_FIELDS: [&FieldType; 1] = [&field::POSITION_PINNING];

static SOFTWARE_VERSION_FIELDS: [&FieldType; 4] = [
    &field::SOFTWARE_TYPE,
    &field::KERNEL_VERSION,
    &field::ODM_VERSION,
    &field::REVISION,
];
static SOFTWARE_CRC_FIELDS: [&FieldType; 2] = [&field::SOFTWARE_TYPE, &field::CRC];
static ACK_FIELDS: [&FieldType; 1] = [&field::ACK_ID];
static UPDATE_RATE_FIELDS: [&FieldType; 1] = [&field::UPDATE_RATE];
static DATUM_FIELDS: [&FieldType; 1] = [&field::DATUM_INDEX];
static WAAS_STATUS_FIELDS: [&FieldType; 1] = [&field::WAAS_STATUS];
static PINNING_STATUS_FIELDS: [&FieldType; 6] = [
    &field::POSITION_PINNING,
    &field::PINNING_SPEED,
    &field::PINNING_COUNT,
    &field::UNPINNING_SPEED,
    &field::UNPINNING_COUNT,
    &field::UNPINNING_DISTANCE,
];

const fn input(id: u8, name: &'static str, layout: Layout) -> MessageType {
    MessageType {
        id,
        name,
        direction: Direction::Input,
        layout,
    }
}

const fn output(id: u8, name: &'static str, layout: Layout) -> MessageType {
    MessageType {
        id,
        name,
        direction: Direction::Output,
        layout,
    }
}

/// Placeholder returned for input ids that are not registered.
pub static UNKNOWN_INPUT: MessageType = input(ids::UNKNOWN, "?", Layout::Opaque);

pub static SYSTEM_RESTART: MessageType =
    input(ids::SYSTEM_RESTART, "System restart", Layout::Opaque);
pub static QUERY_SOFTWARE_VERSION: MessageType = input(
    ids::QUERY_SOFTWARE_VERSION,
    "Query software version",
    Layout::Fields(&SOFTWARE_TYPE_FIELDS),
);
pub static QUERY_SOFTWARE_CRC: MessageType =
    input(ids::QUERY_SOFTWARE_CRC, "Query software CRC", Layout::Fields(&SOFTWARE_TYPE_FIELDS));
pub static SET_FACTORY_DEFAULTS: MessageType =
    input(ids::SET_FACTORY_DEFAULTS, "Set factory defaults", Layout::Opaque);
pub static CONFIGURE_SERIAL_PORT: MessageType =
    input(ids::CONFIGURE_SERIAL_PORT, "Configure serial port", Layout::Fields(&SERIAL_PORT_FIELDS));
pub static CONFIGURE_NMEA: MessageType =
    input(ids::CONFIGURE_NMEA, "Configure NMEA", Layout::Opaque);
pub static CONFIGURE_OUTPUT_MESSAGE_FORMAT: MessageType =
    input(ids::CONFIGURE_OUTPUT_MESSAGE_FORMAT, "Configure output message format", Layout::Opaque);
pub static CONFIGURE_POWER_MODE: MessageType =
    input(ids::CONFIGURE_POWER_MODE, "Configure power mode", Layout::Opaque);
pub static CONFIGURE_POSITION_UPDATE_RATE: MessageType = input(
    ids::CONFIGURE_POSITION_UPDATE_RATE,
    "Configure position update rate",
    Layout::Fields(&UPDATE_RATE_CONFIG_FIELDS),
);
pub static QUERY_POSITION_UPDATE_RATE: MessageType = input(
    ids::QUERY_POSITION_UPDATE_RATE,
    "Query position update rate",
    Layout::Fields(&NO_FIELDS),
);
pub static CONFIGURE_DATUM: MessageType =
    input(ids::CONFIGURE_DATUM, "Configure datum", Layout::Fields(&DATUM_CONFIG_FIELDS));
pub static QUERY_DATUM: MessageType =
    input(ids::QUERY_DATUM, "Query datum", Layout::Fields(&NO_FIELDS));
pub static GET_EPHEMERIS: MessageType = input(ids::GET_EPHEMERIS, "Get ephemeris", Layout::Opaque);
pub static SET_EPHEMERIS: MessageType = input(ids::SET_EPHEMERIS, "Set ephemeris", Layout::Opaque);
pub static CONFIGURE_WAAS: MessageType =
    input(ids::CONFIGURE_WAAS, "Configure WAAS", Layout::Opaque);
pub static QUERY_WAAS_STATUS: MessageType =
    input(ids::QUERY_WAAS_STATUS, "Query WAAS status", Layout::Fields(&NO_FIELDS));
pub static CONFIGURE_POSITION_PINNING: MessageType = input(
    ids::CONFIGURE_POSITION_PINNING,
    "Configure position pinning",
    Layout::Fields(&PINNING_CONFIG_FIELDS),
);
pub static QUERY_POSITION_PINNING: MessageType =
    input(ids::QUERY_POSITION_PINNING, "Query position pinning", Layout::Fields(&NO_FIELDS));
pub static CONFIGURE_POSITION_PINNING_PARAMETERS: MessageType = input(
    ids::CONFIGURE_POSITION_PINNING_PARAMETERS,
    "Configure position pinning parameters",
    Layout::Opaque,
);
pub static CONFIGURE_NAVIGATION_MODE: MessageType =
    input(ids::CONFIGURE_NAVIGATION_MODE, "Configure navigation mode", Layout::Opaque);
pub static QUERY_NAVIGATION_MODE: MessageType =
    input(ids::QUERY_NAVIGATION_MODE, "Query navigation mode", Layout::Fields(&NO_FIELDS));
pub static CONFIGURE_PPS_MODE: MessageType =
    input(ids::CONFIGURE_PPS_MODE, "Configure PPS mode", Layout::Opaque);
pub static QUERY_PPS_MODE: MessageType =
    input(ids::QUERY_PPS_MODE, "Query PPS mode", Layout::Fields(&NO_FIELDS));
pub static SOFTWARE_VERSION: MessageType =
    output(ids::SOFTWARE_VERSION, "Software version", Layout::Fields(&SOFTWARE_VERSION_FIELDS));
pub static SOFTWARE_CRC: MessageType =
    output(ids::SOFTWARE_CRC, "Software CRC", Layout::Fields(&SOFTWARE_CRC_FIELDS));
pub static ACK: MessageType = output(ids::ACK, "ACK", Layout::Fields(&ACK_FIELDS));
pub static NACK: MessageType = output(ids::NACK, "NACK", Layout::Fields(&ACK_FIELDS));
pub static POSITION_UPDATE_RATE: MessageType =
    output(ids::POSITION_UPDATE_RATE, "Position update rate", Layout::Fields(&UPDATE_RATE_FIELDS));
pub static GPS_DATUM: MessageType =
    output(ids::GPS_DATUM, "GPS datum", Layout::Fields(&DATUM_FIELDS));
pub static GPS_EPHEMERIS_DATA: MessageType =
    output(ids::GPS_EPHEMERIS_DATA, "GPS ephemeris data", Layout::Opaque);
pub static WAAS_STATUS: MessageType =
    output(ids::WAAS_STATUS, "WAAS status", Layout::Fields(&WAAS_STATUS_FIELDS));
pub static POSITION_PINNING_STATUS: MessageType = output(
    ids::POSITION_PINNING_STATUS,
    "GPS position pinning status",
    Layout::Fields(&PINNING_STATUS_FIELDS),
);
pub static NAVIGATION_MODE: MessageType =
    output(ids::NAVIGATION_MODE, "Navigation mode", Layout::Opaque);
pub static PPS_MODE: MessageType = output(ids::PPS_MODE, "PPS mode", Layout::Opaque);

pub static INPUT_TYPES: [&MessageType; 23] = [
    &SYSTEM_RESTART,
    &QUERY_SOFTWARE_VERSION,
    &QUERY_SOFTWARE_CRC,
    &SET_FACTORY_DEFAULTS,
    &CONFIGURE_SERIAL_PORT,
    &CONFIGURE_NMEA,
    &CONFIGURE_OUTPUT_MESSAGE_FORMAT,
    &CONFIGURE_POWER_MODE,
    &CONFIGURE_POSITION_UPDATE_RATE,
    &QUERY_POSITION_UPDATE_RATE,
    &CONFIGURE_DATUM,
    &QUERY_DATUM,
    &GET_EPHEMERIS,
    &SET_EPHEMERIS,
    &CONFIGURE_WAAS,
    &QUERY_WAAS_STATUS,
    &CONFIGURE_POSITION_PINNING,
    &QUERY_POSITION_PINNING,
    &CONFIGURE_POSITION_PINNING_PARAMETERS,
    &CONFIGURE_NAVIGATION_MODE,
    &QUERY_NAVIGATION_MODE,
    &CONFIGURE_PPS_MODE,
    &QUERY_PPS_MODE,
];

pub static OUTPUT_TYPES: [&MessageType; 11] = [
    &SOFTWARE_VERSION,
    &SOFTWARE_CRC,
    &ACK,
    &NACK,
    &POSITION_UPDATE_RATE,
    &GPS_DATUM,
    &GPS_EPHEMERIS_DATA,
    &WAAS_STATUS,
    &POSITION_PINNING_STATUS,
    &NAVIGATION_MODE,
    &PPS_MODE,
];
