//! Wire ids of every registered message.
//!
//! Input ids (host → receiver) are below 0x80, output ids (receiver → host)
//! are 0x80 and above.

pub const UNKNOWN: u8 = 0x00;

pub const SYSTEM_RESTART: u8 = 0x01;
pub const QUERY_SOFTWARE_VERSION: u8 = 0x02;
pub const QUERY_SOFTWARE_CRC: u8 = 0x03;
pub const SET_FACTORY_DEFAULTS: u8 = 0x04;
pub const CONFIGURE_SERIAL_PORT: u8 = 0x05;
pub const CONFIGURE_NMEA: u8 = 0x08;
pub const CONFIGURE_OUTPUT_MESSAGE_FORMAT: u8 = 0x09;
pub const CONFIGURE_POWER_MODE: u8 = 0x0C;
pub const CONFIGURE_POSITION_UPDATE_RATE: u8 = 0x0E;
pub const QUERY_POSITION_UPDATE_RATE: u8 = 0x10;
pub const CONFIGURE_DATUM: u8 = 0x29;
pub const QUERY_DATUM: u8 = 0x2D;
pub const GET_EPHEMERIS: u8 = 0x30;
pub const SET_EPHEMERIS: u8 = 0x31;
pub const CONFIGURE_WAAS: u8 = 0x37;
pub const QUERY_WAAS_STATUS: u8 = 0x38;
pub const CONFIGURE_POSITION_PINNING: u8 = 0x39;
pub const QUERY_POSITION_PINNING: u8 = 0x3A;
pub const CONFIGURE_POSITION_PINNING_PARAMETERS: u8 = 0x3B;
pub const CONFIGURE_NAVIGATION_MODE: u8 = 0x3C;
pub const QUERY_NAVIGATION_MODE: u8 = 0x3D;
pub const CONFIGURE_PPS_MODE: u8 = 0x3E;
pub const QUERY_PPS_MODE: u8 = 0x3F;

pub const SOFTWARE_VERSION: u8 = 0x80;
pub const SOFTWARE_CRC: u8 = 0x81;
pub const ACK: u8 = 0x83;
pub const NACK: u8 = 0x84;
pub const POSITION_UPDATE_RATE: u8 = 0x86;
pub const GPS_DATUM: u8 = 0xAE;
pub const GPS_EPHEMERIS_DATA: u8 = 0xB1;
pub const WAAS_STATUS: u8 = 0xB3;
pub const POSITION_PINNING_STATUS: u8 = 0xB4;
pub const NAVIGATION_MODE: u8 = 0xB5;
pub const PPS_MODE: u8 = 0xB6;

/// Whether `id` lies in the output (receiver → host) range.
pub const fn is_output_id(id: u8) -> bool {
    id >= 0x80
}
