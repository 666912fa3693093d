//! Coordinator response framing and route-table payload decoding for meshmap.
//!
//! This crate provides the byte-level contracts between a mesh coordinator and
//! the console: 16-bit node addresses, the vendor command catalogue, response
//! frame unpacking, and the route-table payload decoder.
//!
//! ## Route-Table Payload
//!
//! ```text
//! +--------+------------------------------------------------------------+
//! | byte 0 | entry count N                                              |
//! +--------+------------------------------------------------------------+
//! | 8 * N  | records, record i starts at byte 1 + 8i                    |
//! +--------+------------------------------------------------------------+
//!
//! record (offsets relative to 8i):
//! +-----+-----+-----+-----+-----+-----+-----+-----+
//! | 1   | 2   | 3   | 4   | 5   | 6   | 7   | 8   |
//! | node addr | next hop  | reserved              |
//! | lo    hi  | lo    hi  |                       |
//! +-----+-----+-----+-----+-----+-----+-----+-----+
//! ```
//!
//! Addresses travel little-endian and are shown high byte first (`0x0201`).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod command;
pub mod error;
pub mod route_table;

// Re-export main types
pub use address::{Address, AddressParseError};
pub use command::{CommandCode, CommandResponse, MIN_RESPONSE_FRAME_SIZE};
pub use error::{DecodeError, DecodeErrorKind, WireError};
pub use route_table::{
    decode_route_table, RecordField, RecordLayout, RouteEntry, RouteTableDecoder,
    ROUTE_RECORD_LAYOUT,
};
