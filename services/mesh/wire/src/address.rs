//! 16-bit mesh node addresses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Short network address of a mesh node
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Address(pub u16);

impl Address {
    /// The coordinator, root of every routing topology
    pub const COORDINATOR: Address = Address(0x0000);

    /// Build an address from its little-endian wire bytes `[low, high]`
    pub fn from_wire(bytes: [u8; 2]) -> Self {
        Self(u16::from_le_bytes(bytes))
    }

    /// Little-endian wire bytes `[low, high]`
    pub fn to_wire(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    /// Whether this is the coordinator address
    pub fn is_coordinator(self) -> bool {
        self == Self::COORDINATOR
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Address text that is not 1-4 hex digits
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid node address: {0:?}")]
pub struct AddressParseError(pub String);

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.is_empty()
            || digits.len() > 4
            || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(AddressParseError(s.to_string()));
        }

        u16::from_str_radix(digits, 16)
            .map(Address)
            .map_err(|_| AddressParseError(s.to_string()))
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl TryFrom<String> for Address {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<u16> for Address {
    fn from(value: u16) -> Self {
        Self(value)
    }
}
