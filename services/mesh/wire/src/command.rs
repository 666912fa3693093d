//! Coordinator vendor commands and response frames.

use crate::error::{DecodeError, DecodeErrorKind, WireError};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Response envelope: 3 header bytes, command code, checksum
pub const MIN_RESPONSE_FRAME_SIZE: usize = 5;

/// Byte offset of the command code in a response frame
const RESPONSE_CODE_OFFSET: usize = 3;

/// Vendor command codes understood by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandCode {
    /// Open a console session
    OpenSession,
    /// Assign a custom MAC address to a meter
    SetMeterAddress,
    /// Expel a node from the network
    LeaveNetwork,
    /// Reboot a node
    NodeReboot,
    /// List active nodes
    DiscoverNetwork,
    /// Allow or forbid new nodes to join
    PermitNetworkJoin,
    /// Basic network information
    GetNetworkInfo,
    /// Recreate the network on a random channel
    RecreateNetwork,
    /// List every node that has ever joined
    GetChildTable,
    /// Node firmware version
    GetNodeVersion,
    /// Stage a firmware update for a node
    LaunchBootloader,
    /// Push a staged firmware update to a node
    UploadBootloader,
    /// Routing-table query response
    RouteTable,
    /// Recreate the network on a given channel
    RecreateNetworkOnChannel,
    /// Forward a metering request to a sink
    SinkCommand,
    /// Toggle debug mode
    SetDebugConfig,
    /// Close the console session
    CloseSession,
    /// Code outside the catalogue
    Unknown(u8),
}

impl CommandCode {
    /// Raw code byte
    pub fn code(self) -> u8 {
        match self {
            CommandCode::OpenSession => 0x00,
            CommandCode::SetMeterAddress => 0x01,
            CommandCode::LeaveNetwork => 0x05,
            CommandCode::NodeReboot => 0x06,
            CommandCode::DiscoverNetwork => 0x07,
            CommandCode::PermitNetworkJoin => 0x08,
            CommandCode::GetNetworkInfo => 0x09,
            CommandCode::RecreateNetwork => 0x0B,
            CommandCode::GetChildTable => 0x0C,
            CommandCode::GetNodeVersion => 0x19,
            CommandCode::LaunchBootloader => 0x1A,
            CommandCode::UploadBootloader => 0x1B,
            CommandCode::RecreateNetworkOnChannel => 0x23,
            CommandCode::RouteTable => 0xA2,
            CommandCode::SinkCommand => 0xAB,
            CommandCode::SetDebugConfig => 0xDB,
            CommandCode::CloseSession => 0xFF,
            CommandCode::Unknown(code) => code,
        }
    }

    /// Operator-facing description
    pub fn name(self) -> &'static str {
        match self {
            CommandCode::OpenSession => "Open session",
            CommandCode::SetMeterAddress => "Set custom MAC address",
            CommandCode::LeaveNetwork => "Expel node from network",
            CommandCode::NodeReboot => "Reboot node",
            CommandCode::DiscoverNetwork => "List active nodes",
            CommandCode::PermitNetworkJoin => "Permit/deny network join",
            CommandCode::GetNetworkInfo => "Get network information",
            CommandCode::RecreateNetwork => "Recreate network on random channel",
            CommandCode::GetChildTable => "List joined nodes",
            CommandCode::GetNodeVersion => "Get node firmware version",
            CommandCode::LaunchBootloader => "Load node update",
            CommandCode::UploadBootloader => "Send update to node",
            CommandCode::RouteTable => "Get routing table",
            CommandCode::RecreateNetworkOnChannel => "Recreate network on channel",
            CommandCode::SinkCommand => "Send metering requests",
            CommandCode::SetDebugConfig => "Set debug mode",
            CommandCode::CloseSession => "Close session",
            CommandCode::Unknown(_) => "Unknown command",
        }
    }
}

impl From<u8> for CommandCode {
    fn from(value: u8) -> Self {
        match value {
            0x00 => CommandCode::OpenSession,
            0x01 => CommandCode::SetMeterAddress,
            0x05 => CommandCode::LeaveNetwork,
            0x06 => CommandCode::NodeReboot,
            0x07 => CommandCode::DiscoverNetwork,
            0x08 => CommandCode::PermitNetworkJoin,
            0x09 => CommandCode::GetNetworkInfo,
            0x0B => CommandCode::RecreateNetwork,
            0x0C => CommandCode::GetChildTable,
            0x19 => CommandCode::GetNodeVersion,
            0x1A => CommandCode::LaunchBootloader,
            0x1B => CommandCode::UploadBootloader,
            0x23 => CommandCode::RecreateNetworkOnChannel,
            0xA2 => CommandCode::RouteTable,
            0xAB => CommandCode::SinkCommand,
            0xDB => CommandCode::SetDebugConfig,
            0xFF => CommandCode::CloseSession,
            other => CommandCode::Unknown(other),
        }
    }
}

impl FromStr for CommandCode {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);

        if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(WireError::CommandCode(s.to_string()));
        }

        u8::from_str_radix(digits, 16)
            .map(CommandCode::from)
            .map_err(|_| WireError::CommandCode(s.to_string()))
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}", self.code())
    }
}

/// Unpacked coordinator response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    /// Command the response answers
    pub code: CommandCode,
    /// Response parameters
    pub parameters: Bytes,
}

impl CommandResponse {
    /// Create a response from already-unpacked parts
    pub fn new(code: CommandCode, parameters: Bytes) -> Self {
        Self { code, parameters }
    }

    /// Build a response from the console's hex representation, e.g. `("A2", "0201...")`
    pub fn from_hex(code: &str, parameters: &str) -> Result<Self, WireError> {
        let code = code.parse()?;
        let parameters = parameters.trim();

        if parameters.len() % 2 != 0 {
            return Err(WireError::Parameters(DecodeError::new(
                parameters.len() / 2,
                DecodeErrorKind::OddLength,
            )));
        }

        let parameters =
            hex::decode(parameters).map_err(|err| DecodeError::from_hex(parameters, err))?;
        Ok(Self::new(code, Bytes::from(parameters)))
    }

    /// Unpack a raw response frame; the trailing checksum byte is dropped
    pub fn from_frame(frame: &[u8]) -> Result<Self, WireError> {
        if frame.len() < MIN_RESPONSE_FRAME_SIZE {
            return Err(WireError::Incomplete(frame.len()));
        }

        let code = CommandCode::from(frame[RESPONSE_CODE_OFFSET]);
        let parameters = Bytes::copy_from_slice(&frame[RESPONSE_CODE_OFFSET + 1..frame.len() - 1]);

        Ok(Self::new(code, parameters))
    }

    /// Parameters as uppercase hex
    pub fn parameters_hex(&self) -> String {
        hex::encode_upper(&self.parameters)
    }

    /// Whether this response carries a routing table
    pub fn is_route_table(&self) -> bool {
        self.code == CommandCode::RouteTable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip_through_catalogue() {
        for raw in [0x00u8, 0x01, 0x05, 0x09, 0x0C, 0x23, 0xA2, 0xAB, 0xDB, 0xFF] {
            let code = CommandCode::from(raw);
            assert!(!matches!(code, CommandCode::Unknown(_)));
            assert_eq!(code.code(), raw);
        }

        let unknown = CommandCode::from(0x42);
        assert_eq!(unknown, CommandCode::Unknown(0x42));
        assert_eq!(unknown.name(), "Unknown command");
    }

    #[test]
    fn test_parse_console_code() {
        assert_eq!("A2".parse::<CommandCode>().unwrap(), CommandCode::RouteTable);
        assert_eq!("a2".parse::<CommandCode>().unwrap(), CommandCode::RouteTable);
        assert_eq!("0x09".parse::<CommandCode>().unwrap(), CommandCode::GetNetworkInfo);
        assert_eq!(CommandCode::RouteTable.to_string(), "A2");
        assert!("".parse::<CommandCode>().is_err());
        assert!("1A2".parse::<CommandCode>().is_err());
        assert!("G1".parse::<CommandCode>().is_err());
    }

    #[test]
    fn test_from_hex() {
        let response = CommandResponse::from_hex("A2", "00").unwrap();
        assert!(response.is_route_table());
        assert_eq!(response.parameters.as_ref(), &[0x00]);
        assert_eq!(response.parameters_hex(), "00");

        let err = CommandResponse::from_hex("A2", "0").unwrap_err();
        assert!(matches!(err, WireError::Parameters(_)));
    }

    #[test]
    fn test_from_frame() {
        // header, code, params, checksum
        let frame = [0xAA, 0x01, 0x03, 0xA2, 0x01, 0x02, 0x03, 0x5C];
        let response = CommandResponse::from_frame(&frame).unwrap();
        assert_eq!(response.code, CommandCode::RouteTable);
        assert_eq!(response.parameters.as_ref(), &[0x01, 0x02, 0x03]);

        let bare = CommandResponse::from_frame(&[0xAA, 0x01, 0x00, 0x09, 0x00]).unwrap();
        assert_eq!(bare.code, CommandCode::GetNetworkInfo);
        assert!(bare.parameters.is_empty());
    }

    #[test]
    fn test_from_frame_too_short() {
        let err = CommandResponse::from_frame(&[0xAA, 0x01, 0x00, 0xA2]).unwrap_err();
        assert_eq!(err, WireError::Incomplete(4));
    }
}
