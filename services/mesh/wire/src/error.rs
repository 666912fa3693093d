//! Wire error types.

use thiserror::Error;

/// Response frame errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Frame is shorter than the fixed response envelope
    #[error("incomplete frame: {0} bytes")]
    Incomplete(usize),

    /// Command code is not two hex digits
    #[error("invalid command code: {0:?}")]
    CommandCode(String),

    /// Parameters are not a valid hex string
    #[error("invalid parameters: {0}")]
    Parameters(#[from] DecodeError),

    /// Record layout places a field outside its record
    #[error("invalid record layout: {0}")]
    Layout(String),
}

/// Why a route-table payload was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Payload carries no entry count byte
    #[error("missing entry count")]
    MissingCount,

    /// Payload ends in half a byte
    #[error("odd number of hex digits")]
    OddLength,

    /// Character outside `[0-9a-fA-F]`
    #[error("invalid hex character {0:?}")]
    InvalidHex(char),

    /// Declared entry count needs more bytes than supplied
    #[error("payload truncated: need {needed} bytes, have {available}")]
    Truncated {
        /// Bytes required by the declared entry count
        needed: usize,
        /// Bytes actually present
        available: usize,
    },
}

/// Route-table decode failure at a byte offset
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("decode error at byte {offset}: {reason}")]
pub struct DecodeError {
    /// Offending byte offset within the payload
    pub offset: usize,
    /// Failure reason
    pub reason: DecodeErrorKind,
}

impl DecodeError {
    /// Create a decode error
    pub fn new(offset: usize, reason: DecodeErrorKind) -> Self {
        Self { offset, reason }
    }

    /// Convert a `hex` failure on `payload`, naming the character as written.
    ///
    /// `hex` reports the offending byte, which is only part of a multi-byte char.
    pub fn from_hex(payload: &str, err: hex::FromHexError) -> Self {
        match err {
            hex::FromHexError::InvalidHexCharacter { c, index } => {
                let c = payload
                    .char_indices()
                    .find(|&(start, ch)| start <= index && index < start + ch.len_utf8())
                    .map_or(c, |(_, ch)| ch);
                DecodeError::new(index / 2, DecodeErrorKind::InvalidHex(c))
            }
            other => DecodeError::from(other),
        }
    }
}

impl From<hex::FromHexError> for DecodeError {
    fn from(err: hex::FromHexError) -> Self {
        match err {
            hex::FromHexError::InvalidHexCharacter { c, index } => {
                DecodeError::new(index / 2, DecodeErrorKind::InvalidHex(c))
            }
            // Only produced for fixed-size targets; treat like a dangling nibble
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                DecodeError::new(0, DecodeErrorKind::OddLength)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_character_offset_is_byte_offset() {
        let err = DecodeError::from(hex::FromHexError::InvalidHexCharacter { c: 'z', index: 5 });
        assert_eq!(err.offset, 2);
        assert_eq!(err.reason, DecodeErrorKind::InvalidHex('z'));
    }

    #[test]
    fn test_hex_character_is_recovered_from_payload() {
        let payload = "01é00";
        let err = hex::decode(payload).unwrap_err();
        let err = DecodeError::from_hex(payload, err);
        assert_eq!(err.offset, 1);
        assert_eq!(err.reason, DecodeErrorKind::InvalidHex('é'));
    }

    #[test]
    fn test_display_names_offset() {
        let err = DecodeError::new(
            9,
            DecodeErrorKind::Truncated {
                needed: 17,
                available: 9,
            },
        );
        assert_eq!(
            err.to_string(),
            "decode error at byte 9: payload truncated: need 17 bytes, have 9"
        );
    }
}
