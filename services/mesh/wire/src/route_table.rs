//! Route-table payload decoding.
//!
//! A coordinator answers the routing-table query with a count byte followed by
//! fixed-stride records. Only the node and next-hop address bytes are consumed;
//! the remaining record bytes are carried through untouched.

use crate::address::Address;
use crate::error::{DecodeError, DecodeErrorKind, WireError};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Address byte positions within a route record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    /// Low byte of the node address
    NodeAddrLow,
    /// High byte of the node address
    NodeAddrHigh,
    /// Low byte of the next-hop address
    NextHopLow,
    /// High byte of the next-hop address
    NextHopHigh,
    /// First reserved byte (status/quality fields)
    Reserved,
}

/// Byte layout of a route-table payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    /// Offset of the entry count byte
    pub count_offset: usize,
    /// Distance between consecutive records
    pub entry_stride: usize,
    /// Node address low byte, relative to `count_offset + entry * entry_stride`
    pub node_addr_low_offset: usize,
    /// Node address high byte, relative to `count_offset + entry * entry_stride`
    pub node_addr_high_offset: usize,
    /// Next-hop low byte, relative to `count_offset + entry * entry_stride`
    pub next_hop_low_offset: usize,
    /// Next-hop high byte, relative to `count_offset + entry * entry_stride`
    pub next_hop_high_offset: usize,
    /// First reserved byte, relative to `count_offset + entry * entry_stride`
    pub reserved_offset: usize,
    /// Number of reserved bytes per record
    pub reserved_len: usize,
}

/// Layout of the routing-table query response
pub const ROUTE_RECORD_LAYOUT: RecordLayout = RecordLayout {
    count_offset: 0,
    entry_stride: 8,
    node_addr_low_offset: 1,
    node_addr_high_offset: 2,
    next_hop_low_offset: 3,
    next_hop_high_offset: 4,
    reserved_offset: 5,
    reserved_len: RESERVED_LEN,
};

const RESERVED_LEN: usize = 4;

impl RecordLayout {
    /// Absolute payload offset of `field` in record `entry`
    pub const fn offset(&self, entry: usize, field: RecordField) -> usize {
        let relative = match field {
            RecordField::NodeAddrLow => self.node_addr_low_offset,
            RecordField::NodeAddrHigh => self.node_addr_high_offset,
            RecordField::NextHopLow => self.next_hop_low_offset,
            RecordField::NextHopHigh => self.next_hop_high_offset,
            RecordField::Reserved => self.reserved_offset,
        };
        self.count_offset + entry * self.entry_stride + relative
    }

    /// Minimum payload length for `count` records
    pub const fn required_len(&self, count: usize) -> usize {
        self.count_offset + 1 + count * self.entry_stride
    }

    /// Check that every field lies inside its record.
    ///
    /// Record `i` spans `count_offset + i * entry_stride + 1` through
    /// `count_offset + (i + 1) * entry_stride`, so relative offsets must fall in
    /// `1..=entry_stride`.
    pub fn validate(&self) -> Result<(), WireError> {
        if self.entry_stride == 0 {
            return Err(WireError::Layout("entry stride must be non-zero".to_string()));
        }

        let fields = [
            ("node address low", self.node_addr_low_offset),
            ("node address high", self.node_addr_high_offset),
            ("next hop low", self.next_hop_low_offset),
            ("next hop high", self.next_hop_high_offset),
        ];
        for (name, offset) in fields {
            if !(1..=self.entry_stride).contains(&offset) {
                return Err(WireError::Layout(format!(
                    "{} offset {} outside 1..={}",
                    name, offset, self.entry_stride
                )));
            }
        }

        if self.reserved_len > RESERVED_LEN {
            return Err(WireError::Layout(format!(
                "reserved length {} exceeds {}",
                self.reserved_len, RESERVED_LEN
            )));
        }
        if self.reserved_len > 0
            && (self.reserved_offset == 0
                || self.reserved_offset + self.reserved_len - 1 > self.entry_stride)
        {
            return Err(WireError::Layout(format!(
                "reserved bytes {}..{} outside 1..={}",
                self.reserved_offset,
                self.reserved_offset + self.reserved_len,
                self.entry_stride
            )));
        }

        Ok(())
    }
}

/// One decoded (node, next hop) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Reporting node
    pub node_address: Address,
    /// Address the node relays through toward the coordinator
    pub next_hop_address: Address,
    /// Undecoded status/quality bytes of the record
    #[serde(skip)]
    pub reserved: [u8; RESERVED_LEN],
}

impl RouteEntry {
    /// Create an entry with zeroed reserved bytes
    pub fn new(node_address: Address, next_hop_address: Address) -> Self {
        Self {
            node_address,
            next_hop_address,
            reserved: [0; RESERVED_LEN],
        }
    }

    /// Next hop after the self-loop rule: a node naming itself reaches the coordinator
    pub fn effective_target(&self) -> Address {
        if self.is_direct() {
            Address::COORDINATOR
        } else {
            self.next_hop_address
        }
    }

    /// Whether the node reports itself as its own next hop
    pub fn is_direct(&self) -> bool {
        self.node_address == self.next_hop_address
    }
}

/// Stateless decoder for route-table payloads
#[derive(Debug, Clone, Copy)]
pub struct RouteTableDecoder {
    layout: RecordLayout,
}

impl RouteTableDecoder {
    /// Create a decoder for the routing-table query response
    pub fn new() -> Self {
        Self {
            layout: ROUTE_RECORD_LAYOUT,
        }
    }

    /// Create a decoder for a custom record layout, rejecting fields that fall
    /// outside their record
    pub fn with_layout(layout: RecordLayout) -> Result<Self, WireError> {
        layout.validate()?;
        Ok(Self { layout })
    }

    /// Layout used by this decoder
    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    /// Decode a hex payload (no prefix, case-insensitive)
    pub fn decode(&self, payload: &str) -> Result<Vec<RouteEntry>, DecodeError> {
        let payload = payload.trim();

        if payload.len() % 2 != 0 {
            return Err(DecodeError::new(payload.len() / 2, DecodeErrorKind::OddLength));
        }

        let bytes = hex::decode(payload).map_err(|err| DecodeError::from_hex(payload, err))?;
        self.decode_bytes(&bytes)
    }

    /// Decode an already-unpacked payload
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Vec<RouteEntry>, DecodeError> {
        let layout = &self.layout;

        let count = *bytes
            .get(layout.count_offset)
            .ok_or_else(|| DecodeError::new(layout.count_offset, DecodeErrorKind::MissingCount))?
            as usize;

        let needed = layout.required_len(count);
        if bytes.len() < needed {
            return Err(DecodeError::new(
                bytes.len(),
                DecodeErrorKind::Truncated {
                    needed,
                    available: bytes.len(),
                },
            ));
        }

        // Validated layouts keep every field below `needed`
        let byte_at = |entry: usize, field: RecordField| bytes[layout.offset(entry, field)];

        let entries: Vec<RouteEntry> = (0..count)
            .map(|i| {
                let node_address = Address::from_wire([
                    byte_at(i, RecordField::NodeAddrLow),
                    byte_at(i, RecordField::NodeAddrHigh),
                ]);
                let next_hop_address = Address::from_wire([
                    byte_at(i, RecordField::NextHopLow),
                    byte_at(i, RecordField::NextHopHigh),
                ]);

                let mut reserved = [0u8; RESERVED_LEN];
                let start = layout.offset(i, RecordField::Reserved);
                let len = layout.reserved_len.min(RESERVED_LEN);
                if let Some(raw) = bytes.get(start..start + len) {
                    reserved[..len].copy_from_slice(raw);
                }

                trace!("Route entry {}: {} via {}", i, node_address, next_hop_address);

                RouteEntry {
                    node_address,
                    next_hop_address,
                    reserved,
                }
            })
            .collect();

        if bytes.len() > needed {
            debug!(
                "Ignoring {} trailing bytes after {} route entries",
                bytes.len() - needed,
                count
            );
        }

        debug!("Decoded {} route entries", entries.len());
        Ok(entries)
    }
}

impl Default for RouteTableDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a route-table payload with the standard layout
pub fn decode_route_table(payload: &str) -> Result<Vec<RouteEntry>, DecodeError> {
    RouteTableDecoder::new().decode(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a payload from (node, next hop, reserved) triples
    fn payload(records: &[(u16, u16, [u8; 4])]) -> String {
        let mut bytes = vec![records.len() as u8];
        for (node, next_hop, reserved) in records {
            bytes.extend_from_slice(&node.to_le_bytes());
            bytes.extend_from_slice(&next_hop.to_le_bytes());
            bytes.extend_from_slice(reserved);
        }
        hex::encode(bytes)
    }

    #[test]
    fn test_layout_offsets() {
        let layout = ROUTE_RECORD_LAYOUT;
        assert_eq!(layout.offset(0, RecordField::NodeAddrLow), 1);
        assert_eq!(layout.offset(0, RecordField::NodeAddrHigh), 2);
        assert_eq!(layout.offset(0, RecordField::NextHopLow), 3);
        assert_eq!(layout.offset(0, RecordField::NextHopHigh), 4);
        assert_eq!(layout.offset(2, RecordField::NodeAddrLow), 17);
        assert_eq!(layout.offset(2, RecordField::NextHopHigh), 20);
        assert_eq!(layout.offset(1, RecordField::Reserved), 13);
        assert_eq!(layout.required_len(0), 1);
        assert_eq!(layout.required_len(2), 17);
    }

    #[test]
    fn test_decode_reorders_address_bytes() {
        // count=2, then two full 8-byte records
        let entries = decode_route_table("0201020304000000000102030400000000").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].node_address.to_string(), "0x0201");
        assert_eq!(entries[0].next_hop_address.to_string(), "0x0403");
        assert_eq!(entries[1].node_address, Address(0x0201));
        assert_eq!(entries[1].next_hop_address, Address(0x0403));
    }

    #[test]
    fn test_count_matches_declared() {
        let hex = payload(&[
            (0x0001, 0x0001, [0; 4]),
            (0x0002, 0x0001, [0; 4]),
            (0x0003, 0x0002, [0; 4]),
        ]);
        let entries = decode_route_table(&hex).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].node_address, Address(0x0003));
        assert_eq!(entries[2].next_hop_address, Address(0x0002));
    }

    #[test]
    fn test_decode_is_case_insensitive_and_deterministic() {
        let upper = payload(&[(0xABCD, 0x00EF, [0; 4])]).to_uppercase();
        let lower = upper.to_lowercase();

        let a = decode_route_table(&upper).unwrap();
        let b = decode_route_table(&lower).unwrap();
        let c = decode_route_table(&upper).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a[0].node_address, Address(0xABCD));
    }

    #[test]
    fn test_reserved_bytes_are_skipped_but_kept() {
        let hex = payload(&[(0x0010, 0x0020, [0xFF, 0x7F, 0x01, 0x80])]);
        let entries = decode_route_table(&hex).unwrap();
        assert_eq!(entries[0].node_address, Address(0x0010));
        assert_eq!(entries[0].next_hop_address, Address(0x0020));
        assert_eq!(entries[0].reserved, [0xFF, 0x7F, 0x01, 0x80]);
    }

    #[test]
    fn test_zero_entries() {
        assert!(decode_route_table("00").unwrap().is_empty());
        // Trailing bytes beyond the declared records are tolerated
        assert!(decode_route_table("00FFFF").unwrap().is_empty());
    }

    #[test]
    fn test_empty_payload_is_missing_count() {
        let err = decode_route_table("").unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.reason, DecodeErrorKind::MissingCount);
    }

    #[test]
    fn test_truncated_payload() {
        // Declares two records but carries one and a half
        let err = decode_route_table("02010203040000000001020304").unwrap_err();
        assert_eq!(err.offset, 13);
        assert_eq!(
            err.reason,
            DecodeErrorKind::Truncated {
                needed: 17,
                available: 13
            }
        );
    }

    #[test]
    fn test_non_hex_character_names_offset() {
        let err = decode_route_table("0101020304000000zz").unwrap_err();
        assert_eq!(err.offset, 8);
        assert_eq!(err.reason, DecodeErrorKind::InvalidHex('z'));
    }

    #[test]
    fn test_odd_length() {
        let err = decode_route_table("010").unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(err.reason, DecodeErrorKind::OddLength);
    }

    #[test]
    fn test_non_ascii_character_is_reported_as_written() {
        let err = decode_route_table("éé").unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.reason, DecodeErrorKind::InvalidHex('é'));

        let err = decode_route_table("0102µ00").unwrap_err();
        assert_eq!(err.offset, 2);
        assert_eq!(err.reason, DecodeErrorKind::InvalidHex('µ'));
    }

    #[test]
    fn test_shifted_count_offset() {
        let layout = RecordLayout {
            count_offset: 1,
            ..ROUTE_RECORD_LAYOUT
        };
        assert_eq!(layout.offset(0, RecordField::NodeAddrLow), 2);
        assert_eq!(layout.required_len(1), 10);

        // leading preamble byte, count=1, then one record
        let decoder = RouteTableDecoder::with_layout(layout).unwrap();
        let entries = decoder.decode("AA01020304050000000000").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].node_address, Address(0x0302));
        assert_eq!(entries[0].next_hop_address, Address(0x0504));
    }

    #[test]
    fn test_layout_rejects_fields_outside_record() {
        assert!(ROUTE_RECORD_LAYOUT.validate().is_ok());

        let zero_offset = RecordLayout {
            node_addr_low_offset: 0,
            ..ROUTE_RECORD_LAYOUT
        };
        assert!(matches!(
            RouteTableDecoder::with_layout(zero_offset),
            Err(WireError::Layout(_))
        ));

        let past_stride = RecordLayout {
            next_hop_high_offset: 9,
            ..ROUTE_RECORD_LAYOUT
        };
        assert!(RouteTableDecoder::with_layout(past_stride).is_err());

        let reserved_overrun = RecordLayout {
            reserved_offset: 6,
            ..ROUTE_RECORD_LAYOUT
        };
        assert!(RouteTableDecoder::with_layout(reserved_overrun).is_err());

        let no_stride = RecordLayout {
            entry_stride: 0,
            ..ROUTE_RECORD_LAYOUT
        };
        assert!(RouteTableDecoder::with_layout(no_stride).is_err());
    }

    #[test]
    fn test_self_loop_targets_coordinator() {
        let direct = RouteEntry::new(Address(0x0042), Address(0x0042));
        assert!(direct.is_direct());
        assert_eq!(direct.effective_target(), Address::COORDINATOR);

        let relayed = RouteEntry::new(Address(0x0042), Address(0x0007));
        assert!(!relayed.is_direct());
        assert_eq!(relayed.effective_target(), Address(0x0007));
    }
}
