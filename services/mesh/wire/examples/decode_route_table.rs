//! Decoding a routing-table response.

use meshmap_wire::{CommandResponse, RouteTableDecoder, ROUTE_RECORD_LAYOUT};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Route Table Decoding Example ===\n");

    // 1. A raw response frame: header, command code A2, parameters, checksum
    let frame = hex::decode("AA011BA2030100010000000000020001000000000003000200000000007F")?;
    let response = CommandResponse::from_frame(&frame)?;
    println!("1. Response {} ({})", response.code, response.code.name());
    println!("   Parameters: {}", response.parameters_hex());

    // 2. Decode the parameters
    let decoder = RouteTableDecoder::new();
    let entries = decoder.decode_bytes(&response.parameters)?;
    println!("\n2. Decoded {} entries", entries.len());
    for entry in &entries {
        println!(
            "   {} -> {} (effective {})",
            entry.node_address,
            entry.next_hop_address,
            entry.effective_target()
        );
    }

    // 3. Where the bytes came from
    println!(
        "\n3. Record stride {} bytes, payload needs {} bytes",
        ROUTE_RECORD_LAYOUT.entry_stride,
        ROUTE_RECORD_LAYOUT.required_len(entries.len())
    );

    // 4. Malformed input names the offending byte
    if let Err(e) = decoder.decode("02010203") {
        println!("\n4. Rejected truncated payload: {}", e);
    }

    Ok(())
}
