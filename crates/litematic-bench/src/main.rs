//! Benchmark for schematic writing and reading using a synthetic landscape.
//!
//! Usage: `bench-structure [SIZE]` builds a SIZE x 64 x SIZE terrain
//! (default 128) with layered soil, ore veins and scattered logs.

use std::time::Instant;

use litematic::{SchematicReader, SchematicWriter};

const HEIGHT: i32 = 64;

/// Deterministic terrain height at a column.
fn surface(x: i32, z: i32) -> i32 {
    let h = (x * 7 + z * 13) % 11 + (x / 5 + z / 3) % 7 + ((x ^ z) & 3);
    24 + h.rem_euclid(24)
}

fn block_at(x: i32, y: i32, z: i32, top: i32) -> Option<&'static str> {
    if y > top {
        if y == top + 1 && (x * 31 + z * 17) % 97 == 0 {
            return Some("minecraft:oak_log[axis=y]");
        }
        return None;
    }
    Some(match top - y {
        0 => "minecraft:grass_block[snowy=false]",
        1..=3 => "minecraft:dirt",
        _ if y == 0 => "minecraft:bedrock",
        _ if (x * 3 + y * 5 + z * 7) % 53 == 0 => "minecraft:iron_ore",
        _ if (x + y * 11 + z * 2) % 131 == 0 => "minecraft:diamond_ore",
        _ if (x ^ y ^ z) % 29 == 0 => "minecraft:andesite",
        _ => "minecraft:stone",
    })
}

fn main() {
    env_logger::init();

    let size: i32 = std::env::args()
        .nth(1)
        .map(|s| s.parse().expect("SIZE must be an integer"))
        .unwrap_or(128);

    println!("Building {}x{}x{} landscape", size, HEIGHT, size);

    // Build
    let build_start = Instant::now();
    let mut writer = SchematicWriter::new("Landscape", "bench-structure").description("synthetic terrain");
    let mut placed = 0usize;
    for x in 0..size {
        for z in 0..size {
            let top = surface(x, z);
            for y in 0..HEIGHT {
                if let Some(state) = block_at(x, y, z, top) {
                    writer.set_block(x, y, z, state);
                    placed += 1;
                }
            }
        }
    }
    let build_time = build_start.elapsed();
    println!(
        "Placed {} blocks ({} palette entries) in {:?}",
        placed,
        writer.palette().len(),
        build_time
    );

    // Encode
    let encode_start = Instant::now();
    let nbt = writer.to_nbt().expect("Failed to encode");
    let encode_time = encode_start.elapsed();
    println!("\nUncompressed: {} bytes in {:?}", nbt.len(), encode_time);
    println!(
        "  Throughput: {:.2} MB/s",
        (nbt.len() as f64 / 1_000_000.0) / encode_time.as_secs_f64()
    );

    for level in [1, 6, 9] {
        let save_start = Instant::now();
        let compressed = writer.save_with_level(level).expect("Failed to save");
        let save_time = save_start.elapsed();
        println!(
            "\nCompressed (level {}): {} bytes in {:?}",
            level,
            compressed.len(),
            save_time
        );
        println!(
            "  Compression ratio: {:.1}x",
            nbt.len() as f64 / compressed.len() as f64
        );
    }

    // Decode
    let compressed = writer.save().expect("Failed to save");
    let read_start = Instant::now();
    let reader = SchematicReader::new(&compressed).expect("Failed to read");
    let read_time = read_start.elapsed();
    println!("\nRead back in {:?}", read_time);
    println!(
        "  Throughput: {:.2} MB/s (uncompressed)",
        (nbt.len() as f64 / 1_000_000.0) / read_time.as_secs_f64()
    );

    // Verify
    assert_eq!(reader.total_blocks() as usize, placed, "non-air count should survive round trip");
    let mut mismatches = 0;
    for x in (0..size).step_by(7) {
        for z in (0..size).step_by(5) {
            for y in 0..HEIGHT {
                if reader.get_block(x, y, z) != writer.get_block(x, y, z) {
                    mismatches += 1;
                }
            }
        }
    }
    assert_eq!(mismatches, 0, "sampled blocks should match the writer");
    println!(
        "\nVerified: {} blocks, {}x{}x{} region {:?}",
        reader.total_blocks(),
        reader.width(),
        reader.height(),
        reader.length(),
        reader.region_name()
    );
}
