//! Simple inspector for `.litematic` files.
//!
//! Usage: `cargo run --example inspect_file -- path/to/file.litematic`

use std::fs;

use litematic::util::format_millis_rfc3339;
use litematic::SchematicReader;

fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: inspect_file <file.litematic>");
        std::process::exit(2);
    };

    println!("Reading: {}", path);
    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let reader = match SchematicReader::new(&data) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("{} ({:?})", e, e.code());
            std::process::exit(1);
        }
    };

    println!("\n=== Schematic ===");
    println!("Name: {}", reader.name());
    println!("Author: {}", reader.author());
    if !reader.description().is_empty() {
        println!("Description: {}", reader.description());
    }
    println!("Version: {} (data version {})", reader.version(), reader.minecraft_data_version());
    println!("Created: {}", format_millis_rfc3339(reader.time_created()));
    println!("Modified: {}", format_millis_rfc3339(reader.time_modified()));
    let size = reader.enclosing_size();
    println!("Enclosing size: {} x {} x {}", size.x, size.y, size.z);
    println!("Blocks: {} of {}", reader.total_blocks(), reader.total_volume());

    println!("\n=== Regions ({}) ===", reader.region_names().len());
    for name in reader.region_names() {
        let marker = if name == reader.region_name() { "*" } else { " " };
        println!("{} {}", marker, name);
    }

    let pos = reader.region_position();
    let size = reader.region_size();
    println!("\n=== Region {:?} ===", reader.region_name());
    println!("Position: {}, {}, {}", pos.x, pos.y, pos.z);
    println!("Size: {}, {}, {}", size.x, size.y, size.z);

    let mut counts = vec![0usize; reader.palette().len()];
    for &index in &reader.region().blocks {
        if let Some(count) = counts.get_mut(index as usize) {
            *count += 1;
        }
    }
    let mut histogram: Vec<(&str, usize)> = reader
        .palette()
        .iter()
        .map(String::as_str)
        .zip(counts)
        .collect();
    histogram.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    println!("\n=== Palette ({} states) ===", histogram.len());
    for (state, count) in histogram {
        println!("{:>10}  {}", count, state);
    }
}
