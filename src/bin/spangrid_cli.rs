//! CLI tool for spangrid - packs a JSON item list and outputs the resolved layout
//!
//! Usage:
//!   spangrid_cli <items.json>                  # 1 column, JSON to stdout
//!   spangrid_cli <items.json> -c 4             # pack into 4 columns
//!   spangrid_cli <items.json> -c 4 -o out.json # write to file
//!
//! Build with `--features cli`. Set `RUST_LOG=spangrid=debug` to see placement
//! decisions.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use spangrid::{pack, CellDefinition};

fn usage() -> ! {
    eprintln!("Usage: spangrid_cli <items.json> [-c columns] [-o output.json]");
    std::process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("spangrid=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }

    let input_path = &args[1];
    let mut column_count = 1;
    let mut output_path = None;
    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        match (flag.as_str(), rest.next()) {
            ("-c", Some(value)) => {
                column_count = value.parse().unwrap_or_else(|_| {
                    eprintln!("Invalid column count: {}", value);
                    std::process::exit(1);
                });
            }
            ("-o", Some(value)) => output_path = Some(value),
            _ => usage(),
        }
    }

    // Read input file
    let data = match fs::read_to_string(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let definitions: Vec<CellDefinition<String>> = match serde_json::from_str(&data) {
        Ok(defs) => defs,
        Err(e) => {
            eprintln!("Error parsing items: {}", e);
            std::process::exit(1);
        }
    };

    let grid = match pack(column_count, &definitions) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Error packing grid: {}", e);
            std::process::exit(1);
        }
    };

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&grid) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
