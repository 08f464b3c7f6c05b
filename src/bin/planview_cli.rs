//! CLI tool for planview - decodes report files and outputs JSON or HTML
//!
//! Usage:
//!   planview_cli <report.xlsx>              # Output grid JSON to stdout
//!   planview_cli <report.xlsx> --html       # Output first-page HTML
//!   planview_cli <report.xlsx> -o out.json  # Output to file

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use planview::classify::{classify, REPORT_COLUMN_MAPPINGS};
use planview::decode::decode;
use planview::paginate::{Paginator, VIEWER_PAGE_SIZE};
use planview::render::{render_page, RenderOptions};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: planview_cli <report.xlsx> [--html] [-o output]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let as_html = args.iter().any(|a| a == "--html");
    let output_path = args
        .iter()
        .position(|a| a == "-o")
        .and_then(|i| args.get(i + 1));

    // Read input file
    let data = match fs::read(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    // Decode the report
    let grid = match decode(&data) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error decoding report: {}", e);
            std::process::exit(1);
        }
    };

    let output = if as_html {
        let classification = classify(&grid.headers(), grid.data_rows(), REPORT_COLUMN_MAPPINGS);
        let pager = Paginator::new(grid.data_row_count(), VIEWER_PAGE_SIZE);
        render_page(
            &grid,
            &classification.display_columns,
            &pager,
            &RenderOptions::default(),
        )
    } else {
        match serde_json::to_string_pretty(&grid) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Error serializing JSON: {}", e);
                std::process::exit(1);
            }
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &output) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(output.as_bytes()).unwrap();
            println!();
        }
    }
}
