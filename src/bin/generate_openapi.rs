//! Dumps the compiled OpenAPI spec for the ingestion API.
//!
//! Usage:
//!   cargo run --bin generate_openapi > openapi.json
//!   cargo run --bin generate_openapi -- --output openapi.json

use std::{env, fs, io::Write, process};

use agrivision_ingest::api::handlers::ApiDoc;
use utoipa::OpenApi;

fn main() {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .expect("Failed to serialise OpenAPI spec");

    let args: Vec<String> = env::args().collect();
    let output = args
        .iter()
        .position(|a| a == "--output")
        .and_then(|i| args.get(i + 1));

    if let Some(path) = output {
        if let Err(e) = fs::write(path, &json) {
            eprintln!("Error writing to {path}: {e}");
            process::exit(1);
        }
        eprintln!("OpenAPI spec written to {path}");
    } else if let Err(e) = std::io::stdout().write_all(json.as_bytes()) {
        eprintln!("Failed to write to stdout: {e}");
        process::exit(1);
    }
}
