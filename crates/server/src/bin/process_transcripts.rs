//! Run saved model transcriptions through the post-processing pipeline.
//!
//! Each `<name>.txt` in the input directory gets its own artifact directory
//! `<out>/<name>/`.
//!
//! Usage: cargo run --bin process-transcripts -- <txt_dir> [--out DIR] [--table legacy|general]

use scoresheet_core::{ArtifactStore, NotationTable, Pipeline, PipelineError};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const DEFAULT_OUT_DIR: &str = "processed";

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <txt_dir> [--out DIR] [--table legacy|general]", args[0]);
        std::process::exit(1);
    }

    let txt_dir = &args[1];
    let mut out_dir = PathBuf::from(DEFAULT_OUT_DIR);
    let mut table = NotationTable::default();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--out" => {
                if let Some(dir) = args.get(i + 1) {
                    out_dir = PathBuf::from(dir);
                }
                i += 2;
            }
            "--table" => {
                let name = args.get(i + 1).map(String::as_str).unwrap_or_default();
                table = NotationTable::from_name(name)
                    .ok_or_else(|| anyhow::anyhow!("Unknown notation table `{name}`"))?;
                i += 2;
            }
            _ => i += 1,
        }
    }

    let pattern = format!("{}/*.txt", txt_dir);
    let files: Vec<_> = glob::glob(&pattern)?
        .filter_map(|p| p.ok())
        .collect();

    if files.is_empty() {
        eprintln!("No transcriptions found in {}", txt_dir);
        std::process::exit(1);
    }

    println!("Processing {} transcriptions (table: {})", files.len(), table.name());
    println!("  Output directory: {}", out_dir.display());
    println!();

    let start = Instant::now();
    let (mut valid, mut invalid, mut empty) = (0u32, 0u32, 0u32);

    for path in &files {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "transcription".to_string());
        let text = fs::read_to_string(path)?;
        let pipeline = Pipeline::new(table, ArtifactStore::new(out_dir.join(&stem)));

        match pipeline.process(&text) {
            Ok(record) if record.validation.is_valid => {
                valid += 1;
                println!("  {stem}: {} vs {} - ok", record.details.white, record.details.black);
            }
            Ok(record) => {
                invalid += 1;
                println!("  {stem}: {}", record.validation.message);
            }
            Err(PipelineError::UpstreamEmpty) => {
                empty += 1;
                println!("  {stem}: empty transcription, skipped");
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!();
    println!(
        "Done in {:.1}s: {} valid, {} invalid, {} empty",
        start.elapsed().as_secs_f64(),
        valid,
        invalid,
        empty
    );

    Ok(())
}
