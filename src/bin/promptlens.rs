//! Promptlens CLI — inspect generation metadata embedded in PNG files.
//!
//! Usage:
//!   promptlens inspect <file> [--pretty] [--nodes]
//!   promptlens chunks <file>

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "promptlens",
    version,
    about = "Extract AI generation metadata from PNG files"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the canonical metadata record from a PNG file
    Inspect {
        /// PNG file to read
        file: PathBuf,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        /// Include per-node graph summaries for ComfyUI files
        #[arg(long)]
        nodes: bool,
    },
    /// List the raw text chunks of a PNG file
    Chunks {
        /// PNG file to read
        file: PathBuf,
    },
}

fn cmd_inspect(file: &PathBuf, pretty: bool, nodes: bool) -> i32 {
    let bytes = match std::fs::read(file) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", file.display(), e);
            return 1;
        }
    };

    let extraction = promptlens::extract(&bytes);
    let rendered = if nodes {
        render_json(&extraction, pretty)
    } else {
        render_json(&extraction.record, pretty)
    };
    match rendered {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_chunks(file: &PathBuf) -> i32 {
    let bytes = match std::fs::read(file) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", file.display(), e);
            return 1;
        }
    };

    let chunks = promptlens::read_text_chunks(&bytes);
    if chunks.is_empty() {
        eprintln!("No text chunks found");
        return 0;
    }

    let mut keywords: Vec<&String> = chunks.keys().collect();
    keywords.sort();
    for keyword in keywords {
        println!("{}: {}", keyword, chunks[keyword]);
    }
    0
}

fn render_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(std::io::stderr)
            .init();
    }

    let code = match cli.command {
        Commands::Inspect {
            ref file,
            pretty,
            nodes,
        } => cmd_inspect(file, pretty, nodes),
        Commands::Chunks { ref file } => cmd_chunks(file),
    };
    std::process::exit(code);
}
