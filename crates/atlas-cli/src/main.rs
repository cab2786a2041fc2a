// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Atlas CLI entrypoint.
//!
//! `atlas build` folds an entity stream into a routing graph and writes
//! the binary archive; `atlas inspect` loads an archive back and reports
//! its contents.
//!
//! # Usage
//! ```text
//! atlas build <stream.jsonl> <out.atlas> [--name LABEL]
//! atlas inspect <out.atlas> [--vertices]
//! ```
//!
//! The binary exits with code `0` after a complete, successful run and
//! non-zero on any ingestion, codec, or I/O failure. A failed build
//! writes no archive: the bytes are fully materialized in memory before
//! the single output write.

// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod stream;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use atlas_codec::{decode_graph, encode_graph};
use atlas_graph::{decode_degrees, IdIndex, RoadGraph, VertexIdx};
use atlas_ingest::Ingestor;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use tracing::info;

#[derive(Parser)]
#[command(name = "atlas", version, about = "Build and inspect routing graph archives")]
struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fold an entity stream (JSON Lines) into a graph archive.
    Build {
        /// Entity stream file, one JSON entity per line.
        stream: PathBuf,
        /// Output archive path.
        out: PathBuf,
        /// Graph name stored in the archive metadata.
        #[arg(long, default_value = "atlas")]
        name: String,
    },
    /// Load an archive and report its contents.
    Inspect {
        /// Archive file produced by `atlas build`.
        archive: PathBuf,
        /// Print one row per vertex (id, lon, lat, out-degree).
        #[arg(long)]
        vertices: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Build { stream, out, name } => build(&stream, &out, name),
        Command::Inspect { archive, vertices } => inspect(&archive, vertices),
    }
}

fn build(stream: &Path, out: &Path, name: String) -> Result<()> {
    let entities = stream::read_entities(stream)
        .with_context(|| format!("reading entity stream {}", stream.display()))?;

    let mut graph = RoadGraph::new(name);
    let mut index = IdIndex::new();
    let mut ingestor = Ingestor::new(&mut graph, &mut index);
    ingestor.ingest_all(entities)?;
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "ingestion complete"
    );

    let bytes = encode_graph(&graph);
    fs::write(out, bytes).with_context(|| format!("writing archive {}", out.display()))?;
    info!(archive = %out.display(), "archive written");
    Ok(())
}

fn inspect(archive: &Path, vertices: bool) -> Result<()> {
    let bytes =
        fs::read(archive).with_context(|| format!("reading archive {}", archive.display()))?;
    let graph = decode_graph(&bytes)?;

    println!("graph: {}", graph.name());
    println!("vertices: {}", graph.vertex_count());
    println!("edges: {}", graph.edge_count());

    if vertices {
        let mut table = Table::new();
        table.set_header(vec!["id", "lon", "lat", "out-degree"]);
        for (i, v) in graph.iter_vertices().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let idx = VertexIdx(i as u32);
            table.add_row(vec![
                v.id.to_string(),
                format!("{:.7}", decode_degrees(v.coord.lon)),
                format!("{:.7}", decode_degrees(v.coord.lat)),
                graph.out_degree(idx).to_string(),
            ]);
        }
        println!("{table}");
    }
    Ok(())
}
