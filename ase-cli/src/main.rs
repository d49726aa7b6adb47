//! Aseprite Atlas CLI Tool
//!
//! Command-line interface for inspecting Aseprite files and exporting their
//! frames as a PNG sprite atlas.

use anyhow::{Context, Result};
use ase_atlas::{AtlasBuilder, CompositeConfig};
use ase_core::{CelContent, Document};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "aseatlas")]
#[command(about = "Decode Aseprite sprites and flatten them into a sprite atlas")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show file information
    Info {
        /// Input .ase/.aseprite file path
        input: PathBuf,

        /// Print the decoded document structure as JSON
        #[arg(long)]
        json: bool,
    },

    /// Composite every frame into one PNG atlas
    Atlas {
        /// Input .ase/.aseprite file path
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Draw hidden layers too
        #[arg(long)]
        include_hidden: bool,

        /// Layers whose name starts with this character are never drawn
        #[arg(long, default_value = "@")]
        metadata_prefix: char,
    },

    /// Composite a single frame to PNG
    Frame {
        /// Input .ase/.aseprite file path
        input: PathBuf,

        /// Zero-based frame index
        #[arg(long)]
        index: usize,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Draw hidden layers too
        #[arg(long)]
        include_hidden: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { input, json } => show_info(&input, json)?,

        Commands::Atlas {
            input,
            output,
            include_hidden,
            metadata_prefix,
        } => {
            let config = CompositeConfig {
                include_hidden_layers: include_hidden,
                metadata_prefix,
            };
            export_atlas(&input, &output, config)?
        }

        Commands::Frame {
            input,
            index,
            output,
            include_hidden,
        } => {
            let config = CompositeConfig {
                include_hidden_layers: include_hidden,
                ..CompositeConfig::default()
            };
            export_frame(&input, index, &output, config)?
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load(input: &Path) -> Result<Document> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    ase_core::decode(&bytes).context("Failed to decode Aseprite file")
}

fn show_info(input: &Path, json: bool) -> Result<()> {
    let doc = load(input)?;
    if json {
        let text = doc.to_json().context("Failed to serialize document")?;
        println!("{text}");
    } else {
        print_info(&doc);
    }
    Ok(())
}

fn export_atlas(input: &Path, output: &Path, config: CompositeConfig) -> Result<()> {
    println!("Reading sprite: {}", input.display());
    let doc = load(input)?;

    let atlas = AtlasBuilder::new(config)
        .build(&doc)
        .context("Failed to composite frames")?;
    println!(
        "Composited {} frames into {}x{} atlas",
        atlas.frames.len(),
        atlas.buffer.width,
        atlas.buffer.height
    );

    atlas
        .buffer
        .to_rgba_image()
        .save(output)
        .context("Failed to save atlas")?;
    println!("Saved atlas to {}", output.display());

    for (i, rect) in atlas.frames.iter().enumerate() {
        println!(
            "  [{}] x={} y={} {}x{}",
            i, rect.x, rect.y, rect.width, rect.height
        );
    }

    Ok(())
}

fn export_frame(input: &Path, index: usize, output: &Path, config: CompositeConfig) -> Result<()> {
    let doc = load(input)?;
    let frame_count = doc.frames.len();

    let atlas = AtlasBuilder::new(config)
        .build(&doc)
        .context("Failed to composite frames")?;
    let image = atlas
        .frame_image(index)
        .with_context(|| format!("Frame {index} out of range ({frame_count} frames)"))?;

    image.save(output).context("Failed to save frame")?;
    println!("Saved frame {} to {}", index, output.display());

    Ok(())
}

fn print_info(doc: &Document) {
    let header = &doc.header;
    println!("\n=== Aseprite File Information ===");
    println!("Canvas: {}x{}", header.width, header.height);
    println!("Color depth: {:?}", header.color_depth);
    let (pw, ph) = header.pixel_ratio();
    println!("Pixel ratio: {}:{}", pw, ph);
    if let Some(grid) = &header.grid {
        println!(
            "Grid: {}x{} at ({}, {})",
            grid.width, grid.height, grid.x, grid.y
        );
    }
    println!(
        "Frames: {} ({} ms total)",
        doc.frames.len(),
        doc.duration_ms()
    );
    if let Some(palette) = doc.palette() {
        println!("Palette: {} entries", palette.entries.len());
    }

    println!("\n=== Layers ===");
    for (i, layer) in doc.layers.iter().enumerate() {
        println!(
            "  [{}] {}{:?} \"{}\" blend={:?} opacity={}{}",
            i,
            "  ".repeat(usize::from(layer.child_level)),
            layer.layer_type,
            layer.name,
            layer.blend_mode,
            layer.opacity,
            if layer.is_visible() { "" } else { " (hidden)" }
        );
    }

    if !doc.tags.is_empty() {
        println!("\n=== Tags ===");
        for tag in &doc.tags {
            println!(
                "  \"{}\" frames {}..={} {:?}",
                tag.name, tag.from_frame, tag.to_frame, tag.loop_mode
            );
        }
    }

    println!("\n=== Frames (first 10) ===");
    for (i, frame) in doc.frames.iter().take(10).enumerate() {
        let linked = frame
            .cels
            .iter()
            .filter(|cel| matches!(cel.content, CelContent::Linked { .. }))
            .count();
        println!(
            "  [{}] {} ms, {} cels ({} linked), {} chunks",
            i,
            frame.duration_ms,
            frame.cels.len(),
            linked,
            frame.chunk_count
        );
    }
    if doc.frames.len() > 10 {
        println!("  ... and {} more frames", doc.frames.len() - 10);
    }
}
