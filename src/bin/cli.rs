// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Spiralbook CLI
//!
//! Headless counterpart of the page-editor UI: inspects a built model
//! and manages pages and textures against a JSON store file.

use anyhow::{bail, Context, Result};
use base64::Engine;
use clap::{Parser, Subcommand};
use colored::Colorize;
use spiralbook::book::content::decode_data_url;
use spiralbook::store::editor::PageEditor;
use spiralbook::store::{load_page_count, texture_key};
use spiralbook::{build_from_store, JsonFileStore, NodeTag, Side, SurfaceId};
use std::path::Path;

#[derive(Parser)]
#[command(name = "spiralbook")]
#[command(about = "Spiral notebook model - page and texture management", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Store file (created on first write)
    #[arg(short, long, value_name = "FILE", default_value = "spiralbook.json")]
    store: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the model from the store and print its shape
    Info,

    /// Manage pages
    Page {
        #[command(subcommand)]
        action: PageAction,
    },

    /// Manage surface textures
    Texture {
        #[command(subcommand)]
        action: TextureAction,
    },
}

#[derive(Subcommand)]
enum PageAction {
    /// Append a blank page
    Add,

    /// Remove the last page
    Pop,

    /// Delete a page by number (later pages shift down)
    Delete {
        /// 1-based page number
        number: usize,
    },
}

#[derive(Subcommand)]
enum TextureAction {
    /// Set a surface texture from an image file
    Set {
        /// Surface id: cover-front, cover-back or page-<n>
        surface: String,

        /// Side: front or back
        side: String,

        /// Image file (png, jpeg, gif, webp)
        file: String,
    },

    /// Remove a surface texture
    Clear {
        /// Surface id: cover-front, cover-back or page-<n>
        surface: String,

        /// Side: front or back
        side: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut store = JsonFileStore::load(&cli.store)
        .with_context(|| format!("opening store {}", cli.store))?;

    match &cli.command {
        Commands::Info => info_command(&store, cli.verbose)?,
        Commands::Page { action } => {
            page_command(&mut store, action, cli.verbose)?;
            store.persist().context("writing store")?;
        }
        Commands::Texture { action } => {
            texture_command(&mut store, action, cli.verbose)?;
            store.persist().context("writing store")?;
        }
    }

    Ok(())
}

fn info_command(store: &JsonFileStore, verbose: bool) -> Result<()> {
    let start = std::time::Instant::now();
    let model = build_from_store(store)?;
    let build_time = start.elapsed();

    let config = model.config();
    println!("{}", "Spiralbook".bold());
    println!("  {} {}", "Pages:".bright_black(), config.page_count.to_string().cyan());
    println!(
        "  {} {} x {}",
        "Cover:".bright_black(),
        config.width,
        config.height
    );
    println!("  {} {}", "Rings:".bright_black(), config.hole_count());
    println!("  {} {}", "Nodes:".bright_black(), model.graph.len());

    let textured = model
        .graph
        .iter()
        .filter(|(_, node)| {
            matches!(node.tag, NodeTag::Content { .. })
                && node.material.as_ref().is_some_and(|m| m.texture.is_some())
        })
        .count();
    println!("  {} {}", "Textured faces:".bright_black(), textured);

    if verbose {
        println!("  {} {:.2?}", "Built in:".bright_black(), build_time);
        let triangles: usize = model
            .graph
            .iter()
            .filter_map(|(_, node)| node.mesh.as_ref())
            .map(|mesh| mesh.triangle_count())
            .sum();
        println!("  {} {}", "Triangles:".bright_black(), triangles);
    }

    Ok(())
}

fn page_command(store: &mut JsonFileStore, action: &PageAction, verbose: bool) -> Result<()> {
    let mut editor = PageEditor::new(store);
    let count = match action {
        PageAction::Add => editor.add_page(),
        PageAction::Pop => editor.pop_page()?,
        PageAction::Delete { number } => {
            if verbose {
                println!("Deleting page {number}");
            }
            editor.delete_page(*number)?
        }
    };
    println!("Page count is now {}", count.to_string().green());
    Ok(())
}

fn texture_command(
    store: &mut JsonFileStore,
    action: &TextureAction,
    verbose: bool,
) -> Result<()> {
    match action {
        TextureAction::Set { surface, side, file } => {
            let surface = parse_surface(store, surface)?;
            let side = parse_side(side)?;
            let url = data_url_from_file(file)?;
            if verbose {
                let texture = decode_data_url(&url)?;
                println!("Decoded {}: {}x{}", file, texture.width, texture.height);
            }
            PageEditor::new(store).set_texture(surface, side, &url);
            println!(
                "Set {} from {}",
                texture_key(surface, side).cyan(),
                file
            );
        }
        TextureAction::Clear { surface, side } => {
            let surface = parse_surface(store, surface)?;
            let side = parse_side(side)?;
            PageEditor::new(store).clear_texture(surface, side);
            println!("Cleared {}", texture_key(surface, side).cyan());
        }
    }
    Ok(())
}

fn parse_surface(store: &JsonFileStore, raw: &str) -> Result<SurfaceId> {
    let Some(surface) = SurfaceId::parse(raw) else {
        bail!("unknown surface '{raw}' (expected cover-front, cover-back or page-<n>)");
    };
    if let SurfaceId::Page(number) = surface {
        let count = load_page_count(store);
        if number > count {
            bail!("page {number} is out of range (the book has {count} pages)");
        }
    }
    Ok(surface)
}

fn parse_side(raw: &str) -> Result<Side> {
    match raw {
        "front" => Ok(Side::Front),
        "back" => Ok(Side::Back),
        _ => bail!("unknown side '{raw}' (expected front or back)"),
    }
}

fn data_url_from_file(file: &str) -> Result<String> {
    if !Path::new(file).exists() {
        bail!("image file not found: {file}");
    }
    let bytes = std::fs::read(file).with_context(|| format!("reading {file}"))?;
    let format = image::guess_format(&bytes).with_context(|| format!("inspecting {file}"))?;
    let mime = match format {
        image::ImageFormat::Png => "image/png",
        image::ImageFormat::Jpeg => "image/jpeg",
        image::ImageFormat::Gif => "image/gif",
        image::ImageFormat::WebP => "image/webp",
        other => bail!("unsupported image format {other:?}"),
    };
    let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:{mime};base64,{payload}"))
}
