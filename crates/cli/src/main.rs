//! CLI tool for turning markdown slide outlines into PowerPoint decks.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::{Deck, DeckConfig, RenderSummary, Renderer, SlideParser, SpanishLongDate};
use deck_pptx::{ImageDimensions, PptxDocument};
use std::fs;
use std::path::{Path, PathBuf};

/// Build a PowerPoint deck from a markdown outline and a .pptx template.
#[derive(Parser, Debug)]
#[command(name = "md2pptx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Markdown outline, slides separated by `---` lines
    #[arg(default_value = "slides.md")]
    input: PathBuf,

    /// PowerPoint template whose layouts are used
    #[arg(short, long, default_value = "templates/template.pptx")]
    template: PathBuf,

    /// Output .pptx file
    #[arg(short, long, default_value = "presentacion.pptx")]
    output: PathBuf,

    /// TOML file with layout indexes, title styles and image extensions
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append today's date to cover titles
    #[arg(long)]
    date: bool,

    /// Print the parsed slides as JSON instead of rendering
    #[arg(short, long)]
    print: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = match &args.config {
        Some(path) => DeckConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DeckConfig::default(),
    };

    let deck = read_deck(&args.input, &config)?;
    if args.verbose {
        eprintln!("Parsed {} slides from {}", deck.len(), args.input.display());
    }

    if args.print {
        println!("{}", serde_json::to_string_pretty(&deck)?);
        return Ok(());
    }

    let summary = render_deck(&deck, &args, config)?;
    report(&summary, &args);

    Ok(())
}

/// Read and parse the markdown outline.
fn read_deck(input_path: &Path, config: &DeckConfig) -> Result<Deck> {
    let text = fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    let parser = SlideParser::with_options(config.parser_options());
    Ok(parser.parse(&text))
}

/// Render the deck onto the template and write the output file.
fn render_deck(deck: &Deck, args: &Args, config: DeckConfig) -> Result<RenderSummary> {
    let mut document = PptxDocument::open(&args.template)
        .with_context(|| format!("Failed to open template {}", args.template.display()))?;
    log::debug!(
        "Template {} has {} layouts",
        args.template.display(),
        document.catalog().len()
    );

    // Image paths in the outline are relative to the outline itself.
    let base_dir = args
        .input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let mut renderer = Renderer::new(config.layouts, Box::new(ImageDimensions))
        .with_styles(config.styles)
        .with_base_dir(base_dir);
    if args.date {
        renderer = renderer.with_date(Box::new(SpanishLongDate));
    }

    let summary = renderer
        .render(deck, &mut document)
        .context("Failed to render slides")?;

    let bytes = document.to_bytes().context("Failed to build presentation")?;
    fs::write(&args.output, bytes)
        .with_context(|| format!("Failed to write to {}", args.output.display()))?;

    Ok(summary)
}

fn report(summary: &RenderSummary, args: &Args) {
    for failure in &summary.image_failures {
        eprintln!(
            "Slide {}: skipped image {}: {}",
            failure.slide + 1,
            failure.path.display(),
            failure.reason
        );
    }

    if args.verbose || !summary.is_clean() {
        eprintln!(
            "Written {} slides ({} images) to {}",
            summary.slides,
            summary.images,
            args.output.display()
        );
    }
}
