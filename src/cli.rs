use crate::config::{Config, load_config};
use crate::ir::parse_grid_document;
use crate::layout::compose_scene;
use crate::render::{LabeledIcon, StraightEdges, render_svg_with, write_output_svg};
use crate::scene_dump::write_scene_dump;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mgraph", version, about = "Render grid-placed dependency graphs to SVG or PNG")]
pub struct Args {
    /// Grid document (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format. Inferred from the output extension when omitted.
    #[arg(short = 'e', long = "outputFormat", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Config JSON file (theme, themeVariables, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Cell size in pixels, overrides document and config
    #[arg(long = "cell-size")]
    pub cell_size: Option<f64>,

    /// Cell padding in pixels, overrides document and config
    #[arg(long = "padding")]
    pub padding: Option<f64>,

    /// Write the composed scene geometry as JSON
    #[arg(long = "dump-scene")]
    pub dump_scene: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let document = parse_grid_document(&input)?;
    let (cell_size, padding) = resolve_cell_metrics(&args, &config, document.cell_size, document.padding);
    let (width_in_cells, height_in_cells) = (document.width_in_cells, document.height_in_cells);
    let grid = document.into_grid()?;

    let scene = compose_scene(&grid, cell_size, padding, width_in_cells, height_in_cells)?;
    tracing::info!(
        nodes = grid.len(),
        edges = scene.edges().count(),
        width = scene.width,
        height = scene.height,
        "composed grid scene"
    );

    if let Some(path) = args.dump_scene.as_deref() {
        write_scene_dump(path, &scene)
            .with_context(|| format!("failed to write scene dump to {}", path.display()))?;
    }

    let svg = render_svg_with(&scene, &config.theme, &config.render, &LabeledIcon, &StraightEdges);
    match resolve_format(args.output_format, args.output.as_deref()) {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &config)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Command line beats the document, which beats the config file.
fn resolve_cell_metrics(
    args: &Args,
    config: &Config,
    document_cell_size: Option<f64>,
    document_padding: Option<f64>,
) -> (f64, f64) {
    let cell_size = args
        .cell_size
        .or(document_cell_size)
        .unwrap_or(config.layout.cell_size);
    let padding = args
        .padding
        .or(document_padding)
        .unwrap_or(config.layout.padding);
    (cell_size, padding)
}

fn resolve_format(requested: Option<OutputFormat>, output: Option<&Path>) -> OutputFormat {
    if let Some(format) = requested {
        return format;
    }
    let is_png = output
        .and_then(|path| path.extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);
    if is_png { OutputFormat::Png } else { OutputFormat::Svg }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the 'png' feature"
    ))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
