//! Command-line front-end for pdf2docx: converts a PDF into a `.docx` by
//! driving the library's layout-reconstruction pipeline and packager.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use pdf2docx::{convert_async, CancellationToken, ConversionOptions, Error};

/// Reconstructs layout from a PDF and packages it as an OOXML `.docx` file.
#[derive(Parser)]
#[command(name = "pdf2docx", about = "Converts a PDF into a wordprocessing .docx", version)]
struct Cli {
    /// Path to the input PDF.
    input: PathBuf,

    /// Path for the generated .docx. Defaults to the input's basename with
    /// a `.docx` extension.
    output: Option<PathBuf>,

    /// Skip embedding inline images.
    #[arg(long)]
    no_images: bool,

    /// Skip table detection; table regions are laid out as ordinary text.
    #[arg(long)]
    no_tables: bool,

    /// Skip hyperlink annotation.
    #[arg(long)]
    no_hyperlinks: bool,

    /// First page to convert, 1-based.
    #[arg(long, value_name = "N", default_value_t = 1)]
    start_page: usize,

    /// Last page to convert, 1-based. Defaults to the last page.
    #[arg(long, value_name = "N")]
    end_page: Option<usize>,

    /// Maximum number of pages to convert, counted from `--start-page`.
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Vertical tolerance (points) for grouping glyph runs into a line.
    #[arg(long, value_name = "P", default_value_t = 3.0)]
    line_tolerance: f64,

    /// Multiplier on the average line height that opens a new paragraph.
    #[arg(long, value_name = "M", default_value_t = 1.3)]
    para_gap: f64,

    /// Minimum width (points) of a vertical whitespace band that splits columns.
    #[arg(long, value_name = "P", default_value_t = 20.0)]
    column_gap: f64,

    /// Multiplier on dominant font size used for line height.
    #[arg(long, value_name = "M", default_value_t = 1.15)]
    line_spacing: f64,

    /// Spacing after a paragraph, in points.
    #[arg(long, value_name = "P", default_value_t = 6.0)]
    para_spacing_after: f64,

    /// Emit per-page diagnostic logging.
    #[arg(long)]
    diagnostics: bool,

    /// Fall back to OCR for pages with no extractable text operators.
    #[arg(long)]
    ocr: bool,
}

/// Checks constraints `clap` can't express declaratively.
fn validate_args(cli: &Cli) -> anyhow::Result<()> {
    if cli.start_page == 0 {
        anyhow::bail!("--start-page is 1-based and must be >= 1");
    }
    if let Some(end) = cli.end_page {
        if end < cli.start_page {
            anyhow::bail!("--end-page ({end}) must be >= --start-page ({})", cli.start_page);
        }
    }
    Ok(())
}

fn run(cli: Cli) -> pdf2docx::Result<PathBuf> {
    let output = cli.output.unwrap_or_else(|| cli.input.with_extension("docx"));

    let options = ConversionOptions {
        include_images: !cli.no_images,
        include_tables: !cli.no_tables,
        include_hyperlinks: !cli.no_hyperlinks,
        start_page: Some(cli.start_page),
        end_page: cli.end_page,
        max_pages: cli.max_pages,
        line_tolerance: cli.line_tolerance,
        paragraph_gap_multiplier: cli.para_gap,
        column_gap: cli.column_gap,
        line_spacing_multiplier: cli.line_spacing,
        paragraph_spacing_after: cli.para_spacing_after,
        diagnostics: cli.diagnostics,
        use_ocr: cli.ocr,
        ..ConversionOptions::default()
    };

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(convert_async(
        cli.input,
        output.clone(),
        options,
        CancellationToken::new(),
        |percent| tracing::info!(percent, "conversion progress"),
    ))?;

    Ok(output)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("pdf2docx=info".parse().unwrap()))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap exits usage errors with code 2 by default; the documented
            // contract reserves 2 for conversion failures, so print and exit
            // ourselves instead of letting `Error::exit()` pick the code.
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(e) = validate_args(&cli) {
        eprintln!("error: {e}");
        return ExitCode::from(1);
    }

    let diagnostics = cli.diagnostics;
    let started = Instant::now();

    match run(cli) {
        Ok(output) => {
            if diagnostics {
                let summary = serde_json::json!({
                    "output": output.display().to_string(),
                    "elapsed_ms": started.elapsed().as_millis(),
                });
                println!("{summary}");
            } else {
                println!("wrote {}", output.display());
            }
            ExitCode::from(0)
        }
        Err(Error::InputMissing(path)) => {
            eprintln!("error: input file not found: {}", path.display());
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("error: conversion failed: {e}");
            ExitCode::from(2)
        }
    }
}
