//! Parse command - extract card fields from recognized text.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use cin_core::CardParser;

use super::extract::{write_output, OutputFormat};
use super::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file produced by an OCR engine ("-" for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print extraction warnings
    #[arg(long)]
    warnings: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        if !args.input.exists() {
            anyhow::bail!("Input file not found: {}", args.input.display());
        }
        std::fs::read_to_string(&args.input)?
    };

    info!("Parsing {} characters of text", text.len());

    let result = CardParser::from_config(&config.extraction).parse(&text);

    if args.warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Extraction warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    write_output(&result.record, args.format, args.output.as_ref())
}
