//! Extract command - run OCR and field extraction on a card image.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use cin_core::{CardPipeline, CardRecord};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input image (PNG, JPEG, ...)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// ONNX model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(model_dir) = &args.model_dir {
        config.ocr.onnx.model_dir = model_dir.clone();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let image = image::open(&args.input)?;

    // Backends block (subprocess, blocking HTTP)
    let record = tokio::task::spawn_blocking(move || {
        let pipeline = CardPipeline::from_config(&config);
        match pipeline.select_backend() {
            Some(backend) => debug!("Selected backend: {}", backend.name()),
            None => eprintln!(
                "{} No OCR backend available, returning a default record",
                style("!").yellow()
            ),
        }
        pipeline.process(&image)
    })
    .await?;

    write_output(&record, args.format, args.output.as_ref())?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Format a record and write it to a file or stdout.
pub fn write_output(
    record: &CardRecord,
    format: OutputFormat,
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let formatted = format_record(record, format)?;

    if let Some(output_path) = output {
        fs::write(output_path, &formatted)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", formatted);
    }

    Ok(())
}

pub fn format_record(record: &CardRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &CardRecord) -> anyhow::Result<String> {
    let value = serde_json::to_value(record)?;
    let fields = value
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("record did not serialize to an object"))?;

    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(fields.keys())?;
    wtr.write_record(fields.values().map(|v| v.as_str().unwrap_or_default()))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &CardRecord) -> String {
    let fields = record.populated_fields();
    if fields.is_empty() {
        return "No fields extracted".to_string();
    }

    let width = fields.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    fields
        .iter()
        .map(|(name, value)| format!("{:width$}  {}", name, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cin_core::CardSide;

    fn record() -> CardRecord {
        CardRecord {
            side: Some(CardSide::Front),
            cin_number: Some("AB123456".to_string()),
            date_of_birth: Some("12/05/1990".to_string()),
            ..CardRecord::default()
        }
    }

    #[test]
    fn test_format_text() {
        let text = format_record(&record(), OutputFormat::Text).unwrap();
        assert_eq!(
            text,
            "side           FRONT\ncin_number     AB123456\ndate_of_birth  12/05/1990"
        );
    }

    #[test]
    fn test_format_csv_has_all_columns() {
        let csv = format_record(&record(), OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert_eq!(header.split(',').count(), 15);
        assert!(header.contains("cin_number"));

        let row = lines.next().unwrap();
        assert!(row.contains("AB123456"));
        assert!(row.contains("FRONT"));
    }

    #[test]
    fn test_format_json() {
        let json = format_record(&record(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["cin_number"], "AB123456");
        assert!(value["address_fr"].is_null());
    }
}
