//! # Validate Subcommand
//!
//! Reads one JSON object per line, runs each through the validation
//! pipeline, and writes the records that survive, annotations included.
//! Blank lines are skipped. Rejected records are left out of the output;
//! any other failure stops the run.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use itemval_core::{Item, JsonSerializable};
use itemval_pipeline::{ItemValidationPipeline, MemoryStats, PipelineError};
use itemval_schema::ValidatorLoader;

use crate::{load_catalog, load_settings, settings_base_dir};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Settings file (YAML, or JSON if it ends in `.json`).
    #[arg(long)]
    pub settings: PathBuf,

    /// Catalogue file mapping dotted references to schemas.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// JSON-lines input; `-` reads standard input.
    #[arg(long, default_value = "-")]
    pub items: PathBuf,

    /// Where to write surviving records. Defaults to standard output.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Where to write the statistics report.
    #[arg(long)]
    pub stats: Option<PathBuf>,

    /// Field holding each record's type name.
    #[arg(long, default_value = "_type")]
    pub type_field: String,
}

/// Counts from one validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub read: usize,
    pub written: usize,
    pub rejected: usize,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let settings = load_settings(&args.settings)?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    let loader = ValidatorLoader::new(&catalog).with_base_dir(settings_base_dir(&args.settings));
    let stats = Arc::new(MemoryStats::new());
    let pipeline = ItemValidationPipeline::from_settings(&settings, &loader, stats.clone())
        .with_context(|| format!("invalid settings in {}", args.settings.display()))?;

    let reader: Box<dyn BufRead> = if args.items.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin().lock()))
    } else {
        let file = File::open(&args.items)
            .with_context(|| format!("failed to open {}", args.items.display()))?;
        Box::new(BufReader::new(file))
    };
    let writer: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let summary = validate_stream(&pipeline, reader, writer, &args.type_field)?;
    tracing::info!(
        read = summary.read,
        written = summary.written,
        rejected = summary.rejected,
        "validation finished"
    );

    let report = stats.snapshot().json()?;
    match &args.stats {
        Some(path) => std::fs::write(path, report)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => eprintln!("{report}"),
    }
    Ok(0)
}

/// Validate every record of `reader` and write survivors to `writer`.
pub fn validate_stream<R: BufRead, W: Write>(
    pipeline: &ItemValidationPipeline,
    reader: R,
    mut writer: W,
    type_field: &str,
) -> Result<StreamSummary> {
    let mut summary = StreamSummary::default();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }
        summary.read += 1;

        let value: Value = serde_json::from_str(&line)
            .with_context(|| format!("line {line_no}: invalid JSON"))?;
        let item = Item::from_json(value, type_field)
            .with_context(|| format!("line {line_no}: invalid record"))?;

        match pipeline.process(item) {
            Ok(item) => {
                serde_json::to_writer(&mut writer, &item)?;
                writer.write_all(b"\n")?;
                summary.written += 1;
            }
            Err(PipelineError::ItemRejected { .. }) => summary.rejected += 1,
            Err(e) => return Err(e).with_context(|| format!("line {line_no}")),
        }
    }
    writer.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemval_pipeline::{PipelineConfig, ValidationSettings};
    use itemval_schema::ObjectCatalog;
    use serde_json::json;

    fn pipeline(config: PipelineConfig) -> ItemValidationPipeline {
        pipeline_for(json!({"type": "object", "required": ["title"]}), config).0
    }

    fn pipeline_for(
        product_schema: Value,
        config: PipelineConfig,
    ) -> (ItemValidationPipeline, Arc<MemoryStats>) {
        let settings = ValidationSettings {
            schemas: Some(json!({ "Product": product_schema })),
            models: None,
            drop_items_with_errors: Some(config.drop_items_with_errors),
            add_errors_to_items: Some(config.add_errors_to_items),
            errors_field: Some(config.errors_field),
        };
        let catalog = ObjectCatalog::new();
        let loader = ValidatorLoader::new(&catalog);
        let stats = Arc::new(MemoryStats::new());
        let pipeline =
            ItemValidationPipeline::from_settings(&settings, &loader, stats.clone()).unwrap();
        (pipeline, stats)
    }

    const INPUT: &str = r#"{"_type": "Product", "title": "lamp"}

{"_type": "Product"}
{"_type": "Review", "stars": 5}
"#;

    #[test]
    fn stream_drops_rejected_records() {
        let pipeline = pipeline(PipelineConfig {
            drop_items_with_errors: true,
            ..PipelineConfig::default()
        });
        let mut out = Vec::new();
        let summary = validate_stream(&pipeline, INPUT.as_bytes(), &mut out, "_type").unwrap();

        assert_eq!(
            summary,
            StreamSummary {
                read: 3,
                written: 2,
                rejected: 1
            }
        );
        let lines: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["title"], "lamp");
        assert_eq!(lines[1]["_type"], "Review");
    }

    #[test]
    fn stream_writes_annotations() {
        let pipeline = pipeline(PipelineConfig {
            add_errors_to_items: true,
            ..PipelineConfig::default()
        });
        let mut out = Vec::new();
        validate_stream(&pipeline, INPUT.as_bytes(), &mut out, "_type").unwrap();

        let text = String::from_utf8(out).unwrap();
        let second: Value = serde_json::from_str(text.lines().nth(1).unwrap()).unwrap();
        assert_eq!(
            second,
            json!({"_type": "Product", "_validation": {"title": ["Missing required field"]}})
        );
    }

    #[test]
    fn type_field_is_not_validated_as_data() {
        let (pipeline, stats) = pipeline_for(
            json!({
                "type": "object",
                "properties": {"title": {"type": "string"}},
                "additionalProperties": false
            }),
            PipelineConfig {
                add_errors_to_items: true,
                ..PipelineConfig::default()
            },
        );
        let mut out = Vec::new();
        let input = r#"{"_type": "Product", "title": "lamp"}"#;
        validate_stream(&pipeline, input.as_bytes(), &mut out, "_type").unwrap();

        let written: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(written, json!({"_type": "Product", "title": "lamp"}));
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.get("spidermon/validation/fields"), 1);
        assert_eq!(snapshot.get("spidermon/validation/fields/errors"), 0);
    }

    #[test]
    fn invalid_json_reports_the_line() {
        let pipeline = pipeline(PipelineConfig::default());
        let err = validate_stream(&pipeline, "{}\nnot json\n".as_bytes(), Vec::new(), "_type")
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
