//! Ethogram CLI - Command-line interface for pose-ethogram
//!
//! Commands:
//! - preprocess: Normalize a raw pose-estimation export into the pose table
//! - classify: Classify a pose table into a behaviour stream
//! - evaluate: Score a behaviour stream against ground truth
//! - overlay: Produce a per-video-frame caption plan from a behaviour stream
//! - schema: Print the tabular contracts

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pose_ethogram::accuracy::{self, Evaluation};
use pose_ethogram::adapters::{
    write_frames_csv, DeepLabCutAdapter, PoseTableAdapter, ProcessedCsvAdapter, POSE_COLUMNS,
};
use pose_ethogram::overlay::OverlayTimeline;
use pose_ethogram::report::ReportEncoder;
use pose_ethogram::{classify_all, stream, EthogramError, ETHOGRAM_VERSION};

/// Ethogram - rule-based behaviour classification from 2D pose estimation
#[derive(Parser)]
#[command(name = "ethogram")]
#[command(version = ETHOGRAM_VERSION)]
#[command(about = "Classify primate behaviour from pose-estimation tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a raw pose-estimation export into the 30-column pose table
    Preprocess {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Header prefix of the tracked columns in the export
        #[arg(long, default_value = "test")]
        scorer_prefix: String,
    },

    /// Classify a pose table into a behaviour stream
    Classify {
        /// Input pose table (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "csv")]
        output_format: OutputFormat,
    },

    /// Score a behaviour stream against a ground-truth table
    Evaluate {
        /// Predicted behaviour stream (CSV)
        #[arg(short, long)]
        predictions: PathBuf,

        /// Ground-truth table (CSV with Frames and True_Behaviour columns)
        #[arg(short, long)]
        truth: PathBuf,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Also write the JSON report to a file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Also write the mismatched frames to a CSV file
        #[arg(long)]
        mismatches: Option<PathBuf>,
    },

    /// Produce a per-video-frame caption plan from a behaviour stream
    Overlay {
        /// Behaviour stream (CSV)
        #[arg(short, long)]
        input: PathBuf,

        /// Output cue plan (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Video frame rate
        #[arg(long)]
        fps: f64,

        /// Number of video frames to plan
        #[arg(long)]
        frames: usize,

        /// Seconds into the video where the classified samples begin
        #[arg(long, default_value = "8.04")]
        start_time: f64,

        /// Seconds between consecutive classified samples
        #[arg(long, default_value = "2.68")]
        frame_interval: f64,
    },

    /// Print the tabular contracts
    Schema {
        /// Contract to print
        #[arg(value_enum)]
        schema_type: SchemaType,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// The canonical output table
    Csv,
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// Pretty-printed JSON array
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input pose table columns
    Input,
    /// Output behaviour stream columns
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), EthogramCliError> {
    match cli.command {
        Commands::Preprocess {
            input,
            output,
            scorer_prefix,
        } => cmd_preprocess(&input, &output, &scorer_prefix),

        Commands::Classify {
            input,
            output,
            output_format,
        } => cmd_classify(&input, &output, output_format),

        Commands::Evaluate {
            predictions,
            truth,
            json,
            report,
            mismatches,
        } => cmd_evaluate(
            &predictions,
            &truth,
            json,
            report.as_deref(),
            mismatches.as_deref(),
        ),

        Commands::Overlay {
            input,
            output,
            fps,
            frames,
            start_time,
            frame_interval,
        } => cmd_overlay(&input, &output, fps, frames, start_time, frame_interval),

        Commands::Schema { schema_type } => {
            cmd_schema(schema_type);
            Ok(())
        }
    }
}

fn cmd_preprocess(
    input: &Path,
    output: &Path,
    scorer_prefix: &str,
) -> Result<(), EthogramCliError> {
    let raw = read_input(input)?;
    let adapter = DeepLabCutAdapter::new(scorer_prefix);
    let frames = adapter.parse(&raw)?;

    if frames.is_empty() {
        return Err(EthogramCliError::NoFrames);
    }

    let mut buffer = Vec::new();
    write_frames_csv(&frames, &mut buffer)?;
    write_output(output, &buffer)?;

    eprintln!("Normalized {} frames", frames.len());
    Ok(())
}

fn cmd_classify(
    input: &Path,
    output: &Path,
    output_format: OutputFormat,
) -> Result<(), EthogramCliError> {
    let raw = read_input(input)?;
    let frames = ProcessedCsvAdapter.parse(&raw)?;
    let records = classify_all(&frames);

    let mut buffer = Vec::new();
    match output_format {
        OutputFormat::Csv => stream::write_csv(&records, &mut buffer)?,
        OutputFormat::Ndjson => stream::write_ndjson(&records, &mut buffer)?,
        OutputFormat::JsonPretty => {
            buffer = stream::to_json_pretty(&records)?.into_bytes();
        }
    }
    write_output(output, &buffer)?;

    eprintln!("Classified {} frames", records.len());
    Ok(())
}

fn cmd_evaluate(
    predictions_path: &Path,
    truth_path: &Path,
    json: bool,
    report_path: Option<&Path>,
    mismatches_path: Option<&Path>,
) -> Result<(), EthogramCliError> {
    let predictions = stream::read_csv(fs::File::open(predictions_path)?)?;
    let truth = accuracy::read_ground_truth_csv(fs::File::open(truth_path)?)?;

    let evaluation = accuracy::evaluate(&predictions, &truth)?;
    let encoder = ReportEncoder::new();

    if json {
        println!("{}", encoder.encode_to_json(&evaluation)?);
    } else {
        print_evaluation(&evaluation);
    }

    if let Some(path) = report_path {
        fs::write(path, encoder.encode_to_json(&evaluation)?)?;
    }

    if let Some(path) = mismatches_path {
        let mut writer = csv::Writer::from_path(path).map_err(EthogramError::from)?;
        for mismatch in &evaluation.mismatches {
            writer.serialize(mismatch).map_err(EthogramError::from)?;
        }
        writer
            .flush()
            .map_err(|e| EthogramError::from(csv::Error::from(e)))?;
    }

    Ok(())
}

fn print_evaluation(evaluation: &Evaluation) {
    println!("=== Behaviour Classification Analysis ===");
    println!();
    println!(
        "Overall accuracy: {:.2}% over {} frames",
        evaluation.accuracy * 100.0,
        evaluation.total_frames
    );
    if evaluation.outside_label_space > 0 {
        println!(
            "Frames outside the behaviour label space: {}",
            evaluation.outside_label_space
        );
    }

    println!();
    println!(
        "{:<10} {:>10} {:>10} {:>10} {:>10}",
        "class", "precision", "recall", "f1", "support"
    );
    for (behavior, metrics) in &evaluation.per_class {
        println!(
            "{:<10} {:>10.3} {:>10.3} {:>10.3} {:>10}",
            behavior.as_str(),
            metrics.precision,
            metrics.recall,
            metrics.f1,
            metrics.support
        );
    }

    println!();
    println!("Confusion matrix:");
    print!("{}", evaluation.confusion.render());

    println!();
    if evaluation.mismatches.is_empty() {
        println!("No mismatched frames found");
    } else {
        println!("Found {} mismatched frames:", evaluation.mismatches.len());
        for mismatch in &evaluation.mismatches {
            println!(
                "  Frame {}: predicted '{}' but was actually '{}'",
                mismatch.frame, mismatch.predicted, mismatch.actual
            );
        }
    }
}

fn cmd_overlay(
    input: &Path,
    output: &Path,
    fps: f64,
    frames: usize,
    start_time: f64,
    frame_interval: f64,
) -> Result<(), EthogramCliError> {
    let records = stream::read_csv(fs::File::open(input)?)?;
    let timeline = OverlayTimeline::new(start_time, frame_interval)?;
    let cues = timeline.plan(&records, fps, frames)?;

    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        for cue in &cues {
            writer.serialize(cue).map_err(EthogramError::from)?;
        }
        writer
            .flush()
            .map_err(|e| EthogramError::from(csv::Error::from(e)))?;
    }
    write_output(output, &buffer)?;

    eprintln!("Planned {} overlay cues", cues.len());
    Ok(())
}

fn cmd_schema(schema_type: SchemaType) {
    match schema_type {
        SchemaType::Input => {
            println!("Input pose table: one row per video frame, in frame order.");
            println!("Columns (all numeric, empty or non-numeric cells become NaN):");
            for column in POSE_COLUMNS {
                println!("  {}", column);
            }
        }
        SchemaType::Output => {
            println!("Output behaviour stream: one row per input frame, in frame order.");
            println!();
            println!("  Frame                1-based frame number");
            println!("  Sitting              confidence in [0,100]");
            println!("  Walking              confidence in [0,100]");
            println!("  Climbing             confidence in [0,100]");
            println!("  Classified Behavior  sitting | walking | climbing | unknown");
            println!("  Confidence           confidence of the winning category,");
            println!("                       kept even when the label is unknown");
            println!();
            println!("The three confidences sum to 100, or are all zero when no rule fired.");
        }
    }
}

// Helper functions

fn read_input(input: &Path) -> Result<String, EthogramCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &Path, data: &[u8]) -> Result<(), EthogramCliError> {
    if output.to_string_lossy() == "-" {
        print!("{}", String::from_utf8_lossy(data));
        Ok(())
    } else {
        fs::write(output, data)?;
        Ok(())
    }
}

// Error types

#[derive(Debug)]
enum EthogramCliError {
    Io(io::Error),
    Lib(EthogramError),
    Json(serde_json::Error),
    NoFrames,
}

impl From<io::Error> for EthogramCliError {
    fn from(e: io::Error) -> Self {
        EthogramCliError::Io(e)
    }
}

impl From<EthogramError> for EthogramCliError {
    fn from(e: EthogramError) -> Self {
        EthogramCliError::Lib(e)
    }
}

impl From<serde_json::Error> for EthogramCliError {
    fn from(e: serde_json::Error) -> Self {
        EthogramCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<EthogramCliError> for CliError {
    fn from(e: EthogramCliError) -> Self {
        match e {
            EthogramCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            EthogramCliError::Lib(e) => {
                let hint = match &e {
                    EthogramError::SchemaError(_) | EthogramError::MissingColumn(_) => {
                        Some("Run 'ethogram schema input' for the expected columns".to_string())
                    }
                    EthogramError::InvalidTiming(_) | EthogramError::InvalidFrameRate(_) => {
                        Some("Check --fps, --start-time and --frame-interval".to_string())
                    }
                    _ => None,
                };
                CliError {
                    code: "ETHOGRAM_ERROR".to_string(),
                    message: e.to_string(),
                    hint,
                }
            }
            EthogramCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            EthogramCliError::NoFrames => CliError {
                code: "NO_FRAMES".to_string(),
                message: "No frames found in input".to_string(),
                hint: Some("Ensure the export contains data rows".to_string()),
            },
        }
    }
}
