//! markgrid CLI — command-line interface for answer-sheet scanning.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use markgrid::{
    score_answers, AnswerKey, ExamRef, ExportPayload, ScanConfig, ScanResult, Scanner,
    SheetLayout, StudentRef,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "markgrid")]
#[command(about = "Scan photographed answer sheets and grade the detected bubbles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a sheet image and write the detected answers (JSON).
    Scan(CliScanArgs),

    /// Grade a previously written scan result against an answer key.
    Score(CliScoreArgs),

    /// Build the export payload for downstream persistence.
    Export(CliExportArgs),

    /// Print the embedded default sheet layout.
    LayoutInfo,
}

#[derive(Debug, Clone, Args)]
struct CliScanArgs {
    /// Path to the input image (JPEG or PNG).
    #[arg(long)]
    image: PathBuf,

    /// Path to write the scan result (JSON). Prints a summary either way.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Sheet layout JSON (defaults to the embedded 5-option layout).
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Answer key JSON ({"1":"A",...}); when present the summary includes a
    /// score.
    #[arg(long)]
    key: Option<PathBuf>,

    /// Maximum decoded width in pixels; wider inputs are downscaled.
    #[arg(long, default_value = "800")]
    max_width: u32,

    /// Luma ceiling for the darkest option to count as filled.
    #[arg(long, default_value = "180.0")]
    darkness_threshold: f64,

    /// Minimum luma separation between the two darkest options.
    #[arg(long, default_value = "15.0")]
    min_gap: f64,

    /// Sampling radius as a fraction of the quad's top-edge length.
    #[arg(long, default_value = "0.02")]
    sample_radius_frac: f64,

    /// Fallback rectangle inset (pixels) when corner detection fails.
    #[arg(long, default_value = "40.0")]
    fallback_margin: f64,
}

#[derive(Debug, Clone, Args)]
struct CliScoreArgs {
    /// Scan result JSON written by `markgrid scan --out`.
    #[arg(long)]
    result: PathBuf,

    /// Answer key JSON.
    #[arg(long)]
    key: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct CliExportArgs {
    /// Scan result JSON written by `markgrid scan --out`.
    #[arg(long)]
    result: PathBuf,

    /// Answer key JSON; omit for manual grading.
    #[arg(long)]
    key: Option<PathBuf>,

    /// Student identifier.
    #[arg(long)]
    student_id: String,

    /// Student display name.
    #[arg(long)]
    student_name: String,

    /// Student email.
    #[arg(long)]
    student_email: Option<String>,

    /// Exam identifier.
    #[arg(long)]
    exam_id: String,

    /// Exam title.
    #[arg(long)]
    exam_title: String,

    /// Manual score override (0-100).
    #[arg(long)]
    manual_score: Option<u32>,

    /// Path to write the export payload (JSON); stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => run_scan(&args),
        Commands::Score(args) => run_score(&args),
        Commands::Export(args) => run_export(&args),
        Commands::LayoutInfo => run_layout_info(),
    }
}

// ── scan ───────────────────────────────────────────────────────────────

fn run_scan(args: &CliScanArgs) -> CliResult<()> {
    let layout = match &args.layout {
        Some(path) => SheetLayout::from_json_file(path)?,
        None => SheetLayout::default(),
    };

    let mut config = ScanConfig {
        max_decode_width: args.max_width,
        ..Default::default()
    };
    config.resolve.darkness_threshold = args.darkness_threshold;
    config.resolve.min_gap = args.min_gap;
    config.resolve.sample_radius_frac = args.sample_radius_frac;
    config.fallback_margin_px = args.fallback_margin;

    let scanner = Scanner::with_config(layout, config);
    let bytes = std::fs::read(&args.image)?;
    let result = scanner.scan_bytes(&bytes)?;

    println!(
        "Answered {} of {} questions ({}x{} buffer).",
        result.n_answered(),
        result.answers.len(),
        result.image_size[0],
        result.image_size[1]
    );
    for answer in &result.answers {
        println!(
            "  {:>3}. {}",
            answer.question_number,
            answer.selected.as_deref().unwrap_or("-")
        );
    }

    if let Some(key_path) = &args.key {
        let key = AnswerKey::from_json_file(key_path)?;
        print_score(&result, &key);
    }

    if let Some(out) = &args.out {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out, json)?;
        println!("Wrote {}", out.display());
    }
    Ok(())
}

// ── score ──────────────────────────────────────────────────────────────

fn run_score(args: &CliScoreArgs) -> CliResult<()> {
    let result = read_result(&args.result)?;
    let key = AnswerKey::from_json_file(&args.key)?;
    print_score(&result, &key);
    Ok(())
}

fn print_score(result: &ScanResult, key: &AnswerKey) {
    match score_answers(&result.answers, key) {
        Some(summary) => {
            println!(
                "Score: {} correct, {} wrong, {} empty ({} graded)",
                summary.correct,
                summary.wrong,
                summary.empty,
                summary.total()
            );
            if let Some(percent) = summary.percent() {
                println!("Detected score: {percent}/100");
            }
        }
        None => println!("Empty answer key; manual grading required."),
    }
}

// ── export ─────────────────────────────────────────────────────────────

fn run_export(args: &CliExportArgs) -> CliResult<()> {
    let result = read_result(&args.result)?;

    let detected_score = match &args.key {
        Some(path) => {
            let key = AnswerKey::from_json_file(path)?;
            score_answers(&result.answers, &key).and_then(|s| s.percent())
        }
        None => None,
    };

    let payload = ExportPayload::new(
        chrono::Utc::now().to_rfc3339(),
        StudentRef {
            id: args.student_id.clone(),
            name: args.student_name.clone(),
            email: args.student_email.clone(),
        },
        ExamRef {
            id: args.exam_id.clone(),
            title: args.exam_title.clone(),
        },
        detected_score,
        result.answer_map(),
        args.manual_score,
    );

    let json = serde_json::to_string_pretty(&payload)?;
    match &args.out {
        Some(out) => {
            std::fs::write(out, json)?;
            println!("Wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

// ── layout-info ────────────────────────────────────────────────────────

fn run_layout_info() -> CliResult<()> {
    let layout = SheetLayout::default();
    println!("markgrid embedded sheet layout");
    println!("  name:            {}", layout.name);
    println!("  options:         {}", layout.options.join(", "));
    println!("  questions:       {}", layout.question_count);
    println!(
        "  option columns:  {}",
        layout
            .column_u
            .iter()
            .map(|u| format!("{u:.2}"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  row band:        {:.2} .. {:.2}",
        layout.row_v_start, layout.row_v_end
    );
    Ok(())
}

fn read_result(path: &PathBuf) -> CliResult<ScanResult> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
