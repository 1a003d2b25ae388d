//! Spotify ML CLI Module
//!
//! Command-line front-end: each invocation is one pipeline run over a CSV file.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::{PipelineConfig, DEFAULT_DATA_PATH};
use crate::export::ExportFilter;
use crate::pipeline::{Pipeline, PipelineInput};
use crate::preprocessing::DatasetLoader;
use crate::report::Report;

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn warn_missing(path: &Path) {
    println!();
    println!("  {} {}", "!".yellow().bold(), "Please upload a file".yellow());
    println!("  {}", dim(&format!("{} not found", path.display())));
    println!();
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "spotify-ml")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Predict whether a song appears in the Spotify charts")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train and evaluate the random forest
    Train {
        /// Input CSV file (ISO-8859-1); defaults to the configured data path
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the report (metrics and chart specs) as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the prepared feature matrix
    Info {
        /// Input CSV file (ISO-8859-1)
        #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        /// Rows to preview
        #[arg(long, default_value = "15")]
        rows: usize,
    },

    /// Export rows within a stream-count range as CSV
    Export {
        /// Input CSV file (ISO-8859-1)
        #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Keep rows with more streams than this
        #[arg(long, default_value = "1000000")]
        min_streams: f64,

        /// Keep rows with at most this many streams
        #[arg(long, default_value = "1000000000")]
        max_streams: f64,

        /// Columns to leave out (repeatable)
        #[arg(long = "hide", default_values_t = vec!["streams".to_string()])]
        hide: Vec<String>,
    },

    /// Print or save the default configuration
    Config {
        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Dispatch a parsed command line; no subcommand trains with defaults
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Train { data, config, output }) => {
            cmd_train(data.as_deref(), config.as_deref(), output.as_deref())
        }
        Some(Commands::Info { data, rows }) => cmd_info(&data, rows),
        Some(Commands::Export { data, output, min_streams, max_streams, hide }) => {
            let filter = ExportFilter::default()
                .with_range(min_streams, max_streams)
                .with_hidden_columns(hide);
            cmd_export(&data, &output, &filter)
        }
        Some(Commands::Config { output }) => cmd_config(output.as_deref()),
        None => cmd_train(None, None, None),
    }
}

/// File contents, or `None` after warning when the file does not exist
fn read_upload(path: &Path) -> anyhow::Result<Option<Vec<u8>>> {
    if !path.exists() {
        warn_missing(path);
        return Ok(None);
    }
    Ok(Some(std::fs::read(path)?))
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(
    data_path: Option<&Path>,
    config_path: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    section("Train");

    let config = match config_path {
        Some(path) => {
            let config = PipelineConfig::load(path)?;
            step_ok(&format!("Configuration {}", path.display()));
            config
        }
        None => PipelineConfig::default(),
    };
    let config = match data_path {
        Some(path) => config.with_data_path(path),
        None => config,
    };

    let Some(bytes) = read_upload(&config.data_path)? else {
        return Ok(());
    };

    step_run("Loading data");
    let start = Instant::now();
    let pipeline = Pipeline::new(config);
    let output_data = pipeline.run(PipelineInput::new(Some(&bytes), true))?;
    step_done(&format!(
        "{} rows × {} features in {:?}",
        output_data.data.features.n_rows(),
        output_data.data.features.n_features(),
        start.elapsed()
    ));

    let Some(training) = output_data.training else {
        anyhow::bail!("training was requested but produced no model");
    };
    print_report(&training.report, training.evaluation.auc);

    if let Some(path) = output {
        step_run(&format!("Saving → {}", path.display()));
        std::fs::write(path, training.report.to_json_string()?)?;
        step_done("report.json");
    }

    println!();
    Ok(())
}

fn print_report(report: &Report, auc: f64) {
    println!();
    line_box_top();
    line_box_center(&format!("{}", "Random Forest".white().bold()));
    line_box_center(&format!("{}", dim(&report.runtime)));
    line_box_sep();
    for tile in &report.tiles {
        let value = match &tile.delta {
            Some(delta) => format!("{}  {}", tile.value, muted(&format!("Δ {}", delta))),
            None => tile.value.clone(),
        };
        line_box(&kv(&format!("{:<16}", tile.label), &value));
    }
    line_box(&kv(&format!("{:<16}", "AUC"), &format!("{:.4}", auc)));
    line_box_sep();

    let cells = &report.confusion.cells;
    line_box(&format!("{}", muted(&report.confusion.title)));
    for cell in cells {
        let marker = if cell.correct { ok("●") } else { "●".red() };
        line_box(&format!(
            "{} actual {:<9} predicted {:<9} {}",
            marker,
            cell.actual,
            cell.predicted,
            cell.count.to_string().white().bold()
        ));
    }
    line_box_bottom();
}

pub fn cmd_info(data_path: &Path, rows: usize) -> anyhow::Result<()> {
    section("Data Info");

    let Some(bytes) = read_upload(data_path)? else {
        return Ok(());
    };

    let loader = DatasetLoader::new();
    let raw = loader.read_frame(&bytes)?;
    let data = loader.prepare(&raw)?;

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), raw.height());
    println!("  {:<12} {}", muted("Columns"), raw.width());
    println!("  {:<12} {}", muted("Features"), data.features.n_features());
    println!("  {:<12} {} / {}", muted("In charts"), data.n_positive(), data.labels.len());
    println!();

    println!("  {}", muted("Data preview"));
    println!("{}", data.features.preview(rows)?);
    println!();
    Ok(())
}

pub fn cmd_export(data_path: &Path, output: &Path, filter: &ExportFilter) -> anyhow::Result<()> {
    section("Export");

    let Some(bytes) = read_upload(data_path)? else {
        return Ok(());
    };

    step_run("Filtering");
    let raw = DatasetLoader::new().read_frame(&bytes)?;
    let csv = filter.to_csv(&raw)?;
    step_done(&format!(
        "streams in ({}, {}], hiding {:?}",
        filter.min_streams, filter.max_streams, filter.hidden_columns
    ));

    std::fs::write(output, csv)?;
    step_ok(&format!("Saved → {}", output.display()));
    println!();
    Ok(())
}

pub fn cmd_config(output: Option<&Path>) -> anyhow::Result<()> {
    let config = PipelineConfig::default();
    match output {
        Some(path) => {
            config.save(path)?;
            step_ok(&format!("Default configuration → {}", path.display()));
        }
        None => println!("{}", config.to_json()?),
    }
    Ok(())
}
