//! xstakeoff - Cross-section takeoff from page dumps
//!
//! Reads a JSON dump of a plan sheet (words and vector drawings), detects the
//! stacked cross-sections by their station labels and reports the longest
//! reconstructed polylines in each section.

mod dump;

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use xstakeoff_core::takeoff::format_summary;
use xstakeoff_core::{PolylineSettings, Rect, Section, TakeoffSettings, extract_sections};

use dump::Dump;

/// Output type for the report.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputType {
    /// JSON report (default)
    #[default]
    Json,
    /// Plain-text summary
    Text,
}

/// Cross-section takeoff: frame and station detection with ranked polylines.
#[derive(Parser, Debug)]
#[command(name = "xstakeoff")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON page dump
    dump: PathBuf,

    /// 0-based page index
    #[arg(short = 'p', long)]
    page: usize,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    out: String,

    /// Type of output to generate
    #[arg(short = 't', long = "output-type", value_enum, default_value = "json")]
    output_type: OutputType,

    /// Endpoints closer than this are joined
    #[arg(long = "endpoint-tol", default_value = "2.0")]
    endpoint_tol: f64,

    /// Drop polylines shorter than this
    #[arg(long = "min-length", default_value = "120.0")]
    min_length: f64,

    /// Polylines kept per section (0 = all)
    #[arg(short = 'n', long = "top-n", default_value = "12")]
    top_n: usize,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

impl Args {
    fn settings(&self) -> Result<TakeoffSettings> {
        let settings = TakeoffSettings {
            polylines: PolylineSettings::new(self.endpoint_tol, self.min_length),
            max_polylines: (self.top_n > 0).then_some(self.top_n),
            ..Default::default()
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Serialize)]
struct Report {
    page: usize,
    width: f64,
    height: f64,
    frames: Vec<[f64; 4]>,
    sections: Vec<SectionReport>,
}

#[derive(Serialize)]
struct SectionReport {
    number: usize,
    title: String,
    station: Option<String>,
    frame: [f64; 4],
    polylines: Vec<PolylineReport>,
}

#[derive(Serialize)]
struct PolylineReport {
    label: String,
    length: f64,
    points: Vec<[f64; 2]>,
}

fn rect_array(r: &Rect) -> [f64; 4] {
    [r.x0, r.y0, r.x1, r.y1]
}

fn build_report(page: usize, width: f64, height: f64, sections: &[Section]) -> Report {
    let sections: Vec<SectionReport> = sections
        .iter()
        .map(|s| SectionReport {
            number: s.number,
            title: s.title(),
            station: s.station.clone(),
            frame: rect_array(&s.frame),
            polylines: s
                .polylines
                .iter()
                .enumerate()
                .map(|(rank, p)| PolylineReport {
                    label: s.polyline_label(rank).unwrap_or_default(),
                    length: p.length(),
                    points: p.points().iter().map(|&(x, y)| [x, y]).collect(),
                })
                .collect(),
        })
        .collect();
    Report {
        page,
        width,
        height,
        frames: sections.iter().map(|s| s.frame).collect(),
        sections,
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .init();
}

fn run(args: &Args) -> Result<()> {
    let settings = args.settings()?;
    let page = Dump::load(&args.dump)?.into_page(args.page)?;

    let sections = extract_sections(&page, page.width, page.height, &settings)?;
    let rounded: Vec<(i64, i64, i64, i64)> = sections
        .iter()
        .map(|s| {
            let f = s.frame;
            (
                f.x0.round() as i64,
                f.y0.round() as i64,
                f.x1.round() as i64,
                f.y1.round() as i64,
            )
        })
        .collect();
    info!("Detected {} frame(s): {:?}", sections.len(), rounded);

    let mut output: Box<dyn Write> = if args.out == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.out)
            .with_context(|| format!("failed to create output file {}", args.out))?;
        Box::new(BufWriter::new(file))
    };

    match args.output_type {
        OutputType::Json => {
            let report = build_report(args.page, page.width, page.height, &sections);
            serde_json::to_writer_pretty(&mut output, &report)?;
            writeln!(output)?;
        }
        OutputType::Text => write!(output, "{}", format_summary(&sections))?,
    }
    output.flush()?;

    if args.out != "-" {
        info!("Wrote {}", args.out);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(&args) {
        eprintln!("Error processing {}: {:#}", args.dump.display(), e);
        std::process::exit(1);
    }
}
