//! Command-line front end: run a batch and print the seen percentage,
//! notices and text histograms of the two distance distributions.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};
use forest_sight::stats::Histogram;
use forest_sight::{simulate, GridSpec, SimConfig, SimReport};

#[derive(Debug, Parser)]
#[command(name = "forest-sight", about = "Can two people in a random forest see each other?")]
struct Args {
    /// Read the run configuration from a JSON file instead of flags.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fraction of the area covered by trees.
    #[arg(long, default_value_t = 0.3)]
    density: f64,

    /// Tree radius.
    #[arg(long, default_value_t = 5.0)]
    radius: f64,

    /// Number of trials.
    #[arg(short = 'n', long, default_value_t = 1000)]
    trials: u32,

    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 600.0)]
    height: f64,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = 2.0)]
    observer_radius: f64,

    /// Rejection sampling budget per placement.
    #[arg(long, default_value_t = 1000)]
    max_attempts: u32,

    /// Spatial index as COLUMNSxROWS, e.g. 80x60.
    #[arg(long, value_parser = parse_grid)]
    grid: Option<GridSpec>,

    /// Run trials one after another on this thread.
    #[arg(long)]
    serial: bool,

    /// Histogram bin count.
    #[arg(long, default_value_t = 20)]
    bins: usize,

    /// Print the JSON report instead of text.
    #[arg(long)]
    json: bool,

    /// Log progress to stderr; repeat for per-trial detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Writes library log records to stderr, one line each.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn parse_grid(s: &str) -> Result<GridSpec, String> {
    let (c, r) = s
        .split_once(|ch: char| ch == 'x' || ch == 'X')
        .ok_or_else(|| format!("expected COLUMNSxROWS, got '{s}'"))?;
    let columns = c.trim().parse::<u32>().map_err(|e| e.to_string())?;
    let rows = r.trim().parse::<u32>().map_err(|e| e.to_string())?;
    Ok(GridSpec { columns, rows })
}

impl Args {
    fn to_config(&self) -> Result<SimConfig, String> {
        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("reading {}: {e}", path.display()))?;
            return serde_json::from_str(&text)
                .map_err(|e| format!("parsing {}: {e}", path.display()));
        }
        let mut config = SimConfig::new(self.density, self.radius, self.trials);
        config.width = self.width;
        config.height = self.height;
        config.seed = self.seed;
        config.observer_radius = self.observer_radius;
        config.max_attempts = self.max_attempts;
        config.grid = self.grid;
        config.parallel = !self.serial;
        Ok(config)
    }
}

fn print_histogram(title: &str, hist: Option<Histogram>) {
    println!("\n{title}");
    let Some(h) = hist else {
        println!("  (no samples)");
        return;
    };
    let peak = h.counts.iter().copied().max().unwrap_or(0).max(1);
    for (i, &count) in h.counts.iter().enumerate() {
        let bar = "#".repeat(count * 50 / peak);
        println!(
            "  {:>8.1} - {:>8.1} | {:>5} {}",
            h.bin_start(i),
            h.bin_start(i + 1),
            count,
            bar
        );
    }
}

fn print_report(report: &SimReport, bins: usize) {
    for n in &report.notices {
        println!("{n}");
    }
    println!("{} trials", report.completed);
    if report.skipped > 0 {
        println!("{} trials skipped", report.skipped);
    }
    println!("Friend seen {:.1}%", report.summary.seen_percent);
    let (seen, unseen) = report.summary.histograms(bins);
    print_histogram("Seen", seen);
    print_histogram("Not Seen", unseen);
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = match args.to_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let report = match simulate(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&report, args.bins);
    }
    ExitCode::SUCCESS
}
