//! copa-remediate CLI entry point

use clap::Parser;
use copa_remediate::config::CliOptions;
use colored::Colorize;
use copa_remediate::{detectors, input, output, AnnotatedUnit, Config, RemediationStats, Remediator};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "copa-remediate")]
#[command(author, version, about = "Finds deprecated CO-PA constructs in ABAP source and suggests replacements", long_about = None)]
struct Cli {
    /// Inputs: JSON unit lists (.json), ABAP sources, or "-" for a JSON list on stdin
    #[arg(required_unless_present = "list_detectors")]
    files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Config file path (default: auto-detect .coparc.json)
    #[arg(short, long, env = "COPA_REMEDIATE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable specific detector (can be used multiple times)
    #[arg(short, long = "detector", value_name = "DETECTOR")]
    detectors: Vec<String>,

    /// Disable specific detector (can be used multiple times)
    #[arg(short, long = "ignore", value_name = "DETECTOR")]
    ignore: Vec<String>,

    /// Report initial checks on every variable, declared type or not
    #[arg(long = "no-type-filter")]
    no_type_filter: bool,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    jobs: Option<usize>,

    /// Show statistics at the end
    #[arg(long)]
    statistics: bool,

    /// Only show count of findings (no details)
    #[arg(long)]
    count: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// List available detectors and exit
    #[arg(long = "list-detectors")]
    list_detectors: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if cli.list_detectors {
        for detector in detectors::builtin(&Config::default()).into_diagnostic()? {
            println!("{:28} {}", detector.id(), detector.description());
        }
        return Ok(ExitCode::from(0));
    }

    // Load or create configuration
    let mut config = if let Some(ref config_path) = cli.config {
        Config::from_file(config_path).into_diagnostic()?
    } else {
        let start_dir = std::env::current_dir().into_diagnostic()?;
        match Config::find_and_load(&start_dir).into_diagnostic()? {
            Some((path, cfg)) => {
                log::info!("Using config: {}", path.display());
                cfg
            }
            None => Config::default(),
        }
    };

    config
        .merge_cli(CliOptions {
            enabled_detectors: if cli.detectors.is_empty() { None } else { Some(cli.detectors) },
            disabled_detectors: cli.ignore,
            type_filter: if cli.no_type_filter { Some(false) } else { None },
            verbose: cli.verbose,
            statistics: cli.statistics,
            jobs: cli.jobs,
        })
        .into_diagnostic()?;

    if config.jobs > 1 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build_global()
            .ok();
    }

    // Collect units
    let paths = input::expand(&cli.files, &config).into_diagnostic()?;
    if paths.is_empty() {
        eprintln!("No inputs to analyze");
        return Ok(ExitCode::from(0));
    }

    let statistics = config.statistics;
    let remediator = Remediator::new(config).into_diagnostic()?;

    let mut annotated: Vec<AnnotatedUnit> = Vec::new();
    let mut stats = RemediationStats::default();
    let mut last_error = None;
    let mut loaded_inputs = 0;

    for path in &paths {
        match input::load_units(path) {
            Ok(units) => {
                log::info!("Loaded {} unit(s) from {}", units.len(), path.display());
                let results = remediator.remediate(&units);
                stats.merge(&RemediationStats::from_units(&results));
                annotated.extend(results);
                loaded_inputs += 1;
            }
            Err(e) => {
                log::warn!("Skipping input: {}", e);
                last_error = Some(e);
            }
        }
    }

    if loaded_inputs == 0 {
        if let Some(e) = last_error {
            return Err(e).into_diagnostic();
        }
    }

    if cli.count {
        println!("{}", stats.total());
    } else {
        match cli.format {
            OutputFormat::Text => {
                output::print_text(&annotated).into_diagnostic()?;
                print_summary(&stats);
            }
            OutputFormat::Json => {
                output::print_json(&annotated, cli.pretty).into_diagnostic()?;
            }
        }
    }

    if statistics {
        print_statistics(&stats);
    }

    // Exit codes
    if stats.total() > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::from(0))
    }
}

fn print_summary(stats: &RemediationStats) {
    let unit_word = if stats.units_analyzed == 1 { "unit" } else { "units" };
    let total = stats.total();

    if total == 0 {
        eprintln!("\nNo deprecated CO-PA usage found in {} {}", stats.units_analyzed, unit_word);
    } else {
        eprintln!(
            "\nFound {} finding{} in {} of {} {}",
            total,
            if total == 1 { "" } else { "s" },
            stats.units_with_findings,
            stats.units_analyzed,
            unit_word
        );
    }
}

fn print_statistics(stats: &RemediationStats) {
    eprintln!("\n{}", "Statistics:".bold());
    eprintln!("  Units analyzed: {}", stats.units_analyzed);
    eprintln!("  Units with findings: {}", stats.units_with_findings);
    eprintln!();

    if !stats.per_detector.is_empty() {
        eprintln!("  {}", "By detector:".bold());
        let mut detectors: Vec<_> = stats.per_detector.iter().collect();
        detectors.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (detector, count) in detectors {
            eprintln!("    {:40} {}", detector, count);
        }
    }
}
