//! Club Results CLI
//!
//! Command-line tool for parsing, validating, resolving, and exporting
//! archery results exports.

use clap::{Parser, Subcommand};
use log::LevelFilter;
use results_core::{
    classify, export_records, is_current_club_record, parse_results, scan_sources, ClubConfig,
    DataKind, EventMetadata, ExportFormat, Resolver, ResolverConfig, ResultRecord,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "results-cli")]
#[command(about = "Club results ingestion and normalization", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn",
          value_parser = ["error", "warn", "info", "debug", "trace"])]
    log_level: String,

    /// Club name matched in legacy print titles
    #[arg(long, global = true)]
    club_name: Option<String>,

    /// Club code used when a legacy event row has no club
    #[arg(long, global = true)]
    club_code: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report which format a file would be parsed as
    Classify {
        /// Path to the file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Parse and display a single file
    Parse {
        /// Path to the file
        #[arg(short, long)]
        file: PathBuf,

        /// Data kind (event-results, club-records, personal-bests)
        #[arg(short, long, default_value = "event-results")]
        kind: DataKind,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Maximum number of rows to display
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Parse every CSV file under a directory and report what each yields
    Validate {
        /// Root directory of bundled static files
        #[arg(short, long)]
        root: PathBuf,
    },

    /// Resolve a data set from the configured sources
    Fetch {
        /// Path to resolver config (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Data set (current, archive, club-records, personal-bests)
        #[arg(short, long, default_value = "current")]
        set: String,
    },

    /// Parse a file and write its records to CSV or JSON
    Export {
        /// Path to the file
        #[arg(short, long)]
        file: PathBuf,

        /// Data kind (event-results, club-records, personal-bests)
        #[arg(short, long, default_value = "event-results")]
        kind: DataKind,

        /// Output format (csv or json)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Mark personal bests that are also the standing club record
    CheckPbs {
        /// Club records file
        #[arg(short, long)]
        records: PathBuf,

        /// Personal bests file
        #[arg(short, long)]
        pbs: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> results_core::Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.parse().unwrap_or(LevelFilter::Warn);
    env_logger::Builder::new().filter_level(level).init();

    let mut club = ClubConfig::default();
    if let Some(name) = cli.club_name {
        club.club_name = name;
    }
    if let Some(code) = cli.club_code {
        club.club_code = code;
    }

    match cli.command {
        Commands::Classify { file } => cmd_classify(&file, &club),
        Commands::Parse {
            file,
            kind,
            json,
            limit,
        } => cmd_parse(&file, kind, json, limit, &club),
        Commands::Validate { root } => cmd_validate(&root, &club),
        Commands::Fetch { config, set } => cmd_fetch(&config, &set),
        Commands::Export {
            file,
            kind,
            format,
            output,
        } => cmd_export(&file, kind, format, &output, &club),
        Commands::CheckPbs { records, pbs } => cmd_check_pbs(&records, &pbs, &club),
    }
}

/// Read a file as text, replacing invalid UTF-8
fn read_text(path: &Path) -> results_core::Result<String> {
    let bytes = fs::read(path).map_err(|e| results_core::Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn cmd_classify(file: &Path, club: &ClubConfig) -> results_core::Result<()> {
    let text = read_text(file)?;
    println!("{}: {:?}", file.display(), classify(&text, club));
    Ok(())
}

fn cmd_parse(
    file: &Path,
    kind: DataKind,
    json: bool,
    limit: Option<usize>,
    club: &ClubConfig,
) -> results_core::Result<()> {
    let text = read_text(file)?;
    let records = parse_results(&text, kind, club);

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("File: {}", file.display());
    println!("Format: {:?}", classify(&text, club));
    println!("Records: {}", records.len());
    println!();
    print_records(&records, limit);

    Ok(())
}

fn cmd_validate(root: &Path, club: &ClubConfig) -> results_core::Result<()> {
    let files = scan_sources(root)?;
    println!("Found {} CSV files under {}", files.len(), root.display());
    println!();

    let mut empty = 0;
    for source in &files {
        let text = read_text(&source.path)?;
        let records = parse_results(&text, source.kind, club);
        if records.is_empty() {
            empty += 1;
        }
        println!(
            "  {:<60} {:<15} {:?} {} records",
            source.path.display(),
            source.kind.to_string(),
            classify(&text, club),
            records.len()
        );
    }

    if empty > 0 {
        println!();
        println!("{} file(s) produced no records", empty);
    }

    Ok(())
}

fn cmd_fetch(config_path: &Path, set: &str) -> results_core::Result<()> {
    let config = ResolverConfig::load(config_path)?;
    let resolver = Resolver::from_config(&config)?;
    let runtime = tokio::runtime::Runtime::new()?;

    match set {
        "current" | "archive" => {
            let events = runtime.block_on(async {
                if set == "current" {
                    resolver.current_results().await
                } else {
                    resolver.archived_results().await
                }
            });
            print_events(&events);
        }
        "club-records" => {
            let records = runtime.block_on(resolver.club_records());
            print_records(&records, None);
        }
        "personal-bests" => {
            let records = runtime.block_on(resolver.personal_bests());
            print_records(&records, None);
        }
        other => {
            eprintln!(
                "Unknown data set: {}. Supported: current, archive, club-records, personal-bests",
                other
            );
            std::process::exit(1);
        }
    }

    Ok(())
}

fn cmd_export(
    file: &Path,
    kind: DataKind,
    format: ExportFormat,
    output: &Path,
    club: &ClubConfig,
) -> results_core::Result<()> {
    let text = read_text(file)?;
    let records = parse_results(&text, kind, club);
    let written = export_records(&records, format, output)?;

    println!("Exported {} records to {}", written, output.display());

    Ok(())
}

fn cmd_check_pbs(
    records_path: &Path,
    pbs_path: &Path,
    club: &ClubConfig,
) -> results_core::Result<()> {
    let club_records = parse_results(&read_text(records_path)?, DataKind::ClubRecords, club);
    let pbs = parse_results(&read_text(pbs_path)?, DataKind::PersonalBests, club);

    let mut matches = 0;
    for pb in &pbs {
        let marker = if is_current_club_record(pb, &club_records) {
            matches += 1;
            " <-- club record"
        } else {
            ""
        };
        println!(
            "{}\t{}\t{}\t{}{}",
            pb.archer_name, pb.bow_type, pb.round, pb.score, marker
        );
    }

    println!();
    println!("{} of {} personal bests are current club records", matches, pbs.len());

    Ok(())
}

fn print_events(events: &[EventMetadata]) {
    if events.is_empty() {
        println!("No results available yet.");
        return;
    }

    for event in events {
        println!(
            "{} {} ({}) - {} results",
            event.date,
            event.name,
            event.venue,
            event.results.len()
        );
        if let Some(url) = &event.download_url {
            println!("  download: {}", url);
        }
    }
}

fn print_records(records: &[ResultRecord], limit: Option<usize>) {
    if records.is_empty() {
        println!("No results available yet.");
        return;
    }

    let header = [
        "Pos", "Name", "Club", "Round", "Bow", "Hits", "Golds", "Score", "Date", "Category",
    ];
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    let row_limit = limit.unwrap_or(records.len());
    for r in records.iter().take(row_limit) {
        let values = [
            &r.position,
            &r.archer_name,
            &r.club,
            &r.round,
            &r.bow_type,
            &r.hits,
            &r.golds,
            &r.score,
            &r.date,
            &r.archer_category,
        ];
        println!(
            "{}",
            values.iter().map(|v| v.as_str()).collect::<Vec<_>>().join("\t")
        );
    }

    if records.len() > row_limit {
        println!("... ({} more rows)", records.len() - row_limit);
    }
}
