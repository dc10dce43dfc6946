// kwcompare CLI - keyword ranking comparison, headless

mod exit_codes;
mod preview;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{compare_exit_code, EXIT_ERROR, EXIT_SUCCESS};
use kwcompare_engine::error::{MAX_FILES, MIN_FILES};
use kwcompare_io::{loader, xlsx, EXPORT_FILE_NAME};

#[derive(Parser)]
#[command(name = "kwcompare")]
#[command(about = "Merge keyword-ranking spreadsheets into a three-way comparison report")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a client spreadsheet against competitor spreadsheets
    #[command(after_help = "\
The first file is the client spreadsheet. Each file needs at least five
columns in this order: Keyword, Position, Search Volume, CPC, URL.

Examples:
  kwcompare compare client.xlsx comp1.xlsx comp2.xlsx
  kwcompare compare client.xlsx c1.xlsx c2.xlsx c3.xlsx -o report.xlsx
  kwcompare compare client.csv c1.csv c2.csv --json
  kwcompare compare client.xlsx c1.xlsx c2.xlsx --preview-rows 5 -q")]
    Compare {
        /// Input spreadsheets, client file first (3 to 6 files)
        files: Vec<PathBuf>,

        /// Output workbook path
        #[arg(long, short = 'o', default_value = EXPORT_FILE_NAME)]
        output: PathBuf,

        /// Print the full report as JSON to stdout instead of previews
        #[arg(long)]
        json: bool,

        /// Rows shown per preview table
        #[arg(long, default_value_t = 20)]
        preview_rows: usize,

        /// Skip the on-screen preview tables
        #[arg(long)]
        no_preview: bool,

        /// Suppress stderr notes (per-file errors are still reported)
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Show row and column stats for one spreadsheet without merging
    #[command(after_help = "\
Examples:
  kwcompare inspect client.xlsx
  kwcompare inspect competitor.csv --json")]
    Inspect {
        /// File to inspect
        file: PathBuf,

        /// Output stats as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: kwcompare <command> [options]");
            eprintln!("       kwcompare --help for more information");
            Ok(())
        }
        Some(Commands::Compare {
            files,
            output,
            json,
            preview_rows,
            no_preview,
            quiet,
        }) => cmd_compare(files, output, json, preview_rows, no_preview, quiet),
        Some(Commands::Inspect { file, json }) => cmd_inspect(file, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }
}

fn cmd_compare(
    files: Vec<PathBuf>,
    output: PathBuf,
    json: bool,
    preview_rows: usize,
    no_preview: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let outcome = loader::load_all(&files).map_err(|e| CliError {
        code: compare_exit_code(&e),
        message: e.to_string(),
        hint: Some(format!("supply {MIN_FILES} to {MAX_FILES} spreadsheets, client file first")),
    })?;

    // Non-fatal per-file issues, always reported
    for issue in &outcome.issues {
        eprintln!("error: {issue}");
    }
    if !quiet {
        eprintln!("client file: {}", outcome.tables[0].file_name);
    }

    let report = kwcompare_engine::run(outcome).map_err(|e| CliError {
        code: compare_exit_code(&e),
        message: e.to_string(),
        hint: None,
    })?;

    xlsx::export_to_file(&report, &output).map_err(CliError::general)?;

    if json {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else if !no_preview {
        preview::print_report(&report, preview_rows);
    }

    if !quiet {
        let s = &report.summary;
        eprintln!(
            "{} keywords — {} client, {} with 2+ competitors, {} with 1 competitor{}",
            s.total_keywords,
            s.client,
            s.two_plus_competitors,
            s.one_competitor,
            if s.unranked_dropped > 0 {
                format!(", {} unranked dropped", s.unranked_dropped)
            } else {
                String::new()
            },
        );
        eprintln!("wrote {}", output.display());
    }

    Ok(())
}

fn cmd_inspect(file: PathBuf, json: bool) -> Result<(), CliError> {
    let table = loader::load_one(&file, 1).map_err(|kind| {
        CliError::general(
            kwcompare_engine::model::LoadIssue {
                file_name: file.display().to_string(),
                kind,
            }
            .to_string(),
        )
    })?;

    let ranked = table.rows.iter().filter(|r| !r.position.is_missing()).count();
    let with_volume = table.rows.iter().filter(|r| !r.search_volume.is_missing()).count();
    let with_cpc = table.rows.iter().filter(|r| !r.cpc.is_missing()).count();
    let with_url = table.rows.iter().filter(|r| !r.url.is_missing()).count();

    if json {
        let stats = serde_json::json!({
            "file_name": table.file_name,
            "keywords": table.rows.len(),
            "ranked": ranked,
            "with_search_volume": with_volume,
            "with_cpc": with_cpc,
            "with_url": with_url,
        });
        println!("{}", serde_json::to_string_pretty(&stats).map_err(|e| CliError::general(e.to_string()))?);
    } else {
        println!("{}", table.file_name);
        println!("  keywords:           {}", table.rows.len());
        println!("  ranked (position):  {ranked}");
        println!("  with search volume: {with_volume}");
        println!("  with CPC:           {with_cpc}");
        println!("  with URL:           {with_url}");
    }

    Ok(())
}
