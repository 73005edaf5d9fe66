//! shiftsheet CLI
//!
//! Extracts shifts from a schedule spreadsheet and writes the import file.
//! Anything not given on the command line is asked for interactively when
//! stdin is a terminal.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use glob::glob;
use tracing_subscriber::EnvFilter;

use shiftsheet::{
    list_sheets, Delimiter, Extractor, ExtractorBuilder, HeuristicTables, NameColumn,
    SheetSelector, ShiftSheetError, SourceKind, TabularSource, EXPORT_FILE_PREFIX,
};

#[derive(Parser)]
#[command(name = "shiftsheet")]
#[command(author, version, about = "Extract shifts and vacations from schedule spreadsheets", long_about = None)]
struct Cli {
    /// Schedule file (.xlsx, .xls, .xlsb, .ods, .csv); asked for when omitted
    input: Option<PathBuf>,

    /// Read only this sheet
    #[arg(long, conflicts_with = "sheet_index")]
    sheet: Option<String>,

    /// Read only the sheet at this 0-based index
    #[arg(long)]
    sheet_index: Option<usize>,

    /// Name column: 1-based number or exact header text
    #[arg(short = 'n', long)]
    name_column: Option<String>,

    /// Field separator of the export
    #[arg(short, long, default_value = "comma")]
    delimiter: Delimiter,

    /// JSON file overriding the keyword tables
    #[arg(short, long)]
    tables: Option<PathBuf>,

    /// Export file; defaults to the desktop, then the working directory
    #[arg(short, long, conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print the export instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Accept suggested defaults without asking
    #[arg(short, long)]
    yes: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let interactive = io::stdin().is_terminal() && !cli.yes;

    let tables = match &cli.tables {
        Some(path) => HeuristicTables::from_json_file(path)
            .with_context(|| format!("failed to load tables from {}", path.display()))?,
        None => HeuristicTables::default(),
    };

    let input = match cli.input.clone() {
        Some(path) => path,
        None if interactive => prompt_for_input()?,
        None => bail!("no input file given"),
    };

    let selector = match (&cli.sheet, cli.sheet_index) {
        (Some(name), _) => SheetSelector::Name(name.clone()),
        (None, Some(index)) => SheetSelector::Index(index),
        (None, None) if interactive => prompt_for_sheets(&input, &tables)?,
        (None, None) => SheetSelector::All,
    };

    let extractor = ExtractorBuilder::new()
        .with_sheet_selector(selector)
        .with_delimiter(cli.delimiter)
        .with_tables(tables)
        .build()?;

    let source = extractor
        .load(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let name_column = match &cli.name_column {
        Some(choice) => choice.parse::<NameColumn>().map_err(anyhow::Error::msg)?,
        None if interactive => prompt_for_name_column(&extractor, &source)?,
        None => NameColumn::Auto,
    };

    let extraction = extractor.extract_with_name_column(&source, &name_column)?;
    let report = &extraction.report;

    eprintln!("Name column: '{}'", extraction.name_column);
    eprintln!("Date columns: {}", extraction.date_columns.len());
    if report.orphan_position_rows > 0 {
        eprintln!(
            "Skipped {} position row(s) with no employee name above them",
            report.orphan_position_rows
        );
    }

    if report.records.is_empty() {
        eprintln!(
            "No shifts found. Check that each role-code row (e.g. 'SM 9') has a name row above it."
        );
        return Ok(());
    }

    eprintln!("Records: {}", report.records.len());

    if cli.stdout {
        println!("{}", extractor.render(&report.records));
        return Ok(());
    }

    match extractor.write_export(&report.records, cli.output.as_deref()) {
        Ok(path) => {
            eprintln!("Saved: {}", path.display());
            Ok(())
        }
        Err(ShiftSheetError::OutputTargetUnavailable { attempted, rendered }) => {
            eprintln!("Could not write the export (tried {} location(s)).", attempted.len());
            eprintln!("Copy the text below:");
            println!("{}", "=".repeat(40));
            println!("{}", rendered);
            println!("{}", "=".repeat(40));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn prompt(question: &str) -> Result<String> {
    eprint!("{}", question);
    io::stderr().flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        bail!("input closed");
    }
    Ok(line.trim().to_string())
}

fn strip_quotes(s: &str) -> &str {
    s.trim().trim_matches('"').trim_matches('\'')
}

/// Schedule files in the working directory, minus lock files and old exports
fn local_candidates() -> Vec<PathBuf> {
    let mut files = Vec::new();
    for pattern in ["*.xlsx", "*.csv"] {
        let Ok(paths) = glob(pattern) else { continue };
        for path in paths.flatten() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if name.starts_with("~$") || name.starts_with(EXPORT_FILE_PREFIX) {
                continue;
            }
            files.push(path);
        }
    }
    files
}

fn prompt_for_input() -> Result<PathBuf> {
    let files = local_candidates();
    let manual = files.len() + 1;

    if files.is_empty() {
        eprintln!("No schedule files in the current directory.");
    }
    for (i, file) in files.iter().enumerate() {
        eprintln!("  [{}] {}", i + 1, file.display());
    }
    eprintln!("  [{}] Enter a path", manual);

    loop {
        let answer = prompt("Choice: ")?;
        let path = match answer.parse::<usize>() {
            Ok(n) if (1..=files.len()).contains(&n) => return Ok(files[n - 1].clone()),
            Ok(n) if n == manual => PathBuf::from(strip_quotes(&prompt("Path: ")?)),
            Ok(_) => {
                eprintln!("Invalid number.");
                continue;
            }
            Err(_) => PathBuf::from(strip_quotes(&answer)),
        };

        if path.is_file() {
            return Ok(path);
        }
        eprintln!("File not found: {}", path.display());
    }
}

fn prompt_for_sheets(input: &Path, tables: &HeuristicTables) -> Result<SheetSelector> {
    if SourceKind::from_path(input) != Some(SourceKind::Workbook) {
        return Ok(SheetSelector::All);
    }

    let sheets = list_sheets(input, tables)?;
    let included: Vec<&str> = sheets
        .iter()
        .filter(|s| !s.excluded)
        .map(|s| s.name.as_str())
        .collect();
    if included.len() <= 1 {
        return Ok(SheetSelector::All);
    }

    eprintln!("Sheets: {}", included.join(", "));
    let answer = prompt("Press Enter to read all of them, or type a sheet name: ")?;
    if !answer.is_empty() && sheets.iter().any(|s| s.name == answer) {
        return Ok(SheetSelector::Name(answer));
    }
    Ok(SheetSelector::All)
}

fn prompt_for_name_column(extractor: &Extractor, source: &TabularSource) -> Result<NameColumn> {
    let headers = source.headers();
    let classifier = extractor.classifier();
    let candidates = classifier.name_column_candidates(headers);
    let suggested = candidates.first().copied();

    for (i, header) in headers
        .iter()
        .enumerate()
        .take(extractor.tables().preview_columns)
    {
        let marker = if candidates.contains(&i) { "  <-- looks like names" } else { "" };
        eprintln!("  [{}] {}{}", i + 1, header, marker);
    }

    let question = match suggested {
        Some(i) => format!("Name column number (Enter = {}): ", i + 1),
        None => "Name column number: ".to_string(),
    };

    loop {
        let answer = prompt(&question)?;
        if answer.is_empty() {
            if suggested.is_some() {
                return Ok(NameColumn::Auto);
            }
            eprintln!("Enter a number.");
            continue;
        }
        match answer.parse::<usize>() {
            Ok(n) if (1..=headers.len()).contains(&n) => return Ok(NameColumn::Index(n)),
            Ok(_) => eprintln!("Invalid number."),
            Err(_) => eprintln!("Enter a number."),
        }
    }
}
