// boxedit CLI - headless box file operations

mod exit_codes;
mod ops;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use boxedit_config::Settings;
use boxedit_engine::{CharStat, Document, EditError, Page};
use boxedit_io::boxfile::{self, read_file_as_utf8};
use boxedit_io::style_split::write_style_split;
use boxedit_io::text::{export_text, import_symbol_lines, import_symbol_text, ExportMode, TextLayout};
use boxedit_io::{aggregate_file, BoxFileError};

use exit_codes::{EXIT_EDIT, EXIT_ERROR, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};
use ops::EditOp;

#[derive(Parser)]
#[command(name = "boxedit")]
#[command(about = "Inspect and edit OCR box files (headless)")]
#[command(version, long_version = long_version())]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file to use instead of the default location
    #[arg(long, global = true, env = "BOXEDIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a box file and report pages and records
    #[command(after_help = "\
Examples:
  boxedit check page.box --height 3300
  boxedit check page.box --height 3300 --json")]
    Check {
        file: PathBuf,

        /// Height of the page image in pixels
        #[arg(long)]
        height: i32,

        #[arg(long)]
        json: bool,
    },

    /// Character statistics, most frequent first
    Stats {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Parse and re-serialize a box file (LF line endings, canonical markers)
    Normalize {
        file: PathBuf,

        #[arg(long)]
        height: i32,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Write the letters of a box file as plain text
    ExportText {
        file: PathBuf,

        #[arg(long)]
        height: i32,

        #[arg(long, value_enum, default_value = "lines")]
        mode: Mode,

        /// Export only this page (default: all pages in order)
        #[arg(long)]
        page: Option<usize>,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Write one box file per text style next to the input
    SplitStyles {
        file: PathBuf,

        #[arg(long)]
        height: i32,
    },

    /// Assign symbols from a text file to the boxes of a page, in order
    #[command(after_help = "\
Without --text the symbol file holds one symbol per line. With --text it
holds running text; configured ligatures stay together, whitespace is
dropped. Reading stops at the first empty line.")]
    ImportSymbols {
        file: PathBuf,

        #[arg(long)]
        height: i32,

        /// Symbol file
        #[arg(long)]
        symbols: PathBuf,

        /// Treat the symbol file as running text
        #[arg(long)]
        text: bool,

        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Output file (default: overwrite input)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Replay edit commands on one page and save the result
    #[command(after_help = "\
Commands (rows are 0-based):
  insert-after R      insert a '*' box after row R
  remove R [R...]     delete rows
  split R             split row R in two halves
  join R1 R2 [...]    merge contiguous rows (a single row joins with the next)
  move FROM TO        move a row
  letter R TEXT       set the letter of row R
  bold|italic|underline R on|off
  undo | redo

Example:
  boxedit edit page.box --height 3300 --op 'split 4' --op 'letter 5 n' -o fixed.box")]
    Edit {
        file: PathBuf,

        #[arg(long)]
        height: i32,

        /// Page to edit
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Edit command, may be repeated
        #[arg(long = "op", value_name = "CMD", required = true)]
        ops: Vec<String>,

        /// Output file (default: overwrite input)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Symbols,
    Lines,
    Paragraphs,
}

impl From<Mode> for ExportMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Symbols => ExportMode::Symbols,
            Mode::Lines => ExportMode::Lines,
            Mode::Paragraphs => ExportMode::Paragraphs,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let result = match cli.command {
        Commands::Check { file, height, json } => cmd_check(&file, height, json),
        Commands::Stats { file, json } => cmd_stats(&settings, &file, json),
        Commands::Normalize { file, height, output } => cmd_normalize(&file, height, output),
        Commands::ExportText {
            file,
            height,
            mode,
            page,
            output,
        } => cmd_export_text(&settings, &file, height, mode.into(), page, output),
        Commands::SplitStyles { file, height } => cmd_split_styles(&file, height),
        Commands::ImportSymbols {
            file,
            height,
            symbols,
            text,
            page,
            output,
        } => cmd_import_symbols(&settings, &file, height, &symbols, text, page, output),
        Commands::Edit {
            file,
            height,
            page,
            ops,
            output,
        } => cmd_edit(&settings, &file, height, page, &ops, output),
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
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn edit(msg: impl Into<String>) -> Self {
        Self { code: EXIT_EDIT, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<BoxFileError> for CliError {
    fn from(err: BoxFileError) -> Self {
        match err {
            BoxFileError::Io { .. } => Self::io(err.to_string()),
            BoxFileError::MalformedLine { .. } | BoxFileError::InvalidNumber { .. } => Self {
                code: EXIT_PARSE,
                message: err.to_string(),
                hint: Some("is --height right and is this a box file?".to_string()),
            },
            BoxFileError::InvalidSymbol { .. } => Self {
                code: EXIT_PARSE,
                message: err.to_string(),
                hint: Some("put one symbol per line, or use --text for running text".to_string()),
            },
        }
    }
}

impl From<EditError> for CliError {
    fn from(err: EditError) -> Self {
        Self::edit(err.to_string())
    }
}

fn write_out(output: Option<&Path>, text: &str) -> Result<(), CliError> {
    match output {
        Some(path) => std::fs::write(path, text).map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display()))),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| CliError::io(format!("write error: {e}")))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::general(e.to_string()))?;
    write_out(None, &format!("{json}\n"))
}

// ============================================================================
// check
// ============================================================================

#[derive(Serialize)]
struct CheckReport {
    pages: usize,
    records: usize,
    page_records: Vec<usize>,
}

fn cmd_check(file: &Path, height: i32, json: bool) -> Result<(), CliError> {
    let pages = boxfile::load(file, height)?;
    let report = CheckReport {
        pages: pages.len(),
        records: pages.iter().map(Page::len).sum(),
        page_records: pages.iter().map(Page::len).collect(),
    };

    if json {
        return print_json(&report);
    }
    let mut out = format!("pages: {}\nrecords: {}\n", report.pages, report.records);
    for (index, count) in report.page_records.iter().enumerate() {
        out.push_str(&format!("page {index}: {count} records\n"));
    }
    write_out(None, &out)
}

// ============================================================================
// stats
// ============================================================================

fn format_stats(rows: &[CharStat], show_deviation: bool) -> String {
    let mut out = String::from("letter  count  percent");
    if show_deviation {
        out.push_str("  deviation");
    }
    out.push('\n');
    for row in rows {
        out.push_str(&format!("{:<6}{:>7}{:>9.2}", row.letter, row.count, row.percentage));
        if show_deviation {
            out.push_str(&format!("{:>11.4}", row.deviation));
        }
        out.push('\n');
    }
    out
}

fn cmd_stats(settings: &Settings, file: &Path, json: bool) -> Result<(), CliError> {
    let rows = aggregate_file(file)?;
    if json {
        return print_json(&rows);
    }
    write_out(None, &format_stats(&rows, settings.show_deviation))
}

// ============================================================================
// normalize / export-text / split-styles
// ============================================================================

fn cmd_normalize(file: &Path, height: i32, output: Option<PathBuf>) -> Result<(), CliError> {
    let pages = boxfile::load(file, height)?;
    write_out(output.as_deref(), &boxfile::serialize(&pages, height))
}

fn cmd_export_text(
    settings: &Settings,
    file: &Path,
    height: i32,
    mode: ExportMode,
    page: Option<usize>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let pages = boxfile::load(file, height)?;
    let layout = TextLayout {
        word_space: settings.word_space,
        paragraph_indent: settings.paragraph_indent,
    };
    let text = match page {
        Some(index) => {
            let page = pages
                .get(index)
                .ok_or_else(|| CliError::args(format!("page {index} not in file ({} pages)", pages.len())))?;
            export_text(page, mode, &layout)
        }
        None => export_text(pages.iter().flat_map(Page::iter), mode, &layout),
    };
    write_out(output.as_deref(), &text)
}

fn cmd_split_styles(file: &Path, height: i32) -> Result<(), CliError> {
    let pages = boxfile::load(file, height)?;
    let written = write_style_split(file, pages.iter().flat_map(Page::iter), height)?;
    let mut out = String::new();
    for path in written {
        out.push_str(&format!("{}\n", path.display()));
    }
    write_out(None, &out)
}

// ============================================================================
// import-symbols / edit
// ============================================================================

fn open_document(settings: &Settings, file: &Path, height: i32, page: usize) -> Result<Document, CliError> {
    let pages = boxfile::load(file, height)?;
    let mut document = Document::new(pages);
    document.editor_mut().set_history_limit(settings.history_limit);
    if document.switch_page(page) {
        log::info!("page {page} not in file, starting it empty");
    }
    Ok(document)
}

fn save_document(document: &mut Document, target: &Path, height: i32) -> Result<(), CliError> {
    boxfile::save(target, document.pages().into_iter().map(|(_, page)| page), height)?;
    document.mark_saved();
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_import_symbols(
    settings: &Settings,
    file: &Path,
    height: i32,
    symbols: &Path,
    text: bool,
    page: usize,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let content = read_file_as_utf8(symbols)?;
    let letters = if text {
        import_symbol_text(&content, &settings.ligatures)
    } else {
        import_symbol_lines(&content)?
    };

    let mut document = open_document(settings, file, height, page)?;
    let report = document.editor_mut().assign_letters(&letters)?;
    if report.unused_symbols > 0 || report.rows_without_symbol > 0 {
        eprintln!(
            "warning: {} symbols for {} boxes",
            letters.len(),
            document.editor().len()
        );
    }
    save_document(&mut document, output.as_deref().unwrap_or(file), height)
}

fn cmd_edit(
    settings: &Settings,
    file: &Path,
    height: i32,
    page: usize,
    raw_ops: &[String],
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let ops = raw_ops
        .iter()
        .map(|s| s.parse::<EditOp>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CliError::args(e).with_hint("see `boxedit edit --help` for the command list"))?;

    let mut document = open_document(settings, file, height, page)?;
    for (raw, op) in raw_ops.iter().zip(&ops) {
        ops::apply(document.editor_mut(), op).map_err(|e| CliError::edit(format!("{raw}: {e}")))?;
        log::info!("applied {raw:?}");
    }
    save_document(&mut document, output.as_deref().unwrap_or(file), height)
}
