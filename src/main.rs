use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use page_forge::app::infrastructure::clock::SystemClock;
use page_forge::app::services::export::{export, validate_for_export};
use page_forge::app::services::storage::{FileSlot, decode_document};
use page_forge::app::{AppConfig, AppError, Document, ExportFormat, Result, StateStore};

#[derive(Parser, Debug)]
#[command(name = "PageForge", version, about = "Export PageForge documents")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Export a document to a file.
    Export {
        #[arg(value_enum)]
        format: FormatArg,
        /// Document JSON to export. Defaults to the autosaved document.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Directory the export is written to.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print word, character and page counts.
    Stats {
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Pdf,
    Html,
    Txt,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Html => ExportFormat::Html,
            FormatArg::Txt => ExportFormat::Txt,
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_document(config: &AppConfig, input: Option<&Path>) -> Result<Document> {
    match input {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            decode_document(&raw).ok_or_else(|| {
                AppError::Storage(format!("{} is not a valid document", path.display()))
            })
        }
        None => {
            let slot = FileSlot::new(&config.storage_key);
            tracing::info!(path = %slot.path().display(), "loading saved document");
            let store = StateStore::open(config, Box::new(slot), Rc::new(SystemClock));
            Ok(store.document().clone())
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load();
    match cli.command {
        CliCommand::Export { format, input, out } => {
            let doc = load_document(&config, input.as_deref())?;
            if config.strict_export {
                validate_for_export(&doc)?;
            }
            let artifact = export(&doc, format.into())?;
            let path = artifact.write_to(&out)?;
            println!("{}", path.display());
        }
        CliCommand::Stats { input } => {
            let mut doc = load_document(&config, input.as_deref())?;
            doc.recompute_stats();
            let stats = doc.stats;
            println!("Title:        {}", doc.display_title());
            println!("Pages:        {}", stats.pages);
            println!("Words:        {}", stats.words);
            println!("Characters:   {}", stats.chars);
            println!("Reading time: {} min", stats.reading_time);
            if let Some(progress) = doc.goal_progress() {
                println!("Goal:         {:.0}% of {} words", progress * 100.0, doc.goal);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
