mod calc;
mod cmd;
mod data;
mod logging;
mod ui;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::data::{AppSettings, SlotKey};

#[derive(Parser)]
#[command(name = "weekslots", about = "Pick hours on a weekly grid and get a schedule summary")]
struct Cli {
    /// Path to the data directory holding config.yaml and the log (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    /// Disable hand editing of the summary text
    #[arg(long)]
    read_only: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config.yaml
    Init,
    /// Print the Monday–Sunday window containing a date (default: today)
    Week {
        /// Reference date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Print the schedule summary for the given slots
    Summarize {
        /// Slots as YYYY-MM-DDTHH:00, e.g. 2024-10-18T09:00
        #[arg(required = true)]
        slots: Vec<SlotKey>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Resolve data_dir to an absolute path so later file I/O does not depend on
    // the working directory.
    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    let mut settings = AppSettings::load()?;
    if cli.read_only {
        settings.editable = false;
    }
    let log_path = logging::init(&data_dir, &settings.log_level)?;
    info!(log = %log_path.display(), editable = settings.editable, "weekslots starting");

    match cli.command {
        None => cmd::root::run(&settings),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Week { date }) => cmd::week::run(date),
        Some(Commands::Summarize { slots }) => cmd::summarize::run(&slots),
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
