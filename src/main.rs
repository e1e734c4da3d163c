use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use maple_snapin::{
    adapter::StdoutEmitter,
    archive::WorkspaceOptions,
    cli::{inspect_archive, run_extract, run_load, schema},
    config::ConnectorConfig,
};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Maple snap-in: extract Maple customers and knowledge-base articles into normalized items
#[derive(Parser)]
#[command(name = "maple", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source configuration from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging and retention of extracted archives
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run extraction phases for the events in a file
    Extract {
        /// JSON file with one event or an array of events
        #[arg(long)]
        event: PathBuf,

        /// Checkpoint state file, read before and written after the run
        #[arg(long)]
        state: Option<PathBuf>,

        /// Directory to write repositories (NDJSON) and the domain mapping to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory with attachments.ndjson for the attachments phase
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Run loading phases for the events in a file
    Load {
        /// JSON file with one event or an array of events
        #[arg(long)]
        event: PathBuf,

        /// Directory with <item_type>.ndjson files to load
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Validate a Maple archive and count its records
    Inspect {
        /// The ZIP archive to inspect
        archive: PathBuf,
    },

    /// Print the external domain metadata
    Schema {
        /// Narrow the metadata to one sync unit (customers or maple-kb)
        #[arg(long)]
        sync_unit: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dotenv = dotenvy::from_filename(&cli.env);

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    if let Err(e) = dotenv {
        log::debug!("Not sourcing {}: {}", cli.env, e);
    }

    let mut config = ConnectorConfig::from_env()?;
    if cli.debug {
        config.keep_workdir = true;
    }

    match cli.command {
        Commands::Extract {
            event,
            state,
            output,
            input,
        } => {
            log::info!("Extracting events from {}", event.display().bright_black());
            let state = run_extract(
                &config,
                &event,
                state.as_deref(),
                output.as_deref(),
                input.as_deref(),
                Arc::new(StdoutEmitter),
            )
            .await?;
            log::info!(
                "Completed: customers={}, maple_kb={}",
                state.customers.completed.cyan(),
                state.maple_kb.completed.cyan()
            );
        }
        Commands::Load { event, input } => {
            log::info!(
                "Loading events from {} with items from {}",
                event.display().bright_black(),
                input.display().bright_black()
            );
            run_load(&config, &event, &input, Arc::new(StdoutEmitter)).await?;
        }
        Commands::Inspect { archive } => {
            log::info!("Inspecting {}", archive.display().bright_black());
            let options = WorkspaceOptions::new(config.work_dir.clone(), config.keep_workdir);
            let summary = inspect_archive(&archive, &options)?;
            println!("customers: {}", summary.customers);
            println!("articles:  {}", summary.articles);
            for file in &summary.missing_content {
                log::warn!("Missing article content: {}", file.yellow());
            }
        }
        Commands::Schema { sync_unit } => {
            println!("{}", schema(sync_unit.as_deref())?);
        }
    }

    Ok(())
}
