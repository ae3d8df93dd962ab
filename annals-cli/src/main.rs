//! Annals - browse the eras of Chinese history from the terminal
//!
//! Lists the era gallery and fetches AI-generated narratives for a selected
//! era.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use tracing_subscriber::EnvFilter;

use annals_core::chronicle::{
    global_config_dir, schema, validate_model, ChronicleConfig, ChroniclePrompts, Chronicler,
};
use annals_core::{Catalog, Era};

mod render;
mod show_cli;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "annals",
    about = "Explore the eras of Chinese history with AI-generated narratives",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Emit structured JSON traces for the core library
    #[clap(long, global = true)]
    trace: bool,

    /// Project configuration directory (config.json, system.txt, user.txt)
    #[clap(long, default_value = ".annals", global = true)]
    config_dir: PathBuf,

    /// Override the provider model
    #[clap(long, global = true)]
    model: Option<String>,
}

#[derive(Parser, Debug)]
enum Command {
    /// List the eras in the gallery
    List {
        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },

    /// Fetch and display the detailed narrative for an era
    Show {
        /// Era identifier (see `annals list`)
        id: String,

        /// Output the record as JSON
        #[clap(long)]
        json: bool,
    },

    /// Print the structured-output schema sent to the provider
    Schema,

    /// Print the prompt that would be sent for an era, without calling the provider
    Prompt {
        /// Era identifier (see `annals list`)
        id: String,
    },
}

/// Initialize tracing with CLI flags
///
/// Logs always go to stderr; stdout carries command output only.
fn initialize_tracing(log_level: &LogLevel, trace: bool) {
    let mut filter = EnvFilter::new(log_level.to_filter_directive());

    if trace {
        if let Ok(directive) = "annals_core=trace".parse() {
            filter = filter.add_directive(directive);
        }

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();

        tracing::info!("Annals core tracing enabled");
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, cli.trace);

    let global_dir = global_config_dir();

    match cli.command {
        Command::List { json } => list_command(json),
        Command::Show { id, json } => {
            let era = find_era(&id)?;
            let mut chronicler =
                Chronicler::from_directories(Some(&cli.config_dir), global_dir.as_deref())
                    .context("Failed to initialize chronicler")?;
            if let Some(model) = cli.model {
                chronicler
                    .override_model(model)
                    .context("Invalid --model value")?;
            }
            show_cli::run(chronicler, era, json).await
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(schema::response_schema())?);
            Ok(())
        }
        Command::Prompt { id } => prompt_command(&id, &cli.config_dir, global_dir.as_deref(), cli.model),
    }
}

fn find_era(id: &str) -> Result<&'static Era> {
    Catalog::builtin()
        .get(id)
        .ok_or_else(|| anyhow!("Unknown era '{id}'. Run `annals list` to see available eras."))
}

#[derive(Tabled)]
struct EraRow {
    #[tabled(rename = "ID")]
    id: &'static str,
    #[tabled(rename = "Era")]
    localized_name: &'static str,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Period")]
    period: &'static str,
    #[tabled(rename = "Summary")]
    summary: &'static str,
}

impl From<&'static Era> for EraRow {
    fn from(era: &'static Era) -> Self {
        Self {
            id: era.id,
            localized_name: era.localized_name,
            name: era.name,
            period: era.period,
            summary: era.summary,
        }
    }
}

fn list_command(json: bool) -> Result<()> {
    let eras = Catalog::builtin().list();

    if json {
        println!("{}", serde_json::to_string_pretty(eras)?);
        return Ok(());
    }

    let rows: Vec<EraRow> = eras.iter().map(EraRow::from).collect();
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();
    println!("{table}");
    Ok(())
}

fn prompt_command(
    id: &str,
    config_dir: &std::path::Path,
    global_dir: Option<&std::path::Path>,
    model: Option<String>,
) -> Result<()> {
    let era = find_era(id)?;
    let mut config = ChronicleConfig::load_from_directories(Some(config_dir), global_dir)
        .context("Failed to load configuration")?;
    if let Some(model) = model {
        validate_model(&model).context("Invalid --model value")?;
        config.model = model;
    }
    let prompts = ChroniclePrompts::load(Some(config_dir), global_dir);

    println!("model: {}", config.model);
    println!();
    println!("[system]");
    println!("{}", prompts.system_instruction.trim_end());
    println!();
    println!("[user]");
    println!(
        "{}",
        prompts.render_user_message(era.name, era.localized_name, &config.language)
    );
    Ok(())
}
