//! prettyresults CLI - pr command

use anyhow::Result;
use clap::{Parser, Subcommand};
use pr_export::DocumentFormat;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod cmd;
mod config;
mod util;

/// prettyresults - Browsable and printable analysis results
#[derive(Parser)]
#[command(name = "pr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Results directory (created if missing)
    #[arg(long, global = true, default_value = "results")]
    dir: PathBuf,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the results directory, its config and an empty snapshot
    Init,
    /// Print the result tree
    Tree,
    /// Show one result
    Show {
        /// Fully qualified result ID (e.g. root.region.bar)
        id: String,
    },
    /// Add a result under an existing container
    #[command(subcommand)]
    Add(AddCommands),
    /// Append a row to a table
    Row {
        /// Table result ID
        table: String,
        /// One value per column
        #[arg(required = true)]
        cells: Vec<String>,
    },
    /// Export results
    #[command(subcommand)]
    Export(ExportCommands),
    /// View and edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Shared arguments of every `add` subcommand
#[derive(clap::Args)]
struct Placement {
    /// Parent container ID (e.g. root)
    parent: String,
    /// New ID segment (no dots)
    segment: String,
    /// Display name
    name: String,
    /// Label as COLOR:TEXT (repeatable)
    #[arg(long = "label")]
    labels: Vec<String>,
}

impl Placement {
    fn as_placement(&self) -> cmd::add::Placement<'_> {
        cmd::add::Placement {
            parent: &self.parent,
            segment: &self.segment,
            name: &self.name,
            labels: &self.labels,
        }
    }
}

#[derive(Subcommand)]
enum AddCommands {
    /// Add a container
    Container {
        #[command(flatten)]
        at: Placement,
    },
    /// Add an empty table (fill it with `pr row`)
    Table {
        #[command(flatten)]
        at: Placement,
        /// Column headings, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        headings: Vec<String>,
        /// Text shown before the table
        #[arg(long)]
        pre: Option<String>,
        /// Text shown after the table
        #[arg(long)]
        post: Option<String>,
    },
    /// Add a Nombre/Valor table
    Keyvalue {
        #[command(flatten)]
        at: Placement,
        /// Pair as KEY=VALUE (repeatable)
        #[arg(long = "pair")]
        pairs: Vec<String>,
    },
    /// Add a figure from an image file
    Figure {
        #[command(flatten)]
        at: Placement,
        /// Encoded image to store
        #[arg(long)]
        image: PathBuf,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Browsable directory with a bundled viewer
    Web {
        /// Destination directory
        destination: PathBuf,
        /// Root result to export (repeatable; default: every top-level result)
        #[arg(long = "root")]
        roots: Vec<String>,
        /// Replace an existing destination
        #[arg(long)]
        overwrite: bool,
        /// Open the exported viewer in the default browser
        #[arg(long = "open")]
        open_browser: bool,
    },
    /// Single Word (.docx) or HTML document with embedded figures
    Doc {
        /// Output file
        output: PathBuf,
        /// Root result to export (repeatable; default: every top-level result)
        #[arg(long = "root")]
        roots: Vec<String>,
        /// docx or html (default: from the output extension, else docx)
        #[arg(long)]
        format: Option<DocumentFormat>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all values
    List,
    /// Print one value
    Get { key: String },
    /// Set one value
    Set { key: String, value: String },
    /// Print the config file path
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays clean
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let dir: &Path = &cli.dir;
    match cli.command {
        Commands::Init => cmd::init::run(dir),
        Commands::Tree => cmd::tree::run(dir),
        Commands::Show { id } => cmd::show::run(dir, &id),
        Commands::Add(add) => match add {
            AddCommands::Container { at } => cmd::add::container(dir, &at.as_placement()),
            AddCommands::Table { at, headings, pre, post } => {
                cmd::add::table(dir, &at.as_placement(), headings, pre, post)
            }
            AddCommands::Keyvalue { at, pairs } => cmd::add::keyvalue(dir, &at.as_placement(), &pairs),
            AddCommands::Figure { at, image } => cmd::add::figure(dir, &at.as_placement(), &image),
        },
        Commands::Row { table, cells } => cmd::row::run(dir, &table, cells),
        Commands::Export(export) => match export {
            ExportCommands::Web { destination, roots, overwrite, open_browser } => {
                cmd::export::web(dir, &destination, &roots, overwrite, open_browser)
            }
            ExportCommands::Doc { output, roots, format } => {
                cmd::export::doc(dir, &output, &roots, format)
            }
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list(dir),
            ConfigCommands::Get { key } => cmd::config::run_get(dir, &key),
            ConfigCommands::Set { key, value } => cmd::config::run_set(dir, &key, &value),
            ConfigCommands::Path => cmd::config::run_path(dir),
        },
    }
}
