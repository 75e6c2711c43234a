//! Parkproto CLI
//!
//! Command-line interface for:
//! - Inspecting schema tables (parent lookup, type paths, config dumps)
//! - Converting span-table CSV exports into tariff documents
//! - Printing skeleton and default sub-documents

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use parkproto_document::{
    create_location_base, create_object_base, create_occupancy_base, create_tariff_base,
    get_default, Node,
};
use parkproto_ingest_csv::{convert_span_rates, read_rows, SpanColumns};
use parkproto_schema::SchemaTable;
use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parkproto")]
#[command(author, version, about = "Parking protocol document tooling")]
struct Cli {
    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query a schema table.
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },

    /// Convert source exports into protocol documents.
    Convert {
        #[command(subcommand)]
        command: ConvertCommands,
    },

    /// Print the default sub-document of a schedule type
    Default {
        /// `activeSchedule` or `validSchedule`
        type_name: String,
    },

    /// Print the skeleton node of a type
    Skeleton {
        type_name: String,
        /// Identity to place on `<type>Id`
        #[arg(long)]
        id: Option<String>,
        /// Location id for tariff and occupancy roots
        #[arg(long, default_value = "-1")]
        location: String,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Type owning a tag
    Parent {
        tag: String,
        /// JSON schema config (default: built-in table)
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Chain of types down to a type
    Path {
        to: String,
        /// Start type (default: the topmost ancestor)
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Print a schema table as JSON config
    Dump {
        #[arg(long)]
        schema: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConvertCommands {
    /// Span table (`gebuehrenmodell;intervall_von;...`) -> `{"tariffs": [...]}`
    SpanRates {
        /// Input CSV file
        input: PathBuf,
        /// Output JSON file
        #[arg(short, long)]
        out: PathBuf,
        /// Field delimiter (default: `;` if the header has one, else `,`)
        #[arg(long)]
        delimiter: Option<char>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Schema { command } => cmd_schema(command),
        Commands::Convert { command } => match command {
            ConvertCommands::SpanRates {
                input,
                out,
                delimiter,
            } => cmd_span_rates(&input, &out, delimiter),
        },
        Commands::Default { type_name } => cmd_default(&type_name),
        Commands::Skeleton {
            type_name,
            id,
            location,
        } => cmd_skeleton(&type_name, id.as_deref(), &location),
    }
}

enum LoadedSchema {
    Builtin(&'static SchemaTable),
    Loaded(SchemaTable),
}

impl LoadedSchema {
    fn open(path: Option<&Path>) -> Result<Self> {
        Ok(match path {
            Some(path) => {
                debug!(path = %path.display(), "loading schema config");
                Self::Loaded(SchemaTable::from_path(path)?)
            }
            None => Self::Builtin(SchemaTable::builtin()),
        })
    }

    fn table(&self) -> &SchemaTable {
        match self {
            Self::Builtin(table) => table,
            Self::Loaded(table) => table,
        }
    }
}

fn cmd_schema(command: SchemaCommands) -> Result<()> {
    match command {
        SchemaCommands::Parent { tag, schema } => {
            let schema = LoadedSchema::open(schema.as_deref())?;
            let parent = schema.table().require_parent(&tag)?;
            println!("{parent}");
        }
        SchemaCommands::Path { to, from, schema } => {
            let schema = LoadedSchema::open(schema.as_deref())?;
            let path = schema.table().path(from.as_deref(), &to)?;
            println!("{}", path.join(" -> "));
        }
        SchemaCommands::Dump { schema } => {
            let schema = LoadedSchema::open(schema.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&schema.table().to_config())?);
        }
    }
    Ok(())
}

fn cmd_span_rates(input: &Path, out: &Path, delimiter: Option<char>) -> Result<()> {
    eprintln!(
        "{} span rates {}",
        "Converting".green().bold(),
        input.display()
    );

    let rows = read_rows(input, delimiter)?;
    let tariffs = convert_span_rates(SchemaTable::builtin(), &rows, &SpanColumns::default())?;
    let count = tariffs.len();
    let document = json!({ "tariffs": tariffs });

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(out, serde_json::to_string_pretty(&document)?)?;
    eprintln!("  {} {}", "→".cyan(), out.display());
    eprintln!("  {} {} rows, {} tariffs", "→".yellow(), rows.len(), count);
    Ok(())
}

fn print_node(node: Node) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&Value::Object(node))?);
    Ok(())
}

fn cmd_default(type_name: &str) -> Result<()> {
    match type_name {
        "activeSchedule" | "validSchedule" => print_node(get_default(type_name)),
        other => Err(anyhow!(
            "no default sub-document for `{other}` (expected activeSchedule or validSchedule)"
        )),
    }
}

fn cmd_skeleton(type_name: &str, id: Option<&str>, location: &str) -> Result<()> {
    if !SchemaTable::builtin().contains_type(type_name) {
        bail!("unknown type `{type_name}`");
    }
    let node = match type_name {
        "tariff" => create_tariff_base(id, location),
        "location" => create_location_base(id, None, None),
        "occupancy" => create_occupancy_base(location),
        other => create_object_base(other, id),
    };
    print_node(node)
}
