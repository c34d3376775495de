//! tablegen command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Generate TypeScript repositories and validators
//! tablegen generate schema.json -o src/schema.ts
//!
//! # Validators only, as JavaScript
//! tablegen validators schema.json -l js
//!
//! # Diff two schema snapshots
//! tablegen diff old.json new.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use tablegen::migrate::ChangeKind;
use tablegen::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tablegen")]
#[command(version)]
#[command(about = "Compile table schemas into typed repositories, validators and migration diffs", long_about = None)]
#[command(after_help = "EXAMPLES:
    tablegen generate schema.json -o src/schema.ts
    tablegen generate schema.json -l javascript --no-validators
    tablegen diff old.json new.json --format json
    tablegen ops migration.json")]
struct Cli {
    /// Verbose logging (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DiffFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate repositories (and validators) from a schema
    Generate {
        /// Schema file (defaults to `schema` from tablegen.toml)
        schema: Option<PathBuf>,
        /// Output language: typescript or javascript
        #[arg(short, long, env = "TABLEGEN_LANGUAGE")]
        language: Option<String>,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the zod validator block
        #[arg(long)]
        no_validators: bool,
    },
    /// Emit only the validator module
    Validators {
        schema: Option<PathBuf>,
        #[arg(short, long, env = "TABLEGEN_LANGUAGE")]
        language: Option<String>,
    },
    /// Load and index a schema, reporting problems
    Check { schema: PathBuf },
    /// Show the migration between two schema snapshots
    Diff {
        old: PathBuf,
        new: PathBuf,
        #[arg(short, long, value_enum, default_value = "text")]
        format: DiffFormat,
    },
    /// Format an explicit JSON list of migration operations
    Ops { file: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "tablegen=info",
        _ => "tablegen=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            schema,
            language,
            output,
            no_validators,
        } => {
            let config =
                TablegenConfig::load()?.merge_cli(schema, language, output, no_validators);
            generate(&config)
        }
        Commands::Validators { schema, language } => {
            let config = TablegenConfig::load()?.merge_cli(schema, language, None, false);
            let schema = read_schema(schema_path(&config)?)?;
            print!("{}", generate_validators(&schema, config.language()?)?);
            Ok(())
        }
        Commands::Check { schema } => check(&schema),
        Commands::Diff { old, new, format } => diff(&old, &new, format),
        Commands::Ops { file } => ops(&file),
    }
}

fn schema_path(config: &TablegenConfig) -> Result<&Path> {
    config
        .schema
        .as_deref()
        .context("No schema given. Pass a path or set `schema` in tablegen.toml")
}

fn read_schema(path: &Path) -> Result<Schema> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file '{}'", path.display()))?;
    Schema::from_json(&content).with_context(|| format!("Invalid schema '{}'", path.display()))
}

fn generate(config: &TablegenConfig) -> Result<()> {
    let schema = read_schema(schema_path(config)?)?;
    let file = config.compiler()?.compile(&schema)?;

    match &config.codegen.output {
        Some(path) => {
            fs::write(path, &file.content)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            println!(
                "{} {} ({} tables)",
                "✓ Generated".green().bold(),
                path.display().to_string().yellow(),
                schema.tables.len()
            );
        }
        None => print!("{}", file.content),
    }
    Ok(())
}

fn check(path: &Path) -> Result<()> {
    println!(
        "{} {}",
        "Checking schema:".cyan().bold(),
        path.display().to_string().yellow()
    );
    let schema = read_schema(path)?;
    let index = SchemaIndex::build(&schema)?;

    let columns: usize = schema.tables.iter().map(|t| t.columns.len()).sum();
    println!("{}", "✓ Schema is valid".green().bold());
    println!("  Tables: {}", schema.tables.len());
    println!("  Columns: {}", columns);

    let unknown: Vec<String> = schema
        .tables
        .iter()
        .flat_map(|t| {
            t.columns
                .iter()
                .filter(|c| !c.column_type.is_known())
                .map(move |c| format!("{}.{} ({})", t.name, c.name, c.column_type))
        })
        .collect();
    for col in &unknown {
        println!("  {} unknown type, emitted as unknown: {}", "⚠".yellow(), col);
    }

    for link in index.unresolved_links() {
        let target = link.target.as_deref().unwrap_or("<none>");
        println!(
            "  {} {}.{} links to missing table '{}'",
            "⚠".yellow(),
            link.table,
            link.column,
            target
        );
    }
    Ok(())
}

fn diff(old_path: &Path, new_path: &Path, format: DiffFormat) -> Result<()> {
    let old = read_schema(old_path)?;
    let new = read_schema(new_path)?;
    let ops = plan_migration(&old, &new)?;

    match format {
        DiffFormat::Json => println!("{}", serde_json::to_string_pretty(&ops)?),
        DiffFormat::Text => print_diff(&ops),
    }
    Ok(())
}

fn ops(path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read operations file '{}'", path.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in '{}'", path.display()))?;
    let ops = decode_operations(&raw)?;
    print_diff(&ops);
    Ok(())
}

fn print_diff(ops: &[MigrationOp]) {
    if ops.is_empty() {
        println!("{}", "No changes".dimmed());
        return;
    }
    for op in ops {
        let line = op.to_string();
        let line = match op.kind() {
            ChangeKind::Added => line.green(),
            ChangeKind::Removed => line.red(),
            ChangeKind::Renamed => line.yellow(),
        };
        println!("{}", line);
    }
    println!();
    println!("{}", DiffSummary::from_ops(ops).to_string().dimmed());
}
