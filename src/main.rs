//! pgforge CLI
//!
//! Reads table definitions and writes the generated SQL and C# files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use pgforge::{GeneratorOptions, generate};

/// Extensions picked up when the input is a directory.
const DEFINITION_EXTENSIONS: &[&str] = &["tdl", "ele"];

/// Table definitions in, PostgreSQL DDL and C# data access out.
#[derive(Parser)]
#[command(name = "pgforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate SQL, record and repository files.
    Generate {
        /// A definition file, or a directory of `*.tdl` and `*.ele` files.
        input: PathBuf,

        /// Output directory.
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Generator options (TOML).
        #[arg(short, long, env = "PGFORGE_CONFIG")]
        config: Option<PathBuf>,

        /// Namespace for record classes, overrides the config file.
        #[arg(short, long)]
        namespace: Option<String>,
    },
}

/// Definition files in the order they are compiled.
fn input_files(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(input).with_context(|| format!("Failed to read {}", input.display()))? {
        let path = entry?.path();
        let is_definition = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| DEFINITION_EXTENSIONS.contains(&ext));
        if path.is_file() && is_definition {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), "wrote file");
    Ok(())
}

fn run_generate(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    namespace: Option<String>,
) -> anyhow::Result<()> {
    let mut options = match config {
        Some(path) => GeneratorOptions::load(path)?,
        None => GeneratorOptions::default(),
    };
    if let Some(ns) = namespace {
        options.class_namespace = ns;
    }

    let files = input_files(input)?;
    let mut sources = Vec::with_capacity(files.len());
    for file in &files {
        let text = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        sources.push(text);
    }

    let bundles = generate(&sources, &options)?;

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    for bundle in &bundles {
        write_file(&output.join(format!("{}.sql", bundle.object_name)), &bundle.sql.ddl)?;
        write_file(&output.join(format!("{}.cs", bundle.object_name)), &bundle.record.source)?;
        write_file(
            &output.join(format!("{}.cs", bundle.repository_name())),
            &bundle.repository.source,
        )?;
    }

    info!(
        "Generated {} table(s) from {} file(s) into {}",
        bundles.len(),
        files.len(),
        output.display()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            namespace,
        } => run_generate(&input, &output, config.as_deref(), namespace),
    }
}
