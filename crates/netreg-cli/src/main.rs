//! netreg CLI - inspect and edit agent-network registries
//!
//! Provides `netreg connectivity`, `netreg served`, `netreg toolbox`,
//! and `netreg set-instructions`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use similar::TextDiff;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use netreg_core::connectivity::extract_connectivity;
use netreg_core::manifest::served_networks;
use netreg_core::netreg_hocon::ScanOptions;
use netreg_core::toolbox::scan_toolbox;
use netreg_core::update::{render_update, update_instructions, DEFAULT_INSTRUCTIONS_FIELD};

#[derive(Parser)]
#[command(name = "netreg")]
#[command(about = "netreg - agent-network registry tools")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the agent call graph from a network file
    Connectivity {
        /// Network file to read
        file: PathBuf,

        /// Registries root for include resolution (defaults to the
        /// file's own directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Additional structural key to exclude from the graph
        #[arg(long, value_name = "KEY")]
        deny: Vec<String>,
    },
    /// List served, public networks across a registry's manifests
    Served {
        /// Registries root directory
        registries: PathBuf,
    },
    /// List coded tools declared in a toolbox file
    Toolbox {
        /// Toolbox file to read
        file: PathBuf,

        /// Additional structural key to exclude from the scan
        #[arg(long, value_name = "KEY")]
        deny: Vec<String>,
    },
    /// Replace an agent's triple-quoted instructions in place
    SetInstructions {
        /// Network file to edit
        file: PathBuf,

        /// Agent name (the block's `name` field value)
        agent: String,

        /// New instruction text
        #[arg(long, conflicts_with = "stdin")]
        text: Option<String>,

        /// Read the new instruction text from stdin
        #[arg(long)]
        stdin: bool,

        /// Field to replace
        #[arg(long, default_value = DEFAULT_INSTRUCTIONS_FIELD)]
        field: String,

        /// Preview the change as a diff without writing
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Connectivity { file, root, deny } => run_connectivity(&file, root.as_deref(), deny),
        Commands::Served { registries } => run_served(&registries),
        Commands::Toolbox { file, deny } => run_toolbox(&file, deny),
        Commands::SetInstructions {
            file,
            agent,
            text,
            stdin,
            field,
            dry_run,
        } => run_set_instructions(&file, &agent, text, stdin, &field, dry_run),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn scan_options(extra_deny: Vec<String>) -> ScanOptions {
    extra_deny
        .into_iter()
        .fold(ScanOptions::default(), ScanOptions::deny)
}

fn run_connectivity(
    file: &std::path::Path,
    root: Option<&std::path::Path>,
    deny: Vec<String>,
) -> Result<()> {
    let report = extract_connectivity(file, root, &scan_options(deny))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_served(registries: &std::path::Path) -> Result<()> {
    let served = served_networks(registries)?;
    println!("{}", serde_json::to_string_pretty(&served)?);
    Ok(())
}

fn run_toolbox(file: &std::path::Path, deny: Vec<String>) -> Result<()> {
    let tools = scan_toolbox(file, &scan_options(deny))?;
    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}

fn run_set_instructions(
    file: &std::path::Path,
    agent: &str,
    text: Option<String>,
    stdin: bool,
    field: &str,
    dry_run: bool,
) -> Result<()> {
    let new_value = match text {
        Some(text) => text,
        None if stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read new instructions from stdin")?;
            buf
        }
        None => bail!("provide the new instructions with --text or --stdin"),
    };

    if dry_run {
        let current = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let updated = render_update(file, agent, field, &new_value)?;
        let diff = TextDiff::from_lines(&current, &updated);
        print!(
            "{}",
            diff.unified_diff()
                .context_radius(3)
                .header("current", "updated")
        );
        println!("\nDry run - no changes made.");
        return Ok(());
    }

    let outcome = update_instructions(file, agent, field, &new_value)?;
    println!(
        "Updated '{}' for agent '{}' in {}",
        outcome.field,
        outcome.agent,
        outcome.path.display()
    );
    Ok(())
}
