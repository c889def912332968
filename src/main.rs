use clap::{Parser, Subcommand};
use logic_proof_trainer_lib::{validate, parse_proof, ProofLineInput, TheoremInput};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "propbench")]
#[command(about = "PropBench — LLM benchmark for propositional logic proof efficiency")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a proof against a theorem
    Validate {
        /// Path to theorem JSON file (single theorem object)
        #[arg(long)]
        theorem: PathBuf,

        /// Path to proof JSON file (array of proof lines)
        #[arg(long)]
        proof: PathBuf,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,

        /// Log level, overrides RUST_LOG when set
        #[arg(long)]
        log_level: Option<String>,
    },

    /// Recover a structured proof from free-form LLM text
    Parse {
        /// Path to theorem JSON file (single theorem object)
        #[arg(long)]
        theorem: PathBuf,

        /// Path to a text file containing the raw proof submission
        #[arg(long)]
        input: PathBuf,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,

        /// Log level, overrides RUST_LOG when set
        #[arg(long)]
        log_level: Option<String>,
    },

    /// Generate a benchmark theorem set (not part of this build)
    Generate {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        _args: Vec<String>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] logic_proof_trainer_lib::error::CoreError),
}

fn init_tracing(log_level: &Option<String>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level.clone()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn read_theorem(path: &PathBuf) -> Result<TheoremInput, CliError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

fn cmd_validate(theorem_path: &PathBuf, proof_path: &PathBuf, pretty: bool) -> Result<(), CliError> {
    let theorem = read_theorem(theorem_path)?;
    let proof_raw = fs::read_to_string(proof_path)?;
    let lines: Vec<ProofLineInput> = serde_json::from_str(&proof_raw)?;

    let result = validate(&theorem, &lines);
    print_json(&result, pretty)
}

fn cmd_parse(theorem_path: &PathBuf, input_path: &PathBuf, pretty: bool) -> Result<(), CliError> {
    let theorem = read_theorem(theorem_path)?;
    let text = fs::read_to_string(input_path)?;

    let result = parse_proof(&text, &theorem);
    print_json(&result, pretty)
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Validate { theorem, proof, pretty, log_level } => {
            init_tracing(log_level);
            cmd_validate(theorem, proof, *pretty)
        }
        Commands::Parse { theorem, input, pretty, log_level } => {
            init_tracing(log_level);
            cmd_parse(theorem, input, *pretty)
        }
        Commands::Generate { .. } => {
            eprintln!("generate is not part of this build");
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
