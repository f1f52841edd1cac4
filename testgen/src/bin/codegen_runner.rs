//! Test code generation runner
//!
//! Reads a JSON bundle (model, execution tree, optional options) and writes
//! the generated test suite.
//!
//! Usage:
//!   cargo run -p mbt-testgen --bin codegen-runner -- --model <FILE> [OPTIONS]
//!
//! Options:
//!   --model <FILE>      JSON bundle with "model", "tree" and optional "options"
//!   --options <FILE>    JSON generation options (overrides the bundle's)
//!   --output <PATH>     Suite file path; its stem names the suite (default: generated/TestSuite)
//!   --language <LANG>   Target language (java, csharp, cpp, python, vb, c, html, kbt,
//!                       rpc, selenium_driver, uft)
//!   --separate          One file per test plus an index file
//!   --eager             Compute every node's code before rendering
//!   --verbose           Debug logging (RUST_LOG takes precedence)
//!   --help              Print this help

use mbt_testgen::{CodeGenerator, GenerationOptions, ModelBundle, TargetLanguage};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: codegen-runner --model <FILE> [OPTIONS]

Options:
  --model <FILE>      JSON bundle with \"model\", \"tree\" and optional \"options\"
  --options <FILE>    JSON generation options (overrides the bundle's)
  --output <PATH>     Suite file path; its stem names the suite (default: generated/TestSuite)
  --language <LANG>   Target language
  --separate          One file per test plus an index file
  --eager             Compute every node's code before rendering
  --verbose           Debug logging
  --help              Print this help";

#[derive(Debug)]
struct RunConfig {
    model: Option<PathBuf>,
    options: Option<PathBuf>,
    output: PathBuf,
    language: Option<TargetLanguage>,
    separate: bool,
    eager: bool,
    verbose: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<RunConfig, String> {
    let mut config = RunConfig {
        model: None,
        options: None,
        output: PathBuf::from("generated/TestSuite"),
        language: None,
        separate: false,
        eager: false,
        verbose: false,
        help: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--model" => {
                i += 1;
                config.model = Some(PathBuf::from(value_of(args, i, "--model")?));
            }
            "--options" => {
                i += 1;
                config.options = Some(PathBuf::from(value_of(args, i, "--options")?));
            }
            "--output" => {
                i += 1;
                config.output = PathBuf::from(value_of(args, i, "--output")?);
            }
            "--language" => {
                i += 1;
                config.language = Some(value_of(args, i, "--language")?.parse()?);
            }
            "--separate" => config.separate = true,
            "--eager" => config.eager = true,
            "--verbose" => config.verbose = true,
            "--help" | "-h" => config.help = true,
            other => return Err(format!("unknown argument '{other}'")),
        }
        i += 1;
    }
    Ok(config)
}

fn value_of<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} needs a value"))
}

fn run(config: &RunConfig) -> Result<(), String> {
    let model_path = config.model.as_ref().ok_or("--model is required")?;
    let text = fs::read_to_string(model_path)
        .map_err(|e| format!("cannot read {}: {e}", model_path.display()))?;
    let (index, mut tree, bundled) = ModelBundle::from_json(&text)
        .and_then(ModelBundle::into_parts)
        .map_err(|e| format!("{}: {e}", model_path.display()))?;

    let mut options = match &config.options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            serde_json::from_str::<GenerationOptions>(&text)
                .map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => bundled.unwrap_or_default(),
    };
    if let Some(language) = config.language {
        options.language = language;
    }
    options.separate_test_files |= config.separate;
    options.eager |= config.eager;

    info!(
        system = index.system_name(),
        transitions = index.transition_count(),
        nodes = tree.len(),
        "loaded model bundle"
    );

    let mut generator = CodeGenerator::new(&index, &options);
    let written = generator.save(&mut tree, &config.output).map_err(|e| e.to_string())?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    if config.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let default_level = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}
