//! Testbench generator CLI.
//!
//! This binary generates one testbench and run script per YAML test spec. It performs:
//! 1. **Setup:** Parses arguments, installs logging, and creates the output directory.
//! 2. **Generation:** Runs load, assemble, synthesize, and render for each spec in order.
//! 3. **Reporting:** Prints a diagnostic and exits with status 1 on the first failure.

use std::path::{Path, PathBuf};
use std::{env, fs, process};

use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tbgen_core::config::TemplateConfig;
use tbgen_core::{Config, Generator};

#[derive(Parser, Debug)]
#[command(
    name = "testgen",
    author,
    version,
    about = "Generate simulation testbenches from YAML test specifications",
    long_about = "Assemble each spec's programs, turn them into cycle-stamped from_cpu stimulus, and fill the testbench and run-script templates.\n\nExamples:\n  testgen -o build/tests tests/conv.yaml\n  testgen --outdir out --stats tests/*.yaml"
)]
struct Cli {
    /// Directory the generated files are written to.
    #[arg(short = 'o', long = "outdir")]
    outdir: PathBuf,

    /// JSON generator configuration (templates, output naming, assembler invocation).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Testbench template; defaults to `tmpl_tb` beside the executable.
    #[arg(long)]
    tb_template: Option<PathBuf>,

    /// Run-script template; defaults to `tmpl_script` beside the executable.
    #[arg(long)]
    script_template: Option<PathBuf>,

    /// Print generation statistics after all specs are processed.
    #[arg(long)]
    stats: bool,

    /// Verbosity level (repeat for more).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Test specification files, processed in order.
    #[arg(required = true)]
    specs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> tbgen_core::Result<()> {
    let config = resolve_config(cli)?;

    fs::create_dir_all(&cli.outdir).map_err(|e| {
        tbgen_core::Error::io("can't create output directory", &cli.outdir, e)
    })?;

    let mut generator = Generator::new(config, &cli.outdir)?;
    for spec in &cli.specs {
        let report = generator.run(spec)?;
        info!(
            module = %report.module,
            programs = report.sources.len(),
            final_cycle = report.final_cycle,
            "done"
        );
    }

    if cli.stats {
        generator.stats().print();
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> tbgen_core::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::from_json_file(path)?;
            // Relative template paths in a config file are relative to that file.
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            config.templates.testbench = base.join(&config.templates.testbench);
            config.templates.script = base.join(&config.templates.script);
            config
        }
        None => Config {
            templates: TemplateConfig::beside(&executable_dir()),
            ..Config::default()
        },
    };
    if let Some(path) = &cli.tb_template {
        config.templates.testbench.clone_from(path);
    }
    if let Some(path) = &cli.script_template {
        config.templates.script.clone_from(path);
    }
    Ok(config)
}

/// Directory holding the running executable; templates ship beside it.
fn executable_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
