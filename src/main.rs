use anyhow::{Context, Result};
use benchcheck::checker::Checker;
use benchcheck::cli::{Cli, OutputFormat};
use benchcheck::config::BenchcheckConfig;
use benchcheck::report::{all_passed, render_json, render_text};
use benchcheck::runner::{stat_module, CommandRunner, LocalFetcher, StatRequest};
use benchcheck::stat::{stat, StatConfig, StatResult};
use clap::Parser;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// File settings with command line overrides applied
fn stat_config(args: &Cli, file: &StatConfig) -> StatConfig {
    let mut config = file.clone();
    if let Some(alpha) = args.alpha {
        config.significance_level = alpha;
    }
    if let Some(center) = args.center {
        config.center = center;
    }
    if args.keep_outliers {
        config.remove_outliers = false;
    }
    config
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read benchmark output {}", path.display()))?;
    Ok(content.lines().map(str::to_string).collect())
}

fn compare(args: &Cli, file_config: &BenchcheckConfig, config: &StatConfig) -> Result<Vec<StatResult>> {
    if let (Some(old), Some(new)) = (&args.old_file, &args.new_file) {
        let old_lines = read_lines(old)?;
        let new_lines = read_lines(new)?;
        return Ok(stat(&old_lines, &new_lines, config)?);
    }

    let (Some(old), Some(new)) = (&args.old, &args.new) else {
        anyhow::bail!(
            "Must specify either --old-file/--new-file or --old/--new. \
             Usage: benchcheck --old-file OLD --new-file NEW or benchcheck --old REV --new REV [-- COMMAND...]"
        );
    };

    let command = match &args.command {
        Some(command) if !command.is_empty() => command.clone(),
        _ => file_config.run.command.clone(),
    };
    let runner = match command.split_first() {
        Some((program, rest)) => CommandRunner::new(program.clone(), rest.to_vec()),
        None => CommandRunner::go_test(),
    };

    let request = StatRequest {
        module: args.module.clone(),
        old: old.clone(),
        new: new.clone(),
        pattern: args.bench.clone().unwrap_or_else(|| file_config.run.pattern.clone()),
        count: args.count.unwrap_or(file_config.run.count),
    };
    let fetcher = LocalFetcher::new(args.root.clone());

    Ok(stat_module(&fetcher, &runner, &request, config)?)
}

/// Returns whether every check passed
fn run(args: Cli) -> Result<bool> {
    let file_config = match &args.config {
        Some(path) => BenchcheckConfig::from_file(path)?,
        None => BenchcheckConfig::default(),
    };
    let config = stat_config(&args, &file_config.stat);
    let checks: Vec<Checker> = if args.checks.is_empty() {
        file_config.checkers()?
    } else {
        args.checks.clone()
    };

    let results = compare(&args, &file_config, &config)?;

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&results, &checks)),
        OutputFormat::Json => println!("{}", render_json(&results, &checks)?),
    }

    Ok(all_passed(&results, &checks))
}

fn main() -> ExitCode {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            match err.downcast_ref::<benchcheck::Error>() {
                Some(benchcheck::Error::Command(cmd)) => {
                    eprintln!("failed to run: {}", cmd.cmd);
                    eprintln!("error: {}", cmd.source);
                    eprintln!("cmd output: {}", cmd.output);
                }
                _ => eprintln!("Error: {:#}", err),
            }
            ExitCode::from(2)
        }
    }
}
