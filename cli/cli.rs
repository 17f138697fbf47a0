mod cli_args;
mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::*;
use log;
use std::io;
use std::process;
use std::str::FromStr;

use clap_complete::{Shell, generate};
use cli_args::Cli;
use codepack_core::{AppError, OutputFormat, PackOptions, ProgressEvent};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);
    log::debug!("CLI args parsed: {:?}", cli_args);

    let quiet = cli_args.quiet;
    let exit_code = match run_app(cli_args) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let core_err = e.downcast_ref::<AppError>();
            let exit_code = match core_err {
                Some(AppError::InvalidPath(_)) => 2,
                Some(AppError::RestrictedPath(_)) => 2,
                Some(AppError::OutputTooLarge { .. }) => 3,
                Some(AppError::Io(_)) => 4,
                Some(AppError::FileRead { .. }) => 4,
                Some(AppError::FileWrite { .. }) => 4,
                Some(AppError::DirCreation { .. }) => 4,
                Some(AppError::Ignore(_)) => 4,
                Some(AppError::UnsupportedFormat(_)) => 5,
                Some(AppError::Glob(_)) => 5,
                Some(AppError::JsonSerialize(_)) => 6,
                Some(AppError::YamlSerialize(_)) => 6,
                Some(AppError::TomlSerialize(_)) => 6,
                Some(AppError::MsgPackSerialize(_)) => 6,
                Some(_) => 1,
                None => 1,
            };

            if !quiet || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli) -> Result<()> {
    if let Some(shell) = &cli.completions {
        print_completions(shell)?;
        return Ok(());
    }

    let format = OutputFormat::from_str(&cli.format)?;
    let options = PackOptions {
        source: cli.source,
        output: cli.output,
        exclude: cli.exclude,
        compact: cli.compact,
        smart: cli.smart,
        max_file_size_kb: cli.max_file_size,
        format,
        all_formats: cli.all_formats,
        dry_run: cli.dry_run,
        respect_gitignore: !cli.no_gitignore,
        ..PackOptions::default()
    };

    let verbose = cli.verbose;
    let progress = move |event: ProgressEvent| {
        if let ProgressEvent::FileProcessed { path } = &event
            && verbose >= 2
        {
            eprintln!("  {} {}", "·".dimmed(), path.dimmed());
        }
    };
    let sink: Option<&dyn Fn(ProgressEvent)> = if cli.quiet { None } else { Some(&progress) };

    let summary = codepack_core::run(&options, sink)?;
    output::print_summary(&summary, cli.quiet);
    Ok(())
}

fn print_completions(shell: &str) -> Result<()> {
    let shell_enum: Shell = match shell.to_lowercase().as_str() {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        other => anyhow::bail!("Unsupported shell for completion: {}", other),
    };
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();
    generate(shell_enum, &mut command, bin_name, &mut io::stdout());
    Ok(())
}
