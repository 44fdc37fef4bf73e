use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;

use tileset_export_core::config::Config;
use tileset_export_core::{
    CategoryTable, ExportEvent, ExportOptions, ExportReport, Exporter, Result, StalePolicy,
    TilesetError,
};

mod args;
use args::{Cli, Commands, ConfigAction, Shell};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else if cli.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    let base_dir = resolve_base_dir(cli.base_dir);

    let result = match cli.command {
        Some(Commands::Export {
            items,
            output_dir,
            dry_run,
            prune,
            create_dir,
        }) => handle_export(
            &base_dir,
            items,
            output_dir,
            dry_run,
            prune,
            create_dir,
            verbosity,
        ),
        Some(Commands::Categories) => {
            handle_categories();
            Ok(())
        }
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "tileset-export", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("TILESET_EXPORT_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".tileset-export"))
        .unwrap_or_else(|| PathBuf::from(".tileset-export"))
}

/// Priority: CLI options (and their env vars) > config file > defaults
fn handle_export(
    base_dir: &Path,
    items: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    dry_run: bool,
    prune: bool,
    create_dir: bool,
    verbosity: Verbosity,
) -> Result<()> {
    let config = Config::load(base_dir)?;

    let items = items.unwrap_or_else(|| config.paths.items.clone());
    let output_dir = output_dir.unwrap_or_else(|| config.paths.output_dir.clone());

    let mut options = config.to_export_options();
    options.dry_run = dry_run;
    if prune {
        options.stale_policy = StalePolicy::Remove;
    }
    if create_dir {
        options.create_output_dir = true;
    }

    if verbosity >= Verbosity::Verbose {
        print_settings(base_dir, &items, &output_dir, &options);
    }

    let on_event = |event: &ExportEvent| print_event(event, dry_run, verbosity);

    let report = Exporter::builtin(options).run(&items, &output_dir, Some(&on_event))?;

    if verbosity >= Verbosity::Verbose {
        print_summary(&report);
    }

    Ok(())
}

fn print_settings(base_dir: &Path, items: &Path, output_dir: &Path, options: &ExportOptions) {
    println!();
    println!("Config: {}", Config::path(base_dir).display());
    println!("Items: {}", items.display());
    println!("Output: {}", output_dir.display());
    if options.dry_run {
        println!("{}", "(dry run)".yellow());
    }
    if options.stale_policy == StalePolicy::Remove {
        println!("{}", "(prune stale tilesets)".yellow());
    }
    println!();
}

fn print_event(event: &ExportEvent, dry_run: bool, verbosity: Verbosity) {
    if let Some(line) = event_line(event, dry_run, verbosity) {
        println!("{}", line);
    }
}

fn event_line(event: &ExportEvent, dry_run: bool, verbosity: Verbosity) -> Option<String> {
    if verbosity == Verbosity::Quiet {
        return None;
    }

    let line = match event {
        ExportEvent::Parsing { path } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            format!("Parsing {}...", name)
        }
        ExportEvent::Parsed {
            items,
            unclassified,
        } => {
            if verbosity < Verbosity::Verbose {
                return None;
            }
            format!(
                "  {} items read, {} without a known category",
                items, unclassified
            )
        }
        ExportEvent::Writing { filename, count } => {
            if dry_run {
                format!(
                    "  {} Writing {} items to {}...",
                    "[DRY-RUN]".cyan(),
                    count,
                    filename.cyan()
                )
            } else {
                format!("  Writing {} items to {}...", count, filename.cyan())
            }
        }
        ExportEvent::NoItems { category } => {
            format!("  {} No items found for {}", "[SKIP]".yellow(), category)
        }
        ExportEvent::Stale { path } => format!(
            "  {} {} is left from a previous run (use --prune to remove)",
            "[STALE]".yellow().bold(),
            path.display()
        ),
        ExportEvent::Pruned { path } => format!("  {} {}", "[PRUNED]".red(), path.display()),
        ExportEvent::Done => format!("{}", "Done.".green()),
    };

    Some(line)
}

fn print_summary(report: &ExportReport) {
    println!();
    println!("Summary:");
    println!("  Items: {}", report.items);
    println!("  Unclassified: {}", report.unclassified);
    println!("  Tilesets written: {}", report.written.len());
    println!("  Empty categories: {}", report.skipped.len());
    if !report.stale.is_empty() {
        println!("  Stale: {}", report.stale.len());
    }
    if !report.pruned.is_empty() {
        println!("  Pruned: {}", report.pruned.len());
    }
    if report.dry_run {
        println!();
        println!("{}", "Dry run: no files were changed.".yellow());
    }
}

fn handle_categories() {
    let table = CategoryTable::builtin();
    println!();
    for rule in table.rules() {
        println!(
            "  {:<22} {:<26} {}",
            rule.key.cyan(),
            rule.filename,
            rule.display_name.dimmed()
        );
    }
    println!();
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(TilesetError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
