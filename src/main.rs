use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use changesets::cli::{self, AddRequest, ResultCode};
use changesets::config::{ChangesetConfig, WorkflowPaths};
use changesets::domain::BumpLevel;
use changesets::{telemetry, ui, ChangesetError};

#[derive(Parser)]
#[command(
    name = "changeset",
    version,
    about = "Version and changelog management for monorepos with independently versioned modules"
)]
struct Args {
    #[arg(long, global = true, help = "Repository root (defaults to the current directory)")]
    root: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Show debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Set up the .changeset folder and a default config file
    Init,
    /// Record a pending change for one or more modules
    Add {
        #[arg(short = 'p', long = "module", required = true, help = "Changed module name")]
        modules: Vec<String>,

        #[arg(short, long, value_enum, help = "Semantic version bump")]
        bump: BumpArg,

        #[arg(short, long, help = "Changelog description")]
        message: String,
    },
    /// Show the pending changesets; fails when there are none
    Status,
    /// Apply pending changesets to module versions and changelogs
    Version {
        #[arg(long, help = "Preview the new versions without changing any file")]
        dry_run: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BumpArg {
    Patch,
    Minor,
    Major,
}

impl From<BumpArg> for BumpLevel {
    fn from(arg: BumpArg) -> Self {
        match arg {
            BumpArg::Patch => BumpLevel::Patch,
            BumpArg::Minor => BumpLevel::Minor,
            BumpArg::Major => BumpLevel::Major,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_tracing(args.verbose);

    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let paths = WorkflowPaths::from_root(root);

    let code = match run(args.command, &paths) {
        Ok(code) => code,
        Err(e) => {
            let code = ResultCode::for_error(&e);
            if code == ResultCode::NotInitialized {
                ui::display_not_initialized();
            } else {
                ui::display_error(&e.to_string());
            }
            code
        }
    };

    if code != ResultCode::Success {
        std::process::exit(code.code());
    }
    Ok(())
}

fn run(command: Command, paths: &WorkflowPaths) -> Result<ResultCode, ChangesetError> {
    match command {
        Command::Init => {
            let outcome = cli::run_init_workflow(paths)?;
            match outcome {
                cli::InitOutcome::Initialized => {
                    ui::display_success(
                        "A '.changeset' folder with a default config.toml has been created.",
                    );
                }
                cli::InitOutcome::ConfigFileWasGenerated => {
                    ui::display_status(
                        "The .changeset folder had no config file; the default config.toml was written.",
                    );
                }
                cli::InitOutcome::AlreadyInitialized => {
                    ui::display_status("Changesets are already initialized here.");
                }
            }
            Ok(outcome.result_code())
        }
        Command::Add {
            modules,
            bump,
            message,
        } => {
            let config = ChangesetConfig::load(&paths.config_file)?;
            let request = AddRequest {
                modules,
                bump: bump.into(),
                description: message,
            };
            let path = cli::run_add_workflow(paths, &config, &request)?;
            ui::display_success(&format!("Created changeset {}", path.display()));
            Ok(ResultCode::Success)
        }
        Command::Status => {
            ChangesetConfig::load(&paths.config_file)?;
            let report = cli::run_status_workflow(paths)?;
            ui::display_status_report(&report);
            Ok(report.result_code())
        }
        Command::Version { dry_run } => {
            let config = ChangesetConfig::load(&paths.config_file)?;
            let outcome = cli::run_version_workflow(paths, &config, dry_run)?;
            if outcome.consumed_changesets == 0 {
                ui::display_status("No unreleased changesets found, exiting.");
            } else {
                ui::display_version_outcome(&outcome);
            }
            Ok(outcome.result_code())
        }
    }
}
