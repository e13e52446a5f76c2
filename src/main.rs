use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use git_release::cli::orchestration::{self, ReleaseMode, WorkflowOptions, WorkflowResult};
use git_release::config::{self, NoBumpPolicy};
use git_release::git::Git2Repository;
use git_release::ui;

#[derive(Parser)]
#[command(
    name = "git-release",
    version,
    about = "Derive the next version and changelog from conventional commits"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Preview what would happen without writing any file"
    )]
    dry_run: bool,

    #[arg(long, global = true, help = "Release date (defaults to today, YYYY-MM-DD)")]
    date: Option<String>,

    #[arg(
        long,
        global = true,
        value_enum,
        help = "What to do when no commit qualifies for a bump"
    )]
    on_no_bump: Option<NoBumpPolicy>,

    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Repository directory holding the version and changelog files"
    )]
    repo: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bump the version and add a changelog section for commits since the latest tag
    Release {
        #[arg(long, help = "Also write the release notes to this file")]
        notes: Option<PathBuf>,
    },
    /// Bump the version only
    Bump,
    /// Write the changelog section for the latest existing tag
    Changelog {
        #[arg(long, help = "Also write the release notes to this file")]
        notes: Option<PathBuf>,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
    let mut options = WorkflowOptions::new(&args.repo, date, &config);
    if let Some(policy) = args.on_no_bump {
        options.on_no_bump = policy;
    }

    let repo = Git2Repository::open(&args.repo).context("Git repository error")?;

    let (result, notes) = match &args.command {
        Command::Release { notes } => (
            orchestration::plan_release(&repo, &config, &options, ReleaseMode::Release)?,
            notes.as_deref(),
        ),
        Command::Bump => (
            orchestration::plan_release(&repo, &config, &options, ReleaseMode::Bump)?,
            None,
        ),
        Command::Changelog { notes } => (
            orchestration::plan_changelog(&repo, &config, &options)?,
            notes.as_deref(),
        ),
    };

    report(&result);

    let plan = match result.plan {
        Some(plan) => plan,
        None => {
            ui::display_status("Nothing to release");
            return Ok(());
        }
    };

    ui::display_plan(&plan);
    if let Some(section) = &plan.section {
        ui::display_section(&section.section);
    }

    if args.dry_run {
        ui::display_status("Dry run: no files were written");
        return Ok(());
    }

    orchestration::persist(&plan, notes)?;
    if let Some(changelog) = &plan.changelog {
        ui::display_success(&format!("Updated {}", changelog.path.display()));
    }
    if let Some(manifest) = &plan.manifest {
        ui::display_success(&format!("Updated {}", manifest.path.display()));
        emit_version(&plan.next_version)?;
    }

    Ok(())
}

fn report(result: &WorkflowResult) {
    for warning in &result.warnings {
        ui::display_boundary_warning(warning);
    }

    if !result.commits.is_empty() {
        let headers: Vec<&str> = result.commits.iter().map(|c| c.header()).collect();
        ui::display_commit_analysis(&headers, &result.range);
    }
}

fn emit_version(version: &git_release::domain::Version) -> Result<()> {
    match orchestration::automation_output_path() {
        Some(path) => {
            orchestration::emit_next_version(&path, version)?;
            ui::display_success(&format!("Wrote new_version to {}", path.display()));
        }
        None => println!("New version: {}", version),
    }
    Ok(())
}
