use anyhow::Result;
use clap::Parser;

use semrel::config::load_config;
use semrel::dispatch::{BuildTarget, CommandBackend};
use semrel::engine::ConventionalEngine;
use semrel::orchestrator::{Orchestrator, RunRequest, RunState};
use semrel::policy::BranchPolicy;
use semrel::store::GitStore;
use semrel::ui;

#[derive(clap::Parser)]
#[command(
    name = "semrel",
    about = "Branch-aware semantic release orchestration: resolve, build, publish"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Branch to release from (defaults to current branch)")]
    branch: Option<String>,

    #[arg(long, help = "Forecast only: report the release decision without building or publishing")]
    forecast: bool,

    #[arg(short, long, help = "Skip confirmation prompts")]
    force: bool,

    #[arg(long, help = "Show configured branch rules and targets and exit")]
    list: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("semrel {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration; malformed config is fatal before anything runs
    let config = match load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    if args.list {
        let policy = BranchPolicy::from_config(&config.branches)?;
        ui::display_branch_rules(policy.rules());
        ui::display_targets(&BuildTarget::from_config(&config.targets));
        return Ok(());
    }

    let store = match GitStore::open(".") {
        Ok(store) => store,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let branch = match args.branch {
        Some(branch) => branch,
        None => store.current_branch()?,
    };

    let engine = ConventionalEngine::new(config.conventional_commits.clone());
    let backend = CommandBackend::new("dist");
    let orchestrator = Orchestrator::new(&config, &store, &backend, &engine)?;

    // Forecast first, in both modes: the report is what a PR check shows
    ui::display_status(&format!("Resolving release for branch '{}'...", branch));
    let forecast = orchestrator.run(&RunRequest {
        branch: branch.clone(),
        forecast: true,
    })?;

    for warning in &forecast.warnings {
        ui::display_boundary_warning(warning);
    }
    ui::display_forecast(&forecast.resolution);

    if args.forecast {
        return Ok(());
    }

    if !forecast.resolution.would_release {
        ui::display_status("Nothing to release.");
        return Ok(());
    }

    if !args.force
        && !ui::confirm_action(&format!(
            "Build and publish {}?",
            forecast.resolution.git_tag
        ))?
    {
        println!("Release cancelled by user.");
        return Ok(());
    }

    let report = match orchestrator.run(&RunRequest {
        branch,
        forecast: false,
    }) {
        Ok(report) => report,
        Err(e) if e.is_publish_conflict() => {
            // The release already exists; report a no-op, not a failure
            ui::display_status(&format!("Already published: {}", e));
            return Ok(());
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    ui::display_dispatch_summary(&report.dispatch);
    for warning in &report.warnings {
        ui::display_boundary_warning(warning);
    }

    match report.state {
        RunState::Done => {
            if let Some(release) = &report.release {
                ui::display_release(release);
            }
            ui::display_success("Release published.");
        }
        RunState::DegradedDone => {
            if let Some(release) = &report.release {
                ui::display_release(release);
            }
            ui::display_error(
                "Release exists but the changelog commit failed; commit the changelog entry manually.",
            );
            if let Some(reason) = &report.degraded {
                ui::display_status(reason);
            }
            std::process::exit(1);
        }
        RunState::Failed => {
            ui::display_error("One or more target builds failed; nothing was published.");
            std::process::exit(1);
        }
        // Skipped can still happen if the history changed between the
        // forecast and this run
        _ => ui::display_status("Nothing to release."),
    }

    Ok(())
}
