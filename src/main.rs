use anyhow::Result;
use clap::{Parser, Subcommand};

use git_parts::boundary::BoundaryWarning;
use git_parts::check::{self, CheckOptions, CommandVerifier};
use git_parts::config::{self, Config};
use git_parts::git::Git2Repository;
use git_parts::split::{self, SplitOptions};
use git_parts::{logging, ui, GitPartsError};

#[derive(Parser)]
#[command(
    name = "git-parts",
    version,
    about = "Split a tutorial's commit history into per-part branches and check every step"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Force-create and force-push a branch per commit plus chapter start markers
    Split {
        #[arg(short, long, help = "Remote to push branches to")]
        remote: Option<String>,

        #[arg(short, long, help = "Number of <prefix><i>.0 start markers")]
        markers: Option<u32>,

        #[arg(short, long, help = "Prefix of every branch name")]
        prefix: Option<String>,

        #[arg(long, help = "Create branches locally without pushing")]
        no_push: bool,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,

        #[arg(short, long, help = "Skip confirmation prompts")]
        force: bool,
    },

    /// Check out every commit after the first and run a build check
    Check {
        #[arg(long, help = "Also check the oldest commit")]
        include_first: bool,

        #[arg(last = true, help = "Check command (default from config: cargo check)")]
        command: Vec<String>,
    },
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        let code = e
            .downcast_ref::<GitPartsError>()
            .map(GitPartsError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;
    let repo = Git2Repository::open(".")?;

    match args.command {
        Commands::Split {
            remote,
            markers,
            prefix,
            no_push,
            dry_run,
            force,
        } => {
            let mut options = SplitOptions::from(&config.split);
            if let Some(remote) = remote {
                options.remote = remote;
            }
            if let Some(markers) = markers {
                options.markers = markers;
            }
            if let Some(prefix) = prefix {
                options.prefix = prefix;
            }
            if no_push {
                options.push = false;
            }
            run_split(&repo, &options, dry_run, force)
        }
        Commands::Check {
            include_first,
            command,
        } => run_check(&repo, &config, include_first, &command),
    }
}

fn run_split(
    repo: &Git2Repository,
    options: &SplitOptions,
    dry_run: bool,
    force: bool,
) -> Result<()> {
    let plan = split::plan_split(repo, &options.prefix)?;
    if plan.is_empty() {
        ui::display_boundary_warning(&BoundaryWarning::EmptyHistory);
        return Ok(());
    }

    ui::display_split_plan(&plan);
    let markers = split::plan_markers(repo, &plan, options)?;

    if dry_run {
        ui::display_status("Dry run:");
        for marker in &markers {
            ui::display_success(&format!(
                "  {} would point one commit before {} ({})",
                marker.name,
                marker.anchor,
                &marker.oid.to_string()[..7]
            ));
        }
        if options.push {
            ui::display_success(&format!(
                "  {} branch(es) would be force-pushed to {}",
                plan.branches.len() + markers.len(),
                options.remote
            ));
        }
        return Ok(());
    }

    if options.push
        && !force
        && !ui::confirm_force_push(plan.branches.len() + markers.len(), &options.remote)?
    {
        println!("Operation cancelled by user.");
        return Ok(());
    }

    let report = split::run_split(repo, &plan, options)?;
    if !report.pushed {
        ui::display_boundary_warning(&BoundaryWarning::PushSkipped {
            remote: options.remote.clone(),
        });
    }
    ui::display_split_summary(&report, &options.remote);

    Ok(())
}

fn run_check(
    repo: &Git2Repository,
    config: &Config,
    include_first: bool,
    command: &[String],
) -> Result<()> {
    let argv = if command.is_empty() {
        config.check.command.as_slice()
    } else {
        command
    };
    let verifier = CommandVerifier::from_argv(argv)?;

    let mut options = CheckOptions::from(&config.check);
    if include_first {
        options.skip_first = false;
    }

    ui::display_status(&format!("Checking commits with '{}'", verifier.display()));
    let report = check::run_check(repo, &verifier, &options)?;

    match report.last() {
        Some(last) => {
            ui::display_check_summary(&report);
            ui::display_boundary_warning(&BoundaryWarning::DetachedHead {
                commit_hash: last.oid.to_string(),
            });
        }
        None => ui::display_boundary_warning(&BoundaryWarning::NothingToCheck {
            total_commits: report.total_commits,
        }),
    }

    Ok(())
}
