use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use publish_to_git::cli::orchestration::{run_publish_workflow, PublishWorkflowArgs};
use publish_to_git::process::SystemRunner;
use publish_to_git::{telemetry, ui};

#[derive(clap::Parser)]
#[command(
    name = "publish-to-git",
    version,
    about = "Publish the build output of workspace projects to their own git repositories"
)]
struct Args {
    #[arg(long, help = "Prefixes commit messages")]
    commit_prefix: Option<String>,

    #[arg(short, long, help = "Run in debug mode: keep mirror repositories, full errors")]
    debug: bool,

    #[arg(short, long, help = "Only publish this package")]
    package: Option<String>,

    #[arg(long, overrides_with = "no_prod", help = "Build with --prod (default)")]
    prod: bool,

    #[arg(long = "no-prod", overrides_with = "prod", help = "Build without --prod")]
    no_prod: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = ".", help = "Workspace root")]
    workspace: PathBuf,
}

impl From<Args> for PublishWorkflowArgs {
    fn from(args: Args) -> Self {
        PublishWorkflowArgs {
            config_path: args.config,
            workspace: args.workspace,
            commit_prefix: args.commit_prefix,
            package: args.package,
            debug: args.debug,
            prod: args.prod || !args.no_prod,
        }
    }
}

fn main() {
    let args: PublishWorkflowArgs = Args::parse().into();

    telemetry::init_tracing(if args.debug { Level::DEBUG } else { Level::INFO });
    ui::display_banner();

    if args.debug {
        ui::display_status("Debug option: enabled");
    }

    if let Some(package) = &args.package {
        ui::display_status(&format!(
            "Single project selected for publishing: {}",
            package
        ));
    }

    match run_publish_workflow(&args, &SystemRunner) {
        Ok(results) => ui::display_results(&results),
        Err(e) => {
            ui::display_failure(&e, args.debug);
            std::process::exit(1);
        }
    }
}
