use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use release_bump::cli::orchestration::{self, BumpWorkflowArgs, PushWorkflowArgs};
use release_bump::ui;

#[derive(Parser)]
#[command(
    name = "release-bump",
    about = "Promote the snapshot image of HEAD to a tagged release",
    version
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalOptions {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Log every external command")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Release HEAD with the next major, minor or patch version")]
    Bump {
        #[arg(help = "major, minor or patch [default: minor]")]
        level: Option<String>,
    },
    #[command(about = "Push the project image to a docker registry")]
    Push {
        #[arg(help = "Registry host, e.g. registry.example.com:5000")]
        registry: String,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Comma separated list of additional tags to push 'latest,prod'"
        )]
        additional_tags: Vec<String>,
    },
    #[command(about = "Print the project version")]
    Version,
    #[command(about = "Print the resolved configuration")]
    Config,
}

fn main() {
    if let Err(err) = try_main() {
        ui::display_error(&err.to_string());
        for (i, cause) in err.chain().skip(1).enumerate() {
            log::error!("  {}: {}", i.saturating_add(1), cause);
        }
        std::process::exit(1);
    }
}

/// User-facing lines go through `ui`; the log only adds detail on `-v`
fn log_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(cli.global.verbose)),
    )
    .init();

    let config_path = cli.global.config.as_deref();
    match cli.command {
        Commands::Bump { level } => {
            orchestration::run_bump_workflow(BumpWorkflowArgs {
                config_path: cli.global.config.clone(),
                level,
            })?;
        }
        Commands::Push {
            registry,
            additional_tags,
        } => {
            orchestration::run_push_workflow(PushWorkflowArgs {
                config_path: cli.global.config.clone(),
                registry,
                additional_tags,
            })?;
        }
        Commands::Version => {
            orchestration::run_version_workflow(config_path)?;
        }
        Commands::Config => {
            orchestration::run_config_workflow(config_path)?;
        }
    }

    Ok(())
}
