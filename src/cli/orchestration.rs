//! Main workflow orchestration logic
//!
//! Wires configuration, project context and the git/docker backends into
//! the `bump`, `push`, `version` and `config` commands. Keeps CLI argument parsing
//! in main.rs and lets the workflows run against any backend.

use crate::analyzer::SnapshotResolver;
use crate::boundary::BoundaryWarning;
use crate::config::{self, Config};
use crate::context::ProjectContext;
use crate::domain::BumpLevel;
use crate::error::Result;
use crate::exec::{CommandRunner, SystemRunner};
use crate::git::{GitCli, Repository};
use crate::domain::ArtifactRef;
use crate::image::{DockerCli, ImageStore};
use crate::push::{push_tags, RegistryPush};
use crate::release::{BumpOutcome, ReleaseBump, ReleaseSettings};
use crate::ui;

/// Arguments for the bump workflow
///
/// Mirrors the CLI arguments without depending on clap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BumpWorkflowArgs {
    /// Path to custom config file
    pub config_path: Option<String>,

    /// `major`, `minor` or `patch`; minor when absent
    pub level: Option<String>,
}

/// Result of a bump workflow that did not fail
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub outcome: BumpOutcome,

    /// Non-fatal conditions met on the way
    pub warnings: Vec<BoundaryWarning>,
}

/// Parse a bump level argument; absent means minor
pub fn parse_level(level: Option<&str>) -> Result<BumpLevel> {
    match level {
        Some(text) => text.parse(),
        None => Ok(BumpLevel::default()),
    }
}

type SystemContext = ProjectContext<GitCli<SystemRunner>, SystemRunner>;

fn system_context(config: &Config) -> Result<SystemContext> {
    let git = GitCli::with_program(SystemRunner::new(), config.tools.git.as_str());
    ProjectContext::in_current_dir(config.project.clone(), git, SystemRunner::new())
}

/// Bump against an already assembled context and image store.
///
/// A release HEAD returns [BumpOutcome::AlreadyRelease] before the
/// organization is detected or any image is looked up.
pub fn bump_release<G, R, S>(
    ctx: &ProjectContext<G, R>,
    store: &S,
    settings: ReleaseSettings,
    level: BumpLevel,
) -> Result<WorkflowResult>
where
    G: Repository,
    R: CommandRunner,
    S: ImageStore,
{
    let current = ctx.version()?.clone();
    let warnings: Vec<BoundaryWarning> =
        BoundaryWarning::for_version(&current, ctx.version_is_configured())
            .into_iter()
            .filter(|w| !matches!(w, BoundaryWarning::AlreadyRelease { .. }))
            .collect();

    if current.is_release() {
        return Ok(WorkflowResult {
            outcome: BumpOutcome::AlreadyRelease(current),
            warnings,
        });
    }

    let resolver = SnapshotResolver::new(ctx.organization()?, ctx.name());
    let outcome = ReleaseBump::new(ctx.repository(), store, resolver, settings).run(&current, level)?;
    Ok(WorkflowResult { outcome, warnings })
}

/// Main bump workflow
///
/// 1. Parse the level (nothing is touched when it is unknown)
/// 2. Load configuration
/// 3. Detect the project version and identity
/// 4. Promote the snapshot image and tag the release
pub fn run_bump_workflow(args: BumpWorkflowArgs) -> Result<WorkflowResult> {
    let level = parse_level(args.level.as_deref())?;
    let config = config::load_config(args.config_path.as_deref())?;
    let ctx = system_context(&config)?;
    let docker = DockerCli::with_program(SystemRunner::new(), config.tools.docker.as_str());

    let result = bump_release(&ctx, &docker, config.release_settings(), level)?;
    for warning in &result.warnings {
        ui::display_boundary_warning(warning);
    }
    ui::display_outcome(&result.outcome);
    Ok(result)
}

/// Arguments for the push workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PushWorkflowArgs {
    /// Path to custom config file
    pub config_path: Option<String>,

    /// Registry host the image is pushed to
    pub registry: String,

    /// Tags pushed before the project version
    pub additional_tags: Vec<String>,
}

/// Push the project image to `registry` under the additional tags and the
/// project version
pub fn push_image<G, R, S>(
    ctx: &ProjectContext<G, R>,
    store: &S,
    registry: &str,
    additional_tags: &[String],
) -> Result<Vec<ArtifactRef>>
where
    G: Repository,
    R: CommandRunner,
    S: ImageStore,
{
    let image = ctx.artifact()?;
    let tags = push_tags(&image.version, additional_tags);
    RegistryPush::new(store, registry).run(&image, &tags)
}

/// Main push workflow
pub fn run_push_workflow(args: PushWorkflowArgs) -> Result<Vec<ArtifactRef>> {
    let config = config::load_config(args.config_path.as_deref())?;
    let ctx = system_context(&config)?;
    let docker = DockerCli::with_program(SystemRunner::new(), config.tools.docker.as_str());

    let pushed = push_image(&ctx, &docker, &args.registry, &args.additional_tags)?;
    for reference in &pushed {
        ui::display_success(&format!("Pushed {}", reference));
    }
    Ok(pushed)
}

/// Print the project version
pub fn run_version_workflow(config_path: Option<&str>) -> Result<String> {
    let config = config::load_config(config_path)?;
    let ctx = system_context(&config)?;
    let version = ctx.version()?.to_string();
    println!("{}", version);
    Ok(version)
}

/// Configuration with every project value resolved
pub fn resolved_config<G: Repository, R: CommandRunner>(
    config: &Config,
    ctx: &ProjectContext<G, R>,
) -> Result<Config> {
    Ok(Config {
        project: ctx.resolved()?,
        ..config.clone()
    })
}

/// Print the fully resolved configuration as TOML
pub fn run_config_workflow(config_path: Option<&str>) -> Result<Config> {
    let config = config::load_config(config_path)?;
    let ctx = system_context(&config)?;
    let resolved = resolved_config(&config, &ctx)?;
    ui::display_config(&resolved)?;
    Ok(resolved)
}
