// Full bump runs over the real command-line backends.
//
// `scripted` tests drive GitCli and DockerCli through a MockRunner and check
// the exact command sequence. `git_repository` tests run the real git binary
// in a temporary repository and are skipped when git is not installed.

use release_bump::config::ProjectConfig;
use release_bump::context::ProjectContext;
use release_bump::domain::{ArtifactRef, BumpLevel};
use release_bump::exec::MockRunner;
use release_bump::git::GitCli;
use release_bump::image::DockerCli;
use release_bump::release::{BumpOutcome, ReleaseSettings};
use release_bump::ReleaseError;

const DESCRIBE: &str = "git describe --tags --match v[0-9]*.[0-9]*.[0-9]* --exclude v*-*";
const INSPECT_SNAPSHOT: &str =
    "docker image inspect --format {{.Id}} acme/service:v1.2.0-3-gabc1234";
const INSPECT_RELEASE: &str = "docker image inspect --format {{.Id}} acme/service:v1.3.0";

fn scripted_runner() -> MockRunner {
    MockRunner::new()
        .respond("git rev-parse --short HEAD", 0, "abc1234\n")
        .respond(DESCRIBE, 0, "v1.2.0-3-gabc1234\n")
        .respond("hostname -f", 0, "ci.acme.io\n")
        .respond(
            "git tag -l v[0-9]*.[0-9]*.[0-9]*",
            0,
            "v1.2.0\nv1.2.0-rc1\nv1.1.0\n",
        )
        .respond("git rev-list v1.1.0..HEAD --count", 0, "9\n")
        .respond("git rev-list v1.2.0..HEAD --count", 0, "3\n")
        .respond(
            "docker image inspect --format {{.Id}} acme/service:v1.1.0-9-gabc1234",
            1,
            "Error: No such image",
        )
        .respond(INSPECT_SNAPSHOT, 0, "sha256:0123\n")
        .respond(INSPECT_RELEASE, 1, "Error: No such image")
}

mod scripted {
    use super::*;
    use pretty_assertions::assert_eq;
    use release_bump::cli::orchestration::bump_release;

    #[test]
    fn test_command_sequence_of_successful_bump() {
        let runner = scripted_runner();
        let git = GitCli::new(&runner);
        let docker = DockerCli::new(&runner);
        let ctx = ProjectContext::new(ProjectConfig::default(), git, &runner, "/work/service");

        let result = bump_release(&ctx, &docker, ReleaseSettings::default(), BumpLevel::Minor).unwrap();
        assert!(matches!(
            result.outcome,
            BumpOutcome::Released { ref image, .. } if *image == ArtifactRef::new("acme", "service", "v1.3.0")
        ));

        assert_eq!(
            runner.calls(),
            vec![
                "git rev-parse --short HEAD",
                DESCRIBE,
                "hostname -f",
                "git rev-parse --short HEAD",
                "git tag -l v[0-9]*.[0-9]*.[0-9]*",
                "git rev-list v1.1.0..HEAD --count",
                "docker image inspect --format {{.Id}} acme/service:v1.1.0-9-gabc1234",
                "git rev-list v1.2.0..HEAD --count",
                INSPECT_SNAPSHOT,
                INSPECT_RELEASE,
                "git tag -a v1.3.0 -m 'Release v1.3.0'",
                "docker tag acme/service:v1.2.0-3-gabc1234 acme/service:v1.3.0",
                "docker build -t acme/service:v1.3.0 -",
                "git push origin v1.3.0",
            ]
        );

        let build = runner
            .invocations()
            .into_iter()
            .find(|c| c.args.first().map(String::as_str) == Some("build"))
            .unwrap();
        assert_eq!(
            build.stdin.as_deref(),
            Some("FROM acme/service:v1.3.0\nENV VERSION 1.3.0\n")
        );
    }

    #[test]
    fn test_rejected_push_is_compensated() {
        let runner = scripted_runner().respond(
            "git push origin v1.3.0",
            1,
            "! [rejected] v1.3.0 -> v1.3.0 (already exists)",
        );
        let git = GitCli::new(&runner);
        let docker = DockerCli::new(&runner);
        let ctx = ProjectContext::new(ProjectConfig::default(), git, &runner, "/work/service");

        let err = bump_release(&ctx, &docker, ReleaseSettings::default(), BumpLevel::Minor).unwrap_err();
        match &err {
            ReleaseError::PublishFailed(failure) => {
                assert_eq!(failure.command, "git push origin v1.3.0");
                assert_eq!(failure.code, 1);
            }
            other => panic!("expected PublishFailed, got {other:?}"),
        }

        let calls = runner.calls();
        assert_eq!(
            &calls[calls.len() - 3..],
            &[
                "git push origin v1.3.0".to_string(),
                "docker rmi acme/service:v1.3.0".to_string(),
                "git tag -d v1.3.0".to_string(),
            ]
        );
    }

    #[test]
    fn test_release_head_runs_no_mutations() {
        let runner = MockRunner::new()
            .respond("git rev-parse --short HEAD", 0, "abc1234")
            .respond(DESCRIBE, 0, "v1.2.0\n");
        let git = GitCli::new(&runner);
        let docker = DockerCli::new(&runner);
        let ctx = ProjectContext::new(ProjectConfig::default(), git, &runner, "/work/service");

        let result = bump_release(&ctx, &docker, ReleaseSettings::default(), BumpLevel::Major).unwrap();
        assert!(matches!(result.outcome, BumpOutcome::AlreadyRelease(_)));
        assert_eq!(runner.calls(), vec!["git rev-parse --short HEAD", DESCRIBE]);
    }

    #[test]
    fn test_existing_release_image_stops_before_tagging() {
        let runner = scripted_runner().respond(INSPECT_RELEASE, 0, "sha256:stale\n");
        let git = GitCli::new(&runner);
        let docker = DockerCli::new(&runner);
        let ctx = ProjectContext::new(ProjectConfig::default(), git, &runner, "/work/service");

        let err = bump_release(&ctx, &docker, ReleaseSettings::default(), BumpLevel::Minor).unwrap_err();
        assert!(matches!(err, ReleaseError::ImageExists { .. }));
        assert_eq!(runner.calls().last().map(String::as_str), Some(INSPECT_RELEASE));
    }

    #[test]
    fn test_registry_push_command_sequence() {
        use release_bump::cli::orchestration::push_image;

        let runner = MockRunner::new()
            .respond("git rev-parse --short HEAD", 0, "abc1234\n")
            .respond(DESCRIBE, 0, "v1.3.0\n")
            .respond("hostname -f", 0, "ci.acme.io\n")
            .respond(
                "docker push registry.acme.io/acme/service:v1.3.0",
                1,
                "denied: requested access to the resource is denied",
            );
        let ctx = ProjectContext::new(
            ProjectConfig::default(),
            GitCli::new(&runner),
            &runner,
            "/work/service",
        );
        let docker = DockerCli::new(&runner);

        let err = push_image(&ctx, &docker, "registry.acme.io", &["latest".to_string()]).unwrap_err();
        assert!(matches!(err, ReleaseError::ImagePushFailed(_)));
        assert_eq!(
            runner.calls()[3..].to_vec(),
            vec![
                "docker tag acme/service:v1.3.0 registry.acme.io/acme/service:latest",
                "docker push registry.acme.io/acme/service:latest",
                "docker rmi registry.acme.io/acme/service:latest",
                "docker tag acme/service:v1.3.0 registry.acme.io/acme/service:v1.3.0",
                "docker push registry.acme.io/acme/service:v1.3.0",
                "docker rmi registry.acme.io/acme/service:v1.3.0",
            ]
        );
    }

    #[test]
    fn test_missing_git_executable() {
        let runner = MockRunner::new().respond("git rev-parse --short HEAD", 127, "");
        let ctx = ProjectContext::new(
            ProjectConfig::default(),
            GitCli::new(&runner),
            &runner,
            "/work/service",
        );
        let docker = DockerCli::new(&runner);

        let err = bump_release(&ctx, &docker, ReleaseSettings::default(), BumpLevel::Minor).unwrap_err();
        assert_eq!(err.to_string(), "No git executable found");
    }
}

#[cfg(unix)]
mod git_repository {
    use super::*;
    use pretty_assertions::assert_eq;
    use release_bump::analyzer::{SnapshotResolver, VersionAnalyzer};
    use release_bump::exec::{CommandLine, CommandRunner, SystemRunner};
    use release_bump::git::Repository;
    use release_bump::image::MockImageStore;
    use release_bump::release::ReleaseBump;
    use std::path::Path;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) -> String {
        let out = SystemRunner::in_dir(dir)
            .run(&CommandLine::new("git").args(args.iter().copied()))
            .expect("Could not run git");
        assert!(out.is_success(), "git {:?} failed: {}", args, out.output);
        out.trimmed().to_string()
    }

    fn git_available() -> bool {
        SystemRunner::new()
            .run(&CommandLine::new("git").arg("--version"))
            .map(|out| out.is_success())
            .unwrap_or(false)
    }

    // Repository with v1.0.0 two commits behind HEAD, plus a bare remote
    fn setup_test_repo() -> TempDir {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let work = temp_dir.path().join("work");
        let remote = temp_dir.path().join("remote.git");
        std::fs::create_dir(&work).unwrap();

        git(temp_dir.path(), &["init", "--bare", "remote.git"]);
        git(&work, &["init"]);
        git(&work, &["config", "user.name", "Test User"]);
        git(&work, &["config", "user.email", "test@example.com"]);
        git(&work, &["config", "tag.gpgSign", "false"]);
        git(&work, &["remote", "add", "origin", remote.to_str().unwrap()]);
        git(&work, &["commit", "--allow-empty", "-m", "Initial commit"]);
        git(&work, &["tag", "-a", "v1.0.0", "-m", "Release v1.0.0"]);
        git(&work, &["commit", "--allow-empty", "-m", "feat: one"]);
        git(&work, &["commit", "--allow-empty", "-m", "feat: two"]);

        temp_dir
    }

    #[test]
    fn test_version_of_untagged_repository() {
        if !git_available() {
            return;
        }
        let temp_dir = TempDir::new().unwrap();
        git(temp_dir.path(), &["init"]);
        git(temp_dir.path(), &["config", "user.name", "Test User"]);
        git(temp_dir.path(), &["config", "user.email", "test@example.com"]);
        git(temp_dir.path(), &["commit", "--allow-empty", "-m", "one"]);
        git(temp_dir.path(), &["commit", "--allow-empty", "-m", "two"]);
        let sha = git(temp_dir.path(), &["rev-parse", "--short", "HEAD"]);

        let repo = GitCli::new(SystemRunner::in_dir(temp_dir.path()));
        let version = VersionAnalyzer::default().detect(&repo).unwrap();
        assert_eq!(version.to_string(), format!("v0.0.0-1-g{}", sha));
    }

    #[test]
    fn test_loose_tag_does_not_break_version_detection() {
        if !git_available() {
            return;
        }
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        git(dir, &["init"]);
        git(dir, &["config", "user.name", "Test User"]);
        git(dir, &["config", "user.email", "test@example.com"]);
        git(dir, &["commit", "--allow-empty", "-m", "one"]);
        git(dir, &["tag", "v1.0.0"]);
        git(dir, &["commit", "--allow-empty", "-m", "two"]);
        git(dir, &["tag", "v1.1.0rc1"]);
        git(dir, &["commit", "--allow-empty", "-m", "three"]);
        let sha = git(dir, &["rev-parse", "--short", "HEAD"]);

        let repo = GitCli::new(SystemRunner::in_dir(dir));
        let version = VersionAnalyzer::default().detect(&repo).unwrap();
        assert_eq!(version.to_string(), format!("v1.0.0-2-g{}", sha));
    }

    #[test]
    fn test_only_loose_tags_fall_back_to_initial_version() {
        if !git_available() {
            return;
        }
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        git(dir, &["init"]);
        git(dir, &["config", "user.name", "Test User"]);
        git(dir, &["config", "user.email", "test@example.com"]);
        git(dir, &["commit", "--allow-empty", "-m", "one"]);
        git(dir, &["tag", "v1.2.3.4"]);
        git(dir, &["commit", "--allow-empty", "-m", "two"]);
        let sha = git(dir, &["rev-parse", "--short", "HEAD"]);

        let repo = GitCli::new(SystemRunner::in_dir(dir));
        let version = VersionAnalyzer::default().detect(&repo).unwrap();
        assert_eq!(version.to_string(), format!("v0.0.0-1-g{}", sha));
    }

    #[test]
    fn test_not_a_repository() {
        if !git_available() {
            return;
        }
        let temp_dir = TempDir::new().unwrap();
        let repo = GitCli::new(SystemRunner::in_dir(temp_dir.path()));
        assert!(matches!(
            repo.ensure_repository(),
            Err(ReleaseError::NotARepository)
        ));
    }

    #[test]
    fn test_release_is_tagged_and_pushed() {
        if !git_available() {
            return;
        }
        let temp_dir = setup_test_repo();
        let work = temp_dir.path().join("work");
        let sha = git(&work, &["rev-parse", "--short", "HEAD"]);

        let repo = GitCli::new(SystemRunner::in_dir(&work));
        let current = VersionAnalyzer::default().detect(&repo).unwrap();
        assert_eq!(current.to_string(), format!("v1.0.0-2-g{}", sha));

        let snapshot = ArtifactRef::new("acme", "service", current.to_string());
        let store = MockImageStore::new().with_image(&snapshot);
        let bump = ReleaseBump::new(
            &repo,
            &store,
            SnapshotResolver::new("acme", "service"),
            ReleaseSettings::default(),
        );

        let outcome = bump.run(&current, BumpLevel::Patch).unwrap();
        assert!(matches!(outcome, BumpOutcome::Released { .. }));
        assert_eq!(git(&work, &["tag", "-l", "v1.0.1"]), "v1.0.1");
        assert_eq!(
            git(&temp_dir.path().join("remote.git"), &["tag", "-l", "v1.0.1"]),
            "v1.0.1"
        );
        assert_eq!(
            VersionAnalyzer::default().detect(&repo).unwrap().to_string(),
            "v1.0.1"
        );
    }

    #[test]
    fn test_failed_push_deletes_local_tag() {
        if !git_available() {
            return;
        }
        let temp_dir = setup_test_repo();
        let work = temp_dir.path().join("work");
        git(&work, &["remote", "set-url", "origin", "/nonexistent/remote.git"]);

        let repo = GitCli::new(SystemRunner::in_dir(&work));
        let current = VersionAnalyzer::default().detect(&repo).unwrap();
        let snapshot = ArtifactRef::new("acme", "service", current.to_string());
        let store = MockImageStore::new().with_image(&snapshot);
        let bump = ReleaseBump::new(
            &repo,
            &store,
            SnapshotResolver::new("acme", "service"),
            ReleaseSettings::default(),
        );

        let err = bump.run(&current, BumpLevel::Minor).unwrap_err();
        assert!(matches!(err, ReleaseError::PublishFailed(_)));
        assert_eq!(git(&work, &["tag", "-l", "v1.1.0"]), "");
        assert_eq!(store.references(), vec![snapshot.to_string()]);
    }
}
