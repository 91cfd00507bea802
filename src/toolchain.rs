//! Toolchain invocation.
//!
//! Every job is a single `go` subprocess. The child inherits our environment
//! and stdio; a target only adds `GOOS`/`GOARCH` on top, replacing any
//! inherited values.

use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::MenuConfig;
use crate::output;
use crate::profile::{Profile, render_args};
use crate::target::{self, Target};

/// A build of the project for one target and profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// `None` builds for the host platform with no environment overrides.
    pub target: Option<Target>,
    pub profile: Profile,
    /// Output file name, before any configured output directory is applied.
    pub output: String,
}

impl BuildRequest {
    /// Release build for the current platform.
    pub fn host_default(project: &str) -> Self {
        Self {
            target: None,
            profile: Profile::Release,
            output: project.to_string(),
        }
    }

    pub fn for_target(target: Target, profile: Profile, project: &str) -> Self {
        Self {
            target: Some(target),
            profile,
            output: target.output_name(project),
        }
    }

    pub fn env(&self) -> Vec<(&'static str, &'static str)> {
        self.target.map(|t| t.env().to_vec()).unwrap_or_default()
    }

    /// `GOOS/GOARCH` of the target, or the host triple for a default build.
    pub fn platform(&self) -> String {
        match self.target {
            Some(t) => t.to_string(),
            None => format!("host {}", target::host_triple()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Build(BuildRequest),
    Clean,
}

/// Executes jobs chosen from the menu or the command line.
pub trait Runner {
    fn run(&mut self, job: &Job) -> Result<()>;
}

/// Base name of the project directory, used as the output binary name.
///
/// The name must be valid UTF-8; a lossy conversion would produce a binary
/// whose name differs from its directory.
pub fn project_name(dir: &Path) -> Result<String> {
    let Some(name) = dir.file_name().filter(|n| !n.is_empty()) else {
        bail!("cannot derive a project name from {}", dir.display());
    };
    match name.to_str() {
        Some(n) => Ok(n.to_string()),
        None => bail!(
            "project directory name is not valid UTF-8: {}",
            dir.display()
        ),
    }
}

/// Arguments for `go build`.
pub fn build_args(profile: Profile, output: &str, release_flags: &[String]) -> Vec<String> {
    let mut args = vec!["build".to_string()];
    args.extend(profile.flags(release_flags).iter().cloned());
    args.push("-o".to_string());
    args.push(output.to_string());
    args
}

/// The `go` toolchain as configured for one project directory.
#[derive(Debug, Clone)]
pub struct Toolchain {
    program: String,
    release_flags: Vec<String>,
    output_dir: Option<PathBuf>,
    project_dir: PathBuf,
}

impl Toolchain {
    pub fn new(program: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            release_flags: crate::profile::default_release_flags(),
            output_dir: None,
            project_dir: project_dir.into(),
        }
    }

    pub fn from_config(
        config: &MenuConfig,
        cli_override: Option<&str>,
        project_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: config.resolve_toolchain(cli_override),
            release_flags: config.release_flags(),
            output_dir: config.output_dir.clone(),
            project_dir: project_dir.into(),
        }
    }

    pub fn with_release_flags(mut self, flags: Vec<String>) -> Self {
        self.release_flags = flags;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn release_flags(&self) -> &[String] {
        &self.release_flags
    }

    /// Where the binary for `request` is written, relative to the project directory.
    pub fn output_path(&self, request: &BuildRequest) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.join(&request.output),
            None => PathBuf::from(&request.output),
        }
    }

    pub fn args(&self, job: &Job) -> Vec<String> {
        match job {
            Job::Build(request) => {
                let output = self.output_path(request);
                build_args(
                    request.profile,
                    &output.to_string_lossy(),
                    &self.release_flags,
                )
            }
            Job::Clean => vec!["clean".to_string()],
        }
    }

    /// Build the subprocess for `job` without running it.
    pub fn command(&self, job: &Job) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(job)).current_dir(&self.project_dir);
        if let Job::Build(request) = job {
            cmd.envs(request.env());
        }
        cmd
    }

    /// The command line as it would be typed in a shell.
    pub fn command_line(&self, job: &Job) -> String {
        format!("{} {}", self.program, render_args(self.args(job).as_slice()))
    }

    /// Write the environment overrides and command line for `job`.
    pub fn describe_to(&self, w: &mut dyn Write, job: &Job, is_tty: bool) {
        let env = match job {
            Job::Build(request) => request.env(),
            Job::Clean => Vec::new(),
        };
        output::command_to(w, &env, &self.command_line(job), is_tty);
    }

    fn execute(&self, job: &Job) -> Result<()> {
        let line = self.command_line(job);
        if output::is_verbose() {
            self.describe_to(&mut std::io::stderr(), job, output::stderr_is_tty());
        }

        let status = self
            .command(job)
            .status()
            .with_context(|| format!("failed to run {}", self.program))?;
        if !status.success() {
            bail!("{line} failed ({status})");
        }
        Ok(())
    }
}

impl Runner for Toolchain {
    fn run(&mut self, job: &Job) -> Result<()> {
        match job {
            Job::Build(request) => {
                let path = self.output_path(request);
                output::building(request, &path);
                self.execute(job)?;
                output::built(&path);
            }
            Job::Clean => {
                output::cleaning(&self.project_dir);
                self.execute(job)?;
                output::cleaned();
            }
        }
        Ok(())
    }
}
