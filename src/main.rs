use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::Path;
use std::process;

use gobuild_menu::config::MenuConfig;
use gobuild_menu::menu::Menu;
use gobuild_menu::output;
use gobuild_menu::profile::Profile;
use gobuild_menu::target;
use gobuild_menu::toolchain::{BuildRequest, Job, Runner, Toolchain, project_name};
use gobuild_menu::ui::TermPrompter;

/// Interactive cross-compilation menu for Go projects.
///
/// Run it from a Go module directory. Binaries are named after the
/// directory, with a platform suffix for cross builds.
#[derive(Parser, Debug)]
#[command(
    name = "gobuild-menu",
    version,
    about,
    after_help = "Examples:\n  gobuild-menu\n  gobuild-menu build --target linux.arm64\n  gobuild-menu build --debug\n  gobuild-menu clean\n  gobuild-menu targets"
)]
struct Cli {
    /// Print the toolchain command line and environment overrides.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Toolchain program to run instead of `go`.
    #[arg(long, global = true, value_name = "PROGRAM")]
    toolchain: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build once without the menu.
    Build {
        /// Target name from `gobuild-menu targets`. Defaults to the current platform.
        #[arg(long)]
        target: Option<String>,

        /// Build without the release strip flags.
        #[arg(long)]
        debug: bool,
    },

    /// Remove built executables (`go clean`).
    Clean,

    /// List the available cross-compilation targets.
    Targets,
}

// ---------------------------------------------------------------------------
// Subcommand dispatch
// ---------------------------------------------------------------------------

fn run_menu(project: &str, toolchain: &mut Toolchain, interactive: bool) -> Result<()> {
    if !interactive {
        output::note("run `gobuild-menu targets` to list cross-compilation targets");
        bail!("the menu needs an interactive terminal; use `gobuild-menu build` or `gobuild-menu clean` instead");
    }
    let menu = Menu::new(project, toolchain.release_flags().to_vec());
    menu.run(&mut TermPrompter, toolchain)
}

fn build_request(project: &str, target: Option<&str>, debug: bool) -> Result<BuildRequest> {
    let profile = if debug {
        Profile::Debug
    } else {
        Profile::Release
    };
    Ok(match target {
        Some(name) => BuildRequest::for_target(target::find(name)?, profile, project),
        None => BuildRequest {
            target: None,
            profile,
            output: project.to_string(),
        },
    })
}

fn run_build(
    project: &str,
    toolchain: &mut Toolchain,
    target: Option<&str>,
    debug: bool,
) -> Result<()> {
    let request = build_request(project, target, debug)?;
    toolchain.run(&Job::Build(request))
}

fn run_targets(project: &str, toolchain: &Toolchain, w: &mut dyn Write) -> Result<()> {
    writeln!(w, "{:<16} {:<16} OUTPUT", "TARGET", "PLATFORM")?;
    for t in target::all_targets() {
        let request = BuildRequest::for_target(*t, Profile::Release, project);
        writeln!(
            w,
            "{:<16} {:<16} {}",
            t.name(),
            t.to_string(),
            toolchain.output_path(&request).display()
        )?;
    }
    let host = BuildRequest::host_default(project);
    writeln!(
        w,
        "{:<16} {:<16} {}",
        "(default)",
        target::host_triple(),
        toolchain.output_path(&host).display()
    )?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let project_dir = std::env::current_dir().context("couldn't get working directory")?;
    run_in(cli, &project_dir)
}

fn run_in(cli: Cli, project_dir: &Path) -> Result<()> {
    run_in_with(cli, project_dir, TermPrompter::is_available())
}

fn run_in_with(cli: Cli, project_dir: &Path, interactive: bool) -> Result<()> {
    let project = project_name(project_dir)?;
    let config = MenuConfig::load(project_dir)?;
    let mut toolchain = Toolchain::from_config(&config, cli.toolchain.as_deref(), project_dir);
    output::verbose(&format!("toolchain: {}", toolchain.program()));

    match cli.command {
        None => run_menu(&project, &mut toolchain, interactive),
        Some(Command::Build { target, debug }) => {
            run_build(&project, &mut toolchain, target.as_deref(), debug)
        }
        Some(Command::Clean) => toolchain.run(&Job::Clean),
        Some(Command::Targets) => run_targets(&project, &toolchain, &mut io::stdout()),
    }
}

fn main() {
    let cli = Cli::parse();
    output::set_verbose(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("[gobuild-menu] error: {e:#}");
        process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
