//! Build status on stderr.
//!
//! The toolchain shares stderr with us, so every event is a single
//! labelled line that stays readable between compiler diagnostics. Labels
//! are bold and coloured only when stderr is a terminal.

use console::{Color, Term, style};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::profile::Profile;
use crate::toolchain::BuildRequest;

static VERBOSE: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Building {
        output: PathBuf,
        platform: String,
        profile: Profile,
    },
    Built {
        output: PathBuf,
    },
    Cleaning {
        dir: PathBuf,
    },
    Cleaned,
    Failed {
        message: String,
    },
    Note {
        message: String,
    },
}

impl Status {
    fn label(&self) -> &'static str {
        match self {
            Status::Building { .. } => "Building",
            Status::Built { .. } => "Built",
            Status::Cleaning { .. } => "Cleaning",
            Status::Cleaned => "Cleaned",
            Status::Failed { .. } => "Error",
            Status::Note { .. } => "Note",
        }
    }

    fn color(&self) -> Color {
        match self {
            Status::Building { .. } | Status::Cleaning { .. } => Color::Cyan,
            Status::Built { .. } | Status::Cleaned => Color::Green,
            Status::Failed { .. } => Color::Red,
            Status::Note { .. } => Color::Yellow,
        }
    }

    fn message(&self) -> String {
        match self {
            Status::Building {
                output,
                platform,
                profile,
            } => format!("{} ({platform}, {})", output.display(), profile.as_str()),
            Status::Built { output } => output.display().to_string(),
            Status::Cleaning { dir } => dir.display().to_string(),
            Status::Cleaned => String::new(),
            Status::Failed { message } | Status::Note { message } => message.clone(),
        }
    }

    /// One status line, without the trailing newline.
    pub fn render(&self, is_tty: bool) -> String {
        let label = if is_tty {
            style(self.label()).bold().fg(self.color()).to_string()
        } else {
            self.label().to_string()
        };
        let message = self.message();
        if message.is_empty() {
            label
        } else {
            format!("{label} {message}")
        }
    }
}

pub fn stderr_is_tty() -> bool {
    Term::stderr().is_term()
}

pub fn emit_to(w: &mut dyn Write, status: &Status, is_tty: bool) {
    let _ = writeln!(w, "{}", status.render(is_tty));
}

pub fn emit(status: &Status) {
    emit_to(&mut io::stderr(), status, stderr_is_tty());
}

pub fn building(request: &BuildRequest, output: &Path) {
    emit(&Status::Building {
        output: output.to_path_buf(),
        platform: request.platform(),
        profile: request.profile,
    });
}

pub fn built(output: &Path) {
    emit(&Status::Built {
        output: output.to_path_buf(),
    });
}

pub fn cleaning(dir: &Path) {
    emit(&Status::Cleaning {
        dir: dir.to_path_buf(),
    });
}

pub fn cleaned() {
    emit(&Status::Cleaned);
}

/// Report a job failure with its full context chain.
pub fn failed(err: &anyhow::Error) {
    emit(&Status::Failed {
        message: format!("{err:#}"),
    });
}

pub fn note(msg: &str) {
    emit(&Status::Note {
        message: msg.to_string(),
    });
}

/// Echo a toolchain invocation: environment overrides first, then the
/// command line, each indented under the status line it belongs to.
pub fn command_to(w: &mut dyn Write, env: &[(&str, &str)], line: &str, is_tty: bool) {
    let lines = env
        .iter()
        .map(|(key, value)| format!("  {key}={value}"))
        .chain(std::iter::once(format!("  {line}")));
    for l in lines {
        let l = if is_tty { style(l).dim().to_string() } else { l };
        let _ = writeln!(w, "{l}");
    }
}

/// Extra context shown only with `--verbose`.
pub fn verbose(msg: &str) {
    if is_verbose() {
        let line = format!("  {msg}");
        let line = if stderr_is_tty() {
            style(line).dim().to_string()
        } else {
            line
        };
        eprintln!("{line}");
    }
}

pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}
