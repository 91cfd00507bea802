//! Cross-compilation targets offered by the menu.
//!
//! Each target is a fixed `GOOS`/`GOARCH` pair plus the suffix appended to
//! the project name to form the output binary. The table order is the menu
//! order.

use anyhow::{Result, bail};
use std::fmt;

/// Environment variable selecting the target operating system.
pub const GOOS: &str = "GOOS";

/// Environment variable selecting the target CPU architecture.
pub const GOARCH: &str = "GOARCH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOs {
    Darwin,
    Linux,
}

impl TargetOs {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetOs::Darwin => "darwin",
            TargetOs::Linux => "linux",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetArch {
    X86,
    Amd64,
    Arm32,
    Arm64,
    Mips32,
    Mips64,
    Mips64Le,
}

impl TargetArch {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetArch::X86 => "386",
            TargetArch::Amd64 => "amd64",
            TargetArch::Arm32 => "arm",
            TargetArch::Arm64 => "arm64",
            TargetArch::Mips32 => "mips",
            TargetArch::Mips64 => "mips64",
            TargetArch::Mips64Le => "mips64le",
        }
    }
}

/// One selectable build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub os: TargetOs,
    pub arch: TargetArch,
    /// Menu label.
    pub label: &'static str,
    /// Menu hotkey.
    pub key: char,
    /// Appended to the project name, including the leading dot.
    pub suffix: &'static str,
}

impl Target {
    /// Stable name used on the command line, e.g. `linux.arm64`.
    pub fn name(&self) -> &'static str {
        let suffix: &'static str = self.suffix;
        &suffix[1..]
    }

    /// Environment overrides applied on top of the inherited environment.
    pub fn env(&self) -> [(&'static str, &'static str); 2] {
        [(GOOS, self.os.as_str()), (GOARCH, self.arch.as_str())]
    }

    pub fn output_name(&self, base: &str) -> String {
        format!("{base}{}", self.suffix)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os.as_str(), self.arch.as_str())
    }
}

const fn linux(arch: TargetArch, label: &'static str, key: char, suffix: &'static str) -> Target {
    Target {
        os: TargetOs::Linux,
        arch,
        label,
        key,
        suffix,
    }
}

pub const MACOS: Target = Target {
    os: TargetOs::Darwin,
    arch: TargetArch::Amd64,
    label: "macOS",
    key: 'm',
    suffix: ".macos",
};

static LINUX_TARGETS: [Target; 7] = [
    linux(TargetArch::X86, "x86 32-bit", '1', ".linux.x86"),
    linux(TargetArch::Amd64, "x86 64-bit", '2', ".linux.amd64"),
    linux(TargetArch::Arm32, "ARM 32-bit", '3', ".linux.arm32"),
    linux(TargetArch::Arm64, "ARM 64-bit", '4', ".linux.arm64"),
    linux(TargetArch::Mips32, "MIPS 32-bit", '5', ".linux.mips32"),
    linux(TargetArch::Mips64, "MIPS 64-bit", '6', ".linux.mips64"),
    linux(TargetArch::Mips64Le, "MIPS 64-bit LE", '7', ".linux.mips64le"),
];

/// Linux CPU choices, in menu order.
pub fn linux_targets() -> &'static [Target] {
    &LINUX_TARGETS
}

/// Every target, macOS first.
pub fn all_targets() -> impl Iterator<Item = &'static Target> {
    std::iter::once(&MACOS).chain(LINUX_TARGETS.iter())
}

/// Look a target up by its command-line name (case-insensitive).
pub fn find(name: &str) -> Result<Target> {
    let wanted = name.trim().to_ascii_lowercase();
    if let Some(target) = all_targets().find(|t| t.name() == wanted) {
        return Ok(*target);
    }
    let valid: Vec<&str> = all_targets().map(Target::name).collect();
    bail!(
        "unknown target '{}'; expected one of: {}",
        name.trim(),
        valid.join(", ")
    )
}

/// The compile-time host triple, i.e. what a build without overrides produces.
pub fn host_triple() -> &'static str {
    env!("TARGET")
}
