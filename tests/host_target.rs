//! The `(default)` row of `gobuild-menu targets`.
//!
//! `Build default` runs the toolchain without GOOS/GOARCH overrides, so the
//! binary it produces is for the host triple set by build.rs and is named
//! after the project directory with no suffix.

use std::process::Command;

use gobuild_menu::target::host_triple;
use tempfile::TempDir;

#[test]
fn host_triple_matches_build_script_value() {
    assert_eq!(host_triple(), env!("TARGET"));
}

#[test]
fn targets_default_row_is_host_build_named_after_directory() {
    let parent = TempDir::new().unwrap();
    let project = parent.path().join("svc");
    std::fs::create_dir(&project).unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_gobuild-menu"))
        .arg("targets")
        .current_dir(&project)
        .env_remove("GOBUILD_MENU_TOOLCHAIN")
        .output()
        .expect("failed to run gobuild-menu");
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let stdout = String::from_utf8(out.stdout).unwrap();
    let last = stdout.lines().last().unwrap();
    let columns: Vec<&str> = last.split_whitespace().collect();
    assert_eq!(columns, ["(default)", host_triple(), "svc"], "{last}");
}
