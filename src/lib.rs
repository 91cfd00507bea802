//! Library entrypoint for gobuild-menu.
//!
//! The primary interface is the `gobuild-menu` binary. The library target
//! exposes the menu model and toolchain runner to integration tests.

pub mod config;
pub mod menu;
pub mod output;
pub mod profile;
pub mod target;
pub mod toolchain;
pub mod ui;
