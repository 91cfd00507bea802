//! Menu navigation.
//!
//! The menu is a handful of screens. Each screen is a list of entries, and
//! each entry either moves to another screen, runs a job, or quits. Picking
//! a target on the OS or Linux CPU screen carries it into the profile
//! screen, where release or debug completes the build request.

use anyhow::{Result, bail};
use std::fmt;

use crate::output;
use crate::profile::Profile;
use crate::target::{self, MACOS, Target};
use crate::toolchain::{BuildRequest, Job, Runner};

const BUILD_SUB: &str = "Set architecture and flags";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    Os,
    LinuxCpu,
    /// Release/debug choice for an already selected target.
    Profile(Target),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Goto(Screen),
    /// Run the job, then show the given screen.
    Run(Job, Screen),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub key: char,
    pub label: String,
    pub description: String,
}

impl MenuItem {
    fn new(key: char, label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "[{}] {}", self.key, self.label)
        } else {
            write!(f, "[{}] {:<16} {}", self.key, self.label, self.description)
        }
    }
}

/// Renders a screen and returns the chosen index, or `None` if the user
/// cancelled (Esc or Ctrl-C).
pub trait Prompter {
    fn select(&mut self, title: &str, items: &[MenuItem]) -> Result<Option<usize>>;
}

pub struct Menu {
    project: String,
    release_flags: Vec<String>,
}

impl Menu {
    pub fn new(project: impl Into<String>, release_flags: Vec<String>) -> Self {
        Self {
            project: project.into(),
            release_flags,
        }
    }

    pub fn title(&self, screen: Screen) -> String {
        match screen {
            Screen::Main => format!("Build {}", self.project),
            Screen::Os => "Target operating system".to_string(),
            Screen::LinuxCpu => "Linux CPU architecture".to_string(),
            Screen::Profile(t) => format!("{} ({t})", t.label),
        }
    }

    /// Entries of `screen` in display order, each paired with what choosing it does.
    pub fn entries(&self, screen: Screen) -> Vec<(MenuItem, Step)> {
        match screen {
            Screen::Main => vec![
                (
                    MenuItem::new('b', "Build default", "Release build for current platform"),
                    Step::Run(
                        Job::Build(BuildRequest::host_default(&self.project)),
                        Screen::Main,
                    ),
                ),
                (
                    MenuItem::new('B', "Build…", "Build with custom options"),
                    Step::Goto(Screen::Os),
                ),
                (
                    MenuItem::new('c', "Clean", "Remove built executable"),
                    Step::Run(Job::Clean, Screen::Main),
                ),
                (MenuItem::new('q', "Quit", ""), Step::Quit),
            ],
            Screen::Os => vec![
                (
                    MenuItem::new(MACOS.key, MACOS.label, BUILD_SUB),
                    Step::Goto(Screen::Profile(MACOS)),
                ),
                (
                    MenuItem::new('l', "Linux", BUILD_SUB),
                    Step::Goto(Screen::LinuxCpu),
                ),
                (
                    MenuItem::new('q', "Back", "Return to main menu"),
                    Step::Goto(Screen::Main),
                ),
            ],
            Screen::LinuxCpu => target::linux_targets()
                .iter()
                .map(|t| {
                    (
                        MenuItem::new(t.key, t.label, ""),
                        Step::Goto(Screen::Profile(*t)),
                    )
                })
                .chain(std::iter::once((
                    MenuItem::new('q', "Back", "Return to OS menu"),
                    Step::Goto(Screen::Os),
                )))
                .collect(),
            Screen::Profile(t) => vec![
                (
                    MenuItem::new(
                        'r',
                        "Release",
                        Profile::Release.describe(&self.release_flags),
                    ),
                    self.build_step(t, Profile::Release),
                ),
                (
                    MenuItem::new('d', "Debug", Profile::Debug.describe(&self.release_flags)),
                    self.build_step(t, Profile::Debug),
                ),
                (
                    MenuItem::new('q', "Back", "Return to OS menu"),
                    Step::Goto(Screen::Os),
                ),
            ],
        }
    }

    fn build_step(&self, target: Target, profile: Profile) -> Step {
        Step::Run(
            Job::Build(BuildRequest::for_target(target, profile, &self.project)),
            Screen::Main,
        )
    }

    pub fn items(&self, screen: Screen) -> Vec<MenuItem> {
        self.entries(screen).into_iter().map(|(item, _)| item).collect()
    }

    pub fn transition(&self, screen: Screen, index: usize) -> Result<Step> {
        let mut entries = self.entries(screen);
        if index >= entries.len() {
            bail!(
                "menu index {index} out of range for {} ({} entries)",
                self.title(screen),
                entries.len()
            );
        }
        Ok(entries.swap_remove(index).1)
    }

    /// Cancelling behaves like `Back`, or `Quit` on the main screen.
    pub fn cancel(screen: Screen) -> Step {
        match screen {
            Screen::Main => Step::Quit,
            Screen::Os => Step::Goto(Screen::Main),
            Screen::LinuxCpu | Screen::Profile(_) => Step::Goto(Screen::Os),
        }
    }

    /// Drive the menu until the user quits.
    ///
    /// A failed job is reported and the menu carries on; only prompter
    /// errors end the session early.
    pub fn run(&self, prompter: &mut dyn Prompter, runner: &mut dyn Runner) -> Result<()> {
        let mut screen = Screen::Main;
        loop {
            let items = self.items(screen);
            let step = match prompter.select(&self.title(screen), &items)? {
                Some(index) => self.transition(screen, index)?,
                None => Self::cancel(screen),
            };
            match step {
                Step::Goto(next) => screen = next,
                Step::Run(job, next) => {
                    if let Err(e) = runner.run(&job) {
                        output::failed(&e);
                    }
                    screen = next;
                }
                Step::Quit => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::default_release_flags;
    use crate::target::find;

    fn menu() -> Menu {
        Menu::new("tool", default_release_flags())
    }

    fn labels(menu: &Menu, screen: Screen) -> Vec<String> {
        menu.items(screen).into_iter().map(|i| i.label).collect()
    }

    #[test]
    fn main_screen_items() {
        assert_eq!(
            labels(&menu(), Screen::Main),
            vec!["Build default", "Build…", "Clean", "Quit"]
        );
        let keys: Vec<char> = menu().items(Screen::Main).iter().map(|i| i.key).collect();
        assert_eq!(keys, vec!['b', 'B', 'c', 'q']);
    }

    #[test]
    fn build_default_is_host_release() {
        let step = menu().transition(Screen::Main, 0).unwrap();
        assert_eq!(
            step,
            Step::Run(
                Job::Build(BuildRequest {
                    target: None,
                    profile: Profile::Release,
                    output: "tool".to_string(),
                }),
                Screen::Main,
            )
        );
    }

    #[test]
    fn clean_stays_on_main() {
        assert_eq!(
            menu().transition(Screen::Main, 2).unwrap(),
            Step::Run(Job::Clean, Screen::Main)
        );
    }

    #[test]
    fn macos_goes_straight_to_profile() {
        assert_eq!(
            menu().transition(Screen::Os, 0).unwrap(),
            Step::Goto(Screen::Profile(MACOS))
        );
    }

    #[test]
    fn linux_screen_lists_cpus_then_back() {
        let labels = labels(&menu(), Screen::LinuxCpu);
        assert_eq!(labels.len(), 8);
        assert_eq!(labels[0], "x86 32-bit");
        assert_eq!(labels[6], "MIPS 64-bit LE");
        assert_eq!(labels[7], "Back");
        assert_eq!(
            menu().transition(Screen::LinuxCpu, 7).unwrap(),
            Step::Goto(Screen::Os)
        );
    }

    #[test]
    fn profile_release_builds_with_suffix_and_returns_to_main() {
        let arm = find("linux.arm32").unwrap();
        let step = menu().transition(Screen::Profile(arm), 0).unwrap();
        match step {
            Step::Run(Job::Build(req), Screen::Main) => {
                assert_eq!(req.output, "tool.linux.arm32");
                assert_eq!(req.profile, Profile::Release);
                assert_eq!(req.env(), vec![("GOOS", "linux"), ("GOARCH", "arm")]);
            }
            other => panic!("unexpected step: {other:?}"),
        }
    }

    #[test]
    fn profile_descriptions_show_flags() {
        let items = menu().items(Screen::Profile(MACOS));
        assert_eq!(items[0].description, "-ldflags \"-w -s\"");
        assert_eq!(items[1].description, "No flags");
    }

    #[test]
    fn profile_back_returns_to_os_menu() {
        assert_eq!(
            menu().transition(Screen::Profile(MACOS), 2).unwrap(),
            Step::Goto(Screen::Os)
        );
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let err = menu().transition(Screen::Os, 3).unwrap_err().to_string();
        assert!(err.contains("out of range"), "{err}");
    }

    #[test]
    fn cancel_goes_back() {
        assert_eq!(Menu::cancel(Screen::Main), Step::Quit);
        assert_eq!(Menu::cancel(Screen::Os), Step::Goto(Screen::Main));
        assert_eq!(Menu::cancel(Screen::LinuxCpu), Step::Goto(Screen::Os));
        assert_eq!(Menu::cancel(Screen::Profile(MACOS)), Step::Goto(Screen::Os));
    }

    #[test]
    fn item_display_includes_key_and_description() {
        let item = MenuItem::new('c', "Clean", "Remove built executable");
        assert_eq!(item.to_string(), "[c] Clean            Remove built executable");
        assert_eq!(MenuItem::new('q', "Quit", "").to_string(), "[q] Quit");
    }

    #[test]
    fn titles() {
        let m = menu();
        assert_eq!(m.title(Screen::Main), "Build tool");
        assert_eq!(m.title(Screen::Profile(MACOS)), "macOS (darwin/amd64)");
    }
}
