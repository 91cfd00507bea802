//! Keyboard-driven select list on stderr.
//!
//! Arrow keys move the cursor and Enter picks the highlighted item. Typing
//! an item's hotkey picks it directly. Esc and Ctrl-C cancel the screen.

use anyhow::{Context, Result};
use console::{Key, Term, style};
use std::io::{self, IsTerminal};

use crate::menu::{MenuItem, Prompter};

/// What a single key press does to an open list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Move(usize),
    Choose(usize),
    Cancel,
    Ignore,
}

/// Map a key to its effect on `items` with the cursor at `cursor`.
///
/// Hotkeys are case-sensitive (`b` and `B` are different items).
pub fn handle_key(key: &Key, cursor: usize, items: &[MenuItem]) -> KeyOutcome {
    if items.is_empty() {
        return KeyOutcome::Cancel;
    }
    let last = items.len() - 1;
    match key {
        Key::ArrowUp | Key::BackTab => {
            KeyOutcome::Move(if cursor == 0 { last } else { cursor - 1 })
        }
        Key::ArrowDown | Key::Tab => {
            KeyOutcome::Move(if cursor >= last { 0 } else { cursor + 1 })
        }
        Key::Home => KeyOutcome::Move(0),
        Key::End => KeyOutcome::Move(last),
        Key::Enter => KeyOutcome::Choose(cursor.min(last)),
        Key::Escape | Key::Char('\u{3}') => KeyOutcome::Cancel,
        Key::Char(c) => match items.iter().position(|i| i.key == *c) {
            Some(index) => KeyOutcome::Choose(index),
            None => KeyOutcome::Ignore,
        },
        _ => KeyOutcome::Ignore,
    }
}

/// Like [`handle_key`], for the raw result of a terminal read.
///
/// In raw mode Ctrl-C arrives as an `Interrupted` read error instead of a
/// signal; it cancels the screen rather than aborting the session.
pub fn read_outcome(read: io::Result<Key>, cursor: usize, items: &[MenuItem]) -> Result<KeyOutcome> {
    match read {
        Ok(key) => Ok(handle_key(&key, cursor, items)),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(KeyOutcome::Cancel),
        Err(e) => Err(e).context("failed to read menu key"),
    }
}

/// Lines for one frame: title, then one line per item with the cursor marked.
pub fn render_lines(title: &str, items: &[MenuItem], cursor: usize, is_tty: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(if is_tty {
        style(title).bold().to_string()
    } else {
        title.to_string()
    });
    for (i, item) in items.iter().enumerate() {
        let line = match (i == cursor, is_tty) {
            (true, true) => format!("{} {}", style(">").cyan().bold(), style(item).cyan()),
            (true, false) => format!("> {item}"),
            (false, _) => format!("  {item}"),
        };
        lines.push(line);
    }
    lines
}

/// Holds the terminal in prompt state: cursor hidden and SIGINT ignored.
///
/// Between raw key reads the terminal is briefly in cooked mode, where
/// Ctrl-C would raise SIGINT and kill the menu. Dropping the guard restores
/// both, so the toolchain still receives Ctrl-C while it runs.
struct PromptGuard<'a> {
    term: &'a Term,
    #[cfg(unix)]
    previous_sigint: libc::sighandler_t,
}

impl<'a> PromptGuard<'a> {
    fn new(term: &'a Term) -> io::Result<Self> {
        #[cfg(unix)]
        // SAFETY: SIG_IGN is a valid disposition and the previous one is restored on drop.
        let previous_sigint = unsafe { libc::signal(libc::SIGINT, libc::SIG_IGN) };
        let guard = Self {
            term,
            #[cfg(unix)]
            previous_sigint,
        };
        guard.term.hide_cursor()?;
        Ok(guard)
    }
}

impl Drop for PromptGuard<'_> {
    fn drop(&mut self) {
        let _ = self.term.show_cursor();
        #[cfg(unix)]
        // SAFETY: restores the disposition returned by `signal` in `new`.
        unsafe {
            libc::signal(libc::SIGINT, self.previous_sigint);
        }
    }
}

#[derive(Debug, Default)]
pub struct TermPrompter;

impl TermPrompter {
    /// The menu needs a keyboard; refuse to start when stdin is piped.
    pub fn is_available() -> bool {
        io::stdin().is_terminal()
    }
}

impl Prompter for TermPrompter {
    fn select(&mut self, title: &str, items: &[MenuItem]) -> Result<Option<usize>> {
        let term = Term::stderr();
        let is_tty = term.is_term();
        let _guard = PromptGuard::new(&term).context("failed to prepare terminal")?;
        let mut cursor = 0;
        loop {
            let lines = render_lines(title, items, cursor, is_tty);
            for line in &lines {
                term.write_line(line).context("failed to draw menu")?;
            }
            let outcome = read_outcome(term.read_key(), cursor, items)?;
            term.clear_last_lines(lines.len())
                .context("failed to redraw menu")?;
            match outcome {
                KeyOutcome::Move(next) => cursor = next,
                KeyOutcome::Choose(index) => {
                    let chosen = format!("{title}: {}", items[index].label);
                    term.write_line(&chosen).context("failed to draw menu")?;
                    return Ok(Some(index));
                }
                KeyOutcome::Cancel => return Ok(None),
                KeyOutcome::Ignore => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{Menu, Screen};
    use crate::profile::default_release_flags;

    fn main_items() -> Vec<MenuItem> {
        Menu::new("app", default_release_flags()).items(Screen::Main)
    }

    #[test]
    fn hotkeys_choose_their_item() {
        let items = main_items();
        assert_eq!(handle_key(&Key::Char('b'), 0, &items), KeyOutcome::Choose(0));
        assert_eq!(handle_key(&Key::Char('B'), 0, &items), KeyOutcome::Choose(1));
        assert_eq!(handle_key(&Key::Char('c'), 0, &items), KeyOutcome::Choose(2));
        assert_eq!(handle_key(&Key::Char('q'), 0, &items), KeyOutcome::Choose(3));
    }

    #[test]
    fn linux_cpu_digits_choose_rows() {
        let items = Menu::new("app", default_release_flags()).items(Screen::LinuxCpu);
        assert_eq!(handle_key(&Key::Char('4'), 0, &items), KeyOutcome::Choose(3));
        assert_eq!(handle_key(&Key::Char('7'), 0, &items), KeyOutcome::Choose(6));
        assert_eq!(handle_key(&Key::Char('8'), 0, &items), KeyOutcome::Ignore);
    }

    #[test]
    fn unknown_characters_are_ignored() {
        assert_eq!(handle_key(&Key::Char('x'), 1, &main_items()), KeyOutcome::Ignore);
    }

    #[test]
    fn arrows_wrap_around() {
        let items = main_items();
        assert_eq!(handle_key(&Key::ArrowUp, 0, &items), KeyOutcome::Move(3));
        assert_eq!(handle_key(&Key::ArrowDown, 3, &items), KeyOutcome::Move(0));
        assert_eq!(handle_key(&Key::ArrowDown, 1, &items), KeyOutcome::Move(2));
        assert_eq!(handle_key(&Key::End, 0, &items), KeyOutcome::Move(3));
    }

    #[test]
    fn enter_chooses_cursor() {
        assert_eq!(handle_key(&Key::Enter, 2, &main_items()), KeyOutcome::Choose(2));
    }

    #[test]
    fn escape_and_ctrl_c_cancel() {
        let items = main_items();
        assert_eq!(handle_key(&Key::Escape, 0, &items), KeyOutcome::Cancel);
        assert_eq!(handle_key(&Key::Char('\u{3}'), 0, &items), KeyOutcome::Cancel);
    }

    #[test]
    fn interrupted_read_cancels() {
        let read = Err(io::Error::new(io::ErrorKind::Interrupted, "read interrupted"));
        assert_eq!(read_outcome(read, 0, &main_items()).unwrap(), KeyOutcome::Cancel);
    }

    #[test]
    fn other_read_errors_propagate() {
        let read = Err(io::Error::new(io::ErrorKind::UnexpectedEof, "closed"));
        let err = format!("{:#}", read_outcome(read, 0, &main_items()).unwrap_err());
        assert!(err.contains("failed to read menu key"), "{err}");
    }

    #[test]
    fn render_marks_cursor_row() {
        let lines = render_lines("Build app", &main_items(), 2, false);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Build app");
        assert!(lines[1].starts_with("  [b] Build default"));
        assert!(lines[3].starts_with("> [c] Clean"));
        assert_eq!(lines[4], "  [q] Quit");
    }

    #[cfg(unix)]
    fn sigint_disposition() -> libc::sighandler_t {
        // SAFETY: a null new action only queries the current disposition.
        unsafe {
            let mut current: libc::sigaction = std::mem::zeroed();
            libc::sigaction(libc::SIGINT, std::ptr::null(), &mut current);
            current.sa_sigaction
        }
    }

    #[cfg(unix)]
    #[test]
    fn guard_ignores_sigint_until_dropped() {
        let before = sigint_disposition();
        let term = Term::stderr();
        {
            let _guard = PromptGuard::new(&term).unwrap();
            assert_eq!(sigint_disposition(), libc::SIG_IGN);
        }
        assert_eq!(sigint_disposition(), before);
    }
}
