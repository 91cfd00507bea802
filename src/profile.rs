//! Release and debug build profiles.

/// Linker flags that strip the symbol table and DWARF info.
pub const DEFAULT_RELEASE_FLAGS: [&str; 2] = ["-ldflags", "-w -s"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Release,
    Debug,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Release => "release",
            Profile::Debug => "debug",
        }
    }

    /// Extra toolchain arguments for this profile. Debug builds pass none.
    pub fn flags(self, release_flags: &[String]) -> &[String] {
        match self {
            Profile::Release => release_flags,
            Profile::Debug => &[],
        }
    }

    /// Menu description: the flags as they would be typed in a shell.
    pub fn describe(self, release_flags: &[String]) -> String {
        let flags = self.flags(release_flags);
        if flags.is_empty() {
            "No flags".to_string()
        } else {
            render_args(flags)
        }
    }
}

pub fn default_release_flags() -> Vec<String> {
    DEFAULT_RELEASE_FLAGS.iter().map(|s| s.to_string()).collect()
}

/// Join arguments for display, double-quoting any that contain whitespace.
pub fn render_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| {
            let a = a.as_ref();
            if a.is_empty() || a.chars().any(char::is_whitespace) {
                format!("\"{a}\"")
            } else {
                a.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
