use std::path::PathBuf;

/// Host platform family, as far as the engine-shadowing check cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
    Unknown,
}

impl Platform {
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(unix) {
            Self::Unix
        } else if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unknown
        }
    }

    /// Whether a directory-local `git` binary could take precedence over the one on PATH.
    #[must_use]
    pub const fn resolves_executables_from_cwd(self) -> bool {
        !matches!(self, Self::Unix)
    }
}

/// Process and host lookups the resolver depends on.
pub trait Environment {
    /// Working directory of the current process.
    fn current_dir(&self) -> Option<PathBuf>;

    /// Path the program was invoked as (`argv[0]`).
    fn invoked_as(&self) -> Option<PathBuf>;

    /// Resolved path of the running executable.
    fn entry_point(&self) -> Option<PathBuf>;

    fn platform(&self) -> Platform;
}

/// [`Environment`] backed by the real process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn current_dir(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }

    fn invoked_as(&self) -> Option<PathBuf> {
        std::env::args_os().next().map(PathBuf::from)
    }

    fn entry_point(&self) -> Option<PathBuf> {
        std::env::current_exe().ok()
    }

    fn platform(&self) -> Platform {
        Platform::current()
    }
}
