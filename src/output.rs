//! Output switches read once from the environment

use std::sync::OnceLock;

static SETTINGS: OnceLock<OutputSettings> = OnceLock::new();

/// How much decoration terminal output gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSettings {
    /// `HMMDB_QUIET`: no banners, info lines, timings or spinners
    pub quiet: bool,
    /// Off under `NO_COLOR` or when stdout is not a terminal
    pub color: bool,
    /// Stdout is a terminal
    pub interactive: bool,
}

impl OutputSettings {
    pub fn from_env() -> Self {
        let quiet = std::env::var("HMMDB_QUIET").is_ok_and(|v| parse_flag(&v));
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::resolve(quiet, no_color, console::Term::stdout().is_term())
    }

    fn resolve(quiet: bool, no_color: bool, interactive: bool) -> Self {
        Self {
            quiet,
            color: interactive && !no_color,
            interactive,
        }
    }

    /// Spinners only make sense on a terminal that is not silenced
    pub fn show_progress(&self) -> bool {
        self.interactive && !self.quiet
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

pub fn settings() -> OutputSettings {
    *SETTINGS.get_or_init(OutputSettings::from_env)
}

pub fn is_quiet() -> bool {
    settings().quiet
}
