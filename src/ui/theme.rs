use owo_colors::Style;
use std::sync::OnceLock;

use crate::output::settings;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for each kind of line hmmdb prints
#[derive(Debug, Clone)]
pub struct Theme {
    /// Command banners and section titles
    pub banner: Style,
    pub ok: Style,
    pub failure: Style,
    pub caution: Style,
    /// Icons in front of `label: value` lines
    pub icon: Style,
    pub label: Style,
    /// Row counts in summaries
    pub count: Style,
}

impl Theme {
    pub fn new(color: bool) -> Self {
        if !color {
            let none = Style::new();
            return Self {
                banner: none.clone(),
                ok: none.clone(),
                failure: none.clone(),
                caution: none.clone(),
                icon: none.clone(),
                label: none.clone(),
                count: none,
            };
        }
        Self {
            banner: Style::new().cyan().bold(),
            ok: Style::new().green().bold(),
            failure: Style::new().red().bold(),
            caution: Style::new().yellow().bold(),
            icon: Style::new().blue(),
            label: Style::new().white().dimmed(),
            count: Style::new().magenta().bold(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(|| Theme::new(settings().color))
}
