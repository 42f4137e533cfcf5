use crate::output::is_quiet;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::DNA, text.style(theme().banner.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().ok.clone()));
}

/// Errors and warnings go to stderr so `stats --json` output stays clean
pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().failure.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().caution.clone()));
}

pub fn info(icon: &str, label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}: {}", icon.style(theme().icon.clone()), label.style(theme().label.clone()), value);
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().banner.clone()));
}

pub fn timing(elapsed: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::CLOCK.style(theme().label.clone()), elapsed);
}

/// `label value` line in a load summary; the value is a row count
pub fn summary_row(label: &str, count: usize) {
    println!("  {:<16} {}", label.style(theme().label.clone()), count.style(theme().count.clone()));
}
