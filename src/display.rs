use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::notch::NotchCategory;
use crate::parser::search::SearchCandidate;
use crate::parser::specs::DisplaySpec;
use crate::session::ViewState;

pub const LOADING_MESSAGE: &str = "Fetching display specs from GSMArena...";

pub fn spinner() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.blue} {msg}")?);
    pb.set_message(LOADING_MESSAGE);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Loading and error lines for the current view.
pub fn print_status(state: &ViewState) {
    if state.loading {
        println!("{}", LOADING_MESSAGE);
    }
    if let Some(err) = &state.error {
        println!("{}", err);
    }
}

pub fn print_candidates(candidates: &[SearchCandidate]) {
    println!("Select a phone:");
    println!("{:>3} | {:<32} | {:<12} | {}", "#", "Name", "Brand", "Slug");
    println!("{}", "-".repeat(80));
    for (i, c) in candidates.iter().enumerate() {
        println!(
            "{:>3} | {:<32} | {:<12} | {}",
            i + 1,
            truncate(&c.name, 32),
            truncate(&c.brand, 12),
            c.identifier
        );
    }
}

/// Spec card. `detected` is what the classifier said; `shown` may be a user
/// override.
pub fn print_phone(spec: &DisplaySpec, shown: NotchCategory, detected: NotchCategory) {
    println!("{}", spec.name);
    println!("{}", spec.brand);
    println!("{}", "-".repeat(48));
    println!("  {:<16} {}", "Display Size", spec.display_size);
    println!("  {:<16} {}", "Screen-to-Body", spec.screen_to_body);
    println!("  {:<16} {}", "Resolution", spec.resolution);
    println!("  {:<16} {}", "Display Type", spec.display_type);
    println!("{}", "-".repeat(48));

    let note = if shown == detected { "" } else { " (override)" };
    println!("  Notch / Cutout   {}{}", shown.label(), note);
    println!("                   {}", shown.description());
}

pub fn print_notch_options(current: NotchCategory) {
    println!("Change notch type:");
    for (i, n) in NotchCategory::ALL.iter().enumerate() {
        let marker = if *n == current { "*" } else { " " };
        println!("{} {}. {:<15} {:<15} {}", marker, i + 1, n.label(), n.id(), n.description());
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_width() {
        assert_eq!(truncate("Galaxy S24", 12), "Galaxy S24");
        let long = truncate("Samsung Galaxy Z Fold6 Special Edition", 12);
        assert_eq!(long, "Samsung G...");
        assert_eq!(long.chars().count(), 12);
    }

    #[test]
    fn truncate_narrower_than_ellipsis() {
        assert_eq!(truncate("Pixel", 2), "...");
        assert_eq!(truncate("Pixel", 0), "...");
        assert_eq!(truncate("", 0), "");
    }
}
