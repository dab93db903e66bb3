//! Progress display for long-running commands.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a styled progress bar, hidden when there is nothing to show.
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    if total == 0 {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}
