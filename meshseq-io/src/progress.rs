//! Textual progress bars for loading and rendering

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{msg}: {percent:>3}%|{wide_bar}| {pos}/{len} [{elapsed_precise}<{eta_precise}]";

/// Create a progress bar over `total` items, hidden when `visible` is false
pub fn progress_bar(total: usize, message: &'static str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar
}
