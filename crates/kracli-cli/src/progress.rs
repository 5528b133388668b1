//! Byte-level progress bars for transfers.

use indicatif::{ProgressBar, ProgressStyle};
use kracli_core::transfer::ProgressEvent;

/// A byte progress bar, hidden under `--quiet` (indicatif also hides it
/// automatically when stderr is not a terminal).
pub fn byte_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, eta {eta})",
        )
        .unwrap()
        .progress_chars("=>-"),
    );
    bar
}

/// Feed a transfer progress event into the bar.
pub fn update(bar: &ProgressBar, event: ProgressEvent) {
    match event {
        ProgressEvent::Started {
            total,
            resumed_from,
        } => {
            if let Some(total) = total {
                bar.set_length(total);
            }
            bar.set_position(resumed_from);
        }
        ProgressEvent::Chunk(bytes) => bar.inc(bytes),
    }
}
