//! Training infrastructure.

pub mod corpus;
pub mod pair_index;
pub mod trainer;

pub use corpus::{count_lines, scan_corpus, CorpusStats};
pub use pair_index::{CountChange, PairIndex};
pub use trainer::BpeTrainer;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for one training phase.
pub(crate) fn phase_bar(len: u64, message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{msg:<22} {bar:40} {pos}/{len}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar
}
