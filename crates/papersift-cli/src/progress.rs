//! Download progress on stderr.

use indicatif::{ProgressBar, ProgressStyle};
use papersift::pipeline::BatchProgress;

use super::*;

/// Bar template, one tick per fetched batch.
const TEMPLATE: &str =
  "{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches";

/// Progress bar fed by [`BatchProgress`] updates.
///
/// The bar is created lazily on the first update, so runs without any fetch draw nothing.
/// `indicatif` hides it when stderr is not a terminal.
pub struct DownloadProgress {
  /// Style shared by the bar
  style: ProgressStyle,
  /// The bar, once the number of batches is known
  bar:   Option<ProgressBar>,
}

impl DownloadProgress {
  /// Prepares the bar style.
  pub fn new() -> Result<Self> {
    let style = ProgressStyle::default_bar().template(TEMPLATE)?.progress_chars("#>-");
    Ok(Self { style, bar: None })
  }

  /// Moves the bar to the reported position.
  pub fn update(&mut self, progress: BatchProgress) {
    let bar = self.bar.get_or_insert_with(|| {
      ProgressBar::new(progress.total as u64)
        .with_style(self.style.clone())
        .with_message("Downloading")
    });
    bar.set_position(progress.completed as u64);
  }

  /// Removes the bar from the terminal.
  pub fn finish(&self) {
    if let Some(bar) = &self.bar {
      bar.finish_and_clear();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_bar_follows_batches() {
    let mut progress = DownloadProgress::new().unwrap();
    assert!(progress.bar.is_none());

    progress.update(BatchProgress { completed: 0, total: 3 });
    progress.update(BatchProgress { completed: 2, total: 3 });
    let bar = progress.bar.clone().unwrap();
    assert_eq!(bar.length(), Some(3));
    assert_eq!(bar.position(), 2);

    progress.finish();
    assert!(bar.is_finished());
  }
}
