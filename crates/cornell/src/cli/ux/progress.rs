use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// The spinner currently drawn on the terminal, if any.
static ACTIVE_SPINNER: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Runs `f` with the active spinner hidden, so whatever `f` prints to the
/// terminal is not interleaved with spinner frames.
pub fn with_spinner_suspended<R>(f: impl FnOnce() -> R) -> R {
    let active = match ACTIVE_SPINNER.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    };
    match active {
        Some(spinner) => spinner.suspend(f),
        None => f(),
    }
}

fn set_active(spinner: Option<ProgressBar>) {
    match ACTIVE_SPINNER.lock() {
        Ok(mut guard) => *guard = spinner,
        Err(poisoned) => *poisoned.into_inner() = spinner,
    }
}

/// A spinner shown while waiting for an answer.
#[derive(Debug)]
pub struct GenerationSpinner {
    spinner: ProgressBar,
}

impl GenerationSpinner {
    /// Creates a new `GenerationSpinner` with a message.
    pub fn new(msg: String) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.set_message(msg);
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        set_active(Some(spinner.clone()));

        Self { spinner }
    }

    /// Stops the spinner and clears it from the terminal.
    pub fn clear(&self) {
        set_active(None);
        self.spinner.finish_and_clear();
    }
}
