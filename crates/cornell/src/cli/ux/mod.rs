mod presenter;
mod progress;

pub use presenter::{MessageType, format_answer, normalize_bullets, style_text};
pub use progress::{GenerationSpinner, with_spinner_suspended};

use console::style;

/// Prints a formatted error message to stderr.
pub fn present_error(error: anyhow::Error) {
    let error_text = style("ERROR:").red().bold();
    eprintln!("\n{error_text} {error:#}");
}
