use console::{Style, StyledObject};
use cornell_core::responder::Answer;

/// "•" encoded as UTF-8 and decoded as Windows-1252, as it sometimes
/// appears in model output.
const MISENCODED_BULLET: &str = "\u{e2}\u{20ac}\u{a2}";
const BULLET_REPLACEMENT: &str = "  *";

/// Represents the kind of text printed by the REPL, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// The prompt for user input.
    Prompt,
    /// Hints such as how to exit.
    Hint,
}

/// Styles a string of text according to the specified `MessageType`.
pub fn style_text(text: &str, style: MessageType) -> StyledObject<&str> {
    let style_obj = match style {
        MessageType::Prompt => Style::new().blue().bold(),
        MessageType::Hint => Style::new().white().dim(),
    };
    style_obj.apply_to(text)
}

/// Replaces mis-encoded bullets with a markdown list marker.
pub fn normalize_bullets(text: &str) -> String {
    text.replace(MISENCODED_BULLET, BULLET_REPLACEMENT)
}

/// Renders an answer for the terminal: the normalized text, then the cited
/// sources as `  - title (uri)` lines when there are any.
pub fn format_answer(answer: &Answer) -> String {
    let mut out = format!("\n{}\n", normalize_bullets(&answer.text));
    if !answer.sources.is_empty() {
        out.push_str("\nSources:\n");
        for source in &answer.sources {
            out.push_str(&format!("  - {} ({})\n", source.title, source.uri));
        }
    }
    out
}
