use crate::cli::ux::{GenerationSpinner, MessageType, format_answer, style_text};
use anyhow::Result;
use cornell_core::responder::Responder;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use tracing::debug;

const WELCOME_BANNER: &str = "Welcome to the Cornell AI Assistant. Type 'exit' to quit.";
const EMPTY_INPUT_MESSAGE: &str = "Please enter a question.";
const INTERRUPT_HINT: &str = "Type 'exit' to quit.";
const THINKING_MESSAGE: &str = "Thinking...";

/// One read from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl-C at the prompt.
    Interrupted,
    /// Ctrl-D or closed stdin.
    Eof,
}

/// Source of user input lines.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<Input>;
}

/// Reads lines from the terminal with in-memory history.
pub struct TerminalReader {
    editor: DefaultEditor,
}

impl TerminalReader {
    pub fn new() -> Result<Self> {
        let config = rustyline::Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .build();
        Ok(Self {
            editor: DefaultEditor::with_config(config)?,
        })
    }
}

impl LineReader for TerminalReader {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                self.editor.add_history_entry(line.as_str())?;
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Exit,
    Empty,
    Ask(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("exit") {
        Command::Exit
    } else if trimmed.is_empty() {
        Command::Empty
    } else {
        Command::Ask(trimmed)
    }
}

/// Runs the question loop until the user types `exit` or input ends.
///
/// Each question is answered before the next line is read.
pub async fn run(
    responder: &dyn Responder,
    reader: &mut dyn LineReader,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out, "{WELCOME_BANNER}")?;
    let prompt = format!("\n{}", style_text("> ", MessageType::Prompt));

    loop {
        out.flush()?;
        let line = match reader.read_line(&prompt)? {
            Input::Line(line) => line,
            Input::Interrupted => {
                writeln!(out, "{}", style_text(INTERRUPT_HINT, MessageType::Hint))?;
                continue;
            }
            Input::Eof => {
                debug!("End of input, leaving chat");
                return Ok(());
            }
        };

        match parse_command(&line) {
            Command::Exit => {
                debug!("Exit requested");
                return Ok(());
            }
            Command::Empty => {
                writeln!(out, "{EMPTY_INPUT_MESSAGE}")?;
            }
            Command::Ask(question) => {
                let spinner = GenerationSpinner::new(THINKING_MESSAGE.to_string());
                let answer = responder.respond(question).await;
                spinner.clear();

                debug!(sources = answer.sources.len(), "Answer received");
                write!(out, "{}", format_answer(&answer))?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cornell_core::responder::{Answer, Source};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct FakeResponder {
        prompts: Mutex<Vec<String>>,
        answer: Answer,
    }

    impl FakeResponder {
        fn new(answer: Answer) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                answer,
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Responder for FakeResponder {
        async fn respond(&self, prompt: &str) -> Answer {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.answer.clone()
        }
    }

    /// Replays scripted input, then reports end of input.
    struct ScriptedReader {
        inputs: VecDeque<Input>,
    }

    impl ScriptedReader {
        fn lines(lines: &[&str]) -> Self {
            Self {
                inputs: lines.iter().map(|l| Input::Line(l.to_string())).collect(),
            }
        }
    }

    impl LineReader for ScriptedReader {
        fn read_line(&mut self, _prompt: &str) -> Result<Input> {
            Ok(self.inputs.pop_front().unwrap_or(Input::Eof))
        }
    }

    struct BrokenReader;

    impl LineReader for BrokenReader {
        fn read_line(&mut self, _prompt: &str) -> Result<Input> {
            Err(anyhow::anyhow!("terminal went away"))
        }
    }

    async fn run_script(responder: &FakeResponder, reader: &mut dyn LineReader) -> String {
        let mut out = Vec::new();
        run(responder, reader, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("exit"), Command::Exit);
        assert_eq!(parse_command("EXIT"), Command::Exit);
        assert_eq!(parse_command("  Exit \n"), Command::Exit);
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command(" \t "), Command::Empty);
        assert_eq!(
            parse_command("  exit the campus how?  "),
            Command::Ask("exit the campus how?")
        );
        assert_eq!(parse_command("exits"), Command::Ask("exits"));
    }

    #[tokio::test]
    async fn test_exit_in_any_case_stops_without_calling_responder() {
        for exit in ["exit", "Exit", "EXIT", "  eXiT  "] {
            let responder = FakeResponder::new(Answer::from_message("unused"));
            let mut reader = ScriptedReader::lines(&[exit, "When was Cornell founded?"]);

            let output = run_script(&responder, &mut reader).await;

            assert!(responder.prompts().is_empty(), "input: {exit:?}");
            assert_eq!(reader.inputs.len(), 1, "input after exit must not be read");
            assert_eq!(output, format!("{WELCOME_BANNER}\n"));
        }
    }

    #[tokio::test]
    async fn test_empty_input_asks_again_without_calling_responder() {
        let responder = FakeResponder::new(Answer::from_message("unused"));
        let mut reader = ScriptedReader::lines(&["", "   ", "\t", "exit"]);

        let output = run_script(&responder, &mut reader).await;

        assert!(responder.prompts().is_empty());
        assert_eq!(output.matches(EMPTY_INPUT_MESSAGE).count(), 3);
    }

    #[tokio::test]
    async fn test_question_is_answered_and_rendered() {
        let responder = FakeResponder::new(Answer {
            text: "Cornell was founded in 1865.\nâ€¢ Ithaca, NY".to_string(),
            sources: vec![Source {
                title: "About Cornell".to_string(),
                uri: "https://www.cornell.edu/about/".to_string(),
            }],
        });
        let mut reader = ScriptedReader::lines(&["  When was Cornell founded?  ", "exit"]);

        let output = run_script(&responder, &mut reader).await;

        assert_eq!(responder.prompts(), vec!["When was Cornell founded?"]);
        assert!(output.starts_with(WELCOME_BANNER));
        assert!(output.contains("\nCornell was founded in 1865.\n  * Ithaca, NY\n"));
        assert!(output.contains("\nSources:\n  - About Cornell (https://www.cornell.edu/about/)\n"));
    }

    #[tokio::test]
    async fn test_answer_without_sources_has_no_sources_section() {
        let responder = FakeResponder::new(Answer::from_message("Ithaca."));
        let mut reader = ScriptedReader::lines(&["Where?", "Where?"]);

        let output = run_script(&responder, &mut reader).await;

        assert_eq!(responder.prompts().len(), 2);
        assert_eq!(output.matches("\nIthaca.\n").count(), 2);
        assert!(!output.contains("Sources:"));
    }

    #[tokio::test]
    async fn test_interrupt_prints_hint_and_continues() {
        let responder = FakeResponder::new(Answer::from_message("Yes."));
        let mut reader = ScriptedReader {
            inputs: VecDeque::from([
                Input::Interrupted,
                Input::Line("Is there a library?".to_string()),
            ]),
        };

        let output = run_script(&responder, &mut reader).await;

        assert!(output.contains(INTERRUPT_HINT));
        assert_eq!(responder.prompts(), vec!["Is there a library?"]);
    }

    #[tokio::test]
    async fn test_end_of_input_terminates() {
        let responder = FakeResponder::new(Answer::from_message("unused"));
        let mut reader = ScriptedReader::lines(&[]);

        let output = run_script(&responder, &mut reader).await;

        assert_eq!(output, format!("{WELCOME_BANNER}\n"));
        assert!(responder.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_reader_error_is_propagated() {
        let responder = FakeResponder::new(Answer::from_message("unused"));
        let mut out = Vec::new();

        let result = run(&responder, &mut BrokenReader, &mut out).await;

        assert_eq!(result.unwrap_err().to_string(), "terminal went away");
    }
}
