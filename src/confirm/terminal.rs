//! Terminal rendering and keystroke input for the confirmation gate.

use std::io::{self, BufRead};

use console::{Term, style};

use crate::action::ActionKind;

use super::{ConfirmationOutcome, Key, KeySource, Prompter, decide};

/// Reads single keys from the terminal, or whole lines when stdin is not a TTY.
pub struct TerminalKeys {
    term: Term,
}

impl TerminalKeys {
    pub fn new(term: Term) -> Self {
        Self { term }
    }
}

impl KeySource for TerminalKeys {
    fn read_key(&mut self) -> io::Result<Key> {
        if self.term.is_term() {
            // Raw mode reports Ctrl-C as a key instead of raising SIGINT.
            return self.term.read_key_raw().map(map_console_key);
        }

        // Piped input: one answer per line, EOF never counts as consent.
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        Ok(line
            .trim_end_matches(['\r', '\n'])
            .chars()
            .next()
            .map_or(Key::Enter, Key::Char))
    }
}

/// Reduce a `console` key to the gate's alphabet.
pub fn map_console_key(key: console::Key) -> Key {
    match key {
        console::Key::Char(c) => Key::Char(c),
        console::Key::Enter => Key::Enter,
        console::Key::Escape => Key::Escape,
        console::Key::CtrlC => Key::Interrupt,
        _ => Key::Other,
    }
}

/// Interactive [`Prompter`] on stderr.
pub struct TerminalPrompter {
    term: Term,
    keys: TerminalKeys,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        let term = Term::stderr();
        Self {
            keys: TerminalKeys::new(term.clone()),
            term,
        }
    }

    fn print(&self, text: impl AsRef<str>) {
        // Rendering is best effort; a closed stderr must not fail the run.
        let _ = self.term.write_line(text.as_ref());
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, kind: ActionKind, message: &str) -> io::Result<ConfirmationOutcome> {
        let (header, question) = match kind {
            ActionKind::Commit => (
                "Here's your commit message:",
                "Would you like to use this message? (Y/n):",
            ),
            ActionKind::Branch => (
                "Here's your suggested branch name:",
                "Would you like to create this branch? (Y/n):",
            ),
        };

        self.print("");
        self.print(style(header).cyan().underlined().to_string());
        self.print("");
        for (idx, line) in message.lines().enumerate() {
            let prefix = if idx == 0 { "➤ " } else { "  " };
            self.print(format!("  {}", style(format!("{prefix}{line}")).green().italic()));
        }
        self.print("");
        self.print(style(question).yellow().to_string());

        decide(&mut self.keys)
    }

    fn finish(&mut self, kind: ActionKind, outcome: ConfirmationOutcome) {
        let (headline, detail) = render_outcome(kind, outcome);
        self.print("");
        self.print(headline);
        if let Some(detail) = detail {
            self.print(style(detail).dim().italic().to_string());
        }
        self.print("");
    }
}

fn render_outcome(kind: ActionKind, outcome: ConfirmationOutcome) -> (String, Option<&'static str>) {
    match (kind, outcome) {
        (ActionKind::Commit, ConfirmationOutcome::Accepted) => (
            style("✔ Commit executed successfully!").green().bold().to_string(),
            None,
        ),
        (ActionKind::Commit, ConfirmationOutcome::Rejected) => {
            (style("✘ Commit aborted.").red().bold().to_string(), None)
        }
        (ActionKind::Branch, ConfirmationOutcome::Accepted) => (
            style("✔ Branch created successfully!").green().bold().to_string(),
            Some("You are now on the new branch."),
        ),
        (ActionKind::Branch, ConfirmationOutcome::Rejected) => (
            style("✘ Branch creation aborted.").red().bold().to_string(),
            Some("No branch was created. You can revise and try again."),
        ),
        (_, ConfirmationOutcome::Cancelled) => (
            style("Cancelled.").dim().to_string(),
            Some("Nothing was changed."),
        ),
    }
}
