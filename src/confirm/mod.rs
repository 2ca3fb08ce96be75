//! Single-keystroke accept/reject gate.
//!
//! The state machine is pure: [`ConfirmationState::transition`] maps a state
//! and a key to the next state with no I/O. Rendering and key reading live in
//! [`terminal`].

pub mod terminal;

use std::io;

use tracing::debug;

use crate::action::ActionKind;

/// A keystroke, reduced to what the gate distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    /// Ctrl-C or another interrupt signal.
    Interrupt,
    /// Any other key (arrows, function keys, ...).
    Other,
}

/// Gate states. Everything except `Prompting` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmationState {
    #[default]
    Prompting,
    Accepted,
    Rejected,
    Cancelled,
}

/// The operator's final decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Accepted,
    Rejected,
    Cancelled,
}

impl ConfirmationState {
    /// Next state after `key`. Terminal states absorb every key.
    pub fn transition(self, key: Key) -> Self {
        match self {
            ConfirmationState::Prompting => match key {
                Key::Char('y' | 'Y') | Key::Enter => ConfirmationState::Accepted,
                Key::Char('n' | 'N') => ConfirmationState::Rejected,
                Key::Escape | Key::Interrupt => ConfirmationState::Cancelled,
                Key::Char(_) | Key::Other => ConfirmationState::Prompting,
            },
            terminal => terminal,
        }
    }

    pub fn outcome(self) -> Option<ConfirmationOutcome> {
        match self {
            ConfirmationState::Prompting => None,
            ConfirmationState::Accepted => Some(ConfirmationOutcome::Accepted),
            ConfirmationState::Rejected => Some(ConfirmationOutcome::Rejected),
            ConfirmationState::Cancelled => Some(ConfirmationOutcome::Cancelled),
        }
    }
}

/// Source of keystrokes. Blocks until a key is available.
pub trait KeySource {
    fn read_key(&mut self) -> io::Result<Key>;
}

/// Feed keys into the state machine until it reaches a terminal state.
///
/// An interrupted read counts as [`Key::Interrupt`].
pub fn decide<K: KeySource + ?Sized>(keys: &mut K) -> io::Result<ConfirmationOutcome> {
    let mut state = ConfirmationState::Prompting;
    loop {
        let key = match keys.read_key() {
            Ok(key) => key,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Key::Interrupt,
            Err(e) => return Err(e),
        };
        state = state.transition(key);
        if let Some(outcome) = state.outcome() {
            debug!("Confirmation outcome: {:?} (last key {:?})", outcome, key);
            return Ok(outcome);
        }
    }
}

/// Shows the candidate to the operator and collects the decision.
///
/// This is the seam the pipeline talks to; the terminal implementation
/// renders with `console`, tests script the keys.
pub trait Prompter {
    fn confirm(&mut self, kind: ActionKind, message: &str) -> io::Result<ConfirmationOutcome>;

    /// Called after the action ran (or was skipped) with the final outcome.
    fn finish(&mut self, _kind: ActionKind, _outcome: ConfirmationOutcome) {}
}

/// [`Prompter`] that replays a fixed key sequence, for tests and scripting.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: std::collections::VecDeque<Key>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Keys typed as a string; `\n` is Enter, `\x1b` is Escape.
    pub fn from_input(input: &str) -> Self {
        Self::new(input.chars().map(|c| match c {
            '\n' | '\r' => Key::Enter,
            '\x1b' => Key::Escape,
            '\x03' => Key::Interrupt,
            c => Key::Char(c),
        }))
    }
}

impl KeySource for ScriptedKeys {
    fn read_key(&mut self) -> io::Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more scripted keys"))
    }
}

impl Prompter for ScriptedKeys {
    fn confirm(&mut self, _kind: ActionKind, _message: &str) -> io::Result<ConfirmationOutcome> {
        decide(self)
    }
}
