use serde::Serialize;

use super::DialogStep;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    Speech,
    Dtmf,
    Both,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Speech => "speech",
            InputMode::Dtmf => "dtmf",
            InputMode::Both => "speech dtmf",
        }
    }
}

/// Input-collection block: what to listen for and where to post the answer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Gather {
    pub mode: InputMode,
    pub timeout_secs: u32,
    pub num_digits: Option<u32>,
    pub action: String,
    /// Spoken inside the collection block so the caller can answer mid-prompt.
    pub prompts: Vec<String>,
}

/// How a turn ends. Exactly one per descriptor, so every turn either collects
/// input, moves to another endpoint, or ends the call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    Collect(Gather),
    Redirect(String),
    Hangup,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StepDescriptor {
    pub step: DialogStep,
    pub prompts: Vec<String>,
    pub next: NextAction,
}

impl StepDescriptor {
    pub fn is_terminal(&self) -> bool {
        matches!(self.next, NextAction::Hangup)
    }

    /// Every line spoken by this descriptor, in order.
    pub fn spoken(&self) -> Vec<&str> {
        let nested: &[String] = match &self.next {
            NextAction::Collect(gather) => gather.prompts.as_slice(),
            _ => &[],
        };
        self.prompts
            .iter()
            .chain(nested.iter())
            .map(String::as_str)
            .collect()
    }
}
