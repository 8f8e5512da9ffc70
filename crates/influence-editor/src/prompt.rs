//! Modal text prompts.
//!
//! The editor asks for labels and weights through [`Prompter`] and blocks the
//! current gesture until it answers. Dialog construction lives behind the trait.

use influence_core::NodeKey;
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    NewNodeLabel,
    RenameNode,
    EdgeWeight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub kind: PromptKind,
    pub title: String,
    pub message: String,
    /// Pre-filled value.
    pub initial: String,
    /// Why the previous answer was rejected, when re-prompting.
    pub error: Option<String>,
}

impl PromptRequest {
    pub fn new_node_label() -> Self {
        Self {
            kind: PromptKind::NewNodeLabel,
            title: "New factor".into(),
            message: "Name:".into(),
            initial: String::new(),
            error: None,
        }
    }

    pub fn rename_node(key: &NodeKey, current: &str) -> Self {
        Self {
            kind: PromptKind::RenameNode,
            title: "Rename".into(),
            message: format!("New name for {key}:"),
            initial: current.to_string(),
            error: None,
        }
    }

    pub fn edge_weight(src: &NodeKey, dst: &NodeKey, initial: f64) -> Self {
        Self {
            kind: PromptKind::EdgeWeight,
            title: "Weight".into(),
            message: format!("Weight for {src} \u{2192} {dst}:"),
            initial: format_weight(initial),
            error: None,
        }
    }
}

/// Answers modal prompts. `None` means the user cancelled.
pub trait Prompter {
    fn prompt(&mut self, request: &PromptRequest) -> Option<String>;
}

/// Replays a fixed list of answers and records every request it was shown.
/// Once the answers run out every further prompt is cancelled.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompter {
    answers: VecDeque<Option<String>>,
    requests: Vec<PromptRequest>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|a| a.map(Into::into)).collect(),
            requests: Vec::new(),
        }
    }

    pub fn push_answer(&mut self, answer: impl Into<String>) {
        self.answers.push_back(Some(answer.into()));
    }

    pub fn push_cancel(&mut self) {
        self.answers.push_back(None);
    }

    pub fn requests(&self) -> &[PromptRequest] {
        &self.requests
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, request: &PromptRequest) -> Option<String> {
        self.requests.push(request.clone());
        self.answers.pop_front().flatten()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightInputError {
    #[error("{0:?} is not a number")]
    NotANumber(String),
    #[error("{value} is outside [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
}

/// Parse a weight typed by the user. A decimal comma is accepted.
pub fn parse_weight(input: &str, min: f64, max: f64) -> Result<f64, WeightInputError> {
    let trimmed = input.trim();
    let value: f64 = trimmed
        .replace(',', ".")
        .parse()
        .map_err(|_| WeightInputError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(WeightInputError::NotANumber(trimmed.to_string()));
    }
    if value < min || value > max {
        return Err(WeightInputError::OutOfRange { value, min, max });
    }
    Ok(value)
}

/// Trimmed label, or `None` when nothing but whitespace was entered.
pub fn normalize_label(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn format_weight(weight: f64) -> String {
    format!("{weight}")
}
