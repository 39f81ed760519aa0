use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// The 1-based option number a user picked for a question.
///
/// The range is not checked here; the server decides what a valid option is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionChoice(u8);

impl OptionChoice {
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Letter shown next to the option (`1 → A`). `None` outside 1..=26.
    #[must_use]
    pub fn letter(self) -> Option<char> {
        match self.0 {
            1..=26 => Some(char::from(b'A' + self.0 - 1)),
            _ => None,
        }
    }
}

/// Answers recorded during a quiz attempt, keyed by question.
///
/// Keys exist only for answered questions. There is no removal:
/// an answer can be overwritten but never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<QuestionId, OptionChoice>);

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the choice for a question.
    pub fn set(&mut self, question: QuestionId, choice: OptionChoice) {
        self.0.insert(question, choice);
    }

    #[must_use]
    pub fn get(&self, question: QuestionId) -> Option<OptionChoice> {
        self.0.get(&question).copied()
    }

    #[must_use]
    pub fn contains(&self, question: QuestionId) -> bool {
        self.0.contains_key(&question)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, OptionChoice)> + '_ {
        self.0.iter().map(|(question, choice)| (*question, *choice))
    }
}

impl FromIterator<(QuestionId, OptionChoice)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (QuestionId, OptionChoice)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
