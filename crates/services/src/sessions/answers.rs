use std::collections::HashSet;

use quiz_core::model::{AnswerMap, OptionChoice, Question, QuestionId};

/// Answers of one attempt plus the question ids they are counted against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerStore {
    answers: AnswerMap,
    questions: HashSet<QuestionId>,
}

impl AnswerStore {
    /// Seed the store with resume data. Keys that name no loaded question are kept
    /// (they are sent back on submit) but never counted.
    #[must_use]
    pub fn new(questions: &[Question], prior: AnswerMap) -> Self {
        Self {
            answers: prior,
            questions: questions.iter().map(Question::id).collect(),
        }
    }

    /// Overwrite the choice for `question`. The option number is not range-checked.
    pub fn set_answer(&mut self, question: QuestionId, choice: OptionChoice) {
        self.answers.set(question, choice);
    }

    #[must_use]
    pub fn answer(&self, question: QuestionId) -> Option<OptionChoice> {
        self.answers.get(question)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers
            .iter()
            .filter(|(question, _)| self.questions.contains(question))
            .count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.total() - self.answered_count()
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }
}
