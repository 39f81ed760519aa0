use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answers::OptionChoice;
use crate::model::ids::{QuestionId, QuizId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question {0} appears more than once")]
    DuplicateQuestion(QuestionId),

    #[error("remaining time ({remaining}s) exceeds the quiz duration ({duration}s)")]
    RemainingExceedsDuration { remaining: u32, duration: u32 },
}

/// Metadata of a quiz attempt as seeded by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    id: QuizId,
    name: String,
    duration_secs: u32,
    remaining_secs: u32,
}

impl Quiz {
    /// # Errors
    ///
    /// Returns `QuizError::RemainingExceedsDuration` when the server reports more time
    /// left than the quiz allows in total.
    pub fn new(
        id: QuizId,
        name: impl Into<String>,
        duration_secs: u32,
        remaining_secs: u32,
    ) -> Result<Self, QuizError> {
        if remaining_secs > duration_secs {
            return Err(QuizError::RemainingExceedsDuration {
                remaining: remaining_secs,
                duration: duration_secs,
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            duration_secs,
            remaining_secs,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Remaining time at load. The live countdown is kept by the session.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }
}

/// A multiple-choice question without its correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: [String; 4],
}

impl Question {
    #[must_use]
    pub fn new(id: QuestionId, text: impl Into<String>, options: [String; 4]) -> Self {
        Self {
            id,
            text: text.into(),
            options,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; 4] {
        &self.options
    }

    /// Text of a 1-based option.
    #[must_use]
    pub fn option(&self, choice: OptionChoice) -> Option<&str> {
        let index = usize::from(choice.value()).checked_sub(1)?;
        self.options.get(index).map(String::as_str)
    }

    /// Options paired with their 1-based choice.
    pub fn choices(&self) -> impl Iterator<Item = (OptionChoice, &str)> + '_ {
        (1_u8..)
            .zip(self.options.iter())
            .map(|(value, text)| (OptionChoice::new(value), text.as_str()))
    }
}

impl Quiz {
    /// Validate a question list against this quiz, preserving server order.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::DuplicateQuestion` on the first repeated id.
    pub fn check_questions(&self, questions: &[Question]) -> Result<(), QuizError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for question in questions {
            if !seen.insert(question.id()) {
                return Err(QuizError::DuplicateQuestion(question.id()));
            }
        }
        Ok(())
    }
}

/// Entry of the quiz catalogue shown on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizListing {
    pub id: QuizId,
    pub name: String,
    pub date_label: String,
    pub chapter: String,
    pub subject: String,
    pub description: Option<String>,
}

/// One past attempt as reported by the score history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub quiz_name: String,
    pub correct: u32,
    pub attempted: u32,
    pub percentage: f64,
    pub attempted_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            ["a".into(), "b".into(), "c".into(), "d".into()],
        )
    }

    #[test]
    fn remaining_cannot_exceed_duration() {
        let err = Quiz::new(QuizId::new(1), "Quiz", 60, 61).unwrap_err();
        assert_eq!(
            err,
            QuizError::RemainingExceedsDuration {
                remaining: 61,
                duration: 60
            }
        );
    }

    #[test]
    fn option_lookup_is_one_based() {
        let q = question(1);
        assert_eq!(q.option(OptionChoice::new(1)), Some("a"));
        assert_eq!(q.option(OptionChoice::new(4)), Some("d"));
        assert_eq!(q.option(OptionChoice::new(0)), None);
        assert_eq!(q.option(OptionChoice::new(5)), None);
    }

    #[test]
    fn duplicate_questions_are_rejected() {
        let quiz = Quiz::new(QuizId::new(1), "Quiz", 60, 60).unwrap();
        let err = quiz
            .check_questions(&[question(1), question(2), question(1)])
            .unwrap_err();
        assert_eq!(err, QuizError::DuplicateQuestion(QuestionId::new(1)));
    }
}
