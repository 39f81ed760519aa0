use serde::{Deserialize, Serialize};

use crate::model::answers::{AnswerMap, OptionChoice};
use crate::model::quiz::Question;

/// How a reviewed answer compares with the correct option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Wrong,
    Unanswered,
}

/// A question from a finished attempt, with the correct option revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewedQuestion {
    question: Question,
    correct: Option<OptionChoice>,
    chosen: Option<OptionChoice>,
}

impl ReviewedQuestion {
    #[must_use]
    pub fn new(
        question: Question,
        correct: Option<OptionChoice>,
        chosen: Option<OptionChoice>,
    ) -> Self {
        Self {
            question,
            correct,
            chosen,
        }
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    #[must_use]
    pub fn correct(&self) -> Option<OptionChoice> {
        self.correct
    }

    #[must_use]
    pub fn chosen(&self) -> Option<OptionChoice> {
        self.chosen
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        match self.chosen {
            None => Verdict::Unanswered,
            Some(chosen) if Some(chosen) == self.correct => Verdict::Correct,
            Some(_) => Verdict::Wrong,
        }
    }
}

/// The latest attempt at a quiz, question by question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptReview {
    quiz_name: String,
    questions: Vec<ReviewedQuestion>,
}

impl AttemptReview {
    #[must_use]
    pub fn new(quiz_name: impl Into<String>, questions: Vec<ReviewedQuestion>) -> Self {
        Self {
            quiz_name: quiz_name.into(),
            questions,
        }
    }

    /// Pair questions (in server order) with the answers recorded for them.
    #[must_use]
    pub fn from_answers(
        quiz_name: impl Into<String>,
        questions: Vec<(Question, Option<OptionChoice>)>,
        answers: &AnswerMap,
    ) -> Self {
        let questions = questions
            .into_iter()
            .map(|(question, correct)| {
                let chosen = answers.get(question.id());
                ReviewedQuestion::new(question, correct, chosen)
            })
            .collect();
        Self::new(quiz_name, questions)
    }

    #[must_use]
    pub fn quiz_name(&self) -> &str {
        &self.quiz_name
    }

    #[must_use]
    pub fn questions(&self) -> &[ReviewedQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn count(&self, verdict: Verdict) -> usize {
        self.questions
            .iter()
            .filter(|q| q.verdict() == verdict)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::QuestionId;

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            ["a".into(), "b".into(), "c".into(), "d".into()],
        )
    }

    #[test]
    fn verdicts_follow_recorded_answers() {
        let answers: AnswerMap = [
            (QuestionId::new(1), OptionChoice::new(2)),
            (QuestionId::new(2), OptionChoice::new(4)),
        ]
        .into_iter()
        .collect();
        let review = AttemptReview::from_answers(
            "Rust basics",
            vec![
                (question(1), Some(OptionChoice::new(2))),
                (question(2), Some(OptionChoice::new(1))),
                (question(3), Some(OptionChoice::new(3))),
            ],
            &answers,
        );

        let verdicts: Vec<_> = review.questions().iter().map(ReviewedQuestion::verdict).collect();
        assert_eq!(
            verdicts,
            [Verdict::Correct, Verdict::Wrong, Verdict::Unanswered]
        );
        assert_eq!(review.count(Verdict::Correct), 1);
        assert_eq!(review.count(Verdict::Unanswered), 1);
    }

    #[test]
    fn missing_correct_option_never_counts_as_correct() {
        let reviewed = ReviewedQuestion::new(question(1), None, Some(OptionChoice::new(1)));
        assert_eq!(reviewed.verdict(), Verdict::Wrong);
    }
}
