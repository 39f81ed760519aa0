use quiz_core::model::{AttemptReview, OptionChoice, ReviewedQuestion, Verdict};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewOptionVm {
    pub letter: char,
    pub text: String,
    /// `option--correct` for the key, `option--wrong` for a missed pick.
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewQuestionVm {
    pub key: String,
    pub heading: String,
    pub options: Vec<ReviewOptionVm>,
    pub answer_line: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptReviewVm {
    pub quiz_name: String,
    pub summary: String,
    pub questions: Vec<ReviewQuestionVm>,
}

fn choice_label(choice: Option<OptionChoice>, missing: &str) -> String {
    choice
        .and_then(|c| c.letter())
        .map_or_else(|| missing.to_string(), String::from)
}

fn map_question(index: usize, reviewed: &ReviewedQuestion) -> ReviewQuestionVm {
    let question = reviewed.question();
    let options = question
        .choices()
        .map(|(choice, text)| {
            let class = if Some(choice) == reviewed.correct() {
                "option option--correct"
            } else if Some(choice) == reviewed.chosen() {
                "option option--wrong"
            } else {
                "option"
            };
            ReviewOptionVm {
                letter: choice.letter().unwrap_or('?'),
                text: text.to_string(),
                class,
            }
        })
        .collect();
    ReviewQuestionVm {
        key: question.id().to_string(),
        heading: format!("{}. {}", index + 1, question.text()),
        options,
        answer_line: format!(
            "Your answer: {} | Correct answer: {}",
            choice_label(reviewed.chosen(), "Not answered"),
            choice_label(reviewed.correct(), "Unknown"),
        ),
    }
}

#[must_use]
pub fn map_attempt_review(review: &AttemptReview) -> AttemptReviewVm {
    AttemptReviewVm {
        quiz_name: review.quiz_name().to_string(),
        summary: format!(
            "{} correct, {} wrong, {} unanswered",
            review.count(Verdict::Correct),
            review.count(Verdict::Wrong),
            review.count(Verdict::Unanswered),
        ),
        questions: review
            .questions()
            .iter()
            .enumerate()
            .map(|(index, reviewed)| map_question(index, reviewed))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerMap, Question, QuestionId};

    #[test]
    fn wrong_pick_and_key_are_both_marked() {
        let answers: AnswerMap = [(QuestionId::new(5), OptionChoice::new(1))]
            .into_iter()
            .collect();
        let review = AttemptReview::from_answers(
            "Traits",
            vec![(
                Question::new(
                    QuestionId::new(5),
                    "Which trait formats with {}?",
                    ["Debug".into(), "Display".into(), "Write".into(), "Format".into()],
                ),
                Some(OptionChoice::new(2)),
            )],
            &answers,
        );

        let vm = map_attempt_review(&review);

        assert_eq!(vm.summary, "0 correct, 1 wrong, 0 unanswered");
        let question = &vm.questions[0];
        assert_eq!(question.heading, "1. Which trait formats with {}?");
        assert_eq!(question.options[0].class, "option option--wrong");
        assert_eq!(question.options[1].class, "option option--correct");
        assert_eq!(question.options[2].class, "option");
        assert_eq!(question.answer_line, "Your answer: A | Correct answer: B");
    }

    #[test]
    fn unanswered_question_says_so() {
        let review = AttemptReview::from_answers(
            "Traits",
            vec![(
                Question::new(
                    QuestionId::new(1),
                    "Q",
                    ["a".into(), "b".into(), "c".into(), "d".into()],
                ),
                Some(OptionChoice::new(4)),
            )],
            &AnswerMap::new(),
        );
        let vm = map_attempt_review(&review);
        assert_eq!(
            vm.questions[0].answer_line,
            "Your answer: Not answered | Correct answer: D"
        );
    }
}
