use quiz_core::model::{QuizListing, ScoreRecord};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizCardVm {
    pub quiz_id: String,
    pub name: String,
    pub meta: String,
    pub date_label: String,
    pub description: Option<String>,
}

#[must_use]
pub fn map_quiz_cards(listings: &[QuizListing]) -> Vec<QuizCardVm> {
    listings
        .iter()
        .map(|item| QuizCardVm {
            quiz_id: item.id.to_string(),
            name: item.name.clone(),
            meta: format!("{} · {}", item.subject, item.chapter),
            date_label: item.date_label.clone(),
            description: item.description.clone(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreRowVm {
    pub quiz_name: String,
    pub score: String,
    pub percentage: String,
    pub attempted_at: String,
}

#[must_use]
pub fn map_score_rows(records: &[ScoreRecord]) -> Vec<ScoreRowVm> {
    records
        .iter()
        .map(|record| ScoreRowVm {
            quiz_name: record.quiz_name.clone(),
            score: format!("{}/{}", record.correct, record.attempted),
            percentage: format!("{:.1}%", record.percentage),
            attempted_at: record.attempted_at.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuizId;

    #[test]
    fn quiz_card_joins_subject_and_chapter() {
        let cards = map_quiz_cards(&[QuizListing {
            id: QuizId::new(3),
            name: "Lifetimes".into(),
            date_label: "2025-01-10".into(),
            chapter: "Borrowing".into(),
            subject: "Rust".into(),
            description: None,
        }]);
        assert_eq!(cards[0].quiz_id, "3");
        assert_eq!(cards[0].meta, "Rust · Borrowing");
    }

    #[test]
    fn score_row_formats_ratio_and_percentage() {
        let rows = map_score_rows(&[ScoreRecord {
            quiz_name: "Lifetimes".into(),
            correct: 4,
            attempted: 5,
            percentage: 80.0,
            attempted_at: "2025-01-10 10:00".into(),
        }]);
        assert_eq!(rows[0].score, "4/5");
        assert_eq!(rows[0].percentage, "80.0%");
    }
}
