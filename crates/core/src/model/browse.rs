use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::ids::QuizId;
use crate::model::quiz::QuizListing;

//
// ─── CHAPTER FILTER ───────────────────────────────────────────────────────────
//

/// Which chapter's quizzes to list. The server spells "no filter" as `all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChapterFilter {
    #[default]
    All,
    Chapter(String),
}

impl ChapterFilter {
    /// Blank text and `all` (any case) select every chapter.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Chapter(trimmed.to_string())
        }
    }

    /// Value of the `chapter_name` query parameter.
    #[must_use]
    pub fn as_query(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Chapter(name) => name,
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    #[must_use]
    pub fn selects(&self, chapter: &str) -> bool {
        match self {
            Self::All => true,
            Self::Chapter(name) => name == chapter,
        }
    }
}

impl fmt::Display for ChapterFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All Chapters"),
            Self::Chapter(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSummary {
    pub id: u64,
    pub name: String,
}

/// Quizzes of one chapter plus the chapters the user can switch to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterQuizzes {
    pub chapters: Vec<ChapterSummary>,
    pub selected: ChapterFilter,
    pub quizzes: Vec<QuizListing>,
}

//
// ─── SEARCH ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectHit {
    pub id: u64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterHit {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub subject_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizHit {
    pub id: QuizId,
    pub name: String,
    pub description: String,
    pub date: Option<String>,
}

/// Matches for a free-text query across subjects, chapters and quizzes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub subjects: Vec<SubjectHit>,
    pub chapters: Vec<ChapterHit>,
    pub quizzes: Vec<QuizHit>,
}

impl SearchResults {
    #[must_use]
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.subjects.len() + self.chapters.len() + self.quizzes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_all_select_every_chapter() {
        assert_eq!(ChapterFilter::parse(""), ChapterFilter::All);
        assert_eq!(ChapterFilter::parse(" ALL "), ChapterFilter::All);
        assert_eq!(
            ChapterFilter::parse(" Ownership "),
            ChapterFilter::Chapter("Ownership".into())
        );
    }

    #[test]
    fn filter_query_and_selection() {
        let ownership = ChapterFilter::Chapter("Ownership".into());
        assert_eq!(ownership.as_query(), "Ownership");
        assert!(ownership.selects("Ownership"));
        assert!(!ownership.selects("Traits"));
        assert_eq!(ChapterFilter::All.as_query(), "all");
        assert!(ChapterFilter::All.selects("Traits"));
        assert_eq!(ChapterFilter::All.to_string(), "All Chapters");
    }

    #[test]
    fn search_total_counts_every_kind() {
        let mut results = SearchResults::empty("rust");
        assert!(results.is_empty());
        results.subjects.push(SubjectHit {
            id: 1,
            name: "Rust".into(),
            description: String::new(),
        });
        results.quizzes.push(QuizHit {
            id: QuizId::new(3),
            name: "Rust basics".into(),
            description: String::new(),
            date: None,
        });
        assert_eq!(results.total(), 2);
    }
}
