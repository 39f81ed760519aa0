use quiz_core::model::{ChapterFilter, ChapterQuizzes, SearchResults};

use crate::vm::catalog_vm::{QuizCardVm, map_quiz_cards};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterLinkVm {
    /// Route parameter; `all` for the unfiltered list.
    pub param: String,
    pub label: String,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterPageVm {
    pub links: Vec<ChapterLinkVm>,
    pub heading: Option<String>,
    pub cards: Vec<QuizCardVm>,
}

#[must_use]
pub fn map_chapter_page(page: &ChapterQuizzes) -> ChapterPageVm {
    let mut links = vec![ChapterLinkVm {
        param: ChapterFilter::All.as_query().to_string(),
        label: ChapterFilter::All.to_string(),
        active: page.selected.is_all(),
    }];
    links.extend(page.chapters.iter().map(|chapter| ChapterLinkVm {
        param: chapter.name.clone(),
        label: chapter.name.clone(),
        active: page.selected.selects(&chapter.name) && !page.selected.is_all(),
    }));
    ChapterPageVm {
        links,
        heading: match &page.selected {
            ChapterFilter::All => None,
            ChapterFilter::Chapter(name) => Some(format!("Chapter: {name}")),
        },
        cards: map_quiz_cards(&page.quizzes),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHitVm {
    pub key: String,
    pub title: String,
    pub detail: String,
    /// Set for quizzes, which can be started from the results.
    pub quiz_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchSectionVm {
    pub title: &'static str,
    pub hits: Vec<SearchHitVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchVm {
    pub summary: String,
    pub sections: Vec<SearchSectionVm>,
}

fn or_placeholder(text: &str) -> String {
    if text.trim().is_empty() {
        "No description".to_string()
    } else {
        text.to_string()
    }
}

/// Sections with no hits are left out.
#[must_use]
pub fn map_search(results: &SearchResults) -> SearchVm {
    let summary = if results.query.is_empty() {
        "Type something to search subjects, chapters and quizzes.".to_string()
    } else {
        match results.total() {
            1 => format!("1 result for \"{}\"", results.query),
            n => format!("{n} results for \"{}\"", results.query),
        }
    };
    let sections = [
        SearchSectionVm {
            title: "Subjects",
            hits: results
                .subjects
                .iter()
                .map(|s| SearchHitVm {
                    key: format!("subject-{}", s.id),
                    title: s.name.clone(),
                    detail: or_placeholder(&s.description),
                    quiz_id: None,
                })
                .collect(),
        },
        SearchSectionVm {
            title: "Chapters",
            hits: results
                .chapters
                .iter()
                .map(|c| SearchHitVm {
                    key: format!("chapter-{}", c.id),
                    title: c.name.clone(),
                    detail: or_placeholder(&c.description),
                    quiz_id: None,
                })
                .collect(),
        },
        SearchSectionVm {
            title: "Quizzes",
            hits: results
                .quizzes
                .iter()
                .map(|q| SearchHitVm {
                    key: format!("quiz-{}", q.id),
                    title: q.name.clone(),
                    detail: match &q.date {
                        Some(date) => format!("{} · {date}", or_placeholder(&q.description)),
                        None => or_placeholder(&q.description),
                    },
                    quiz_id: Some(q.id.to_string()),
                })
                .collect(),
        },
    ]
    .into_iter()
    .filter(|section| !section.hits.is_empty())
    .collect();
    SearchVm { summary, sections }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{ChapterSummary, QuizHit, QuizId, SubjectHit};

    #[test]
    fn chapter_links_mark_the_selection() {
        let page = ChapterQuizzes {
            chapters: vec![
                ChapterSummary {
                    id: 1,
                    name: "Ownership".into(),
                },
                ChapterSummary {
                    id: 2,
                    name: "Traits".into(),
                },
            ],
            selected: ChapterFilter::Chapter("Traits".into()),
            quizzes: Vec::new(),
        };

        let vm = map_chapter_page(&page);

        let active: Vec<_> = vm
            .links
            .iter()
            .filter(|link| link.active)
            .map(|link| link.label.as_str())
            .collect();
        assert_eq!(active, ["Traits"]);
        assert_eq!(vm.links[0].param, "all");
        assert_eq!(vm.heading.as_deref(), Some("Chapter: Traits"));
    }

    #[test]
    fn search_drops_empty_sections() {
        let results = SearchResults {
            query: "rust".into(),
            subjects: vec![SubjectHit {
                id: 1,
                name: "Rust".into(),
                description: String::new(),
            }],
            chapters: Vec::new(),
            quizzes: vec![QuizHit {
                id: QuizId::new(9),
                name: "Rust basics".into(),
                description: "Warm-up".into(),
                date: Some("2025-01-05".into()),
            }],
        };

        let vm = map_search(&results);

        assert_eq!(vm.summary, "2 results for \"rust\"");
        let titles: Vec<_> = vm.sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, ["Subjects", "Quizzes"]);
        assert_eq!(vm.sections[0].hits[0].detail, "No description");
        assert_eq!(vm.sections[1].hits[0].detail, "Warm-up · 2025-01-05");
        assert_eq!(vm.sections[1].hits[0].quiz_id.as_deref(), Some("9"));
    }
}
