use dioxus::prelude::*;
use quiz_core::model::ChapterFilter;

use crate::context::AppContext;
use crate::views::home::QuizCard;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ChapterLinkVm, map_chapter_page};

#[component]
pub fn ChapterQuizzesView(chapter_name: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let mut filter = use_signal(|| ChapterFilter::parse(&chapter_name));

    let mut resource = use_resource(move || {
        let catalog = catalog.clone();
        let filter = filter();
        async move {
            let page = catalog
                .chapter_quizzes(&filter)
                .await
                .map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_chapter_page(&page))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page chapters",
            h2 { "Available Quizzes" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(vm) => rsx! {
                    div { class: "chapter-layout",
                        nav { class: "chapter-list",
                            for link in vm.links {
                                ChapterButton {
                                    key: "{link.param}",
                                    link,
                                    on_select: move |selected| filter.set(selected),
                                }
                            }
                        }
                        section { class: "chapter-quizzes",
                            if let Some(heading) = vm.heading {
                                p { class: "chapter-heading", "{heading}" }
                            }
                            if vm.cards.is_empty() {
                                p { "No quizzes available for this selection." }
                            } else {
                                div { class: "quiz-grid",
                                    for card in vm.cards {
                                        QuizCard { key: "{card.quiz_id}", card }
                                    }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| resource.restart(),
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn ChapterButton(link: ChapterLinkVm, on_select: EventHandler<ChapterFilter>) -> Element {
    let class = if link.active {
        "chapter-link chapter-link--active"
    } else {
        "chapter-link"
    };
    let selected = ChapterFilter::parse(&link.param);
    rsx! {
        button {
            class: "{class}",
            r#type: "button",
            onclick: move |_| on_select.call(selected.clone()),
            "{link.label}"
        }
    }
}
