use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizCardVm, map_quiz_cards};

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let catalog = ctx.catalog();

    let launch_ctx = ctx.clone();
    use_effect(move || {
        if let Some(quiz_id) = launch_ctx.take_launch_quiz() {
            let _ = navigator.push(Route::TakeQuiz { quiz_id });
        }
    });

    let mut resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let listings = catalog.list_quizzes().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_quiz_cards(&listings))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Available Quizzes" }
            Link {
                class: "btn btn-secondary",
                to: Route::Chapters { chapter_name: "all".to_string() },
                "Browse by chapter"
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { "No quizzes are available right now." }
                    } else {
                        div { class: "quiz-grid",
                            for card in cards {
                                QuizCard { key: "{card.quiz_id}", card }
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
pub(crate) fn QuizCard(card: QuizCardVm) -> Element {
    rsx! {
        article { class: "quiz-card",
            h3 { class: "quiz-card__title", "{card.name}" }
            p { class: "quiz-card__meta", "{card.meta}" }
            p { class: "quiz-card__date", "{card.date_label}" }
            if let Some(description) = card.description.as_deref() {
                p { class: "quiz-card__description", "{description}" }
            }
            Link {
                class: "btn btn-primary",
                to: Route::TakeQuiz { quiz_id: card.quiz_id.clone() },
                "Start Quiz"
            }
        }
    }
}
