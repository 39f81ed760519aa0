use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ReviewQuestionVm, map_attempt_review};

/// Question-by-question review of the latest attempt at one quiz.
#[component]
pub fn AttemptReviewView(quiz_name: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();

    let mut resource = use_resource(move || {
        let catalog = catalog.clone();
        let quiz_name = quiz_name.clone();
        async move {
            let review = catalog
                .attempt_review(&quiz_name)
                .await
                .map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_attempt_review(&review))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page review",
            Link { class: "btn btn-secondary", to: Route::Scores {}, "Back to scores" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(vm) => rsx! {
                    h2 { "{vm.quiz_name}" }
                    p { class: "review__summary", "{vm.summary}" }
                    for question in vm.questions {
                        ReviewCard { key: "{question.key}", question }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "Error loading quiz details: {err.message()}" }
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
fn ReviewCard(question: ReviewQuestionVm) -> Element {
    rsx! {
        article { class: "question-card",
            h3 { class: "question-card__text", "{question.heading}" }
            ul { class: "question-card__options",
                for option in question.options {
                    li { key: "{option.letter}", class: "{option.class}",
                        span { class: "option__letter", "{option.letter}" }
                        span { class: "option__text", "{option.text}" }
                    }
                }
            }
            p { class: "review__answer", "{question.answer_line}" }
        }
    }
}
