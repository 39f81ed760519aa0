use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::map_search;

#[component]
pub fn SearchView(query: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let mut draft = use_signal(|| query.clone());
    let mut submitted = use_signal(|| query.trim().to_string());

    let mut resource = use_resource(move || {
        let catalog = catalog.clone();
        let query = submitted();
        async move {
            let results = catalog.search(&query).await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_search(&results))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page search",
            h2 { "Search" }
            form {
                class: "search-form",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    submitted.set(draft.peek().trim().to_string());
                },
                input {
                    r#type: "search",
                    placeholder: "Subjects, chapters or quizzes",
                    value: "{draft}",
                    oninput: move |evt: FormEvent| draft.set(evt.value()),
                }
                button { class: "btn btn-primary", r#type: "submit", "Search" }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Searching..." }
                },
                ViewState::Ready(vm) => rsx! {
                    p { class: "search__summary", "{vm.summary}" }
                    for section in vm.sections {
                        section { key: "{section.title}", class: "search__section",
                            h3 { "{section.title}" }
                            ul {
                                for hit in section.hits {
                                    li { key: "{hit.key}",
                                        strong { "{hit.title}" }
                                        span { class: "search__detail", " {hit.detail}" }
                                        if let Some(quiz_id) = hit.quiz_id {
                                            Link {
                                                class: "btn btn-primary",
                                                to: Route::TakeQuiz { quiz_id },
                                                "Start Quiz"
                                            }
                                        }
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
