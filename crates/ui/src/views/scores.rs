use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::map_score_rows;

#[component]
pub fn ScoresView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let flash = use_hook(|| ctx.take_flash());

    let mut resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let records = catalog.scores().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_score_rows(&records))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Quiz Scores" }
            if let Some(message) = flash {
                p { class: "flash", "{message}" }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(rows) => rsx! {
                    if rows.is_empty() {
                        p { "You have not taken any quizzes yet." }
                    } else {
                        table { class: "scores",
                            thead {
                                tr {
                                    th { "Quiz" }
                                    th { "Score" }
                                    th { "Percentage" }
                                    th { "Taken" }
                                    th {}
                                }
                            }
                            tbody {
                                for row in rows {
                                    tr {
                                        td { "{row.quiz_name}" }
                                        td { "{row.score}" }
                                        td { "{row.percentage}" }
                                        td { "{row.attempted_at}" }
                                        td {
                                            Link {
                                                class: "btn btn-secondary",
                                                to: Route::ScoreDetails { quiz_name: row.quiz_name.clone() },
                                                "View details"
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
