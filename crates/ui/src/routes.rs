use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{
    AttemptReviewView, ChapterQuizzesView, ExportsView, HomeView, ScoresView, SearchView,
    TakeQuizView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/chapters/:chapter_name", ChapterQuizzesView)] Chapters { chapter_name: String },
        #[route("/search?:query", SearchView)] Search { query: String },
        #[route("/quiz/:quiz_id", TakeQuizView)] TakeQuiz { quiz_id: String },
        #[route("/scores", ScoresView)] Scores {},
        #[route("/scores/:quiz_name", AttemptReviewView)] ScoreDetails { quiz_name: String },
        #[route("/exports", ExportsView)] Exports {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Quiz" }
            ul {
                li { Link { to: Route::Home {}, "Quizzes" } }
                li { Link { to: Route::Search { query: String::new() }, "Search" } }
                li { Link { to: Route::Scores {}, "Scores" } }
                li { Link { to: Route::Exports {}, "Exports" } }
            }
        }
    }
}
