use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use gateway::{CatalogGateway, Gateway, InMemoryGateway};
use quiz_core::time::fixed_now;
use services::{
    AppServices, CatalogService, ClientConfig, Clock, QuizSession, SettingsService,
    TakeQuizService, TaskService,
};

use crate::context::{AppContext, UiApp, build_app_context};
use crate::views::take_quiz::TakeQuizTestHandles;
use crate::views::{
    AttemptReviewView, ChapterQuizzesView, ExportsView, HomeView, ScoresView, SearchView,
    TakeQuizView,
};
use crate::vm::QuizIntent;

struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn app_name(&self) -> &str {
        "Quiz"
    }

    fn launch_quiz(&self) -> Option<String> {
        None
    }

    fn take_quiz(&self) -> Arc<TakeQuizService> {
        self.services.take_quiz()
    }

    fn tasks(&self) -> Arc<TaskService> {
        self.services.tasks()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn settings(&self) -> Arc<SettingsService> {
        self.services.settings()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Scores,
    Exports,
    TakeQuiz(String),
    ScoreDetails(String),
    Chapters(String),
    Search(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    context: AppContext,
    view: ViewKind,
    quiz_handles: Option<TakeQuizTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    use_context_provider(|| props.context.clone());
    use_context_provider(|| props.view.clone());
    if let Some(handles) = props.quiz_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Scores => rsx! { ScoresView {} },
        ViewKind::Exports => rsx! { ExportsView {} },
        ViewKind::TakeQuiz(quiz_id) => rsx! { TakeQuizView { quiz_id } },
        ViewKind::ScoreDetails(quiz_name) => rsx! { AttemptReviewView { quiz_name } },
        ViewKind::Chapters(chapter_name) => rsx! { ChapterQuizzesView { chapter_name } },
        ViewKind::Search(query) => rsx! { SearchView { query } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub gateway: InMemoryGateway,
    pub context: AppContext,
    pub quiz_handles: Option<TakeQuizTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive until spawned work (gateway calls, watch updates) has landed.
    pub async fn settle(&mut self) {
        for _ in 0..5 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    fn quiz_handles(&self) -> &TakeQuizTestHandles {
        self.quiz_handles
            .as_ref()
            .expect("take quiz handles for a take quiz view")
    }

    pub fn dispatch(&self, intent: QuizIntent) {
        let dispatch = self.quiz_handles().dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
    }

    pub fn session(&self) -> Option<QuizSession> {
        let session = self.quiz_handles().session();
        self.dom.in_runtime(|| session.peek().clone())
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, gateway: InMemoryGateway) -> ViewHarness {
    let wired = Gateway::from_shared(gateway.clone());
    build_harness(view, gateway, wired)
}

/// Same as `setup_view_harness` with the catalogue served by `catalog`.
pub fn setup_view_harness_with_catalog(
    view: ViewKind,
    gateway: InMemoryGateway,
    catalog: Arc<dyn CatalogGateway>,
) -> ViewHarness {
    let mut wired = Gateway::from_shared(gateway.clone());
    wired.catalog = catalog;
    build_harness(view, gateway, wired)
}

fn build_harness(view: ViewKind, gateway: InMemoryGateway, wired: Gateway) -> ViewHarness {
    let services =
        AppServices::with_gateway(wired, ClientConfig::default(), Clock::fixed(fixed_now()));
    let app: Arc<dyn UiApp> = Arc::new(TestApp { services });
    let context = build_app_context(&app);

    let quiz_handles = match view {
        ViewKind::TakeQuiz(_) => Some(TakeQuizTestHandles::default()),
        _ => None,
    };

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            context: context.clone(),
            view,
            quiz_handles: quiz_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        gateway,
        context,
        quiz_handles,
    }
}
