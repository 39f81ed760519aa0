use std::sync::Arc;

use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use quiz_core::model::QuestionId;
use services::{Destination, QuizRunner, QuizSession, SessionModal, SessionPhase, SubmitSummary};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    OptionVm, PaletteItemVm, QuestionVm, QuizExit, QuizIntent, TakeQuizVm, apply_intent, exit_for,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

fn route_for(destination: Destination) -> Route {
    match destination {
        Destination::Home => Route::Home {},
        Destination::Scores => Route::Scores {},
    }
}

#[component]
pub fn TakeQuizView(quiz_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let take_quiz = ctx.take_quiz();

    let runner = use_signal(|| None::<Arc<QuizRunner>>);
    let session = use_signal(|| None::<QuizSession>);
    let error = use_signal(|| None::<ViewError>);
    let mut exited = use_signal(|| false);

    let resource = use_resource(move || {
        let take_quiz = take_quiz.clone();
        let quiz_id = quiz_id.clone();
        let mut runner = runner;
        let mut session = session;

        async move {
            let started = take_quiz.start(&quiz_id).await?;
            let mut updates = started.subscribe();
            session.set(Some(updates.borrow_and_update().clone()));
            runner.set(Some(started));

            spawn(async move {
                while updates.changed().await.is_ok() {
                    let snapshot = updates.borrow_and_update().clone();
                    session.set(Some(snapshot));
                }
            });
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let leave = {
        let ctx = ctx.clone();
        use_callback(move |exit: QuizExit| {
            if *exited.peek() {
                return;
            }
            exited.set(true);
            tracing::debug!(destination = ?exit.destination, "leaving quiz");
            if let Some(message) = exit.flash {
                ctx.set_flash(message);
            }
            let _ = navigator.push(route_for(exit.destination));
        })
    };

    // Covers the countdown running out, which no intent triggers.
    use_effect(move || {
        let exit = session.read().as_ref().and_then(exit_for);
        if let Some(exit) = exit {
            leave.call(exit);
        }
    });

    let dispatch = use_callback(move |intent: QuizIntent| {
        let Some(active) = runner.peek().clone() else {
            return;
        };
        let mut error = error;
        spawn(async move {
            match apply_intent(&active, intent).await {
                Ok(Some(exit)) => leave.call(exit),
                Ok(None) => error.set(None),
                Err(err) => error.set(Some(err)),
            }
        });
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<TakeQuizTestHandles>() {
                handles.register(dispatch, session);
            }
        }
    }

    let vm = session.read().as_ref().map(TakeQuizVm::from_session);

    rsx! {
        div { class: "page take-quiz",
            match (state, vm) {
                (ViewState::Error(err), _) => rsx! {
                    p { class: "error", "{err.message()}" }
                    Link { class: "btn btn-secondary", to: Route::Home {}, "Back to quizzes" }
                },
                (ViewState::Ready(()), Some(vm)) => rsx! {
                    QuizBody { vm, error: error(), on_intent: dispatch }
                },
                _ => rsx! {
                    p { "Loading..." }
                },
            }
        }
    }
}

#[component]
fn QuizBody(vm: TakeQuizVm, error: Option<ViewError>, on_intent: Callback<QuizIntent>) -> Element {
    let timer_class = if vm.timer_urgent {
        "quiz-timer quiz-timer--urgent"
    } else {
        "quiz-timer"
    };
    let banner = error
        .map(|err| err.message().to_string())
        .or_else(|| vm.submit_error.clone());
    let can_finish = matches!(vm.phase, SessionPhase::Running | SessionPhase::SubmitFailed);
    let submitting = vm.is_submitting();

    rsx! {
        header { class: "quiz-header",
            h2 { "{vm.quiz_name}" }
            span { class: "{timer_class}", "Time left: {vm.timer_label}" }
        }
        if let Some(message) = banner {
            p { class: "error", "{message}" }
        }
        if submitting {
            p { class: "quiz-status", "Submitting..." }
        }

        div { class: "quiz-layout",
            section { class: "quiz-question",
                match vm.question.clone() {
                    Some(question) => rsx! {
                        QuestionCard { question, locked: vm.answers_locked, on_intent }
                    },
                    None => rsx! {
                        p { "This quiz has no questions." }
                    },
                }

                div { class: "quiz-nav",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        disabled: !vm.can_prev,
                        onclick: move |_| on_intent.call(QuizIntent::Prev),
                        "Previous"
                    }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        disabled: !vm.can_next,
                        onclick: move |_| on_intent.call(QuizIntent::Next),
                        "Next"
                    }
                }
            }

            aside { class: "quiz-palette",
                p { class: "quiz-progress", "{vm.progress_label}" }
                div { class: "quiz-palette__grid",
                    for item in vm.palette.clone() {
                        PaletteButton { key: "{item.index}", item, on_intent }
                    }
                }
                div { class: "quiz-actions",
                    button {
                        class: "btn btn-danger",
                        r#type: "button",
                        disabled: !can_finish,
                        onclick: move |_| on_intent.call(QuizIntent::RequestCancel),
                        "Cancel Quiz"
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: !can_finish,
                        onclick: move |_| on_intent.call(QuizIntent::RequestSubmit),
                        "Submit Quiz"
                    }
                }
            }
        }

        match vm.modal {
            SessionModal::None => rsx! {},
            SessionModal::ConfirmCancel => rsx! {
                ConfirmModal {
                    title: "Cancel quiz?",
                    body: "Your answers will not be submitted.",
                    confirm_label: "Yes, cancel",
                    confirm: QuizIntent::ConfirmCancel,
                    on_intent,
                }
            },
            SessionModal::ConfirmSubmit => rsx! {
                ConfirmModal {
                    title: "Submit quiz?",
                    body: "You cannot change your answers afterwards.",
                    confirm_label: "Submit",
                    confirm: QuizIntent::ConfirmSubmit,
                    summary: Some(vm.summary),
                    on_intent,
                }
            },
        }
    }
}

#[component]
fn QuestionCard(question: QuestionVm, locked: bool, on_intent: Callback<QuizIntent>) -> Element {
    let question_id = question.id;
    rsx! {
        article { class: "question-card",
            p { class: "question-card__position", "{question.position_label}" }
            h3 { class: "question-card__text", "{question.text}" }
            ul { class: "question-card__options",
                for option in question.options.clone() {
                    OptionRow { key: "{option.letter}", question_id, option, locked, on_intent }
                }
            }
        }
    }
}

#[component]
fn OptionRow(
    question_id: QuestionId,
    option: OptionVm,
    locked: bool,
    on_intent: Callback<QuizIntent>,
) -> Element {
    let class = if option.selected {
        "option option--selected"
    } else {
        "option"
    };
    let choice = option.choice;
    rsx! {
        li {
            button {
                class: "{class}",
                r#type: "button",
                disabled: locked,
                onclick: move |_| on_intent.call(QuizIntent::Select(question_id, choice)),
                span { class: "option__letter", "{option.letter}" }
                span { class: "option__text", "{option.text}" }
            }
        }
    }
}

#[component]
fn PaletteButton(item: PaletteItemVm, on_intent: Callback<QuizIntent>) -> Element {
    let mut class = String::from("palette-item");
    if item.answered {
        class.push_str(" palette-item--answered");
    }
    if item.current {
        class.push_str(" palette-item--current");
    }
    let index = item.index;
    rsx! {
        button {
            class: "{class}",
            r#type: "button",
            onclick: move |_| on_intent.call(QuizIntent::JumpTo(index)),
            "{item.label}"
        }
    }
}

#[component]
fn ConfirmModal(
    title: &'static str,
    body: &'static str,
    confirm_label: &'static str,
    confirm: QuizIntent,
    summary: Option<SubmitSummary>,
    on_intent: Callback<QuizIntent>,
) -> Element {
    let remaining = summary.map(|summary| summary.remaining_label()).unwrap_or_default();
    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal", role: "dialog",
                h3 { "{title}" }
                p { "{body}" }
                if let Some(summary) = summary {
                    dl { class: "modal__summary",
                        dt { "Answered" }
                        dd { "{summary.answered}" }
                        dt { "Unanswered" }
                        dd { "{summary.unanswered}" }
                        dt { "Total" }
                        dd { "{summary.total}" }
                        dt { "Time remaining" }
                        dd { "{remaining}" }
                    }
                }
                div { class: "modal__actions",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::DismissModal),
                        "Go back"
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| on_intent.call(confirm.clone()),
                        "{confirm_label}"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct TakeQuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    session: Rc<RefCell<Option<Signal<Option<QuizSession>>>>>,
}

#[cfg(test)]
impl TakeQuizTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<QuizIntent>,
        session: Signal<Option<QuizSession>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.session.borrow_mut() = Some(session);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("take quiz dispatch registered")
    }

    pub(crate) fn session(&self) -> Signal<Option<QuizSession>> {
        (*self.session.borrow()).expect("take quiz session registered")
    }
}
