use dioxus::prelude::*;
use quiz_core::model::{NotificationSettings, ReminderTime};

use crate::context::AppContext;
use crate::vm::NoticeVm;

/// Email reminder preferences, shown alongside exports and reports.
#[component]
pub fn NotificationSettingsPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let settings_service = ctx.settings();

    let mut form = use_signal(NotificationSettings::default);
    let notice = use_signal(|| None::<NoticeVm>);
    let mut saving = use_signal(|| false);

    {
        let settings_service = settings_service.clone();
        use_future(move || {
            let settings_service = settings_service.clone();
            async move {
                let loaded = settings_service.load().await;
                form.set(loaded);
            }
        });
    }

    let save = use_callback(move |()| {
        if *saving.peek() {
            return;
        }
        saving.set(true);
        let settings_service = settings_service.clone();
        let current = *form.peek();
        let mut notice = notice;
        let mut saving = saving;
        spawn(async move {
            let outcome = match settings_service.save(&current).await {
                Ok(message) => NoticeVm {
                    text: message,
                    is_error: false,
                },
                Err(err) => NoticeVm {
                    text: err.user_message(),
                    is_error: true,
                },
            };
            notice.set(Some(outcome));
            saving.set(false);
        });
    });

    let current = form();
    let selected_time = current.reminder_time.to_string();
    let notice_now = notice().map(|notice| {
        let class = if notice.is_error {
            "notice notice--error"
        } else {
            "notice"
        };
        (class, notice.text)
    });
    let schedule = if current.daily_reminder {
        format!("Daily reminder at {}", current.reminder_time.label())
    } else {
        "Daily reminders are off".to_string()
    };
    let saving_now = saving();

    rsx! {
        section { class: "settings",
            h3 { "Notification Preferences" }
            p { class: "settings__schedule", "{schedule}" }
            label { class: "settings__row",
                input {
                    r#type: "checkbox",
                    checked: current.daily_reminder,
                    onchange: move |evt: FormEvent| form.write().daily_reminder = evt.checked(),
                }
                " Receive daily quiz reminders"
            }
            label { class: "settings__row",
                "Preferred reminder time: "
                select {
                    value: "{selected_time}",
                    onchange: move |evt: FormEvent| {
                        match evt.value().parse::<ReminderTime>() {
                            Ok(time) => form.write().reminder_time = time,
                            Err(err) => tracing::warn!(error = %err, "ignoring reminder time"),
                        }
                    },
                    for time in ReminderTime::CHOICES {
                        option {
                            key: "{time}",
                            value: "{time}",
                            selected: time == current.reminder_time,
                            "{time.label()}"
                        }
                    }
                }
            }
            label { class: "settings__row",
                input {
                    r#type: "checkbox",
                    checked: current.email_notifications,
                    onchange: move |evt: FormEvent| form.write().email_notifications = evt.checked(),
                }
                " Email notifications"
            }
            label { class: "settings__row",
                input {
                    r#type: "checkbox",
                    checked: current.weekly_report,
                    onchange: move |evt: FormEvent| form.write().weekly_report = evt.checked(),
                }
                " Weekly progress report"
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled: saving_now,
                onclick: move |_| save.call(()),
                "Save Preferences"
            }
            if let Some((class, text)) = notice_now {
                p { class: "{class}", "{text}" }
            }
        }
    }
}
