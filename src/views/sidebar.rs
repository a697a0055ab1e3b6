use super::chat::map_key;
use crate::dispatch::{Command, InputDispatcher, SUGGESTED_QUESTIONS, UiEvent};
use crate::stats::CourseSummary;
use dioxus::prelude::*;

#[component]
pub fn Sidebar(
    courses: Signal<CourseSummary>,
    dispatcher: Signal<InputDispatcher>,
    toggle_label: &'static str,
    on_command: EventHandler<Command>,
) -> Element {
    let mut dispatcher = dispatcher;
    let mut dispatch = move |event: UiEvent| {
        let result = dispatcher.write().dispatch(event);
        if let Some(command) = result.command {
            on_command.call(command);
        }
        result.prevent_default
    };

    let summary = courses();
    let total = summary.total_label();
    let titles = summary.title_lines();
    let disabled = dispatcher.read().is_disabled();

    rsx! {
        aside { class: "sidebar",
            div { class: "sidebar-section",
                button {
                    class: "theme-toggle",
                    r#type: "button",
                    aria_label: toggle_label,
                    title: toggle_label,
                    onclick: move |_| {
                        dispatch(UiEvent::ThemeClicked);
                    },
                    onkeydown: move |ev| {
                        if dispatch(UiEvent::ThemeKey(map_key(&ev.key()))) {
                            ev.prevent_default();
                        }
                    },
                    "{toggle_label}"
                }
            }
            div { class: "sidebar-section",
                button {
                    class: "new-chat-button",
                    r#type: "button",
                    onclick: move |_| {
                        dispatch(UiEvent::NewChatClicked);
                    },
                    "+ New Chat"
                }
                button {
                    class: "clear-chat-button",
                    r#type: "button",
                    onclick: move |_| {
                        dispatch(UiEvent::ClearChatClicked);
                    },
                    "Clear Chat"
                }
            }
            details { class: "sidebar-section course-stats", open: true,
                summary { class: "stats-header", "Courses" }
                div { class: "stat-item",
                    span { class: "stat-label", "Number of courses:" }
                    span { id: "total-courses", class: "stat-value", "{total}" }
                }
                div { id: "course-titles", class: "course-titles",
                    for title in titles {
                        div { class: "course-title-item", "{title}" }
                    }
                }
            }
            details { class: "sidebar-section suggested", open: true,
                summary { class: "suggested-header", "Try asking:" }
                div { class: "suggested-items",
                    for question in SUGGESTED_QUESTIONS.iter().copied() {
                        button {
                            class: "suggested-item",
                            r#type: "button",
                            disabled,
                            "data-question": question,
                            onclick: move |_| {
                                dispatch(UiEvent::SuggestedQuestion(question.to_string()));
                            },
                            "{question}"
                        }
                    }
                }
            }
        }
    }
}
