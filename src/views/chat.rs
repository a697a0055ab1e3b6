use crate::dispatch::{Command, InputDispatcher, Key, UiEvent};
use crate::render::{RenderCache, Renderable};
use crate::session::SessionController;
use crate::types::MessageId;
use dioxus::events::Key as DomKey;
use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub(crate) fn map_key(key: &DomKey) -> Key {
    match key {
        DomKey::Enter => Key::Enter,
        DomKey::Character(ch) if ch == " " => Key::Space,
        _ => Key::Other,
    }
}

#[derive(Clone, PartialEq)]
struct MessageRow {
    key: u64,
    class: String,
    body_html: String,
    sources_html: Option<String>,
    timestamp: Option<String>,
}

impl MessageRow {
    fn new(id: MessageId, rendered: Renderable, timestamp: Option<String>) -> Self {
        Self {
            key: id.0,
            class: rendered.class,
            body_html: rendered.body_html,
            sources_html: rendered.sources_html,
            timestamp,
        }
    }
}

#[component]
pub fn ChatView(
    session: Signal<SessionController>,
    dispatcher: Signal<InputDispatcher>,
    on_command: EventHandler<Command>,
) -> Element {
    let mut dispatcher = dispatcher;
    let mut input_node = use_signal(|| Option::<Rc<MountedData>>::None);

    // Give focus back to the composer whenever it becomes usable again.
    use_effect(move || {
        let focused = dispatcher.read().is_focused();
        if let (true, Some(node)) = (focused, input_node()) {
            spawn(async move {
                let _ = node.set_focus(true).await;
            });
        }
    });

    // Only transcript changes re-derive rows; composer keystrokes do not.
    let cache = use_hook(|| Rc::new(RefCell::new(RenderCache::new())));
    let rows = use_memo(move || {
        let session = session.read();
        let entries = session.transcript().entries();
        cache
            .borrow_mut()
            .project_entries(entries)
            .into_iter()
            .zip(entries)
            .map(|((id, rendered), msg)| MessageRow::new(id, rendered, msg.timestamp_label()))
            .collect::<Vec<_>>()
    });
    let rows = rows.read();
    let disabled = dispatcher.read().is_disabled();
    let input = dispatcher.read().input().to_string();

    let mut dispatch = move |event: UiEvent| dispatcher.write().dispatch(event);

    rsx! {
        div { class: "chat-main",
            div { id: "chat-messages", class: "chat-messages",
                for row in rows.iter() {
                    div { key: "{row.key}", class: "{row.class}",
                        div { class: "message-content", dangerous_inner_html: "{row.body_html}" }
                        if let Some(sources) = row.sources_html.clone() {
                            div { dangerous_inner_html: "{sources}" }
                        }
                        if let Some(ts) = row.timestamp.clone() {
                            span { class: "message-timestamp", "{ts}" }
                        }
                    }
                }
            }
            div { class: "chat-input-container",
                input {
                    id: "chat-input",
                    class: "chat-input",
                    r#type: "text",
                    placeholder: "Ask about courses, lessons, or specific content...",
                    value: "{input}",
                    disabled,
                    onmounted: move |ev| input_node.set(Some(ev.data())),
                    oninput: move |ev| {
                        dispatch(UiEvent::InputChanged(ev.value()));
                    },
                    onkeydown: move |ev| {
                        let result = dispatch(UiEvent::InputKey {
                            key: map_key(&ev.key()),
                            shift: ev.modifiers().shift(),
                        });
                        if result.prevent_default {
                            ev.prevent_default();
                        }
                        if let Some(command) = result.command {
                            on_command.call(command);
                        }
                    },
                }
                button {
                    id: "send-button",
                    class: "send-button",
                    r#type: "button",
                    disabled,
                    onclick: move |_| {
                        if let Some(command) = dispatch(UiEvent::SendClicked).command {
                            on_command.call(command);
                        }
                    },
                    "Send"
                }
            }
        }
    }
}
