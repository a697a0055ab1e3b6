//! Maps user interaction events onto controller commands.
//!
//! The dispatcher owns the composer state (input text, disabled flag,
//! focus) and nothing else; it never touches the transcript or theme
//! directly.

/// Keys the dispatcher cares about; everything else is `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    InputChanged(String),
    SendClicked,
    InputKey { key: Key, shift: bool },
    ThemeClicked,
    ThemeKey(Key),
    SuggestedQuestion(String),
    NewChatClicked,
    ClearChatClicked,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    ToggleTheme,
    StartNewSession,
    ClearSession,
}

/// Result of dispatching one event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub command: Option<Command>,
    /// The platform's default action for the event must be suppressed.
    pub prevent_default: bool,
}

impl Dispatch {
    fn none() -> Self {
        Self::default()
    }

    fn command(command: Command) -> Self {
        Self {
            command: Some(command),
            prevent_default: false,
        }
    }

    fn suppressing(command: Command) -> Self {
        Self {
            command: Some(command),
            prevent_default: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputDispatcher {
    input: String,
    disabled: bool,
    focused: bool,
}

pub const SUGGESTED_QUESTIONS: &[&str] = &[
    "Outline of a course",
    "Courses about Chatbot",
    "Is there any course that includes a Chatbot implementation?",
    "What was covered in lesson 5 of the MCP course?",
];

impl InputDispatcher {
    pub fn new() -> Self {
        Self {
            focused: true,
            ..Self::default()
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn dispatch(&mut self, event: UiEvent) -> Dispatch {
        match event {
            UiEvent::InputChanged(text) => {
                if !self.disabled {
                    self.input = text;
                }
                Dispatch::none()
            }
            UiEvent::SendClicked => self.take_submit(false),
            UiEvent::InputKey {
                key: Key::Enter,
                shift: false,
            } => self.take_submit(true),
            UiEvent::InputKey { .. } => Dispatch::none(),
            UiEvent::ThemeClicked => Dispatch::command(Command::ToggleTheme),
            UiEvent::ThemeKey(Key::Enter | Key::Space) => {
                Dispatch::suppressing(Command::ToggleTheme)
            }
            UiEvent::ThemeKey(Key::Other) => Dispatch::none(),
            UiEvent::SuggestedQuestion(question) => {
                if self.disabled {
                    return Dispatch::none();
                }
                self.input = question;
                self.take_submit(false)
            }
            UiEvent::NewChatClicked => Dispatch::command(Command::StartNewSession),
            UiEvent::ClearChatClicked => Dispatch::command(Command::ClearSession),
        }
    }

    /// Emits the current input as a submission and clears the field. Blank
    /// input and a disabled composer produce nothing.
    fn take_submit(&mut self, prevent_default: bool) -> Dispatch {
        if self.disabled || self.input.trim().is_empty() {
            return Dispatch {
                command: None,
                prevent_default,
            };
        }
        let text = std::mem::take(&mut self.input);
        Dispatch {
            command: Some(Command::Submit(text)),
            prevent_default,
        }
    }

    /// Track the session controller's phase. Leaving `Pending` re-enables
    /// the composer and restores focus.
    pub fn set_pending(&mut self, pending: bool) {
        if pending {
            self.disabled = true;
            self.focused = false;
        } else {
            self.disabled = false;
            self.focused = true;
        }
    }
}
