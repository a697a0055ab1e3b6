use crate::types::{Citation, Message, MessageId, Role, current_time};

/// Render-ordered log of the messages shown for the current session.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_welcome(welcome_text: &str) -> Self {
        let mut transcript = Self::new();
        transcript.reset(welcome_text);
        transcript
    }

    fn push(
        &mut self,
        role: Role,
        content: String,
        citations: Vec<Citation>,
        is_welcome: bool,
    ) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            role,
            content,
            citations,
            is_welcome,
            created_at: Some(current_time()),
        });
        id
    }

    pub fn append_user(&mut self, content: impl Into<String>) -> MessageId {
        self.push(Role::User, content.into(), Vec::new(), false)
    }

    pub fn append_assistant(
        &mut self,
        content: impl Into<String>,
        citations: Vec<Citation>,
    ) -> MessageId {
        self.push(Role::Assistant, content.into(), citations, false)
    }

    /// Appends the loading placeholder, replacing any earlier one so that at
    /// most one exists and it is always last.
    pub fn append_loading(&mut self) -> MessageId {
        self.remove_transient();
        self.push(Role::Loading, String::new(), Vec::new(), false)
    }

    pub fn remove_transient(&mut self) {
        self.messages.retain(|msg| !msg.is_loading());
    }

    /// Clears every entry, then appends a single welcome message.
    pub fn reset(&mut self, welcome_text: &str) {
        self.messages.clear();
        self.push(Role::Assistant, welcome_text.to_string(), Vec::new(), true);
    }

    pub fn entries(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|msg| msg.id == id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn loading_count(&self) -> usize {
        self.messages.iter().filter(|msg| msg.is_loading()).count()
    }
}
