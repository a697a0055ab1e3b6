//! Projection of transcript entries into HTML fragments.

use crate::types::{Citation, Message, MessageId, Role};
use comrak::plugins::syntect::SyntectAdapter;
use comrak::{ComrakOptions, ComrakPlugins, markdown_to_html_with_plugins};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static MARKDOWN_OPTIONS: Lazy<ComrakOptions> = Lazy::new(|| {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    // Raw HTML in answers is escaped, never passed through.
    options.render.unsafe_ = false;
    options.render.escape = true;
    options
});

// Loading the syntax and theme sets is the expensive part of highlighting.
static SYNTAX_ADAPTER: Lazy<SyntectAdapter> =
    Lazy::new(|| SyntectAdapter::new(Some("base16-ocean.dark")));

pub const LOADING_HTML: &str = r#"<div class="loading"><span></span><span></span><span></span></div>"#;

/// What the shell should draw for one transcript entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Renderable {
    pub class: String,
    /// Message body as HTML; for the loading placeholder this is the fixed
    /// indicator markup with no text.
    pub body_html: String,
    pub sources_html: Option<String>,
}

impl Renderable {
    pub fn to_html(&self) -> String {
        let mut html = format!(
            r#"<div class="{}"><div class="message-content">{}</div>"#,
            self.class, self.body_html
        );
        if let Some(sources) = &self.sources_html {
            html.push_str(sources);
        }
        html.push_str("</div>");
        html
    }
}

pub fn project(message: &Message) -> Renderable {
    let mut class = format!("message {}", message.role.css_class());
    if message.is_welcome {
        class.push_str(" welcome-message");
    }

    let body_html = match message.role {
        Role::User => escape_html(&message.content),
        Role::Assistant => markdown_to_html(&message.content),
        Role::Loading => LOADING_HTML.to_string(),
    };

    Renderable {
        class,
        body_html,
        sources_html: sources_html(&message.citations),
    }
}

pub fn markdown_to_html(md: &str) -> String {
    let mut plugins = ComrakPlugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&*SYNTAX_ADAPTER);
    markdown_to_html_with_plugins(md, &MARKDOWN_OPTIONS, &plugins)
}

/// Memoized projections keyed by message id.
///
/// Transcript entries never change once appended and ids are never reused,
/// so each entry only has to be projected once while it stays visible.
#[derive(Debug, Default)]
pub struct RenderCache {
    rendered: HashMap<MessageId, Renderable>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects `entries` in order, reusing earlier results and forgetting
    /// entries that are no longer present.
    pub fn project_entries(&mut self, entries: &[Message]) -> Vec<(MessageId, Renderable)> {
        self.rendered.retain(|id, _| entries.iter().any(|msg| msg.id == *id));
        entries
            .iter()
            .map(|msg| {
                let rendered = self
                    .rendered
                    .entry(msg.id)
                    .or_insert_with(|| project(msg))
                    .clone();
                (msg.id, rendered)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }
}

/// Collapsible "Sources" block, or `None` when there is nothing to cite.
/// Entries are concatenated without separators; each is its own block.
pub fn sources_html(citations: &[Citation]) -> Option<String> {
    if citations.is_empty() {
        return None;
    }

    let items: String = citations.iter().map(citation_html).collect();
    Some(format!(
        r#"<details class="sources-collapsible"><summary class="sources-header">Sources</summary><div class="sources-content">{items}</div></details>"#
    ))
}

pub fn citation_html(citation: &Citation) -> String {
    let text = escape_html(&citation.text);
    match &citation.url {
        Some(url) => format!(
            r#"<div class="source-item"><a class="source-link" href="{}" target="_blank" rel="noopener noreferrer">{text}</a></div>"#,
            escape_html(url)
        ),
        None => format!(r#"<div class="source-item"><em class="source-text">{text}</em></div>"#),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageId, Source};

    fn message(role: Role, content: &str, citations: Vec<Citation>) -> Message {
        Message {
            id: MessageId(0),
            role,
            content: content.to_string(),
            citations,
            is_welcome: false,
            created_at: None,
        }
    }

    #[test]
    fn user_content_is_literal() {
        let rendered = project(&message(Role::User, "<b>hi</b> & *bye*", Vec::new()));
        assert_eq!(rendered.body_html, "&lt;b&gt;hi&lt;/b&gt; &amp; *bye*");
        assert!(rendered.sources_html.is_none());
    }

    #[test]
    fn assistant_content_is_markdown() {
        let rendered = project(&message(Role::Assistant, "It covers **X**.", Vec::new()));
        assert!(rendered.body_html.contains("<strong>X</strong>"));
        assert!(rendered.sources_html.is_none());
    }

    #[test]
    fn assistant_raw_html_is_not_passed_through() {
        let rendered = project(&message(
            Role::Assistant,
            "<script>alert(1)</script>",
            Vec::new(),
        ));
        assert!(!rendered.body_html.contains("<script>"));
    }

    #[test]
    fn loading_has_indicator_only() {
        let rendered = project(&message(Role::Loading, "", Vec::new()));
        assert_eq!(rendered.body_html, LOADING_HTML);
        assert!(rendered.class.contains("loading"));
    }

    #[test]
    fn citations_render_in_order_without_separator() {
        let citations: Vec<Citation> = vec![
            Source::Plain("plain text".into()).into(),
            Source::Structured {
                text: "Doc A".into(),
                url: Some("http://x/a".into()),
            }
            .into(),
        ];
        let html = sources_html(&citations).unwrap();
        let plain = r#"<div class="source-item"><em class="source-text">plain text</em></div>"#;
        let linked = r#"<div class="source-item"><a class="source-link" href="http://x/a" target="_blank" rel="noopener noreferrer">Doc A</a></div>"#;
        assert!(html.contains(&format!("{plain}{linked}")));
        assert!(html.starts_with(r#"<details class="sources-collapsible">"#));
        assert!(html.contains("<summary class=\"sources-header\">Sources</summary>"));
    }

    #[test]
    fn welcome_message_gets_marker_class() {
        let mut welcome = message(Role::Assistant, "Welcome", Vec::new());
        welcome.is_welcome = true;
        let rendered = project(&welcome);
        assert_eq!(rendered.class, "message assistant welcome-message");
        assert!(
            rendered
                .to_html()
                .starts_with(r#"<div class="message assistant welcome-message">"#)
        );
    }

    #[test]
    fn code_fences_highlight_the_same_on_every_call() {
        let md = "```rust\nfn main() {}\n```";
        let first = markdown_to_html(md);
        assert!(first.contains("style="));
        assert_eq!(markdown_to_html(md), first);
    }

    #[test]
    fn render_cache_reuses_and_forgets_entries() {
        let mut transcript = crate::transcript::Transcript::with_welcome("Welcome");
        transcript.append_user("question");
        let loading = transcript.append_loading();

        let mut cache = RenderCache::new();
        let first = cache.project_entries(transcript.entries());
        assert_eq!(first.len(), 3);
        assert_eq!(first[2], (loading, project(transcript.get(loading).unwrap())));

        transcript.remove_transient();
        let answer = transcript.append_assistant("**done**", Vec::new());
        let second = cache.project_entries(transcript.entries());

        assert_eq!(cache.len(), 3);
        assert_eq!(second[..2], first[..2]);
        assert_eq!(second[2].0, answer);
        assert!(second[2].1.body_html.contains("<strong>done</strong>"));
    }

    #[test]
    fn citation_text_is_escaped() {
        let html = citation_html(&Citation::text("a < b"));
        assert!(html.contains("a &lt; b"));
    }
}
