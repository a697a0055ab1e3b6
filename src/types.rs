use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Placeholder shown while a query is outstanding.
    Loading,
}

impl Role {
    pub fn css_class(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Loading => "assistant loading",
        }
    }
}

/// Key of a transcript entry, unique within its transcript.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

/// A reference attached to an assistant answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Citation {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
        }
    }

    pub fn linked(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
        }
    }
}

/// A source as it arrives from the query service: either a bare string or a
/// structured `{text, url?}` object.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Source {
    Plain(String),
    Structured {
        text: String,
        #[serde(default)]
        url: Option<String>,
    },
}

impl From<Source> for Citation {
    fn from(source: Source) -> Self {
        match source {
            Source::Plain(text) => Citation::text(text),
            Source::Structured { text, url } => Citation { text, url },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    /// Raw text for user messages, markdown source for assistant messages,
    /// empty for the loading placeholder.
    pub content: String,
    pub citations: Vec<Citation>,
    pub is_welcome: bool,
    pub created_at: Option<OffsetDateTime>,
}

impl Message {
    pub fn is_loading(&self) -> bool {
        matches!(self.role, Role::Loading)
    }

    pub fn timestamp_label(&self) -> Option<String> {
        format_message_timestamp(self.created_at)
    }
}

pub fn current_time() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

pub fn format_message_timestamp(timestamp: Option<OffsetDateTime>) -> Option<String> {
    let mut datetime = timestamp?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

/// Display mode preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Light,
    #[default]
    Dark,
}

impl Preference {
    pub fn as_str(self) -> &'static str {
        match self {
            Preference::Light => "light",
            Preference::Dark => "dark",
        }
    }

    /// Reading of a `(prefers-color-scheme: dark)` media query.
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            Preference::Dark
        } else {
            Preference::Light
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Preference::Light => Preference::Dark,
            Preference::Dark => Preference::Light,
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme preference: {0}")]
pub struct ParsePreferenceError(String);

impl FromStr for Preference {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Preference::Light),
            "dark" => Ok(Preference::Dark),
            other => Err(ParsePreferenceError(other.to_string())),
        }
    }
}
