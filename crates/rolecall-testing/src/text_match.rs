use regex::Regex;
use rolecall_ui::normalize_text;
use std::fmt;

/// How a query compares text.
///
/// Text is whitespace-normalised before any comparison.
#[derive(Clone, Debug)]
pub enum TextMatch {
    /// Full-string equality.
    Exact(String),
    /// Case-insensitive substring.
    ContainsIgnoreCase(String),
    Pattern(Regex),
}

impl TextMatch {
    pub fn exact(text: impl Into<String>) -> Self {
        Self::Exact(text.into())
    }

    pub fn ignore_case(text: impl Into<String>) -> Self {
        Self::ContainsIgnoreCase(text.into())
    }

    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Pattern)
    }

    pub fn matches(&self, text: &str) -> bool {
        let text = normalize_text(text);
        match self {
            Self::Exact(expected) => text == normalize_text(expected),
            Self::ContainsIgnoreCase(needle) => text
                .to_lowercase()
                .contains(&normalize_text(needle).to_lowercase()),
            Self::Pattern(regex) => regex.is_match(&text),
        }
    }
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(text) => write!(f, "{text:?}"),
            Self::ContainsIgnoreCase(text) => write!(f, "{text:?} (any case, partial)"),
            Self::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

impl From<&str> for TextMatch {
    fn from(text: &str) -> Self {
        Self::Exact(text.to_string())
    }
}

impl From<String> for TextMatch {
    fn from(text: String) -> Self {
        Self::Exact(text)
    }
}

impl From<&String> for TextMatch {
    fn from(text: &String) -> Self {
        Self::Exact(text.clone())
    }
}

impl From<Regex> for TextMatch {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}
