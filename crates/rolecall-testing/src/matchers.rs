//! Predicates over semantics nodes.

use crate::TextMatch;
use rolecall_ui::{SemanticsNode, SemanticsRole};
use std::fmt;
use std::rc::Rc;

/// A described predicate over [`SemanticsNode`]s.
#[derive(Clone)]
pub struct SemanticsMatcher {
    description: String,
    matcher: Rc<dyn Fn(&SemanticsNode) -> bool>,
}

impl SemanticsMatcher {
    pub fn new(
        description: impl Into<String>,
        matcher: impl Fn(&SemanticsNode) -> bool + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            matcher: Rc::new(matcher),
        }
    }

    pub fn matches(&self, node: &SemanticsNode) -> bool {
        (self.matcher)(node)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn and(self, other: SemanticsMatcher) -> Self {
        let description = format!("{} and {}", self.description, other.description);
        Self::new(description, move |node| {
            self.matches(node) && other.matches(node)
        })
    }

    pub fn or(self, other: SemanticsMatcher) -> Self {
        let description = format!("({} or {})", self.description, other.description);
        Self::new(description, move |node| {
            self.matches(node) || other.matches(node)
        })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        let description = format!("not {}", self.description);
        Self::new(description, move |node| !self.matches(node))
    }
}

impl fmt::Debug for SemanticsMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticsMatcher")
            .field("description", &self.description)
            .finish()
    }
}

impl fmt::Display for SemanticsMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

fn optional_matches(text: &Option<String>, matcher: &TextMatch) -> bool {
    text.as_deref().is_some_and(|text| matcher.matches(text))
}

/// Nodes carrying the text themselves, like `getByText`.
pub fn has_text(text: impl Into<TextMatch>) -> SemanticsMatcher {
    let text = text.into();
    SemanticsMatcher::new(format!("has text {text}"), move |node| {
        optional_matches(&node.text, &text)
    })
}

pub fn has_role(role: SemanticsRole) -> SemanticsMatcher {
    SemanticsMatcher::new(format!("has role {role}"), move |node| node.role == role)
}

/// Accessible name. Nodes without a name never match.
pub fn has_name(name: impl Into<TextMatch>) -> SemanticsMatcher {
    let name = name.into();
    SemanticsMatcher::new(format!("is named {name}"), move |node| {
        !node.name.is_empty() && name.matches(&node.name)
    })
}

/// Shorthand for `has_role(role).and(has_name(name))`.
pub fn has_role_named(role: SemanticsRole, name: impl Into<TextMatch>) -> SemanticsMatcher {
    has_role(role).and(has_name(name))
}

/// Fields labelled by a label or by a content description.
pub fn has_label_text(label: impl Into<TextMatch>) -> SemanticsMatcher {
    let label = label.into();
    SemanticsMatcher::new(format!("is labelled {label}"), move |node| {
        optional_matches(&node.label, &label) || optional_matches(&node.content_description, &label)
    })
}

pub fn has_placeholder(placeholder: impl Into<TextMatch>) -> SemanticsMatcher {
    let placeholder = placeholder.into();
    SemanticsMatcher::new(format!("has placeholder {placeholder}"), move |node| {
        optional_matches(&node.placeholder, &placeholder)
    })
}

/// Current value of an input.
pub fn has_display_value(value: impl Into<TextMatch>) -> SemanticsMatcher {
    let value = value.into();
    SemanticsMatcher::new(format!("displays value {value}"), move |node| {
        optional_matches(&node.value, &value)
    })
}

pub fn has_alt_text(alt: impl Into<TextMatch>) -> SemanticsMatcher {
    let alt = alt.into();
    SemanticsMatcher::new(format!("has alt text {alt}"), move |node| {
        optional_matches(&node.alt, &alt)
    })
}

pub fn has_title(title: impl Into<TextMatch>) -> SemanticsMatcher {
    let title = title.into();
    SemanticsMatcher::new(format!("has title {title}"), move |node| {
        optional_matches(&node.title, &title)
    })
}

pub fn has_test_tag(tag: impl Into<TextMatch>) -> SemanticsMatcher {
    let tag = tag.into();
    SemanticsMatcher::new(format!("has test tag {tag}"), move |node| {
        optional_matches(&node.test_tag, &tag)
    })
}

pub fn is_focused() -> SemanticsMatcher {
    SemanticsMatcher::new("is focused", |node| node.focused)
}

pub fn is_clickable() -> SemanticsMatcher {
    SemanticsMatcher::new("is clickable", |node| node.clickable)
}
